//! Cascade-tracked schedule repair.
//!
//! # Algorithm
//!
//! 1. Verify the input. A clean schedule passes through untouched; a
//!    schedule with fatal violations is refused before any mutation.
//! 2. Clone the order list and walk the work centers in input order.
//! 3. Per center, visit production orders in the sequence-preserving
//!    processing order, placing each at the earliest shift-valid,
//!    obstacle-free slot and recording one change plus one root-cause
//!    explanation per move.
//!
//! A cascade flag tracks whether the current run of orders is moving
//! because an earlier order was moved: it separates "this order was
//! broken" explanations from "this order got pushed" ones.

use chrono::{DateTime, Utc};

use crate::calendar::working_minutes;
use crate::checker::verify;
use crate::error::ReflowError;
use crate::models::{ReflowResult, ScheduleChange, Violation, WorkCenter, WorkOrder};
use crate::sequence::processing_order;

use super::slots::{find_end_date, find_next_available_start};

const CASCADE_EXPLANATION: &str = "Cascading shift changes due to earlier violations";

/// Tuning knobs for the repair engine.
#[derive(Debug, Clone)]
pub struct ReflowConfig {
    /// Upper bound on cursor hops per slot search. Guards against
    /// degenerate calendars such as a center without shifts.
    pub max_cursor_hops: usize,
    /// Re-verify the repaired schedule and log anything left over.
    pub audit_after_repair: bool,
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            max_cursor_hops: 10_000,
            audit_after_repair: true,
        }
    }
}

/// Constraint-repair engine for work-order schedules.
///
/// Pure with respect to its inputs: the order list is cloned before any
/// mutation, and fixed maintenance orders are never touched.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use reflow::models::{WorkCenter, WorkOrder};
/// use reflow::ReflowEngine;
///
/// // Monday 2026-02-09, shift 08-17; order requested before the shift opens.
/// let center = WorkCenter::new("wc-1").with_shift(1, 8, 17);
/// let order = WorkOrder::new("wo-1", "wc-1")
///     .with_number("WO-0001")
///     .with_schedule(
///         Utc.with_ymd_and_hms(2026, 2, 9, 6, 0, 0).unwrap(),
///         Utc.with_ymd_and_hms(2026, 2, 9, 7, 0, 0).unwrap(),
///     )
///     .with_duration(60);
///
/// let result = ReflowEngine::new().reflow(&[order], &[center]).unwrap();
/// assert_eq!(result.change_count(), 1);
/// assert_eq!(
///     result.updated_work_orders[0].start,
///     Utc.with_ymd_and_hms(2026, 2, 9, 8, 0, 0).unwrap(),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReflowEngine {
    config: ReflowConfig,
}

impl ReflowEngine {
    /// Creates an engine with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: ReflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the cursor watchdog budget.
    pub fn with_max_cursor_hops(mut self, hops: usize) -> Self {
        self.config.max_cursor_hops = hops;
        self
    }

    /// Enables or disables the post-repair audit.
    pub fn with_audit_after_repair(mut self, audit: bool) -> Self {
        self.config.audit_after_repair = audit;
        self
    }

    /// Repairs a schedule.
    ///
    /// Returns the input unchanged (and no log entries) when it already
    /// verifies clean. Fails with [`ReflowError::NotFixable`] when the
    /// input contains a dependency cycle or overlapping fixed orders;
    /// nothing is mutated in that case.
    pub fn reflow(
        &self,
        orders: &[WorkOrder],
        centers: &[WorkCenter],
    ) -> Result<ReflowResult, ReflowError> {
        let violations = verify(orders, centers, None);
        if violations.is_empty() {
            tracing::debug!(orders = orders.len(), "schedule verifies clean, nothing to repair");
            return Ok(ReflowResult::unchanged(orders.to_vec()));
        }

        let fatal: Vec<Violation> = violations.iter().filter(|v| v.is_fatal).cloned().collect();
        if !fatal.is_empty() {
            return Err(ReflowError::NotFixable { violations: fatal });
        }

        let mut working = orders.to_vec();
        let mut changes = Vec::new();
        let mut explanations = Vec::new();
        for center in centers {
            self.reschedule_by_center(
                &mut working,
                center,
                &violations,
                &mut changes,
                &mut explanations,
            );
        }
        debug_assert_eq!(changes.len(), explanations.len());

        if self.config.audit_after_repair {
            for residual in verify(&working, centers, None) {
                tracing::warn!(
                    order_id = %residual.order_id,
                    kind = %residual.violation_type,
                    "residual violation after repair: {}",
                    residual.message
                );
            }
        }

        Ok(ReflowResult {
            updated_work_orders: working,
            changes,
            explanations,
        })
    }

    /// Repairs one center's production orders in processing order,
    /// writing placements back into the shared list by id.
    fn reschedule_by_center(
        &self,
        working: &mut [WorkOrder],
        center: &WorkCenter,
        original_violations: &[Violation],
        changes: &mut Vec<ScheduleChange>,
        explanations: &mut Vec<String>,
    ) {
        let mut production: Vec<WorkOrder> = working
            .iter()
            .filter(|o| o.work_center_id == center.id && !o.is_maintenance)
            .cloned()
            .collect();
        if production.is_empty() {
            return;
        }
        tracing::debug!(work_center = %center.id, orders = production.len(), "repair pass");

        let sequence = processing_order(&production);
        let mut cascade = false;
        let mut previous: Option<(DateTime<Utc>, String)> = None;

        for &idx in &sequence {
            let collision = previous
                .as_ref()
                .filter(|(end, _)| production[idx].start < *end)
                .cloned();
            let original = original_violations
                .iter()
                .find(|v| v.order_id == production[idx].id);

            let placement: Option<(DateTime<Utc>, String)> = if cascade {
                if let Some((previous_end, _)) = collision {
                    Some((previous_end, CASCADE_EXPLANATION.to_string()))
                } else if let Some(violation) = original {
                    Some((
                        production[idx].start,
                        format!("Original violation: {}", violation.violation_type),
                    ))
                } else if self.slot_is_clear(&production[idx], center, working) {
                    cascade = false;
                    None
                } else {
                    // Fits after its predecessor but sits on an
                    // obstacle; keep cascading.
                    Some((production[idx].start, CASCADE_EXPLANATION.to_string()))
                }
            } else if let Some((previous_end, previous_number)) = collision {
                cascade = true;
                let explanation = match original {
                    Some(violation) => {
                        format!("Original violation: {}", violation.violation_type)
                    }
                    None => format!("Collision with previous order {previous_number}"),
                };
                Some((previous_end, explanation))
            } else if let Some(violation) = original {
                cascade = true;
                Some((
                    production[idx].start,
                    format!("Original violation: {}", violation.violation_type),
                ))
            } else {
                None
            };

            if let Some((base, explanation)) = placement {
                // Cross-center parents bound the child's start from below.
                let base = match self.dependency_floor(&production[idx], working) {
                    Some(floor) => base.max(floor),
                    None => base,
                };
                let new_start = find_next_available_start(base, center, working, &self.config);
                let new_end = find_end_date(
                    new_start,
                    production[idx].duration_minutes,
                    center,
                    working,
                    &self.config,
                );
                tracing::debug!(
                    order = %production[idx].id,
                    from = %production[idx].start,
                    to = %new_start,
                    "shifting work order"
                );
                changes.push(ScheduleChange::new(&production[idx], new_start, new_end));
                explanations.push(explanation);
                production[idx].start = new_start;
                production[idx].end = new_end;
                if let Some(shared) = working.iter_mut().find(|o| o.id == production[idx].id) {
                    *shared = production[idx].clone();
                }
            }

            previous = Some((production[idx].end, production[idx].number.clone()));
        }
    }

    /// Latest end among the order's resolvable dependencies.
    fn dependency_floor(&self, order: &WorkOrder, all: &[WorkOrder]) -> Option<DateTime<Utc>> {
        order
            .depends_on
            .iter()
            .filter_map(|id| all.iter().find(|o| &o.id == id))
            .map(|parent| parent.end)
            .max()
    }

    /// Whether an order's current slot is reachable as-is: the start is
    /// not displaced by any shift or obstacle and the span matches the
    /// required working minutes.
    fn slot_is_clear(&self, order: &WorkOrder, center: &WorkCenter, all: &[WorkOrder]) -> bool {
        find_next_available_start(order.start, center, all, &self.config) == order.start
            && (working_minutes(order.start, order.end, center) - order.duration_minutes).abs() <= 1
    }
}
