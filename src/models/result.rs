//! Reflow outcome model.
//!
//! The engine returns the repaired order list together with two
//! parallel logs: one structured change record and one root-cause
//! explanation per moved order. The logs are index-aligned and always
//! equal in length.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::WorkOrder;

/// A recorded move of one work order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleChange {
    /// Id of the moved order.
    pub order_id: String,
    /// Human-readable number of the moved order.
    pub order_number: String,
    /// Start before the move.
    pub previous_start: DateTime<Utc>,
    /// End before the move.
    pub previous_end: DateTime<Utc>,
    /// Start after the move.
    pub new_start: DateTime<Utc>,
    /// End after the move.
    pub new_end: DateTime<Utc>,
}

impl ScheduleChange {
    /// Records a move of `order` to a new interval.
    pub fn new(order: &WorkOrder, new_start: DateTime<Utc>, new_end: DateTime<Utc>) -> Self {
        Self {
            order_id: order.id.clone(),
            order_number: order.number.clone(),
            previous_start: order.start,
            previous_end: order.end,
            new_start,
            new_end,
        }
    }
}

/// Result of a reflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflowResult {
    /// The full order list with repaired start/end timestamps.
    pub updated_work_orders: Vec<WorkOrder>,
    /// One entry per moved order, in repair order.
    pub changes: Vec<ScheduleChange>,
    /// Root-cause explanation for the change at the same index.
    pub explanations: Vec<String>,
}

impl ReflowResult {
    /// A result that passes the input through untouched.
    pub fn unchanged(orders: Vec<WorkOrder>) -> Self {
        Self {
            updated_work_orders: orders,
            changes: Vec::new(),
            explanations: Vec::new(),
        }
    }

    /// Whether the run moved nothing.
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of moved orders.
    pub fn change_count(&self) -> usize {
        self.changes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_change_captures_previous_interval() {
        let start = Utc.with_ymd_and_hms(2026, 2, 9, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 2, 9, 9, 0, 0).unwrap();
        let new_start = Utc.with_ymd_and_hms(2026, 2, 9, 10, 0, 0).unwrap();
        let new_end = Utc.with_ymd_and_hms(2026, 2, 9, 11, 0, 0).unwrap();

        let wo = WorkOrder::new("wo-1", "wc-1")
            .with_number("WO-0001")
            .with_schedule(start, end);
        let change = ScheduleChange::new(&wo, new_start, new_end);

        assert_eq!(change.order_id, "wo-1");
        assert_eq!(change.order_number, "WO-0001");
        assert_eq!(change.previous_start, start);
        assert_eq!(change.previous_end, end);
        assert_eq!(change.new_start, new_start);
        assert_eq!(change.new_end, new_end);
    }

    #[test]
    fn test_unchanged_result() {
        let wo = WorkOrder::new("wo-1", "wc-1");
        let result = ReflowResult::unchanged(vec![wo]);
        assert!(result.is_unchanged());
        assert_eq!(result.change_count(), 0);
        assert_eq!(result.updated_work_orders.len(), 1);
    }
}
