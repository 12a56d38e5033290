//! Constraint violation model.
//!
//! [`crate::checker::verify`] classifies an arbitrary schedule into
//! zero or more violations. Most kinds are repairable by the reflow
//! engine; fatal ones (dependency cycles, overlapping fixed orders)
//! cause the engine to refuse the input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of schedule constraint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationType {
    /// Two orders occupy the same work center at the same time.
    Overlap,
    /// A production order starts or ends outside shifts, or its span
    /// disagrees with its required working minutes.
    OutsideShift,
    /// A production order intersects a maintenance window, or two
    /// fixed orders overlap (fatal).
    MaintenanceCollision,
    /// An order starts before a dependency completes, or the
    /// dependency graph contains a cycle (fatal).
    DependencyError,
    /// A fixed maintenance order was moved from its original start.
    FixedOrderMoved,
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationType::Overlap => "OVERLAP",
            ViolationType::OutsideShift => "OUTSIDE_SHIFT",
            ViolationType::MaintenanceCollision => "MAINTENANCE_COLLISION",
            ViolationType::DependencyError => "DEPENDENCY_ERROR",
            ViolationType::FixedOrderMoved => "FIXED_ORDER_MOVED",
        };
        f.write_str(name)
    }
}

/// A single constraint violation on one work order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Id of the offending work order.
    pub order_id: String,
    /// Violation classification.
    pub violation_type: ViolationType,
    /// Human-readable description.
    pub message: String,
    /// Whether the automated engine cannot repair this state.
    pub is_fatal: bool,
}

impl Violation {
    fn new(order_id: impl Into<String>, violation_type: ViolationType, message: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            violation_type,
            message: message.into(),
            is_fatal: false,
        }
    }

    /// Creates an overlap violation.
    pub fn overlap(order_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(order_id, ViolationType::Overlap, message)
    }

    /// Creates a shift-adherence violation.
    pub fn outside_shift(order_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(order_id, ViolationType::OutsideShift, message)
    }

    /// Creates a maintenance collision violation.
    pub fn maintenance_collision(order_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(order_id, ViolationType::MaintenanceCollision, message)
    }

    /// Creates a dependency violation.
    pub fn dependency_error(order_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(order_id, ViolationType::DependencyError, message)
    }

    /// Creates a fixed-order displacement violation.
    pub fn fixed_order_moved(order_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(order_id, ViolationType::FixedOrderMoved, message)
    }

    /// Marks this violation as fatal.
    pub fn fatal(mut self) -> Self {
        self.is_fatal = true;
        self
    }
}
