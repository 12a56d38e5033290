//! Work order model.
//!
//! A work order is the unit of scheduled work: it occupies one work
//! center for a net amount of working minutes and may depend on other
//! work orders completing first.
//!
//! # Time Model
//! All timestamps are UTC (`chrono::DateTime<Utc>`). Producers must not
//! feed local-time values; the engine never converts time zones.
//!
//! # Maintenance Orders
//! An order flagged as maintenance is *fixed*: its times are immutable,
//! it may run outside shifts, and the repair engine treats it purely as
//! an obstacle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A work order to be placed on a work center.
///
/// `duration_minutes` is the net required working time: on-shift,
/// outside-maintenance minutes between `start` and `end`. For a valid
/// production order the two agree (see [`crate::calendar::working_minutes`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    /// Unique order identifier (opaque).
    pub id: String,
    /// Human-readable order number.
    pub number: String,
    /// Owning work center, referenced by id.
    pub work_center_id: String,
    /// Manufacturing order this work order belongs to (opaque passthrough).
    pub manufacturing_order_id: String,
    /// Scheduled start (UTC).
    pub start: DateTime<Utc>,
    /// Scheduled end (UTC). Must lie after `start`.
    pub end: DateTime<Utc>,
    /// Net required working minutes.
    pub duration_minutes: i64,
    /// Whether this is a fixed maintenance order.
    pub is_maintenance: bool,
    /// Ids of work orders that must complete before this one starts.
    /// Ids that do not resolve within the input set impose no constraint.
    pub depends_on: Vec<String>,
}

impl WorkOrder {
    /// Creates a new work order on the given work center.
    pub fn new(id: impl Into<String>, work_center_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            number: String::new(),
            work_center_id: work_center_id.into(),
            manufacturing_order_id: String::new(),
            start: DateTime::UNIX_EPOCH,
            end: DateTime::UNIX_EPOCH,
            duration_minutes: 0,
            is_maintenance: false,
            depends_on: Vec::new(),
        }
    }

    /// Sets the human-readable order number.
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    /// Sets the owning manufacturing order id.
    pub fn with_manufacturing_order(mut self, mo_id: impl Into<String>) -> Self {
        self.manufacturing_order_id = mo_id.into();
        self
    }

    /// Sets the scheduled interval.
    pub fn with_schedule(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Sets the net required working minutes.
    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Adds a dependency on another work order.
    pub fn with_dependency(mut self, order_id: impl Into<String>) -> Self {
        self.depends_on.push(order_id.into());
        self
    }

    /// Marks this order as a fixed maintenance order.
    pub fn as_maintenance(mut self) -> Self {
        self.is_maintenance = true;
        self
    }

    /// Whether a timestamp falls within this order's `[start, end)` interval.
    #[inline]
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether two orders' intervals overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether this order depends on anything.
    pub fn has_dependencies(&self) -> bool {
        !self.depends_on.is_empty()
    }
}
