//! Scheduling domain models.
//!
//! Core data types for work-order schedule repair: orders, centers with
//! their shift calendars, constraint violations, and the reflow outcome.
//!
//! Ownership is by id throughout: a [`WorkOrder`] names its
//! [`WorkCenter`] and its dependencies by string id, never by reference.

mod result;
mod violation;
mod work_center;
mod work_order;

pub use result::{ReflowResult, ScheduleChange};
pub use violation::{Violation, ViolationType};
pub use work_center::{MaintenanceWindow, Shift, WorkCenter};
pub use work_order::WorkOrder;
