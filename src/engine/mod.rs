//! Schedule repair engine.
//!
//! Walks each work center's processing order and places every
//! production order at the earliest shift-valid, maintenance-free,
//! predecessor-safe slot, recording a change log and a parallel
//! root-cause explanation log.
//!
//! # Entry Points
//!
//! [`ReflowEngine`] carries the configuration; [`reflow`] is the
//! convenience entry with defaults. The slot cursors
//! ([`find_next_available_start`], [`find_end_date`]) are exposed for
//! callers that need to probe availability directly.

mod repair;
mod slots;

pub use repair::{ReflowConfig, ReflowEngine};
pub use slots::{find_end_date, find_next_available_start};

use crate::error::ReflowError;
use crate::models::{ReflowResult, WorkCenter, WorkOrder};

/// Repairs a schedule with the default configuration.
///
/// See [`ReflowEngine::reflow`].
pub fn reflow(orders: &[WorkOrder], centers: &[WorkCenter]) -> Result<ReflowResult, ReflowError> {
    ReflowEngine::new().reflow(orders, centers)
}
