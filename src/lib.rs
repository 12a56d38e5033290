//! Constraint-repair engine for manufacturing work-order schedules.
//!
//! Given a (possibly invalid) schedule of work orders and work centers,
//! the engine produces a repaired schedule with concrete start/end
//! timestamps, a change log listing every moved order, and a parallel
//! explanation log naming the root cause of each move. Inputs no
//! automated repair can fix (dependency cycles, overlapping fixed
//! maintenance orders) are refused up front.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `WorkOrder`, `WorkCenter`, `Shift`,
//!   `MaintenanceWindow`, `Violation`, `ReflowResult`
//! - **`calendar`**: Shift-aware working-minute math on UTC timestamps
//! - **`checker`**: Multi-pass constraint verification (`verify`)
//! - **`sequence`**: Dependency-aware, chronology-preserving processing order
//! - **`engine`**: The repair engine itself (`reflow`, slot search)
//!
//! # Pipeline
//!
//! `reflow` verifies first: a clean schedule passes through untouched
//! and a fatally broken one is refused. Otherwise the order list is
//! cloned and each work center's orders are replayed in a
//! sequence-preserving order, every displaced order landing at the
//! earliest slot that is inside a shift, outside maintenance, and after
//! its predecessors. `verify` is independent of the engine and serves
//! as an audit of what the engine produces.
//!
//! # Time Model
//!
//! All timestamps are UTC; local time never enters the computation.
//! Shifts are weekly recurring `(day-of-week, start hour, end hour)`
//! intervals with Sunday = 0.

pub mod calendar;
pub mod checker;
pub mod engine;
pub mod error;
pub mod models;
pub mod sequence;

pub use checker::verify;
pub use engine::{reflow, ReflowConfig, ReflowEngine};
pub use error::ReflowError;
