//! Scheduling engine and schedule metrics.
//!
//! Turns weighted topics and a learner profile into a dated session
//! schedule in three stages.
//!
//! # Algorithm
//!
//! - `AllocationEngine` splits the range's capacity into per-topic hour
//!   budgets (weight share × strength factor, renormalized, capped).
//! - `DayPacker` turns the remaining budgets into sessions for one date,
//!   placing complex topics in the learner's peak window.
//! - `SchedulePlanner` walks the date range, carrying unplaced budget from
//!   day to day.
//!
//! `ScheduleSummary` reports headline figures of the result.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Cepeda et al. (2006), "Distributed practice in verbal recall tasks"

mod allocation;
mod packer;
mod planner;
mod summary;

pub use allocation::AllocationEngine;
pub use packer::{Budgets, DayPacker, PackedDay};
pub use planner::SchedulePlanner;
pub use summary::ScheduleSummary;
