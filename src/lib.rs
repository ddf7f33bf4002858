//! Study schedule planning.
//!
//! Converts weighted study topics and a learner profile into a
//! day-by-day schedule of time-boxed study sessions over a date range.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Topic`, `LearnerProfile`, `AllocationPlan`,
//!   `Session`, `Schedule`, `DayTimeline`
//! - **`scheduler`**: `AllocationEngine`, `DayPacker`, `SchedulePlanner`,
//!   `ScheduleSummary`
//! - **`validation`**: Input integrity checks (empty lists, duplicate IDs,
//!   weights, capacities, profile bounds)
//! - **`config`**: Day layout and engine tuning, loadable from TOML
//! - **`error`**: `PlannerError`
//!
//! # Architecture
//!
//! The engine is pure: no I/O, no clock, no randomness. Document parsing,
//! complexity estimation, and rendering the schedule are left to the
//! caller. Diagnostics go through `tracing`; installing a subscriber is
//! the caller's choice.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use study_planner::{LearnerProfile, PeakWindow, SchedulePlanner, ScheduleSummary, Topic};
//!
//! let topics = vec![
//!     Topic::new("limits", "Calculus").with_weight(3.0).with_complexity(0.9),
//!     Topic::new("cells", "Biology").with_weight(2.0).with_complexity(0.4),
//! ];
//! let profile = LearnerProfile::new(5.0).with_peak_window(PeakWindow::Morning);
//! let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
//!
//! let schedule = SchedulePlanner::new().plan(&topics, &profile, start, end).unwrap();
//! let summary = ScheduleSummary::calculate(&schedule, &topics);
//! assert_eq!(summary.total_days, 5);
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use config::{PeakPolicy, PlannerConfig};
pub use error::{PlannerError, PlannerResult};
pub use models::{LearnerProfile, PeakWindow, Schedule, Session, Topic};
pub use scheduler::{AllocationEngine, DayPacker, SchedulePlanner, ScheduleSummary};
