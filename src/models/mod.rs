//! Study scheduling domain models.
//!
//! Inputs (`Topic`, `LearnerProfile`) are produced upstream and treated as
//! read-only. Outputs (`AllocationPlan`, `Schedule`) are derived values
//! handed to export collaborators.
//!
//! # Domain Mappings
//!
//! | study-planner | Classic scheduling |
//! |---------------|--------------------|
//! | Topic | Job |
//! | LearnerProfile | Resource + calendar |
//! | Session | Assignment |
//! | Schedule | Production plan |

mod calendar;
mod plan;
mod profile;
mod schedule;
mod topic;

pub use calendar::{DayTimeline, TimeWindow};
pub use plan::{AllocationCapExceeded, AllocationPlan, TopicAllocation};
pub use profile::{LearnerProfile, PeakWindow};
pub use schedule::{DaySchedule, Schedule, Session, UnscheduledRemainder};
pub use topic::Topic;
