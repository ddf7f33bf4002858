//! Schedule summary metrics.
//!
//! Computes headline figures from a completed schedule and its input
//! topics, for display next to the session table.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total hours | Sum of session durations |
//! | Study days | Dates with at least one session |
//! | Hours by subject | Session hours grouped by subject label |
//! | Topics scheduled | Topics with at least one session |
//! | Utilization | Total hours / Σ per-date capacity |
//! | Unscheduled hours | Budget left when the range ended |

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{Schedule, Topic};

/// Headline figures of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Scheduled study hours.
    pub total_hours: f64,
    /// Dates with at least one session.
    pub study_days: usize,
    /// Dates in the range.
    pub total_days: usize,
    /// Scheduled hours per subject.
    pub hours_by_subject: BTreeMap<String, f64>,
    /// Input topics with at least one session.
    pub topics_scheduled: usize,
    /// Input topics.
    pub total_topics: usize,
    /// Scheduled hours over available capacity (0.0..=1.0).
    pub utilization: f64,
    /// Hours that did not fit in the range.
    pub unscheduled_hours: f64,
}

impl ScheduleSummary {
    /// Computes the summary of a schedule.
    ///
    /// # Arguments
    /// * `schedule` - The planned schedule.
    /// * `topics` - The topics it was planned from.
    pub fn calculate(schedule: &Schedule, topics: &[Topic]) -> Self {
        let total_hours = schedule.total_hours();
        let capacity: f64 = schedule.days.iter().map(|d| d.capacity_hours).sum();

        let scheduled_ids: HashSet<&str> =
            schedule.sessions().map(|s| s.topic_id.as_str()).collect();
        let topics_scheduled = topics
            .iter()
            .filter(|t| scheduled_ids.contains(t.id.as_str()))
            .count();

        let utilization = if capacity > 0.0 {
            (total_hours / capacity).min(1.0)
        } else {
            0.0
        };

        Self {
            total_hours,
            study_days: schedule.study_days(),
            total_days: schedule.days.len(),
            hours_by_subject: schedule.hours_by_subject(),
            topics_scheduled,
            total_topics: topics.len(),
            utilization,
            unscheduled_hours: schedule.unscheduled.iter().map(|r| r.hours).sum(),
        }
    }

    /// Whether every topic got time and utilization reaches `min_utilization`.
    pub fn meets_thresholds(&self, min_utilization: f64) -> bool {
        self.topics_scheduled == self.total_topics && self.utilization >= min_utilization
    }
}
