//! Schedule (solution) model.
//!
//! A schedule is the day-by-day sequence of study sessions covering every
//! date of the requested range, plus whatever budget could not be placed.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::AllocationPlan;

/// A time-boxed study session.
///
/// Times are fractional hours from midnight of `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Studied topic.
    pub topic_id: String,
    /// Subject label (denormalized for query convenience).
    pub subject: String,
    /// Topic title.
    pub title: String,
    /// Calendar date.
    pub date: NaiveDate,
    /// Start (hours from midnight).
    pub start_hour: f64,
    /// Duration (hours).
    pub duration_hours: f64,
    /// Topic complexity, kept for rendering.
    pub complexity: f64,
    /// Whether the session starts inside the learner's peak window.
    pub in_peak_window: bool,
}

impl Session {
    /// End (hours from midnight).
    #[inline]
    pub fn end_hour(&self) -> f64 {
        self.start_hour + self.duration_hours
    }

    /// Duration rounded to whole minutes.
    pub fn duration_minutes(&self) -> u32 {
        (self.duration_hours * 60.0).round() as u32
    }

    /// Wall-clock start, rounded to the minute.
    pub fn start_time(&self) -> NaiveTime {
        hour_to_time(self.start_hour)
    }

    /// Wall-clock end, rounded to the minute.
    pub fn end_time(&self) -> NaiveTime {
        hour_to_time(self.end_hour())
    }

    /// Day of week of the session date.
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Whether two sessions share time on the same date.
    pub fn overlaps(&self, other: &Session) -> bool {
        self.date == other.date
            && self.start_hour < other.end_hour()
            && other.start_hour < self.end_hour()
    }
}

/// Converts fractional hours to a wall-clock time; 24:00 and later clamp to 23:59.
fn hour_to_time(hour: f64) -> NaiveTime {
    let minutes = (hour * 60.0).round().clamp(0.0, (24 * 60 - 1) as f64) as u32;
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or(NaiveTime::MIN)
}

/// Sessions of one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Calendar date.
    pub date: NaiveDate,
    /// Study capacity of this date (hours).
    pub capacity_hours: f64,
    /// Sessions in chronological order.
    pub sessions: Vec<Session>,
}

impl DaySchedule {
    /// Hours scheduled on this date.
    pub fn total_hours(&self) -> f64 {
        self.sessions.iter().map(|s| s.duration_hours).sum()
    }

    /// Whether nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Budget left over when the date range ran out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnscheduledRemainder {
    /// Topic identifier.
    pub topic_id: String,
    /// Subject label.
    pub subject: String,
    /// Hours that could not be placed.
    pub hours: f64,
}

/// A complete study schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// First date (inclusive).
    pub start_date: NaiveDate,
    /// Last date (inclusive).
    pub end_date: NaiveDate,
    /// One entry per date in the range, in order.
    pub days: Vec<DaySchedule>,
    /// The budgets the schedule was built from.
    pub allocation: AllocationPlan,
    /// Per-topic budget that did not fit before `end_date`.
    pub unscheduled: Vec<UnscheduledRemainder>,
}

impl Schedule {
    /// All sessions in chronological order.
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.days.iter().flat_map(|d| d.sessions.iter())
    }

    /// Sessions on a given date.
    pub fn sessions_on(&self, date: NaiveDate) -> &[Session] {
        self.day(date).map(|d| d.sessions.as_slice()).unwrap_or(&[])
    }

    /// Day entry for a date.
    pub fn day(&self, date: NaiveDate) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Total scheduled hours.
    pub fn total_hours(&self) -> f64 {
        self.days.iter().map(DaySchedule::total_hours).sum()
    }

    /// Hours scheduled on a date.
    pub fn hours_on(&self, date: NaiveDate) -> f64 {
        self.day(date).map(DaySchedule::total_hours).unwrap_or(0.0)
    }

    /// Hours scheduled for a topic across the whole range.
    pub fn hours_for_topic(&self, topic_id: &str) -> f64 {
        self.sessions()
            .filter(|s| s.topic_id == topic_id)
            .map(|s| s.duration_hours)
            .sum()
    }

    /// Unplaced hours for a topic (zero if fully scheduled).
    pub fn unscheduled_for_topic(&self, topic_id: &str) -> f64 {
        self.unscheduled
            .iter()
            .filter(|r| r.topic_id == topic_id)
            .map(|r| r.hours)
            .sum()
    }

    /// Scheduled hours grouped by subject.
    pub fn hours_by_subject(&self) -> BTreeMap<String, f64> {
        let mut by_subject = BTreeMap::new();
        for s in self.sessions() {
            *by_subject.entry(s.subject.clone()).or_insert(0.0) += s.duration_hours;
        }
        by_subject
    }

    /// Number of dates with at least one session.
    pub fn study_days(&self) -> usize {
        self.days.iter().filter(|d| !d.is_empty()).count()
    }

    /// Number of sessions.
    pub fn session_count(&self) -> usize {
        self.days.iter().map(|d| d.sessions.len()).sum()
    }

    /// Whether every allocated hour was placed.
    pub fn is_fully_scheduled(&self) -> bool {
        self.unscheduled.is_empty()
    }
}
