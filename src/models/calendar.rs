//! Time windows and the per-day study timeline.
//!
//! # Time Model
//! Times are fractional hours from local midnight of the study date
//! (`8.5` = 08:30). Sub-minute precision is kept so that session durations
//! add up to allocated budgets without rounding drift; conversion to
//! wall-clock values happens only at the edges (`Session::start_time`).
//!
//! # Precedence
//! Blocked periods override the day window. An instant is free iff:
//! - It falls within the day window `[day_start, day_end)`, AND
//! - It does NOT fall within any blocked period (e.g. lunch).

use serde::{Deserialize, Serialize};

/// A time interval [start, end) in hours.
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeWindow {
    /// Interval start (hours, inclusive).
    pub start_hour: f64,
    /// Interval end (hours, exclusive).
    pub end_hour: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start_hour: f64, end_hour: f64) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// Duration of this window (hours). Zero for inverted windows.
    #[inline]
    pub fn duration_hours(&self) -> f64 {
        (self.end_hour - self.start_hour).max(0.0)
    }

    /// Whether an instant falls within this window.
    #[inline]
    pub fn contains(&self, hour: f64) -> bool {
        hour >= self.start_hour && hour < self.end_hour
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_hour < other.end_hour && other.start_hour < self.end_hour
    }

    /// Intersection of two windows, if non-empty.
    pub fn intersection(&self, other: &Self) -> Option<TimeWindow> {
        let start = self.start_hour.max(other.start_hour);
        let end = self.end_hour.min(other.end_hour);
        if end > start {
            Some(TimeWindow::new(start, end))
        } else {
            None
        }
    }
}

/// Schedulable time of a single study day.
///
/// A day window with blocked periods cut out. Unlike a resource calendar,
/// the day window is always bounded: study never runs past `day_end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTimeline {
    /// The whole schedulable span of the day.
    pub day: TimeWindow,
    /// Periods when no session may run (overrides `day`).
    pub blocked_periods: Vec<TimeWindow>,
}

impl DayTimeline {
    /// Creates a timeline with no blocked periods.
    pub fn new(day_start_hour: f64, day_end_hour: f64) -> Self {
        Self {
            day: TimeWindow::new(day_start_hour, day_end_hour),
            blocked_periods: Vec::new(),
        }
    }

    /// Adds a blocked period.
    pub fn with_blocked(mut self, window: TimeWindow) -> Self {
        self.blocked_periods.push(window);
        self
    }

    /// Whether an instant is free for study.
    pub fn is_free(&self, hour: f64) -> bool {
        self.day.contains(hour) && !self.blocked_periods.iter().any(|b| b.contains(hour))
    }

    /// Free intervals in chronological order.
    ///
    /// Blocked periods are subtracted from the day window; overlapping
    /// blocks are handled by sorting and sweeping once.
    pub fn free_intervals(&self) -> Vec<TimeWindow> {
        let mut blocks: Vec<TimeWindow> = self
            .blocked_periods
            .iter()
            .filter_map(|b| b.intersection(&self.day))
            .collect();
        blocks.sort_by(|a, b| a.start_hour.total_cmp(&b.start_hour));

        let mut free = Vec::new();
        let mut cursor = self.day.start_hour;
        for b in blocks {
            if b.start_hour > cursor {
                free.push(TimeWindow::new(cursor, b.start_hour));
            }
            cursor = cursor.max(b.end_hour);
        }
        if self.day.end_hour > cursor {
            free.push(TimeWindow::new(cursor, self.day.end_hour));
        }
        free
    }

    /// Free intervals clipped to `window`, in chronological order.
    pub fn free_intervals_within(&self, window: &TimeWindow) -> Vec<TimeWindow> {
        self.free_intervals()
            .iter()
            .filter_map(|f| f.intersection(window))
            .collect()
    }

    /// Total free time (hours).
    pub fn available_hours(&self) -> f64 {
        self.free_intervals().iter().map(TimeWindow::duration_hours).sum()
    }
}
