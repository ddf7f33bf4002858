//! Learner profile model.
//!
//! Self-reported study preferences collected by the profiling survey.
//! Read-only for the duration of a scheduling run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::TimeWindow;

/// Part of the day in which the learner reports peak focus.
///
/// Presets follow the profiling survey answers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakWindow {
    /// 06:00–10:00
    Morning,
    /// 10:00–15:00
    Midday,
    /// 17:00–21:00
    Evening,
    /// 21:00–24:00
    Night,
    /// Explicit range in hours from midnight.
    Custom { start_hour: f64, end_hour: f64 },
}

impl PeakWindow {
    /// The window as a half-open hour interval.
    pub fn window(&self) -> TimeWindow {
        match *self {
            PeakWindow::Morning => TimeWindow::new(6.0, 10.0),
            PeakWindow::Midday => TimeWindow::new(10.0, 15.0),
            PeakWindow::Evening => TimeWindow::new(17.0, 21.0),
            PeakWindow::Night => TimeWindow::new(21.0, 24.0),
            PeakWindow::Custom {
                start_hour,
                end_hour,
            } => TimeWindow::new(start_hour, end_hour),
        }
    }
}

/// A learner's scheduling preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerProfile {
    /// Maximum study hours per day (documented range 4–8).
    pub max_daily_hours: f64,
    /// Preferred (and maximum) session length in hours (documented range 0.5–2.0).
    pub preferred_session_hours: f64,
    /// Peak-focus window.
    pub peak_window: PeakWindow,
    /// Strength scores in [0, 1] keyed by cognitive area or subject.
    /// Keys are matched case-insensitively.
    pub strengths: BTreeMap<String, f64>,
}

impl LearnerProfile {
    /// Creates a profile with 1.5 h sessions, evening peak and no strengths.
    pub fn new(max_daily_hours: f64) -> Self {
        Self {
            max_daily_hours,
            preferred_session_hours: 1.5,
            peak_window: PeakWindow::Evening,
            strengths: BTreeMap::new(),
        }
    }

    /// Sets the preferred session length.
    pub fn with_session_hours(mut self, hours: f64) -> Self {
        self.preferred_session_hours = hours;
        self
    }

    /// Sets the peak-focus window.
    pub fn with_peak_window(mut self, peak: PeakWindow) -> Self {
        self.peak_window = peak;
        self
    }

    /// Adds a strength score for an area.
    pub fn with_strength(mut self, area: impl Into<String>, score: f64) -> Self {
        self.strengths.insert(area.into(), score);
        self
    }

    /// Strength score for an area, if the learner reported one.
    pub fn strength(&self, area: &str) -> Option<f64> {
        self.strengths
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(area))
            .map(|(_, &v)| v)
    }
}
