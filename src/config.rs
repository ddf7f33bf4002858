//! Planner configuration.
//!
//! Fixed carve-outs of the study day and the tuning constants of the
//! allocation engine. Every field has a default, so a TOML document only
//! needs the keys it changes:
//!
//! ```toml
//! day_start_hour = 9.0
//! session_gap_minutes = 10
//! peak_policy = "fill_peak_first"
//!
//! [lunch]
//! start_hour = 12.5
//! end_hour = 13.5
//!
//! [day_capacity_overrides]
//! 2025-03-09 = 0.0
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{PlannerError, PlannerResult};
use crate::models::{DayTimeline, TimeWindow};

/// How the peak-focus window shapes a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakPolicy {
    /// Fill the day chronologically; sessions starting inside the peak
    /// window take the most complex topics.
    #[default]
    OrderOnly,
    /// Fill the peak window first, then the rest of the day. Scarce daily
    /// capacity is spent in the window.
    FillPeakFirst,
}

/// Configuration for allocation and day packing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// First schedulable hour of the day.
    pub day_start_hour: f64,
    /// No session ends after this hour.
    pub day_end_hour: f64,
    /// Break no session may overlap.
    pub lunch: TimeWindow,
    /// Idle gap after each session (minutes).
    pub session_gap_minutes: f64,
    /// Smallest session worth placing (minutes).
    pub min_session_minutes: f64,
    /// Per-topic cap as a multiple of its naive estimate.
    pub cap_multiple: f64,
    /// Bound on cap-and-redistribute passes.
    pub max_cap_passes: usize,
    /// `strength_factor = strength_pivot - strength`.
    pub strength_pivot: f64,
    /// Lower clamp of the strength factor.
    pub strength_factor_min: f64,
    /// Upper clamp of the strength factor.
    pub strength_factor_max: f64,
    /// Strength used when the profile has no matching entry.
    pub default_strength: f64,
    /// Peak window placement policy.
    pub peak_policy: PeakPolicy,
    /// Per-date capacity in hours, replacing `max_daily_hours` (0 = rest day).
    pub day_capacity_overrides: BTreeMap<NaiveDate, f64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            day_start_hour: 8.0,
            day_end_hour: 22.0,
            lunch: TimeWindow::new(12.0, 13.0),
            session_gap_minutes: 15.0,
            min_session_minutes: 5.0,
            cap_multiple: 1.5,
            max_cap_passes: 5,
            strength_pivot: 1.5,
            strength_factor_min: 0.7,
            strength_factor_max: 1.2,
            default_strength: 0.5,
            peak_policy: PeakPolicy::OrderOnly,
            day_capacity_overrides: BTreeMap::new(),
        }
    }
}

impl PlannerConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> PlannerResult<Self> {
        let config: PlannerConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the day window.
    pub fn with_day_window(mut self, start_hour: f64, end_hour: f64) -> Self {
        self.day_start_hour = start_hour;
        self.day_end_hour = end_hour;
        self
    }

    /// Sets the lunch break.
    pub fn with_lunch(mut self, start_hour: f64, end_hour: f64) -> Self {
        self.lunch = TimeWindow::new(start_hour, end_hour);
        self
    }

    /// Sets the gap between sessions.
    pub fn with_session_gap_minutes(mut self, minutes: f64) -> Self {
        self.session_gap_minutes = minutes;
        self
    }

    /// Sets the minimum session granularity.
    pub fn with_min_session_minutes(mut self, minutes: f64) -> Self {
        self.min_session_minutes = minutes;
        self
    }

    /// Sets the cap multiple.
    pub fn with_cap_multiple(mut self, multiple: f64) -> Self {
        self.cap_multiple = multiple;
        self
    }

    /// Sets the cap pass bound.
    pub fn with_max_cap_passes(mut self, passes: usize) -> Self {
        self.max_cap_passes = passes;
        self
    }

    /// Sets the peak policy.
    pub fn with_peak_policy(mut self, policy: PeakPolicy) -> Self {
        self.peak_policy = policy;
        self
    }

    /// Overrides the capacity of one date.
    pub fn with_day_capacity(mut self, date: NaiveDate, hours: f64) -> Self {
        self.day_capacity_overrides.insert(date, hours);
        self
    }

    /// Marks a date as a rest day.
    pub fn with_rest_day(self, date: NaiveDate) -> Self {
        self.with_day_capacity(date, 0.0)
    }

    /// Capacity of `date`, given the profile's daily maximum.
    pub fn day_capacity(&self, date: NaiveDate, max_daily_hours: f64) -> f64 {
        self.day_capacity_overrides
            .get(&date)
            .copied()
            .unwrap_or(max_daily_hours)
    }

    /// Gap between sessions in hours.
    pub fn session_gap_hours(&self) -> f64 {
        self.session_gap_minutes / 60.0
    }

    /// Minimum session granularity in hours.
    pub fn min_session_hours(&self) -> f64 {
        self.min_session_minutes / 60.0
    }

    /// The day timeline with the lunch break cut out.
    pub fn timeline(&self) -> DayTimeline {
        DayTimeline::new(self.day_start_hour, self.day_end_hour).with_blocked(self.lunch)
    }

    /// Clamped strength factor for a strength score.
    pub fn strength_factor(&self, strength: f64) -> f64 {
        (self.strength_pivot - strength).clamp(self.strength_factor_min, self.strength_factor_max)
    }

    /// Checks every field against its valid range.
    pub fn validate(&self) -> PlannerResult<()> {
        let fail = |msg: String| Err(PlannerError::InvalidConfig(msg));

        if !(0.0 <= self.day_start_hour
            && self.day_start_hour < self.day_end_hour
            && self.day_end_hour <= 24.0)
        {
            return fail(format!(
                "day window {}–{} must be ordered within 0–24",
                self.day_start_hour, self.day_end_hour
            ));
        }
        if !(self.day_start_hour <= self.lunch.start_hour
            && self.lunch.start_hour < self.lunch.end_hour
            && self.lunch.end_hour <= self.day_end_hour)
        {
            return fail(format!(
                "lunch {}–{} must be ordered within the day window",
                self.lunch.start_hour, self.lunch.end_hour
            ));
        }
        if !(self.session_gap_minutes.is_finite() && self.session_gap_minutes >= 0.0) {
            return fail(format!(
                "session gap must be >= 0, got {}",
                self.session_gap_minutes
            ));
        }
        if !(self.min_session_minutes.is_finite() && self.min_session_minutes > 0.0) {
            return fail(format!(
                "min session length must be > 0, got {}",
                self.min_session_minutes
            ));
        }
        if !(self.cap_multiple.is_finite() && self.cap_multiple >= 1.0) {
            return fail(format!("cap multiple must be >= 1, got {}", self.cap_multiple));
        }
        if self.max_cap_passes == 0 {
            return fail("max cap passes must be at least 1".to_string());
        }
        if !(0.0 < self.strength_factor_min && self.strength_factor_min <= self.strength_factor_max)
        {
            return fail(format!(
                "strength factor clamp {}–{} must be positive and ordered",
                self.strength_factor_min, self.strength_factor_max
            ));
        }
        if !(0.0..=1.0).contains(&self.default_strength) {
            return fail(format!(
                "default strength {} is outside [0, 1]",
                self.default_strength
            ));
        }
        if let Some((date, hours)) = self
            .day_capacity_overrides
            .iter()
            .find(|(_, h)| !(h.is_finite() && **h >= 0.0))
        {
            return fail(format!("capacity override for {date} is {hours}"));
        }
        Ok(())
    }
}
