//! Multi-day schedule planning.
//!
//! # Algorithm
//!
//! 1. Resolve each date's capacity: `max_daily_hours`, unless the config
//!    overrides it (0 = rest day).
//! 2. Allocate the range's total capacity across topics.
//! 3. Walk the dates in order, packing each day from the budgets left over
//!    by the days before it.
//! 4. Budget still left after the last date is reported as an unscheduled
//!    remainder.
//!
//! # Complexity
//! O(d × s × n) for d dates, s sessions per day and n topics.

use chrono::NaiveDate;
use tracing::{info, info_span, warn};

use crate::config::PlannerConfig;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{DaySchedule, LearnerProfile, Schedule, Topic, UnscheduledRemainder};
use crate::validation::{validate_capacity, ValidationError, ValidationErrorKind};

use super::allocation::AllocationEngine;
use super::packer::{Budgets, DayPacker};

/// Leftover budget below this is rounding noise, not a remainder.
const REMAINDER_TOLERANCE: f64 = 1e-6;

/// Builds a complete study schedule over an inclusive date range.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use study_planner::models::{LearnerProfile, PeakWindow, Topic};
/// use study_planner::scheduler::SchedulePlanner;
///
/// let topics = vec![
///     Topic::new("A", "Math").with_weight(10.0).with_complexity(0.8),
///     Topic::new("B", "Bio").with_weight(5.0).with_complexity(0.3),
/// ];
/// let profile = LearnerProfile::new(4.0).with_peak_window(PeakWindow::Morning);
/// let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
///
/// let schedule = SchedulePlanner::new().plan(&topics, &profile, start, end).unwrap();
/// assert_eq!(schedule.days.len(), 2);
/// assert!((schedule.total_hours() - 8.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchedulePlanner {
    config: PlannerConfig,
}

impl SchedulePlanner {
    /// Creates a planner with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a planner with the given configuration.
    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans `start..=end`.
    ///
    /// # Errors
    /// - `InvalidConfig` if the configuration fails validation.
    /// - `InvalidInput` for an inverted range, malformed topics, a
    ///   non-positive profile capacity, or a range whose dates are all
    ///   rest days.
    pub fn plan(
        &self,
        topics: &[Topic],
        profile: &LearnerProfile,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PlannerResult<Schedule> {
        let span = info_span!("plan", %start, %end);
        let _guard = span.enter();

        if end < start {
            return Err(PlannerError::invalid(ValidationError::new(
                ValidationErrorKind::InvalidDateRange,
                format!("End date {end} is before start date {start}"),
            )));
        }
        self.config.validate()?;
        validate_capacity(profile).map_err(PlannerError::InvalidInput)?;

        let capacities: Vec<(NaiveDate, f64)> = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|d| (d, self.config.day_capacity(d, profile.max_daily_hours)))
            .collect();
        let total_capacity: f64 = capacities.iter().map(|(_, c)| c).sum();

        let allocation = AllocationEngine::with_config(self.config.clone()).allocate_capacity(
            topics,
            profile,
            total_capacity,
        )?;

        let packer = DayPacker::with_config(topics, self.config.clone());
        let mut budgets: Budgets = allocation
            .allocations
            .iter()
            .map(|a| (a.topic_id.clone(), a.hours))
            .collect();

        let mut days = Vec::with_capacity(capacities.len());
        for (date, capacity_hours) in capacities {
            let packed = packer.pack_day(date, &budgets, capacity_hours, profile);
            budgets = packed.budgets;
            days.push(DaySchedule {
                date,
                capacity_hours,
                sessions: packed.sessions,
            });
        }

        let unscheduled: Vec<UnscheduledRemainder> = allocation
            .allocations
            .iter()
            .filter_map(|a| {
                let hours = budgets.get(&a.topic_id).copied().unwrap_or(0.0);
                (hours > REMAINDER_TOLERANCE).then(|| UnscheduledRemainder {
                    topic_id: a.topic_id.clone(),
                    subject: a.subject.clone(),
                    hours,
                })
            })
            .collect();

        let schedule = Schedule {
            start_date: start,
            end_date: end,
            days,
            allocation,
            unscheduled,
        };

        if !schedule.is_fully_scheduled() {
            let hours: f64 = schedule.unscheduled.iter().map(|r| r.hours).sum();
            warn!(
                topics = schedule.unscheduled.len(),
                hours,
                "study range ended with unscheduled budget"
            );
        }
        info!(
            days = schedule.days.len(),
            sessions = schedule.session_count(),
            capacity_hours = total_capacity,
            scheduled_hours = schedule.total_hours(),
            "planned study schedule"
        );

        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PeakPolicy;
    use crate::models::{PeakWindow, TimeWindow};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn two_topics() -> Vec<Topic> {
        vec![
            Topic::new("A", "Math").with_weight(10.0).with_complexity(0.8),
            Topic::new("B", "Bio").with_weight(5.0).with_complexity(0.3),
        ]
    }

    fn assert_conserved(schedule: &Schedule) {
        for a in &schedule.allocation.allocations {
            let placed = schedule.hours_for_topic(&a.topic_id);
            let left = schedule.unscheduled_for_topic(&a.topic_id);
            assert!(
                (placed + left - a.hours).abs() < 1e-6,
                "topic {}: {placed} + {left} != {}",
                a.topic_id,
                a.hours
            );
        }
    }

    fn assert_well_formed(schedule: &Schedule, config: &PlannerConfig) {
        for day in &schedule.days {
            assert!(day.total_hours() <= day.capacity_hours + 1e-6);
            for s in &day.sessions {
                assert_eq!(s.date, day.date);
                assert!(s.start_hour >= config.day_start_hour - 1e-9);
                assert!(s.end_hour() <= config.day_end_hour + 1e-9);
                let w = TimeWindow::new(s.start_hour, s.end_hour());
                assert!(!w.overlaps(&config.lunch), "{s:?} overlaps lunch");
            }
            for (i, a) in day.sessions.iter().enumerate() {
                for b in &day.sessions[i + 1..] {
                    assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_two_topic_morning_scenario() {
        let profile = LearnerProfile::new(4.0).with_peak_window(PeakWindow::Morning);
        let schedule = SchedulePlanner::new()
            .plan(&two_topics(), &profile, date(3), date(4))
            .unwrap();

        assert_eq!(schedule.days.len(), 2);
        assert!((schedule.allocation.hours("A").unwrap() - 16.0 / 3.0).abs() < 1e-9);
        assert!((schedule.allocation.hours("B").unwrap() - 8.0 / 3.0).abs() < 1e-9);
        for day in &schedule.days {
            assert!((day.total_hours() - 4.0).abs() < 1e-6);
            let first = &day.sessions[0];
            assert_eq!(first.topic_id, "A");
            assert!(first.in_peak_window);
        }
        assert!(schedule.is_fully_scheduled());
        assert_conserved(&schedule);
        assert_well_formed(&schedule, &PlannerConfig::default());
    }

    #[test]
    fn test_single_topic_single_day() {
        let topics = vec![Topic::new("only", "Math")];
        let profile = LearnerProfile::new(4.0);
        let schedule = SchedulePlanner::new()
            .plan(&topics, &profile, date(3), date(3))
            .unwrap();

        assert!((schedule.total_hours() - 4.0).abs() < 1e-9);
        assert!(schedule
            .sessions()
            .all(|s| s.duration_hours <= profile.preferred_session_hours + 1e-9));
        assert_well_formed(&schedule, &PlannerConfig::default());
    }

    #[test]
    fn test_rest_day_gets_no_sessions() {
        let topics = vec![Topic::new("only", "Math")];
        let config = PlannerConfig::default().with_rest_day(date(4));
        let schedule = SchedulePlanner::with_config(config)
            .plan(&topics, &LearnerProfile::new(4.0), date(3), date(5))
            .unwrap();

        assert_eq!(schedule.days.len(), 3);
        assert!((schedule.allocation.capacity_hours - 8.0).abs() < 1e-9);
        assert!(schedule.sessions_on(date(4)).is_empty());
        assert!((schedule.hours_on(date(3)) - 4.0).abs() < 1e-9);
        assert!((schedule.hours_on(date(5)) - 4.0).abs() < 1e-9);
        assert_eq!(schedule.study_days(), 2);
    }

    #[test]
    fn test_reduced_day_capacity() {
        let topics = vec![Topic::new("only", "Math")];
        let config = PlannerConfig::default().with_day_capacity(date(3), 2.0);
        let schedule = SchedulePlanner::with_config(config)
            .plan(&topics, &LearnerProfile::new(4.0), date(3), date(4))
            .unwrap();

        assert!((schedule.hours_on(date(3)) - 2.0).abs() < 1e-9);
        assert!((schedule.hours_on(date(4)) - 4.0).abs() < 1e-9);
        assert!(schedule.is_fully_scheduled());
    }

    #[test]
    fn test_short_day_leaves_remainder() {
        let topics = vec![Topic::new("only", "Math")];
        // 08–12 and 13–14 leave less free time than the 6 h capacity.
        let config = PlannerConfig::default().with_day_window(8.0, 14.0);
        let schedule = SchedulePlanner::with_config(config.clone())
            .plan(&topics, &LearnerProfile::new(6.0), date(3), date(3))
            .unwrap();

        assert!(!schedule.is_fully_scheduled());
        assert_eq!(schedule.unscheduled[0].topic_id, "only");
        assert!(schedule.unscheduled_for_topic("only") > 1.0);
        assert_conserved(&schedule);
        assert_well_formed(&schedule, &config);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = SchedulePlanner::new()
            .plan(&two_topics(), &LearnerProfile::new(4.0), date(5), date(3))
            .unwrap_err();
        assert_eq!(
            err.validation_errors()[0].kind,
            ValidationErrorKind::InvalidDateRange
        );
    }

    #[test]
    fn test_rejects_all_rest_days() {
        let config = PlannerConfig::default()
            .with_rest_day(date(3))
            .with_rest_day(date(4));
        let err = SchedulePlanner::with_config(config)
            .plan(&two_topics(), &LearnerProfile::new(4.0), date(3), date(4))
            .unwrap_err();
        assert_eq!(
            err.validation_errors()[0].kind,
            ValidationErrorKind::NonPositiveCapacity
        );
    }

    #[test]
    fn test_rejects_invalid_config_and_input() {
        let bad_config = PlannerConfig::default().with_max_cap_passes(0);
        let err = SchedulePlanner::with_config(bad_config)
            .plan(&two_topics(), &LearnerProfile::new(4.0), date(3), date(4))
            .unwrap_err();
        assert!(matches!(err, PlannerError::InvalidConfig(_)));

        let err = SchedulePlanner::new()
            .plan(&[], &LearnerProfile::new(4.0), date(3), date(4))
            .unwrap_err();
        assert_eq!(
            err.validation_errors()[0].kind,
            ValidationErrorKind::EmptyTopicList
        );

        let err = SchedulePlanner::new()
            .plan(&two_topics(), &LearnerProfile::new(0.0), date(3), date(4))
            .unwrap_err();
        assert_eq!(
            err.validation_errors()[0].kind,
            ValidationErrorKind::NonPositiveCapacity
        );
    }

    #[test]
    fn test_idempotent() {
        let profile = LearnerProfile::new(5.0)
            .with_session_hours(1.0)
            .with_strength("Math", 0.8);
        let planner = SchedulePlanner::new();
        let a = planner.plan(&two_topics(), &profile, date(3), date(9)).unwrap();
        let b = planner.plan(&two_topics(), &profile, date(3), date(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_schedule_serializes() {
        let schedule = SchedulePlanner::new()
            .plan(&two_topics(), &LearnerProfile::new(4.0), date(3), date(4))
            .unwrap();
        let json = serde_json::to_string(&schedule).unwrap();
        assert!(json.contains("\"2025-03-03\""));
        let back: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back.days.len(), 2);
        assert_eq!(back.session_count(), schedule.session_count());
    }

    #[test]
    fn test_random_inputs_hold_invariants() {
        let mut rng = StdRng::seed_from_u64(7);
        let peaks = [
            PeakWindow::Morning,
            PeakWindow::Midday,
            PeakWindow::Evening,
            PeakWindow::Night,
        ];

        for round in 0..60 {
            let n = rng.random_range(1..8);
            let topics: Vec<Topic> = (0..n)
                .map(|i| {
                    Topic::new(format!("T{i}"), format!("S{}", i % 3))
                        .with_weight(rng.random_range(0.5..20.0))
                        .with_complexity(rng.random_range(0.0..=1.0))
                })
                .collect();
            let profile = LearnerProfile::new(rng.random_range(4.0..=8.0))
                .with_session_hours(rng.random_range(0.5..=2.0))
                .with_peak_window(peaks[rng.random_range(0..peaks.len())])
                .with_strength("S0", rng.random_range(0.0..=1.0))
                .with_strength("S1", rng.random_range(0.0..=1.0));
            let policy = if rng.random_bool(0.5) {
                PeakPolicy::OrderOnly
            } else {
                PeakPolicy::FillPeakFirst
            };
            let config = PlannerConfig::default().with_peak_policy(policy);
            let days = rng.random_range(1..10);
            let end = date(1 + days);

            let schedule = SchedulePlanner::with_config(config.clone())
                .plan(&topics, &profile, date(1), end)
                .unwrap();

            let capacity = f64::from(days + 1) * profile.max_daily_hours;
            assert!(
                (schedule.allocation.total_hours() - capacity).abs() < 1e-6,
                "round {round}: allocation sum"
            );
            assert_eq!(schedule.days.len(), days as usize + 1);
            assert_conserved(&schedule);
            assert_well_formed(&schedule, &config);
        }
    }
}
