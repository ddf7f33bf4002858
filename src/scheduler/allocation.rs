//! Proportional hour allocation under a hard capacity.
//!
//! # Algorithm
//!
//! 1. `capacity = days × max_daily_hours`
//! 2. `raw_i = weight_i / Σweight × capacity × strength_factor_i`, where
//!    `strength_factor = clamp(1.5 − strength, 0.7, 1.2)`
//! 3. Renormalize once: `hours_i = raw_i × capacity / Σraw`
//! 4. Cap every topic at `1.5 × naive_i` (weight-proportional share, or the
//!    upstream estimate when the topic carries one). Capped hours are
//!    redistributed over the uncapped topics in proportion to their hours.
//!    Each pass fixes at least one more topic at its cap; after
//!    `max_cap_passes` passes any residual is accepted and flagged.
//!
//! If every topic ends at its cap the plan totals less than capacity.
//! Otherwise the total equals capacity within floating-point tolerance.
//!
//! # Complexity
//! O(n × p) for n topics and p cap passes.

use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{AllocationCapExceeded, AllocationPlan, LearnerProfile, Topic, TopicAllocation};
use crate::validation::{validate_capacity, validate_topics, ValidationError, ValidationErrorKind};

const EPS: f64 = 1e-9;

/// Converts weighted topics into per-topic hour budgets.
///
/// Pure and deterministic: identical inputs give identical plans.
///
/// # Example
///
/// ```
/// use study_planner::models::{LearnerProfile, Topic};
/// use study_planner::scheduler::AllocationEngine;
///
/// let topics = vec![
///     Topic::new("A", "Math").with_weight(10.0),
///     Topic::new("B", "Bio").with_weight(5.0),
/// ];
/// let plan = AllocationEngine::new()
///     .allocate(&topics, &LearnerProfile::new(4.0), 2)
///     .unwrap();
/// assert!((plan.total_hours() - 8.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AllocationEngine {
    config: PlannerConfig,
}

impl AllocationEngine {
    /// Creates an engine with default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given configuration.
    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Allocates `days × max_daily_hours` across the topics.
    ///
    /// # Errors
    /// `InvalidInput` if `days == 0`, the topic list is empty or malformed,
    /// or the profile has a non-positive capacity.
    pub fn allocate(
        &self,
        topics: &[Topic],
        profile: &LearnerProfile,
        days: u32,
    ) -> PlannerResult<AllocationPlan> {
        if days == 0 {
            return Err(PlannerError::invalid(ValidationError::new(
                ValidationErrorKind::InvalidDateRange,
                "Scheduling range must cover at least one day",
            )));
        }
        validate_capacity(profile).map_err(PlannerError::InvalidInput)?;
        self.allocate_capacity(topics, profile, f64::from(days) * profile.max_daily_hours)
    }

    /// Allocates an explicit total capacity across the topics.
    ///
    /// Used when per-date overrides make the range's capacity differ from
    /// `days × max_daily_hours`.
    pub fn allocate_capacity(
        &self,
        topics: &[Topic],
        profile: &LearnerProfile,
        capacity_hours: f64,
    ) -> PlannerResult<AllocationPlan> {
        validate_topics(topics).map_err(PlannerError::InvalidInput)?;
        if !(capacity_hours.is_finite() && capacity_hours > 0.0) {
            return Err(PlannerError::invalid(ValidationError::new(
                ValidationErrorKind::NonPositiveCapacity,
                format!("Total capacity must be positive, got {capacity_hours}"),
            )));
        }

        let total_weight: f64 = topics.iter().map(|t| t.weight).sum();
        let hours_per_weight = capacity_hours / total_weight;

        let factors: Vec<f64> = topics
            .iter()
            .map(|t| self.config.strength_factor(self.strength_for(t, profile)))
            .collect();
        let naive: Vec<f64> = topics
            .iter()
            .map(|t| t.estimated_hours.unwrap_or(t.weight * hours_per_weight))
            .collect();
        let raw: Vec<f64> = topics
            .iter()
            .zip(&factors)
            .map(|(t, f)| t.weight * hours_per_weight * f)
            .collect();

        let scale = capacity_hours / raw.iter().sum::<f64>();
        let mut hours: Vec<f64> = raw.iter().map(|r| r * scale).collect();
        let caps: Vec<f64> = naive.iter().map(|n| n * self.config.cap_multiple).collect();

        let (capped, cap_exceeded) = self.apply_caps(topics, &mut hours, &caps);

        debug!(
            capacity_hours,
            topics = topics.len(),
            scale,
            allocated = hours.iter().sum::<f64>(),
            "allocated study hours"
        );

        let allocations = topics
            .iter()
            .enumerate()
            .map(|(i, t)| TopicAllocation {
                topic_id: t.id.clone(),
                subject: t.subject.clone(),
                hours: hours[i],
                naive_hours: naive[i],
                strength_factor: factors[i],
                capped: capped[i],
            })
            .collect();

        Ok(AllocationPlan {
            allocations,
            capacity_hours,
            cap_exceeded,
        })
    }

    /// Strength score for a topic: cognitive area, then subject, then the
    /// configured neutral default.
    pub fn strength_for(&self, topic: &Topic, profile: &LearnerProfile) -> f64 {
        topic
            .cognitive_area
            .as_deref()
            .and_then(|area| profile.strength(area))
            .or_else(|| profile.strength(&topic.subject))
            .unwrap_or(self.config.default_strength)
    }

    /// Bounded cap-and-redistribute loop.
    ///
    /// Returns which topics were fixed at their cap and, if the pass bound
    /// ran out, the residual violation.
    fn apply_caps(
        &self,
        topics: &[Topic],
        hours: &mut [f64],
        caps: &[f64],
    ) -> (Vec<bool>, Option<AllocationCapExceeded>) {
        let n = hours.len();
        let mut capped = vec![false; n];
        let mut passes = 0;

        loop {
            let over: Vec<usize> = (0..n)
                .filter(|&i| !capped[i] && hours[i] > caps[i] + EPS)
                .collect();
            if over.is_empty() {
                return (capped, None);
            }

            if passes == self.config.max_cap_passes {
                let excess_hours = over.iter().map(|&i| hours[i] - caps[i]).sum();
                let topic_ids: Vec<String> = over.iter().map(|&i| topics[i].id.clone()).collect();
                warn!(
                    passes,
                    excess_hours,
                    topics = ?topic_ids,
                    "allocation cap loop did not converge"
                );
                return (
                    capped,
                    Some(AllocationCapExceeded {
                        passes,
                        topic_ids,
                        excess_hours,
                    }),
                );
            }
            passes += 1;

            let mut excess = 0.0;
            for &i in &over {
                excess += hours[i] - caps[i];
                hours[i] = caps[i];
                capped[i] = true;
            }

            let free_total: f64 = (0..n).filter(|&i| !capped[i]).map(|i| hours[i]).sum();
            if free_total <= EPS {
                // Every topic is at its cap: the plan undershoots capacity.
                debug!(dropped_hours = excess, "all topics capped");
                return (capped, None);
            }
            for i in (0..n).filter(|&i| !capped[i]) {
                hours[i] += excess * hours[i] / free_total;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_topics() -> Vec<Topic> {
        vec![
            Topic::new("A", "Math").with_weight(10.0).with_complexity(0.8),
            Topic::new("B", "Bio").with_weight(5.0).with_complexity(0.3),
        ]
    }

    #[test]
    fn test_neutral_split_is_proportional() {
        let plan = AllocationEngine::new()
            .allocate(&two_topics(), &LearnerProfile::new(4.0), 2)
            .unwrap();

        assert!((plan.capacity_hours - 8.0).abs() < 1e-10);
        assert!((plan.hours("A").unwrap() - 16.0 / 3.0).abs() < 1e-9);
        assert!((plan.hours("B").unwrap() - 8.0 / 3.0).abs() < 1e-9);
        assert!((plan.total_hours() - 8.0).abs() < 1e-6);
        assert!(plan.is_converged());
    }

    #[test]
    fn test_single_topic_gets_full_capacity() {
        let topics = vec![Topic::new("only", "Math")];
        let plan = AllocationEngine::new()
            .allocate(&topics, &LearnerProfile::new(4.0), 1)
            .unwrap();
        assert!((plan.hours("only").unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_strength_shrinks_share() {
        let topics = vec![
            Topic::new("A", "Math").with_weight(1.0),
            Topic::new("B", "Bio").with_weight(1.0),
        ];
        let profile = LearnerProfile::new(5.0).with_strength("math", 1.0);
        let plan = AllocationEngine::new().allocate(&topics, &profile, 2).unwrap();

        // raw A = 5 × 0.7, raw B = 5 × 1.0, renormalized to 10.
        let a = plan.hours("A").unwrap();
        let b = plan.hours("B").unwrap();
        assert!((a - 10.0 * 0.7 / 1.7).abs() < 1e-9);
        assert!((b - 10.0 / 1.7).abs() < 1e-9);
        assert!((plan.allocation("A").unwrap().strength_factor - 0.7).abs() < 1e-10);
        assert!((a + b - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_strength_monotonic() {
        let topics = vec![
            Topic::new("A", "Math").with_weight(2.0),
            Topic::new("B", "Bio").with_weight(2.0),
            Topic::new("C", "Chem").with_weight(2.0),
        ];
        let engine = AllocationEngine::new();
        let mut last = f64::INFINITY;
        for s in [0.0, 0.2, 0.3, 0.5, 0.7, 0.8, 1.0] {
            let profile = LearnerProfile::new(6.0).with_strength("Math", s);
            let a = engine.allocate(&topics, &profile, 3).unwrap().hours("A").unwrap();
            assert!(a <= last + 1e-12, "strength {s}: {a} > {last}");
            last = a;
        }
    }

    #[test]
    fn test_cognitive_area_takes_precedence() {
        let engine = AllocationEngine::new();
        let profile = LearnerProfile::new(4.0)
            .with_strength("Physics", 0.2)
            .with_strength("spatial", 0.9);

        let plain = Topic::new("p", "Physics");
        assert!((engine.strength_for(&plain, &profile) - 0.2).abs() < 1e-10);

        let with_area = Topic::new("p", "Physics").with_cognitive_area("spatial");
        assert!((engine.strength_for(&with_area, &profile) - 0.9).abs() < 1e-10);

        let unknown_area = Topic::new("p", "Physics").with_cognitive_area("verbal");
        assert!((engine.strength_for(&unknown_area, &profile) - 0.2).abs() < 1e-10);

        let unmapped = Topic::new("h", "History");
        assert!((engine.strength_for(&unmapped, &profile) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_cap_redistributes_excess() {
        // A: raw 0.1C × 1.2, B: raw 0.9C × 0.7 → A renormalizes to 0.16C,
        // above its cap of 0.15C. The 0.01C excess moves to B.
        let topics = vec![
            Topic::new("A", "Math").with_weight(1.0),
            Topic::new("B", "Bio").with_weight(9.0),
        ];
        let profile = LearnerProfile::new(5.0)
            .with_strength("Math", 0.0)
            .with_strength("Bio", 1.0);
        let plan = AllocationEngine::new().allocate(&topics, &profile, 2).unwrap();

        assert!((plan.hours("A").unwrap() - 1.5).abs() < 1e-9);
        assert!((plan.hours("B").unwrap() - 8.5).abs() < 1e-9);
        assert!(plan.allocation("A").unwrap().capped);
        assert!(!plan.allocation("B").unwrap().capped);
        assert!(plan.is_converged());
    }

    #[test]
    fn test_estimates_cap_runaway_expansion() {
        let topics = vec![Topic::new("A", "Math").with_estimated_hours(2.0)];
        let plan = AllocationEngine::new()
            .allocate(&topics, &LearnerProfile::new(4.0), 2)
            .unwrap();

        assert!((plan.hours("A").unwrap() - 3.0).abs() < 1e-9);
        assert!((plan.slack_hours() - 5.0).abs() < 1e-9);
        assert!(plan.total_hours() <= plan.capacity_hours);
        assert!(plan.is_converged());
    }

    #[test]
    fn test_cascading_caps_converge_with_slack() {
        let topics = vec![
            Topic::new("A", "S").with_estimated_hours(1.0),
            Topic::new("B", "S").with_estimated_hours(4.0),
            Topic::new("C", "S").with_estimated_hours(4.0),
        ];
        let plan = AllocationEngine::new()
            .allocate_capacity(&topics, &LearnerProfile::new(5.0), 15.0)
            .unwrap();

        assert!((plan.hours("A").unwrap() - 1.5).abs() < 1e-9);
        assert!((plan.hours("B").unwrap() - 6.0).abs() < 1e-9);
        assert!((plan.hours("C").unwrap() - 6.0).abs() < 1e-9);
        assert!((plan.total_hours() - 13.5).abs() < 1e-9);
        assert!(plan.is_converged());
    }

    #[test]
    fn test_cap_loop_bound_flags_residual() {
        let topics = vec![
            Topic::new("A", "S").with_estimated_hours(1.0),
            Topic::new("B", "S").with_estimated_hours(4.0),
            Topic::new("C", "S").with_estimated_hours(4.0),
        ];
        let engine = AllocationEngine::with_config(PlannerConfig::default().with_max_cap_passes(1));
        let plan = engine
            .allocate_capacity(&topics, &LearnerProfile::new(5.0), 15.0)
            .unwrap();

        let flag = plan.cap_exceeded.as_ref().unwrap();
        assert_eq!(flag.passes, 1);
        assert_eq!(flag.topic_ids, vec!["B".to_string(), "C".to_string()]);
        assert!((flag.excess_hours - 1.5).abs() < 1e-9);
        // Best achieved plan still fills capacity.
        assert!((plan.total_hours() - 15.0).abs() < 1e-6);
    }

    #[test]
    fn test_sum_invariant_many_topics() {
        let topics: Vec<Topic> = (0..12)
            .map(|i| {
                Topic::new(format!("T{i}"), format!("S{}", i % 3))
                    .with_weight(1.0 + i as f64)
                    .with_complexity((i as f64) / 12.0)
            })
            .collect();
        let profile = LearnerProfile::new(6.0)
            .with_strength("S0", 0.1)
            .with_strength("S1", 0.9);
        let plan = AllocationEngine::new().allocate(&topics, &profile, 10).unwrap();
        assert!((plan.total_hours() - 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_idempotent() {
        let engine = AllocationEngine::new();
        let profile = LearnerProfile::new(4.0).with_strength("Math", 0.8);
        let a = engine.allocate(&two_topics(), &profile, 3).unwrap();
        let b = engine.allocate(&two_topics(), &profile, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let engine = AllocationEngine::new();
        let profile = LearnerProfile::new(4.0);

        let err = engine.allocate(&[], &profile, 2).unwrap_err();
        assert!(err
            .validation_errors()
            .iter()
            .any(|e| e.kind == ValidationErrorKind::EmptyTopicList));

        let bad = vec![Topic::new("A", "Math").with_weight(0.0)];
        assert!(engine.allocate(&bad, &profile, 2).is_err());

        assert!(engine.allocate(&two_topics(), &profile, 0).is_err());
        assert!(engine
            .allocate(&two_topics(), &LearnerProfile::new(-1.0), 2)
            .is_err());
        assert!(engine
            .allocate_capacity(&two_topics(), &profile, 0.0)
            .is_err());
    }
}
