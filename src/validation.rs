//! Input validation for scheduling runs.
//!
//! Checks structural integrity of topics and learner profiles before
//! scheduling. Detects:
//! - Empty topic lists
//! - Empty or duplicate topic IDs
//! - Non-positive weights and out-of-range complexity
//! - Non-positive capacities
//! - Profile values outside their documented bounds
//!
//! Every check runs; all problems are reported together.

use std::collections::HashSet;
use std::fmt;

use crate::models::{LearnerProfile, PeakWindow, Topic};

/// Documented bounds for `LearnerProfile::max_daily_hours`.
pub const DAILY_HOURS_RANGE: (f64, f64) = (4.0, 8.0);
/// Documented bounds for `LearnerProfile::preferred_session_hours`.
pub const SESSION_HOURS_RANGE: (f64, f64) = (0.5, 2.0);

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No topics were supplied.
    EmptyTopicList,
    /// A topic has an empty identifier.
    EmptyId,
    /// Two topics share the same ID.
    DuplicateId,
    /// A topic weight is zero, negative, or not finite.
    NonPositiveWeight,
    /// A complexity score is outside [0, 1].
    ComplexityOutOfRange,
    /// An upstream hour estimate is negative or not finite.
    NegativeEstimate,
    /// Daily hours, session length or day capacity is not positive.
    NonPositiveCapacity,
    /// A profile value is outside its documented range.
    OutOfRange,
    /// The scheduling range has no days.
    InvalidDateRange,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates the topic list handed over by document interpretation.
///
/// Checks:
/// 1. At least one topic
/// 2. No empty IDs
/// 3. No duplicate IDs
/// 4. Every weight is finite and > 0
/// 5. Every complexity is within [0, 1]
/// 6. Every estimate, if present, is finite and ≥ 0
pub fn validate_topics(topics: &[Topic]) -> ValidationResult {
    let mut errors = Vec::new();

    if topics.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyTopicList,
            "Topic list is empty",
        ));
    }

    let mut ids = HashSet::new();
    for (i, topic) in topics.iter().enumerate() {
        if topic.id.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                format!("Topic at position {i} has an empty ID"),
            ));
        } else if !ids.insert(topic.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate topic ID: {}", topic.id),
            ));
        }

        if !(topic.weight.is_finite() && topic.weight > 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveWeight,
                format!("Topic '{}' has non-positive weight {}", topic.id, topic.weight),
            ));
        }

        if !(0.0..=1.0).contains(&topic.complexity) {
            errors.push(ValidationError::new(
                ValidationErrorKind::ComplexityOutOfRange,
                format!(
                    "Topic '{}' complexity {} is outside [0, 1]",
                    topic.id, topic.complexity
                ),
            ));
        }

        if let Some(est) = topic.estimated_hours {
            if !(est.is_finite() && est >= 0.0) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeEstimate,
                    format!("Topic '{}' has invalid estimate {est}", topic.id),
                ));
            }
        }
    }

    finish(errors)
}

/// Checks the capacities the engine cannot run without.
///
/// This is the subset of profile validation the engine itself enforces;
/// the documented bounds are the caller's job (`validate_profile`).
pub fn validate_capacity(profile: &LearnerProfile) -> ValidationResult {
    let mut errors = Vec::new();

    if !(profile.max_daily_hours.is_finite() && profile.max_daily_hours > 0.0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonPositiveCapacity,
            format!(
                "Max daily hours must be positive, got {}",
                profile.max_daily_hours
            ),
        ));
    }

    if !(profile.preferred_session_hours.is_finite() && profile.preferred_session_hours > 0.0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonPositiveCapacity,
            format!(
                "Preferred session length must be positive, got {}",
                profile.preferred_session_hours
            ),
        ));
    }

    finish(errors)
}

/// Validates a learner profile against its documented bounds.
///
/// Checks:
/// 1. Max daily hours within 4–8
/// 2. Preferred session length within 0.5–2.0 h
/// 3. Every strength score within [0, 1]
/// 4. A custom peak window is ordered and within 0–24
pub fn validate_profile(profile: &LearnerProfile) -> ValidationResult {
    let mut errors = validate_capacity(profile).err().unwrap_or_default();

    if !in_range(profile.max_daily_hours, DAILY_HOURS_RANGE) {
        errors.push(ValidationError::new(
            ValidationErrorKind::OutOfRange,
            format!(
                "Max daily hours {} is outside {}–{}",
                profile.max_daily_hours, DAILY_HOURS_RANGE.0, DAILY_HOURS_RANGE.1
            ),
        ));
    }

    if !in_range(profile.preferred_session_hours, SESSION_HOURS_RANGE) {
        errors.push(ValidationError::new(
            ValidationErrorKind::OutOfRange,
            format!(
                "Preferred session length {} is outside {}–{}",
                profile.preferred_session_hours, SESSION_HOURS_RANGE.0, SESSION_HOURS_RANGE.1
            ),
        ));
    }

    for (area, &score) in &profile.strengths {
        if !(0.0..=1.0).contains(&score) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                format!("Strength for '{area}' is {score}, expected [0, 1]"),
            ));
        }
    }

    if let PeakWindow::Custom {
        start_hour,
        end_hour,
    } = profile.peak_window
    {
        if !(0.0 <= start_hour && start_hour < end_hour && end_hour <= 24.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                format!("Peak window {start_hour}–{end_hour} is not an ordered range within 0–24"),
            ));
        }
    }

    finish(errors)
}

fn in_range(value: f64, (lo, hi): (f64, f64)) -> bool {
    value >= lo && value <= hi
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
