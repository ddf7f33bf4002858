//! Topic model.
//!
//! A topic is one unit of study material produced by the document
//! interpretation stage: a chapter, unit, or page range of a course
//! document. The scheduling engine reads topics but never modifies them.
//!
//! # Attributes
//!
//! - **Weight**: relative share of total study effort (opaque, > 0).
//! - **Complexity**: 0.0..=1.0, decides placement in the peak-focus window.
//! - **Page count**: informational only.
//! - **Estimated hours**: optional upstream effort estimate. When present it
//!   replaces the weight-proportional share as the topic's naive estimate
//!   for the allocation cap.

use serde::{Deserialize, Serialize};

/// A study topic to be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Unique topic identifier.
    pub id: String,
    /// Subject / course label used for grouping.
    pub subject: String,
    /// Human-readable title.
    pub title: String,
    /// Relative weight (positive, unitless).
    pub weight: f64,
    /// Complexity score in [0, 1].
    pub complexity: f64,
    /// Source page count.
    pub page_count: u32,
    /// Upstream estimate of study hours, if any.
    pub estimated_hours: Option<f64>,
    /// Dominant cognitive area for the learner strength lookup.
    /// The subject label is used when absent or unmatched.
    pub cognitive_area: Option<String>,
}

impl Topic {
    /// Creates a topic with weight 1.0 and neutral complexity.
    pub fn new(id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            title: String::new(),
            weight: 1.0,
            complexity: 0.5,
            page_count: 0,
            estimated_hours: None,
            cognitive_area: None,
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the relative weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the complexity score.
    pub fn with_complexity(mut self, complexity: f64) -> Self {
        self.complexity = complexity;
        self
    }

    /// Sets the source page count.
    pub fn with_page_count(mut self, pages: u32) -> Self {
        self.page_count = pages;
        self
    }

    /// Sets the upstream hour estimate.
    pub fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Sets the dominant cognitive area.
    pub fn with_cognitive_area(mut self, area: impl Into<String>) -> Self {
        self.cognitive_area = Some(area.into());
        self
    }

    /// Title if set, otherwise the identifier.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.id
        } else {
            &self.title
        }
    }
}
