//! Allocation plan model.
//!
//! Total scheduled hours per topic, as produced by the allocation engine.
//!
//! # Invariant
//! `total_hours() == capacity_hours` within floating-point tolerance, except
//! when every topic is held at its cap (few topics, long runway). Then the
//! total is strictly below capacity and `slack_hours()` reports the gap.
//! The total never exceeds capacity.

use serde::{Deserialize, Serialize};

/// Hours allocated to one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAllocation {
    /// Topic identifier.
    pub topic_id: String,
    /// Subject label (denormalized for grouping).
    pub subject: String,
    /// Allocated study hours.
    pub hours: f64,
    /// Naive estimate the cap is measured against (hours).
    pub naive_hours: f64,
    /// Strength factor applied to this topic.
    pub strength_factor: f64,
    /// Whether the topic ended at its cap.
    pub capped: bool,
}

/// The cap-and-redistribute loop did not settle within its pass bound.
///
/// Soft condition: the plan is still usable, some topics just sit above
/// their cap by `excess_hours` in total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationCapExceeded {
    /// Passes run before giving up.
    pub passes: usize,
    /// Topics still above their cap.
    pub topic_ids: Vec<String>,
    /// Total hours above cap across those topics.
    pub excess_hours: f64,
}

/// Per-topic hour budgets for one scheduling run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// Allocations in input topic order.
    pub allocations: Vec<TopicAllocation>,
    /// Total capacity the plan was scaled to (hours).
    pub capacity_hours: f64,
    /// Set when the cap loop did not converge.
    pub cap_exceeded: Option<AllocationCapExceeded>,
}

impl AllocationPlan {
    /// Hours allocated to a topic.
    pub fn hours(&self, topic_id: &str) -> Option<f64> {
        self.allocation(topic_id).map(|a| a.hours)
    }

    /// Allocation entry for a topic.
    pub fn allocation(&self, topic_id: &str) -> Option<&TopicAllocation> {
        self.allocations.iter().find(|a| a.topic_id == topic_id)
    }

    /// Sum of all allocated hours.
    pub fn total_hours(&self) -> f64 {
        self.allocations.iter().map(|a| a.hours).sum()
    }

    /// Capacity left unallocated (zero unless every cap binds).
    pub fn slack_hours(&self) -> f64 {
        (self.capacity_hours - self.total_hours()).max(0.0)
    }

    /// Whether the cap loop converged.
    pub fn is_converged(&self) -> bool {
        self.cap_exceeded.is_none()
    }

    /// Number of topics in the plan.
    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    /// Whether the plan has no topics.
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }
}
