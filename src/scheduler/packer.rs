//! Day packing: remaining budgets → concrete sessions for one date.
//!
//! # Algorithm
//!
//! 1. Candidates are topics with remaining budget, ordered by descending
//!    complexity (ties by ID).
//! 2. The day's free time is the day window minus the lunch break, visited
//!    in fill order (chronological, or the peak window first under
//!    `PeakPolicy::FillPeakFirst`).
//! 3. A session starting inside the peak window takes the most complex
//!    candidate; elsewhere candidates are taken round-robin. Each session
//!    lasts `min(preferred_session, day_left, topic_budget)`.
//! 4. A session that would run into a break is cut at the break start; the
//!    rest of it is placed first after the break. A session cut at any other
//!    slot edge (day end, peak window edge) is not resumed.
//! 5. Packing stops when the day's capacity or the candidates run out.
//!
//! Sessions shorter than the minimum granularity are only placed when they
//! finish a topic's budget. Slivers of free time or daily capacity below
//! the granularity are left unused.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::{PeakPolicy, PlannerConfig};
use crate::models::{DayTimeline, LearnerProfile, Session, TimeWindow, Topic};

const EPS: f64 = 1e-9;

/// Remaining hours per topic ID.
pub type Budgets = BTreeMap<String, f64>;

/// Output of packing one day.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedDay {
    /// Sessions in chronological order.
    pub sessions: Vec<Session>,
    /// Budgets after this day's sessions.
    pub budgets: Budgets,
}

impl PackedDay {
    /// Hours placed on this day.
    pub fn total_hours(&self) -> f64 {
        self.sessions.iter().map(|s| s.duration_hours).sum()
    }
}

#[derive(Debug, Clone)]
struct Candidate<'a> {
    topic: &'a Topic,
    budget: f64,
}

/// Packs one study day at a time.
///
/// Holds the read-only topic metadata (complexity, subject, title) needed
/// to order and label sessions; budgets and the profile are passed in per
/// call so a single day can be packed in isolation.
#[derive(Debug, Clone)]
pub struct DayPacker {
    topics: BTreeMap<String, Topic>,
    config: PlannerConfig,
}

impl DayPacker {
    /// Creates a packer with default configuration.
    pub fn new(topics: &[Topic]) -> Self {
        Self::with_config(topics, PlannerConfig::default())
    }

    /// Creates a packer with the given configuration.
    pub fn with_config(topics: &[Topic], config: PlannerConfig) -> Self {
        Self {
            topics: topics.iter().map(|t| (t.id.clone(), t.clone())).collect(),
            config,
        }
    }

    /// Packs sessions for `date` from the remaining budgets.
    ///
    /// Budgets for IDs the packer has no metadata for are returned
    /// untouched. A non-positive `capacity_hours` or session length yields
    /// no sessions.
    pub fn pack_day(
        &self,
        date: NaiveDate,
        budgets: &Budgets,
        capacity_hours: f64,
        profile: &LearnerProfile,
    ) -> PackedDay {
        let mut updated = budgets.clone();
        let preferred = profile.preferred_session_hours;
        if !(capacity_hours > EPS && preferred > EPS) {
            return PackedDay {
                sessions: Vec::new(),
                budgets: updated,
            };
        }

        let mut candidates = self.candidates(budgets);
        let peak = profile.peak_window.window();
        let timeline = self.config.timeline();
        let min_len = self.config.min_session_hours().min(preferred);
        let gap = self.config.session_gap_hours();

        let mut sessions = Vec::new();
        let mut day_left = capacity_hours;
        let mut rr = 0usize;
        // (candidate, hours, resume hour)
        let mut carry: Option<(usize, f64, f64)> = None;

        'slots: for slot in self.fill_order(&timeline, &peak) {
            let mut cursor = slot.start_hour;

            loop {
                if day_left <= EPS {
                    break 'slots;
                }
                let room = slot.end_hour - cursor;
                if room <= EPS {
                    break;
                }
                let in_peak = peak.contains(cursor);

                let (idx, wanted, is_carry) = match carry.take() {
                    Some((i, hours, resume))
                        if candidates[i].budget > EPS && (cursor - resume).abs() < EPS =>
                    {
                        (i, hours, true)
                    }
                    _ => match next_candidate(&candidates, in_peak, rr) {
                        Some(i) => (i, preferred, false),
                        None => break 'slots,
                    },
                };

                let budget = candidates[idx].budget;
                let intended = wanted.min(preferred).min(day_left).min(budget);
                let len = intended.min(room);
                if len <= EPS {
                    break 'slots;
                }

                if len < min_len && len < budget - EPS {
                    if intended <= room + EPS {
                        // Daily capacity sliver.
                        break 'slots;
                    }
                    // Fragment before a break or the day end.
                    break;
                }

                let topic = candidates[idx].topic;
                sessions.push(Session {
                    topic_id: topic.id.clone(),
                    subject: topic.subject.clone(),
                    title: topic.display_title().to_string(),
                    date,
                    start_hour: cursor,
                    duration_hours: len,
                    complexity: topic.complexity,
                    in_peak_window: in_peak,
                });

                let left = budget - len;
                candidates[idx].budget = if left > EPS { left } else { 0.0 };
                day_left -= len;
                if !is_carry && !in_peak {
                    rr = (idx + 1) % candidates.len();
                }

                if len < intended - EPS {
                    let rest = intended - len;
                    if rest >= min_len {
                        if let Some(resume) = break_end_after(&timeline, slot.end_hour) {
                            carry = Some((idx, rest, resume));
                        }
                    }
                    break;
                }
                cursor += len + gap;
            }
        }

        sessions.sort_by(|a, b| a.start_hour.total_cmp(&b.start_hour));
        for c in &candidates {
            updated.insert(c.topic.id.clone(), c.budget);
        }

        debug!(
            %date,
            capacity_hours,
            sessions = sessions.len(),
            placed_hours = capacity_hours - day_left,
            "packed study day"
        );

        PackedDay {
            sessions,
            budgets: updated,
        }
    }

    /// Topics with remaining budget, most complex first.
    fn candidates<'a>(&'a self, budgets: &Budgets) -> Vec<Candidate<'a>> {
        let mut candidates: Vec<Candidate<'a>> = budgets
            .iter()
            .filter(|(_, hours)| **hours > EPS)
            .filter_map(|(id, &hours)| {
                self.topics.get(id).map(|topic| Candidate {
                    topic,
                    budget: hours,
                })
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.topic
                .complexity
                .total_cmp(&a.topic.complexity)
                .then_with(|| a.topic.id.cmp(&b.topic.id))
        });
        candidates
    }

    /// Free intervals of the day in the order they are filled.
    fn fill_order(&self, timeline: &DayTimeline, peak: &TimeWindow) -> Vec<TimeWindow> {
        match self.config.peak_policy {
            PeakPolicy::FillPeakFirst if peak.duration_hours() > EPS => {
                let mut slots = timeline.free_intervals_within(peak);
                for free in timeline.free_intervals() {
                    let before = TimeWindow::new(free.start_hour, free.end_hour.min(peak.start_hour));
                    let after = TimeWindow::new(free.start_hour.max(peak.end_hour), free.end_hour);
                    slots.extend(
                        [before, after]
                            .into_iter()
                            .filter(|w| w.duration_hours() > EPS),
                    );
                }
                slots
            }
            _ => timeline.free_intervals(),
        }
    }
}

/// End of the blocked period starting at `hour`, if any.
fn break_end_after(timeline: &DayTimeline, hour: f64) -> Option<f64> {
    timeline
        .blocked_periods
        .iter()
        .find(|b| (b.start_hour - hour).abs() < EPS)
        .map(|b| b.end_hour)
}

/// Most complex candidate inside the peak window, round-robin elsewhere.
fn next_candidate(candidates: &[Candidate<'_>], in_peak: bool, rr: usize) -> Option<usize> {
    if in_peak {
        return candidates.iter().position(|c| c.budget > EPS);
    }
    let n = candidates.len();
    (0..n)
        .map(|k| (rr + k) % n)
        .find(|&i| candidates[i].budget > EPS)
}
