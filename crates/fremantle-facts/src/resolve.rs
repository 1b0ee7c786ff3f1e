//! Priority-ordered tag resolution.
//!
//! Different companies, and the same company across years, tag the same
//! financial concept with different XBRL names. Every metric therefore names an
//! ordered list of candidate tags. The first candidate that has a qualifying
//! observation wins; values are never blended across tags.

use crate::facts::{FactSet, Form};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A resolved value together with the fact it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFact {
    /// Tag the value was read from
    pub tag: String,
    /// Reported value
    pub value: f64,
    /// Period end date of the observation
    pub end: NaiveDate,
    /// Filing date of the observation
    pub filed: NaiveDate,
}

impl FactSet {
    /// Resolve the first candidate tag with a qualifying observation.
    ///
    /// A qualifying observation is a USD observation filed on `form` that
    /// carries a value. Among the qualifying observations of the winning tag the
    /// latest period end wins, then the latest filing date; exact ties keep the
    /// earlier observation in document order.
    ///
    /// Returns `None` when no candidate qualifies.
    pub fn resolve(&self, candidates: &[&str], form: Form) -> Option<SourceFact> {
        candidates
            .iter()
            .find_map(|tag| self.resolve_tag(tag, form))
    }

    /// Resolve a single tag.
    pub fn resolve_tag(&self, tag: &str, form: Form) -> Option<SourceFact> {
        self.observations_for(tag, form)
            .filter_map(|obs| obs.value.map(|value| (obs, value)))
            .min_by(|(a, _), (b, _)| (b.end, b.filed).cmp(&(a.end, a.filed)))
            .map(|(obs, value)| SourceFact {
                tag: tag.to_string(),
                value,
                end: obs.end,
                filed: obs.filed,
            })
    }

    /// Resolve every candidate independently, in priority order.
    ///
    /// Used where several differently named tags may report the same figure and
    /// the caller must compare them instead of taking the first.
    pub fn resolve_each(&self, candidates: &[&str], form: Form) -> Vec<SourceFact> {
        candidates
            .iter()
            .filter_map(|tag| self.resolve_tag(tag, form))
            .collect()
    }
}
