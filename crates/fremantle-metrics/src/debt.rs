//! Total debt calculator
//!
//! Total debt is the sum of three components:
//!
//! 1. long-term debt, non-current
//! 2. current portion of long-term debt
//! 3. short-term borrowings
//!
//! Two tagging patterns double-count if summed naively. Some filers report a
//! long-term figure that already includes current maturities; when such a tag
//! exists it replaces components 1 and 2. Others report the current portion
//! under several tag names with the same value; that value is counted once.

use crate::money::format_usd;
use fremantle_facts::tags::debt as tags;
use fremantle_facts::{FactSet, Form, SourceFact};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Long-term debt tags that already include current maturities.
pub const LT_DEBT_INCLUDING_CURRENT_TAGS: &[&str] = &[
    tags::LONG_TERM_DEBT_AND_LEASES_INCL_CURRENT,
    tags::LONG_TERM_DEBT_INCL_CURRENT,
];

/// Non-current long-term debt tags.
pub const LT_DEBT_NONCURRENT_TAGS: &[&str] = &[
    tags::LONG_TERM_DEBT_NONCURRENT,
    tags::LONG_TERM_DEBT_AND_LEASES,
    tags::LONG_TERM_DEBT,
];

/// Current portion tags. All are checked; filers often report more than one.
pub const LT_DEBT_CURRENT_TAGS: &[&str] = &[
    tags::LONG_TERM_DEBT_CURRENT,
    tags::LONG_TERM_DEBT_AND_LEASES_CURRENT,
    tags::MATURITIES_NEXT_TWELVE_MONTHS,
];

/// Direct short-term borrowings tags.
pub const ST_BORROWINGS_TAGS: &[&str] = &[tags::SHORT_TERM_BORROWINGS];

/// Short-term borrowings and how they were obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortTermBorrowings {
    /// Amount
    pub value: f64,
    /// Method used
    pub method: String,
    /// Facts summed
    pub sources: Vec<SourceFact>,
}

/// The components that contributed to total debt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtComponents {
    /// Long-term debt including current maturities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt_debt_including_current: Option<SourceFact>,
    /// Long-term debt, non-current
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt_debt_noncurrent: Option<SourceFact>,
    /// Current portion of long-term debt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt_debt_current: Option<SourceFact>,
    /// Short-term borrowings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub st_borrowings: Option<ShortTermBorrowings>,
}

impl DebtComponents {
    fn is_empty(&self) -> bool {
        self.lt_debt_including_current.is_none()
            && self.lt_debt_noncurrent.is_none()
            && self.lt_debt_current.is_none()
            && self.st_borrowings.is_none()
    }

    fn total(&self) -> f64 {
        [
            self.lt_debt_including_current.as_ref().map(|f| f.value),
            self.lt_debt_noncurrent.as_ref().map(|f| f.value),
            self.lt_debt_current.as_ref().map(|f| f.value),
            self.st_borrowings.as_ref().map(|s| s.value),
        ]
        .into_iter()
        .flatten()
        .sum()
    }

    fn names(&self) -> Vec<&'static str> {
        [
            ("lt_debt_including_current", self.lt_debt_including_current.is_some()),
            ("lt_debt_noncurrent", self.lt_debt_noncurrent.is_some()),
            ("lt_debt_current", self.lt_debt_current.is_some()),
            ("st_borrowings", self.st_borrowings.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }

    /// Describe exactly which components contributed.
    fn method(&self) -> String {
        let noncurrent = self.lt_debt_noncurrent.is_some();
        let current = self.lt_debt_current.is_some();
        let short_term = self.st_borrowings.is_some();

        if self.lt_debt_including_current.is_some() {
            "2-component (LT including current + ST borrowings)".to_string()
        } else if noncurrent && current && short_term {
            "3-component (LT non-current + LT current + ST borrowings)".to_string()
        } else if noncurrent && current {
            "2-component (LT non-current + LT current, no ST borrowings)".to_string()
        } else if noncurrent && short_term {
            "2-component (LT non-current + ST borrowings, no LT current)".to_string()
        } else {
            format!("Partial ({})", self.names().join(", "))
        }
    }
}

/// Total debt for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtResult {
    /// Total debt
    pub value: f64,
    /// Which components contributed
    pub method: String,
    /// Component breakdown
    pub components: DebtComponents,
    /// Notes on duplicates, skipped or missing components
    pub warnings: Vec<String>,
    /// Set when current portion tags disagree
    pub needs_review: bool,
}

/// Aggregates total debt with double-count guards.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebtCalculator;

impl DebtCalculator {
    /// Create a new calculator
    pub const fn new() -> Self {
        Self
    }

    /// Calculate total debt, or `None` when no component resolves.
    ///
    /// Missing short-term borrowings are normal and produce no warning.
    pub fn calculate(&self, facts: &FactSet, form: Form) -> Option<DebtResult> {
        let mut components = DebtComponents::default();
        let mut warnings = Vec::new();
        let mut needs_review = false;

        if let Some(including) = facts.resolve(LT_DEBT_INCLUDING_CURRENT_TAGS, form) {
            warnings.push(format!(
                "Using {} which includes current maturities - skipping separate current portion",
                including.tag
            ));
            components.lt_debt_including_current = Some(including);
        } else {
            match facts.resolve(LT_DEBT_NONCURRENT_TAGS, form) {
                Some(noncurrent) => components.lt_debt_noncurrent = Some(noncurrent),
                None => warnings.push("Could not find non-current long-term debt".to_string()),
            }

            let (current, review) = Self::current_portion(facts, form, &mut warnings);
            components.lt_debt_current = current;
            needs_review = review;
        }

        components.st_borrowings = Self::short_term_borrowings(facts, form);

        if components.is_empty() {
            warn!(%form, "could not calculate total debt - no components found");
            return None;
        }

        let method = components.method();
        debug!(%method, "total debt resolved");

        Some(DebtResult {
            value: components.total(),
            method,
            components,
            warnings,
            needs_review,
        })
    }

    /// Resolve the current portion across every candidate tag.
    ///
    /// Returns the fact to count and whether the candidates disagree.
    fn current_portion(
        facts: &FactSet,
        form: Form,
        warnings: &mut Vec<String>,
    ) -> (Option<SourceFact>, bool) {
        let matches = facts.resolve_each(LT_DEBT_CURRENT_TAGS, form);

        match matches.as_slice() {
            [] => {
                warnings.push("Could not find current portion of long-term debt".to_string());
                (None, false)
            }
            [single] => (Some(single.clone()), false),
            [first, rest @ ..] => {
                let tag_list = matches
                    .iter()
                    .map(|m| m.tag.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");

                if rest.iter().all(|m| m.value == first.value) {
                    warnings.push(format!(
                        "Found {} tags for current portion of LT debt with same value ({}) - counted once only: {}",
                        matches.len(),
                        format_usd(first.value),
                        tag_list
                    ));
                    (Some(first.clone()), false)
                } else {
                    let values = matches
                        .iter()
                        .map(|m| format_usd(m.value))
                        .collect::<Vec<_>>()
                        .join(", ");
                    warn!(tags = %tag_list, %values, "conflicting current portion of long-term debt");
                    warnings.push(format!(
                        "WARNING: Found {} tags for current portion with DIFFERENT values: [{}] - using first one ({}) but needs review",
                        matches.len(),
                        values,
                        first.tag
                    ));
                    (Some(first.clone()), true)
                }
            }
        }
    }

    /// Direct short-term borrowings, else bank loans plus commercial paper.
    fn short_term_borrowings(facts: &FactSet, form: Form) -> Option<ShortTermBorrowings> {
        if let Some(direct) = facts.resolve(ST_BORROWINGS_TAGS, form) {
            return Some(ShortTermBorrowings {
                value: direct.value,
                method: "Direct ShortTermBorrowings".to_string(),
                sources: vec![direct],
            });
        }

        let parts: Vec<SourceFact> = [tags::SHORT_TERM_BANK_LOANS, tags::COMMERCIAL_PAPER]
            .into_iter()
            .filter_map(|tag| facts.resolve_tag(tag, form))
            .collect();

        if parts.is_empty() {
            return None;
        }

        Some(ShortTermBorrowings {
            value: parts.iter().map(|p| p.value).sum(),
            method: "Sum of components (bank loans + commercial paper)".to_string(),
            sources: parts,
        })
    }
}
