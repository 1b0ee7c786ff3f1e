//! Fiscal period discovery and alignment.
//!
//! Periods are discovered from the `Assets` history, which every filer reports.
//! A company may restate a period in a later filing, so the same period end can
//! appear several times; the most recent filing represents the period.
//!
//! Alignment then cuts the full fact set down to one period so that every
//! calculator sees only facts reported for that exact period end and form. This
//! keeps, for example, an EBIT from one fiscal year from being divided by the
//! capital employed of another.

use crate::facts::{Concept, FactSet, Form, USD};
use crate::tags::balance_sheet::ASSETS;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag whose history defines the set of fiscal periods.
pub const ANCHOR_TAG: &str = ASSETS;

/// One reported fiscal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FiscalPeriod {
    /// Period end date
    pub end: NaiveDate,
    /// Filing date of the most recent filing reporting this period
    pub filed: NaiveDate,
    /// Form type of the period
    pub form: Form,
}

impl FactSet {
    /// Discover every fiscal period reported on `form`.
    ///
    /// Scans the USD history of [`ANCHOR_TAG`]; restated period ends collapse to
    /// the most recently filed observation. Periods are returned most recent
    /// first. An empty list means the anchor tag is absent for this form.
    pub fn fiscal_periods(&self, form: Form) -> Vec<FiscalPeriod> {
        let mut latest_filing: BTreeMap<NaiveDate, NaiveDate> = BTreeMap::new();

        for obs in self.observations_for(ANCHOR_TAG, form) {
            latest_filing
                .entry(obs.end)
                .and_modify(|filed| {
                    if obs.filed > *filed {
                        *filed = obs.filed;
                    }
                })
                .or_insert(obs.filed);
        }

        latest_filing
            .into_iter()
            .rev()
            .map(|(end, filed)| FiscalPeriod { end, filed, form })
            .collect()
    }

    /// Restrict the fact set to one fiscal period.
    pub fn align(&self, period: &FiscalPeriod) -> Self {
        self.align_to(period.end, period.form)
    }

    /// Restrict the fact set to observations ending on `end` filed on `form`.
    ///
    /// Each tag keeps only its most recently filed matching USD observation;
    /// tags without one are dropped.
    pub fn align_to(&self, end: NaiveDate, form: Form) -> Self {
        let mut aligned = Self::new();

        for (tag, concept) in self.iter() {
            let latest = self
                .observations_for(tag, form)
                .filter(|obs| obs.end == end)
                .min_by(|a, b| b.filed.cmp(&a.filed));

            if let Some(obs) = latest {
                aligned.insert(
                    tag,
                    Concept {
                        label: concept.label.clone(),
                        description: concept.description.clone(),
                        units: BTreeMap::from([(USD.to_string(), vec![obs.clone()])]),
                    },
                );
            }
        }

        aligned
    }
}
