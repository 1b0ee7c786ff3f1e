//! Typed model of the SEC EDGAR company-facts document.
//!
//! The SEC publishes every XBRL fact a company has filed at:
//! `https://data.sec.gov/api/xbrl/companyfacts/CIK{cik_padded}.json`
//!
//! The document is tag oriented: `facts.{taxonomy}.{tag}.units.{unit}` holds the
//! sequence of observations of one tag across every filing, including restated
//! values from later filings. Nothing guarantees uniqueness of `(tag, end)`.
//!
//! # Example
//!
//! ```
//! use fremantle_facts::{CompanyFacts, Form};
//!
//! let json = r#"{
//!     "cik": 320193,
//!     "entityName": "Apple Inc.",
//!     "facts": {"us-gaap": {"Assets": {"label": "Assets", "units": {"USD": [
//!         {"end": "2023-09-30", "val": 352755000000, "form": "10-K", "filed": "2023-11-03"}
//!     ]}}}}
//! }"#;
//!
//! let company = CompanyFacts::from_json(json)?;
//! let gaap = company.us_gaap().expect("us-gaap taxonomy");
//! assert_eq!(company.cik, "0000320193");
//! assert_eq!(gaap.observations_for("Assets", Form::Annual).count(), 1);
//! # Ok::<(), fremantle_facts::FactsError>(())
//! ```

use crate::error::{FactsError, Result};
use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use tracing::debug;

/// Taxonomy holding the US-GAAP financial statement tags.
pub const US_GAAP: &str = "us-gaap";

/// Currency unit every monetary metric is resolved in.
pub const USD: &str = "USD";

/// Filing form types that define a fiscal period.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Form {
    /// Annual report (10-K)
    #[display("10-K")]
    #[serde(rename = "10-K")]
    Annual,
    /// Interim quarterly report (10-Q); income statement values are year-to-date
    #[display("10-Q")]
    #[serde(rename = "10-Q")]
    Interim,
}

impl Form {
    /// Convert an EDGAR form name to a form type.
    ///
    /// Amendments (`10-K/A`, `10-Q/A`) and other filings are not period-defining
    /// forms and return `None`.
    pub fn from_form(form: &str) -> Option<Self> {
        match form {
            "10-K" => Some(Self::Annual),
            "10-Q" => Some(Self::Interim),
            _ => None,
        }
    }

    /// EDGAR form name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "10-K",
            Self::Interim => "10-Q",
        }
    }

    /// Returns true for interim (quarterly) filings.
    pub const fn is_interim(&self) -> bool {
        matches!(self, Self::Interim)
    }
}

/// One observation of a tag as reported in one filing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Reported value; `None` when the filing carried the tag without a value
    pub value: Option<f64>,

    /// End date of the reporting period (instant date for balance sheet items)
    pub end: NaiveDate,

    /// Start date of the reporting period (`None` for instant facts)
    pub start: Option<NaiveDate>,

    /// Date the filing carrying this observation was filed
    pub filed: NaiveDate,

    /// Period-defining form type, `None` for amendments and other forms
    pub form: Option<Form>,

    /// Fiscal year of the filing
    pub fiscal_year: Option<i32>,

    /// Fiscal period of the filing (e.g., "FY", "Q1")
    pub fiscal_period: Option<String>,

    /// Accession number of the filing
    pub accession: Option<String>,

    /// Calendar frame assigned by the SEC (e.g., "CY2023Q3I")
    pub frame: Option<String>,
}

impl Observation {
    /// Create an observation with the attributes the core relies on.
    pub const fn new(value: Option<f64>, end: NaiveDate, filed: NaiveDate, form: Option<Form>) -> Self {
        Self {
            value,
            end,
            start: None,
            filed,
            form,
            fiscal_year: None,
            fiscal_period: None,
            accession: None,
            frame: None,
        }
    }

    /// Returns true if this is an instant fact (point-in-time, like balance sheet items)
    pub const fn is_instant(&self) -> bool {
        self.start.is_none()
    }

    /// Returns the duration in days if this is a duration fact
    pub fn duration_days(&self) -> Option<i64> {
        self.start
            .map(|start| self.end.signed_duration_since(start).num_days())
    }
}

/// All observations of one tag, keyed by unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    /// Human-readable label
    pub label: Option<String>,

    /// Taxonomy description
    pub description: Option<String>,

    /// Observations per unit of measure (e.g., "USD", "shares")
    pub units: BTreeMap<String, Vec<Observation>>,
}

impl Concept {
    /// Observations reported in `unit`, empty if the unit is absent.
    pub fn observations(&self, unit: &str) -> &[Observation] {
        self.units.get(unit).map(Vec::as_slice).unwrap_or_default()
    }
}

/// The facts of one taxonomy: tag name to concept.
///
/// Both the full company history and a single aligned fiscal period are
/// represented as a `FactSet`; every calculator takes one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactSet {
    concepts: BTreeMap<String, Concept>,
}

impl FactSet {
    /// Creates an empty fact set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a concept.
    pub fn insert(&mut self, tag: impl Into<String>, concept: Concept) {
        self.concepts.insert(tag.into(), concept);
    }

    /// Append one observation of `tag` in `unit`.
    pub fn push(&mut self, tag: impl Into<String>, unit: impl Into<String>, observation: Observation) {
        self.concepts
            .entry(tag.into())
            .or_default()
            .units
            .entry(unit.into())
            .or_default()
            .push(observation);
    }

    /// Look up a concept by tag name.
    pub fn get(&self, tag: &str) -> Option<&Concept> {
        self.concepts.get(tag)
    }

    /// Returns true if the tag is present at all.
    pub fn contains(&self, tag: &str) -> bool {
        self.concepts.contains_key(tag)
    }

    /// Tag names in lexical order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.concepts.keys().map(String::as_str)
    }

    /// Iterate over `(tag, concept)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Concept)> {
        self.concepts.iter().map(|(tag, concept)| (tag.as_str(), concept))
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Returns true if no tags are present.
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Observations of `tag` in `unit`, empty if either is absent.
    pub fn observations(&self, tag: &str, unit: &str) -> &[Observation] {
        self.get(tag)
            .map(|concept| concept.observations(unit))
            .unwrap_or_default()
    }

    /// USD observations of `tag` filed on `form`.
    pub fn observations_for<'a>(
        &'a self,
        tag: &str,
        form: Form,
    ) -> impl Iterator<Item = &'a Observation> + use<'a> {
        self.observations(tag, USD)
            .iter()
            .filter(move |obs| obs.form == Some(form))
    }
}

/// Every fact a company has filed, grouped by taxonomy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyFacts {
    /// CIK (Central Index Key), zero-padded to 10 digits
    pub cik: String,

    /// Company name
    pub entity_name: String,

    /// Facts per taxonomy (e.g., "us-gaap", "dei")
    pub taxonomies: BTreeMap<String, FactSet>,
}

impl CompanyFacts {
    /// Parses the SEC company-facts JSON format.
    ///
    /// The document must carry a top-level `facts` map; `cik` and `entityName`
    /// default to `"Unknown"` when absent. Observations with a missing or
    /// malformed `end`/`filed` date are skipped.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawCompanyFacts = serde_json::from_str(json)?;
        Ok(raw.into())
    }

    /// Parses an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let raw: RawCompanyFacts = serde_json::from_value(value)?;
        Ok(raw.into())
    }

    /// Parses a document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: RawCompanyFacts = serde_json::from_reader(reader)?;
        Ok(raw.into())
    }

    /// The US-GAAP fact set, if the company reports one.
    pub fn us_gaap(&self) -> Option<&FactSet> {
        self.taxonomy(US_GAAP)
    }

    /// A fact set by taxonomy name.
    pub fn taxonomy(&self, name: &str) -> Option<&FactSet> {
        self.taxonomies.get(name)
    }
}

/// Parse a `YYYY-MM-DD` date attribute.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| FactsError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

// SEC API JSON structure
// Based on: https://www.sec.gov/edgar/sec-api-documentation

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompanyFacts {
    #[serde(default)]
    cik: Option<RawCik>,
    #[serde(default)]
    entity_name: Option<String>,
    facts: BTreeMap<String, BTreeMap<String, RawConcept>>,
}

/// The API serves the CIK as a number; stored copies often carry a padded string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCik {
    Number(u64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawConcept {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    units: BTreeMap<String, Vec<RawObservation>>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    val: Option<f64>,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    filed: Option<String>,
    #[serde(default)]
    form: Option<String>,
    #[serde(default)]
    fy: Option<i32>,
    #[serde(default)]
    fp: Option<String>,
    #[serde(default)]
    accn: Option<String>,
    #[serde(default)]
    frame: Option<String>,
}

impl RawObservation {
    fn into_observation(self, tag: &str) -> Option<Observation> {
        let dates = self
            .end
            .as_deref()
            .ok_or(FactsError::InvalidDate {
                field: "end",
                value: String::new(),
            })
            .and_then(|end| parse_date("end", end))
            .and_then(|end| {
                let filed = self.filed.as_deref().unwrap_or_default();
                parse_date("filed", filed).map(|filed| (end, filed))
            });

        let (end, filed) = match dates {
            Ok(dates) => dates,
            Err(err) => {
                debug!(tag, %err, "skipping observation");
                return None;
            }
        };

        Some(Observation {
            value: self.val,
            end,
            start: self
                .start
                .as_deref()
                .and_then(|start| parse_date("start", start).ok()),
            filed,
            form: self.form.as_deref().and_then(Form::from_form),
            fiscal_year: self.fy,
            fiscal_period: self.fp,
            accession: self.accn,
            frame: self.frame,
        })
    }
}

impl From<RawCompanyFacts> for CompanyFacts {
    fn from(raw: RawCompanyFacts) -> Self {
        let cik = match raw.cik {
            Some(RawCik::Number(n)) => format!("{:0>10}", n),
            Some(RawCik::Text(s)) => format!("{:0>10}", s.trim()),
            None => "Unknown".to_string(),
        };

        let taxonomies = raw
            .facts
            .into_iter()
            .map(|(taxonomy, raw_concepts)| {
                let mut facts = FactSet::new();
                for (tag, raw_concept) in raw_concepts {
                    let units = raw_concept
                        .units
                        .into_iter()
                        .map(|(unit, raw_obs)| {
                            let observations = raw_obs
                                .into_iter()
                                .filter_map(|obs| obs.into_observation(&tag))
                                .collect();
                            (unit, observations)
                        })
                        .collect();
                    let concept = Concept {
                        label: raw_concept.label,
                        description: raw_concept.description,
                        units,
                    };
                    facts.insert(tag, concept);
                }
                (taxonomy, facts)
            })
            .collect();

        Self {
            cik,
            entity_name: raw.entity_name.unwrap_or_else(|| "Unknown".to_string()),
            taxonomies,
        }
    }
}
