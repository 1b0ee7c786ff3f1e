//! EBIT (operating income) calculator
//!
//! Operating income is tagged inconsistently across filers: some report it
//! directly, some only report its building blocks, some report neither. The
//! calculator runs a fixed waterfall of strategies, most trustworthy first, and
//! keeps the first that resolves all of its inputs:
//!
//! 1. `OperatingIncomeLoss`, else revenues minus costs and expenses (validated
//!    against pre-tax income)
//! 2. revenues minus cost of goods sold minus operating expenses
//! 3. net income plus income tax plus interest expense
//! 4. pre-tax income plus interest expense
//!
//! A strategy either resolves every input it needs or yields nothing; there is
//! no partial credit.

mod tiers;
mod validation;

pub use tiers::{
    ComponentBuildUp, DirectOperatingIncome, FromNetIncome, FromPretaxIncome, NET_INCOME_TAGS,
    REVENUE_TAGS,
};
pub use validation::{CheckLevel, EbitCheck, EbitValidation, validate_ebit};

use derive_more::Display;
use fremantle_facts::{FactSet, Form, SourceFact};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Maximum gap between revenues - costs and pre-tax income before tier 1 warns.
pub const DEFAULT_VALIDATION_TOLERANCE: f64 = 1_000_000.0;

/// Configuration for the EBIT calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EbitConfig {
    /// Tolerance for the pre-tax cross-check of tier 1 (default: 1,000,000)
    pub validation_tolerance: f64,
}

impl Default for EbitConfig {
    fn default() -> Self {
        Self {
            validation_tolerance: DEFAULT_VALIDATION_TOLERANCE,
        }
    }
}

/// Waterfall tier that produced an EBIT value.
///
/// Lower tiers are more trustworthy. Serialized as its number.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum EbitTier {
    /// Direct operating income, or revenues - costs and expenses
    #[display("1")]
    Direct = 1,
    /// Revenues - cost of goods sold - operating expenses
    #[display("2")]
    Components = 2,
    /// Net income + income tax + interest expense
    #[display("3")]
    FromNetIncome = 3,
    /// Pre-tax income + interest expense
    #[display("4")]
    FromPretaxIncome = 4,
}

impl EbitTier {
    /// Tier number, 1 through 4.
    pub const fn number(self) -> u8 {
        self as u8
    }
}

impl From<EbitTier> for u8 {
    fn from(tier: EbitTier) -> Self {
        tier.number()
    }
}

/// A tier number outside 1-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("EBIT tier must be between 1 and 4, got {0}")]
pub struct InvalidTier(pub u8);

impl TryFrom<u8> for EbitTier {
    type Error = InvalidTier;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Direct),
            2 => Ok(Self::Components),
            3 => Ok(Self::FromNetIncome),
            4 => Ok(Self::FromPretaxIncome),
            other => Err(InvalidTier(other)),
        }
    }
}

/// Successful output of one waterfall strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct EbitAttempt {
    /// Computed EBIT
    pub value: f64,
    /// Human-readable method (e.g., "Revenues - CostsAndExpenses")
    pub method: &'static str,
    /// Facts the value was built from, keyed by role
    pub sources: BTreeMap<String, SourceFact>,
    /// Cross-check note, if the strategy performs one
    pub validation: Option<String>,
}

/// One step of the EBIT waterfall.
pub trait EbitStrategy: fmt::Debug + Send + Sync {
    /// Tier this strategy reports.
    fn tier(&self) -> EbitTier;

    /// Short identifier for logging.
    fn name(&self) -> &'static str;

    /// Try to compute EBIT from an aligned fact set.
    ///
    /// Returns `None` unless every required input resolves.
    fn attempt(&self, facts: &FactSet, form: Form) -> Option<EbitAttempt>;
}

/// Year-to-date de-cumulation attached to interim EBIT results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyDelta {
    /// Cumulative value as reported in the filing
    pub ytd_value: f64,
    /// Isolated value for this quarter; `None` when it cannot be derived
    pub quarterly_value: Option<f64>,
    /// YTD value of the previous quarter used for the subtraction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_quarter_ytd: Option<f64>,
    /// Fiscal year the quarter was grouped into
    pub fiscal_year: i32,
    /// How the quarterly value was obtained
    pub note: String,
}

/// EBIT for one period with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EbitResult {
    /// EBIT value (year-to-date for interim periods)
    pub value: f64,
    /// Method used
    pub method: String,
    /// Waterfall tier used
    pub tier: EbitTier,
    /// Facts the value was built from, keyed by role
    pub sources: BTreeMap<String, SourceFact>,
    /// Cross-check note from tier 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<String>,
    /// Sanity checks against net income and revenues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanity: Option<EbitValidation>,
    /// Quarterly de-cumulation (interim periods only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarterly: Option<QuarterlyDelta>,
}

impl EbitResult {
    /// Returns true if sanity checks ran and failed hard.
    pub fn failed_sanity(&self) -> bool {
        self.sanity.as_ref().is_some_and(|s| !s.passed)
    }
}

/// Runs the EBIT waterfall.
#[derive(Debug)]
pub struct EbitCalculator {
    strategies: Vec<Box<dyn EbitStrategy>>,
}

impl EbitCalculator {
    /// Create a calculator with the default configuration
    pub fn new() -> Self {
        Self::with_config(EbitConfig::default())
    }

    /// Create a calculator with the standard four tiers
    pub fn with_config(config: EbitConfig) -> Self {
        Self::from_strategies(vec![
            Box::new(DirectOperatingIncome::new(config.validation_tolerance)),
            Box::new(ComponentBuildUp),
            Box::new(FromNetIncome),
            Box::new(FromPretaxIncome),
        ])
    }

    /// Create a calculator from an explicit strategy sequence, tried in order
    pub fn from_strategies(strategies: Vec<Box<dyn EbitStrategy>>) -> Self {
        Self { strategies }
    }

    /// Strategies in evaluation order
    pub fn strategies(&self) -> &[Box<dyn EbitStrategy>] {
        &self.strategies
    }

    /// Compute EBIT from the first strategy that succeeds.
    pub fn calculate(&self, facts: &FactSet, form: Form) -> Option<EbitResult> {
        let result = self.strategies.iter().find_map(|strategy| {
            strategy.attempt(facts, form).map(|attempt| {
                debug!(
                    tier = strategy.tier().number(),
                    strategy = strategy.name(),
                    method = attempt.method,
                    "EBIT resolved"
                );
                EbitResult {
                    value: attempt.value,
                    method: attempt.method.to_string(),
                    tier: strategy.tier(),
                    sources: attempt.sources,
                    validation: attempt.validation,
                    sanity: None,
                    quarterly: None,
                }
            })
        });

        if result.is_none() {
            warn!(%form, "could not calculate EBIT using any available method");
        }
        result
    }
}

impl Default for EbitCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fremantle_facts::{Observation, USD};

    fn facts(values: &[(&str, f64)]) -> FactSet {
        let end = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let filed = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let mut facts = FactSet::new();
        for (tag, value) in values {
            facts.push(*tag, USD, Observation::new(Some(*value), end, filed, Some(Form::Annual)));
        }
        facts
    }

    #[derive(Debug)]
    struct Fixed(EbitTier, Option<f64>);

    impl EbitStrategy for Fixed {
        fn tier(&self) -> EbitTier {
            self.0
        }

        fn name(&self) -> &'static str {
            "fixed"
        }

        fn attempt(&self, _facts: &FactSet, _form: Form) -> Option<EbitAttempt> {
            self.1.map(|value| EbitAttempt {
                value,
                method: "Fixed",
                sources: BTreeMap::new(),
                validation: None,
            })
        }
    }

    #[test]
    fn test_tier_round_trips_as_number() {
        assert_eq!(serde_json::to_string(&EbitTier::FromNetIncome).unwrap(), "3");
        assert_eq!(serde_json::from_str::<EbitTier>("2").unwrap(), EbitTier::Components);
        assert!(serde_json::from_str::<EbitTier>("5").is_err());
        assert_eq!(EbitTier::try_from(0u8), Err(InvalidTier(0)));
        assert_eq!(EbitTier::Direct.to_string(), "1");
    }

    #[test]
    fn test_first_successful_strategy_wins() {
        let calculator = EbitCalculator::from_strategies(vec![
            Box::new(Fixed(EbitTier::Direct, None)),
            Box::new(Fixed(EbitTier::Components, Some(5.0))),
            Box::new(Fixed(EbitTier::FromNetIncome, Some(7.0))),
        ]);

        let result = calculator.calculate(&FactSet::new(), Form::Annual).unwrap();
        assert_eq!(result.tier, EbitTier::Components);
        assert_eq!(result.value, 5.0);
        assert_eq!(result.method, "Fixed");
    }

    #[test]
    fn test_default_waterfall_order() {
        let calculator = EbitCalculator::default();
        let tiers: Vec<_> = calculator.strategies().iter().map(|s| s.tier()).collect();
        assert_eq!(
            tiers,
            vec![
                EbitTier::Direct,
                EbitTier::Components,
                EbitTier::FromNetIncome,
                EbitTier::FromPretaxIncome
            ]
        );
    }

    #[test]
    fn test_nothing_resolves() {
        let calculator = EbitCalculator::new();
        assert!(calculator.calculate(&facts(&[("Assets", 1.0)]), Form::Annual).is_none());
    }

    #[test]
    fn test_failed_sanity() {
        let mut result = EbitCalculator::new()
            .calculate(&facts(&[("OperatingIncomeLoss", 10.0)]), Form::Annual)
            .unwrap();
        assert!(!result.failed_sanity());

        result.sanity = Some(validate_ebit(10.0, Some(20.0), None));
        assert!(result.failed_sanity());
    }
}
