//! Cash calculator
//!
//! Enterprise value needs unrestricted cash, since restricted cash cannot
//! service debt; the balance sheet needs total cash. Three data situations are
//! distinguished in the method string:
//!
//! 1. a direct unrestricted tag exists; total = unrestricted + restricted
//! 2. only a total (including restricted) tag exists and restricted cash
//!    resolves; unrestricted = total - restricted
//! 3. only a total tag exists; restricted is assumed zero

use fremantle_facts::tags::cash as tags;
use fremantle_facts::{FactSet, Form, SourceFact};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Unrestricted cash tags.
pub const UNRESTRICTED_CASH_TAGS: &[&str] = &[tags::CASH];

/// Total cash tags, restricted-inclusive first.
pub const TOTAL_CASH_TAGS: &[&str] = &[tags::CASH_INCL_RESTRICTED, tags::CASH];

/// Direct restricted cash tags.
pub const RESTRICTED_CASH_TAGS: &[&str] = &[tags::RESTRICTED_CASH];

/// Restricted cash and how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictedCash {
    /// Amount
    pub value: f64,
    /// Method used
    pub method: String,
    /// Facts summed
    pub sources: Vec<SourceFact>,
}

/// How the cash figures were derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashScenario {
    /// Direct unrestricted tag, restricted cash added for the total
    DirectWithRestricted,
    /// Direct unrestricted tag, no restricted cash reported
    DirectOnly,
    /// Total minus restricted
    TotalLessRestricted,
    /// Total only, restricted assumed zero
    TotalOnly,
}

impl CashScenario {
    /// Method description.
    pub const fn method(self) -> &'static str {
        match self {
            Self::DirectWithRestricted => "Direct unrestricted + calculated total",
            Self::DirectOnly => "Direct unrestricted (no restricted cash)",
            Self::TotalLessRestricted => "Calculated: Total cash - Restricted cash",
            Self::TotalOnly => "Total cash (assuming no restricted cash)",
        }
    }
}

/// Cash figures for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashResult {
    /// Cash available to service debt
    pub unrestricted_cash: f64,
    /// Cash including restricted balances
    pub total_cash: f64,
    /// Restricted cash (zero when none reported)
    pub restricted_cash: f64,
    /// Which scenario applied
    pub scenario: CashScenario,
    /// Method description
    pub method: String,
    /// Unrestricted cash fact, when reported directly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unrestricted_source: Option<SourceFact>,
    /// Total cash fact, when used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_source: Option<SourceFact>,
    /// Restricted cash breakdown, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted: Option<RestrictedCash>,
}

impl CashResult {
    /// Cash to subtract in an enterprise value calculation.
    pub const fn for_enterprise_value(&self) -> f64 {
        self.unrestricted_cash
    }

    /// Cash for balance sheet completeness.
    pub const fn for_balance_sheet(&self) -> f64 {
        self.total_cash
    }
}

/// Splits cash into restricted and unrestricted balances.
#[derive(Debug, Clone, Copy, Default)]
pub struct CashCalculator;

impl CashCalculator {
    /// Create a new calculator
    pub const fn new() -> Self {
        Self
    }

    /// Calculate cash, or `None` when neither an unrestricted nor a total tag resolves.
    pub fn calculate(&self, facts: &FactSet, form: Form) -> Option<CashResult> {
        let restricted = Self::restricted_cash(facts, form);
        let restricted_value = restricted.as_ref().map_or(0.0, |r| r.value);

        let result = if let Some(unrestricted) = facts.resolve(UNRESTRICTED_CASH_TAGS, form) {
            let scenario = if restricted.is_some() {
                CashScenario::DirectWithRestricted
            } else {
                CashScenario::DirectOnly
            };
            CashResult {
                unrestricted_cash: unrestricted.value,
                total_cash: unrestricted.value + restricted_value,
                restricted_cash: restricted_value,
                scenario,
                method: scenario.method().to_string(),
                unrestricted_source: Some(unrestricted),
                total_source: None,
                restricted,
            }
        } else if let Some(total) = facts.resolve(TOTAL_CASH_TAGS, form) {
            let scenario = if restricted.is_some() {
                CashScenario::TotalLessRestricted
            } else {
                CashScenario::TotalOnly
            };
            CashResult {
                unrestricted_cash: total.value - restricted_value,
                total_cash: total.value,
                restricted_cash: restricted_value,
                scenario,
                method: scenario.method().to_string(),
                unrestricted_source: None,
                total_source: Some(total),
                restricted,
            }
        } else {
            warn!(%form, "could not calculate cash - no cash tags found");
            return None;
        };

        debug!(method = %result.method, "cash resolved");
        Some(result)
    }

    /// Unrestricted cash only.
    pub fn unrestricted_cash(&self, facts: &FactSet, form: Form) -> Option<f64> {
        self.calculate(facts, form).map(|c| c.for_enterprise_value())
    }

    /// Total cash only.
    pub fn total_cash(&self, facts: &FactSet, form: Form) -> Option<f64> {
        self.calculate(facts, form).map(|c| c.for_balance_sheet())
    }

    /// Direct restricted cash, else the sum of its current and non-current parts.
    fn restricted_cash(facts: &FactSet, form: Form) -> Option<RestrictedCash> {
        if let Some(direct) = facts.resolve(RESTRICTED_CASH_TAGS, form) {
            return Some(RestrictedCash {
                value: direct.value,
                method: format!("Direct {}", tags::RESTRICTED_CASH),
                sources: vec![direct],
            });
        }

        let parts: Vec<SourceFact> = [tags::RESTRICTED_CASH_CURRENT, tags::RESTRICTED_CASH_NONCURRENT]
            .into_iter()
            .filter_map(|tag| facts.resolve_tag(tag, form))
            .collect();

        if parts.is_empty() {
            return None;
        }

        Some(RestrictedCash {
            value: parts.iter().map(|p| p.value).sum(),
            method: format!(
                "Sum of {} + {}",
                tags::RESTRICTED_CASH_CURRENT,
                tags::RESTRICTED_CASH_NONCURRENT
            ),
            sources: parts,
        })
    }
}
