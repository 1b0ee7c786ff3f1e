//! EBIT sanity checks.

use crate::money::format_usd;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Typical EBIT margin band, in percent.
const TYPICAL_MARGIN: (f64, f64) = (5.0, 30.0);

/// Severity of a single check.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckLevel {
    /// Check passed
    #[display("ok")]
    Ok,
    /// Implausible but possible; does not fail validation
    #[display("warn")]
    Warning,
    /// Structurally impossible; fails validation
    #[display("fail")]
    Failure,
}

/// Outcome of one sanity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EbitCheck {
    /// Severity
    pub level: CheckLevel,
    /// Explanation
    pub message: String,
}

impl EbitCheck {
    fn new(level: CheckLevel, message: String) -> Self {
        Self { level, message }
    }
}

impl fmt::Display for EbitCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Result of [`validate_ebit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EbitValidation {
    /// False only when a check failed hard
    pub passed: bool,
    /// Individual checks in evaluation order
    pub checks: Vec<EbitCheck>,
    /// Checks joined with `" | "`
    pub message: String,
}

impl EbitValidation {
    fn from_checks(checks: Vec<EbitCheck>) -> Self {
        let passed = checks.iter().all(|c| c.level != CheckLevel::Failure);
        let message = checks
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | ");
        Self {
            passed,
            checks,
            message,
        }
    }

    /// Returns true if any check raised a soft warning.
    pub fn has_warnings(&self) -> bool {
        self.checks.iter().any(|c| c.level == CheckLevel::Warning)
    }
}

/// Sanity-check an EBIT value.
///
/// - EBIT should be positive (soft).
/// - EBIT can never be below net income, since it adds interest and taxes back
///   (hard; stops further checks).
/// - EBIT margin usually sits between 5% and 30% of revenues (soft).
///
/// ```
/// use fremantle_metrics::ebit::validate_ebit;
///
/// assert!(validate_ebit(120.0, Some(90.0), Some(1_000.0)).passed);
/// assert!(!validate_ebit(80.0, Some(90.0), Some(1_000.0)).passed);
/// ```
pub fn validate_ebit(ebit: f64, net_income: Option<f64>, revenues: Option<f64>) -> EbitValidation {
    let mut checks = Vec::new();

    if ebit <= 0.0 {
        checks.push(EbitCheck::new(
            CheckLevel::Warning,
            format!("EBIT is non-positive: {}", format_usd(ebit)),
        ));
    } else {
        checks.push(EbitCheck::new(
            CheckLevel::Ok,
            format!("EBIT is positive: {}", format_usd(ebit)),
        ));
    }

    if let Some(net_income) = net_income {
        if ebit < net_income {
            checks.push(EbitCheck::new(
                CheckLevel::Failure,
                format!(
                    "EBIT ({}) < Net Income ({}) - impossible",
                    format_usd(ebit),
                    format_usd(net_income)
                ),
            ));
            return EbitValidation::from_checks(checks);
        }
        checks.push(EbitCheck::new(CheckLevel::Ok, "EBIT >= Net Income".to_string()));
    }

    if let Some(revenues) = revenues.filter(|r| *r > 0.0) {
        let margin = ebit / revenues * 100.0;
        let (low, high) = TYPICAL_MARGIN;
        if (low..=high).contains(&margin) {
            checks.push(EbitCheck::new(
                CheckLevel::Ok,
                format!("EBIT margin {margin:.1}% within typical range ({low}-{high}%)"),
            ));
        } else {
            checks.push(EbitCheck::new(
                CheckLevel::Warning,
                format!("EBIT margin {margin:.1}% outside typical range ({low}-{high}%)"),
            ));
        }
    }

    EbitValidation::from_checks(checks)
}
