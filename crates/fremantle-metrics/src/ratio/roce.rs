//! Return on Capital Employed
//!
//! ROCE = EBIT / (Total Assets - Current Liabilities) x 100

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Qualitative ROCE band.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoceBand {
    /// Above 25%
    Excellent,
    /// Above 15%
    Good,
    /// Above 10%
    Average,
    /// 10% or less
    #[display("Below Average")]
    BelowAverage,
}

impl RoceBand {
    /// Band for a ROCE percentage.
    pub fn from_value(roce: f64) -> Self {
        if roce > 25.0 {
            Self::Excellent
        } else if roce > 15.0 {
            Self::Good
        } else if roce > 10.0 {
            Self::Average
        } else {
            Self::BelowAverage
        }
    }

    /// Interpretation of the band.
    pub const fn interpretation(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent - High quality business with strong capital efficiency",
            Self::Good => "Good - Above average capital efficiency",
            Self::Average => "Average - Acceptable returns on capital",
            Self::BelowAverage => {
                "Below Average - May indicate capital inefficiency or competitive pressures"
            }
        }
    }
}

/// Inputs of a successful ROCE calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoceComponents {
    /// EBIT
    pub ebit: f64,
    /// Total assets
    pub total_assets: f64,
    /// Current liabilities
    pub current_liabilities: f64,
    /// Total assets - current liabilities
    pub capital_employed: f64,
}

/// ROCE for one period, or the reason it is withheld.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoceResult {
    /// ROCE computed
    Success {
        /// ROCE in percent
        value: f64,
        /// Formula used
        formula: String,
        /// Inputs
        components: RoceComponents,
        /// Qualitative band
        band: RoceBand,
        /// Band interpretation
        interpretation: String,
    },
    /// One or more inputs did not resolve
    MissingComponents {
        /// Names of the missing inputs
        missing: Vec<String>,
    },
    /// Capital employed is zero or negative
    InvalidCapitalEmployed {
        /// Offending capital employed
        capital_employed: f64,
        /// Explanation
        note: String,
    },
    /// EBIT failed its sanity checks
    InvalidEbit {
        /// Offending EBIT
        ebit: f64,
        /// Validation message
        note: String,
    },
}

impl RoceResult {
    /// ROCE in percent, if computed.
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Success { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Band, if computed.
    pub const fn band(&self) -> Option<RoceBand> {
        match self {
            Self::Success { band, .. } => Some(*band),
            _ => None,
        }
    }

    /// Status discriminator as serialized.
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::MissingComponents { .. } => "missing_components",
            Self::InvalidCapitalEmployed { .. } => "invalid_capital_employed",
            Self::InvalidEbit { .. } => "invalid_ebit",
        }
    }

    /// Returns true if ROCE was computed.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Calculate ROCE from resolved values.
///
/// ```
/// use fremantle_metrics::ratio::{RoceBand, calculate_roce};
///
/// let roce = calculate_roce(Some(30.0), Some(150.0), Some(50.0));
/// assert_eq!(roce.value(), Some(30.0));
/// assert_eq!(roce.band(), Some(RoceBand::Excellent));
/// ```
pub fn calculate_roce(
    ebit: Option<f64>,
    assets: Option<f64>,
    current_liabilities: Option<f64>,
) -> RoceResult {
    let (Some(ebit), Some(total_assets), Some(current_liabilities)) =
        (ebit, assets, current_liabilities)
    else {
        let missing = [
            ("ebit", ebit.is_none()),
            ("assets", assets.is_none()),
            ("current_liabilities", current_liabilities.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then(|| name.to_string()))
        .collect();
        return RoceResult::MissingComponents { missing };
    };

    let capital_employed = total_assets - current_liabilities;
    if capital_employed <= 0.0 {
        return RoceResult::InvalidCapitalEmployed {
            capital_employed,
            note: "Capital employed is non-positive".to_string(),
        };
    }

    let value = ebit / capital_employed * 100.0;
    let band = RoceBand::from_value(value);

    RoceResult::Success {
        value,
        formula: "ROCE = (EBIT / Capital Employed) x 100".to_string(),
        components: RoceComponents {
            ebit,
            total_assets,
            current_liabilities,
            capital_employed,
        },
        band,
        interpretation: band.interpretation().to_string(),
    }
}
