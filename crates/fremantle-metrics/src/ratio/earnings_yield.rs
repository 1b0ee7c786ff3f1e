//! Earnings yield
//!
//! Earnings Yield = EBIT / Enterprise Value, where
//! EV = Market Cap + Total Debt - Unrestricted Cash.
//!
//! Market capitalization is not part of a filing, so a period only carries the
//! [`EarningsYieldComponents`]. The final ratio is produced by
//! [`EarningsYieldComponents::with_market_cap`] once a caller supplies it.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Qualitative earnings yield band.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YieldBand {
    /// Above 10%
    High,
    /// Above 8%
    Good,
    /// Above 6%
    Fair,
    /// 6% or less
    Low,
}

impl YieldBand {
    /// Band for an earnings yield percentage.
    pub fn from_value(earnings_yield: f64) -> Self {
        if earnings_yield > 10.0 {
            Self::High
        } else if earnings_yield > 8.0 {
            Self::Good
        } else if earnings_yield > 6.0 {
            Self::Fair
        } else {
            Self::Low
        }
    }

    /// Interpretation of the band.
    pub const fn interpretation(self) -> &'static str {
        match self {
            Self::High => "High earnings yield - potential bargain (compare to 10Y Treasury)",
            Self::Good => "Good earnings yield - attractive valuation",
            Self::Fair => "Fair earnings yield - reasonable valuation",
            Self::Low => "Low earnings yield - potentially expensive (compare to Treasury rates)",
        }
    }
}

/// Enterprise value components available from a filing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EarningsYieldComponents {
    /// All filing-side components resolved
    Success {
        /// EBIT
        ebit: f64,
        /// Total debt
        total_debt: f64,
        /// Unrestricted cash
        unrestricted_cash: f64,
        /// Total debt - unrestricted cash
        net_debt: f64,
        /// Formula shape
        formula: String,
    },
    /// One or more inputs did not resolve
    MissingComponents {
        /// Names of the missing inputs
        missing: Vec<String>,
    },
    /// EBIT failed its sanity checks
    InvalidEbit {
        /// Offending EBIT
        ebit: f64,
        /// Validation message
        note: String,
    },
}

/// Enterprise value breakdown of a computed earnings yield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnterpriseValue {
    /// EBIT
    pub ebit: f64,
    /// Market capitalization supplied by the caller
    pub market_cap: f64,
    /// Total debt - unrestricted cash
    pub net_debt: f64,
    /// Market cap + net debt
    pub enterprise_value: f64,
}

/// Earnings yield once market capitalization is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EarningsYield {
    /// Earnings yield computed
    Success {
        /// Earnings yield in percent
        value: f64,
        /// Formula used
        formula: String,
        /// Inputs
        components: EnterpriseValue,
        /// Qualitative band
        band: YieldBand,
        /// Band interpretation
        interpretation: String,
    },
    /// One or more inputs did not resolve
    MissingComponents {
        /// Names of the missing inputs
        missing: Vec<String>,
    },
    /// EBIT failed its sanity checks
    InvalidEbit {
        /// Offending EBIT
        ebit: f64,
        /// Validation message
        note: String,
    },
    /// Enterprise value is zero or negative
    InvalidEnterpriseValue {
        /// Offending enterprise value
        enterprise_value: f64,
        /// Explanation
        note: String,
    },
}

impl EarningsYieldComponents {
    /// Net debt, if all components resolved.
    pub const fn net_debt(&self) -> Option<f64> {
        match self {
            Self::Success { net_debt, .. } => Some(*net_debt),
            _ => None,
        }
    }

    /// Status discriminator as serialized.
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::MissingComponents { .. } => "missing_components",
            Self::InvalidEbit { .. } => "invalid_ebit",
        }
    }

    /// Returns true if the components are ready for a market cap.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Combine with an externally supplied market capitalization.
    ///
    /// Failed components pass their status through unchanged.
    ///
    /// ```
    /// use fremantle_metrics::ratio::{YieldBand, earnings_yield_components};
    ///
    /// let components = earnings_yield_components(Some(12.0), Some(30.0), Some(10.0));
    /// let ey = components.with_market_cap(80.0);
    /// assert_eq!(ey.value(), Some(12.0));
    /// assert_eq!(ey.band(), Some(YieldBand::High));
    /// ```
    pub fn with_market_cap(&self, market_cap: f64) -> EarningsYield {
        let (ebit, net_debt) = match self {
            Self::Success { ebit, net_debt, .. } => (*ebit, *net_debt),
            Self::MissingComponents { missing } => {
                return EarningsYield::MissingComponents {
                    missing: missing.clone(),
                };
            }
            Self::InvalidEbit { ebit, note } => {
                return EarningsYield::InvalidEbit {
                    ebit: *ebit,
                    note: note.clone(),
                };
            }
        };

        let enterprise_value = market_cap + net_debt;
        if enterprise_value <= 0.0 {
            return EarningsYield::InvalidEnterpriseValue {
                enterprise_value,
                note: "Enterprise value is non-positive".to_string(),
            };
        }

        let value = ebit / enterprise_value * 100.0;
        let band = YieldBand::from_value(value);

        EarningsYield::Success {
            value,
            formula: "Earnings Yield = (EBIT / Enterprise Value) x 100".to_string(),
            components: EnterpriseValue {
                ebit,
                market_cap,
                net_debt,
                enterprise_value,
            },
            band,
            interpretation: band.interpretation().to_string(),
        }
    }
}

impl EarningsYield {
    /// Earnings yield in percent, if computed.
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Success { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Band, if computed.
    pub const fn band(&self) -> Option<YieldBand> {
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
            Self::InvalidEbit { .. } => "invalid_ebit",
            Self::InvalidEnterpriseValue { .. } => "invalid_enterprise_value",
        }
    }
}

/// Gather the filing-side components of earnings yield.
pub fn earnings_yield_components(
    ebit: Option<f64>,
    total_debt: Option<f64>,
    unrestricted_cash: Option<f64>,
) -> EarningsYieldComponents {
    let (Some(ebit), Some(total_debt), Some(unrestricted_cash)) =
        (ebit, total_debt, unrestricted_cash)
    else {
        let missing = [
            ("ebit", ebit.is_none()),
            ("total_debt", total_debt.is_none()),
            ("cash", unrestricted_cash.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then(|| name.to_string()))
        .collect();
        return EarningsYieldComponents::MissingComponents { missing };
    };

    EarningsYieldComponents::Success {
        ebit,
        total_debt,
        unrestricted_cash,
        net_debt: total_debt - unrestricted_cash,
        formula: "Earnings Yield = EBIT / (Market Cap + Total Debt - Unrestricted Cash)".to_string(),
    }
}
