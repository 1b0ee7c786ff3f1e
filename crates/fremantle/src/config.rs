//! Parser configuration.

use fremantle_metrics::ebit::{DEFAULT_VALIDATION_TOLERANCE, EbitConfig};
use fremantle_metrics::RatioConfig;
use serde::{Deserialize, Serialize};

/// How interim periods are grouped into fiscal years for de-cumulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiscalYearGrouping {
    /// Group by the fiscal year end the company reports in its annual filings,
    /// falling back to calendar years when it has none
    #[default]
    ReportedYearEnd,
    /// Group by the calendar year of the period end
    CalendarYear,
}

/// Configuration for [`FilingParser`](crate::FilingParser)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Extract interim (10-Q) periods as well as annual ones (default: true)
    pub include_quarterly: bool,

    /// Fiscal year grouping for quarterly de-cumulation
    pub fiscal_year_grouping: FiscalYearGrouping,

    /// Withhold ratios built on an EBIT below net income (default: true)
    pub enforce_ebit_sanity: bool,

    /// Tolerance of the tier 1 pre-tax income cross-check, in USD (default: 1,000,000)
    pub ebit_validation_tolerance: f64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            include_quarterly: true,
            fiscal_year_grouping: FiscalYearGrouping::default(),
            enforce_ebit_sanity: true,
            ebit_validation_tolerance: DEFAULT_VALIDATION_TOLERANCE,
        }
    }
}

impl ParserConfig {
    /// Annual periods only.
    pub fn annual_only() -> Self {
        Self {
            include_quarterly: false,
            ..Self::default()
        }
    }

    /// EBIT calculator settings.
    pub const fn ebit_config(&self) -> EbitConfig {
        EbitConfig {
            validation_tolerance: self.ebit_validation_tolerance,
        }
    }

    /// Ratio engine settings.
    pub const fn ratio_config(&self) -> RatioConfig {
        RatioConfig {
            enforce_ebit_sanity: self.enforce_ebit_sanity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::default();
        assert!(config.include_quarterly);
        assert!(config.enforce_ebit_sanity);
        assert_eq!(config.fiscal_year_grouping, FiscalYearGrouping::ReportedYearEnd);
        assert_eq!(config.ebit_config().validation_tolerance, 1_000_000.0);
        assert!(!ParserConfig::annual_only().include_quarterly);
    }

    #[test]
    fn test_partial_config_deserializes() {
        let config: ParserConfig =
            serde_json::from_str(r#"{"fiscal_year_grouping": "calendar_year"}"#).unwrap();
        assert_eq!(config.fiscal_year_grouping, FiscalYearGrouping::CalendarYear);
        assert!(config.include_quarterly);
        assert!(config.ratio_config().enforce_ebit_sanity);
    }
}
