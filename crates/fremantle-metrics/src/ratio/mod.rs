//! Ratio engine
//!
//! Combines the metric results of one period into ROCE and earnings yield
//! records. A ratio never fails the period: missing or invalid inputs surface as
//! a status on the ratio itself.

pub mod earnings_yield;
pub mod roce;

pub use earnings_yield::{
    EarningsYield, EarningsYieldComponents, EnterpriseValue, YieldBand, earnings_yield_components,
};
pub use roce::{RoceBand, RoceComponents, RoceResult, calculate_roce};

use crate::balance_sheet::BalanceSheetItem;
use crate::cash::CashResult;
use crate::debt::DebtResult;
use crate::ebit::EbitResult;
use serde::{Deserialize, Serialize};

/// Configuration for the ratio engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioConfig {
    /// Withhold ratios built on an EBIT that failed its sanity checks (default: true)
    pub enforce_ebit_sanity: bool,
}

impl Default for RatioConfig {
    fn default() -> Self {
        Self {
            enforce_ebit_sanity: true,
        }
    }
}

/// Computes the ratios of one period from its metric results.
#[derive(Debug, Clone, Default)]
pub struct RatioEngine {
    config: RatioConfig,
}

impl RatioEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given configuration
    pub const fn with_config(config: RatioConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    pub const fn config(&self) -> &RatioConfig {
        &self.config
    }

    /// EBIT that failed sanity checks, when enforcement is on.
    fn rejected_ebit<'a>(&self, ebit: Option<&'a EbitResult>) -> Option<(f64, &'a str)> {
        if !self.config.enforce_ebit_sanity {
            return None;
        }
        ebit.filter(|e| e.failed_sanity()).map(|e| {
            let note = e.sanity.as_ref().map_or("", |s| s.message.as_str());
            (e.value, note)
        })
    }

    /// ROCE for the period.
    pub fn roce(
        &self,
        ebit: Option<&EbitResult>,
        assets: Option<&BalanceSheetItem>,
        current_liabilities: Option<&BalanceSheetItem>,
    ) -> RoceResult {
        if let Some((ebit, note)) = self.rejected_ebit(ebit) {
            return RoceResult::InvalidEbit {
                ebit,
                note: note.to_string(),
            };
        }
        calculate_roce(
            ebit.map(|e| e.value),
            assets.map(|a| a.value),
            current_liabilities.map(|l| l.value),
        )
    }

    /// Earnings yield components for the period.
    pub fn earnings_yield_components(
        &self,
        ebit: Option<&EbitResult>,
        debt: Option<&DebtResult>,
        cash: Option<&CashResult>,
    ) -> EarningsYieldComponents {
        if let Some((ebit, note)) = self.rejected_ebit(ebit) {
            return EarningsYieldComponents::InvalidEbit {
                ebit,
                note: note.to_string(),
            };
        }
        earnings_yield_components(
            ebit.map(|e| e.value),
            debt.map(|d| d.value),
            cash.map(CashResult::for_enterprise_value),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ebit::{EbitTier, validate_ebit};
    use std::collections::BTreeMap;

    fn ebit(value: f64, net_income: f64) -> EbitResult {
        EbitResult {
            value,
            method: "Direct OperatingIncomeLoss".to_string(),
            tier: EbitTier::Direct,
            sources: BTreeMap::new(),
            validation: None,
            sanity: Some(validate_ebit(value, Some(net_income), None)),
            quarterly: None,
        }
    }

    fn item(value: f64) -> BalanceSheetItem {
        BalanceSheetItem {
            value,
            method: "Direct".to_string(),
            sources: Vec::new(),
        }
    }

    #[test]
    fn test_insane_ebit_withheld_when_enforced() {
        let engine = RatioEngine::new();
        let bad = ebit(50.0, 80.0);

        let roce = engine.roce(Some(&bad), Some(&item(300.0)), Some(&item(100.0)));
        assert_eq!(roce.status(), "invalid_ebit");
        assert!(roce.value().is_none());

        let ey = engine.earnings_yield_components(Some(&bad), None, None);
        assert_eq!(ey.status(), "invalid_ebit");
    }

    #[test]
    fn test_insane_ebit_used_when_not_enforced() {
        let engine = RatioEngine::with_config(RatioConfig {
            enforce_ebit_sanity: false,
        });
        let bad = ebit(50.0, 80.0);

        let roce = engine.roce(Some(&bad), Some(&item(300.0)), Some(&item(100.0)));
        assert_eq!(roce.value(), Some(25.0));
        assert_eq!(roce.band(), Some(RoceBand::Good));
    }

    #[test]
    fn test_sane_ebit() {
        let engine = RatioEngine::new();
        let good = ebit(50.0, 30.0);
        let roce = engine.roce(Some(&good), Some(&item(300.0)), Some(&item(100.0)));
        assert_eq!(roce.value(), Some(25.0));

        let missing = engine.roce(Some(&good), None, Some(&item(100.0)));
        assert_eq!(missing.status(), "missing_components");
    }
}
