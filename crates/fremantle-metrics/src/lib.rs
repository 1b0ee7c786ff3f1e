#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fremantle/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod balance_sheet;
pub mod cash;
pub mod debt;
pub mod ebit;
pub mod money;
pub mod ratio;
pub mod registry;

pub use balance_sheet::{BalanceSheetCalculator, BalanceSheetItem, CapitalEmployed};
pub use cash::{CashCalculator, CashResult, CashScenario, RestrictedCash};
pub use debt::{DebtCalculator, DebtComponents, DebtResult, ShortTermBorrowings};
pub use ebit::{
    EbitCalculator, EbitConfig, EbitResult, EbitStrategy, EbitTier, EbitValidation,
    QuarterlyDelta, validate_ebit,
};
pub use money::format_usd;
pub use ratio::{
    EarningsYield, EarningsYieldComponents, RatioConfig, RatioEngine, RoceBand, RoceResult,
    YieldBand,
};
pub use registry::{
    MetricInfo, Statement, available_metrics, get_metric_info, list_metric_names,
    metrics_by_statement,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
