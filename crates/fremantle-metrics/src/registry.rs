//! Metric Registry
//!
//! Catalogue of the metrics extracted for every period, with the tags each one
//! is resolved from.

use crate::cash::{RESTRICTED_CASH_TAGS, TOTAL_CASH_TAGS, UNRESTRICTED_CASH_TAGS};
use crate::debt::{
    LT_DEBT_CURRENT_TAGS, LT_DEBT_INCLUDING_CURRENT_TAGS, LT_DEBT_NONCURRENT_TAGS,
    ST_BORROWINGS_TAGS,
};
use crate::ebit::REVENUE_TAGS;
use derive_more::Display;
use fremantle_facts::tags::{balance_sheet, debt, income_statement};
use std::collections::HashMap;

/// Financial statement a metric comes from
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statement {
    /// Income statement (duration facts)
    #[display("Income Statement")]
    IncomeStatement,
    /// Balance sheet (instant facts)
    #[display("Balance Sheet")]
    BalanceSheet,
}

/// Metric metadata
#[derive(Debug, Clone)]
pub struct MetricInfo {
    /// Metric name (unique identifier, key in period records)
    pub name: &'static str,
    /// Statement the metric comes from
    pub statement: Statement,
    /// Brief description of what the metric measures
    pub description: &'static str,
    /// Candidate tags the metric may be resolved from
    pub candidate_tags: Vec<&'static str>,
    /// Whether interim filings report the metric year-to-date
    pub cumulative: bool,
}

/// Get all available metric info
pub fn available_metrics() -> Vec<MetricInfo> {
    vec![
        MetricInfo {
            name: "ebit",
            statement: Statement::IncomeStatement,
            description: "Earnings before interest and taxes via a 4-tier waterfall",
            candidate_tags: [
                &[income_statement::OPERATING_INCOME][..],
                REVENUE_TAGS,
                &[
                    income_statement::COSTS_AND_EXPENSES,
                    income_statement::COST_OF_GOODS_SOLD,
                    income_statement::OPERATING_EXPENSES,
                    income_statement::NET_INCOME,
                    income_statement::PROFIT_LOSS,
                    income_statement::NET_INCOME_TO_COMMON,
                    income_statement::INCOME_TAX,
                    income_statement::INTEREST_EXPENSE_DEBT,
                    income_statement::INTEREST_EXPENSE,
                    income_statement::PRETAX_INCOME,
                    income_statement::PRETAX_INCOME_ALT,
                ],
            ]
            .concat(),
            cumulative: true,
        },
        MetricInfo {
            name: "total_debt",
            statement: Statement::BalanceSheet,
            description: "Long-term debt plus current portion plus short-term borrowings",
            candidate_tags: [
                LT_DEBT_INCLUDING_CURRENT_TAGS,
                LT_DEBT_NONCURRENT_TAGS,
                LT_DEBT_CURRENT_TAGS,
                ST_BORROWINGS_TAGS,
                &[debt::SHORT_TERM_BANK_LOANS, debt::COMMERCIAL_PAPER],
            ]
            .concat(),
            cumulative: false,
        },
        MetricInfo {
            name: "cash",
            statement: Statement::BalanceSheet,
            description: "Unrestricted and total cash, split on restricted balances",
            candidate_tags: [
                UNRESTRICTED_CASH_TAGS,
                &TOTAL_CASH_TAGS[..1],
                RESTRICTED_CASH_TAGS,
                &[
                    fremantle_facts::tags::cash::RESTRICTED_CASH_CURRENT,
                    fremantle_facts::tags::cash::RESTRICTED_CASH_NONCURRENT,
                ],
            ]
            .concat(),
            cumulative: false,
        },
        MetricInfo {
            name: "assets",
            statement: Statement::BalanceSheet,
            description: "Total assets",
            candidate_tags: vec![
                balance_sheet::ASSETS,
                balance_sheet::ASSETS_CURRENT,
                balance_sheet::ASSETS_NONCURRENT,
            ],
            cumulative: false,
        },
        MetricInfo {
            name: "current_liabilities",
            statement: Statement::BalanceSheet,
            description: "Current liabilities",
            candidate_tags: vec![
                balance_sheet::LIABILITIES_CURRENT,
                balance_sheet::LIABILITIES,
                balance_sheet::LIABILITIES_NONCURRENT,
            ],
            cumulative: false,
        },
    ]
}

/// Get metrics by statement
pub fn metrics_by_statement(statement: Statement) -> Vec<MetricInfo> {
    available_metrics()
        .into_iter()
        .filter(|m| m.statement == statement)
        .collect()
}

/// Get metric info by name
pub fn get_metric_info(name: &str) -> Option<MetricInfo> {
    available_metrics().into_iter().find(|m| m.name == name)
}

/// Get a map of all metrics indexed by name
pub fn metric_map() -> HashMap<&'static str, MetricInfo> {
    available_metrics()
        .into_iter()
        .map(|m| (m.name, m))
        .collect()
}

/// List all metric names
pub fn list_metric_names() -> Vec<&'static str> {
    available_metrics().into_iter().map(|m| m.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_metrics_count() {
        assert_eq!(available_metrics().len(), 5);
    }

    #[test]
    fn test_metrics_by_statement() {
        assert_eq!(metrics_by_statement(Statement::IncomeStatement).len(), 1);
        assert_eq!(metrics_by_statement(Statement::BalanceSheet).len(), 4);
    }

    #[test]
    fn test_only_ebit_is_cumulative() {
        let cumulative: Vec<_> = available_metrics()
            .into_iter()
            .filter(|m| m.cumulative)
            .map(|m| m.name)
            .collect();
        assert_eq!(cumulative, vec!["ebit"]);
    }

    #[test]
    fn test_get_metric_info() {
        let debt = get_metric_info("total_debt").unwrap();
        assert_eq!(debt.statement, Statement::BalanceSheet);
        assert!(debt.candidate_tags.contains(&"LongTermDebtCurrent"));
        assert!(get_metric_info("nonexistent").is_none());
    }

    #[test]
    fn test_candidate_tags_unique() {
        for metric in available_metrics() {
            let mut tags = metric.candidate_tags.clone();
            tags.sort_unstable();
            tags.dedup();
            assert_eq!(tags.len(), metric.candidate_tags.len(), "{}", metric.name);
        }
    }

    #[test]
    fn test_metric_map_and_names() {
        let map = metric_map();
        assert_eq!(map.len(), 5);
        assert!(map.contains_key("cash"));
        assert_eq!(
            list_metric_names(),
            vec!["ebit", "total_debt", "cash", "assets", "current_liabilities"]
        );
    }
}
