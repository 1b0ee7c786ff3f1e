//! Balance sheet calculator: total assets, current liabilities, capital employed.

use fremantle_facts::tags::balance_sheet as tags;
use fremantle_facts::{FactSet, Form, SourceFact};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A balance sheet line and how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetItem {
    /// Amount
    pub value: f64,
    /// Method used
    pub method: String,
    /// Facts combined
    pub sources: Vec<SourceFact>,
}

impl BalanceSheetItem {
    fn direct(fact: SourceFact) -> Self {
        Self {
            value: fact.value,
            method: format!("Direct {} tag", fact.tag),
            sources: vec![fact],
        }
    }
}

/// Capital employed with its components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalEmployed {
    /// Total assets - current liabilities
    pub value: f64,
    /// Formula used
    pub formula: String,
    /// Total assets
    pub assets: BalanceSheetItem,
    /// Current liabilities
    pub current_liabilities: BalanceSheetItem,
}

impl CapitalEmployed {
    /// Build from already resolved components.
    pub fn from_components(assets: BalanceSheetItem, current_liabilities: BalanceSheetItem) -> Self {
        let value = assets.value - current_liabilities.value;
        if value <= 0.0 {
            warn!(capital_employed = value, "capital employed is non-positive");
        }
        Self {
            value,
            formula: "Total Assets - Current Liabilities".to_string(),
            assets,
            current_liabilities,
        }
    }

    /// Returns true if ROCE can be interpreted.
    pub fn is_positive(&self) -> bool {
        self.value > 0.0
    }
}

/// Resolves balance sheet totals.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceSheetCalculator;

impl BalanceSheetCalculator {
    /// Create a new calculator
    pub const fn new() -> Self {
        Self
    }

    /// Total assets: `Assets`, else `AssetsCurrent + AssetsNoncurrent`.
    pub fn assets(&self, facts: &FactSet, form: Form) -> Option<BalanceSheetItem> {
        if let Some(assets) = facts.resolve_tag(tags::ASSETS, form) {
            return Some(BalanceSheetItem::direct(assets));
        }

        let current = facts.resolve_tag(tags::ASSETS_CURRENT, form);
        let noncurrent = facts.resolve_tag(tags::ASSETS_NONCURRENT, form);
        match (current, noncurrent) {
            (Some(current), Some(noncurrent)) => Some(BalanceSheetItem {
                value: current.value + noncurrent.value,
                method: "Sum of AssetsCurrent + AssetsNoncurrent".to_string(),
                sources: vec![current, noncurrent],
            }),
            _ => {
                warn!(%form, "could not calculate total assets - missing tags");
                None
            }
        }
    }

    /// Current liabilities: `LiabilitiesCurrent`, else `Liabilities - LiabilitiesNoncurrent`.
    pub fn current_liabilities(&self, facts: &FactSet, form: Form) -> Option<BalanceSheetItem> {
        if let Some(current) = facts.resolve_tag(tags::LIABILITIES_CURRENT, form) {
            return Some(BalanceSheetItem::direct(current));
        }

        let total = facts.resolve_tag(tags::LIABILITIES, form);
        let noncurrent = facts.resolve_tag(tags::LIABILITIES_NONCURRENT, form);
        match (total, noncurrent) {
            (Some(total), Some(noncurrent)) => Some(BalanceSheetItem {
                value: total.value - noncurrent.value,
                method: "Calculated: Liabilities - LiabilitiesNoncurrent".to_string(),
                sources: vec![total, noncurrent],
            }),
            _ => {
                warn!(%form, "could not calculate current liabilities - missing tags");
                None
            }
        }
    }

    /// Capital employed, or `None` if either component is missing.
    ///
    /// A non-positive value is returned as is and logged.
    pub fn capital_employed(&self, facts: &FactSet, form: Form) -> Option<CapitalEmployed> {
        let assets = self.assets(facts, form)?;
        let current_liabilities = self.current_liabilities(facts, form)?;
        Some(CapitalEmployed::from_components(assets, current_liabilities))
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

    #[test]
    fn test_direct_tags() {
        let facts = facts(&[
            (tags::ASSETS, 352_755_000_000.0),
            (tags::LIABILITIES_CURRENT, 145_308_000_000.0),
            (tags::ASSETS_CURRENT, 1.0),
        ]);
        let calculator = BalanceSheetCalculator::new();

        let assets = calculator.assets(&facts, Form::Annual).unwrap();
        assert_eq!(assets.method, "Direct Assets tag");
        assert_eq!(assets.sources.len(), 1);

        let capital = calculator.capital_employed(&facts, Form::Annual).unwrap();
        assert_eq!(capital.value, 207_447_000_000.0);
        assert_eq!(capital.formula, "Total Assets - Current Liabilities");
        assert!(capital.is_positive());
        assert_eq!(capital.current_liabilities.method, "Direct LiabilitiesCurrent tag");
    }

    #[test]
    fn test_component_fallbacks() {
        let facts = facts(&[
            (tags::ASSETS_CURRENT, 400.0),
            (tags::ASSETS_NONCURRENT, 600.0),
            (tags::LIABILITIES, 700.0),
            (tags::LIABILITIES_NONCURRENT, 450.0),
        ]);
        let calculator = BalanceSheetCalculator::new();

        let assets = calculator.assets(&facts, Form::Annual).unwrap();
        assert_eq!(assets.value, 1_000.0);
        assert_eq!(assets.method, "Sum of AssetsCurrent + AssetsNoncurrent");

        let liabilities = calculator.current_liabilities(&facts, Form::Annual).unwrap();
        assert_eq!(liabilities.value, 250.0);
        assert_eq!(liabilities.method, "Calculated: Liabilities - LiabilitiesNoncurrent");
    }

    #[test]
    fn test_partial_components_are_absent() {
        let facts = facts(&[(tags::ASSETS_CURRENT, 400.0), (tags::LIABILITIES, 700.0)]);
        let calculator = BalanceSheetCalculator::new();
        assert!(calculator.assets(&facts, Form::Annual).is_none());
        assert!(calculator.current_liabilities(&facts, Form::Annual).is_none());
        assert!(calculator.capital_employed(&facts, Form::Annual).is_none());
    }

    #[test]
    fn test_non_positive_capital_employed_is_flagged() {
        let facts = facts(&[(tags::ASSETS, 100.0), (tags::LIABILITIES_CURRENT, 150.0)]);
        let capital = BalanceSheetCalculator::new()
            .capital_employed(&facts, Form::Annual)
            .unwrap();
        assert_eq!(capital.value, -50.0);
        assert!(!capital.is_positive());
    }
}
