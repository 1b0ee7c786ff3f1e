//! The four EBIT waterfall strategies.

use super::{EbitAttempt, EbitStrategy, EbitTier};
use crate::money::format_usd;
use fremantle_facts::tags::income_statement as is;
use fremantle_facts::{FactSet, Form, SourceFact};
use std::collections::BTreeMap;

/// Revenue tags in priority order.
pub const REVENUE_TAGS: &[&str] = &[
    is::REVENUES,
    is::REVENUE_FROM_CONTRACT,
    is::REVENUE_FROM_CONTRACT_INCL_TAX,
];

/// Net income tags in priority order.
pub const NET_INCOME_TAGS: &[&str] =
    &[is::NET_INCOME, is::PROFIT_LOSS, is::NET_INCOME_TO_COMMON];

const OPERATING_INCOME_TAGS: &[&str] = &[is::OPERATING_INCOME];
const COSTS_AND_EXPENSES_TAGS: &[&str] = &[is::COSTS_AND_EXPENSES];
const COGS_TAGS: &[&str] = &[is::COST_OF_GOODS_SOLD];
const OPERATING_EXPENSE_TAGS: &[&str] = &[is::OPERATING_EXPENSES];
const INCOME_TAX_TAGS: &[&str] = &[is::INCOME_TAX];
const INTEREST_EXPENSE_TAGS: &[&str] = &[is::INTEREST_EXPENSE_DEBT, is::INTEREST_EXPENSE];
const PRETAX_INCOME_TAGS: &[&str] = &[is::PRETAX_INCOME, is::PRETAX_INCOME_ALT];

fn sources<const N: usize>(entries: [(&str, SourceFact); N]) -> BTreeMap<String, SourceFact> {
    entries
        .into_iter()
        .map(|(role, fact)| (role.to_string(), fact))
        .collect()
}

/// Tier 1: `OperatingIncomeLoss`, else revenues - costs and expenses.
///
/// The subtractive form is cross-checked against pre-tax income. A gap above
/// the tolerance attaches a warning note; the value is still accepted.
#[derive(Debug, Clone, Copy)]
pub struct DirectOperatingIncome {
    tolerance: f64,
}

impl DirectOperatingIncome {
    /// Create the strategy with a pre-tax cross-check tolerance
    pub const fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    fn pretax_note(&self, ebit: f64, pretax: f64) -> String {
        let difference = (ebit - pretax).abs();
        if difference <= self.tolerance {
            format!(
                "Validation passed: matches pre-tax income (diff: {})",
                format_usd(difference)
            )
        } else {
            format!(
                "Validation warning: differs from pre-tax income by {} (>{})",
                format_usd(difference),
                format_usd(self.tolerance)
            )
        }
    }
}

impl EbitStrategy for DirectOperatingIncome {
    fn tier(&self) -> EbitTier {
        EbitTier::Direct
    }

    fn name(&self) -> &'static str {
        "direct_operating_income"
    }

    fn attempt(&self, facts: &FactSet, form: Form) -> Option<EbitAttempt> {
        if let Some(operating_income) = facts.resolve(OPERATING_INCOME_TAGS, form) {
            return Some(EbitAttempt {
                value: operating_income.value,
                method: "Direct OperatingIncomeLoss",
                sources: sources([("operating_income", operating_income)]),
                validation: None,
            });
        }

        let revenues = facts.resolve(REVENUE_TAGS, form)?;
        let costs = facts.resolve(COSTS_AND_EXPENSES_TAGS, form)?;
        let ebit = revenues.value - costs.value;

        let pretax = facts.resolve(PRETAX_INCOME_TAGS, form);
        let validation = pretax.as_ref().map(|p| self.pretax_note(ebit, p.value));

        let mut used = sources([("revenues", revenues), ("costs_and_expenses", costs)]);
        if let Some(pretax) = pretax {
            used.insert("pretax_income_validation".to_string(), pretax);
        }

        Some(EbitAttempt {
            value: ebit,
            method: "Revenues - CostsAndExpenses",
            sources: used,
            validation,
        })
    }
}

impl Default for DirectOperatingIncome {
    fn default() -> Self {
        Self::new(super::DEFAULT_VALIDATION_TOLERANCE)
    }
}

/// Tier 2: revenues - cost of goods sold - operating expenses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentBuildUp;

impl EbitStrategy for ComponentBuildUp {
    fn tier(&self) -> EbitTier {
        EbitTier::Components
    }

    fn name(&self) -> &'static str {
        "component_build_up"
    }

    fn attempt(&self, facts: &FactSet, form: Form) -> Option<EbitAttempt> {
        let revenues = facts.resolve(REVENUE_TAGS, form)?;
        let cogs = facts.resolve(COGS_TAGS, form)?;
        let opex = facts.resolve(OPERATING_EXPENSE_TAGS, form)?;

        Some(EbitAttempt {
            value: revenues.value - cogs.value - opex.value,
            method: "Revenues - COGS - OpEx",
            sources: sources([
                ("revenues", revenues),
                ("cogs", cogs),
                ("operating_expenses", opex),
            ]),
            validation: None,
        })
    }
}

/// Tier 3: net income + income tax + interest expense.
#[derive(Debug, Clone, Copy, Default)]
pub struct FromNetIncome;

impl EbitStrategy for FromNetIncome {
    fn tier(&self) -> EbitTier {
        EbitTier::FromNetIncome
    }

    fn name(&self) -> &'static str {
        "from_net_income"
    }

    fn attempt(&self, facts: &FactSet, form: Form) -> Option<EbitAttempt> {
        let net_income = facts.resolve(NET_INCOME_TAGS, form)?;
        let tax = facts.resolve(INCOME_TAX_TAGS, form)?;
        let interest = facts.resolve(INTEREST_EXPENSE_TAGS, form)?;

        Some(EbitAttempt {
            value: net_income.value + tax.value + interest.value,
            method: "NetIncome + Tax + Interest",
            sources: sources([
                ("net_income", net_income),
                ("income_tax", tax),
                ("interest_expense", interest),
            ]),
            validation: None,
        })
    }
}

/// Tier 4: pre-tax income + interest expense.
#[derive(Debug, Clone, Copy, Default)]
pub struct FromPretaxIncome;

impl EbitStrategy for FromPretaxIncome {
    fn tier(&self) -> EbitTier {
        EbitTier::FromPretaxIncome
    }

    fn name(&self) -> &'static str {
        "from_pretax_income"
    }

    fn attempt(&self, facts: &FactSet, form: Form) -> Option<EbitAttempt> {
        let pretax = facts.resolve(PRETAX_INCOME_TAGS, form)?;
        let interest = facts.resolve(INTEREST_EXPENSE_TAGS, form)?;

        Some(EbitAttempt {
            value: pretax.value + interest.value,
            method: "PreTaxIncome + Interest",
            sources: sources([("pretax_income", pretax), ("interest_expense", interest)]),
            validation: None,
        })
    }
}
