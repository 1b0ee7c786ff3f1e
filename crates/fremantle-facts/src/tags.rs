//! US-GAAP tag names used by the metric calculators.
//!
//! Names are the keys of the `us-gaap` taxonomy in the company-facts document,
//! without the `us-gaap:` prefix.

/// Balance sheet tags
pub mod balance_sheet {
    /// Total Assets
    pub const ASSETS: &str = "Assets";

    /// Current Assets
    pub const ASSETS_CURRENT: &str = "AssetsCurrent";

    /// Non-current Assets
    pub const ASSETS_NONCURRENT: &str = "AssetsNoncurrent";

    /// Total Liabilities
    pub const LIABILITIES: &str = "Liabilities";

    /// Current Liabilities
    pub const LIABILITIES_CURRENT: &str = "LiabilitiesCurrent";

    /// Non-current Liabilities
    pub const LIABILITIES_NONCURRENT: &str = "LiabilitiesNoncurrent";
}

/// Income statement tags
pub mod income_statement {
    /// Operating Income (Loss)
    pub const OPERATING_INCOME: &str = "OperatingIncomeLoss";

    /// Total Revenue
    pub const REVENUES: &str = "Revenues";

    /// Revenue from Contract with Customer, excluding assessed tax
    pub const REVENUE_FROM_CONTRACT: &str = "RevenueFromContractWithCustomerExcludingAssessedTax";

    /// Revenue from Contract with Customer, including assessed tax
    pub const REVENUE_FROM_CONTRACT_INCL_TAX: &str =
        "RevenueFromContractWithCustomerIncludingAssessedTax";

    /// Total Costs and Expenses
    pub const COSTS_AND_EXPENSES: &str = "CostsAndExpenses";

    /// Cost of Goods and Services Sold
    pub const COST_OF_GOODS_SOLD: &str = "CostOfGoodsAndServicesSold";

    /// Operating Costs and Expenses
    pub const OPERATING_EXPENSES: &str = "OperatingCostsAndExpenses";

    /// Net Income (Loss)
    pub const NET_INCOME: &str = "NetIncomeLoss";

    /// Profit (Loss), including noncontrolling interest
    pub const PROFIT_LOSS: &str = "ProfitLoss";

    /// Net Income available to common stockholders
    pub const NET_INCOME_TO_COMMON: &str = "NetIncomeLossAvailableToCommonStockholdersBasic";

    /// Income Tax Expense (Benefit)
    pub const INCOME_TAX: &str = "IncomeTaxExpenseBenefit";

    /// Interest Expense on debt
    pub const INTEREST_EXPENSE_DEBT: &str = "InterestExpenseDebt";

    /// Interest Expense
    pub const INTEREST_EXPENSE: &str = "InterestExpense";

    /// Pre-tax income from continuing operations
    pub const PRETAX_INCOME: &str =
        "IncomeLossFromContinuingOperationsBeforeIncomeTaxesExtraordinaryItemsNoncontrollingInterest";

    /// Pre-tax income from continuing operations, before equity method income
    pub const PRETAX_INCOME_ALT: &str = "IncomeLossFromContinuingOperationsBeforeIncomeTaxesMinorityInterestAndIncomeLossFromEquityMethodInvestments";
}

/// Debt tags
pub mod debt {
    /// Long-term Debt (non-current)
    pub const LONG_TERM_DEBT_NONCURRENT: &str = "LongTermDebtNoncurrent";

    /// Long-term Debt and capital leases (non-current)
    pub const LONG_TERM_DEBT_AND_LEASES: &str = "LongTermDebtAndCapitalLeaseObligations";

    /// Long-term Debt
    pub const LONG_TERM_DEBT: &str = "LongTermDebt";

    /// Long-term Debt and capital leases including current maturities
    pub const LONG_TERM_DEBT_AND_LEASES_INCL_CURRENT: &str =
        "LongTermDebtAndCapitalLeaseObligationsIncludingCurrentMaturities";

    /// Long-term Debt including current maturities
    pub const LONG_TERM_DEBT_INCL_CURRENT: &str = "LongTermDebtIncludingCurrentMaturities";

    /// Current portion of Long-term Debt
    pub const LONG_TERM_DEBT_CURRENT: &str = "LongTermDebtCurrent";

    /// Current portion of Long-term Debt and capital leases
    pub const LONG_TERM_DEBT_AND_LEASES_CURRENT: &str = "LongTermDebtAndCapitalLeaseObligationsCurrent";

    /// Principal repayments due in the next twelve months
    pub const MATURITIES_NEXT_TWELVE_MONTHS: &str =
        "LongTermDebtMaturitiesRepaymentsOfPrincipalInNextTwelveMonths";

    /// Short-term Borrowings
    pub const SHORT_TERM_BORROWINGS: &str = "ShortTermBorrowings";

    /// Short-term bank loans and notes payable
    pub const SHORT_TERM_BANK_LOANS: &str = "ShortTermBankLoansAndNotesPayable";

    /// Commercial Paper
    pub const COMMERCIAL_PAPER: &str = "CommercialPaper";
}

/// Cash tags
pub mod cash {
    /// Cash and Cash Equivalents (unrestricted)
    pub const CASH: &str = "CashAndCashEquivalentsAtCarryingValue";

    /// Cash, cash equivalents and restricted cash
    pub const CASH_INCL_RESTRICTED: &str =
        "CashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents";

    /// Restricted cash and cash equivalents
    pub const RESTRICTED_CASH: &str = "RestrictedCashAndCashEquivalentsAtCarryingValue";

    /// Restricted cash (current)
    pub const RESTRICTED_CASH_CURRENT: &str = "RestrictedCashCurrent";

    /// Restricted cash (non-current)
    pub const RESTRICTED_CASH_NONCURRENT: &str = "RestrictedCashNoncurrent";
}
