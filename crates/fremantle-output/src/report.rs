//! Company report: period records, calculation logs and metadata.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use fremantle_facts::Form;
use fremantle_metrics::{
    BalanceSheetItem, CashResult, DebtResult, EarningsYieldComponents, EbitResult, EbitTier,
    RoceResult,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Version stamped into report metadata.
pub const PARSER_VERSION: &str = "2.0";

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Metric results of one period. Unresolved metrics are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    /// EBIT
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ebit: Option<EbitResult>,
    /// Total debt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_debt: Option<DebtResult>,
    /// Cash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash: Option<CashResult>,
    /// Total assets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<BalanceSheetItem>,
    /// Current liabilities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_liabilities: Option<BalanceSheetItem>,
}

impl PeriodMetrics {
    /// Number of metrics that resolved.
    pub fn resolved_count(&self) -> usize {
        [
            self.ebit.is_some(),
            self.total_debt.is_some(),
            self.cash.is_some(),
            self.assets.is_some(),
            self.current_liabilities.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    /// Per-metric extraction summary for the calculation log.
    pub fn log_entries(&self) -> BTreeMap<String, MetricLogEntry> {
        let mut entries = BTreeMap::new();
        if let Some(ebit) = &self.ebit {
            entries.insert(
                "ebit".to_string(),
                MetricLogEntry {
                    value: ebit.value,
                    method: ebit.method.clone(),
                    tier: Some(ebit.tier),
                    validation: ebit.validation.clone(),
                    warnings: None,
                },
            );
        }
        if let Some(debt) = &self.total_debt {
            entries.insert(
                "total_debt".to_string(),
                MetricLogEntry {
                    value: debt.value,
                    method: debt.method.clone(),
                    tier: None,
                    validation: None,
                    warnings: Some(debt.warnings.clone()),
                },
            );
        }
        if let Some(cash) = &self.cash {
            entries.insert(
                "cash".to_string(),
                MetricLogEntry::plain(cash.unrestricted_cash, &cash.method),
            );
        }
        if let Some(assets) = &self.assets {
            entries.insert(
                "assets".to_string(),
                MetricLogEntry::plain(assets.value, &assets.method),
            );
        }
        if let Some(liabilities) = &self.current_liabilities {
            entries.insert(
                "current_liabilities".to_string(),
                MetricLogEntry::plain(liabilities.value, &liabilities.method),
            );
        }
        entries
    }
}

/// Ratios of one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRatios {
    /// Return on capital employed
    pub roce: RoceResult,
    /// Enterprise value components pending a market cap
    pub earnings_yield_components: EarningsYieldComponents,
}

/// One metric as summarised in a calculation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricLogEntry {
    /// Value
    pub value: f64,
    /// Method used
    pub method: String,
    /// Waterfall tier (EBIT only)
    pub tier: Option<EbitTier>,
    /// Cross-check note (EBIT only)
    pub validation: Option<String>,
    /// Warnings (total debt only)
    pub warnings: Option<Vec<String>>,
}

impl MetricLogEntry {
    fn plain(value: f64, method: &str) -> Self {
        Self {
            value,
            method: method.to_string(),
            tier: None,
            validation: None,
            warnings: None,
        }
    }
}

/// Audit trail of how one period was computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationLog {
    /// When the log was written
    pub timestamp: DateTime<Utc>,
    /// Company name
    pub company: String,
    /// Zero-padded CIK
    pub cik: String,
    /// Period end
    pub period_end: NaiveDate,
    /// Effective filing date
    pub filing_date: NaiveDate,
    /// Per-metric extraction summary
    pub metrics_extracted: BTreeMap<String, MetricLogEntry>,
    /// Ratio formulas and components
    pub calculations: PeriodRatios,
}

/// Everything extracted for one fiscal period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// Calendar year of the period end
    pub fiscal_year: i32,
    /// Period end
    pub period_end: NaiveDate,
    /// Effective (latest) filing date
    pub filing_date: NaiveDate,
    /// Form type
    pub form: Form,
    /// Fiscal quarter (interim periods only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_quarter: Option<u8>,
    /// Set on the first record of each period list
    #[serde(default)]
    pub is_most_recent: bool,
    /// Metric results
    pub metrics: PeriodMetrics,
    /// Ratio results
    pub ratios: PeriodRatios,
    /// Audit trail, attached when the report is built
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_log: Option<CalculationLog>,
}

impl PeriodRecord {
    /// Create a record without a calculation log.
    pub fn new(
        period_end: NaiveDate,
        filing_date: NaiveDate,
        form: Form,
        metrics: PeriodMetrics,
        ratios: PeriodRatios,
    ) -> Self {
        Self {
            fiscal_year: period_end.year(),
            period_end,
            filing_date,
            form,
            fiscal_quarter: None,
            is_most_recent: false,
            metrics,
            ratios,
            calculation_log: None,
        }
    }

    /// Build the calculation log for this record.
    pub fn build_calculation_log(
        &self,
        company: &str,
        cik: &str,
        timestamp: DateTime<Utc>,
    ) -> CalculationLog {
        CalculationLog {
            timestamp,
            company: company.to_string(),
            cik: cik.to_string(),
            period_end: self.period_end,
            filing_date: self.filing_date,
            metrics_extracted: self.metrics.log_entries(),
            calculations: self.ratios.clone(),
        }
    }

    /// ROCE in percent, if computed.
    pub const fn roce(&self) -> Option<f64> {
        self.ratios.roce.value()
    }
}

/// Report metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Company name
    pub company_name: String,
    /// Zero-padded CIK
    pub cik: String,
    /// Parse timestamp
    pub parsed_at: DateTime<Utc>,
    /// Parser version
    pub parser_version: String,
    /// Number of annual periods
    pub total_annual_periods: usize,
    /// Number of quarterly periods
    pub total_quarterly_periods: usize,
}

/// Parsed output for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyReport {
    /// Metadata
    pub metadata: ReportMetadata,
    /// Annual periods, most recent first
    pub annual_periods: Vec<PeriodRecord>,
    /// Quarterly periods, most recent first
    pub quarterly_periods: Vec<PeriodRecord>,
}

impl CompanyReport {
    /// Most recent annual period.
    pub fn most_recent_annual(&self) -> Option<&PeriodRecord> {
        self.annual_periods.first()
    }

    /// Most recent quarterly period.
    pub fn most_recent_quarterly(&self) -> Option<&PeriodRecord> {
        self.quarterly_periods.first()
    }

    /// Returns true if no period was found.
    pub fn is_empty(&self) -> bool {
        self.annual_periods.is_empty() && self.quarterly_periods.is_empty()
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a report previously written with [`CompanyReport::to_json`].
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builder for creating reports.
///
/// Sorts each period list most recent first, marks the first record and
/// attaches a calculation log to every record.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    company_name: Option<String>,
    cik: Option<String>,
    parsed_at: Option<DateTime<Utc>>,
    annual: Vec<PeriodRecord>,
    quarterly: Vec<PeriodRecord>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the company name.
    pub fn company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }

    /// Set the CIK.
    pub fn cik(mut self, cik: impl Into<String>) -> Self {
        self.cik = Some(cik.into());
        self
    }

    /// Set the parse timestamp (defaults to now).
    pub const fn parsed_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.parsed_at = Some(timestamp);
        self
    }

    /// Set the annual periods.
    pub fn annual_periods(mut self, periods: Vec<PeriodRecord>) -> Self {
        self.annual = periods;
        self
    }

    /// Set the quarterly periods.
    pub fn quarterly_periods(mut self, periods: Vec<PeriodRecord>) -> Self {
        self.quarterly = periods;
        self
    }

    /// Build the report.
    pub fn build(self) -> CompanyReport {
        let company_name = self.company_name.unwrap_or_else(|| "Unknown".to_string());
        let cik = self.cik.unwrap_or_else(|| "Unknown".to_string());
        let parsed_at = self.parsed_at.unwrap_or_else(Utc::now);

        let finish = |mut periods: Vec<PeriodRecord>| {
            periods.sort_by(|a, b| b.period_end.cmp(&a.period_end));
            for (index, period) in periods.iter_mut().enumerate() {
                period.is_most_recent = index == 0;
                period.calculation_log =
                    Some(period.build_calculation_log(&company_name, &cik, parsed_at));
            }
            periods
        };
        let annual_periods = finish(self.annual);
        let quarterly_periods = finish(self.quarterly);

        CompanyReport {
            metadata: ReportMetadata {
                company_name,
                cik,
                parsed_at,
                parser_version: PARSER_VERSION.to_string(),
                total_annual_periods: annual_periods.len(),
                total_quarterly_periods: quarterly_periods.len(),
            },
            annual_periods,
            quarterly_periods,
        }
    }
}
