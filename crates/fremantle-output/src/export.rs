//! CSV and JSON export of company reports.
//!
//! JSON carries the full report. CSV flattens it to one row per period with
//! the headline value of each metric and ratio.

use crate::report::{CompanyReport, PeriodRecord};
use chrono::NaiveDate;
use fremantle_facts::Form;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output was not valid UTF-8.
    #[error("Invalid UTF-8 in CSV output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// One period flattened for CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRow {
    /// Company name
    pub company: String,
    /// Zero-padded CIK
    pub cik: String,
    /// Form type
    pub form: Form,
    /// Fiscal year
    pub fiscal_year: i32,
    /// Fiscal quarter (interim periods only)
    pub fiscal_quarter: Option<u8>,
    /// Period end
    pub period_end: NaiveDate,
    /// Effective filing date
    pub filing_date: NaiveDate,
    /// Most recent period of its list
    pub is_most_recent: bool,
    /// EBIT (year-to-date for interim periods)
    pub ebit: Option<f64>,
    /// EBIT waterfall tier
    pub ebit_tier: Option<u8>,
    /// De-cumulated quarterly EBIT
    pub ebit_quarterly: Option<f64>,
    /// Total debt
    pub total_debt: Option<f64>,
    /// Unrestricted cash
    pub unrestricted_cash: Option<f64>,
    /// Total cash
    pub total_cash: Option<f64>,
    /// Total assets
    pub assets: Option<f64>,
    /// Current liabilities
    pub current_liabilities: Option<f64>,
    /// ROCE in percent
    pub roce: Option<f64>,
    /// ROCE status
    pub roce_status: String,
    /// Net debt
    pub net_debt: Option<f64>,
    /// Earnings yield components status
    pub earnings_yield_status: String,
}

impl PeriodRow {
    /// Flatten a period record.
    pub fn new(company: &str, cik: &str, period: &PeriodRecord) -> Self {
        let metrics = &period.metrics;
        let ebit = metrics.ebit.as_ref();
        Self {
            company: company.to_string(),
            cik: cik.to_string(),
            form: period.form,
            fiscal_year: period.fiscal_year,
            fiscal_quarter: period.fiscal_quarter,
            period_end: period.period_end,
            filing_date: period.filing_date,
            is_most_recent: period.is_most_recent,
            ebit: ebit.map(|e| e.value),
            ebit_tier: ebit.map(|e| e.tier.number()),
            ebit_quarterly: ebit
                .and_then(|e| e.quarterly.as_ref())
                .and_then(|q| q.quarterly_value),
            total_debt: metrics.total_debt.as_ref().map(|d| d.value),
            unrestricted_cash: metrics.cash.as_ref().map(|c| c.unrestricted_cash),
            total_cash: metrics.cash.as_ref().map(|c| c.total_cash),
            assets: metrics.assets.as_ref().map(|a| a.value),
            current_liabilities: metrics.current_liabilities.as_ref().map(|l| l.value),
            roce: period.ratios.roce.value(),
            roce_status: period.ratios.roce.status().to_string(),
            net_debt: period.ratios.earnings_yield_components.net_debt(),
            earnings_yield_status: period.ratios.earnings_yield_components.status().to_string(),
        }
    }
}

impl CompanyReport {
    /// Flatten every period, annual first.
    pub fn rows(&self) -> Vec<PeriodRow> {
        self.annual_periods
            .iter()
            .chain(&self.quarterly_periods)
            .map(|period| PeriodRow::new(&self.metadata.company_name, &self.metadata.cik, period))
            .collect()
    }
}

fn rows_to_csv(rows: &[PeriodRow]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let data = String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?)?;
    Ok(data)
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for CompanyReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => rows_to_csv(&self.rows()),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<CompanyReport> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let rows: Vec<PeriodRow> = self.iter().flat_map(CompanyReport::rows).collect();
                rows_to_csv(&rows)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportBuilder;
    use crate::report::tests::{date, record};

    fn report() -> CompanyReport {
        ReportBuilder::new()
            .company_name("Apple Inc.")
            .cik("0000320193")
            .annual_periods(vec![record(date(2023, 9, 30), Form::Annual, Some(50.0))])
            .quarterly_periods(vec![record(date(2023, 7, 1), Form::Interim, None)])
            .build()
    }

    #[test]
    fn test_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }

    #[test]
    fn test_rows() {
        let rows = report().rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].form, Form::Annual);
        assert_eq!(rows[0].roce, Some(25.0));
        assert_eq!(rows[0].ebit_tier, Some(1));
        assert_eq!(rows[1].roce_status, "missing_components");
        assert!(rows[1].ebit.is_none());
    }

    #[test]
    fn test_csv_export() {
        let csv = report().export_to_string(ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("company,cik,form,fiscal_year"));
        assert!(header.contains("roce_status"));
        assert_eq!(lines.count(), 2);
        assert!(csv.contains("10-K"));
        assert!(csv.contains("2023-09-30"));
    }

    #[test]
    fn test_json_export() {
        let json = report().export_to_string(ExportFormat::Json).unwrap();
        assert!(json.contains("\"Apple Inc.\""));
        assert!(!json.contains('\n'));

        let pretty = report().export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(pretty.contains("  "));
    }

    #[test]
    fn test_batch_csv_export() {
        let csv = vec![report(), report()]
            .export_to_string(ExportFormat::Csv)
            .unwrap();
        assert_eq!(csv.lines().count(), 5);
    }
}
