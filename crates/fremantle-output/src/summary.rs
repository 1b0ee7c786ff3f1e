//! Human-readable summaries of a company report.
//!
//! Annual periods are listed in full; quarterly periods are capped at the
//! latest [`MAX_QUARTERS_SHOWN`] with a note for the rest.

use crate::report::{CompanyReport, PeriodRecord};
use std::fmt;

/// Quarters listed before the overflow note.
pub const MAX_QUARTERS_SHOWN: usize = 12;

const METHOD_WIDTH: usize = 28;
const MOST_RECENT: &str = "← MOST RECENT";

/// One rendered row of a period table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    /// Period end
    pub period_end: String,
    /// ROCE as a percentage, or `N/A`
    pub roce: String,
    /// EBIT method, truncated
    pub ebit_method: String,
    /// EBIT tier, or `-`
    pub tier: String,
    /// Most-recent marker
    pub status: String,
}

impl SummaryRow {
    /// Render a period record.
    pub fn from_period(period: &PeriodRecord) -> Self {
        let ebit = period.metrics.ebit.as_ref();
        Self {
            period_end: period.period_end.to_string(),
            roce: period
                .roce()
                .map_or_else(|| "N/A".to_string(), |roce| format!("{roce:.2}%")),
            ebit_method: ebit.map_or_else(
                || "N/A".to_string(),
                |e| e.method.chars().take(METHOD_WIDTH).collect(),
            ),
            tier: ebit.map_or_else(|| "-".to_string(), |e| e.tier.to_string()),
            status: if period.is_most_recent {
                MOST_RECENT.to_string()
            } else {
                String::new()
            },
        }
    }
}

fn rows(periods: &[PeriodRecord], limit: Option<usize>) -> (Vec<SummaryRow>, usize) {
    let shown = limit.map_or(periods.len(), |l| l.min(periods.len()));
    let rows = periods[..shown].iter().map(SummaryRow::from_period).collect();
    (rows, periods.len() - shown)
}

impl CompanyReport {
    /// Rows of the annual table.
    pub fn annual_rows(&self) -> Vec<SummaryRow> {
        rows(&self.annual_periods, None).0
    }

    /// Rows of the quarterly table and the number of quarters left out.
    pub fn quarterly_rows(&self) -> (Vec<SummaryRow>, usize) {
        rows(&self.quarterly_periods, Some(MAX_QUARTERS_SHOWN))
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str(&"=".repeat(80));
        output.push_str("\nPARSING SUMMARY\n");
        output.push_str(&"=".repeat(80));
        output.push_str("\n\n");

        output.push_str(&format!("Company: {}\n", self.metadata.company_name));
        output.push_str(&format!("CIK: {}\n", self.metadata.cik));
        output.push_str(&format!(
            "Annual periods: {}\n",
            self.metadata.total_annual_periods
        ));
        output.push_str(&format!(
            "Quarterly periods: {}\n",
            self.metadata.total_quarterly_periods
        ));

        let mut table = |title: &str, heading: &str, rows: &[SummaryRow]| {
            output.push_str(&format!("\n{title}:\n"));
            output.push_str(&format!(
                "{:<15} {:<10} {:<30} {:<5} {:<20}\n",
                heading, "ROCE", "EBIT Method", "Tier", "Status"
            ));
            output.push_str(&"-".repeat(80));
            output.push('\n');
            for row in rows {
                output.push_str(&format!(
                    "{:<15} {:<10} {:<30} {:<5} {:<20}\n",
                    row.period_end, row.roce, row.ebit_method, row.tier, row.status
                ));
            }
        };

        if !self.annual_periods.is_empty() {
            table("Annual Periods (10-K)", "Year End", &self.annual_rows());
        }

        let (quarterly, hidden) = self.quarterly_rows();
        if !quarterly.is_empty() {
            table("Quarterly Periods (10-Q)", "Period End", &quarterly);
        }
        if hidden > 0 {
            output.push_str(&format!("... and {hidden} more quarters\n"));
        }

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# {}\n\n", self.metadata.company_name));
        output.push_str(&format!("- **CIK:** {}\n", self.metadata.cik));
        output.push_str(&format!(
            "- **Annual periods:** {}\n",
            self.metadata.total_annual_periods
        ));
        output.push_str(&format!(
            "- **Quarterly periods:** {}\n\n",
            self.metadata.total_quarterly_periods
        ));

        let mut table = |title: &str, rows: &[SummaryRow]| {
            output.push_str(&format!("## {title}\n\n"));
            output.push_str("| Period End | ROCE | EBIT Method | Tier | Status |\n");
            output.push_str("|------------|------|-------------|------|--------|\n");
            for row in rows {
                output.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    row.period_end, row.roce, row.ebit_method, row.tier, row.status
                ));
            }
            output.push('\n');
        };

        if !self.annual_periods.is_empty() {
            table("Annual Periods", &self.annual_rows());
        }

        let (quarterly, hidden) = self.quarterly_rows();
        if !quarterly.is_empty() {
            table("Quarterly Periods", &quarterly);
        }
        if hidden > 0 {
            output.push_str(&format!("_... and {hidden} more quarters_\n"));
        }

        output
    }
}

impl fmt::Display for CompanyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} (CIK {}): {} annual, {} quarterly periods",
            self.metadata.company_name,
            self.metadata.cik,
            self.metadata.total_annual_periods,
            self.metadata.total_quarterly_periods
        )?;
        if let Some(latest) = self.most_recent_annual() {
            let row = SummaryRow::from_period(latest);
            writeln!(
                f,
                "  Latest annual: {}  ROCE {}  EBIT {}",
                row.period_end, row.roce, row.ebit_method
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportBuilder;
    use crate::report::tests::{date, record};
    use fremantle_facts::Form;
    use rstest::rstest;

    fn quarters(count: u32) -> Vec<PeriodRecord> {
        (0..count)
            .map(|i| {
                let year = 2015 + (i / 4) as i32;
                let month = [3, 6, 9, 12][(i % 4) as usize];
                let day = if month == 3 || month == 12 { 31 } else { 30 };
                record(date(year, month, day), Form::Interim, Some(10.0))
            })
            .collect()
    }

    #[rstest]
    #[case::resolved(Some(50.0), "25.00%", "1")]
    #[case::fractional(Some(33.0), "16.50%", "1")]
    #[case::missing_ebit(None, "N/A", "-")]
    fn test_summary_row(#[case] ebit: Option<f64>, #[case] roce: &str, #[case] tier: &str) {
        let row = SummaryRow::from_period(&record(date(2023, 9, 30), Form::Annual, ebit));
        assert_eq!(row.roce, roce);
        assert_eq!(row.tier, tier);
        assert!(row.status.is_empty());
    }

    #[test]
    fn test_ascii_table() {
        let report = ReportBuilder::new()
            .company_name("Apple Inc.")
            .cik("0000320193")
            .annual_periods(vec![
                record(date(2023, 9, 30), Form::Annual, Some(50.0)),
                record(date(2022, 9, 24), Form::Annual, None),
            ])
            .build();

        let ascii = report.to_ascii_table();
        assert!(ascii.contains("Company: Apple Inc."));
        assert!(ascii.contains("Annual Periods (10-K)"));
        assert!(ascii.contains("25.00%"));
        assert!(ascii.contains("N/A"));
        assert!(ascii.contains(MOST_RECENT));
        assert!(!ascii.contains("Quarterly Periods (10-Q)"));
    }

    #[test]
    fn test_quarters_capped() {
        let report = ReportBuilder::new().quarterly_periods(quarters(15)).build();

        let (rows, hidden) = report.quarterly_rows();
        assert_eq!(rows.len(), MAX_QUARTERS_SHOWN);
        assert_eq!(hidden, 3);
        assert!(rows[0].status.contains("MOST RECENT"));

        assert!(report.to_ascii_table().contains("... and 3 more quarters"));
        assert!(report.to_markdown().contains("and 3 more quarters"));
    }

    #[test]
    fn test_no_overflow_note_when_few_quarters() {
        let report = ReportBuilder::new().quarterly_periods(quarters(4)).build();
        assert_eq!(report.quarterly_rows().1, 0);
        assert!(!report.to_ascii_table().contains("more quarters"));
    }

    #[test]
    fn test_method_truncated() {
        let mut period = record(date(2023, 9, 30), Form::Annual, Some(1.0));
        if let Some(ebit) = period.metrics.ebit.as_mut() {
            ebit.method = "Revenues - CostsAndExpenses (validated against pre-tax)".to_string();
        }
        let row = SummaryRow::from_period(&period);
        assert_eq!(row.ebit_method.chars().count(), METHOD_WIDTH);
        assert_eq!(row.tier, "1");
    }

    #[test]
    fn test_markdown_and_display() {
        let report = ReportBuilder::new()
            .company_name("Apple Inc.")
            .cik("0000320193")
            .annual_periods(vec![record(date(2023, 9, 30), Form::Annual, Some(50.0))])
            .build();

        let markdown = report.to_markdown();
        assert!(markdown.contains("# Apple Inc."));
        assert!(markdown.contains("| Period End | ROCE |"));

        let display = report.to_string();
        assert!(display.contains("1 annual, 0 quarterly periods"));
        assert!(display.contains("ROCE 25.00%"));
    }
}
