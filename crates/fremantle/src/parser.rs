//! Period orchestrator
//!
//! Discovers every fiscal period a company reported, runs the metric
//! calculators on each period's aligned fact view, derives the ratios and
//! de-cumulates interim EBIT. A period missing some metrics still yields a
//! record; only the affected ratios report what is missing.

use crate::config::ParserConfig;
use crate::error::Result;
use crate::quarterly::{FiscalCalendar, decumulate};
use fremantle_facts::{CompanyFacts, FactSet, FiscalPeriod, Form};
use fremantle_metrics::ebit::{NET_INCOME_TAGS, REVENUE_TAGS};
use fremantle_metrics::{
    BalanceSheetCalculator, CashCalculator, DebtCalculator, EbitCalculator, RatioEngine,
    validate_ebit,
};
use fremantle_output::{CompanyReport, PeriodMetrics, PeriodRatios, PeriodRecord, ReportBuilder};
use std::path::Path;
use tracing::{debug, info, warn};

/// Parses company facts into a [`CompanyReport`].
#[derive(Debug)]
pub struct FilingParser {
    config: ParserConfig,
    ebit: EbitCalculator,
    debt: DebtCalculator,
    cash: CashCalculator,
    balance_sheet: BalanceSheetCalculator,
    ratios: RatioEngine,
}

impl Default for FilingParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FilingParser {
    /// Create a parser with the default configuration
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a parser with the given configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            ebit: EbitCalculator::with_config(config.ebit_config()),
            debt: DebtCalculator::new(),
            cash: CashCalculator::new(),
            balance_sheet: BalanceSheetCalculator::new(),
            ratios: RatioEngine::with_config(config.ratio_config()),
            config,
        }
    }

    /// Current configuration
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a company-facts JSON document.
    pub fn parse_json(&self, json: &str) -> Result<CompanyReport> {
        let facts = CompanyFacts::from_json(json)?;
        Ok(self.parse(&facts))
    }

    /// Parse a company-facts JSON file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<CompanyReport> {
        let file = std::fs::File::open(path.as_ref())?;
        let facts = CompanyFacts::from_reader(std::io::BufReader::new(file))?;
        Ok(self.parse(&facts))
    }

    /// Extract every annual and (if enabled) quarterly period.
    ///
    /// A company without `us-gaap` facts yields a report with no periods.
    pub fn parse(&self, facts: &CompanyFacts) -> CompanyReport {
        info!(company = %facts.entity_name, cik = %facts.cik, "parsing company facts");

        let (annual, quarterly) = match facts.us_gaap() {
            Some(gaap) => {
                let annual = self.extract_periods(gaap, Form::Annual);
                let quarterly = if self.config.include_quarterly {
                    self.extract_quarterly(gaap, &annual)
                } else {
                    Vec::new()
                };
                (annual, quarterly)
            }
            None => {
                warn!(company = %facts.entity_name, "no us-gaap facts");
                (Vec::new(), Vec::new())
            }
        };

        let report = ReportBuilder::new()
            .company_name(facts.entity_name.as_str())
            .cik(facts.cik.as_str())
            .annual_periods(annual)
            .quarterly_periods(quarterly)
            .build();

        info!(
            company = %report.metadata.company_name,
            annual = report.metadata.total_annual_periods,
            quarterly = report.metadata.total_quarterly_periods,
            "parsed company"
        );
        report
    }

    /// Records for every period of one form, most recent first.
    pub fn extract_periods(&self, gaap: &FactSet, form: Form) -> Vec<PeriodRecord> {
        let periods = gaap.fiscal_periods(form);
        debug!(%form, count = periods.len(), "fiscal periods discovered");
        periods
            .iter()
            .map(|period| self.extract_period(gaap, period))
            .collect()
    }

    fn extract_quarterly(&self, gaap: &FactSet, annual: &[PeriodRecord]) -> Vec<PeriodRecord> {
        let calendar = FiscalCalendar::for_grouping(
            self.config.fiscal_year_grouping,
            annual.iter().map(|p| p.period_end),
        );
        let mut quarterly = self.extract_periods(gaap, Form::Interim);
        for period in &mut quarterly {
            period.fiscal_quarter = Some(calendar.fiscal_quarter(period.period_end));
        }
        decumulate(quarterly, &calendar)
    }

    /// Metrics and ratios of one fiscal period.
    ///
    /// Every calculator sees only the facts reported for this exact period.
    pub fn extract_period(&self, gaap: &FactSet, period: &FiscalPeriod) -> PeriodRecord {
        let view = gaap.align(period);
        let form = period.form;

        let ebit = self.ebit.calculate(&view, form).map(|mut ebit| {
            let net_income = view.resolve(NET_INCOME_TAGS, form).map(|f| f.value);
            let revenues = view.resolve(REVENUE_TAGS, form).map(|f| f.value);
            let sanity = validate_ebit(ebit.value, net_income, revenues);
            if !sanity.passed {
                warn!(end = %period.end, %form, message = %sanity.message, "EBIT failed sanity checks");
            }
            ebit.sanity = Some(sanity);
            ebit
        });

        let metrics = PeriodMetrics {
            ebit,
            total_debt: self.debt.calculate(&view, form),
            cash: self.cash.calculate(&view, form),
            assets: self.balance_sheet.assets(&view, form),
            current_liabilities: self.balance_sheet.current_liabilities(&view, form),
        };

        let ratios = PeriodRatios {
            roce: self.ratios.roce(
                metrics.ebit.as_ref(),
                metrics.assets.as_ref(),
                metrics.current_liabilities.as_ref(),
            ),
            earnings_yield_components: self.ratios.earnings_yield_components(
                metrics.ebit.as_ref(),
                metrics.total_debt.as_ref(),
                metrics.cash.as_ref(),
            ),
        };

        debug!(
            end = %period.end,
            %form,
            metrics = metrics.resolved_count(),
            roce = ratios.roce.status(),
            "period extracted"
        );

        PeriodRecord::new(period.end, period.filed, form, metrics, ratios)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FiscalYearGrouping;
    use serde_json::json;

    fn fact(end: &str, filed: &str, form: &str, val: f64) -> serde_json::Value {
        json!({"end": end, "val": val, "filed": filed, "form": form})
    }

    fn company(gaap: serde_json::Value) -> CompanyFacts {
        CompanyFacts::from_value(json!({
            "cik": 42,
            "entityName": "Example Corp",
            "facts": {"us-gaap": gaap}
        }))
        .unwrap()
    }

    fn usd(observations: Vec<serde_json::Value>) -> serde_json::Value {
        json!({"units": {"USD": observations}})
    }

    #[test]
    fn test_no_gaap_facts() {
        let facts = CompanyFacts::from_value(json!({
            "cik": 42,
            "entityName": "Shell Co",
            "facts": {}
        }))
        .unwrap();
        let report = FilingParser::new().parse(&facts);
        assert!(report.is_empty());
        assert_eq!(report.metadata.company_name, "Shell Co");
    }

    #[test]
    fn test_periods_do_not_mix() {
        let facts = company(json!({
            "Assets": usd(vec![
                fact("2023-12-31", "2024-02-20", "10-K", 400.0),
                fact("2022-12-31", "2023-02-20", "10-K", 300.0),
            ]),
            "LiabilitiesCurrent": usd(vec![
                fact("2023-12-31", "2024-02-20", "10-K", 200.0),
                fact("2022-12-31", "2023-02-20", "10-K", 100.0),
            ]),
            "OperatingIncomeLoss": usd(vec![
                fact("2023-12-31", "2024-02-20", "10-K", 40.0),
            ]),
        }));

        let report = FilingParser::new().parse(&facts);
        assert_eq!(report.annual_periods.len(), 2);

        let older = &report.annual_periods[1];
        assert_eq!(older.fiscal_year, 2022);
        assert!(older.metrics.ebit.is_none());
        assert_eq!(older.ratios.roce.status(), "missing_components");

        let latest = report.most_recent_annual().unwrap();
        assert_eq!(latest.roce(), Some(20.0));
    }

    #[test]
    fn test_insane_ebit_withholds_ratios() {
        let facts = company(json!({
            "Assets": usd(vec![fact("2023-12-31", "2024-02-20", "10-K", 400.0)]),
            "LiabilitiesCurrent": usd(vec![fact("2023-12-31", "2024-02-20", "10-K", 200.0)]),
            "OperatingIncomeLoss": usd(vec![fact("2023-12-31", "2024-02-20", "10-K", 40.0)]),
            "NetIncomeLoss": usd(vec![fact("2023-12-31", "2024-02-20", "10-K", 55.0)]),
        }));

        let enforced = FilingParser::new().parse(&facts);
        let period = enforced.most_recent_annual().unwrap();
        assert!(period.metrics.ebit.as_ref().unwrap().failed_sanity());
        assert_eq!(period.ratios.roce.status(), "invalid_ebit");
        assert_eq!(period.ratios.earnings_yield_components.status(), "invalid_ebit");

        let lenient = FilingParser::with_config(ParserConfig {
            enforce_ebit_sanity: false,
            ..ParserConfig::default()
        })
        .parse(&facts);
        assert_eq!(lenient.most_recent_annual().unwrap().roce(), Some(20.0));
    }

    #[test]
    fn test_quarterly_toggle_and_fiscal_quarters() {
        let facts = company(json!({
            "Assets": usd(vec![
                fact("2023-09-30", "2023-11-03", "10-K", 350.0),
                fact("2023-07-01", "2023-08-04", "10-Q", 335.0),
                fact("2022-12-31", "2023-02-03", "10-Q", 346.0),
            ]),
            "OperatingIncomeLoss": usd(vec![
                fact("2023-07-01", "2023-08-04", "10-Q", 85.0),
                fact("2022-12-31", "2023-02-03", "10-Q", 36.0),
            ]),
        }));

        let annual_only = FilingParser::with_config(ParserConfig::annual_only()).parse(&facts);
        assert_eq!(annual_only.annual_periods.len(), 1);
        assert!(annual_only.quarterly_periods.is_empty());

        let report = FilingParser::new().parse(&facts);
        let quarters: Vec<_> = report
            .quarterly_periods
            .iter()
            .map(|p| p.fiscal_quarter)
            .collect();
        assert_eq!(quarters, vec![Some(3), Some(1)]);

        let q3 = report.quarterly_periods[0].metrics.ebit.as_ref().unwrap();
        assert_eq!(q3.quarterly.as_ref().unwrap().quarterly_value, Some(49.0));

        let by_calendar = FilingParser::with_config(ParserConfig {
            fiscal_year_grouping: FiscalYearGrouping::CalendarYear,
            ..ParserConfig::default()
        })
        .parse(&facts);
        let q3 = by_calendar.quarterly_periods[0].metrics.ebit.as_ref().unwrap();
        assert_eq!(q3.quarterly.as_ref().unwrap().quarterly_value, Some(85.0));
    }
}
