//! End-to-end tests: company-facts JSON in, company report out.

use approx::assert_relative_eq;
use fremantle::metrics::{EbitTier, RoceBand};
use fremantle::output::{ExportFormat, Exporter};
use fremantle::{FilingParser, ParserConfig};
use rstest::rstest;
use serde_json::{Value, json};

fn obs(end: &str, filed: &str, form: &str, val: f64) -> Value {
    json!({"end": end, "val": val, "filed": filed, "form": form, "accn": "0000000000-00-000000"})
}

fn annual(val: f64) -> Value {
    obs("2023-12-31", "2024-02-15", "10-K", val)
}

fn document(gaap: Value) -> String {
    let gaap = gaap
        .as_object()
        .map(|tags| {
            tags.iter()
                .map(|(tag, observations)| {
                    (tag.clone(), json!({"label": tag, "units": {"USD": observations}}))
                })
                .collect::<serde_json::Map<_, _>>()
        })
        .unwrap();

    json!({
        "cik": 320193,
        "entityName": "Example Corp",
        "facts": {
            "dei": {},
            "us-gaap": gaap
        }
    })
    .to_string()
}

#[test]
fn test_direct_operating_income_roce() {
    let json = document(json!({
        "Assets": [annual(352_755_000_000.0)],
        "LiabilitiesCurrent": [annual(145_308_000_000.0)],
        "OperatingIncomeLoss": [annual(114_301_000_000.0)],
    }));

    let report = FilingParser::new().parse_json(&json).unwrap();
    assert_eq!(report.metadata.cik, "0000320193");

    let period = report.most_recent_annual().unwrap();
    let ebit = period.metrics.ebit.as_ref().unwrap();
    assert_eq!(ebit.tier, EbitTier::Direct);

    match &period.ratios.roce {
        fremantle::metrics::RoceResult::Success {
            value,
            components,
            band,
            ..
        } => {
            assert_eq!(components.capital_employed, 207_447_000_000.0);
            assert_relative_eq!(*value, 55.09, epsilon = 0.01);
            assert_eq!(*band, RoceBand::Excellent);
            assert_eq!(band.to_string(), "Excellent");
        }
        other => panic!("expected ROCE success, got {other:?}"),
    }
}

#[test]
fn test_revenue_less_costs_with_pretax_warning() {
    let json = document(json!({
        "Assets": [annual(1_000_000_000.0)],
        "Revenues": [annual(900_000_000.0)],
        "CostsAndExpenses": [annual(750_000_000.0)],
        "IncomeLossFromContinuingOperationsBeforeIncomeTaxesExtraordinaryItemsNoncontrollingInterest":
            [annual(140_000_000.0)],
    }));

    let report = FilingParser::new().parse_json(&json).unwrap();
    let ebit = report.annual_periods[0].metrics.ebit.as_ref().unwrap();

    assert_eq!(ebit.value, 150_000_000.0);
    assert_eq!(ebit.tier.number(), 1);
    assert!(ebit.validation.as_deref().unwrap().contains("Validation warning"));
    assert!(!ebit.failed_sanity());

    let log = report.annual_periods[0].calculation_log.as_ref().unwrap();
    assert_eq!(log.metrics_extracted["ebit"].tier, Some(EbitTier::Direct));
    assert!(log.metrics_extracted["ebit"].validation.is_some());
}

#[test]
fn test_ebit_backed_out_of_net_income() {
    let json = document(json!({
        "Assets": [annual(500.0)],
        "NetIncomeLoss": [annual(70.0)],
        "IncomeTaxExpenseBenefit": [annual(20.0)],
        "InterestExpense": [annual(10.0)],
    }));

    let report = FilingParser::new().parse_json(&json).unwrap();
    let ebit = report.annual_periods[0].metrics.ebit.as_ref().unwrap();
    assert_eq!(ebit.tier, EbitTier::FromNetIncome);
    assert_eq!(ebit.value, 100.0);
}

#[rstest]
#[case::reported_year_end(ParserConfig::default())]
#[case::calendar_year(ParserConfig {
    fiscal_year_grouping: fremantle::FiscalYearGrouping::CalendarYear,
    ..ParserConfig::default()
})]
fn test_quarterly_decumulation(#[case] config: ParserConfig) {
    let json = document(json!({
        "Assets": [
            annual(1_000.0),
            obs("2023-03-31", "2023-05-01", "10-Q", 900.0),
            obs("2023-06-30", "2023-08-01", "10-Q", 920.0),
            obs("2023-09-30", "2023-11-01", "10-Q", 950.0),
        ],
        "OperatingIncomeLoss": [
            obs("2023-03-31", "2023-05-01", "10-Q", 20.0),
            obs("2023-06-30", "2023-08-01", "10-Q", 55.0),
            obs("2023-09-30", "2023-11-01", "10-Q", 85.0),
        ],
    }));

    let report = FilingParser::with_config(config).parse_json(&json).unwrap();
    assert_eq!(report.metadata.total_quarterly_periods, 3);

    let isolated: Vec<_> = report
        .quarterly_periods
        .iter()
        .map(|p| {
            let ebit = p.metrics.ebit.as_ref().unwrap();
            (p.fiscal_quarter, ebit.quarterly.as_ref().unwrap().quarterly_value)
        })
        .collect();
    assert_eq!(
        isolated,
        vec![(Some(3), Some(30.0)), (Some(2), Some(35.0)), (Some(1), Some(20.0))]
    );
    assert!(report.quarterly_periods[0].is_most_recent);
}

#[test]
fn test_restated_period_uses_latest_filing() {
    let json = document(json!({
        "Assets": [
            obs("2022-12-31", "2023-02-15", "10-K", 300.0),
            obs("2022-12-31", "2024-02-15", "10-K", 310.0),
            obs("2022-12-31", "2023-06-01", "10-K/A", 999.0),
        ],
    }));

    let report = FilingParser::new().parse_json(&json).unwrap();
    assert_eq!(report.annual_periods.len(), 1);
    let period = &report.annual_periods[0];
    assert_eq!(period.filing_date.to_string(), "2024-02-15");
    assert_eq!(period.metrics.assets.as_ref().unwrap().value, 310.0);
}

#[test]
fn test_debt_and_cash_feed_earnings_yield() {
    let json = document(json!({
        "Assets": [annual(2_000.0)],
        "LiabilitiesCurrent": [annual(500.0)],
        "OperatingIncomeLoss": [annual(300.0)],
        "LongTermDebtNoncurrent": [annual(800.0)],
        "LongTermDebtCurrent": [annual(100.0)],
        "LongTermDebtAndCapitalLeaseObligationsCurrent": [annual(100.0)],
        "ShortTermBorrowings": [annual(50.0)],
        "CashAndCashEquivalentsAtCarryingValue": [annual(400.0)],
    }));

    let report = FilingParser::new().parse_json(&json).unwrap();
    let period = &report.annual_periods[0];
    let debt = period.metrics.total_debt.as_ref().unwrap();
    assert_eq!(debt.value, 950.0);
    assert_eq!(
        debt.method,
        "3-component (LT non-current + LT current + ST borrowings)"
    );

    let components = &period.ratios.earnings_yield_components;
    assert_eq!(components.net_debt(), Some(550.0));
    let ey = components.with_market_cap(2_450.0);
    assert_eq!(ey.value(), Some(10.0));
}

#[test]
fn test_malformed_document_is_an_error() {
    let parser = FilingParser::new();
    assert!(parser.parse_json("{\"cik\": 1}").is_err());
    assert!(parser.parse_json("not json").is_err());
}

#[test]
fn test_report_exports() {
    let json = document(json!({
        "Assets": [annual(1_000.0)],
        "LiabilitiesCurrent": [annual(400.0)],
        "OperatingIncomeLoss": [annual(120.0)],
    }));
    let report = FilingParser::new().parse_json(&json).unwrap();

    let csv = report.export_to_string(ExportFormat::Csv).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains("Example Corp"));

    let ascii = report.to_ascii_table();
    assert!(ascii.contains("20.00%"));
    assert!(ascii.contains("Direct OperatingIncomeLoss"));
}
