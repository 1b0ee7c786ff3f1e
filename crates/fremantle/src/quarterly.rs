//! Quarterly de-cumulation
//!
//! Interim filings report income statement items year-to-date. The isolated
//! quarter is the difference between consecutive YTD values of one fiscal
//! year; the first quarter of a fiscal year is already isolated. Only EBIT is
//! de-cumulated, balance sheet items are point-in-time.

use crate::config::FiscalYearGrouping;
use chrono::{Datelike, Months, NaiveDate};
use fremantle_metrics::QuarterlyDelta;
use fremantle_output::PeriodRecord;
use std::collections::BTreeMap;
use tracing::debug;

const FIRST_QUARTER_NOTE: &str = "Q1 - YTD equals quarterly (no de-cumulation needed)";
const DECUMULATED_NOTE: &str = "De-cumulated from YTD (current YTD - previous YTD)";
const MISSING_PREVIOUS_NOTE: &str = "Cannot de-cumulate - previous quarter missing EBIT";

const DAYS_PER_QUARTER: f64 = 365.25 / 4.0;
const YEAR: Months = Months::new(12);

/// Maps interim period ends to fiscal years.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FiscalCalendar {
    year_ends: Vec<NaiveDate>,
}

impl FiscalCalendar {
    /// Calendar built from the company's annual period ends.
    pub fn from_year_ends(year_ends: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut year_ends: Vec<NaiveDate> = year_ends.into_iter().collect();
        year_ends.sort_unstable();
        year_ends.dedup();
        Self { year_ends }
    }

    /// Calendar-year calendar.
    pub const fn calendar_year() -> Self {
        Self {
            year_ends: Vec::new(),
        }
    }

    /// Calendar for a grouping strategy.
    pub fn for_grouping(
        grouping: FiscalYearGrouping,
        year_ends: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        match grouping {
            FiscalYearGrouping::ReportedYearEnd => Self::from_year_ends(year_ends),
            FiscalYearGrouping::CalendarYear => Self::calendar_year(),
        }
    }

    /// Returns true if grouping falls back to calendar years.
    pub fn is_calendar_year(&self) -> bool {
        self.year_ends.is_empty()
    }

    /// End of the fiscal year containing `period_end`.
    ///
    /// The nearest reported year end on or after the period, stepped back a
    /// year at a time across gaps in the annual history, or stepped forward
    /// past the latest reported year end.
    pub fn year_end_for(&self, period_end: NaiveDate) -> NaiveDate {
        let next = self.year_ends.iter().find(|end| **end >= period_end).copied();

        match next.or_else(|| self.year_ends.last().copied()) {
            None => NaiveDate::from_ymd_opt(period_end.year(), 12, 31).unwrap_or(period_end),
            Some(mut candidate) => {
                while candidate < period_end {
                    match candidate.checked_add_months(YEAR) {
                        Some(later) => candidate = later,
                        None => break,
                    }
                }
                while let Some(earlier) = candidate.checked_sub_months(YEAR) {
                    if earlier < period_end {
                        break;
                    }
                    candidate = earlier;
                }
                candidate
            }
        }
    }

    /// Fiscal year of a period: the calendar year its fiscal year ends in.
    pub fn fiscal_year(&self, period_end: NaiveDate) -> i32 {
        self.year_end_for(period_end).year()
    }

    /// Fiscal quarter (1-4) of an interim period end.
    pub fn fiscal_quarter(&self, period_end: NaiveDate) -> u8 {
        if self.is_calendar_year() {
            return period_end.month().div_ceil(3) as u8;
        }
        let year_end = self.year_end_for(period_end);
        let year_start = year_end.checked_sub_months(YEAR).unwrap_or(year_end);
        let days = (period_end - year_start).num_days() as f64;
        (days / DAYS_PER_QUARTER).round().clamp(1.0, 4.0) as u8
    }
}

/// Attach quarterly deltas to the EBIT of interim periods.
///
/// Returns the periods in their original order. Periods without EBIT are left
/// as they are; the quarter after one has no isolated value.
pub fn decumulate(mut periods: Vec<PeriodRecord>, calendar: &FiscalCalendar) -> Vec<PeriodRecord> {
    let mut by_year: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (index, period) in periods.iter().enumerate() {
        by_year
            .entry(calendar.fiscal_year(period.period_end))
            .or_default()
            .push(index);
    }

    for (fiscal_year, mut indices) in by_year {
        indices.sort_by_key(|&i| periods[i].period_end);

        let mut previous: Option<Option<f64>> = None;
        for index in indices {
            let current = periods[index].metrics.ebit.as_ref().map(|e| e.value);

            if let (Some(ebit), Some(ytd)) = (periods[index].metrics.ebit.as_mut(), current) {
                let delta = match previous {
                    None => QuarterlyDelta {
                        ytd_value: ytd,
                        quarterly_value: Some(ytd),
                        previous_quarter_ytd: None,
                        fiscal_year,
                        note: FIRST_QUARTER_NOTE.to_string(),
                    },
                    Some(Some(previous_ytd)) => QuarterlyDelta {
                        ytd_value: ytd,
                        quarterly_value: Some(ytd - previous_ytd),
                        previous_quarter_ytd: Some(previous_ytd),
                        fiscal_year,
                        note: DECUMULATED_NOTE.to_string(),
                    },
                    Some(None) => QuarterlyDelta {
                        ytd_value: ytd,
                        quarterly_value: None,
                        previous_quarter_ytd: None,
                        fiscal_year,
                        note: MISSING_PREVIOUS_NOTE.to_string(),
                    },
                };
                ebit.quarterly = Some(delta);
            }

            previous = Some(current);
        }
        debug!(fiscal_year, "quarterly EBIT de-cumulated");
    }

    periods
}

#[cfg(test)]
mod tests {
    use super::*;
    use fremantle_facts::Form;
    use fremantle_metrics::ratio::{calculate_roce, earnings_yield_components};
    use fremantle_metrics::{EbitResult, EbitTier};
    use fremantle_output::{PeriodMetrics, PeriodRatios};
    use rstest::rstest;
    use std::collections::BTreeMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn quarter(end: NaiveDate, ebit: Option<f64>) -> PeriodRecord {
        let metrics = PeriodMetrics {
            ebit: ebit.map(|value| EbitResult {
                value,
                method: "Direct OperatingIncomeLoss".to_string(),
                tier: EbitTier::Direct,
                sources: BTreeMap::new(),
                validation: None,
                sanity: None,
                quarterly: None,
            }),
            ..PeriodMetrics::default()
        };
        let ratios = PeriodRatios {
            roce: calculate_roce(ebit, None, None),
            earnings_yield_components: earnings_yield_components(ebit, None, None),
        };
        PeriodRecord::new(end, end, Form::Interim, metrics, ratios)
    }

    fn delta(period: &PeriodRecord) -> &QuarterlyDelta {
        period
            .metrics
            .ebit
            .as_ref()
            .and_then(|e| e.quarterly.as_ref())
            .unwrap()
    }

    #[test]
    fn test_ytd_differences() {
        let periods = vec![
            quarter(date(2023, 9, 30), Some(85.0)),
            quarter(date(2023, 6, 30), Some(55.0)),
            quarter(date(2023, 3, 31), Some(20.0)),
        ];
        let result = decumulate(periods, &FiscalCalendar::calendar_year());

        assert_eq!(result[0].period_end, date(2023, 9, 30));
        assert_eq!(delta(&result[2]).quarterly_value, Some(20.0));
        assert_eq!(delta(&result[2]).note, FIRST_QUARTER_NOTE);
        assert_eq!(delta(&result[1]).quarterly_value, Some(35.0));
        assert_eq!(delta(&result[1]).previous_quarter_ytd, Some(20.0));
        assert_eq!(delta(&result[0]).quarterly_value, Some(30.0));
        assert_eq!(delta(&result[0]).ytd_value, 85.0);
        assert_eq!(delta(&result[0]).fiscal_year, 2023);
    }

    #[test]
    fn test_missing_previous_quarter() {
        let periods = vec![
            quarter(date(2023, 3, 31), Some(20.0)),
            quarter(date(2023, 6, 30), None),
            quarter(date(2023, 9, 30), Some(85.0)),
        ];
        let result = decumulate(periods, &FiscalCalendar::calendar_year());

        assert!(result[1].metrics.ebit.is_none());
        let q3 = delta(&result[2]);
        assert_eq!(q3.quarterly_value, None);
        assert_eq!(q3.ytd_value, 85.0);
        assert_eq!(q3.note, MISSING_PREVIOUS_NOTE);
    }

    #[test]
    fn test_years_are_independent() {
        let periods = vec![
            quarter(date(2024, 3, 31), Some(25.0)),
            quarter(date(2023, 9, 30), Some(85.0)),
        ];
        let result = decumulate(periods, &FiscalCalendar::calendar_year());
        assert_eq!(delta(&result[0]).quarterly_value, Some(25.0));
        assert_eq!(delta(&result[1]).quarterly_value, Some(85.0));
    }

    #[test]
    fn test_non_calendar_fiscal_year() {
        // Fiscal years ending late September; Q1 ends in December.
        let calendar = FiscalCalendar::from_year_ends([date(2023, 9, 30), date(2022, 9, 24)]);
        let periods = vec![
            quarter(date(2023, 4, 1), Some(60.0)),
            quarter(date(2022, 12, 31), Some(36.0)),
        ];
        let result = decumulate(periods, &calendar);
        assert_eq!(delta(&result[1]).quarterly_value, Some(36.0));
        assert_eq!(delta(&result[0]).quarterly_value, Some(24.0));
        assert_eq!(delta(&result[0]).fiscal_year, 2023);

        let by_calendar = decumulate(
            vec![
                quarter(date(2023, 4, 1), Some(60.0)),
                quarter(date(2022, 12, 31), Some(36.0)),
            ],
            &FiscalCalendar::calendar_year(),
        );
        assert_eq!(delta(&by_calendar[0]).quarterly_value, Some(60.0));
    }

    #[rstest]
    #[case::before_first(date(2017, 12, 30), date(2018, 9, 29))]
    #[case::within(date(2023, 7, 1), date(2023, 9, 30))]
    #[case::after_latest(date(2024, 3, 30), date(2024, 9, 30))]
    #[case::gap(date(2020, 6, 27), date(2020, 9, 24))]
    fn test_year_end_for(#[case] period_end: NaiveDate, #[case] expected: NaiveDate) {
        let calendar = FiscalCalendar::from_year_ends([
            date(2018, 9, 29),
            date(2022, 9, 24),
            date(2023, 9, 30),
        ]);
        assert_eq!(calendar.year_end_for(period_end), expected);
    }

    #[rstest]
    #[case(date(2022, 12, 31), 1)]
    #[case(date(2023, 4, 1), 2)]
    #[case(date(2023, 7, 1), 3)]
    fn test_fiscal_quarter(#[case] period_end: NaiveDate, #[case] expected: u8) {
        let calendar = FiscalCalendar::from_year_ends([date(2022, 9, 24), date(2023, 9, 30)]);
        assert_eq!(calendar.fiscal_quarter(period_end), expected);
    }

    #[test]
    fn test_calendar_fallback() {
        let calendar = FiscalCalendar::for_grouping(FiscalYearGrouping::ReportedYearEnd, []);
        assert!(calendar.is_calendar_year());
        assert_eq!(calendar.fiscal_year(date(2023, 6, 30)), 2023);
        assert_eq!(calendar.fiscal_quarter(date(2023, 6, 30)), 2);
        assert_eq!(calendar.fiscal_quarter(date(2023, 10, 1)), 4);
    }
}
