#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fremantle/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod summary;

pub use export::{ExportError, ExportFormat, Exporter, PeriodRow};
pub use report::{
    CalculationLog, CompanyReport, MetricLogEntry, PARSER_VERSION, PeriodMetrics, PeriodRatios,
    PeriodRecord, ReportBuilder, ReportError, ReportMetadata,
};
pub use summary::{MAX_QUARTERS_SHOWN, SummaryRow};
