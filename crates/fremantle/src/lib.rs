#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fremantle/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod parser;
pub mod quarterly;

// Re-export main types from sub-crates
pub use fremantle_facts as facts;
pub use fremantle_metrics as metrics;
pub use fremantle_output as output;

pub use config::{FiscalYearGrouping, ParserConfig};
pub use error::{Error, Result};
pub use parser::FilingParser;
pub use quarterly::{FiscalCalendar, decumulate};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
