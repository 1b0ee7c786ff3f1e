#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fremantle/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod facts;
pub mod period;
pub mod resolve;
pub mod tags;

pub use error::{FactsError, Result};
pub use facts::{CompanyFacts, Concept, FactSet, Form, Observation, US_GAAP, USD};
pub use period::{ANCHOR_TAG, FiscalPeriod};
pub use resolve::SourceFact;

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
