//! Error types for the fremantle crate.

use fremantle_facts::FactsError;
use fremantle_output::ExportError;
use thiserror::Error;

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, parsing or writing a company.
#[derive(Debug, Error)]
pub enum Error {
    /// Company facts could not be read.
    #[error("Facts error: {0}")]
    Facts(#[from] FactsError),

    /// Export failed.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
