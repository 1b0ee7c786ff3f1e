//! Error types for company-facts ingestion.

use thiserror::Error;

/// Result type for company-facts operations.
pub type Result<T> = std::result::Result<T, FactsError>;

/// Errors that can occur while reading company facts.
///
/// Missing tags or periods are never errors; they surface as `None` from the
/// resolver. Only input that lacks the expected document structure fails.
#[derive(Debug, Error)]
pub enum FactsError {
    /// The document is not valid JSON or lacks the top-level `facts` map
    #[error("Company facts JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while reading a document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A date attribute could not be parsed as `YYYY-MM-DD`
    #[error("Invalid {field} date: {value:?}")]
    InvalidDate {
        /// Attribute name (`end`, `filed`, `start`)
        field: &'static str,
        /// Raw value found in the document
        value: String,
    },
}
