//! Error types for the Abacus library.
//!
//! These cover infrastructure faults only: I/O, parsing, configuration,
//! HTTP, cancellation. Failures of individual data operations are data
//! (`ops::OperationResult::Failure`), recorded in the transcript rather
//! than raised.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Abacus operations.
#[derive(Debug, Error)]
pub enum AbacusError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A reasoning-capability request exceeded its deadline.
    #[error("Reasoning request timed out: {0}")]
    Timeout(String),

    /// A reasoning-capability request failed.
    #[error("Reasoning request failed: {0}")]
    Api(String),

    /// The caller cancelled an in-flight question.
    #[error("Question cancelled")]
    Cancelled,
}

/// Result type alias for Abacus operations.
pub type Result<T> = std::result::Result<T, AbacusError>;
