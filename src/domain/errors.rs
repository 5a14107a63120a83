//! Domain error types
//!
//! This module defines the error hierarchy for sumo-export.
//! All errors are domain-specific and don't expose third-party types.

use super::job::JobId;
use thiserror::Error;

/// Main sumo-export error type
///
/// This is the primary error type used throughout the library.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Search job API errors
    #[error("Search job error: {0}")]
    Search(#[from] SearchError),

    /// Local file errors (create, write, read, delete)
    #[error("I/O error: {0}")]
    Io(String),

    /// CSV encoding errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Object store upload errors
    #[error("Transfer error: {0}")]
    Transfer(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Search job API errors
///
/// Errors that occur while driving a remote search job.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The service answered with a status other than the expected one
    #[error("{operation} failed: {status}")]
    Protocol {
        operation: &'static str,
        status: String,
    },

    /// The request could not be sent or the body could not be read
    #[error("Failed to reach search API: {0}")]
    Connection(String),

    /// The response body did not match the expected shape
    #[error("Could not decode response body: {0}")]
    Decode(String),

    /// An operation was invoked out of order (e.g. refresh before submit)
    #[error("Invalid job state: {0}")]
    Precondition(String),

    /// The remote job was cancelled before it finished gathering
    #[error("Search job {0} was cancelled")]
    Cancelled(JobId),

    /// The job finished gathering but stopped returning rows early
    #[error("Search job returned no more messages after {written} of {expected}")]
    Stalled { written: u64, expected: u64 },
}

impl SearchError {
    /// Builds a protocol error from an operation name and a status line
    pub fn protocol(operation: &'static str, status: impl ToString) -> Self {
        SearchError::Protocol {
            operation,
            status: status.to_string(),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err.to_string())
    }
}

impl From<toml::de::Error> for ExportError {
    fn from(err: toml::de::Error) -> Self {
        ExportError::Configuration(format!("TOML parse error: {err}"))
    }
}
