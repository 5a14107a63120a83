//! Error context extension trait
//!
//! Provides `.context()` and `.with_context()` for `Result<T, E>` where `E`
//! converts into [`ExportError`], similar to `anyhow::Context` but keeping the
//! library's error type.
//!
//! # Examples
//!
//! ```rust
//! use sumo_export::domain::Result;
//! use sumo_export::domain::context::ResultExt;
//!
//! fn read_export(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
//! }
//! ```

use crate::domain::errors::ExportError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Adds context to an error (evaluated eagerly)
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Adds context to an error, computing it only on failure
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

/// The error keeps its variant; only the message gains the context prefix.
impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ExportError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| prefix(e.into(), &context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| prefix(e.into(), &f()))
    }
}

fn prefix(err: ExportError, context: &dyn std::fmt::Display) -> ExportError {
    match err {
        ExportError::Io(msg) => ExportError::Io(format!("{context}: {msg}")),
        ExportError::Csv(msg) => ExportError::Csv(format!("{context}: {msg}")),
        ExportError::Transfer(msg) => ExportError::Transfer(format!("{context}: {msg}")),
        ExportError::Configuration(msg) => {
            ExportError::Configuration(format!("{context}: {msg}"))
        }
        ExportError::Validation(msg) => ExportError::Validation(format!("{context}: {msg}")),
        ExportError::Serialization(msg) => {
            ExportError::Serialization(format!("{context}: {msg}"))
        }
        other => ExportError::Other(format!("{context}: {other}")),
    }
}
