//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable log levels
//! - JSON-formatted local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use sumo_export::logging::init_logging;
//! use sumo_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the completion of one window
///
/// # Example
///
/// ```no_run
/// use sumo_export::log_window_complete;
/// use std::time::Duration;
///
/// log_window_complete!("2021-01-01T00:00:00..2021-01-02T00:00:00", 42, Duration::from_secs(10));
/// ```
#[macro_export]
macro_rules! log_window_complete {
    ($window:expr, $rows:expr, $duration:expr) => {
        tracing::info!(
            window = %$window,
            rows = $rows,
            duration_ms = $duration.as_millis() as u64,
            "Window completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use sumo_export::log_error_with_context;
/// use sumo_export::domain::ExportError;
///
/// let error = ExportError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
