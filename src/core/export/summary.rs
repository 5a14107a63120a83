//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::core::window::TimeWindow;
use crate::domain::{ExportError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one daily window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowStatus {
    /// Rows exported (and uploaded, if enabled)
    Exported,
    /// Only planned (dry run)
    Planned,
    Failed(String),
}

/// Report for a single window
#[derive(Debug, Clone)]
pub struct WindowReport {
    pub window: TimeWindow,

    /// Search job ID, if the job was submitted
    pub job_id: Option<String>,

    /// Local CSV file
    pub path: PathBuf,

    /// Data rows written
    pub rows: u64,

    /// Remote location, if uploaded
    pub location: Option<String>,

    /// Set when the local file should have been removed after upload but
    /// could not be
    pub cleanup_error: Option<String>,

    pub status: WindowStatus,
    pub duration: Duration,
}

impl WindowReport {
    pub fn planned(window: TimeWindow, path: PathBuf) -> Self {
        Self {
            window,
            job_id: None,
            path,
            rows: 0,
            location: None,
            cleanup_error: None,
            status: WindowStatus::Planned,
            duration: Duration::ZERO,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, WindowStatus::Failed(_))
    }
}

/// Summary of an export run
#[derive(Debug, Default)]
pub struct ExportSummary {
    /// Per-window reports in completion order
    pub windows: Vec<WindowReport>,

    /// Duration of the export
    pub duration: Duration,

    /// First error in completion order
    first_error: Option<ExportError>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn add_report(&mut self, report: WindowReport) {
        self.windows.push(report);
    }

    /// Records a failure; only the first one is kept as the overall error
    pub fn add_error(&mut self, error: ExportError) {
        if self.first_error.is_none() {
            self.first_error = Some(error);
        }
    }

    pub fn total_rows(&self) -> u64 {
        self.windows.iter().map(|w| w.rows).sum()
    }

    pub fn failed_windows(&self) -> usize {
        self.windows.iter().filter(|w| w.is_failed()).count()
    }

    pub fn uploaded_windows(&self) -> usize {
        self.windows.iter().filter(|w| w.location.is_some()).count()
    }

    /// Windows whose local file was left behind after a successful upload
    pub fn cleanup_failures(&self) -> usize {
        self.windows
            .iter()
            .filter(|w| w.cleanup_error.is_some())
            .count()
    }

    /// Check if the export was successful (no failures)
    pub fn is_successful(&self) -> bool {
        self.first_error.is_none()
    }

    pub fn first_error(&self) -> Option<&ExportError> {
        self.first_error.as_ref()
    }

    /// Converts into the overall result, yielding the first error if any
    pub fn into_result(mut self) -> Result<Self> {
        match self.first_error.take() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            windows = self.windows.len(),
            failed = self.failed_windows(),
            uploaded = self.uploaded_windows(),
            cleanup_failures = self.cleanup_failures(),
            total_rows = self.total_rows(),
            duration_secs = self.duration.as_secs(),
            "Export completed"
        );

        for report in self.windows.iter().filter(|w| w.is_failed()) {
            if let WindowStatus::Failed(message) = &report.status {
                tracing::warn!(
                    window = %report.window,
                    job_id = ?report.job_id,
                    message = %message,
                    "Window failed"
                );
            }
        }

        for report in &self.windows {
            if let Some(error) = &report.cleanup_error {
                tracing::warn!(
                    window = %report.window,
                    file = %report.path.display(),
                    error = %error,
                    "Local file kept after upload"
                );
            }
        }
    }
}
