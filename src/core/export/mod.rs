//! Export orchestration and pagination
//!
//! This module provides the core export logic for sumo-export, including:
//! - Paging a search job's results into a CSV file
//! - Export coordination across daily windows
//! - Summary and reporting

pub mod coordinator;
pub mod paginator;
pub mod sink;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use paginator::{after_page, after_refresh, export_all, PageAction, Settle};
pub use sink::CsvSink;
pub use summary::{ExportSummary, WindowReport, WindowStatus};
