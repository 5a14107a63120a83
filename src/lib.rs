// Sumo Export - Sumo Logic search results to CSV and S3
// Copyright (c) 2025 Sumo Export Contributors
// Licensed under the MIT License

//! # Sumo Export - Sumo Logic search results to CSV and S3
//!
//! sumo-export runs a Sumo Logic query over a date range through the Search
//! Job API and writes the results to CSV files, one file per day, optionally
//! uploading each finished file to S3.
//!
//! ## Overview
//!
//! For every daily window of the configured range the exporter:
//! - **Submits** a search job for the query and window
//! - **Pages** through the job's messages while the job is still gathering,
//!   appending each page to the window's CSV file
//! - **Uploads** the finished file to S3 (single put or multipart)
//! - **Deletes** the search job so it stops consuming service resources
//!
//! Windows run concurrently up to `application.concurrency`; a failing window
//! never stops its siblings.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Windowing, job lifecycle, pagination, CSV output, upload
//! - [`adapters`] - External integrations (Search Job API, S3)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sumo_export::config::load_config;
//! use sumo_export::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("sumo-export.toml")?;
//!
//!     let coordinator = ExportCoordinator::from_config(config).await?;
//!     let summary = coordinator.execute_export().await?;
//!
//!     println!("Exported {} rows", summary.total_rows());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`], whose error type
//! [`domain::ExportError`] wraps Search Job API failures
//! ([`domain::SearchError`]) alongside I/O, CSV, and transfer errors.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
