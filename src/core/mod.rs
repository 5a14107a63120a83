//! Core business logic for sumo-export.
//!
//! # Modules
//!
//! - [`job`] - Search job state machine
//! - [`export`] - Pagination into CSV files, coordination, and summaries
//! - [`upload`] - Shipping finished files to an object store
//! - [`window`] - Splitting the export range into daily windows
//!
//! # Export Workflow
//!
//! For every daily window:
//!
//! 1. **Submit**: Create the search job
//! 2. **Paginate**: Page through results under a moving total, appending to CSV
//! 3. **Upload** (optional): Ship the CSV file to S3
//! 4. **Delete**: Release the search job
//!
//! # Example
//!
//! ```rust,no_run
//! use sumo_export::config::load_config;
//! use sumo_export::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("sumo-export.toml")?;
//! let coordinator = ExportCoordinator::from_config(config).await?;
//!
//! let summary = coordinator.execute_export().await?;
//! println!("Rows: {}", summary.total_rows());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod job;
pub mod upload;
pub mod window;
