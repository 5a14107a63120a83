//! Export command implementation
//!
//! This module implements the `export` command: one search job and one CSV
//! file per day of the configured range, optionally uploaded to S3.

use crate::config::ExporterConfig;
use crate::core::export::ExportCoordinator;
use crate::domain::Result;
use clap::Args;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Override the start of the range (YYYY-MM-DDTHH:MM:SS)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Override the end of the range (YYYY-MM-DDTHH:MM:SS)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Override the number of daily jobs running at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Override the query statement
    #[arg(long)]
    pub query: Option<String>,

    /// Keep CSV files local even if S3 upload is configured
    #[arg(long)]
    pub no_upload: bool,

    /// Print the planned windows and files without running any search job
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    /// Applies command-line overrides to a loaded configuration
    pub fn apply_overrides(&self, config: &mut ExporterConfig) {
        if let Some(start) = &self.start_date {
            tracing::info!(start_date = %start, "Overriding start date from CLI");
            config.search.query.start_date = start.clone();
        }

        if let Some(end) = &self.end_date {
            tracing::info!(end_date = %end, "Overriding end date from CLI");
            config.search.query.end_date = end.clone();
        }

        if let Some(concurrency) = self.concurrency {
            tracing::info!(concurrency = concurrency, "Overriding concurrency from CLI");
            config.application.concurrency = concurrency;
        }

        if let Some(query) = &self.query {
            tracing::info!("Overriding query statement from CLI");
            config.search.query.statement = query.clone();
        }

        if self.no_upload && config.s3.enabled {
            tracing::info!("Disabling S3 upload from CLI");
            config.s3.enabled = false;
        }
    }

    /// Execute the export command against the already loaded configuration
    pub async fn execute(&self, loaded: Result<ExporterConfig>) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match loaded {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        if self.dry_run {
            return self.print_plan(config);
        }

        let coordinator = match ExportCoordinator::from_config(config).await {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(5);
            }
        };

        println!("Starting export...");
        println!();

        match coordinator.execute_export().await {
            Ok(summary) => {
                println!("Export Summary:");
                println!("  Windows: {}", summary.windows.len());
                println!("  Rows: {}", summary.total_rows());
                println!("  Uploaded: {}", summary.uploaded_windows());
                if summary.cleanup_failures() > 0 {
                    println!("  Local files kept: {}", summary.cleanup_failures());
                }
                println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
                println!();

                let mut windows: Vec<_> = summary.windows.iter().collect();
                windows.sort_by_key(|w| w.window);
                for report in windows {
                    match &report.location {
                        Some(location) => println!(
                            "  {} -> {} rows -> {}",
                            report.window, report.rows, location
                        ),
                        None => println!(
                            "  {} -> {} rows -> {}",
                            report.window,
                            report.rows,
                            report.path.display()
                        ),
                    }
                    if let Some(error) = &report.cleanup_error {
                        println!(
                            "    could not remove {}: {}",
                            report.path.display(),
                            error
                        );
                    }
                }
                println!();
                println!("Export completed successfully");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                Ok(1)
            }
        }
    }

    fn print_plan(&self, config: ExporterConfig) -> anyhow::Result<i32> {
        let upload = config.s3.enabled;
        let bucket = config.s3.bucket.clone();
        let coordinator = ExportCoordinator::new(config, None);

        let plan = match coordinator.plan() {
            Ok(plan) => plan,
            Err(e) => {
                eprintln!("Failed to plan export: {e}");
                return Ok(2);
            }
        };

        println!("DRY RUN - no search jobs will be created");
        println!();
        for report in &plan {
            println!("  {} -> {}", report.window, report.path.display());
        }
        println!();
        println!("{} window(s)", plan.len());
        if upload {
            println!("Files would be uploaded to s3://{bucket}");
        }
        Ok(0)
    }
}
