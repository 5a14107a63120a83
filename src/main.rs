// Sumo Export - Sumo Logic search results to CSV and S3
// Copyright (c) 2025 Sumo Export Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use sumo_export::cli::{Cli, Commands};
use sumo_export::config::{load_config, ExporterConfig, LoggingConfig};
use sumo_export::domain::Result;
use sumo_export::logging::init_logging;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // The file is loaded once, before logging exists; commands receive the
    // result and report configuration errors themselves.
    let loaded = load_config(&cli.config);
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| loaded.as_ref().ok().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Sumo Export - Sumo Logic search results to CSV and S3"
    );

    match &loaded {
        Ok(_) => tracing::debug!(path = %cli.config, "Configuration loaded"),
        Err(e) => tracing::debug!(path = %cli.config, error = %e, "Configuration not loaded"),
    }

    let exit_code = match execute_command(&cli, loaded).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // process::exit skips destructors, so flush file logs first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, loaded: Result<ExporterConfig>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Export(args) => args.execute(loaded).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config, loaded).await,
        Commands::Init(args) => args.execute().await,
    }
}
