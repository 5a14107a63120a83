//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for sumo-export using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// sumo-export - Sumo Logic search results to CSV and S3
#[derive(Parser, Debug)]
#[command(name = "sumo-export")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "sumo-export.toml", env = "SUMO_EXPORT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SUMO_EXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export search results for the configured range to CSV files
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["sumo-export", "export"]);
        assert_eq!(cli.config, "sumo-export.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["sumo-export", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["sumo-export", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_export_overrides() {
        let cli = Cli::parse_from([
            "sumo-export",
            "export",
            "--start-date",
            "2021-01-01T00:00:00",
            "--end-date",
            "2021-01-03T00:00:00",
            "--concurrency",
            "2",
            "--no-upload",
            "--dry-run",
        ]);
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.start_date.as_deref(), Some("2021-01-01T00:00:00"));
                assert_eq!(args.concurrency, Some(2));
                assert!(args.no_upload);
                assert!(args.dry_run);
                assert!(args.query.is_none());
            }
            other => panic!("Expected export command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["sumo-export", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["sumo-export", "init", "--force"]);
        match cli.command {
            Commands::Init(args) => {
                assert!(args.force);
                assert_eq!(args.output, "sumo-export.toml");
            }
            other => panic!("Expected init command, got {other:?}"),
        }
    }
}
