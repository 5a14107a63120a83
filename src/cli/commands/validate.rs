//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the sumo-export configuration file.

use crate::config::ExporterConfig;
use crate::core::window::{parse_timestamp, split_by_day};
use crate::domain::Result;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command against the already loaded configuration
    pub async fn execute(
        &self,
        config_path: &str,
        loaded: Result<ExporterConfig>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates as well
        let config = match loaded {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let windows = match window_count(&config) {
            Ok(n) => n,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Search API: {}", config.search.api_url);
        println!("  Query: {}", config.search.query.statement);
        println!(
            "  Range: {} to {} ({})",
            config.search.query.start_date,
            config.search.query.end_date,
            config.search.query.time_zone
        );
        println!("  Daily Windows: {windows}");
        println!("  Page Size: {}", config.search.page_size);
        println!("  Concurrency: {}", config.application.concurrency);
        println!(
            "  Output: {}/{}_<window start>.csv",
            config.export.output_dir, config.export.filename
        );
        if config.s3.enabled {
            println!("  S3 Bucket: {} ({})", config.s3.bucket, config.s3.region);
            println!("  Delete After Upload: {}", config.s3.delete_on_upload);
        } else {
            println!("  S3 Upload: disabled");
        }
        println!("  Log Level: {}", config.application.log_level);

        Ok(0)
    }
}

fn window_count(config: &ExporterConfig) -> Result<usize> {
    let query = &config.search.query;
    let windows = split_by_day(
        parse_timestamp(&query.start_date)?,
        parse_timestamp(&query.end_date)?,
    )?;
    Ok(windows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_validate_valid_config() {
        let file = write_config(
            r#"
[search]
api_url = "https://api.sumologic.com/api/v1/search/jobs"
access_id = "id"
access_key = "key"

[search.query]
statement = "error"
start_date = "2021-01-01T00:00:00"
end_date = "2021-01-04T00:00:00"
"#,
        );
        let path = file.path().to_string_lossy().to_string();

        let code = ValidateArgs {}
            .execute(&path, load_config(&path))
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_validate_rejects_reversed_range() {
        let file = write_config(
            r#"
[search]
api_url = "https://api.sumologic.com/api/v1/search/jobs"
access_id = "id"
access_key = "key"

[search.query]
statement = "error"
start_date = "2021-01-04T00:00:00"
end_date = "2021-01-01T00:00:00"
"#,
        );
        let path = file.path().to_string_lossy().to_string();

        let code = ValidateArgs {}
            .execute(&path, load_config(&path))
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let path = "/nonexistent/sumo-export.toml";
        let code = ValidateArgs {}
            .execute(path, load_config(path))
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
