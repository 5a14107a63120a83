//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "sumo-export.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your query and date range", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - SUMO_ACCESS_ID and SUMO_ACCESS_KEY");
                println!("     - AWS credentials if S3 upload is enabled");
                println!("  3. Validate configuration: sumo-export validate-config");
                println!("  4. Preview the daily windows: sumo-export export --dry-run");
                println!("  5. Run export: sumo-export export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Sample configuration with comments
    pub fn sample_config() -> String {
        r#"# sumo-export configuration
#
# Values of the form ${VAR} are read from the environment (or a .env file).
# Any key can also be overridden with SUMO_EXPORT_<SECTION>_<KEY>,
# e.g. SUMO_EXPORT_SEARCH_PAGE_SIZE=5000.

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Daily search jobs running at once (1-64)
concurrency = 4

[search]
# Search job endpoint for your deployment
api_url = "https://api.sumologic.com/api/v1/search/jobs"
access_id = "${SUMO_ACCESS_ID}"
access_key = "${SUMO_ACCESS_KEY}"

# Messages per page (1-10000)
page_size = 10000

# Wait between status checks while a job is still gathering
poll_interval_ms = 2000

# HTTP request timeout
timeout_seconds = 120

[search.query]
statement = "_sourceCategory=prod/app"

# Range to export, split into one job per calendar day
start_date = "2021-01-01T00:00:00"
end_date = "2021-01-03T00:00:00"
time_zone = "UTC"

[export]
# Files are written as <output_dir>/<filename>_<window start>.csv
filename = "export"
output_dir = "."

[s3]
enabled = false
bucket = "my-bucket"
region = "us-east-1"

# Remove the local CSV file once uploaded
delete_on_upload = false

# Files larger than this are sent as multipart uploads (minimum 5)
part_size_mb = 100
part_concurrency = 10

# S3-compatible endpoint (LocalStack, MinIO)
# endpoint_url = "http://localhost:4566"

# Static credentials; the default AWS credential chain is used when omitted
# access_key_id = "${AWS_ACCESS_KEY_ID}"
# secret_access_key = "${AWS_SECRET_ACCESS_KEY}"

[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "logs"

# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
