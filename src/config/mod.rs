//! Configuration management for sumo-export.
//!
//! TOML configuration with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SUMO_EXPORT_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sumo_export::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("sumo-export.toml")?;
//!
//! println!("Search API: {}", config.search.api_url);
//! println!("Concurrency: {}", config.application.concurrency);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and job concurrency
//! - [`SearchConfig`] - Search API endpoint, credentials, paging and polling
//! - [`QueryConfig`] - Query statement and export time range
//! - [`OutputConfig`] - CSV filename prefix and output directory
//! - [`S3Config`] - Optional upload of finished files
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! concurrency = 4
//!
//! [search]
//! api_url = "https://api.sumologic.com/api/v1/search/jobs"
//! access_id = "${SUMO_ACCESS_ID}"
//! access_key = "${SUMO_ACCESS_KEY}"
//!
//! [search.query]
//! statement = "_sourceCategory=prod/app error"
//! start_date = "2021-01-01T00:00:00"
//! end_date = "2021-01-08T00:00:00"
//! time_zone = "Europe/London"
//!
//! [s3]
//! enabled = true
//! bucket = "log-archive"
//! region = "eu-west-2"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, ExporterConfig, LoggingConfig, OutputConfig, QueryConfig, S3Config,
    SearchConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
