//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.

use crate::config::SecretString;
use crate::core::window::parse_timestamp;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Largest page the search job API hands out per request
pub const MAX_PAGE_SIZE: usize = 10_000;

/// Smallest part size S3 accepts for all but the last part of a multipart upload
pub const MIN_PART_SIZE_MB: usize = 5;

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Search job API settings
    pub search: SearchConfig,

    /// Local CSV output settings
    #[serde(default)]
    pub export: OutputConfig,

    /// Optional S3 upload
    #[serde(default)]
    pub s3: S3Config,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ExporterConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value found
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.search.validate()?;
        self.export.validate()?;
        self.s3.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum number of daily search jobs running at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.concurrency == 0 || self.concurrency > 64 {
            return Err(format!(
                "application.concurrency must be between 1 and 64, got {}",
                self.concurrency
            ));
        }

        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            concurrency: default_concurrency(),
        }
    }
}

/// Search job API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search job endpoint, e.g. `https://api.sumologic.com/api/v1/search/jobs`
    pub api_url: String,

    /// Access ID used for Basic authentication
    pub access_id: SecretString,

    /// Access key used for Basic authentication
    pub access_key: SecretString,

    /// Messages requested per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Wait between status checks while the job is still gathering results
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Query definition
    pub query: QueryConfig,
}

impl SearchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.api_url.is_empty() {
            return Err("search.api_url cannot be empty".to_string());
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err("search.api_url must start with http:// or https://".to_string());
        }

        url::Url::parse(&self.api_url)
            .map_err(|e| format!("search.api_url is not a valid URL: {e}"))?;

        if self.access_id.expose_secret().is_empty() {
            return Err("search.access_id cannot be empty".to_string());
        }

        if self.access_key.expose_secret().is_empty() {
            return Err("search.access_key cannot be empty".to_string());
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(format!(
                "search.page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            ));
        }

        if self.timeout_seconds == 0 {
            return Err("search.timeout_seconds must be greater than 0".to_string());
        }

        self.query.validate()
    }
}

/// Query definition shared by every daily window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Query statement
    pub statement: String,

    /// Start of the export range (`YYYY-MM-DDTHH:MM:SS`)
    pub start_date: String,

    /// End of the export range (`YYYY-MM-DDTHH:MM:SS`)
    pub end_date: String,

    /// Time zone the range is interpreted in
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

impl QueryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.statement.trim().is_empty() {
            return Err("search.query.statement cannot be empty".to_string());
        }

        let start = parse_timestamp(&self.start_date)
            .map_err(|e| format!("search.query.start_date: {e}"))?;
        let end =
            parse_timestamp(&self.end_date).map_err(|e| format!("search.query.end_date: {e}"))?;

        if end <= start {
            return Err(format!(
                "search.query.end_date ({}) must be after start_date ({})",
                self.end_date, self.start_date
            ));
        }

        if self.time_zone.trim().is_empty() {
            return Err("search.query.time_zone cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Local CSV output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Filename prefix; each window writes `<filename>_<start>.csv`
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Directory the CSV files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.filename.trim().is_empty() {
            return Err("export.filename cannot be empty".to_string());
        }

        if self.filename.contains('/') || self.filename.contains('\\') {
            return Err(
                "export.filename must be a file prefix; use export.output_dir for directories"
                    .to_string(),
            );
        }

        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename: default_filename(),
            output_dir: default_output_dir(),
        }
    }
}

/// S3 upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// Upload each finished CSV file
    #[serde(default)]
    pub enabled: bool,

    /// Target bucket
    #[serde(default)]
    pub bucket: String,

    /// Bucket region
    #[serde(default = "default_region")]
    pub region: String,

    /// Remove the local CSV file after a successful upload
    #[serde(default)]
    pub delete_on_upload: bool,

    /// Multipart part size in MiB
    #[serde(default = "default_part_size_mb")]
    pub part_size_mb: usize,

    /// Parts uploaded concurrently per file
    #[serde(default = "default_part_concurrency")]
    pub part_concurrency: usize,

    /// Custom endpoint (LocalStack, MinIO)
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Static access key; the default AWS credential chain is used when absent
    #[serde(default)]
    pub access_key_id: Option<SecretString>,

    #[serde(default)]
    pub secret_access_key: Option<SecretString>,
}

impl S3Config {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }

        if self.bucket.trim().is_empty() {
            return Err("s3.bucket cannot be empty when s3.enabled = true".to_string());
        }

        if self.region.trim().is_empty() {
            return Err("s3.region cannot be empty when s3.enabled = true".to_string());
        }

        if self.part_size_mb < MIN_PART_SIZE_MB {
            return Err(format!(
                "s3.part_size_mb must be at least {MIN_PART_SIZE_MB}, got {}",
                self.part_size_mb
            ));
        }

        if self.part_concurrency == 0 || self.part_concurrency > 32 {
            return Err(format!(
                "s3.part_concurrency must be between 1 and 32, got {}",
                self.part_concurrency
            ));
        }

        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(
                "s3.access_key_id and s3.secret_access_key must be set together".to_string(),
            );
        }

        Ok(())
    }

    /// Part size in bytes
    pub fn part_size_bytes(&self) -> usize {
        self.part_size_mb * 1024 * 1024
    }
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            enabled: false,
            bucket: String::new(),
            region: default_region(),
            delete_on_upload: false,
            part_size_mb: default_part_size_mb(),
            part_concurrency: default_part_concurrency(),
            endpoint_url: None,
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to rotating files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation (daily, hourly, never)
    #[serde(default = "default_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_concurrency() -> usize {
    4
}

fn default_page_size() -> usize {
    MAX_PAGE_SIZE
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_filename() -> String {
    "export".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_part_size_mb() -> usize {
    100
}

fn default_part_concurrency() -> usize {
    10
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn search_config() -> SearchConfig {
        SearchConfig {
            api_url: "https://api.sumologic.com/api/v1/search/jobs".to_string(),
            access_id: secret_string("id".to_string()),
            access_key: secret_string("key".to_string()),
            page_size: 10_000,
            poll_interval_ms: 2000,
            timeout_seconds: 120,
            query: QueryConfig {
                statement: "_sourceCategory=prod".to_string(),
                start_date: "2021-01-01T00:00:00".to_string(),
                end_date: "2021-01-03T00:00:00".to_string(),
                time_zone: "UTC".to_string(),
            },
        }
    }

    #[test]
    fn test_search_config_validation() {
        let mut config = search_config();
        assert!(config.validate().is_ok());

        config.api_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config = search_config();
        config.access_key = secret_string(String::new());
        assert!(config.validate().is_err());

        config = search_config();
        config.page_size = 0;
        assert!(config.validate().is_err());

        config.page_size = MAX_PAGE_SIZE + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_query_range_must_be_ordered() {
        let mut config = search_config();
        config.query.end_date = config.query.start_date.clone();
        let err = config.validate().unwrap_err();
        assert!(err.contains("must be after"));
    }

    #[test]
    fn test_query_dates_must_parse() {
        let mut config = search_config();
        config.query.start_date = "2021-01-01".to_string();
        assert!(config.validate().unwrap_err().contains("start_date"));
    }

    #[test]
    fn test_application_concurrency_bounds() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.concurrency = 0;
        assert!(config.validate().is_err());

        config.concurrency = 65;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_s3_disabled_skips_validation() {
        let config = S3Config::default();
        assert!(!config.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_s3_enabled_validation() {
        let mut config = S3Config {
            enabled: true,
            bucket: "logs".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.part_size_mb = 4;
        assert!(config.validate().is_err());

        config.part_size_mb = 5;
        config.access_key_id = Some(secret_string("AKIA".to_string()));
        assert!(config.validate().is_err());

        config.secret_access_key = Some(secret_string("secret".to_string()));
        assert!(config.validate().is_ok());

        config.bucket = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_part_size_bytes() {
        let config = S3Config::default();
        assert_eq!(config.part_size_bytes(), 100 * 1024 * 1024);
    }

    #[test]
    fn test_output_filename_is_a_prefix() {
        let mut config = OutputConfig::default();
        assert!(config.validate().is_ok());

        config.filename = "out/export".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_concurrency(), 4);
        assert_eq!(default_page_size(), 10_000);
        assert_eq!(default_poll_interval_ms(), 2000);
        assert_eq!(default_time_zone(), "UTC");
        assert_eq!(default_part_size_mb(), 100);
        assert_eq!(default_part_concurrency(), 10);
    }
}
