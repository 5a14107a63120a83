//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ExporterConfig;
use super::secret::secret_string;
use crate::domain::errors::ExportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "SUMO_EXPORT";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`ExporterConfig`]
/// 4. Applies environment variable overrides (`SUMO_EXPORT_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file is missing or unreadable, a
/// referenced variable is unset, parsing fails, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use sumo_export::config::load_config;
///
/// let config = load_config("sumo-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ExportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut config = parse_config(&contents)?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ExportError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    tracing::debug!(path = %path.display(), "Configuration loaded");

    Ok(config)
}

/// Parses configuration text after `${VAR}` substitution, without validating it
pub fn parse_config(contents: &str) -> Result<ExporterConfig> {
    let contents = substitute_env_vars(contents)?;
    toml::from_str(&contents)
        .map_err(|e| ExportError::Configuration(format!("Failed to parse TOML: {e}")))
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ExportError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ExportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{key}")).ok()
}

/// Applies environment variable overrides using the `SUMO_EXPORT_*` prefix
///
/// Variables follow the pattern `SUMO_EXPORT_<SECTION>_<KEY>`, for example
/// `SUMO_EXPORT_SEARCH_ACCESS_KEY` or `SUMO_EXPORT_S3_ENABLED`. Values that
/// fail to parse are ignored.
fn apply_env_overrides(config: &mut ExporterConfig) {
    if let Some(val) = env_override("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env_override("APPLICATION_CONCURRENCY").and_then(|v| v.parse().ok()) {
        config.application.concurrency = val;
    }

    if let Some(val) = env_override("SEARCH_API_URL") {
        config.search.api_url = val;
    }
    if let Some(val) = env_override("SEARCH_ACCESS_ID") {
        config.search.access_id = secret_string(val);
    }
    if let Some(val) = env_override("SEARCH_ACCESS_KEY") {
        config.search.access_key = secret_string(val);
    }
    if let Some(val) = env_override("SEARCH_PAGE_SIZE").and_then(|v| v.parse().ok()) {
        config.search.page_size = val;
    }
    if let Some(val) = env_override("SEARCH_POLL_INTERVAL_MS").and_then(|v| v.parse().ok()) {
        config.search.poll_interval_ms = val;
    }
    if let Some(val) = env_override("SEARCH_QUERY_STATEMENT") {
        config.search.query.statement = val;
    }
    if let Some(val) = env_override("SEARCH_QUERY_START_DATE") {
        config.search.query.start_date = val;
    }
    if let Some(val) = env_override("SEARCH_QUERY_END_DATE") {
        config.search.query.end_date = val;
    }
    if let Some(val) = env_override("SEARCH_QUERY_TIME_ZONE") {
        config.search.query.time_zone = val;
    }

    if let Some(val) = env_override("EXPORT_FILENAME") {
        config.export.filename = val;
    }
    if let Some(val) = env_override("EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }

    if let Some(val) = env_override("S3_ENABLED").and_then(|v| v.parse().ok()) {
        config.s3.enabled = val;
    }
    if let Some(val) = env_override("S3_BUCKET") {
        config.s3.bucket = val;
    }
    if let Some(val) = env_override("S3_REGION") {
        config.s3.region = val;
    }
    if let Some(val) = env_override("S3_DELETE_ON_UPLOAD").and_then(|v| v.parse().ok()) {
        config.s3.delete_on_upload = val;
    }
    if let Some(val) = env_override("S3_ENDPOINT_URL") {
        config.s3.endpoint_url = Some(val);
    }
    if let Some(val) = env_override("S3_ACCESS_KEY_ID") {
        config.s3.access_key_id = Some(secret_string(val));
    }
    if let Some(val) = env_override("S3_SECRET_ACCESS_KEY") {
        config.s3.secret_access_key = Some(secret_string(val));
    }

    if let Some(val) = env_override("LOGGING_LOCAL_ENABLED").and_then(|v| v.parse().ok()) {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env_override("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
