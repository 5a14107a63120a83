//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold ENV_MUTEX so they do not
//! interfere with each other.

use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use sumo_export::config::load_config;
use sumo_export::domain::ExportError;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var("SUMO_EXPORT_APPLICATION_CONCURRENCY");
    std::env::remove_var("SUMO_EXPORT_S3_BUCKET");
    std::env::remove_var("TEST_SUMO_ACCESS_ID");
    std::env::remove_var("TEST_SUMO_ACCESS_KEY");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"
concurrency = 8

[search]
api_url = "https://api.eu.sumologic.com/api/v1/search/jobs"
access_id = "suABC"
access_key = "secret-key"
page_size = 5000
poll_interval_ms = 500
timeout_seconds = 30

[search.query]
statement = "_sourceCategory=prod/app error"
start_date = "2021-01-01T00:00:00"
end_date = "2021-01-08T00:00:00"
time_zone = "Europe/London"

[export]
filename = "errors"
output_dir = "/tmp/exports"

[s3]
enabled = true
bucket = "log-archive"
region = "eu-west-2"
delete_on_upload = true
part_size_mb = 16
part_concurrency = 4

[logging]
local_enabled = true
local_path = "/var/log/sumo-export"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.application.concurrency, 8);
    assert_eq!(config.search.page_size, 5000);
    assert_eq!(config.search.poll_interval_ms, 500);
    assert_eq!(config.search.access_key.expose_secret().as_ref(), "secret-key");
    assert_eq!(config.search.query.time_zone, "Europe/London");
    assert_eq!(config.export.filename, "errors");
    assert!(config.s3.enabled);
    assert!(config.s3.delete_on_upload);
    assert_eq!(config.s3.part_size_bytes(), 16 * 1024 * 1024);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_config_with_env_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_SUMO_ACCESS_ID", "from-env-id");
    std::env::set_var("TEST_SUMO_ACCESS_KEY", "from-env-key");

    let file = write_config(
        r#"
[search]
api_url = "https://api.sumologic.com/api/v1/search/jobs"
access_id = "${TEST_SUMO_ACCESS_ID}"
access_key = "${TEST_SUMO_ACCESS_KEY}"

[search.query]
statement = "error"
start_date = "2021-01-01T00:00:00"
end_date = "2021-01-02T00:00:00"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.search.access_id.expose_secret().as_ref(), "from-env-id");
    assert_eq!(config.search.access_key.expose_secret().as_ref(), "from-env-key");

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[search]
api_url = "https://api.sumologic.com/api/v1/search/jobs"
access_id = "${TEST_SUMO_ACCESS_ID}"
access_key = "key"

[search.query]
statement = "error"
start_date = "2021-01-01T00:00:00"
end_date = "2021-01-02T00:00:00"
"#,
    );

    let err = load_config(file.path()).unwrap_err();

    assert!(matches!(err, ExportError::Configuration(_)));
    assert!(err.to_string().contains("TEST_SUMO_ACCESS_ID"));
}

#[test]
fn test_env_overrides_apply_before_validation() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("SUMO_EXPORT_APPLICATION_CONCURRENCY", "2");
    std::env::set_var("SUMO_EXPORT_S3_BUCKET", "override-bucket");

    let file = write_config(
        r#"
[application]
concurrency = 16

[search]
api_url = "https://api.sumologic.com/api/v1/search/jobs"
access_id = "id"
access_key = "key"

[search.query]
statement = "error"
start_date = "2021-01-01T00:00:00"
end_date = "2021-01-02T00:00:00"

[s3]
enabled = true
"#,
    );

    // Without the bucket override this config would fail validation.
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.concurrency, 2);
    assert_eq!(config.s3.bucket, "override-bucket");

    cleanup_env_vars();
}

#[test]
fn test_invalid_range_fails_validation() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[search]
api_url = "https://api.sumologic.com/api/v1/search/jobs"
access_id = "id"
access_key = "key"

[search.query]
statement = "error"
start_date = "2021-01-02T00:00:00"
end_date = "2021-01-02T00:00:00"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("must be after start_date"));
}

#[test]
fn test_malformed_timestamp_fails_validation() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[search]
api_url = "https://api.sumologic.com/api/v1/search/jobs"
access_id = "id"
access_key = "key"

[search.query]
statement = "error"
start_date = "2021-01-01"
end_date = "2021-01-02T00:00:00"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("start_date"));
}

#[test]
fn test_missing_file() {
    let err = load_config("/nonexistent/sumo-export.toml").unwrap_err();
    assert!(err.to_string().contains("not found"));
}
