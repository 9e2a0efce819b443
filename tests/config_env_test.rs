//! Environment variable configuration tests.
//!
//! These run serially because they mutate process-wide environment state.

use std::env;

use serial_test::serial;

use equity_report_server::config::{Config, LogFormat};

fn clear_env() {
    for key in [
        "SHEET_BASE_URL",
        "SHEET_API_KEY",
        "SHEET_ID",
        "CACHE_TTL_SECS",
        "LOG_LEVEL",
        "LOG_FORMAT",
        "REQUEST_TIMEOUT_MS",
        "MAX_RETRIES",
        "RETRY_DELAY_MS",
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_config_defaults_without_env() {
    clear_env();

    let config = Config::from_env().unwrap();

    assert!(config.sheet.is_none());
    assert_eq!(config.cache.ttl_secs, 3600);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert_eq!(config.request.timeout_ms, 30000);
    assert_eq!(config.request.max_retries, 3);
    assert_eq!(config.request.retry_delay_ms, 1000);
}

#[test]
#[serial]
fn test_config_sheet_from_env() {
    clear_env();
    env::set_var("SHEET_BASE_URL", "https://sheets.example.com");
    env::set_var("SHEET_API_KEY", "secret");
    env::set_var("SHEET_ID", "quarterly");

    let config = Config::from_env().unwrap();
    let sheet = config.sheet.expect("sheet config");
    assert_eq!(sheet.base_url, "https://sheets.example.com");
    assert_eq!(sheet.api_key.as_deref(), Some("secret"));
    assert_eq!(sheet.sheet_id, "quarterly");

    clear_env();
}

#[test]
#[serial]
fn test_config_sheet_id_defaults_to_reports() {
    clear_env();
    env::set_var("SHEET_BASE_URL", "https://sheets.example.com");

    let config = Config::from_env().unwrap();
    let sheet = config.sheet.expect("sheet config");
    assert_eq!(sheet.sheet_id, "reports");
    assert!(sheet.api_key.is_none());

    clear_env();
}

#[test]
#[serial]
fn test_config_blank_base_url_means_sample_only() {
    clear_env();
    env::set_var("SHEET_BASE_URL", "   ");

    let config = Config::from_env().unwrap();
    assert!(config.sheet.is_none());

    clear_env();
}

#[test]
#[serial]
fn test_config_custom_request_and_cache() {
    clear_env();
    env::set_var("CACHE_TTL_SECS", "60");
    env::set_var("REQUEST_TIMEOUT_MS", "60000");
    env::set_var("MAX_RETRIES", "5");
    env::set_var("RETRY_DELAY_MS", "2000");

    let config = Config::from_env().unwrap();
    assert_eq!(config.cache.ttl_secs, 60);
    assert_eq!(config.request.timeout_ms, 60000);
    assert_eq!(config.request.max_retries, 5);
    assert_eq!(config.request.retry_delay_ms, 2000);

    clear_env();
}

#[test]
#[serial]
fn test_config_rejects_non_numeric_values() {
    clear_env();
    env::set_var("CACHE_TTL_SECS", "soon");

    let err = Config::from_env().unwrap_err();
    assert!(err.to_string().contains("CACHE_TTL_SECS"), "{}", err);

    clear_env();
    env::set_var("MAX_RETRIES", "-1");

    let err = Config::from_env().unwrap_err();
    assert!(err.to_string().contains("MAX_RETRIES"), "{}", err);

    clear_env();
}

#[test]
#[serial]
fn test_config_log_format() {
    clear_env();
    env::set_var("LOG_FORMAT", "JSON");
    env::set_var("LOG_LEVEL", "debug");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.level, "debug");

    env::set_var("LOG_FORMAT", "fancy");
    let config = Config::from_env().unwrap();
    // Unknown formats fall back to pretty
    assert_eq!(config.logging.format, LogFormat::Pretty);

    clear_env();
}
