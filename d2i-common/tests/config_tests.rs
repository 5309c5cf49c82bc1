//! Unit tests for bootstrap configuration and graceful degradation
//!
//! Tests cover:
//! - Defaults when nothing is configured
//! - Priority order CLI > environment > TOML > defaults
//! - Missing or malformed TOML files never abort resolution
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate D2I_* variables are marked with #[serial].

use d2i_common::config::{
    load_toml_config, ConfigOverrides, ConfigResolver, ConsoleConfig, LoggingConfig, TomlConfig,
    ENV_BACKEND_URL, ENV_LISTEN_ADDR, ENV_LOCALE,
};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

fn clear_env() {
    env::remove_var(ENV_BACKEND_URL);
    env::remove_var(ENV_LISTEN_ADDR);
    env::remove_var(ENV_LOCALE);
}

fn write_toml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn overrides_with_file(path: PathBuf) -> ConfigOverrides {
    ConfigOverrides {
        config_file: Some(path),
        ..Default::default()
    }
}

#[test]
fn test_compiled_defaults() {
    let defaults = ConsoleConfig::default();
    assert_eq!(defaults.backend_url, "http://127.0.0.1:8080");
    assert_eq!(defaults.listen_addr, "127.0.0.1:8090");
    assert_eq!(defaults.locale, "de");
    assert_eq!(defaults.poll_interval, Duration::from_secs(5));
    assert_eq!(defaults.log_level, "info");
}

#[test]
#[serial]
fn test_missing_config_file_uses_defaults() {
    clear_env();
    let resolver = ConfigResolver::new(overrides_with_file(PathBuf::from(
        "/nonexistent/disk2iso/console.toml",
    )));

    assert_eq!(resolver.resolve(), ConsoleConfig::default());
}

#[test]
#[serial]
fn test_toml_values_applied() {
    clear_env();
    let file = write_toml(
        r#"
backend_url = "http://nas.local:8080/"
locale = "en"
poll_interval_secs = 2
request_timeout_secs = 30

[logging]
level = "debug"
"#,
    );

    let config = ConfigResolver::new(overrides_with_file(file.path().to_path_buf())).resolve();

    // Trailing slash stripped so endpoint paths can be appended verbatim
    assert_eq!(config.backend_url, "http://nas.local:8080");
    assert_eq!(config.locale, "en");
    assert_eq!(config.poll_interval, Duration::from_secs(2));
    assert_eq!(config.request_timeout, Duration::from_secs(30));
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.listen_addr, "127.0.0.1:8090");
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    let file = write_toml(r#"backend_url = "http://from-toml:8080""#);
    env::set_var(ENV_BACKEND_URL, "http://from-env:8080");

    let config = ConfigResolver::new(overrides_with_file(file.path().to_path_buf())).resolve();
    assert_eq!(config.backend_url, "http://from-env:8080");

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    env::set_var(ENV_LISTEN_ADDR, "0.0.0.0:9000");

    let resolver = ConfigResolver::new(ConfigOverrides {
        listen_addr: Some("127.0.0.1:9100".to_string()),
        config_file: Some(PathBuf::from("/nonexistent.toml")),
        ..Default::default()
    });
    assert_eq!(resolver.resolve().listen_addr, "127.0.0.1:9100");

    clear_env();
}

#[test]
#[serial]
fn test_invalid_backend_url_falls_back() {
    clear_env();
    let resolver = ConfigResolver::new(ConfigOverrides {
        backend_url: Some("ftp://nope".to_string()),
        config_file: Some(PathBuf::from("/nonexistent.toml")),
        ..Default::default()
    });
    assert_eq!(resolver.resolve().backend_url, "http://127.0.0.1:8080");
}

#[test]
#[serial]
fn test_invalid_cli_backend_url_falls_to_next_tier() {
    clear_env();
    let file = write_toml(r#"backend_url = "http://from-toml:8080/""#);
    let resolver = ConfigResolver::new(ConfigOverrides {
        backend_url: Some("ftp://nope".to_string()),
        ..overrides_with_file(file.path().to_path_buf())
    });
    assert_eq!(resolver.resolve().backend_url, "http://from-toml:8080");

    env::set_var(ENV_BACKEND_URL, "http://from-env:8080");
    assert_eq!(resolver.resolve().backend_url, "http://from-env:8080");

    clear_env();
}

#[test]
#[serial]
fn test_zero_poll_interval_rejected() {
    clear_env();
    let file = write_toml("poll_interval_secs = 0");
    let config = ConfigResolver::new(overrides_with_file(file.path().to_path_buf())).resolve();
    assert_eq!(config.poll_interval, Duration::from_secs(5));
}

#[test]
#[serial]
fn test_malformed_toml_degrades_gracefully() {
    clear_env();
    let file = write_toml("backend_url = [this is not toml");
    let config = ConfigResolver::new(overrides_with_file(file.path().to_path_buf())).resolve();
    assert_eq!(config, ConsoleConfig::default());
}

#[test]
fn test_load_toml_config_partial_file() {
    let file = write_toml(r#"locale = "en""#);
    let parsed = load_toml_config(file.path()).unwrap();

    assert_eq!(
        parsed,
        TomlConfig {
            locale: Some("en".to_string()),
            logging: LoggingConfig::default(),
            ..Default::default()
        }
    );
}

#[test]
fn test_load_toml_config_missing_file_is_config_error() {
    let err = load_toml_config(&PathBuf::from("/nonexistent/console.toml")).unwrap_err();
    assert!(matches!(err, d2i_common::Error::ConfigRead { .. }));
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_load_toml_config_malformed_is_parse_error() {
    let file = write_toml("locale = [");
    let err = load_toml_config(file.path()).unwrap_err();
    assert!(matches!(err, d2i_common::Error::ConfigParse { .. }));
}
