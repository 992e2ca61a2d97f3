//! Configuration file layering.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use purse_infrastructure::config::DEFAULT_BASE_URL;
use purse_infrastructure::{ClientConfig, ConfigError};
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    //* Given
    let dir = TempDir::new().unwrap();

    //* When
    let config = ClientConfig::load_from(Some(&dir.path().join("absent.toml"))).unwrap();

    //* Then
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.refresh_timeout(), Some(Duration::from_secs(30)));
}

#[test]
fn file_overrides_defaults() {
    //* Given
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
base_url = "https://wallet.example.com/api/v1"
refresh_timeout_ms = 0
credentials_path = "/tmp/purse-test/credentials.json"
"#,
    )
    .unwrap();

    //* When
    let config = ClientConfig::load_from(Some(&path)).unwrap();

    //* Then
    assert_eq!(config.base_url, "https://wallet.example.com/api/v1");
    assert_eq!(config.refresh_timeout(), None);
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert_eq!(
        config.credentials_path.to_str(),
        Some("/tmp/purse-test/credentials.json")
    );
}

#[test]
fn invalid_values_are_rejected() {
    //* Given
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "base_url = \"not a url\"\n").unwrap();

    //* When
    let result = ClientConfig::load_from(Some(&path));

    //* Then
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn malformed_file_is_a_load_error() {
    //* Given
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "request_timeout_ms = \"soon\"\n").unwrap();

    //* When
    let result = ClientConfig::load_from(Some(&path));

    //* Then
    assert!(matches!(result, Err(ConfigError::Load(_))));
}
