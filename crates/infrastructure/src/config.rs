//! Client configuration.
//!
//! Values are layered, later sources overriding earlier ones:
//! 1. built-in defaults
//! 2. an optional TOML file (`<config dir>/purse/config.toml` unless a path is given)
//! 3. `PURSE_*` environment variables, e.g. `PURSE_BASE_URL`, `PURSE_REFRESH_TIMEOUT_MS`

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default limit on one token refresh.
pub const DEFAULT_REFRESH_TIMEOUT_MS: u64 = 30_000;

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "PURSE";

const APP_DIR: &str = "purse";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings of the wallet client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the wallet API, including the version prefix.
    pub base_url: String,
    /// Timeout of a single HTTP request, in milliseconds.
    pub request_timeout_ms: u64,
    /// Timeout of a token refresh, in milliseconds. `0` disables it.
    pub refresh_timeout_ms: u64,
    /// Where tokens are stored.
    pub credentials_path: PathBuf,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            refresh_timeout_ms: DEFAULT_REFRESH_TIMEOUT_MS,
            credentials_path: default_credentials_path(),
            user_agent: format!("purse/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default file location and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(default_config_path().as_deref())
    }

    /// Loads configuration from `file` (if it exists) and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value is invalid.
    pub fn load_from(file: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("request_timeout_ms", defaults.request_timeout_ms)?
            .set_default("refresh_timeout_ms", defaults.refresh_timeout_ms)?
            .set_default(
                "credentials_path",
                defaults.credentials_path.to_string_lossy().into_owned(),
            )?
            .set_default("user_agent", defaults.user_agent)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let config: Self = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url {:?}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Refresh timeout, `None` when disabled.
    #[must_use]
    pub const fn refresh_timeout(&self) -> Option<Duration> {
        if self.refresh_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.refresh_timeout_ms))
        }
    }
}

/// `<config dir>/purse/config.toml`, if the platform has a config dir.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// `<data dir>/purse/credentials.json`, falling back to the working directory.
#[must_use]
pub fn default_credentials_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("credentials.json")
}
