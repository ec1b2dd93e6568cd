use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

pub const CONFIG_PATH_ENV: &str = "SENTIVIEW_CONFIG";
pub const API_URL_ENV: &str = "SENTIVIEW_API_URL";
const DEFAULT_CONFIG_FILE: &str = "sentiview.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub retry: RetrySettings,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_secs: 30,
            user_agent: concat!("sentiview/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Backoff settings for idempotent GET requests. `max_attempts = 1`
/// means a failed request is reported straight away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter_factor: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
            jitter_factor: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub language: String,
    pub keyword_debounce_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            keyword_debounce_ms: 500,
        }
    }
}

impl AppConfig {
    /// Loads from `$SENTIVIEW_CONFIG`, falling back to `./sentiview.toml`.
    /// A missing default file is not an error; a missing explicit one is.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        if let Ok(base_url) = std::env::var(API_URL_ENV) {
            info!("Overriding API base URL from {}", API_URL_ENV);
            config.api.base_url = base_url;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        info!("Loading configuration from {}", path.display());
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_base_url()?;

        if self.api.timeout_secs == 0 {
            return Err(invalid("api.timeout_secs", self.api.timeout_secs));
        }
        if self.retry.max_attempts == 0 {
            return Err(invalid("retry.max_attempts", self.retry.max_attempts));
        }
        if !(0.0..=1.0).contains(&self.retry.jitter_factor) {
            return Err(invalid("retry.jitter_factor", self.retry.jitter_factor));
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(invalid("retry.base_delay_ms", self.retry.base_delay_ms));
        }
        if !matches!(self.ui.language.as_str(), "en" | "lt") {
            return Err(invalid("ui.language", &self.ui.language));
        }
        Ok(())
    }

    /// The API base URL with a trailing slash, ready for `Url::join`.
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        let trimmed = self.api.base_url.trim();
        if trimmed.is_empty() {
            return Err(invalid("api.base_url", trimmed));
        }
        let with_slash = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{}/", trimmed)
        };
        let url = Url::parse(&with_slash).map_err(|_| invalid("api.base_url", trimmed))?;
        if url.cannot_be_a_base() {
            return Err(invalid("api.base_url", trimmed));
        }
        Ok(url)
    }
}

fn invalid(field: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}
