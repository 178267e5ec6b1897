//! Deployment configuration: where the API lives and which key to send.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use browser_engine::ApiSettings;
use browser_logging::{browser_info, browser_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "company_browser.ron";
pub const ENV_API_URL: &str = "COMPANY_BROWSER_API_URL";
pub const ENV_API_KEY: &str = "COMPANY_BROWSER_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub api_key: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let settings = ApiSettings::default();
        Self {
            base_url: settings.base_url,
            api_key: settings.api_key,
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.as_secs(),
        }
    }
}

impl AppConfig {
    /// Applies environment overrides. `lookup` is `std::env::var` in production.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_URL).filter(|value| !value.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY).filter(|value| !value.trim().is_empty()) {
            self.api_key = key;
        }
        self
    }

    /// A zero timeout would fail every request, so it falls back to the default.
    pub fn api_settings(&self) -> ApiSettings {
        let defaults = ApiSettings::default();
        ApiSettings {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            connect_timeout: timeout_or(
                "connect_timeout_secs",
                self.connect_timeout_secs,
                defaults.connect_timeout,
            ),
            request_timeout: timeout_or(
                "request_timeout_secs",
                self.request_timeout_secs,
                defaults.request_timeout,
            ),
        }
    }
}

fn timeout_or(name: &str, secs: u64, default: Duration) -> Duration {
    if secs == 0 {
        browser_warn!("{} is 0; using {}s", name, default.as_secs());
        return default;
    }
    Duration::from_secs(secs)
}

/// Reads `path`; a missing file means "use the defaults".
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            browser_info!("No config at {:?}; using defaults", path);
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    browser_info!("Loaded config from {:?}", path);
    Ok(config)
}
