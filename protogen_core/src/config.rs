//! Panel configuration
//!
//! Values are layered: built-in defaults, then `<config_dir>/protogen/panel.toml`
//! (or an explicit file), then `PROTOGEN_*` environment variables. The binary
//! applies its command-line flags on top of whatever [`PanelConfig::load`]
//! returns.

use crate::error::{PanelError, PanelResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 2000;

const ENV_URL: &str = "PROTOGEN_URL";
const ENV_POLL_INTERVAL: &str = "PROTOGEN_POLL_INTERVAL_MS";
const ENV_TIMEOUT: &str = "PROTOGEN_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Origin of the protogen web server; `/protogen/...` is appended to it
    pub base_url: String,
    /// Period of every sync loop timer
    pub poll_interval_ms: u64,
    /// Per-request timeout
    pub request_timeout_ms: u64,
    /// Sort app ids alphabetically before rendering
    pub sort_apps: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            sort_apps: true,
        }
    }
}

impl PanelConfig {
    /// Default location of the config file, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("protogen").join("panel.toml"))
    }

    /// Load defaults, the config file and environment overrides.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> PanelResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> PanelResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PanelError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config: PanelConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded panel config");
        Ok(config)
    }

    /// Apply `PROTOGEN_*` overrides using the given variable lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> PanelResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_URL) {
            self.base_url = url;
        }
        if let Some(value) = lookup(ENV_POLL_INTERVAL) {
            self.poll_interval_ms = parse_millis(ENV_POLL_INTERVAL, &value)?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT) {
            self.request_timeout_ms = parse_millis(ENV_TIMEOUT, &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> PanelResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(PanelError::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(PanelError::Config(
                "request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            PanelError::Config(format!("Invalid base_url '{}': {}", self.base_url, e))
        })?;
        if url.cannot_be_a_base() {
            return Err(PanelError::Config(format!(
                "base_url '{}' cannot carry a path",
                self.base_url
            )));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn save(&self, path: &Path) -> PanelResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn parse_millis(key: &str, value: &str) -> PanelResult<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| PanelError::Config(format!("{} must be milliseconds: {}", key, e)))
}
