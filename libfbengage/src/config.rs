//! Configuration management for fbengage
//!
//! Everything has a built-in default, so the tool runs without any config
//! file. A TOML file can override the HTTP settings, cooldown window and
//! the state-file location.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// User agent presented on every request, both backends
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Linux; Android 10; Mobile) FacebookAutomation/1.0";

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 12;

/// Seconds an identifier stays in cooldown after a successful comment
pub const DEFAULT_COOLDOWN_SECS: i64 = 600;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub limits: LimitsConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub cooldown_secs: i64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// State-file path; `~` is expanded. Default is the platform data dir.
    pub data_file: Option<String>,
}

impl Config {
    /// Load configuration from the default location, falling back to the
    /// built-in defaults when no config file exists
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Resolve the state-file path, honoring the config override
    pub fn resolve_data_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.storage.data_file {
            return Ok(PathBuf::from(shellexpand::tilde(path).to_string()));
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| ConfigError::MissingField("data directory".to_string()))?;

        Ok(data_dir.join("fbengage").join("engagement.json"))
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("FBENGAGE_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("fbengage").join("config.toml"))
}
