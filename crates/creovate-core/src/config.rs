use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, anyhow};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

pub const API_URL_ENV: &str = "CREOVATE_API_URL";
pub const REQUEST_TIMEOUT_ENV: &str = "CREOVATE_REQUEST_TIMEOUT_SECS";

/// On-disk configuration. Every field is optional; missing values fall back
/// to the environment and then to built-in defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the user config directory. A missing file is not an error.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("creovate").join("config.json"))
    }
}

/// Resolved settings the transport is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientSettings {
    /// Environment first, then the config file, then defaults.
    pub fn resolve(config: &Config) -> Self {
        Self::resolve_with(config, |key| std::env::var(key).ok())
    }

    pub fn resolve_with(config: &Config, env: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = env(API_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| config.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = env(REQUEST_TIMEOUT_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .or(config.request_timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
