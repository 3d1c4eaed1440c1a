use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, info};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

use crate::services::history::default_history_path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Transformation service settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Share link settings
    #[serde(default)]
    pub share: ShareConfig,

    /// Session timing settings
    #[serde(default)]
    pub session: SessionConfig,

    /// History store settings
    #[serde(default)]
    pub history: HistoryConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Remote service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceConfig {
    /// Base URL of the cipher and share service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Share link configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ShareConfig {
    /// Base URL that generated share links point at
    #[serde(default = "default_share_base_url")]
    pub base_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_share_base_url(),
        }
    }
}

/// Session timing configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionConfig {
    /// Quiet period in milliseconds before a request is sent
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// History configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HistoryConfig {
    /// History file, defaults to the user's data directory
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Maximum number of stored sessions
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_entries: default_max_entries(),
        }
    }
}

impl HistoryConfig {
    /// Configured path or the default location
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_history_path)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_share_base_url() -> String {
    "https://mindall.herokuapp.com/".to_string()
}

fn default_debounce_ms() -> u64 {
    1000
}

fn default_max_entries() -> usize {
    50
}

impl Config {
    /// Load a configuration file, writing the defaults if it does not exist
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            info!("Created default configuration at {}", path.display());
            return Ok(config);
        }

        let file = File::open(path).context(format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config =
            serde_json::from_reader(reader).context(format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context(format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).context(format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.service.endpoint.trim().is_empty() {
            return Err(anyhow!("Service endpoint must not be empty"));
        }
        Url::parse(&self.service.endpoint).context(format!("Invalid service endpoint: {}", self.service.endpoint))?;
        Url::parse(&self.share.base_url).context(format!("Invalid share base URL: {}", self.share.base_url))?;

        if self.session.debounce_ms == 0 {
            return Err(anyhow!("Debounce period must be greater than zero"));
        }
        if self.history.max_entries == 0 {
            return Err(anyhow!("History must keep at least one entry"));
        }
        Ok(())
    }
}
