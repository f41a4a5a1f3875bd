//! Configuration module
//!
//! Precedence (lowest first): defaults, TOML file, environment, CLI flags.
//! The resolved `Config` is passed to the persistence layer at construction.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Object store prefix; the object key is appended to it
pub const ENV_BASE_URL: &str = "ORACLE_BASE_URL";
/// Local cache file path
pub const ENV_LOCAL_PATH: &str = "MEMORY_FILE_PATH";
/// HTTP timeout for object store calls
pub const ENV_TIMEOUT_SECS: &str = "MEMSYNC_TIMEOUT_SECS";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub local: LocalConfig,
}

/// Object store location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfig {
    /// Prefix for the object key. Empty disables remote sync.
    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_object_name")]
    pub object_name: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            object_name: default_object_name(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_object_name() -> String {
    "copilot-memory.json".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalConfig {
    #[serde(default = "default_local_path")]
    pub path: PathBuf,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            path: default_local_path(),
        }
    }
}

fn default_local_path() -> PathBuf {
    PathBuf::from(".").join("copilot-memory.json")
}

impl Config {
    /// Load config from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Apply environment-style overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.remote.base_url = base_url;
        }

        if let Some(path) = lookup(ENV_LOCAL_PATH).filter(|p| !p.is_empty()) {
            self.local.path = PathBuf::from(path);
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.remote.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", ENV_TIMEOUT_SECS, secs))?;
        }

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
