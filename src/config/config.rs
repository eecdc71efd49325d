//! Configuration structures and TOML loading.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::environment::EnvironmentLoader;
use crate::storage::StorageKind;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/storage.toml";

/// Top-level storage configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Kind selected when an adapter is built from configuration
    pub default_kind: StorageKind,
    /// Local (persistent) backend
    pub local: BackendConfig,
    /// Session backend
    pub session: BackendConfig,
}

/// Configuration of one backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// A disabled backend exists but rejects every write
    pub enabled: bool,
    /// Capacity in UTF-16 code units; the default quota when omitted
    pub quota: Option<usize>,
    /// File to persist entries to; in-memory when omitted
    pub path: Option<PathBuf>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            quota: None,
            path: None,
        }
    }
}

/// Loads [`StorageConfig`] from a TOML file.
#[derive(Debug, Clone)]
pub struct ConfigurationLoader {
    config_path: PathBuf,
    /// Loaded configuration
    pub config: StorageConfig,
}

impl ConfigurationLoader {
    /// Initialize configuration loader.
    ///
    /// # Arguments
    /// * `config_path` - Path to TOML config file. If None, uses
    ///   `config/storage.toml`. A missing file yields the default config.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config_path = config_path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let config = if config_path.exists() {
            Self::load_config(&config_path)?
        } else {
            tracing::debug!(
                target: "wsk::config",
                "No config at {}, using defaults",
                config_path.display()
            );
            StorageConfig::default()
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Create a configuration loader from a pre-built configuration.
    pub fn from_config(config: StorageConfig) -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            config,
        }
    }

    /// Load configuration using environment overrides.
    ///
    /// `WSK_CONFIG` chooses the file and `WSK_STORAGE_KIND` replaces the
    /// configured default kind.
    pub fn from_env(env: &EnvironmentLoader) -> Result<Self> {
        let config_path = env.config_path();
        let mut loader = Self::new(config_path.as_deref())?;

        if let Some(kind) = env.storage_kind() {
            loader.config.default_kind = kind
                .parse()
                .with_context(|| format!("Invalid WSK_STORAGE_KIND value: {}", kind))?;
        }

        Ok(loader)
    }

    /// Path the configuration was (or would have been) read from
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration from TOML file.
    fn load_config(path: &Path) -> Result<StorageConfig> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }
}
