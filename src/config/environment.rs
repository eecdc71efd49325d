//! Environment variable loading and management.

use std::env;
use std::path::{Path, PathBuf};

/// Variable selecting the default storage kind
pub const STORAGE_KIND_VAR: &str = "WSK_STORAGE_KIND";

/// Variable pointing at the configuration file
pub const CONFIG_PATH_VAR: &str = "WSK_CONFIG";

/// Loads environment variables from .env file and system environment.
#[derive(Debug, Clone)]
pub struct EnvironmentLoader {
    env_file: Option<PathBuf>,
}

impl EnvironmentLoader {
    /// Initialize the environment loader.
    ///
    /// # Arguments
    /// * `env_file` - Path to a .env file to load. Nothing is loaded when None.
    pub fn new(env_file: Option<&Path>) -> Self {
        if let Some(path) = env_file {
            if path.exists() {
                if let Err(e) = dotenv::from_path(path) {
                    tracing::warn!(target: "wsk::config", "Failed to load .env file: {}", e);
                }
            }
        }

        Self {
            env_file: env_file.map(|p| p.to_path_buf()),
        }
    }

    /// The .env file this loader was given
    pub fn env_file(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }

    /// Storage kind selector from `WSK_STORAGE_KIND`
    pub fn storage_kind(&self) -> Option<String> {
        env::var(STORAGE_KIND_VAR).ok().filter(|v| !v.is_empty())
    }

    /// Configuration file from `WSK_CONFIG`
    pub fn config_path(&self) -> Option<PathBuf> {
        env::var_os(CONFIG_PATH_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}

impl Default for EnvironmentLoader {
    fn default() -> Self {
        Self::new(None)
    }
}
