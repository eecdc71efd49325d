//! Configuration management.
//!
//! Hosts and the default storage kind can be described in a TOML file,
//! with environment overrides loaded through `.env` files.
//!
//! # Example
//!
//! ```no_run
//! use wsk::config::{ConfigurationLoader, EnvironmentLoader};
//! use wsk::storage::{NativeHost, StorageAdapter};
//!
//! let env = EnvironmentLoader::new(None);
//! let loader = ConfigurationLoader::from_env(&env).unwrap();
//!
//! let host = NativeHost::from_config(&loader.config).unwrap();
//! let storage = StorageAdapter::from_config(&host, &loader.config).unwrap();
//! storage.set("greeting", "hello").unwrap();
//! ```

pub mod config;
pub mod environment;

// Re-export main types for convenience
pub use self::config::{BackendConfig, ConfigurationLoader, StorageConfig, DEFAULT_CONFIG_PATH};
pub use self::environment::{EnvironmentLoader, CONFIG_PATH_VAR, STORAGE_KIND_VAR};
