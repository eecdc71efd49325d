//! Web Storage Kit (WSK) - a thin adapter over `localStorage`/`sessionStorage`
//!
//! WSK wraps the two key-value stores a host exposes (the browser's
//! `window.localStorage` and `window.sessionStorage`, or stand-ins on native
//! targets) behind one small [`StorageAdapter`](storage::StorageAdapter):
//!
//! - **`storage`** - the adapter, backends, hosts and availability probing
//! - **`config`** - TOML and `.env` configuration of native hosts
//! - **`observability`** - `tracing-subscriber` setup
//!
//! # Features
//!
//! ```toml
//! [dependencies]
//! wsk = { version = "0.1", features = ["web"] }
//! # Persistent native local storage configured from TOML:
//! wsk = { version = "0.1", features = ["config", "file"] }
//! # Or enable everything:
//! wsk = { version = "0.1", features = ["all"] }
//! ```
//!
//! # Example
//!
//! ```rust
//! use wsk::storage::{AdapterError, NativeHost, StorageAdapter};
//!
//! let host = NativeHost::in_memory();
//!
//! let storage = StorageAdapter::with_host(&host, None).unwrap();
//! assert!(storage.local_available());
//! assert!(storage.session_available());
//!
//! storage.set("token", "abc123").unwrap();
//! assert_eq!(storage.get_item("token").as_deref(), Some("abc123"));
//! assert_eq!(storage.key(0usize).as_deref(), Some("token"));
//! assert_eq!(storage.clear(), 1);
//!
//! let err = StorageAdapter::with_host(&host, Some("cookies")).unwrap_err();
//! assert!(matches!(err, AdapterError::InvalidArgument { .. }));
//! ```

#![warn(missing_docs)]

/// Storage adapter, backends and hosts
pub mod storage;

/// Configuration management (enabled with the `config` feature)
#[cfg(feature = "config")]
pub mod config;

/// Observability utilities (enabled with the `observability` feature)
#[cfg(feature = "observability")]
pub mod observability;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::storage::{
        AdapterError, AdapterResult, NativeHost, StorageAdapter, StorageBackend, StorageError,
        StorageHost, StorageKind, StorageResult,
    };

    #[cfg(feature = "config")]
    pub use crate::config::{ConfigurationLoader, EnvironmentLoader, StorageConfig};

    #[cfg(feature = "file")]
    pub use crate::storage::FileBackend;

    #[cfg(all(feature = "web", target_arch = "wasm32"))]
    pub use crate::storage::WindowHost;
}
