//! Web Storage adapter
//!
//! A thin wrapper over the two key-value stores a host exposes as
//! `localStorage` and `sessionStorage`. Building a [`StorageAdapter`] probes
//! both stores, validates the requested one and binds to it; every data
//! operation then passes straight through to the bound backend.
//!
//! ## Usage
//!
//! ```rust
//! use wsk::storage::{NativeHost, StorageAdapter};
//!
//! let host = NativeHost::in_memory();
//! let storage = StorageAdapter::with_host(&host, Some("sessionStorage")).unwrap();
//!
//! storage.set("theme", "dark").unwrap();
//! assert_eq!(storage.get("theme").as_deref(), Some("dark"));
//! assert_eq!(storage.remove("theme").as_deref(), Some("dark"));
//! assert_eq!(storage.clear(), 0);
//! ```

pub mod adapter;
pub mod backend;
pub mod errors;
pub mod host;
pub mod index;
pub mod kind;
pub mod probe;
pub mod registry;

// Re-export key types for convenience
pub use adapter::StorageAdapter;
pub use backend::{
    MemoryBackend, SharedBackend, StorageBackend, StorageError, StorageResult, DEFAULT_QUOTA,
};
pub use errors::{AdapterError, AdapterResult};
pub use host::{NativeHost, SharedHost, StorageHost};
pub use index::StorageIndex;
pub use kind::StorageKind;
pub use probe::{probe, probe_kind, SENTINEL_KEY};
pub use registry::{default_host, is_registered, register_host};

#[cfg(feature = "file")]
pub use backend::FileBackend;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use backend::WebStorageBackend;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use host::WindowHost;
