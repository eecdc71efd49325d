//! Storage Backend Traits
//!
//! Defines the contract every host-provided key/value store fulfils.

use std::sync::Arc;

use crate::storage::kind::StorageKind;

/// Result type for backend operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Error types surfaced by storage backends
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The write would exceed the backend's capacity
    #[error("Storage quota exceeded{}", quota_detail(.requested, .quota))]
    QuotaExceeded {
        /// Kind of the backend that rejected the write, if known
        kind: Option<StorageKind>,
        /// Total size the backend would hold after the write, if known
        requested: Option<usize>,
        /// Capacity of the backend, if known
        quota: Option<usize>,
    },

    /// The backend exists but refuses access (disabled, denied by policy)
    #[error("Storage disabled: {0}")]
    Disabled(String),

    /// IO error while persisting
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error while persisting
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic backend error
    #[error("Backend error: {0}")]
    Backend(String),
}

fn quota_detail(requested: &Option<usize>, quota: &Option<usize>) -> String {
    match (requested, quota) {
        (Some(requested), Some(quota)) => {
            format!(": {} units requested, quota is {} units", requested, quota)
        }
        (None, Some(quota)) => format!(": quota is {} units", quota),
        (Some(requested), None) => format!(": {} units requested", requested),
        (None, None) => String::new(),
    }
}

impl StorageError {
    /// Whether this error reports an exhausted quota
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded { .. })
    }
}

/// Marker for the thread-safety bound placed on backends.
///
/// Native backends are shared between threads and must be `Send + Sync`.
/// Browser storage handles are neither, and wasm32 runs single threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSendSync: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync + ?Sized> MaybeSendSync for T {}

/// Marker for the thread-safety bound placed on backends.
#[cfg(target_arch = "wasm32")]
pub trait MaybeSendSync {}
#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSendSync for T {}

/// Core trait for storage backends
///
/// Mirrors the Web Storage interface: string keys, string values, a
/// positional key enumeration and a current entry count. Methods take
/// `&self` because a backend is a shared singleton of its host.
pub trait StorageBackend: MaybeSendSync {
    /// Get the backend type name (e.g., "memory", "file", "web")
    fn backend_type(&self) -> &'static str;

    /// Value stored under `key`, or `None` when absent
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`; deleting an absent key is a no-op
    fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Name of the key at `index` in the backend's enumeration order
    fn key(&self, index: usize) -> Option<String>;

    /// Current number of entries
    fn length(&self) -> usize;

    /// Delete every entry
    fn clear(&self) -> StorageResult<()>;
}

/// Shared handle to a host-provided backend
pub type SharedBackend = Arc<dyn StorageBackend>;

/// Size of an entry as browsers account for it: UTF-16 code units of key and value
pub fn entry_size(key: &str, value: &str) -> usize {
    key.encode_utf16().count() + value.encode_utf16().count()
}
