//! Browser Storage Backend
//!
//! Wraps the `Storage` objects the browser exposes as `window.localStorage`
//! and `window.sessionStorage`.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

use super::traits::{StorageBackend, StorageError, StorageResult};
use crate::storage::kind::StorageKind;

/// Backend bound to one of the window's `Storage` objects
pub struct WebStorageBackend {
    storage: Storage,
    kind: StorageKind,
}

impl WebStorageBackend {
    /// Wrap a `Storage` object obtained from the window
    pub fn new(storage: Storage, kind: StorageKind) -> Self {
        Self { storage, kind }
    }

    /// Resolve the window's storage for `kind`
    ///
    /// Returns `None` when there is no window, the property is missing, or
    /// the getter throws (storage blocked by the user agent).
    pub fn from_window(kind: StorageKind) -> Option<Self> {
        let window = web_sys::window()?;
        let storage = match kind {
            StorageKind::Local => window.local_storage(),
            StorageKind::Session => window.session_storage(),
        };
        storage.ok()?.map(|storage| Self::new(storage, kind))
    }

    /// Storage kind this backend serves
    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    fn map_error(&self, error: JsValue) -> StorageError {
        match error.dyn_ref::<DomException>() {
            Some(exception) if exception.name() == "QuotaExceededError" => {
                StorageError::QuotaExceeded {
                    kind: Some(self.kind),
                    requested: None,
                    quota: None,
                }
            }
            Some(exception) => {
                StorageError::Disabled(format!("{}: {}", exception.name(), exception.message()))
            }
            None => StorageError::Backend(format!("{:?}", error)),
        }
    }
}

impl StorageBackend for WebStorageBackend {
    fn backend_type(&self) -> &'static str {
        "web"
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| self.map_error(e))
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| self.map_error(e))
    }

    fn key(&self, index: usize) -> Option<String> {
        let index = u32::try_from(index).ok()?;
        self.storage.key(index).ok().flatten()
    }

    fn length(&self) -> usize {
        self.storage.length().map(|len| len as usize).unwrap_or(0)
    }

    fn clear(&self) -> StorageResult<()> {
        self.storage.clear().map_err(|e| self.map_error(e))
    }
}
