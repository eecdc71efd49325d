//! Storage hosts.
//!
//! A host plays the part of the browser's global object: it exposes one
//! backend per [`StorageKind`], either of which may be missing.

use std::sync::{Arc, RwLock};

use super::backend::{MaybeSendSync, MemoryBackend, SharedBackend, DEFAULT_QUOTA};
use super::kind::StorageKind;

/// Provider of the two named storage backends
pub trait StorageHost: MaybeSendSync {
    /// Backend for `kind`, or `None` when the host does not expose one
    fn storage(&self, kind: StorageKind) -> Option<SharedBackend>;
}

/// Shared handle to a host
pub type SharedHost = Arc<dyn StorageHost>;

impl<H: StorageHost + ?Sized> StorageHost for Arc<H> {
    fn storage(&self, kind: StorageKind) -> Option<SharedBackend> {
        (**self).storage(kind)
    }
}

/// Host with two replaceable backend slots
///
/// Used on native targets and in tests. Detaching a slot models a browser
/// where the storage property has been deleted from the window.
pub struct NativeHost {
    local: RwLock<Option<SharedBackend>>,
    session: RwLock<Option<SharedBackend>>,
}

impl NativeHost {
    /// Create a host exposing the given backends
    pub fn new(local: SharedBackend, session: SharedBackend) -> Self {
        Self {
            local: RwLock::new(Some(local)),
            session: RwLock::new(Some(session)),
        }
    }

    /// Create a host exposing no backends at all
    pub fn empty() -> Self {
        Self {
            local: RwLock::new(None),
            session: RwLock::new(None),
        }
    }

    /// Create a host backed by two in-memory stores with the default quota
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryBackend::with_quota(DEFAULT_QUOTA).for_kind(StorageKind::Local)),
            Arc::new(MemoryBackend::with_quota(DEFAULT_QUOTA).for_kind(StorageKind::Session)),
        )
    }

    /// Install `backend` for `kind`, returning the one it replaces
    pub fn attach(&self, kind: StorageKind, backend: SharedBackend) -> Option<SharedBackend> {
        let mut slot = self.slot(kind).write().unwrap_or_else(|p| p.into_inner());
        slot.replace(backend)
    }

    /// Remove the backend for `kind`, returning it so it can be re-attached
    pub fn detach(&self, kind: StorageKind) -> Option<SharedBackend> {
        let mut slot = self.slot(kind).write().unwrap_or_else(|p| p.into_inner());
        slot.take()
    }

    fn slot(&self, kind: StorageKind) -> &RwLock<Option<SharedBackend>> {
        match kind {
            StorageKind::Local => &self.local,
            StorageKind::Session => &self.session,
        }
    }
}

impl Default for NativeHost {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl StorageHost for NativeHost {
    fn storage(&self, kind: StorageKind) -> Option<SharedBackend> {
        self.slot(kind)
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[cfg(feature = "config")]
impl NativeHost {
    /// Build a host from configuration
    ///
    /// Each backend is an in-memory store unless a `path` is configured, in
    /// which case it is a file backend. Disabled backends are built so that
    /// every write fails and probing reports them unavailable.
    pub fn from_config(config: &crate::config::StorageConfig) -> anyhow::Result<Self> {
        let local = build_backend(StorageKind::Local, &config.local)?;
        let session = build_backend(StorageKind::Session, &config.session)?;
        Ok(Self::new(local, session))
    }
}

#[cfg(feature = "config")]
fn build_backend(
    kind: StorageKind,
    config: &crate::config::BackendConfig,
) -> anyhow::Result<SharedBackend> {
    if !config.enabled {
        tracing::debug!(target: "wsk::storage", "{} disabled by configuration", kind);
        return Ok(Arc::new(MemoryBackend::disabled().for_kind(kind)));
    }

    let quota = config.quota.unwrap_or(DEFAULT_QUOTA);

    match &config.path {
        None => Ok(Arc::new(MemoryBackend::with_quota(quota).for_kind(kind))),
        #[cfg(feature = "file")]
        Some(path) => {
            use anyhow::Context;
            let backend = super::backend::FileBackend::open_shared(path, Some(quota), Some(kind))
                .with_context(|| format!("Failed to open {} at {}", kind, path.display()))?;
            Ok(backend)
        }
        #[cfg(not(feature = "file"))]
        Some(path) => anyhow::bail!(
            "{} is configured with path {} but file backend support is not enabled",
            kind,
            path.display()
        ),
    }
}

/// Host resolving the browser window's storage objects on every call
#[cfg(all(feature = "web", target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowHost;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
impl StorageHost for WindowHost {
    fn storage(&self, kind: StorageKind) -> Option<SharedBackend> {
        super::backend::WebStorageBackend::from_window(kind)
            .map(|backend| Arc::new(backend) as SharedBackend)
    }
}
