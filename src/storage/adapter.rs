//! The storage adapter.

use std::fmt;

use super::backend::{SharedBackend, StorageBackend, StorageResult};
use super::errors::{AdapterError, AdapterResult};
use super::host::StorageHost;
use super::index::StorageIndex;
use super::kind::StorageKind;
use super::probe::probe_kind;
use super::registry::default_host;

/// Uniform get/set/remove/key/clear access to one of a host's backends
///
/// Both backends are probed when the adapter is built and the results are
/// kept as [`local_available`](Self::local_available) and
/// [`session_available`](Self::session_available). An adapter only exists
/// when the backend it binds to passed its probe.
///
/// Adapters bound to the same host and kind share one key space.
#[derive(Clone)]
pub struct StorageAdapter {
    kind: StorageKind,
    local_available: bool,
    session_available: bool,
    backend: SharedBackend,
}

impl StorageAdapter {
    /// Build an adapter on the process-wide default host
    ///
    /// # Arguments
    /// * `selector` - `"localStorage"` or `"sessionStorage"`. `None` selects
    ///   `"localStorage"`.
    pub fn new(selector: Option<&str>) -> AdapterResult<Self> {
        let host = default_host();
        Self::with_host(&*host, selector)
    }

    /// Build an adapter on `host`
    ///
    /// # Errors
    /// * [`AdapterError::InvalidArgument`] - `selector` names neither kind.
    /// * [`AdapterError::Unavailable`] - the selected backend failed its probe.
    pub fn with_host<H: StorageHost + ?Sized>(
        host: &H,
        selector: Option<&str>,
    ) -> AdapterResult<Self> {
        let local_available = probe_kind(host, StorageKind::Local);
        let session_available = probe_kind(host, StorageKind::Session);

        let kind = match selector {
            None => StorageKind::default(),
            Some(selector) => selector.parse()?,
        };

        Self::bind(host, kind, local_available, session_available)
    }

    /// Build an adapter on `host` for an already typed `kind`
    pub fn with_kind<H: StorageHost + ?Sized>(host: &H, kind: StorageKind) -> AdapterResult<Self> {
        let local_available = probe_kind(host, StorageKind::Local);
        let session_available = probe_kind(host, StorageKind::Session);

        Self::bind(host, kind, local_available, session_available)
    }

    /// Build an adapter on `host` for the configured default kind
    #[cfg(feature = "config")]
    pub fn from_config<H: StorageHost + ?Sized>(
        host: &H,
        config: &crate::config::StorageConfig,
    ) -> AdapterResult<Self> {
        Self::with_kind(host, config.default_kind)
    }

    fn bind<H: StorageHost + ?Sized>(
        host: &H,
        kind: StorageKind,
        local_available: bool,
        session_available: bool,
    ) -> AdapterResult<Self> {
        let available = match kind {
            StorageKind::Local => local_available,
            StorageKind::Session => session_available,
        };
        if !available {
            return Err(AdapterError::unavailable(kind));
        }

        let backend = host
            .storage(kind)
            .ok_or_else(|| AdapterError::unavailable(kind))?;

        tracing::debug!(
            target: "wsk::storage",
            "Bound adapter to {} ({} backend)",
            kind,
            backend.backend_type()
        );

        Ok(Self {
            kind,
            local_available,
            session_available,
            backend,
        })
    }

    /// Kind of the bound backend
    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    /// Selector name of the bound backend
    pub fn storage_type(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Whether the local backend passed its probe at construction
    pub fn local_available(&self) -> bool {
        self.local_available
    }

    /// Whether the session backend passed its probe at construction
    pub fn session_available(&self) -> bool {
        self.session_available
    }

    /// The bound backend
    pub fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }

    /// Value stored under `key`, or `None` when absent
    pub fn get(&self, key: &str) -> Option<String> {
        tracing::trace!(target: "wsk::storage", "get {}", key);
        self.backend.get_item(key)
    }

    /// Alias of [`get`](Self::get)
    #[inline]
    pub fn get_item(&self, key: &str) -> Option<String> {
        self.get(key)
    }

    /// Store `value` under `key`, replacing any existing value
    ///
    /// Returns the value written. Backend failures such as an exhausted
    /// quota are returned unchanged.
    pub fn set(&self, key: &str, value: &str) -> StorageResult<String> {
        tracing::trace!(target: "wsk::storage", "set {}", key);
        self.backend.set_item(key, value)?;
        Ok(value.to_string())
    }

    /// Alias of [`set`](Self::set)
    #[inline]
    pub fn set_item(&self, key: &str, value: &str) -> StorageResult<String> {
        self.set(key, value)
    }

    /// Delete `key`, returning the value it held
    ///
    /// Returns `None` without touching the backend when `key` is absent, and
    /// also when the backend fails to delete it.
    pub fn remove(&self, key: &str) -> Option<String> {
        tracing::trace!(target: "wsk::storage", "remove {}", key);
        let value = self.backend.get_item(key)?;
        if let Err(e) = self.backend.remove_item(key) {
            tracing::warn!(target: "wsk::storage", "Failed to remove {} from {}: {}", key, self.kind, e);
            return None;
        }
        Some(value)
    }

    /// Alias of [`remove`](Self::remove)
    #[inline]
    pub fn remove_item(&self, key: &str) -> Option<String> {
        self.remove(key)
    }

    /// Name of the key at `index` in the backend's enumeration order
    ///
    /// The order is backend defined and may shift when entries are added or
    /// removed. Negative, non-finite and out-of-range indices yield `None`.
    pub fn key<I: StorageIndex>(&self, index: I) -> Option<String> {
        let index = index.to_index()?;
        self.backend.key(index)
    }

    /// Delete every entry, returning how many were removed
    ///
    /// When the backend fails to clear, only entries that are actually gone
    /// are counted.
    pub fn clear(&self) -> usize {
        let count = self.backend.length();
        if let Err(e) = self.backend.clear() {
            tracing::warn!(target: "wsk::storage", "Failed to clear {}: {}", self.kind, e);
            return count.saturating_sub(self.backend.length());
        }
        tracing::trace!(target: "wsk::storage", "cleared {} entries from {}", count, self.kind);
        count
    }

    /// Current number of entries
    pub fn len(&self) -> usize {
        self.backend.length()
    }

    /// Whether the backend holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every key in enumeration order
    pub fn keys(&self) -> Vec<String> {
        (0..self.backend.length())
            .filter_map(|index| self.backend.key(index))
            .collect()
    }
}

impl fmt::Debug for StorageAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageAdapter")
            .field("kind", &self.kind)
            .field("local_available", &self.local_available)
            .field("session_available", &self.session_available)
            .field("backend", &self.backend.backend_type())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::backend::{MemoryBackend, StorageError};
    use crate::storage::host::NativeHost;
    use crate::storage::probe::SENTINEL_KEY;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Memory backend whose deletes start failing once frozen
    #[derive(Default)]
    struct Freezable {
        inner: MemoryBackend,
        frozen: AtomicBool,
    }

    impl Freezable {
        fn check(&self) -> StorageResult<()> {
            if self.frozen.load(Ordering::SeqCst) {
                return Err(StorageError::Backend("read-only".to_string()));
            }
            Ok(())
        }
    }

    impl StorageBackend for Freezable {
        fn backend_type(&self) -> &'static str {
            "freezable"
        }
        fn get_item(&self, key: &str) -> Option<String> {
            self.inner.get_item(key)
        }
        fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
            self.inner.set_item(key, value)
        }
        fn remove_item(&self, key: &str) -> StorageResult<()> {
            self.check()?;
            self.inner.remove_item(key)
        }
        fn key(&self, index: usize) -> Option<String> {
            self.inner.key(index)
        }
        fn length(&self) -> usize {
            self.inner.length()
        }
        fn clear(&self) -> StorageResult<()> {
            self.check()?;
            self.inner.clear()
        }
    }

    fn adapter() -> (NativeHost, StorageAdapter) {
        let host = NativeHost::in_memory();
        let adapter = StorageAdapter::with_host(&host, None).unwrap();
        (host, adapter)
    }

    #[test]
    fn test_constructor_accepts_both_selectors() {
        let host = NativeHost::in_memory();

        let local = StorageAdapter::with_host(&host, Some("localStorage")).unwrap();
        assert_eq!(local.kind(), StorageKind::Local);
        assert_eq!(local.storage_type(), "localStorage");

        let session = StorageAdapter::with_host(&host, Some("sessionStorage")).unwrap();
        assert_eq!(session.kind(), StorageKind::Session);
        assert_eq!(session.storage_type(), "sessionStorage");

        let default = StorageAdapter::with_host(&host, None).unwrap();
        assert_eq!(default.kind(), StorageKind::Local);
        assert!(default.local_available());
        assert!(default.session_available());
    }

    #[test]
    fn test_constructor_rejects_unknown_selector() {
        let host = NativeHost::in_memory();
        let err = StorageAdapter::with_host(&host, Some("0")).unwrap_err();
        assert_eq!(err, AdapterError::invalid_argument("0"));
        assert!(err
            .to_string()
            .contains("Constructor only accepts \"localStorage\" and \"sessionStorage\""));
    }

    #[test]
    fn test_constructor_rejects_unavailable_backend() {
        let host = NativeHost::in_memory();
        let local = host.detach(StorageKind::Local).unwrap();

        let err = StorageAdapter::with_host(&host, None).unwrap_err();
        assert_eq!(err, AdapterError::unavailable(StorageKind::Local));
        let err = StorageAdapter::with_host(&host, Some("localStorage")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"localStorage\" not enabled or available in the current browser."
        );

        // Session is unaffected
        let session = StorageAdapter::with_host(&host, Some("sessionStorage")).unwrap();
        assert!(!session.local_available());
        assert!(session.session_available());

        host.attach(StorageKind::Local, local.clone());
        assert_eq!(local.length(), 0);
        assert!(StorageAdapter::with_host(&host, None).is_ok());
    }

    #[test]
    fn test_invalid_selector_wins_over_availability() {
        let host = NativeHost::empty();
        let err = StorageAdapter::with_host(&host, Some("cookies")).unwrap_err();
        assert!(matches!(err, AdapterError::InvalidArgument { .. }));
    }

    #[test]
    fn test_zero_quota_backend_is_unavailable() {
        let host = NativeHost::in_memory();
        host.attach(StorageKind::Session, Arc::new(MemoryBackend::with_quota(0)));

        let err = StorageAdapter::with_kind(&host, StorageKind::Session).unwrap_err();
        assert_eq!(err, AdapterError::unavailable(StorageKind::Session));

        let local = StorageAdapter::with_kind(&host, StorageKind::Local).unwrap();
        assert!(!local.session_available());
    }

    #[test]
    fn test_construction_leaves_no_sentinel() {
        let (host, adapter) = adapter();
        assert_eq!(adapter.get(SENTINEL_KEY), None);
        assert!(adapter.is_empty());
        let session = host.storage(StorageKind::Session).unwrap();
        assert_eq!(session.length(), 0);
    }

    #[test]
    fn test_get_missing_key() {
        let (_host, adapter) = adapter();
        assert_eq!(adapter.get("a key that does not exist"), None);
        assert_eq!(adapter.get_item("a key that does not exist"), None);
    }

    #[test]
    fn test_set_and_overwrite() {
        let (host, adapter) = adapter();
        let backend = host.storage(StorageKind::Local).unwrap();

        assert_eq!(adapter.set("key", "value").unwrap(), "value");
        assert_eq!(backend.get_item("key"), Some("value".to_string()));

        assert_eq!(adapter.set_item("key", "value2").unwrap(), "value2");
        assert_eq!(backend.get_item("key"), Some("value2".to_string()));
        assert_eq!(adapter.get("key"), adapter.get_item("key"));
    }

    #[test]
    fn test_set_propagates_quota_error() {
        let host = NativeHost::in_memory();
        host.attach(
            StorageKind::Local,
            Arc::new(MemoryBackend::with_quota(40).for_kind(StorageKind::Local)),
        );
        let adapter = StorageAdapter::with_host(&host, None).unwrap();

        adapter.set("k", "small").unwrap();
        let err = adapter.set("k2", &"x".repeat(64)).unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                kind: Some(StorageKind::Local),
                ..
            }
        ));
        assert_eq!(adapter.get("k2"), None);
    }

    #[test]
    fn test_remove_returns_previous_value() {
        let (_host, adapter) = adapter();
        adapter.set("key", "value").unwrap();

        assert_eq!(adapter.remove("key"), Some("value".to_string()));
        assert_eq!(adapter.get("key"), None);

        assert_eq!(adapter.remove("key"), None);
        assert_eq!(adapter.remove_item("missing"), None);
        assert!(adapter.is_empty());
    }

    #[test]
    fn test_key_enumeration() {
        let (_host, adapter) = adapter();
        adapter.set("one", "1").unwrap();
        adapter.set("two", "2").unwrap();
        adapter.set("three", "3").unwrap();

        let keys: HashSet<String> = (0..3usize).filter_map(|i| adapter.key(i)).collect();
        let expected: HashSet<String> = ["one", "two", "three"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(keys, expected);
        assert_eq!(adapter.keys().len(), 3);

        assert_eq!(adapter.key(3usize), None);
        assert_eq!(adapter.key(-1i32), None);
        assert_eq!(adapter.key(f64::INFINITY), None);
        assert_eq!(adapter.key(f64::NEG_INFINITY), None);
        assert_eq!(adapter.key(f64::NAN), None);
        assert!(adapter.key(0.0f64).is_some());
    }

    #[test]
    fn test_clear_returns_previous_count() {
        let (_host, adapter) = adapter();
        adapter.set("a", "1").unwrap();
        adapter.set("b", "2").unwrap();
        adapter.set("c", "3").unwrap();

        assert_eq!(adapter.clear(), 3);
        assert_eq!(adapter.len(), 0);
        assert_eq!(adapter.key(0usize), None);
        assert_eq!(adapter.clear(), 0);
    }

    #[test]
    fn test_failed_deletes_are_not_reported_as_done() {
        let backend = Arc::new(Freezable::default());
        let host = NativeHost::in_memory();
        host.attach(StorageKind::Local, backend.clone());
        let adapter = StorageAdapter::with_host(&host, None).unwrap();

        adapter.set("a", "1").unwrap();
        adapter.set("b", "2").unwrap();
        adapter.set("c", "3").unwrap();
        backend.frozen.store(true, Ordering::SeqCst);

        assert_eq!(adapter.remove("a"), None);
        assert_eq!(adapter.get("a"), Some("1".to_string()));

        assert_eq!(adapter.clear(), 0);
        assert_eq!(adapter.len(), 3);

        backend.frozen.store(false, Ordering::SeqCst);
        assert_eq!(adapter.remove("a"), Some("1".to_string()));
        assert_eq!(adapter.clear(), 2);
    }

    #[test]
    fn test_adapters_share_backend() {
        let host = NativeHost::in_memory();
        let first = StorageAdapter::with_host(&host, None).unwrap();
        let second = StorageAdapter::with_host(&host, Some("localStorage")).unwrap();
        let session = StorageAdapter::with_host(&host, Some("sessionStorage")).unwrap();

        first.set("shared", "yes").unwrap();
        assert_eq!(second.get("shared"), Some("yes".to_string()));
        assert_eq!(session.get("shared"), None);

        // Last write wins
        second.set("shared", "no").unwrap();
        assert_eq!(first.get("shared"), Some("no".to_string()));
    }

    #[test]
    fn test_debug_output() {
        let (_host, adapter) = adapter();
        let debug = format!("{:?}", adapter);
        assert!(debug.contains("Local"));
        assert!(debug.contains("memory"));
    }
}
