//! Availability probing.
//!
//! A backend object can exist and still refuse every write (zero quota,
//! storage disabled by policy). The probe writes a sentinel entry and
//! removes it again; only a backend that accepts both the write and the
//! removal counts as available. A backend that silently drops writes passes
//! the probe.

use super::backend::StorageBackend;
use super::host::StorageHost;
use super::kind::StorageKind;

/// Reserved key written during probing
pub const SENTINEL_KEY: &str = "__storage_test__";

/// Whether `backend` accepts a write and its cleanup
pub fn probe(backend: &dyn StorageBackend) -> bool {
    let result = backend
        .set_item(SENTINEL_KEY, SENTINEL_KEY)
        .and_then(|()| backend.remove_item(SENTINEL_KEY));
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(
                target: "wsk::storage",
                "Probe of {} backend failed: {}",
                backend.backend_type(),
                e
            );
            false
        }
    }
}

/// Whether the host exposes a working backend for `kind`
pub fn probe_kind<H: StorageHost + ?Sized>(host: &H, kind: StorageKind) -> bool {
    let available = match host.storage(kind) {
        Some(backend) => probe(backend.as_ref()),
        None => false,
    };
    tracing::debug!(target: "wsk::storage", "{} available: {}", kind, available);
    available
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::backend::{MemoryBackend, StorageError, StorageResult};
    use crate::storage::host::NativeHost;
    use std::sync::Arc;

    /// Accepts writes but refuses to delete anything
    struct AppendOnly(MemoryBackend);

    impl StorageBackend for AppendOnly {
        fn backend_type(&self) -> &'static str {
            "append-only"
        }
        fn get_item(&self, key: &str) -> Option<String> {
            self.0.get_item(key)
        }
        fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
            self.0.set_item(key, value)
        }
        fn remove_item(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Backend("deletes are refused".to_string()))
        }
        fn key(&self, index: usize) -> Option<String> {
            self.0.key(index)
        }
        fn length(&self) -> usize {
            self.0.length()
        }
        fn clear(&self) -> StorageResult<()> {
            Err(StorageError::Backend("deletes are refused".to_string()))
        }
    }

    #[test]
    fn test_probe_working_backend_leaves_no_trace() {
        let backend = MemoryBackend::new();
        backend.set_item("existing", "data").unwrap();

        assert!(probe(&backend));
        assert_eq!(backend.get_item(SENTINEL_KEY), None);
        assert_eq!(backend.length(), 1);
        assert_eq!(backend.get_item("existing"), Some("data".to_string()));
    }

    #[test]
    fn test_probe_rejecting_backends() {
        assert!(!probe(&MemoryBackend::with_quota(0)));
        assert!(!probe(&MemoryBackend::disabled()));
        // Too small to hold the sentinel
        assert!(!probe(&MemoryBackend::with_quota(SENTINEL_KEY.len())));
        assert!(probe(&MemoryBackend::with_quota(SENTINEL_KEY.len() * 2)));
    }

    #[test]
    fn test_probe_requires_sentinel_removal() {
        let backend = AppendOnly(MemoryBackend::new());
        assert!(!probe(&backend));
        // The write went through, only the cleanup failed
        assert_eq!(backend.get_item(SENTINEL_KEY), Some(SENTINEL_KEY.to_string()));

        let host = NativeHost::in_memory();
        host.attach(StorageKind::Local, Arc::new(AppendOnly(MemoryBackend::new())));
        assert!(!probe_kind(&host, StorageKind::Local));
        assert!(probe_kind(&host, StorageKind::Session));
    }

    #[cfg(feature = "file")]
    #[test]
    fn test_probe_file_backend_that_cannot_persist() {
        use crate::storage::backend::FileBackend;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let backend = FileBackend::open(temp_dir.path().join("local.json")).unwrap();
        assert!(probe(&backend));

        std::fs::create_dir(temp_dir.path().join("local.json.tmp")).unwrap();
        assert!(!probe(&backend));
        assert_eq!(backend.get_item(SENTINEL_KEY), None);
    }

    #[test]
    fn test_probe_kind_missing_backend() {
        let host = NativeHost::in_memory();
        assert!(probe_kind(&host, StorageKind::Local));
        assert!(probe_kind(&host, StorageKind::Session));

        host.detach(StorageKind::Session);
        assert!(!probe_kind(&host, StorageKind::Session));

        host.attach(StorageKind::Session, Arc::new(MemoryBackend::disabled()));
        assert!(!probe_kind(&host, StorageKind::Session));
    }
}
