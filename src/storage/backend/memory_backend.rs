//! In-Memory Storage Backend
//!
//! Process-local backend. Used as the native session store and as the
//! substitute for browser storage in tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::traits::{entry_size, StorageBackend, StorageError, StorageResult};
use crate::storage::kind::StorageKind;

/// Default capacity, in UTF-16 code units, matching common browser limits.
pub const DEFAULT_QUOTA: usize = 5 * 1024 * 1024;

#[derive(Debug, Default)]
struct MemoryState {
    entries: BTreeMap<String, String>,
    used: usize,
}

/// In-memory storage backend
///
/// Entries enumerate in key order. A quota, when set, bounds the total
/// UTF-16 size of keys plus values; a quota of zero rejects every write the
/// way zero-quota private browsing modes do.
#[derive(Debug)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    quota: Option<usize>,
    disabled: bool,
    kind: Option<StorageKind>,
}

impl MemoryBackend {
    /// Create an unbounded backend
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            quota: None,
            disabled: false,
            kind: None,
        }
    }

    /// Create a backend bounded to `quota` UTF-16 code units
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::new()
        }
    }

    /// Create a backend whose every write fails with [`StorageError::Disabled`]
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::new()
        }
    }

    /// Tag the backend with the kind it serves; reported in quota errors
    pub fn for_kind(mut self, kind: StorageKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Configured quota, if any
    pub fn quota(&self) -> Option<usize> {
        self.quota
    }

    /// Total UTF-16 size currently held
    pub fn used(&self) -> usize {
        self.state().used
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryBackend {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.state().entries.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.disabled {
            return Err(StorageError::Disabled(
                "storage has been disabled by the host".to_string(),
            ));
        }

        let mut state = self.state();
        let previous = state
            .entries
            .get(key)
            .map(|old| entry_size(key, old))
            .unwrap_or(0);
        let requested = state.used - previous + entry_size(key, value);

        if let Some(quota) = self.quota {
            if requested > quota {
                return Err(StorageError::QuotaExceeded {
                    kind: self.kind,
                    requested: Some(requested),
                    quota: Some(quota),
                });
            }
        }

        state.entries.insert(key.to_string(), value.to_string());
        state.used = requested;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut state = self.state();
        if let Some(old) = state.entries.remove(key) {
            state.used -= entry_size(key, &old);
        }
        Ok(())
    }

    fn key(&self, index: usize) -> Option<String> {
        self.state().entries.keys().nth(index).cloned()
    }

    fn length(&self) -> usize {
        self.state().entries.len()
    }

    fn clear(&self) -> StorageResult<()> {
        let mut state = self.state();
        state.entries.clear();
        state.used = 0;
        Ok(())
    }
}
