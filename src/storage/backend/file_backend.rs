//! File System Storage Backend
//!
//! Persistent backend for native hosts. The whole key space lives in one
//! JSON document which is rewritten atomically on every mutation.

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, Weak};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::traits::{entry_size, StorageBackend, StorageError, StorageResult};
use crate::storage::kind::StorageKind;

/// Version written into every document
pub const DOCUMENT_VERSION: u32 = 1;

/// On-disk layout of a file backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageDocument {
    /// Document format version
    pub version: u32,
    /// Time of the last successful write
    pub updated_at: DateTime<Utc>,
    /// Stored entries
    pub entries: BTreeMap<String, String>,
}

impl Default for StorageDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            updated_at: Utc::now(),
            entries: BTreeMap::new(),
        }
    }
}

/// File system storage backend
///
/// Reads are served from memory. Writes build the next document, persist it
/// and only then replace the in-memory copy, so a failed write changes
/// nothing.
///
/// Every mutation rewrites and fsyncs the whole document. Constructing an
/// adapter over this backend probes it, which costs two such writes (the
/// sentinel entry and its removal) and refreshes `updated_at` even though the
/// entries end up unchanged.
///
/// Two backends opened separately on the same path do not see each other's
/// writes; the last one to persist wins. Use [`FileBackend::open_shared`] when
/// several hosts may point at one document.
pub struct FileBackend {
    path: PathBuf,
    document: Mutex<StorageDocument>,
    quota: Option<usize>,
    kind: Option<StorageKind>,
}

impl FileBackend {
    /// Open (or create on first write) the document at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let document = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str::<StorageDocument>(&content)
                .map_err(|e| StorageError::Serialization(e.to_string()))?
        } else {
            StorageDocument::default()
        };

        if document.version != DOCUMENT_VERSION {
            return Err(StorageError::Backend(format!(
                "unsupported document version {} in {}",
                document.version,
                path.display()
            )));
        }

        tracing::debug!(
            target: "wsk::storage",
            "Opened file backend {} with {} entries",
            path.display(),
            document.entries.len()
        );

        Ok(Self {
            path,
            document: Mutex::new(document),
            quota: None,
            kind: None,
        })
    }

    /// Open `path` through a process-wide table so every caller naming the
    /// same document gets the same backend
    ///
    /// `quota` and `kind` apply only when this call opens the document; a
    /// backend that is already live keeps the settings it was opened with.
    pub fn open_shared<P: AsRef<Path>>(
        path: P,
        quota: Option<usize>,
        kind: Option<StorageKind>,
    ) -> StorageResult<Arc<Self>> {
        static OPEN: OnceLock<Mutex<HashMap<PathBuf, Weak<FileBackend>>>> = OnceLock::new();

        let path = path.as_ref();
        let mut open = OPEN
            .get_or_init(|| Mutex::new(HashMap::new()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut backend = Self::open(path)?;
        let id = backend.identity()?;
        if let Some(existing) = open.get(&id).and_then(Weak::upgrade) {
            tracing::debug!(
                target: "wsk::storage",
                "Reusing open file backend {}",
                id.display()
            );
            return Ok(existing);
        }

        backend.quota = quota;
        backend.kind = kind;
        let backend = Arc::new(backend);
        open.retain(|_, weak| weak.strong_count() > 0);
        open.insert(id, Arc::downgrade(&backend));
        Ok(backend)
    }

    /// Bound the backend to `quota` UTF-16 code units
    pub fn with_quota(mut self, quota: usize) -> Self {
        self.quota = Some(quota);
        self
    }

    /// Tag the backend with the kind it serves; reported in quota errors
    pub fn for_kind(mut self, kind: StorageKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Canonical location of the document; the parent exists after `open`
    fn identity(&self) -> StorageResult<PathBuf> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.canonicalize()?,
            _ => std::env::current_dir()?,
        };
        match self.path.file_name() {
            Some(name) => Ok(parent.join(name)),
            None => Err(StorageError::Backend(format!(
                "{} does not name a file",
                self.path.display()
            ))),
        }
    }

    /// Sibling of the document the next version is written to before rename
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn document(&self) -> MutexGuard<'_, StorageDocument> {
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write atomically using temp file + rename pattern
    fn persist(&self, document: &StorageDocument) -> StorageResult<()> {
        let json = serde_json::to_vec_pretty(document)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(&json)?;
        file.sync_all()?;

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    /// Apply `mutate` to a copy of the document and commit it once persisted
    fn commit<F>(&self, mutate: F) -> StorageResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> StorageResult<()>,
    {
        let mut current = self.document();
        let mut next = StorageDocument {
            version: DOCUMENT_VERSION,
            updated_at: Utc::now(),
            entries: current.entries.clone(),
        };
        mutate(&mut next.entries)?;

        self.persist(&next).map_err(|e| {
            tracing::warn!(
                target: "wsk::storage",
                "Failed to persist {}: {}",
                self.path.display(),
                e
            );
            e
        })?;

        *current = next;
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn backend_type(&self) -> &'static str {
        "file"
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.document().entries.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let (quota, kind) = (self.quota, self.kind);
        self.commit(|entries| {
            if let Some(quota) = quota {
                let used: usize = entries
                    .iter()
                    .filter(|(k, _)| k.as_str() != key)
                    .map(|(k, v)| entry_size(k, v))
                    .sum();
                let requested = used + entry_size(key, value);
                if requested > quota {
                    return Err(StorageError::QuotaExceeded {
                        kind,
                        requested: Some(requested),
                        quota: Some(quota),
                    });
                }
            }
            entries.insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        if !self.document().entries.contains_key(key) {
            return Ok(());
        }
        self.commit(|entries| {
            entries.remove(key);
            Ok(())
        })
    }

    fn key(&self, index: usize) -> Option<String> {
        self.document().entries.keys().nth(index).cloned()
    }

    fn length(&self) -> usize {
        self.document().entries.len()
    }

    fn clear(&self) -> StorageResult<()> {
        if self.document().entries.is_empty() {
            return Ok(());
        }
        self.commit(|entries| {
            entries.clear();
            Ok(())
        })
    }
}
