//! Storage Backend Abstraction
//!
//! Every host-provided key/value store implements [`StorageBackend`]. The
//! adapter only ever talks to this trait, so tests and native hosts can swap
//! the browser's storage for in-process or file-backed stores.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │   StorageAdapter    │
//! │  (high-level API)   │
//! └──────────┬──────────┘
//!            │
//! ┌──────────▼──────────┐
//! │   StorageBackend    │  <-- Trait
//! └──────────┬──────────┘
//!            │
//!     ┌──────┼───────────┐
//!     │      │           │
//! ┌───▼──┐ ┌─▼────┐ ┌────▼────┐
//! │Memory│ │ File │ │   Web   │
//! └──────┘ └──────┘ └─────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use wsk::storage::backend::{MemoryBackend, StorageBackend};
//!
//! let backend = MemoryBackend::with_quota(1024);
//! backend.set_item("key", "value").unwrap();
//! assert_eq!(backend.get_item("key").as_deref(), Some("value"));
//! ```

mod memory_backend;
mod traits;

pub use memory_backend::*;
pub use traits::*;

#[cfg(feature = "file")]
mod file_backend;

#[cfg(feature = "file")]
pub use file_backend::{FileBackend, StorageDocument, DOCUMENT_VERSION};

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web_backend;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web_backend::WebStorageBackend;
