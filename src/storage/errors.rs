//! Error types for adapter construction

use thiserror::Error;

use super::kind::StorageKind;

/// Result type for adapter construction
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Failures that prevent an adapter from being built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// The selector names neither storage kind
    #[error("Constructor only accepts \"localStorage\" and \"sessionStorage\" for the storage parameter.")]
    InvalidArgument {
        /// Selector as given by the caller
        selector: String,
    },

    /// The selected backend is missing or failed its probe
    #[error("\"{kind}\" not enabled or available in the current browser.")]
    Unavailable {
        /// Kind that could not be bound
        kind: StorageKind,
    },
}

impl AdapterError {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(selector: S) -> Self {
        Self::InvalidArgument {
            selector: selector.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(kind: StorageKind) -> Self {
        Self::Unavailable { kind }
    }
}
