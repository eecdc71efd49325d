//! The two named storage backends a host exposes.

use std::fmt;
use std::str::FromStr;

use super::errors::AdapterError;

/// Which of the host's two storage facilities an adapter binds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StorageKind {
    /// Persistent storage (`localStorage`)
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "localStorage"))]
    Local,
    /// Per-session storage (`sessionStorage`)
    #[cfg_attr(feature = "serde", serde(rename = "sessionStorage"))]
    Session,
}

impl StorageKind {
    /// Both kinds, in probing order
    pub const ALL: [StorageKind; 2] = [StorageKind::Local, StorageKind::Session];

    /// Selector name accepted by the adapter constructor
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Local => "localStorage",
            StorageKind::Session => "sessionStorage",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKind {
    type Err = AdapterError;

    fn from_str(selector: &str) -> Result<Self, Self::Err> {
        match selector {
            "localStorage" => Ok(StorageKind::Local),
            "sessionStorage" => Ok(StorageKind::Session),
            other => Err(AdapterError::invalid_argument(other)),
        }
    }
}
