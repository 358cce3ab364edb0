//! Catalog records

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content fingerprint of a file: the hex SHA-256 digest of its bytes.
///
/// Two files with the same checksum are the same content, whatever their
/// names or locations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Checksum of an in-memory buffer.
    pub fn of_bytes(content: &[u8]) -> Self {
        Self(stash_fs::compute_bytes_checksum(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Checksum {
    fn from(hex: String) -> Self {
        Self(hex)
    }
}

impl From<&str> for Checksum {
    fn from(hex: &str) -> Self {
        Self(hex.to_string())
    }
}

/// Last observed state of one path inside a scanned folder.
///
/// `deleted` items are paths that vanished from disk; they stay in the
/// catalog so their checksum history is not lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Path relative to the scanned folder, forward slashes
    pub path: String,
    /// File size in bytes
    pub size: u64,
    /// Modification time as reported by the filesystem
    #[serde(with = "stash_fs::timestamp::serde_text")]
    pub modified: DateTime<FixedOffset>,
    pub checksum: Checksum,
    #[serde(default)]
    pub deleted: bool,
}

impl Item {
    /// Create a live item.
    pub fn new(
        path: impl Into<String>,
        size: u64,
        modified: DateTime<FixedOffset>,
        checksum: Checksum,
    ) -> Self {
        Self {
            path: path.into(),
            size,
            modified,
            checksum,
            deleted: false,
        }
    }

    /// Whether size and modification time match what the filesystem reports.
    pub fn matches_stat(&self, size: u64, modified: &DateTime<FixedOffset>) -> bool {
        self.size == size && self.modified == *modified
    }
}
