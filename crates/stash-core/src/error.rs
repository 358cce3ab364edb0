//! Error types for stash-core

use std::path::PathBuf;

use crate::catalog::Checksum;

/// Result type for stash-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in stash-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Catalog lookup for a path it does not hold
    #[error("No such file in catalog: {path}")]
    NoSuchFile { path: String },

    /// `Catalog::add` for a path that is already catalogued
    #[error("Duplicate path in catalog: {path}")]
    DuplicatePath { path: String },

    /// Staged content that the collection already holds
    #[error("{path} is already in the collection (checksum {checksum})")]
    AlreadyInCollection { path: String, checksum: Checksum },

    /// Staged content that was removed from the collection on purpose
    #[error("{path} was already deleted from the collection (checksum {checksum})")]
    AlreadyDeletedFromCollection { path: String, checksum: Checksum },

    /// The folder to scan does not exist
    #[error("Scan root not found: {path}")]
    RootNotFound { path: PathBuf },

    /// No catalog snapshot has been written for the folder yet
    #[error("Catalog snapshot not found at {path}")]
    SnapshotMissing { path: PathBuf },

    /// A snapshot exists but can't be understood
    #[error("Catalog snapshot at {path} is corrupt: {message}")]
    SnapshotCorrupt { path: PathBuf, message: String },

    /// Filesystem error from stash-fs
    #[error(transparent)]
    Fs(#[from] stash_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    /// Whether this error is one of the staging-vs-collection rejections.
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            Self::AlreadyInCollection { .. } | Self::AlreadyDeletedFromCollection { .. }
        )
    }
}
