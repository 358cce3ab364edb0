//! Catalog persistence
//!
//! A catalog is stored as a TOML sidecar file inside the folder it
//! describes. Items are written sorted by path so unchanged catalogs produce
//! byte-identical snapshots.

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Catalog, Checksum, Item};
use crate::{Error, Result};

/// File name of the catalog snapshot inside a scanned folder
pub const CATALOG_FILE: &str = ".stash-catalog.toml";

/// Snapshot format version for forward compatibility
pub const SNAPSHOT_VERSION: &str = "1";

#[derive(Serialize)]
struct SnapshotOut<'a> {
    version: &'a str,
    tombstones: Vec<&'a Checksum>,
    items: Vec<&'a Item>,
}

#[derive(Deserialize)]
struct SnapshotIn {
    version: String,
    #[serde(default)]
    tombstones: Vec<Checksum>,
    #[serde(default)]
    items: Vec<Item>,
}

impl Catalog {
    /// Location of the snapshot for `folder`.
    pub fn snapshot_path(folder: &Path) -> PathBuf {
        folder.join(CATALOG_FILE)
    }

    /// Whether a file name at the root of a folder belongs to the snapshot
    /// (the snapshot itself or its in-flight temp file).
    pub fn is_snapshot_file(name: &str) -> bool {
        name == CATALOG_FILE || stash_fs::io::is_temp_file_of(name, CATALOG_FILE)
    }

    /// Render the catalog as snapshot text.
    pub fn to_snapshot_string(&self) -> Result<String> {
        let mut items: Vec<&Item> = self.items.iter().collect();
        items.sort_by(|a, b| a.path.cmp(&b.path));

        let snapshot = SnapshotOut {
            version: SNAPSHOT_VERSION,
            tombstones: self.tombstones.iter().collect(),
            items,
        };
        Ok(toml::to_string_pretty(&snapshot)?)
    }

    /// Parse snapshot text. `path` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SnapshotCorrupt`] for malformed TOML, an unknown
    /// version, or a path listed twice.
    pub fn from_snapshot_str(content: &str, path: &Path) -> Result<Self> {
        let corrupt = |message: String| Error::SnapshotCorrupt {
            path: path.to_path_buf(),
            message,
        };

        let snapshot: SnapshotIn = toml::from_str(content).map_err(|e| corrupt(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(corrupt(format!(
                "unsupported snapshot version {:?}",
                snapshot.version
            )));
        }

        let mut catalog = Catalog::new();
        for item in snapshot.items {
            catalog.add(item).map_err(|e| corrupt(e.to_string()))?;
        }
        for checksum in snapshot.tombstones {
            catalog.insert_tombstone(checksum);
        }
        Ok(catalog)
    }

    /// Write the catalog snapshot to `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_snapshot_string()?;
        stash_fs::io::write_atomic(path, content.as_bytes())?;
        tracing::debug!(
            path = %path.display(),
            items = self.items.len(),
            "Saved catalog snapshot"
        );
        Ok(())
    }

    /// Read a catalog snapshot from `path`.
    ///
    /// # Errors
    ///
    /// - [`Error::SnapshotMissing`] if there is no file at `path`
    /// - [`Error::SnapshotCorrupt`] if the file can't be parsed
    pub fn load(path: &Path) -> Result<Self> {
        let content = match stash_fs::io::read_text_locked(path) {
            Ok(content) => content,
            Err(stash_fs::Error::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                return Err(Error::SnapshotMissing {
                    path: path.to_path_buf(),
                });
            }
            Err(stash_fs::Error::Io { source, .. }) if source.kind() == ErrorKind::InvalidData => {
                return Err(Error::SnapshotCorrupt {
                    path: path.to_path_buf(),
                    message: source.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_snapshot_str(&content, path)
    }
}
