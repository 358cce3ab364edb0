//! Scan and sync configuration
//!
//! [`SyncConfig`] is the on-disk form (TOML, JSON or YAML); [`ScanOptions`]
//! is what the pipeline consumes.
//!
//! ```toml
//! workers = 6
//! queue_capacity = 64
//! check_mode = "quick"
//! checkpoint_secs = 5
//! exclude_extensions = ["tmp", "part"]
//! rebuild_corrupt_snapshot = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::Result;
use crate::filter::ExtensionFilter;

/// How known files are verified when diffing against a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMode {
    /// Re-hash every known file and compare size, mtime and checksum.
    #[default]
    Deep,
    /// Compare only size and mtime reported by the filesystem.
    ///
    /// Best effort: content rewritten in place with the same size and a
    /// restored mtime goes unnoticed.
    Quick,
}

/// Runtime knobs of the scan pipeline.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Number of hashing workers
    pub workers: usize,
    /// Capacity of each queue between stages
    pub queue_capacity: usize,
    pub check_mode: CheckMode,
    /// How often a long scan writes its partial catalog
    pub checkpoint_interval: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            workers: 6,
            queue_capacity: 64,
            check_mode: CheckMode::Deep,
            checkpoint_interval: Duration::from_secs(5),
        }
    }
}

/// Serializable sync configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub workers: usize,
    pub queue_capacity: usize,
    pub check_mode: CheckMode,
    pub checkpoint_secs: u64,
    /// Extensions (without the dot) left out of every scan
    pub exclude_extensions: Vec<String>,
    /// Rebuild from disk instead of failing when a snapshot is unreadable
    pub rebuild_corrupt_snapshot: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        let scan = ScanOptions::default();
        Self {
            workers: scan.workers,
            queue_capacity: scan.queue_capacity,
            check_mode: scan.check_mode,
            checkpoint_secs: scan.checkpoint_interval.as_secs(),
            exclude_extensions: Vec::new(),
            rebuild_corrupt_snapshot: false,
        }
    }
}

impl SyncConfig {
    /// Load a config file; the format follows the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(stash_fs::ConfigStore::new().load(path)?)
    }

    /// Pipeline options; zero workers or capacity are raised to one.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            workers: self.workers.max(1),
            queue_capacity: self.queue_capacity.max(1),
            check_mode: self.check_mode,
            checkpoint_interval: Duration::from_secs(self.checkpoint_secs),
        }
    }

    pub fn filter(&self) -> ExtensionFilter {
        ExtensionFilter::new(&self.exclude_extensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FileFilter;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_scan_options() {
        let options = SyncConfig::default().scan_options();
        assert_eq!(options.workers, 6);
        assert_eq!(options.queue_capacity, 64);
        assert_eq!(options.check_mode, CheckMode::Deep);
        assert_eq!(options.checkpoint_interval, Duration::from_secs(5));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stash.toml");
        std::fs::write(&path, "check_mode = \"quick\"\nexclude_extensions = [\"tmp\"]\n").unwrap();

        let config = SyncConfig::load(&path).unwrap();

        assert_eq!(config.check_mode, CheckMode::Quick);
        assert_eq!(config.workers, 6);
        assert!(!config.filter().include("x.tmp"));
        assert!(config.filter().include("x.jpg"));
    }

    #[test]
    fn zero_workers_are_clamped() {
        let config = SyncConfig {
            workers: 0,
            queue_capacity: 0,
            ..SyncConfig::default()
        };
        let options = config.scan_options();
        assert_eq!(options.workers, 1);
        assert_eq!(options.queue_capacity, 1);
    }
}
