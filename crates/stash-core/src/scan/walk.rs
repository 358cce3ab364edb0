//! Walk and filter stages

use chrono::{DateTime, FixedOffset};
use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::{Path, PathBuf};
use std::thread;
use walkdir::WalkDir;

use stash_fs::{NormalizedPath, timestamp};

use crate::catalog::Catalog;
use crate::filter::FileFilter;
use crate::progress::Progress;
use crate::{Error, Result};

/// A regular file found under the scan root.
#[derive(Debug)]
pub(crate) struct WalkedFile {
    pub path: String,
    pub absolute: PathBuf,
}

/// A file that passed the filter, with what the filesystem reports for it.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub path: String,
    pub absolute: PathBuf,
    pub size: u64,
    pub modified: DateTime<FixedOffset>,
}

impl Candidate {
    /// Stat `absolute`, logging and returning `None` on failure.
    pub fn stat(path: String, absolute: PathBuf) -> Option<Self> {
        let metadata = match std::fs::metadata(&absolute) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Skipping file that cannot be stat'd");
                return None;
            }
        };
        let modified = match metadata.modified() {
            Ok(time) => timestamp::from_system_time(time),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Skipping file without modification time");
                return None;
            }
        };
        Some(Self {
            path,
            absolute,
            size: metadata.len(),
            modified,
        })
    }
}

/// Fail fast if the scan root is missing or not a directory.
pub(crate) fn check_root(root: &Path) -> Result<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(Error::RootNotFound {
            path: root.to_path_buf(),
        })
    }
}

/// Enumerate every regular file under `root`, skipping the catalog snapshot.
///
/// The root is listed on the calling thread; each top-level directory is
/// handed to one of `workers` walker threads. Unreadable directory entries
/// are logged and skipped. Stops early if the downstream stage has gone
/// away.
pub(crate) fn walk(root: &Path, workers: usize, out: Sender<WalkedFile>) {
    let workers = workers.max(1);
    let (dir_tx, dir_rx) = bounded::<PathBuf>(workers);

    thread::scope(|s| {
        for _ in 0..workers {
            let dirs = dir_rx.clone();
            let out = out.clone();
            s.spawn(move || {
                for dir in dirs {
                    if !walk_subtree(root, &dir, &out) {
                        return;
                    }
                }
            });
        }
        drop(dir_rx);

        list_root(root, dir_tx, &out);
    });
}

/// Emit the files directly under `root` and queue its subdirectories.
/// Returning drops `dirs`, which lets the walkers drain and exit.
fn list_root(root: &Path, dirs: Sender<PathBuf>, out: &Sender<WalkedFile>) {
    for entry in WalkDir::new(root).min_depth(1).max_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        let file_type = entry.file_type();
        let sent = if file_type.is_dir() {
            dirs.send(entry.into_path()).is_ok()
        } else if file_type.is_file()
            && !Catalog::is_snapshot_file(&entry.file_name().to_string_lossy())
        {
            emit(root, entry.into_path(), out)
        } else {
            true
        };
        if !sent {
            return;
        }
    }
}

fn walk_subtree(root: &Path, dir: &Path, out: &Sender<WalkedFile>) -> bool {
    for entry in WalkDir::new(dir).min_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && !emit(root, entry.into_path(), out) {
            return false;
        }
    }
    true
}

fn emit(root: &Path, absolute: PathBuf, out: &Sender<WalkedFile>) -> bool {
    let Some(path) = NormalizedPath::relative_to(root, &absolute) else {
        return true;
    };
    out.send(WalkedFile {
        path: path.into_string(),
        absolute,
    })
    .is_ok()
}

/// Drop excluded paths, then stat the survivors.
///
/// When `discovered` is given, its totals grow as files are found (full
/// scans don't know their size up front).
pub(crate) fn filter_stage(
    input: Receiver<WalkedFile>,
    filter: &dyn FileFilter,
    out: Sender<Candidate>,
    discovered: Option<&Progress>,
) {
    let mut files = 0u64;
    let mut bytes = 0u64;
    for walked in input {
        if !filter.include(&walked.path) {
            tracing::debug!(path = %walked.path, "Excluded by filter");
            continue;
        }
        let Some(candidate) = Candidate::stat(walked.path, walked.absolute) else {
            continue;
        };
        if let Some(progress) = discovered {
            files += 1;
            bytes += candidate.size;
            progress.set_totals(files, bytes, false);
        }
        if out.send(candidate).is_err() {
            return;
        }
    }
}
