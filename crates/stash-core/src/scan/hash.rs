//! Hash and persist stages

use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::path::Path;
use std::time::{Duration, Instant};

use super::walk::Candidate;
use crate::catalog::{Catalog, Checksum, Item};
use crate::progress::Progress;

/// Shortest wait between checkpoint checks while the queue is idle.
const MIN_POLL: Duration = Duration::from_millis(50);

/// Hash one candidate into a fresh live item.
///
/// Unreadable files are logged and yield `None`.
pub(crate) fn hash_candidate(candidate: Candidate) -> Option<Item> {
    match stash_fs::compute_file_checksum(&candidate.absolute) {
        Ok(hex) => Some(Item::new(
            candidate.path,
            candidate.size,
            candidate.modified,
            Checksum::from(hex),
        )),
        Err(e) => {
            tracing::warn!(path = %candidate.path, error = %e, "Skipping file that cannot be read");
            None
        }
    }
}

/// One hashing worker. Several run against the same input queue; each exits
/// once the queue is closed and drained. `emit` returns false when the
/// downstream stage is gone.
pub(crate) fn hash_worker(input: Receiver<Candidate>, mut emit: impl FnMut(Item) -> bool) {
    for candidate in input {
        if let Some(item) = hash_candidate(candidate)
            && !emit(item)
        {
            return;
        }
    }
}

/// Sole mutator of the catalog during a scan: folds hashed items in and
/// checkpoints the partial catalog every `interval`.
///
/// Checkpoint failures are logged; the scan carries on.
pub(crate) struct Collector<'a> {
    pub catalog: Catalog,
    pub checkpoint: Option<&'a Path>,
    pub interval: Duration,
    pub progress: &'a Progress,
    pub started: Instant,
}

impl Collector<'_> {
    pub fn run(mut self, input: Receiver<Item>) -> Catalog {
        let mut last_save = Instant::now();
        let mut dirty = false;
        let poll = self.interval.max(MIN_POLL);

        loop {
            match input.recv_timeout(poll) {
                Ok(item) => {
                    self.progress.record(item.size, self.started.elapsed());
                    self.catalog.set(item);
                    dirty = true;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if dirty && last_save.elapsed() >= self.interval {
                if let Some(path) = self.checkpoint {
                    match self.catalog.save(path) {
                        Ok(()) => {
                            tracing::debug!(items = self.catalog.count(), "Checkpointed catalog");
                            dirty = false;
                        }
                        Err(e) => {
                            tracing::warn!(path = %path.display(), error = %e, "Checkpoint failed")
                        }
                    }
                }
                last_save = Instant::now();
            }
        }

        self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn unreadable_candidate_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let candidate = Candidate {
            path: "gone.bin".to_string(),
            absolute: dir.path().join("gone.bin"),
            size: 3,
            modified: stash_fs::timestamp::parse("2024-01-01T00:00:00+00:00").unwrap(),
        };
        assert!(hash_candidate(candidate).is_none());
    }

    #[test]
    fn hashed_item_keeps_stat_data() {
        let dir = tempfile::tempdir().unwrap();
        let absolute: PathBuf = dir.path().join("a.txt");
        std::fs::write(&absolute, "hello world").unwrap();
        let candidate = Candidate::stat("a.txt".to_string(), absolute).unwrap();
        let modified = candidate.modified;

        let item = hash_candidate(candidate).unwrap();

        assert_eq!(item.path, "a.txt");
        assert_eq!(item.size, 11);
        assert_eq!(item.modified, modified);
        assert_eq!(item.checksum, Checksum::of_bytes(b"hello world"));
        assert!(!item.deleted);
    }
}
