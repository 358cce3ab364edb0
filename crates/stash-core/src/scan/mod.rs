//! Scan/diff pipeline
//!
//! Walks a folder, filters paths, hashes files with a fixed pool of workers
//! and either builds a catalog from scratch ([`Scanner::scan`]), folds a set
//! of paths into an existing one ([`Scanner::scan_update`]), or classifies
//! the folder against a catalog without touching it ([`Scanner::diff`]).
//!
//! Stages run on scoped threads connected by bounded queues, so a slow hash
//! stage throttles the walker. A queue closes when its last sender is
//! dropped; every consumer, including each of several hash workers sharing
//! one queue, sees the close once it has drained the queue.
//!
//! ```text
//! scan:  walk x N -> filter -> hash x N -> collect (checkpoints)
//! diff:  walk x N -> filter -> classify -> hash x N -> aggregate
//!                                      \-------------/
//! ```

mod diff;
mod hash;
mod walk;

pub use diff::FileSystemDiff;

use crossbeam_channel::{Receiver, Sender, bounded};
use stash_fs::NormalizedPath;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use crate::Result;
use crate::catalog::{Catalog, Item};
use crate::config::ScanOptions;
use crate::filter::{FileFilter, NoFilter};
use crate::progress::Progress;

use hash::Collector;
use walk::Candidate;

static NO_FILTER: NoFilter = NoFilter;

/// Scans one folder tree.
pub struct Scanner<'f> {
    root: PathBuf,
    filter: &'f dyn FileFilter,
    options: ScanOptions,
    progress: Progress,
    checkpoint: Option<PathBuf>,
}

impl<'f> Scanner<'f> {
    /// Scanner over `root` that only sees paths `filter` includes.
    pub fn new(root: impl Into<PathBuf>, filter: &'f dyn FileFilter) -> Self {
        Self {
            root: root.into(),
            filter,
            options: ScanOptions::default(),
            progress: Progress::none(),
            checkpoint: None,
        }
    }

    /// Scanner over `root` that sees every file.
    pub fn unfiltered(root: impl Into<PathBuf>) -> Scanner<'static> {
        Scanner::new(root, &NO_FILTER)
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Periodically write the partial catalog of `scan`/`scan_update` to
    /// `path`. Best effort: a failed checkpoint is logged, not fatal.
    pub fn with_checkpoint(mut self, path: impl Into<PathBuf>) -> Self {
        self.checkpoint = Some(path.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build a brand-new catalog from the current folder contents.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RootNotFound`] if the folder does not exist.
    /// Unreadable files are skipped.
    pub fn scan(&self) -> Result<Catalog> {
        walk::check_root(&self.root)?;
        let started = Instant::now();
        let capacity = self.options.queue_capacity.max(1);
        tracing::info!(root = %self.root.display(), "Scanning folder");

        let catalog = thread::scope(|s| {
            let (walk_tx, walk_rx) = bounded(capacity);
            let (cand_tx, cand_rx) = bounded(capacity);
            let (item_tx, item_rx) = bounded(capacity);

            s.spawn(|| walk::walk(&self.root, self.options.workers, walk_tx));
            s.spawn(|| walk::filter_stage(walk_rx, self.filter, cand_tx, Some(&self.progress)));
            self.spawn_hashers(s, cand_rx, item_tx);

            self.collector(Catalog::new(), started).run(item_rx)
        });

        self.finish(catalog.count() as u64, catalog.live_size(), started);
        Ok(catalog)
    }

    /// Hash exactly `paths` and return a copy of `catalog` with them added.
    pub fn scan_add<'p>(
        &self,
        catalog: &Catalog,
        paths: impl IntoIterator<Item = &'p str>,
    ) -> Result<Catalog> {
        self.scan_update(catalog, paths)
    }

    /// Hash exactly `paths` and return a copy of `catalog` with each of them
    /// upserted. Every other entry is left as it was.
    ///
    /// Paths that can't be stat'd or read are logged and skipped.
    pub fn scan_update<'p>(
        &self,
        catalog: &Catalog,
        paths: impl IntoIterator<Item = &'p str>,
    ) -> Result<Catalog> {
        walk::check_root(&self.root)?;
        let started = Instant::now();
        let capacity = self.options.queue_capacity.max(1);
        let paths: Vec<&str> = paths.into_iter().collect();
        tracing::info!(root = %self.root.display(), files = paths.len(), "Hashing changed files");
        self.progress.files.set_total(paths.len() as u64, true);

        let updated = thread::scope(|s| {
            let (cand_tx, cand_rx) = bounded(capacity);
            let (item_tx, item_rx) = bounded(capacity);

            let root = &self.root;
            let bytes = &self.progress.bytes;
            s.spawn(move || {
                let mut total = 0u64;
                for path in paths {
                    let absolute = NormalizedPath::from_key(path).under(root);
                    let Some(candidate) = Candidate::stat(path.to_string(), absolute) else {
                        continue;
                    };
                    total += candidate.size;
                    bytes.set_total(total, false);
                    if cand_tx.send(candidate).is_err() {
                        return;
                    }
                }
            });
            self.spawn_hashers(s, cand_rx, item_tx);

            self.collector(catalog.clone(), started).run(item_rx)
        });

        self.finish(
            self.progress.files.current(),
            self.progress.bytes.current(),
            started,
        );
        Ok(updated)
    }

    /// Classify the folder against `catalog`. Never modifies the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RootNotFound`] if the folder does not exist.
    pub fn diff(&self, catalog: &Catalog) -> Result<FileSystemDiff> {
        walk::check_root(&self.root)?;
        let started = Instant::now();
        let capacity = self.options.queue_capacity.max(1);
        let mode = self.options.check_mode;
        self.progress
            .set_totals(catalog.count() as u64, catalog.live_size(), false);

        let diff = thread::scope(|s| {
            let (walk_tx, walk_rx) = bounded(capacity);
            let (cand_tx, cand_rx) = bounded(capacity);
            let (rehash_tx, rehash_rx) = bounded::<Candidate>(capacity);
            let (verdict_tx, verdict_rx) = bounded(capacity);

            s.spawn(|| walk::walk(&self.root, self.options.workers, walk_tx));
            s.spawn(|| walk::filter_stage(walk_rx, self.filter, cand_tx, None));

            let classified = verdict_tx.clone();
            s.spawn(move || diff::classify_stage(cand_rx, catalog, mode, classified, rehash_tx));

            for _ in 0..self.options.workers.max(1) {
                let input = rehash_rx.clone();
                let verdicts = verdict_tx.clone();
                s.spawn(move || {
                    for candidate in input {
                        let Some(verdict) = diff::rehash(catalog, candidate) else {
                            continue;
                        };
                        if verdicts.send(verdict).is_err() {
                            return;
                        }
                    }
                });
            }
            drop(rehash_rx);
            drop(verdict_tx);

            diff::aggregate(verdict_rx, catalog, &self.progress, started)
        });

        tracing::info!(
            root = %self.root.display(),
            ok = diff.ok.len(),
            add = diff.add.len(),
            update = diff.update.len(),
            delete = diff.delete.len(),
            "Diffed folder against catalog"
        );
        self.finish(
            self.progress.files.current(),
            self.progress.bytes.current(),
            started,
        );
        Ok(diff)
    }

    fn spawn_hashers<'scope>(
        &self,
        s: &'scope thread::Scope<'scope, '_>,
        input: Receiver<Candidate>,
        out: Sender<Item>,
    ) {
        for _ in 0..self.options.workers.max(1) {
            let input = input.clone();
            let out = out.clone();
            s.spawn(move || hash::hash_worker(input, |item| out.send(item).is_ok()));
        }
    }

    fn collector(&self, catalog: Catalog, started: Instant) -> Collector<'_> {
        Collector {
            catalog,
            checkpoint: self.checkpoint.as_deref(),
            interval: self.options.checkpoint_interval,
            progress: &self.progress,
            started,
        }
    }

    fn finish(&self, files: u64, bytes: u64, started: Instant) {
        self.progress.set_totals(files, bytes, true);
        tracing::debug!(root = %self.root.display(), elapsed = ?started.elapsed(), "Scan stage done");
    }
}
