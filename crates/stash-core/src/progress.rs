//! Progress reporting contract
//!
//! The scan pipeline reports how many files and bytes it has processed. Two
//! independent bars are used, one counting files and one counting bytes.
//! Rendering is up to the implementor; [`NoProgress`] discards everything.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// A progress bar fed by the scan pipeline.
///
/// Totals may grow while a full scan discovers files; `complete` is set once
/// the total is final.
pub trait ProgressBar: Send + Sync {
    fn set_total(&self, total: u64, complete: bool);
    fn incr_by(&self, n: u64, elapsed: Duration);
    fn current(&self) -> u64;
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressBar for NoProgress {
    fn set_total(&self, _total: u64, _complete: bool) {}

    fn incr_by(&self, _n: u64, _elapsed: Duration) {}

    fn current(&self) -> u64 {
        0
    }
}

/// Counts progress with atomics; useful for headless callers and tests.
#[derive(Debug, Default)]
pub struct CountingProgress {
    current: AtomicU64,
    total: AtomicU64,
    complete: AtomicBool,
}

impl CountingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn is_complete(&self) -> bool {
        self.complete.load(Ordering::Relaxed)
    }
}

impl ProgressBar for CountingProgress {
    fn set_total(&self, total: u64, complete: bool) {
        self.total.store(total, Ordering::Relaxed);
        self.complete.store(complete, Ordering::Relaxed);
    }

    fn incr_by(&self, n: u64, _elapsed: Duration) {
        self.current.fetch_add(n, Ordering::Relaxed);
    }

    fn current(&self) -> u64 {
        self.current.load(Ordering::Relaxed)
    }
}

/// The pair of bars a scan reports to.
#[derive(Clone)]
pub struct Progress {
    pub files: Arc<dyn ProgressBar>,
    pub bytes: Arc<dyn ProgressBar>,
}

impl Progress {
    pub fn new(files: Arc<dyn ProgressBar>, bytes: Arc<dyn ProgressBar>) -> Self {
        Self { files, bytes }
    }

    /// Progress that goes nowhere.
    pub fn none() -> Self {
        Self::new(Arc::new(NoProgress), Arc::new(NoProgress))
    }

    pub(crate) fn record(&self, size: u64, elapsed: Duration) {
        self.files.incr_by(1, elapsed);
        self.bytes.incr_by(size, elapsed);
    }

    pub(crate) fn set_totals(&self, files: u64, bytes: u64, complete: bool) {
        self.files.set_total(files, complete);
        self.bytes.set_total(bytes, complete);
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("files", &self.files.current())
            .field("bytes", &self.bytes.current())
            .finish()
    }
}
