//! Diff classification against a catalog

use crossbeam_channel::{Receiver, Sender};
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Instant;

use super::hash::hash_candidate;
use super::walk::Candidate;
use crate::catalog::{Catalog, Item};
use crate::config::CheckMode;
use crate::progress::Progress;

/// Classification of a folder's paths relative to its catalog.
///
/// The four sets are disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileSystemDiff {
    /// On disk and matching the catalog
    pub ok: BTreeSet<String>,
    /// On disk, not in the catalog
    pub add: BTreeSet<String>,
    /// On disk and in the catalog, but changed (or previously deleted)
    pub update: BTreeSet<String>,
    /// Live in the catalog, not seen on disk
    pub delete: BTreeSet<String>,
}

impl FileSystemDiff {
    /// True when nothing needs to change in the catalog.
    pub fn is_clean(&self) -> bool {
        self.add.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }

    /// Number of classified paths
    pub fn len(&self) -> usize {
        self.ok.len() + self.add.len() + self.update.len() + self.delete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Paths whose content has to be (re)hashed: `add` then `update`.
    pub fn changed_paths(&self) -> impl Iterator<Item = &str> {
        self.add.iter().chain(self.update.iter()).map(String::as_str)
    }

    /// Diff for a folder whose catalog was just built from disk.
    pub fn all_ok(catalog: &Catalog) -> Self {
        Self {
            ok: catalog.live_paths().map(str::to_string).collect(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Class {
    Ok,
    Add,
    Update,
    /// On disk but could not be re-hashed; the catalog entry is left alone.
    Unreadable,
}

#[derive(Debug)]
pub(crate) struct Verdict {
    pub class: Class,
    pub path: String,
}

impl Verdict {
    fn new(class: Class, path: String) -> Self {
        Self { class, path }
    }
}

/// Split candidates into unknown (`Add`) and known paths. Known paths are
/// settled here in quick mode, or forwarded for re-hashing in deep mode.
pub(crate) fn classify_stage(
    input: Receiver<Candidate>,
    catalog: &Catalog,
    mode: CheckMode,
    verdicts: Sender<Verdict>,
    rehash: Sender<Candidate>,
) {
    for candidate in input {
        let sent = match (catalog.get(&candidate.path), mode) {
            (None, _) => verdicts.send(Verdict::new(Class::Add, candidate.path)).is_ok(),
            (Some(known), CheckMode::Quick) => {
                let class = if !known.deleted && known.matches_stat(candidate.size, &candidate.modified) {
                    Class::Ok
                } else {
                    Class::Update
                };
                verdicts.send(Verdict::new(class, candidate.path)).is_ok()
            }
            (Some(_), CheckMode::Deep) => rehash.send(candidate).is_ok(),
        };
        if !sent {
            return;
        }
    }
}

/// Re-hash a known file and compare it with its catalog entry.
///
/// A file that can't be read is still on disk, so it is reported as
/// [`Class::Unreadable`] rather than left to fall into `delete`.
pub(crate) fn rehash(catalog: &Catalog, candidate: Candidate) -> Option<Verdict> {
    let path = candidate.path.clone();
    match hash_candidate(candidate) {
        Some(hashed) => verify(catalog, hashed),
        None => Some(Verdict::new(Class::Unreadable, path)),
    }
}

/// Compare a freshly hashed item with its catalog entry.
///
/// A hashed path missing from the catalog means the classify stage and the
/// catalog disagree; that is logged and the path dropped.
pub(crate) fn verify(catalog: &Catalog, hashed: Item) -> Option<Verdict> {
    let Some(known) = catalog.get(&hashed.path) else {
        tracing::warn!(path = %hashed.path, "Re-hashed path is not in the catalog");
        return None;
    };
    let unchanged = !known.deleted
        && known.matches_stat(hashed.size, &hashed.modified)
        && known.checksum == hashed.checksum;
    let class = if unchanged { Class::Ok } else { Class::Update };
    Some(Verdict::new(class, hashed.path))
}

/// Fold verdicts into a diff; live catalog paths never seen on disk become
/// `delete`.
///
/// Progress counts live catalog entries only, by their catalogued size, so
/// it never runs past the totals a diff starts with.
pub(crate) fn aggregate(
    verdicts: Receiver<Verdict>,
    catalog: &Catalog,
    progress: &Progress,
    started: Instant,
) -> FileSystemDiff {
    let mut diff = FileSystemDiff::default();
    let mut unreadable = BTreeSet::new();
    for verdict in verdicts {
        if let Some(known) = catalog.get(&verdict.path)
            && !known.deleted
        {
            progress.record(known.size, started.elapsed());
        }
        let set = match verdict.class {
            Class::Ok => &mut diff.ok,
            Class::Add => &mut diff.add,
            Class::Update => &mut diff.update,
            Class::Unreadable => &mut unreadable,
        };
        set.insert(verdict.path);
    }

    diff.delete = catalog
        .live_paths()
        .filter(|path| {
            !diff.ok.contains(*path) && !diff.update.contains(*path) && !unreadable.contains(*path)
        })
        .map(str::to_string)
        .collect();
    diff
}
