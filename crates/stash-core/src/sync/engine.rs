//! SyncEngine implementation
//!
//! The SyncEngine keeps one folder's catalog in step with the folder's
//! contents, following the policy of the folder's [`Role`].

use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::config::SyncConfig;
use crate::filter::FileFilter;
use crate::progress::Progress;
use crate::scan::{FileSystemDiff, Scanner};
use crate::{Error, Result};

use super::report::{SyncAction, SyncOutcome, SyncReport};
use super::role::{Role, admit_into_staging};

/// Engine for synchronizing a folder with its catalog
///
/// A sync runs through four steps:
/// 1. **initialize**: the folder is created if missing (in [`SyncEngine::new`])
/// 2. **load**: the snapshot is read; a missing snapshot means "no history"
///    and the catalog is rebuilt from a full scan
/// 3. **reconcile**: the folder is diffed against the catalog and the role
///    policy decides between rebuild, incremental update and no-op
/// 4. **persist**: the resulting catalog is written back to the snapshot
///
/// A rejected staging sync returns the error before step 4, so neither the
/// snapshot nor the collection catalog is modified.
pub struct SyncEngine<'a> {
    /// Canonical path of the folder
    root: PathBuf,
    role: Role<'a>,
    config: SyncConfig,
    filter: Box<dyn FileFilter>,
    progress: Progress,
}

impl<'a> SyncEngine<'a> {
    /// Create a SyncEngine for `folder`, creating the folder if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be created or names a file.
    pub fn new(folder: impl AsRef<Path>, role: Role<'a>) -> Result<Self> {
        let root = stash_fs::ensure_folder(folder.as_ref(), "")?;
        let config = SyncConfig::default();
        Ok(Self {
            root,
            role,
            filter: Box::new(config.filter()),
            config,
            progress: Progress::none(),
        })
    }

    /// Use `config` for scan options, snapshot recovery and the extension
    /// filter.
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.filter = Box::new(config.filter());
        self.config = config;
        self
    }

    /// Replace the filter derived from the config.
    pub fn with_filter(mut self, filter: impl FileFilter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Get the folder root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn role(&self) -> Role<'a> {
        self.role
    }

    /// Get the path to the catalog snapshot
    pub fn snapshot_path(&self) -> PathBuf {
        Catalog::snapshot_path(&self.root)
    }

    /// Load the catalog snapshot.
    ///
    /// Returns `Ok(None)` if there is no snapshot yet, or if it is corrupt
    /// and the config allows rebuilding corrupt snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SnapshotCorrupt`] if the snapshot can't be parsed.
    pub fn load_catalog(&self) -> Result<Option<Catalog>> {
        match Catalog::load(&self.snapshot_path()) {
            Ok(catalog) => Ok(Some(catalog)),
            Err(Error::SnapshotMissing { .. }) => {
                tracing::info!(root = %self.root.display(), "No catalog yet");
                Ok(None)
            }
            Err(e @ Error::SnapshotCorrupt { .. }) if self.config.rebuild_corrupt_snapshot => {
                tracing::warn!(error = %e, "Rebuilding corrupt catalog from disk");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Diff the folder against `catalog` without changing anything.
    pub fn diff(&self, catalog: &Catalog) -> Result<FileSystemDiff> {
        self.scanner(false).diff(catalog)
    }

    /// Run a full sync and persist the resulting catalog.
    ///
    /// # Errors
    ///
    /// - [`Error::SnapshotCorrupt`] for an unreadable snapshot
    /// - [`Error::AlreadyInCollection`] / [`Error::AlreadyDeletedFromCollection`]
    ///   when a staging folder holds content the collection knows
    pub fn sync(&self) -> Result<SyncOutcome> {
        let kind = self.role.kind();
        let (catalog, diff, action) = match self.load_catalog()? {
            None => {
                let catalog = self.rebuild()?;
                let diff = FileSystemDiff::all_ok(&catalog);
                (catalog, diff, SyncAction::Rebuilt)
            }
            Some(previous) => {
                let diff = self.diff(&previous)?;
                let (catalog, action) = match self.role {
                    Role::Import => self.reconcile_import(previous, &diff)?,
                    Role::Staging { collection } => {
                        self.reconcile_soft_delete(previous, &diff, Some(collection))?
                    }
                    Role::Collection => self.reconcile_soft_delete(previous, &diff, None)?,
                };
                (catalog, diff, action)
            }
        };

        catalog.save(&self.snapshot_path())?;

        let report = SyncReport::new(kind, action, &diff, &catalog).with_action(format!(
            "{} catalog for {} folder ({} items)",
            match action {
                SyncAction::Rebuilt => "Rebuilt",
                SyncAction::Incremental => "Updated",
                SyncAction::Unchanged => "Kept",
            },
            kind,
            catalog.count()
        ));
        tracing::info!(
            root = %self.root.display(),
            role = %kind,
            action = ?action,
            items = catalog.count(),
            deleted = catalog.deleted_count(),
            "Synced folder"
        );

        Ok(SyncOutcome {
            catalog,
            diff,
            report,
        })
    }

    /// Full scan with no history. Staging results are vetted against the
    /// collection before they are accepted.
    fn rebuild(&self) -> Result<Catalog> {
        let catalog = match self.role {
            Role::Staging { collection } => {
                let catalog = self.scanner(false).scan()?;
                admit_into_staging(collection, catalog.all_items())?;
                catalog
            }
            Role::Import | Role::Collection => self.scanner(true).scan()?,
        };
        Ok(catalog)
    }

    fn reconcile_import(
        &self,
        previous: Catalog,
        diff: &FileSystemDiff,
    ) -> Result<(Catalog, SyncAction)> {
        if !diff.delete.is_empty() {
            tracing::info!(
                deleted = diff.delete.len(),
                "Files left the import folder, rebuilding catalog"
            );
            return Ok((self.scanner(true).scan()?, SyncAction::Rebuilt));
        }
        if diff.is_clean() {
            return Ok((previous, SyncAction::Unchanged));
        }
        let updated = self
            .scanner(true)
            .scan_update(&previous, diff.changed_paths())?;
        Ok((updated, SyncAction::Incremental))
    }

    /// Staging and collection policy: vanished paths are marked deleted,
    /// new and changed paths are hashed and upserted. For staging, the
    /// hashed items must pass the collection check first.
    fn reconcile_soft_delete(
        &self,
        previous: Catalog,
        diff: &FileSystemDiff,
        collection: Option<&Catalog>,
    ) -> Result<(Catalog, SyncAction)> {
        if diff.is_clean() {
            return Ok((previous, SyncAction::Unchanged));
        }

        let mut working = previous;
        for path in &diff.delete {
            working.delete_path(path)?;
        }
        if diff.add.is_empty() && diff.update.is_empty() {
            return Ok((working, SyncAction::Incremental));
        }

        let checkpoint = collection.is_none();
        let updated = self
            .scanner(checkpoint)
            .scan_update(&working, diff.changed_paths())?;

        if let Some(collection) = collection {
            let admitted = diff.changed_paths().filter_map(|path| updated.get(path));
            admit_into_staging(collection, admitted)?;
        }
        Ok((updated, SyncAction::Incremental))
    }

    fn scanner(&self, checkpoint: bool) -> Scanner<'_> {
        let scanner = Scanner::new(&self.root, self.filter.as_ref())
            .with_options(self.config.scan_options())
            .with_progress(self.progress.clone());
        if checkpoint {
            scanner.with_checkpoint(self.snapshot_path())
        } else {
            scanner
        }
    }
}
