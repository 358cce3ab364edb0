//! Folder sync for the import -> staging -> collection flow
//!
//! This module provides:
//! - **engine**: [`SyncEngine`], which loads, reconciles and persists one
//!   folder's catalog according to its [`Role`]
//! - **role**: the per-role policies and the staging admission rule
//! - **report**: [`SyncReport`] and [`SyncOutcome`]

mod engine;
mod report;
mod role;

pub use engine::SyncEngine;
pub use report::{RoleKind, SyncAction, SyncOutcome, SyncReport};
pub use role::Role;

use std::path::Path;

use crate::Result;
use crate::catalog::Catalog;
use crate::config::SyncConfig;

/// Sync an import folder. Any deletion rebuilds the catalog from scratch.
pub fn sync_import_folder(folder: impl AsRef<Path>, config: &SyncConfig) -> Result<SyncOutcome> {
    SyncEngine::new(folder, Role::Import)?
        .with_config(config.clone())
        .sync()
}

/// Sync a staging folder against `collection`.
///
/// # Errors
///
/// Fails with [`crate::Error::AlreadyInCollection`] or
/// [`crate::Error::AlreadyDeletedFromCollection`] when the folder holds
/// content the collection knows. Nothing is persisted in that case.
pub fn sync_staging_folder(
    folder: impl AsRef<Path>,
    collection: &Catalog,
    config: &SyncConfig,
) -> Result<SyncOutcome> {
    SyncEngine::new(folder, Role::Staging { collection })?
        .with_config(config.clone())
        .sync()
}

/// Sync a collection folder. Vanished paths are kept as deleted entries.
pub fn sync_collection_folder(
    folder: impl AsRef<Path>,
    config: &SyncConfig,
) -> Result<SyncOutcome> {
    SyncEngine::new(folder, Role::Collection)?
        .with_config(config.clone())
        .sync()
}
