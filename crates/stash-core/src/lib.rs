//! Content-addressed file reconciliation for stash
//!
//! This crate keeps a catalog of every file in a folder, keyed by relative
//! path and indexed by SHA-256 checksum, and reconciles it with what is on
//! disk:
//!
//! - **Catalog**: path and checksum indices, soft-deleted entries and
//!   tombstoned checksums, persisted as a TOML snapshot in the folder
//! - **Scanner**: concurrent walk/filter/hash pipeline that builds a catalog
//!   or diffs a folder against one
//! - **SyncEngine**: per-role policies for import, staging and collection
//!   folders
//!
//! # Architecture
//!
//! ```text
//!                   SyncEngine
//!                  /          \
//!             Scanner        Catalog
//!                  \          /
//!                    stash-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use stash_core::{Result, SyncConfig, sync_collection_folder, sync_staging_folder};
//!
//! fn example() -> Result<()> {
//!     let config = SyncConfig::default();
//!     let collection = sync_collection_folder("/photos/collection", &config)?;
//!     let staging = sync_staging_folder("/photos/staging", &collection.catalog, &config)?;
//!     println!("{} files ready to file", staging.catalog.count());
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod progress;
pub mod scan;
pub mod sync;

pub use catalog::{CATALOG_FILE, Catalog, Checksum, Item};
pub use config::{CheckMode, ScanOptions, SyncConfig};
pub use error::{Error, Result};
pub use filter::{AllOf, ExtensionFilter, FileFilter, NoFilter};
pub use progress::{CountingProgress, NoProgress, Progress, ProgressBar};
pub use scan::{FileSystemDiff, Scanner};
pub use sync::{
    Role, RoleKind, SyncAction, SyncEngine, SyncOutcome, SyncReport, sync_collection_folder,
    sync_import_folder, sync_staging_folder,
};
