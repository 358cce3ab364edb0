//! Filesystem primitives for the stash catalog
//!
//! Provides normalized relative paths, content checksums, atomic snapshot
//! writes, config loading, and the folder bootstrap and file copy helpers
//! used around catalog synchronization.

pub mod checksum;
pub mod config;
pub mod copy;
pub mod error;
pub mod folder;
pub mod io;
pub mod path;
pub mod timestamp;

pub use checksum::{compute_bytes_checksum, compute_file_checksum};
pub use config::ConfigStore;
pub use copy::copy_file;
pub use error::{Error, Result};
pub use folder::ensure_folder;
pub use path::NormalizedPath;
