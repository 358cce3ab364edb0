//! File copy between folder trees
//!
//! Copies the bytes of one file to the same relative path under another
//! root and stamps the copy with a caller-provided modification time
//! (usually the one recorded in the source's catalog entry).

use filetime::FileTime;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use crate::folder::first_non_directory;
use crate::{Error, NormalizedPath, Result, timestamp};

/// Copy the catalog path `rel` from `src_root` to `dst_root`, then set the destination's
/// access and modification times to `modified`.
///
/// Only the file bytes are copied; directory metadata is not. Missing
/// destination directories are created.
///
/// # Errors
///
/// - [`Error::InvalidTimestamp`] if `modified` is not an RFC 3339 timestamp
/// - [`Error::Io`] if the source cannot be read
/// - [`Error::NotADirectory`] if a destination ancestor is a file
/// - [`Error::AlreadyExists`] if the destination path is already taken
/// - [`Error::ReadOnly`] if the destination cannot be written to
pub fn copy_file(src_root: &Path, rel: &str, dst_root: &Path, modified: &str) -> Result<PathBuf> {
    let stamp = timestamp::parse(modified)?;
    let rel = NormalizedPath::from_key(rel);
    let source = rel.under(src_root);
    let destination = rel.under(dst_root);

    let mut reader = File::open(&source).map_err(|e| Error::io(&source, e))?;

    if let Some(blocker) = first_non_directory(dst_root, &destination) {
        if blocker == destination {
            return Err(Error::AlreadyExists { path: blocker });
        }
        return Err(Error::NotADirectory { path: blocker });
    }
    if destination.exists() {
        return Err(Error::AlreadyExists { path: destination });
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| write_error(parent, e))?;
    }

    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&destination)
        .map_err(|e| write_error(&destination, e))?;
    io::copy(&mut reader, &mut writer).map_err(|e| write_error(&destination, e))?;
    writer.sync_all().map_err(|e| Error::io(&destination, e))?;
    drop(writer);

    let file_time = FileTime::from_unix_time(stamp.timestamp(), stamp.timestamp_subsec_nanos());
    filetime::set_file_times(&destination, file_time, file_time)
        .map_err(|e| write_error(&destination, e))?;

    tracing::debug!(
        source = %source.display(),
        destination = %destination.display(),
        "Copied file"
    );
    Ok(destination)
}

fn write_error(path: &Path, source: io::Error) -> Error {
    match source.kind() {
        ErrorKind::PermissionDenied | ErrorKind::ReadOnlyFilesystem => Error::ReadOnly {
            path: path.to_path_buf(),
        },
        ErrorKind::AlreadyExists => Error::AlreadyExists {
            path: path.to_path_buf(),
        },
        _ => Error::io(path, source),
    }
}
