//! Folder bootstrap

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, NormalizedPath, Result};

/// Ensure a directory exists at `rel` under `root`, creating intermediate
/// directories as needed.
///
/// Returns the canonical path of the directory. Fails with
/// [`Error::NotADirectory`] if the path, or one of its ancestors under
/// `root`, already names something other than a directory.
pub fn ensure_folder(root: &Path, rel: &str) -> Result<PathBuf> {
    let target = NormalizedPath::new(rel).under(root);

    if target.exists() && !target.is_dir() {
        return Err(Error::NotADirectory { path: target });
    }
    if let Some(blocker) = first_non_directory(root, &target) {
        return Err(Error::NotADirectory { path: blocker });
    }

    fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
    tracing::debug!(path = %target.display(), "Folder ready");

    dunce::canonicalize(&target).map_err(|e| Error::io(&target, e))
}

/// First existing entry between `root` and `target` (inclusive) that is not a
/// directory.
pub(crate) fn first_non_directory(root: &Path, target: &Path) -> Option<PathBuf> {
    let rel = target.strip_prefix(root).ok()?;
    let mut current = root.to_path_buf();
    for component in rel.components() {
        current.push(component);
        match fs::metadata(&current) {
            Ok(meta) if !meta.is_dir() => return Some(current),
            Ok(_) => {}
            Err(_) => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_nested_folders() {
        let dir = tempfile::tempdir().unwrap();
        let created = ensure_folder(dir.path(), "a/b/c").unwrap();
        assert!(created.is_dir());
        assert!(created.ends_with("a/b/c"));
    }

    #[test]
    fn existing_folder_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("inbox")).unwrap();
        assert!(ensure_folder(dir.path(), "inbox").is_ok());
    }

    #[test]
    fn empty_relative_path_means_the_root_itself() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("collection");

        let created = ensure_folder(&root, "").unwrap();

        assert!(created.is_dir());
        assert!(created.ends_with("collection"));
    }

    #[test]
    fn root_that_is_a_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("collection");
        fs::write(&root, "oops").unwrap();

        assert!(matches!(
            ensure_folder(&root, ""),
            Err(Error::NotADirectory { .. })
        ));
    }

    #[test]
    fn file_in_the_way_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("inbox"), "not a folder").unwrap();

        let err = ensure_folder(dir.path(), "inbox/new").unwrap_err();
        match err {
            Error::NotADirectory { path } => assert!(path.ends_with("inbox")),
            other => panic!("expected NotADirectory, got {other:?}"),
        }
    }
}
