//! [`TestFolder`] builder for scan and sync scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use tempfile::TempDir;

/// A temporary folder with helpers to lay out files, age them and assert on
/// them.
///
/// # Example
///
/// ```rust,no_run
/// use stash_test_utils::TestFolder;
///
/// let folder = TestFolder::new();
/// folder.write("a/one.jpg", b"first");
/// folder.write_sized("two.jpg", 1024);
/// folder.assert_file_exists("a/one.jpg");
/// ```
pub struct TestFolder {
    temp_dir: TempDir,
}

impl Default for TestFolder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFolder {
    /// Create an empty temporary folder.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary folder.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` under the root.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &[u8]) -> PathBuf {
        let full_path = self.path(rel);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        full_path
    }

    /// Write `size` bytes to `rel`. The content depends on the path, so two
    /// files of the same size have different checksums.
    pub fn write_sized(&self, rel: &str, size: usize) -> PathBuf {
        let seed = rel.bytes().fold(7u8, |acc, b| acc.wrapping_mul(31).wrapping_add(b));
        let content: Vec<u8> = (0..size)
            .map(|i| seed.wrapping_add((i % 251) as u8))
            .collect();
        self.write(rel, &content)
    }

    /// Set the modification time of `rel` to `secs_ago` seconds in the past.
    pub fn age(&self, rel: &str, secs_ago: u64) {
        let when = SystemTime::now() - Duration::from_secs(secs_ago);
        self.set_mtime(rel, when);
    }

    /// Set the modification time of `rel`.
    pub fn set_mtime(&self, rel: &str, when: SystemTime) {
        filetime::set_file_mtime(self.path(rel), FileTime::from_system_time(when)).unwrap();
    }

    /// Remove the file at `rel`.
    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.path(rel)).unwrap();
    }

    /// Move `from` to `to` within the folder.
    pub fn rename(&self, from: &str, to: &str) {
        let target = self.path(to);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::rename(self.path(from), target).unwrap();
    }

    /// Read the raw bytes at `rel`.
    pub fn read(&self, rel: &str) -> Vec<u8> {
        let full_path = self.path(rel);
        fs::read(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Assert that `rel` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `rel` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}
