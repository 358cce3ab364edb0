//! Content-addressed catalog of a folder
//!
//! The catalog maps every path ever seen in a folder to its last observed
//! [`Item`], and indexes items by [`Checksum`] so duplicate content can be
//! found regardless of file names. Checksums can also be tombstoned: marked
//! as deleted even when no item carries them, so that content can be refused
//! before it is ever seen.
//!
//! Whether a checksum counts as deleted is always derived from the current
//! items and the tombstone set, never cached. Adding a live item for a
//! checksum therefore revives it no matter what happened before.

mod item;
mod snapshot;

pub use item::{Checksum, Item};
pub use snapshot::{CATALOG_FILE, SNAPSHOT_VERSION};

use std::collections::{BTreeSet, HashMap};

use crate::{Error, Result};

/// Path- and checksum-indexed item store with tombstones.
///
/// Not synchronized: a catalog has a single owner at a time. Clone it before
/// handing it to code that may mutate it while you still need the original.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    by_path: HashMap<String, usize>,
    by_checksum: HashMap<Checksum, BTreeSet<usize>>,
    tombstones: BTreeSet<Checksum>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new path entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicatePath`] if the path is already catalogued,
    /// deleted or not. Use [`Catalog::set`] to overwrite.
    pub fn add(&mut self, item: Item) -> Result<()> {
        if self.by_path.contains_key(&item.path) {
            return Err(Error::DuplicatePath { path: item.path });
        }
        self.insert_new(item);
        Ok(())
    }

    /// Insert or overwrite the entry for the item's path.
    pub fn set(&mut self, item: Item) {
        let Some(&index) = self.by_path.get(&item.path) else {
            self.insert_new(item);
            return;
        };

        let old_checksum = self.items[index].checksum.clone();
        self.unindex_checksum(&old_checksum, index);
        if !item.deleted {
            self.tombstones.remove(&item.checksum);
        }
        self.by_checksum
            .entry(item.checksum.clone())
            .or_default()
            .insert(index);
        self.items[index] = item;
    }

    /// Mark the item at `path` as deleted, keeping its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchFile`] if the path is not catalogued.
    pub fn delete_path(&mut self, path: &str) -> Result<()> {
        let index = self.index_of(path)?;
        self.items[index].deleted = true;
        Ok(())
    }

    /// Mark every item with `checksum` as deleted and tombstone the checksum.
    ///
    /// The tombstone is recorded even if no item carries the checksum yet.
    pub fn delete_checksum(&mut self, checksum: &Checksum) {
        if let Some(indices) = self.by_checksum.get(checksum) {
            for &index in indices {
                self.items[index].deleted = true;
            }
        }
        self.tombstones.insert(checksum.clone());
    }

    /// Exact lookup by path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchFile`] if the path is not catalogued.
    pub fn item(&self, path: &str) -> Result<&Item> {
        self.index_of(path).map(|index| &self.items[index])
    }

    /// Lookup by path, `None` if absent.
    pub fn get(&self, path: &str) -> Option<&Item> {
        self.by_path.get(path).map(|&index| &self.items[index])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    /// All items sharing `checksum`, deleted ones included.
    pub fn items_by_checksum(&self, checksum: &Checksum) -> Vec<&Item> {
        self.by_checksum
            .get(checksum)
            .map(|indices| indices.iter().map(|&index| &self.items[index]).collect())
            .unwrap_or_default()
    }

    /// A checksum is known if any item carries it or it is tombstoned.
    pub fn is_known_checksum(&self, checksum: &Checksum) -> bool {
        self.by_checksum.contains_key(checksum) || self.tombstones.contains(checksum)
    }

    /// Whether at least one non-deleted item carries `checksum`.
    pub fn is_live_checksum(&self, checksum: &Checksum) -> bool {
        self.by_checksum
            .get(checksum)
            .is_some_and(|indices| indices.iter().any(|&index| !self.items[index].deleted))
    }

    /// A checksum is deleted if it is known and no live item carries it.
    pub fn is_deleted_checksum(&self, checksum: &Checksum) -> bool {
        self.is_known_checksum(checksum) && !self.is_live_checksum(checksum)
    }

    /// Number of live items
    pub fn count(&self) -> usize {
        self.items.iter().filter(|item| !item.deleted).count()
    }

    /// Number of deleted items
    pub fn deleted_count(&self) -> usize {
        self.items.iter().filter(|item| item.deleted).count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.tombstones.is_empty()
    }

    /// Every item, live and deleted, in insertion order.
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Paths of all live items.
    pub fn live_paths(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(|item| !item.deleted)
            .map(|item| item.path.as_str())
    }

    /// Total size in bytes of all live items.
    pub fn live_size(&self) -> u64 {
        self.items
            .iter()
            .filter(|item| !item.deleted)
            .map(|item| item.size)
            .sum()
    }

    /// Explicitly tombstoned checksums.
    pub fn tombstones(&self) -> impl Iterator<Item = &Checksum> {
        self.tombstones.iter()
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    fn index_of(&self, path: &str) -> Result<usize> {
        self.by_path
            .get(path)
            .copied()
            .ok_or_else(|| Error::NoSuchFile {
                path: path.to_string(),
            })
    }

    fn insert_new(&mut self, item: Item) {
        let index = self.items.len();
        if !item.deleted {
            self.tombstones.remove(&item.checksum);
        }
        self.by_path.insert(item.path.clone(), index);
        self.by_checksum
            .entry(item.checksum.clone())
            .or_default()
            .insert(index);
        self.items.push(item);
    }

    fn unindex_checksum(&mut self, checksum: &Checksum, index: usize) {
        if let Some(indices) = self.by_checksum.get_mut(checksum) {
            indices.remove(&index);
            if indices.is_empty() {
                self.by_checksum.remove(checksum);
            }
        }
    }

    fn insert_tombstone(&mut self, checksum: Checksum) {
        self.tombstones.insert(checksum);
    }
}

impl PartialEq for Catalog {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self.tombstones == other.tombstones
            && self
                .items
                .iter()
                .all(|item| other.get(&item.path) == Some(item))
    }
}

impl Eq for Catalog {}

impl FromIterator<Item> for Catalog {
    /// Build a catalog from items; later items win on duplicate paths.
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for item in iter {
            catalog.set(item);
        }
        catalog
    }
}
