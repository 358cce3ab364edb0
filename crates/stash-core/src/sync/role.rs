//! Folder roles and the staging admission rule

use crate::catalog::{Catalog, Item};
use crate::{Error, Result};

use super::report::RoleKind;

/// How a folder's catalog is reconciled with its disk contents.
#[derive(Debug, Clone, Copy)]
pub enum Role<'a> {
    /// Inbound area. Any deletion triggers a full rebuild; additions and
    /// changes are folded in incrementally.
    Import,
    /// Transient area checked against the collection. Content the collection
    /// holds, or deliberately removed, is refused. Vanished paths are kept
    /// as deleted entries.
    Staging { collection: &'a Catalog },
    /// Authoritative area. Vanished paths are soft-deleted so their
    /// checksums stay known.
    Collection,
}

impl Role<'_> {
    pub fn kind(&self) -> RoleKind {
        match self {
            Self::Import => RoleKind::Import,
            Self::Staging { .. } => RoleKind::Staging,
            Self::Collection => RoleKind::Collection,
        }
    }
}

/// Refuse any live item whose content the collection already has, live or
/// deleted.
pub(crate) fn admit_into_staging<'i>(
    collection: &Catalog,
    items: impl IntoIterator<Item = &'i Item>,
) -> Result<()> {
    for item in items.into_iter().filter(|item| !item.deleted) {
        if collection.is_live_checksum(&item.checksum) {
            return Err(Error::AlreadyInCollection {
                path: item.path.clone(),
                checksum: item.checksum.clone(),
            });
        }
        if collection.is_deleted_checksum(&item.checksum) {
            return Err(Error::AlreadyDeletedFromCollection {
                path: item.path.clone(),
                checksum: item.checksum.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Checksum;

    fn item(path: &str, checksum: &str) -> Item {
        Item::new(
            path,
            1,
            stash_fs::timestamp::parse("2024-01-01T00:00:00+00:00").unwrap(),
            Checksum::from(checksum),
        )
    }

    #[test]
    fn new_content_is_admitted() {
        let mut collection = Catalog::new();
        collection.add(item("kept.jpg", "aa")).unwrap();

        assert!(admit_into_staging(&collection, [&item("s.jpg", "bb")]).is_ok());
    }

    #[test]
    fn live_collection_content_is_refused() {
        let mut collection = Catalog::new();
        collection.add(item("kept.jpg", "aa")).unwrap();

        let err = admit_into_staging(&collection, [&item("s.jpg", "aa")]).unwrap_err();

        assert!(matches!(err, Error::AlreadyInCollection { ref path, .. } if path == "s.jpg"));
    }

    #[test]
    fn deleted_collection_content_is_refused() {
        let mut collection = Catalog::new();
        collection.delete_checksum(&"aa".into());

        let err = admit_into_staging(&collection, [&item("s.jpg", "aa")]).unwrap_err();

        assert!(matches!(err, Error::AlreadyDeletedFromCollection { .. }));
        assert!(err.is_policy_violation());
    }

    #[test]
    fn deleted_staging_entries_are_not_checked() {
        let mut collection = Catalog::new();
        collection.add(item("kept.jpg", "aa")).unwrap();
        let mut gone = item("moved.jpg", "aa");
        gone.deleted = true;

        assert!(admit_into_staging(&collection, [&gone]).is_ok());
    }
}
