//! Catalog invariants and snapshot persistence

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use stash_core::{CATALOG_FILE, Catalog, Checksum, Error, Item};
use std::collections::HashSet;

fn item(path: &str, checksum: &str) -> Item {
    Item::new(
        path,
        path.len() as u64,
        stash_fs::timestamp::parse("2024-03-01T10:00:00.123456789+02:00").unwrap(),
        Checksum::from(checksum),
    )
}

#[derive(Debug, Clone)]
enum Op {
    Add(String, String),
    Set(String, String),
    DeletePath(String),
    DeleteChecksum(String),
}

fn op() -> impl Strategy<Value = Op> {
    let path = prop::sample::select(vec!["a.jpg", "b.jpg", "c/d.jpg", "e.raw"]);
    let checksum = prop::sample::select(vec!["aa", "bb", "cc"]);
    prop_oneof![
        (path.clone(), checksum.clone()).prop_map(|(p, c)| Op::Add(p.into(), c.into())),
        (path.clone(), checksum.clone()).prop_map(|(p, c)| Op::Set(p.into(), c.into())),
        path.prop_map(|p| Op::DeletePath(p.into())),
        checksum.prop_map(|c| Op::DeleteChecksum(c.into())),
    ]
}

fn apply(catalog: &mut Catalog, op: &Op) {
    match op {
        Op::Add(path, checksum) => {
            let _ = catalog.add(item(path, checksum));
        }
        Op::Set(path, checksum) => catalog.set(item(path, checksum)),
        Op::DeletePath(path) => {
            let _ = catalog.delete_path(path);
        }
        Op::DeleteChecksum(checksum) => catalog.delete_checksum(&checksum.as_str().into()),
    }
}

proptest! {
    #[test]
    fn test_at_most_one_item_per_path(ops in prop::collection::vec(op(), 0..40)) {
        let mut catalog = Catalog::new();
        for op in &ops {
            apply(&mut catalog, op);
        }

        let mut seen = HashSet::new();
        for item in catalog.all_items() {
            prop_assert!(seen.insert(item.path.clone()), "duplicate path {}", item.path);
            prop_assert_eq!(catalog.get(&item.path), Some(item));
        }
    }

    #[test]
    fn test_deleted_checksum_is_known_and_not_live(ops in prop::collection::vec(op(), 0..40)) {
        let mut catalog = Catalog::new();
        for op in &ops {
            apply(&mut catalog, op);
        }

        for checksum in ["aa", "bb", "cc"].map(Checksum::from) {
            let expected = catalog.is_known_checksum(&checksum) && !catalog.is_live_checksum(&checksum);
            prop_assert_eq!(catalog.is_deleted_checksum(&checksum), expected);
        }
        for checksum in catalog.tombstones() {
            prop_assert!(catalog.is_deleted_checksum(checksum));
        }
    }

    #[test]
    fn test_set_revives_checksum(ops in prop::collection::vec(op(), 0..40)) {
        let mut catalog = Catalog::new();
        for op in &ops {
            apply(&mut catalog, op);
        }

        catalog.set(item("revived.jpg", "aa"));

        prop_assert!(catalog.is_live_checksum(&"aa".into()));
        prop_assert!(!catalog.is_deleted_checksum(&"aa".into()));
    }

    #[test]
    fn test_snapshot_round_trip_preserves_catalog(ops in prop::collection::vec(op(), 0..30)) {
        let mut catalog = Catalog::new();
        for op in &ops {
            apply(&mut catalog, op);
        }
        let dir = tempfile::tempdir().unwrap();
        let path = Catalog::snapshot_path(dir.path());

        catalog.save(&path).unwrap();
        let loaded = Catalog::load(&path).unwrap();

        prop_assert_eq!(loaded, catalog);
    }
}

#[test]
fn test_add_after_checksum_delete_revives() {
    let mut catalog = Catalog::new();
    catalog.add(item("a.jpg", "aa")).unwrap();
    catalog.delete_checksum(&"aa".into());
    assert!(catalog.is_deleted_checksum(&"aa".into()));
    assert!(catalog.get("a.jpg").unwrap().deleted);

    catalog.add(item("b.jpg", "aa")).unwrap();

    assert!(!catalog.is_deleted_checksum(&"aa".into()));
    assert_eq!(catalog.items_by_checksum(&"aa".into()).len(), 2);
    assert_eq!(catalog.count(), 1);
    assert_eq!(catalog.deleted_count(), 1);
}

#[test]
fn test_tombstone_without_items_is_deleted() {
    let mut catalog = Catalog::new();
    catalog.delete_checksum(&"ff".into());

    assert!(catalog.is_known_checksum(&"ff".into()));
    assert!(catalog.is_deleted_checksum(&"ff".into()));
    assert!(catalog.items_by_checksum(&"ff".into()).is_empty());
}

#[test]
fn test_delete_unknown_path_fails() {
    let mut catalog = Catalog::new();
    let err = catalog.delete_path("missing.jpg").unwrap_err();
    assert!(matches!(err, Error::NoSuchFile { ref path } if path == "missing.jpg"));
}

#[test]
fn test_load_missing_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let err = Catalog::load(&dir.path().join(CATALOG_FILE)).unwrap_err();
    assert!(matches!(err, Error::SnapshotMissing { .. }));
}

#[test]
fn test_load_garbage_snapshot_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CATALOG_FILE);
    std::fs::write(&path, "this is [not toml").unwrap();

    let err = Catalog::load(&path).unwrap_err();
    assert!(matches!(err, Error::SnapshotCorrupt { .. }));
}

#[test]
fn test_snapshot_keeps_timestamp_offset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CATALOG_FILE);
    let mut catalog = Catalog::new();
    catalog.add(item("a.jpg", "aa")).unwrap();

    catalog.save(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();

    assert!(text.contains("2024-03-01T10:00:00.123456789+02:00"), "{}", text);
    assert_eq!(Catalog::load(&path).unwrap(), catalog);
}
