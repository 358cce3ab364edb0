use pretty_assertions::assert_eq;
use rstest::rstest;
use stash_fs::NormalizedPath;
use std::path::Path;

#[rstest]
#[case("foo/bar/baz", "foo/bar/baz")]
#[case("foo\\bar\\baz", "foo/bar/baz")]
#[case("foo/bar\\baz", "foo/bar/baz")]
#[case("./a/./b//c", "a/b/c")]
#[case("a/../b", "b")]
#[case("../../a/b", "a/b")]
#[case("/a/b/../../c", "/c")]
fn test_normalization(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(input).as_str(), expected);
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("foo/bar");
    assert_eq!(base.join("baz").as_str(), "foo/bar/baz");
}

#[test]
fn test_parent() {
    let path = NormalizedPath::new("foo/bar/baz");
    assert_eq!(path.parent().unwrap().as_str(), "foo/bar");
    assert!(NormalizedPath::new("baz").parent().is_none());
}

#[test]
fn test_file_name_and_extension() {
    let path = NormalizedPath::new("foo/bar/baz.tar.gz");
    assert_eq!(path.file_name(), Some("baz.tar.gz"));
    assert_eq!(path.extension(), Some("gz"));
    assert_eq!(NormalizedPath::new("foo/.hidden").extension(), None);
}

#[test]
fn test_relative_to_root() {
    let root = Path::new("/data/collection");
    let rel = NormalizedPath::relative_to(root, &root.join("2024").join("img.jpg")).unwrap();
    assert_eq!(rel.as_str(), "2024/img.jpg");
}

#[test]
fn test_relative_to_outside_root_is_none() {
    let root = Path::new("/data/collection");
    assert!(NormalizedPath::relative_to(root, Path::new("/data/other/a.txt")).is_none());
    assert!(NormalizedPath::relative_to(root, root).is_none());
}

#[test]
fn test_under_resolves_against_root() {
    let root = Path::new("/data/collection");
    let native = NormalizedPath::new("2024/img.jpg").under(root);
    assert_eq!(native, root.join("2024").join("img.jpg"));
}

#[rstest]
#[case("a/b.jpg", "a/b.jpg")]
#[case("dup\\x.jpg", "dup\\x.jpg")]
#[case("raw/a\\b/c.raw", "raw/a\\b/c.raw")]
fn test_from_key_splits_on_slash_only(#[case] key: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::from_key(key).as_str(), expected);
}

#[cfg(unix)]
#[test]
fn test_key_with_backslash_round_trips_through_root() {
    let root = Path::new("/data/collection");
    let native = NormalizedPath::from_key("dup\\x.jpg").under(root);

    assert_eq!(native, root.join("dup\\x.jpg"));
    assert_eq!(
        NormalizedPath::relative_to(root, &native).unwrap().as_str(),
        "dup\\x.jpg"
    );
}
