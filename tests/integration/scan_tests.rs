use dupefind::duplicates::DuplicateFinder;
use dupefind::scanner::{scan, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tempfile::tempdir;

fn write(path: PathBuf, content: &[u8]) -> PathBuf {
    File::create(&path).unwrap().write_all(content).unwrap();
    path
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let result = scan(dir.path(), &WalkerConfig::default());
    let (groups, stats) = DuplicateFinder::with_defaults().group(result.records);

    assert!(groups.is_empty());
    assert_eq!(stats.size.total_files, 0);
    assert_eq!(stats.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(dir.path().join("a.txt"), b"content a");
    write(dir.path().join("b.txt"), b"content b");
    write(dir.path().join("c.txt"), b"content c");

    let result = scan(dir.path(), &WalkerConfig::default());
    let (groups, stats) = DuplicateFinder::with_defaults().group(result.records);

    assert!(groups.is_empty());
    assert_eq!(stats.size.total_files, 3);
    assert_eq!(stats.hashed_files, 3);
}

#[test]
fn test_scan_duplicate_files() {
    let dir = tempdir().unwrap();
    let a = write(dir.path().join("a.txt"), b"duplicate");
    let b = write(dir.path().join("b.txt"), b"duplicate");
    write(dir.path().join("c.txt"), b"unique");

    let result = scan(dir.path(), &WalkerConfig::default());
    let (groups, stats) = DuplicateFinder::with_defaults().group(result.records);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths, vec![a, b]);
    assert_eq!(stats.duplicate_files, 1);
    assert_eq!(stats.wasted_space, 9);
}

#[test]
fn test_scan_duplicates_across_subdirectories() {
    let dir = tempdir().unwrap();
    let deep = dir.path().join("one").join("two");
    fs::create_dir_all(&deep).unwrap();
    let top = write(dir.path().join("top.bin"), b"same bytes");
    let nested = write(deep.join("nested.bin"), b"same bytes");

    let result = scan(dir.path(), &WalkerConfig::default());
    let (groups, _) = DuplicateFinder::with_defaults().group(result.records);

    assert_eq!(groups.len(), 1);
    assert!(groups[0].paths.contains(&top));
    assert!(groups[0].paths.contains(&nested));
}

#[test]
fn test_scan_multiple_groups_in_traversal_order() {
    let dir = tempdir().unwrap();
    write(dir.path().join("a1"), b"AAAA");
    write(dir.path().join("b1"), b"BBBBBB");
    write(dir.path().join("a2"), b"AAAA");
    write(dir.path().join("b2"), b"BBBBBB");
    write(dir.path().join("a3"), b"AAAA");

    let result = scan(dir.path(), &WalkerConfig::default());
    let (groups, _) = DuplicateFinder::with_defaults().group(result.records);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].size, 4);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(groups[1].size, 6);
    assert_eq!(groups[1].len(), 2);
}

#[test]
fn test_scan_respects_min_size() {
    let dir = tempdir().unwrap();
    write(dir.path().join("s1"), b"ab");
    write(dir.path().join("s2"), b"ab");
    write(dir.path().join("l1"), b"long enough");
    write(dir.path().join("l2"), b"long enough");

    let config = WalkerConfig {
        min_size: 5,
        ..Default::default()
    };
    let result = scan(dir.path(), &config);
    let (groups, _) = DuplicateFinder::with_defaults().group(result.records);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].size, 11);
}

#[test]
fn test_scan_skip_hidden_excludes_hidden_duplicates() {
    let dir = tempdir().unwrap();
    write(dir.path().join("visible"), b"twin");
    write(dir.path().join(".hidden"), b"twin");

    let (all, _) =
        DuplicateFinder::with_defaults().group(scan(dir.path(), &WalkerConfig::default()).records);
    assert_eq!(all.len(), 1);

    let config = WalkerConfig {
        skip_hidden: true,
        ..Default::default()
    };
    let (visible, _) = DuplicateFinder::with_defaults().group(scan(dir.path(), &config).records);
    assert!(visible.is_empty());
}
