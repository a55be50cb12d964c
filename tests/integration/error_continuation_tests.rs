use dupefind::app::run;
use dupefind::config::Config;
use dupefind::duplicates::DuplicateFinder;
use dupefind::operator::{Event, RunOutcome, ScriptedOperator};
use dupefind::scanner::{FileRecord, HashError};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_group_continues_when_files_cannot_be_hashed() {
    let finder = DuplicateFinder::with_defaults();
    let file1 = FileRecord::new(PathBuf::from("nonexistent_1.txt"), 100);
    let file2 = FileRecord::new(PathBuf::from("nonexistent_2.txt"), 100);

    let (groups, stats) = finder.group(vec![file1, file2]);

    assert!(groups.is_empty());
    assert_eq!(stats.hash_errors.len(), 2);
    for err in &stats.hash_errors {
        match err {
            HashError::NotFound(_) => {}
            other => panic!("Expected NotFound HashError, got: {:?}", other),
        }
    }
}

#[test]
fn test_unhashable_file_reported_and_rest_grouped() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    let c = dir.path().join("c");
    for p in [&a, &b, &c] {
        fs::write(p, b"identical").unwrap();
    }

    let records = vec![
        FileRecord::new(a.clone(), 9),
        FileRecord::new(b.clone(), 9),
        FileRecord::new(c.clone(), 9),
    ];
    fs::remove_file(&b).unwrap();

    let (groups, stats) = DuplicateFinder::with_defaults().group(records);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths, vec![a, c]);
    assert_eq!(stats.hash_errors.len(), 1);
    assert_eq!(stats.hash_errors[0].path(), b.as_path());
}

#[test]
#[cfg(unix)]
fn test_unreadable_file_excluded_from_run() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    for name in ["a", "b", "c"] {
        fs::write(dir.path().join(name), b"same").unwrap();
    }
    let locked = dir.path().join("b");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read it anyway; nothing to assert then
    if fs::read(&locked).is_ok() {
        return;
    }

    let mut operator = ScriptedOperator::new().with_selections(["k"]);
    let summary = run(
        Some(dir.path().to_path_buf()),
        &Config::default(),
        &mut operator,
        None,
    )
    .unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(summary.files_scanned, 3);
    assert_eq!(summary.hash_errors, 1);
    assert_eq!(summary.duplicate_groups, 1);
    assert!(operator.events().iter().any(|e| matches!(
        e,
        Event::HashFailed { path, .. } if *path == locked
    )));
    assert_eq!(summary.outcome(), RunOutcome::NothingSelected);
}

#[test]
#[cfg(unix)]
fn test_unreadable_directory_does_not_stop_run() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"twin").unwrap();
    fs::write(dir.path().join("b"), b"twin").unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("inner"), b"twin").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let mut operator = ScriptedOperator::new().with_selections(["k"]);
    let summary = run(
        Some(dir.path().to_path_buf()),
        &Config::default(),
        &mut operator,
        None,
    );
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let summary = summary.unwrap();

    assert_eq!(summary.scan_errors, 1);
    assert_eq!(summary.files_scanned, 2);
    assert_eq!(summary.duplicate_groups, 1);
    assert!(operator
        .events()
        .iter()
        .any(|e| matches!(e, Event::ScanFailed { .. })));
}
