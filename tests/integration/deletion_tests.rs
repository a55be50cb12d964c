use dupefind::actions::{
    delete_batch, execute_deletion, BatchDeleteResult, DeleteError, DeleteProgressCallback,
    DeletionReport,
};
use dupefind::operator::{Event, RunOutcome, ScriptedOperator};
use dupefind::selection::DeletionRequest;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

struct Silent;

impl DeleteProgressCallback for Silent {
    fn on_before_delete(&mut self, _: &Path, _: usize, _: usize) {}
    fn on_delete_success(&mut self, _: &Path, _: u64) {}
    fn on_delete_failure(&mut self, _: &Path, _: &DeleteError) {}
    fn on_complete(&mut self, _: &BatchDeleteResult) {}
}

#[test]
fn test_batch_removes_in_order_and_counts_bytes() {
    let dir = tempdir().unwrap();
    let paths: Vec<PathBuf> = (0..4)
        .map(|i| {
            let p = dir.path().join(format!("copy{i}"));
            fs::write(&p, vec![b'x'; 10 * (i + 1)]).unwrap();
            p
        })
        .collect();

    let result = delete_batch::<Silent>(&paths, None);

    assert!(result.all_succeeded());
    assert_eq!(result.bytes_freed, 10 + 20 + 30 + 40);
    let order: Vec<&Path> = result.outcomes.iter().map(|o| o.path.as_path()).collect();
    let expected: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
    assert_eq!(order, expected);
    assert!(paths.iter().all(|p| !p.exists()));
}

#[test]
fn test_file_removed_externally_before_deletion() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::write(&a, b"dup").unwrap();
    fs::write(&b, b"dup").unwrap();

    let request: DeletionRequest = vec![a.clone(), b.clone()].into_iter().collect();
    fs::remove_file(&a).unwrap();

    let mut operator = ScriptedOperator::new().with_confirmation("y");
    let report = execute_deletion(&request, &mut operator).unwrap();

    assert_eq!(
        report.outcome(),
        RunOutcome::Completed {
            deleted: 1,
            failed: 1
        }
    );
    match &report {
        DeletionReport::Completed(batch) => {
            assert!(matches!(
                batch.outcomes[0].result,
                Err(DeleteError::NotFound(_))
            ));
            assert!(batch.outcomes[1].result.is_ok());
        }
        other => panic!("expected a completed report, got {:?}", other),
    }
    assert!(matches!(operator.events()[0], Event::DeleteFailed { .. }));
    assert_eq!(operator.events()[1], Event::Deleted { path: b.clone() });
    assert!(!b.exists());
}

#[test]
fn test_path_replaced_by_directory_is_not_removed() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("was_a_file");
    fs::write(&target, b"data").unwrap();
    let request: DeletionRequest = vec![target.clone()].into_iter().collect();

    fs::remove_file(&target).unwrap();
    fs::create_dir(&target).unwrap();

    let mut operator = ScriptedOperator::new().with_confirmation("yes");
    let report = execute_deletion(&request, &mut operator).unwrap();

    assert_eq!(
        report.outcome(),
        RunOutcome::Completed {
            deleted: 0,
            failed: 1
        }
    );
    assert!(target.is_dir());
}

#[test]
fn test_non_affirmative_replies_cancel() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("keep");
    fs::write(&file, b"keep").unwrap();
    let request: DeletionRequest = vec![file.clone()].into_iter().collect();

    for reply in ["", "no", "N", "sure", "yess", "ok"] {
        let mut operator = ScriptedOperator::new().with_confirmation(reply);
        let report = execute_deletion(&request, &mut operator).unwrap();
        assert_eq!(report.outcome(), RunOutcome::Cancelled, "reply {:?}", reply);
    }
    assert!(file.exists());
}
