use dupefind::app::run;
use dupefind::config::Config;
use dupefind::operator::{Event, Prompt, RunOutcome, ScriptedOperator};
use std::fs;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

fn hello_world_fixture() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"hello").unwrap();
    fs::write(dir.path().join("b"), b"hello").unwrap();
    fs::write(dir.path().join("c"), b"world").unwrap();
    dir
}

#[test]
fn test_pipeline_delete_second_copy() {
    let dir = hello_world_fixture();
    let mut operator = ScriptedOperator::new()
        .with_selections(["2"])
        .with_confirmation("y");

    let summary = run(
        Some(dir.path().to_path_buf()),
        &Config::default(),
        &mut operator,
        None,
    )
    .unwrap();

    assert_eq!(
        operator.prompts()[0],
        Prompt::Selection {
            index: 1,
            total: 1,
            paths: vec![dir.path().join("a"), dir.path().join("b")],
        }
    );
    assert_eq!(operator.prompts()[1], Prompt::Confirmation { count: 1 });

    assert!(dir.path().join("a").exists());
    assert!(!dir.path().join("b").exists());
    assert!(dir.path().join("c").exists());

    assert_eq!(
        summary.outcome(),
        RunOutcome::Completed {
            deleted: 1,
            failed: 0
        }
    );
    assert!(operator.events().contains(&Event::Deleted {
        path: dir.path().join("b")
    }));
    assert_eq!(
        operator.events().last(),
        Some(&Event::Finished(RunOutcome::Completed {
            deleted: 1,
            failed: 0
        }))
    );
}

#[test]
fn test_pipeline_keep_all_removes_nothing() {
    let dir = hello_world_fixture();
    let mut operator = ScriptedOperator::new().with_selections(["k"]);

    let summary = run(
        Some(dir.path().to_path_buf()),
        &Config::default(),
        &mut operator,
        None,
    )
    .unwrap();

    assert_eq!(summary.outcome(), RunOutcome::NothingSelected);
    assert!(!operator.was_asked_to_confirm());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
}

#[test]
fn test_pipeline_decline_confirmation() {
    let dir = hello_world_fixture();
    let mut operator = ScriptedOperator::new()
        .with_selections(["1,2"])
        .with_confirmation("n");

    let summary = run(
        Some(dir.path().to_path_buf()),
        &Config::default(),
        &mut operator,
        None,
    )
    .unwrap();

    assert_eq!(summary.outcome(), RunOutcome::Cancelled);
    assert_eq!(operator.prompts()[1], Prompt::Confirmation { count: 2 });
    assert!(dir.path().join("a").exists());
    assert!(dir.path().join("b").exists());
}

#[test]
fn test_pipeline_invalid_tokens_do_not_block_valid_ones() {
    let dir = tempdir().unwrap();
    for name in ["x1", "x2", "x3"] {
        fs::write(dir.path().join(name), b"triplicate").unwrap();
    }
    let mut operator = ScriptedOperator::new()
        .with_selections(["0 3 banana 7"])
        .with_confirmation("yes");

    run(
        Some(dir.path().to_path_buf()),
        &Config::default(),
        &mut operator,
        None,
    )
    .unwrap();

    assert!(dir.path().join("x1").exists());
    assert!(dir.path().join("x2").exists());
    assert!(!dir.path().join("x3").exists());

    let ignored: Vec<&str> = operator
        .events()
        .iter()
        .filter_map(|e| match e {
            Event::SelectionIgnored { token, .. } => Some(token.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(ignored, vec!["0", "banana", "7"]);
}

#[test]
fn test_pipeline_several_groups_one_confirmation() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a1"), b"alpha").unwrap();
    fs::write(dir.path().join("a2"), b"alpha").unwrap();
    fs::write(dir.path().join("b1"), b"bravo!").unwrap();
    fs::write(dir.path().join("b2"), b"bravo!").unwrap();
    let mut operator = ScriptedOperator::new()
        .with_selections(["1", "2"])
        .with_confirmation("Y");

    let summary = run(
        Some(dir.path().to_path_buf()),
        &Config::default(),
        &mut operator,
        None,
    )
    .unwrap();

    assert_eq!(summary.duplicate_groups, 2);
    assert_eq!(operator.selection_prompts(), 2);
    assert_eq!(
        summary.outcome(),
        RunOutcome::Completed {
            deleted: 2,
            failed: 0
        }
    );

    let mut remaining: Vec<PathBuf> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    remaining.sort();
    assert_eq!(remaining, vec![dir.path().join("a2"), dir.path().join("b1")]);
}

#[test]
fn test_pipeline_parallel_hashing_matches_sequential() {
    let dir = tempdir().unwrap();
    for i in 0..24 {
        fs::write(
            dir.path().join(format!("f{:02}", i)),
            format!("payload-{}", i % 5),
        )
        .unwrap();
    }

    let mut sequential = ScriptedOperator::new().with_selections(vec!["k"; 5]);
    run(
        Some(dir.path().to_path_buf()),
        &Config::default(),
        &mut sequential,
        None,
    )
    .unwrap();

    let parallel_config = Config {
        hash_threads: 4,
        ..Config::default()
    };
    let mut parallel = ScriptedOperator::new().with_selections(vec!["k"; 5]);
    run(
        Some(dir.path().to_path_buf()),
        &parallel_config,
        &mut parallel,
        None,
    )
    .unwrap();

    assert_eq!(sequential.prompts(), parallel.prompts());
    assert_eq!(sequential.selection_prompts(), 5);
}
