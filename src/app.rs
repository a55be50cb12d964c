//! Run orchestration: scan, group, select, delete.
//!
//! Stages run strictly one after another. Per-item failures of every stage
//! are logged, forwarded to the operator and otherwise absorbed; only an
//! operator failure ends a run early.

use std::path::PathBuf;
use std::sync::Arc;

use crate::actions::{execute_deletion, DeletionReport};
use crate::config::Config;
use crate::duplicates::DuplicateFinder;
use crate::error::AppError;
use crate::operator::{Event, Operator, RunOutcome};
use crate::progress::ProgressCallback;
use crate::scanner::Walker;
use crate::selection::select_for_deletion;

/// What a completed run did.
#[derive(Debug)]
pub struct RunSummary {
    /// Directory that was scanned
    pub root: PathBuf,
    /// Regular files found
    pub files_scanned: usize,
    /// Entries that could not be read during traversal
    pub scan_errors: usize,
    /// Files left out of grouping because they could not be hashed
    pub hash_errors: usize,
    /// Duplicate groups shown to the operator
    pub duplicate_groups: usize,
    /// Result of the deletion stage
    pub report: DeletionReport,
}

impl RunSummary {
    /// How the run ended.
    #[must_use]
    pub fn outcome(&self) -> RunOutcome {
        self.report.outcome()
    }
}

/// Run the whole pipeline once.
///
/// When `root` is `None` the operator is asked for it.
///
/// # Errors
///
/// Returns [`AppError::Operator`] when a prompt cannot be answered. Anything
/// removed before that point stays removed.
pub fn run(
    root: Option<PathBuf>,
    config: &Config,
    operator: &mut dyn Operator,
    progress: Option<Arc<dyn ProgressCallback>>,
) -> Result<RunSummary, AppError> {
    let root = match root {
        Some(root) => root,
        None => PathBuf::from(operator.request_root()?.trim()),
    };
    log::info!("Scanning {} with {:?}", root.display(), config);

    // Scan
    operator.notify(Event::ScanStarted { root: root.clone() });
    if let Some(ref callback) = progress {
        callback.on_phase_start("walking", 0);
    }

    let walker = Walker::new(&root, config.walker_config());
    let mut records = Vec::new();
    let mut scan_errors = 0;
    for entry in walker.walk() {
        match entry {
            Ok(record) => {
                if let Some(ref callback) = progress {
                    callback.on_progress(&record.path);
                }
                records.push(record);
            }
            Err(e) => {
                scan_errors += 1;
                operator.notify(Event::ScanFailed {
                    path: e.path().to_path_buf(),
                    message: e.to_string(),
                });
            }
        }
    }

    if let Some(ref callback) = progress {
        callback.on_phase_end("walking");
    }
    let files_scanned = records.len();
    operator.notify(Event::FilesFound {
        count: files_scanned,
    });

    // Group
    let mut finder_config = config.finder_config();
    if let Some(callback) = progress {
        finder_config = finder_config.with_progress_callback(callback);
    }
    let (groups, stats) = DuplicateFinder::new(finder_config).group(records);
    for error in &stats.hash_errors {
        operator.notify(Event::HashFailed {
            path: error.path().to_path_buf(),
            message: error.to_string(),
        });
    }

    // Select and delete
    let request = select_for_deletion(&groups, operator)?;
    let report = execute_deletion(&request, operator)?;
    operator.notify(Event::Finished(report.outcome()));

    if let DeletionReport::Completed(ref batch) = report {
        log::info!("{}", batch.summary());
    }

    Ok(RunSummary {
        root,
        files_scanned,
        scan_errors,
        hash_errors: stats.hash_errors.len(),
        duplicate_groups: groups.len(),
        report,
    })
}
