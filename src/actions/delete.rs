//! Confirmed, per-file deletion.
//!
//! # Overview
//!
//! This module provides the last stage of a run:
//! - A confirmation gate in front of any removal
//! - Batch removal that records every failure and keeps going
//! - Per-file progress forwarded to the operator
//!
//! Removal is permanent. There is no rollback: a file removed before a later
//! failure stays removed.
//!
//! # Example
//!
//! ```no_run
//! use dupefind::actions::delete::remove_file;
//! use std::path::Path;
//!
//! match remove_file(Path::new("/path/to/duplicate.txt")) {
//!     Ok(result) => println!("Deleted: {} ({} bytes)", result.path.display(), result.size),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::operator::{Event, Operator, OperatorError, RunOutcome};
use crate::selection::DeletionRequest;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved since the scan).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The path no longer names a regular file.
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::NotAFile(p)
            | Self::Io { path: p, .. } => p,
        }
    }

    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Result of a successful deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
}

/// Outcome of one attempted removal.
#[derive(Debug)]
pub struct DeleteOutcome {
    /// Path that was attempted.
    pub path: PathBuf,
    /// Bytes freed, or why nothing was.
    pub result: Result<u64, DeleteError>,
}

/// Results of a batch deletion, one outcome per attempted path.
#[derive(Debug, Default)]
pub struct BatchDeleteResult {
    /// Outcomes in attempt order.
    pub outcomes: Vec<DeleteOutcome>,
    /// Total bytes freed.
    pub bytes_freed: u64,
}

impl BatchDeleteResult {
    /// Number of successful deletions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    /// Total number of attempted deletions.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Paths that were removed, in attempt order.
    pub fn deleted_paths(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .map(|o| o.path.as_path())
    }

    /// Errors for paths that could not be removed, in attempt order.
    pub fn errors(&self) -> impl Iterator<Item = &DeleteError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Deleted {} file(s), freed {} bytes",
                self.success_count(),
                self.bytes_freed
            )
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {} bytes",
                self.success_count(),
                self.failure_count(),
                self.bytes_freed
            )
        }
    }
}

/// Callback trait for deletion progress reporting.
pub trait DeleteProgressCallback {
    /// Called before each file deletion.
    fn on_before_delete(&mut self, path: &Path, index: usize, total: usize);

    /// Called after successful deletion.
    fn on_delete_success(&mut self, path: &Path, size: u64);

    /// Called after failed deletion.
    fn on_delete_failure(&mut self, path: &Path, error: &DeleteError);

    /// Called when batch operation completes.
    fn on_complete(&mut self, result: &BatchDeleteResult);
}

/// Forwards per-file outcomes to the operator as events.
struct OperatorProgress<'a> {
    operator: &'a mut dyn Operator,
}

impl DeleteProgressCallback for OperatorProgress<'_> {
    fn on_before_delete(&mut self, path: &Path, index: usize, total: usize) {
        log::debug!("Deleting {}/{}: {}", index + 1, total, path.display());
    }

    fn on_delete_success(&mut self, path: &Path, _size: u64) {
        self.operator.notify(Event::Deleted {
            path: path.to_path_buf(),
        });
    }

    fn on_delete_failure(&mut self, path: &Path, error: &DeleteError) {
        self.operator.notify(Event::DeleteFailed {
            path: path.to_path_buf(),
            message: error.to_string(),
        });
    }

    fn on_complete(&mut self, _result: &BatchDeleteResult) {}
}

/// Permanently delete a single regular file.
///
/// The file's size is read first so the freed space can be reported.
///
/// # Errors
///
/// - `NotFound` if the file is gone
/// - `PermissionDenied` if removal is not allowed
/// - `NotAFile` if the path now names a directory or special file
/// - `Io` for anything else
pub fn remove_file(path: &Path) -> Result<DeleteResult, DeleteError> {
    let metadata = fs::metadata(path).map_err(|e| DeleteError::from_io(path, e))?;
    if !metadata.is_file() {
        return Err(DeleteError::NotAFile(path.to_path_buf()));
    }
    let size = metadata.len();

    fs::remove_file(path).map_err(|e| {
        log::error!("Delete failed for {}: {}", path.display(), e);
        DeleteError::from_io(path, e)
    })?;

    log::info!("Deleted: {} ({} bytes)", path.display(), size);

    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
    })
}

/// Delete multiple files in batch.
///
/// Every path is attempted in order; a failure is recorded and the batch
/// moves on to the next path.
///
/// # Example
///
/// ```no_run
/// use dupefind::actions::delete::{delete_batch, DeleteProgressCallback, BatchDeleteResult, DeleteError};
/// use std::path::{Path, PathBuf};
///
/// struct NoCallback;
/// impl DeleteProgressCallback for NoCallback {
///     fn on_before_delete(&mut self, _: &Path, _: usize, _: usize) {}
///     fn on_delete_success(&mut self, _: &Path, _: u64) {}
///     fn on_delete_failure(&mut self, _: &Path, _: &DeleteError) {}
///     fn on_complete(&mut self, _: &BatchDeleteResult) {}
/// }
///
/// let paths = vec![PathBuf::from("/dup1.txt"), PathBuf::from("/dup2.txt")];
/// let result = delete_batch::<NoCallback>(&paths, None);
/// println!("{}", result.summary());
/// ```
pub fn delete_batch<C: DeleteProgressCallback + ?Sized>(
    paths: &[PathBuf],
    mut callback: Option<&mut C>,
) -> BatchDeleteResult {
    let mut result = BatchDeleteResult::default();
    let total = paths.len();

    for (index, path) in paths.iter().enumerate() {
        if let Some(cb) = callback.as_deref_mut() {
            cb.on_before_delete(path, index, total);
        }

        match remove_file(path) {
            Ok(del) => {
                result.bytes_freed += del.size;
                if let Some(cb) = callback.as_deref_mut() {
                    cb.on_delete_success(path, del.size);
                }
                result.outcomes.push(DeleteOutcome {
                    path: del.path,
                    result: Ok(del.size),
                });
            }
            Err(e) => {
                log::warn!("Failed to delete {}: {}", path.display(), e);
                if let Some(cb) = callback.as_deref_mut() {
                    cb.on_delete_failure(path, &e);
                }
                result.outcomes.push(DeleteOutcome {
                    path: path.clone(),
                    result: Err(e),
                });
            }
        }
    }

    if let Some(cb) = callback.as_deref_mut() {
        cb.on_complete(&result);
    }

    log::info!("{}", result.summary());

    result
}

/// Whether a confirmation reply means yes.
///
/// Only `y` and `yes`, in any case and surrounded by any whitespace, count.
#[must_use]
pub fn is_affirmative(reply: &str) -> bool {
    let reply = reply.trim();
    reply.eq_ignore_ascii_case("y") || reply.eq_ignore_ascii_case("yes")
}

/// What the deletion stage did.
#[derive(Debug)]
pub enum DeletionReport {
    /// The request was empty; the operator was not asked.
    NothingSelected,
    /// The operator declined; no file was touched.
    Cancelled,
    /// Removal was attempted for every requested path.
    Completed(BatchDeleteResult),
}

impl DeletionReport {
    /// Summary form reported to the operator.
    #[must_use]
    pub fn outcome(&self) -> RunOutcome {
        match self {
            Self::NothingSelected => RunOutcome::NothingSelected,
            Self::Cancelled => RunOutcome::Cancelled,
            Self::Completed(batch) => RunOutcome::Completed {
                deleted: batch.success_count(),
                failed: batch.failure_count(),
            },
        }
    }
}

/// Ask for confirmation, then remove every requested path.
///
/// # Errors
///
/// Propagates [`OperatorError`] from the confirmation prompt. Removal
/// failures never propagate; they are part of the returned report.
pub fn execute_deletion(
    request: &DeletionRequest,
    operator: &mut dyn Operator,
) -> Result<DeletionReport, OperatorError> {
    if request.is_empty() {
        return Ok(DeletionReport::NothingSelected);
    }

    let reply = operator.request_confirmation(request.len())?;
    if !is_affirmative(&reply) {
        log::info!("Deletion of {} file(s) cancelled", request.len());
        return Ok(DeletionReport::Cancelled);
    }

    let mut progress = OperatorProgress { operator };
    let batch = delete_batch(request.paths(), Some(&mut progress));
    Ok(DeletionReport::Completed(batch))
}
