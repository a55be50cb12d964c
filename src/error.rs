//! Structured error handling and exit codes.

use thiserror::Error;

use crate::operator::OperatorError;

/// Exit codes for the dupefind binary.
///
/// - 0: The run completed, including runs that found nothing, selected
///   nothing or were cancelled at confirmation
/// - 1: The run aborted (operator input closed, bad configuration)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: the run completed.
    Success = 0,
    /// General error: the run aborted.
    GeneralError = 1,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DF000",
            Self::GeneralError => "DF001",
        }
    }
}

/// Errors that abort a run.
///
/// Per-file failures (unreadable entries, unhashable files, failed removals)
/// never show up here; they are reported to the operator and the run goes on.
#[derive(Debug, Error)]
pub enum AppError {
    /// The operator could not be asked or could not answer.
    #[error(transparent)]
    Operator(#[from] OperatorError),

    /// The configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(#[from] figment::Error),
}
