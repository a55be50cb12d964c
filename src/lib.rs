//! dupefind - Interactive Duplicate File Finder
//!
//! Finds files with identical content under a directory (same size, same
//! BLAKE3 digest of the full content), asks the operator which copies to
//! remove, and removes them after a confirmation.
//!
//! The pipeline lives in [`app::run`] and only talks to the outside world
//! through the [`operator::Operator`] trait, so it can be driven from a
//! console session or from a script.

pub mod actions;
pub mod app;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod operator;
pub mod progress;
pub mod scanner;
pub mod selection;

use std::sync::Arc;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{AppError, ExitCode};
use crate::operator::{ConsoleOperator, Event, Operator};
use crate::progress::{Progress, ProgressCallback};

/// Run the application with parsed command-line arguments.
///
/// Sets up logging and the console session, then runs the pipeline once.
///
/// # Errors
///
/// Returns the [`AppError`] that aborted the run, after reporting it to the
/// console and flushing the session.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let mut operator = ConsoleOperator::stdio();

    let result = Config::load(&cli.overrides())
        .map_err(AppError::from)
        .and_then(|config| {
            let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(cli.quiet));
            app::run(cli.path.clone(), &config, &mut operator, Some(progress))
        });

    match result {
        Ok(summary) => {
            log::info!(
                "Run finished: {} files, {} groups, {} scan errors, {} hash errors",
                summary.files_scanned,
                summary.duplicate_groups,
                summary.scan_errors,
                summary.hash_errors
            );
            Ok(ExitCode::Success)
        }
        Err(e) => {
            operator.notify(Event::Fatal {
                message: e.to_string(),
            });
            drop(operator);
            Err(e.into())
        }
    }
}
