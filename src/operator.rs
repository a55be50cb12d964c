//! Operator interface: where replies come from and where results go.
//!
//! The pipeline never talks to a terminal directly. It asks an [`Operator`]
//! for the root path, for a selection per duplicate group and for the final
//! confirmation, and it reports everything else as an [`Event`].
//!
//! Two implementations ship with the crate:
//! - [`ConsoleOperator`]: a line-oriented session over any `BufRead`/`Write`
//!   pair, normally stdin and stdout
//! - [`ScriptedOperator`]: answers from queues and records every call, for
//!   tests and non-interactive drivers

use std::collections::VecDeque;
use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};
use std::path::PathBuf;

use bytesize::ByteSize;
use thiserror::Error;
use yansi::Paint;

use crate::duplicates::DuplicateGroup;

/// Errors raised while talking to the operator.
///
/// These are the only errors of an interactive run that abort it.
#[derive(Debug, Error)]
pub enum OperatorError {
    /// The input ended while a reply was expected.
    #[error("input closed while waiting for a reply")]
    InputClosed,

    /// Reading a reply or writing a prompt failed.
    #[error("operator I/O error: {0}")]
    Io(#[from] io::Error),
}

/// How a run ended, as reported to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No file was marked for deletion.
    NothingSelected,
    /// The operator declined the confirmation; nothing was removed.
    Cancelled,
    /// Removal was attempted for every marked file.
    Completed {
        /// Files removed
        deleted: usize,
        /// Files that could not be removed
        failed: usize,
    },
}

/// Notifications sent to the operator during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Traversal of `root` is starting.
    ScanStarted { root: PathBuf },
    /// An entry could not be read during traversal.
    ScanFailed { path: PathBuf, message: String },
    /// Traversal finished with `count` regular files.
    FilesFound { count: usize },
    /// A file could not be hashed and was left out of grouping.
    HashFailed { path: PathBuf, message: String },
    /// Grouping confirmed `count` duplicate groups.
    GroupsFound { count: usize },
    /// Grouping found nothing to act on.
    NoDuplicates,
    /// A token in the reply for `group` (1-based) selected nothing.
    SelectionIgnored { group: usize, token: String },
    /// The reply for `group` marked these 1-based members for deletion.
    SelectionMarked { group: usize, members: Vec<usize> },
    /// A file was removed.
    Deleted { path: PathBuf },
    /// A file could not be removed.
    DeleteFailed { path: PathBuf, message: String },
    /// The run is over.
    Finished(RunOutcome),
    /// The run is aborting.
    Fatal { message: String },
}

/// The collaborator that provides human input and receives progress.
pub trait Operator {
    /// Ask for the directory to scan.
    ///
    /// # Errors
    ///
    /// Returns `InputClosed` when no reply can be obtained.
    fn request_root(&mut self) -> Result<String, OperatorError>;

    /// Show group `index` of `total` (1-based) and ask which members to delete.
    ///
    /// # Errors
    ///
    /// Returns `InputClosed` when no reply can be obtained.
    fn request_selection(
        &mut self,
        index: usize,
        total: usize,
        group: &DuplicateGroup,
    ) -> Result<String, OperatorError>;

    /// Ask whether `count` files should really be removed.
    ///
    /// # Errors
    ///
    /// Returns `InputClosed` when no reply can be obtained.
    fn request_confirmation(&mut self, count: usize) -> Result<String, OperatorError>;

    /// Report an event. Never fails; delivery problems are the operator's own.
    fn notify(&mut self, event: Event);
}

/// Line-oriented console session.
///
/// Owns its input and output handles for the whole run. Output is flushed
/// after every prompt and again when the session is dropped.
pub struct ConsoleOperator<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl ConsoleOperator<StdinLock<'static>, Stdout> {
    /// Session over the process's standard input and output.
    #[must_use]
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    /// Session over arbitrary handles.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Borrow the output handle.
    pub fn output(&self) -> &W {
        &self.output
    }

    fn prompt(&mut self, text: &str) -> Result<String, OperatorError> {
        write!(self.output, "{} ", text.bold())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            log::debug!("Input closed at prompt: {}", text);
            return Err(OperatorError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{}", text) {
            log::debug!("Failed to write to console: {}", e);
        }
    }
}

impl<R: BufRead, W: Write> Operator for ConsoleOperator<R, W> {
    fn request_root(&mut self) -> Result<String, OperatorError> {
        self.prompt("Directory to scan:")
    }

    fn request_selection(
        &mut self,
        index: usize,
        total: usize,
        group: &DuplicateGroup,
    ) -> Result<String, OperatorError> {
        writeln!(
            self.output,
            "\n{} ({} files, {} each)",
            format!("Group {}/{}", index, total).cyan().bold(),
            group.len(),
            ByteSize::b(group.size)
        )?;
        for (i, path) in group.paths.iter().enumerate() {
            writeln!(self.output, "  {} {}", format!("[{}]", i + 1).cyan(), path.display())?;
        }
        self.prompt("Numbers to delete (e.g. 2 or 2,3), k or Enter to keep all:")
    }

    fn request_confirmation(&mut self, count: usize) -> Result<String, OperatorError> {
        self.prompt(&format!("Delete {} file(s)? [y/N]:", count))
    }

    fn notify(&mut self, event: Event) {
        let text = match event {
            Event::ScanStarted { root } => format!("Scanning {} ...", root.display()),
            Event::ScanFailed { message, .. } => {
                format!("{} {}", "warning:".yellow().bold(), message)
            }
            Event::FilesFound { count } => format!("Found {} file(s)", count),
            Event::HashFailed { message, .. } => {
                format!("{} skipped, {}", "warning:".yellow().bold(), message)
            }
            Event::GroupsFound { count } => {
                format!("{}", format!("{} duplicate group(s) found", count).bold())
            }
            Event::NoDuplicates => format!("{}", "No duplicate files found.".green()),
            Event::SelectionIgnored { group, token } => format!(
                "{} ignoring '{}' for group {}",
                "warning:".yellow().bold(),
                token,
                group
            ),
            Event::SelectionMarked { group, members } => {
                let listed: Vec<String> = members.iter().map(|m| format!("[{}]", m)).collect();
                format!("Group {}: marked {} for deletion", group, listed.join(" "))
            }
            Event::Deleted { path } => format!("{} {}", "deleted".green(), path.display()),
            Event::DeleteFailed { message, .. } => {
                format!("{} {}", "failed".red().bold(), message)
            }
            Event::Finished(RunOutcome::NothingSelected) => {
                "Nothing selected for deletion.".to_string()
            }
            Event::Finished(RunOutcome::Cancelled) => {
                format!("{}", "Deletion cancelled, no files were removed.".yellow())
            }
            Event::Finished(RunOutcome::Completed { deleted, failed }) => {
                format!("Done: {} deleted, {} failed", deleted, failed)
            }
            Event::Fatal { message } => format!("{} {}", "error:".red().bold(), message),
        };
        self.line(&text);
    }
}

impl<R: BufRead, W: Write> Drop for ConsoleOperator<R, W> {
    fn drop(&mut self) {
        if let Err(e) = self.output.flush() {
            log::debug!("Failed to flush console on close: {}", e);
        }
    }
}

/// A prompt issued to a [`ScriptedOperator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// `request_root`
    Root,
    /// `request_selection`, with the group's paths as shown
    Selection {
        index: usize,
        total: usize,
        paths: Vec<PathBuf>,
    },
    /// `request_confirmation`
    Confirmation { count: usize },
}

/// Operator that answers from pre-loaded queues and records everything.
///
/// A prompt whose queue is empty fails with [`OperatorError::InputClosed`],
/// which is what a console session does at end of input.
///
/// # Example
///
/// ```
/// use dupefind::operator::{Event, Operator, ScriptedOperator};
///
/// let mut operator = ScriptedOperator::new().with_confirmation("y");
/// assert_eq!(operator.request_confirmation(1).unwrap(), "y");
/// assert!(operator.request_confirmation(1).is_err());
///
/// operator.notify(Event::NoDuplicates);
/// assert_eq!(operator.events(), &[Event::NoDuplicates]);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    roots: VecDeque<String>,
    selections: VecDeque<String>,
    confirmations: VecDeque<String>,
    events: Vec<Event>,
    prompts: Vec<Prompt>,
}

impl ScriptedOperator {
    /// Operator with no answers queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for `request_root`.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.roots.push_back(root.into());
        self
    }

    /// Queue replies for `request_selection`, one per group.
    #[must_use]
    pub fn with_selections<I, S>(mut self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections.extend(replies.into_iter().map(Into::into));
        self
    }

    /// Queue a reply for `request_confirmation`.
    #[must_use]
    pub fn with_confirmation(mut self, reply: impl Into<String>) -> Self {
        self.confirmations.push_back(reply.into());
        self
    }

    /// Every event received, in order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Every prompt issued, in order.
    #[must_use]
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    /// Number of selection prompts issued.
    #[must_use]
    pub fn selection_prompts(&self) -> usize {
        self.prompts
            .iter()
            .filter(|p| matches!(p, Prompt::Selection { .. }))
            .count()
    }

    /// Whether a confirmation was ever requested.
    #[must_use]
    pub fn was_asked_to_confirm(&self) -> bool {
        self.prompts
            .iter()
            .any(|p| matches!(p, Prompt::Confirmation { .. }))
    }
}

impl Operator for ScriptedOperator {
    fn request_root(&mut self) -> Result<String, OperatorError> {
        self.prompts.push(Prompt::Root);
        self.roots.pop_front().ok_or(OperatorError::InputClosed)
    }

    fn request_selection(
        &mut self,
        index: usize,
        total: usize,
        group: &DuplicateGroup,
    ) -> Result<String, OperatorError> {
        self.prompts.push(Prompt::Selection {
            index,
            total,
            paths: group.paths.clone(),
        });
        self.selections.pop_front().ok_or(OperatorError::InputClosed)
    }

    fn request_confirmation(&mut self, count: usize) -> Result<String, OperatorError> {
        self.prompts.push(Prompt::Confirmation { count });
        self.confirmations
            .pop_front()
            .ok_or(OperatorError::InputClosed)
    }

    fn notify(&mut self, event: Event) {
        self.events.push(event);
    }
}
