//! Selection protocol: turning operator replies into a deletion request.
//!
//! Each duplicate group is shown to the operator with members numbered from 1.
//! The reply is parsed with [`parse_selection`]:
//!
//! - `k` (any case) or an empty reply keeps every member
//! - otherwise the reply is split on commas and whitespace, and every token
//!   that is an integer between 1 and the group size marks that member
//! - any other token is ignored and reported back; it never marks anything
//!
//! # Example
//!
//! ```
//! use dupefind::selection::{parse_selection, Selection};
//!
//! assert_eq!(parse_selection(" K ", 3), Selection::KeepAll);
//!
//! let selection = parse_selection("2, 7 x 2", 3);
//! assert_eq!(selection.positions(), &[1]);
//! assert_eq!(selection.ignored(), &["7".to_string(), "x".to_string()]);
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::duplicates::DuplicateGroup;
use crate::operator::{Event, Operator, OperatorError};

/// A parsed reply for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Keep every member.
    KeepAll,
    /// Delete the members at `positions`.
    Delete {
        /// 0-based member indices, in reply order, each at most once
        positions: Vec<usize>,
        /// Tokens that selected nothing
        ignored: Vec<String>,
    },
}

impl Selection {
    /// 0-based indices of the members to delete.
    #[must_use]
    pub fn positions(&self) -> &[usize] {
        match self {
            Self::KeepAll => &[],
            Self::Delete { positions, .. } => positions,
        }
    }

    /// Tokens that were not valid member numbers.
    #[must_use]
    pub fn ignored(&self) -> &[String] {
        match self {
            Self::KeepAll => &[],
            Self::Delete { ignored, .. } => ignored,
        }
    }
}

/// Parse an operator reply for a group of `len` members.
#[must_use]
pub fn parse_selection(reply: &str, len: usize) -> Selection {
    let reply = reply.trim();
    if reply.is_empty() || reply.eq_ignore_ascii_case("k") {
        return Selection::KeepAll;
    }

    let mut positions = Vec::new();
    let mut ignored = Vec::new();

    for token in reply
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        match token.parse::<usize>() {
            Ok(n) if (1..=len).contains(&n) => {
                if !positions.contains(&(n - 1)) {
                    positions.push(n - 1);
                }
            }
            _ => ignored.push(token.to_string()),
        }
    }

    Selection::Delete { positions, ignored }
}

/// Paths marked for deletion, in the order they were selected.
///
/// A path is held at most once, however many times it is selected.
#[derive(Debug, Clone, Default)]
pub struct DeletionRequest {
    paths: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl DeletionRequest {
    /// An empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `path` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.paths.push(path);
        true
    }

    /// Whether `path` is marked.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains(path)
    }

    /// Marked paths in selection order.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Number of marked paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether nothing is marked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FromIterator<PathBuf> for DeletionRequest {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        let mut request = Self::new();
        for path in iter {
            request.insert(path);
        }
        request
    }
}

/// Walk the operator through every group and collect the marked paths.
///
/// With no groups the operator is told so and never prompted.
///
/// # Errors
///
/// Propagates [`OperatorError`] from a prompt; the request built so far is
/// discarded.
pub fn select_for_deletion(
    groups: &[DuplicateGroup],
    operator: &mut dyn Operator,
) -> Result<DeletionRequest, OperatorError> {
    let mut request = DeletionRequest::new();

    if groups.is_empty() {
        operator.notify(Event::NoDuplicates);
        return Ok(request);
    }

    let total = groups.len();
    operator.notify(Event::GroupsFound { count: total });

    for (i, group) in groups.iter().enumerate() {
        let index = i + 1;
        let reply = operator.request_selection(index, total, group)?;
        let selection = parse_selection(&reply, group.len());

        for token in selection.ignored() {
            log::debug!("Group {}: ignoring token '{}'", index, token);
            operator.notify(Event::SelectionIgnored {
                group: index,
                token: token.clone(),
            });
        }

        if selection.positions().len() == group.len() {
            log::warn!(
                "Group {}: every copy selected, no copy of this content will remain",
                index
            );
        }

        let mut members = Vec::new();
        for &position in selection.positions() {
            if let Some(path) = group.member(position + 1) {
                request.insert(path.to_path_buf());
                members.push(position + 1);
            }
        }
        if !members.is_empty() {
            log::debug!("Group {}: marked members {:?}", index, members);
            operator.notify(Event::SelectionMarked {
                group: index,
                members,
            });
        }
    }

    log::info!("{} file(s) marked for deletion", request.len());
    Ok(request)
}
