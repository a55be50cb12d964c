//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and collecting a [`FileRecord`] for every regular file in it.
//!
//! # Features
//!
//! - Depth-first traversal with entries sorted by file name, so two walks of
//!   an unchanged tree produce the same sequence
//! - Per-entry error reporting: an unreadable directory or a broken entry is
//!   yielded as a [`ScanError`] and the walk carries on
//! - Symlink following (on by default), hidden-entry skipping and minimum size
//!
//! # Example
//!
//! ```no_run
//! use dupefind::scanner::{scan, WalkerConfig};
//! use std::path::Path;
//!
//! let result = scan(Path::new("/home/user/Downloads"), &WalkerConfig::default());
//! println!("{} files, {} errors", result.records.len(), result.errors.len());
//! ```

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{FileRecord, ScanError, WalkerConfig};

/// Everything a completed walk produced.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Regular files, in traversal order
    pub records: Vec<FileRecord>,
    /// Entries that could not be read
    pub errors: Vec<ScanError>,
}

/// Walk `root` to completion and collect records and errors separately.
///
/// Never fails as a whole; a missing root shows up as a single error.
#[must_use]
pub fn scan(root: &Path, config: &WalkerConfig) -> ScanResult {
    let mut result = ScanResult::default();
    for entry in Walker::new(root, config.clone()).walk() {
        match entry {
            Ok(record) => result.records.push(record),
            Err(e) => result.errors.push(e),
        }
    }
    log::debug!(
        "Scanned {}: {} files, {} errors",
        root.display(),
        result.records.len(),
        result.errors.len()
    );
    result
}

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Walk the directory tree, yielding file records.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. Directories, symlinks that are not followed and other
    /// special files produce nothing.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        let skip_hidden = self.config.skip_hidden;

        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !(skip_hidden && entry.depth() > 0 && is_hidden(entry)))
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(&entry),
                Err(e) => Some(Err(self.handle_walk_error(e))),
            })
    }

    /// Turn a directory entry into a record if it is a regular file that
    /// passes the filters.
    fn process_entry(&self, entry: &DirEntry) -> Option<Result<FileRecord, ScanError>> {
        // The root itself is never a record
        if entry.depth() == 0 {
            return None;
        }

        let file_type = entry.file_type();
        if file_type.is_dir() {
            return None;
        }
        if file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", entry.path().display());
            return None;
        }
        if !file_type.is_file() {
            log::trace!("Skipping special file: {}", entry.path().display());
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(self.handle_walk_error(e))),
        };

        let size = metadata.len();
        if size < self.config.min_size {
            log::trace!(
                "Skipping file due to size filter ({}): {}",
                size,
                entry.path().display()
            );
            return None;
        }

        Some(Ok(FileRecord::new(entry.path().to_path_buf(), size)))
    }

    /// Convert a walkdir error into a [`ScanError`] and log it.
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        let message = error.to_string();

        let scan_error = match error.into_io_error() {
            Some(io) => ScanError::from_io(path, io),
            // Symlink loops carry no I/O error
            None => ScanError::Io {
                path,
                source: std::io::Error::other(message),
            },
        };

        match &scan_error {
            ScanError::NotFound(p) => {
                log::debug!("Entry not found (may have been removed): {}", p.display());
            }
            other => log::warn!("{}", other),
        }
        scan_error
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
