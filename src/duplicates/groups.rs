//! Duplicate grouping and size-based file organization.
//!
//! # Overview
//!
//! This module provides structures for grouping files by size (the first
//! pass of duplicate detection) and the [`DuplicateGroup`] handed on to the
//! selection protocol.
//!
//! ## Size Grouping
//!
//! Files with different sizes cannot be duplicates, so grouping by exact size
//! removes most files from consideration without reading a single byte.
//! Buckets keep the order in which each size was first encountered, which
//! keeps the whole pipeline deterministic for a deterministic walk.
//!
//! # Example
//!
//! ```
//! use dupefind::scanner::FileRecord;
//! use dupefind::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileRecord::new(PathBuf::from("/file1.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file2.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let (buckets, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(buckets.len(), 1);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::scanner::FileRecord;

/// A group of files with the same size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeBucket {
    /// File size in bytes (shared by all files in this bucket)
    pub size: u64,
    /// Files with this exact size, in encounter order
    pub files: Vec<FileRecord>,
}

impl SizeBucket {
    /// Create an empty bucket for `size`.
    #[must_use]
    pub fn new(size: u64) -> Self {
        Self {
            size,
            files: Vec::new(),
        }
    }

    /// Add a file to this bucket.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if file size doesn't match bucket size.
    pub fn add(&mut self, file: FileRecord) {
        debug_assert_eq!(
            file.size, self.size,
            "File size {} doesn't match bucket size {}",
            file.size, self.size
        );
        self.files.push(file);
    }

    /// Number of files in this bucket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if this bucket has potential duplicates (2+ files).
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.files.len() > 1
    }
}

/// Confirmed group of files with identical size and content.
///
/// Always holds at least two paths. The content digest is not kept; nothing
/// downstream needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// File size in bytes, shared by every member
    pub size: u64,
    /// Member paths, in encounter order
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(size: u64, paths: Vec<PathBuf>) -> Self {
        debug_assert!(paths.len() >= 2, "a duplicate group needs two members");
        Self { size, paths }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Member at a 1-based position, as shown to the operator.
    #[must_use]
    pub fn member(&self, position: usize) -> Option<&Path> {
        position
            .checked_sub(1)
            .and_then(|i| self.paths.get(i))
            .map(PathBuf::as_path)
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.size * self.paths.len() as u64
    }

    /// Space freed by keeping a single copy.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }
}

/// Statistics from the size grouping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in buckets of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton buckets)
    pub eliminated_unique: usize,
    /// Number of size buckets with 2+ files
    pub duplicate_buckets: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size.
///
/// Buckets come back in first-encounter order of their size, files within a
/// bucket in input order. Buckets with a single file are dropped.
///
/// # Performance
///
/// O(n) time and space; no file I/O.
#[must_use]
pub fn group_by_size(files: Vec<FileRecord>) -> (Vec<SizeBucket>, GroupingStats) {
    let mut stats = GroupingStats {
        total_files: files.len(),
        ..Default::default()
    };

    let mut index: HashMap<u64, usize> = HashMap::new();
    let mut buckets: Vec<SizeBucket> = Vec::new();

    for file in files {
        stats.total_size += file.size;
        let slot = *index.entry(file.size).or_insert_with(|| {
            buckets.push(SizeBucket::new(file.size));
            buckets.len() - 1
        });
        buckets[slot].add(file);
    }

    stats.unique_sizes = buckets.len();
    buckets.retain(|bucket| {
        if bucket.has_duplicates() {
            stats.potential_duplicates += bucket.len();
            stats.duplicate_buckets += 1;
            true
        } else {
            stats.eliminated_unique += bucket.len();
            false
        }
    });

    log::debug!(
        "Size grouping: {} files, {} sizes, {} candidate buckets",
        stats.total_files,
        stats.unique_sizes,
        stats.duplicate_buckets
    );

    (buckets, stats)
}
