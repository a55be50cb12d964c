//! Duplicate finder implementation with two-pass detection.
//!
//! # Overview
//!
//! This module orchestrates duplicate detection over a list of scanned files:
//! 1. **Size grouping**: Group files by size (see [`crate::duplicates::groups`])
//! 2. **Full hash**: Hash the entire content of every file in a multi-member
//!    size bucket and split the bucket by digest
//!
//! Each pass owns its buckets and hands the next pass a freshly built value;
//! no map outlives the pass that built it.
//!
//! # Example
//!
//! ```no_run
//! use dupefind::scanner::{scan, WalkerConfig};
//! use dupefind::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let files = scan(Path::new("."), &WalkerConfig::default()).records;
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let (groups, stats) = finder.group(files);
//!
//! println!("{} groups, {} unreadable files", groups.len(), stats.hash_errors.len());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;

use super::groups::{group_by_size, DuplicateGroup, GroupingStats, SizeBucket};
use crate::progress::ProgressCallback;
use crate::scanner::{hash_to_hex, FileRecord, Hash, HashError, Hasher};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of threads hashing files. 1 hashes sequentially on the
    /// calling thread.
    pub hash_threads: usize,
    /// Optional progress callback for the hashing phase.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("hash_threads", &self.hash_threads)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            hash_threads: 1,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the number of hashing threads (minimum 1).
    #[must_use]
    pub fn with_hash_threads(mut self, threads: usize) -> Self {
        self.hash_threads = threads.max(1);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Statistics from a grouping run.
#[derive(Debug, Default)]
pub struct FinderStats {
    /// Size pass statistics
    pub size: GroupingStats,
    /// Number of files that were hashed successfully
    pub hashed_files: usize,
    /// Total bytes read while hashing
    pub bytes_hashed: u64,
    /// Files that could not be hashed and were left out
    pub hash_errors: Vec<HashError>,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Number of duplicate copies (group members beyond the first)
    pub duplicate_files: usize,
    /// Space held by duplicate copies
    pub wasted_space: u64,
}

/// Duplicate finder running the size and hash passes.
///
/// # Example
///
/// ```
/// use dupefind::duplicates::DuplicateFinder;
///
/// let finder = DuplicateFinder::with_defaults();
/// let (groups, stats) = finder.group(Vec::new());
/// assert!(groups.is_empty());
/// assert_eq!(stats.size.total_files, 0);
/// ```
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Use a specific hasher (e.g. with a different buffer size).
    #[must_use]
    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Group `files` into confirmed duplicate groups.
    ///
    /// Two paths share a group if and only if their sizes are equal and
    /// their full-content digests are equal at the time each was read.
    /// Files that fail to hash are left out and reported in
    /// [`FinderStats::hash_errors`]; the rest of their bucket is still
    /// grouped. Group order and member order follow input order.
    #[must_use]
    pub fn group(&self, files: Vec<FileRecord>) -> (Vec<DuplicateGroup>, FinderStats) {
        let mut stats = FinderStats::default();

        let (size_buckets, size_stats) = group_by_size(files);
        log::info!(
            "Size pass: {} → {} files ({:.1}% eliminated)",
            size_stats.total_files,
            size_stats.potential_duplicates,
            size_stats.elimination_rate()
        );
        stats.size = size_stats;

        if size_buckets.is_empty() {
            return (Vec::new(), stats);
        }

        let hashed = self.hash_buckets(size_buckets);

        let mut groups = Vec::new();
        for (size, members) in hashed {
            let mut present = Vec::with_capacity(members.len());
            for (record, result) in members {
                match result {
                    Ok(hash) => {
                        stats.hashed_files += 1;
                        stats.bytes_hashed += size;
                        present.push((record, hash));
                    }
                    Err(e) => {
                        log::warn!("Failed to hash {}: {}", record.path.display(), e);
                        stats.hash_errors.push(e);
                    }
                }
            }
            groups.extend(split_by_hash(size, present));
        }

        stats.duplicate_groups = groups.len();
        stats.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        stats.wasted_space = groups.iter().map(DuplicateGroup::wasted_space).sum();

        log::info!(
            "Hash pass: {} files ({} bytes) hashed, {} duplicate groups, {} duplicate files, {} bytes reclaimable",
            stats.hashed_files,
            stats.bytes_hashed,
            stats.duplicate_groups,
            stats.duplicate_files,
            stats.wasted_space
        );

        (groups, stats)
    }

    /// Hash every member of every bucket, keeping bucket and member order.
    fn hash_buckets(
        &self,
        buckets: Vec<SizeBucket>,
    ) -> Vec<(u64, Vec<(FileRecord, Result<Hash, HashError>)>)> {
        let total: usize = buckets.iter().map(SizeBucket::len).sum();
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("hashing", total);
        }

        // Flatten with the owning bucket index so results can be regrouped
        let sizes: Vec<u64> = buckets.iter().map(|b| b.size).collect();
        let flat: Vec<(usize, FileRecord)> = buckets
            .into_iter()
            .enumerate()
            .flat_map(|(i, bucket)| bucket.files.into_iter().map(move |f| (i, f)))
            .collect();

        let hash_one = |(bucket, record): (usize, FileRecord)| {
            let result = self.hasher.full_hash(&record.path);
            if let Some(ref callback) = self.config.progress_callback {
                callback.on_progress(&record.path);
            }
            (bucket, record, result)
        };

        let results: Vec<(usize, FileRecord, Result<Hash, HashError>)> =
            match self.build_pool() {
                Some(pool) => pool.install(|| flat.into_par_iter().map(hash_one).collect()),
                None => flat.into_iter().map(hash_one).collect(),
            };

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("hashing");
        }

        let mut regrouped: Vec<(u64, Vec<_>)> = sizes.into_iter().map(|s| (s, Vec::new())).collect();
        for (bucket, record, result) in results {
            regrouped[bucket].1.push((record, result));
        }
        regrouped
    }

    /// Dedicated pool for parallel hashing, or `None` to hash sequentially.
    fn build_pool(&self) -> Option<rayon::ThreadPool> {
        if self.config.hash_threads <= 1 {
            return None;
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.hash_threads)
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                log::warn!("Failed to create hashing thread pool, hashing sequentially: {}", e);
                None
            }
        }
    }
}

/// Split one size bucket's hashed members into groups of identical digest.
///
/// Hash buckets keep the order in which each digest first appeared; buckets
/// with a single member are dropped.
fn split_by_hash(size: u64, members: Vec<(FileRecord, Hash)>) -> Vec<DuplicateGroup> {
    let mut index: HashMap<Hash, usize> = HashMap::new();
    let mut hash_buckets: Vec<Vec<std::path::PathBuf>> = Vec::new();

    for (record, hash) in members {
        log::trace!("{} {}", hash_to_hex(&hash), record.path.display());
        let slot = *index.entry(hash).or_insert_with(|| {
            hash_buckets.push(Vec::new());
            hash_buckets.len() - 1
        });
        hash_buckets[slot].push(record.path);
    }

    hash_buckets
        .into_iter()
        .filter(|paths| paths.len() > 1)
        .map(|paths| DuplicateGroup::new(size, paths))
        .collect()
}
