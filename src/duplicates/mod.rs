//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (Phase 1)
//! - Full hash comparison (Phase 2)
//! - Duplicate group management

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, FinderStats};
pub use groups::{group_by_size, DuplicateGroup, GroupingStats, SizeBucket};
