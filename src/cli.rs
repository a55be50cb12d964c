//! Command-line interface definitions for dupefind.
//!
//! This module defines all CLI arguments using the clap derive API. There are
//! no subcommands: a run always scans one directory and then walks the
//! operator through the duplicates it found.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory
//! dupefind ~/Downloads
//!
//! # Ask for the directory interactively
//! dupefind
//!
//! # Ignore small and hidden files, hash on 4 threads
//! dupefind ~/Downloads --min-size 1MB --skip-hidden --hash-threads 4
//!
//! # Verbose mode for debugging
//! dupefind -vv ~/Downloads
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::config::CliOverrides;

/// Interactive duplicate file finder.
///
/// dupefind groups files with identical content (same size, same BLAKE3
/// digest), asks which copies to delete, and removes them after confirmation.
#[derive(Debug, Parser)]
#[command(name = "dupefind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan; asked for interactively when omitted
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Increase verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    ///
    /// Also set by a non-empty NO_COLOR environment variable.
    #[arg(
        long,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Minimum file size to consider (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Do not follow symbolic links during scan
    ///
    /// Links are followed by default: a linked file is compared like any
    /// other, a linked directory is walked.
    #[arg(long)]
    pub no_follow_symlinks: bool,

    /// Number of threads hashing files (default: 1)
    #[arg(long, value_name = "N")]
    pub hash_threads: Option<usize>,
}

impl Cli {
    /// Settings given on the command line, for layering over defaults and
    /// environment. Flags that were not passed stay unset.
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            min_size: self.min_size,
            skip_hidden: self.skip_hidden.then_some(true),
            follow_symlinks: self.no_follow_symlinks.then_some(false),
            hash_threads: self.hash_threads,
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Suffixes are case-insensitive. Decimal suffixes (KB, MB, ...) are powers
/// of 1000, binary suffixes (KiB, MiB, ...) powers of 1024.
///
/// # Examples
///
/// ```
/// use dupefind::cli::parse_size;
///
/// assert_eq!(parse_size("100").unwrap(), 100);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1.5MB").unwrap(), 1_500_000);
/// ```
///
/// # Errors
///
/// Returns an error message for an empty string, a malformed number or an
/// unknown suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
