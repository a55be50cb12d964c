//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements
//! [`ProgressCallback`] to display a spinner while walking and a bar while
//! hashing. Bars draw to stderr and are hidden in quiet mode.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress callback for the scanning and hashing phases.
///
/// Implementations must tolerate calls from several hashing threads at once.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase ("walking", "hashing")
    /// * `total` - Number of items to process, 0 when unknown
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called once per processed item.
    fn on_progress(&self, path: &Path);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Progress reporter using indicatif.
pub struct Progress {
    current: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - Hide all bars
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            current: Mutex::new(None),
            quiet,
        }
    }

    fn make_bar(&self, phase: &str, total: usize) -> ProgressBar {
        let bar = if total == 0 {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {prefix} {pos} files {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.cyan} {prefix} [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("━━░"),
            );
            pb
        };
        bar.set_prefix(phase.to_string());
        if self.quiet {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        let bar = self.make_bar(phase, total);
        if let Ok(mut current) = self.current.lock() {
            if let Some(previous) = current.replace(bar) {
                previous.finish_and_clear();
            }
        }
    }

    fn on_progress(&self, path: &Path) {
        if let Ok(current) = self.current.lock() {
            if let Some(bar) = current.as_ref() {
                bar.inc(1);
                bar.set_message(path.display().to_string());
            }
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if let Ok(mut current) = self.current.lock() {
            if let Some(bar) = current.take() {
                log::debug!("Phase {} finished after {} items", phase, bar.position());
                bar.finish_and_clear();
            }
        }
    }
}
