//! Progress reporting for the hashing pipeline.
//!
//! The pipeline reports through the [`ProgressCallback`] trait. Two
//! implementations ship with the crate:
//!
//! - [`Progress`]: an `indicatif` bar for interactive terminals
//! - [`LogProgress`]: throttled `log::info!` lines, used by the pipeline
//!   when the caller supplies no callback
//!
//! Any `Fn(usize, usize) + Send + Sync` closure is also a callback, which
//! keeps tests short.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Default interval, in files, between [`LogProgress`] lines.
pub const LOG_PROGRESS_INTERVAL: usize = 100;

/// Receives progress updates from the hashing pipeline.
///
/// All methods are called from the collector thread only, once per
/// collected outcome, with `processed` strictly increasing.
pub trait ProgressCallback: Send + Sync {
    /// Called once before any file is dispatched. Runs over an empty file
    /// list skip the whole bracket.
    fn on_start(&self, _total: usize) {}

    /// Called after each outcome (success or failure) is collected.
    fn on_progress(&self, processed: usize, total: usize);

    /// Called once after [`on_start`](Self::on_start), when the run ends,
    /// whether complete, cancelled (even before the first file) or aborted
    /// by a worker panic.
    fn on_finish(&self) {}
}

impl<F> ProgressCallback for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn on_progress(&self, processed: usize, total: usize) {
        self(processed, total);
    }
}

/// Logs progress every `interval` files and on the final file.
#[derive(Debug, Clone, Copy)]
pub struct LogProgress {
    interval: usize,
}

impl LogProgress {
    /// Log every `interval` files (minimum 1).
    #[must_use]
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }

    /// Whether `processed` is a reporting point.
    #[must_use]
    pub fn should_report(&self, processed: usize, total: usize) -> bool {
        processed % self.interval == 0 || processed == total
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(LOG_PROGRESS_INTERVAL)
    }
}

impl ProgressCallback for LogProgress {
    fn on_progress(&self, processed: usize, total: usize) {
        if self.should_report(processed, total) {
            log::info!("Progress: {}/{} files processed", processed, total);
        }
    }
}

/// Terminal progress bar using indicatif.
///
/// Draws to stderr so it never mixes with the report on stdout.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    /// Create a progress bar. With `hidden` set nothing is drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupfind::progress::{Progress, ProgressCallback};
    ///
    /// let progress = Progress::new(true);
    /// progress.on_start(10);
    /// progress.on_progress(1, 10);
    /// progress.on_finish();
    /// ```
    #[must_use]
    pub fn new(hidden: bool) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), Self::draw_target(hidden));
        bar.set_style(Self::style());
        Self { bar }
    }

    fn draw_target(hidden: bool) -> ProgressDrawTarget {
        if hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.green/blue}] {pos}/{len} ({percent}%) {per_sec} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    /// Current position, mostly useful in tests.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressCallback for Progress {
    fn on_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.enable_steady_tick(Duration::from_millis(200));
    }

    fn on_progress(&self, processed: usize, _total: usize) {
        self.bar.set_position(processed as u64);
    }

    fn on_finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_closure_is_callback() {
        let calls = AtomicUsize::new(0);
        let callback = |_processed: usize, _total: usize| {
            calls.fetch_add(1, Ordering::SeqCst);
        };

        callback.on_start(2);
        callback.on_progress(1, 2);
        callback.on_progress(2, 2);
        callback.on_finish();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_log_progress_reporting_points() {
        let progress = LogProgress::new(100);

        assert!(!progress.should_report(1, 250));
        assert!(progress.should_report(100, 250));
        assert!(progress.should_report(200, 250));
        assert!(!progress.should_report(249, 250));
        assert!(progress.should_report(250, 250));
    }

    #[test]
    fn test_log_progress_interval_min() {
        let progress = LogProgress::new(0);
        assert!(progress.should_report(1, 10));
        assert!(progress.should_report(7, 10));
    }

    #[test]
    fn test_progress_hidden_tracks_position() {
        let progress = Progress::new(true);
        progress.on_start(5);
        progress.on_progress(3, 5);
        assert_eq!(progress.position(), 3);
        progress.on_finish();
    }
}
