//! Scan orchestration: walk, hash in parallel, aggregate.
//!
//! # Overview
//!
//! [`DuplicateFinder`] wires the stages together:
//!
//! 1. **Walk** - list candidate files with a [`FileSource`]
//! 2. **Hash** - run the [`WorkerPool`] over the list
//! 3. **Aggregate** - group by digest and compute [`ScanStats`]
//!
//! Per-file failures are absorbed by the pipeline. Only a bad root path,
//! cancellation or a panicking hasher end a scan with an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::groups::{compute_stats, filter_duplicates, group_by_hash, DuplicateGroups, ScanStats};
use super::pipeline::{PipelineError, WorkerPool};
use crate::progress::ProgressCallback;
use crate::scanner::{
    ContentHasher, FileRecord, FileSource, HashAlgorithm, Hasher, ScanError, Walker,
};
use crate::signal::CancellationToken;

/// Number of workers used when none is configured: one per logical CPU.
#[must_use]
pub fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of hashing worker threads (0 is treated as 1).
    pub workers: usize,
    /// Digest algorithm for content comparison.
    pub algorithm: HashAlgorithm,
    /// Optional token for cooperative cancellation.
    pub cancel: Option<CancellationToken>,
    /// Optional progress callback; progress is logged when absent.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("workers", &self.workers)
            .field("algorithm", &self.algorithm)
            .field("cancel", &self.cancel)
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
            workers: default_workers(),
            algorithm: HashAlgorithm::default(),
            cancel: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the number of hashing workers.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or cancellation).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Hashing workers panicked; results would be incomplete.
    #[error("{0} hashing worker(s) panicked")]
    WorkerPanicked(usize),

    /// Listing files failed.
    #[error(transparent)]
    Scan(ScanError),
}

impl From<ScanError> for FinderError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::NotFound(path) => Self::PathNotFound(path),
            ScanError::NotADirectory(path) => Self::NotADirectory(path),
            ScanError::Interrupted => Self::Interrupted,
            other => Self::Scan(other),
        }
    }
}

impl From<PipelineError> for FinderError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Cancelled { .. } => Self::Interrupted,
            PipelineError::WorkerPanicked { panicked, .. } => Self::WorkerPanicked(panicked),
        }
    }
}

/// Duplicate finder that runs the walk/hash/aggregate pipeline.
///
/// # Example
///
/// ```no_run
/// use dupfind::duplicates::{DuplicateFinder, FinderConfig};
/// use dupfind::scanner::HashAlgorithm;
/// use std::path::Path;
///
/// let config = FinderConfig::default()
///     .with_workers(4)
///     .with_algorithm(HashAlgorithm::Blake3);
/// let finder = DuplicateFinder::new(config);
///
/// let (groups, stats) = finder.find_duplicates(Path::new("/some/path")).unwrap();
/// println!("{} groups, {} bytes wasted", groups.len(), stats.total_wasted_space);
/// ```
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Arc<dyn ContentHasher>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for DuplicateFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuplicateFinder")
            .field("config", &self.config)
            .field("hasher", &self.hasher.algorithm())
            .finish()
    }
}

impl DuplicateFinder {
    /// Create a finder hashing with `config.algorithm`.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let cancel = config.cancel.clone().unwrap_or_default();
        let hasher = Hasher::new(config.algorithm).with_cancellation(cancel.clone());
        Self {
            config,
            hasher: Arc::new(hasher),
            cancel,
        }
    }

    /// Create a finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Replace the content hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: Arc<dyn ContentHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    /// Finder configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Effective number of hashing workers.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.config.workers.max(1)
    }

    /// Algorithm of the active hasher.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.hasher.algorithm()
    }

    /// Find duplicate files under `path`.
    ///
    /// # Errors
    ///
    /// - [`FinderError::PathNotFound`] / [`FinderError::NotADirectory`] for
    ///   a bad root
    /// - [`FinderError::Interrupted`] if cancellation is requested
    /// - [`FinderError::WorkerPanicked`] if the hasher panicked
    pub fn find_duplicates(&self, path: &Path) -> Result<(DuplicateGroups, ScanStats), FinderError> {
        let walker = Walker::new(path)?.with_cancellation(self.cancel.clone());
        log::info!("Scanning {}", walker.root().display());
        self.find_duplicates_in(&walker)
    }

    /// Find duplicates among the files listed by `source`.
    ///
    /// # Errors
    ///
    /// Same as [`DuplicateFinder::find_duplicates`].
    pub fn find_duplicates_in(
        &self,
        source: &dyn FileSource,
    ) -> Result<(DuplicateGroups, ScanStats), FinderError> {
        let files = source.walk_files()?;
        log::info!("Found {} candidate files", files.len());
        self.find_duplicates_from_files(files)
    }

    /// Find duplicates among an explicit list of files.
    ///
    /// An empty list yields no groups and zeroed stats.
    ///
    /// # Errors
    ///
    /// - [`FinderError::Interrupted`] if cancellation is requested
    /// - [`FinderError::WorkerPanicked`] if the hasher panicked
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileRecord>,
    ) -> Result<(DuplicateGroups, ScanStats), FinderError> {
        let total = files.len();
        if total == 0 {
            log::info!("No files to compare");
            return Ok((DuplicateGroups::new(), ScanStats::default()));
        }

        let pool = WorkerPool::new(self.config.workers, Arc::clone(&self.hasher));
        log::info!(
            "Hashing {} files with {} using {} workers",
            total,
            self.hasher.algorithm(),
            pool.workers()
        );

        let report = pool.process(&self.cancel, files, self.config.progress_callback.as_deref())?;
        if !report.failed.is_empty() {
            log::warn!("{} files could not be hashed", report.failed.len());
        }

        let groups = filter_duplicates(group_by_hash(&report.hashed));
        let stats = compute_stats(total, report.hashed.len(), &groups);

        log::info!(
            "Found {} duplicate groups ({} redundant files)",
            stats.duplicate_groups,
            stats.duplicate_files
        );
        Ok((groups, stats))
    }
}
