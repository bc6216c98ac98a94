//! Bounded worker pool that hashes files in parallel.
//!
//! # Overview
//!
//! [`WorkerPool::process`] runs one producer/consumer pipeline per call:
//!
//! ```text
//!  files ──► submitter ──► [jobs: bounded 2W] ──► worker × W ──► [results: bounded 2W] ──► collector
//!                                                     ▲
//!                                          supervisor joins workers
//! ```
//!
//! - The **submitter** pushes every record into the job queue and closes it
//!   when done (or on cancellation) by dropping its sender.
//! - Each **worker** takes one record at a time, hashes it, and pushes
//!   exactly one [`HashOutcome`].
//! - The **supervisor** joins the workers. The result queue disconnects once
//!   the last worker drops its sender, which is the collector's only
//!   termination signal.
//! - The **collector** runs on the calling thread, counts outcomes, drives
//!   the progress callback and builds the [`PipelineReport`].
//!
//! Every blocking queue operation races the shared [`CancellationToken`]
//! through `crossbeam_channel::select!`, so a cancelled run unwinds without
//! waiting for the queues to drain. Both queues hold at most `2W` items,
//! which bounds memory for arbitrarily large file lists while keeping
//! workers fed.
//!
//! # Example
//!
//! ```no_run
//! use dupfind::duplicates::WorkerPool;
//! use dupfind::scanner::{FileRecord, HashAlgorithm, Hasher};
//! use dupfind::signal::CancellationToken;
//! use std::sync::Arc;
//!
//! let pool = WorkerPool::new(4, Arc::new(Hasher::new(HashAlgorithm::Md5)));
//! let files = vec![FileRecord::new("a.txt", 3), FileRecord::new("b.txt", 3)];
//!
//! let report = pool.process(&CancellationToken::new(), files, None).unwrap();
//! println!("{} hashed, {} failed", report.hashed.len(), report.failed.len());
//! ```

use std::sync::Arc;
use std::thread::{self, ScopedJoinHandle};

use crossbeam_channel::{bounded, select, Receiver, Sender};

use crate::progress::{LogProgress, ProgressCallback};
use crate::scanner::{ContentHasher, FileRecord, HashError};
use crate::signal::CancellationToken;

/// Per-file result produced by a worker.
#[derive(Debug)]
pub struct HashOutcome {
    /// The file that was hashed
    pub record: FileRecord,
    /// Index of the record in the submitted list
    pub seq: usize,
    /// Digest, or why it could not be computed
    pub result: Result<String, HashError>,
}

/// A successfully hashed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedFile {
    /// The file that was hashed
    pub record: FileRecord,
    /// Hex digest of the file content
    pub digest: String,
    /// Index of the record in the submitted list
    pub seq: usize,
}

impl HashedFile {
    /// Create a hashed file entry.
    #[must_use]
    pub fn new(record: FileRecord, digest: impl Into<String>, seq: usize) -> Self {
        Self {
            record,
            digest: digest.into(),
            seq,
        }
    }
}

/// A file whose digest could not be computed.
#[derive(Debug)]
pub struct FailedFile {
    /// The file that failed
    pub record: FileRecord,
    /// Why hashing failed
    pub error: HashError,
    /// Index of the record in the submitted list
    pub seq: usize,
}

/// Everything the collector gathered during one run.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Successful outcomes, in submission order
    pub hashed: Vec<HashedFile>,
    /// Failed outcomes, in submission order
    pub failed: Vec<FailedFile>,
    /// Number of outcomes collected (`hashed.len() + failed.len()`)
    pub processed: usize,
    /// Number of files submitted to the run
    pub total: usize,
}

impl PipelineReport {
    fn new(total: usize) -> Self {
        Self {
            hashed: Vec::with_capacity(total),
            failed: Vec::new(),
            processed: 0,
            total,
        }
    }

    /// Whether every submitted file produced an outcome.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.processed == self.total
    }

    fn record(&mut self, outcome: HashOutcome) {
        self.processed += 1;
        match outcome.result {
            Ok(digest) => self.hashed.push(HashedFile {
                record: outcome.record,
                digest,
                seq: outcome.seq,
            }),
            Err(error) => {
                log::warn!(
                    "Cannot calculate hash for {}: {}",
                    outcome.record.path.display(),
                    error
                );
                self.failed.push(FailedFile {
                    record: outcome.record,
                    error,
                    seq: outcome.seq,
                });
            }
        }
    }

    fn sort_by_submission(&mut self) {
        self.hashed.sort_by_key(|h| h.seq);
        self.failed.sort_by_key(|f| f.seq);
    }
}

/// Errors that end a pipeline run early.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Cancellation was requested before every file was processed.
    #[error("Operation canceled after {} of {} files", .partial.processed, .partial.total)]
    Cancelled {
        /// Outcomes collected before the cancellation was observed
        partial: PipelineReport,
    },

    /// One or more workers panicked; their in-flight files are missing.
    #[error("{panicked} hashing worker(s) panicked; {} of {} files processed", .partial.processed, .partial.total)]
    WorkerPanicked {
        /// Number of workers that panicked
        panicked: usize,
        /// Outcomes collected from the surviving workers
        partial: PipelineReport,
    },
}

impl PipelineError {
    /// Outcomes collected before the run ended.
    #[must_use]
    pub fn partial(&self) -> &PipelineReport {
        match self {
            Self::Cancelled { partial } | Self::WorkerPanicked { partial, .. } => partial,
        }
    }

    /// Take ownership of the collected outcomes.
    #[must_use]
    pub fn into_partial(self) -> PipelineReport {
        match self {
            Self::Cancelled { partial } | Self::WorkerPanicked { partial, .. } => partial,
        }
    }
}

type Job = (usize, FileRecord);

/// Fixed-size pool of hashing workers.
///
/// The pool holds no per-run state: queues and counters are created inside
/// each [`WorkerPool::process`] call, so one pool can serve several scans
/// sequentially and nothing leaks between them.
pub struct WorkerPool {
    workers: usize,
    hasher: Arc<dyn ContentHasher>,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .field("algorithm", &self.hasher.algorithm())
            .finish()
    }
}

impl WorkerPool {
    /// Create a pool of `workers` threads (minimum 1) sharing `hasher`.
    #[must_use]
    pub fn new(workers: usize, hasher: Arc<dyn ContentHasher>) -> Self {
        Self {
            workers: workers.max(1),
            hasher,
        }
    }

    /// Number of worker threads per run.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Capacity of the job and result queues.
    #[must_use]
    pub fn queue_capacity(&self) -> usize {
        self.workers * 2
    }

    /// Hash `files` in parallel.
    ///
    /// `progress` is called once per collected outcome. When `None`,
    /// progress is logged every [`crate::progress::LOG_PROGRESS_INTERVAL`]
    /// files instead.
    ///
    /// Per-file failures are logged and returned in
    /// [`PipelineReport::failed`]; they never abort the run.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Cancelled`] if `cancel` fires before every
    ///   outcome has been collected. The error carries what was collected.
    /// - [`PipelineError::WorkerPanicked`] if the hasher panicked on a
    ///   worker thread.
    pub fn process(
        &self,
        cancel: &CancellationToken,
        files: Vec<FileRecord>,
        progress: Option<&dyn ProgressCallback>,
    ) -> Result<PipelineReport, PipelineError> {
        let total = files.len();
        let mut report = PipelineReport::new(total);

        if total == 0 {
            log::debug!("Worker pool: nothing to process");
            return Ok(report);
        }
        let fallback = LogProgress::default();
        let progress = progress.unwrap_or(&fallback);
        progress.on_start(total);

        if cancel.is_cancelled() {
            progress.on_finish();
            return Err(PipelineError::Cancelled { partial: report });
        }

        log::debug!(
            "Worker pool: {} files, {} workers, queue capacity {}",
            total,
            self.workers,
            self.queue_capacity()
        );

        let (job_tx, job_rx) = bounded::<Job>(self.queue_capacity());
        let (result_tx, result_rx) = bounded::<HashOutcome>(self.queue_capacity());
        let hasher: &dyn ContentHasher = self.hasher.as_ref();

        let (completed, panicked) = thread::scope(|scope| {
            scope.spawn(move || submit(job_tx, files, cancel));

            let workers: Vec<ScopedJoinHandle<'_, ()>> = (0..self.workers)
                .map(|id| {
                    let jobs = job_rx.clone();
                    let results = result_tx.clone();
                    scope.spawn(move || work(id, jobs, results, hasher, cancel))
                })
                .collect();

            // Only workers may hold queue ends from here on
            drop(job_rx);
            drop(result_tx);

            let supervisor = scope.spawn(move || supervise(workers));
            let completed = collect(result_rx, cancel, progress, &mut report);
            let panicked = supervisor.join().unwrap_or(0);
            (completed, panicked)
        });

        progress.on_finish();
        report.sort_by_submission();

        if panicked > 0 {
            log::error!("{} hashing worker(s) panicked", panicked);
            return Err(PipelineError::WorkerPanicked {
                panicked,
                partial: report,
            });
        }
        if !completed {
            log::info!(
                "Worker pool canceled: processed {}/{} files",
                report.processed,
                report.total
            );
            return Err(PipelineError::Cancelled { partial: report });
        }

        log::info!(
            "Worker pool finished: processed {}/{} files",
            report.processed,
            report.total
        );
        Ok(report)
    }
}

/// Feed every record into the job queue, then close it.
fn submit(jobs: Sender<Job>, files: Vec<FileRecord>, cancel: &CancellationToken) {
    for job in files.into_iter().enumerate() {
        if cancel.is_cancelled() {
            log::debug!("Submitter: canceled at record {}", job.0);
            return;
        }

        let sent = select! {
            send(jobs, job) -> res => res.is_ok(),
            recv(cancel.receiver()) -> _ => false,
        };
        if !sent {
            return;
        }
    }
    log::trace!("Submitter: all records queued");
}

/// Hash records until the job queue is exhausted or the run is canceled.
fn work(
    id: usize,
    jobs: Receiver<Job>,
    results: Sender<HashOutcome>,
    hasher: &dyn ContentHasher,
    cancel: &CancellationToken,
) {
    loop {
        if cancel.is_cancelled() {
            break;
        }

        let job = select! {
            recv(jobs) -> msg => msg.ok(),
            recv(cancel.receiver()) -> _ => None,
        };
        let Some((seq, record)) = job else {
            break;
        };

        let result = hasher.calculate(&record.path);
        if matches!(result, Err(HashError::Interrupted(_))) {
            // Not a real per-file failure; the run is being torn down
            break;
        }

        let outcome = HashOutcome {
            record,
            seq,
            result,
        };
        let delivered = select! {
            send(results, outcome) -> res => res.is_ok(),
            recv(cancel.receiver()) -> _ => false,
        };
        if !delivered {
            break;
        }
    }
    log::trace!("Worker {}: exiting", id);
}

/// Wait for every worker; returns how many panicked.
fn supervise(workers: Vec<ScopedJoinHandle<'_, ()>>) -> usize {
    let mut panicked = 0;
    for (id, handle) in workers.into_iter().enumerate() {
        if handle.join().is_err() {
            log::error!("Worker {} panicked", id);
            panicked += 1;
        }
    }
    log::trace!("Supervisor: all workers finished, result queue closing");
    panicked
}

enum Next {
    Outcome(HashOutcome),
    Drained,
    Canceled,
}

/// Drain the result queue into `report`.
///
/// Returns `true` if the queue was drained, `false` if cancellation was
/// observed first.
fn collect(
    results: Receiver<HashOutcome>,
    cancel: &CancellationToken,
    progress: &dyn ProgressCallback,
    report: &mut PipelineReport,
) -> bool {
    loop {
        if cancel.is_cancelled() {
            return false;
        }

        let next = select! {
            recv(results) -> msg => match msg {
                Ok(outcome) => Next::Outcome(outcome),
                Err(_) => Next::Drained,
            },
            recv(cancel.receiver()) -> _ => Next::Canceled,
        };

        match next {
            Next::Outcome(outcome) => {
                report.record(outcome);
                progress.on_progress(report.processed, report.total);
            }
            Next::Drained => return true,
            Next::Canceled => return false,
        }
    }
}
