//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Parallel hashing through a bounded worker pool
//! - Grouping hashed files by digest
//! - Scan statistics
//! - Scan orchestration

pub mod finder;
pub mod groups;
pub mod pipeline;

pub use finder::{default_workers, DuplicateFinder, FinderConfig, FinderError};
pub use groups::{
    compute_stats, filter_duplicates, group_by_hash, has_size_mismatch, wasted_space,
    DuplicateGroups, ScanStats,
};
pub use pipeline::{
    FailedFile, HashOutcome, HashedFile, PipelineError, PipelineReport, WorkerPool,
};
