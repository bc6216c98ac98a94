//! Duplicate grouping and scan statistics.
//!
//! # Overview
//!
//! Aggregation runs in three steps over the successful pipeline outcomes:
//!
//! 1. [`group_by_hash`] buckets every hashed file by digest
//! 2. [`filter_duplicates`] keeps only buckets with two or more members
//! 3. [`compute_stats`] derives the [`ScanStats`] summary
//!
//! Groups are returned as a [`DuplicateGroups`] map ordered by digest, and
//! members keep the order in which they were consumed. Feeding the same
//! outcomes twice yields identical groups and stats.
//!
//! # Example
//!
//! ```
//! use dupfind::duplicates::{compute_stats, filter_duplicates, group_by_hash, HashedFile};
//! use dupfind::scanner::FileRecord;
//!
//! let hashed = vec![
//!     HashedFile::new(FileRecord::new("/f1", 10), "a", 0),
//!     HashedFile::new(FileRecord::new("/f2", 10), "a", 1),
//!     HashedFile::new(FileRecord::new("/f3", 10), "b", 2),
//! ];
//!
//! let groups = filter_duplicates(group_by_hash(&hashed));
//! let stats = compute_stats(3, 3, &groups);
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(stats.total_wasted_space, 10);
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::pipeline::HashedFile;
use crate::scanner::FileRecord;

/// Confirmed duplicates: digest to member files, ordered by digest.
///
/// Every group has at least two members and every file belongs to at most
/// one group.
pub type DuplicateGroups = BTreeMap<String, Vec<FileRecord>>;

/// Summary of one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Files listed by the file source
    pub total_files: usize,
    /// Files hashed successfully
    pub processed_files: usize,
    /// Files that could not be hashed
    pub failed_files: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Redundant copies across all groups (members minus one per group)
    pub duplicate_files: usize,
    /// Bytes reclaimable by keeping one copy per group
    pub total_wasted_space: u64,
    /// Groups whose members do not all share one size
    pub size_mismatch_groups: usize,
}

impl ScanStats {
    /// Whether any duplicates were found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.duplicate_groups > 0
    }
}

/// Bucket hashed files by digest, keeping consumption order within a bucket.
///
/// Files with an empty digest are skipped.
#[must_use]
pub fn group_by_hash(hashed: &[HashedFile]) -> HashMap<String, Vec<FileRecord>> {
    let mut groups: HashMap<String, Vec<FileRecord>> = HashMap::new();

    for file in hashed {
        if file.digest.is_empty() {
            log::debug!("Skipping {}: empty digest", file.record.path.display());
            continue;
        }
        groups
            .entry(file.digest.clone())
            .or_default()
            .push(file.record.clone());
    }

    groups
}

/// Keep only buckets with at least two members.
#[must_use]
pub fn filter_duplicates(groups: HashMap<String, Vec<FileRecord>>) -> DuplicateGroups {
    groups
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .collect()
}

/// Bytes wasted by a group: every member after the first, at the first
/// member's size.
#[must_use]
pub fn wasted_space(members: &[FileRecord]) -> u64 {
    match members.first() {
        Some(first) => first.size * (members.len() as u64 - 1),
        None => 0,
    }
}

/// Whether members of a group disagree on size.
///
/// Identical digests imply identical content, so this only happens if a
/// file changed between listing and hashing, or on a digest collision.
#[must_use]
pub fn has_size_mismatch(members: &[FileRecord]) -> bool {
    match members.split_first() {
        Some((first, rest)) => rest.iter().any(|m| m.size != first.size),
        None => false,
    }
}

/// Compute the scan summary.
///
/// `total_files` is what the file source listed and `processed_files` the
/// number of successful outcomes. Groups with inconsistent member sizes are
/// logged and counted; their wasted space still uses the first member's
/// size.
#[must_use]
pub fn compute_stats(
    total_files: usize,
    processed_files: usize,
    groups: &DuplicateGroups,
) -> ScanStats {
    let mut stats = ScanStats {
        total_files,
        processed_files,
        failed_files: total_files.saturating_sub(processed_files),
        duplicate_groups: groups.len(),
        ..ScanStats::default()
    };

    for (digest, members) in groups {
        if has_size_mismatch(members) {
            log::warn!(
                "Files with digest {} have different sizes; wasted space is approximate",
                digest
            );
            stats.size_mismatch_groups += 1;
        }
        stats.duplicate_files += members.len().saturating_sub(1);
        stats.total_wasted_space += wasted_space(members);
    }

    stats
}
