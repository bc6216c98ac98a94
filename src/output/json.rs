//! JSON output formatter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "hash": "d41d8cd9...",
//!       "size": 1024,
//!       "count": 2,
//!       "wasted_space": 1024,
//!       "files": [
//!         { "path": "/path/to/file1.txt", "size": 1024 },
//!         { "path": "/path/to/file2.txt", "size": 1024 }
//!       ]
//!     }
//!   ],
//!   "stats": {
//!     "total_files": 100,
//!     "processed_files": 99,
//!     "failed_files": 1,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "total_wasted_space": 1024,
//!     "size_mismatch_groups": 0
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{wasted_space, DuplicateGroups, ScanStats};
use crate::scanner::FileRecord;

/// A single member file in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFile {
    /// Path as listed during the scan
    pub path: String,
    /// File size in bytes
    pub size: u64,
}

impl From<&FileRecord> for JsonFile {
    fn from(record: &FileRecord) -> Self {
        Self {
            path: record.path.to_string_lossy().into_owned(),
            size: record.size,
        }
    }
}

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Content digest as lowercase hex
    pub hash: String,
    /// Size of the first member in bytes
    pub size: u64,
    /// Number of members
    pub count: usize,
    /// Bytes reclaimable by keeping one copy
    pub wasted_space: u64,
    /// Member files
    pub files: Vec<JsonFile>,
}

impl JsonDuplicateGroup {
    /// Build a JSON group from a digest and its members.
    #[must_use]
    pub fn new(hash: &str, members: &[FileRecord]) -> Self {
        Self {
            hash: hash.to_string(),
            size: members.first().map_or(0, |m| m.size),
            count: members.len(),
            wasted_space: wasted_space(members),
            files: members.iter().map(JsonFile::from).collect(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// List of duplicate groups, ordered by digest
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Scan statistics
    pub stats: ScanStats,
}

impl JsonOutput {
    /// Create a new JSON output from duplicate groups and stats.
    ///
    /// # Example
    ///
    /// ```
    /// use dupfind::duplicates::{DuplicateGroups, ScanStats};
    /// use dupfind::output::json::JsonOutput;
    /// use dupfind::scanner::FileRecord;
    ///
    /// let mut groups = DuplicateGroups::new();
    /// groups.insert(
    ///     "abc".to_string(),
    ///     vec![FileRecord::new("/a", 10), FileRecord::new("/b", 10)],
    /// );
    ///
    /// let output = JsonOutput::new(&groups, &ScanStats::default());
    /// assert_eq!(output.duplicates[0].count, 2);
    /// assert_eq!(output.duplicates[0].wasted_space, 10);
    /// ```
    #[must_use]
    pub fn new(groups: &DuplicateGroups, stats: &ScanStats) -> Self {
        Self {
            duplicates: groups
                .iter()
                .map(|(hash, members)| JsonDuplicateGroup::new(hash, members))
                .collect(),
            stats: *stats,
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
