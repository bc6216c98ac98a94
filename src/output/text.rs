//! Human-readable text report.
//!
//! ```text
//! === Found 1 groups of duplicate files ===
//!
//! Group 1 (hash: 5d41402abc4b2a76b9719d911017c592):
//!   1. /data/a.txt (1.0 KiB)
//!   2. /data/b.txt (1.0 KiB)
//!   -> Wasted space: 1.0 KiB
//!
//! === Summary ===
//! Total files scanned: 3
//! ...
//! ```

use std::io::{self, Write};
use std::path::Path;

use super::format_size;
use crate::duplicates::{wasted_space, DuplicateGroups, ScanStats};
use crate::scanner::HashAlgorithm;

const RULE_HEAVY: &str = "═══════════════════════════════════════";
const RULE_LIGHT: &str = "───────────────────────────────────────";

/// Write the scan banner: root path, algorithm and worker count.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_header<W: Write>(
    writer: &mut W,
    path: &Path,
    algorithm: HashAlgorithm,
    workers: usize,
) -> io::Result<()> {
    writeln!(writer, "{RULE_HEAVY}")?;
    writeln!(writer, "     Duplicate File Finder")?;
    writeln!(writer, "{RULE_HEAVY}")?;
    writeln!(writer, "Path: {}", path.display())?;
    writeln!(writer, "Algorithm: {algorithm}")?;
    writeln!(writer, "Workers: {workers}")?;
    writeln!(writer, "{RULE_LIGHT}")
}

/// Text formatter for duplicate groups and stats.
pub struct TextOutput<'a> {
    groups: &'a DuplicateGroups,
    stats: &'a ScanStats,
}

impl<'a> TextOutput<'a> {
    /// Create a new text formatter.
    #[must_use]
    pub fn new(groups: &'a DuplicateGroups, stats: &'a ScanStats) -> Self {
        Self { groups, stats }
    }

    /// Write the report.
    ///
    /// With no groups only "No duplicates found!" is written.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.groups.is_empty() {
            return writeln!(writer, "No duplicates found!");
        }

        writeln!(
            writer,
            "\n=== Found {} groups of duplicate files ===\n",
            self.groups.len()
        )?;

        for (index, (hash, members)) in self.groups.iter().enumerate() {
            writeln!(writer, "Group {} (hash: {}):", index + 1, hash)?;
            for (n, record) in members.iter().enumerate() {
                writeln!(
                    writer,
                    "  {}. {} ({})",
                    n + 1,
                    record.path.display(),
                    format_size(record.size)
                )?;
            }
            writeln!(
                writer,
                "  -> Wasted space: {}\n",
                format_size(wasted_space(members))
            )?;
        }

        self.write_summary(writer)
    }

    fn write_summary<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let stats = self.stats;
        writeln!(writer, "=== Summary ===")?;
        writeln!(writer, "Total files scanned: {}", stats.total_files)?;
        writeln!(writer, "Files processed: {}", stats.processed_files)?;
        if stats.failed_files > 0 {
            writeln!(writer, "Files failed: {}", stats.failed_files)?;
        }
        writeln!(writer, "Duplicate groups: {}", stats.duplicate_groups)?;
        writeln!(writer, "Duplicate files: {}", stats.duplicate_files)?;
        writeln!(
            writer,
            "Total wasted space: {}",
            format_size(stats.total_wasted_space)
        )
    }

    /// Render the report to a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        // Writing to a Vec cannot fail
        let _ = self.write_to(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}
