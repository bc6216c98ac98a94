//! Output formatters for duplicate scan results.
//!
//! This module provides different output formats for scan results:
//! - Text for people reading a terminal
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use dupfind::duplicates::DuplicateFinder;
//! use dupfind::output::{write_report, OutputFormat};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, stats) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! write_report(&mut std::io::stdout(), OutputFormat::Json, &groups, &stats).unwrap();
//! ```

pub mod csv;
pub mod json;
pub mod text;

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use bytesize::ByteSize;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::duplicates::{DuplicateGroups, ScanStats};
use crate::error::ConfigError;

// Re-export main types
pub use csv::{CsvOutput, CsvOutputError};
pub use json::{JsonOutput, JsonOutputError};
pub use text::{write_header, TextOutput};

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// JSON document
    Json,
    /// One CSV row per duplicate file
    Csv,
}

impl OutputFormat {
    /// All supported formats.
    pub const ALL: [OutputFormat; 3] = [Self::Text, Self::Json, Self::Csv];

    /// Canonical lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| ConfigError::UnsupportedFormat {
                name: s.to_string(),
                supported: Self::ALL.map(Self::name).join(", "),
            })
    }
}

/// Errors that can occur while writing a report.
#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    /// JSON report failed
    #[error(transparent)]
    Json(#[from] JsonOutputError),

    /// CSV report failed
    #[error(transparent)]
    Csv(#[from] CsvOutputError),

    /// Text report failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Format a byte count with IEC binary units (KiB, MiB, GiB).
///
/// # Examples
///
/// ```
/// use dupfind::output::format_size;
///
/// assert_eq!(format_size(1024), "1.0 KiB");
/// assert!(format_size(3 * 1024 * 1024).contains("MiB"));
/// ```
#[must_use]
pub fn format_size(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}

/// Write groups and stats to `writer` in `format`.
///
/// # Errors
///
/// Returns [`OutputError`] if serialization or writing fails.
pub fn write_report<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    groups: &DuplicateGroups,
    stats: &ScanStats,
) -> Result<(), OutputError> {
    match format {
        OutputFormat::Text => TextOutput::new(groups, stats).write_to(writer)?,
        OutputFormat::Json => JsonOutput::new(groups, stats).write_to(writer, true)?,
        OutputFormat::Csv => CsvOutput::new(groups).write_to(&mut *writer)?,
    }
    writer.flush()?;
    Ok(())
}
