//! File discovery and content hashing.
//!
//! These are the two I/O collaborators of the duplicate pipeline:
//! - [`walker`]: lists candidate files (regular, non-empty, not symlinks)
//! - [`hasher`]: computes a hex digest of one file's full content
//!
//! Both sit behind traits ([`FileSource`], [`ContentHasher`]) so the
//! pipeline can be driven by fixed file lists and stub hashers in tests.
//!
//! # Example
//!
//! ```no_run
//! use dupfind::scanner::{ContentHasher, FileSource, HashAlgorithm, Hasher, Walker};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new(".")).unwrap();
//! let hasher = Hasher::new(HashAlgorithm::Sha256);
//!
//! for file in walker.walk_files().unwrap() {
//!     match hasher.calculate(&file.path) {
//!         Ok(digest) => println!("{digest}  {}", file.path.display()),
//!         Err(e) => eprintln!("Warning: {e}"),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::PathBuf;

use serde::Serialize;

pub use hasher::{ContentHasher, HashAlgorithm, Hasher};
pub use walker::{FileSource, Walker};

/// A candidate file produced by the file source.
///
/// Immutable once created; the pipeline and aggregator only read it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileRecord {
    /// Path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileRecord {
    /// Create a new file record.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

/// Errors that can occur while listing files.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root could not be inspected.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Listing stopped because cancellation was requested.
    #[error("Directory walk interrupted")]
    Interrupted,
}

/// Errors that can occur while hashing a single file.
///
/// These never abort a scan; the pipeline records them against the file
/// and moves on.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file vanished between listing and hashing.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Any other I/O failure while opening or reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Hashing stopped mid-file because cancellation was requested.
    #[error("Hashing interrupted: {0}")]
    Interrupted(PathBuf),
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    #[must_use]
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }
}
