//! Directory walker producing the candidate file list.
//!
//! # Overview
//!
//! [`Walker`] recursively lists a directory with [`walkdir`] and keeps only
//! files that can meaningfully be compared by content:
//!
//! - regular files (no directories, devices, sockets, FIFOs)
//! - non-empty files (all empty files share one digest)
//! - not symbolic links (links are never followed)
//!
//! Entries that cannot be read are logged and skipped; they do not stop the
//! walk. Siblings are visited in file-name order so the listing is stable
//! across runs.
//!
//! # Example
//!
//! ```no_run
//! use dupfind::scanner::{FileSource, Walker};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads")).unwrap();
//! let files = walker.walk_files().unwrap();
//! println!("{} candidate files", files.len());
//! ```

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{FileRecord, ScanError};
use crate::signal::CancellationToken;

/// Something that can produce the list of files to compare.
pub trait FileSource: Send + Sync {
    /// List candidate files.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if the listing as a whole fails or is
    /// interrupted. Individual unreadable entries are skipped instead.
    fn walk_files(&self) -> Result<Vec<FileRecord>, ScanError>;
}

/// Fixed list of files, for callers that already know what to compare.
impl FileSource for Vec<FileRecord> {
    fn walk_files(&self) -> Result<Vec<FileRecord>, ScanError> {
        Ok(self.clone())
    }
}

/// Recursive directory walker rooted at one directory.
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
    cancel: Option<CancellationToken>,
}

impl Walker {
    /// Create a walker for `path`.
    ///
    /// # Errors
    ///
    /// - [`ScanError::NotFound`] if `path` does not exist
    /// - [`ScanError::NotADirectory`] if it is not a directory
    /// - [`ScanError::Io`] if it cannot be inspected
    pub fn new(path: &Path) -> Result<Self, ScanError> {
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ScanError::NotFound(path.to_path_buf()),
            _ => ScanError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(path.to_path_buf()));
        }

        Ok(Self {
            root: path.to_path_buf(),
            cancel: None,
        })
    }

    /// Stop walking as soon as `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Root directory being walked.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}

/// Inclusion rule for a single directory entry.
fn is_candidate(metadata: &Metadata) -> bool {
    let file_type = metadata.file_type();
    !file_type.is_symlink() && file_type.is_file() && metadata.len() > 0
}

impl FileSource for Walker {
    fn walk_files(&self) -> Result<Vec<FileRecord>, ScanError> {
        let mut files = Vec::new();

        let walk = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walk {
            if self.is_cancelled() {
                log::debug!("Walker: cancellation requested, stopping");
                return Err(ScanError::Interrupted);
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(self.root.as_path()).display().to_string();
                    log::warn!("Cannot access {}: {}", path, e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            // walkdir does not follow links, so this is the link's own metadata
            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    log::warn!("Cannot get info for {}: {}", entry.path().display(), e);
                    continue;
                }
            };

            if !is_candidate(&metadata) {
                log::trace!("Skipping {}", entry.path().display());
                continue;
            }

            files.push(FileRecord::new(entry.into_path(), metadata.len()));
        }

        log::debug!(
            "Walker: {} candidate files under {}",
            files.len(),
            self.root.display()
        );
        Ok(files)
    }
}
