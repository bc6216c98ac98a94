//! Streaming content hasher.
//!
//! # Overview
//!
//! [`Hasher`] reads a file in fixed-size chunks and feeds them to the
//! selected digest ([`HashAlgorithm`]), returning the digest as lowercase
//! hex. Memory use is one chunk per call regardless of file size.
//!
//! A `Hasher` is immutable after construction and is shared between
//! pipeline workers behind an `Arc`.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::HashError;
use crate::error::ConfigError;
use crate::signal::CancellationToken;

/// Read buffer size for streaming hashes.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Digest algorithm used for content comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// MD5, 128-bit. Fast and adequate for duplicate detection.
    #[default]
    Md5,
    /// SHA-256, 256-bit.
    Sha256,
    /// BLAKE3, 256-bit. Fastest on modern CPUs.
    Blake3,
}

impl HashAlgorithm {
    /// All supported algorithms, in display order.
    pub const ALL: [HashAlgorithm; 3] = [Self::Md5, Self::Sha256, Self::Blake3];

    /// Canonical lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3",
        }
    }

    /// Length of the hex digest this algorithm produces.
    #[must_use]
    pub fn hex_len(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha256 | Self::Blake3 => 64,
        }
    }

    /// Comma-separated list of supported names, for error messages.
    #[must_use]
    pub fn supported_names() -> String {
        Self::ALL
            .iter()
            .map(|a| a.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "blake3" => Ok(Self::Blake3),
            _ => Err(ConfigError::UnsupportedAlgorithm {
                name: s.to_string(),
                supported: Self::supported_names(),
            }),
        }
    }
}

/// Computes a digest for one file.
///
/// Implementations must be safe to call from several worker threads at
/// once. Errors are per-file and never abort a scan.
pub trait ContentHasher: Send + Sync {
    /// Hash the full content of `path` and return the digest as hex.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    fn calculate(&self, path: &Path) -> Result<String, HashError>;

    /// Algorithm this hasher uses.
    fn algorithm(&self) -> HashAlgorithm;
}

/// Incremental digest state for the selected algorithm.
enum DigestState {
    Md5(Md5),
    Sha256(Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl DigestState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => Self::Md5(Md5::new()),
            HashAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
            Self::Blake3(h) => {
                h.update(data);
            }
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Self::Md5(h) => format!("{:x}", h.finalize()),
            Self::Sha256(h) => format!("{:x}", h.finalize()),
            Self::Blake3(h) => h.finalize().to_hex().to_string(),
        }
    }
}

/// File hasher for a fixed algorithm.
///
/// # Example
///
/// ```no_run
/// use dupfind::scanner::{ContentHasher, HashAlgorithm, Hasher};
/// use std::path::Path;
///
/// let hasher = Hasher::new(HashAlgorithm::Blake3);
/// let digest = hasher.calculate(Path::new("Cargo.toml")).unwrap();
/// assert_eq!(digest.len(), 64);
/// ```
#[derive(Debug, Clone)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    cancel: Option<CancellationToken>,
}

impl Hasher {
    /// Create a hasher for `algorithm`.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            cancel: None,
        }
    }

    /// Abort long reads between chunks once `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Hash an in-memory buffer with this hasher's algorithm.
    #[must_use]
    pub fn hash_bytes(&self, data: &[u8]) -> String {
        let mut state = DigestState::new(self.algorithm);
        state.update(data);
        state.finalize_hex()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}

impl ContentHasher for Hasher {
    fn calculate(&self, path: &Path) -> Result<String, HashError> {
        let mut file =
            File::open(path).map_err(|e| HashError::from_io(path.to_path_buf(), e))?;

        let mut state = DigestState::new(self.algorithm);
        let mut buffer = vec![0u8; CHUNK_SIZE];

        loop {
            if self.is_cancelled() {
                return Err(HashError::Interrupted(path.to_path_buf()));
            }

            let n = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path.to_path_buf(), e)),
            };
            state.update(&buffer[..n]);
        }

        let digest = state.finalize_hex();
        log::trace!("{} {}: {}", self.algorithm, path.display(), digest);
        Ok(digest)
    }

    fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}
