use dupfind::scanner::{ContentHasher, FileRecord, HashAlgorithm, HashError};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Hasher with a fixed digest per path; unknown paths fail with NotFound.
pub struct TableHasher {
    digests: HashMap<PathBuf, String>,
}

impl TableHasher {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            digests: entries
                .into_iter()
                .map(|(path, digest)| (PathBuf::from(path), digest.to_string()))
                .collect(),
        }
    }
}

impl ContentHasher for TableHasher {
    fn calculate(&self, path: &Path) -> Result<String, HashError> {
        self.digests
            .get(path)
            .cloned()
            .ok_or_else(|| HashError::NotFound(path.to_path_buf()))
    }

    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Md5
    }
}

/// Deterministic digest derived from the file index: `i % modulo`.
pub struct ModuloHasher {
    pub modulo: usize,
}

impl ContentHasher for ModuloHasher {
    fn calculate(&self, path: &Path) -> Result<String, HashError> {
        let index: usize = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix("file"))
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| HashError::NotFound(path.to_path_buf()))?;
        Ok(format!("h{}", index % self.modulo))
    }

    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Md5
    }
}

pub fn records(paths: &[(&str, u64)]) -> Vec<FileRecord> {
    paths
        .iter()
        .map(|(path, size)| FileRecord::new(*path, *size))
        .collect()
}

pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
