//! Content store access.
//!
//! Documents are addressable by a flat key (`<slug>.md`). The store
//! contract is deliberately small: read one key, list all keys. The
//! storage medium behind it is not part of the contract; [`FsStore`]
//! is the directory-backed implementation.

use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("content root does not exist: {0}")]
    RootNotFound(PathBuf),

    #[error("content root is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to read {key}: {source}")]
    ReadKey {
        key: String,
        source: io::Error,
    },
}

/// Read-only access to the document corpus.
///
/// Implementations must be safe to share across threads; the corpus
/// listing reads many keys concurrently.
pub trait ContentStore: Send + Sync {
    /// Read the bytes stored under `key`. Returns `Ok(None)` when the
    /// key is absent, which is not an error.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// List every document key, in a stable order.
    fn list_keys(&self) -> Result<Vec<String>, StoreError>;
}

/// A flat directory of documents.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open a store rooted at `root`. The directory must exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if !root.exists() {
            return Err(StoreError::RootNotFound(root));
        }
        if !root.is_dir() {
            return Err(StoreError::NotADirectory(root));
        }
        Ok(Self { root })
    }
}

impl ContentStore for FsStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.root.join(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::ReadKey {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        let read_dir = fs::read_dir(&self.root).map_err(|source| StoreError::ReadDir {
            path: self.root.clone(),
            source,
        })?;

        let mut keys = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| StoreError::ReadDir {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                keys.push(name.to_string());
            }
        }

        // Directory iteration order is platform-dependent; sort so the
        // listing tie-break is stable everywhere.
        keys.sort();
        Ok(keys)
    }
}
