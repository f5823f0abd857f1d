//! Directory-backed content store: one file per content id.
//!
//! Stands in for a remote content-addressable store (the original system
//! fetched by CID from an IPFS daemon); the ledger only requires the fetch
//! capability, so a directory of blobs named by id is sufficient locally.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

use provchain_core::{ContentId, ContentStore, FetchError};

use crate::error::{Result, StoreError};

/// Content store rooted at a directory, blobs named by content id.
#[derive(Debug, Clone)]
pub struct DirContentStore {
    root: PathBuf,
}

impl DirContentStore {
    /// A store over an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root directory (and parents) and return the store.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store content bytes under `id`, replacing any previous entry.
    pub fn put(&self, id: &ContentId, bytes: &[u8]) -> Result<()> {
        let path = self
            .blob_path(id)
            .ok_or_else(|| StoreError::Backend(format!("invalid content id: {}", id)))?;
        fs::write(&path, bytes)?;
        debug!(id = %id, bytes = bytes.len(), "stored content blob");
        Ok(())
    }

    /// The blob path for `id`, or None for ids that would escape the root.
    fn blob_path(&self, id: &ContentId) -> Option<PathBuf> {
        let name = id.as_str();
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return None;
        }
        Some(self.root.join(name))
    }
}

impl ContentStore for DirContentStore {
    fn fetch(&self, id: &ContentId) -> std::result::Result<Bytes, FetchError> {
        let path = self
            .blob_path(id)
            .ok_or_else(|| FetchError::NotFound(id.clone()))?;

        match fs::read(&path) {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(FetchError::NotFound(id.clone())),
            Err(e) => Err(e.into()),
        }
    }
}
