//! JSON file snapshot: the chain as a pretty-printed document on disk.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use provchain_core::HashChain;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::snapshot::SnapshotStore;

/// A snapshot stored as one JSON file.
#[derive(Debug, Clone)]
pub struct JsonSnapshot {
    path: PathBuf,
}

impl JsonSnapshot {
    /// A snapshot at the given file path. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file path.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SnapshotStore for JsonSnapshot {
    fn save(&self, chain: &HashChain) -> Result<()> {
        let json =
            serde_json::to_string_pretty(chain).map_err(|e| StoreError::Parse(e.to_string()))?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), blocks = chain.len(), "saved chain snapshot");
        Ok(())
    }

    fn load(&self) -> Result<HashChain> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let chain: HashChain =
            serde_json::from_str(&raw).map_err(|e| StoreError::Parse(e.to_string()))?;
        debug!(path = %self.path.display(), blocks = chain.len(), "loaded chain snapshot");
        Ok(chain)
    }
}
