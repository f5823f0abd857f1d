//! In-memory implementations of the persistence capabilities.
//!
//! Primarily for testing. Same semantics as the file and SQLite backends
//! but nothing survives a drop.

use std::collections::HashMap;
use std::sync::RwLock;

use bytes::Bytes;

use provchain_core::{ContentId, ContentStore, FetchError, HashChain};

use crate::error::{Result, StoreError};
use crate::snapshot::SnapshotStore;

/// In-memory content store.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl MemoryContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store content bytes under `id`, replacing any previous entry.
    pub fn put(&self, id: &ContentId, bytes: impl Into<Bytes>) {
        self.blobs
            .write()
            .expect("content lock poisoned")
            .insert(id.as_str().to_string(), bytes.into());
    }

    /// Remove the entry for `id`, if present.
    pub fn remove(&self, id: &ContentId) {
        self.blobs
            .write()
            .expect("content lock poisoned")
            .remove(id.as_str());
    }
}

impl ContentStore for MemoryContentStore {
    fn fetch(&self, id: &ContentId) -> std::result::Result<Bytes, FetchError> {
        self.blobs
            .read()
            .expect("content lock poisoned")
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| FetchError::NotFound(id.clone()))
    }
}

/// In-memory snapshot slot.
#[derive(Debug, Default)]
pub struct MemorySnapshot {
    slot: RwLock<Option<HashChain>>,
}

impl MemorySnapshot {
    /// Create an empty slot (loads as NotFound until first save).
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshot {
    fn save(&self, chain: &HashChain) -> Result<()> {
        *self.slot.write().expect("snapshot lock poisoned") = Some(chain.clone());
        Ok(())
    }

    fn load(&self) -> Result<HashChain> {
        self.slot
            .read()
            .expect("snapshot lock poisoned")
            .clone()
            .ok_or_else(|| StoreError::NotFound("memory snapshot".to_string()))
    }
}
