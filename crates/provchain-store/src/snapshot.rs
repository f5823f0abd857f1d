//! Snapshot trait: the abstract interface for chain persistence.
//!
//! A snapshot is the whole chain as a structured document. Saving replaces
//! any previous snapshot; loading reproduces the chain exactly as saved,
//! including every block's stored digest and nonce, with no recomputation.

use provchain_core::HashChain;

use crate::error::{Result, StoreError};

/// Save and load whole-chain snapshots.
pub trait SnapshotStore {
    /// Persist the chain, replacing any existing snapshot.
    fn save(&self, chain: &HashChain) -> Result<()>;

    /// Load the persisted chain.
    ///
    /// A missing snapshot is [`StoreError::NotFound`]; an unreadable or
    /// malformed one is `Io`/`Parse`/`Corrupt`.
    fn load(&self) -> Result<HashChain>;

    /// Load the persisted chain, treating a missing snapshot as empty.
    ///
    /// This is the caller-level fallback policy: malformed snapshots still
    /// surface as errors rather than being silently discarded.
    fn load_or_empty(&self) -> Result<HashChain> {
        match self.load() {
            Ok(chain) => Ok(chain),
            Err(StoreError::NotFound(_)) => Ok(HashChain::new()),
            Err(e) => Err(e),
        }
    }
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for &T {
    fn save(&self, chain: &HashChain) -> Result<()> {
        (**self).save(chain)
    }

    fn load(&self) -> Result<HashChain> {
        (**self).load()
    }
}
