//! # Provchain
//!
//! A local, append-only ledger of computation provenance records. Each
//! block binds a dataset reference and an algorithm reference to the
//! digest of the output produced by running that algorithm against that
//! dataset, sealed by proof-of-work and independently re-verifiable.
//!
//! ## Key Concepts
//!
//! - **Block**: Immutable once mined. Never edited, only read or discarded.
//! - **Content reference**: Opaque dataset/algorithm content addresses;
//!   bytes are fetched through a [`ContentStore`], never stored in blocks.
//! - **Oracle**: The external program execution capability; the ledger
//!   digests exactly the bytes the oracle returns.
//! - **Verification**: Re-fetch, recompute, re-run, compare. Any failing
//!   step is a `false` outcome, never a crash.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use provchain::{ContentRef, Ledger, LedgerConfig};
//! use provchain::store::{DirContentStore, JsonSnapshot};
//! use provchain::exec::SubprocessOracle;
//!
//! fn example() -> provchain::Result<()> {
//!     let content = DirContentStore::new("content");
//!     let oracle = SubprocessOracle::python();
//!     let snapshot = JsonSnapshot::new("blockchain.json");
//!
//!     let mut ledger = Ledger::load_or_empty(&snapshot, LedgerConfig::default())?;
//!
//!     let block = ledger.record(ContentRef::new("D1", "A1"), &content, &oracle)?;
//!     println!("mined block {} with digest {}", block.index, block.digest);
//!
//!     ledger.persist(&snapshot)?;
//!     assert!(ledger.verify_index(1, &content, &oracle)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `provchain::core` - Core primitives (blocks, Merkle, mining, verify)
//! - `provchain::store` - Snapshot persistence and local content stores
//! - `provchain::exec` - The subprocess computation oracle

pub mod error;
pub mod ledger;

// Re-export component crates
pub use provchain_core as core;
pub use provchain_exec as exec;
pub use provchain_store as store;

// Re-export main types for convenience
pub use error::{LedgerError, Result};
pub use ledger::{Ledger, LedgerConfig};

// Re-export commonly used core types
pub use provchain_core::{
    check_block, merkle_root, verify_block, Block, BlockHeader, CancelToken, ComputationOracle,
    ContentId, ContentRef, ContentStore, Difficulty, Digest, HashChain, Miner, BLOCK_VERSION,
};
