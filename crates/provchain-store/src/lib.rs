//! # Provchain Store
//!
//! Persistence adapters for the provchain ledger. Provides chain snapshot
//! storage behind the [`SnapshotStore`] trait and local implementations of
//! the core [`ContentStore`](provchain_core::ContentStore) capability.
//!
//! ## Key Types
//!
//! - [`SnapshotStore`] - Save/load a whole-chain snapshot
//! - [`JsonSnapshot`] - Pretty-printed JSON file snapshot
//! - [`SqliteStore`] - SQLite-backed blocks + content blobs
//! - [`DirContentStore`] - One file per content id under a root directory
//! - [`MemoryContentStore`], [`MemorySnapshot`] - In-memory, for tests
//!
//! ## Design Notes
//!
//! - **Lossless snapshots**: `load(save(chain)) == chain` field-for-field,
//!   digests and nonces included; nothing is recomputed on load.
//! - **Caller-level fallback**: a missing snapshot surfaces as
//!   [`StoreError::NotFound`]; starting from an empty chain is the
//!   caller's policy, expressed through [`SnapshotStore::load_or_empty`].
//! - **Blocking calls**: the ledger's execution model is single-writer
//!   synchronous; no retry policy is implied here.

pub mod content;
pub mod error;
pub mod json;
pub mod memory;
pub mod migration;
pub mod snapshot;
pub mod sqlite;

pub use content::DirContentStore;
pub use error::{Result, StoreError};
pub use json::JsonSnapshot;
pub use memory::{MemoryContentStore, MemorySnapshot};
pub use snapshot::SnapshotStore;
pub use sqlite::SqliteStore;
