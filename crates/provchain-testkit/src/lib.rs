//! # Provchain Testkit
//!
//! Testing utilities for the provchain ledger:
//!
//! - [`fixtures`] - Seeded content stores, canned oracles, quick ledgers
//! - [`vectors`] - Structural vectors pinning the digest preimage and the
//!   Merkle reduction shape
//! - [`generators`] - Proptest strategies over the core data model
//!
//! The canned oracles here stand in for real program execution in tests;
//! the subprocess implementation lives in `provchain-exec`.

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{CountingOracle, FailingOracle, FixedOracle, TestFixture};
pub use vectors::{merkle_vectors, preimage_vectors, MerkleVector, PreimageVector};
