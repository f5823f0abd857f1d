//! Independent verification of a block's claims.
//!
//! Verification re-fetches the referenced content, recomputes the Merkle
//! root, re-runs the algorithm through the oracle, and re-derives the
//! output digest. It is read-only and idempotent: nothing is mutated, and
//! the same inputs always produce the same result (assuming the injected
//! collaborators are themselves deterministic).

use crate::block::Block;
use crate::digest::Digest;
use crate::error::VerifyError;
use crate::oracle::ComputationOracle;
use crate::source::ContentStore;

/// Check a block's claims, surfacing the first failing step.
///
/// Steps, in order: fetch dataset bytes, recompute and compare the Merkle
/// root, fetch algorithm bytes, invoke the oracle, digest and compare the
/// output. Every failure is a negative verification outcome, never a fatal
/// condition.
pub fn check_block(
    block: &Block,
    content: &dyn ContentStore,
    oracle: &dyn ComputationOracle,
) -> Result<(), VerifyError> {
    let dataset = content.fetch(&block.transaction.dataset)?;

    let recomputed = block.compute_merkle_root();
    if recomputed != block.header.merkle_root {
        return Err(VerifyError::MerkleMismatch {
            stored: block.header.merkle_root.clone(),
            recomputed,
        });
    }

    let algorithm = content.fetch(&block.transaction.algorithm)?;

    let output = oracle.run(&algorithm, &dataset)?;

    let recomputed = Digest::of_bytes(&output);
    if recomputed != block.output_digest {
        return Err(VerifyError::OutputMismatch {
            stored: block.output_digest.clone(),
            recomputed,
        });
    }

    Ok(())
}

/// Boolean form of [`check_block`]: any failing step yields `false`.
pub fn verify_block(
    block: &Block,
    content: &dyn ContentStore,
    oracle: &dyn ComputationOracle,
) -> bool {
    check_block(block, content, oracle).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, OracleError};
    use crate::miner::{Difficulty, Miner};
    use crate::reference::{ContentId, ContentRef};
    use bytes::Bytes;
    use std::collections::HashMap;

    struct MapStore(HashMap<String, Bytes>);

    impl MapStore {
        fn with_sample() -> Self {
            let mut map = HashMap::new();
            map.insert("D1".to_string(), Bytes::from_static(b"1,2,3"));
            map.insert("A1".to_string(), Bytes::from_static(b"print(sum)"));
            Self(map)
        }
    }

    impl ContentStore for MapStore {
        fn fetch(&self, id: &ContentId) -> Result<Bytes, FetchError> {
            self.0
                .get(id.as_str())
                .cloned()
                .ok_or_else(|| FetchError::NotFound(id.clone()))
        }
    }

    struct CannedOracle(Bytes);

    impl ComputationOracle for CannedOracle {
        fn run(&self, _algorithm: &[u8], _dataset: &[u8]) -> Result<Bytes, OracleError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenOracle;

    impl ComputationOracle for BrokenOracle {
        fn run(&self, _algorithm: &[u8], _dataset: &[u8]) -> Result<Bytes, OracleError> {
            Err(OracleError::ExecutionFailed {
                status: Some(1),
                output: "boom".to_string(),
            })
        }
    }

    fn mined_block() -> Block {
        let genesis = Block::genesis("0");
        Miner::new(Difficulty::leading_zeros(1)).mine(
            &genesis,
            ContentRef::new("D1", "A1"),
            Digest::of_bytes(b"42"),
            "1736870400000",
        )
    }

    #[test]
    fn test_unchanged_block_verifies() {
        let block = mined_block();
        let store = MapStore::with_sample();
        let oracle = CannedOracle(Bytes::from_static(b"42"));

        assert!(verify_block(&block, &store, &oracle));
        assert!(check_block(&block, &store, &oracle).is_ok());
    }

    #[test]
    fn test_verification_is_repeatable() {
        let block = mined_block();
        let store = MapStore::with_sample();
        let oracle = CannedOracle(Bytes::from_static(b"42"));

        assert!(verify_block(&block, &store, &oracle));
        assert!(verify_block(&block, &store, &oracle));
    }

    #[test]
    fn test_changed_oracle_output_fails() {
        let block = mined_block();
        let store = MapStore::with_sample();
        let oracle = CannedOracle(Bytes::from_static(b"43"));

        assert!(matches!(
            check_block(&block, &store, &oracle),
            Err(VerifyError::OutputMismatch { .. })
        ));
        assert!(!verify_block(&block, &store, &oracle));
    }

    #[test]
    fn test_tampered_dataset_id_fails() {
        let mut block = mined_block();
        block.transaction.dataset = ContentId::new("D1-tampered");

        let mut store = MapStore::with_sample();
        store
            .0
            .insert("D1-tampered".to_string(), Bytes::from_static(b"1,2,3"));
        let oracle = CannedOracle(Bytes::from_static(b"42"));

        // The stored Merkle root no longer covers the mutated id.
        assert!(matches!(
            check_block(&block, &store, &oracle),
            Err(VerifyError::MerkleMismatch { .. })
        ));
    }

    #[test]
    fn test_tampered_algorithm_id_fails() {
        let mut block = mined_block();
        block.transaction.algorithm = ContentId::new("A2");

        let mut store = MapStore::with_sample();
        store.0.insert("A2".to_string(), Bytes::from_static(b"x"));
        let oracle = CannedOracle(Bytes::from_static(b"42"));

        assert!(!verify_block(&block, &store, &oracle));
    }

    #[test]
    fn test_tampered_merkle_root_fails() {
        let mut block = mined_block();
        block.header.merkle_root = Digest::of_str("forged");

        let store = MapStore::with_sample();
        let oracle = CannedOracle(Bytes::from_static(b"42"));

        assert!(!verify_block(&block, &store, &oracle));
    }

    #[test]
    fn test_tampered_output_digest_fails() {
        let mut block = mined_block();
        block.output_digest = Digest::of_bytes(b"43");

        let store = MapStore::with_sample();
        let oracle = CannedOracle(Bytes::from_static(b"42"));

        assert!(!verify_block(&block, &store, &oracle));
    }

    #[test]
    fn test_missing_dataset_fails_before_oracle_runs() {
        let mut block = mined_block();
        block.transaction.dataset = ContentId::new("unknown");

        let store = MapStore::with_sample();
        let oracle = CannedOracle(Bytes::from_static(b"42"));

        assert!(matches!(
            check_block(&block, &store, &oracle),
            Err(VerifyError::Fetch(FetchError::NotFound(_)))
        ));
    }

    #[test]
    fn test_oracle_failure_is_nonfatal() {
        let block = mined_block();
        let store = MapStore::with_sample();

        assert!(!verify_block(&block, &store, &BrokenOracle));
    }

    #[test]
    fn test_verification_does_not_mutate_the_block() {
        let block = mined_block();
        let snapshot = block.clone();
        let store = MapStore::with_sample();
        let oracle = CannedOracle(Bytes::from_static(b"42"));

        let _ = verify_block(&block, &store, &oracle);
        assert_eq!(block, snapshot);
    }
}
