//! The Ledger: unified API over the chain, miner, verifier, and adapters.
//!
//! A ledger exclusively owns its chain; there is no ambient or static
//! instance, and every operation takes its collaborators explicitly.
//! Recording, appending, persisting, and verifying run strictly
//! sequentially within one control flow.

use provchain_core::{
    check_block, Block, CancelToken, ContentRef, ContentStore, ComputationOracle, Difficulty,
    Digest, HashChain, Miner, BLOCK_VERSION,
};
use provchain_store::SnapshotStore;
use tracing::{debug, info, warn};

use crate::error::{LedgerError, Result};

/// Configuration for the Ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Difficulty predicate mined blocks must satisfy.
    pub difficulty: Difficulty,
    /// Header version stamped on mined blocks.
    pub version: u32,
    /// Whether `append` re-checks contiguity before mutating the chain.
    pub validate_on_append: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::STANDARD,
            version: BLOCK_VERSION,
            validate_on_append: true,
        }
    }
}

/// A local, append-only ledger of computation provenance records.
pub struct Ledger {
    chain: HashChain,
    miner: Miner,
    config: LedgerConfig,
}

impl Ledger {
    /// Create a ledger over an empty chain.
    pub fn new(config: LedgerConfig) -> Self {
        let miner = Miner {
            difficulty: config.difficulty,
            version: config.version,
        };
        Self {
            chain: HashChain::new(),
            miner,
            config,
        }
    }

    /// Create a ledger over an already-loaded chain.
    pub fn with_chain(chain: HashChain, config: LedgerConfig) -> Self {
        let mut ledger = Self::new(config);
        ledger.chain = chain;
        ledger
    }

    /// Load the persisted chain, starting empty when no snapshot exists.
    pub fn load_or_empty(store: &dyn SnapshotStore, config: LedgerConfig) -> Result<Self> {
        let chain = store.load_or_empty()?;
        Ok(Self::with_chain(chain, config))
    }

    /// The owned chain.
    pub fn chain(&self) -> &HashChain {
        &self.chain
    }

    /// Consume the ledger, yielding the chain.
    pub fn into_chain(self) -> HashChain {
        self.chain
    }

    /// Number of blocks, genesis sentinel included.
    pub fn len(&self) -> u64 {
        self.chain.len()
    }

    /// Whether the chain holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// The current tail block.
    pub fn tail(&self) -> Result<&Block> {
        Ok(self.chain.tail()?)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Recording
    // ─────────────────────────────────────────────────────────────────────

    /// Record a provenance entry: resolve the referenced bytes, run the
    /// algorithm, digest its output, mine the successor block, and append.
    ///
    /// Fetch or oracle failure here is a hard error - without an output
    /// digest no valid block can be constructed. The proof-of-work search
    /// blocks until a nonce is found.
    pub fn record(
        &mut self,
        reference: ContentRef,
        content: &dyn ContentStore,
        oracle: &dyn ComputationOracle,
    ) -> Result<&Block> {
        self.record_inner(reference, content, oracle, None)
    }

    /// Like [`Ledger::record`], but the nonce search checks `cancel` each
    /// iteration. A cancelled search appends nothing.
    pub fn record_cancellable(
        &mut self,
        reference: ContentRef,
        content: &dyn ContentStore,
        oracle: &dyn ComputationOracle,
        cancel: &CancelToken,
    ) -> Result<&Block> {
        self.record_inner(reference, content, oracle, Some(cancel))
    }

    fn record_inner(
        &mut self,
        reference: ContentRef,
        content: &dyn ContentStore,
        oracle: &dyn ComputationOracle,
        cancel: Option<&CancelToken>,
    ) -> Result<&Block> {
        let dataset = content.fetch(&reference.dataset)?;
        let algorithm = content.fetch(&reference.algorithm)?;

        let output = oracle.run(&algorithm, &dataset)?;
        let output_digest = Digest::of_bytes(&output);
        debug!(
            dataset = %reference.dataset,
            algorithm = %reference.algorithm,
            output_bytes = output.len(),
            "oracle output digested"
        );

        if self.chain.is_empty() {
            // Bootstrap: materialize the genesis sentinel as block 0.
            self.chain.push(Block::genesis(now_millis().to_string()));
            debug!("initialized chain with genesis sentinel");
        }

        let previous = self.chain.tail()?;
        let timestamp = now_millis().to_string();
        let block = match cancel {
            None => self
                .miner
                .mine(previous, reference, output_digest, timestamp),
            Some(token) => {
                self.miner
                    .mine_cancellable(previous, reference, output_digest, timestamp, token)?
            }
        };

        self.append(block)?;

        let tail = self.chain.tail()?;
        info!(index = tail.index, digest = %tail.digest, nonce = tail.nonce, "recorded provenance block");
        Ok(tail)
    }

    /// Append an already-mined block after checking contiguity.
    ///
    /// The chain container itself never validates; this is where the
    /// contiguity invariant is enforced.
    pub fn append(&mut self, block: Block) -> Result<()> {
        if self.config.validate_on_append {
            self.check_extends(&block)?;
        }
        self.chain.push(block);
        Ok(())
    }

    fn check_extends(&self, block: &Block) -> Result<()> {
        let expected = self.chain.len();
        if block.index != expected {
            return Err(LedgerError::NonContiguousIndex {
                expected,
                got: block.index,
            });
        }

        let expected_previous = match self.chain.tail() {
            Ok(tail) => tail.digest.clone(),
            Err(_) => Digest::empty(),
        };
        if block.header.previous != expected_previous {
            return Err(LedgerError::PreviousDigestMismatch { index: block.index });
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────

    /// Independently verify the block at `index` against the injected
    /// collaborators. Returns `false` on any failing step; errors only for
    /// an index outside the chain.
    pub fn verify_index(
        &self,
        index: u64,
        content: &dyn ContentStore,
        oracle: &dyn ComputationOracle,
    ) -> Result<bool> {
        let block = self
            .chain
            .get(index)
            .ok_or(LedgerError::UnknownBlock(index))?;

        match check_block(block, content, oracle) {
            Ok(()) => {
                debug!(index, "block verified");
                Ok(true)
            }
            Err(e) => {
                warn!(index, error = %e, "block verification failed");
                Ok(false)
            }
        }
    }

    /// Locally audit every stored block: position, self-digest, difficulty
    /// admission, Merkle root, and the link to its predecessor. No I/O.
    pub fn audit(&self) -> Result<()> {
        let mut previous_digest = Digest::empty();

        for (position, block) in self.chain.iter().enumerate() {
            let index = position as u64;
            let fail = |reason: &str| LedgerError::Audit {
                index,
                reason: reason.to_string(),
            };

            if block.index != index {
                return Err(fail("index does not match chain position"));
            }
            if !block.digest_is_consistent() {
                return Err(fail("stored digest does not match recomputed digest"));
            }
            if block.header.previous != previous_digest {
                return Err(fail("previous digest does not match predecessor"));
            }

            if !block.is_genesis() {
                if !self.miner.difficulty.admits(&block.digest) {
                    return Err(fail("digest does not satisfy the difficulty predicate"));
                }
                if block.compute_merkle_root() != block.header.merkle_root {
                    return Err(fail("merkle root does not cover the transaction"));
                }
            }

            previous_digest = block.digest.clone();
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────

    /// Snapshot the chain through the given adapter.
    pub fn persist(&self, store: &dyn SnapshotStore) -> Result<()> {
        store.save(&self.chain)?;
        Ok(())
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use provchain_core::{FetchError, OracleError};
    use provchain_store::MemoryContentStore;

    struct FixedOracle(&'static [u8]);

    impl ComputationOracle for FixedOracle {
        fn run(&self, _algorithm: &[u8], _dataset: &[u8]) -> std::result::Result<Bytes, OracleError> {
            Ok(Bytes::from_static(self.0))
        }
    }

    struct FailingOracle;

    impl ComputationOracle for FailingOracle {
        fn run(&self, _algorithm: &[u8], _dataset: &[u8]) -> std::result::Result<Bytes, OracleError> {
            Err(OracleError::ExecutionFailed {
                status: Some(1),
                output: String::new(),
            })
        }
    }

    fn quick_config() -> LedgerConfig {
        LedgerConfig {
            difficulty: Difficulty::leading_zeros(1),
            ..LedgerConfig::default()
        }
    }

    fn seeded_content() -> MemoryContentStore {
        let content = MemoryContentStore::new();
        content.put(&"D1".into(), Bytes::from_static(b"1,2,3"));
        content.put(&"A1".into(), Bytes::from_static(b"sum"));
        content
    }

    #[test]
    fn test_record_bootstraps_genesis() {
        let mut ledger = Ledger::new(quick_config());
        let content = seeded_content();

        let block = ledger
            .record(ContentRef::new("D1", "A1"), &content, &FixedOracle(b"42"))
            .unwrap();

        assert_eq!(block.index, 1);
        assert!(block.header.previous.is_empty());
        assert_eq!(ledger.len(), 2);
        assert!(ledger.chain().get(0).unwrap().is_genesis());
    }

    #[test]
    fn test_record_chains_consecutive_blocks() {
        let mut ledger = Ledger::new(quick_config());
        let content = seeded_content();
        let oracle = FixedOracle(b"42");

        let first_digest = ledger
            .record(ContentRef::new("D1", "A1"), &content, &oracle)
            .unwrap()
            .digest
            .clone();
        let second = ledger
            .record(ContentRef::new("D1", "A1"), &content, &oracle)
            .unwrap();

        assert_eq!(second.index, 2);
        assert_eq!(second.header.previous, first_digest);
    }

    #[test]
    fn test_record_fails_hard_on_missing_content() {
        let mut ledger = Ledger::new(quick_config());
        let content = MemoryContentStore::new();

        let result = ledger.record(ContentRef::new("D1", "A1"), &content, &FixedOracle(b"42"));
        assert!(matches!(
            result,
            Err(LedgerError::Fetch(FetchError::NotFound(_)))
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_record_fails_hard_on_oracle_failure() {
        let mut ledger = Ledger::new(quick_config());
        let content = seeded_content();

        let result = ledger.record(ContentRef::new("D1", "A1"), &content, &FailingOracle);
        assert!(matches!(result, Err(LedgerError::Oracle(_))));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_cancelled_record_appends_nothing() {
        let mut ledger = Ledger::new(quick_config());
        let content = seeded_content();

        let token = CancelToken::new();
        token.cancel();

        let result = ledger.record_cancellable(
            ContentRef::new("D1", "A1"),
            &content,
            &FixedOracle(b"42"),
            &token,
        );
        assert!(matches!(result, Err(LedgerError::Mine(_))));
        // The genesis bootstrap may have happened, but no mined block landed.
        assert!(ledger.len() <= 1);
    }

    #[test]
    fn test_append_rejects_wrong_index() {
        let mut ledger = Ledger::new(quick_config());
        let mut block = Block::genesis("0");
        block.index = 5;

        assert!(matches!(
            ledger.append(block),
            Err(LedgerError::NonContiguousIndex { expected: 0, got: 5 })
        ));
    }

    #[test]
    fn test_append_rejects_wrong_previous_digest() {
        let mut ledger = Ledger::new(quick_config());
        let content = seeded_content();
        ledger
            .record(ContentRef::new("D1", "A1"), &content, &FixedOracle(b"42"))
            .unwrap();

        // A block that claims the right index but links elsewhere.
        let mut forged = ledger.tail().unwrap().clone();
        forged.index = ledger.len();
        forged.header.previous = Digest::of_str("elsewhere");

        assert!(matches!(
            ledger.append(forged),
            Err(LedgerError::PreviousDigestMismatch { .. })
        ));
    }

    #[test]
    fn test_verify_index_and_unknown_block() {
        let mut ledger = Ledger::new(quick_config());
        let content = seeded_content();
        ledger
            .record(ContentRef::new("D1", "A1"), &content, &FixedOracle(b"42"))
            .unwrap();

        assert!(ledger.verify_index(1, &content, &FixedOracle(b"42")).unwrap());
        assert!(!ledger.verify_index(1, &content, &FixedOracle(b"43")).unwrap());
        assert!(matches!(
            ledger.verify_index(9, &content, &FixedOracle(b"42")),
            Err(LedgerError::UnknownBlock(9))
        ));
    }

    #[test]
    fn test_audit_accepts_freshly_mined_chain() {
        let mut ledger = Ledger::new(quick_config());
        let content = seeded_content();
        let oracle = FixedOracle(b"42");

        ledger
            .record(ContentRef::new("D1", "A1"), &content, &oracle)
            .unwrap();
        ledger
            .record(ContentRef::new("D1", "A1"), &content, &oracle)
            .unwrap();

        ledger.audit().unwrap();
    }

    #[test]
    fn test_audit_rejects_tampered_chain() {
        let mut ledger = Ledger::new(quick_config());
        let content = seeded_content();
        ledger
            .record(ContentRef::new("D1", "A1"), &content, &FixedOracle(b"42"))
            .unwrap();

        let mut chain = ledger.into_chain();
        let mut blocks = chain.blocks().to_vec();
        // The self-digest commits to the nonce, so this breaks consistency.
        blocks[1].nonce += 1;
        chain = HashChain::from_blocks(blocks);

        let tampered = Ledger::with_chain(chain, quick_config());
        assert!(matches!(
            tampered.audit(),
            Err(LedgerError::Audit { index: 1, .. })
        ));
    }
}
