//! Proptest strategies over the core data model.
//!
//! Generated blocks are structurally well-formed (sequential indices,
//! linked previous digests) but carry arbitrary digests and nonces - they
//! have NOT been mined. Use them for serialization and container
//! properties, not for difficulty or verification properties.

use proptest::prelude::*;

use provchain_core::{Block, BlockHeader, ContentId, ContentRef, Digest, HashChain, BLOCK_VERSION};

/// An opaque content id: short alphanumeric, CID-like.
pub fn content_id() -> impl Strategy<Value = ContentId> {
    "[A-Za-z0-9]{1,46}".prop_map(ContentId::new)
}

/// A dataset/algorithm reference pair.
pub fn content_ref() -> impl Strategy<Value = ContentRef> {
    (content_id(), content_id()).prop_map(|(dataset, algorithm)| ContentRef {
        dataset,
        algorithm,
    })
}

/// A 64-character hex digest.
pub fn digest() -> impl Strategy<Value = Digest> {
    "[0-9a-f]{64}".prop_map(Digest::from)
}

/// An opaque decimal timestamp string.
pub fn timestamp() -> impl Strategy<Value = String> {
    "[0-9]{1,13}"
}

/// A standalone block at the given index (arbitrary digests, not mined).
pub fn block_at(index: u64, previous: Digest) -> impl Strategy<Value = Block> {
    (content_ref(), digest(), digest(), digest(), timestamp(), any::<u32>()).prop_map(
        move |(transaction, merkle, output, own, ts, nonce)| Block {
            index,
            header: BlockHeader {
                version: BLOCK_VERSION,
                previous: previous.clone(),
                merkle_root: merkle,
                timestamp: ts,
            },
            transaction,
            output_digest: output,
            nonce: nonce as u64,
            digest: own,
        },
    )
}

/// A structurally linked chain: genesis sentinel plus up to `max_blocks`
/// blocks with sequential indices and matching previous digests.
pub fn chain(max_blocks: usize) -> impl Strategy<Value = HashChain> {
    proptest::collection::vec((content_ref(), digest(), digest(), digest(), timestamp()), 0..max_blocks)
        .prop_map(|entries| {
            let mut chain = HashChain::new();
            chain.push(Block::genesis("0"));

            for (offset, (transaction, merkle, output, own, ts)) in entries.into_iter().enumerate()
            {
                let previous = chain
                    .tail()
                    .expect("chain seeded with genesis")
                    .digest
                    .clone();
                chain.push(Block {
                    index: offset as u64 + 1,
                    header: BlockHeader {
                        version: BLOCK_VERSION,
                        previous,
                        merkle_root: merkle,
                        timestamp: ts,
                    },
                    transaction,
                    output_digest: output,
                    nonce: offset as u64,
                    digest: own,
                });
            }
            chain
        })
}
