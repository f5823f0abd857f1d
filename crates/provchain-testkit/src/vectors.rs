//! Structural vectors for cross-implementation verification.
//!
//! Every implementation of the protocol must produce identical:
//!
//! - digest preimages (the fixed-order textual encoding of block fields)
//! - Merkle reduction shapes (pairwise hex concatenation, odd promotion)
//!
//! The preimage vectors pin exact strings, so they hold without computing
//! any hash; the Merkle vectors pin the reduction structure in terms of
//! the digest helper itself.

use serde::{Deserialize, Serialize};

use provchain_core::{merkle_root, Block, BlockHeader, ContentRef, Digest, BLOCK_VERSION};

/// A pinned digest-preimage vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreimageVector {
    pub name: String,

    // Inputs
    pub index: u64,
    pub previous: String,
    pub timestamp: String,
    pub merkle_root: String,
    pub dataset_id: String,
    pub algorithm_id: String,
    pub nonce: u64,

    // Derived output: the exact preimage string
    pub preimage: String,
}

impl PreimageVector {
    /// Build the block this vector describes.
    pub fn to_block(&self) -> Block {
        Block {
            index: self.index,
            header: BlockHeader {
                version: BLOCK_VERSION,
                previous: Digest::from(self.previous.clone()),
                merkle_root: Digest::from(self.merkle_root.clone()),
                timestamp: self.timestamp.clone(),
            },
            transaction: ContentRef::new(self.dataset_id.clone(), self.algorithm_id.clone()),
            output_digest: Digest::empty(),
            nonce: self.nonce,
            digest: Digest::empty(),
        }
    }
}

/// The pinned preimage vectors.
///
/// Field order is index, previous, timestamp, merkle root, dataset id,
/// algorithm id, nonce - integers in decimal, strings verbatim, no
/// separators. Note the version and output digest are NOT part of the
/// preimage.
pub fn preimage_vectors() -> Vec<PreimageVector> {
    vec![
        PreimageVector {
            name: "first_block_after_genesis".to_string(),
            index: 1,
            previous: String::new(),
            timestamp: "1736870400000".to_string(),
            merkle_root: "aabbccdd".to_string(),
            dataset_id: "D1".to_string(),
            algorithm_id: "A1".to_string(),
            nonce: 0,
            preimage: "11736870400000aabbccddD1A10".to_string(),
        },
        PreimageVector {
            name: "later_block_with_nonce".to_string(),
            index: 42,
            previous: "0000feed".to_string(),
            timestamp: "7".to_string(),
            merkle_root: "beef".to_string(),
            dataset_id: "QmDataset".to_string(),
            algorithm_id: "QmAlgorithm".to_string(),
            nonce: 31337,
            preimage: "420000feed7beefQmDatasetQmAlgorithm31337".to_string(),
        },
        PreimageVector {
            name: "empty_reference_fields".to_string(),
            index: 3,
            previous: "aa".to_string(),
            timestamp: String::new(),
            merkle_root: String::new(),
            dataset_id: String::new(),
            algorithm_id: String::new(),
            nonce: 9,
            preimage: "3aa9".to_string(),
        },
    ]
}

/// A pinned Merkle reduction vector: leaves and the expression tree of the
/// expected root in terms of the digest helper.
#[derive(Debug, Clone)]
pub struct MerkleVector {
    pub name: &'static str,
    pub leaves: Vec<&'static str>,
    pub expected: Digest,
}

/// The pinned Merkle vectors, expectations derived structurally.
pub fn merkle_vectors() -> Vec<MerkleVector> {
    let h = Digest::of_str;
    let cat = |a: &Digest, b: &Digest| Digest::of_str(&format!("{}{}", a.as_str(), b.as_str()));

    vec![
        MerkleVector {
            name: "empty_list_is_empty_digest",
            leaves: vec![],
            expected: Digest::empty(),
        },
        MerkleVector {
            name: "single_leaf_is_its_digest",
            leaves: vec!["D1"],
            expected: h("D1"),
        },
        MerkleVector {
            name: "pair_combines_hex_concatenation",
            leaves: vec!["D1", "A1"],
            expected: cat(&h("D1"), &h("A1")),
        },
        MerkleVector {
            name: "odd_leaf_promotes_unpaired",
            leaves: vec!["a", "b", "c"],
            expected: cat(&cat(&h("a"), &h("b")), &h("c")),
        },
        MerkleVector {
            name: "four_leaves_two_levels",
            leaves: vec!["a", "b", "c", "d"],
            expected: cat(&cat(&h("a"), &h("b")), &cat(&h("c"), &h("d"))),
        },
        MerkleVector {
            name: "five_leaves_promotes_through_two_levels",
            leaves: vec!["a", "b", "c", "d", "e"],
            expected: cat(
                &cat(&cat(&h("a"), &h("b")), &cat(&h("c"), &h("d"))),
                &h("e"),
            ),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preimage_vectors_hold() {
        for vector in preimage_vectors() {
            let block = vector.to_block();
            assert_eq!(block.preimage(), vector.preimage, "vector {}", vector.name);
        }
    }

    #[test]
    fn test_preimage_vectors_serialize() {
        // Vectors are serializable so other implementations can consume them.
        let json = serde_json::to_string_pretty(&preimage_vectors()).unwrap();
        let back: Vec<PreimageVector> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), preimage_vectors().len());
    }

    #[test]
    fn test_merkle_vectors_hold() {
        for vector in merkle_vectors() {
            assert_eq!(
                merkle_root(&vector.leaves),
                vector.expected,
                "vector {}",
                vector.name
            );
        }
    }

    #[test]
    fn test_output_digest_is_outside_the_preimage() {
        let vector = &preimage_vectors()[0];
        let mut block = vector.to_block();
        block.output_digest = Digest::of_bytes(b"42");
        // Changing the output digest must not disturb the preimage.
        assert_eq!(block.preimage(), vector.preimage);
    }
}
