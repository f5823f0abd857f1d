//! Merkle aggregation of ordered reference lists.
//!
//! Leaves are the digests of the input strings in input order. Levels reduce
//! pairwise left-to-right, combining two nodes by digesting the
//! concatenation of their hex encodings; an unpaired trailing node is
//! promoted to the next level unchanged.
//!
//! Promotion without duplication admits trivial proof ambiguity compared to
//! duplicating the last node. That is acceptable here: no Merkle proofs are
//! served, membership is established by full recomputation only.
//!
//! The root commits to content *identifiers*, not the bytes they resolve to.
//! A mutable backing store can change the bytes behind a fixed identifier
//! without detection at this layer; only the output-digest check catches it.

use crate::digest::Digest;

/// Reduce an ordered sequence of reference strings to a single root digest.
///
/// Deterministic and order-sensitive. An empty input yields the empty
/// digest (a defined result, not an error); a single input yields the
/// digest of that string.
pub fn merkle_root<S: AsRef<str>>(refs: &[S]) -> Digest {
    if refs.is_empty() {
        return Digest::empty();
    }

    let mut level: Vec<Digest> = refs
        .iter()
        .map(|r| Digest::of_str(r.as_ref()))
        .collect();

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len() / 2 + 1);
        let mut i = 0;
        while i < level.len() {
            if i + 1 < level.len() {
                let combined = format!("{}{}", level[i].as_str(), level[i + 1].as_str());
                next.push(Digest::of_str(&combined));
            } else {
                // Odd count: the trailing node moves up unpaired.
                next.push(level[i].clone());
            }
            i += 2;
        }
        level = next;
    }

    level.pop().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_empty_digest() {
        let refs: [&str; 0] = [];
        assert_eq!(merkle_root(&refs), Digest::empty());
    }

    #[test]
    fn test_single_leaf_promoted_to_root() {
        assert_eq!(merkle_root(&["D1"]), Digest::of_str("D1"));
    }

    #[test]
    fn test_two_leaves() {
        let expected = Digest::of_str(&format!(
            "{}{}",
            Digest::of_str("a").as_str(),
            Digest::of_str("b").as_str()
        ));
        assert_eq!(merkle_root(&["a", "b"]), expected);
    }

    #[test]
    fn test_three_leaves_promotes_trailing() {
        // Level 1: [H(H(a)||H(b)), H(c)], root = H(level1[0] || level1[1]).
        let left = Digest::of_str(&format!(
            "{}{}",
            Digest::of_str("a").as_str(),
            Digest::of_str("b").as_str()
        ));
        let right = Digest::of_str("c");
        let expected = Digest::of_str(&format!("{}{}", left.as_str(), right.as_str()));
        assert_eq!(merkle_root(&["a", "b", "c"]), expected);
    }

    #[test]
    fn test_deterministic() {
        let refs = ["D1", "A1"];
        assert_eq!(merkle_root(&refs), merkle_root(&refs));
    }

    #[test]
    fn test_order_sensitive() {
        assert_ne!(merkle_root(&["a", "b"]), merkle_root(&["b", "a"]));
    }

    #[test]
    fn test_accepts_owned_strings() {
        let refs = vec!["D1".to_string(), "A1".to_string()];
        assert_eq!(merkle_root(&refs), merkle_root(&["D1", "A1"]));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn root_is_deterministic(refs in proptest::collection::vec("[a-zA-Z0-9]{1,32}", 1..16)) {
                prop_assert_eq!(merkle_root(&refs), merkle_root(&refs));
            }

            #[test]
            fn root_is_never_empty_for_nonempty_input(
                refs in proptest::collection::vec("[a-zA-Z0-9]{1,32}", 1..16)
            ) {
                prop_assert!(!merkle_root(&refs).is_empty());
            }

            #[test]
            fn appending_a_leaf_changes_the_root(
                refs in proptest::collection::vec("[a-zA-Z0-9]{1,32}", 1..8),
                extra in "[a-zA-Z0-9]{1,32}",
            ) {
                let mut longer = refs.clone();
                longer.push(extra);
                prop_assert_ne!(merkle_root(&refs), merkle_root(&longer));
            }
        }
    }
}
