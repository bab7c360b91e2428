//! Shared merkle types and helpers.

use alloy_primitives::{B256, keccak256};
use thiserror::Error;

/// Errors that can occur when working with the merkle tree.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MerkleError {
    /// A tree needs at least one leaf.
    #[error("Cannot build a merkle tree without leaves")]
    EmptyTree,

    /// The tree would exceed the supported depth.
    #[error("Leaves {0} exceeds maximum supported leaves (2^32)")]
    LeavesOverflow(usize),
}

/// Hash two nodes in sorted order.
#[must_use]
pub fn hash_pair(a: &B256, b: &B256) -> B256 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0_u8; 64];
    let (left, right) = buf.split_at_mut(32);
    left.copy_from_slice(lo.as_slice());
    right.copy_from_slice(hi.as_slice());
    keccak256(buf)
}

/// Returns `true` if folding `proof` over `leaf` yields `root`.
#[must_use]
pub fn verify(proof: &[B256], root: &B256, leaf: &B256) -> bool {
    proof
        .iter()
        .fold(*leaf, |node, sibling| hash_pair(&node, sibling))
        == *root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_hash_is_order_independent() {
        let a = B256::repeat_byte(1);
        let b = B256::repeat_byte(2);
        assert_eq!(hash_pair(&a, &b), hash_pair(&b, &a));
        assert_ne!(hash_pair(&a, &b), hash_pair(&a, &a));
    }

    #[test]
    fn empty_proof_verifies_leaf_as_root() {
        let leaf = B256::repeat_byte(7);
        assert!(verify(&[], &leaf, &leaf));
        assert!(!verify(&[], &B256::ZERO, &leaf));
    }
}
