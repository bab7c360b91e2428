//! Sorted-pair keccak256 merkle tree.
//!
//! Parents are `keccak256(min(a, b) ++ max(a, b))`, so proofs carry no direction bits and verify
//! with OpenZeppelin's `MerkleProof.verify`. Leaves are sorted before building; an unpaired node
//! at the end of a level is promoted unchanged.

mod core;
mod tree;

pub use crate::core::{MerkleError, hash_pair, verify};
pub use crate::tree::KeccakMerkleTree;
