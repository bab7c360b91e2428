use alloy_primitives::B256;

use crate::core::{MerkleError, hash_pair};

const MAX_LEAVES: usize = 1_usize << 32;

/// A fully materialised sorted-pair keccak merkle tree.
///
/// `levels[0]` holds the sorted leaves and the last level holds the root. Each level is half the
/// width of the previous one, rounded up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeccakMerkleTree {
    levels: Vec<Vec<B256>>,
}

impl KeccakMerkleTree {
    /// Build a tree from unordered leaves.
    ///
    /// # Errors
    /// Returns [`MerkleError::EmptyTree`] for an empty input and [`MerkleError::LeavesOverflow`]
    /// when there are 2^32 or more leaves.
    pub fn from_leaves(mut leaves: Vec<B256>) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyTree);
        }
        if leaves.len() >= MAX_LEAVES {
            return Err(MerkleError::LeavesOverflow(leaves.len()));
        }
        leaves.sort_unstable();

        let mut levels = vec![leaves];
        while let Some(current) = levels.last().filter(|level| level.len() > 1) {
            let next = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(left, right),
                    rest => rest.first().copied().unwrap_or_default(),
                })
                .collect::<Vec<_>>();
            levels.push(next);
        }

        Ok(Self { levels })
    }

    /// The root hash.
    #[must_use]
    pub fn root(&self) -> B256 {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or_default()
    }

    /// Number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Sorted leaves.
    #[must_use]
    pub fn leaves(&self) -> &[B256] {
        self.levels.first().map_or(&[], Vec::as_slice)
    }

    /// Proof for `leaf`, or `None` if the leaf is not in the tree.
    ///
    /// Duplicate leaves share the proof of their first occurrence.
    #[must_use]
    pub fn proof(&self, leaf: &B256) -> Option<Vec<B256>> {
        let mut index = self.leaves().binary_search(leaf).ok()?;
        // binary_search may land on any duplicate
        while index > 0 && self.leaves().get(index.saturating_sub(1)) == Some(leaf) {
            index = index.saturating_sub(1);
        }

        let depth = self.levels.len().saturating_sub(1);
        let mut proof = Vec::with_capacity(depth);
        for level in self.levels.iter().take(depth) {
            if let Some(sibling) = level.get(index ^ 1) {
                proof.push(*sibling);
            }
            index /= 2;
        }
        Some(proof)
    }
}
