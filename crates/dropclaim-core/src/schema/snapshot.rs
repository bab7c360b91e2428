//! Off-chain allowlist snapshot documents.
//!
//! A snapshot is published at the URI the contract metadata associates with a merkle root.
//! Two layouts are supported:
//!
//! - [`EntriesSnapshot`]: the complete entry list in one document. Proofs are built in memory.
//! - [`ShardedMerkleInfo`]: entries split into shards keyed by a prefix of the lowercase hex
//!   address. Each shard lives at `{base_uri}/{shard_id}.json` as [`ShardData`].

use alloy_primitives::{Address, B256};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::base::UNLIMITED;

/// Longest supported shard prefix, in hex characters.
pub const MAX_SHARD_NYBBLES: u8 = 4;

/// One allowlisted address and its overrides, as written by the organizer.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    /// Allowlisted wallet.
    #[schemars(with = "String")]
    pub address: Address,
    /// Per-wallet limit as a decimal amount, or `unlimited`.
    #[serde(default = "unlimited")]
    pub max_claimable: String,
    /// Price override as a decimal amount in currency units. Absent means no override.
    #[serde(default)]
    pub price: Option<String>,
    /// Currency override. Absent means no override.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub currency_address: Option<Address>,
}

fn unlimited() -> String {
    UNLIMITED.to_owned()
}

/// Snapshot carrying the full entry list.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntriesSnapshot {
    /// Root of the tree built from `entries`.
    pub merkle_root: B256,
    /// Decimals used to scale `maxClaimable`, if pinned by the publisher.
    #[serde(default)]
    pub token_decimals: Option<u8>,
    /// All allowlist entries.
    pub entries: Vec<SnapshotEntry>,
}

/// Index document of a sharded snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardedMerkleInfo {
    /// Root committed on-chain.
    pub merkle_root: B256,
    /// Base URI under which shard documents are stored.
    pub base_uri: String,
    /// URI of the original, unsharded entry list.
    pub original_entries_uri: String,
    /// Number of leading hex characters of the address that select the shard.
    pub shard_nybbles: u8,
    /// Decimals used to scale `maxClaimable`.
    pub token_decimals: u8,
    /// Marker distinguishing this layout.
    pub is_sharded_merkle_tree: bool,
}

impl ShardedMerkleInfo {
    /// URI of the shard that would contain `address`.
    #[must_use]
    pub fn shard_uri(&self, address: Address) -> String {
        format!(
            "{}/{}.json",
            self.base_uri.trim_end_matches('/'),
            shard_id(address, self.shard_nybbles)
        )
    }
}

/// One shard of a sharded snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardData {
    /// Proof of this shard's root within the top-level tree.
    pub proofs: Vec<B256>,
    /// Entries assigned to this shard.
    pub entries: Vec<SnapshotEntry>,
}

/// Any published snapshot layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotDocument {
    /// Sharded layout.
    Sharded(ShardedMerkleInfo),
    /// Full entry list.
    Entries(EntriesSnapshot),
}

impl SnapshotDocument {
    /// The root the document commits to.
    #[must_use]
    pub const fn merkle_root(&self) -> B256 {
        match self {
            Self::Sharded(info) => info.merkle_root,
            Self::Entries(snapshot) => snapshot.merkle_root,
        }
    }
}

/// Shard key of `address`: its first `nybbles` lowercase hex characters, without `0x`.
#[must_use]
pub fn shard_id(address: Address, nybbles: u8) -> String {
    let mut id = hex::encode(address.as_slice());
    id.truncate(usize::from(nybbles));
    id
}
