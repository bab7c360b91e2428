//! Builds allowlist snapshot documents from organizer entry lists.

use std::collections::{BTreeMap, BTreeSet};

use alloy::primitives::Address;
use dropclaim_core::leaf::{DEFAULT_PRICE_DECIMALS, EntryError, ResolvedEntry};
use dropclaim_core::schema::snapshot::{
    EntriesSnapshot, MAX_SHARD_NYBBLES, ShardData, ShardedMerkleInfo, SnapshotEntry, shard_id,
};
use dropclaim_merkle::{KeccakMerkleTree, MerkleError};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::chain::CurrencyDecimals;
use crate::error::ClaimError;

/// Errors produced while building a snapshot.
#[derive(Error, Debug)]
pub enum SnapshotBuildError {
    /// Nothing to commit to.
    #[error("Allowlist has no entries")]
    Empty,

    /// Shard prefix length outside the supported range.
    #[error("Shard nybbles must be between 1 and {MAX_SHARD_NYBBLES}, got {0}")]
    ShardNybbles(u8),

    /// The same wallet is listed twice.
    #[error("Address {0} is listed more than once")]
    DuplicateAddress(Address),

    /// The root of a shard has no proof in the top-level tree.
    #[error("Shard {0} is missing from the top-level tree")]
    MissingShard(String),

    /// Malformed entry amounts.
    #[error(transparent)]
    Entry(#[from] EntryError),

    /// Tree construction failed.
    #[error(transparent)]
    Merkle(#[from] MerkleError),

    /// Currency decimals could not be looked up.
    #[error(transparent)]
    Decimals(#[from] ClaimError),
}

/// A sharded snapshot: the index document plus every shard keyed by shard id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardedSnapshot {
    /// Index document published at the snapshot URI.
    pub info: ShardedMerkleInfo,
    /// Shard documents, to be published at `{base_uri}/{shard_id}.json`.
    pub shards: BTreeMap<String, ShardData>,
}

/// Looks up the decimals of every currency that scales a price in `entries`.
pub(crate) async fn collect_price_decimals<D>(
    entries: &[SnapshotEntry],
    decimals: &D,
) -> Result<BTreeMap<Address, u8>, ClaimError>
where
    D: CurrencyDecimals + ?Sized,
{
    let currencies: BTreeSet<Address> = entries
        .iter()
        .filter(|entry| entry.price.is_some())
        .filter_map(SnapshotEntry::price_currency)
        .collect();

    let mut found = BTreeMap::new();
    for currency in currencies {
        let value = decimals.currency_decimals(currency).await?;
        debug!(%currency, decimals = value, "Currency decimals");
        found.insert(currency, value);
    }
    Ok(found)
}

/// Price decimals for one entry, given the lookups from [`collect_price_decimals`].
pub(crate) fn price_decimals_for(
    entry: &SnapshotEntry,
    price_decimals: &BTreeMap<Address, u8>,
) -> u8 {
    entry
        .price_currency()
        .and_then(|currency| price_decimals.get(&currency).copied())
        .unwrap_or(DEFAULT_PRICE_DECIMALS)
}

pub(crate) fn resolve_entries(
    entries: &[SnapshotEntry],
    token_decimals: u8,
    price_decimals: &BTreeMap<Address, u8>,
) -> Result<Vec<ResolvedEntry>, EntryError> {
    entries
        .iter()
        .map(|entry| entry.resolve(token_decimals, price_decimals_for(entry, price_decimals)))
        .collect()
}

pub(crate) fn entries_tree(resolved: &[ResolvedEntry]) -> Result<KeccakMerkleTree, MerkleError> {
    KeccakMerkleTree::from_leaves(resolved.iter().map(ResolvedEntry::leaf).collect())
}

fn check_entries(entries: &[SnapshotEntry]) -> Result<(), SnapshotBuildError> {
    if entries.is_empty() {
        return Err(SnapshotBuildError::Empty);
    }
    let mut seen = BTreeSet::new();
    for entry in entries {
        if !seen.insert(entry.address) {
            return Err(SnapshotBuildError::DuplicateAddress(entry.address));
        }
    }
    Ok(())
}

/// Build a snapshot that carries the full entry list.
///
/// # Errors
/// Returns an error for an empty or duplicated allowlist, malformed amounts, or when the
/// decimals of a price currency cannot be looked up.
#[instrument(skip_all, fields(entries = entries.len(), decimals = token_decimals))]
pub async fn build_snapshot<D>(
    entries: Vec<SnapshotEntry>,
    token_decimals: u8,
    decimals: &D,
) -> Result<EntriesSnapshot, SnapshotBuildError>
where
    D: CurrencyDecimals + ?Sized,
{
    check_entries(&entries)?;
    let price_decimals = collect_price_decimals(&entries, decimals).await?;
    let resolved = resolve_entries(&entries, token_decimals, &price_decimals)?;
    let tree = entries_tree(&resolved)?;

    info!(root = %tree.root(), "Built allowlist snapshot");
    Ok(EntriesSnapshot {
        merkle_root: tree.root(),
        token_decimals: Some(token_decimals),
        entries,
    })
}

/// Build a sharded snapshot.
///
/// Entries are grouped by the first `shard_nybbles` hex characters of their address. Each
/// group gets its own tree, and the shard roots are the leaves of the top-level tree whose
/// root is committed on-chain.
///
/// # Errors
/// Same as [`build_snapshot`], plus [`SnapshotBuildError::ShardNybbles`] for an unsupported
/// prefix length.
#[instrument(skip_all, fields(
    entries = entries.len(),
    decimals = token_decimals,
    nybbles = shard_nybbles,
))]
pub async fn build_sharded_snapshot<D>(
    entries: Vec<SnapshotEntry>,
    token_decimals: u8,
    shard_nybbles: u8,
    base_uri: &str,
    original_entries_uri: &str,
    decimals: &D,
) -> Result<ShardedSnapshot, SnapshotBuildError>
where
    D: CurrencyDecimals + ?Sized,
{
    if !(1..=MAX_SHARD_NYBBLES).contains(&shard_nybbles) {
        return Err(SnapshotBuildError::ShardNybbles(shard_nybbles));
    }
    check_entries(&entries)?;
    let price_decimals = collect_price_decimals(&entries, decimals).await?;

    let mut grouped: BTreeMap<String, Vec<SnapshotEntry>> = BTreeMap::new();
    for entry in entries {
        grouped
            .entry(shard_id(entry.address, shard_nybbles))
            .or_default()
            .push(entry);
    }

    let mut shard_trees = Vec::with_capacity(grouped.len());
    for (id, shard_entries) in grouped {
        let resolved = resolve_entries(&shard_entries, token_decimals, &price_decimals)?;
        let tree = entries_tree(&resolved)?;
        shard_trees.push((id, shard_entries, tree.root()));
    }

    let top =
        KeccakMerkleTree::from_leaves(shard_trees.iter().map(|(_, _, root)| *root).collect())?;

    let mut shards = BTreeMap::new();
    for (id, shard_entries, root) in shard_trees {
        let Some(proofs) = top.proof(&root) else {
            return Err(SnapshotBuildError::MissingShard(id));
        };
        shards.insert(
            id,
            ShardData {
                proofs,
                entries: shard_entries,
            },
        );
    }

    info!(root = %top.root(), shards = shards.len(), "Built sharded allowlist snapshot");
    Ok(ShardedSnapshot {
        info: ShardedMerkleInfo {
            merkle_root: top.root(),
            base_uri: base_uri.trim_end_matches('/').to_owned(),
            original_entries_uri: original_entries_uri.to_owned(),
            shard_nybbles,
            token_decimals,
            is_sharded_merkle_tree: true,
        },
        shards,
    })
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing,
        reason = "Test code - relax these lints for clarity"
    )]

    use dropclaim_merkle::verify;
    use test_utils::{ERC20_CURRENCY, addr, plain_entry, priced_entry};

    use super::*;
    use crate::chain::NativeDecimals;
    use crate::testing::FixedDecimals;

    fn allowlist(n: u8) -> Vec<SnapshotEntry> {
        (1..=n).map(|i| plain_entry(addr!(i), "2")).collect()
    }

    #[tokio::test]
    async fn entries_snapshot_commits_to_every_entry() {
        let entries = allowlist(5);
        let snapshot = build_snapshot(entries.clone(), 0, &NativeDecimals)
            .await
            .expect("snapshot should build");

        let resolved = resolve_entries(&entries, 0, &BTreeMap::new()).expect("entries resolve");
        let tree = entries_tree(&resolved).expect("tree should build");
        assert_eq!(snapshot.merkle_root, tree.root());
        assert_eq!(snapshot.token_decimals, Some(0));
        assert_eq!(snapshot.entries, entries);
    }

    #[tokio::test]
    async fn rejects_empty_and_duplicate_allowlists() {
        assert!(matches!(
            build_snapshot(vec![], 0, &NativeDecimals).await,
            Err(SnapshotBuildError::Empty)
        ));

        let duplicated = vec![plain_entry(addr!(1), "1"), plain_entry(addr!(1), "2")];
        assert!(matches!(
            build_snapshot(duplicated, 0, &NativeDecimals).await,
            Err(SnapshotBuildError::DuplicateAddress(address)) if address == addr!(1)
        ));
    }

    #[tokio::test]
    async fn rejects_malformed_amounts() {
        let entries = vec![plain_entry(addr!(1), "lots")];
        assert!(matches!(
            build_snapshot(entries, 0, &NativeDecimals).await,
            Err(SnapshotBuildError::Entry(EntryError::MaxClaimable { .. }))
        ));
    }

    #[tokio::test]
    async fn erc20_prices_need_decimals() {
        let entries = vec![priced_entry(addr!(1), "1", "2.5", ERC20_CURRENCY)];
        assert!(matches!(
            build_snapshot(entries.clone(), 0, &NativeDecimals).await,
            Err(SnapshotBuildError::Decimals(ClaimError::UnknownDecimals(_)))
        ));

        let decimals = FixedDecimals::new([(ERC20_CURRENCY, 6)]);
        let snapshot = build_snapshot(entries.clone(), 0, &decimals)
            .await
            .expect("snapshot should build");
        let resolved = entries[0].resolve(0, 6).expect("entry resolves");
        assert_eq!(resolved.price, Some(alloy::primitives::U256::from(2_500_000_u64)));
        assert_eq!(snapshot.merkle_root, resolved.leaf());
        assert_eq!(decimals.calls(), 1);
    }

    #[tokio::test]
    async fn shard_proofs_chain_to_the_top_root() {
        let entries: Vec<SnapshotEntry> = (0_u8..40)
            .map(|i| {
                let mut bytes = [0_u8; 20];
                bytes[0] = i.wrapping_mul(37);
                bytes[19] = i;
                plain_entry(Address::from(bytes), "1")
            })
            .collect();

        let sharded = build_sharded_snapshot(
            entries.clone(),
            0,
            1,
            "ipfs://QmShards/",
            "ipfs://QmEntries",
            &NativeDecimals,
        )
        .await
        .expect("snapshot should build");

        assert_eq!(sharded.info.base_uri, "ipfs://QmShards");
        assert!(sharded.info.is_sharded_merkle_tree);
        assert!(sharded.shards.len() > 1);
        assert_eq!(
            sharded.shards.values().map(|shard| shard.entries.len()).sum::<usize>(),
            entries.len()
        );

        for (id, shard) in &sharded.shards {
            let resolved = resolve_entries(&shard.entries, 0, &BTreeMap::new())
                .expect("entries resolve");
            let tree = entries_tree(&resolved).expect("tree should build");
            for entry in &resolved {
                assert!(shard_id(entry.address, 1) == *id);
                let mut proof = tree.proof(&entry.leaf()).expect("leaf is in shard");
                proof.extend_from_slice(&shard.proofs);
                assert!(verify(&proof, &sharded.info.merkle_root, &entry.leaf()));
            }
        }
    }

    #[tokio::test]
    async fn shard_nybbles_are_bounded() {
        for nybbles in [0, MAX_SHARD_NYBBLES + 1] {
            assert!(matches!(
                build_sharded_snapshot(allowlist(3), 0, nybbles, "b", "o", &NativeDecimals).await,
                Err(SnapshotBuildError::ShardNybbles(n)) if n == nybbles
            ));
        }
    }
}
