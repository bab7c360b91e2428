//! Allowlist proof lookup in published snapshots.

use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use dropclaim_core::leaf::ResolvedEntry;
use dropclaim_core::schema::claim::AllowlistProof;
use dropclaim_core::schema::snapshot::{
    EntriesSnapshot, ShardData, ShardedMerkleInfo, SnapshotDocument, SnapshotEntry,
};
use dropclaim_merkle::{KeccakMerkleTree, verify};
use tracing::{debug, instrument, warn};

use crate::chain::CurrencyDecimals;
use crate::error::{ClaimError, StorageError};
use crate::snapshot::{collect_price_decimals, entries_tree, price_decimals_for, resolve_entries};
use crate::storage::{Storage, fetch_json};

/// Finds a claimer's allowlist proof in the snapshot published for a merkle root.
#[async_trait]
pub trait AllowlistProofFetcher: Send + Sync {
    /// Proof and overrides for `claimer`, or `None` when the claimer is not listed.
    ///
    /// `token_decimals` scales `maxClaimable` unless the snapshot pins its own decimals.
    async fn fetch_allowlist_proof(
        &self,
        snapshot_uri: &str,
        claimer: Address,
        token_decimals: u8,
    ) -> Result<Option<AllowlistProof>, ClaimError>;

    /// [`Self::fetch_allowlist_proof`] for the snapshot the metadata maps `merkle_root` to.
    async fn fetch_allowlist_proof_for_root(
        &self,
        snapshot_uri: &str,
        claimer: Address,
        token_decimals: u8,
        _merkle_root: B256,
    ) -> Result<Option<AllowlistProof>, ClaimError> {
        self.fetch_allowlist_proof(snapshot_uri, claimer, token_decimals)
            .await
    }
}

/// Reads snapshots from storage and rebuilds the tree needed for the claimer's proof.
#[derive(Debug, Clone)]
pub struct SnapshotProofFetcher<S, D> {
    storage: S,
    decimals: D,
}

impl<S, D> SnapshotProofFetcher<S, D> {
    /// `decimals` scales ERC-20 price overrides.
    #[must_use]
    pub const fn new(storage: S, decimals: D) -> Self {
        Self { storage, decimals }
    }
}

fn invalid(uri: &str, reason: String) -> ClaimError {
    ClaimError::InvalidSnapshot {
        uri: uri.to_owned(),
        reason,
    }
}

/// Whether the document commits to the root it was published under.
fn root_matches(uri: &str, expected: Option<B256>, published: B256) -> bool {
    match expected {
        Some(expected) if expected != published => {
            warn!(
                %uri,
                %expected,
                %published,
                "Snapshot commits to a different root; its proofs will not verify on-chain"
            );
            false
        }
        Some(_) | None => true,
    }
}

fn find_entry(entries: &[SnapshotEntry], claimer: Address) -> Option<&SnapshotEntry> {
    entries.iter().find(|entry| entry.address == claimer)
}

/// Prove `entry` in `tree`, append `suffix`, and check the result against `root`.
fn prove(
    uri: &str,
    tree: &KeccakMerkleTree,
    entry: ResolvedEntry,
    suffix: &[B256],
    root: B256,
) -> Result<AllowlistProof, ClaimError> {
    let leaf = entry.leaf();
    let Some(mut proof) = tree.proof(&leaf) else {
        return Err(invalid(uri, format!("no leaf for {}", entry.address)));
    };
    proof.extend_from_slice(suffix);

    if !verify(&proof, &root, &leaf) {
        return Err(invalid(
            uri,
            format!("proof for {} does not verify against {root}", entry.address),
        ));
    }
    Ok(entry.into_proof(proof))
}

impl<S, D> SnapshotProofFetcher<S, D>
where
    S: Storage,
    D: CurrencyDecimals,
{
    /// Resolve every entry in `entries` and build their tree.
    async fn resolve_tree(
        &self,
        uri: &str,
        entries: &[SnapshotEntry],
        claimer: &SnapshotEntry,
        token_decimals: u8,
    ) -> Result<(KeccakMerkleTree, ResolvedEntry), ClaimError> {
        let price_decimals = collect_price_decimals(entries, &self.decimals).await?;
        let resolved = resolve_entries(entries, token_decimals, &price_decimals)?;
        let tree = entries_tree(&resolved).map_err(|e| invalid(uri, e.to_string()))?;
        let claimer =
            claimer.resolve(token_decimals, price_decimals_for(claimer, &price_decimals))?;
        Ok((tree, claimer))
    }

    async fn prove_in_entries(
        &self,
        uri: &str,
        snapshot: &EntriesSnapshot,
        claimer: Address,
        token_decimals: u8,
    ) -> Result<Option<AllowlistProof>, ClaimError> {
        let Some(entry) = find_entry(&snapshot.entries, claimer) else {
            return Ok(None);
        };
        let token_decimals = snapshot.token_decimals.unwrap_or(token_decimals);
        let (tree, resolved) = self
            .resolve_tree(uri, &snapshot.entries, entry, token_decimals)
            .await?;

        if tree.root() != snapshot.merkle_root {
            return Err(invalid(
                uri,
                format!(
                    "entries hash to {} but the document commits to {}",
                    tree.root(),
                    snapshot.merkle_root
                ),
            ));
        }
        prove(uri, &tree, resolved, &[], snapshot.merkle_root).map(Some)
    }

    async fn prove_in_shard(
        &self,
        info: &ShardedMerkleInfo,
        claimer: Address,
    ) -> Result<Option<AllowlistProof>, ClaimError> {
        let shard_uri = info.shard_uri(claimer);
        let shard: ShardData = match fetch_json(&self.storage, &shard_uri).await {
            Ok(shard) => shard,
            Err(StorageError::NotFound(_)) => {
                debug!(%shard_uri, "No shard for claimer");
                return Ok(None);
            }
            Err(source) => {
                return Err(ClaimError::Snapshot {
                    uri: shard_uri,
                    source,
                });
            }
        };

        let Some(entry) = find_entry(&shard.entries, claimer) else {
            return Ok(None);
        };
        let (tree, resolved) = self
            .resolve_tree(&shard_uri, &shard.entries, entry, info.token_decimals)
            .await?;
        prove(&shard_uri, &tree, resolved, &shard.proofs, info.merkle_root).map(Some)
    }
}

impl<S, D> SnapshotProofFetcher<S, D>
where
    S: Storage,
    D: CurrencyDecimals,
{
    async fn lookup(
        &self,
        snapshot_uri: &str,
        claimer: Address,
        token_decimals: u8,
        expected_root: Option<B256>,
    ) -> Result<Option<AllowlistProof>, ClaimError> {
        let document: SnapshotDocument = fetch_json(&self.storage, snapshot_uri)
            .await
            .map_err(|source| ClaimError::Snapshot {
                uri: snapshot_uri.to_owned(),
                source,
            })?;
        root_matches(snapshot_uri, expected_root, document.merkle_root());

        let proof = match &document {
            SnapshotDocument::Entries(snapshot) => {
                self.prove_in_entries(snapshot_uri, snapshot, claimer, token_decimals)
                    .await?
            }
            SnapshotDocument::Sharded(info) => self.prove_in_shard(info, claimer).await?,
        };

        match &proof {
            Some(found) => debug!(depth = found.proof.len(), "Claimer is allowlisted"),
            None => debug!("Claimer is not in the snapshot"),
        }
        Ok(proof)
    }
}

#[async_trait]
impl<S, D> AllowlistProofFetcher for SnapshotProofFetcher<S, D>
where
    S: Storage,
    D: CurrencyDecimals,
{
    #[instrument(skip(self))]
    async fn fetch_allowlist_proof(
        &self,
        snapshot_uri: &str,
        claimer: Address,
        token_decimals: u8,
    ) -> Result<Option<AllowlistProof>, ClaimError> {
        self.lookup(snapshot_uri, claimer, token_decimals, None).await
    }

    #[instrument(skip(self))]
    async fn fetch_allowlist_proof_for_root(
        &self,
        snapshot_uri: &str,
        claimer: Address,
        token_decimals: u8,
        merkle_root: B256,
    ) -> Result<Option<AllowlistProof>, ClaimError> {
        self.lookup(snapshot_uri, claimer, token_decimals, Some(merkle_root))
            .await
    }
}
