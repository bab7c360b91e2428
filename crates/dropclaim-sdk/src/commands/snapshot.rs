use std::path::PathBuf;

use alloy::primitives::Address;
use dropclaim_core::schema::claim::AllowlistProof;
use dropclaim_core::schema::snapshot::SnapshotEntry;
use eyre::Context as _;
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::{connect, read_json, storage, write_json};
use crate::allowlist::{AllowlistProofFetcher as _, SnapshotProofFetcher};
use crate::chain::{CurrencyDecimals, DropChainReader, NativeDecimals};
use crate::common::CommonConfig;
use crate::snapshot::{build_sharded_snapshot, build_snapshot};

/// How `snapshot build` lays out its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotLayout {
    /// One document holding every entry.
    Entries,
    /// An index document plus one document per shard.
    Sharded {
        /// Hex characters of the address that select the shard.
        shard_nybbles: u8,
        /// URI the shards will be published under.
        base_uri: String,
        /// URI the original entries file will be published at.
        original_entries_uri: String,
        /// Local directory receiving the shard documents.
        shards_dir: PathBuf,
    },
}

/// Result of `snapshot proof`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofOutput {
    /// Snapshot searched.
    pub snapshot_uri: String,
    /// Wallet looked up.
    pub claimer: Address,
    /// Proof and overrides, `null` when the wallet is not listed.
    pub proof: Option<AllowlistProof>,
}

/// Decimals lookups go to the chain when an RPC endpoint is configured.
fn currency_decimals(config: &CommonConfig) -> eyre::Result<Box<dyn CurrencyDecimals>> {
    if config.rpc_url.is_some() {
        Ok(Box::new(DropChainReader::new(connect(config)?)))
    } else {
        Ok(Box::new(NativeDecimals))
    }
}

/// Build an allowlist snapshot from an entries file.
///
/// # Errors
/// Fails if the entries cannot be read or are invalid, or if the output cannot be written.
#[instrument(skip_all, fields(entries = ?entries_in, decimals = token_decimals))]
pub async fn snapshot_build(
    config: CommonConfig,
    entries_in: PathBuf,
    token_decimals: u8,
    layout: SnapshotLayout,
    snapshot_out: PathBuf,
) -> eyre::Result<()> {
    let entries: Vec<SnapshotEntry> = read_json(&entries_in).await?;
    info!(count = entries.len(), "Loaded allowlist entries");
    let decimals = currency_decimals(&config)?;

    match layout {
        SnapshotLayout::Entries => {
            let snapshot = build_snapshot(entries, token_decimals, &decimals).await?;
            write_json(&snapshot_out, &snapshot).await?;
            info!(file = ?snapshot_out, root = %snapshot.merkle_root, "Exported snapshot");
        }
        SnapshotLayout::Sharded {
            shard_nybbles,
            base_uri,
            original_entries_uri,
            shards_dir,
        } => {
            let sharded = build_sharded_snapshot(
                entries,
                token_decimals,
                shard_nybbles,
                &base_uri,
                &original_entries_uri,
                &decimals,
            )
            .await?;

            tokio::fs::create_dir_all(&shards_dir)
                .await
                .with_context(|| format!("Failed to create {}", shards_dir.display()))?;
            for (id, shard) in &sharded.shards {
                write_json(&shards_dir.join(format!("{id}.json")), shard).await?;
            }
            write_json(&snapshot_out, &sharded.info).await?;
            info!(
                file = ?snapshot_out,
                shards = sharded.shards.len(),
                root = %sharded.info.merkle_root,
                "Exported sharded snapshot"
            );
        }
    }

    Ok(())
}

/// Look up one wallet's allowlist proof in a published snapshot.
///
/// # Errors
/// Fails if the snapshot cannot be fetched or is inconsistent, or if the output cannot be
/// written. A wallet that is not listed is not an error.
#[instrument(skip_all, fields(snapshot = %snapshot_uri, %claimer))]
pub async fn snapshot_proof(
    config: CommonConfig,
    snapshot_uri: String,
    claimer: Address,
    token_decimals: u8,
    proof_out: PathBuf,
) -> eyre::Result<()> {
    let fetcher = SnapshotProofFetcher::new(storage(&config)?, currency_decimals(&config)?);
    let proof = fetcher
        .fetch_allowlist_proof(&snapshot_uri, claimer, token_decimals)
        .await?;
    if proof.is_none() {
        warn!("Wallet is not in the snapshot");
    }

    write_json(
        &proof_out,
        &ProofOutput {
            snapshot_uri,
            claimer,
            proof,
        },
    )
    .await?;
    info!(file = ?proof_out, "Exported allowlist proof");

    Ok(())
}

/// Write the JSON Schema of the allowlist entries file.
///
/// # Errors
/// Fails if the schema cannot be written.
pub async fn snapshot_schema(schema_out: PathBuf) -> eyre::Result<()> {
    let schema = schemars::schema_for!(Vec<SnapshotEntry>);
    write_json(&schema_out, &schema).await?;
    info!(file = ?schema_out, "Exported allowlist entries schema");
    Ok(())
}
