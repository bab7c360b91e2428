//! Snapshot subcommands.

use std::path::PathBuf;

use alloy_primitives::Address;
use dropclaim_sdk::commands::SnapshotLayout;

use super::{CommonArgs, parse_address};

/// Arguments for `snapshot build`.
#[derive(Debug, clap::Args)]
pub struct SnapshotBuildArgs {
    /// Connection settings. An RPC endpoint is only needed for ERC-20 price overrides.
    #[command(flatten)]
    pub common: CommonArgs,
    /// Allowlist entries file (see `snapshot schema`).
    #[arg(long, env = "ENTRIES_FILE", default_value = "allowlist.json")]
    pub entries: PathBuf,
    /// Decimals of the dropped token; scales `maxClaimable`. Zero for NFTs.
    #[arg(long, env = "TOKEN_DECIMALS", default_value_t = 0_u8)]
    pub token_decimals: u8,
    /// Split the snapshot into shards keyed by this many leading hex characters.
    #[arg(long, env = "SHARD_NYBBLES", requires = "base_uri")]
    pub shard_nybbles: Option<u8>,
    /// URI the shard files will be published under.
    #[arg(long, env = "SHARD_BASE_URI")]
    pub base_uri: Option<String>,
    /// URI the entries file will be published at.
    #[arg(long, env = "ORIGINAL_ENTRIES_URI", default_value = "")]
    pub original_entries_uri: String,
    /// Directory receiving the shard files.
    #[arg(long, env = "SHARDS_DIR", default_value = "shards")]
    pub shards_dir: PathBuf,
    /// Output file for the snapshot (or the shard index).
    #[arg(long, env = "SNAPSHOT_OUT", default_value = "snapshot.json")]
    pub snapshot_out: PathBuf,
}

impl SnapshotBuildArgs {
    /// Output layout selected by the sharding flags.
    #[must_use]
    pub fn layout(&self) -> SnapshotLayout {
        match (self.shard_nybbles, &self.base_uri) {
            (Some(shard_nybbles), Some(base_uri)) => SnapshotLayout::Sharded {
                shard_nybbles,
                base_uri: base_uri.clone(),
                original_entries_uri: self.original_entries_uri.clone(),
                shards_dir: self.shards_dir.clone(),
            },
            _ => SnapshotLayout::Entries,
        }
    }
}

/// Arguments for `snapshot proof`.
#[derive(Debug, clap::Args)]
pub struct SnapshotProofArgs {
    /// Connection settings.
    #[command(flatten)]
    pub common: CommonArgs,
    /// Snapshot URI (`ipfs://`, `https://`, `file://` or a local path).
    #[arg(long, env = "SNAPSHOT_URI", default_value = "snapshot.json")]
    pub snapshot: String,
    /// Wallet to look up.
    #[arg(long, env = "CLAIMER", value_parser = parse_address)]
    pub claimer: Address,
    /// Decimals of the dropped token, unless the snapshot pins its own.
    #[arg(long, env = "TOKEN_DECIMALS", default_value_t = 0_u8)]
    pub token_decimals: u8,
    /// Output file for the proof.
    #[arg(long, env = "PROOF_OUT", default_value = "allowlist-proof.json")]
    pub proof_out: PathBuf,
}

/// Arguments for `snapshot schema`.
#[derive(Debug, clap::Args)]
pub struct SnapshotSchemaArgs {
    /// Output file for the schema.
    #[arg(long, env = "SCHEMA_OUT", default_value = "allowlist-schema.json")]
    pub schema_out: PathBuf,
}
