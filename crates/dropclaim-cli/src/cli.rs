//! Command-line interface for the `dropclaim` CLI application.

use std::time::Duration;

use alloy_primitives::{Address, U256};
use clap::Parser;
use dropclaim_sdk::common::{
    CommonConfig, DEFAULT_IPFS_GATEWAY, DEFAULT_REQUEST_TIMEOUT, TokenStandard,
};
use eyre::{Result, ensure, eyre};

mod claim;
mod snapshot;

pub use claim::ClaimParamsArgs;
pub use snapshot::{SnapshotBuildArgs, SnapshotProofArgs, SnapshotSchemaArgs};

/// Command-line interface definition.
#[derive(Debug, Parser)]
#[command(name = "dropclaim")]
#[command(about = "Claim parameter and allowlist tools for token drops")]
pub struct Cli {
    /// CLI top-level command group.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level command groups.
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Claimer tools.
    Claim {
        /// Claim subcommands.
        #[command(subcommand)]
        command: ClaimCommands,
    },
    /// Allowlist snapshot tools (organizer focused).
    Snapshot {
        /// Snapshot subcommands.
        #[command(subcommand)]
        command: SnapshotCommands,
    },
}

/// Claim command group.
#[derive(Debug, clap::Subcommand)]
pub enum ClaimCommands {
    /// Resolve the parameters of a claim against the drop's active phase.
    Params(ClaimParamsArgs),
}

/// Snapshot command group.
#[derive(Debug, clap::Subcommand)]
pub enum SnapshotCommands {
    /// Build a snapshot document from an allowlist entries file.
    Build(SnapshotBuildArgs),
    /// Look up one wallet's proof in a published snapshot.
    Proof(SnapshotProofArgs),
    /// Write the JSON Schema of the allowlist entries file.
    Schema(SnapshotSchemaArgs),
}

/// Connection arguments shared by every command that reads chain or storage.
#[derive(Debug, Clone, clap::Args)]
pub struct CommonArgs {
    /// JSON-RPC endpoint of the chain the drop lives on.
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,
    /// Gateway used to resolve `ipfs://` URIs.
    #[arg(long, env = "IPFS_GATEWAY", default_value = DEFAULT_IPFS_GATEWAY)]
    pub ipfs_gateway: String,
    /// Timeout for document requests, in seconds.
    #[arg(
        long,
        env = "REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs(),
        value_parser = parse_timeout
    )]
    pub request_timeout: u64,
}

impl From<CommonArgs> for CommonConfig {
    fn from(args: CommonArgs) -> Self {
        Self {
            rpc_url: args.rpc_url,
            ipfs_gateway: args.ipfs_gateway,
            request_timeout: Duration::from_secs(args.request_timeout),
        }
    }
}

fn parse_address(s: &str) -> Result<Address> {
    s.parse().map_err(|e| eyre!("Invalid address '{s}': {e}"))
}

fn parse_u256(s: &str) -> Result<U256> {
    s.parse().map_err(|e| eyre!("Invalid integer '{s}': {e}"))
}

fn parse_token_standard(s: &str) -> Result<TokenStandard> {
    match s.to_ascii_lowercase().as_str() {
        "erc721" => Ok(TokenStandard::Erc721),
        "erc20" => Ok(TokenStandard::Erc20),
        "erc1155" => Ok(TokenStandard::Erc1155),
        other => Err(eyre!(
            "Invalid token standard: {other}. Expected 'erc721', 'erc20' or 'erc1155'."
        )),
    }
}

fn parse_timeout(s: &str) -> Result<u64> {
    let secs: u64 = s.parse().map_err(|e| eyre!("Invalid timeout '{s}': {e}"))?;
    ensure!(secs > 0, "Request timeout must be at least one second");
    Ok(secs)
}
