//! Workflows behind the CLI subcommands.
//!
//! Each command reads its inputs, runs the library logic and writes its result as pretty JSON.

use std::path::Path;

use alloy::providers::{DynProvider, Provider as _, ProviderBuilder};
use eyre::{Context as _, ContextCompat as _};
use serde::Serialize;

use crate::common::CommonConfig;
use crate::storage::GatewayStorage;

mod claim_params;
mod snapshot;

pub use claim_params::{ClaimInput, ClaimOutput, claim_params};
pub use snapshot::{SnapshotLayout, snapshot_build, snapshot_proof, snapshot_schema};

fn connect(config: &CommonConfig) -> eyre::Result<DynProvider> {
    let rpc_url = config
        .rpc_url
        .as_deref()
        .context("An RPC endpoint is required (--rpc-url or RPC_URL)")?;
    let url = rpc_url
        .parse()
        .with_context(|| format!("Invalid RPC URL: {rpc_url}"))?;
    Ok(ProviderBuilder::new().connect_http(url).erased())
}

fn storage(config: &CommonConfig) -> eyre::Result<GatewayStorage> {
    GatewayStorage::new(&config.ipfs_gateway, config.request_timeout)
        .context("Failed to set up document storage")
}

async fn write_json<T: Serialize + Sync>(destination: &Path, value: &T) -> eyre::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(destination, json)
        .await
        .with_context(|| format!("Failed to write {}", destination.display()))
}

async fn read_json<T: serde::de::DeserializeOwned>(source: &Path) -> eyre::Result<T> {
    let raw = tokio::fs::read_to_string(source)
        .await
        .with_context(|| format!("Failed to read {}", source.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", source.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_requires_rpc_url() {
        assert!(connect(&CommonConfig::default()).is_err());

        let config = CommonConfig {
            rpc_url: Some("not a url".to_owned()),
            ..CommonConfig::default()
        };
        assert!(connect(&config).is_err());
    }

    #[tokio::test]
    async fn json_files_round_trip() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("value.json");
        write_json(&path, &vec![1_u8, 2, 3])
            .await
            .expect("Failed to write json");
        let value: Vec<u8> = read_json(&path).await.expect("Failed to read json");
        assert_eq!(value, vec![1, 2, 3]);

        assert!(read_json::<Vec<u8>>(&dir.path().join("missing.json")).await.is_err());
    }
}
