//! Contract-level metadata published at the contract URI.

use std::collections::BTreeMap;

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Contract metadata. Only the fields used here are typed; the rest is kept verbatim.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContractMetadata {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Image URI.
    #[serde(default)]
    pub image: Option<String>,
    /// Merkle root (hex) to allowlist snapshot URI.
    #[serde(default)]
    pub merkle: Option<BTreeMap<String, String>>,
    /// Remaining fields.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl ContractMetadata {
    /// Snapshot URI published for `root`, matching keys by value rather than by string.
    #[must_use]
    pub fn snapshot_uri(&self, root: &B256) -> Option<&str> {
        self.merkle
            .as_ref()?
            .iter()
            .find(|(key, _)| key.parse::<B256>().is_ok_and(|key| key == *root))
            .map(|(_, uri)| uri.as_str())
    }
}
