//! Drop contract handles and token-type dispatch.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// The token standard a drop contract mints, with the data each standard needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum TokenKind {
    /// Non-fungible drop; quantities are token counts.
    Erc721,
    /// Fungible drop; quantities are scaled by `token_decimals`.
    Erc20 {
        /// Decimals of the dropped token.
        token_decimals: u8,
    },
    /// Multi-token drop; every claim targets one token id.
    Erc1155 {
        /// Token id being claimed.
        token_id: U256,
    },
}

impl TokenKind {
    /// Decimals used to normalise `price * quantity`. Zero for non-fungible kinds.
    #[must_use]
    pub const fn token_decimals(&self) -> u8 {
        match self {
            Self::Erc20 { token_decimals } => *token_decimals,
            Self::Erc721 | Self::Erc1155 { .. } => 0,
        }
    }

    /// Token id for ERC-1155 claims.
    #[must_use]
    pub const fn token_id(&self) -> Option<U256> {
        match self {
            Self::Erc1155 { token_id } => Some(*token_id),
            Self::Erc721 | Self::Erc20 { .. } => None,
        }
    }
}

/// A drop contract together with the information needed to read its claim conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropContract {
    /// Contract address.
    pub address: Address,
    /// Token standard.
    pub kind: TokenKind,
    /// `true` for drops exposing exactly one claim condition (no phase schedule).
    pub single_phase: bool,
}
