//! Error types shared by the collaborators and the resolver.

use std::path::PathBuf;

use alloy::primitives::{Address, U256};
use dropclaim_core::base::UnitsError;
use dropclaim_core::leaf::EntryError;
use thiserror::Error;

/// Failures while fetching off-chain documents.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The URI scheme is not supported.
    #[error("Unsupported URI '{0}'")]
    UnsupportedUri(String),

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request did not complete.
    #[error("Request to {url} failed: {source}")]
    Http {
        /// Resolved URL.
        url: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Resolved URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The document does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Local file read failed.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON for the expected type.
    #[error("Failed to parse {uri}: {source}")]
    Json {
        /// Document URI.
        uri: String,
        /// Parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors surfaced by claim-parameter resolution. None of them are retried.
#[derive(Error, Debug)]
pub enum ClaimError {
    /// The drop has no claim phase open right now.
    #[error("No active claim phase on {contract}")]
    NoActiveClaimPhase {
        /// Drop contract.
        contract: Address,
    },

    /// A contract read failed.
    #[error("Failed to call {call} on {contract}: {source}")]
    ChainRead {
        /// Contract called.
        contract: Address,
        /// Function name.
        call: &'static str,
        /// Underlying error.
        #[source]
        source: alloy::contract::Error,
    },

    /// Decimals for an ERC-20 currency are needed but cannot be read.
    #[error("Decimals of currency {0} are unknown without a chain connection")]
    UnknownDecimals(Address),

    /// Contract metadata could not be fetched or parsed.
    #[error("Failed to load contract metadata for {contract}: {source}")]
    Metadata {
        /// Drop contract.
        contract: Address,
        /// Storage failure.
        #[source]
        source: StorageError,
    },

    /// An allowlist snapshot could not be fetched or parsed.
    #[error("Failed to load allowlist snapshot {uri}: {source}")]
    Snapshot {
        /// Snapshot URI.
        uri: String,
        /// Storage failure.
        #[source]
        source: StorageError,
    },

    /// The snapshot content is inconsistent with its own commitment.
    #[error("Invalid allowlist snapshot {uri}: {reason}")]
    InvalidSnapshot {
        /// Snapshot URI.
        uri: String,
        /// What is wrong.
        reason: String,
    },

    /// A snapshot entry has malformed amounts.
    #[error(transparent)]
    Entry(#[from] EntryError),

    /// Amount scaling failed.
    #[error(transparent)]
    Units(#[from] UnitsError),

    /// `price * quantity` does not fit into 256 bits.
    #[error("Total price overflows: {price_per_token} * {quantity}")]
    PriceOverflow {
        /// Resolved price.
        price_per_token: U256,
        /// Requested quantity.
        quantity: U256,
    },
}
