//! Allowlist leaf hashing.
//!
//! `leaf = keccak256(abi.encodePacked(address, maxClaimable, price, currency))`, where an unset
//! price is `U256::MAX` and an unset currency is the zero address. This matches what the drop
//! contracts recompute when verifying an allowlist proof.

use alloy_primitives::{Address, B256, U256, keccak256};
use alloy_sol_types::SolValue as _;
use thiserror::Error;

use crate::base::{NATIVE_TOKEN_DECIMALS, UnitsError, is_native_token, parse_amount};
use crate::schema::claim::AllowlistProof;
use crate::schema::snapshot::SnapshotEntry;

/// Errors produced while resolving a snapshot entry.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EntryError {
    /// `maxClaimable` could not be parsed.
    #[error("Invalid maxClaimable for {address}: {source}")]
    MaxClaimable {
        /// Entry address.
        address: Address,
        /// Parse failure.
        source: UnitsError,
    },

    /// `price` could not be parsed.
    #[error("Invalid price for {address}: {source}")]
    Price {
        /// Entry address.
        address: Address,
        /// Parse failure.
        source: UnitsError,
    },
}

/// A snapshot entry with its amounts scaled to integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// Allowlisted wallet.
    pub address: Address,
    /// Per-wallet limit (`U256::MAX` for unlimited).
    pub max_claimable: U256,
    /// Price override.
    pub price: Option<U256>,
    /// Currency override.
    pub currency: Option<Address>,
}

impl ResolvedEntry {
    /// Hash committed to by the allowlist tree.
    #[must_use]
    pub fn leaf(&self) -> B256 {
        keccak256(
            (
                self.address,
                self.max_claimable,
                self.price.unwrap_or(U256::MAX),
                self.currency.unwrap_or(Address::ZERO),
            )
                .abi_encode_packed(),
        )
    }

    /// Attach a merkle proof, producing the overrides submitted on-chain.
    #[must_use]
    pub const fn into_proof(self, proof: Vec<B256>) -> AllowlistProof {
        AllowlistProof {
            proof,
            quantity_limit_per_wallet: self.max_claimable,
            price_per_token: self.price,
            currency: self.currency,
        }
    }
}

impl SnapshotEntry {
    /// Currency whose decimals scale this entry's price: the override, or the native coin.
    #[must_use]
    pub fn price_currency(&self) -> Option<Address> {
        self.currency_address
            .filter(|currency| *currency != Address::ZERO && !is_native_token(*currency))
    }

    /// Scale the entry's amounts.
    ///
    /// `currency_decimals` is only consulted when a price is present; callers pass
    /// [`NATIVE_TOKEN_DECIMALS`] when [`Self::price_currency`] is `None`.
    ///
    /// # Errors
    /// Returns an error if an amount cannot be parsed.
    pub fn resolve(
        &self,
        token_decimals: u8,
        currency_decimals: u8,
    ) -> Result<ResolvedEntry, EntryError> {
        let max_claimable =
            parse_amount(&self.max_claimable, token_decimals).map_err(|source| {
                EntryError::MaxClaimable {
                    address: self.address,
                    source,
                }
            })?;

        let price = self
            .price
            .as_deref()
            .map(|price| parse_amount(price, currency_decimals))
            .transpose()
            .map_err(|source| EntryError::Price {
                address: self.address,
                source,
            })?
            .filter(|price| *price != U256::MAX);

        Ok(ResolvedEntry {
            address: self.address,
            max_claimable,
            price,
            currency: self.currency_address.filter(|c| *c != Address::ZERO),
        })
    }
}

/// Decimals to use for an entry's price when its currency is not an ERC-20 override.
pub const DEFAULT_PRICE_DECIMALS: u8 = NATIVE_TOKEN_DECIMALS;
