//! Claim conditions, allowlist proofs and the resolved claim parameters.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::schema::token::DropContract;

/// One sale phase of a drop contract, as read from chain state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimCondition {
    /// Unix timestamp at which the phase opens.
    pub start_timestamp: U256,
    /// Maximum number of units claimable in this phase.
    pub max_claimable_supply: U256,
    /// Units already claimed in this phase.
    pub supply_claimed: U256,
    /// Default per-wallet limit.
    pub quantity_limit_per_wallet: U256,
    /// Allowlist snapshot commitment, zero when no allowlist is enforced.
    pub merkle_root: B256,
    /// Price per unit in the currency's smallest denomination.
    pub price_per_token: U256,
    /// Payment currency (ERC-20 address or the native-token sentinel).
    pub currency: Address,
    /// Free-form phase metadata URI.
    pub metadata: String,
}

impl ClaimCondition {
    /// Returns `true` if this phase references an allowlist snapshot.
    #[must_use]
    pub fn has_allowlist(&self) -> bool {
        self.merkle_root != B256::ZERO
    }
}

/// A claimer-specific allowlist proof with optional price and currency overrides.
///
/// `None` means "not overridden". The on-chain encoding uses sentinels instead
/// (`U256::MAX` for price, the zero address for currency); see [`OnchainAllowlistProof`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "OnchainAllowlistProof", from = "OnchainAllowlistProof")]
pub struct AllowlistProof {
    /// Merkle proof of the claimer's entry, empty when there is none.
    pub proof: Vec<B256>,
    /// Per-wallet limit override, zero meaning the contract default.
    pub quantity_limit_per_wallet: U256,
    /// Price override.
    pub price_per_token: Option<U256>,
    /// Currency override.
    pub currency: Option<Address>,
}

impl AllowlistProof {
    /// The proof submitted when the claimer has no allowlist entry.
    #[must_use]
    pub fn unset() -> Self {
        Self::default()
    }

    /// Returns `true` if this proof carries no proof and no overrides.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        *self == Self::unset()
    }
}

/// Sentinel-encoded allowlist proof, matching the contract's `AllowlistProof` struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnchainAllowlistProof {
    /// Merkle proof.
    pub proof: Vec<B256>,
    /// Per-wallet limit, zero for the contract default.
    pub quantity_limit_per_wallet: U256,
    /// Price, `U256::MAX` when unset.
    pub price_per_token: U256,
    /// Currency, zero address when unset.
    pub currency: Address,
}

impl From<AllowlistProof> for OnchainAllowlistProof {
    fn from(proof: AllowlistProof) -> Self {
        Self {
            proof: proof.proof,
            quantity_limit_per_wallet: proof.quantity_limit_per_wallet,
            price_per_token: proof.price_per_token.unwrap_or(U256::MAX),
            currency: proof.currency.unwrap_or(Address::ZERO),
        }
    }
}

impl From<OnchainAllowlistProof> for AllowlistProof {
    fn from(proof: OnchainAllowlistProof) -> Self {
        Self {
            proof: proof.proof,
            quantity_limit_per_wallet: proof.quantity_limit_per_wallet,
            price_per_token: (proof.price_per_token != U256::MAX).then_some(proof.price_per_token),
            currency: (proof.currency != Address::ZERO).then_some(proof.currency),
        }
    }
}

/// Input of a claim-parameter resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    /// The drop being claimed from.
    pub contract: DropContract,
    /// Destination of the claimed tokens.
    pub receiver: Address,
    /// Transaction sender, if different from the receiver.
    pub from: Option<Address>,
    /// Amount to claim, in token units (already scaled by decimals for ERC-20).
    pub quantity: U256,
}

impl ClaimRequest {
    /// The address whose allowlist eligibility is checked: the sender if known, else the
    /// receiver.
    #[must_use]
    pub fn claimer(&self) -> Address {
        self.from.unwrap_or(self.receiver)
    }
}

/// ERC-20 payment that must be approved before submitting the claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20Value {
    /// Total amount in the token's smallest denomination.
    pub amount_wei: U256,
    /// ERC-20 contract address.
    pub token_address: Address,
}

/// Payment attached to the claim transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOverrides {
    /// Native-coin value sent with the transaction.
    pub value: U256,
    /// ERC-20 payment, absent for native or free claims.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erc20_value: Option<Erc20Value>,
}

/// Fully resolved, contract-ready arguments of a claim transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimParams {
    /// Destination of the claimed tokens.
    pub receiver: Address,
    /// Amount to claim.
    pub quantity: U256,
    /// Resolved payment currency.
    pub currency: Address,
    /// Resolved price per unit.
    pub price_per_token: U256,
    /// Proof submitted on-chain (possibly unset).
    pub allowlist_proof: AllowlistProof,
    /// Payment attached to the transaction.
    pub overrides: TransactionOverrides,
    /// Token id for ERC-1155 claims.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<U256>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_translate_at_the_boundary() {
        let onchain: OnchainAllowlistProof = AllowlistProof::unset().into();
        assert_eq!(onchain.price_per_token, U256::MAX);
        assert_eq!(onchain.currency, Address::ZERO);
        assert!(onchain.proof.is_empty());

        let back: AllowlistProof = onchain.into();
        assert!(back.is_unset());
    }

    #[test]
    fn overrides_survive_the_boundary() {
        let currency = Address::repeat_byte(0xCC);
        let proof = AllowlistProof {
            proof: vec![B256::repeat_byte(1)],
            quantity_limit_per_wallet: U256::from(5_u8),
            price_per_token: Some(U256::ZERO),
            currency: Some(currency),
        };
        let onchain = OnchainAllowlistProof::from(proof.clone());
        assert_eq!(onchain.price_per_token, U256::ZERO);
        assert_eq!(AllowlistProof::from(onchain), proof);
    }

    #[test]
    fn serializes_proof_in_onchain_form() -> Result<(), serde_json::Error> {
        let json = serde_json::to_value(AllowlistProof::unset())?;
        assert_eq!(json["currency"], "0x0000000000000000000000000000000000000000");
        assert_eq!(
            json["pricePerToken"],
            "0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        );

        let parsed: AllowlistProof = serde_json::from_value(json)?;
        assert!(parsed.is_unset());
        Ok(())
    }

    #[test]
    fn claimer_prefers_sender() {
        let contract = DropContract {
            address: Address::repeat_byte(1),
            kind: crate::schema::token::TokenKind::Erc721,
            single_phase: false,
        };
        let mut request = ClaimRequest {
            contract,
            receiver: Address::repeat_byte(2),
            from: None,
            quantity: U256::from(1_u8),
        };
        assert_eq!(request.claimer(), Address::repeat_byte(2));
        request.from = Some(Address::repeat_byte(3));
        assert_eq!(request.claimer(), Address::repeat_byte(3));
    }
}
