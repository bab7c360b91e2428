//! Call data for submitting a resolved claim.

use alloy::primitives::Bytes;
use alloy::sol_types::SolCall as _;
use dropclaim_core::schema::claim::{AllowlistProof, ClaimParams, OnchainAllowlistProof};

use crate::chain::{AllowlistProofData, IDrop, IDrop1155};

impl From<AllowlistProof> for AllowlistProofData {
    fn from(proof: AllowlistProof) -> Self {
        let onchain = OnchainAllowlistProof::from(proof);
        Self {
            proof: onchain.proof,
            quantityLimitPerWallet: onchain.quantity_limit_per_wallet,
            pricePerToken: onchain.price_per_token,
            currency: onchain.currency,
        }
    }
}

/// ABI-encode the drop's `claim` call for `params`, with empty extra data.
///
/// ERC-1155 claims (those with a token id) use the overload that takes `tokenId`.
#[must_use]
pub fn encode_claim_call(params: &ClaimParams) -> Bytes {
    let allowlist_proof = AllowlistProofData::from(params.allowlist_proof.clone());
    let data = match params.token_id {
        Some(token_id) => IDrop1155::claimCall {
            receiver: params.receiver,
            tokenId: token_id,
            quantity: params.quantity,
            currency: params.currency,
            pricePerToken: params.price_per_token,
            allowlistProof: allowlist_proof,
            data: Bytes::new(),
        }
        .abi_encode(),
        None => IDrop::claimCall {
            receiver: params.receiver,
            quantity: params.quantity,
            currency: params.currency,
            pricePerToken: params.price_per_token,
            allowlistProof: allowlist_proof,
            data: Bytes::new(),
        }
        .abi_encode(),
    };
    data.into()
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::indexing_slicing,
        reason = "Test code - relax these lints for clarity"
    )]

    use alloy::primitives::{Address, B256, U256};
    use alloy::sol_types::SolCall;
    use dropclaim_core::base::NATIVE_TOKEN_ADDRESS;
    use dropclaim_core::schema::claim::TransactionOverrides;
    use test_utils::addr;

    use super::*;

    fn params(token_id: Option<U256>) -> ClaimParams {
        ClaimParams {
            receiver: addr!(0xB0),
            quantity: U256::from(2_u8),
            currency: NATIVE_TOKEN_ADDRESS,
            price_per_token: U256::from(10_u8),
            allowlist_proof: AllowlistProof::unset(),
            overrides: TransactionOverrides {
                value: U256::from(20_u8),
                erc20_value: None,
            },
            token_id,
        }
    }

    #[test]
    fn encodes_erc721_claim_with_sentinels() {
        let data = encode_claim_call(&params(None));
        assert_eq!(data[..4], IDrop::claimCall::SELECTOR);

        let call = IDrop::claimCall::abi_decode(&data).expect("call should decode");
        assert_eq!(call.receiver, addr!(0xB0));
        assert_eq!(call.quantity, U256::from(2_u8));
        assert_eq!(call.allowlistProof.pricePerToken, U256::MAX);
        assert_eq!(call.allowlistProof.currency, Address::ZERO);
        assert!(call.data.is_empty());
    }

    #[test]
    fn encodes_erc1155_claim_with_token_id() {
        let mut with_proof = params(Some(U256::from(7_u8)));
        with_proof.allowlist_proof.proof = vec![B256::repeat_byte(3)];
        let data = encode_claim_call(&with_proof);
        assert_eq!(data[..4], IDrop1155::claimCall::SELECTOR);

        let call = IDrop1155::claimCall::abi_decode(&data).expect("call should decode");
        assert_eq!(call.tokenId, U256::from(7_u8));
        assert_eq!(call.allowlistProof.proof, vec![B256::repeat_byte(3)]);
    }
}
