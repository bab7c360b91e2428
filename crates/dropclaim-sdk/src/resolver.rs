//! Claim parameter resolution.
//!
//! Resolution reads the active claim condition, looks up the claimer's allowlist entry when
//! the condition carries a merkle root, and combines both into the arguments and payment of a
//! `claim` transaction. Every collaborator error is returned unchanged and nothing is retried.

use alloy::primitives::U256;
use dropclaim_core::base::{decimal_scale, is_native_token};
use dropclaim_core::schema::claim::{
    AllowlistProof, ClaimCondition, ClaimParams, ClaimRequest, Erc20Value, TransactionOverrides,
};
use tracing::{debug, info, instrument, warn};

use crate::allowlist::AllowlistProofFetcher;
use crate::chain::ClaimConditionReader;
use crate::error::ClaimError;
use crate::metadata::ContractMetadataReader;

/// Resolves claim parameters from chain state, contract metadata and allowlist snapshots.
#[derive(Debug, Clone)]
pub struct ClaimResolver<C, M, A> {
    conditions: C,
    metadata: M,
    allowlist: A,
}

impl<C, M, A> ClaimResolver<C, M, A>
where
    C: ClaimConditionReader,
    M: ContractMetadataReader,
    A: AllowlistProofFetcher,
{
    /// Create a resolver from its collaborators.
    #[must_use]
    pub const fn new(conditions: C, metadata: M, allowlist: A) -> Self {
        Self {
            conditions,
            metadata,
            allowlist,
        }
    }

    /// Resolve the parameters of a claim.
    ///
    /// # Errors
    /// Returns [`ClaimError::NoActiveClaimPhase`] when the drop is closed, any error raised by
    /// a collaborator, or [`ClaimError::PriceOverflow`].
    #[instrument(skip_all, fields(
        contract = %request.contract.address,
        claimer = %request.claimer(),
        quantity = %request.quantity,
    ))]
    pub async fn resolve(&self, request: &ClaimRequest) -> Result<ClaimParams, ClaimError> {
        let condition = if request.contract.single_phase {
            self.conditions
                .single_phase_claim_condition(&request.contract)
                .await?
        } else {
            self.conditions
                .active_claim_condition(&request.contract)
                .await?
        };
        debug!(
            merkle_root = %condition.merkle_root,
            price = %condition.price_per_token,
            currency = %condition.currency,
            "Claim condition"
        );

        let proof = self.allowlist_proof(request, &condition).await?;
        let params = resolve_claim_params(request, &condition, proof)?;
        info!(
            currency = %params.currency,
            price = %params.price_per_token,
            value = %params.overrides.value,
            "Resolved claim parameters"
        );
        Ok(params)
    }

    async fn allowlist_proof(
        &self,
        request: &ClaimRequest,
        condition: &ClaimCondition,
    ) -> Result<AllowlistProof, ClaimError> {
        if !condition.has_allowlist() {
            return Ok(AllowlistProof::unset());
        }

        let metadata = self
            .metadata
            .contract_metadata(request.contract.address)
            .await?;
        let Some(snapshot_uri) = metadata.snapshot_uri(&condition.merkle_root) else {
            warn!(
                merkle_root = %condition.merkle_root,
                "No snapshot published for the active merkle root"
            );
            return Ok(AllowlistProof::unset());
        };

        let proof = self
            .allowlist
            .fetch_allowlist_proof_for_root(
                snapshot_uri,
                request.claimer(),
                request.contract.kind.token_decimals(),
                condition.merkle_root,
            )
            .await?;
        Ok(proof.unwrap_or_default())
    }
}

/// `price * quantity / 10^token_decimals`, truncating.
fn total_price(
    price_per_token: U256,
    quantity: U256,
    token_decimals: u8,
) -> Result<U256, ClaimError> {
    let scale = decimal_scale(token_decimals)?;
    price_per_token
        .checked_mul(quantity)
        .and_then(|total| total.checked_div(scale))
        .ok_or(ClaimError::PriceOverflow {
            price_per_token,
            quantity,
        })
}

/// Combine a claim condition with the claimer's allowlist proof.
///
/// Allowlist overrides take precedence over the condition's price and currency. Native
/// payments go into `value`; ERC-20 payments are reported for approval.
///
/// # Errors
/// Returns [`ClaimError::PriceOverflow`] when the total does not fit into 256 bits.
pub fn resolve_claim_params(
    request: &ClaimRequest,
    condition: &ClaimCondition,
    allowlist_proof: AllowlistProof,
) -> Result<ClaimParams, ClaimError> {
    let currency = allowlist_proof.currency.unwrap_or(condition.currency);
    let price_per_token = allowlist_proof
        .price_per_token
        .unwrap_or(condition.price_per_token);
    let kind = request.contract.kind;
    let total = total_price(price_per_token, request.quantity, kind.token_decimals())?;

    let overrides = if is_native_token(currency) {
        TransactionOverrides {
            value: total,
            erc20_value: None,
        }
    } else if price_per_token > U256::ZERO {
        TransactionOverrides {
            value: U256::ZERO,
            erc20_value: Some(Erc20Value {
                amount_wei: total,
                token_address: currency,
            }),
        }
    } else {
        TransactionOverrides::default()
    };

    Ok(ClaimParams {
        receiver: request.receiver,
        quantity: request.quantity,
        currency,
        price_per_token,
        allowlist_proof,
        overrides,
        token_id: kind.token_id(),
    })
}
