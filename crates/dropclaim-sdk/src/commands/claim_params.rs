use std::path::PathBuf;

use alloy::primitives::{Address, Bytes, U256};
use dropclaim_core::base::parse_amount;
use dropclaim_core::schema::claim::{ClaimParams, ClaimRequest};
use dropclaim_core::schema::token::{DropContract, TokenKind};
use eyre::{ContextCompat as _, ensure};
use serde::Serialize;
use tracing::{info, instrument};

use super::{connect, storage, write_json};
use crate::allowlist::SnapshotProofFetcher;
use crate::chain::DropChainReader;
use crate::common::{CommonConfig, TokenStandard};
use crate::metadata::StorageMetadataReader;
use crate::resolver::ClaimResolver;
use crate::transaction::encode_claim_call;

/// What to claim, as entered by the user.
#[derive(Debug, Clone)]
pub struct ClaimInput {
    /// Drop contract.
    pub contract: Address,
    /// Token standard of the drop.
    pub standard: TokenStandard,
    /// Token id, required for ERC-1155 drops.
    pub token_id: Option<U256>,
    /// Whether the drop has a single claim condition.
    pub single_phase: bool,
    /// Recipient of the claimed tokens.
    pub receiver: Address,
    /// Transaction sender, when different from the receiver.
    pub from: Option<Address>,
    /// Amount to claim in token units, e.g. `1.5` for an ERC-20 drop.
    pub quantity: String,
}

/// Written by `claim params`: everything needed to submit the claim transaction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimOutput {
    /// Transaction target.
    pub to: Address,
    /// Resolved parameters.
    pub params: ClaimParams,
    /// Encoded `claim` call.
    pub call_data: Bytes,
}

/// Map the user-facing standard onto a token kind.
fn token_kind(
    standard: TokenStandard,
    token_id: Option<U256>,
    token_decimals: Option<u8>,
) -> eyre::Result<TokenKind> {
    match standard {
        TokenStandard::Erc721 => Ok(TokenKind::Erc721),
        TokenStandard::Erc20 => Ok(TokenKind::Erc20 {
            token_decimals: token_decimals.context("ERC-20 drops need the token decimals")?,
        }),
        TokenStandard::Erc1155 => Ok(TokenKind::Erc1155 {
            token_id: token_id.context("ERC-1155 drops need --token-id")?,
        }),
    }
}

/// Parse the claimed quantity and scale it by the token's decimals.
fn parse_quantity(quantity: &str, kind: TokenKind) -> eyre::Result<U256> {
    let scaled = parse_amount(quantity, kind.token_decimals())?;
    ensure!(
        scaled > U256::ZERO && scaled < U256::MAX,
        "Quantity must be a positive amount, got '{quantity}'"
    );
    Ok(scaled)
}

/// Resolve claim parameters against a live drop and write them with the encoded call.
///
/// # Errors
/// Fails if the chain or any published document cannot be read, if the drop has no active
/// claim phase, or if the output cannot be written.
#[instrument(skip_all, fields(contract = %input.contract, standard = ?input.standard))]
pub async fn claim_params(
    config: CommonConfig,
    input: ClaimInput,
    params_out: PathBuf,
) -> eyre::Result<()> {
    let reader = DropChainReader::new(connect(&config)?);
    let storage = storage(&config)?;

    let token_decimals = match input.standard {
        TokenStandard::Erc20 => Some(reader.token_decimals(input.contract).await?),
        TokenStandard::Erc721 | TokenStandard::Erc1155 => None,
    };
    let kind = token_kind(input.standard, input.token_id, token_decimals)?;
    let request = ClaimRequest {
        contract: DropContract {
            address: input.contract,
            kind,
            single_phase: input.single_phase,
        },
        receiver: input.receiver,
        from: input.from,
        quantity: parse_quantity(&input.quantity, kind)?,
    };

    let resolver = ClaimResolver::new(
        reader.clone(),
        StorageMetadataReader::new(reader.clone(), storage.clone()),
        SnapshotProofFetcher::new(storage, reader),
    );
    let params = resolver.resolve(&request).await?;

    let output = ClaimOutput {
        to: input.contract,
        call_data: encode_claim_call(&params),
        params,
    };
    write_json(&params_out, &output).await?;
    info!(file = ?params_out, "Exported claim parameters");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_kind_requires_standard_specific_inputs() {
        assert_eq!(
            token_kind(TokenStandard::Erc721, None, None).expect("erc721 kind"),
            TokenKind::Erc721
        );
        assert!(token_kind(TokenStandard::Erc1155, None, None).is_err());
        assert_eq!(
            token_kind(TokenStandard::Erc1155, Some(U256::from(3_u8)), None)
                .expect("erc1155 kind"),
            TokenKind::Erc1155 {
                token_id: U256::from(3_u8)
            }
        );
        assert!(token_kind(TokenStandard::Erc20, None, None).is_err());
    }

    #[test]
    fn quantity_is_scaled_and_positive() {
        let kind = TokenKind::Erc20 { token_decimals: 6 };
        assert_eq!(
            parse_quantity("1.5", kind).expect("valid quantity"),
            U256::from(1_500_000_u64)
        );
        assert_eq!(
            parse_quantity("3", TokenKind::Erc721).expect("valid quantity"),
            U256::from(3_u8)
        );
        assert!(parse_quantity("0", TokenKind::Erc721).is_err());
        assert!(parse_quantity("unlimited", TokenKind::Erc721).is_err());
        assert!(parse_quantity("-1", TokenKind::Erc721).is_err());
    }

    #[tokio::test]
    async fn claim_params_requires_rpc_url() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let input = ClaimInput {
            contract: Address::repeat_byte(1),
            standard: TokenStandard::Erc721,
            token_id: None,
            single_phase: false,
            receiver: Address::repeat_byte(2),
            from: None,
            quantity: "1".to_owned(),
        };
        let out = dir.path().join("out.json");
        let result = claim_params(CommonConfig::default(), input, out).await;
        assert!(result.is_err());
    }
}
