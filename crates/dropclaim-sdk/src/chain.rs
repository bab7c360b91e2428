//! Chain-state readers for drop contracts.

use alloy::primitives::Address;
use alloy::providers::DynProvider;
use alloy::sol;
use async_trait::async_trait;
use dropclaim_core::base::{NATIVE_TOKEN_DECIMALS, is_native_token};
use dropclaim_core::schema::claim::ClaimCondition;
use dropclaim_core::schema::token::{DropContract, TokenKind};
use tracing::{debug, instrument};

use crate::error::ClaimError;

sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    struct ClaimConditionData {
        uint256 startTimestamp;
        uint256 maxClaimableSupply;
        uint256 supplyClaimed;
        uint256 quantityLimitPerWallet;
        bytes32 merkleRoot;
        uint256 pricePerToken;
        address currency;
        string metadata;
    }

    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    struct AllowlistProofData {
        bytes32[] proof;
        uint256 quantityLimitPerWallet;
        uint256 pricePerToken;
        address currency;
    }

    /// Multi-phase ERC-721 / ERC-20 drop.
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IDrop {
        function getActiveClaimConditionId() external view returns (uint256);
        function getClaimConditionById(uint256 conditionId) external view returns (ClaimConditionData memory condition);
        function claim(address receiver, uint256 quantity, address currency, uint256 pricePerToken, AllowlistProofData calldata allowlistProof, bytes memory data) external payable;
    }

    /// Single-phase ERC-721 / ERC-20 drop.
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IDropSinglePhase {
        function claimCondition() external view returns (uint256 startTimestamp, uint256 maxClaimableSupply, uint256 supplyClaimed, uint256 quantityLimitPerWallet, bytes32 merkleRoot, uint256 pricePerToken, address currency, string memory metadata);
    }

    /// Multi-phase ERC-1155 drop.
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IDrop1155 {
        function getActiveClaimConditionId(uint256 tokenId) external view returns (uint256);
        function getClaimConditionById(uint256 tokenId, uint256 conditionId) external view returns (ClaimConditionData memory condition);
        function claim(address receiver, uint256 tokenId, uint256 quantity, address currency, uint256 pricePerToken, AllowlistProofData calldata allowlistProof, bytes memory data) external payable;
    }

    /// Single-phase ERC-1155 drop.
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IDropSinglePhase1155 {
        function claimCondition(uint256 tokenId) external view returns (uint256 startTimestamp, uint256 maxClaimableSupply, uint256 supplyClaimed, uint256 quantityLimitPerWallet, bytes32 merkleRoot, uint256 pricePerToken, address currency, string memory metadata);
    }

    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IContractMetadata {
        function contractURI() external view returns (string memory);
    }

    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IERC20Metadata {
        function decimals() external view returns (uint8);
    }
}

impl From<ClaimConditionData> for ClaimCondition {
    fn from(c: ClaimConditionData) -> Self {
        Self {
            start_timestamp: c.startTimestamp,
            max_claimable_supply: c.maxClaimableSupply,
            supply_claimed: c.supplyClaimed,
            quantity_limit_per_wallet: c.quantityLimitPerWallet,
            merkle_root: c.merkleRoot,
            price_per_token: c.pricePerToken,
            currency: c.currency,
            metadata: c.metadata,
        }
    }
}

impl From<IDropSinglePhase::claimConditionReturn> for ClaimCondition {
    fn from(c: IDropSinglePhase::claimConditionReturn) -> Self {
        Self {
            start_timestamp: c.startTimestamp,
            max_claimable_supply: c.maxClaimableSupply,
            supply_claimed: c.supplyClaimed,
            quantity_limit_per_wallet: c.quantityLimitPerWallet,
            merkle_root: c.merkleRoot,
            price_per_token: c.pricePerToken,
            currency: c.currency,
            metadata: c.metadata,
        }
    }
}

impl From<IDropSinglePhase1155::claimConditionReturn> for ClaimCondition {
    fn from(c: IDropSinglePhase1155::claimConditionReturn) -> Self {
        Self {
            start_timestamp: c.startTimestamp,
            max_claimable_supply: c.maxClaimableSupply,
            supply_claimed: c.supplyClaimed,
            quantity_limit_per_wallet: c.quantityLimitPerWallet,
            merkle_root: c.merkleRoot,
            price_per_token: c.pricePerToken,
            currency: c.currency,
            metadata: c.metadata,
        }
    }
}

/// Reads the claim condition currently in force on a drop.
#[async_trait]
pub trait ClaimConditionReader: Send + Sync {
    /// Active phase of a multi-phase drop.
    ///
    /// Returns [`ClaimError::NoActiveClaimPhase`] when no phase is open.
    async fn active_claim_condition(
        &self,
        contract: &DropContract,
    ) -> Result<ClaimCondition, ClaimError>;

    /// The only condition of a single-phase drop.
    async fn single_phase_claim_condition(
        &self,
        contract: &DropContract,
    ) -> Result<ClaimCondition, ClaimError>;
}

/// Reads the metadata URI a contract publishes.
#[async_trait]
pub trait ContractUriReader: Send + Sync {
    /// The contract's `contractURI()`.
    async fn contract_uri(&self, contract: Address) -> Result<String, ClaimError>;
}

/// Looks up the decimals of payment currencies.
#[async_trait]
pub trait CurrencyDecimals: Send + Sync {
    /// Decimals of `currency`; the native-token sentinel has 18.
    async fn currency_decimals(&self, currency: Address) -> Result<u8, ClaimError>;
}

#[async_trait]
impl<T: CurrencyDecimals + ?Sized> CurrencyDecimals for Box<T> {
    async fn currency_decimals(&self, currency: Address) -> Result<u8, ClaimError> {
        (**self).currency_decimals(currency).await
    }
}

/// Decimals source for offline use: knows only the native coin.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeDecimals;

#[async_trait]
impl CurrencyDecimals for NativeDecimals {
    async fn currency_decimals(&self, currency: Address) -> Result<u8, ClaimError> {
        if currency == Address::ZERO || is_native_token(currency) {
            Ok(NATIVE_TOKEN_DECIMALS)
        } else {
            Err(ClaimError::UnknownDecimals(currency))
        }
    }
}

/// Contract reader over a JSON-RPC provider.
#[derive(Debug, Clone)]
pub struct DropChainReader {
    provider: DynProvider,
}

impl DropChainReader {
    /// Wrap a provider.
    #[must_use]
    pub const fn new(provider: DynProvider) -> Self {
        Self { provider }
    }

    /// `decimals()` of an ERC-20 token contract.
    ///
    /// # Errors
    /// Returns [`ClaimError::ChainRead`] if the call fails.
    #[instrument(skip(self))]
    pub async fn token_decimals(&self, token: Address) -> Result<u8, ClaimError> {
        IERC20Metadata::new(token, self.provider.clone())
            .decimals()
            .call()
            .await
            .map_err(read_error(token, "decimals"))
    }
}

fn read_error(
    contract: Address,
    call: &'static str,
) -> impl FnOnce(alloy::contract::Error) -> ClaimError {
    move |source| ClaimError::ChainRead {
        contract,
        call,
        source,
    }
}

/// The active-id lookup reverts when no phase has started yet or every phase has ended.
fn active_id_error(contract: Address) -> impl FnOnce(alloy::contract::Error) -> ClaimError {
    move |source| {
        if source.as_revert_data().is_some() {
            ClaimError::NoActiveClaimPhase { contract }
        } else {
            ClaimError::ChainRead {
                contract,
                call: "getActiveClaimConditionId",
                source,
            }
        }
    }
}

#[async_trait]
impl ClaimConditionReader for DropChainReader {
    #[instrument(skip_all, fields(contract = %contract.address))]
    async fn active_claim_condition(
        &self,
        contract: &DropContract,
    ) -> Result<ClaimCondition, ClaimError> {
        let address = contract.address;
        let condition = match contract.kind {
            TokenKind::Erc721 | TokenKind::Erc20 { .. } => {
                let drop = IDrop::new(address, self.provider.clone());
                let id = drop
                    .getActiveClaimConditionId()
                    .call()
                    .await
                    .map_err(active_id_error(address))?;
                debug!(%id, "Active claim condition");
                drop.getClaimConditionById(id)
                    .call()
                    .await
                    .map_err(read_error(address, "getClaimConditionById"))?
            }
            TokenKind::Erc1155 { token_id } => {
                let drop = IDrop1155::new(address, self.provider.clone());
                let id = drop
                    .getActiveClaimConditionId(token_id)
                    .call()
                    .await
                    .map_err(active_id_error(address))?;
                debug!(%id, %token_id, "Active claim condition");
                drop.getClaimConditionById(token_id, id)
                    .call()
                    .await
                    .map_err(read_error(address, "getClaimConditionById"))?
            }
        };
        Ok(condition.into())
    }

    #[instrument(skip_all, fields(contract = %contract.address))]
    async fn single_phase_claim_condition(
        &self,
        contract: &DropContract,
    ) -> Result<ClaimCondition, ClaimError> {
        let address = contract.address;
        match contract.kind {
            TokenKind::Erc721 | TokenKind::Erc20 { .. } => {
                IDropSinglePhase::new(address, self.provider.clone())
                    .claimCondition()
                    .call()
                    .await
                    .map(Into::into)
                    .map_err(read_error(address, "claimCondition"))
            }
            TokenKind::Erc1155 { token_id } => {
                IDropSinglePhase1155::new(address, self.provider.clone())
                    .claimCondition(token_id)
                    .call()
                    .await
                    .map(Into::into)
                    .map_err(read_error(address, "claimCondition"))
            }
        }
    }
}

#[async_trait]
impl ContractUriReader for DropChainReader {
    #[instrument(skip(self))]
    async fn contract_uri(&self, contract: Address) -> Result<String, ClaimError> {
        IContractMetadata::new(contract, self.provider.clone())
            .contractURI()
            .call()
            .await
            .map_err(read_error(contract, "contractURI"))
    }
}

#[async_trait]
impl CurrencyDecimals for DropChainReader {
    async fn currency_decimals(&self, currency: Address) -> Result<u8, ClaimError> {
        if currency == Address::ZERO || is_native_token(currency) {
            return Ok(NATIVE_TOKEN_DECIMALS);
        }
        self.token_decimals(currency).await
    }
}

impl From<&ClaimCondition> for ClaimConditionData {
    fn from(c: &ClaimCondition) -> Self {
        Self {
            startTimestamp: c.start_timestamp,
            maxClaimableSupply: c.max_claimable_supply,
            supplyClaimed: c.supply_claimed,
            quantityLimitPerWallet: c.quantity_limit_per_wallet,
            merkleRoot: c.merkle_root,
            pricePerToken: c.price_per_token,
            currency: c.currency,
            metadata: c.metadata.clone(),
        }
    }
}
