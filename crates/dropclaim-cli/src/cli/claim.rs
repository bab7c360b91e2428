//! Claim subcommands.

use std::path::PathBuf;

use alloy_primitives::{Address, U256};
use dropclaim_sdk::commands::ClaimInput;
use dropclaim_sdk::common::TokenStandard;

use super::{CommonArgs, parse_address, parse_token_standard, parse_u256};

/// Arguments for `claim params`.
#[derive(Debug, clap::Args)]
pub struct ClaimParamsArgs {
    /// Connection settings.
    #[command(flatten)]
    pub common: CommonArgs,
    /// Drop contract address.
    #[arg(long, env = "DROP_CONTRACT", value_parser = parse_address)]
    pub contract: Address,
    /// Token standard of the drop: `erc721`, `erc20` or `erc1155`.
    #[arg(
        long,
        env = "TOKEN_STANDARD",
        default_value = "erc721",
        value_parser = parse_token_standard
    )]
    pub standard: TokenStandard,
    /// Token id to claim. Required for ERC-1155 drops.
    #[arg(long, env = "TOKEN_ID", value_parser = parse_u256)]
    pub token_id: Option<U256>,
    /// The drop has a single claim condition instead of a phase schedule.
    #[arg(long, env = "SINGLE_PHASE")]
    pub single_phase: bool,
    /// Wallet receiving the claimed tokens.
    #[arg(long, env = "RECEIVER", value_parser = parse_address)]
    pub receiver: Address,
    /// Wallet sending the transaction, if not the receiver. Allowlist eligibility is
    /// checked for this wallet.
    #[arg(long, env = "SENDER", value_parser = parse_address)]
    pub from: Option<Address>,
    /// Amount to claim in whole token units, e.g. `2` or `0.5` for ERC-20 drops.
    #[arg(long, env = "QUANTITY", default_value = "1")]
    pub quantity: String,
    /// Output file for the resolved parameters.
    #[arg(long, env = "CLAIM_PARAMS_OUT", default_value = "claim-params.json")]
    pub params_out: PathBuf,
}

impl From<&ClaimParamsArgs> for ClaimInput {
    fn from(args: &ClaimParamsArgs) -> Self {
        Self {
            contract: args.contract,
            standard: args.standard,
            token_id: args.token_id,
            single_phase: args.single_phase,
            receiver: args.receiver,
            from: args.from,
            quantity: args.quantity.clone(),
        }
    }
}
