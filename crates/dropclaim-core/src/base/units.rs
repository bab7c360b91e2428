use alloy_primitives::U256;
use alloy_primitives::utils::{ParseUnits, parse_units};
use thiserror::Error;

/// Keyword accepted in place of an amount to mean "no limit".
pub const UNLIMITED: &str = "unlimited";

/// Errors produced while converting human-readable amounts.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UnitsError {
    /// The amount is not a valid decimal number for the given decimals.
    #[error("Invalid amount '{amount}' with {decimals} decimals: {reason}")]
    InvalidAmount {
        /// The rejected input.
        amount: String,
        /// Decimals used for scaling.
        decimals: u8,
        /// Parser error message.
        reason: String,
    },

    /// Negative amounts are never valid for claims.
    #[error("Negative amount '{0}'")]
    Negative(String),

    /// `10^decimals` does not fit into 256 bits.
    #[error("Decimals {0} out of range")]
    DecimalsOutOfRange(u8),
}

/// Returns `10^decimals`.
///
/// # Errors
/// Returns [`UnitsError::DecimalsOutOfRange`] when the power overflows `U256`.
pub fn decimal_scale(decimals: u8) -> Result<U256, UnitsError> {
    U256::from(10_u8)
        .checked_pow(U256::from(decimals))
        .ok_or(UnitsError::DecimalsOutOfRange(decimals))
}

/// Parses a decimal amount (e.g. `"1.5"`) into its smallest-denomination integer.
///
/// `"unlimited"` (any case) maps to `U256::MAX`.
///
/// # Errors
/// Returns an error if the amount is malformed or negative.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, UnitsError> {
    let amount = amount.trim();
    if amount.eq_ignore_ascii_case(UNLIMITED) {
        return Ok(U256::MAX);
    }

    match parse_units(amount, decimals) {
        Ok(ParseUnits::U256(value)) => Ok(value),
        Ok(ParseUnits::I256(_)) => Err(UnitsError::Negative(amount.to_owned())),
        Err(e) => Err(UnitsError::InvalidAmount {
            amount: amount.to_owned(),
            decimals,
            reason: e.to_string(),
        }),
    }
}
