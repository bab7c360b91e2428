use alloy_primitives::{Address, address};

/// Address used in place of an ERC-20 contract to mean the chain's native coin.
pub const NATIVE_TOKEN_ADDRESS: Address = address!("0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

/// Decimals of the native coin.
pub const NATIVE_TOKEN_DECIMALS: u8 = 18;

/// Returns `true` if `currency` is the native-token sentinel.
#[must_use]
pub fn is_native_token(currency: Address) -> bool {
    currency == NATIVE_TOKEN_ADDRESS
}
