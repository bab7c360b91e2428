//! Foundational constants and amount helpers.

mod currency;
mod units;

pub use currency::{NATIVE_TOKEN_ADDRESS, NATIVE_TOKEN_DECIMALS, is_native_token};
pub use units::{UNLIMITED, UnitsError, decimal_scale, parse_amount};
