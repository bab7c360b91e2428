//! Shared test utilities for the workspace.

pub use alloy_primitives;
use alloy_primitives::{Address, U256};
use dropclaim_core::schema::snapshot::SnapshotEntry;

/// Helper macro to create an address with a specific last byte.
#[macro_export]
macro_rules! addr {
    ($v:expr) => {{
        let mut arr = [0_u8; 20];
        arr[19] = $v;
        $crate::alloy_primitives::Address::from(arr)
    }};
}

/// Helper macro to create `n` distinct leaves.
#[macro_export]
macro_rules! leaves {
    ($n:expr) => {{
        (0..$n)
            .map(|i: u8| {
                let mut arr = [0_u8; 32];
                arr[0] = 0xA0;
                arr[31] = i;
                $crate::alloy_primitives::B256::from(arr)
            })
            .collect::<Vec<_>>()
    }};
}

/// An ERC-20 currency address used across tests.
pub const ERC20_CURRENCY: Address = Address::repeat_byte(0xCC);

/// One token unit with 18 decimals.
pub const ONE_ETHER: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Snapshot entry with a limit and no overrides.
#[must_use]
pub fn plain_entry(address: Address, max_claimable: &str) -> SnapshotEntry {
    SnapshotEntry {
        address,
        max_claimable: max_claimable.to_owned(),
        price: None,
        currency_address: None,
    }
}

/// Snapshot entry with price and currency overrides.
#[must_use]
pub fn priced_entry(
    address: Address,
    max_claimable: &str,
    price: &str,
    currency: Address,
) -> SnapshotEntry {
    SnapshotEntry {
        address,
        max_claimable: max_claimable.to_owned(),
        price: Some(price.to_owned()),
        currency_address: Some(currency),
    }
}
