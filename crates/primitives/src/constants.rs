//! Re-exports of the protocol constants shared with downstream crates.

pub use reth_primitives_traits::constants::{
    EIP1559_INITIAL_BASE_FEE, EMPTY_OMMER_ROOT_HASH, GIGAGAS, KECCAK_EMPTY, KILOGAS, MEGAGAS,
    MINIMUM_GAS_LIMIT,
};

use alloy_primitives::{b256, B256};

/// Genesis hash for reth's local dev chain.
pub const DEV_GENESIS_HASH: B256 =
    b256!("2f980576711e3617a5e4d83dd539548ec0f7792007d505a3d2f5193ad0ac2f2f");
