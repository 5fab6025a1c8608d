use alloy_primitives::{Address, Bytes, B256, U256};
use std::collections::BTreeMap;

pub use alloy_genesis::{ChainConfig, Genesis};

/// A single account's state at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenesisAccount {
    /// Starting nonce.
    pub nonce: Option<u64>,
    /// Starting balance.
    pub balance: U256,
    /// Contract bytecode, if any.
    pub code: Option<Bytes>,
    /// Initial storage slots.
    pub storage: Option<BTreeMap<B256, B256>>,
    /// Private key, for dev-mode pre-funded accounts. Never present outside test genesis files.
    pub private_key: Option<B256>,
}

/// Placeholder type kept for API symmetry; genesis account addresses are plain [`Address`]es.
pub type GenesisAccounts = BTreeMap<Address, GenesisAccount>;
