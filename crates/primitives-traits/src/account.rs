use alloy_primitives::{B256, U256};
use revm_primitives::KECCAK_EMPTY;
use serde::{Deserialize, Serialize};

/// An Ethereum account as stored in the state trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Account {
    /// Number of transactions sent from this account.
    pub nonce: u64,
    /// Account balance.
    pub balance: U256,
    /// Hash of the account's bytecode, or [`KECCAK_EMPTY`] for EOAs.
    pub bytecode_hash: Option<B256>,
}

impl Account {
    /// Returns `true` if the account has no nonce, empty balance and no bytecode.
    pub fn is_empty(&self) -> bool {
        self.nonce == 0 &&
            self.balance.is_zero() &&
            self.bytecode_hash.map_or(true, |hash| hash == KECCAK_EMPTY)
    }

    /// Returns `true` if this is an externally owned account (no code).
    pub fn has_bytecode(&self) -> bool {
        self.bytecode_hash.is_some()
    }
}
