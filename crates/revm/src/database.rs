use alloy_primitives::{Address, B256, U256};
use reth_storage_api::StateProvider;
use revm::{
    db::DatabaseRef,
    primitives::{AccountInfo, Bytecode, KECCAK_EMPTY},
};

/// Wraps a [`StateProvider`] so `revm` can read account and storage state through it.
///
/// Only implements [`DatabaseRef`] (not the mutable `Database`): the interpreter's actual state
/// mutations accumulate in its own in-memory journal and are returned as a [`revm::db::BundleState`]
/// diff, never written back through this type.
pub struct StateProviderDatabase<P>(pub P);

impl<P> StateProviderDatabase<P> {
    /// Wraps a state provider.
    pub const fn new(provider: P) -> Self {
        Self(provider)
    }
}

impl<P: StateProvider> DatabaseRef for StateProviderDatabase<P> {
    type Error = reth_storage_errors::ProviderError;

    fn basic_ref(&self, address: Address) -> Result<Option<AccountInfo>, Self::Error> {
        let Some(account) = self.0.basic_account(address)? else { return Ok(None) };
        let code = match account.bytecode_hash {
            Some(hash) if hash != KECCAK_EMPTY => {
                self.0.bytecode_by_hash(hash)?.map(|bytes| Bytecode::new_raw(bytes.0.into()))
            }
            _ => None,
        };
        Ok(Some(AccountInfo {
            balance: account.balance,
            nonce: account.nonce,
            code_hash: account.bytecode_hash.unwrap_or(KECCAK_EMPTY),
            code,
        }))
    }

    fn code_by_hash_ref(&self, code_hash: B256) -> Result<Bytecode, Self::Error> {
        Ok(self
            .0
            .bytecode_by_hash(code_hash)?
            .map(|bytes| Bytecode::new_raw(bytes.0.into()))
            .unwrap_or_default())
    }

    fn storage_ref(&self, address: Address, index: U256) -> Result<U256, Self::Error> {
        let key = index.into();
        Ok(self.0.storage(address, key)?.unwrap_or_default())
    }

    fn block_hash_ref(&self, _number: u64) -> Result<B256, Self::Error> {
        Ok(B256::ZERO)
    }
}
