use alloy_primitives::{Address, Bytes, StorageKey, StorageValue, B256};
use reth_primitives::Account;
use reth_storage_errors::ProviderError;

/// A read-only view of account state at a particular state root.
///
/// This is the trait [`reth_revm`]'s `revm::Database` adapter is built on: it is the only way
/// the VM reads state that the execution gate did not already hand it as part of a block.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait StateProvider: Send + Sync {
    /// Looks up an account by address.
    fn basic_account(&self, address: Address) -> Result<Option<Account>, ProviderError>;

    /// Looks up a storage slot for an account.
    fn storage(&self, address: Address, key: StorageKey) -> Result<Option<StorageValue>, ProviderError>;

    /// Looks up contract bytecode by its hash.
    fn bytecode_by_hash(&self, hash: B256) -> Result<Option<Bytes>, ProviderError>;

    /// The state root this view was opened at.
    fn state_root(&self) -> B256;
}
