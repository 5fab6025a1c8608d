//! Storage contracts the execution gate depends on.
//!
//! [`BlockchainStore`] replaces the dynamic "does this store support X" capability probing some
//! designs use: every method the gate needs is a compile-time requirement on the trait, so a
//! store that can't support one simply doesn't implement `BlockchainStore`.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod cursor;
mod receipts;
mod state;

pub use cursor::ChainPointer;
pub use receipts::ReceiptsProvider;
pub use state::StateProvider;

use alloy_primitives::{BlockHash, BlockNumber, U256};
use reth_primitives::{SealedBlock, SealedHeader};
use reth_storage_errors::ProviderError;

/// A named block identifier: either by hash or by number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockNumberOrHash {
    /// By hash.
    Hash(BlockHash),
    /// By number, on the canonical chain.
    Number(BlockNumber),
}

impl From<BlockHash> for BlockNumberOrHash {
    fn from(hash: BlockHash) -> Self {
        Self::Hash(hash)
    }
}

impl From<BlockNumber> for BlockNumberOrHash {
    fn from(number: BlockNumber) -> Self {
        Self::Number(number)
    }
}

/// A callback invoked once per block during [`BlockchainStore::iterate`].
///
/// `reorg` is `true` when the cursor had to be rewound to a common ancestor before this block
/// could be delivered in canonical order.
pub type IterateCallback<'a> =
    &'a mut dyn FnMut(SealedBlock, bool) -> Result<(), ProviderError>;

/// The blockchain store: ordered blocks, named iterator cursors, and the canonical chain.
///
/// Every read the execution gate performs and every write it issues goes through this trait. It
/// intentionally says nothing about *how* blocks are persisted (memory, MDBX, a remote RPC) —
/// only what operations a store must support to host the gate.
#[auto_impl::auto_impl(&, Arc)]
pub trait BlockchainStore: Send + Sync {
    /// Fetches a block by hash or canonical number.
    fn get_block(&self, id: BlockNumberOrHash) -> Result<SealedBlock, ProviderError>;

    /// Fetches a header by hash or canonical number.
    fn get_header(&self, id: BlockNumberOrHash) -> Result<SealedHeader, ProviderError>;

    /// The current canonical tip.
    fn canonical_head(&self) -> Result<SealedBlock, ProviderError>;

    /// The block at the named iterator cursor.
    fn iterator_head(&self, cursor: ChainPointer) -> Result<SealedBlock, ProviderError>;

    /// Repoints a named iterator cursor at `hash` without otherwise touching the store.
    fn set_iterator_head(&self, cursor: ChainPointer, hash: BlockHash) -> Result<(), ProviderError>;

    /// Total difficulty accumulated up to and including `hash`.
    fn total_difficulty(&self, hash: BlockHash) -> Result<U256, ProviderError>;

    /// Delivers blocks in canonical order starting just after the `vm` cursor's block, up to
    /// `max_blocks`, invoking `callback` for each. Returns the number of blocks delivered.
    ///
    /// If the canonical chain diverged from the cursor's path since the last call, the first
    /// delivered block after the common ancestor is announced with `reorg = true`.
    fn iterate(
        &self,
        cursor: ChainPointer,
        max_blocks: u64,
        callback: IterateCallback<'_>,
    ) -> Result<u64, ProviderError>;

    /// Appends `blocks` to the store as a single atomic batch, establishing their canonical
    /// number -> hash mapping unless `skip_canonical_check` is set (used by
    /// `run_without_set_head`, which writes blocks before they are canonical).
    fn put_blocks(
        &self,
        blocks: &[SealedBlock],
        skip_canonical_check: bool,
        suppress_chain_updated: bool,
    ) -> Result<(), ProviderError>;

    /// Emits a chain-updated notification. Called automatically by `put_blocks` unless
    /// `suppress_chain_updated` was set, in which case the caller must call this explicitly once
    /// its batch of related writes is complete.
    fn notify_chain_updated(&self);
}
