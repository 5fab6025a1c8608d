//! Errors produced by the blockchain store.

use alloy_primitives::{BlockHash, BlockNumber, B256};
use thiserror::Error;

/// Errors returned by [`BlockchainStore`](reth_storage_api::BlockchainStore) implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// A block was requested by hash but the store has no record of it.
    #[error("block {0} not found")]
    BlockHashNotFound(BlockHash),
    /// A block was requested by number but the store has no record of it.
    #[error("block number {0} not found")]
    BlockNumberNotFound(BlockNumber),
    /// A named iterator cursor (`vm`, `safe`, `finalized`) has never been initialized.
    #[error("iterator cursor {0:?} not initialized")]
    IteratorCursorNotInitialized(&'static str),
    /// The total difficulty for a block could not be found.
    #[error("total difficulty for block {0} not found")]
    TotalDifficultyNotFound(BlockHash),
    /// A batch of blocks could not be appended because they do not chain onto the store's tip.
    #[error("block {new_block} does not connect to tip {tip}")]
    AppendChainDoesntConnect {
        /// Current tip of the store.
        tip: BlockHash,
        /// First block of the batch that failed to connect.
        new_block: BlockHash,
    },
    /// The underlying key-value store returned an error.
    #[error("database error: {0}")]
    Database(String),
    /// The state trie does not contain the requested state root.
    #[error("missing state root {0}")]
    MissingStateRoot(B256),
}
