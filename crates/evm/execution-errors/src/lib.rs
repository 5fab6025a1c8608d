//! Errors produced while executing a block against the state trie.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use alloy_primitives::{BlockNumHash, Bloom, B256};
use reth_consensus::ConsensusError;
use reth_storage_errors::ProviderError;
use revm_primitives::EVMError;
use thiserror::Error;

/// Errors surfaced by the VM while running a single transaction or applying post-execution
/// state changes, before they are attributed to a block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockValidationError {
    /// The EVM rejected a transaction as invalid.
    #[error("EVM reported invalid transaction {hash}: {message}")]
    EVM {
        /// Hash of the offending transaction.
        hash: B256,
        /// The EVM's error message.
        message: String,
    },
    /// Sender recovery (ecrecover) failed for a transaction.
    #[error("failed to recover sender for transaction {0}")]
    SenderRecoveryError(B256),
    /// The receipts root computed from execution differs from the header's declared value.
    #[error("receipt root mismatch: got {got}, expected {expected}")]
    ReceiptRootDiff {
        /// Computed root.
        got: B256,
        /// Declared root.
        expected: B256,
    },
    /// The logs bloom computed from execution differs from the header's declared value.
    #[error("bloom mismatch: got {got}, expected {expected}")]
    BloomLogDiff {
        /// Computed bloom.
        got: Box<Bloom>,
        /// Declared bloom.
        expected: Box<Bloom>,
    },
    /// Cumulative gas used by all transactions differs from the header's declared value.
    #[error("block gas used mismatch: got {got}, expected {expected}")]
    BlockGasUsed {
        /// Computed gas used.
        got: u64,
        /// Declared gas used.
        expected: u64,
    },
    /// EIP-4788: a Cancun-active block is missing its parent beacon block root.
    #[error("EIP-4788 parent beacon block root missing for active Cancun block")]
    MissingParentBeaconBlockRoot,
    /// Invoking the EIP-4788 beacon-root contract failed.
    #[error("beacon root contract call at {parent_beacon_block_root} failed: {message}")]
    BeaconRootContractCall {
        /// The beacon block root passed to the contract.
        parent_beacon_block_root: B256,
        /// The failure message.
        message: String,
    },
}

impl<DB: std::fmt::Debug> From<EVMError<DB>> for BlockValidationError {
    fn from(error: EVMError<DB>) -> Self {
        Self::EVM { hash: B256::ZERO, message: error.to_string() }
    }
}

/// Errors surfaced by [`BlockExecutor::run_block`](reth_evm::BlockExecutor::run_block),
/// attributed to a specific block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockExecutionError {
    /// Transparent wrapper around a [`BlockValidationError`].
    #[error(transparent)]
    Validation(#[from] BlockValidationError),
    /// Transparent wrapper around a [`ConsensusError`].
    #[error(transparent)]
    Consensus(#[from] ConsensusError),
    /// Transparent wrapper around a [`ProviderError`].
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// The state trie is missing the state root the VM was asked to execute against.
    ///
    /// Dispatched on as a typed variant (rather than matched by error-message substring) so the
    /// execution gate's backstep recovery can trigger deterministically.
    #[error("missing state root {0}")]
    MissingStateRoot(B256),
    /// A batch of blocks could not be appended because they fork from a point other than the
    /// store's current tip.
    #[error("appending chain at {other_chain_fork:?} doesn't connect to tip {chain_tip:?}")]
    AppendChainDoesntConnect {
        /// The store's current tip.
        chain_tip: BlockNumHash,
        /// The fork point of the batch that failed to connect.
        other_chain_fork: BlockNumHash,
    },
    /// An unrecoverable error while committing or reverting a canonical-chain update.
    #[error("canonical commit/revert failed: {inner}")]
    Canonical {
        /// The underlying error message.
        inner: String,
    },
}

impl BlockExecutionError {
    /// Returns `true` for errors that indicate unrecoverable database corruption rather than an
    /// ordinary, retryable execution failure.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Canonical { .. })
    }

    /// Returns the missing state root if this is a [`Self::MissingStateRoot`] error.
    pub const fn missing_state_root(&self) -> Option<B256> {
        match self {
            Self::MissingStateRoot(root) => Some(*root),
            _ => None,
        }
    }
}
