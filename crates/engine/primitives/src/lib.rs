//! Types shared between the execution gate (`reth-beacon-consensus`) and its callers: the
//! consensus-layer-facing request/response shapes and the engine's error and event types.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use alloy_primitives::{BlockHash, BlockNumHash, TxHash, U256};
use reth_execution_errors::BlockExecutionError;
use reth_primitives::{Receipt, SealedBlock};
use reth_storage_errors::ProviderError;
use thiserror::Error;

/// The three chain pointers an external consensus client drives via `set_head`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForkchoiceState {
    /// Hash of the block the VM should be executing up to.
    pub head_block_hash: BlockHash,
    /// Hash of the most recent block considered safe.
    pub safe_block_hash: BlockHash,
    /// Hash of the most recent finalized block.
    pub finalized_block_hash: BlockHash,
}

/// Input to `run_without_set_head`: a block delivered out of canonical order, not yet known to be
/// part of the eventual canonical chain.
#[derive(Debug)]
pub struct RunWithoutSetHeadInput {
    /// The block to execute and stage.
    pub block: SealedBlock,
    /// Total difficulty of the block's parent.
    pub total_difficulty: U256,
    /// Receipts for `block`, if the caller already produced them (e.g. this block was built
    /// locally by the payload builder). When present, execution is skipped entirely and these
    /// receipts are staged as-is; when absent, the block is executed to produce them.
    pub receipts: Option<Vec<(TxHash, Receipt)>>,
}

/// Outcome of a single call to `Engine::open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The engine was not yet open and has now been initialized.
    Opened,
    /// The engine was already open; this call was a no-op observed by the caller, not silently
    /// swallowed.
    AlreadyOpen,
}

/// Selects which of a replayed range's transactions should have their receipts returned by
/// `execute_blocks`.
#[derive(Debug, Clone, Default)]
pub enum TxHashSelector {
    /// Return receipts for every transaction in the replayed range.
    #[default]
    All,
    /// Return receipts only for the named transactions.
    Only(Vec<TxHash>),
    /// Execute the range but discard all receipts (used when only the resulting state root
    /// matters).
    None,
}

impl TxHashSelector {
    /// Returns `true` if a transaction with hash `hash` should have its receipt kept.
    pub fn keeps(&self, hash: TxHash) -> bool {
        match self {
            Self::All => true,
            Self::Only(hashes) => hashes.contains(&hash),
            Self::None => false,
        }
    }
}

/// A single block replayed by `execute_blocks`, paired with the receipts `selector` chose to
/// keep.
#[derive(Debug)]
pub struct ReplayedBlock {
    /// The replayed block.
    pub block: SealedBlock,
    /// Receipts kept for this block, in transaction order; entries dropped by the selector are
    /// simply absent rather than represented by a placeholder.
    pub receipts: Vec<(TxHash, Receipt)>,
    /// Gas used executing this block, always reported regardless of the selector.
    pub gas_used: u64,
}

/// Events the engine broadcasts as it runs, for telemetry and debugging consumers.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A block was executed and its cursor advanced.
    BlockExecuted {
        /// Number and hash of the executed block.
        block: BlockNumHash,
        /// Gas used executing it.
        gas_used: u64,
    },
    /// The run loop rewound its cursor after a missing-state-root error.
    Backstep {
        /// The block the cursor was rewound to.
        to: BlockNumHash,
    },
    /// Execution crossed a hardfork activation boundary.
    HardforkActivated {
        /// The first block executed under the new ruleset.
        at: BlockNumHash,
    },
    /// The run loop hit an error it could not recover from by backstepping.
    ExecutionError(EngineError),
}

/// Errors surfaced by the execution gate to its callers.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// A call was made, or the per-block callback observed, that the engine is not running
    /// (before `start`, after `stop`, or a shutdown raced the in-flight execution).
    #[error("execution stopped")]
    ExecutionStopped,
    /// `run_without_set_head` or `set_head` referenced a block the store has never seen.
    #[error("block {0} is unknown to the store")]
    UnknownBlock(BlockHash),
    /// `set_head` was asked to move to a block that is not a descendant of the current
    /// canonical chain and cannot be reconciled by backstepping.
    #[error("block {0} is not part of a canonical chain this engine can reconcile")]
    NonCanonicalBlock(BlockHash),
    /// Backstep recovery walked back past the genesis block without finding a state root the
    /// VM has.
    #[error("backstep recovery exhausted the chain without finding a usable state root")]
    BackstepExhausted,
    /// A block failed execution for a reason backstep recovery cannot fix.
    #[error(transparent)]
    Execution(#[from] BlockExecutionError),
    /// The backing store returned an error unrelated to execution.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl EngineError {
    /// Returns `true` for errors the run loop should treat as fatal (stop the engine) rather
    /// than retry after a backstep.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Execution(err) => err.is_fatal(),
            Self::ExecutionStopped | Self::NonCanonicalBlock(_) | Self::BackstepExhausted => true,
            Self::UnknownBlock(_) | Self::Provider(_) => false,
        }
    }
}
