//! Header and body validation rules a block must satisfy before the execution gate will run it.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use alloy_primitives::B256;
use reth_primitives::{SealedBlock, SealedHeader};
use thiserror::Error;

/// Validates headers and block bodies against the protocol rules active for the chain.
///
/// Implementations are pure: they never touch the state trie. Stateful checks (transaction
/// execution, state root equality) belong to the VM, not here.
#[auto_impl::auto_impl(&, Arc)]
pub trait Consensus: std::fmt::Debug + Send + Sync {
    /// Validates a header against its parent: gas limit deltas, timestamp monotonicity, base fee
    /// continuity, and difficulty for pre-Merge chains.
    fn validate_header_against_parent(
        &self,
        header: &SealedHeader,
        parent: &SealedHeader,
    ) -> Result<(), ConsensusError>;

    /// Validates a block body against the header it was sealed with: ommers hash, transactions
    /// root, withdrawals root.
    fn validate_body_against_header(
        &self,
        block: &SealedBlock,
        header: &SealedHeader,
    ) -> Result<(), ConsensusError>;
}

/// Reasons a block or header fails protocol validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsensusError {
    /// Header's gas used exceeds its own gas limit.
    #[error("header gas used {gas_used} exceeds gas limit {gas_limit}")]
    HeaderGasUsedExceedsGasLimit {
        /// Gas used as declared by the header.
        gas_used: u64,
        /// Gas limit as declared by the header.
        gas_limit: u64,
    },
    /// Computed ommers hash differs from the header's declared value.
    #[error("ommers hash mismatch: got {got}, expected {expected}")]
    BodyOmmersHashDiff {
        /// Computed hash.
        got: B256,
        /// Declared hash.
        expected: B256,
    },
    /// Computed transactions root differs from the header's declared value.
    #[error("transactions root mismatch: got {got}, expected {expected}")]
    BodyTransactionRootDiff {
        /// Computed root.
        got: B256,
        /// Declared root.
        expected: B256,
    },
    /// Block is already known to the store.
    #[error("block with hash {0} is already known")]
    BlockKnown(B256),
    /// Block's parent is not known to the store.
    #[error("block's parent {0} is not known")]
    ParentUnknown(B256),
    /// Block number does not immediately follow its parent's.
    #[error("block number {number} does not follow parent number {parent_number}")]
    ParentBlockNumberMismatch {
        /// This block's number.
        number: u64,
        /// Parent's number.
        parent_number: u64,
    },
    /// Timestamp is not strictly greater than the parent's.
    #[error("timestamp {timestamp} is not after parent timestamp {parent_timestamp}")]
    TimestampIsInPast {
        /// This block's timestamp.
        timestamp: u64,
        /// Parent's timestamp.
        parent_timestamp: u64,
    },
    /// Gas limit increased by more than the protocol-allowed fraction.
    #[error("gas limit invalid increase: {parent_gas_limit} -> {gas_limit}")]
    GasLimitInvalidIncrease {
        /// Parent's gas limit.
        parent_gas_limit: u64,
        /// This block's gas limit.
        gas_limit: u64,
    },
    /// Gas limit decreased by more than the protocol-allowed fraction.
    #[error("gas limit invalid decrease: {parent_gas_limit} -> {gas_limit}")]
    GasLimitInvalidDecrease {
        /// Parent's gas limit.
        parent_gas_limit: u64,
        /// This block's gas limit.
        gas_limit: u64,
    },
    /// EIP-1559 base fee is missing on a post-London header.
    #[error("base fee missing from post-London header")]
    BaseFeeMissing,
    /// Computed base fee differs from the header's declared value.
    #[error("base fee mismatch: got {got}, expected {expected}")]
    BaseFeeDiff {
        /// Computed base fee.
        got: u64,
        /// Declared base fee.
        expected: u64,
    },
}
