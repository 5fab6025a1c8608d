use alloy_primitives::U256;
use revm::db::BundleState;

/// Input for [`BlockExecutor::run_block`](crate::BlockExecutor::run_block): the block to run and
/// the total difficulty at its parent, needed for Merge-boundary checks.
#[derive(Debug)]
pub struct BlockExecutionInput<'a, Block> {
    /// The block to execute.
    pub block: &'a Block,
    /// Total difficulty of the block's parent.
    pub total_difficulty: U256,
    /// State root to execute against.
    pub state_root: alloy_primitives::B256,
    /// Whether the VM's per-block caches must be dropped before running this block (set on
    /// reorgs and on a fresh `open`).
    pub clear_cache: bool,
    /// Whether to skip re-validating block-level invariants already checked upstream (set for
    /// proof-of-authority chains and for blocks replayed from the canonical store).
    pub skip_block_validation: bool,
}

/// The output of executing a block: its state diff, per-transaction receipts and gas used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockExecutionOutput<T> {
    /// The state diff produced by this block, to be merged into the state trie.
    pub state: BundleState,
    /// Receipts, one per transaction, in execution order.
    pub receipts: Vec<T>,
    /// Total gas used by the block.
    pub gas_used: u64,
    /// The new state root after applying `state`.
    pub state_root: alloy_primitives::B256,
}
