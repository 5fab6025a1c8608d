//! The external virtual-machine contract the execution gate runs blocks against.
//!
//! This crate defines only the contract; [`reth_revm_executor`] provides the concrete
//! implementation that actually interprets EVM bytecode via [`revm`].

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use alloy_primitives::B256;
use reth_execution_errors::BlockExecutionError;
use reth_execution_types::{BlockExecutionInput, BlockExecutionOutput};
use reth_primitives::{Genesis, Receipt, SealedBlock};

/// Executes blocks against an authenticated state trie.
///
/// Implementors own a single mutable state view; the execution gate serializes all calls to
/// `run_block`, so implementations do not need their own internal locking for that method, but
/// `state_root`/`has_state_root` may be called concurrently with execution (e.g. by RPC queries)
/// and must tolerate that.
#[auto_impl::auto_impl(&mut, Box)]
pub trait BlockExecutor: Send {
    /// Prepares the VM for use: opens its backing database handle and, if the chain has never
    /// been executed before, materializes the genesis state.
    fn init(&mut self) -> Result<(), BlockExecutionError>;

    /// Returns an independent view of the same backing state with fresh per-block caches,
    /// leaving `self` untouched. Used by debug replay so tracing a historical range never
    /// disturbs the live execution path.
    fn shallow_copy(&self) -> Box<dyn BlockExecutor>;

    /// Executes a block against `input.state_root`, returning the new state root, the
    /// transaction receipts, and total gas used.
    ///
    /// Must not leave partial state committed when it returns an error.
    fn run_block(
        &mut self,
        input: BlockExecutionInput<'_, SealedBlock>,
    ) -> Result<BlockExecutionOutput<Receipt>, BlockExecutionError>;

    /// The state root of the VM's current view.
    fn state_root(&self) -> B256;

    /// Returns `true` if the state trie has a materialized view for `root`.
    fn has_state_root(&self, root: B256) -> bool;

    /// Materializes the canonical genesis state, if it has not been already.
    fn generate_canonical_genesis(&mut self, genesis: &Genesis) -> Result<(), BlockExecutionError>;
}
