//! The execution gate: the single-writer block-execution run loop and head management that an
//! external consensus client (or a local batch driver) calls into.
//!
//! [`Engine`] owns exactly one [`BlockExecutor`] behind an async mutex (see [`gate`]) and
//! exposes three entry points that never run concurrently with each other: [`Engine::run`],
//! [`Engine::run_without_set_head`] and [`Engine::set_head`]. Everything else — hardfork
//! switching, receipts indexing, backstep recovery — happens inside that serialized region.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod gate;
mod stats;

pub use reth_engine_primitives::{
    EngineError, ForkchoiceState, OpenOutcome, ReplayedBlock, RunWithoutSetHeadInput, SyncEvent,
    TxHashSelector,
};

use alloy_primitives::{BlockHash, TxHash};
use gate::ExecutionGate;
use reth_chain_state::PendingReceipts;
use reth_chainspec::{ChainSpec, Hardfork};
use reth_config::EngineConfig;
use reth_evm::BlockExecutor;
use reth_execution_errors::BlockExecutionError;
use reth_execution_types::BlockExecutionInput;
use reth_metrics::Metrics;
use reth_primitives::{Receipt, SealedBlock};
use reth_storage_api::{BlockNumberOrHash, BlockchainStore, ChainPointer, ReceiptsProvider};
use reth_storage_errors::ProviderError;
use reth_tasks::TaskExecutor;
use reth_tokio_util::{EventSender, EventStream};
use stats::EngineStats;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};
use tokio::{sync::Mutex as AsyncMutex, task::JoinHandle};
use tracing::{debug, info, warn};

/// The execution gate.
///
/// Generic over the blockchain store and the VM so tests can swap in lightweight doubles for
/// either without touching the run-loop logic. `Store` carries both [`BlockchainStore`] and
/// [`ReceiptsProvider`] because every concrete store the gate is built against implements both;
/// splitting them into two type parameters would only add noise at every call site.
pub struct Engine<Store, Vm> {
    store: Store,
    gate: ExecutionGate<Vm>,
    chain_spec: Arc<ChainSpec>,
    config: EngineConfig,
    pending_receipts: PendingReceipts,
    events: EventSender<SyncEvent>,
    stats: EngineStats,
    executor: TaskExecutor,
    opened: AtomicBool,
    started: AtomicBool,
    run_task: AsyncMutex<Option<JoinHandle<()>>>,
}

impl<Store, Vm> Engine<Store, Vm>
where
    Store: BlockchainStore + ReceiptsProvider + Send + Sync + 'static,
    Vm: BlockExecutor + 'static,
{
    /// Builds a gate around `store` and `vm`. Neither [`Self::open`] nor [`Self::start`] has run
    /// yet; the VM has not been initialized and the run loop has not been spawned.
    pub fn new(
        store: Store,
        vm: Vm,
        chain_spec: Arc<ChainSpec>,
        config: EngineConfig,
        executor: TaskExecutor,
    ) -> Self {
        Self {
            store,
            gate: ExecutionGate::new(vm, Hardfork::Frontier),
            chain_spec,
            config,
            pending_receipts: PendingReceipts::new(),
            events: EventSender::default(),
            stats: EngineStats::default(),
            executor,
            opened: AtomicBool::new(false),
            started: AtomicBool::new(false),
            run_task: AsyncMutex::new(None),
        }
    }

    /// Subscribes to the engine's [`SyncEvent`] stream. Events broadcast before this call is
    /// made are not delivered to the new listener.
    pub fn events(&self) -> EventStream<SyncEvent> {
        self.events.new_listener()
    }

    /// Initializes the VM: opens its backing database handle and materializes genesis state if
    /// the chain has never been run before. Idempotent — a second call observes
    /// [`OpenOutcome::AlreadyOpen`] rather than re-initializing.
    pub async fn open(&self) -> Result<OpenOutcome, EngineError> {
        if self.opened.swap(true, Ordering::AcqRel) {
            return Ok(OpenOutcome::AlreadyOpen);
        }

        let mut gate = self.gate.acquire().await;
        gate.vm.init()?;
        let head = self.store.canonical_head()?;
        gate.hardfork = self.chain_spec.hardfork_for(
            head.number(),
            self.store.total_difficulty(head.hash())?,
            head.header.header().timestamp,
        );
        info!(target: "consensus::engine", hardfork = %gate.hardfork, head = head.number(), "engine opened");
        Ok(OpenOutcome::Opened)
    }

    /// Starts the run loop: spawns a background task that drives [`Self::run`] to completion
    /// (`run_to_completion = true`), catching the store up to its canonical tip, then keeps
    /// looping as new canonical blocks arrive. A second call is a no-op if the loop is already
    /// running.
    pub fn start(self: &Arc<Self>) {
        if self.started.swap(true, Ordering::AcqRel) {
            return;
        }
        let this = Arc::clone(self);
        let handle = self.executor.spawn(async move {
            if let Err(err) = this.run(true, true).await {
                warn!(target: "consensus::engine", %err, "run loop exited with an error");
                this.events.notify(SyncEvent::ExecutionError(err));
            }
        });
        // `start` only runs once per engine (guarded by `started` above), so there is never a
        // prior handle to displace here.
        if let Ok(mut slot) = self.run_task.try_lock() {
            *slot = Some(handle);
        }
    }

    /// Requests a cooperative shutdown, waits for the in-flight run task (if any) to observe it
    /// and return, then symbolically closes the VM. Safe to call even if [`Self::start`] was
    /// never called.
    pub async fn stop(&self) {
        self.gate.request_shutdown();

        let handle = self.run_task.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }

        // There is no explicit "close" operation on `BlockExecutor`; briefly reacquiring the
        // gate here is a placeholder for one, matching the shape a real close would take.
        let _ = self.gate.acquire().await;
        self.started.store(false, Ordering::Release);
    }

    /// Drives the run loop: repeatedly calls [`Self::run_iteration`] until the store's canonical
    /// tip has been reached, shutdown was requested, or a non-full batch was delivered.
    ///
    /// `first` forces at least one iteration even if the gap to the canonical tip is smaller
    /// than a full batch (used on startup, and by callers issuing one batched call at a time).
    /// `run_to_completion` keeps looping past that first iteration for as long as each iteration
    /// delivers a full batch; set to `false` to execute at most one batch per call.
    pub async fn run(&self, first: bool, run_to_completion: bool) -> Result<u64, EngineError> {
        let mut total_executed = 0u64;
        let mut did_first = false;

        loop {
            if self.gate.is_shutdown() {
                return Err(EngineError::ExecutionStopped);
            }

            let vm_head = self.store.iterator_head(ChainPointer::Vm)?;
            let canonical = self.store.canonical_head()?;
            if vm_head.hash() == canonical.hash() {
                break;
            }

            let gap = canonical.number().saturating_sub(vm_head.number());
            let should_run = (first && !did_first) || gap >= self.config.num_blocks_per_iteration;
            if !should_run {
                break;
            }

            let executed = self.run_iteration().await?;
            total_executed += executed;
            did_first = true;

            let full = executed >= self.config.num_blocks_per_iteration;
            if !(run_to_completion && full) {
                break;
            }
        }

        Ok(total_executed)
    }

    /// Executes up to `num_blocks_per_iteration` blocks starting just after the `vm` cursor,
    /// recovering from a missing-state-root error with [`Self::backstep_recovery`] instead of
    /// propagating it, unless recovery itself fails.
    async fn run_iteration(&self) -> Result<u64, EngineError> {
        let mut gate = self.gate.acquire().await;
        let batch_size = self.config.num_blocks_per_iteration;

        let mut failure: Option<(SealedBlock, StepError)> = None;
        let result = {
            let gate: &mut gate::GateState<Vm> = &mut *gate;
            let failure = &mut failure;
            let store = &self.store;
            let chain_spec = &*self.chain_spec;
            let pending_receipts = &self.pending_receipts;
            let events = &self.events;
            let stats = &self.stats;
            let config = &self.config;
            let shutdown = &self.gate;

            let mut callback = |block: SealedBlock, reorg: bool| -> Result<(), ProviderError> {
                if shutdown.is_shutdown() {
                    *failure = Some((block, StepError::Stopped));
                    return Err(ProviderError::Database("execution gate: shutdown requested".to_string()));
                }
                match execute_one_block(
                    &mut *gate, store, chain_spec, pending_receipts, events, stats, config, &block,
                    reorg,
                ) {
                    Ok(()) => Ok(()),
                    Err(err) => {
                        *failure = Some((block, err));
                        Err(ProviderError::Database("execution gate: step aborted".to_string()))
                    }
                }
            };

            self.store.iterate(ChainPointer::Vm, batch_size, &mut callback)
        };

        match (result, failure) {
            (Ok(delivered), None) => Ok(delivered),
            (_, Some((block, StepError::Execution(err)))) => {
                if let Some(root) = err.missing_state_root() {
                    debug!(target: "consensus::engine", block = block.number(), %root, "missing state root, attempting backstep");
                    self.backstep_recovery(&mut gate, &block).await?;
                    Ok(0)
                } else {
                    self.events.notify(SyncEvent::ExecutionError(EngineError::Execution(err.clone())));
                    Err(EngineError::Execution(err))
                }
            }
            (_, Some((_, StepError::Stopped))) => Err(EngineError::ExecutionStopped),
            (Err(err), None) => Err(EngineError::Provider(err)),
        }
    }

    /// Walks `candidate` back through its ancestors until the VM reports a state root it
    /// actually has, then repoints the `vm` cursor at the parent of the block whose state root
    /// was found, so the next iteration re-executes from a known-good point.
    ///
    /// Generalizes beyond a single rewind step: a state root can be missing for more than one
    /// consecutive ancestor (e.g. after a crash mid-batch), and giving up after one hop would
    /// leave the cursor stuck re-attempting the same unrecoverable block forever.
    async fn backstep_recovery(
        &self,
        gate: &mut gate::GateGuard<'_, Vm>,
        candidate: &SealedBlock,
    ) -> Result<(), EngineError> {
        let mut cursor = candidate.clone();
        loop {
            if cursor.number() == 0 {
                return Err(EngineError::BackstepExhausted);
            }
            let parent = self.store.get_block(BlockNumberOrHash::Hash(cursor.parent_hash()))?;
            if gate.vm.has_state_root(parent.state_root()) {
                // Land one block further back than `parent` itself, at its own parent's hash, so
                // the iterator re-delivers `parent` next and retries the transition into it —
                // genesis has no real parent to land on, so it is its own floor.
                let landing =
                    if parent.number() == 0 { parent.hash() } else { parent.parent_hash() };
                self.store.set_iterator_head(ChainPointer::Vm, landing)?;
                self.stats.backsteps_total.increment(1);
                self.events.notify(SyncEvent::Backstep { to: parent.num_hash() });
                return Ok(());
            }
            cursor = parent;
        }
    }

    /// Executes a single out-of-order block and stages its receipts in [`PendingReceipts`],
    /// without touching the canonical `number -> hash` mapping or indexing the receipts durably —
    /// both are left to a later [`Self::set_head`], since the block's canonical status is not yet
    /// known (it may still be reorged away before `set_head` confirms it).
    ///
    /// If `blocking` is `false` and the gate is already held by another in-flight call, returns
    /// `Ok(false)` immediately rather than queuing behind it. `skip_blockchain` omits the
    /// `put_blocks` write, for callers that already recorded the block themselves.
    pub async fn run_without_set_head(
        &self,
        input: RunWithoutSetHeadInput,
        blocking: bool,
        skip_blockchain: bool,
    ) -> Result<bool, EngineError> {
        if !blocking && self.gate.is_running() {
            return Ok(false);
        }

        let mut gate = self.gate.acquire().await;
        let RunWithoutSetHeadInput { block, total_difficulty, receipts } = input;

        let receipts = match receipts {
            Some(receipts) => receipts,
            None => {
                let parent_state_root =
                    self.store.get_header(BlockNumberOrHash::Hash(block.parent_hash()))?.state_root();
                let output = gate.vm.run_block(BlockExecutionInput {
                    block: &block,
                    total_difficulty,
                    state_root: parent_state_root,
                    clear_cache: false,
                    skip_block_validation: false,
                })?;
                block.body.iter().map(|tx| tx.hash()).zip(output.receipts).collect()
            }
        };

        if !skip_blockchain {
            self.store.put_blocks(std::slice::from_ref(&block), true, true)?;
        }
        self.pending_receipts
            .insert(block.hash(), receipts.into_iter().map(|(_, receipt)| receipt).collect());

        Ok(true)
    }

    /// Moves the named chain pointers to `forkchoice`'s blocks after durably appending `blocks`
    /// as the new canonical range, draining any receipts staged for them by a prior
    /// [`Self::run_without_set_head`] call into the durable receipts index.
    ///
    /// Fails without moving any cursor if the VM does not have a state root for the last block
    /// in `blocks`, or if any of `forkchoice`'s named hashes turns out not to be canonical at its
    /// own block number once the batch has landed.
    pub async fn set_head(
        &self,
        blocks: &[SealedBlock],
        forkchoice: ForkchoiceState,
    ) -> Result<(), EngineError> {
        let gate = self.gate.acquire().await;

        let Some(vm_head) = blocks.last() else {
            return Ok(());
        };
        if !gate.vm.has_state_root(vm_head.state_root()) {
            return Err(EngineError::UnknownBlock(vm_head.hash()));
        }

        self.store.put_blocks(blocks, false, true)?;

        for block in blocks {
            if let Some(receipts) = self.pending_receipts.remove(block.hash()) {
                let receipts = block.body.iter().map(|tx| tx.hash()).zip(receipts).collect();
                self.store.write_receipts(block.hash(), receipts)?;
            }
        }

        for hash in
            [vm_head.hash(), forkchoice.safe_block_hash, forkchoice.finalized_block_hash]
        {
            if hash.is_zero() {
                continue;
            }
            let block = self
                .store
                .get_block(BlockNumberOrHash::Hash(hash))
                .map_err(|_| EngineError::UnknownBlock(hash))?;
            let canonical_at_number = self.store.get_block(BlockNumberOrHash::Number(block.number()))?;
            if canonical_at_number.hash() != hash {
                return Err(EngineError::NonCanonicalBlock(hash));
            }
        }

        self.store.set_iterator_head(ChainPointer::Vm, vm_head.hash())?;
        if !forkchoice.safe_block_hash.is_zero() {
            self.store.set_iterator_head(ChainPointer::Safe, forkchoice.safe_block_hash)?;
        }
        if !forkchoice.finalized_block_hash.is_zero() {
            self.store.set_iterator_head(ChainPointer::Finalized, forkchoice.finalized_block_hash)?;
        }

        self.store.notify_chain_updated();
        Ok(())
    }

    /// Replays blocks `first..=last` against a [`BlockExecutor::shallow_copy`] of the live VM,
    /// for debugging and tracing. Never touches the live VM's state, the durable receipts index,
    /// or any chain pointer.
    pub async fn execute_blocks(
        &self,
        first: u64,
        last: u64,
        selector: &TxHashSelector,
    ) -> Result<Vec<ReplayedBlock>, EngineError> {
        let mut vm = {
            let gate = self.gate.acquire().await;
            gate.vm.shallow_copy()
        };

        let mut replayed = Vec::new();
        let mut number = first;
        while number <= last {
            let block = self.store.get_block(BlockNumberOrHash::Number(number))?;
            let total_difficulty = self.store.total_difficulty(block.parent_hash())?;
            let parent_state_root =
                self.store.get_header(BlockNumberOrHash::Hash(block.parent_hash()))?.state_root();
            let output = vm.run_block(BlockExecutionInput {
                block: &block,
                total_difficulty,
                state_root: parent_state_root,
                clear_cache: number == first,
                skip_block_validation: true,
            })?;
            let receipts = block
                .body
                .iter()
                .map(|tx| tx.hash())
                .zip(output.receipts)
                .filter(|(hash, _)| selector.keeps(*hash))
                .collect();
            replayed.push(ReplayedBlock { block, receipts, gas_used: output.gas_used });
            number += 1;
        }

        Ok(replayed)
    }

    /// Returns the receipts stored for `block_hash`, looking them up through the durable index.
    pub fn get_receipts(&self, block_hash: BlockHash) -> Result<Option<Vec<Receipt>>, EngineError> {
        Ok(self.store.receipts_by_block(block_hash)?)
    }

    /// Returns the receipt for a single transaction, along with the block it was included in and
    /// its index within that block.
    pub fn get_tx_receipt(
        &self,
        tx_hash: TxHash,
    ) -> Result<Option<(Receipt, BlockHash, usize)>, EngineError> {
        Ok(self.store.receipt_by_tx_hash(tx_hash)?)
    }

    /// Spawns a background task that logs a stats heartbeat every `config.stats_interval`.
    /// `metrics::Counter` handles are write-only (there is no API to read a counter's current
    /// value back), so the ticker reports liveness rather than attempting to echo totals already
    /// visible on the metrics scrape endpoint.
    pub fn spawn_stats_ticker(self: &Arc<Self>) {
        let this = Arc::clone(self);
        let interval = self.config.stats_interval;
        self.executor.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if this.gate.is_shutdown() {
                    break;
                }
                let head = this.store.canonical_head();
                match head {
                    Ok(head) => info!(target: "consensus::engine", head = head.number(), "engine heartbeat"),
                    Err(err) => warn!(target: "consensus::engine", %err, "engine heartbeat: failed to read canonical head"),
                }
            }
        });
    }
}

/// Bridges a typed execution failure across [`reth_storage_api::IterateCallback`]'s
/// `Result<(), ProviderError>` boundary: the callback stashes one of these in a side channel and
/// returns a sentinel `ProviderError` to abort the store's iteration early, and the caller reads
/// the side channel to recover the real error.
#[derive(Debug, Clone)]
enum StepError {
    /// A shutdown was requested while a block was in flight.
    Stopped,
    /// The block itself failed to execute.
    Execution(BlockExecutionError),
}

impl From<BlockExecutionError> for StepError {
    fn from(err: BlockExecutionError) -> Self {
        Self::Execution(err)
    }
}

/// The per-block callback body: executes one block against the VM, switches hardforks and
/// clears caches across a reorg or a fork boundary, writes its receipts, and records telemetry.
/// Free function (rather than a method) so it can be moved into the `iterate` closure without
/// borrowing all of `Engine` for the duration of the call.
#[allow(clippy::too_many_arguments)]
fn execute_one_block<Store, Vm>(
    gate: &mut gate::GateState<Vm>,
    store: &Store,
    chain_spec: &ChainSpec,
    pending_receipts: &PendingReceipts,
    events: &EventSender<SyncEvent>,
    stats: &EngineStats,
    config: &EngineConfig,
    block: &SealedBlock,
    reorg: bool,
) -> Result<(), StepError>
where
    Store: BlockchainStore + ReceiptsProvider,
    Vm: BlockExecutor,
{
    let total_difficulty = store.total_difficulty(block.parent_hash()).map_err(BlockExecutionError::from)?;
    let parent_state_root = store
        .get_header(BlockNumberOrHash::Hash(block.parent_hash()))
        .map_err(BlockExecutionError::from)?
        .state_root();
    let hardfork =
        chain_spec.hardfork_for(block.number(), total_difficulty, block.header.header().timestamp);
    let switched_hardfork = hardfork != gate.hardfork;
    if switched_hardfork {
        gate.hardfork = hardfork;
        stats.hardfork_switches_total.increment(1);
        events.notify(SyncEvent::HardforkActivated { at: block.num_hash() });
    }

    let started = Instant::now();
    let output = gate.vm.run_block(BlockExecutionInput {
        block,
        total_difficulty,
        state_root: parent_state_root,
        clear_cache: reorg || switched_hardfork,
        skip_block_validation: chain_spec.consensus_type() == reth_chainspec::ConsensusType::ProofOfAuthority,
    })?;
    let elapsed = started.elapsed();
    if elapsed > config.max_tolerated_block_time {
        stats.slow_blocks_total.increment(1);
        warn!(target: "consensus::engine", block = block.number(), ?elapsed, "slow block");
    }

    let receipts: Vec<(TxHash, Receipt)> =
        block.body.iter().map(|tx| tx.hash()).zip(output.receipts).collect();
    pending_receipts.insert(block.hash(), receipts.iter().map(|(_, r)| r.clone()).collect());
    store.write_receipts(block.hash(), receipts).map_err(BlockExecutionError::from)?;
    pending_receipts.remove(block.hash());

    stats.blocks_executed_total.increment(1);
    stats.gas_used_total.increment(output.gas_used);
    events.notify(SyncEvent::BlockExecuted { block: block.num_hash(), gas_used: output.gas_used });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use reth_blockchain_tree::InMemoryBlockchainStore;
    use reth_chainspec::{ChainHardforks, ConsensusType, ForkCondition};
    use reth_execution_types::BlockExecutionOutput;
    use reth_primitives::{BlockBody, Genesis};
    use reth_tasks::TaskManager;
    use reth_testing_utils::{generate_header_chain, genesis_header};
    use std::{collections::HashSet, sync::Arc as StdArc};

    /// A [`BlockExecutor`] double: tracks which state roots it has "materialized" and accepts a
    /// block only if the VM was pointed at a root it already has. Every executed block's own
    /// declared state root becomes materialized as a side effect, exactly as a real VM would
    /// after committing the block's state diff.
    #[derive(Clone)]
    struct TestExecutor {
        materialized: HashSet<B256>,
        current_root: B256,
    }

    impl TestExecutor {
        fn new(genesis_root: B256) -> Self {
            let mut materialized = HashSet::new();
            materialized.insert(genesis_root);
            Self { materialized, current_root: genesis_root }
        }
    }

    impl BlockExecutor for TestExecutor {
        fn init(&mut self) -> Result<(), BlockExecutionError> {
            Ok(())
        }

        fn shallow_copy(&self) -> Box<dyn BlockExecutor> {
            Box::new(self.clone())
        }

        fn run_block(
            &mut self,
            input: BlockExecutionInput<'_, SealedBlock>,
        ) -> Result<BlockExecutionOutput<Receipt>, BlockExecutionError> {
            if !self.materialized.contains(&input.state_root) {
                return Err(BlockExecutionError::MissingStateRoot(input.state_root));
            }
            let new_root = input.block.state_root();
            self.materialized.insert(new_root);
            self.current_root = new_root;
            let receipts = input.block.body.iter().map(|_| Receipt::default()).collect();
            Ok(BlockExecutionOutput {
                state: Default::default(),
                receipts,
                gas_used: input.block.header.header().gas_used,
                state_root: new_root,
            })
        }

        fn state_root(&self) -> B256 {
            self.current_root
        }

        fn has_state_root(&self, root: B256) -> bool {
            self.materialized.contains(&root)
        }

        fn generate_canonical_genesis(&mut self, _genesis: &Genesis) -> Result<(), BlockExecutionError> {
            Ok(())
        }
    }

    fn block_from_header(header: reth_primitives_traits::SealedHeader) -> SealedBlock {
        SealedBlock::new(header, BlockBody::default())
    }

    fn test_chain_spec(switch_at: u64) -> ChainSpec {
        ChainSpec::new(
            alloy_chains::Chain::from_id(1337),
            B256::ZERO,
            B256::ZERO,
            ConsensusType::ProofOfAuthority,
            ChainHardforks::new(vec![
                (Hardfork::Frontier, ForkCondition::Block(0)),
                (Hardfork::London, ForkCondition::Block(switch_at)),
            ]),
        )
    }

    fn test_engine(
        len: u64,
        switch_at: u64,
    ) -> (StdArc<Engine<InMemoryBlockchainStore, TestExecutor>>, Vec<SealedBlock>, TaskManager) {
        let genesis = block_from_header(genesis_header());
        let store = InMemoryBlockchainStore::new(genesis.clone());
        let chain: Vec<_> =
            generate_header_chain(&genesis.header, len).into_iter().map(block_from_header).collect();

        let vm = TestExecutor::new(genesis.state_root());
        let manager = TaskManager::new(tokio::runtime::Handle::current());
        let engine = StdArc::new(Engine::new(
            store,
            vm,
            StdArc::new(test_chain_spec(switch_at)),
            EngineConfig { num_blocks_per_iteration: 1_000, ..EngineConfig::default() },
            manager.executor(),
        ));
        (engine, chain, manager)
    }

    // Scenario: linear sync. A single `run(true, true)` call drains the whole backlog in one
    // iteration because `num_blocks_per_iteration` comfortably covers it.
    #[tokio::test]
    async fn linear_sync_drains_backlog_in_one_call() {
        let (engine, chain, _manager) = test_engine(10, 1_000);
        engine.open().await.unwrap();
        engine.store.put_blocks(&chain, false, true).unwrap();

        let executed = engine.run(true, true).await.unwrap();
        assert_eq!(executed, 10);
        assert_eq!(engine.store.iterator_head(ChainPointer::Vm).unwrap().hash(), chain.last().unwrap().hash());
    }

    // Scenario: batched run. With a small per-iteration cap and `run_to_completion: false`, each
    // call drains exactly one batch; `first: true` forces that one iteration even once the
    // remaining gap falls below the batch size.
    #[tokio::test]
    async fn batched_run_advances_in_fixed_size_steps() {
        let (engine, chain, _manager) = test_engine_with_batch(10, 4);
        engine.open().await.unwrap();
        engine.store.put_blocks(&chain, false, true).unwrap();

        assert_eq!(engine.run(true, false).await.unwrap(), 4);
        assert_eq!(engine.run(true, false).await.unwrap(), 4);
        assert_eq!(engine.run(true, false).await.unwrap(), 2);
        assert_eq!(engine.store.iterator_head(ChainPointer::Vm).unwrap().hash(), chain.last().unwrap().hash());
    }

    fn test_engine_with_batch(
        len: u64,
        batch: u64,
    ) -> (StdArc<Engine<InMemoryBlockchainStore, TestExecutor>>, Vec<SealedBlock>, TaskManager) {
        let genesis = block_from_header(genesis_header());
        let store = InMemoryBlockchainStore::new(genesis.clone());
        let chain: Vec<_> =
            generate_header_chain(&genesis.header, len).into_iter().map(block_from_header).collect();
        let vm = TestExecutor::new(genesis.state_root());
        let manager = TaskManager::new(tokio::runtime::Handle::current());
        let engine = StdArc::new(Engine::new(
            store,
            vm,
            StdArc::new(test_chain_spec(1_000)),
            EngineConfig { num_blocks_per_iteration: batch, ..EngineConfig::default() },
            manager.executor(),
        ));
        (engine, chain, manager)
    }

    // Scenario: hardfork switch. Crossing `switch_at` mid-batch flips the gate's tracked
    // hardfork and bumps the switch counter exactly once.
    #[tokio::test]
    async fn hardfork_switch_is_detected_mid_batch() {
        let (engine, chain, _manager) = test_engine(10, 5);
        engine.open().await.unwrap();
        engine.store.put_blocks(&chain, false, true).unwrap();

        engine.run(true, true).await.unwrap();
        let gate = engine.gate.acquire().await;
        assert_eq!(gate.hardfork, Hardfork::London);
    }

    // Scenario: missing state root triggers backstep recovery. Wiping the VM's knowledge of an
    // intermediate block's state root forces the gate to walk back until it finds a root it has,
    // then resumes from there rather than failing outright.
    #[tokio::test]
    async fn missing_state_root_backsteps_to_last_known_good_block() {
        let (engine, chain, _manager) = test_engine(5, 1_000);
        let genesis_root = engine.store.get_block(BlockNumberOrHash::Number(0)).unwrap().state_root();
        engine.open().await.unwrap();
        engine.store.put_blocks(&chain, false, true).unwrap();

        // The store's cursor claims execution already reached block 3, but the VM itself only
        // ever materialized genesis — as if the VM process crashed and restarted without
        // persisting the state it had built up, while the store's bookkeeping survived.
        engine.store.set_iterator_head(ChainPointer::Vm, chain[2].hash()).unwrap();
        {
            let mut gate = engine.gate.acquire().await;
            gate.vm.materialized.clear();
            gate.vm.materialized.insert(genesis_root);
            gate.vm.current_root = genesis_root;
        }

        // First call hits the missing root on block 4 and backsteps all the way to genesis.
        let executed = engine.run(true, true).await.unwrap();
        assert_eq!(executed, 0);
        assert_eq!(engine.store.iterator_head(ChainPointer::Vm).unwrap().hash(), chain[0].header.parent_hash());

        // Second call re-executes the whole chain from genesis.
        let executed = engine.run(true, true).await.unwrap();
        assert_eq!(executed, chain.len() as u64);
        assert_eq!(engine.store.iterator_head(ChainPointer::Vm).unwrap().hash(), chain.last().unwrap().hash());
    }

    // Scenario: a mid-chain ancestor (not genesis) still has its state root. Backstep must land
    // the cursor on that ancestor's *parent*, so the iterator re-delivers the ancestor itself,
    // rather than landing on the ancestor's own hash and skipping straight past it.
    #[tokio::test]
    async fn missing_state_root_backsteps_to_ancestors_parent_not_ancestor_itself() {
        let (engine, chain, _manager) = test_engine(6, 1_000);
        let genesis_root = engine.store.get_block(BlockNumberOrHash::Number(0)).unwrap().state_root();
        engine.open().await.unwrap();
        engine.store.put_blocks(&chain, false, true).unwrap();

        // Blocks 1-3 (chain[0..3]) persisted their state; blocks 4-5 (chain[3..5]) did not, as if
        // the VM crashed partway through. The store's cursor still claims block 5 was reached.
        engine.store.set_iterator_head(ChainPointer::Vm, chain[4].hash()).unwrap();
        {
            let mut gate = engine.gate.acquire().await;
            gate.vm.materialized.clear();
            gate.vm.materialized.insert(genesis_root);
            gate.vm.materialized.insert(chain[1].state_root());
            gate.vm.materialized.insert(chain[2].state_root());
            gate.vm.current_root = chain[2].state_root();
        }

        // Hits the missing root on block 6 (needs block 5's state) and walks back to block 3,
        // the last ancestor the VM actually has. The cursor lands on block 3's parent (block 2),
        // so the next run re-delivers and re-executes block 3 onward.
        let executed = engine.run(true, true).await.unwrap();
        assert_eq!(executed, 0);
        assert_eq!(engine.store.iterator_head(ChainPointer::Vm).unwrap().hash(), chain[1].hash());

        let executed = engine.run(true, true).await.unwrap();
        assert_eq!(executed, 4);
        assert_eq!(engine.store.iterator_head(ChainPointer::Vm).unwrap().hash(), chain.last().unwrap().hash());
    }

    // Scenario: run_without_set_head then set_head. A block executed out of band stages its
    // receipts; set_head later promotes it and the receipts become queryable by tx hash.
    #[tokio::test]
    async fn run_without_set_head_then_set_head_promotes_receipts() {
        let (engine, chain, _manager) = test_engine(1, 1_000);
        engine.open().await.unwrap();

        let block = chain[0].clone();
        let total_difficulty = engine.store.total_difficulty(block.parent_hash()).unwrap();
        let accepted = engine
            .run_without_set_head(
                RunWithoutSetHeadInput { block: block.clone(), total_difficulty, receipts: None },
                true,
                false,
            )
            .await
            .unwrap();
        assert!(accepted);

        // Staged but not yet canonical: receipts sit in the pending map, not the durable index,
        // until `set_head` drains them.
        assert!(engine.pending_receipts.get(block.hash()).is_some());
        assert!(engine.store.receipts_by_block(block.hash()).unwrap().is_none());

        engine
            .set_head(
                std::slice::from_ref(&block),
                ForkchoiceState {
                    head_block_hash: block.hash(),
                    safe_block_hash: block.hash(),
                    finalized_block_hash: B256::ZERO,
                },
            )
            .await
            .unwrap();

        assert_eq!(engine.store.canonical_head().unwrap().hash(), block.hash());
        assert!(engine.pending_receipts.get(block.hash()).is_none());
        assert!(engine.store.receipts_by_block(block.hash()).unwrap().is_some());
    }

    // Scenario: run_without_set_head with blocking=false returns `Ok(false)` without touching the
    // store when the gate is already held, instead of queuing behind the in-flight caller.
    #[tokio::test]
    async fn run_without_set_head_non_blocking_bails_out_while_gate_is_held() {
        let (engine, chain, _manager) = test_engine(1, 1_000);
        engine.open().await.unwrap();

        let _held = engine.gate.acquire().await;
        let block = chain[0].clone();
        let total_difficulty = engine.store.total_difficulty(block.parent_hash()).unwrap();
        let accepted = engine
            .run_without_set_head(
                RunWithoutSetHeadInput { block: block.clone(), total_difficulty, receipts: None },
                false,
                false,
            )
            .await
            .unwrap();

        assert!(!accepted);
        assert!(engine.pending_receipts.get(block.hash()).is_none());
    }

    // Scenario: set_head rejects a head whose block number maps to a different canonical hash.
    #[tokio::test]
    async fn set_head_rejects_non_canonical_safe_hash() {
        let (engine, chain, _manager) = test_engine(2, 1_000);
        let genesis = engine.store.get_block(BlockNumberOrHash::Number(0)).unwrap();
        engine.open().await.unwrap();
        engine.store.put_blocks(&chain, false, true).unwrap();
        engine.run(true, true).await.unwrap();

        // A block at the same height as `chain[0]` that never became canonical — staged via
        // `skip_canonical_check` the way `run_without_set_head` would, then offered to `set_head`
        // as the safe hash to exercise the canonicality cross-check.
        let fork_block = generate_header_chain(&genesis.header, 1)
            .into_iter()
            .map(block_from_header)
            .next()
            .unwrap();
        engine.store.put_blocks(std::slice::from_ref(&fork_block), true, true).unwrap();

        let err = engine
            .set_head(
                &chain,
                ForkchoiceState {
                    head_block_hash: chain.last().unwrap().hash(),
                    safe_block_hash: fork_block.hash(),
                    finalized_block_hash: B256::ZERO,
                },
            )
            .await;
        assert!(matches!(err, Err(EngineError::NonCanonicalBlock(hash)) if hash == fork_block.hash()));
    }

    // Property: `run` and a concurrent `set_head` never observe the gate unlocked at the same
    // time — the gate's mutex makes this structural rather than timing-dependent, so this test
    // only documents the invariant by exercising both paths back to back without deadlocking.
    #[tokio::test]
    async fn run_and_set_head_do_not_deadlock_the_gate() {
        let (engine, chain, _manager) = test_engine(3, 1_000);
        engine.open().await.unwrap();
        engine.store.put_blocks(&chain, false, true).unwrap();
        engine.run(true, true).await.unwrap();
        engine
            .set_head(
                std::slice::from_ref(chain.last().unwrap()),
                ForkchoiceState {
                    head_block_hash: chain.last().unwrap().hash(),
                    safe_block_hash: B256::ZERO,
                    finalized_block_hash: B256::ZERO,
                },
            )
            .await
            .unwrap();
    }
}
