//! Concrete [`reth_evm::BlockExecutor`] built on `revm`.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod processor;
mod state_change;

pub use processor::EvmBlockExecutor;
pub use state_change::{apply_beacon_root_contract_call, post_block_balance_increments};

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{B256, U256};
    use reth_chainspec::mainnet;
    use reth_evm::BlockExecutor as _;
    use reth_execution_types::BlockExecutionInput;
    use reth_primitives::{BlockBody, SealedBlock, SealedHeader};
    use std::sync::Arc;

    #[test]
    fn run_block_without_a_state_provider_reports_missing_state_root() {
        let mut executor = EvmBlockExecutor::new(Arc::new(mainnet()));
        let header = SealedHeader::new(Default::default(), B256::ZERO);
        let block = SealedBlock::new(header, BlockBody::default());

        let result = executor.run_block(BlockExecutionInput {
            block: &block,
            total_difficulty: U256::ZERO,
            state_root: B256::with_last_byte(1),
            clear_cache: true,
            skip_block_validation: false,
        });

        let error = result.expect_err("no state provider is wired up in this test");
        assert_eq!(error.missing_state_root(), Some(B256::with_last_byte(1)));
    }
}
