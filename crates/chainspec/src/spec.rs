use alloy_chains::Chain;
use alloy_primitives::{B256, U256};
use reth_ethereum_forks::{ChainHardforks, ConsensusType, ForkCondition, Hardfork};
use std::sync::Arc;

/// The static, validated parameters of a chain: its identity, genesis block, and hardfork
/// activation schedule.
///
/// Cheaply cloneable (`hardforks` is the only non-trivial field and lives behind an `Arc`).
#[derive(Debug, Clone)]
pub struct ChainSpec {
    /// EIP-155 chain id.
    pub chain: Chain,
    /// Hash of the genesis block.
    pub genesis_hash: B256,
    /// State root committed to by the genesis block.
    pub genesis_state_root: B256,
    /// Consensus mechanism this chain runs (affects which validations the execution gate may
    /// skip, see [`ChainSpec::consensus_type`]).
    pub consensus_type: ConsensusType,
    hardforks: Arc<ChainHardforks>,
}

impl ChainSpec {
    /// Builds a chain spec from its identity and an explicit, activation-ordered hardfork table.
    pub fn new(
        chain: Chain,
        genesis_hash: B256,
        genesis_state_root: B256,
        consensus_type: ConsensusType,
        hardforks: ChainHardforks,
    ) -> Self {
        Self { chain, genesis_hash, genesis_state_root, consensus_type, hardforks: Arc::new(hardforks) }
    }

    /// EIP-155 chain id as a plain integer.
    pub fn chain_id(&self) -> u64 {
        self.chain.id()
    }

    /// The consensus mechanism this chain runs.
    pub const fn consensus_type(&self) -> ConsensusType {
        self.consensus_type
    }

    /// Returns the latest hardfork active at the given block parameters.
    pub fn hardfork_for(&self, block_number: u64, total_difficulty: U256, timestamp: u64) -> Hardfork {
        self.hardforks.fork_for(block_number, total_difficulty, timestamp)
    }

    /// Returns `true` if `fork` is active at the given block parameters.
    pub fn is_active_at_or_after(
        &self,
        fork: Hardfork,
        block_number: u64,
        total_difficulty: U256,
        timestamp: u64,
    ) -> bool {
        self.hardforks.is_active_at_or_after(fork, block_number, total_difficulty, timestamp)
    }

    /// The activation condition for a given fork, if this spec schedules it.
    pub fn fork(&self, fork: Hardfork) -> Option<ForkCondition> {
        self.hardforks.fork(fork)
    }
}

/// Ethereum mainnet chain spec.
pub fn mainnet() -> ChainSpec {
    use Hardfork::*;
    ChainSpec::new(
        Chain::mainnet(),
        crate::MAINNET_GENESIS_HASH,
        alloy_primitives::b256!(
            "d7f8974fb5ac78d9ac099b9ad5018bedc2ce0a72dad1827a1709da30580f0544"
        ),
        ConsensusType::ProofOfWork,
        ChainHardforks::new(vec![
            (Frontier, ForkCondition::Block(0)),
            (Homestead, ForkCondition::Block(1_150_000)),
            (Tangerine, ForkCondition::Block(2_463_000)),
            (SpuriousDragon, ForkCondition::Block(2_675_000)),
            (Byzantium, ForkCondition::Block(4_370_000)),
            (Constantinople, ForkCondition::Block(7_280_000)),
            (Petersburg, ForkCondition::Block(7_280_000)),
            (Istanbul, ForkCondition::Block(9_069_000)),
            (MuirGlacier, ForkCondition::Block(9_200_000)),
            (Berlin, ForkCondition::Block(12_244_000)),
            (London, ForkCondition::Block(12_965_000)),
            (ArrowGlacier, ForkCondition::Block(13_773_000)),
            (GrayGlacier, ForkCondition::Block(15_050_000)),
            (
                Paris,
                ForkCondition::TTD {
                    total_difficulty: U256::from(58_750_000_000_000_000_000_000u128),
                    fallback_block: 15_537_394,
                },
            ),
            (Shanghai, ForkCondition::Timestamp(1_681_338_455)),
            (Cancun, ForkCondition::Timestamp(1_710_338_135)),
        ]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_hardfork_lookup() {
        let spec = mainnet();
        assert_eq!(spec.hardfork_for(0, U256::ZERO, 0), Hardfork::Frontier);
        assert_eq!(spec.hardfork_for(20_000_000, U256::ZERO, 1_720_000_000), Hardfork::Cancun);
        assert_eq!(spec.consensus_type(), ConsensusType::ProofOfWork);
    }
}
