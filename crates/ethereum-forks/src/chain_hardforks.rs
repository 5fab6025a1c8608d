use crate::{ForkCondition, Hardfork};
use alloy_primitives::U256;

/// An ordered lookup table mapping each [`Hardfork`] to its [`ForkCondition`].
///
/// Built once per chain spec and queried on every block during execution, so lookups are a
/// linear scan over a short, already-sorted `Vec` rather than a hash map.
#[derive(Debug, Clone, Default)]
pub struct ChainHardforks {
    forks: Vec<(Hardfork, ForkCondition)>,
}

impl ChainHardforks {
    /// Builds a table from an explicit list, which must already be in activation order.
    pub fn new(forks: Vec<(Hardfork, ForkCondition)>) -> Self {
        Self { forks }
    }

    /// Condition under which `fork` activates, if this table defines one.
    pub fn fork(&self, fork: Hardfork) -> Option<ForkCondition> {
        self.forks.iter().find(|(hf, _)| *hf == fork).map(|(_, cond)| *cond)
    }

    /// Returns `true` if `fork` is active at the given block parameters.
    pub fn is_active_at_or_after(
        &self,
        fork: Hardfork,
        block_number: u64,
        total_difficulty: U256,
        timestamp: u64,
    ) -> bool {
        self.fork(fork)
            .is_some_and(|cond| cond.active_at(block_number, total_difficulty, timestamp))
    }

    /// Returns the latest hardfork active at the given block parameters.
    ///
    /// Falls back to [`Hardfork::Frontier`] if the table is empty or nothing is active yet,
    /// matching genesis behavior.
    pub fn fork_for(&self, block_number: u64, total_difficulty: U256, timestamp: u64) -> Hardfork {
        self.forks
            .iter()
            .rev()
            .find(|(_, cond)| cond.active_at(block_number, total_difficulty, timestamp))
            .map(|(hf, _)| *hf)
            .unwrap_or(Hardfork::Frontier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ChainHardforks {
        ChainHardforks::new(vec![
            (Hardfork::Frontier, ForkCondition::Block(0)),
            (Hardfork::London, ForkCondition::Block(12_965_000)),
            (
                Hardfork::Paris,
                ForkCondition::TTD { total_difficulty: U256::from(58_750_000_000_000_000_000_000u128), fallback_block: 15_537_394 },
            ),
            (Hardfork::Shanghai, ForkCondition::Timestamp(1_681_338_455)),
            (Hardfork::Cancun, ForkCondition::Timestamp(1_710_338_135)),
        ])
    }

    #[test]
    fn picks_latest_active_fork() {
        let t = table();
        assert_eq!(t.fork_for(0, U256::ZERO, 0), Hardfork::Frontier);
        assert_eq!(t.fork_for(13_000_000, U256::ZERO, 0), Hardfork::London);
        assert_eq!(t.fork_for(15_537_394, U256::ZERO, 0), Hardfork::Paris);
        assert_eq!(t.fork_for(18_000_000, U256::ZERO, 1_700_000_000), Hardfork::Paris);
        assert_eq!(t.fork_for(19_000_000, U256::ZERO, 1_710_338_135), Hardfork::Cancun);
    }

    #[test]
    fn is_active_at_or_after_matches_fork_for() {
        let t = table();
        assert!(t.is_active_at_or_after(Hardfork::London, 13_000_000, U256::ZERO, 0));
        assert!(!t.is_active_at_or_after(Hardfork::Shanghai, 13_000_000, U256::ZERO, 0));
    }
}
