use alloy_primitives::U256;

/// The trigger that activates a [`Hardfork`](crate::Hardfork).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForkCondition {
    /// Active from a given block number (inclusive).
    Block(u64),
    /// Active once the chain's total difficulty reaches or exceeds this value.
    ///
    /// Only ever used for the Paris (the Merge) transition.
    TTD {
        /// Total difficulty threshold.
        total_difficulty: U256,
        /// Block number at which the fork is guaranteed active regardless of `total_difficulty`,
        /// used once the network has fully merged and new blocks carry no difficulty at all.
        fallback_block: u64,
    },
    /// Active from a given block timestamp (inclusive), used for post-Merge forks.
    Timestamp(u64),
    /// Never active. Used as a placeholder for forks that are defined but not yet scheduled.
    Never,
}

impl ForkCondition {
    /// Returns `true` if the condition is satisfied by the given block parameters.
    pub fn active_at(&self, block_number: u64, total_difficulty: U256, timestamp: u64) -> bool {
        match *self {
            Self::Block(activation) => block_number >= activation,
            Self::TTD { total_difficulty: ttd, fallback_block } => {
                total_difficulty >= ttd || block_number >= fallback_block
            }
            Self::Timestamp(activation) => timestamp >= activation,
            Self::Never => false,
        }
    }

    /// Returns the block number at which this condition activates, if it is block-based.
    pub const fn block_number(&self) -> Option<u64> {
        match self {
            Self::Block(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the timestamp at which this condition activates, if it is timestamp-based.
    pub const fn timestamp(&self) -> Option<u64> {
        match self {
            Self::Timestamp(timestamp) => Some(*timestamp),
            _ => None,
        }
    }
}
