/// A named Ethereum mainnet protocol ruleset activation.
///
/// Ordered by activation so that `Hardfork::Shanghai > Hardfork::Paris` etc. holds via derived
/// `PartialOrd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hardfork {
    /// Frontier, the genesis ruleset.
    Frontier,
    /// Homestead.
    Homestead,
    /// Tangerine Whistle (EIP-150).
    Tangerine,
    /// Spurious Dragon.
    SpuriousDragon,
    /// Byzantium.
    Byzantium,
    /// Constantinople.
    Constantinople,
    /// Petersburg.
    Petersburg,
    /// Istanbul.
    Istanbul,
    /// Muir Glacier.
    MuirGlacier,
    /// Berlin.
    Berlin,
    /// London (EIP-1559).
    London,
    /// Arrow Glacier.
    ArrowGlacier,
    /// Gray Glacier.
    GrayGlacier,
    /// Paris, the Merge. Transitions consensus from proof-of-work to proof-of-stake.
    Paris,
    /// Shanghai, adds validator withdrawals.
    Shanghai,
    /// Cancun, adds blob transactions (EIP-4844) and the beacon-root contract (EIP-4788).
    Cancun,
    /// Prague.
    Prague,
}

impl Hardfork {
    /// Returns `true` if this hardfork activates consensus changes that only make sense
    /// post-Merge (beacon root contract, withdrawals).
    pub const fn is_post_merge(&self) -> bool {
        matches!(self, Self::Paris | Self::Shanghai | Self::Cancun | Self::Prague)
    }
}

impl core::fmt::Display for Hardfork {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

/// The consensus mechanism a chain configuration runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsensusType {
    /// Proof of work.
    ProofOfWork,
    /// Proof of authority (signer rotation); block-body validation beyond the signature is
    /// skipped by the execution gate (see [`crate::ChainHardforks`] consumers).
    ProofOfAuthority,
    /// Proof of stake, driven by an external consensus client via the engine API.
    ProofOfStake,
}
