//! Human-readable gas unit constants.

/// 1 thousand gas units.
pub const KILOGAS: u64 = 1_000;

/// 1 million gas units.
pub const MEGAGAS: u64 = 1_000_000;

/// 1 billion gas units.
pub const GIGAGAS: u64 = 1_000_000_000;
