//! Ethereum hardfork activation types, shared by [`reth_chainspec`] and the execution gate.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod chain_hardforks;
mod condition;
mod hardfork;

pub use chain_hardforks::ChainHardforks;
pub use condition::ForkCondition;
pub use hardfork::{ConsensusType, Hardfork};
