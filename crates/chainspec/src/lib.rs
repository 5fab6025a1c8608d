//! Chain configuration: genesis parameters and hardfork activation schedule.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod spec;

pub use spec::{mainnet, ChainSpec};
pub use reth_ethereum_forks::{ChainHardforks, ConsensusType, ForkCondition, Hardfork};

use alloy_primitives::{b256, B256};

/// Genesis hash of Ethereum mainnet.
pub const MAINNET_GENESIS_HASH: B256 =
    b256!("d4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3");

/// Genesis hash of the Sepolia testnet.
pub const SEPOLIA_GENESIS_HASH: B256 =
    b256!("25a5cc106eea7138acab33231d7160d69cb777ee0c2c553fcddf5138993e6dd6");

/// Genesis hash of the Holesky testnet.
pub const HOLESKY_GENESIS_HASH: B256 =
    b256!("b5f7f912443c940f21fd611f12828d75b534364ed9e95ca4e307729a4661bde4");
