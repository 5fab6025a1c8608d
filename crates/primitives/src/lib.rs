//! Block, transaction and receipt types used throughout the execution gate.
//!
//! This is a focused re-export hub, not a general-purpose Ethereum types crate: it carries only
//! what the execution core and its in-memory reference store need.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub use alloy_primitives::{
    self, address, b256, Address, BlockHash, BlockNumber, Bloom, BloomInput, bytes, Bytes,
    ChainId, keccak256, Log, StorageKey, StorageValue, TxHash, TxIndex, TxNumber, B256, U256,
};
pub use revm_primitives::{self};

pub use block::{
    Block, BlockBody, BlockHashOrNumber, BlockId, BlockNumberOrTag, BlockNumHash, RpcBlockHash,
    SealedBlock, SealedBlockWithSenders,
};
pub use constants::{DEV_GENESIS_HASH, EIP1559_INITIAL_BASE_FEE, EMPTY_OMMER_ROOT_HASH};
pub use genesis::{ChainConfig, Genesis, GenesisAccount};
pub use receipt::{
    gas_spent_by_transactions, Receipt, Receipts, ReceiptWithBloom, ReceiptWithBloomRef,
};
pub use reth_ethereum_forks::*;
pub use reth_primitives_traits::{Account, GotExpected, GotExpectedBoxed, Header, Log as LogEntry, SealedHeader, Withdrawal, Withdrawals};
pub use transaction::{
    public_key_to_address, recover_signer_unchecked, TransactionSigned, TransactionSignedEcRecovered,
};

mod block;
pub mod constants;
pub mod genesis;
pub mod proofs;
mod receipt;
pub mod transaction;
