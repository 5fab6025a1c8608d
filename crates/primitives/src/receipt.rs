use alloy_primitives::{Bloom, Log};
use reth_primitives_traits::logs_bloom;
use serde::{Deserialize, Serialize};

/// The outcome of executing a single transaction: status, cumulative gas, and emitted logs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Receipt {
    /// Transaction type, mirroring [`alloy_consensus::TxType`] as a raw byte for forward
    /// compatibility with new transaction types.
    pub tx_type: u8,
    /// Whether the transaction succeeded.
    pub success: bool,
    /// Gas used by this transaction, cumulative across the block up to and including it.
    pub cumulative_gas_used: u64,
    /// Logs emitted by this transaction.
    pub logs: Vec<Log>,
}

impl Receipt {
    /// Computes the logs bloom filter for this receipt.
    pub fn bloom(&self) -> Bloom {
        logs_bloom(self.logs.iter())
    }

    /// Pairs this receipt with its bloom filter.
    pub fn with_bloom(self) -> ReceiptWithBloom {
        let bloom = self.bloom();
        ReceiptWithBloom { receipt: self, bloom }
    }
}

/// A [`Receipt`] paired with its precomputed bloom filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptWithBloom {
    /// The receipt.
    pub receipt: Receipt,
    /// The receipt's logs bloom.
    pub bloom: Bloom,
}

/// Reference variant of [`ReceiptWithBloom`], used to avoid cloning receipts when only a
/// reference is needed (e.g. computing the receipts root).
#[derive(Debug, Clone, Copy)]
pub struct ReceiptWithBloomRef<'a> {
    /// The receipt.
    pub receipt: &'a Receipt,
    /// The receipt's logs bloom.
    pub bloom: Bloom,
}

/// All receipts produced by executing a block, one per transaction in order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Receipts(pub Vec<Receipt>);

impl Receipts {
    /// Wraps a vec of receipts.
    pub const fn new(receipts: Vec<Receipt>) -> Self {
        Self(receipts)
    }

    /// Total gas used by the block, taken from the last receipt's cumulative gas used.
    pub fn gas_used(&self) -> u64 {
        self.0.last().map_or(0, |receipt| receipt.cumulative_gas_used)
    }

    /// Combined logs bloom across every receipt in the block.
    pub fn bloom(&self) -> Bloom {
        self.0.iter().fold(Bloom::ZERO, |mut bloom, receipt| {
            bloom.accrue_bloom(&receipt.bloom());
            bloom
        })
    }
}

/// Sum of gas used across a prefix of receipts, used for the `BlockGasUsed` mismatch error's
/// per-transaction breakdown.
pub fn gas_spent_by_transactions(receipts: &[Receipt]) -> Vec<(u64, u64)> {
    receipts.iter().enumerate().map(|(i, r)| (i as u64, r.cumulative_gas_used)).collect()
}
