//! In-memory staging for state the execution gate has produced but not yet durably indexed.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use alloy_primitives::B256;
use parking_lot::Mutex;
use reth_primitives::Receipt;
use std::collections::HashMap;

/// Receipts for blocks that have been executed but whose durable write to the
/// [`ReceiptsProvider`](reth_storage_api::ReceiptsProvider) has not yet completed.
///
/// The per-block callback inserts a block's receipts here the instant execution finishes, then
/// awaits the durable write, then removes the entry. A reader racing the callback sees the
/// receipts either here or in the durable index, never neither.
#[derive(Debug, Default)]
pub struct PendingReceipts {
    inner: Mutex<HashMap<B256, Vec<Receipt>>>,
}

impl PendingReceipts {
    /// Creates an empty pending set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages `receipts` for `block_hash` ahead of the durable write.
    pub fn insert(&self, block_hash: B256, receipts: Vec<Receipt>) {
        self.inner.lock().insert(block_hash, receipts);
    }

    /// Removes and returns the staged receipts for `block_hash`, once the durable write has
    /// landed.
    pub fn remove(&self, block_hash: B256) -> Option<Vec<Receipt>> {
        self.inner.lock().remove(&block_hash)
    }

    /// Returns a clone of the receipts staged for `block_hash`, if any are still pending.
    pub fn get(&self, block_hash: B256) -> Option<Vec<Receipt>> {
        self.inner.lock().get(&block_hash).cloned()
    }
}
