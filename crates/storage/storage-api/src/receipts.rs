use alloy_primitives::{BlockHash, TxHash};
use reth_primitives::Receipt;
use reth_storage_errors::ProviderError;

/// The receipts index: the durable record of what each block's transactions produced.
///
/// Writes happen once per block, right after that block's `BlockExecutor::run_block` call
/// returns and before the run loop advances its cursor — see the per-block callback.
#[auto_impl::auto_impl(&, Arc)]
pub trait ReceiptsProvider: Send + Sync {
    /// Persists the receipts produced by executing the block with hash `block_hash`, alongside
    /// the transaction hash each one belongs to, atomically updating both the block-keyed receipt
    /// list and the `tx_hash -> (block_hash, index)` lookup index.
    ///
    /// Overwrites any receipts previously stored for this hash, so a retried block after a
    /// transient failure does not duplicate entries.
    fn write_receipts(
        &self,
        block_hash: BlockHash,
        receipts: Vec<(TxHash, Receipt)>,
    ) -> Result<(), ProviderError>;

    /// Returns the receipts stored for `block_hash`, if any.
    fn receipts_by_block(&self, block_hash: BlockHash) -> Result<Option<Vec<Receipt>>, ProviderError>;

    /// Looks up a single receipt by the hash of the transaction that produced it, along with the
    /// hash of the block it was included in and its index within that block.
    fn receipt_by_tx_hash(
        &self,
        tx_hash: TxHash,
    ) -> Result<Option<(Receipt, BlockHash, usize)>, ProviderError>;
}
