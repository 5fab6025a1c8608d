//! Merkle root calculations over ordered lists of RLP-encodable items.

use crate::{Header, ReceiptWithBloom, TransactionSigned};
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::B256;
use alloy_rlp::Encodable;
use alloy_trie::root::ordered_trie_root_with_encoder;

/// Computes the transactions root for a block body.
pub fn calculate_transaction_root(transactions: &[TransactionSigned]) -> B256 {
    ordered_trie_root_with_encoder(transactions, |tx, buf| buf.extend_from_slice(&tx.encoded_2718()))
}

/// Computes the ommers (uncles) root for a block body.
pub fn calculate_ommers_root(ommers: &[Header]) -> B256 {
    ordered_trie_root_with_encoder(ommers, |header, buf| header.encode(buf))
}

/// Computes the receipts root for a block's receipts.
pub fn calculate_receipt_root(receipts: &[ReceiptWithBloom]) -> B256 {
    ordered_trie_root_with_encoder(receipts, |receipt, buf| {
        buf.push(receipt.receipt.tx_type);
        receipt.receipt.success.encode(buf);
        receipt.receipt.cumulative_gas_used.encode(buf);
        receipt.bloom.encode(buf);
    })
}
