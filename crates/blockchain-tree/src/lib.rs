//! An in-memory reference implementation of [`BlockchainStore`] and [`ReceiptsProvider`].
//!
//! Blocks, the canonical number -> hash mapping, and the named iterator cursors all live behind
//! one lock. It is not meant to scale to a real chain's history; it exists so the execution gate
//! has a store to run against without needing a real database backend wired in.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use alloy_primitives::{BlockHash, BlockNumber, TxHash, U256};
use parking_lot::RwLock;
use reth_primitives::{Receipt, SealedBlock, SealedHeader};
use reth_storage_api::{BlockNumberOrHash, BlockchainStore, ChainPointer, IterateCallback, ReceiptsProvider};
use reth_storage_errors::ProviderError;
use std::collections::HashMap;
use tokio::sync::broadcast;

struct Inner {
    blocks: HashMap<BlockHash, SealedBlock>,
    total_difficulty: HashMap<BlockHash, U256>,
    canonical_by_number: HashMap<BlockNumber, BlockHash>,
    canonical_tip: BlockHash,
    cursors: HashMap<ChainPointer, BlockHash>,
    receipts: HashMap<BlockHash, Vec<Receipt>>,
    tx_index: HashMap<TxHash, (BlockHash, usize)>,
}

/// An in-memory blockchain store seeded with a genesis block.
pub struct InMemoryBlockchainStore {
    inner: RwLock<Inner>,
    chain_updated: broadcast::Sender<()>,
}

impl InMemoryBlockchainStore {
    /// Creates a store whose canonical chain starts at `genesis`, with every cursor
    /// ([`ChainPointer::Vm`], `Safe`, `Finalized`) pointing at it.
    pub fn new(genesis: SealedBlock) -> Self {
        let hash = genesis.hash();
        let number = genesis.number();

        let mut blocks = HashMap::new();
        blocks.insert(hash, genesis);
        let mut total_difficulty = HashMap::new();
        total_difficulty.insert(hash, U256::ZERO);
        let mut canonical_by_number = HashMap::new();
        canonical_by_number.insert(number, hash);
        let mut cursors = HashMap::new();
        cursors.insert(ChainPointer::Vm, hash);
        cursors.insert(ChainPointer::Safe, hash);
        cursors.insert(ChainPointer::Finalized, hash);

        let (chain_updated, _) = broadcast::channel(16);

        Self {
            inner: RwLock::new(Inner {
                blocks,
                total_difficulty,
                canonical_by_number,
                canonical_tip: hash,
                cursors,
                receipts: HashMap::new(),
                tx_index: HashMap::new(),
            }),
            chain_updated,
        }
    }

    /// Subscribes to chain-updated notifications.
    pub fn subscribe_chain_updated(&self) -> broadcast::Receiver<()> {
        self.chain_updated.subscribe()
    }

    /// Returns the next canonical block after `hash`, and whether reaching it required rewinding
    /// past a point where `hash`'s own chain diverged from the canonical one. Returns `None` if
    /// `hash` is already at or past the canonical tip.
    fn next_canonical_after(&self, hash: BlockHash) -> Result<Option<(BlockHash, bool)>, ProviderError> {
        let inner = self.inner.read();
        let block = inner.blocks.get(&hash).ok_or(ProviderError::BlockHashNotFound(hash))?;
        let tip = inner.blocks.get(&inner.canonical_tip).expect("canonical tip always present");
        if block.number() >= tip.number() {
            return Ok(None);
        }

        if inner.canonical_by_number.get(&block.number()) == Some(&hash) {
            let next_number = block.number() + 1;
            let next_hash = *inner
                .canonical_by_number
                .get(&next_number)
                .expect("canonical chain has no gaps up to its tip");
            return Ok(Some((next_hash, false)));
        }

        // `hash` was canonical once but the chain has since reorged past it. Walk its ancestry
        // back to the point where it rejoins the current canonical chain.
        let mut walk = block.parent_hash();
        loop {
            let parent = inner.blocks.get(&walk).ok_or(ProviderError::BlockHashNotFound(walk))?;
            if inner.canonical_by_number.get(&parent.number()) == Some(&walk) {
                let next_number = parent.number() + 1;
                let next_hash = *inner
                    .canonical_by_number
                    .get(&next_number)
                    .expect("canonical chain has no gaps up to its tip");
                return Ok(Some((next_hash, true)));
            }
            walk = parent.parent_hash();
        }
    }
}

impl BlockchainStore for InMemoryBlockchainStore {
    fn get_block(&self, id: BlockNumberOrHash) -> Result<SealedBlock, ProviderError> {
        let inner = self.inner.read();
        let hash = match id {
            BlockNumberOrHash::Hash(hash) => hash,
            BlockNumberOrHash::Number(number) => *inner
                .canonical_by_number
                .get(&number)
                .ok_or(ProviderError::BlockNumberNotFound(number))?,
        };
        inner.blocks.get(&hash).cloned().ok_or(ProviderError::BlockHashNotFound(hash))
    }

    fn get_header(&self, id: BlockNumberOrHash) -> Result<SealedHeader, ProviderError> {
        Ok(self.get_block(id)?.header)
    }

    fn canonical_head(&self) -> Result<SealedBlock, ProviderError> {
        let hash = self.inner.read().canonical_tip;
        self.get_block(BlockNumberOrHash::Hash(hash))
    }

    fn iterator_head(&self, cursor: ChainPointer) -> Result<SealedBlock, ProviderError> {
        let hash = *self
            .inner
            .read()
            .cursors
            .get(&cursor)
            .ok_or(ProviderError::IteratorCursorNotInitialized(cursor.as_str()))?;
        self.get_block(BlockNumberOrHash::Hash(hash))
    }

    fn set_iterator_head(&self, cursor: ChainPointer, hash: BlockHash) -> Result<(), ProviderError> {
        let mut inner = self.inner.write();
        if !inner.blocks.contains_key(&hash) {
            return Err(ProviderError::BlockHashNotFound(hash));
        }
        inner.cursors.insert(cursor, hash);
        Ok(())
    }

    fn total_difficulty(&self, hash: BlockHash) -> Result<U256, ProviderError> {
        self.inner
            .read()
            .total_difficulty
            .get(&hash)
            .copied()
            .ok_or(ProviderError::TotalDifficultyNotFound(hash))
    }

    fn iterate(
        &self,
        cursor: ChainPointer,
        max_blocks: u64,
        callback: IterateCallback<'_>,
    ) -> Result<u64, ProviderError> {
        let mut cursor_hash = self.iterator_head(cursor)?.hash();
        let mut delivered = 0u64;

        // The cursor is persisted after every successful block, not just once at the end, so a
        // callback failure partway through a batch leaves it at the last block that actually
        // committed rather than back where the batch started.
        let outcome = (|| -> Result<(), ProviderError> {
            while delivered < max_blocks {
                let Some((next_hash, reorg)) = self.next_canonical_after(cursor_hash)? else {
                    break;
                };
                let block = self.get_block(BlockNumberOrHash::Hash(next_hash))?;
                callback(block, reorg)?;
                cursor_hash = next_hash;
                delivered += 1;
                self.set_iterator_head(cursor, cursor_hash)?;
            }
            Ok(())
        })();

        outcome?;
        Ok(delivered)
    }

    fn put_blocks(
        &self,
        blocks: &[SealedBlock],
        skip_canonical_check: bool,
        suppress_chain_updated: bool,
    ) -> Result<(), ProviderError> {
        let Some(first) = blocks.first() else { return Ok(()) };

        let mut inner = self.inner.write();

        for block in blocks {
            let parent_td = *inner
                .total_difficulty
                .get(&block.parent_hash())
                .ok_or(ProviderError::TotalDifficultyNotFound(block.parent_hash()))?;
            let td = parent_td + block.header.header().difficulty;
            inner.blocks.insert(block.hash(), block.clone());
            inner.total_difficulty.insert(block.hash(), td);
        }

        if !skip_canonical_check {
            let tip = inner.canonical_tip;
            if first.parent_hash() != tip {
                let parent_known_canonical = inner
                    .blocks
                    .get(&first.parent_hash())
                    .map(|parent| inner.canonical_by_number.get(&parent.number()) == Some(&parent.hash()))
                    .unwrap_or(false);
                if !parent_known_canonical {
                    return Err(ProviderError::AppendChainDoesntConnect {
                        tip,
                        new_block: first.hash(),
                    });
                }
                // Reorg: drop the stale canonical mapping from the fork point onward before
                // writing the new batch's mapping over it.
                let mut number = first.number();
                while inner.canonical_by_number.remove(&number).is_some() {
                    number += 1;
                }
            }

            for block in blocks {
                inner.canonical_by_number.insert(block.number(), block.hash());
            }
            inner.canonical_tip = blocks.last().expect("checked non-empty above").hash();
        }

        drop(inner);
        if !suppress_chain_updated {
            self.notify_chain_updated();
        }
        Ok(())
    }

    fn notify_chain_updated(&self) {
        let _ = self.chain_updated.send(());
    }
}

impl ReceiptsProvider for InMemoryBlockchainStore {
    fn write_receipts(
        &self,
        block_hash: BlockHash,
        receipts: Vec<(TxHash, Receipt)>,
    ) -> Result<(), ProviderError> {
        let mut inner = self.inner.write();
        for (index, (tx_hash, _)) in receipts.iter().enumerate() {
            inner.tx_index.insert(*tx_hash, (block_hash, index));
        }
        let receipts = receipts.into_iter().map(|(_, receipt)| receipt).collect();
        inner.receipts.insert(block_hash, receipts);
        Ok(())
    }

    fn receipts_by_block(&self, block_hash: BlockHash) -> Result<Option<Vec<Receipt>>, ProviderError> {
        Ok(self.inner.read().receipts.get(&block_hash).cloned())
    }

    fn receipt_by_tx_hash(&self, tx_hash: TxHash) -> Result<Option<(Receipt, BlockHash, usize)>, ProviderError> {
        let inner = self.inner.read();
        let Some(&(block_hash, index)) = inner.tx_index.get(&tx_hash) else { return Ok(None) };
        let receipt = inner
            .receipts
            .get(&block_hash)
            .and_then(|receipts| receipts.get(index))
            .cloned();
        Ok(receipt.map(|receipt| (receipt, block_hash, index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reth_testing_utils::{genesis_header, generate_header_chain};
    use reth_primitives::BlockBody;

    fn block_from_header(header: SealedHeader) -> SealedBlock {
        SealedBlock::new(header, BlockBody::default())
    }

    fn store_with_chain(len: u64) -> (InMemoryBlockchainStore, Vec<SealedBlock>) {
        let genesis = block_from_header(genesis_header());
        let store = InMemoryBlockchainStore::new(genesis.clone());
        let chain: Vec<_> =
            generate_header_chain(&genesis.header, len).into_iter().map(block_from_header).collect();
        store.put_blocks(&chain, false, false).unwrap();
        (store, chain)
    }

    #[test]
    fn put_blocks_extends_canonical_tip() {
        let (store, chain) = store_with_chain(3);
        assert_eq!(store.canonical_head().unwrap().hash(), chain.last().unwrap().hash());
    }

    #[test]
    fn iterate_delivers_blocks_in_order_without_reorg() {
        let (store, chain) = store_with_chain(5);
        let mut seen = Vec::new();
        store
            .iterate(ChainPointer::Vm, 10, &mut |block, reorg| {
                assert!(!reorg);
                seen.push(block.hash());
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, chain.iter().map(|b| b.hash()).collect::<Vec<_>>());
    }

    #[test]
    fn iterate_caps_at_max_blocks_and_is_resumable() {
        let (store, chain) = store_with_chain(5);
        let mut seen = Vec::new();
        let delivered = store
            .iterate(ChainPointer::Vm, 2, &mut |block, _| {
                seen.push(block.hash());
                Ok(())
            })
            .unwrap();
        assert_eq!(delivered, 2);
        assert_eq!(seen, chain[..2].iter().map(|b| b.hash()).collect::<Vec<_>>());

        store
            .iterate(ChainPointer::Vm, 10, &mut |block, _| {
                seen.push(block.hash());
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, chain.iter().map(|b| b.hash()).collect::<Vec<_>>());
    }

    #[test]
    fn reorg_is_announced_on_the_first_block_past_the_common_ancestor() {
        let (store, chain) = store_with_chain(5);

        // Build a competing fork from block 3 (index 2) that overtakes the current 5-block tip.
        let fork_parent = chain[2].header.clone();
        let fork: Vec<_> =
            generate_header_chain(&fork_parent, 4).into_iter().map(block_from_header).collect();
        store.put_blocks(&fork, false, false).unwrap();
        assert_eq!(store.canonical_head().unwrap().hash(), fork.last().unwrap().hash());

        store.set_iterator_head(ChainPointer::Vm, chain[4].hash()).unwrap();
        let mut reorg_flags = Vec::new();
        store
            .iterate(ChainPointer::Vm, 10, &mut |_, reorg| {
                reorg_flags.push(reorg);
                Ok(())
            })
            .unwrap();
        assert_eq!(reorg_flags, vec![true, false, false, false]);
    }

    #[test]
    fn receipts_round_trip_through_the_index() {
        let (store, chain) = store_with_chain(1);
        let block_hash = chain[0].hash();
        let tx_hash = TxHash::with_last_byte(7);
        let receipt = Receipt::default();
        store.write_receipts(block_hash, vec![(tx_hash, receipt.clone())]).unwrap();

        assert_eq!(store.receipts_by_block(block_hash).unwrap(), Some(vec![receipt.clone()]));
        assert_eq!(
            store.receipt_by_tx_hash(tx_hash).unwrap(),
            Some((receipt, block_hash, 0))
        );
    }
}
