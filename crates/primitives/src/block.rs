use crate::{Header, TransactionSigned};
use alloy_eips::eip4895::Withdrawals;
use alloy_primitives::{Address, BlockHash, B256};
use reth_primitives_traits::SealedHeader;
use serde::{Deserialize, Serialize};

pub use alloy_eips::eip1898::{BlockHashOrNumber, BlockId, BlockNumHash, BlockNumberOrTag, RpcBlockHash};

/// The body of a block: its transactions, ommer headers, and (post-Shanghai) withdrawals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockBody {
    /// Transactions in this block, in execution order.
    pub transactions: Vec<TransactionSigned>,
    /// Ommer (uncle) headers. Always empty post-Merge.
    pub ommers: Vec<Header>,
    /// Validator withdrawals, present from Shanghai onward.
    pub withdrawals: Option<Withdrawals>,
}

/// An Ethereum block: a header plus its body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
    /// Block header.
    pub header: Header,
    /// Block body.
    pub body: BlockBody,
}

impl Block {
    /// Transactions in this block.
    pub fn transactions(&self) -> &[TransactionSigned] {
        &self.body.transactions
    }
}

/// A [`Block`] whose hash has already been computed and is carried alongside it, so repeated
/// access (iterator delivery, receipt indexing, error messages) never recomputes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBlock {
    /// The sealed header.
    pub header: SealedHeader,
    /// Transactions in this block, in execution order.
    pub body: Vec<TransactionSigned>,
    /// Ommer (uncle) headers.
    pub ommers: Vec<Header>,
    /// Validator withdrawals.
    pub withdrawals: Option<Withdrawals>,
}

impl SealedBlock {
    /// Creates a new sealed block from a header and body.
    pub fn new(header: SealedHeader, body: BlockBody) -> Self {
        Self {
            header,
            body: body.transactions,
            ommers: body.ommers,
            withdrawals: body.withdrawals,
        }
    }

    /// Hash of this block.
    pub const fn hash(&self) -> BlockHash {
        self.header.hash()
    }

    /// Block number.
    pub const fn number(&self) -> u64 {
        self.header.number()
    }

    /// Parent block hash.
    pub const fn parent_hash(&self) -> BlockHash {
        self.header.parent_hash()
    }

    /// State root committed to by this block's header.
    pub const fn state_root(&self) -> B256 {
        self.header.state_root()
    }

    /// The `(number, hash)` pair identifying this block.
    pub const fn num_hash(&self) -> BlockNumHash {
        BlockNumHash { number: self.number(), hash: self.hash() }
    }
}

/// A [`SealedBlock`] whose transactions have already had their sender addresses recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBlockWithSenders {
    /// The sealed block.
    pub block: SealedBlock,
    /// Recovered sender for each transaction in `block.body`, same order and length.
    pub senders: Vec<Address>,
}

impl SealedBlockWithSenders {
    /// Pairs a block with the senders recovered from its transactions.
    ///
    /// Returns `None` if `senders` does not have one entry per transaction.
    pub fn new(block: SealedBlock, senders: Vec<Address>) -> Option<Self> {
        (senders.len() == block.body.len()).then_some(Self { block, senders })
    }
}
