//! Common types shared by the engine crates.
//!
//! This crate is the bottom of the dependency graph: block/header/account types that the
//! execution gate, the state store and the concrete VM implementation all agree on.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod account;
pub mod constants;
mod error;
mod log;
mod withdrawal;

pub use account::Account;
pub use error::{GotExpected, GotExpectedBoxed};
pub use log::{logs_bloom, Log, LogData};
pub use withdrawal::{Withdrawal, Withdrawals};

pub use alloy_consensus::Header;
pub use alloy_eips::BlockNumHash;

/// A [`Header`] sealed with its hash, so the hash doesn't need recomputing on every access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedHeader {
    hash: alloy_primitives::B256,
    header: Header,
}

impl SealedHeader {
    /// Wraps a header with a precomputed hash.
    ///
    /// The caller must guarantee `hash` is actually the hash of `header`; this type never
    /// recomputes it.
    pub const fn new(header: Header, hash: alloy_primitives::B256) -> Self {
        Self { hash, header }
    }

    /// Hash of the header.
    pub const fn hash(&self) -> alloy_primitives::B256 {
        self.hash
    }

    /// The wrapped header.
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Splits the seal apart.
    pub fn split(self) -> (Header, alloy_primitives::B256) {
        (self.header, self.hash)
    }

    /// Number of this block.
    pub const fn number(&self) -> u64 {
        self.header.number
    }

    /// Parent hash of this block.
    pub const fn parent_hash(&self) -> alloy_primitives::B256 {
        self.header.parent_hash
    }

    /// State root committed to by this header.
    pub const fn state_root(&self) -> alloy_primitives::B256 {
        self.header.state_root
    }
}
