//! Deterministic fixtures shared by this workspace's test suites: a funded test account and a
//! linear header chain generator, so every crate's tests build the same shape of data instead of
//! each hand-rolling its own.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use alloy_genesis::Genesis;
use alloy_primitives::{Address, B256, U256};
use reth_primitives::{Header, SealedHeader};
use secp256k1::{Secp256k1, SecretKey};

/// A deterministic test secret key and the address it derives, stable across test runs so
/// fixtures built from it (signed transactions, funded genesis accounts) never need to embed the
/// derived address separately.
pub fn test_key() -> (SecretKey, Address) {
    let secret_key = SecretKey::from_slice(&[0x11; 32]).expect("valid 32-byte scalar");
    let secp = Secp256k1::new();
    let public_key = secret_key.public_key(&secp);
    let address = Address::from_raw_public_key(&public_key.serialize_uncompressed()[1..]);
    (secret_key, address)
}

/// A minimal genesis with [`test_key`]'s address pre-funded, for tests that need a chain with
/// spendable balance from block zero.
pub fn test_genesis() -> Genesis {
    let (_, address) = test_key();
    let account = alloy_genesis::GenesisAccount { balance: U256::MAX, ..Default::default() };
    Genesis { alloc: [(address, account)].into_iter().collect(), ..Default::default() }
}

/// Builds `count` sealed headers forming a linear chain starting right after `parent`, each with
/// a monotonically increasing timestamp and block number, and real hashes computed from their
/// own contents.
pub fn generate_header_chain(parent: &SealedHeader, count: u64) -> Vec<SealedHeader> {
    let mut chain = Vec::with_capacity(count as usize);
    let mut previous = parent.clone();

    for _ in 0..count {
        let header = Header {
            parent_hash: previous.hash(),
            number: previous.number() + 1,
            timestamp: previous.header().timestamp + 12,
            gas_limit: previous.header().gas_limit,
            state_root: B256::random(),
            ..Default::default()
        };
        let hash = header.hash_slow();
        let sealed = SealedHeader::new(header, hash);
        chain.push(sealed.clone());
        previous = sealed;
    }

    chain
}

/// A sealed genesis header (number 0) with a random hash, for tests that only need a valid chain
/// starting point and don't care about matching a real network's genesis.
pub fn genesis_header() -> SealedHeader {
    let header = Header { number: 0, gas_limit: 30_000_000, ..Default::default() };
    let hash = header.hash_slow();
    SealedHeader::new(header, hash)
}
