use alloy_consensus::{Transaction as _, TxEnvelope};
use alloy_eips::eip2718::{Decodable2718, Encodable2718};
use alloy_primitives::{Address, Bytes, PrimitiveSignature as Signature, TxHash, TxKind, B256, U256};
use secp256k1::{ecdsa::RecoverableSignature, Message, SECP256K1};

/// A transaction together with its signature and a cached hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSigned {
    hash: TxHash,
    transaction: TxEnvelope,
}

impl TransactionSigned {
    /// Wraps a signed transaction envelope, computing and caching its hash.
    pub fn new(transaction: TxEnvelope) -> Self {
        let hash = *transaction.tx_hash();
        Self { hash, transaction }
    }

    /// Hash of this transaction.
    pub const fn hash(&self) -> TxHash {
        self.hash
    }

    /// Gas limit declared by this transaction.
    pub fn gas_limit(&self) -> u64 {
        self.transaction.gas_limit()
    }

    /// Nonce of the sending account at the time this transaction was signed.
    pub fn nonce(&self) -> u64 {
        self.transaction.nonce()
    }

    /// Value transferred by this transaction.
    pub fn value(&self) -> U256 {
        self.transaction.value()
    }

    /// Call data / contract creation code.
    pub fn input(&self) -> &Bytes {
        self.transaction.input()
    }

    /// The call target, or [`TxKind::Create`] if this transaction deploys a contract.
    pub fn kind(&self) -> TxKind {
        self.transaction.kind()
    }

    /// The highest fee per gas this transaction is willing to pay, post EIP-1559.
    pub fn max_fee_per_gas(&self) -> u128 {
        self.transaction.max_fee_per_gas()
    }

    /// The priority fee per gas this transaction is willing to pay, if any (EIP-1559 only).
    pub fn max_priority_fee_per_gas(&self) -> Option<u128> {
        self.transaction.max_priority_fee_per_gas()
    }

    /// The wrapped signature.
    pub fn signature(&self) -> &Signature {
        self.transaction.signature()
    }

    /// Recovers and returns the sender address.
    ///
    /// This is a cryptographic ecrecover over the transaction's signing hash; callers that need
    /// this for many transactions should cache the result (see `SealedBlockWithSenders`).
    pub fn recover_signer(&self) -> Option<Address> {
        recover_signer_unchecked(self.signature(), self.transaction.signature_hash())
    }

    /// RLP/EIP-2718-encodes this transaction.
    pub fn encoded_2718(&self) -> Vec<u8> {
        self.transaction.encoded_2718()
    }

    /// Decodes a transaction previously produced by [`Self::encoded_2718`].
    pub fn decode_2718(buf: &mut &[u8]) -> Result<Self, alloy_eips::eip2718::Eip2718Error> {
        let transaction = TxEnvelope::decode_2718(buf)?;
        Ok(Self::new(transaction))
    }
}

/// A [`TransactionSigned`] with its sender already recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSignedEcRecovered {
    /// The signed transaction.
    pub transaction: TransactionSigned,
    /// The recovered sender.
    pub signer: Address,
}

/// Recovers an address from a signature and signing hash without re-checking the signature's
/// `s`-value normalization (the signature was already accepted into a sealed block).
pub fn recover_signer_unchecked(signature: &Signature, sighash: B256) -> Option<Address> {
    let recovery_id = signature.recid().ok()?;
    let recoverable_sig = RecoverableSignature::from_compact(
        &signature.to_k256().ok()?.to_bytes(),
        recovery_id.into(),
    )
    .ok()?;
    let message = Message::from_digest(sighash.0);
    let public = SECP256K1.recover_ecdsa(&message, &recoverable_sig).ok()?;
    Some(public_key_to_address(public))
}

/// Derives an Ethereum address from a secp256k1 public key.
pub fn public_key_to_address(public: secp256k1::PublicKey) -> Address {
    let uncompressed = public.serialize_uncompressed();
    let hash = alloy_primitives::keccak256(&uncompressed[1..]);
    Address::from_slice(&hash[12..])
}
