//! Ombra transaction construction, classification, and signing.
//!
//! Provides the transaction data model with ghost-keyed stealth outputs, the
//! structural transaction-type classifier, per-input signature collection,
//! and the aggregated multi-signer Schnorr path. Curve primitives come from
//! ombra-crypto; account and amount types from ombra-types.

pub mod aggregate;
pub mod build;
pub mod encode;
pub mod sign;
pub mod types;

pub use build::storage_extra_price;
pub use sign::{UtxoKeys, UtxoKeysReader};
pub use types::{
    output_type, transaction_type, AggregatedSignature, DepositData, Input, MintData, Output,
    Script, SignedTransaction, Transaction, WithdrawalData, TX_VERSION_HASH_SIGNATURE,
};

use ombra_crypto::{CryptoError, Hash};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TxError {
    #[error("invalid key for the input {0}")]
    InvalidKey(String),

    #[error("invalid input index {got}/{len}")]
    InvalidInputIndex { got: usize, len: usize },

    #[error("invalid inputs count {0}")]
    InvalidInputsCount(usize),

    #[error("invalid input format")]
    InvalidInputFormat,

    #[error("input not found {hash}:{index}")]
    InputNotFound { hash: Hash, index: u64 },

    #[error("invalid signers order {prev} {cur}")]
    InvalidSignersOrder { prev: usize, cur: usize },

    #[error("invalid accounts count {got} for {want} inputs")]
    InvalidAccountsCount { got: usize, want: usize },

    #[error("utxo carries {0} keys, beyond the signature index range")]
    TooManyKeys(usize),

    #[error("extra size {got} exceeds limit {limit}")]
    ExtraTooLarge { got: usize, limit: usize },

    #[error("references count {0} exceeds limit")]
    TooManyReferences(usize),

    #[error("outputs count {0} exceeds limit")]
    TooManyOutputs(usize),

    #[error("transaction already carries signatures of the other scheme")]
    ConflictingSignatures,

    #[error("utxo reader: {0}")]
    Reader(String),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

pub(crate) fn to32(s: &[u8]) -> [u8; 32] {
    let mut buf = [0u8; 32];
    let len = s.len().min(32);
    buf[..len].copy_from_slice(&s[..len]);
    buf
}
