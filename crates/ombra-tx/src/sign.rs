//! Per-input signature collection.
//!
//! Each signing call appends one key-index → signature map to
//! `signatures_map`, in call order. Ordinary inputs are signed with ghost
//! private keys recovered from the referenced UTXO's mask; deposit and mint
//! inputs are signed raw with a spend key.

use std::collections::{BTreeMap, HashMap};

use ombra_crypto::{derive_ghost_private, Hash, PrivateKey, PublicKey, Signature};
use ombra_types::Address;

use crate::types::SignedTransaction;
use crate::TxError;

/// The on-chain keys of a spendable output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtxoKeys {
    pub keys: Vec<PublicKey>,
    pub mask: PublicKey,
    pub index: u64,
}

/// Storage collaborator resolving `(hash, index)` references to UTXO keys.
///
/// `Ok(None)` means the reference does not exist; I/O failures surface as
/// `TxError::Reader`.
pub trait UtxoKeysReader {
    fn read_utxo_keys(&self, hash: &Hash, index: u64) -> Result<Option<UtxoKeys>, TxError>;
}

/// Positions of `keys`, keyed by public key. Signature maps index keys with
/// a u16, so larger key lists are refused outright.
pub(crate) fn keys_filter(keys: &[PublicKey]) -> Result<HashMap<PublicKey, u16>, TxError> {
    if keys.len() > u16::MAX as usize {
        return Err(TxError::TooManyKeys(keys.len()));
    }
    Ok(keys
        .iter()
        .enumerate()
        .map(|(i, k)| (*k, i as u16))
        .collect())
}

impl SignedTransaction {
    /// Sign for every account against the given UTXO keys, deriving ghost
    /// private keys with the UTXO's own index as nonce.
    pub fn sign_utxo(&mut self, utxo: &UtxoKeys, accounts: &[Address]) -> Result<(), TxError> {
        if accounts.is_empty() {
            return Ok(());
        }
        let sigs = self.collect_signatures(&utxo.keys, &utxo.mask, utxo.index, accounts)?;
        self.append_signatures(sigs)
    }

    /// Sign input `index` for every account.
    ///
    /// Deposit and mint inputs fall through to `sign_raw` with the first
    /// account's spend key. Ordinary inputs resolve their UTXO through the
    /// reader and derive ghost keys with the input's index as nonce.
    pub fn sign_input<R: UtxoKeysReader>(
        &mut self,
        reader: &R,
        index: usize,
        accounts: &[Address],
    ) -> Result<(), TxError> {
        if accounts.is_empty() {
            return Ok(());
        }
        if index >= self.transaction.inputs.len() {
            return Err(TxError::InvalidInputIndex {
                got: index,
                len: self.transaction.inputs.len(),
            });
        }

        let input = &self.transaction.inputs[index];
        if input.is_deposit_or_mint() {
            let key = accounts[0].private_spend.clone();
            return self.sign_raw(&key);
        }

        let (hash, nonce) = (input.hash, input.index);
        let utxo = reader
            .read_utxo_keys(&hash, nonce)?
            .ok_or(TxError::InputNotFound { hash, index: nonce })?;

        let sigs = self.collect_signatures(&utxo.keys, &utxo.mask, nonce, accounts)?;
        self.append_signatures(sigs)
    }

    /// Sign a single-input deposit or mint transaction with a bare key.
    pub fn sign_raw(&mut self, key: &PrivateKey) -> Result<(), TxError> {
        if self.transaction.inputs.len() != 1 {
            return Err(TxError::InvalidInputsCount(self.transaction.inputs.len()));
        }
        if !self.transaction.inputs[0].is_deposit_or_mint() {
            return Err(TxError::InvalidInputFormat);
        }

        let msg = self.payload_hash();
        let mut sigs = BTreeMap::new();
        sigs.insert(0u16, key.sign(msg.as_bytes()));
        self.append_signatures(sigs)
    }

    /// Derive a ghost private key per account, locate its position among the
    /// UTXO keys, and sign the payload hash with it. Nothing is appended
    /// until every account has signed.
    fn collect_signatures(
        &self,
        keys: &[PublicKey],
        mask: &PublicKey,
        nonce: u64,
        accounts: &[Address],
    ) -> Result<BTreeMap<u16, Signature>, TxError> {
        let filter = keys_filter(keys)?;
        let msg = self.payload_hash();

        let mut sigs = BTreeMap::new();
        for account in accounts {
            let ghost_priv = derive_ghost_private(
                mask,
                &account.private_view,
                &account.private_spend,
                nonce,
            )?;
            let position = filter
                .get(&ghost_priv.public())
                .copied()
                .ok_or_else(|| TxError::InvalidKey(account.to_string()))?;
            sigs.insert(position, ghost_priv.sign(msg.as_bytes()));
        }
        Ok(sigs)
    }

    fn append_signatures(&mut self, sigs: BTreeMap<u16, Signature>) -> Result<(), TxError> {
        if self.aggregated_signature.is_some() {
            return Err(TxError::ConflictingSignatures);
        }
        self.signatures_map.push(sigs);
        Ok(())
    }
}
