//! Transaction data model, structural classification, and output viewing.
//!
//! A `Transaction` is the mutable construction-time value; promoting it to a
//! `SignedTransaction` freezes the structure and attaches exactly one of the
//! two signature carriers: the per-input `signatures_map` or the
//! `aggregated_signature`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ombra_crypto::{view_ghost_output, Hash, PrivateKey, PublicKey, Signature};
use ombra_types::Integer;

use crate::TxError;

/// Version tag produced by this core: the hash-signature transaction format.
pub const TX_VERSION_HASH_SIGNATURE: u8 = 0x05;

/// Output type tags. Part of the wire contract, bit-exact.
pub mod output_type {
    pub const SCRIPT: u8 = 0x00;
    pub const WITHDRAWAL_SUBMIT: u8 = 0xa1;
    pub const NODE_PLEDGE: u8 = 0xa3;
    pub const NODE_ACCEPT: u8 = 0xa4;
    /// Reserved for wire compatibility; never produced.
    pub const NODE_RESIGN: u8 = 0xa5;
    pub const NODE_REMOVE: u8 = 0xa6;
    pub const WITHDRAWAL_CLAIM: u8 = 0xa9;
    pub const NODE_CANCEL: u8 = 0xaa;
    pub const CUSTODIAN_UPDATE_NODES: u8 = 0xb1;
    pub const CUSTODIAN_SLASH_NODES: u8 = 0xb2;
}

/// Transaction type tags derived by the classifier.
pub mod transaction_type {
    pub const SCRIPT: u8 = 0x00;
    pub const MINT: u8 = 0x01;
    pub const DEPOSIT: u8 = 0x02;
    pub const WITHDRAWAL_SUBMIT: u8 = 0x03;
    pub const WITHDRAWAL_CLAIM: u8 = 0x05;
    pub const NODE_PLEDGE: u8 = 0x06;
    pub const NODE_ACCEPT: u8 = 0x07;
    /// Reserved for wire compatibility; never produced.
    pub const NODE_RESIGN: u8 = 0x08;
    pub const NODE_REMOVE: u8 = 0x09;
    pub const NODE_CANCEL: u8 = 0x12;
    pub const CUSTODIAN_UPDATE_NODES: u8 = 0x13;
    pub const CUSTODIAN_SLASH_NODES: u8 = 0x14;
    pub const UNKNOWN: u8 = 0xff;
}

/// Opaque spending-policy bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script(pub Vec<u8>);

/// External-chain deposit record carried by a deposit input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositData {
    pub chain: Hash,
    pub asset_key: Vec<u8>,
    pub transaction_hash: Vec<u8>,
    pub output_index: u64,
    pub amount: Integer,
}

/// Mint record carried by a mint input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintData {
    pub group: String,
    pub batch: u64,
    pub amount: Integer,
}

/// Withdrawal record carried by a withdrawal-typed output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalData {
    pub address: String,
    pub tag: String,
}

/// A transaction input. At most one of `genesis`, `deposit`, `mint` is
/// present; all absent means an ordinary UTXO reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Input {
    /// Referenced prior transaction (zero for deposit/mint/genesis).
    pub hash: Hash,
    /// Output index within the referenced transaction; doubles as the
    /// ghost-key derivation nonce.
    pub index: u64,
    pub genesis: Vec<u8>,
    pub deposit: Option<DepositData>,
    pub mint: Option<MintData>,
}

impl Input {
    pub fn is_deposit_or_mint(&self) -> bool {
        self.deposit.is_some() || self.mint.is_some()
    }
}

/// A transaction output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub output_type: u8,
    pub amount: Integer,
    /// One ghost key per recipient; empty when the output carries none.
    pub keys: Vec<PublicKey>,
    /// Ephemeral public key `R = r·G` shared by all `keys`; zero when
    /// `keys` is empty.
    pub mask: PublicKey,
    pub script: Script,
    pub withdrawal: Option<WithdrawalData>,
}

/// The construction-time transaction value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u8,
    pub asset: Hash,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub references: Vec<Hash>,
    pub extra: Vec<u8>,
}

/// Aggregated multi-signer Schnorr signature: one 64-byte `(P ‖ S)` pair
/// plus the strictly ascending global signer indices it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedSignature {
    pub signers: Vec<usize>,
    pub signature: Signature,
}

/// A transaction plus its signatures. Exactly one of the two carriers is
/// populated once signing has happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub aggregated_signature: Option<AggregatedSignature>,
    /// One key-index → signature map per signed input, in signing-call
    /// order.
    pub signatures_map: Vec<BTreeMap<u16, Signature>>,
}

impl From<Transaction> for SignedTransaction {
    fn from(transaction: Transaction) -> Self {
        Self {
            transaction,
            aggregated_signature: None,
            signatures_map: Vec::new(),
        }
    }
}

impl SignedTransaction {
    /// Derive the canonical transaction type from structure.
    ///
    /// Inputs dominate outputs: any mint input makes the whole transaction a
    /// mint, then deposit, then genesis (classified unknown). Otherwise the
    /// first special-typed output decides, and a transaction whose outputs
    /// are all plain scripts is a script transaction.
    pub fn transaction_type(&self) -> u8 {
        let inputs = &self.transaction.inputs;
        if inputs.iter().any(|i| i.mint.is_some()) {
            return transaction_type::MINT;
        }
        if inputs.iter().any(|i| i.deposit.is_some()) {
            return transaction_type::DEPOSIT;
        }
        if inputs.iter().any(|i| !i.genesis.is_empty()) {
            return transaction_type::UNKNOWN;
        }

        let mut is_script = true;
        for output in &self.transaction.outputs {
            match output.output_type {
                output_type::WITHDRAWAL_SUBMIT => return transaction_type::WITHDRAWAL_SUBMIT,
                output_type::WITHDRAWAL_CLAIM => return transaction_type::WITHDRAWAL_CLAIM,
                output_type::NODE_PLEDGE => return transaction_type::NODE_PLEDGE,
                output_type::NODE_CANCEL => return transaction_type::NODE_CANCEL,
                output_type::NODE_ACCEPT => return transaction_type::NODE_ACCEPT,
                output_type::NODE_REMOVE => return transaction_type::NODE_REMOVE,
                output_type::CUSTODIAN_UPDATE_NODES => {
                    return transaction_type::CUSTODIAN_UPDATE_NODES
                }
                output_type::CUSTODIAN_SLASH_NODES => {
                    return transaction_type::CUSTODIAN_SLASH_NODES
                }
                _ => {}
            }
            is_script = is_script && output.output_type == output_type::SCRIPT;
        }

        if is_script {
            transaction_type::SCRIPT
        } else {
            transaction_type::UNKNOWN
        }
    }
}

impl Transaction {
    /// Recover the script outputs visible to a private view key.
    ///
    /// Each returned output is a copy with every ghost key replaced by its
    /// view-stripped form; comparing those against a public spend key
    /// detects ownership. Non-script outputs are skipped.
    pub fn view_ghost_outputs(&self, view_priv: &PrivateKey) -> Result<Vec<Output>, TxError> {
        let mut outputs = Vec::new();

        for (i, o) in self.outputs.iter().enumerate() {
            if o.output_type != output_type::SCRIPT {
                continue;
            }

            let mut keys = Vec::with_capacity(o.keys.len());
            for k in &o.keys {
                keys.push(view_ghost_output(k, view_priv, &o.mask, i as u64)?);
            }
            outputs.push(Output {
                output_type: o.output_type,
                amount: o.amount,
                keys,
                mask: o.mask,
                script: o.script.clone(),
                withdrawal: None,
            });
        }

        Ok(outputs)
    }
}
