//! Payload hashing.
//!
//! The 32-byte message every signing path commits to is the BLAKE3 digest of
//! a canonical encoding of the transaction fields. The encoding is internal
//! to this workspace (wire serialization lives elsewhere): fixed-width for
//! hashes, keys, and amounts, uvarint length prefixes for everything
//! variable, and a presence byte ahead of each optional record, so distinct
//! transactions cannot collide on the hashed bytes.

use ombra_crypto::{push_uvarint, Hash};

use crate::types::{DepositData, Input, MintData, Output, SignedTransaction, Transaction};

fn push_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    push_uvarint(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

fn encode_deposit(buf: &mut Vec<u8>, d: &DepositData) {
    buf.extend_from_slice(d.chain.as_bytes());
    push_bytes(buf, &d.asset_key);
    push_bytes(buf, &d.transaction_hash);
    push_uvarint(buf, d.output_index);
    buf.extend_from_slice(&d.amount.to_be_bytes());
}

fn encode_mint(buf: &mut Vec<u8>, m: &MintData) {
    push_bytes(buf, m.group.as_bytes());
    push_uvarint(buf, m.batch);
    buf.extend_from_slice(&m.amount.to_be_bytes());
}

fn encode_input(buf: &mut Vec<u8>, input: &Input) {
    buf.extend_from_slice(input.hash.as_bytes());
    push_uvarint(buf, input.index);
    push_bytes(buf, &input.genesis);

    match &input.deposit {
        Some(d) => {
            buf.push(1);
            encode_deposit(buf, d);
        }
        None => buf.push(0),
    }
    match &input.mint {
        Some(m) => {
            buf.push(1);
            encode_mint(buf, m);
        }
        None => buf.push(0),
    }
}

fn encode_output(buf: &mut Vec<u8>, output: &Output) {
    buf.push(output.output_type);
    buf.extend_from_slice(&output.amount.to_be_bytes());
    push_uvarint(buf, output.keys.len() as u64);
    for k in &output.keys {
        buf.extend_from_slice(k.as_bytes());
    }
    buf.extend_from_slice(output.mask.as_bytes());
    push_bytes(buf, &output.script.0);

    match &output.withdrawal {
        Some(w) => {
            buf.push(1);
            push_bytes(buf, w.address.as_bytes());
            push_bytes(buf, w.tag.as_bytes());
        }
        None => buf.push(0),
    }
}

impl Transaction {
    fn payload_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128 + self.extra.len());

        buf.push(self.version);
        buf.extend_from_slice(self.asset.as_bytes());

        push_uvarint(&mut buf, self.inputs.len() as u64);
        for input in &self.inputs {
            encode_input(&mut buf, input);
        }

        push_uvarint(&mut buf, self.outputs.len() as u64);
        for output in &self.outputs {
            encode_output(&mut buf, output);
        }

        push_uvarint(&mut buf, self.references.len() as u64);
        for r in &self.references {
            buf.extend_from_slice(r.as_bytes());
        }

        push_bytes(&mut buf, &self.extra);
        buf
    }

    /// The message all signing schemes commit to.
    pub fn payload_hash(&self) -> Hash {
        Hash::digest(&self.payload_bytes())
    }
}

impl SignedTransaction {
    /// Payload hash of the underlying transaction; signatures are not part
    /// of the message.
    pub fn payload_hash(&self) -> Hash {
        self.transaction.payload_hash()
    }
}
