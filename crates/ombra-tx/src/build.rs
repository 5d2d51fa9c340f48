//! Transaction construction.
//!
//! Mutators append inputs and outputs; an output's position at append time
//! is the nonce its ghost keys are derived with, so outputs are never
//! reordered afterwards.

use rand::RngCore;
use zeroize::Zeroize;

use ombra_crypto::{derive_ghost_public, key_from_seed, Hash, PublicKey};
use ombra_types::constants::{
    EXTRA_SIZE_GENERAL_LIMIT, EXTRA_SIZE_STORAGE_CAPACITY, EXTRA_SIZE_STORAGE_STEP,
    EXTRA_STORAGE_PRICE_STEP, REFERENCES_COUNT_LIMIT, SLICE_COUNT_LIMIT,
};
use ombra_types::{Address, Integer};

use crate::types::{
    output_type, DepositData, Input, MintData, Output, Script, Transaction,
    TX_VERSION_HASH_SIGNATURE,
};
use crate::TxError;

impl Transaction {
    /// Empty hash-signature transaction for the given asset.
    pub fn new_v5(asset: Hash) -> Self {
        Self {
            version: TX_VERSION_HASH_SIGNATURE,
            asset,
            inputs: Vec::new(),
            outputs: Vec::new(),
            references: Vec::new(),
            extra: Vec::new(),
        }
    }

    /// Append an ordinary UTXO reference input.
    pub fn add_input(&mut self, hash: Hash, index: u64) {
        self.inputs.push(Input {
            hash,
            index,
            ..Input::default()
        });
    }

    /// Append a deposit input (zero hash, index zero).
    pub fn add_deposit_input(&mut self, deposit: DepositData) {
        self.inputs.push(Input {
            deposit: Some(deposit),
            ..Input::default()
        });
    }

    /// Append a mint input (zero hash, index zero).
    pub fn add_mint_input(&mut self, mint: MintData) {
        self.inputs.push(Input {
            mint: Some(mint),
            ..Input::default()
        });
    }

    /// Append an output of the given type.
    ///
    /// With recipients, the 64-byte seed becomes the ephemeral scalar `r`:
    /// the output mask is `r·G` and every recipient gets a ghost key derived
    /// with the output's position as nonce. Without recipients the key list
    /// stays empty and the mask zero.
    pub fn add_output_with_type(
        &mut self,
        output_type: u8,
        recipients: &[Address],
        script: Script,
        amount: Integer,
        seed: &[u8; 64],
    ) -> Result<(), TxError> {
        if self.outputs.len() >= SLICE_COUNT_LIMIT {
            return Err(TxError::TooManyOutputs(self.outputs.len() + 1));
        }

        let mut keys = Vec::with_capacity(recipients.len());
        let mut mask = PublicKey::default();

        if !recipients.is_empty() {
            let r = key_from_seed(seed);
            mask = r.public();
            let index = self.outputs.len() as u64;
            for a in recipients {
                keys.push(derive_ghost_public(&r, &a.public_view, &a.public_spend, index)?);
            }
        }

        self.outputs.push(Output {
            output_type,
            amount,
            keys,
            mask,
            script,
            withdrawal: None,
        });
        Ok(())
    }

    /// Append a script output addressed to `recipients`.
    pub fn add_script_output(
        &mut self,
        recipients: &[Address],
        script: Script,
        amount: Integer,
        seed: &[u8; 64],
    ) -> Result<(), TxError> {
        self.add_output_with_type(output_type::SCRIPT, recipients, script, amount, seed)
    }

    /// Append a script output with a CSPRNG ephemeral seed.
    pub fn add_random_script_output(
        &mut self,
        recipients: &[Address],
        script: Script,
        amount: Integer,
    ) -> Result<(), TxError> {
        let mut seed = [0u8; 64];
        rand::thread_rng().fill_bytes(&mut seed);
        let result = self.add_script_output(recipients, script, amount, &seed);
        seed.zeroize();
        result
    }

    /// Append a reference to another transaction.
    pub fn add_reference(&mut self, hash: Hash) -> Result<(), TxError> {
        if self.references.len() >= REFERENCES_COUNT_LIMIT {
            return Err(TxError::TooManyReferences(self.references.len() + 1));
        }
        self.references.push(hash);
        Ok(())
    }

    /// Set the extra bytes, enforcing the general or storage-priced cap.
    pub fn set_extra(&mut self, extra: Vec<u8>, storage: bool) -> Result<(), TxError> {
        let limit = if storage {
            EXTRA_SIZE_STORAGE_CAPACITY
        } else {
            EXTRA_SIZE_GENERAL_LIMIT
        };
        if extra.len() > limit {
            return Err(TxError::ExtraTooLarge {
                got: extra.len(),
                limit,
            });
        }
        self.extra = extra;
        Ok(())
    }
}

/// Price of storage-sized extra bytes: one step fee per started 1024-byte
/// step.
pub fn storage_extra_price(len: usize) -> Integer {
    let steps = len.div_ceil(EXTRA_SIZE_STORAGE_STEP) as u64;
    Integer::from_string(EXTRA_STORAGE_PRICE_STEP)
        .expect("storage price constant parses")
        .checked_mul_count(steps)
        .expect("storage price fits")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ombra_crypto::derive_ghost_private;

    fn asset() -> Hash {
        Hash::digest(b"asset")
    }

    #[test]
    fn test_new_v5_is_empty() {
        let tx = Transaction::new_v5(asset());
        assert_eq!(tx.version, TX_VERSION_HASH_SIGNATURE);
        assert_eq!(tx.asset, asset());
        assert!(tx.inputs.is_empty());
        assert!(tx.outputs.is_empty());
        assert!(tx.references.is_empty());
        assert!(tx.extra.is_empty());
    }

    #[test]
    fn test_add_input_plain() {
        let mut tx = Transaction::new_v5(asset());
        tx.add_input(Hash::digest(b"prev"), 3);
        assert_eq!(tx.inputs.len(), 1);
        assert_eq!(tx.inputs[0].index, 3);
        assert!(!tx.inputs[0].is_deposit_or_mint());
        assert!(tx.inputs[0].genesis.is_empty());
    }

    #[test]
    fn test_output_positional_nonce_is_stable() {
        // The ghost keys of output k must be derived with nonce k: the
        // recipient recovers the spending key using the on-chain position.
        let recipient = Address::from_seed(&[1u8; 64]);
        let seed = [2u8; 64];
        let mut tx = Transaction::new_v5(asset());

        for _ in 0..3 {
            tx.add_script_output(
                std::slice::from_ref(&recipient),
                Script::default(),
                Integer::new(1),
                &seed,
            )
            .unwrap();
        }

        for (i, out) in tx.outputs.iter().enumerate() {
            let ghost_priv = derive_ghost_private(
                &out.mask,
                &recipient.private_view,
                &recipient.private_spend,
                i as u64,
            )
            .unwrap();
            assert_eq!(ghost_priv.public(), out.keys[0], "output {}", i);
        }

        // Same seed, different position, different key.
        assert_ne!(tx.outputs[0].keys[0], tx.outputs[1].keys[0]);
    }

    #[test]
    fn test_output_without_recipients() {
        let mut tx = Transaction::new_v5(asset());
        tx.add_output_with_type(
            output_type::WITHDRAWAL_SUBMIT,
            &[],
            Script(vec![0xfe]),
            Integer::new(2),
            &[0u8; 64],
        )
        .unwrap();

        let out = &tx.outputs[0];
        assert!(out.keys.is_empty());
        assert_eq!(out.mask, PublicKey::default());
        assert_eq!(out.script, Script(vec![0xfe]));
    }

    #[test]
    fn test_output_mask_matches_seed() {
        let recipient = Address::from_seed(&[7u8; 64]);
        let seed = [9u8; 64];
        let mut tx = Transaction::new_v5(asset());
        tx.add_script_output(
            std::slice::from_ref(&recipient),
            Script::default(),
            Integer::new(1),
            &seed,
        )
        .unwrap();

        assert_eq!(tx.outputs[0].mask, key_from_seed(&seed).public());
    }

    #[test]
    fn test_multi_recipient_output_shares_mask() {
        let recipients = [Address::from_seed(&[1u8; 64]), Address::from_seed(&[2u8; 64])];
        let mut tx = Transaction::new_v5(asset());
        tx.add_script_output(&recipients, Script::default(), Integer::new(1), &[3u8; 64])
            .unwrap();

        let out = &tx.outputs[0];
        assert_eq!(out.keys.len(), 2);
        assert_ne!(out.keys[0], out.keys[1]);
        for (recipient, key) in recipients.iter().zip(&out.keys) {
            let ghost_priv = derive_ghost_private(
                &out.mask,
                &recipient.private_view,
                &recipient.private_spend,
                0,
            )
            .unwrap();
            assert_eq!(&ghost_priv.public(), key);
        }
    }

    #[test]
    fn test_random_script_outputs_differ() {
        let recipient = Address::from_seed(&[4u8; 64]);
        let mut tx = Transaction::new_v5(asset());
        tx.add_random_script_output(
            std::slice::from_ref(&recipient),
            Script::default(),
            Integer::new(1),
        )
        .unwrap();
        tx.add_random_script_output(
            std::slice::from_ref(&recipient),
            Script::default(),
            Integer::new(1),
        )
        .unwrap();
        assert_ne!(tx.outputs[0].mask, tx.outputs[1].mask);
    }

    #[test]
    fn test_output_count_limit() {
        let mut tx = Transaction::new_v5(asset());
        for _ in 0..SLICE_COUNT_LIMIT {
            tx.add_script_output(&[], Script::default(), Integer::new(1), &[0u8; 64])
                .unwrap();
        }
        assert!(matches!(
            tx.add_script_output(&[], Script::default(), Integer::new(1), &[0u8; 64]),
            Err(TxError::TooManyOutputs(_))
        ));
    }

    #[test]
    fn test_reference_limit() {
        let mut tx = Transaction::new_v5(asset());
        for i in 0..REFERENCES_COUNT_LIMIT {
            tx.add_reference(Hash::digest(&[i as u8])).unwrap();
        }
        assert!(matches!(
            tx.add_reference(Hash::digest(b"one too many")),
            Err(TxError::TooManyReferences(_))
        ));
    }

    #[test]
    fn test_extra_limits() {
        let mut tx = Transaction::new_v5(asset());
        tx.set_extra(vec![0u8; EXTRA_SIZE_GENERAL_LIMIT], false).unwrap();
        assert!(tx.set_extra(vec![0u8; EXTRA_SIZE_GENERAL_LIMIT + 1], false).is_err());

        tx.set_extra(vec![0u8; EXTRA_SIZE_GENERAL_LIMIT + 1], true).unwrap();
        assert!(tx
            .set_extra(vec![0u8; EXTRA_SIZE_STORAGE_CAPACITY + 1], true)
            .is_err());
    }

    #[test]
    fn test_storage_extra_price() {
        let step = Integer::from_string(EXTRA_STORAGE_PRICE_STEP).unwrap();
        assert_eq!(storage_extra_price(0), Integer::zero());
        assert_eq!(storage_extra_price(1), step);
        assert_eq!(storage_extra_price(1024), step);
        assert_eq!(storage_extra_price(1025), step.checked_mul_count(2).unwrap());
        assert_eq!(
            storage_extra_price(EXTRA_SIZE_STORAGE_CAPACITY),
            step.checked_mul_count(4096).unwrap()
        );
    }
}
