//! Aggregated multi-signer Schnorr signing.
//!
//! All spending keys across all inputs collapse into one 64-byte signature:
//!
//!   1. Walk inputs in order, deriving each signer's ghost private key and
//!      its global index into the concatenation of every input's UTXO key
//!      list. Indices must be strictly ascending.
//!   2. Derive one deterministic nonce per signer from the caller's seed
//!      and the signer index, summing nonce points into `P` and signer
//!      public keys into `A`.
//!   3. Challenge `x = Hs(P ‖ A ‖ payload_hash)`, response
//!      `S = Σ (x·priv_i + r_i)`, signature `P ‖ S`.
//!
//! A verifier rebuilds `A` from the signer vector and checks
//! `S·G == x·A + P`. Nonces are deterministic in `(seed, signer index)`, so
//! a seed MUST never be reused across transactions.

use curve25519_dalek::constants::ED25519_BASEPOINT_TABLE;
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::{Identity, VartimeMultiscalarMul};
use zeroize::Zeroize;

use ombra_crypto::{
    blake3_hash, derive_ghost_private, key_from_seed, sha512_scalar, PublicKey, Signature,
};
use ombra_types::Address;

use crate::sign::{keys_filter, UtxoKeysReader};
use crate::types::{AggregatedSignature, SignedTransaction};
use crate::TxError;

/// Deterministic per-signer nonce scalar: the BLAKE3 hash of
/// `seed ‖ be16(signer)`, repeated to 64 bytes and reduced.
fn signer_nonce(seed: &[u8], signer: usize) -> Scalar {
    let mut buf = Vec::with_capacity(seed.len() + 2);
    buf.extend_from_slice(seed);
    buf.extend_from_slice(&(signer as u16).to_be_bytes());
    let s = blake3_hash(&buf);

    let mut wide = [0u8; 64];
    wide[..32].copy_from_slice(&s);
    wide[32..].copy_from_slice(&s);
    let nonce = key_from_seed(&wide);
    wide.zeroize();
    // Canonical by construction.
    Scalar::from_bytes_mod_order(*nonce.as_bytes())
}

impl SignedTransaction {
    /// Produce the aggregated signature over all inputs.
    ///
    /// `accounts[j]` holds the accounts signing input `j`, supplied in
    /// ascending UTXO-key order; `seed` drives the deterministic nonces and
    /// must be unique per transaction.
    pub fn aggregate_sign<R: UtxoKeysReader>(
        &mut self,
        reader: &R,
        accounts: &[Vec<Address>],
        seed: &[u8],
    ) -> Result<(), TxError> {
        if !self.signatures_map.is_empty() || self.aggregated_signature.is_some() {
            return Err(TxError::ConflictingSignatures);
        }
        if accounts.len() != self.transaction.inputs.len() {
            return Err(TxError::InvalidAccountsCount {
                got: accounts.len(),
                want: self.transaction.inputs.len(),
            });
        }

        // 1. Gather signer indices, private keys, and the global key list.
        let mut signers: Vec<usize> = Vec::new();
        let mut priv_keys = Vec::new();
        let mut pub_keys: Vec<PublicKey> = Vec::new();

        for (index, input) in self.transaction.inputs.iter().enumerate() {
            let utxo = reader
                .read_utxo_keys(&input.hash, input.index)?
                .ok_or(TxError::InputNotFound {
                    hash: input.hash,
                    index: input.index,
                })?;

            let filter = keys_filter(&utxo.keys)?;
            for account in &accounts[index] {
                let ghost_priv = derive_ghost_private(
                    &utxo.mask,
                    &account.private_view,
                    &account.private_spend,
                    input.index,
                )?;
                let i = filter
                    .get(&ghost_priv.public())
                    .copied()
                    .ok_or_else(|| TxError::InvalidKey(account.to_string()))?;

                let m = pub_keys.len() + i as usize;
                if let Some(&prev) = signers.last() {
                    if m <= prev {
                        return Err(TxError::InvalidSignersOrder { prev, cur: m });
                    }
                }
                signers.push(m);
                priv_keys.push(ghost_priv);
            }
            pub_keys.extend_from_slice(&utxo.keys);
        }

        // 2. Per-signer nonces; accumulate P = Σ R_m and A = Σ pub_keys[m].
        let mut p_sum = EdwardsPoint::identity();
        let mut a_sum = EdwardsPoint::identity();
        let mut randoms = Vec::with_capacity(signers.len());

        for &m in &signers {
            let r = signer_nonce(seed, m);
            p_sum += ED25519_BASEPOINT_TABLE * &r;

            let pk = pub_keys[m];
            let a = CompressedEdwardsY(*pk.as_bytes())
                .decompress()
                .ok_or_else(|| {
                    TxError::Crypto(ombra_crypto::CryptoError::InvalidPoint(pk.to_string()))
                })?;
            a_sum += a;
            randoms.push(r);
        }

        // 3. Challenge and response.
        let msg = self.payload_hash();
        let x = sha512_scalar(&[
            p_sum.compress().as_bytes(),
            a_sum.compress().as_bytes(),
            msg.as_bytes(),
        ]);

        let mut s_sum = Scalar::ZERO;
        for (ghost_priv, r) in priv_keys.iter().zip(randoms.iter()) {
            // These scalars were derived above; a non-canonical encoding
            // here means the curve library is broken.
            let y = Option::<Scalar>::from(Scalar::from_canonical_bytes(*ghost_priv.as_bytes()))
                .unwrap_or_else(|| panic!("non-canonical derived key"));
            s_sum += x * y + r;
        }
        for r in randoms.iter_mut() {
            r.zeroize();
        }

        let mut signature = [0u8; 64];
        signature[..32].copy_from_slice(p_sum.compress().as_bytes());
        signature[32..].copy_from_slice(&s_sum.to_bytes());

        self.aggregated_signature = Some(AggregatedSignature {
            signers,
            signature: Signature(signature),
        });
        Ok(())
    }
}

impl AggregatedSignature {
    /// Check `S·G == x·A + P` against the concatenated per-input key lists.
    ///
    /// This is the test-side oracle for the signing path; validator policy
    /// around it lives outside this workspace.
    pub fn verify(&self, pub_keys: &[PublicKey], msg: &[u8]) -> bool {
        let Some(p) = CompressedEdwardsY(crate::to32(&self.signature.0[..32])).decompress()
        else {
            return false;
        };
        let Some(s) =
            Option::<Scalar>::from(Scalar::from_canonical_bytes(crate::to32(
                &self.signature.0[32..],
            )))
        else {
            return false;
        };

        let mut a_sum = EdwardsPoint::identity();
        for &m in &self.signers {
            let Some(pk) = pub_keys.get(m) else {
                return false;
            };
            let Some(a) = CompressedEdwardsY(*pk.as_bytes()).decompress() else {
                return false;
            };
            a_sum += a;
        }

        let x = sha512_scalar(&[
            p.compress().as_bytes(),
            a_sum.compress().as_bytes(),
            msg,
        ]);
        let sg = ED25519_BASEPOINT_TABLE * &s;
        let xa = EdwardsPoint::vartime_multiscalar_mul(&[x], &[a_sum]);
        sg == xa + p
    }
}
