//! Scalar private keys, compressed point public keys, and Schnorr signatures.
//!
//! Private keys are canonical Ed25519 scalars, not seeds: signing follows the
//! Schnorr construction directly (`r = Hs(priv ‖ msg)`, `S = r + Hs(R ‖ A ‖
//! msg)·priv`) so that keys derived by the ghost protocol can sign without a
//! seed expansion step.

use curve25519_dalek::constants::ED25519_BASEPOINT_TABLE;
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::VartimeMultiscalarMul;
use rand::RngCore;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{to32, CryptoError};

/// Canonical Ed25519 scalar. Scrubbed on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub(crate) [u8; 32]);

/// Compressed Edwards point encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; 32]);

/// 64-byte Schnorr signature, `R ‖ S`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

/// Reduce a 64-byte seed to a canonical scalar mod L.
pub fn key_from_seed(seed: &[u8; 64]) -> PrivateKey {
    PrivateKey(Scalar::from_bytes_mod_order_wide(seed).to_bytes())
}

/// Fresh private key from 64 CSPRNG bytes.
pub fn random_key() -> PrivateKey {
    let mut seed = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut seed);
    let key = key_from_seed(&seed);
    seed.zeroize();
    key
}

impl PrivateKey {
    /// Accept externally supplied scalar bytes, rejecting non-canonical
    /// encodings.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        match Option::<Scalar>::from(Scalar::from_canonical_bytes(bytes)) {
            Some(s) => Ok(Self(s.to_bytes())),
            None => Err(CryptoError::InvalidScalar(hex::encode(bytes))),
        }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub(crate) fn scalar(&self) -> Scalar {
        // Canonical by construction.
        Scalar::from_bytes_mod_order(self.0)
    }

    /// The corresponding public key, `priv·G`.
    pub fn public(&self) -> PublicKey {
        let point = ED25519_BASEPOINT_TABLE * &self.scalar();
        PublicKey(point.compress().to_bytes())
    }

    /// Deterministic Schnorr signature over `msg`.
    pub fn sign(&self, msg: &[u8]) -> Signature {
        let key = self.scalar();
        let r = crate::sha512_scalar(&[&self.0, msg]);
        let big_r = (ED25519_BASEPOINT_TABLE * &r).compress();
        let public = self.public();
        let x = crate::sha512_scalar(&[big_r.as_bytes(), &public.0, msg]);
        let s = r + x * key;

        let mut sig = [0u8; 64];
        sig[..32].copy_from_slice(big_r.as_bytes());
        sig[32..].copy_from_slice(&s.to_bytes());
        Signature(sig)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never leak scalar bytes through debug output.
        f.write_str("PrivateKey(..)")
    }
}

impl PublicKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub(crate) fn decompress(&self) -> Result<EdwardsPoint, CryptoError> {
        CompressedEdwardsY(self.0)
            .decompress()
            .ok_or_else(|| CryptoError::InvalidPoint(hex::encode(self.0)))
    }

    /// Verify a Schnorr signature: `S·G == R + Hs(R ‖ A ‖ msg)·A`.
    pub fn verify(&self, msg: &[u8], sig: &Signature) -> bool {
        let Ok(a) = self.decompress() else {
            return false;
        };
        let Some(big_r) = CompressedEdwardsY(to32(&sig.0[..32])).decompress() else {
            return false;
        };
        let Some(s) = Option::<Scalar>::from(Scalar::from_canonical_bytes(to32(&sig.0[32..])))
        else {
            return false;
        };

        let x = crate::sha512_scalar(&[&sig.0[..32], &self.0, msg]);
        let sg = ED25519_BASEPOINT_TABLE * &s;
        let xa = EdwardsPoint::vartime_multiscalar_mul(&[x], &[a]);
        sg == big_r + xa
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(D::Error::custom)?;
        if bytes.len() != 32 {
            return Err(D::Error::custom(format!("key length {}", bytes.len())));
        }
        Ok(PublicKey(to32(&bytes)))
    }
}

impl Signature {
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(D::Error::custom)?;
        if bytes.len() != 64 {
            return Err(D::Error::custom(format!("signature length {}", bytes.len())));
        }
        let mut sig = [0u8; 64];
        sig.copy_from_slice(&bytes);
        Ok(Signature(sig))
    }
}
