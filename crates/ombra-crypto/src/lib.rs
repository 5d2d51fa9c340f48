//! Ed25519 primitives for the Ombra transaction core.
//!
//! Provides the 32-byte key/hash newtypes used across all Ombra crates,
//! seed-to-scalar reduction, deterministic Schnorr signing with scalar keys,
//! and the ghost (one-time) key derivation protocol for stealth outputs.
//!
//! All curve arithmetic delegates to curve25519-dalek; hashing uses SHA-512
//! for scalar derivation and BLAKE3 for content hashes.

pub mod ghost;
pub mod hash;
pub mod key;

pub use ghost::{derive_ghost_private, derive_ghost_public, view_ghost_output};
pub use hash::{blake3_hash, push_uvarint, sha512_scalar, Hash};
pub use key::{key_from_seed, random_key, PrivateKey, PublicKey, Signature};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid point encoding {0}")]
    InvalidPoint(String),

    #[error("invalid scalar encoding {0}")]
    InvalidScalar(String),
}

pub(crate) fn to32(s: &[u8]) -> [u8; 32] {
    let mut buf = [0u8; 32];
    let len = s.len().min(32);
    buf[..len].copy_from_slice(&s[..len]);
    buf
}
