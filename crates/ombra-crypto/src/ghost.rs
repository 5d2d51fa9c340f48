//! Ghost (one-time) key derivation for stealth outputs.
//!
//! A sender with ephemeral scalar `r` addresses an output to a recipient
//! `(A, B)` (public view and spend keys) at output index `i`:
//!
//!   ghost public key  `P = Hs(r·A ‖ i)·G + B`
//!
//! publishing the mask `R = r·G` alongside. The recipient recovers the
//! spending scalar with their private view key `a` and spend key `b`:
//!
//!   ghost private key `p = Hs(a·R ‖ i) + b`
//!
//! since `a·R = r·A`. `view_ghost_output` strips the derivation term from a
//! published key, returning `B` iff the output is addressed to the holder of
//! `a`. `Hs` is the wide SHA-512 scalar reduction with the index appended as
//! an unsigned varint.

use curve25519_dalek::constants::ED25519_BASEPOINT_TABLE;
use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::VartimeMultiscalarMul;

use crate::hash::{push_uvarint, sha512_scalar};
use crate::key::{PrivateKey, PublicKey};
use crate::CryptoError;

/// Hs(shared ‖ uvarint(index))
fn derivation_scalar(shared: &EdwardsPoint, index: u64) -> Scalar {
    let mut buf = Vec::with_capacity(42);
    buf.extend_from_slice(shared.compress().as_bytes());
    push_uvarint(&mut buf, index);
    sha512_scalar(&[&buf])
}

/// One-time public key for an output: `Hs(r·A ‖ i)·G + B`.
pub fn derive_ghost_public(
    r: &PrivateKey,
    view_pub: &PublicKey,
    spend_pub: &PublicKey,
    index: u64,
) -> Result<PublicKey, CryptoError> {
    let a = view_pub.decompress()?;
    let b = spend_pub.decompress()?;

    let shared = EdwardsPoint::vartime_multiscalar_mul(&[r.scalar()], &[a]);
    let hs = derivation_scalar(&shared, index);
    let point = ED25519_BASEPOINT_TABLE * &hs + b;
    Ok(PublicKey(point.compress().to_bytes()))
}

/// One-time private key for spending an output: `Hs(a·R ‖ i) + b`.
pub fn derive_ghost_private(
    mask: &PublicKey,
    view_priv: &PrivateKey,
    spend_priv: &PrivateKey,
    index: u64,
) -> Result<PrivateKey, CryptoError> {
    let r_point = mask.decompress()?;

    let shared = EdwardsPoint::vartime_multiscalar_mul(&[view_priv.scalar()], &[r_point]);
    let hs = derivation_scalar(&shared, index);
    let p = hs + spend_priv.scalar();
    Ok(PrivateKey(p.to_bytes()))
}

/// Strip the derivation term from a one-time key: `P − Hs(a·R ‖ i)·G`.
///
/// Equals the recipient's public spend key iff the output is addressed to
/// the holder of `view_priv`.
pub fn view_ghost_output(
    one_time_pub: &PublicKey,
    view_priv: &PrivateKey,
    mask: &PublicKey,
    index: u64,
) -> Result<PublicKey, CryptoError> {
    let p = one_time_pub.decompress()?;
    let r_point = mask.decompress()?;

    let shared = EdwardsPoint::vartime_multiscalar_mul(&[view_priv.scalar()], &[r_point]);
    let hs = derivation_scalar(&shared, index);
    let point = p - ED25519_BASEPOINT_TABLE * &hs;
    Ok(PublicKey(point.compress().to_bytes()))
}
