//! Account addresses: a view key pair plus a spend key pair.
//!
//! Full address string encoding (base58, network prefixes, checksums) lives
//! outside this workspace. The `Display` form here is the compact hex pair
//! used by error messages and logs.

use ombra_crypto::{key_from_seed, random_key, sha512_scalar, PrivateKey, PublicKey};

/// A four-key account record. The view key detects incoming outputs, the
/// spend key authorizes spending them.
#[derive(Debug, Clone)]
pub struct Address {
    pub public_spend: PublicKey,
    pub public_view: PublicKey,
    pub private_spend: PrivateKey,
    pub private_view: PrivateKey,
}

impl Address {
    /// Fresh account from the CSPRNG.
    pub fn random() -> Self {
        Self::from_keys(random_key(), random_key())
    }

    /// Deterministic account: the spend key is the reduced seed, the view
    /// key is derived from the spend key bytes.
    pub fn from_seed(seed: &[u8; 64]) -> Self {
        let private_spend = key_from_seed(seed);
        let view_scalar = sha512_scalar(&[private_spend.as_bytes()]);
        let private_view = PrivateKey::from_bytes(view_scalar.to_bytes())
            .expect("reduced scalar is canonical");
        Self::from_keys(private_spend, private_view)
    }

    pub fn from_keys(private_spend: PrivateKey, private_view: PrivateKey) -> Self {
        Self {
            public_spend: private_spend.public(),
            public_view: private_view.public(),
            private_spend,
            private_view,
        }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.public_spend, self.public_view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_seed_deterministic() {
        let a = Address::from_seed(&[3u8; 64]);
        let b = Address::from_seed(&[3u8; 64]);
        assert_eq!(a.public_spend, b.public_spend);
        assert_eq!(a.public_view, b.public_view);

        let c = Address::from_seed(&[4u8; 64]);
        assert_ne!(a.public_spend, c.public_spend);
    }

    #[test]
    fn test_view_key_independent_of_spend_key() {
        let a = Address::from_seed(&[5u8; 64]);
        assert_ne!(a.public_spend, a.public_view);
    }

    #[test]
    fn test_random_accounts_differ() {
        assert_ne!(Address::random().public_spend, Address::random().public_spend);
    }

    #[test]
    fn test_display_is_hex_pair() {
        let a = Address::from_seed(&[6u8; 64]);
        let s = a.to_string();
        assert_eq!(s.len(), 64 + 1 + 64);
        assert!(s.contains(':'));
    }
}
