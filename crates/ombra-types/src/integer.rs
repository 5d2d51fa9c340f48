//! Fixed-point amount arithmetic.
//!
//! Amounts carry 8 decimal places in a `u128`. Only addition, subtraction,
//! and comparison are needed by the transaction core; both operations are
//! checked, and the operator forms panic on overflow or underflow the same
//! way the ledger treats a negative balance: as an unreachable state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decimal places carried by every amount.
pub const PRECISION: u32 = 8;

const BASE: u128 = 100_000_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntegerError {
    #[error("malformed amount string {0:?}")]
    Malformed(String),

    #[error("amount {0:?} has more than {PRECISION} decimal places")]
    TooManyDecimals(String),

    #[error("amount overflow")]
    Overflow,
}

/// Non-negative fixed-point amount with 8 decimal places.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Integer(u128);

impl Integer {
    pub fn zero() -> Self {
        Self(0)
    }

    /// Whole units.
    pub fn new(units: u64) -> Self {
        Self(units as u128 * BASE)
    }

    /// Parse a decimal string such as `"10000"` or `"0.0001"`.
    pub fn from_string(s: &str) -> Result<Self, IntegerError> {
        let malformed = || IntegerError::Malformed(s.to_string());
        let (whole, frac) = match s.split_once('.') {
            Some((_, "")) => return Err(malformed()),
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() || whole.bytes().any(|b| !b.is_ascii_digit()) {
            return Err(malformed());
        }
        if frac.bytes().any(|b| !b.is_ascii_digit()) {
            return Err(malformed());
        }
        if frac.len() > PRECISION as usize {
            return Err(IntegerError::TooManyDecimals(s.to_string()));
        }

        let whole: u128 = whole.parse().map_err(|_| malformed())?;
        let mut frac_units: u128 = if frac.is_empty() {
            0
        } else {
            frac.parse().map_err(|_| malformed())?
        };
        frac_units *= 10u128.pow(PRECISION - frac.len() as u32);

        whole
            .checked_mul(BASE)
            .and_then(|w| w.checked_add(frac_units))
            .map(Self)
            .ok_or(IntegerError::Overflow)
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Multiply by a plain count (used for step-priced fees).
    pub fn checked_mul_count(self, count: u64) -> Option<Self> {
        self.0.checked_mul(count as u128).map(Self)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Fixed-width big-endian encoding of the underlying units.
    pub fn to_be_bytes(&self) -> [u8; 16] {
        self.0.to_be_bytes()
    }
}

impl std::ops::Add for Integer {
    type Output = Integer;

    fn add(self, other: Integer) -> Integer {
        self.checked_add(other).expect("amount overflow")
    }
}

impl std::ops::Sub for Integer {
    type Output = Integer;

    fn sub(self, other: Integer) -> Integer {
        self.checked_sub(other).expect("amount underflow")
    }
}

impl std::fmt::Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.0 / BASE;
        let frac = self.0 % BASE;
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let frac = format!("{:08}", frac);
        write!(f, "{}.{}", whole, frac.trim_end_matches('0'))
    }
}
