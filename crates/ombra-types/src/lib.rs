//! Foundational types for the Ombra transaction core.
//!
//! This crate provides the value types shared across all Ombra crates:
//! the four-key account `Address`, the fixed-point `Integer` amount type,
//! the injectable `Clock` time source, and network-wide size limits.

pub mod address;
pub mod clock;
pub mod constants;
pub mod integer;

pub use address::Address;
pub use clock::{Clock, OffsetClock, SystemClock};
pub use integer::Integer;
