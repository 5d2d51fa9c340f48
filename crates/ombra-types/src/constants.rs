//! Network-wide size and count limits.
//!
//! These are part of the public contract; enforcement sites live outside
//! this workspace but every limit is bit-exact here.

/// Max `Extra` bytes for transactions without storage-priced outputs.
pub const EXTRA_SIZE_GENERAL_LIMIT: usize = 256;

/// Extra-storage price step in bytes.
pub const EXTRA_SIZE_STORAGE_STEP: usize = 1024;

/// Max `Extra` bytes for storage-priced transactions.
pub const EXTRA_SIZE_STORAGE_CAPACITY: usize = 1024 * 1024 * 4;

/// Price per storage step, parsed through `Integer::from_string`.
pub const EXTRA_STORAGE_PRICE_STEP: &str = "0.0001";

/// Max outputs (and similar slices) per transaction.
pub const SLICE_COUNT_LIMIT: usize = 256;

/// Max `References` entries per transaction.
pub const REFERENCES_COUNT_LIMIT: usize = 16;
