//! Bit and byte level helpers shared by the bit array implementations.
//!
//! - [`scan`]: position of the highest/lowest set bit within a single byte,
//!   and the byte-wise scans built on it.
//! - [`bytes`]: big-endian `u64` access, population count and random fill
//!   over plain byte slices.

pub mod bytes;
pub mod scan;
