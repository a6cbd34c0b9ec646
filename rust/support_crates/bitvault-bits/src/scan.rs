//! Set-bit scans over single bytes and byte slices.
//!
//! Bits are numbered LSB-first: bit 0 is the least significant bit of a byte,
//! bit `8 * k + j` of a slice is bit `j` of byte `k`.

/// Numeric "not found" sentinel for callers that carry bit positions as
/// signed integers. The functions in this module return `None` instead.
pub const NOT_FOUND: i64 = -1;

/// Converts a scan result to the signed encoding, `None` becoming
/// [`NOT_FOUND`].
#[inline]
pub fn to_signed(position: Option<usize>) -> i64 {
    position.map_or(NOT_FOUND, |p| p as i64)
}

/// Returns the index (0..=7) of the most significant set bit of `byte`,
/// or `None` if `byte` is zero.
#[inline]
pub fn highest_set_bit(byte: u8) -> Option<u32> {
    if byte == 0 {
        None
    } else {
        Some(7 - byte.leading_zeros())
    }
}

/// Returns the index (0..=7) of the least significant set bit of `byte`,
/// or `None` if `byte` is zero.
#[inline]
pub fn lowest_set_bit(byte: u8) -> Option<u32> {
    if byte == 0 {
        None
    } else {
        Some(byte.trailing_zeros())
    }
}

/// Returns the highest set bit position across `bytes`, scanning from the
/// last byte towards the first and skipping zero bytes.
pub fn highest_set_bit_in(bytes: &[u8]) -> Option<usize> {
    let (byte_index, &byte) = bytes.iter().enumerate().rev().find(|(_, b)| **b != 0)?;
    let bit = highest_set_bit(byte)? as usize;
    Some(byte_index * 8 + bit)
}

/// Returns the lowest set bit position across `bytes`, scanning from the
/// first byte and skipping zero bytes.
pub fn lowest_set_bit_in(bytes: &[u8]) -> Option<usize> {
    let (byte_index, &byte) = bytes.iter().enumerate().find(|(_, b)| **b != 0)?;
    let bit = lowest_set_bit(byte)? as usize;
    Some(byte_index * 8 + bit)
}

/// Returns the first set bit position `p` with `from <= p <= last`, or `None`.
///
/// Positions beyond the slice are treated as unset. Whole zero bytes are
/// skipped; the first and last visited bytes are masked to the requested
/// window.
pub fn next_set_bit_in(bytes: &[u8], from: usize, last: usize) -> Option<usize> {
    if from > last {
        return None;
    }
    let first_byte = from >> 3;
    let last_byte = std::cmp::min(last >> 3, bytes.len().checked_sub(1)?);
    if first_byte > last_byte {
        return None;
    }

    for (byte_index, &byte) in bytes[first_byte..=last_byte].iter().enumerate() {
        let byte_index = first_byte + byte_index;
        let mut byte = byte;
        if byte_index == first_byte {
            byte &= 0xFFu8 << (from & 7);
        }
        if byte_index == last >> 3 {
            byte &= 0xFFu8 >> (7 - (last & 7));
        }
        if let Some(bit) = lowest_set_bit(byte) {
            return Some(byte_index * 8 + bit as usize);
        }
    }
    None
}
