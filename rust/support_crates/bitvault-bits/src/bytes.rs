//! Helpers over plain byte buffers.

use bitvault_common::{Result, error::Error};
use byteorder::{BigEndian, ByteOrder, NativeEndian};

/// Reads a big-endian `u64` stored at `offset`.
///
/// Fails with an out-of-range error when `bytes` holds fewer than eight
/// bytes starting at `offset`.
pub fn read_u64_be(bytes: &[u8], offset: usize) -> Result<u64> {
    let end = check_u64_window(bytes.len(), offset)?;
    Ok(BigEndian::read_u64(&bytes[offset..end]))
}

/// Writes `value` as a big-endian `u64` at `offset`.
pub fn write_u64_be(bytes: &mut [u8], offset: usize, value: u64) -> Result<()> {
    let end = check_u64_window(bytes.len(), offset)?;
    BigEndian::write_u64(&mut bytes[offset..end], value);
    Ok(())
}

/// Number of set bits in `bytes`.
pub fn cardinality(bytes: &[u8]) -> u64 {
    let chunks = bytes.chunks_exact(8);
    let tail = chunks
        .remainder()
        .iter()
        .map(|b| b.count_ones() as u64)
        .sum::<u64>();
    chunks
        .map(|chunk| NativeEndian::read_u64(chunk).count_ones() as u64)
        .sum::<u64>()
        + tail
}

/// Fills `bytes` with pseudo-random content.
pub fn fill_random(bytes: &mut [u8]) {
    fastrand::fill(bytes);
}

fn check_u64_window(len: usize, offset: usize) -> Result<usize> {
    let end = offset
        .checked_add(std::mem::size_of::<u64>())
        .ok_or_else(|| Error::index_out_of_range(offset, len))?;
    if end > len {
        return Err(Error::index_out_of_range(end - 1, len.saturating_sub(1)));
    }
    Ok(end)
}
