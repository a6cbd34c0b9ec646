//! Bit-to-byte addressing shared by every backing strategy.
//!
//! Bit `i` lives in byte `i >> 3` at bit position `i & 7`, LSB-first. A bit
//! array of capacity `C` accepts every index in `[0, C]` (both ends
//! inclusive) and is stored in `C / 8 + 1` bytes.

use bitvault_common::{Result, error::Error, verify_arg, verify_index};

/// Capacity and derived storage size of a bit array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteLayout {
    capacity: usize,
    byte_len: usize,
}

impl ByteLayout {
    /// Creates the layout for `capacity` addressable bits.
    ///
    /// # Errors
    ///
    /// Invalid-argument error if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<ByteLayout> {
        verify_arg!(capacity, capacity > 0);
        Ok(ByteLayout {
            capacity,
            byte_len: (capacity >> 3) + 1,
        })
    }

    /// The largest valid bit index.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of storage bytes.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Last index visited by forward set-bit searches, one below the
    /// capacity.
    #[inline]
    pub fn last_searchable(&self) -> usize {
        self.capacity - 1
    }

    /// Minimum length of a backing file for this layout: the storage bytes
    /// plus one trailing byte.
    #[inline]
    pub fn min_file_len(&self) -> u64 {
        self.byte_len as u64 + 1
    }

    /// Returns the byte offset and the in-byte mask of bit `index`.
    ///
    /// # Errors
    ///
    /// Out-of-range error if `index > capacity`.
    #[inline]
    pub fn locate(&self, index: usize) -> Result<(usize, u8)> {
        verify_index!(index, self.capacity);
        Ok((index >> 3, 1u8 << (index & 7)))
    }

    /// Checks that a merge operand has the same storage size.
    pub fn verify_operand(&self, other_byte_len: usize) -> Result<()> {
        if other_byte_len != self.byte_len {
            return Err(Error::invalid_arg(
                "other",
                format!(
                    "bit array to combine with must be of equal length ({other_byte_len} != {})",
                    self.byte_len
                ),
            ));
        }
        Ok(())
    }

    /// Reads bit `index` from in-memory storage.
    #[inline]
    pub fn get(&self, bytes: &[u8], index: usize) -> Result<bool> {
        let (pos, mask) = self.locate(index)?;
        Ok(bytes[pos] & mask != 0)
    }

    /// Sets bit `index` in in-memory storage.
    #[inline]
    pub fn set(&self, bytes: &mut [u8], index: usize) -> Result<()> {
        let (pos, mask) = self.locate(index)?;
        bytes[pos] |= mask;
        Ok(())
    }

    /// Clears bit `index` in in-memory storage.
    #[inline]
    pub fn reset(&self, bytes: &mut [u8], index: usize) -> Result<()> {
        let (pos, mask) = self.locate(index)?;
        bytes[pos] &= !mask;
        Ok(())
    }
}

/// Byte-wise boolean merge of two equally sized bit arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOp {
    And,
    Or,
}

impl MergeOp {
    #[inline]
    pub fn combine(self, left: u8, right: u8) -> u8 {
        match self {
            MergeOp::And => left & right,
            MergeOp::Or => left | right,
        }
    }

    /// Combines `src` into `dst` in place, byte by byte.
    pub fn apply(self, dst: &mut [u8], src: &[u8]) {
        debug_assert_eq!(dst.len(), src.len());
        for (d, s) in dst.iter_mut().zip(src.iter()) {
            *d = self.combine(*d, *s);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ByteLayout, MergeOp};

    #[test]
    fn test_byte_len_keeps_slack_byte() {
        assert!(ByteLayout::new(0).unwrap_err().is_invalid_arg());
        assert_eq!(ByteLayout::new(1).unwrap().byte_len(), 1);
        assert_eq!(ByteLayout::new(7).unwrap().byte_len(), 1);
        assert_eq!(ByteLayout::new(8).unwrap().byte_len(), 2);
        assert_eq!(ByteLayout::new(1000).unwrap().byte_len(), 126);
        assert_eq!(ByteLayout::new(1000).unwrap().min_file_len(), 127);
        assert_eq!(ByteLayout::new(1).unwrap().last_searchable(), 0);
        assert_eq!(ByteLayout::new(16).unwrap().last_searchable(), 15);
    }

    #[test]
    fn test_locate() {
        let layout = ByteLayout::new(16).unwrap();
        assert_eq!(layout.locate(0).unwrap(), (0, 0b0000_0001));
        assert_eq!(layout.locate(7).unwrap(), (0, 0b1000_0000));
        assert_eq!(layout.locate(9).unwrap(), (1, 0b0000_0010));
        assert_eq!(layout.locate(16).unwrap(), (2, 0b0000_0001));
        assert!(layout.locate(17).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_in_memory_bit_ops() {
        let layout = ByteLayout::new(20).unwrap();
        let mut bytes = vec![0u8; layout.byte_len()];
        layout.set(&mut bytes, 3).unwrap();
        layout.set(&mut bytes, 20).unwrap();
        assert_eq!(bytes, [0b0000_1000, 0, 0b0001_0000]);
        assert!(layout.get(&bytes, 20).unwrap());
        layout.reset(&mut bytes, 3).unwrap();
        assert!(!layout.get(&bytes, 3).unwrap());
        assert!(layout.set(&mut bytes, 21).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_merge_ops() {
        let mut dst = [0b1100u8, 0xFF];
        MergeOp::Or.apply(&mut dst, &[0b0011, 0]);
        assert_eq!(dst, [0b1111, 0xFF]);
        MergeOp::And.apply(&mut dst, &[0b0101, 0x0F]);
        assert_eq!(dst, [0b0101, 0x0F]);
    }

    #[test]
    fn test_verify_operand() {
        let layout = ByteLayout::new(1000).unwrap();
        assert!(layout.verify_operand(126).is_ok());
        assert!(layout.verify_operand(127).unwrap_err().is_invalid_arg());
    }
}
