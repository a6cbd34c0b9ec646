//! Heap-backed bit array.

use bitvault_bits::{bytes, scan};
use bitvault_common::{Result, verify_arg};

use crate::{
    bit_array::BitArray,
    layout::{ByteLayout, MergeOp},
};

/// A [`BitArray`] whose storage is a process-owned byte buffer.
///
/// Fastest of the backing strategies and not persistent. It is the reference
/// behaviour the file-backed variants are measured against.
///
/// There is nothing to release, so [`BitArray::close`] does nothing and the
/// array stays usable afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct InMemoryBitArray {
    layout: ByteLayout,
    bits: Box<[u8]>,
}

impl InMemoryBitArray {
    /// Creates a bit array for indices `[0, capacity]` with every bit cleared.
    pub fn new(capacity: usize) -> Result<InMemoryBitArray> {
        let layout = ByteLayout::new(capacity)?;
        Ok(InMemoryBitArray {
            layout,
            bits: vec![0u8; layout.byte_len()].into_boxed_slice(),
        })
    }

    /// Wraps existing storage bytes, e.g. a snapshot taken with
    /// [`BitArray::to_byte_array`].
    ///
    /// # Errors
    ///
    /// Invalid-argument error if `bytes` is not exactly `capacity / 8 + 1`
    /// bytes long.
    pub fn from_bytes(bytes: impl Into<Box<[u8]>>, capacity: usize) -> Result<InMemoryBitArray> {
        let layout = ByteLayout::new(capacity)?;
        let bits: Box<[u8]> = bytes.into();
        verify_arg!(bytes, bits.len() == layout.byte_len());
        Ok(InMemoryBitArray { layout, bits })
    }

    /// Direct view of the storage bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    fn merge(&mut self, other: &dyn BitArray, op: MergeOp) -> Result<()> {
        self.layout.verify_operand(other.byte_len())?;
        let operand = other.to_byte_array()?;
        op.apply(&mut self.bits, &operand);
        Ok(())
    }
}

impl BitArray for InMemoryBitArray {
    fn capacity(&self) -> usize {
        self.layout.capacity()
    }

    fn byte_len(&self) -> usize {
        self.layout.byte_len()
    }

    fn get_bit(&self, index: usize) -> Result<bool> {
        self.layout.get(&self.bits, index)
    }

    fn set_bit(&mut self, index: usize) -> Result<bool> {
        self.layout.set(&mut self.bits, index)?;
        Ok(true)
    }

    fn clear_bit(&mut self, index: usize) -> Result<()> {
        self.layout.reset(&mut self.bits, index)
    }

    fn clear(&mut self) -> Result<()> {
        self.bits.fill(0);
        Ok(())
    }

    fn or(&mut self, other: &dyn BitArray) -> Result<()> {
        self.merge(other, MergeOp::Or)
    }

    fn and(&mut self, other: &dyn BitArray) -> Result<()> {
        self.merge(other, MergeOp::And)
    }

    fn to_byte_array(&self) -> Result<Vec<u8>> {
        Ok(self.bits.to_vec())
    }

    fn highest_set_bit(&self) -> Result<Option<usize>> {
        Ok(scan::highest_set_bit_in(&self.bits))
    }

    fn lowest_set_bit(&self) -> Result<Option<usize>> {
        Ok(scan::lowest_set_bit_in(&self.bits))
    }

    fn next_set_bit(&self, from: usize) -> Result<Option<usize>> {
        Ok(scan::next_set_bit_in(
            &self.bits,
            from,
            self.layout.last_searchable(),
        ))
    }

    fn count_ones(&self) -> Result<u64> {
        Ok(bytes::cardinality(&self.bits))
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_closed(&self) -> bool {
        false
    }
}

impl std::fmt::Debug for InMemoryBitArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBitArray")
            .field("capacity", &self.layout.capacity())
            .field("byte_len", &self.layout.byte_len())
            .finish()
    }
}
