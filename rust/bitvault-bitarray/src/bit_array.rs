//! The capability set shared by every bit array backing strategy.

use bitvault_bits::{bytes, scan};
use bitvault_common::Result;

/// A fixed-capacity array of bits addressed by index.
///
/// A bit array of capacity `C` accepts every index in `[0, C]` and stores its
/// bits in `C / 8 + 1` bytes: bit `i` is bit `i & 7` (LSB-first) of byte
/// `i >> 3`. The capacity never changes after construction.
///
/// # Errors
///
/// - An index greater than the capacity fails with
///   [`ErrorKind::IndexOutOfRange`](bitvault_common::error::ErrorKind::IndexOutOfRange).
/// - Merging with an operand of a different byte length fails with
///   [`ErrorKind::InvalidArgument`](bitvault_common::error::ErrorKind::InvalidArgument)
///   and leaves the receiver untouched.
/// - Storage failures surface as
///   [`ErrorKind::Io`](bitvault_common::error::ErrorKind::Io) and are never retried.
/// - Once a file-backed array has been closed, any use except `close` itself
///   and the size queries fails with
///   [`ErrorKind::InvalidOperation`](bitvault_common::error::ErrorKind::InvalidOperation).
///   Closing an in-memory array releases nothing and leaves it usable.
///
/// # Concurrency
///
/// Implementations do no internal locking. Mutations take `&mut self`, so a
/// single writer is enforced within one owner; sharing an instance between
/// threads requires external synchronization (e.g. a `Mutex` per instance).
/// [`set_bit_if_unset`](Self::set_bit_if_unset) is a plain read followed by a
/// write and is only race-free under that single-writer discipline.
pub trait BitArray: Send + std::fmt::Debug {
    /// The largest valid bit index.
    fn capacity(&self) -> usize;

    /// Number of storage bytes, `capacity / 8 + 1`.
    fn byte_len(&self) -> usize;

    /// Same as [`byte_len`](Self::byte_len).
    fn bit_size(&self) -> usize {
        self.byte_len()
    }

    /// Returns whether bit `index` is set.
    fn get_bit(&self, index: usize) -> Result<bool>;

    /// Sets bit `index`. Reports whether the bit is now set, which is always
    /// `true` on success.
    fn set_bit(&mut self, index: usize) -> Result<bool>;

    /// Clears bit `index`.
    fn clear_bit(&mut self, index: usize) -> Result<()>;

    /// Sets bit `index` if it is not set yet.
    ///
    /// Returns `true` only if the bit was unset and has now been set.
    fn set_bit_if_unset(&mut self, index: usize) -> Result<bool> {
        if !self.get_bit(index)? {
            return self.set_bit(index);
        }
        Ok(false)
    }

    /// Zeroes every storage byte.
    fn clear(&mut self) -> Result<()>;

    /// In-place bitwise OR with `other`, byte by byte.
    fn or(&mut self, other: &dyn BitArray) -> Result<()>;

    /// In-place bitwise AND with `other`, byte by byte.
    fn and(&mut self, other: &dyn BitArray) -> Result<()>;

    /// Returns a snapshot copy of all storage bytes.
    fn to_byte_array(&self) -> Result<Vec<u8>>;

    /// Highest index with a set bit, scanning the storage from its last byte.
    ///
    /// The scan covers every storage byte, including the bits past the
    /// capacity in the last byte.
    fn highest_set_bit(&self) -> Result<Option<usize>> {
        Ok(scan::highest_set_bit_in(&self.to_byte_array()?))
    }

    /// Lowest index with a set bit, scanning the storage from its first byte.
    fn lowest_set_bit(&self) -> Result<Option<usize>> {
        Ok(scan::lowest_set_bit_in(&self.to_byte_array()?))
    }

    /// First set bit with an index in `[from, capacity)`.
    ///
    /// The search stops short of `capacity` itself: bit `capacity` is
    /// addressable through the single-bit operations but never reported here.
    /// Returns `None` when there is no such bit, including when
    /// `from >= capacity`.
    fn next_set_bit(&self, from: usize) -> Result<Option<usize>> {
        let Some(last) = self.capacity().checked_sub(1) else {
            return Ok(None);
        };
        if from > last {
            return Ok(None);
        }
        Ok(scan::next_set_bit_in(&self.to_byte_array()?, from, last))
    }

    /// Number of set bits in the storage.
    fn count_ones(&self) -> Result<u64> {
        Ok(bytes::cardinality(&self.to_byte_array()?))
    }

    /// All set bit indices in `[0, capacity)`, in ascending order: the bits
    /// [`next_set_bit`](Self::next_set_bit) walks through.
    fn set_bits(&self) -> Result<Vec<usize>> {
        let Some(last) = self.capacity().checked_sub(1) else {
            return Ok(Vec::new());
        };
        let snapshot = self.to_byte_array()?;
        let mut positions = Vec::new();
        let mut from = 0;
        while let Some(pos) = scan::next_set_bit_in(&snapshot, from, last) {
            positions.push(pos);
            from = pos + 1;
        }
        Ok(positions)
    }

    /// Pushes pending writes down to stable storage.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Releases the underlying resources. Calling it again is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Returns `true` once [`close`](Self::close) has released the backing
    /// resources. Always `false` for backings that hold none.
    fn is_closed(&self) -> bool;
}
