//! Bit array over a shared memory mapping of a file.
//!
//! Bit operations are plain loads and stores into the mapped region. The
//! operating system writes dirty pages back to the file on its own schedule;
//! [`BitArray::flush`] forces the write-back.

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use bitvault_bits::{bytes, scan};
use bitvault_common::{Result, error::Error};
use bitvault_io::{WriteMode, file::ensure_len, fs::open_read_write};
use bitvault_mmap::mapped_region::MappedRegion;

use crate::{
    bit_array::BitArray,
    layout::{ByteLayout, MergeOp},
};

/// A [`BitArray`] stored in a memory-mapped file.
///
/// The file is created when missing and extended with zero bytes to at least
/// `byte_len + 1` bytes. The whole file is mapped; the bit array uses its
/// first `byte_len` bytes, so a longer pre-existing file keeps its tail
/// untouched.
pub struct MappedFileBackedBitArray {
    layout: ByteLayout,
    // Declared before `file` so that a dropped array unmaps first.
    region: Option<MappedRegion>,
    file: Option<File>,
    path: PathBuf,
}

impl MappedFileBackedBitArray {
    /// Opens (or creates) a mapped bit array in [`WriteMode::Durable`].
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> Result<MappedFileBackedBitArray> {
        Self::open_with_mode(path, capacity, WriteMode::Durable)
    }

    /// Opens (or creates) a mapped bit array.
    ///
    /// `write_mode` only affects the writes that extend the file; stores into
    /// the mapping are always written back lazily.
    ///
    /// # Errors
    ///
    /// - Invalid-argument error if `capacity` is zero, or if `path` exists but
    ///   is not a regular file.
    /// - I/O error if the file cannot be created, opened, extended or mapped.
    /// - Unsupported error on targets without file mapping.
    pub fn open_with_mode(
        path: impl AsRef<Path>,
        capacity: usize,
        write_mode: WriteMode,
    ) -> Result<MappedFileBackedBitArray> {
        let path = path.as_ref();
        if path.exists() && !path.is_file() {
            return Err(Error::invalid_arg(
                "backing_file",
                format!("{} does not represent a valid file", path.display()),
            ));
        }
        let layout = ByteLayout::new(capacity)?;

        let file = open_read_write(path, write_mode, true)
            .map_err(|e| Error::io(format!("open {}", path.display()), e))?;
        let file_len = ensure_len(&file, layout.min_file_len())
            .map_err(|e| Error::io(format!("extend {}", path.display()), e))?;
        let map_len = usize::try_from(file_len).map_err(|_| {
            Error::invalid_arg(
                "backing_file",
                format!("{} is too large to map ({file_len} bytes)", path.display()),
            )
        })?;
        let region = MappedRegion::map(&file, map_len).map_err(|e| {
            if e.kind() == std::io::ErrorKind::Unsupported {
                Error::unsupported(format!("memory mapping {}: {e}", path.display()))
            } else {
                Error::io(format!("map {}", path.display()), e)
            }
        })?;

        log::debug!(
            "mapped bit array {}: capacity {capacity}, {} bytes, mapped {map_len} bytes",
            path.display(),
            layout.byte_len(),
        );
        Ok(MappedFileBackedBitArray {
            layout,
            region: Some(region),
            file: Some(file),
            path: path.to_path_buf(),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Direct view of the storage bytes inside the mapping.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        self.storage()
    }

    fn region(&self) -> Result<&MappedRegion> {
        self.region
            .as_ref()
            .ok_or_else(|| Error::invalid_operation("use of a closed bit array"))
    }

    fn storage(&self) -> Result<&[u8]> {
        let byte_len = self.layout.byte_len();
        Ok(&self.region()?.as_bytes()[..byte_len])
    }

    fn storage_mut(&mut self) -> Result<&mut [u8]> {
        let byte_len = self.layout.byte_len();
        let region = self
            .region
            .as_mut()
            .ok_or_else(|| Error::invalid_operation("use of a closed bit array"))?;
        Ok(&mut region.as_bytes_mut()[..byte_len])
    }

    fn merge(&mut self, other: &dyn BitArray, op: MergeOp) -> Result<()> {
        self.layout.verify_operand(other.byte_len())?;
        let operand = other.to_byte_array()?;
        log::trace!("{op:?} merge into mapped {}", self.path.display());
        op.apply(self.storage_mut()?, &operand);
        Ok(())
    }
}

impl BitArray for MappedFileBackedBitArray {
    fn capacity(&self) -> usize {
        self.layout.capacity()
    }

    fn byte_len(&self) -> usize {
        self.layout.byte_len()
    }

    fn get_bit(&self, index: usize) -> Result<bool> {
        self.layout.get(self.storage()?, index)
    }

    fn set_bit(&mut self, index: usize) -> Result<bool> {
        let layout = self.layout;
        layout.set(self.storage_mut()?, index)?;
        Ok(true)
    }

    fn clear_bit(&mut self, index: usize) -> Result<()> {
        let layout = self.layout;
        layout.reset(self.storage_mut()?, index)
    }

    fn clear(&mut self) -> Result<()> {
        self.storage_mut()?.fill(0);
        Ok(())
    }

    fn or(&mut self, other: &dyn BitArray) -> Result<()> {
        self.merge(other, MergeOp::Or)
    }

    fn and(&mut self, other: &dyn BitArray) -> Result<()> {
        self.merge(other, MergeOp::And)
    }

    fn to_byte_array(&self) -> Result<Vec<u8>> {
        Ok(self.storage()?.to_vec())
    }

    fn highest_set_bit(&self) -> Result<Option<usize>> {
        Ok(scan::highest_set_bit_in(self.storage()?))
    }

    fn lowest_set_bit(&self) -> Result<Option<usize>> {
        Ok(scan::lowest_set_bit_in(self.storage()?))
    }

    fn next_set_bit(&self, from: usize) -> Result<Option<usize>> {
        Ok(scan::next_set_bit_in(
            self.storage()?,
            from,
            self.layout.last_searchable(),
        ))
    }

    fn count_ones(&self) -> Result<u64> {
        Ok(bytes::cardinality(self.storage()?))
    }

    fn flush(&mut self) -> Result<()> {
        self.region()?
            .flush()
            .map_err(|e| Error::io(format!("flush mapping of {}", self.path.display()), e))
    }

    fn close(&mut self) -> Result<()> {
        let Some(region) = self.region.take() else {
            return Ok(());
        };
        if let Err(e) = region.unmap() {
            log::warn!("failed to unmap {}: {e}", self.path.display());
        }
        self.file = None;
        log::debug!("closed mapped bit array {}", self.path.display());
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.region.is_none()
    }
}

impl std::fmt::Debug for MappedFileBackedBitArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedFileBackedBitArray")
            .field("path", &self.path)
            .field("capacity", &self.layout.capacity())
            .field("byte_len", &self.layout.byte_len())
            .field("region", &self.region)
            .finish()
    }
}
