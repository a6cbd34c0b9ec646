//! Bit array persisted through synchronous positional file I/O.
//!
//! Every bit operation goes straight to the file: a read of the byte holding
//! the bit and, for mutations, a write of the updated byte back to the same
//! offset. Nothing is cached in memory, so the file always reflects the
//! current state (and, in [`WriteMode::Durable`], so does stable storage).

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use bitvault_common::{Result, error::Error};
use bitvault_io::{
    WriteMode,
    file::{ensure_len, file_read_at_exact, file_write_at, read_byte_at, write_byte_at},
    fs::open_read_write,
};

use crate::{
    bit_array::BitArray,
    layout::{ByteLayout, MergeOp},
};

/// A [`BitArray`] stored in a plain file.
///
/// The file has no header: byte `k` holds bits `8k..8k+7`. On open it is
/// extended with zero bytes to at least `byte_len + 1` bytes; existing bytes
/// are kept, so reopening a file with the same capacity restores the bits
/// written earlier.
///
/// Prefer a local file over a network share: each bit operation costs one or
/// two I/O round-trips.
pub struct FileBackedBitArray {
    layout: ByteLayout,
    file: Option<File>,
    path: PathBuf,
    write_mode: WriteMode,
}

impl FileBackedBitArray {
    /// Opens a bit array over an existing file in [`WriteMode::Durable`].
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> Result<FileBackedBitArray> {
        Self::open_with_mode(path, capacity, WriteMode::Durable)
    }

    /// Opens a bit array over an existing file.
    ///
    /// # Errors
    ///
    /// - Invalid-argument error if `capacity` is zero, or if `path` does not
    ///   refer to an existing regular file.
    /// - I/O error if the file cannot be opened or extended.
    pub fn open_with_mode(
        path: impl AsRef<Path>,
        capacity: usize,
        write_mode: WriteMode,
    ) -> Result<FileBackedBitArray> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::invalid_arg(
                "backing_file",
                format!("{} does not represent a valid file", path.display()),
            ));
        }
        let layout = ByteLayout::new(capacity)?;

        let file = open_read_write(path, write_mode, false)
            .map_err(|e| Error::io(format!("open {}", path.display()), e))?;
        let file_len = ensure_len(&file, layout.min_file_len())
            .map_err(|e| Error::io(format!("extend {}", path.display()), e))?;

        log::debug!(
            "opened file-backed bit array {}: capacity {capacity}, {} bytes, file length {file_len}, {write_mode:?}",
            path.display(),
            layout.byte_len(),
        );
        Ok(FileBackedBitArray {
            layout,
            file: Some(file),
            path: path.to_path_buf(),
            write_mode,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write mode the backing file was opened with.
    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    fn file(&self) -> Result<&File> {
        self.file
            .as_ref()
            .ok_or_else(|| Error::invalid_operation("use of a closed bit array"))
    }

    fn read_byte(&self, pos: usize) -> Result<u8> {
        read_byte_at(self.file()?, pos as u64)
            .map_err(|e| Error::io("unable to read bit array from disk", e))
    }

    fn write_byte(&self, pos: usize, value: u8) -> Result<()> {
        write_byte_at(self.file()?, pos as u64, value)
            .map_err(|e| Error::io("unable to write bit array to disk", e))
    }

    fn merge(&mut self, other: &dyn BitArray, op: MergeOp) -> Result<()> {
        self.layout.verify_operand(other.byte_len())?;
        let operand = other.to_byte_array()?;
        log::trace!("{op:?} merge into {}", self.path.display());
        for (pos, &byte) in operand.iter().enumerate() {
            let current = self.read_byte(pos)?;
            self.write_byte(pos, op.combine(current, byte))?;
        }
        Ok(())
    }
}

impl BitArray for FileBackedBitArray {
    fn capacity(&self) -> usize {
        self.layout.capacity()
    }

    fn byte_len(&self) -> usize {
        self.layout.byte_len()
    }

    fn get_bit(&self, index: usize) -> Result<bool> {
        let (pos, mask) = self.layout.locate(index)?;
        Ok(self.read_byte(pos)? & mask != 0)
    }

    fn set_bit(&mut self, index: usize) -> Result<bool> {
        let (pos, mask) = self.layout.locate(index)?;
        let byte = self.read_byte(pos)?;
        self.write_byte(pos, byte | mask)?;
        Ok(true)
    }

    fn clear_bit(&mut self, index: usize) -> Result<()> {
        let (pos, mask) = self.layout.locate(index)?;
        let byte = self.read_byte(pos)?;
        self.write_byte(pos, byte & !mask)
    }

    fn clear(&mut self) -> Result<()> {
        let zeros = vec![0u8; self.layout.byte_len()];
        file_write_at(self.file()?, 0, &zeros)
            .map_err(|e| Error::io("unable to clear bit array on disk", e))
    }

    fn or(&mut self, other: &dyn BitArray) -> Result<()> {
        self.merge(other, MergeOp::Or)
    }

    fn and(&mut self, other: &dyn BitArray) -> Result<()> {
        self.merge(other, MergeOp::And)
    }

    fn to_byte_array(&self) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; self.layout.byte_len()];
        file_read_at_exact(self.file()?, 0, &mut bytes)
            .map_err(|e| Error::io("unable to read bit array from disk", e))?;
        Ok(bytes)
    }

    fn flush(&mut self) -> Result<()> {
        self.file()?
            .sync_data()
            .map_err(|e| Error::io(format!("sync {}", self.path.display()), e))
    }

    fn close(&mut self) -> Result<()> {
        let Some(file) = self.file.take() else {
            return Ok(());
        };
        if self.write_mode == WriteMode::Buffered {
            file.sync_data()
                .map_err(|e| Error::io(format!("sync {}", self.path.display()), e))?;
        }
        drop(file);
        log::debug!("closed file-backed bit array {}", self.path.display());
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.file.is_none()
    }
}

impl std::fmt::Debug for FileBackedBitArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileBackedBitArray")
            .field("path", &self.path)
            .field("capacity", &self.layout.capacity())
            .field("byte_len", &self.layout.byte_len())
            .field("write_mode", &self.write_mode)
            .field("closed", &self.file.is_none())
            .finish()
    }
}
