//! Declarative selection of a bit array backing.

use std::path::Path;

use bitvault_common::{Result, error::Error};
use bitvault_io::WriteMode;
use serde::{Deserialize, Serialize};

use crate::{
    bit_array::BitArray, file_backed::FileBackedBitArray, mapped::MappedFileBackedBitArray,
    memory::InMemoryBitArray,
};

/// Where the bits of a bit array are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backing {
    /// Process memory; not persistent.
    #[default]
    InMemory,
    /// An existing file accessed through positional reads and writes.
    File,
    /// A file mapped into memory, created when missing.
    MappedFile,
}

impl Backing {
    /// Returns `true` for the backings that store their bits in a file.
    pub fn is_persistent(&self) -> bool {
        !matches!(self, Backing::InMemory)
    }
}

/// Parameters for constructing a bit array, suitable for embedding in an
/// application's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitArrayOptions {
    pub capacity: usize,
    #[serde(default)]
    pub backing: Backing,
    #[serde(default)]
    pub write_mode: WriteMode,
}

impl BitArrayOptions {
    pub fn new(capacity: usize) -> BitArrayOptions {
        BitArrayOptions {
            capacity,
            backing: Backing::default(),
            write_mode: WriteMode::default(),
        }
    }

    pub fn backing(mut self, backing: Backing) -> Self {
        self.backing = backing;
        self
    }

    pub fn write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    /// Constructs the configured bit array.
    ///
    /// `path` names the backing file and is required for the persistent
    /// backings; it is ignored for [`Backing::InMemory`].
    pub fn open(&self, path: Option<&Path>) -> Result<Box<dyn BitArray>> {
        let bits: Box<dyn BitArray> = match self.backing {
            Backing::InMemory => Box::new(InMemoryBitArray::new(self.capacity)?),
            Backing::File => Box::new(FileBackedBitArray::open_with_mode(
                self.required_path(path)?,
                self.capacity,
                self.write_mode,
            )?),
            Backing::MappedFile => Box::new(MappedFileBackedBitArray::open_with_mode(
                self.required_path(path)?,
                self.capacity,
                self.write_mode,
            )?),
        };
        Ok(bits)
    }

    fn required_path<'a>(&self, path: Option<&'a Path>) -> Result<&'a Path> {
        path.ok_or_else(|| {
            Error::invalid_arg(
                "path",
                format!("{:?} backing requires a file path", self.backing),
            )
        })
    }
}
