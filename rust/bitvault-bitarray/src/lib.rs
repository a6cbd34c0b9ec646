//! Fixed-capacity bit arrays with interchangeable backing storage.
//!
//! All backings implement [`BitArray`] and share one storage layout, so bytes
//! written through one backing read back identically through another:
//!
//! - [`InMemoryBitArray`]: a heap buffer.
//! - [`FileBackedBitArray`]: an existing file, one positional read or write
//!   per bit operation.
//! - [`MappedFileBackedBitArray`]: a memory-mapped file.
//!
//! [`BitArrayOptions`] picks a backing from configuration.

pub mod bit_array;
pub mod file_backed;
mod layout;
pub mod mapped;
pub mod memory;
pub mod options;

pub use bit_array::BitArray;
pub use bitvault_io::WriteMode;
pub use file_backed::FileBackedBitArray;
pub use mapped::MappedFileBackedBitArray;
pub use memory::InMemoryBitArray;
pub use options::{Backing, BitArrayOptions};
