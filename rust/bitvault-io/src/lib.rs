//! File plumbing for persistent bit arrays:
//! - [`fs`]: opening a backing file for positional read/write in a given [`WriteMode`].
//! - [`file`]: positional byte reads/writes and zero-filled growth of a file.

pub mod file;
pub mod fs;

pub use fs::WriteMode;
