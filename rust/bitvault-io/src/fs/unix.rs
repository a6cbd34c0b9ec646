//! Unix-specific file system operations.
//!
//! Durable writes are requested with `O_DSYNC`: each `write` returns once the
//! data and the metadata needed to read it back are on stable storage,
//! skipping the extra metadata flush that `O_SYNC` would add.

use std::{fs::OpenOptions, path::Path};

use crate::fs::WriteMode;

/// Opens a file for reading and writing with the specified write mode.
///
/// # Arguments
///
/// * `file_path` - Path to the file to open
/// * `write_mode` - [`WriteMode::Durable`] adds `O_DSYNC`, [`WriteMode::Buffered`]
///   uses the page cache
/// * `create` - Whether a missing file is created (existing content is never
///   truncated)
///
/// # Errors
///
/// Returns `NotFound` if the file does not exist and `create` is `false`, or any
/// other error reported by `open(2)`.
pub fn open_read_write(
    file_path: &Path,
    write_mode: WriteMode,
    create: bool,
) -> std::io::Result<std::fs::File> {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(create).truncate(false);

    match write_mode {
        WriteMode::Buffered => (),
        WriteMode::Durable => {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_DSYNC);
        }
    }
    options.open(file_path)
}
