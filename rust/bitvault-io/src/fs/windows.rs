//! Windows-specific file system operations.
//!
//! Durable writes are requested with `FILE_FLAG_WRITE_THROUGH`, which makes
//! every write go straight through the system cache to the device.

use std::{fs::OpenOptions, path::Path};

use crate::fs::WriteMode;

/// Opens a file for reading and writing with the specified write mode.
///
/// # Arguments
///
/// * `file_path` - Path to the file to open
/// * `write_mode` - [`WriteMode::Durable`] adds `FILE_FLAG_WRITE_THROUGH`,
///   [`WriteMode::Buffered`] uses the standard file caching
/// * `create` - Whether a missing file is created (existing content is never
///   truncated)
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
            use std::os::windows::fs::OpenOptionsExt;
            options.custom_flags(windows_sys::Win32::Storage::FileSystem::FILE_FLAG_WRITE_THROUGH);
        }
    }
    options.open(file_path)
}
