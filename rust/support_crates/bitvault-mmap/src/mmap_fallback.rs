use std::fs::File;

/// File mapping is not available on this target.
pub fn map_file(_file: &File, _len: usize) -> std::io::Result<*mut std::ffi::c_void> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "memory-mapped files are not supported on this platform",
    ))
}

/// No mapping can exist on this target.
pub unsafe fn flush(_ptr: *mut std::ffi::c_void, _len: usize) -> std::io::Result<()> {
    Err(std::io::ErrorKind::Unsupported.into())
}

/// No mapping can exist on this target.
pub unsafe fn unmap(_ptr: *mut std::ffi::c_void, _len: usize) -> std::io::Result<()> {
    Err(std::io::ErrorKind::Unsupported.into())
}
