use std::{fs::File, os::fd::AsRawFd};

/// Maps the first `len` bytes of `file` into memory as a shared, readable and
/// writable region.
///
/// Stores into the region are carried through to the file by the kernel
/// (lazily, see [`flush`] for a synchronous write-back).
///
/// # Arguments
///
/// * `file` - An open file with read and write access. Its length should be at
///   least `len`; touching pages beyond the end of the file raises `SIGBUS`.
/// * `len` - The number of bytes to map, must be non-zero.
///
/// # Returns
///
/// A pointer to the start of the mapping. The mapping stays valid after `file`
/// is closed, until it is released with [`unmap`].
pub fn map_file(file: &File, len: usize) -> std::io::Result<*mut std::ffi::c_void> {
    if len == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "cannot map an empty range",
        ));
    }
    let ptr = unsafe {
        libc::mmap(
            std::ptr::null_mut(),
            len,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_SHARED,
            file.as_raw_fd(),
            0,
        )
    };
    if ptr.is_null() || ptr == libc::MAP_FAILED {
        return Err(std::io::Error::last_os_error());
    }
    Ok(ptr)
}

/// Synchronously writes the dirty pages of a mapping back to its file.
///
/// # Safety
///
/// `ptr` and `len` must describe a live mapping returned by [`map_file`].
pub unsafe fn flush(ptr: *mut std::ffi::c_void, len: usize) -> std::io::Result<()> {
    let res = unsafe { libc::msync(ptr, len, libc::MS_SYNC) };
    if res < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Releases a mapping created by [`map_file`].
///
/// # Safety
///
/// - `ptr` and `len` must describe a live mapping returned by [`map_file`]
/// - The mapping must not have been released already
/// - No references into the mapped memory may outlive this call
pub unsafe fn unmap(ptr: *mut std::ffi::c_void, len: usize) -> std::io::Result<()> {
    let res = unsafe { libc::munmap(ptr, len) };
    if res < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}
