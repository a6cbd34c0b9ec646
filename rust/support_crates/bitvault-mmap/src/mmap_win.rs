use std::{fs::File, os::windows::io::AsRawHandle};

use windows_sys::Win32::{
    Foundation::{CloseHandle, HANDLE},
    System::Memory::{
        CreateFileMappingW, FILE_MAP_READ, FILE_MAP_WRITE, FlushViewOfFile,
        MEMORY_MAPPED_VIEW_ADDRESS, MapViewOfFile, PAGE_READWRITE, UnmapViewOfFile,
    },
};

/// Maps the first `len` bytes of `file` into memory as a shared, readable and
/// writable view.
///
/// The section object backing the view is closed right after the view is
/// created: a mapped view holds its own reference to the section, so only the
/// view has to be released later (with [`unmap`]).
///
/// # Arguments
///
/// * `file` - An open file with read and write access.
/// * `len` - The number of bytes to map, must be non-zero.
///
/// # References
///
/// <https://learn.microsoft.com/en-us/windows/win32/api/memoryapi/nf-memoryapi-mapviewoffile>
pub fn map_file(file: &File, len: usize) -> std::io::Result<*mut std::ffi::c_void> {
    if len == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "cannot map an empty range",
        ));
    }
    let size = len as u64;
    unsafe {
        let section = CreateFileMappingW(
            file.as_raw_handle() as HANDLE,
            std::ptr::null(),
            PAGE_READWRITE,
            (size >> 32) as u32,
            (size & 0xFFFF_FFFF) as u32,
            std::ptr::null(),
        );
        if section.is_null() {
            return Err(std::io::Error::last_os_error());
        }

        let view = MapViewOfFile(section, FILE_MAP_READ | FILE_MAP_WRITE, 0, 0, len);
        let map_error = std::io::Error::last_os_error();
        CloseHandle(section);

        if view.Value.is_null() {
            return Err(map_error);
        }
        Ok(view.Value)
    }
}

/// Writes the dirty pages of a view back to its file.
///
/// # Safety
///
/// `ptr` and `len` must describe a live view returned by [`map_file`].
pub unsafe fn flush(ptr: *mut std::ffi::c_void, len: usize) -> std::io::Result<()> {
    let res = unsafe { FlushViewOfFile(ptr as *const _, len) };
    if res == 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Releases a view created by [`map_file`].
///
/// # Safety
///
/// - `ptr` must be the base address of a live view returned by [`map_file`]
/// - The view must not have been released already
/// - No references into the mapped memory may outlive this call
pub unsafe fn unmap(ptr: *mut std::ffi::c_void, _len: usize) -> std::io::Result<()> {
    let res = unsafe { UnmapViewOfFile(MEMORY_MAPPED_VIEW_ADDRESS { Value: ptr }) };
    if res == 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}
