//! A read/write view of a file mapped into the address space.
//!
//! [`MappedRegion`] owns the mapping: stores through [`MappedRegion::as_bytes_mut`]
//! land in the file without explicit I/O calls and are written back by the
//! operating system at its own pace. [`MappedRegion::flush`] forces a
//! synchronous write-back, [`MappedRegion::unmap`] releases the mapping and
//! reports failure, and dropping the region releases it silently.
//!
//! # Safety
//!
//! The mapping is shared with the file. Truncating the file underneath a live
//! region, or mapping the same file from elsewhere, is outside of what this
//! type can guard against.

use std::fs::File;

use crate::mmap;

/// An owned, shared read/write mapping of the first `len` bytes of a file.
pub struct MappedRegion {
    /// Base address of the mapping, null once the region has been unmapped.
    ptr: *mut u8,
    /// Mapped length in bytes.
    len: usize,
}

impl MappedRegion {
    /// Maps the first `len` bytes of `file` read/write.
    ///
    /// The file must be opened with read and write access and be at least
    /// `len` bytes long. The region remains valid independently of `file`.
    ///
    /// # Errors
    ///
    /// Returns an error if `len` is zero, or if the platform refuses the
    /// mapping (`ErrorKind::Unsupported` on targets without file mapping).
    pub fn map(file: &File, len: usize) -> std::io::Result<MappedRegion> {
        let ptr = mmap::map_file(file, len)?;
        Ok(MappedRegion {
            ptr: ptr as _,
            len,
        })
    }

    /// Returns the length of the mapping in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the mapping has a length of 0.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns an immutable byte slice view of the mapped memory.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }

    /// Returns a mutable byte slice view of the mapped memory.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.len) }
    }

    /// Synchronously writes modified pages back to the file.
    pub fn flush(&self) -> std::io::Result<()> {
        unsafe { mmap::flush(self.ptr as _, self.len) }
    }

    /// Releases the mapping.
    ///
    /// The region is consumed either way; on failure the mapping is considered
    /// lost and is not released again on drop.
    pub fn unmap(mut self) -> std::io::Result<()> {
        let ptr = std::mem::replace(&mut self.ptr, std::ptr::null_mut());
        unsafe { mmap::unmap(ptr as _, self.len) }
    }
}

impl std::ops::Deref for MappedRegion {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl std::ops::DerefMut for MappedRegion {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_bytes_mut()
    }
}

impl AsRef<[u8]> for MappedRegion {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsMut<[u8]> for MappedRegion {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_bytes_mut()
    }
}

impl Drop for MappedRegion {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            let _ = unsafe { mmap::unmap(self.ptr as _, self.len) };
        }
    }
}

// SAFETY: MappedRegion exclusively owns its mapping and releases it on drop.
unsafe impl Send for MappedRegion {}

// SAFETY: shared references only permit reads; writes require `&mut self`.
unsafe impl Sync for MappedRegion {}

impl std::fmt::Debug for MappedRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedRegion")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .finish()
    }
}
