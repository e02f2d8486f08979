//! Lazily Allocated Byte Buffer.
//!
//! This module provides a safe wrapper around the raw backing store of the scratchpads and the
//! external memory. It supports lazy allocation via `mmap` on Unix systems, so a 256 MiB
//! external memory costs nothing until it is touched, and falls back to a zeroed heap
//! allocation elsewhere or when the mapping is refused.

use std::slice;

/// A fixed-size, zero-initialized byte buffer.
///
/// On Unix systems, this uses `mmap` to allocate anonymous memory, which allows
/// for lazy allocation (pages are only allocated by the OS when accessed).
/// All accessors are bounds-checked and return `None` instead of panicking.
pub struct ByteBuffer {
    ptr: *mut u8,
    size: usize,
    is_mmap: bool,
}

// SAFETY: the buffer exclusively owns its allocation; shared access is read-only and
// writes require `&mut self`.
unsafe impl Send for ByteBuffer {}
// SAFETY: see `Send`; no interior mutability is exposed through `&self`.
unsafe impl Sync for ByteBuffer {}

impl ByteBuffer {
    /// Creates a new zeroed buffer of the specified size.
    ///
    /// # Arguments
    ///
    /// * `size` - Size of the buffer in bytes.
    ///
    /// # Returns
    ///
    /// A new `ByteBuffer`, mmap-backed when possible.
    pub fn new(size: usize) -> Self {
        #[cfg(unix)]
        if size > 0 {
            // SAFETY: anonymous private mapping with no address hint; the result is checked
            // against MAP_FAILED before use.
            let ptr = unsafe {
                libc::mmap(
                    std::ptr::null_mut(),
                    size,
                    libc::PROT_READ | libc::PROT_WRITE,
                    libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                    -1,
                    0,
                )
            };
            if ptr != libc::MAP_FAILED {
                return Self {
                    ptr: ptr as *mut u8,
                    size,
                    is_mmap: true,
                };
            }
            tracing::warn!(size, "mmap refused, falling back to heap allocation");
        }

        let heap: Box<[u8]> = vec![0u8; size].into_boxed_slice();
        Self {
            ptr: Box::into_raw(heap).cast::<u8>(),
            size,
            is_mmap: false,
        }
    }

    /// Returns the size of the buffer in bytes.
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the buffer holds no bytes.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `len` bytes starting at `offset`, or `None` if the range leaves the buffer.
    pub fn get(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        if end > self.size {
            return None;
        }
        // SAFETY: `offset..end` lies inside the allocation, which lives as long as `self`.
        Some(unsafe { slice::from_raw_parts(self.ptr.add(offset), len) })
    }

    /// Returns a mutable view of `len` bytes starting at `offset`.
    pub fn get_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]> {
        let end = offset.checked_add(len)?;
        if end > self.size {
            return None;
        }
        // SAFETY: bounds checked above; `&mut self` guarantees exclusivity.
        Some(unsafe { slice::from_raw_parts_mut(self.ptr.add(offset), len) })
    }

    /// Copies `data` into the buffer at `offset`.
    ///
    /// # Returns
    ///
    /// `Some(())` on success, `None` if the write would leave the buffer (nothing is written).
    pub fn write(&mut self, offset: usize, data: &[u8]) -> Option<()> {
        self.get_mut(offset, data.len())?.copy_from_slice(data);
        Some(())
    }
}

impl std::fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("size", &self.size)
            .field("is_mmap", &self.is_mmap)
            .finish()
    }
}

impl Drop for ByteBuffer {
    /// Releases the allocation.
    ///
    /// On Unix systems, unmaps the mmap'd memory. Otherwise reconstructs the boxed
    /// slice to trigger its destructor.
    fn drop(&mut self) {
        if self.is_mmap {
            #[cfg(unix)]
            // SAFETY: `ptr`/`size` came from a successful mmap in `new`.
            unsafe {
                let _ = libc::munmap(self.ptr.cast(), self.size);
            }
        } else {
            // SAFETY: `ptr`/`size` came from `Box::into_raw` of a boxed slice in `new`.
            unsafe {
                drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    self.ptr, self.size,
                )));
            }
        }
    }
}
