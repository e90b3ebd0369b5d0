//! [`Provider`] trait and structures that implement it.
//!
//! The [`Provider`] trait allows users to change where the allocators in
//! [`caching_malloc::allocators`](crate::allocators) get their raw memory from.
//! The allocators remember the size of every block themselves, so a provider
//! never has to track anything.

use core::ptr::{null_mut, NonNull};

use libc::{c_void, free, posix_memalign};

/// A trait for types that hand out raw aligned memory.
///
/// # Safety
/// * a pointer returned by [`allocate`](Provider::allocate) must be valid for reads and writes
///   of `size` bytes, aligned to `align` and not overlap any other live allocation
///   until it is passed to [`release`](Provider::release).
/// * moving the provider must not invalidate pointers previously handed out.
pub unsafe trait Provider {
    /// Allocates `size` bytes aligned to `align`.
    /// Returns `Err(())` if the memory can not be provided.
    ///
    /// Callers pass a nonzero `size` and a power-of-two `align` of at least `size_of::<usize>()`.
    fn allocate(&mut self, size: usize, align: usize) -> Result<NonNull<u8>, ()>;

    /// Returns a region back to the provider.
    ///
    /// # Safety
    /// `ptr` must have been returned by [`allocate`](Provider::allocate) on this provider
    /// with the same `size` and `align`, and must not be used afterwards.
    unsafe fn release(&mut self, ptr: NonNull<u8>, size: usize, align: usize);
}

/// A provider backed by the C library's `posix_memalign` and `free`.
#[derive(Copy, Clone, Debug, Default)]
pub struct LibcProvider;

impl LibcProvider {
    #[inline(always)]
    pub const fn new() -> Self {
        LibcProvider
    }
}

unsafe impl Provider for LibcProvider {
    fn allocate(&mut self, size: usize, align: usize) -> Result<NonNull<u8>, ()> {
        debug_assert!(align.is_power_of_two());
        debug_assert!(align >= core::mem::size_of::<*mut c_void>());
        let mut p: *mut c_void = null_mut();
        // posix_memalign only writes `p` on success.
        if unsafe { posix_memalign(&mut p, align, size) } != 0 {
            return Err(());
        }
        NonNull::new(p.cast()).ok_or(())
    }

    unsafe fn release(&mut self, ptr: NonNull<u8>, _size: usize, _align: usize) {
        unsafe { free(ptr.as_ptr().cast()) };
    }
}

unsafe impl<T: Provider + ?Sized> Provider for &mut T {
    fn allocate(&mut self, size: usize, align: usize) -> Result<NonNull<u8>, ()> {
        (**self).allocate(size, align)
    }

    unsafe fn release(&mut self, ptr: NonNull<u8>, size: usize, align: usize) {
        unsafe { (**self).release(ptr, size, align) }
    }
}
