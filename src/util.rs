//! Utility functions.

use core::ptr::NonNull;

/// Returns whether `ptr` is `align`-aligned.
///
/// # Panics
/// Panics if `align` is not a power-of-two.
#[inline]
pub(crate) fn is_aligned(ptr: NonNull<u8>, align: usize) -> bool {
    assert!(align.is_power_of_two(), "Alignment should be a power of two.");
    ptr.as_ptr() as usize & (align - 1) == 0
}

/// Returns `base` raised to `exp`, or `None` if the result does not fit in a `usize`.
///
/// Bin capacities are integer powers so this is the exact `floor(base^exp)`.
#[inline(always)]
pub(crate) fn checked_capacity(base: usize, exp: usize) -> Option<usize> {
    base.checked_pow(u32::try_from(exp).ok()?)
}
