//! Defines the [`AllocError`] type returned by the allocators.

use core::fmt;
use core::ptr::NonNull;

/// Failures reported by [`RawCache`](crate::RawCache) and
/// [`CachingAllocator`](crate::CachingAllocator).
///
/// None of these are fatal: the allocator is left exactly as it was before the
/// failing call and can keep serving requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// A zero-byte allocation was requested.
    ZeroSized,
    /// The request does not fit in the largest bin.
    AllocationTooLarge { requested: usize, largest: usize },
    /// The underlying provider could not hand out a block of `size` bytes.
    OutOfMemory { size: usize },
    /// The pointer is not tracked as in-use by this allocator.
    PointerNotOwned { ptr: NonNull<u8> },
    /// `release_all` was called while `in_use` blocks are still handed out.
    ResourceStillInUse { in_use: usize },
    /// The bin table could not be built from the given configuration.
    InvalidConfig(&'static str),
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::ZeroSized => write!(f, "zero-sized allocations are not supported"),
            AllocError::AllocationTooLarge { requested, largest } => write!(
                f,
                "size {requested} is too large to be allocated (largest bin holds {largest} bytes)"
            ),
            AllocError::OutOfMemory { size } => {
                write!(f, "provider failed to allocate a block of {size} bytes")
            }
            AllocError::PointerNotOwned { ptr } => {
                write!(f, "pointer {ptr:?} is not in use by this allocator")
            }
            AllocError::ResourceStillInUse { in_use } => {
                write!(f, "{in_use} blocks are still in use")
            }
            AllocError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for AllocError {}

// Only the address is carried, never dereferenced.
unsafe impl Send for AllocError {}
unsafe impl Sync for AllocError {}
