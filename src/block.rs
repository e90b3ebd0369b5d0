//! Defines the [`MemoryBlock`] record and the [`Block`] handle given out to callers.

use core::ptr::NonNull;

/// A raw region obtained from a provider, tagged with the capacity of its bin.
///
/// This is the allocator's own bookkeeping record; two records are equal only
/// if both their pointer and size match. The `generation` is restamped every time
/// the block is handed out and ties the record to one specific [`Block`] handle.
#[derive(Copy, Clone, Debug)]
pub(crate) struct MemoryBlock {
    pub ptr: NonNull<u8>,
    pub size: usize,
    pub generation: u64,
}

impl MemoryBlock {
    #[inline(always)]
    pub const fn new(ptr: NonNull<u8>, size: usize) -> Self {
        MemoryBlock {
            ptr,
            size,
            generation: 0,
        }
    }

    /// Returns the record stamped with `generation`.
    #[inline(always)]
    pub const fn stamped(self, generation: u64) -> Self {
        MemoryBlock { generation, ..self }
    }

    /// Returns whether `self` and `other` describe the same handout of the same region.
    #[inline(always)]
    pub fn is_same_handout(&self, other: &MemoryBlock) -> bool {
        *self == *other && self.generation == other.generation
    }

    /// Wraps the record in a handle for bin `bin`.
    #[inline(always)]
    pub(crate) fn into_handle(self, bin: usize) -> Block {
        Block {
            ptr: self.ptr,
            size: self.size,
            bin,
            generation: self.generation,
        }
    }
}

impl PartialEq for MemoryBlock {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr && self.size == other.size
    }
}

impl Eq for MemoryBlock {}

/// A handle to an in-use block.
///
/// The allocator keeps ownership of the memory; the handle only grants access
/// to it until it is given back. Handles can not be cloned, and each one is stamped
/// with the handout it came from: once its block has been given back, by the handle
/// or through its raw pointer, the handle is rejected even if the same region was
/// handed out again in the meantime.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a block handle leaks the block until the allocator is dropped"]
pub struct Block {
    ptr: NonNull<u8>,
    size: usize,
    bin: usize,
    generation: u64,
}

impl Block {
    /// Returns a pointer to the start of the block. It is aligned to
    /// [`BLOCK_ALIGN`](crate::config::BLOCK_ALIGN).
    #[inline(always)]
    pub fn as_ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    /// Returns the usable size of the block, i.e. the capacity of its bin.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the index of the bin the block belongs to.
    #[inline(always)]
    pub fn bin(&self) -> usize {
        self.bin
    }

    /// Returns a fat pointer to the whole block.
    #[inline]
    pub fn as_nonnull_slice(&self) -> NonNull<[u8]> {
        NonNull::slice_from_raw_parts(self.ptr, self.size)
    }

    #[inline(always)]
    pub(crate) fn record(&self) -> MemoryBlock {
        MemoryBlock::new(self.ptr, self.size).stamped(self.generation)
    }
}

// A handle is a unique token for a region owned by the allocator.
unsafe impl Send for Block {}
unsafe impl Sync for Block {}
