//! A bin-segregated caching memory allocator written in Rust.
//!
//! The allocator is meant for hot allocation/deallocation loops that keep asking for
//! buffers of similar sizes. Instead of going to the system on every request it rounds
//! the request up to one of a few size classes and keeps released blocks around so the
//! next request of the same class can reuse them.
//!
//! # Usage
//! ```
//! use caching_malloc::{Config, RawCache};
//! use caching_malloc::providers::LibcProvider;
//!
//! let mut cache = RawCache::new(LibcProvider::new(), Config::default()).unwrap();
//!
//! let block = cache.allocate(10).unwrap();
//! assert_eq!(block.size(), 64);
//! let ptr = block.as_ptr();
//! cache.deallocate(block).unwrap();
//!
//! // The same bin is asked for again, the cached block is handed out.
//! let block = cache.allocate(40).unwrap();
//! assert_eq!(block.as_ptr(), ptr);
//! cache.deallocate(block).unwrap();
//!
//! cache.release_all().unwrap();
//! ```
//!
//! # Allocators
//! Two allocators are exported by this crate - [`RawCache`]
//! and [`CachingAllocator`]. Use [`RawCache`] if you are looking for a single-threaded
//! allocator, [`CachingAllocator`] is just a `Mutex` wrapper over it to allow for multithreading.
//!
//! # Mode of operation
//! - When an allocation is requested its size is classified into a [bin](#bins).
//!   If the bin has a [cached](#block-lifecycle) block, that block is handed out again.
//!   Otherwise a new block with the full capacity of the bin is requested from the
//!   allocator's underlying [provider](#providers).
//! - On deallocation the block is moved to the cache of its bin. No memory is returned
//!   to the provider.
//! - [`release_all`](RawCache::release_all) hands every cached block back to the
//!   provider, but only once no block is in use anymore.
//!
//! Below is a list of the abstractions used by the allocators:
//!
//! ## Bins
//! A bin is a size class. Bin `i` holds blocks of exactly `growth^i` bytes, with a
//! growth of 8 and bins `0..=7` by default, i.e. `1, 8, 64, ..., 2097152` bytes.
//! A request goes to the smallest bin whose capacity is *strictly* greater than the
//! requested size, so a request of exactly 64 bytes is served by the 512 byte bin.
//! See [`BinTable`].
//!
//! ## Blocks
//! A block is a single region obtained from the provider, aligned to [`BLOCK_ALIGN`]
//! bytes and sized to the capacity of its bin. Blocks are never split or merged.
//! Callers get a [`Block`] handle which can not be cloned. Every handout is stamped
//! with a generation, so a handle whose block was already given back (for instance
//! through its raw pointer) is rejected instead of reclaiming the block from its next owner.
//!
//! ## Block lifecycle
//! A block is created lazily, the first time its bin is asked for and has nothing cached.
//! From then on it is either *in use* (a handle for it is out) or *cached* (waiting to
//! be reused), never both. It is destroyed only by [`release_all`](RawCache::release_all)
//! or when the allocator is dropped.
//!
//! ## Providers
//! A provider is where the allocators get their raw memory from.
//! The allocators are generic over their providers, anything that implements
//! [`Provider`] can be used. [`LibcProvider`] uses `posix_memalign` and `free`.
//!
//! # Errors
//! Every failure is reported through [`AllocError`] and leaves the allocator unchanged:
//! requests that do not fit in the largest bin, provider failures, deallocations of
//! blocks the allocator does not have in use and `release_all` calls while blocks are
//! still handed out.
//!
//! # Logging
//! Operations are instrumented with [`tracing`]. Set [`Config::trace`] to get one `INFO`
//! line per operation with the requested size, the action taken, the pointer and the
//! block size.
//!
//! [`Provider`]: providers::Provider
//! [`LibcProvider`]: providers::LibcProvider
//! [`BLOCK_ALIGN`]: config::BLOCK_ALIGN

pub use crate::allocators::CachingAllocator;
pub use crate::allocators::RawCache;
pub use crate::bins::BinTable;
pub use crate::block::Block;
pub use crate::config::Config;
pub use crate::error::AllocError;

pub mod allocators;
pub mod bins;
mod block;
pub mod config;
mod error;
pub mod providers;
mod util;
