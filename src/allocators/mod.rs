//! The [`RawCache`] and [`CachingAllocator`] allocators.

pub mod caching;
pub mod raw_cache;

pub use caching::CachingAllocator;
pub use raw_cache::{RawCache, Usage};
