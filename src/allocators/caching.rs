//! A multithreaded caching allocator.

use crate::allocators::raw_cache::{RawCache, Usage};
use crate::bins::BinTable;
use crate::block::Block;
use crate::config::Config;
use crate::error::AllocError;
use crate::providers::Provider;

use core::ptr::NonNull;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A multithreaded caching allocator.
///
/// This allocator is just a `Mutex` wrapper over [`RawCache`] so that one cache
/// can be shared between threads. Every operation holds the lock for its whole
/// duration, including the provider call on the cold path.
pub struct CachingAllocator<P: Provider> {
    inner: Mutex<RawCache<P>>,
}

impl<P: Provider> CachingAllocator<P> {
    pub fn new(provider: P, config: Config) -> Result<Self, AllocError> {
        Ok(CachingAllocator {
            inner: Mutex::new(RawCache::new(provider, config)?),
        })
    }

    pub fn with_provider(provider: P) -> Result<Self, AllocError> {
        Self::new(provider, Config::default())
    }

    /// See [`RawCache::allocate`].
    pub fn allocate(&self, requested: usize) -> Result<Block, AllocError> {
        self.lock().allocate(requested)
    }

    /// See [`RawCache::deallocate`].
    pub fn deallocate(&self, block: Block) -> Result<(), AllocError> {
        self.lock().deallocate(block)
    }

    /// See [`RawCache::deallocate_ptr`].
    pub fn deallocate_ptr(&self, ptr: NonNull<u8>) -> Result<(), AllocError> {
        self.lock().deallocate_ptr(ptr)
    }

    /// See [`RawCache::release_all`].
    pub fn release_all(&self) -> Result<(), AllocError> {
        self.lock().release_all()
    }

    pub fn usage(&self) -> Usage {
        self.lock().usage()
    }

    pub fn bins(&self) -> BinTable {
        self.lock().bins().clone()
    }

    /// Unwraps the underlying single threaded allocator.
    pub fn into_inner(self) -> RawCache<P> {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    // Every operation leaves the bin lists consistent before anything that can panic,
    // so a poisoned lock still guards a valid cache.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, RawCache<P>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: Provider> From<RawCache<P>> for CachingAllocator<P> {
    fn from(raw: RawCache<P>) -> Self {
        CachingAllocator {
            inner: Mutex::new(raw),
        }
    }
}

impl<P: Provider> core::fmt::Debug for CachingAllocator<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CachingAllocator")
            .field("inner", &*self.lock())
            .finish()
    }
}
