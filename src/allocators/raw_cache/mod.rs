//! A singlethreaded caching allocator.
//!
// For a general view of the allocator's operational semantics see the [`crate`] level documentation.
//
// # Additional implementation notes
// ## Block ownership
// Every block the `RawCache` ever obtained from its provider is recorded in exactly one
// of two per-bin lists: `used` while a `Block` handle for it is out, `cached` otherwise.
// A record only leaves both lists when its memory is handed back to the provider,
// which happens in `release_all` and on drop.
//
// ## Lookup
// Handles carry their bin index so `deallocate` only searches one `used` list.
// `deallocate_ptr` has nothing but the address and scans every bin.
//
// ## Generations
// Each handout stamps the record with a fresh generation which the handle carries along.
// `deallocate` only accepts a handle whose generation matches the `used` record, so a
// handle whose block was already given back through `deallocate_ptr` can not reclaim
// the region from whoever got it next.

use crate::bins::BinTable;
use crate::block::{Block, MemoryBlock};
use crate::config::{Config, BLOCK_ALIGN};
use crate::error::AllocError;
use crate::providers::Provider;
use crate::util::is_aligned;

use core::fmt::Debug;
use core::ptr::NonNull;

use tracing::{debug, error, info, instrument, Level};

/// Block counts and byte totals of an allocator or of a single bin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Usage {
    pub in_use_blocks: usize,
    pub in_use_bytes: usize,
    pub cached_blocks: usize,
    pub cached_bytes: usize,
}

impl Usage {
    fn of(used: &[MemoryBlock], cached: &[MemoryBlock]) -> Self {
        Usage {
            in_use_blocks: used.len(),
            in_use_bytes: used.iter().map(|b| b.size).sum(),
            cached_blocks: cached.len(),
            cached_bytes: cached.iter().map(|b| b.size).sum(),
        }
    }
}

impl core::ops::Add for Usage {
    type Output = Usage;

    fn add(self, rhs: Usage) -> Usage {
        Usage {
            in_use_blocks: self.in_use_blocks + rhs.in_use_blocks,
            in_use_bytes: self.in_use_bytes + rhs.in_use_bytes,
            cached_blocks: self.cached_blocks + rhs.cached_blocks,
            cached_bytes: self.cached_bytes + rhs.cached_bytes,
        }
    }
}

/// A single threaded caching allocator.
pub struct RawCache<P: Provider> {
    bins: BinTable,
    used: Vec<Vec<MemoryBlock>>,
    cached: Vec<Vec<MemoryBlock>>,
    config: Config,
    provider: P,
    next_generation: u64,
}

impl<P: Provider> Debug for RawCache<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawCache")
            .field("bins", &self.bins)
            .field("config", &self.config)
            .field("usage", &self.usage())
            .finish()
    }
}

impl<P: Provider> RawCache<P> {
    /// Creates an allocator drawing memory from `provider`.
    ///
    /// Fails with [`AllocError::InvalidConfig`] if no bin table can be built from `config`.
    pub fn new(provider: P, config: Config) -> Result<Self, AllocError> {
        let bins = BinTable::new(config.growth, config.max_bin)?;
        let used = vec![Vec::new(); bins.len()];
        let cached = vec![Vec::new(); bins.len()];
        Ok(RawCache {
            bins,
            used,
            cached,
            config,
            provider,
            next_generation: 0,
        })
    }

    /// Creates an allocator with the default [`Config`].
    pub fn with_provider(provider: P) -> Result<Self, AllocError> {
        Self::new(provider, Config::default())
    }

    /// Hands out a block of at least `requested` bytes.
    ///
    /// The block comes from the cache of its bin when there is one, otherwise a new
    /// block of the full bin capacity is obtained from the provider.
    #[instrument(level = "debug", skip(self), ret(level = Level::DEBUG), err(Debug, level = Level::ERROR))]
    pub fn allocate(&mut self, requested: usize) -> Result<Block, AllocError> {
        if self.config.trace {
            info!(requested, "Asking for bytes.");
        }
        if requested == 0 {
            return Err(AllocError::ZeroSized);
        }
        let Some((bin, size)) = self.bins.fit(requested) else {
            return Err(AllocError::AllocationTooLarge {
                requested,
                largest: self.bins.largest(),
            });
        };

        let block = match self.cached[bin].pop() {
            Some(block) => {
                debug!(bin, ptr = ?block.ptr, "Found cached block.");
                if self.config.trace {
                    info!(size, ptr = ?block.ptr, "Reused a previously cached block.");
                }
                block
            }
            None => {
                debug!(bin, size, "No cached block, requesting a new one from the provider.");
                let block = self.provide(size)?;
                if self.config.trace {
                    info!(size, ptr = ?block.ptr, "Allocated a new block.");
                }
                block
            }
        };

        let block = block.stamped(self.next_generation);
        self.next_generation = self.next_generation.wrapping_add(1);
        self.used[bin].push(block);
        Ok(block.into_handle(bin))
    }

    /// Gives `block` back to the allocator, which caches it for later reuse.
    ///
    /// Fails with [`AllocError::PointerNotOwned`] if the block is not in use by this
    /// allocator, or if it was already given back through
    /// [`deallocate_ptr`](RawCache::deallocate_ptr) and possibly handed out again.
    /// Nothing changes in that case.
    #[instrument(level = "debug", skip(self), err(Debug, level = Level::ERROR))]
    pub fn deallocate(&mut self, block: Block) -> Result<(), AllocError> {
        let record = block.record();
        let found = self
            .used
            .get(block.bin())
            .and_then(|used| used.iter().position(|b| b.is_same_handout(&record)));

        match found {
            Some(i) => {
                self.retire(block.bin(), i);
                Ok(())
            }
            None => Err(AllocError::PointerNotOwned { ptr: record.ptr }),
        }
    }

    /// Gives the block starting at `ptr` back to the allocator.
    ///
    /// This is the raw counterpart of [`deallocate`](RawCache::deallocate) for callers that
    /// only kept the address (see [`Block::as_ptr`]); every bin is searched.
    /// Fails with [`AllocError::PointerNotOwned`] if no in-use block starts at `ptr`,
    /// which includes a second deallocation of the same pointer.
    #[instrument(level = "debug", skip(self), err(Debug, level = Level::ERROR))]
    pub fn deallocate_ptr(&mut self, ptr: NonNull<u8>) -> Result<(), AllocError> {
        let found = self.used.iter().enumerate().find_map(|(bin, used)| {
            used.iter().position(|b| b.ptr == ptr).map(|i| (bin, i))
        });

        match found {
            Some((bin, i)) => {
                self.retire(bin, i);
                Ok(())
            }
            None => Err(AllocError::PointerNotOwned { ptr }),
        }
    }

    /// Hands all cached memory back to the provider.
    ///
    /// Fails with [`AllocError::ResourceStillInUse`] without releasing anything if
    /// some block has not been deallocated yet. The allocator stays usable afterwards.
    #[instrument(level = "debug", skip(self), err(Debug, level = Level::ERROR))]
    pub fn release_all(&mut self) -> Result<(), AllocError> {
        let in_use = self.usage().in_use_blocks;
        if in_use != 0 {
            return Err(AllocError::ResourceStillInUse { in_use });
        }
        self.release_cached();
        Ok(())
    }

    /// Returns the bin table of the allocator.
    #[inline]
    pub fn bins(&self) -> &BinTable {
        &self.bins
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the totals over all bins.
    pub fn usage(&self) -> Usage {
        self.used
            .iter()
            .zip(&self.cached)
            .map(|(used, cached)| Usage::of(used, cached))
            .fold(Usage::default(), |acc, u| acc + u)
    }

    /// Returns the usage of `bin` or `None` if there is no such bin.
    pub fn bin_usage(&self, bin: usize) -> Option<Usage> {
        Some(Usage::of(self.used.get(bin)?, self.cached.get(bin)?))
    }
}

impl<P: Provider> RawCache<P> {
    /// Obtains a new block of `size` bytes from the provider.
    #[instrument(level = "debug", skip(self), err(Debug, level = Level::ERROR))]
    fn provide(&mut self, size: usize) -> Result<MemoryBlock, AllocError> {
        match self.provider.allocate(size, BLOCK_ALIGN) {
            Ok(ptr) => {
                debug_assert!(
                    is_aligned(ptr, BLOCK_ALIGN),
                    "Providers should respect the requested alignment."
                );
                Ok(MemoryBlock::new(ptr, size))
            }
            Err(()) => {
                error!(size, "Provider failure, no memory.");
                Err(AllocError::OutOfMemory { size })
            }
        }
    }

    /// Moves the `i`-th in-use block of `bin` to the cache of that bin.
    fn retire(&mut self, bin: usize, i: usize) {
        let block = self.used[bin].swap_remove(i);
        debug!(bin, ptr = ?block.ptr, "Caching block.");
        if self.config.trace {
            info!(size = block.size, ptr = ?block.ptr, "Freed a block.");
        }
        self.cached[bin].push(block);
    }

    /// Hands every cached block back to the provider. In-use blocks are left alone.
    fn release_cached(&mut self) {
        for cached in &mut self.cached {
            for block in cached.drain(..) {
                if self.config.trace {
                    info!(size = block.size, ptr = ?block.ptr, "Released a block.");
                }
                // Cached blocks came from this provider and no handle to them is out.
                unsafe { self.provider.release(block.ptr, block.size, BLOCK_ALIGN) };
            }
        }
    }
}

//---------------impl Drop for RawCache---------------//

impl<P: Provider> Drop for RawCache<P> {
    /// Releases all cached memory. Blocks still in use are leaked since
    /// their handles may outlive the allocator.
    fn drop(&mut self) {
        let in_use = self.usage().in_use_blocks;
        if in_use != 0 {
            error!(in_use, "Allocator dropped with blocks still in use, leaking them.");
        }
        self.release_cached();
    }
}

// The allocator exclusively owns every block it recorded.
unsafe impl<P: Provider + Send> Send for RawCache<P> {}
