//! Defines the [`BinTable`] struct, the size classes of the allocators.
//!
//! A bin is an index into an ascending table of capacities where the capacity
//! of bin `i` is `growth^i`. Every request is rounded up to the capacity of the
//! first bin that can hold it.
//!
//! # Classification
//! A request is placed in the smallest bin whose capacity is *strictly* greater
//! than the requested size. In particular a request of exactly `capacity_of(k)`
//! bytes lands in bin `k + 1`, and no request can be served by the last bin
//! unless it is strictly smaller than its capacity.

use crate::error::AllocError;
use crate::util::checked_capacity;

/// An ascending, fixed table of bin capacities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinTable {
    capacities: Vec<usize>,
}

impl BinTable {
    /// Precomputes the capacities `growth^0, growth^1, ..., growth^max_bin`.
    ///
    /// Returns `Err(AllocError::InvalidConfig)` if `growth` is smaller than 2
    /// (capacities would not be strictly increasing) or if the largest capacity
    /// overflows a `usize`.
    pub fn new(growth: usize, max_bin: usize) -> Result<Self, AllocError> {
        if growth < 2 {
            return Err(AllocError::InvalidConfig("growth must be at least 2"));
        }
        let capacities = (0..=max_bin)
            .map(|bin| checked_capacity(growth, bin))
            .collect::<Option<Vec<_>>>()
            .ok_or(AllocError::InvalidConfig("largest bin capacity overflows usize"))?;

        debug_assert!(capacities.windows(2).all(|w| w[0] < w[1]));
        Ok(BinTable { capacities })
    }

    /// Returns the capacity of `bin` or `None` if there is no such bin.
    #[inline]
    pub fn capacity_of(&self, bin: usize) -> Option<usize> {
        self.capacities.get(bin).copied()
    }

    /// Returns the smallest bin with a capacity strictly greater than `requested`
    /// or `None` if `requested` is at least the capacity of the last bin.
    #[inline]
    pub fn classify(&self, requested: usize) -> Option<usize> {
        let bin = self.capacities.partition_point(|&c| c <= requested);
        (bin < self.capacities.len()).then_some(bin)
    }

    /// Like [`classify`](BinTable::classify) but also returns the capacity of the bin.
    #[inline]
    pub fn fit(&self, requested: usize) -> Option<(usize, usize)> {
        let bin = self.classify(requested)?;
        Some((bin, self.capacities[bin]))
    }

    /// Returns the number of bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.capacities.len()
    }

    /// Returns whether the table has no bins. A table built by [`BinTable::new`] is never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.capacities.is_empty()
    }

    /// Returns the capacity of the last bin.
    #[inline]
    pub fn largest(&self) -> usize {
        self.capacities.last().copied().unwrap_or(0)
    }

    /// Iterates over the capacities in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.capacities.iter().copied()
    }
}
