//! Constructor-time configuration of the allocators.

use static_assertions::const_assert;

/// Growth factor between consecutive bin capacities.
pub const DEFAULT_GROWTH: usize = 8;

/// Index of the largest bin, the table holds `DEFAULT_MAX_BIN + 1` capacities.
pub const DEFAULT_MAX_BIN: usize = 7;

/// Alignment of every block handed out by the allocators.
pub const BLOCK_ALIGN: usize = 64;

const_assert!(BLOCK_ALIGN.is_power_of_two());
const_assert!(BLOCK_ALIGN >= core::mem::size_of::<usize>());
const_assert!(DEFAULT_GROWTH >= 2);

/// Allocator configuration.
///
/// The defaults give the capacities `1, 8, 64, ..., 2097152`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Ratio between the capacities of two neighbouring bins.
    pub growth: usize,
    /// Index of the last bin.
    pub max_bin: usize,
    /// Emit one `INFO` line per operation (request size, action, pointer, block size).
    pub trace: bool,
}

impl Config {
    #[inline]
    pub const fn new() -> Self {
        Config {
            growth: DEFAULT_GROWTH,
            max_bin: DEFAULT_MAX_BIN,
            trace: false,
        }
    }

    #[inline]
    pub const fn with_growth(self, growth: usize) -> Self {
        Config { growth, ..self }
    }

    #[inline]
    pub const fn with_max_bin(self, max_bin: usize) -> Self {
        Config { max_bin, ..self }
    }

    #[inline]
    pub const fn with_trace(self, trace: bool) -> Self {
        Config { trace, ..self }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
