//! Precomputed lookup tables for the radix-2 transform
//!
//! Built once per transform size and read-only afterwards, so one set of
//! tables can back any number of transform instances.

use crate::error::{Result, SpectrumError};
use std::f64::consts::PI;
use tracing::debug;

/// Bit-reversal permutation of `[0, size)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitReversalTable {
    indices: Vec<usize>,
}

impl BitReversalTable {
    /// Build the permutation by repeated doubling
    ///
    /// Each round reflects the filled prefix `[0, limit)` into `[limit, 2*limit)`
    /// with the next-highest bit added. `size` must be a power of two; callers
    /// go through [`FftTables::new`], which checks it.
    pub(crate) fn new(size: usize) -> Self {
        let mut indices = vec![0usize; size];
        let mut limit = 1;
        let mut bit = size >> 1;

        while limit < size {
            for i in 0..limit {
                indices[i + limit] = indices[i] + bit;
            }
            limit <<= 1;
            bit >>= 1;
        }

        Self { indices }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }
}

/// Twiddle steps `(cos(-π/k), sin(-π/k))` for `k = 1, 2, 4, …, size`
///
/// Only power-of-two `k` are ever read by the butterfly stages, so the table is
/// keyed by `log2(k)` and holds `log2(size) + 1` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct TwiddleTable {
    steps: Vec<(f64, f64)>,
}

impl TwiddleTable {
    /// `size` must be a power of two, see [`FftTables::new`]
    pub(crate) fn new(size: usize) -> Self {
        let stages = size.trailing_zeros() as usize + 1;
        let steps = (0..stages)
            .map(|stage| {
                let angle = -PI / (1usize << stage) as f64;
                (angle.cos(), angle.sin())
            })
            .collect();

        Self { steps }
    }

    /// Twiddle step `(cos, sin)` for a power-of-two `half_size`
    ///
    /// Panics if `half_size` is beyond the table's size.
    #[inline]
    pub(crate) fn step(&self, half_size: usize) -> (f64, f64) {
        debug_assert!(half_size.is_power_of_two());
        self.steps[half_size.trailing_zeros() as usize]
    }

    /// Number of stored entries (`log2(size) + 1`)
    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }
}

/// All tables for one transform size
#[derive(Debug, Clone, PartialEq)]
pub struct FftTables {
    size: usize,
    reverse: BitReversalTable,
    twiddles: TwiddleTable,
}

impl FftTables {
    /// Build the tables for `size`
    ///
    /// # Errors
    /// `InvalidSize` if `size` is not a power of two or is less than 2.
    pub fn new(size: usize) -> Result<Self> {
        if size < 2 || !size.is_power_of_two() {
            return Err(SpectrumError::InvalidSize { size });
        }

        let reverse = BitReversalTable::new(size);
        let twiddles = TwiddleTable::new(size);
        debug!(
            size,
            twiddle_entries = twiddles.len(),
            "built radix-2 FFT tables"
        );

        Ok(Self {
            size,
            reverse,
            twiddles,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn reverse(&self) -> &BitReversalTable {
        &self.reverse
    }

    pub fn twiddles(&self) -> &TwiddleTable {
        &self.twiddles
    }
}
