//! Normalization strategy trait for the deficit index.
//!
//! This module defines the `Normalizer` trait that all strategies must
//! implement. Strategies are selected via the `[normalization]` config
//! section and boxed at startup.

use std::fmt;

/// Trait for strategies that turn raw per-cell sums into a bounded index.
///
/// Implement `range` to choose the effective count domain; the shared
/// `normalize` applies the inverse-density mapping
/// `index = 1 - clamp((count - min) / (max - min), 0, 1)`, so sparse cells
/// score high. Implementations must return a corrected domain with
/// `max > min` (degenerate ranges widen to 1) so the mapping never divides
/// by zero.
pub trait Normalizer: Send + Sync + fmt::Debug {
    /// Effective (min, max) of the count domain, corrections applied.
    fn range(&self, counts: &[f64]) -> (f64, f64);

    /// Map raw sums to the deficit index, one value per cell.
    fn normalize(&self, counts: &[f64]) -> Vec<f64> {
        let (min, max) = self.range(counts);
        let width = max - min;
        counts
            .iter()
            .map(|&count| 1.0 - ((count - min) / width).clamp(0.0, 1.0))
            .collect()
    }
}
