//! Quantile-clipped normalization.
//!
//! The effective range is the 5th..95th percentile of the (optionally
//! zero-filtered) counts, which keeps a handful of outlier cells from
//! washing out the rest of the scale.

use crate::index::normalizer::Normalizer;

const LOWER_QUANTILE: f64 = 0.05;
const UPPER_QUANTILE: f64 = 0.95;

#[derive(Debug, Clone)]
pub struct QuantileNormalizer {
    pub ignore_zeros: bool,
}

impl QuantileNormalizer {
    pub fn new(ignore_zeros: bool) -> Self {
        Self { ignore_zeros }
    }
}

impl Normalizer for QuantileNormalizer {
    fn range(&self, counts: &[f64]) -> (f64, f64) {
        let mut sorted: Vec<f64> = counts
            .iter()
            .copied()
            .filter(|&count| !self.ignore_zeros || count > 0.0)
            .collect();
        if sorted.is_empty() {
            return (0.0, 1.0);
        }
        sorted.sort_by(f64::total_cmp);

        let last = sorted.len() - 1;
        let lower = sorted[(LOWER_QUANTILE * last as f64).floor() as usize];
        let upper = sorted[(UPPER_QUANTILE * last as f64).floor() as usize];
        if upper <= lower {
            (lower, lower + 1.0)
        } else {
            (lower, upper)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clips_outliers_from_the_range() {
        let normalizer = QuantileNormalizer::new(false);
        // 20 ordinary cells and one huge outlier.
        let mut counts: Vec<f64> = (0..20).map(|i| i as f64).collect();
        counts.push(1000.0);

        let (lower, upper) = normalizer.range(&counts);

        assert_eq!(lower, 1.0);
        assert_eq!(upper, 19.0);
        let index = normalizer.normalize(&counts);
        // The outlier clamps to zero deficit, same as the in-range max.
        assert_eq!(index[counts.len() - 1], 0.0);
        assert!(index.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn ignore_zeros_filters_before_ranking() {
        let normalizer = QuantileNormalizer::new(true);
        let counts = [0.0, 0.0, 0.0, 2.0, 4.0];

        let (lower, upper) = normalizer.range(&counts);

        assert_eq!(lower, 2.0);
        assert_eq!(upper, 4.0);
    }

    #[test]
    fn collapsed_range_is_widened_to_one() {
        let normalizer = QuantileNormalizer::new(false);
        let counts = [3.0, 3.0, 3.0, 3.0];

        assert_eq!(normalizer.range(&counts), (3.0, 4.0));
        let index = normalizer.normalize(&counts);
        assert!(index.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn empty_after_filtering_falls_back_to_unit_range() {
        let normalizer = QuantileNormalizer::new(true);
        assert_eq!(normalizer.range(&[0.0, 0.0]), (0.0, 1.0));
        assert_eq!(normalizer.range(&[]), (0.0, 1.0));
    }
}
