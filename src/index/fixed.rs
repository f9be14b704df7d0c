//! Fixed-domain normalization: the caller supplies the count domain.
//!
//! Useful when several time slots must share one color scale. Degenerate
//! or non-finite domains are corrected at construction so the mapping is
//! always finite.

use crate::index::normalizer::Normalizer;

#[derive(Debug, Clone)]
pub struct FixedDomainNormalizer {
    domain_min: f64,
    domain_max: f64,
}

impl FixedDomainNormalizer {
    /// Sanitize the supplied domain: a non-finite min becomes 0, and a
    /// non-finite or non-positive-width max becomes `min + 1`.
    pub fn new(domain: [f64; 2]) -> Self {
        let domain_min = if domain[0].is_finite() { domain[0] } else { 0.0 };
        let domain_max = if domain[1].is_finite() && domain[1] > domain_min {
            domain[1]
        } else {
            domain_min + 1.0
        };
        Self {
            domain_min,
            domain_max,
        }
    }
}

impl Normalizer for FixedDomainNormalizer {
    fn range(&self, _counts: &[f64]) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_the_supplied_domain() {
        let normalizer = FixedDomainNormalizer::new([0.0, 10.0]);
        let counts = [0.0, 5.0, 10.0, 20.0];

        let index = normalizer.normalize(&counts);

        assert_eq!(index[0], 1.0);
        assert_eq!(index[1], 0.5);
        assert_eq!(index[2], 0.0);
        // Counts past the domain clamp instead of going negative.
        assert_eq!(index[3], 0.0);
    }

    #[test]
    fn zero_width_domain_is_widened_to_one() {
        let normalizer = FixedDomainNormalizer::new([0.0, 0.0]);
        let counts = [0.0, 0.3, 2.0];

        assert_eq!(normalizer.range(&counts), (0.0, 1.0));
        let index = normalizer.normalize(&counts);
        assert!(index.iter().all(|v| v.is_finite()));
        assert_eq!(index[0], 1.0);
        assert!((index[1] - 0.7).abs() < 1e-12);
        assert_eq!(index[2], 0.0);
    }

    #[test]
    fn inverted_domain_is_corrected() {
        let normalizer = FixedDomainNormalizer::new([5.0, 2.0]);
        assert_eq!(normalizer.range(&[]), (5.0, 6.0));
    }

    #[test]
    fn non_finite_domain_entries_are_sanitized() {
        let normalizer = FixedDomainNormalizer::new([f64::NAN, f64::INFINITY]);
        assert_eq!(normalizer.range(&[]), (0.0, 1.0));
    }
}
