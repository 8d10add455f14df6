//! Bin boundary derivation and classification
//!
//! Boundaries are derived independently by every participant from the broadcast
//! parameters and are never transmitted. Determinism matters more than speed
//! here: all participants must agree bit-for-bit on where each bin ends, so the
//! arithmetic is fixed to f32 and performed in a fixed order.
//!
//! Classification is a linear scan with an upper-inclusive tie-break: a value
//! exactly equal to a boundary belongs to the lower-indexed bin. This tie-break
//! defines bin membership and must not be changed.

use serde::Serialize;

/// Ordered upper bounds of the histogram bins
///
/// `uppers[i]` is the inclusive upper edge of bin `i`; the lower edge of bin 0
/// is the configured minimum measurement. The sequence is non-decreasing and
/// `uppers[len - 1]` equals the configured maximum (within f32 arithmetic).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinBoundaries {
    uppers: Vec<f32>,
}

impl BinBoundaries {
    /// Derive the boundaries for `bin_count` equal-width bins over
    /// `[min_meas, max_meas]`
    ///
    /// Pure and deterministic: identical inputs yield bit-identical boundaries
    /// on every participant. With `min_meas == max_meas` every boundary equals
    /// `min_meas` (the degenerate zero-width range is kept as-is, not
    /// corrected).
    pub fn derive(bin_count: usize, min_meas: f32, max_meas: f32) -> Self {
        let interval = (max_meas - min_meas) / bin_count as f32;
        let uppers = (0..bin_count)
            .map(|i| interval * (i + 1) as f32 + min_meas)
            .collect();
        Self { uppers }
    }

    /// Map a measurement to its bin index
    ///
    /// Returns the smallest `i` with `value <= uppers[i]`, or `len - 1` when
    /// the value exceeds the last boundary. Total over all f32 values: inputs
    /// outside the configured range clamp into bin 0 or the last bin, and NaN
    /// (which compares false against every boundary) lands in the last bin.
    pub fn classify(&self, value: f32) -> usize {
        self.uppers
            .iter()
            .position(|&upper| value <= upper)
            .unwrap_or(self.uppers.len() - 1)
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.uppers.len()
    }

    /// Whether there are no bins (only possible before validation)
    pub fn is_empty(&self) -> bool {
        self.uppers.is_empty()
    }

    /// Upper bound of bin `i`
    pub fn upper(&self, i: usize) -> f32 {
        self.uppers[i]
    }

    /// All upper bounds, in bin order
    pub fn as_slice(&self) -> &[f32] {
        &self.uppers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_four_bins() {
        let bounds = BinBoundaries::derive(4, 0.0, 10.0);
        assert_eq!(bounds.as_slice(), &[2.5, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn test_derive_last_boundary_is_max() {
        for bin_count in [1, 2, 5, 13, 100] {
            let bounds = BinBoundaries::derive(bin_count, -3.0, 17.0);
            let last = bounds.upper(bin_count - 1);
            assert!(
                (last - 17.0).abs() < 1e-4,
                "last boundary {} for {} bins",
                last,
                bin_count
            );
        }
    }

    #[test]
    fn test_derive_is_non_decreasing() {
        let bounds = BinBoundaries::derive(20, 0.1, 0.9);
        for pair in bounds.as_slice().windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_derive_is_deterministic() {
        let a = BinBoundaries::derive(7, -1.25, 42.5);
        let b = BinBoundaries::derive(7, -1.25, 42.5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_classify_upper_inclusive() {
        let bounds = BinBoundaries::derive(4, 0.0, 10.0);
        let values = [0.0, 1.0, 2.5, 5.0, 6.0, 9.0, 9.9, 10.0];
        let expected = [0, 0, 0, 1, 1, 2, 3, 3];
        for (value, want) in values.iter().zip(expected) {
            assert_eq!(bounds.classify(*value), want, "value {}", value);
        }
    }

    #[test]
    fn test_classify_clamps_out_of_range() {
        let bounds = BinBoundaries::derive(4, 0.0, 10.0);
        assert_eq!(bounds.classify(-100.0), 0);
        assert_eq!(bounds.classify(100.0), 3);
        assert_eq!(bounds.classify(f32::NEG_INFINITY), 0);
        assert_eq!(bounds.classify(f32::INFINITY), 3);
    }

    #[test]
    fn test_classify_nan_is_deterministic() {
        let bounds = BinBoundaries::derive(4, 0.0, 10.0);
        assert_eq!(bounds.classify(f32::NAN), 3);
    }

    #[test]
    fn test_classify_single_bin() {
        let bounds = BinBoundaries::derive(1, 0.0, 10.0);
        assert_eq!(bounds.classify(-5.0), 0);
        assert_eq!(bounds.classify(5.0), 0);
        assert_eq!(bounds.classify(50.0), 0);
    }

    #[test]
    fn test_classify_always_in_range() {
        let bounds = BinBoundaries::derive(8, -2.0, 2.0);
        let values = [-10.0, -2.0, -1.999, -0.5, 0.0, 0.5, 1.999, 2.0, 10.0];
        for value in values {
            let bin = bounds.classify(value);
            assert!(bin < bounds.len(), "value {} -> bin {}", value, bin);
        }
    }

    #[test]
    fn test_degenerate_zero_width_range() {
        // min == max: every boundary equals min, every value lands in the
        // last bin because the scan never finds value <= boundary for values
        // above it, and values equal to it match bin 0.
        let bounds = BinBoundaries::derive(3, 5.0, 5.0);
        assert_eq!(bounds.as_slice(), &[5.0, 5.0, 5.0]);
        assert_eq!(bounds.classify(5.0), 0);
        assert_eq!(bounds.classify(6.0), 2);
    }
}
