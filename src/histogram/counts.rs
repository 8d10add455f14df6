//! Per-participant bin counts
//!
//! Each participant owns exactly one [`BinCounts`] for the duration of a run:
//! zero-initialized when the boundaries are derived, incremented only by that
//! participant's classification loop, then consumed by the reduce. There is no
//! sharing and no locking; aggregation happens exclusively through the
//! collective layer.

use super::BinBoundaries;

/// A participant's local bin counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinCounts {
    counts: Vec<u64>,
}

impl BinCounts {
    /// Create zeroed counts for `bin_count` bins
    pub fn zeroed(bin_count: usize) -> Self {
        Self {
            counts: vec![0; bin_count],
        }
    }

    /// Increment the count for `bin`
    #[inline]
    pub fn record(&mut self, bin: usize) {
        self.counts[bin] += 1;
    }

    /// Classify every measurement of an owned partition into this count array
    ///
    /// This is each participant's entire share of the computation: strictly
    /// sequential over its own partition, with no data dependency on any other
    /// participant.
    pub fn accumulate(&mut self, partition: &[f32], boundaries: &BinBoundaries) {
        for &value in partition {
            self.record(boundaries.classify(value));
        }
    }

    /// Element-wise merge of another participant's counts
    ///
    /// Commutative and associative; the aggregated result is independent of
    /// merge order.
    pub fn merge(&mut self, other: &BinCounts) {
        debug_assert_eq!(self.counts.len(), other.counts.len());
        for (acc, count) in self.counts.iter_mut().zip(&other.counts) {
            *acc += count;
        }
    }

    /// Total number of recorded measurements
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no bins are tracked
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Counts as a slice, in bin order
    pub fn as_slice(&self) -> &[u64] {
        &self.counts
    }

    /// Consume into the raw count vector
    pub fn into_vec(self) -> Vec<u64> {
        self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed() {
        let counts = BinCounts::zeroed(5);
        assert_eq!(counts.as_slice(), &[0, 0, 0, 0, 0]);
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_record() {
        let mut counts = BinCounts::zeroed(3);
        counts.record(1);
        counts.record(1);
        counts.record(2);
        assert_eq!(counts.as_slice(), &[0, 2, 1]);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_accumulate_counts_every_value() {
        let bounds = BinBoundaries::derive(4, 0.0, 10.0);
        let mut counts = BinCounts::zeroed(4);
        counts.accumulate(&[0.0, 1.0, 2.5, 5.0, 6.0, 9.0, 9.9, 10.0], &bounds);
        assert_eq!(counts.as_slice(), &[3, 2, 1, 2]);
        assert_eq!(counts.total(), 8);
    }

    #[test]
    fn test_merge() {
        let mut a = BinCounts::zeroed(3);
        a.record(0);
        a.record(2);

        let mut b = BinCounts::zeroed(3);
        b.record(2);
        b.record(2);

        a.merge(&b);
        assert_eq!(a.as_slice(), &[1, 0, 3]);
    }

    #[test]
    fn test_merge_is_commutative() {
        let mut first = BinCounts::zeroed(4);
        let mut second = BinCounts::zeroed(4);

        let parts: Vec<BinCounts> = (0..4)
            .map(|i| {
                let mut counts = BinCounts::zeroed(4);
                for bin in 0..4 {
                    for _ in 0..(i * bin + 1) {
                        counts.record(bin);
                    }
                }
                counts
            })
            .collect();

        for part in &parts {
            first.merge(part);
        }
        for part in parts.iter().rev() {
            second.merge(part);
        }
        assert_eq!(first, second);
    }

    #[test]
    fn test_conservation_under_merge() {
        let bounds = BinBoundaries::derive(3, 0.0, 9.0);
        let mut a = BinCounts::zeroed(3);
        let mut b = BinCounts::zeroed(3);
        a.accumulate(&[1.0, 4.0, 8.0], &bounds);
        b.accumulate(&[2.0, 5.0], &bounds);

        let total = a.total() + b.total();
        a.merge(&b);
        assert_eq!(a.total(), total);
        assert_eq!(a.total(), 5);
    }
}
