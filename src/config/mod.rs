//! Run parameters and validation
//!
//! The five scalar values every participant must agree on live in [`Params`].
//! The coordinator builds them once (from CLI flags or interactive input),
//! validation happens here before any participant is spawned, and the finished
//! struct is broadcast bit-identically to the whole group.

pub mod cli;
pub mod input;

use crate::Result;
use serde::{Deserialize, Serialize};

/// The broadcast configuration of a histogram run
///
/// Invariant, established by [`Params::new`] and never changed afterwards:
/// `data_count == local_data_count * participants` (the requested count is
/// truncated down to the nearest multiple of the group size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Number of histogram bins
    pub bin_count: usize,
    /// Lower edge of the measurement range
    pub min_meas: f32,
    /// Upper edge of the measurement range
    pub max_meas: f32,
    /// Total number of measurements, after truncation
    pub data_count: usize,
    /// Measurements per participant
    pub local_data_count: usize,
}

impl Params {
    /// Validate raw inputs and build the broadcast parameter set
    ///
    /// Computes `local_data_count = data_count / participants` and truncates
    /// `data_count` down to `local_data_count * participants`.
    ///
    /// Rejected with a descriptive error:
    /// - `bin_count == 0`
    /// - `max_meas < min_meas` (an inverted range is an input mistake; the
    ///   caller must fix it, it is not silently swapped)
    /// - non-finite range edges
    /// - a `data_count` of zero, or one that truncates to zero because it is
    ///   smaller than the group size
    ///
    /// Accepted but degenerate: `min_meas == max_meas` yields a zero-width
    /// range where every boundary equals `min_meas` and every generated value
    /// equals `min_meas` (so all of them land in bin 0).
    pub fn new(
        bin_count: usize,
        min_meas: f32,
        max_meas: f32,
        data_count: usize,
        participants: usize,
    ) -> Result<Self> {
        if participants == 0 {
            anyhow::bail!("participant count must be at least 1");
        }
        if bin_count == 0 {
            anyhow::bail!("bin count must be at least 1");
        }
        if !min_meas.is_finite() || !max_meas.is_finite() {
            anyhow::bail!(
                "measurement range must be finite, got [{}, {}]",
                min_meas,
                max_meas
            );
        }
        if max_meas < min_meas {
            anyhow::bail!(
                "maximum measurement ({}) is below minimum ({}); swap the inputs",
                max_meas,
                min_meas
            );
        }

        let local_data_count = data_count / participants;
        if local_data_count == 0 {
            anyhow::bail!(
                "data count {} is too small for {} participants (each needs at least one value)",
                data_count,
                participants
            );
        }

        Ok(Self {
            bin_count,
            min_meas,
            max_meas,
            data_count: local_data_count * participants,
            local_data_count,
        })
    }

    /// Group size implied by the truncation invariant
    pub fn participants(&self) -> usize {
        self.data_count / self.local_data_count
    }

    /// How many requested values the truncation dropped
    pub fn truncated_from(&self, requested: usize) -> usize {
        requested - self.data_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_exact_multiple() {
        let params = Params::new(4, 0.0, 10.0, 8, 1).unwrap();
        assert_eq!(params.data_count, 8);
        assert_eq!(params.local_data_count, 8);
        assert_eq!(params.participants(), 1);
    }

    #[test]
    fn test_params_truncates_to_group_multiple() {
        // Requested 10 values across 3 participants: 9 survive.
        let params = Params::new(4, 0.0, 10.0, 10, 3).unwrap();
        assert_eq!(params.local_data_count, 3);
        assert_eq!(params.data_count, 9);
        assert_eq!(params.truncated_from(10), 1);
        assert_eq!(params.participants(), 3);
    }

    #[test]
    fn test_params_rejects_zero_bins() {
        assert!(Params::new(0, 0.0, 10.0, 8, 2).is_err());
    }

    #[test]
    fn test_params_rejects_zero_data() {
        assert!(Params::new(4, 0.0, 10.0, 0, 2).is_err());
    }

    #[test]
    fn test_params_rejects_count_below_group_size() {
        // 3 values over 4 participants would truncate to nothing.
        assert!(Params::new(4, 0.0, 10.0, 3, 4).is_err());
    }

    #[test]
    fn test_params_rejects_inverted_range() {
        let err = Params::new(4, 10.0, 0.0, 8, 2).unwrap_err();
        assert!(err.to_string().contains("below minimum"));
    }

    #[test]
    fn test_params_rejects_non_finite_range() {
        assert!(Params::new(4, f32::NAN, 10.0, 8, 2).is_err());
        assert!(Params::new(4, 0.0, f32::INFINITY, 8, 2).is_err());
    }

    #[test]
    fn test_params_accepts_zero_width_range() {
        // Degenerate but documented: min == max is allowed.
        let params = Params::new(4, 5.0, 5.0, 8, 2).unwrap();
        assert_eq!(params.min_meas, params.max_meas);
    }

    #[test]
    fn test_params_roundtrips_through_bincode() {
        let params = Params::new(4, -1.5, 2.5, 12, 3).unwrap();
        let bytes = bincode::serialize(&params).unwrap();
        let back: Params = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, params);
    }
}
