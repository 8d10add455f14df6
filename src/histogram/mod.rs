//! Histogram core: bin boundaries, classification, and counts
//!
//! The types here are the pure heart of the protocol. Boundary derivation and
//! classification involve no communication; every participant runs them
//! independently on the broadcast parameters and arrives at bit-identical
//! results.

pub mod bins;
pub mod counts;

pub use bins::BinBoundaries;
pub use counts::BinCounts;

use crate::config::Params;
use serde::Serialize;

/// The coordinator's final, aggregated histogram
///
/// Produced by the reduce, consumed by the renderers, then discarded. Only the
/// coordinator ever holds one.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    /// Parameters the run was configured with (post-truncation)
    pub params: Params,
    /// Bin upper bounds, as derived by every participant
    pub boundaries: BinBoundaries,
    /// Aggregated count per bin
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Total number of classified measurements
    ///
    /// Equals `params.data_count` for any completed run.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Largest single bin count, used to scale the rendered bars
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}
