//! JSON summary output
//!
//! Machine-readable alternative to the text chart: parameters, derived
//! boundaries, and aggregated counts in one document, tagged with the tool
//! name and version so downstream consumers can detect format drift.

use crate::histogram::Histogram;
use crate::Result;
use serde::Serialize;

/// Top-level JSON document for one completed run
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    pub bin_count: usize,
    pub min_meas: f32,
    pub max_meas: f32,
    pub data_count: usize,
    pub local_data_count: usize,
    pub participants: usize,
    /// Inclusive upper bound of each bin, in bin order
    pub boundaries: &'a [f32],
    /// Aggregated count per bin, in bin order
    pub counts: &'a [u64],
    /// Sum of all counts; equals `data_count`
    pub total: u64,
}

impl<'a> JsonReport<'a> {
    /// Build the report view over a histogram
    pub fn from_histogram(histogram: &'a Histogram) -> Self {
        Self {
            tool: "histogrid",
            version: env!("CARGO_PKG_VERSION"),
            bin_count: histogram.params.bin_count,
            min_meas: histogram.params.min_meas,
            max_meas: histogram.params.max_meas,
            data_count: histogram.params.data_count,
            local_data_count: histogram.params.local_data_count,
            participants: histogram.params.participants(),
            boundaries: histogram.boundaries.as_slice(),
            counts: &histogram.counts,
            total: histogram.total(),
        }
    }
}

/// Render the histogram as a pretty-printed JSON document
pub fn render(histogram: &Histogram) -> Result<String> {
    let report = JsonReport::from_histogram(histogram);
    Ok(serde_json::to_string_pretty(&report)?)
}
