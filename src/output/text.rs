//! Text bar chart rendering
//!
//! One line per bin, in boundary order:
//!
//! ```text
//!      2.500 |##########  25
//!      5.000 |####################  50
//!      7.500 |########  20
//!     10.000 |##  5
//! ```
//!
//! The upper boundary is right-justified in 10 columns with 3 decimal digits,
//! followed by ` |`, a bar scaled so the largest bin spans [`CHART_WIDTH`]
//! characters, two spaces, and the raw count.

use crate::histogram::Histogram;
use std::fmt::Write;

/// Width, in characters, of the bar for the largest bin
pub const CHART_WIDTH: usize = 40;

/// Render the histogram as a bar chart
///
/// Bar lengths are `round(count / max_count * CHART_WIDTH)`; when every bin is
/// empty the bars are empty rather than dividing by zero.
pub fn render(histogram: &Histogram) -> String {
    let max_count = histogram.max_count();
    let mut chart = String::new();

    for (bin, &count) in histogram.counts.iter().enumerate() {
        let bar_len = if max_count == 0 {
            0
        } else {
            (count as f64 / max_count as f64 * CHART_WIDTH as f64).round() as usize
        };
        writeln!(
            chart,
            "{:>10.3} |{}  {}",
            histogram.boundaries.upper(bin),
            "#".repeat(bar_len),
            count
        )
        .expect("writing to a String cannot fail");
    }

    chart
}

/// Print the chart to stdout
pub fn print(histogram: &Histogram) {
    print!("{}", render(histogram));
}
