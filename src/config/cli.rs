//! CLI argument parsing using clap

use clap::Parser;

/// HistoGrid - Distributed histogram computation tool
#[derive(Parser, Debug)]
#[command(name = "histogrid")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Number of participants in the group (default: number of CPUs)
    #[arg(short = 'P', long)]
    pub participants: Option<usize>,

    // === Histogram Options ===
    /// Number of bins (prompted for when omitted)
    #[arg(long)]
    pub bins: Option<usize>,

    /// Minimum measurement value (prompted for when omitted)
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<f32>,

    /// Maximum measurement value (prompted for when omitted)
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<f32>,

    /// Number of values to generate (prompted for when omitted)
    ///
    /// Truncated down to the nearest multiple of the participant count.
    #[arg(long)]
    pub count: Option<usize>,

    // === Generation Options ===
    /// Seed for the dataset PRNG (random when omitted)
    ///
    /// The same seed, participant count, and parameters reproduce the exact
    /// same histogram.
    #[arg(long)]
    pub seed: Option<u64>,

    // === Output Options ===
    /// Emit a JSON summary instead of the text chart
    #[arg(long)]
    pub json: bool,

    /// Enable debug output (timing, truncation, partition sizes)
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    ///
    /// Only the group size is checked here; the histogram parameters are
    /// validated together in `Params::new` once interactive input has filled
    /// in any omitted values.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.participants == Some(0) {
            anyhow::bail!("participants must be at least 1");
        }
        Ok(())
    }

    /// Resolved group size
    pub fn group_size(&self) -> usize {
        self.participants.unwrap_or_else(num_cpus::get).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_zero_participants() {
        let cli = Cli::parse_from(["histogrid", "--participants", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let cli = Cli::parse_from(["histogrid"]);
        assert!(cli.validate().is_ok());
        assert!(cli.group_size() >= 1);
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::parse_from([
            "histogrid", "-P", "3", "--bins", "4", "--min", "0", "--max", "10", "--count",
            "100", "--seed", "7", "--json",
        ]);
        assert_eq!(cli.participants, Some(3));
        assert_eq!(cli.bins, Some(4));
        assert_eq!(cli.min, Some(0.0));
        assert_eq!(cli.max, Some(10.0));
        assert_eq!(cli.count, Some(100));
        assert_eq!(cli.seed, Some(7));
        assert!(cli.json);
        assert!(!cli.debug);
    }
}
