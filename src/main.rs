//! HistoGrid CLI entry point

use anyhow::{Context, Result};
use histogrid::config::cli::Cli;
use histogrid::config::{input, Params};
use histogrid::{group, output};
use std::time::Instant;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    cli.validate()?;

    if !cli.json {
        println!("HistoGrid v{}", env!("CARGO_PKG_VERSION"));
        println!("Distributed histogram computation tool");
        println!();
    }

    let participants = cli.group_size();
    if cli.debug {
        eprintln!("DEBUG: group size: {} participants", participants);
    }

    // Collect and validate parameters before any participant exists, so a bad
    // parameter set never costs a spawned group.
    let raw = input::collect(&cli).context("failed to collect parameters")?;
    let params = Params::new(
        raw.bin_count,
        raw.min_meas,
        raw.max_meas,
        raw.data_count,
        participants,
    )
    .context("invalid parameters")?;

    if cli.debug {
        let dropped = params.truncated_from(raw.data_count);
        if dropped > 0 {
            eprintln!(
                "DEBUG: data count truncated {} -> {} ({} values dropped)",
                raw.data_count, params.data_count, dropped
            );
        }
        eprintln!(
            "DEBUG: {} values per participant, {} bins over [{}, {})",
            params.local_data_count, params.bin_count, params.min_meas, params.max_meas
        );
    }

    let run_start = Instant::now();
    let histogram = group::run_threaded(participants, params, cli.seed)?;
    if cli.debug {
        eprintln!(
            "DEBUG TIMING: run: {:.3}s",
            run_start.elapsed().as_secs_f64()
        );
    }

    if cli.json {
        println!("{}", output::json::render(&histogram)?);
    } else {
        println!();
        output::text::print(&histogram);
    }

    Ok(())
}
