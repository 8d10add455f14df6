//! Interactive parameter collection
//!
//! The coordinator prompts for any histogram parameter not supplied on the
//! command line, in a fixed order: bin count, minimum value, maximum value,
//! number of values. A non-numeric entry re-prompts instead of aborting.
//!
//! This runs strictly before the group is spawned, so prompting never races
//! with worker output and a rejected parameter set never costs a partial run.

use crate::config::cli::Cli;
use crate::Result;
use anyhow::Context;
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Raw parameter values as entered, before truncation and validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawParams {
    pub bin_count: usize,
    pub min_meas: f32,
    pub max_meas: f32,
    pub data_count: usize,
}

/// Collect raw parameters, prompting for whatever the CLI left out
pub fn collect(cli: &Cli) -> Result<RawParams> {
    let stdin = std::io::stdin();
    let mut reader = stdin.lock();
    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    collect_from(cli, &mut reader, &mut writer)
}

/// Testable body of [`collect`], generic over the terminal streams
pub fn collect_from<R: BufRead, W: Write>(cli: &Cli, reader: &mut R, writer: &mut W) -> Result<RawParams> {
    let bin_count = match cli.bins {
        Some(bins) => bins,
        None => read_value(reader, writer, "Number of bins (int): ")?,
    };
    let min_meas = match cli.min {
        Some(min) => min,
        None => read_value(reader, writer, "Minimum value (float): ")?,
    };
    let max_meas = match cli.max {
        Some(max) => max,
        None => read_value(reader, writer, "Maximum value (float): ")?,
    };
    let data_count = match cli.count {
        Some(count) => count,
        None => read_value(reader, writer, "Number of values (int): ")?,
    };

    Ok(RawParams {
        bin_count,
        min_meas,
        max_meas,
        data_count,
    })
}

/// Prompt until a line parses as `T`
///
/// End of input while a value is still missing is an error; garbage input
/// re-prompts.
fn read_value<T, R, W>(reader: &mut R, writer: &mut W, prompt: &str) -> Result<T>
where
    T: FromStr,
    R: BufRead,
    W: Write,
{
    loop {
        write!(writer, "{}", prompt).context("failed to write prompt")?;
        writer.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let read = reader.read_line(&mut line).context("failed to read input")?;
        if read == 0 {
            anyhow::bail!("input ended before a value was entered");
        }

        match line.trim().parse::<T>() {
            Ok(value) => return Ok(value),
            Err(_) => {
                writeln!(writer, "Not a valid number: {:?}", line.trim())
                    .context("failed to write input error")?;
            }
        }
    }
}
