//! Batch generator of looping solar-system animations.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p helios-app -- -n 10` to generate ten animations, or
//! `cargo run -p helios-app -- -n 3 --seed 42 --sequential` for a reproducible batch.

mod batch;
mod error;
mod metadata;
mod run;
mod sequence;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use helios_config::{CliArgs, Config};
use tracing::{error, info};

use crate::batch::{BatchPlan, run_batch};
use crate::metadata::MetadataLog;

/// Ask for an iteration count until a valid number or end of input.
fn prompt_iterations(
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<Option<u32>> {
    let mut line = String::new();
    loop {
        write!(output, "How many animations? ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.trim().parse::<u32>() {
            Ok(n) => return Ok(Some(n)),
            Err(_) => writeln!(output, "Please enter a whole number.")?,
        }
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(Config::default_dir);

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        return ExitCode::from(2);
    }

    let log_dir = config_dir.join("logs");
    helios_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let iterations = match config.batch.iterations {
        Some(n) => n,
        None => {
            let stdin = io::stdin();
            match prompt_iterations(&mut stdin.lock(), &mut io::stdout()) {
                Ok(Some(n)) => n,
                Ok(None) => {
                    error!("no iteration count given");
                    return ExitCode::from(2);
                }
                Err(e) => {
                    error!("failed to read iteration count: {e}");
                    return ExitCode::from(2);
                }
            }
        }
    };

    let plan = BatchPlan {
        iterations,
        workers: config.batch.workers,
        sequential: config.batch.sequential,
    };
    let metadata = Arc::new(MetadataLog::new(config.output.metadata_path.clone()));
    let base_seed = config.batch.seed;
    let config = Arc::new(config);

    let report = run_batch(plan, move |index| {
        let entropy = run::run_entropy(base_seed, index);
        run::generate(&config, &metadata, index, entropy)
    });

    info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "batch complete"
    );
    if report.all_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_reads_number() {
        let mut input = Cursor::new("12\n");
        let mut output = Vec::new();
        assert_eq!(prompt_iterations(&mut input, &mut output).unwrap(), Some(12));
        assert_eq!(String::from_utf8(output).unwrap(), "How many animations? ");
    }

    #[test]
    fn test_prompt_retries_on_garbage() {
        let mut input = Cursor::new("lots\n -3\n 4 \n");
        let mut output = Vec::new();
        assert_eq!(prompt_iterations(&mut input, &mut output).unwrap(), Some(4));
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("How many animations?").count(), 3);
    }

    #[test]
    fn test_prompt_eof_is_none() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert_eq!(prompt_iterations(&mut input, &mut output).unwrap(), None);
    }
}
