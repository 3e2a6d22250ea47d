// Envsense CLI - Command line front end
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Envsense CLI
//!
//! Synthesize labelled sensor series and score CSV data for anomalies.
//!
//! ## Usage
//!
//! ```bash
//! # One day of every water treatment parameter, 2% anomalies
//! envsense generate --deployment water_treatment --probability 0.02 --seed 42 -o plant.csv
//!
//! # Score it, requiring two methods to agree
//! envsense detect --input plant.csv --quorum 2 -o verdicts.json
//! ```

mod csv_io;
mod detect;
mod error;
mod generate;

use clap::{Parser, Subcommand};
use detect::DetectArgs;
use generate::GenerateArgs;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

/// Envsense environmental sensor toolkit
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize sensor series with injected anomalies
    Generate(GenerateArgs),
    /// Score a long-format CSV file for anomalies
    Detect(DetectArgs),
}

fn run(command: &Command) -> error::Result<()> {
    match command {
        Command::Generate(args) => generate::run(args),
        Command::Detect(args) => detect::run(args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for data
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match cli.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Envsense v{}", env!("CARGO_PKG_VERSION"));

    match run(&cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
