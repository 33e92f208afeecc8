#![deny(missing_docs)]

//! # RAML CLI
//!
//! Command Line Interface for the RAML model builder.
//!
//! Supported Commands:
//! - `validate`: Parse a RAML file and report the first invalid declaration.
//! - `types`: List the custom types declared by a RAML file.

use clap::{Parser, Subcommand};
use error::CliResult;
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

#[derive(Parser, Debug)]
#[clap(author, version, about = "RAML toolchain CLI")]
struct Cli {
    /// Log resolution decisions (equivalent to `RUST_LOG=debug`).
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse and validate a RAML file.
    Validate(commands::DocumentArgs),
    /// List the custom types declared by a RAML file.
    Types(commands::DocumentArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut stdout = std::io::stdout().lock();
    let result = match &cli.command {
        Commands::Validate(args) => commands::validate(args, &mut stdout),
        Commands::Types(args) => commands::types(args, &mut stdout),
    };

    report(result, &mut std::io::stderr())
}

/// Writes a failed command's error once to `err_out`.
fn report(result: CliResult<()>, err_out: &mut impl Write) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = writeln!(err_out, "{}", e);
            ExitCode::FAILURE
        }
    }
}
