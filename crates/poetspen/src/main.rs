//! poetspen CLI - scaffold and manage Poetry-based Python projects
//!
//! This is the main entry point for the poetspen command-line interface.

mod cli;
mod commands;
mod output;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    // Child exit codes from `run`/`poetry` are passed through unchanged
    match commands::dispatch(cli) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output::error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
