//! imgdiff CLI Binary
//!
//! Compares two built filesystem images and exits non-zero on any mismatch.

use clap::Parser;
use imgdiff::cli::{map_error, Cli, RunContext, EXIT_ERROR};
use imgdiff::logging::init_logging;
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let context = match RunContext::from_cli(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Err(e) = init_logging(&context.config().logging) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    info!(left = %cli.left.display(), right = %cli.right.display(), "imgdiff starting");

    match context.execute() {
        Ok(outcome) => {
            info!(?outcome, "Comparison finished");
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            error!("Comparison failed: {}", e);
            eprintln!("{}", map_error(&e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}
