//! CLI domain: parse, route and output only.

mod output;
mod parse;
mod route;

pub use output::{map_error, EXIT_ERROR, EXIT_MATCH, EXIT_MISMATCH};
pub use parse::Cli;
pub use route::{apply_cli_overrides, RunContext, RunOutcome};
