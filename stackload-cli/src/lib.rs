//! Command-line interface for the Stackload loading optimiser.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod solve;

pub use error::CliError;

use solve::{SolveArgs, run_solve};

pub(crate) const ARG_SOLVE_REQUEST: &str = "request-path";
pub(crate) const ARG_SOLVE_LANE_WIDTH: &str = "lane-width";
pub(crate) const ARG_SOLVE_NODE_LIMIT: &str = "node-limit";
pub(crate) const ARG_SOLVE_TIME_LIMIT_MS: &str = "time-limit-ms";
pub(crate) const ARG_SOLVE_OUTPUT: &str = "output";
pub(crate) const ENV_SOLVE_REQUEST: &str = "STACKLOAD_CMDS_SOLVE_REQUEST_PATH";

/// Run the Stackload CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration, input loading,
/// solving or output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Solve(args) => run_solve(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "stackload",
    about = "Plan the cheapest vehicle loading for a list of cargo bundles",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve a loading request read from JSON.
    Solve(SolveArgs),
}

#[cfg(test)]
mod tests;
