//! Solve command implementation for the Stackload CLI.

use std::io::{BufReader, Write};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stackload_core::{LaneGeometry, SolveRequest, SolveResponse, Solver};
use stackload_fs::{create_utf8_file, open_utf8_file};
use stackload_solver_bnb::{BnbSolver, BnbSolverConfig};

use crate::{
    ARG_SOLVE_LANE_WIDTH, ARG_SOLVE_NODE_LIMIT, ARG_SOLVE_OUTPUT, ARG_SOLVE_REQUEST,
    ARG_SOLVE_TIME_LIMIT_MS, CliError, ENV_SOLVE_REQUEST,
};

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load bundles and a vehicle catalog from a JSON-encoded \
                 SolveRequest, search for the cheapest loading and print the \
                 resulting SolveResponse as JSON. Options can come from CLI \
                 flags, configuration files, or environment variables.",
    about = "Solve a vehicle loading request"
)]
#[ortho_config(prefix = "STACKLOAD")]
pub(crate) struct SolveArgs {
    /// Path to a JSON file containing a SolveRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Width of each of the two lanes (defaults to 48).
    #[arg(long = ARG_SOLVE_LANE_WIDTH, value_name = "width")]
    #[serde(default)]
    pub(crate) lane_width: Option<f64>,
    /// Stop the search after this many nodes and report the best so far.
    #[arg(long = ARG_SOLVE_NODE_LIMIT, value_name = "nodes")]
    #[serde(default)]
    pub(crate) node_limit: Option<u64>,
    /// Stop the search after this many milliseconds.
    #[arg(long = ARG_SOLVE_TIME_LIMIT_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) time_limit_ms: Option<u64>,
    /// Write the response here instead of stdout.
    #[arg(long = ARG_SOLVE_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl SolveArgs {
    pub(crate) fn into_config(self) -> Result<SolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Resolved `solve` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SolveConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Solver settings.
    pub(crate) solver: BnbSolverConfig,
    /// Destination file; stdout when absent.
    pub(crate) output: Option<Utf8PathBuf>,
}

impl SolveConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.request_path, ARG_SOLVE_REQUEST)
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match stackload_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_SOLVE_REQUEST,
            env: ENV_SOLVE_REQUEST,
        })?;

        let lanes = args
            .lane_width
            .map_or_else(|| Ok(LaneGeometry::default()), LaneGeometry::new)
            .map_err(CliError::InvalidLaneWidth)?;

        Ok(Self {
            request_path,
            solver: BnbSolverConfig {
                lane_width: lanes.lane_width(),
                node_limit: args.node_limit,
                time_limit: args.time_limit_ms.map(Duration::from_millis),
            },
            output: args.output,
        })
    }
}

/// Builds a solver instance for the current solve invocation.
pub(super) trait SolveSolverBuilder {
    fn build(&self, config: &SolveConfig) -> Result<Box<dyn Solver>, CliError>;
}

pub(super) struct DefaultSolveSolverBuilder;

impl SolveSolverBuilder for DefaultSolveSolverBuilder {
    fn build(&self, config: &SolveConfig) -> Result<Box<dyn Solver>, CliError> {
        Ok(Box::new(BnbSolver::with_config(config.solver.clone())))
    }
}

pub(super) fn run_solve(args: SolveArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultSolveSolverBuilder;
    run_solve_with(args, &builder, &mut stdout)
}

/// Run `solve`, writing to `--output` when configured and to `stdout`
/// otherwise.
pub(super) fn run_solve_with(
    args: SolveArgs,
    builder: &dyn SolveSolverBuilder,
    stdout: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_solve_config(args)?;
    let response = execute_solve(&config, builder)?;
    match &config.output {
        Some(path) => {
            let mut file = create_utf8_file(path).map_err(|source| CliError::CreateOutput {
                path: path.clone(),
                source,
            })?;
            write_solve_response(&mut file, &response)?;
            log::info!("wrote solve response to {path}");
            Ok(())
        }
        None => write_solve_response(stdout, &response),
    }
}

fn execute_solve(
    config: &SolveConfig,
    builder: &dyn SolveSolverBuilder,
) -> Result<SolveResponse, CliError> {
    let request = load_solve_request(&config.request_path)?;
    log::debug!(
        "loaded {} bundle row(s) and {} vehicle row(s) from {}",
        request.bundles.len(),
        request.vehicles.len(),
        config.request_path
    );
    let solver = builder.build(config)?;
    solver
        .solve(&request)
        .map_err(|source| CliError::Solve { source })
}

fn resolve_solve_config(args: SolveArgs) -> Result<SolveConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Loads a JSON-encoded [`SolveRequest`] from disk.
pub(super) fn load_solve_request(path: &Utf8Path) -> Result<SolveRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenSolveRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseSolveRequest {
        path: path.to_path_buf(),
        source,
    })
}

fn write_solve_response(writer: &mut dyn Write, response: &SolveResponse) -> Result<(), CliError> {
    let payload =
        serde_json::to_string_pretty(response).map_err(CliError::SerialiseSolveResponse)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteSolveOutput)?;
    writer
        .write_all(b"\n")
        .map_err(CliError::WriteSolveOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SolveConfig, CliError> {
    let merged = SolveArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SolveConfig::try_from(merged)
}
