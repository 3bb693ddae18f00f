//! Command-line tooling for stitchmap.
//!
//! Three subcommands share one configuration story: every option can come
//! from a flag, a `STITCHMAP_*` environment variable or a configuration file,
//! merged by `ortho_config`.
//!
//! - `assemble` stitches the relations in a saved Overpass response and
//!   prints the resulting features as JSON.
//! - `fetch` queries a live Overpass endpoint for a bounding box.
//! - `serve` exposes the memoised country boundaries over HTTP.

use clap::{Parser, Subcommand};

mod assemble;
mod error;
mod fetch;
pub mod logging;
mod serve;
mod support;

use assemble::{AssembleArgs, run_assemble};
pub use error::CliError;
use fetch::{FetchArgs, run_fetch};
use serve::{ServeArgs, run_serve};

const ARG_ASSEMBLE_DATASET: &str = "dataset";
const ARG_ASSEMBLE_OUTPUT: &str = "output";
const ENV_ASSEMBLE_DATASET: &str = "STITCHMAP_CMDS_ASSEMBLE_DATASET";
const ARG_FETCH_BBOX: &str = "bbox";
const ARG_FETCH_LAYERS: &str = "layers";
const ARG_FETCH_OVERPASS_URL: &str = "overpass-url";
const ARG_FETCH_TIMEOUT_SECS: &str = "timeout-secs";
const ENV_FETCH_BBOX: &str = "STITCHMAP_CMDS_FETCH_BBOX";
const ARG_SERVE_COUNTRIES_DATASET: &str = "countries-dataset";
const ARG_SERVE_LISTEN: &str = "listen";
const ENV_SERVE_COUNTRIES_DATASET: &str = "STITCHMAP_CMDS_SERVE_COUNTRIES_DATASET";

/// Parse the process arguments and run the selected command.
///
/// # Errors
///
/// Returns a [`CliError`] describing the first failure.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Assemble(args) => run_assemble(args),
        Command::Fetch(args) => run_fetch(args),
        Command::Serve(args) => run_serve(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "stitchmap",
    about = "Assemble, fetch and serve OpenStreetMap area features",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Stitch the relations in a saved Overpass JSON response.
    Assemble(AssembleArgs),
    /// Query an Overpass endpoint for a bounding box.
    Fetch(FetchArgs),
    /// Serve country boundaries over HTTP.
    Serve(ServeArgs),
}

#[cfg(test)]
mod tests;
