//! Assemble command implementation for the stitchmap CLI.

use std::io::{BufWriter, Write};

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stitchmap_core::RingAssembler;
use stitchmap_data::fs::create_utf8_file;
use stitchmap_data::{CountrySource, DatasetFile, ExtractReport, extract_features_with};
use tracing::info;

use crate::support::{require_existing, write_features};
use crate::{ARG_ASSEMBLE_DATASET, ARG_ASSEMBLE_OUTPUT, CliError, ENV_ASSEMBLE_DATASET};

/// CLI arguments for the `assemble` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Read a saved Overpass JSON response (requested with \
                 `out geom`), stitch every multipolygon and boundary \
                 relation into closed rings and print the classified \
                 features as JSON.",
    about = "Assemble features from an Overpass JSON dataset"
)]
#[ortho_config(prefix = "STITCHMAP")]
pub(crate) struct AssembleArgs {
    /// Path to the Overpass JSON dataset.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) dataset: Option<Utf8PathBuf>,
    /// Write the features here instead of stdout.
    #[arg(long = ARG_ASSEMBLE_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Endpoint matching tolerance in degrees.
    #[arg(long, value_name = "degrees")]
    #[serde(default)]
    pub(crate) epsilon: Option<f64>,
}

impl AssembleArgs {
    pub(crate) fn into_config(self) -> Result<AssembleConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AssembleConfig::try_from(merged)
    }
}

/// Resolved `assemble` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AssembleConfig {
    pub(crate) dataset: Utf8PathBuf,
    pub(crate) output: Option<Utf8PathBuf>,
    pub(crate) assembler: RingAssembler,
}

impl TryFrom<AssembleArgs> for AssembleConfig {
    type Error = CliError;

    fn try_from(args: AssembleArgs) -> Result<Self, Self::Error> {
        let dataset = args.dataset.ok_or(CliError::MissingArgument {
            field: ARG_ASSEMBLE_DATASET,
            env: ENV_ASSEMBLE_DATASET,
        })?;
        let assembler = args
            .epsilon
            .map_or_else(RingAssembler::new, RingAssembler::with_epsilon);
        Ok(Self {
            dataset,
            output: args.output,
            assembler,
        })
    }
}

pub(crate) fn run_assemble(args: AssembleArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_assemble_with(args, &mut stdout)
}

/// Run `assemble`, writing to `stdout` unless an output file is configured.
pub(crate) fn run_assemble_with(
    args: AssembleArgs,
    stdout: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.dataset, ARG_ASSEMBLE_DATASET)?;
    let report = assemble_dataset(&config)?;
    match &config.output {
        Some(path) => {
            let file = create_utf8_file(path).map_err(|source| CliError::CreateOutput {
                path: path.clone(),
                source,
            })?;
            let mut writer = BufWriter::new(file);
            write_features(&mut writer, &report.features)?;
            writer.flush().map_err(CliError::WriteOutput)
        }
        None => write_features(stdout, &report.features),
    }
}

fn assemble_dataset(config: &AssembleConfig) -> Result<ExtractReport, CliError> {
    let response = DatasetFile::new(config.dataset.clone()).load()?;
    let report = extract_features_with(&config.assembler, &response);
    let summary = &report.summary;
    info!(
        dataset = %config.dataset,
        nodes = summary.nodes,
        ways = summary.ways,
        relations = summary.relations,
        skipped = summary.skipped,
        features = report.features.len(),
        "assembled dataset"
    );
    Ok(report)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<AssembleConfig, CliError> {
    let merged = AssembleArgs::merge_from_layers(layers).map_err(CliError::from)?;
    AssembleConfig::try_from(merged)
}
