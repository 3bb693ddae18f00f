//! Fetch command implementation for the stitchmap CLI.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stitchmap_core::{BoundingBox, FeatureProvider, Layer};
use stitchmap_data::overpass::{DEFAULT_OVERPASS_URL, OverpassProvider, OverpassProviderConfig};
use tracing::info;

use crate::support::write_features;
use crate::{
    ARG_FETCH_BBOX, ARG_FETCH_LAYERS, ARG_FETCH_OVERPASS_URL, ARG_FETCH_TIMEOUT_SECS, CliError,
    ENV_FETCH_BBOX,
};

/// Client timeout used when `--timeout-secs` is not given.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI arguments for the `fetch` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Query an Overpass API endpoint for the requested layers \
                 inside a bounding box given as south,west,north,east in \
                 degrees, and print the assembled features as JSON.",
    about = "Fetch features for a bounding box from Overpass"
)]
#[ortho_config(prefix = "STITCHMAP")]
pub(crate) struct FetchArgs {
    /// Viewport as `south,west,north,east`.
    #[arg(long = ARG_FETCH_BBOX, value_name = "s,w,n,e", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) bbox: Option<String>,
    /// Comma-separated layers (boundaries, parks, water, roads, buildings).
    #[arg(long = ARG_FETCH_LAYERS, value_name = "list")]
    #[serde(default)]
    pub(crate) layers: Option<String>,
    /// Base URL of the Overpass server.
    #[arg(long = ARG_FETCH_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// HTTP client timeout in seconds.
    #[arg(long = ARG_FETCH_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl FetchArgs {
    pub(crate) fn into_config(self) -> Result<FetchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        FetchConfig::try_from(merged)
    }
}

/// Resolved `fetch` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FetchConfig {
    pub(crate) bbox: BoundingBox,
    pub(crate) layers: Vec<Layer>,
    pub(crate) overpass_url: String,
    pub(crate) timeout: Duration,
}

impl TryFrom<FetchArgs> for FetchConfig {
    type Error = CliError;

    fn try_from(args: FetchArgs) -> Result<Self, Self::Error> {
        let bbox = args
            .bbox
            .ok_or(CliError::MissingArgument {
                field: ARG_FETCH_BBOX,
                env: ENV_FETCH_BBOX,
            })?
            .parse::<BoundingBox>()?;
        let layers = match args.layers {
            Some(list) => parse_layers(&list)?,
            None => Layer::ALL.to_vec(),
        };
        Ok(Self {
            bbox,
            layers,
            overpass_url: args
                .overpass_url
                .unwrap_or_else(|| DEFAULT_OVERPASS_URL.to_owned()),
            timeout: Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

/// Parse a comma-separated layer list, ignoring blank entries.
pub(crate) fn parse_layers(list: &str) -> Result<Vec<Layer>, CliError> {
    let mut layers = list
        .split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(str::parse::<Layer>)
        .collect::<Result<Vec<_>, _>>()?;
    layers.sort_unstable();
    layers.dedup();
    Ok(layers)
}

/// Builds the feature provider for the current fetch invocation.
pub(crate) trait FetchProviderBuilder {
    fn build(&self, config: &FetchConfig) -> Result<Box<dyn FeatureProvider>, CliError>;
}

pub(crate) struct OverpassProviderBuilder;

impl FetchProviderBuilder for OverpassProviderBuilder {
    fn build(&self, config: &FetchConfig) -> Result<Box<dyn FeatureProvider>, CliError> {
        let provider_config =
            OverpassProviderConfig::new(config.overpass_url.clone()).with_timeout(config.timeout);
        let provider = OverpassProvider::with_config(provider_config).map_err(|source| {
            CliError::BuildProvider {
                base_url: config.overpass_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(provider))
    }
}

pub(crate) fn run_fetch(args: FetchArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_fetch_with(args, &OverpassProviderBuilder, &mut stdout)
}

pub(crate) fn run_fetch_with(
    args: FetchArgs,
    builder: &dyn FetchProviderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let provider = builder.build(&config)?;
    let features = provider.fetch_features(&config.bbox, &config.layers)?;
    info!(bbox = %config.bbox, features = features.len(), "fetched features");
    write_features(writer, &features)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<FetchConfig, CliError> {
    let merged = FetchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    FetchConfig::try_from(merged)
}
