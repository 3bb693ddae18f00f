//! Error types emitted by the stitchmap CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::net::AddrParseError;
use std::sync::Arc;

use camino::Utf8PathBuf;
use stitchmap_core::{BoundingBoxError, FetchError, ParseLayerError};
use stitchmap_data::DatasetError;
use stitchmap_data::overpass::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the stitchmap CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The `--bbox` value is not a valid viewport.
    #[error("invalid bbox: {0}")]
    InvalidBoundingBox(#[from] BoundingBoxError),
    /// A `--layers` entry names no known layer.
    #[error("invalid layers: {0}")]
    InvalidLayer(#[from] ParseLayerError),
    /// The `--listen` value is not a socket address.
    #[error("invalid listen address {value:?}: {source}")]
    InvalidListenAddress {
        value: String,
        #[source]
        source: AddrParseError,
    },
    /// Reading or decoding an Overpass dataset failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// Constructing the Overpass client failed.
    #[error("failed to build Overpass provider for {base_url:?}: {source}")]
    BuildProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The feature provider rejected or failed the request.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    /// Serialising features failed.
    #[error("failed to serialise features: {0}")]
    SerialiseFeatures(#[source] serde_json::Error),
    /// Creating the output file failed.
    #[error("failed to create output file {path:?}: {source}")]
    CreateOutput {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Starting the async runtime or binding the listener failed.
    #[error("failed to start server on {addr}: {source}")]
    Serve {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
