//! Serve command implementation for the stitchmap CLI.
//!
//! The server exposes a single read-only resource, `GET /countries`, backed by
//! a [`CountryBoundaryCache`] created once at startup and shared with every
//! request through axum state.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stitchmap_data::{CountryBoundaryCache, CountrySource, DatasetFile};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::support::require_existing;
use crate::{ARG_SERVE_COUNTRIES_DATASET, ARG_SERVE_LISTEN, CliError, ENV_SERVE_COUNTRIES_DATASET};

/// Address bound when `--listen` is not given.
pub(crate) const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

/// CLI arguments for the `serve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Serve the country boundaries contained in a pre-built \
                 Overpass JSON dataset. The dataset is loaded and assembled \
                 on the first request and kept for the lifetime of the \
                 process.",
    about = "Serve country boundaries over HTTP"
)]
#[ortho_config(prefix = "STITCHMAP")]
pub(crate) struct ServeArgs {
    /// Path to the Overpass JSON dataset holding country relations.
    #[arg(long = ARG_SERVE_COUNTRIES_DATASET, value_name = "path")]
    #[serde(default)]
    pub(crate) countries_dataset: Option<Utf8PathBuf>,
    /// Socket address to listen on.
    #[arg(long = ARG_SERVE_LISTEN, value_name = "addr")]
    #[serde(default)]
    pub(crate) listen: Option<String>,
}

impl ServeArgs {
    pub(crate) fn into_config(self) -> Result<ServeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ServeConfig::try_from(merged)
    }
}

/// Resolved `serve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServeConfig {
    pub(crate) countries_dataset: Utf8PathBuf,
    pub(crate) listen: SocketAddr,
}

impl TryFrom<ServeArgs> for ServeConfig {
    type Error = CliError;

    fn try_from(args: ServeArgs) -> Result<Self, Self::Error> {
        let countries_dataset = args.countries_dataset.ok_or(CliError::MissingArgument {
            field: ARG_SERVE_COUNTRIES_DATASET,
            env: ENV_SERVE_COUNTRIES_DATASET,
        })?;
        let value = args.listen.unwrap_or_else(|| DEFAULT_LISTEN.to_owned());
        let listen = value
            .parse::<SocketAddr>()
            .map_err(|source| CliError::InvalidListenAddress { value, source })?;
        Ok(Self {
            countries_dataset,
            listen,
        })
    }
}

/// Build the HTTP routes over a shared country cache.
pub(crate) fn router<S: CountrySource>(cache: Arc<CountryBoundaryCache<S>>) -> Router {
    Router::new()
        .route("/countries", get(countries::<S>))
        .with_state(cache)
}

pub(crate) async fn countries<S: CountrySource>(
    State(cache): State<Arc<CountryBoundaryCache<S>>>,
) -> Response {
    match cache.countries().await {
        Ok(features) => Json(&*features).into_response(),
        Err(err) => {
            warn!(error = %err, "country boundaries unavailable");
            let body = serde_json::json!({ "error": err.to_string() });
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}

pub(crate) fn run_serve(args: ServeArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.countries_dataset, ARG_SERVE_COUNTRIES_DATASET)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|source| CliError::Serve {
            addr: config.listen,
            source,
        })?;
    let cache = Arc::new(CountryBoundaryCache::new(DatasetFile::new(
        config.countries_dataset.clone(),
    )));
    runtime.block_on(serve(config.listen, router(cache)))
}

async fn serve(addr: SocketAddr, app: Router) -> Result<(), CliError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| CliError::Serve { addr, source })?;
    info!(%addr, "serving country boundaries");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| CliError::Serve { addr, source })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ServeConfig, CliError> {
    let merged = ServeArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ServeConfig::try_from(merged)
}
