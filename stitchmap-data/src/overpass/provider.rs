//! HTTP-based `FeatureProvider` backed by the Overpass API.
//!
//! [`FeatureProvider`] is synchronous so the core stays embeddable in
//! synchronous renderers. [`OverpassProvider`] bridges to `reqwest` by
//! blocking on a Tokio runtime it owns.

use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use stitchmap_core::{BoundingBox, Feature, FeatureProvider, FetchError, Layer};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::query::{DEFAULT_MAXSIZE_BYTES, DEFAULT_QUERY_TIMEOUT_SECS, OverpassQuery};
use super::response::OverpassResponse;
use crate::extract::extract_features;

/// Errors raised while constructing an [`OverpassProvider`].
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Public Overpass instance used when no URL is configured.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de";

/// Default user agent for Overpass requests.
pub const DEFAULT_USER_AGENT: &str = "stitchmap/0.1";

/// Default client-side request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Largest window, in square degrees, sent to the server by default.
pub const DEFAULT_MAX_AREA_DEG2: f64 = 1.0;

/// Configuration for [`OverpassProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct OverpassProviderConfig {
    /// Base URL of the Overpass instance (e.g. `"https://overpass-api.de"`).
    pub base_url: String,
    /// Client-side request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Server-side `[timeout:..]` setting.
    pub query_timeout_secs: u32,
    /// Server-side `[maxsize:..]` setting.
    pub maxsize_bytes: u64,
    /// Windows larger than this are rejected before any request is made.
    pub max_area_deg2: f64,
}

impl Default for OverpassProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OVERPASS_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            maxsize_bytes: DEFAULT_MAXSIZE_BYTES,
            max_area_deg2: DEFAULT_MAX_AREA_DEG2,
        }
    }
}

impl OverpassProviderConfig {
    /// Create a configuration for the instance at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the client-side request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the server-side evaluation limit.
    #[must_use]
    pub fn with_query_timeout_secs(mut self, secs: u32) -> Self {
        self.query_timeout_secs = secs;
        self
    }

    /// Set the server-side memory limit.
    #[must_use]
    pub fn with_maxsize_bytes(mut self, bytes: u64) -> Self {
        self.maxsize_bytes = bytes;
        self
    }

    /// Set the largest window accepted before sending.
    #[must_use]
    pub fn with_max_area_deg2(mut self, area: f64) -> Self {
        self.max_area_deg2 = area;
        self
    }
}

/// Feature provider querying an Overpass API instance.
///
/// Requests are posted to `{base_url}/api/interpreter` and the response is
/// run through [`extract_features`], so callers receive assembled rings.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the provider blocks on its own current-thread
/// runtime. Inside a multi-threaded runtime it borrows that runtime's handle
/// through [`tokio::task::block_in_place`]. Inside a `current_thread` runtime
/// it falls back to its own runtime, which may stall the caller's executor
/// for the duration of the request.
///
/// # Example
///
/// ```no_run
/// use stitchmap_core::{BoundingBox, FeatureProvider, Layer};
/// use stitchmap_data::overpass::OverpassProvider;
///
/// let provider = OverpassProvider::new("https://overpass-api.de")?;
/// let bbox: BoundingBox = "52.50,13.35,52.52,13.40".parse()?;
/// let features = provider.fetch_features(&bbox, &[Layer::Parks, Layer::Water])?;
/// println!("{} features", features.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct OverpassProvider {
    client: Client,
    config: OverpassProviderConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for OverpassProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverpassProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl OverpassProvider {
    /// Create a provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(OverpassProviderConfig::new(base_url))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: OverpassProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &OverpassProviderConfig {
        &self.config
    }

    /// Build a query for `layers` in `bbox` using the configured limits.
    #[must_use]
    pub fn query(&self, bbox: BoundingBox, layers: &[Layer]) -> OverpassQuery {
        OverpassQuery::new(bbox, layers)
            .with_timeout_secs(self.config.query_timeout_secs)
            .with_maxsize_bytes(self.config.maxsize_bytes)
    }

    /// Run `query` and return the decoded response.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] describing why the query failed.
    pub fn fetch_response(&self, query: &OverpassQuery) -> Result<OverpassResponse, FetchError> {
        let future = self.fetch_response_async(query);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }

    fn interpreter_url(&self) -> String {
        format!(
            "{}/api/interpreter",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn fetch_response_async(
        &self,
        query: &OverpassQuery,
    ) -> Result<OverpassResponse, FetchError> {
        let url = self.interpreter_url();
        debug!("querying {url} for {}", query.bbox());

        let response = self
            .client
            .post(&url)
            .form(&[("data", query.to_ql())])
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.convert_status(status, response.headers(), &url));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        let mut bytes = body.to_vec();
        let decoded =
            OverpassResponse::from_slice(&mut bytes).map_err(|err| FetchError::Parse {
                message: err.to_string(),
            })?;

        if let Some(remark) = decoded.remark.as_deref() {
            if let Some(err) = self.convert_remark(remark, &url) {
                return Err(err);
            }
            warn!("Overpass remark for {url}: {remark}");
        }
        Ok(decoded)
    }

    /// Convert a reqwest error to a [`FetchError`].
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> FetchError {
        if error.is_timeout() {
            return FetchError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }
        if error.is_decode() {
            return FetchError::Parse {
                message: error.to_string(),
            };
        }
        FetchError::Transport {
            url: url.to_owned(),
            status: error.status().map(|status| status.as_u16()),
            message: error.to_string(),
        }
    }

    /// Convert a non-success HTTP status to a [`FetchError`].
    fn convert_status(&self, status: StatusCode, headers: &HeaderMap, url: &str) -> FetchError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited {
                url: url.to_owned(),
                retry_after_secs: headers
                    .get(RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.trim().parse().ok()),
            },
            StatusCode::GATEWAY_TIMEOUT => FetchError::Timeout {
                url: url.to_owned(),
                timeout_secs: u64::from(self.config.query_timeout_secs),
            },
            StatusCode::PAYLOAD_TOO_LARGE => FetchError::QueryTooLarge {
                message: format!("{url} rejected the query with HTTP 413"),
            },
            other => FetchError::Transport {
                url: url.to_owned(),
                status: Some(other.as_u16()),
                message: other.to_string(),
            },
        }
    }

    /// Overpass reports aborted queries through a 200 response with a remark.
    fn convert_remark(&self, remark: &str, url: &str) -> Option<FetchError> {
        let lowered = remark.to_ascii_lowercase();
        if lowered.contains("timed out") {
            return Some(FetchError::Timeout {
                url: url.to_owned(),
                timeout_secs: u64::from(self.config.query_timeout_secs),
            });
        }
        if lowered.contains("out of memory") || lowered.contains("maxsize") {
            return Some(FetchError::QueryTooLarge {
                message: remark.to_owned(),
            });
        }
        None
    }
}

impl FeatureProvider for OverpassProvider {
    /// Fetch and assemble the features of `layers` inside `bbox`.
    ///
    /// Windows larger than the configured `max_area_deg2` fail with
    /// [`FetchError::QueryTooLarge`] without touching the network.
    fn fetch_features(
        &self,
        bbox: &BoundingBox,
        layers: &[Layer],
    ) -> Result<Vec<Feature>, FetchError> {
        if layers.is_empty() {
            return Ok(Vec::new());
        }
        let area = bbox.area_deg2();
        if area > self.config.max_area_deg2 {
            return Err(FetchError::QueryTooLarge {
                message: format!(
                    "window of {area:.3} square degrees exceeds the limit of {}",
                    self.config.max_area_deg2
                ),
            });
        }
        let query = self.query(*bbox, layers);
        let response = self.fetch_response(&query).inspect_err(|err| {
            warn!("Overpass fetch for {bbox} failed: {err}");
        })?;
        Ok(extract_features(&response).features)
    }
}
