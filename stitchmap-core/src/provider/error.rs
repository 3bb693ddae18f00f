use thiserror::Error;

/// Errors from [`crate::provider::FeatureProvider::fetch_features`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The service asked us to back off.
    #[error("request to {url} was rate limited")]
    RateLimited {
        /// Endpoint that rejected the request.
        url: String,
        /// Seconds to wait before retrying, when the service said so.
        retry_after_secs: Option<u64>,
    },
    /// The request or the server-side query ran out of time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that timed out.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The query covered too much data to be answered.
    #[error("query too large: {message}")]
    QueryTooLarge {
        /// Why the query was rejected.
        message: String,
    },
    /// Connection failures and unexpected HTTP statuses.
    #[error("transport error for {url}: {message}")]
    Transport {
        /// Endpoint that failed.
        url: String,
        /// HTTP status, when one was received.
        status: Option<u16>,
        /// Underlying error text.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse provider response: {message}")]
    Parse {
        /// Decoder error text.
        message: String,
    },
}

impl FetchError {
    /// Returns `true` for outcomes worth retrying later with the same query.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Timeout { .. } | Self::Transport { .. }
        )
    }
}
