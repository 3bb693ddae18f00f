//! Monotonic request tokens for discarding superseded responses.
//!
//! Every outgoing request takes a [`Generation`] from a shared
//! [`RequestGeneration`]. When the response arrives the caller checks whether
//! its token is still the latest; if a newer request has started since, the
//! response is stale and must be dropped rather than applied.

use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque token identifying one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// Raw sequence number, for logging.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Shared, thread-safe source of [`Generation`] tokens.
///
/// # Examples
/// ```
/// use stitchmap_core::RequestGeneration;
///
/// let generations = RequestGeneration::new();
/// let first = generations.begin();
/// let second = generations.begin();
/// assert!(!generations.is_current(first));
/// assert!(generations.is_current(second));
/// ```
#[derive(Debug, Default)]
pub struct RequestGeneration {
    latest: AtomicU64,
}

impl RequestGeneration {
    /// Counter starting before the first request.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Start a new request, superseding every earlier token.
    pub fn begin(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Returns `true` when no request has started since `token` was issued.
    #[must_use]
    pub fn is_current(&self, token: Generation) -> bool {
        self.latest.load(Ordering::Acquire) == token.0
    }

    /// Most recently issued token, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Generation> {
        match self.latest.load(Ordering::Acquire) {
            0 => None,
            value => Some(Generation(value)),
        }
    }
}
