//! In-memory [`CountrySource`] for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use camino::Utf8PathBuf;

use super::source::{CountrySource, DatasetError};
use crate::overpass::OverpassResponse;

/// Country source serving a fixed response.
///
/// Can be told to fail its first few loads and to take a while over each
/// load, so tests can exercise retries and concurrent first access.
#[derive(Debug)]
pub struct StaticCountrySource {
    response: OverpassResponse,
    failures_remaining: AtomicUsize,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticCountrySource {
    /// Source that always returns `response`.
    #[must_use]
    pub const fn new(response: OverpassResponse) -> Self {
        Self {
            response,
            failures_remaining: AtomicUsize::new(0),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail the first `count` loads with a read error.
    #[must_use]
    pub fn failing_first(self, count: usize) -> Self {
        self.failures_remaining.store(count, Ordering::SeqCst);
        self
    }

    /// Sleep for `delay` inside every load.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of loads attempted so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CountrySource for StaticCountrySource {
    fn load(&self) -> Result<OverpassResponse, DatasetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        let should_fail = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(DatasetError::Read {
                path: Utf8PathBuf::from("<static>"),
                source: std::io::Error::other("simulated dataset failure"),
            });
        }
        Ok(self.response.clone())
    }
}
