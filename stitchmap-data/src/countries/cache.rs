use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{info, warn};
use stitchmap_core::{Feature, FeatureKind, RingAssembler};
use thiserror::Error;
use tokio::sync::OnceCell;

use super::source::{CountrySource, DatasetError};
use crate::extract::{extract_features_with, features_of_kind};

/// Errors returned by [`CountryBoundaryCache::countries`].
#[derive(Debug, Error)]
pub enum CountryCacheError {
    /// The source dataset could not be loaded.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// The blocking load task panicked or was cancelled.
    #[error("country boundary load task failed: {message}")]
    Task {
        /// Join error text.
        message: String,
    },
}

/// Memoised, assembled country boundaries.
///
/// The first call to [`countries`](Self::countries) loads the source and
/// assembles every country relation on the blocking thread pool; concurrent
/// first callers wait for that single load. A failed load leaves the cache
/// empty, so the next call tries again. Once loaded, the list is shared for
/// the lifetime of the cache.
///
/// # Examples
/// ```
/// use stitchmap_data::countries::{CountryBoundaryCache, CountrySource, DatasetError};
/// use stitchmap_data::overpass::OverpassResponse;
///
/// struct Empty;
///
/// impl CountrySource for Empty {
///     fn load(&self) -> Result<OverpassResponse, DatasetError> {
///         Ok(OverpassResponse::default())
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), stitchmap_data::countries::CountryCacheError> {
/// let cache = CountryBoundaryCache::new(Empty);
/// let countries = cache.countries().await?;
/// assert!(countries.is_empty());
/// assert_eq!(cache.loads(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CountryBoundaryCache<S> {
    source: Arc<S>,
    assembler: RingAssembler,
    countries: OnceCell<Arc<[Feature]>>,
    loads: AtomicUsize,
}

impl<S: CountrySource> CountryBoundaryCache<S> {
    /// Empty cache over `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            assembler: RingAssembler::new(),
            countries: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Use `assembler` for stitching boundary relations.
    #[must_use]
    pub fn with_assembler(mut self, assembler: RingAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Assembled country boundaries, loading them on first use.
    ///
    /// # Errors
    ///
    /// Returns a [`CountryCacheError`] when loading fails. The failure is not
    /// memoised.
    pub async fn countries(&self) -> Result<Arc<[Feature]>, CountryCacheError> {
        self.countries
            .get_or_try_init(|| self.load())
            .await
            .map(Arc::clone)
    }

    /// Loaded boundaries, without triggering a load.
    #[must_use]
    pub fn get(&self) -> Option<Arc<[Feature]>> {
        self.countries.get().cloned()
    }

    /// Number of load attempts made so far.
    #[must_use]
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    async fn load(&self) -> Result<Arc<[Feature]>, CountryCacheError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let source = Arc::clone(&self.source);
        let assembler = self.assembler;
        let loaded = tokio::task::spawn_blocking(move || {
            let response = source.load()?;
            let report = extract_features_with(&assembler, &response);
            Ok::<_, DatasetError>(features_of_kind(report.features, FeatureKind::Country))
        })
        .await
        .map_err(|err| CountryCacheError::Task {
            message: err.to_string(),
        })?;

        match loaded {
            Ok(countries) => {
                info!("Assembled {} country boundaries", countries.len());
                Ok(Arc::from(countries))
            }
            Err(err) => {
                warn!("Country boundary load failed: {err}");
                Err(err.into())
            }
        }
    }
}
