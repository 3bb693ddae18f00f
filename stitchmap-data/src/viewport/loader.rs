use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};
use stitchmap_core::{
    BboxKey, BoundingBox, Feature, FeatureProvider, FetchError, Generation, Layer,
    RequestGeneration,
};

use super::cache::ViewportCache;

/// Result of [`ViewportLoader::begin`].
#[derive(Debug)]
pub enum Begin {
    /// The window was cached and has been applied.
    Cached(Arc<[Feature]>),
    /// The window must be fetched; pass the request to
    /// [`ViewportLoader::complete`] once the provider answers.
    Pending(PendingRequest),
}

/// A request that has been started but not yet completed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    generation: Generation,
    bbox: BoundingBox,
    key: BboxKey,
}

impl PendingRequest {
    /// Token issued when the request started.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Requested window.
    #[must_use]
    pub const fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Cache key of the requested window.
    #[must_use]
    pub const fn key(&self) -> BboxKey {
        self.key
    }
}

/// What happened to a viewport request.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Served from the cache without a fetch.
    Cached(Arc<[Feature]>),
    /// Fetched, cached and applied.
    Loaded(Arc<[Feature]>),
    /// A newer request started before this one finished; the response was
    /// discarded and not cached.
    Stale,
    /// The fetch failed. `fallback` is the last applied result, if any, so
    /// the view can keep showing it.
    Failed {
        /// Why the fetch failed.
        error: FetchError,
        /// Last successfully applied features.
        fallback: Option<Arc<[Feature]>>,
    },
}

impl LoadOutcome {
    /// Features the view should now display, if any.
    #[must_use]
    pub fn features(&self) -> Option<&Arc<[Feature]>> {
        match self {
            Self::Cached(features) | Self::Loaded(features) => Some(features),
            Self::Failed { fallback, .. } => fallback.as_ref(),
            Self::Stale => None,
        }
    }
}

/// Fetches viewport features through a provider with "latest wins" semantics.
///
/// The loader is `Sync` when its provider is, so several threads may start
/// and complete requests concurrently; whichever request began last is the
/// only one whose response is applied. Issuing a generation and applying a
/// result both happen under the `last_applied` lock, so a completion can never
/// overwrite the result of a request that began after its staleness check.
///
/// # Examples
/// ```
/// use stitchmap_core::{BoundingBox, Layer};
/// use stitchmap_core::test_support::StubFeatureProvider;
/// use stitchmap_data::viewport::{Begin, LoadOutcome, ViewportLoader};
///
/// let loader = ViewportLoader::new(StubFeatureProvider::with_features(Vec::new()))
///     .with_layers(vec![Layer::Parks]);
/// let bbox = BoundingBox::new(52.50, 13.35, 52.52, 13.40).expect("valid bbox");
///
/// let first = loader.begin(&bbox);
/// let Begin::Pending(first) = first else { panic!("cold cache") };
/// let second = loader.load(&bbox);
/// assert!(matches!(second, LoadOutcome::Loaded(_)));
///
/// // The first request finished after the second started.
/// let late = loader.complete(&first, Ok(Vec::new()));
/// assert_eq!(late, LoadOutcome::Stale);
/// ```
#[derive(Debug)]
pub struct ViewportLoader<P> {
    provider: P,
    layers: Vec<Layer>,
    generations: RequestGeneration,
    cache: Mutex<ViewportCache>,
    last_applied: Mutex<Option<Arc<[Feature]>>>,
}

impl<P: FeatureProvider> ViewportLoader<P> {
    /// Loader requesting every layer, with the default cache size.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            layers: Layer::ALL.to_vec(),
            generations: RequestGeneration::new(),
            cache: Mutex::new(ViewportCache::default()),
            last_applied: Mutex::new(None),
        }
    }

    /// Restrict the layers requested for every window.
    #[must_use]
    pub fn with_layers(mut self, layers: Vec<Layer>) -> Self {
        self.layers = layers;
        self
    }

    /// Replace the cache with one holding `capacity` windows.
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.cache = Mutex::new(ViewportCache::new(capacity));
        self
    }

    /// Layers requested for every window.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Start a request for `bbox`, superseding every earlier request.
    ///
    /// A cached window is applied immediately.
    pub fn begin(&self, bbox: &BoundingBox) -> Begin {
        let key = bbox.key();
        let mut applied = lock(&self.last_applied);
        let generation = self.generations.begin();
        if let Some(features) = lock(&self.cache).get(&key) {
            debug!("viewport {key} served from cache");
            *applied = Some(Arc::clone(&features));
            return Begin::Cached(features);
        }
        Begin::Pending(PendingRequest {
            generation,
            bbox: *bbox,
            key,
        })
    }

    /// Run the provider for a pending request.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`FetchError`].
    pub fn fetch(&self, pending: &PendingRequest) -> Result<Vec<Feature>, FetchError> {
        self.provider.fetch_features(&pending.bbox, &self.layers)
    }

    /// Apply the provider's answer to `pending` unless it has been superseded.
    pub fn complete(
        &self,
        pending: &PendingRequest,
        result: Result<Vec<Feature>, FetchError>,
    ) -> LoadOutcome {
        let mut applied = lock(&self.last_applied);
        if !self.generations.is_current(pending.generation) {
            debug!(
                "discarding stale response for {} (generation {})",
                pending.key,
                pending.generation.get()
            );
            return LoadOutcome::Stale;
        }
        match result {
            Ok(features) => {
                let features: Arc<[Feature]> = Arc::from(features);
                lock(&self.cache).insert(pending.key, Arc::clone(&features));
                *applied = Some(Arc::clone(&features));
                LoadOutcome::Loaded(features)
            }
            Err(error) => {
                warn!("viewport {} failed to load: {error}", pending.key);
                LoadOutcome::Failed {
                    error,
                    fallback: applied.clone(),
                }
            }
        }
    }

    /// Begin, fetch and complete a request for `bbox`.
    pub fn load(&self, bbox: &BoundingBox) -> LoadOutcome {
        match self.begin(bbox) {
            Begin::Cached(features) => LoadOutcome::Cached(features),
            Begin::Pending(pending) => {
                let result = self.fetch(&pending);
                self.complete(&pending, result)
            }
        }
    }

    /// Most recently applied features.
    #[must_use]
    pub fn last_applied(&self) -> Option<Arc<[Feature]>> {
        lock(&self.last_applied).clone()
    }

    /// Number of cached windows.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        lock(&self.cache).len()
    }

    /// Borrow the wrapped provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }
}

// Poisoning is ignored: every critical section leaves its value consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
