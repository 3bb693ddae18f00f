//! Bounded LRU cache of assembled viewport results.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use stitchmap_core::{BboxKey, Feature};

/// Number of viewports kept when no capacity is given.
pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(64) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

/// LRU map from normalised window keys to immutable feature lists.
///
/// Entries are shared as `Arc<[Feature]>` and never mutated after insertion;
/// a fresh result for the same key replaces the entry wholesale.
#[derive(Debug)]
pub struct ViewportCache {
    entries: LruCache<BboxKey, Arc<[Feature]>>,
}

impl Default for ViewportCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl ViewportCache {
    /// Cache holding at most `capacity` viewports.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Look up `key`, marking it as most recently used.
    pub fn get(&mut self, key: &BboxKey) -> Option<Arc<[Feature]>> {
        self.entries.get(key).cloned()
    }

    /// Store `features` under `key`, evicting the least recently used entry
    /// when full.
    pub fn insert(&mut self, key: BboxKey, features: Arc<[Feature]>) {
        self.entries.put(key, features);
    }

    /// Returns `true` if `key` is cached, without touching recency.
    #[must_use]
    pub fn contains(&self, key: &BboxKey) -> bool {
        self.entries.contains(key)
    }

    /// Number of cached viewports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached viewports.
    #[must_use]
    pub fn capacity(&self) -> NonZeroUsize {
        self.entries.cap()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
