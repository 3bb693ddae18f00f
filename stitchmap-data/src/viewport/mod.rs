//! Viewport loading with caching and stale-response suppression.
//!
//! A map view issues a request whenever the visible window changes. Requests
//! overlap; only the newest one may update the view. [`ViewportLoader`] tags
//! each request with a [`stitchmap_core::Generation`], serves repeated
//! windows from a [`ViewportCache`] and keeps the last applied result around
//! as a fallback when a fetch fails.

mod cache;
mod loader;

pub use cache::{DEFAULT_CACHE_CAPACITY, ViewportCache};
pub use loader::{Begin, LoadOutcome, PendingRequest, ViewportLoader};
