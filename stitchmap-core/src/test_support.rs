//! Test doubles and geometry builders shared by unit and behaviour tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use geo::Coord;

use crate::{BoundingBox, Feature, FeatureProvider, FetchError, Layer, Point, Role, Segment};

/// Deterministic [`FeatureProvider`] returning a pre-configured response.
///
/// Counts how often it was called so tests can assert cache behaviour.
#[derive(Debug)]
pub struct StubFeatureProvider {
    response: Result<Vec<Feature>, FetchError>,
    calls: AtomicUsize,
}

impl StubFeatureProvider {
    /// Provider that always returns `features`.
    #[must_use]
    pub const fn with_features(features: Vec<Feature>) -> Self {
        Self {
            response: Ok(features),
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider that always fails with `error`.
    #[must_use]
    pub const fn with_error(error: FetchError) -> Self {
        Self {
            response: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of fetches served so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FeatureProvider for StubFeatureProvider {
    fn fetch_features(
        &self,
        _bbox: &BoundingBox,
        layers: &[Layer],
    ) -> Result<Vec<Feature>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if layers.is_empty() {
            return Ok(Vec::new());
        }
        self.response.clone()
    }
}

/// Build points from `(longitude, latitude)` pairs.
#[must_use]
pub fn points(coords: &[(f64, f64)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Coord { x, y }).collect()
}

/// Build a segment from a role and `(longitude, latitude)` pairs.
#[must_use]
pub fn segment(role: Role, coords: &[(f64, f64)]) -> Segment {
    Segment::new(role, points(coords))
}

/// Closed axis-aligned square with its lower-left corner at `(x, y)`.
#[must_use]
pub fn square(x: f64, y: f64, size: f64) -> Vec<Point> {
    points(&[
        (x, y),
        (x + size, y),
        (x + size, y + size),
        (x, y + size),
        (x, y),
    ])
}
