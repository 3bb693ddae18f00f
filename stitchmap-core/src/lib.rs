//! Core domain types for the stitchmap renderer.
//!
//! The centrepiece is [`RingAssembler`], which rebuilds closed polygon
//! boundaries from the unordered member ways OpenStreetMap relations carry.
//! Around it sit the feature model handed to renderers, validated viewport
//! windows with normalised cache keys, request-generation tokens for
//! discarding stale responses, and the [`FeatureProvider`] seam behind which
//! network data sources live.
//!
//! Everything here is synchronous and free of I/O.

pub mod assemble;
pub mod bbox;
pub mod feature;
pub mod generation;
pub mod geometry;
pub mod provider;
pub mod render;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use assemble::{AssembledPolygon, AssembledRing, RingAssembler, assemble_rings};
pub use bbox::{BboxKey, BoundingBox, BoundingBoxError};
pub use feature::{Feature, FeatureKind, ParseFeatureKindError};
pub use generation::{Generation, RequestGeneration};
pub use geometry::{COINCIDENCE_EPSILON, Point, Ring, Role, Segment};
pub use provider::{FeatureProvider, FetchError, Layer, ParseLayerError};
