//! Facade crate for stitchmap.
//!
//! This crate re-exports the ring assembler and the feature model, and, with
//! the `data` feature, the Overpass client, feature extraction, viewport
//! loading and the country boundary cache.

#![forbid(unsafe_code)]

pub use stitchmap_core::{
    AssembledPolygon, AssembledRing, BboxKey, BoundingBox, BoundingBoxError, Feature,
    FeatureKind, FeatureProvider, FetchError, Generation, Layer, Point, RequestGeneration, Ring,
    RingAssembler, Role, Segment, assemble_rings,
};

pub use stitchmap_core::render;

#[cfg(feature = "data")]
pub use stitchmap_data::{
    CountryBoundaryCache, CountrySource, DatasetFile, ExtractReport, LoadOutcome,
    OverpassProvider, OverpassProviderConfig, ViewportLoader, extract_features,
};
