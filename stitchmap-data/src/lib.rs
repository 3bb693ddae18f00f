//! Data access for the stitchmap renderer.
//!
//! Responsibilities:
//! - Speak the Overpass API: build queries, decode responses and map server
//!   failures onto [`stitchmap_core::FetchError`].
//! - Turn OSM elements into assembled [`stitchmap_core::Feature`]s.
//! - Cache viewport results and discard superseded responses.
//! - Load and memoise country boundaries for the HTTP service.
//!
//! Boundaries:
//! - Do not encode geometry rules (live in `stitchmap-core`).
//! - Keep blocking work off async executors.
//!
//! Invariants:
//! - Thread-safe by default where feasible.
//! - No global mutable state.

pub mod countries;
pub mod extract;
pub mod fs;
pub mod overpass;
pub mod viewport;

pub use countries::{
    CountryBoundaryCache, CountryCacheError, CountrySource, DatasetError, DatasetFile,
};
pub use extract::{ExtractReport, ExtractSummary, extract_features, extract_features_with};
pub use overpass::{OverpassProvider, OverpassProviderConfig, OverpassQuery, OverpassResponse};
pub use viewport::{LoadOutcome, ViewportCache, ViewportLoader};
