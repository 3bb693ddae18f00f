//! Overpass API integration.
//!
//! [`OverpassQuery`] renders Overpass QL for a window and a set of layers,
//! [`OverpassResponse`] models the JSON the server returns and
//! [`OverpassProvider`] ties both to HTTP behind the
//! [`stitchmap_core::FeatureProvider`] trait.

mod provider;
mod query;
mod response;

pub use provider::{
    DEFAULT_MAX_AREA_DEG2, DEFAULT_OVERPASS_URL, DEFAULT_USER_AGENT, OverpassProvider,
    OverpassProviderConfig, ProviderBuildError,
};
pub use query::{DEFAULT_MAXSIZE_BYTES, DEFAULT_QUERY_TIMEOUT_SECS, OverpassQuery};
pub use response::{Element, LatLon, Member, Node, OverpassResponse, Relation, Tags, Way};
