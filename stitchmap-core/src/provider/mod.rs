//! Fetch map features for a viewport from an external data source.
//!
//! The [`FeatureProvider`] trait abstracts the retrieval of assembled
//! [`Feature`](crate::Feature) values for a [`BoundingBox`](crate::BoundingBox).
//! Provider failures are reported as distinguished [`FetchError`] outcomes so
//! callers can fall back to cached data instead of failing hard.

mod error;
mod layer;
mod source;

pub use error::FetchError;
pub use layer::{Layer, ParseLayerError};
pub use source::FeatureProvider;
