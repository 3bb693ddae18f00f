//! Feature provider trait for viewport queries.

use crate::{BoundingBox, Feature};

use super::error::FetchError;
use super::layer::Layer;

/// Fetch assembled features inside a bounding box.
///
/// Implementations own their transport and return features whose rings have
/// already been stitched. An empty `layers` slice yields an empty result.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use stitchmap_core::{BoundingBox, Feature, FeatureKind, FeatureProvider, FetchError, Layer, Ring};
///
/// struct OnePark;
///
/// impl FeatureProvider for OnePark {
///     fn fetch_features(
///         &self,
///         _bbox: &BoundingBox,
///         layers: &[Layer],
///     ) -> Result<Vec<Feature>, FetchError> {
///         if !layers.contains(&Layer::Parks) {
///             return Ok(Vec::new());
///         }
///         let ring = Ring::from(vec![Coord { x: 0.0, y: 0.0 }]);
///         Ok(vec![Feature::new(FeatureKind::Park, vec![ring])])
///     }
/// }
///
/// let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0).expect("valid bbox");
/// let features = OnePark.fetch_features(&bbox, &[Layer::Parks])?;
/// assert_eq!(features.len(), 1);
/// # Ok::<(), FetchError>(())
/// ```
pub trait FeatureProvider {
    /// Return the features of `layers` intersecting `bbox`.
    fn fetch_features(
        &self,
        bbox: &BoundingBox,
        layers: &[Layer],
    ) -> Result<Vec<Feature>, FetchError>;
}

impl<P: FeatureProvider + ?Sized> FeatureProvider for &P {
    fn fetch_features(
        &self,
        bbox: &BoundingBox,
        layers: &[Layer],
    ) -> Result<Vec<Feature>, FetchError> {
        (**self).fetch_features(bbox, layers)
    }
}

impl<P: FeatureProvider + ?Sized> FeatureProvider for Box<P> {
    fn fetch_features(
        &self,
        bbox: &BoundingBox,
        layers: &[Layer],
    ) -> Result<Vec<Feature>, FetchError> {
        (**self).fetch_features(bbox, layers)
    }
}
