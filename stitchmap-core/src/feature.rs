//! Renderable map features produced from OSM elements.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::Ring;

/// Category of a map feature, used to pick styling and fill behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FeatureKind {
    /// National boundary (`admin_level=2`).
    Country,
    /// State or province boundary (`admin_level=4`).
    State,
    /// Parks, gardens and recreation grounds.
    Park,
    /// Woods and forests.
    Forest,
    /// Lakes, reservoirs and riverbanks.
    Water,
    /// Building footprints.
    Building,
    /// Highways of any class. Linear.
    Road,
    /// Rivers, streams and canals. Linear.
    Waterway,
}

impl FeatureKind {
    /// Returns `true` for kinds drawn as filled areas rather than lines.
    #[must_use]
    pub const fn is_area(self) -> bool {
        !matches!(self, Self::Road | Self::Waterway)
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::State => "state",
            Self::Park => "park",
            Self::Forest => "forest",
            Self::Water => "water",
            Self::Building => "building",
            Self::Road => "road",
            Self::Waterway => "waterway",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`FeatureKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature kind: {0}")]
pub struct ParseFeatureKindError(pub String);

impl FromStr for FeatureKind {
    type Err = ParseFeatureKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "country" => Ok(Self::Country),
            "state" => Ok(Self::State),
            "park" => Ok(Self::Park),
            "forest" => Ok(Self::Forest),
            "water" => Ok(Self::Water),
            "building" => Ok(Self::Building),
            "road" => Ok(Self::Road),
            "waterway" => Ok(Self::Waterway),
            _ => Err(ParseFeatureKindError(s.to_owned())),
        }
    }
}

/// A named, classified shape ready for rendering.
///
/// `rings` hold outer shells and `holes` the inner rings; a feature may own
/// several disjoint shells (archipelagos, exclaves). Linear kinds store their
/// polylines in `rings` and never have holes.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stitchmap_core::{Feature, FeatureKind, Ring};
///
/// let shell = Ring::from(vec![
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 1.0, y: 0.0 },
///     Coord { x: 0.0, y: 1.0 },
///     Coord { x: 0.0, y: 0.0 },
/// ]);
/// let feature = Feature::new(FeatureKind::Park, vec![shell]).with_name("Green");
/// assert_eq!(feature.name.as_deref(), Some("Green"));
/// assert!(feature.holes.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature {
    /// Display name from the `name` tag.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub name: Option<String>,
    /// Feature category.
    pub kind: FeatureKind,
    /// Outer rings, or polylines for linear kinds.
    pub rings: Vec<Ring>,
    /// Holes punched out of the outer rings.
    #[cfg_attr(feature = "serde", serde(default))]
    pub holes: Vec<Ring>,
}

impl Feature {
    /// Construct an unnamed feature without holes.
    #[must_use]
    pub const fn new(kind: FeatureKind, rings: Vec<Ring>) -> Self {
        Self {
            name: None,
            kind,
            rings,
            holes: Vec::new(),
        }
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach hole rings.
    #[must_use]
    pub fn with_holes(mut self, holes: Vec<Ring>) -> Self {
        self.holes = holes;
        self
    }

    /// Total number of points over all rings and holes.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.rings
            .iter()
            .chain(&self.holes)
            .map(Ring::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FeatureKind::Country, true)]
    #[case(FeatureKind::Water, true)]
    #[case(FeatureKind::Road, false)]
    #[case(FeatureKind::Waterway, false)]
    fn area_kinds_are_filled(#[case] kind: FeatureKind, #[case] expected: bool) {
        assert_eq!(kind.is_area(), expected);
    }

    #[rstest]
    fn kind_round_trips_through_str() {
        for kind in [
            FeatureKind::Country,
            FeatureKind::State,
            FeatureKind::Park,
            FeatureKind::Forest,
            FeatureKind::Water,
            FeatureKind::Building,
            FeatureKind::Road,
            FeatureKind::Waterway,
        ] {
            assert_eq!(kind.as_str().parse::<FeatureKind>(), Ok(kind));
        }
        assert!("volcano".parse::<FeatureKind>().is_err());
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn feature_serialises_in_wire_layout() {
        use geo::Coord;

        let ring = Ring::from(vec![Coord { x: 1.0, y: 2.0 }]);
        let feature = Feature::new(FeatureKind::Country, vec![ring]);
        let json = serde_json::to_value(&feature).expect("feature should serialise");
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "country",
                "rings": [[[1.0, 2.0]]],
                "holes": []
            })
        );
    }
}
