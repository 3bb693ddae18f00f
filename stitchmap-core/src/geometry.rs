//! Points, role-tagged segments and assembled rings.
//!
//! Coordinates are WGS84 with `x = longitude` and `y = latitude`, matching
//! the layout used throughout the `geo` ecosystem.

use std::str::FromStr;

use geo::Coord;

/// A single WGS84 position in degrees.
pub type Point = Coord<f64>;

/// Maximum per-axis distance, in degrees, at which two points coincide.
///
/// Roughly eleven metres at the equator; wide enough to absorb export noise
/// between adjacent OSM ways.
pub const COINCIDENCE_EPSILON: f64 = 1.0e-4;

/// Returns `true` when both coordinate deltas are within `epsilon`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stitchmap_core::geometry::{COINCIDENCE_EPSILON, coincident};
///
/// let a = Coord { x: 10.0, y: 20.0 };
/// let b = Coord { x: 10.00005, y: 19.99995 };
/// assert!(coincident(a, b, COINCIDENCE_EPSILON));
/// assert!(!coincident(a, Coord { x: 10.001, y: 20.0 }, COINCIDENCE_EPSILON));
/// ```
#[must_use]
pub fn coincident(a: Point, b: Point, epsilon: f64) -> bool {
    (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon
}

/// Role a member way plays inside a multipolygon or boundary relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Role {
    /// Part of an outer boundary.
    Outer,
    /// Part of a hole.
    Inner,
    /// Anything else (labels, admin centres, subareas). Never assembled.
    Other,
}

impl Role {
    /// Map an OSM member role string onto a [`Role`].
    ///
    /// Untagged members are treated as outer ways, which is how legacy
    /// multipolygons encode their shells.
    #[must_use]
    pub fn from_member_role(role: &str) -> Self {
        match role {
            "outer" | "" => Self::Outer,
            "inner" => Self::Inner,
            _ => Self::Other,
        }
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_member_role(s))
    }
}

/// One member way: an ordered run of points plus its role.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Role inherited from the relation membership.
    pub role: Role,
    /// Ordered points along the way.
    pub points: Vec<Point>,
}

impl Segment {
    /// Construct a segment from a role and points.
    #[must_use]
    pub const fn new(role: Role, points: Vec<Point>) -> Self {
        Self { role, points }
    }

    /// Construct an outer segment.
    #[must_use]
    pub const fn outer(points: Vec<Point>) -> Self {
        Self::new(Role::Outer, points)
    }

    /// Construct an inner segment.
    #[must_use]
    pub const fn inner(points: Vec<Point>) -> Self {
        Self::new(Role::Inner, points)
    }

    /// Returns `true` when the segment carries no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// An assembled loop of points.
///
/// A ring is usually closed, but open rings are legitimate output when the
/// source data does not connect. Serialises as a flat list of
/// `[longitude, latitude]` pairs.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stitchmap_core::Ring;
///
/// let ring = Ring::from(vec![
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 1.0, y: 0.0 },
///     Coord { x: 1.0, y: 1.0 },
///     Coord { x: 0.0, y: 0.0 },
/// ]);
/// assert!(ring.is_closed());
/// assert_eq!(ring.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ring(Vec<Point>);

impl Ring {
    /// Ordered points of the ring.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Number of points, including a repeated closing point.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for a ring with no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when the ring has enough points to enclose an area.
    ///
    /// Renderers skip rings failing this check when filling.
    #[must_use]
    pub fn is_fillable(&self) -> bool {
        self.0.len() >= 3
    }

    /// Returns `true` when the first and last points coincide.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        is_closed_run(&self.0, COINCIDENCE_EPSILON)
    }

    /// Consume the ring, returning its points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

impl From<Vec<Point>> for Ring {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

impl AsRef<[Point]> for Ring {
    fn as_ref(&self) -> &[Point] {
        &self.0
    }
}

pub(crate) fn is_closed_run(points: &[Point], epsilon: f64) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() >= 3 => coincident(*first, *last, epsilon),
        _ => false,
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::de::{Deserialize, Deserializer};
    use serde::ser::{Serialize, SerializeSeq, Serializer};

    use super::{Point, Ring};

    impl Serialize for Ring {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
            for point in &self.0 {
                seq.serialize_element(&[point.x, point.y])?;
            }
            seq.end()
        }
    }

    impl<'de> Deserialize<'de> for Ring {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let pairs = Vec::<[f64; 2]>::deserialize(deserializer)?;
            Ok(Self(
                pairs
                    .into_iter()
                    .map(|[x, y]| Point { x, y })
                    .collect(),
            ))
        }
    }
}
