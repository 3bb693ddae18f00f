//! Overpass API JSON response types.
//!
//! Only the subset produced by `out geom;` is modelled: nodes with inline
//! coordinates, ways with inline `geometry` and relations whose members carry
//! their own geometry. Unknown element types are kept as
//! [`Element::Unknown`] so a newer server cannot break decoding.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Output_Formats>

use std::collections::BTreeMap;

use geo::Coord;
use serde::{Deserialize, Deserializer};
use stitchmap_core::{Point, Role, Segment};

/// Key/value tags attached to an OSM element.
pub type Tags = BTreeMap<String, String>;

/// Top-level Overpass response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OverpassResponse {
    /// Elements in server order.
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Server remark; present when a query was cut short (timeouts, memory
    /// limits) even though the HTTP status was 200.
    #[serde(default)]
    pub remark: Option<String>,
}

impl OverpassResponse {
    /// Decode a response body in place.
    ///
    /// # Errors
    ///
    /// Returns the decoder error when the body is not a valid response.
    pub fn from_slice(bytes: &mut [u8]) -> Result<Self, simd_json::Error> {
        simd_json::serde::from_slice(bytes)
    }
}

/// One OSM element, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    /// A tagged or untagged point.
    Node(Node),
    /// A polyline with inline geometry.
    Way(Way),
    /// A grouping of member ways.
    Relation(Relation),
    /// Any element type this crate does not understand.
    #[serde(other)]
    Unknown,
}

/// An OSM node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Node {
    /// OSM identifier.
    pub id: i64,
    /// Latitude, absent on some derived outputs.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude, absent on some derived outputs.
    #[serde(default)]
    pub lon: Option<f64>,
    /// Element tags.
    #[serde(default)]
    pub tags: Tags,
}

impl Node {
    /// Validated position of the node.
    #[must_use]
    pub fn point(&self) -> Option<Point> {
        LatLon {
            lat: self.lat,
            lon: self.lon,
        }
        .to_point()
    }
}

/// An OSM way.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Way {
    /// OSM identifier.
    pub id: i64,
    /// Element tags.
    #[serde(default)]
    pub tags: Tags,
    /// Ordered geometry; unresolved nodes appear as `null`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub geometry: Vec<Option<LatLon>>,
}

impl Way {
    /// Valid points of the way, with null and out-of-range entries dropped.
    #[must_use]
    pub fn points(&self) -> Vec<Point> {
        valid_points(&self.geometry)
    }
}

/// An OSM relation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Relation {
    /// OSM identifier.
    pub id: i64,
    /// Element tags.
    #[serde(default)]
    pub tags: Tags,
    /// Members in relation order.
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Relation {
    /// Role-tagged segments of the member ways.
    ///
    /// Non-way members and members left without valid points are skipped.
    #[must_use]
    pub fn segments(&self) -> Vec<Segment> {
        self.members
            .iter()
            .filter(|member| member.kind == "way")
            .filter_map(Member::segment)
            .collect()
    }
}

/// A relation member.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Member {
    /// Member element type (`node`, `way`, `relation`).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Referenced element identifier.
    #[serde(rename = "ref", default)]
    pub id: i64,
    /// Role string as found in OSM.
    #[serde(default)]
    pub role: String,
    /// Inline geometry of a way member.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub geometry: Vec<Option<LatLon>>,
}

impl Member {
    /// Segment built from this member, or `None` when no valid point remains.
    #[must_use]
    pub fn segment(&self) -> Option<Segment> {
        let points = valid_points(&self.geometry);
        (!points.is_empty()).then(|| Segment::new(Role::from_member_role(&self.role), points))
    }
}

/// A raw `{lat, lon}` pair. Either half may be `null` or missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude in degrees.
    #[serde(default)]
    pub lon: Option<f64>,
}

impl LatLon {
    /// Pair with both halves present.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    /// Convert to a [`Point`], rejecting missing, non-finite or out-of-range
    /// values.
    #[must_use]
    pub fn to_point(self) -> Option<Point> {
        let (lat, lon) = (self.lat?, self.lon?);
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then_some(Coord { x: lon, y: lat })
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Option<LatLon>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Option<LatLon>>>::deserialize(deserializer)?.unwrap_or_default())
}

fn valid_points(geometry: &[Option<LatLon>]) -> Vec<Point> {
    geometry
        .iter()
        .flatten()
        .filter_map(|latlon| latlon.to_point())
        .collect()
}
