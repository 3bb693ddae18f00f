//! Turn Overpass elements into renderable features.
//!
//! Relations tagged `type=multipolygon` or `type=boundary` have their member
//! ways assembled into outer rings and holes; tagged ways become single-way
//! features. Elements without a recognised classification are skipped and
//! counted.

use geo::{Coord, Rect};
use log::{debug, warn};
use stitchmap_core::{Feature, FeatureKind, Point, Ring, RingAssembler};

mod classify;

pub use classify::{classify, is_area_relation};

use crate::overpass::{Element, OverpassResponse, Relation, Tags, Way};

/// Element counts gathered while extracting features.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractSummary {
    /// Number of nodes seen.
    pub nodes: u64,
    /// Number of ways seen.
    pub ways: u64,
    /// Number of relations seen.
    pub relations: u64,
    /// Number of elements of unknown type.
    pub unknown: u64,
    /// Ways and relations that produced no feature.
    pub skipped: u64,
    /// Bounding box covering every valid coordinate, if any were present.
    /// Coordinates are WGS84 with `x = longitude`, `y = latitude`.
    pub bounds: Option<Rect<f64>>,
}

impl ExtractSummary {
    fn include(&mut self, point: Point) {
        match &mut self.bounds {
            Some(existing) => {
                let min = Coord {
                    x: existing.min().x.min(point.x),
                    y: existing.min().y.min(point.y),
                };
                let max = Coord {
                    x: existing.max().x.max(point.x),
                    y: existing.max().y.max(point.y),
                };
                *existing = Rect::new(min, max);
            }
            None => self.bounds = Some(Rect::new(point, point)),
        }
    }

    fn include_all<'a>(&mut self, points: impl IntoIterator<Item = &'a Point>) {
        for point in points {
            self.include(*point);
        }
    }
}

/// Detailed report of one extraction run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractReport {
    /// Element counts and bounding box information.
    pub summary: ExtractSummary,
    /// Features in element order.
    pub features: Vec<Feature>,
}

/// Extract features using the default [`RingAssembler`].
///
/// # Examples
/// ```
/// use stitchmap_core::FeatureKind;
/// use stitchmap_data::extract_features;
/// use stitchmap_data::overpass::OverpassResponse;
///
/// let mut body = br#"{"elements": [
///     {"type": "way", "id": 1, "tags": {"leisure": "park", "name": "Green"},
///      "geometry": [{"lat": 0, "lon": 0}, {"lat": 0, "lon": 1},
///                   {"lat": 1, "lon": 1}, {"lat": 0, "lon": 0}]}
/// ]}"#.to_vec();
/// let response = OverpassResponse::from_slice(&mut body).expect("valid JSON");
/// let report = extract_features(&response);
/// assert_eq!(report.features.len(), 1);
/// assert_eq!(report.features[0].kind, FeatureKind::Park);
/// assert!(report.features[0].rings[0].is_closed());
/// ```
#[must_use]
pub fn extract_features(response: &OverpassResponse) -> ExtractReport {
    extract_features_with(&RingAssembler::new(), response)
}

/// Extract features, stitching relations with `assembler`.
#[must_use]
pub fn extract_features_with(
    assembler: &RingAssembler,
    response: &OverpassResponse,
) -> ExtractReport {
    let mut report = ExtractReport::default();
    for element in &response.elements {
        let feature = match element {
            Element::Node(node) => {
                report.summary.nodes += 1;
                if let Some(point) = node.point() {
                    report.summary.include(point);
                }
                continue;
            }
            Element::Way(way) => {
                report.summary.ways += 1;
                way_feature(way, &mut report.summary)
            }
            Element::Relation(relation) => {
                report.summary.relations += 1;
                relation_feature(assembler, relation, &mut report.summary)
            }
            Element::Unknown => {
                report.summary.unknown += 1;
                continue;
            }
        };
        match feature {
            Some(feature) => report.features.push(feature),
            None => report.summary.skipped += 1,
        }
    }

    if report.summary.skipped > 0 {
        warn!(
            "Skipped {} of {} ways and relations without a usable classification or geometry",
            report.summary.skipped,
            report.summary.ways + report.summary.relations
        );
    }
    debug!(
        "extracted {} features from {} elements",
        report.features.len(),
        response.elements.len()
    );
    report
}

fn way_feature(way: &Way, summary: &mut ExtractSummary) -> Option<Feature> {
    let points = way.points();
    summary.include_all(&points);
    let Some(kind) = classify(&way.tags) else {
        debug!("way {} has no renderable tags", way.id);
        return None;
    };
    if points.is_empty() {
        debug!("way {} has no valid geometry", way.id);
        return None;
    }
    Some(named(Feature::new(kind, vec![Ring::from(points)]), &way.tags))
}

fn relation_feature(
    assembler: &RingAssembler,
    relation: &Relation,
    summary: &mut ExtractSummary,
) -> Option<Feature> {
    let segments = relation.segments();
    summary.include_all(segments.iter().flat_map(|segment| &segment.points));

    if !is_area_relation(&relation.tags) {
        debug!("relation {} is not an area relation", relation.id);
        return None;
    }
    let kind = classify(&relation.tags).filter(|kind| kind.is_area());
    let Some(kind) = kind else {
        debug!("relation {} has no renderable area tags", relation.id);
        return None;
    };

    let polygon = assembler.assemble_polygon(&segments);
    if polygon.outer.is_empty() {
        warn!("relation {} has no outer member geometry", relation.id);
        return None;
    }
    let feature = Feature::new(kind, polygon.outer).with_holes(polygon.holes);
    Some(named(feature, &relation.tags))
}

fn named(feature: Feature, tags: &Tags) -> Feature {
    match tags.get("name") {
        Some(name) => feature.with_name(name.as_str()),
        None => feature,
    }
}

/// Keep only features of `kind`.
#[must_use]
pub fn features_of_kind(features: Vec<Feature>, kind: FeatureKind) -> Vec<Feature> {
    features
        .into_iter()
        .filter(|feature| feature.kind == kind)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn decode(json: &str) -> OverpassResponse {
        let mut bytes = json.as_bytes().to_vec();
        OverpassResponse::from_slice(&mut bytes).expect("should deserialise")
    }

    #[rstest]
    fn empty_response_gives_empty_report() {
        let report = extract_features(&OverpassResponse::default());
        assert_eq!(report, ExtractReport::default());
    }

    #[rstest]
    fn country_relation_is_assembled_from_scattered_members() {
        let response = decode(
            r#"{"elements": [{
                "type": "relation", "id": 51477,
                "tags": {"type": "boundary", "boundary": "administrative",
                         "admin_level": "2", "name": "Squareland"},
                "members": [
                    {"type": "way", "ref": 1, "role": "outer",
                     "geometry": [{"lat": 0, "lon": 0}, {"lat": 0, "lon": 1}]},
                    {"type": "way", "ref": 2, "role": "outer",
                     "geometry": [{"lat": 1, "lon": 0}, {"lat": 0, "lon": 0}]},
                    {"type": "way", "ref": 3, "role": "outer",
                     "geometry": [{"lat": 0, "lon": 1}, {"lat": 1, "lon": 1}]},
                    {"type": "way", "ref": 4, "role": "",
                     "geometry": [{"lat": 1, "lon": 0}, {"lat": 1, "lon": 1}]},
                    {"type": "node", "ref": 5, "role": "admin_centre", "lat": 0.5, "lon": 0.5}
                ]
            }]}"#,
        );

        let report = extract_features(&response);
        assert_eq!(report.features.len(), 1);
        let feature = &report.features[0];
        assert_eq!(feature.kind, FeatureKind::Country);
        assert_eq!(feature.name.as_deref(), Some("Squareland"));
        assert_eq!(feature.rings.len(), 1);
        assert!(feature.rings[0].is_closed());
        assert_eq!(feature.rings[0].len(), 5);
        assert_eq!(report.summary.relations, 1);

        let bounds = report.summary.bounds.expect("bounds recorded");
        assert_eq!(bounds.min(), Coord { x: 0.0, y: 0.0 });
        assert_eq!(bounds.max(), Coord { x: 1.0, y: 1.0 });
    }

    #[rstest]
    fn multipolygon_holes_are_kept() {
        let response = decode(
            r#"{"elements": [{
                "type": "relation", "id": 7,
                "tags": {"type": "multipolygon", "natural": "water"},
                "members": [
                    {"type": "way", "ref": 1, "role": "outer",
                     "geometry": [{"lat": 0, "lon": 0}, {"lat": 0, "lon": 4},
                                  {"lat": 4, "lon": 4}, {"lat": 4, "lon": 0},
                                  {"lat": 0, "lon": 0}]},
                    {"type": "way", "ref": 2, "role": "inner",
                     "geometry": [{"lat": 1, "lon": 1}, {"lat": 1, "lon": 2}, {"lat": 2, "lon": 2}]},
                    {"type": "way", "ref": 3, "role": "inner",
                     "geometry": [{"lat": 2, "lon": 2}, null, {"lat": 1, "lon": 1}]}
                ]
            }]}"#,
        );

        let report = extract_features(&response);
        let feature = &report.features[0];
        assert_eq!(feature.kind, FeatureKind::Water);
        assert_eq!(feature.holes.len(), 1);
        assert!(feature.holes[0].is_closed());
        assert!(feature.name.is_none());
    }

    #[rstest]
    fn untagged_and_unclassified_elements_are_skipped() {
        let response = decode(
            r#"{"elements": [
                {"type": "node", "id": 1, "lat": 5, "lon": 6},
                {"type": "way", "id": 2, "geometry": [{"lat": 0, "lon": 0}]},
                {"type": "way", "id": 3, "tags": {"highway": "path"}, "geometry": [null]},
                {"type": "relation", "id": 4, "tags": {"type": "route", "highway": "bus"}},
                {"type": "relation", "id": 5, "tags": {"type": "multipolygon", "leisure": "park"},
                 "members": [{"type": "way", "ref": 9, "role": "inner",
                              "geometry": [{"lat": 0, "lon": 0}, {"lat": 1, "lon": 1}]}]},
                {"type": "area", "id": 6}
            ]}"#,
        );

        let report = extract_features(&response);
        assert!(report.features.is_empty());
        assert_eq!(report.summary.nodes, 1);
        assert_eq!(report.summary.ways, 2);
        assert_eq!(report.summary.relations, 2);
        assert_eq!(report.summary.unknown, 1);
        assert_eq!(report.summary.skipped, 4);
    }

    #[rstest]
    fn linear_ways_keep_their_polyline() {
        let response = decode(
            r#"{"elements": [
                {"type": "way", "id": 2, "tags": {"highway": "primary", "name": "Main Street"},
                 "geometry": [{"lat": 0, "lon": 0}, {"lat": 0, "lon": 1}, {"lat": 0.5, "lon": 2}]}
            ]}"#,
        );

        let report = extract_features(&response);
        let feature = &report.features[0];
        assert_eq!(feature.kind, FeatureKind::Road);
        assert_eq!(feature.rings[0].len(), 3);
        assert!(!feature.rings[0].is_closed());
    }

    #[rstest]
    fn open_area_ways_are_kept_as_open_rings() {
        let response = decode(
            r#"{"elements": [
                {"type": "way", "id": 8, "tags": {"leisure": "park"},
                 "geometry": [{"lat": 0, "lon": 0}, {"lat": 0, "lon": 1}, {"lat": 1, "lon": 1}]}
            ]}"#,
        );

        let report = extract_features(&response);
        assert_eq!(report.summary.skipped, 0);
        let ring = &report.features[0].rings[0];
        assert!(!ring.is_closed());
        assert!(ring.is_fillable());
    }

    #[rstest]
    fn malformed_points_do_not_cost_other_features() {
        let response = decode(
            r#"{"elements": [
                {"type": "way", "id": 1, "tags": {"highway": "primary"},
                 "geometry": [{"lat": 0, "lon": 0}, {"lat": null, "lon": 1}, {"lon": 2},
                              {"lat": 0, "lon": 3}]},
                {"type": "relation", "id": 2, "tags": {"type": "multipolygon", "natural": "water"},
                 "members": [
                    {"type": "way", "ref": 3, "role": "outer", "geometry": null},
                    {"type": "way", "ref": 4, "role": "outer",
                     "geometry": [{"lat": 0, "lon": 0}, {"lat": 0, "lon": 1},
                                  {"lat": 1, "lon": 1}, {"lat": 0, "lon": 0}]}
                 ]}
            ]}"#,
        );

        let report = extract_features(&response);
        assert_eq!(report.features.len(), 2);
        assert_eq!(report.features[0].rings[0].len(), 2);
        assert!(report.features[1].rings[0].is_closed());
    }

    #[rstest]
    fn filters_by_kind() {
        let ring = Ring::from(vec![Coord { x: 0.0, y: 0.0 }]);
        let features = vec![
            Feature::new(FeatureKind::Country, vec![ring.clone()]),
            Feature::new(FeatureKind::State, vec![ring]),
        ];
        let countries = features_of_kind(features, FeatureKind::Country);
        assert_eq!(countries.len(), 1);
    }
}
