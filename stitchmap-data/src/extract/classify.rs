//! Tag-based classification of OSM elements into feature kinds.

use stitchmap_core::FeatureKind;

use crate::overpass::Tags;

/// Relation `type` values whose members describe areas.
const AREA_RELATION_TYPES: [&str; 2] = ["multipolygon", "boundary"];

/// Pick the feature kind an element's tags describe, if any.
///
/// Administrative boundaries are recognised at `admin_level` 2 (countries)
/// and 4 (states) only. When several families match, boundaries win, then
/// buildings, water, parks, forests, highways and waterways.
#[must_use]
pub fn classify(tags: &Tags) -> Option<FeatureKind> {
    let tag = |key: &str| tags.get(key).map(String::as_str);

    if tag("boundary") == Some("administrative") {
        return match tag("admin_level") {
            Some("2") => Some(FeatureKind::Country),
            Some("4") => Some(FeatureKind::State),
            _ => None,
        };
    }
    if tag("building").is_some_and(|value| value != "no") {
        return Some(FeatureKind::Building);
    }
    if tag("natural") == Some("water")
        || tag("landuse") == Some("reservoir")
        || tag("waterway") == Some("riverbank")
    {
        return Some(FeatureKind::Water);
    }
    if matches!(
        tag("leisure"),
        Some("park" | "garden" | "recreation_ground")
    ) {
        return Some(FeatureKind::Park);
    }
    if tag("landuse") == Some("forest") || tag("natural") == Some("wood") {
        return Some(FeatureKind::Forest);
    }
    if tag("highway").is_some() {
        return Some(FeatureKind::Road);
    }
    if matches!(tag("waterway"), Some("river" | "stream" | "canal")) {
        return Some(FeatureKind::Waterway);
    }
    None
}

/// Returns `true` when a relation's members should be assembled into rings.
#[must_use]
pub fn is_area_relation(tags: &Tags) -> bool {
    tags.get("type")
        .is_some_and(|kind| AREA_RELATION_TYPES.contains(&kind.as_str()))
}
