//! Overpass QL query construction.

use std::fmt::Write as _;

use stitchmap_core::{BoundingBox, Layer};

/// Server-side evaluation limit requested by default, in seconds.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u32 = 25;

/// Server-side memory limit requested by default, in bytes.
pub const DEFAULT_MAXSIZE_BYTES: u64 = 512 * 1024 * 1024;

/// Builder for an `out geom` Overpass query over one bounding box.
///
/// # Examples
/// ```
/// use stitchmap_core::{BoundingBox, Layer};
/// use stitchmap_data::overpass::OverpassQuery;
///
/// let bbox = BoundingBox::new(52.5, 13.3, 52.6, 13.4).expect("valid bbox");
/// let ql = OverpassQuery::new(bbox, &[Layer::Roads]).with_timeout_secs(10).to_ql();
/// assert!(ql.starts_with("[out:json][timeout:10]"));
/// assert!(ql.contains(r#"way["highway"](52.5,13.3,52.6,13.4);"#));
/// assert!(ql.ends_with("out geom;"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OverpassQuery {
    bbox: BoundingBox,
    layers: Vec<Layer>,
    timeout_secs: u32,
    maxsize_bytes: u64,
}

impl OverpassQuery {
    /// Query `layers` inside `bbox`. Duplicate layers are collapsed.
    #[must_use]
    pub fn new(bbox: BoundingBox, layers: &[Layer]) -> Self {
        let mut unique = layers.to_vec();
        unique.sort_unstable();
        unique.dedup();
        Self {
            bbox,
            layers: unique,
            timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            maxsize_bytes: DEFAULT_MAXSIZE_BYTES,
        }
    }

    /// Set the `[timeout:..]` setting.
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u32) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the `[maxsize:..]` setting.
    #[must_use]
    pub fn with_maxsize_bytes(mut self, maxsize_bytes: u64) -> Self {
        self.maxsize_bytes = maxsize_bytes;
        self
    }

    /// Queried window.
    #[must_use]
    pub const fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Queried layers, deduplicated and sorted.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Render the query as Overpass QL.
    #[must_use]
    pub fn to_ql(&self) -> String {
        let bbox = format!(
            "({},{},{},{})",
            self.bbox.south(),
            self.bbox.west(),
            self.bbox.north(),
            self.bbox.east()
        );
        let mut ql = format!(
            "[out:json][timeout:{}][maxsize:{}];\n(\n",
            self.timeout_secs, self.maxsize_bytes
        );
        for layer in &self.layers {
            for selector in selectors(*layer) {
                // Writing into a String cannot fail.
                let _ = writeln!(ql, "  {selector}{bbox};");
            }
        }
        ql.push_str(");\nout geom;");
        ql
    }
}

fn selectors(layer: Layer) -> &'static [&'static str] {
    match layer {
        Layer::Boundaries => &[
            r#"relation["boundary"="administrative"]["admin_level"~"^(2|4)$"]"#,
        ],
        Layer::Parks => &[
            r#"way["leisure"~"^(park|garden|recreation_ground)$"]"#,
            r#"relation["leisure"~"^(park|garden|recreation_ground)$"]"#,
            r#"way["landuse"="forest"]"#,
            r#"way["natural"="wood"]"#,
            r#"relation["landuse"="forest"]"#,
            r#"relation["natural"="wood"]"#,
        ],
        Layer::Water => &[
            r#"way["natural"="water"]"#,
            r#"relation["natural"="water"]"#,
            r#"way["waterway"~"^(river|stream|canal)$"]"#,
        ],
        Layer::Roads => &[r#"way["highway"]"#],
        Layer::Buildings => &[r#"way["building"]"#],
    }
}
