//! Validated viewport windows and their normalised cache keys.

use std::fmt;
use std::str::FromStr;

use geo::{Coord, Rect};
use thiserror::Error;

/// Grid step, in degrees, used when normalising cache keys.
pub const BBOX_KEY_RESOLUTION: f64 = 1.0e-4;

/// Errors returned by [`BoundingBox::new`] and its parser.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundingBoxError {
    /// A coordinate was NaN or infinite.
    #[error("bounding box coordinates must be finite")]
    NonFinite,
    /// A latitude fell outside `[-90, 90]`.
    #[error("latitude {value} is outside [-90, 90]")]
    LatitudeOutOfRange {
        /// Offending latitude.
        value: f64,
    },
    /// A longitude fell outside `[-180, 180]`.
    #[error("longitude {value} is outside [-180, 180]")]
    LongitudeOutOfRange {
        /// Offending longitude.
        value: f64,
    },
    /// South exceeded north, or west exceeded east.
    #[error("bounding box edges are inverted (south={south}, west={west}, north={north}, east={east})")]
    Inverted {
        /// Southern edge.
        south: f64,
        /// Western edge.
        west: f64,
        /// Northern edge.
        north: f64,
        /// Eastern edge.
        east: f64,
    },
    /// The textual form did not hold four comma-separated numbers.
    #[error("expected `south,west,north,east`, got {input:?}")]
    Malformed {
        /// Raw input.
        input: String,
    },
}

/// A WGS84 query window in `(south, west, north, east)` order.
///
/// Boxes crossing the antimeridian are not representable; callers split them.
///
/// # Examples
/// ```
/// use stitchmap_core::BoundingBox;
///
/// # fn main() -> Result<(), stitchmap_core::BoundingBoxError> {
/// let bbox: BoundingBox = "52.50,13.35,52.55,13.45".parse()?;
/// assert_eq!(bbox.south(), 52.50);
/// assert_eq!(bbox.east(), 13.45);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    rect: Rect<f64>,
}

impl BoundingBox {
    /// Validate and construct a bounding box.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, BoundingBoxError> {
        if ![south, west, north, east].iter().all(|v| v.is_finite()) {
            return Err(BoundingBoxError::NonFinite);
        }
        for value in [south, north] {
            if !(-90.0..=90.0).contains(&value) {
                return Err(BoundingBoxError::LatitudeOutOfRange { value });
            }
        }
        for value in [west, east] {
            if !(-180.0..=180.0).contains(&value) {
                return Err(BoundingBoxError::LongitudeOutOfRange { value });
            }
        }
        if south > north || west > east {
            return Err(BoundingBoxError::Inverted {
                south,
                west,
                north,
                east,
            });
        }
        Ok(Self {
            rect: Rect::new(Coord { x: west, y: south }, Coord { x: east, y: north }),
        })
    }

    /// Southern latitude.
    #[must_use]
    pub fn south(&self) -> f64 {
        self.rect.min().y
    }

    /// Western longitude.
    #[must_use]
    pub fn west(&self) -> f64 {
        self.rect.min().x
    }

    /// Northern latitude.
    #[must_use]
    pub fn north(&self) -> f64 {
        self.rect.max().y
    }

    /// Eastern longitude.
    #[must_use]
    pub fn east(&self) -> f64 {
        self.rect.max().x
    }

    /// Area in square degrees; a cheap proxy for query cost.
    #[must_use]
    pub fn area_deg2(&self) -> f64 {
        self.rect.width() * self.rect.height()
    }

    /// Underlying rectangle (`x = longitude`, `y = latitude`).
    #[must_use]
    pub const fn as_rect(&self) -> &Rect<f64> {
        &self.rect
    }

    /// Normalised cache key snapping every edge to [`BBOX_KEY_RESOLUTION`].
    ///
    /// # Examples
    /// ```
    /// use stitchmap_core::BoundingBox;
    ///
    /// # fn main() -> Result<(), stitchmap_core::BoundingBoxError> {
    /// let a = BoundingBox::new(52.500001, 13.35, 52.55, 13.45)?;
    /// let b = BoundingBox::new(52.499999, 13.35, 52.55, 13.45)?;
    /// assert_eq!(a.key(), b.key());
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn key(&self) -> BboxKey {
        BboxKey {
            south: snap(self.south()),
            west: snap(self.west()),
            north: snap(self.north()),
            east: snap(self.east()),
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.south(),
            self.west(),
            self.north(),
            self.east()
        )
    }
}

impl FromStr for BoundingBox {
    type Err = BoundingBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || BoundingBoxError::Malformed {
            input: s.to_owned(),
        };
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<f64>().map_err(|_| malformed()))
            .collect::<Result<Vec<_>, _>>()?;
        match values.as_slice() {
            &[south, west, north, east] => Self::new(south, west, north, east),
            _ => Err(malformed()),
        }
    }
}

/// Hashable identity of a normalised [`BoundingBox`].
///
/// Edges are stored as integer multiples of [`BBOX_KEY_RESOLUTION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BboxKey {
    south: i32,
    west: i32,
    north: i32,
    east: i32,
}

impl fmt::Display for BboxKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.4},{:.4},{:.4},{:.4}",
            unsnap(self.south),
            unsnap(self.west),
            unsnap(self.north),
            unsnap(self.east)
        )
    }
}

// Valid coordinates stay within ±1.8e6 grid steps, far inside i32.
fn snap(value: f64) -> i32 {
    (value / BBOX_KEY_RESOLUTION).round() as i32
}

fn unsnap(value: i32) -> f64 {
    f64::from(value) * BBOX_KEY_RESOLUTION
}
