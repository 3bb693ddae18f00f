use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Thematic slice of map data requested from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Layer {
    /// Country and state boundaries.
    Boundaries,
    /// Parks, gardens and woodland.
    Parks,
    /// Lakes, reservoirs, riverbanks and waterways.
    Water,
    /// The highway network.
    Roads,
    /// Building footprints.
    Buildings,
}

impl Layer {
    /// Every layer, in drawing order from bottom to top.
    pub const ALL: [Self; 5] = [
        Self::Boundaries,
        Self::Water,
        Self::Parks,
        Self::Roads,
        Self::Buildings,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boundaries => "boundaries",
            Self::Parks => "parks",
            Self::Water => "water",
            Self::Roads => "roads",
            Self::Buildings => "buildings",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`Layer`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown layer {0:?} (expected one of boundaries, parks, water, roads, buildings)")]
pub struct ParseLayerError(pub String);

impl FromStr for Layer {
    type Err = ParseLayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "boundaries" => Ok(Self::Boundaries),
            "parks" => Ok(Self::Parks),
            "water" => Ok(Self::Water),
            "roads" => Ok(Self::Roads),
            "buildings" => Ok(Self::Buildings),
            _ => Err(ParseLayerError(s.to_owned())),
        }
    }
}
