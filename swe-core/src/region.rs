use std::fmt;

/// Elevation in meters separating `S_Sierras_Low` (at or below) from
/// `S_Sierras_High` (above).
pub const SOUTHERN_ELEVATION_SPLIT_M: f64 = 2500.0;

/// Label of a hindcast region.
///
/// Any label outside the known set is kept verbatim as `Other`, so region
/// mappings carrying extra categories survive a read/write cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    NorthernSierras,
    SouthernSierras,
    SouthernSierrasLow,
    SouthernSierrasHigh,
    /// Sentinel for a site that has not been classified yet.
    Unassigned,
    Other(String),
}

impl Region {
    pub fn as_str(&self) -> &str {
        match self {
            Region::NorthernSierras => "N_Sierras",
            Region::SouthernSierras => "S_Sierras",
            Region::SouthernSierrasLow => "S_Sierras_Low",
            Region::SouthernSierrasHigh => "S_Sierras_High",
            Region::Unassigned => "none",
            Region::Other(label) => label,
        }
    }

    /// Sub-region of `S_Sierras` for a site at the given elevation, or `None`
    /// when the elevation is unknown (NaN).
    pub fn southern_by_elevation(elevation_m: f64) -> Option<Region> {
        if elevation_m > SOUTHERN_ELEVATION_SPLIT_M {
            Some(Region::SouthernSierrasHigh)
        } else if elevation_m <= SOUTHERN_ELEVATION_SPLIT_M {
            Some(Region::SouthernSierrasLow)
        } else {
            None
        }
    }
}

impl From<&str> for Region {
    fn from(label: &str) -> Self {
        match label {
            "N_Sierras" => Region::NorthernSierras,
            "S_Sierras" => Region::SouthernSierras,
            "S_Sierras_Low" => Region::SouthernSierrasLow,
            "S_Sierras_High" => Region::SouthernSierrasHigh,
            "none" => Region::Unassigned,
            other => Region::Other(other.to_string()),
        }
    }
}

impl From<String> for Region {
    fn from(label: String) -> Self {
        Region::from(label.as_str())
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.as_str().to_string()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive longitude/latitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.min_lon..=self.max_lon).contains(&lon) && (self.min_lat..=self.max_lat).contains(&lat)
    }
}

/// Region assignment rules, evaluated in order; the first box containing a
/// site decides its label.
///
/// The two boxes share the `lat = 39` edge. Southern Sierras is listed first
/// so sites on that edge land in `S_Sierras`.
pub const REGION_RULES: [(Region, BoundingBox); 2] = [
    (
        Region::SouthernSierras,
        BoundingBox {
            min_lon: -122.5,
            max_lon: -117.0,
            min_lat: 35.0,
            max_lat: 39.0,
        },
    ),
    (
        Region::NorthernSierras,
        BoundingBox {
            min_lon: -122.5,
            max_lon: -119.0,
            min_lat: 39.0,
            max_lat: 42.0,
        },
    ),
];

/// Region for a coordinate, or `None` when no rule matches.
pub fn classify(lon: f64, lat: f64) -> Option<Region> {
    REGION_RULES
        .iter()
        .find(|(_, bbox)| bbox.contains(lon, lat))
        .map(|(region, _)| region.clone())
}

/// Region for a coordinate, keeping `current` when no rule matches.
pub fn classify_or(current: Region, lon: f64, lat: f64) -> Region {
    classify(lon, lat).unwrap_or(current)
}
