//! Coordinate Reference System identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SdmError;

/// An EPSG coordinate reference system code.
///
/// Layers produced and consumed by this engine are tagged with a Crs so
/// that elementwise combinations of grids from different sources can be
/// sanity-checked by callers. The engine itself performs no reprojection;
/// that is delegated to the warping collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crs(pub u32);

impl Crs {
    /// WGS84 geographic coordinates (degrees), the default for global layers.
    pub const WGS84: Crs = Crs(4326);

    /// Parse a string like "EPSG:4326" or "epsg:4326".
    pub fn parse(s: &str) -> Result<Self, SdmError> {
        let normalized = s.trim().to_uppercase();
        let code = normalized
            .strip_prefix("EPSG:")
            .ok_or_else(|| SdmError::configuration(format!("unsupported CRS: {}", s)))?;
        code.parse::<u32>()
            .map(Crs)
            .map_err(|_| SdmError::configuration(format!("invalid EPSG code: {}", s)))
    }

    /// Check if this is a geographic (lat/lon degree) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self.0, 4326 | 4269)
    }
}

impl Default for Crs {
    fn default() -> Self {
        Crs::WGS84
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}
