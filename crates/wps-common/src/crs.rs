//! Coordinate Reference System codes accepted on bounding-box inputs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known CRS codes accepted by the WPS bounding-box inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsCode {
    /// WGS84 Geographic (lat/lon in degrees)
    #[serde(rename = "EPSG:4326")]
    Epsg4326,
}

impl CrsCode {
    /// Parse a CRS string as it appears in a WPS bounding-box value.
    ///
    /// Accepts formats like:
    /// - "EPSG:4326"
    /// - "epsg:4326"
    /// - "urn:ogc:def:crs:EPSG::4326"
    pub fn from_wps_string(s: &str) -> Result<Self, CrsParseError> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "EPSG:4326" | "URN:OGC:DEF:CRS:EPSG::4326" => Ok(CrsCode::Epsg4326),
            _ => Err(CrsParseError::UnsupportedCrs(s.to_string())),
        }
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            CrsCode::Epsg4326 => "EPSG:4326",
        };
        write!(f, "{}", code)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}
