//! Bounding box values as submitted on WPS bounding-box inputs.

use serde::{Deserialize, Serialize};

use crate::crs::CrsCode;

/// A bounding box exactly as the transport delivered it.
///
/// The four corners are kept in submission order. For the KVP encoding
/// `lower_y,lower_x,upper_y,upper_x` of a geographic CRS that order is
/// minY, minX, maxY, maxX; nothing here reinterprets the axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBoxValue {
    pub coords: [f64; 4],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crs: Option<CrsCode>,
}

impl BoundingBoxValue {
    /// Create a new bounding box from four corner values in submission order.
    pub fn new(coords: [f64; 4], crs: Option<CrsCode>) -> Self {
        Self { coords, crs }
    }

    /// Parse a WPS KVP bounding box string: "c0,c1,c2,c3[,crs]"
    pub fn from_wps_string(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 && parts.len() != 5 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let mut coords = [0.0; 4];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))?;
        }

        let crs = match parts.get(4) {
            Some(code) => Some(
                CrsCode::from_wps_string(code)
                    .map_err(|_| BboxParseError::UnsupportedCrs(code.to_string()))?,
            ),
            None => None,
        };

        Ok(Self { coords, crs })
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BboxParseError {
    #[error("Invalid bounding box format: {0}. Expected 'c0,c1,c2,c3[,crs]'")]
    InvalidFormat(String),

    #[error("Invalid number in bounding box: {0}")]
    InvalidNumber(String),

    #[error("Unsupported CRS in bounding box: {0}")]
    UnsupportedCrs(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wps_bbox() {
        let bbox = BoundingBoxValue::from_wps_string("-30.0,-120.0,90.0,80.0").unwrap();
        assert_eq!(bbox.coords, [-30.0, -120.0, 90.0, 80.0]);
        assert_eq!(bbox.crs, None);
    }

    #[test]
    fn test_parse_wps_bbox_with_crs() {
        let bbox = BoundingBoxValue::from_wps_string("-30,-120,90,80,epsg:4326").unwrap();
        assert_eq!(bbox.coords, [-30.0, -120.0, 90.0, 80.0]);
        assert_eq!(bbox.crs, Some(CrsCode::Epsg4326));
    }
}
