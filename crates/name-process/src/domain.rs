//! Domain (search area) parsing.
//!
//! Two submission shapes exist: a delimited "minX,maxX,minY,maxY" string,
//! and a bounding box whose four corners the transport has already split.
//! Bounding box corners are passed through in the order received.

use serde::{Deserialize, Serialize};
use wps_common::{BoundingBoxValue, CrsCode, WpsError};

const DELIMITER: char = ',';

/// Which submission shape the domain parameter uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainShape {
    /// "minX,maxX,minY,maxY" literal string.
    Delimited,
    /// WPS bounding-box input.
    BoundingBox,
}

/// Four domain bounds.
///
/// From the delimited form the order is minX, maxX, minY, maxY. From a
/// bounding box it is whatever the transport supplied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainBounds {
    pub bounds: [f64; 4],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crs: Option<CrsCode>,
}

impl DomainBounds {
    pub fn new(bounds: [f64; 4]) -> Self {
        Self { bounds, crs: None }
    }

    pub fn with_crs(mut self, crs: CrsCode) -> Self {
        self.crs = Some(crs);
        self
    }
}

/// Parse the delimited form.
pub fn parse_delimited_domain(raw: &str) -> Result<DomainBounds, WpsError> {
    if !raw.contains(DELIMITER) {
        return Err(WpsError::invalid_input(
            raw,
            "The domain coordinates must be split using a ','",
        ));
    }

    let mut values = Vec::with_capacity(4);
    for segment in raw.split(DELIMITER) {
        let segment = segment.trim();
        let value = segment.parse::<f64>().map_err(|_| {
            WpsError::invalid_input(
                raw,
                format!("The domain coordinate \"{}\" is not a number", segment),
            )
        })?;
        values.push(value);
    }

    if values.len() != 4 {
        return Err(WpsError::invalid_input(
            raw,
            "There must be four coordinates entered, minX,maxX,minY,maxY",
        ));
    }

    Ok(DomainBounds::new([values[0], values[1], values[2], values[3]]))
}

/// Build bounds from a bounding box, keeping its order and CRS.
pub fn domain_from_bounding_box(bbox: &BoundingBoxValue) -> DomainBounds {
    DomainBounds {
        bounds: bbox.coords,
        crs: bbox.crs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_domain() {
        let domain = parse_delimited_domain("-120.0,80.0,-30.0,90.0").unwrap();
        assert_eq!(domain.bounds, [-120.0, 80.0, -30.0, 90.0]);
        assert_eq!(domain.crs, None);
    }

    #[test]
    fn test_no_comma() {
        let err = parse_delimited_domain("-120.0 80.0 -30.0 90.0").unwrap_err();
        assert!(err.to_string().contains("must be split using a ','"));
    }

    #[test]
    fn test_wrong_count() {
        for raw in ["1,2,3", "1,2,3,4,5"] {
            let err = parse_delimited_domain(raw).unwrap_err();
            assert_eq!(
                err.to_string(),
                "There must be four coordinates entered, minX,maxX,minY,maxY"
            );
        }
    }

    #[test]
    fn test_non_numeric_segment() {
        let err = parse_delimited_domain("1,2,x,4").unwrap_err();
        assert!(matches!(err, WpsError::InvalidInput { ref value, .. } if value == "1,2,x,4"));
    }

    #[test]
    fn test_bbox_passthrough() {
        let bbox = BoundingBoxValue::new([-30.0, -120.0, 90.0, 80.0], Some(CrsCode::Epsg4326));
        let domain = domain_from_bounding_box(&bbox);
        assert_eq!(domain.bounds, [-30.0, -120.0, 90.0, 80.0]);
        assert_eq!(domain.crs, Some(CrsCode::Epsg4326));
    }
}
