//! Tests for bounding box value parsing.

use wps_common::bbox::{BboxParseError, BoundingBoxValue};
use wps_common::CrsCode;

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_bbox_new_keeps_order() {
    let bbox = BoundingBoxValue::new([-30.0, -120.0, 90.0, 80.0], Some(CrsCode::Epsg4326));
    assert_eq!(bbox.coords, [-30.0, -120.0, 90.0, 80.0]);
    assert_eq!(bbox.crs, Some(CrsCode::Epsg4326));
}

#[test]
fn test_bbox_copy() {
    let bbox1 = BoundingBoxValue::new([0.0, 0.0, 10.0, 10.0], None);
    let bbox2 = bbox1;
    assert_eq!(bbox1, bbox2);
}

// ============================================================================
// from_wps_string tests
// ============================================================================

#[test]
fn test_parse_wps_bbox_integer() {
    let bbox = BoundingBoxValue::from_wps_string("0,0,100,100").unwrap();
    assert_eq!(bbox.coords, [0.0, 0.0, 100.0, 100.0]);
}

#[test]
fn test_parse_wps_bbox_whitespace() {
    let bbox = BoundingBoxValue::from_wps_string(" -30.5, -120.25 ,90, 80 ").unwrap();
    assert_eq!(bbox.coords, [-30.5, -120.25, 90.0, 80.0]);
}

#[test]
fn test_parse_wps_bbox_scientific_notation() {
    let bbox = BoundingBoxValue::from_wps_string("1e-6,2e-6,1e6,2e6").unwrap();
    assert!((bbox.coords[0] - 1e-6).abs() < 1e-10);
    assert!((bbox.coords[2] - 1e6).abs() < 0.001);
}

#[test]
fn test_parse_wps_bbox_with_urn_crs() {
    let bbox =
        BoundingBoxValue::from_wps_string("-30,-120,90,80,urn:ogc:def:crs:EPSG::4326").unwrap();
    assert_eq!(bbox.crs, Some(CrsCode::Epsg4326));
}

#[test]
fn test_parse_wps_bbox_invalid_format_too_few() {
    let result = BoundingBoxValue::from_wps_string("0,0,100");
    assert!(matches!(result, Err(BboxParseError::InvalidFormat(_))));
}

#[test]
fn test_parse_wps_bbox_invalid_format_too_many() {
    let result = BoundingBoxValue::from_wps_string("0,0,100,100,EPSG:4326,extra");
    assert!(matches!(result, Err(BboxParseError::InvalidFormat(_))));
}

#[test]
fn test_parse_wps_bbox_invalid_number() {
    let result = BoundingBoxValue::from_wps_string("0,abc,100,100");
    assert_eq!(result, Err(BboxParseError::InvalidNumber("abc".to_string())));
}

#[test]
fn test_parse_wps_bbox_unsupported_crs() {
    let result = BoundingBoxValue::from_wps_string("0,0,100,100,EPSG:27700");
    assert!(matches!(result, Err(BboxParseError::UnsupportedCrs(_))));
}

#[test]
fn test_bbox_serializes_crs_code() {
    let bbox = BoundingBoxValue::new([1.0, 2.0, 3.0, 4.0], Some(CrsCode::Epsg4326));
    let json = serde_json::to_string(&bbox).unwrap();
    assert_eq!(json, r#"{"coords":[1.0,2.0,3.0,4.0],"crs":"EPSG:4326"}"#);
}
