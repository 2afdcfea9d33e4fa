//! Declared input parameters for the NAME processes.
//!
//! The schema is the single source of truth for which parameters exist,
//! their kinds, defaults and cardinality. Decoding raw transport values and
//! assembling the run configuration both walk it in declaration order.

use serde::Serialize;
use wps_common::{BoundingBoxValue, CrsCode, LiteralKind, LiteralValue, WpsError};

use crate::domain::DomainShape;
use crate::params::{RawParameterSet, RawValue};
use crate::range::MAX_ELEVATION_RANGES;

/// Parameter holding the elevation averaging ranges.
pub const ELEVATION_OUT: &str = "elevationOut";

/// Parameter holding the search domain.
pub const DOMAIN: &str = "domain";

/// What kind of value a parameter carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterKind {
    Literal { data_type: LiteralKind },
    BoundingBox { supported_crs: Vec<CrsCode> },
}

/// Declaration of a single input parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    pub identifier: &'static str,
    pub title: &'static str,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_: Option<&'static str>,
    #[serde(flatten)]
    pub kind: ParameterKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<LiteralValue>,
    pub min_occurs: usize,
    pub max_occurs: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<LiteralValue>,
}

impl ParameterDescriptor {
    /// A required, single-valued literal parameter.
    pub fn literal(identifier: &'static str, title: &'static str, data_type: LiteralKind) -> Self {
        Self {
            identifier,
            title,
            abstract_: None,
            kind: ParameterKind::Literal { data_type },
            default: None,
            min_occurs: 1,
            max_occurs: 1,
            allowed_values: Vec::new(),
        }
    }

    /// A required, single-valued bounding-box parameter.
    pub fn bounding_box(
        identifier: &'static str,
        title: &'static str,
        supported_crs: Vec<CrsCode>,
    ) -> Self {
        Self {
            identifier,
            title,
            abstract_: None,
            kind: ParameterKind::BoundingBox { supported_crs },
            default: None,
            min_occurs: 1,
            max_occurs: 1,
            allowed_values: Vec::new(),
        }
    }

    pub fn with_abstract(mut self, text: &'static str) -> Self {
        self.abstract_ = Some(text);
        self
    }

    pub fn with_default(mut self, value: LiteralValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn occurs(mut self, min: usize, max: usize) -> Self {
        self.min_occurs = min;
        self.max_occurs = max;
        self
    }

    pub fn optional(self) -> Self {
        let max = self.max_occurs;
        self.occurs(0, max)
    }

    pub fn allowed(mut self, values: Vec<LiteralValue>) -> Self {
        self.allowed_values = values;
        self
    }

    pub fn is_required(&self) -> bool {
        self.min_occurs > 0
    }

    /// Coerce one raw transport string into a typed value.
    pub fn decode_value(&self, raw: &str) -> Result<RawValue, WpsError> {
        match &self.kind {
            ParameterKind::Literal { data_type } => {
                let value = data_type.coerce(self.identifier, raw)?;
                if !self.allowed_values.is_empty() && !self.allowed_values.contains(&value) {
                    let allowed = self
                        .allowed_values
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Err(WpsError::invalid_parameter(
                        self.identifier,
                        format!("'{}' is not one of the allowed values: {}", raw, allowed),
                    ));
                }
                Ok(RawValue::Literal(value))
            }
            ParameterKind::BoundingBox { supported_crs } => {
                let mut bbox = BoundingBoxValue::from_wps_string(raw)
                    .map_err(|e| WpsError::invalid_parameter(self.identifier, e.to_string()))?;
                match bbox.crs {
                    Some(crs) if !supported_crs.contains(&crs) => {
                        return Err(WpsError::invalid_parameter(
                            self.identifier,
                            format!("CRS {} is not supported", crs),
                        ));
                    }
                    Some(_) => {}
                    None => bbox.crs = supported_crs.first().copied(),
                }
                Ok(RawValue::BoundingBox(bbox))
            }
        }
    }
}

/// The full set of declared inputs for one process variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessSchema {
    pub parameters: Vec<ParameterDescriptor>,
    pub domain_shape: DomainShape,
}

impl ProcessSchema {
    /// Inputs of the file-emitting `runname` process.
    pub fn basic() -> Self {
        let domain = ParameterDescriptor::literal(DOMAIN, "Domain coordinates", LiteralKind::String)
            .with_abstract("Coordinates to search within (minX,maxX,minY,maxY)")
            .with_default(LiteralValue::String("-120.0,80.0,-30.0,90.0".to_string()))
            .optional();

        Self {
            parameters: common_parameters(domain),
            domain_shape: DomainShape::Delimited,
        }
    }

    /// Inputs of the model-running `runnameadvanced` process.
    pub fn advanced() -> Self {
        let domain = ParameterDescriptor::bounding_box(
            DOMAIN,
            "Domain coordinates",
            vec![CrsCode::Epsg4326],
        )
        .with_abstract("Area to search within");

        Self {
            parameters: common_parameters(domain),
            domain_shape: DomainShape::BoundingBox,
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|p| p.identifier == identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters.iter()
    }

    /// Coerce raw `(name, value)` pairs into a parameter set.
    ///
    /// Rejects unknown names, values of the wrong kind, values outside the
    /// allowed list, and more values than a parameter accepts.
    pub fn decode<K, V>(&self, submitted: &[(K, V)]) -> Result<RawParameterSet, WpsError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = RawParameterSet::new();

        for (name, raw) in submitted {
            let name = name.as_ref();
            let descriptor = self
                .get(name)
                .ok_or_else(|| WpsError::invalid_parameter(name, "Unknown input parameter"))?;
            params.push(name, descriptor.decode_value(raw.as_ref())?);
        }

        for descriptor in &self.parameters {
            let count = params.get(descriptor.identifier).len();
            if count > descriptor.max_occurs {
                return Err(WpsError::invalid_parameter(
                    descriptor.identifier,
                    format!(
                        "At most {} value(s) allowed, got {}",
                        descriptor.max_occurs, count
                    ),
                ));
            }
        }

        Ok(params)
    }
}

fn common_parameters(domain: ParameterDescriptor) -> Vec<ParameterDescriptor> {
    use LiteralKind::*;

    let text = |s: &str| LiteralValue::String(s.to_string());

    vec![
        ParameterDescriptor::literal("latitude", "Latitude", Float)
            .with_abstract("Location of release")
            .with_default(LiteralValue::Float(-24.867222)),
        ParameterDescriptor::literal("longitude", "Longitude", Float)
            .with_abstract("Location of release")
            .with_default(LiteralValue::Float(16.863611)),
        domain,
        ParameterDescriptor::literal("elevation", "Elevation", Integer)
            .with_abstract("m agl for land, m asl for marine release")
            .with_default(LiteralValue::Integer(10))
            .optional(),
        ParameterDescriptor::literal("elevation_range_min", "Elevation Range Min", Integer)
            .with_abstract("Minimum range of elevation")
            .optional(),
        ParameterDescriptor::literal("elevation_range_max", "Elevation Range Max", Integer)
            .with_abstract("Maximum range of elevation")
            .optional(),
        ParameterDescriptor::literal("title", "Title of run", String).with_abstract("Title of run"),
        ParameterDescriptor::literal("runBackwards", "Run Backwards", Boolean)
            .with_abstract("Whether to run backwards in time (default) or forwards")
            .with_default(LiteralValue::Boolean(true))
            .optional(),
        ParameterDescriptor::literal("time", "Time to run model over", Integer)
            .with_abstract("Time")
            .with_default(LiteralValue::Integer(1)),
        ParameterDescriptor::literal("timeFmt", "Time format", String)
            .with_abstract("choose whether to measure time in hours or days")
            .with_default(text("days"))
            .allowed(vec![text("days"), text("hours")]),
        ParameterDescriptor::literal(ELEVATION_OUT, "Elevation averaging ranges", String)
            .with_abstract(
                "Elevation range where the particle number is counted (m agl) Example: 0-100",
            )
            .with_default(text("0-100"))
            .occurs(1, MAX_ELEVATION_RANGES),
        ParameterDescriptor::literal("resolution", "Resolution", Float)
            .with_abstract("degrees, note the UM global Met data was only 17Km resolution")
            .with_default(LiteralValue::Float(0.25))
            .allowed(vec![LiteralValue::Float(0.05), LiteralValue::Float(0.25)])
            .optional(),
        ParameterDescriptor::literal("timestamp", "timestamp of runs", String)
            .with_abstract("how often the prog will run?")
            .allowed(vec![text("3-hourly"), text("daily")]),
        ParameterDescriptor::literal("dailytime", "daily run time", Time)
            .with_abstract("if running daily, at what time will it run")
            .optional(),
        ParameterDescriptor::literal("startdate", "Start date of runs", Date)
            .with_abstract("start date of runs"),
        ParameterDescriptor::literal("enddate", "End date of runs", Date)
            .with_abstract("end date of runs"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_domain_is_delimited_string() {
        let schema = ProcessSchema::basic();
        assert_eq!(schema.domain_shape, DomainShape::Delimited);
        assert!(matches!(
            schema.get(DOMAIN).unwrap().kind,
            ParameterKind::Literal { data_type: LiteralKind::String }
        ));
    }

    #[test]
    fn test_advanced_domain_is_bbox() {
        let schema = ProcessSchema::advanced();
        assert_eq!(schema.domain_shape, DomainShape::BoundingBox);
        assert!(schema.get(DOMAIN).unwrap().is_required());
    }

    #[test]
    fn test_decode_unknown_parameter() {
        let err = ProcessSchema::basic().decode(&[("colour", "red")]).unwrap_err();
        assert!(matches!(err, WpsError::InvalidParameter { ref param, .. } if param == "colour"));
    }

    #[test]
    fn test_decode_disallowed_value() {
        let err = ProcessSchema::basic().decode(&[("timeFmt", "weeks")]).unwrap_err();
        assert!(err.to_string().contains("allowed values"));

        let err = ProcessSchema::basic().decode(&[("resolution", "0.5")]).unwrap_err();
        assert!(matches!(err, WpsError::InvalidParameter { ref param, .. } if param == "resolution"));
    }

    #[test]
    fn test_decode_too_many_ranges() {
        let submitted: Vec<(&str, &str)> = ["0-1", "1-2", "2-3", "3-4", "4-5"]
            .into_iter()
            .map(|r| (ELEVATION_OUT, r))
            .collect();
        let err = ProcessSchema::basic().decode(&submitted).unwrap_err();
        assert!(err.to_string().contains("At most 4"));
    }

    #[test]
    fn test_decode_bbox_defaults_crs() {
        let params = ProcessSchema::advanced()
            .decode(&[(DOMAIN, "-30,-120,90,80")])
            .unwrap();
        match &params.get(DOMAIN)[0] {
            RawValue::BoundingBox(bbox) => assert_eq!(bbox.crs, Some(CrsCode::Epsg4326)),
            other => panic!("unexpected value: {:?}", other),
        }
    }

    #[test]
    fn test_decode_bbox_rejects_other_crs() {
        let err = ProcessSchema::advanced()
            .decode(&[(DOMAIN, "-30,-120,90,80,EPSG:3857")])
            .unwrap_err();
        assert_eq!(err.locator(), Some(DOMAIN));
        assert!(err.to_string().contains("Unsupported CRS"));
    }

    #[test]
    fn test_descriptor_serialization() {
        let schema = ProcessSchema::basic();
        let json = serde_json::to_value(schema.get("timeFmt").unwrap()).unwrap();
        assert_eq!(json["identifier"], "timeFmt");
        assert_eq!(json["type"], "literal");
        assert_eq!(json["data_type"], "string");
        assert_eq!(json["default"], "days");
        assert_eq!(json["allowed_values"][1], "hours");
    }
}
