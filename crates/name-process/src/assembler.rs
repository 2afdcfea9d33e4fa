//! Assembly of the run configuration from submitted parameters.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::debug;
use wps_common::{LiteralValue, WpsError};

use crate::domain::{domain_from_bounding_box, parse_delimited_domain, DomainBounds, DomainShape};
use crate::params::{RawParameterSet, RawValue};
use crate::range::{parse_elevation_ranges, ElevationRange};
use crate::schema::{ParameterDescriptor, ProcessSchema, DOMAIN, ELEVATION_OUT};

/// Final value of one configuration entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Literal(LiteralValue),
    ElevationRanges(Vec<ElevationRange>),
    Domain(DomainBounds),
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Literal(value) => value.serialize(serializer),
            ConfigValue::ElevationRanges(ranges) => ranges.serialize(serializer),
            ConfigValue::Domain(domain) => domain.bounds.serialize(serializer),
        }
    }
}

/// The assembled, immutable configuration for one model run.
///
/// Entries keep schema declaration order. Serializes as a JSON object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunConfiguration {
    entries: Vec<(String, ConfigValue)>,
}

impl RunConfiguration {
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn literal(&self, name: &str) -> Option<&LiteralValue> {
        match self.get(name)? {
            ConfigValue::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn elevation_ranges(&self) -> Option<&[ElevationRange]> {
        match self.get(ELEVATION_OUT)? {
            ConfigValue::ElevationRanges(ranges) => Some(ranges),
            _ => None,
        }
    }

    pub fn domain(&self) -> Option<&DomainBounds> {
        match self.get(DOMAIN)? {
            ConfigValue::Domain(domain) => Some(domain),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RunConfiguration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// How much cross-field checking the assembler performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Only syntactic checks on the structured fields.
    #[default]
    Permissive,
    /// Also reject inverted elevation ranges, `elevation_range_min` above
    /// `elevation_range_max`, and `enddate` before `startdate`.
    Strict,
}

/// Builds a [`RunConfiguration`] by walking a declared schema.
#[derive(Debug, Clone)]
pub struct ParameterAssembler<'a> {
    schema: &'a ProcessSchema,
    mode: ValidationMode,
}

impl<'a> ParameterAssembler<'a> {
    pub fn new(schema: &'a ProcessSchema) -> Self {
        Self {
            schema,
            mode: ValidationMode::Permissive,
        }
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Assemble the configuration, or fail on the first invalid field.
    ///
    /// `elevationOut` is parsed before `domain`, and both before any scalar
    /// field, so the reported error is deterministic.
    pub fn assemble(&self, params: &RawParameterSet) -> Result<RunConfiguration, WpsError> {
        let ranges = match self.schema.get(ELEVATION_OUT) {
            Some(descriptor) => match resolve(descriptor, params)? {
                Some(values) => Some(self.parse_ranges(&values)?),
                None => None,
            },
            None => None,
        };

        let domain = match self.schema.get(DOMAIN) {
            Some(descriptor) => match resolve(descriptor, params)? {
                Some(values) => Some(self.parse_domain(&values)?),
                None => None,
            },
            None => None,
        };

        let mut entries = Vec::with_capacity(self.schema.parameters.len());
        for descriptor in self.schema.iter() {
            let value = match descriptor.identifier {
                ELEVATION_OUT => ranges.clone().map(ConfigValue::ElevationRanges),
                DOMAIN => domain.map(ConfigValue::Domain),
                _ => match resolve(descriptor, params)? {
                    Some(values) => Some(ConfigValue::Literal(scalar(descriptor, &values)?)),
                    None => None,
                },
            };
            if let Some(value) = value {
                entries.push((descriptor.identifier.to_string(), value));
            }
        }

        let config = RunConfiguration { entries };
        if self.mode == ValidationMode::Strict {
            check_cross_fields(&config)?;
        }

        debug!(entries = config.len(), "Assembled run configuration");
        Ok(config)
    }

    fn parse_ranges(&self, values: &[RawValue]) -> Result<Vec<ElevationRange>, WpsError> {
        let raw = values
            .iter()
            .map(|v| match v {
                RawValue::Literal(LiteralValue::String(s)) => Ok(s.as_str()),
                other => Err(WpsError::invalid_input(
                    format!("{:?}", other),
                    "Elevation ranges must be given as text, e.g. 0-100",
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;

        parse_elevation_ranges(&raw)
    }

    fn parse_domain(&self, values: &[RawValue]) -> Result<DomainBounds, WpsError> {
        match (self.schema.domain_shape, values.first()) {
            (DomainShape::Delimited, Some(RawValue::Literal(LiteralValue::String(s)))) => {
                parse_delimited_domain(s)
            }
            (DomainShape::BoundingBox, Some(RawValue::BoundingBox(bbox))) => {
                Ok(domain_from_bounding_box(bbox))
            }
            (shape, other) => Err(WpsError::invalid_input(
                format!("{:?}", other),
                format!("The domain must be given in {:?} form", shape),
            )),
        }
    }
}

/// Submitted values, else the default, else `None` for optional inputs.
fn resolve(
    descriptor: &ParameterDescriptor,
    params: &RawParameterSet,
) -> Result<Option<Vec<RawValue>>, WpsError> {
    let submitted = params.get(descriptor.identifier);
    if !submitted.is_empty() {
        return Ok(Some(submitted.to_vec()));
    }
    if let Some(default) = &descriptor.default {
        return Ok(Some(vec![RawValue::Literal(default.clone())]));
    }
    if descriptor.is_required() {
        return Err(WpsError::MissingParameter(descriptor.identifier.to_string()));
    }
    Ok(None)
}

fn scalar(descriptor: &ParameterDescriptor, values: &[RawValue]) -> Result<LiteralValue, WpsError> {
    values
        .first()
        .and_then(RawValue::as_literal)
        .cloned()
        .ok_or_else(|| {
            WpsError::invalid_parameter(descriptor.identifier, "Expected a literal value")
        })
}

fn check_cross_fields(config: &RunConfiguration) -> Result<(), WpsError> {
    for range in config.elevation_ranges().unwrap_or_default() {
        if range.is_inverted() {
            return Err(WpsError::invalid_input(
                format!("{}-{}", range.min, range.max),
                format!(
                    "The range \"{}-{}\" has its minimum above its maximum",
                    range.min, range.max
                ),
            ));
        }
    }

    let min = config.literal("elevation_range_min").and_then(LiteralValue::as_i64);
    let max = config.literal("elevation_range_max").and_then(LiteralValue::as_i64);
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(WpsError::invalid_input(
                min.to_string(),
                format!(
                    "elevation_range_min ({}) must not exceed elevation_range_max ({})",
                    min, max
                ),
            ));
        }
    }

    let start = config.literal("startdate").and_then(LiteralValue::as_date);
    let end = config.literal("enddate").and_then(LiteralValue::as_date);
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(WpsError::invalid_input(
                end.to_string(),
                format!("enddate ({}) must not be before startdate ({})", end, start),
            ));
        }
    }

    Ok(())
}
