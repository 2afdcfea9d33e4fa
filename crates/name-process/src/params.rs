//! Submitted parameter values after primitive coercion.

use std::collections::BTreeMap;

use wps_common::{BoundingBoxValue, LiteralValue};

/// A single submitted value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Literal(LiteralValue),
    BoundingBox(BoundingBoxValue),
}

impl RawValue {
    pub fn as_literal(&self) -> Option<&LiteralValue> {
        match self {
            RawValue::Literal(v) => Some(v),
            RawValue::BoundingBox(_) => None,
        }
    }
}

impl From<LiteralValue> for RawValue {
    fn from(value: LiteralValue) -> Self {
        RawValue::Literal(value)
    }
}

impl From<BoundingBoxValue> for RawValue {
    fn from(value: BoundingBoxValue) -> Self {
        RawValue::BoundingBox(value)
    }
}

/// Parameter name to the values submitted for it, in submission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParameterSet {
    values: BTreeMap<String, Vec<RawValue>>,
}

impl RawParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value for `name`.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    /// Builder-style variant of [`push`](Self::push).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.push(name, value);
        self
    }

    /// All values submitted for `name`, empty if none.
    pub fn get(&self, name: &str) -> &[RawValue] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_order() {
        let mut params = RawParameterSet::new();
        params.push("elevationOut", LiteralValue::String("0-100".into()));
        params.push("elevationOut", LiteralValue::String("100-200".into()));

        let values = params.get("elevationOut");
        assert_eq!(values.len(), 2);
        assert_eq!(
            values[1].as_literal(),
            Some(&LiteralValue::String("100-200".into()))
        );
    }

    #[test]
    fn test_missing_name_is_empty() {
        let params = RawParameterSet::new();
        assert!(params.get("title").is_empty());
        assert!(params.is_empty());
    }
}
