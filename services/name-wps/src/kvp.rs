//! WPS 1.0 key-value-pair request decoding.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use wps_common::WpsError;

/// WPS operations understood by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WpsOperation {
    GetCapabilities,
    DescribeProcess,
    Execute,
}

impl FromStr for WpsOperation {
    type Err = WpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "getcapabilities" => Ok(WpsOperation::GetCapabilities),
            "describeprocess" => Ok(WpsOperation::DescribeProcess),
            "execute" => Ok(WpsOperation::Execute),
            _ => Err(WpsError::OperationNotSupported(s.to_string())),
        }
    }
}

impl fmt::Display for WpsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WpsOperation::GetCapabilities => "GetCapabilities",
            WpsOperation::DescribeProcess => "DescribeProcess",
            WpsOperation::Execute => "Execute",
        };
        write!(f, "{}", name)
    }
}

/// A decoded KVP request with case-insensitive keys.
#[derive(Debug, Clone, PartialEq)]
pub struct KvpRequest {
    params: HashMap<String, String>,
}

impl KvpRequest {
    pub fn new(query: HashMap<String, String>) -> Self {
        Self {
            params: query
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(&key.to_lowercase()).map(String::as_str)
    }

    fn require(&self, key: &str) -> Result<&str, WpsError> {
        self.get(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| WpsError::MissingParameter(key.to_string()))
    }

    /// Validate `service` and return the requested operation.
    pub fn operation(&self) -> Result<WpsOperation, WpsError> {
        let service = self.require("service")?;
        if !service.eq_ignore_ascii_case("wps") {
            return Err(WpsError::invalid_parameter(
                "service",
                format!("Unsupported service '{}'", service),
            ));
        }
        self.require("request")?.parse()
    }

    /// Requested process identifiers (comma separated for DescribeProcess).
    pub fn identifiers(&self) -> Result<Vec<&str>, WpsError> {
        Ok(self
            .require("identifier")?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect())
    }

    /// Decoded `datainputs`, empty if none were given.
    pub fn data_inputs(&self) -> Result<Vec<(String, String)>, WpsError> {
        match self.get("datainputs") {
            Some(raw) => parse_data_inputs(raw),
            None => Ok(Vec::new()),
        }
    }
}

/// Parse a `datainputs` value: `name=value;name=value@attr=x;...`
///
/// Repeated names are kept in order. Attributes after '@' are dropped.
pub fn parse_data_inputs(raw: &str) -> Result<Vec<(String, String)>, WpsError> {
    let mut inputs = Vec::new();

    for item in raw.split(';') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }

        let (name, value) = item.split_once('=').ok_or_else(|| {
            WpsError::invalid_parameter(
                "datainputs",
                format!("Expected 'name=value', got '{}'", item),
            )
        })?;

        let value = value.split('@').next().unwrap_or_default();
        inputs.push((name.trim().to_string(), value.to_string()));
    }

    Ok(inputs)
}
