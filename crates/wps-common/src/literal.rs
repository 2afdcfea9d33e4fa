//! Typed literal values and the primitive coercion applied to raw strings.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WpsError;

/// Data kind declared for a literal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralKind {
    Float,
    Integer,
    String,
    Boolean,
    Date,
    Time,
}

impl LiteralKind {
    /// Coerce a raw submitted string into a typed value of this kind.
    ///
    /// `param` is only used to label the error.
    pub fn coerce(&self, param: &str, raw: &str) -> Result<LiteralValue, WpsError> {
        let trimmed = raw.trim();
        let invalid =
            || WpsError::invalid_parameter(param, format!("'{}' is not a valid {}", raw, self));

        match self {
            LiteralKind::Float => trimmed
                .parse::<f64>()
                .map(LiteralValue::Float)
                .map_err(|_| invalid()),
            LiteralKind::Integer => trimmed
                .parse::<i64>()
                .map(LiteralValue::Integer)
                .map_err(|_| invalid()),
            LiteralKind::String => Ok(LiteralValue::String(raw.to_string())),
            LiteralKind::Boolean => match trimmed.to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(LiteralValue::Boolean(true)),
                "false" | "0" | "no" => Ok(LiteralValue::Boolean(false)),
                _ => Err(invalid()),
            },
            LiteralKind::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(LiteralValue::Date)
                .map_err(|_| invalid()),
            LiteralKind::Time => NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
                .map(LiteralValue::Time)
                .map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LiteralKind::Float => "float",
            LiteralKind::Integer => "integer",
            LiteralKind::String => "string",
            LiteralKind::Boolean => "boolean",
            LiteralKind::Date => "date",
            LiteralKind::Time => "time",
        };
        write!(f, "{}", name)
    }
}

/// A literal value after primitive coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    Time(NaiveTime),
    String(String),
}

impl LiteralValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            LiteralValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            LiteralValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Float(v) => write!(f, "{}", v),
            LiteralValue::Integer(v) => write!(f, "{}", v),
            LiteralValue::String(v) => write!(f, "{}", v),
            LiteralValue::Boolean(v) => write!(f, "{}", v),
            LiteralValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            LiteralValue::Time(v) => write!(f, "{}", v.format("%H:%M:%S")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_numbers() {
        assert_eq!(
            LiteralKind::Float.coerce("latitude", "-24.867222").unwrap(),
            LiteralValue::Float(-24.867222)
        );
        assert_eq!(
            LiteralKind::Integer.coerce("time", " 3 ").unwrap(),
            LiteralValue::Integer(3)
        );
        assert!(LiteralKind::Integer.coerce("time", "3.5").is_err());
    }

    #[test]
    fn test_coerce_boolean_variants() {
        for raw in ["1", "true", "TRUE", "yes"] {
            assert_eq!(
                LiteralKind::Boolean.coerce("runBackwards", raw).unwrap(),
                LiteralValue::Boolean(true)
            );
        }
        for raw in ["0", "false", "No"] {
            assert_eq!(
                LiteralKind::Boolean.coerce("runBackwards", raw).unwrap(),
                LiteralValue::Boolean(false)
            );
        }
        assert!(LiteralKind::Boolean.coerce("runBackwards", "maybe").is_err());
    }

    #[test]
    fn test_coerce_date_and_time() {
        let date = LiteralKind::Date.coerce("startdate", "2017-01-31").unwrap();
        assert_eq!(date, LiteralValue::Date(NaiveDate::from_ymd_opt(2017, 1, 31).unwrap()));

        let time = LiteralKind::Time.coerce("dailytime", "12:30").unwrap();
        assert_eq!(time, LiteralValue::Time(NaiveTime::from_hms_opt(12, 30, 0).unwrap()));

        let err = LiteralKind::Date.coerce("startdate", "31/01/2017").unwrap_err();
        assert!(matches!(err, WpsError::InvalidParameter { ref param, .. } if param == "startdate"));
    }

    #[test]
    fn test_string_is_kept_verbatim() {
        assert_eq!(
            LiteralKind::String.coerce("title", " my run ").unwrap(),
            LiteralValue::String(" my run ".to_string())
        );
    }

    #[test]
    fn test_serialize_untagged() {
        let date = LiteralValue::Date(NaiveDate::from_ymd_opt(2017, 1, 31).unwrap());
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2017-01-31\"");
        assert_eq!(serde_json::to_string(&LiteralValue::Boolean(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&LiteralValue::Integer(10)).unwrap(), "10");
    }
}
