//! Elevation averaging ranges submitted as "min-max" strings.

use serde::{Deserialize, Serialize};
use wps_common::WpsError;

/// Most ranges a single request may carry.
pub const MAX_ELEVATION_RANGES: usize = 4;

const SEPARATOR: char = '-';
const EXAMPLE: &str = "0-100";

/// An averaging band in metres above ground level.
///
/// Serializes as a two-element array `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(i64, i64)", into = "(i64, i64)")]
pub struct ElevationRange {
    pub min: i64,
    pub max: i64,
}

impl ElevationRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// True when the lower bound exceeds the upper bound.
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }
}

impl From<(i64, i64)> for ElevationRange {
    fn from((min, max): (i64, i64)) -> Self {
        Self { min, max }
    }
}

impl From<ElevationRange> for (i64, i64) {
    fn from(range: ElevationRange) -> Self {
        (range.min, range.max)
    }
}

/// Parse a single "min-max" string.
///
/// The separator is the first '-' after the leading character, so a
/// negative lower bound ("-10-100") is accepted. Ordering is not checked.
pub fn parse_elevation_range(raw: &str) -> Result<ElevationRange, WpsError> {
    if !raw.contains(SEPARATOR) {
        return Err(WpsError::invalid_input(
            raw,
            format!(
                "The value \"{}\" does not contain a \"{}\" character to define a range, e.g. {}",
                raw, SEPARATOR, EXAMPLE
            ),
        ));
    }

    let not_integers = || {
        WpsError::invalid_input(
            raw,
            format!(
                "The value \"{}\" is not two integers separated by a \"{}\" character, e.g. {}",
                raw, SEPARATOR, EXAMPLE
            ),
        )
    };

    let trimmed = raw.trim();
    let split_at = trimmed
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == SEPARATOR)
        .map(|(i, _)| i)
        .ok_or_else(not_integers)?;

    let (min, max) = (&trimmed[..split_at], &trimmed[split_at + 1..]);
    let min = min.trim().parse::<i64>().map_err(|_| not_integers())?;
    let max = max.trim().parse::<i64>().map_err(|_| not_integers())?;

    Ok(ElevationRange { min, max })
}

/// Parse every submitted range, keeping input order.
///
/// Fails on the first malformed entry.
pub fn parse_elevation_ranges<S: AsRef<str>>(raw: &[S]) -> Result<Vec<ElevationRange>, WpsError> {
    if raw.is_empty() || raw.len() > MAX_ELEVATION_RANGES {
        return Err(WpsError::invalid_input(
            raw.iter().map(|r| r.as_ref()).collect::<Vec<&str>>().join(";"),
            format!(
                "Between 1 and {} elevation ranges must be given, got {}",
                MAX_ELEVATION_RANGES,
                raw.len()
            ),
        ));
    }

    raw.iter().map(|r| parse_elevation_range(r.as_ref())).collect()
}
