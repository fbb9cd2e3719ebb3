//! Magnitude parsing.
//!
//! Lengths resolve to meters and weights to kilograms. A bare number is
//! taken to already be in the canonical unit.

use thiserror::Error;

/// Result type for unit parsing.
pub type UnitResult<T> = Result<T, UnitError>;

/// Errors produced while parsing a magnitude string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    /// The input was empty or whitespace.
    #[error("empty magnitude")]
    Empty,

    /// The numeric part could not be parsed.
    #[error("invalid number in \"{0}\"")]
    InvalidNumber(String),

    /// The suffix is not a known unit for this quantity.
    #[error("unknown unit \"{unit}\" in \"{input}\"")]
    UnknownUnit {
        /// The unrecognized suffix.
        unit: String,
        /// The full input string.
        input: String,
    },

    /// Negative, infinite, or NaN magnitudes.
    #[error("magnitude out of range: \"{0}\"")]
    OutOfRange(String),
}

const LENGTH_UNITS: &[(&str, f64)] = &[("mm", 0.001), ("cm", 0.01), ("m", 1.0), ("km", 1000.0)];

const WEIGHT_UNITS: &[(&str, f64)] = &[
    ("mg", 0.000_001),
    ("g", 0.001),
    ("kg", 1.0),
    ("t", 1000.0),
];

/// Parse a length such as `"30cm"` into meters.
pub fn parse_length(input: &str) -> UnitResult<f64> {
    parse_with(input, LENGTH_UNITS)
}

/// Parse a weight such as `"200g"` into kilograms.
pub fn parse_weight(input: &str) -> UnitResult<f64> {
    parse_with(input, WEIGHT_UNITS)
}

fn parse_with(input: &str, units: &[(&str, f64)]) -> UnitResult<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UnitError::Empty);
    }

    let split = trimmed
        .find(|c: char| c.is_alphabetic())
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| UnitError::InvalidNumber(input.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(UnitError::OutOfRange(input.to_string()));
    }

    let unit = unit.trim().to_lowercase();
    if unit.is_empty() {
        return Ok(value);
    }

    units
        .iter()
        .find(|(suffix, _)| *suffix == unit)
        .map(|(_, factor)| value * factor)
        .ok_or_else(|| UnitError::UnknownUnit {
            unit,
            input: input.to_string(),
        })
}
