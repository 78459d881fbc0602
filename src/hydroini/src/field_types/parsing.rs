// hydroini/src/field_types/parsing.rs

//! Coercion of raw entry text into typed values.

use super::value::{FieldType, FieldValue};
use crate::error::{IniError, Result};

/// Parse a float, accepting Fortran-style `d` exponents (`1.0d-3`).
pub fn parse_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().or_else(|| {
        if trimmed.contains(&['d', 'D'][..]) {
            trimmed.replace(&['d', 'D'][..], "e").parse::<f64>().ok()
        } else {
            None
        }
    })
}

pub fn parse_integer(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Parse a boolean written as `1`/`0`, `true`/`false` or `yes`/`no`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" => Some(true),
        "0" | "false" | "f" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Parse a whitespace-delimited list of floats. Empty text is an empty list.
pub fn parse_float_list(raw: &str) -> Option<Vec<f64>> {
    raw.split_whitespace().map(parse_float).collect()
}

/// Parse a list of floats separated by `delimiter`, or by whitespace when
/// there is none.
pub fn parse_float_list_with(raw: &str, delimiter: Option<char>) -> Option<Vec<f64>> {
    match delimiter {
        Some(_) if raw.trim().is_empty() => Some(Vec::new()),
        Some(delimiter) => raw.split(delimiter).map(parse_float).collect(),
        None => parse_float_list(raw),
    }
}

/// Convert raw text to a value of the given type.
///
/// Choices are matched case-insensitively and normalised to the registered
/// spelling.
pub fn coerce(field: &str, raw: &str, expected: &FieldType) -> Result<FieldValue> {
    let value = match expected {
        FieldType::Text => Some(FieldValue::Text(raw.to_string())),
        FieldType::Integer => parse_integer(raw).map(FieldValue::Integer),
        FieldType::Float => parse_float(raw).map(FieldValue::Float),
        FieldType::Bool => parse_bool(raw).map(FieldValue::Bool),
        FieldType::FloatList => parse_float_list(raw).map(FieldValue::FloatList),
        FieldType::Choice(values) => values
            .iter()
            .find(|v| v.eq_ignore_ascii_case(raw.trim()))
            .map(|v| FieldValue::Text(v.clone())),
    };

    value.ok_or_else(|| IniError::type_coercion(field.to_string(), raw.to_string(), expected.name()))
}

/// Bring an assigned value into the canonical form of its field type.
///
/// Integers widen to floats for float fields and choices take the registered
/// spelling. Returns `None` if the value does not fit.
pub(crate) fn normalize(value: FieldValue, expected: &FieldType) -> Option<FieldValue> {
    match (expected, value) {
        (FieldType::Float, FieldValue::Integer(i)) => Some(FieldValue::Float(i as f64)),
        (FieldType::Choice(values), FieldValue::Text(text)) => values
            .iter()
            .find(|v| v.eq_ignore_ascii_case(&text))
            .map(|v| FieldValue::Text(v.clone())),
        (expected, value) if expected.accepts(&value) => Some(value),
        _ => None,
    }
}
