// hydroini/src/field_types/formatting.rs

//! Rendering typed values back to entry text.

use super::value::FieldValue;

/// Format a float so that it parses back to the same value.
///
/// Integral values keep a trailing `.0` (`60.0`, not `60`).
pub fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

/// Join floats with `delimiter` (followed by a space), or with a single
/// space when there is none.
pub fn format_float_list(values: &[f64], delimiter: Option<char>) -> String {
    let separator = match delimiter {
        Some(delimiter) => format!("{} ", delimiter),
        None => " ".to_string(),
    };
    values
        .iter()
        .map(|v| format_float(*v))
        .collect::<Vec<_>>()
        .join(&separator)
}

impl FieldValue {
    /// Render the value as it is written after `key =`.
    pub fn to_raw_string(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => format_float(*f),
            FieldValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            FieldValue::FloatList(values) => format_float_list(values, None),
        }
    }
}
