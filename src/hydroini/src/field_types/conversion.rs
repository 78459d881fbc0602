// hydroini/src/field_types/conversion.rs

//! Conversions from Rust types into FieldValue.

use super::value::FieldValue;

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value as i64)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<Vec<f64>> for FieldValue {
    fn from(values: Vec<f64>) -> Self {
        FieldValue::FloatList(values)
    }
}

impl From<&[f64]> for FieldValue {
    fn from(values: &[f64]) -> Self {
        FieldValue::FloatList(values.to_vec())
    }
}
