// hydroini/src/field_types/value.rs

//! Core FieldValue and FieldType enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared type of a schema field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Free text, kept verbatim
    Text,
    /// Signed integer
    Integer,
    /// Floating-point number
    Float,
    /// `1`/`0`, `true`/`false` or `yes`/`no`
    Bool,
    /// Whitespace-delimited floats on one line
    FloatList,
    /// One of a closed set of spellings, matched case-insensitively
    Choice(Vec<String>),
}

impl FieldType {
    /// Create a choice type from its canonical spellings.
    pub fn choice(values: &[&str]) -> Self {
        FieldType::Choice(values.iter().map(|v| v.to_string()).collect())
    }

    /// Human-readable type name used in error messages.
    pub fn name(&self) -> String {
        match self {
            FieldType::Text => "text".to_string(),
            FieldType::Integer => "integer".to_string(),
            FieldType::Float => "float".to_string(),
            FieldType::Bool => "bool".to_string(),
            FieldType::FloatList => "float list".to_string(),
            FieldType::Choice(values) => format!("one of [{}]", values.join(", ")),
        }
    }

    /// Check whether an already-typed value fits this field type.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (FieldType::Text, FieldValue::Text(_)) => true,
            (FieldType::Integer, FieldValue::Integer(_)) => true,
            (FieldType::Float, FieldValue::Float(_) | FieldValue::Integer(_)) => true,
            (FieldType::Bool, FieldValue::Bool(_)) => true,
            (FieldType::FloatList, FieldValue::FloatList(_)) => true,
            (FieldType::Choice(values), FieldValue::Text(text)) => {
                values.iter().any(|v| v.eq_ignore_ascii_case(text))
            }
            _ => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A typed value of a schema field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    FloatList(Vec<f64>),
    Text(String),
}

impl FieldValue {
    /// Get the type name as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Bool(_) => "bool",
            FieldValue::FloatList(_) => "float list",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric value; integers widen to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_float_list(&self) -> Option<&[f64]> {
        match self {
            FieldValue::FloatList(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_raw_string())
    }
}
