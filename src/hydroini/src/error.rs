// hydroini/src/error.rs

//! Error types for reading, interpreting and writing block-structured model files.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for hydroini operations.
pub type Result<T> = std::result::Result<T, IniError>;

/// Errors that can occur when parsing, interpreting or writing model files.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IniError {
    /// I/O error when reading or writing files
    #[error("I/O error: {0}")]
    Io(String),

    /// Structurally malformed text
    #[error("Format error at line {line}: {message}")]
    Format { message: String, line: usize },

    /// A block header with no registered schema
    #[error("Unknown block type '[{header}]'{}", at_index(.block_index))]
    UnknownBlockType {
        header: String,
        block_index: Option<usize>,
    },

    /// A discriminator value with no registered schema
    #[error(
        "Unknown variant {field} = '{value}' for block type '{type_name}'{}",
        at_index(.block_index)
    )]
    UnknownVariant {
        type_name: String,
        field: String,
        value: String,
        block_index: Option<usize>,
    },

    /// Registry misuse at registration time
    #[error("Schema conflict for block type '{type_name}': {message}")]
    SchemaConflict { type_name: String, message: String },

    /// A required field without a default is absent
    #[error(
        "Missing field '{field}' in [{block}]{}{}",
        in_variant(.variant),
        at_index(.block_index)
    )]
    MissingField {
        field: String,
        block: String,
        variant: Option<String>,
        block_index: Option<usize>,
    },

    /// A non-repeatable field occurs more than once
    #[error(
        "Field '{field}' occurs {count} times in [{block}]{} but is not repeatable{}",
        in_variant(.variant),
        at_index(.block_index)
    )]
    DuplicateField {
        field: String,
        count: usize,
        block: String,
        variant: Option<String>,
        block_index: Option<usize>,
    },

    /// A raw value cannot be converted to the field's declared type
    #[error(
        "Invalid value '{value}' for field '{field}' in [{block}]{}. Expected type: {expected}{}",
        in_variant(.variant),
        at_index(.block_index)
    )]
    TypeCoercion {
        field: String,
        value: String,
        expected: String,
        block: String,
        variant: Option<String>,
        block_index: Option<usize>,
    },

    /// Two positionally paired repeatable fields have different counts
    #[error(
        "Field '{first}' occurs {first_count} times but '{second}' occurs {second_count} times in [{block}]{}",
        at_index(.block_index)
    )]
    PairingMismatch {
        first: String,
        first_count: usize,
        second: String,
        second_count: usize,
        block: String,
        block_index: Option<usize>,
    },

    /// Table rows where the schema forbids them, or none where it requires them
    #[error(
        "Invalid table in [{block}]{}: {message}{}",
        in_variant(.variant),
        at_index(.block_index)
    )]
    InvalidTable {
        message: String,
        block: String,
        variant: Option<String>,
        block_index: Option<usize>,
    },

    /// A value that breaks a rule tying it to other fields of the block
    #[error(
        "Invalid field '{field}' in [{block}]{}: {message}{}",
        in_variant(.variant),
        at_index(.block_index)
    )]
    InvalidField {
        field: String,
        message: String,
        block: String,
        variant: Option<String>,
        block_index: Option<usize>,
    },

    /// Content that would not read back as written
    #[error("Cannot write [{block}]: {message}{}", at_index(.block_index))]
    Unwritable {
        message: String,
        block: String,
        block_index: Option<usize>,
    },

    /// Assignment to a field the schema does not declare
    #[error("Unknown field '{field}' for [{block}]{}", in_variant(.variant))]
    UnknownField {
        field: String,
        block: String,
        variant: Option<String>,
    },

    /// File already exists (when force=false)
    #[error("File already exists: {}", .0.display())]
    FileAlreadyExists(PathBuf),

    /// JSON serialization/deserialization error
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization/deserialization error
    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(String),
}

fn at_index(block_index: &Option<usize>) -> String {
    match block_index {
        Some(index) => format!(" (block #{})", index),
        None => String::new(),
    }
}

fn in_variant(variant: &Option<String>) -> String {
    match variant {
        Some(variant) => format!(" variant '{}'", variant),
        None => String::new(),
    }
}

impl From<io::Error> for IniError {
    fn from(err: io::Error) -> Self {
        IniError::Io(err.to_string())
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for IniError {
    fn from(err: serde_json::Error) -> Self {
        IniError::Json(err.to_string())
    }
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Error> for IniError {
    fn from(err: serde_yaml::Error) -> Self {
        IniError::Yaml(err.to_string())
    }
}

impl IniError {
    /// Create a new format error.
    pub fn format_error<S: Into<String>>(message: S, line: usize) -> Self {
        IniError::Format {
            message: message.into(),
            line,
        }
    }

    /// Create a new missing field error.
    pub fn missing_field<S: Into<String>>(field: S, block: S, variant: Option<String>) -> Self {
        IniError::MissingField {
            field: field.into(),
            block: block.into(),
            variant,
            block_index: None,
        }
    }

    /// Create a new type coercion error.
    pub fn type_coercion<S: Into<String>>(field: S, value: S, expected: S) -> Self {
        IniError::TypeCoercion {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
            block: String::new(),
            variant: None,
            block_index: None,
        }
    }

    /// Create a new schema conflict error.
    pub fn schema_conflict<S: Into<String>>(type_name: S, message: S) -> Self {
        IniError::SchemaConflict {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Attach the index of the offending block within its document.
    pub fn at_block(mut self, index: usize) -> Self {
        match &mut self {
            IniError::UnknownBlockType { block_index, .. }
            | IniError::UnknownVariant { block_index, .. }
            | IniError::MissingField { block_index, .. }
            | IniError::DuplicateField { block_index, .. }
            | IniError::TypeCoercion { block_index, .. }
            | IniError::PairingMismatch { block_index, .. }
            | IniError::InvalidTable { block_index, .. }
            | IniError::InvalidField { block_index, .. }
            | IniError::Unwritable { block_index, .. } => *block_index = Some(index),
            _ => {}
        }
        self
    }

    /// Attach the block header and variant a coercion failure happened in.
    pub(crate) fn in_block(mut self, header: &str, discriminator: Option<&str>) -> Self {
        if let IniError::TypeCoercion { block, variant, .. } = &mut self {
            if block.is_empty() {
                *block = header.to_string();
            }
            if variant.is_none() {
                *variant = discriminator.map(str::to_string);
            }
        }
        self
    }

    /// Get the error category for logging purposes.
    pub fn category(&self) -> &'static str {
        match self {
            IniError::Io(_) => "io",
            IniError::Format { .. } => "format",
            IniError::UnknownBlockType { .. } => "unknown_block",
            IniError::UnknownVariant { .. } => "unknown_variant",
            IniError::SchemaConflict { .. } => "schema",
            IniError::MissingField { .. } => "missing",
            IniError::DuplicateField { .. } => "duplicate",
            IniError::TypeCoercion { .. } => "coercion",
            IniError::PairingMismatch { .. } => "pairing",
            IniError::InvalidTable { .. } => "table",
            IniError::InvalidField { .. } => "invalid",
            IniError::Unwritable { .. } => "unwritable",
            IniError::UnknownField { .. } => "unknown_field",
            IniError::FileAlreadyExists(_) => "file_exists",
            #[cfg(feature = "json")]
            IniError::Json(_) => "json",
            #[cfg(feature = "yaml")]
            IniError::Yaml(_) => "yaml",
        }
    }

    /// Get contextual information about where this error occurred.
    pub fn context(&self) -> ErrorContext {
        match self {
            IniError::Format { line, .. } => ErrorContext {
                line: Some(*line),
                ..ErrorContext::empty()
            },
            IniError::UnknownBlockType {
                header,
                block_index,
            } => ErrorContext {
                block: Some(header.clone()),
                block_index: *block_index,
                ..ErrorContext::empty()
            },
            IniError::UnknownVariant {
                type_name,
                field,
                value,
                block_index,
            } => ErrorContext {
                block: Some(type_name.clone()),
                block_index: *block_index,
                variant: Some(value.clone()),
                field: Some(field.clone()),
                ..ErrorContext::empty()
            },
            IniError::MissingField {
                field,
                block,
                variant,
                block_index,
            }
            | IniError::DuplicateField {
                field,
                block,
                variant,
                block_index,
                ..
            }
            | IniError::TypeCoercion {
                field,
                block,
                variant,
                block_index,
                ..
            }
            | IniError::InvalidField {
                field,
                block,
                variant,
                block_index,
                ..
            } => ErrorContext {
                line: None,
                block: Some(block.clone()),
                block_index: *block_index,
                variant: variant.clone(),
                field: Some(field.clone()),
            },
            IniError::InvalidTable {
                block,
                variant,
                block_index,
                ..
            } => ErrorContext {
                block: Some(block.clone()),
                block_index: *block_index,
                variant: variant.clone(),
                ..ErrorContext::empty()
            },
            IniError::Unwritable {
                block,
                block_index,
                ..
            } => ErrorContext {
                block: Some(block.clone()),
                block_index: *block_index,
                ..ErrorContext::empty()
            },
            IniError::UnknownField {
                field,
                block,
                variant,
            } => ErrorContext {
                block: Some(block.clone()),
                variant: variant.clone(),
                field: Some(field.clone()),
                ..ErrorContext::empty()
            },
            IniError::PairingMismatch {
                first,
                block,
                block_index,
                ..
            } => ErrorContext {
                block: Some(block.clone()),
                block_index: *block_index,
                field: Some(first.clone()),
                ..ErrorContext::empty()
            },
            _ => ErrorContext::empty(),
        }
    }
}

/// Context information about where an error occurred.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorContext {
    pub line: Option<usize>,
    pub block: Option<String>,
    pub block_index: Option<usize>,
    pub variant: Option<String>,
    pub field: Option<String>,
}

impl ErrorContext {
    /// Create an empty context.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if this context is empty.
    pub fn is_empty(&self) -> bool {
        self.line.is_none()
            && self.block.is_none()
            && self.block_index.is_none()
            && self.variant.is_none()
            && self.field.is_none()
    }
}
