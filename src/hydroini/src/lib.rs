// hydroini/src/lib.rs

//! A Rust-native reader and writer for block-structured hydraulic model input
//! files such as boundary-condition (`.bc`) files.
//!
//! This library provides functionality to:
//! - Parse `[Header]` blocks with `key = value` entries, repeated keys,
//!   inline comments and trailing data tables into an ordered [`Document`]
//! - Render documents back to aligned text that parses to the same document
//! - Interpret blocks as typed records through a registry of schemas keyed by
//!   header and discriminator value, and flatten records back to blocks
//! - Work with boundary-condition files through the strongly typed [`bc`] module
//! - Convert documents to JSON or YAML (optional features)

pub mod bc;
pub mod document;
pub mod error;
pub mod field_types;
pub mod parser;
pub mod scanner;
pub mod schema;

use std::io::Write;
use std::path::Path;

pub use document::{Block, BlockComment, Document, Entry};
pub use error::{IniError, Result};
pub use field_types::{FieldType, FieldValue};
pub use parser::{parse, parse_collecting, parse_with_config, Parser, ParserConfig};
pub use schema::{
    build, flatten, interpret, interpret_collecting, project, Comparison, Condition, FieldRule,
    FieldSpec, FlattenOptions, Schema, SchemaRegistry, TypedRecord,
};

/// Render a document with default options.
///
/// Fails with [`IniError::Unwritable`] when some key, value, comment or table
/// token would not read back as written.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), hydroini::IniError> {
/// let doc = hydroini::parse("[General]\nfileVersion=1.01\n")?;
/// assert_eq!(hydroini::render(&doc)?, "[General]\n    fileVersion = 1.01\n");
/// # Ok(())
/// # }
/// ```
pub fn render(document: &Document) -> Result<String> {
    render_with_options(document, &WriteOptions::default())
}

/// Render a document with specific options.
pub fn render_with_options(document: &Document, options: &WriteOptions) -> Result<String> {
    document.check()?;
    Ok(document.to_ini_string(options))
}

/// Parse a model file from a path.
///
/// # Examples
///
/// ```no_run
/// fn main() -> Result<(), hydroini::IniError> {
///     let doc = hydroini::read("boundaryconditions.bc")?;
///     println!("{} blocks", doc.len());
///     Ok(())
/// }
/// ```
pub fn read<P: AsRef<Path>>(path: P) -> Result<Document> {
    read_with_config(path, ParserConfig::default())
}

/// Parse a model file from a path with explicit parser options.
pub fn read_with_config<P: AsRef<Path>>(path: P, config: ParserConfig) -> Result<Document> {
    let contents = fs_err::read_to_string(path.as_ref())?;
    log::debug!("read {} bytes from {}", contents.len(), path.as_ref().display());
    parse_with_config(&contents, config)
}

/// Write a document to a file.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> Result<(), hydroini::IniError> {
/// let mut doc = hydroini::Document::new();
/// doc.push_block("General")
///     .push_entry("fileVersion", "1.01")
///     .push_entry("fileType", "boundConds");
///
/// hydroini::write(&doc, "boundaryconditions.bc")?;
/// # Ok(())
/// # }
/// ```
pub fn write<P: AsRef<Path>>(document: &Document, path: P) -> Result<()> {
    write_with_options(document, path, &WriteOptions::default())
}

/// Write a document to a file with specific options.
pub fn write_with_options<P: AsRef<Path>>(
    document: &Document,
    path: P,
    options: &WriteOptions,
) -> Result<()> {
    let path = path.as_ref();

    if !options.force && path.exists() {
        return Err(IniError::FileAlreadyExists(path.to_path_buf()));
    }

    let formatted = render_with_options(document, options)?;
    let mut file = fs_err::File::create(path)?;
    file.write_all(formatted.as_bytes())?;
    Ok(())
}

/// Write a document to any writer implementing the Write trait.
pub fn write_to_writer<W: Write>(
    document: &Document,
    writer: &mut W,
    options: &WriteOptions,
) -> Result<()> {
    let formatted = render_with_options(document, options)?;
    writer.write_all(formatted.as_bytes())?;
    Ok(())
}

/// Options for controlling output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Force overwrite existing files
    pub force: bool,
    /// Spaces before `[header]`
    pub section_indent: usize,
    /// Spaces before `key = value`
    pub property_indent: usize,
    /// Spaces before each table row
    pub datablock_indent: usize,
    /// Minimum spaces between table columns
    pub datablock_spacing: usize,
    /// Pad keys to the widest key of the block and values to the widest
    /// commented value
    pub align_values: bool,
    /// Drop inline comments that are empty
    pub skip_empty_comments: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            force: false,
            section_indent: 0,
            property_indent: 4,
            datablock_indent: 4,
            datablock_spacing: 4,
            align_values: true,
            skip_empty_comments: false,
        }
    }
}

#[cfg(feature = "json")]
/// Convert a document to JSON string.
pub fn to_json(document: &Document) -> Result<String> {
    serde_json::to_string_pretty(document).map_err(IniError::from)
}

#[cfg(feature = "json")]
/// Parse a document from JSON string.
pub fn from_json(json: &str) -> Result<Document> {
    serde_json::from_str(json).map_err(IniError::from)
}

#[cfg(feature = "yaml")]
/// Convert a document to YAML string.
pub fn to_yaml(document: &Document) -> Result<String> {
    serde_yaml::to_string(document).map_err(IniError::from)
}

#[cfg(feature = "yaml")]
/// Parse a document from YAML string.
pub fn from_yaml(yaml: &str) -> Result<Document> {
    serde_yaml::from_str(yaml).map_err(IniError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[General]
fileVersion = 1.01
fileType = boundConds

[Forcing]
name = left
function = constant
quantity = waterlevelbnd
unit = m
1.5
";

    #[test]
    fn test_parse_and_render() {
        let doc = parse(SAMPLE).unwrap();
        let rendered = render(&doc).unwrap();
        assert!(rendered.contains("[Forcing]\n    name     = left\n"));
        assert!(rendered.ends_with("    unit     = m\n    1.5\n"));
        assert_eq!(parse(&rendered).unwrap(), doc);
    }

    #[test]
    fn test_render_is_idempotent() {
        let once = render(&parse(SAMPLE).unwrap()).unwrap();
        let twice = render(&parse(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_interpret_and_project() {
        let registry = bc::registry().unwrap();
        let doc = parse(SAMPLE).unwrap();
        let records = interpret(&doc, registry).unwrap();
        assert_eq!(records[1].variant(), Some("constant"));
        assert_eq!(project(&records, registry).unwrap(), doc);
    }

    #[test]
    fn test_write_to_writer() {
        let doc = parse(SAMPLE).unwrap();
        let mut output = Vec::new();
        write_to_writer(&doc, &mut output, &WriteOptions::default()).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), render(&doc).unwrap());
    }

    #[test]
    fn test_unwritable_value_is_reported() {
        let mut doc = Document::new();
        doc.push_block("Forcing").push_entry("unit", "#/s");
        assert_eq!(render(&doc).unwrap_err().category(), "unwritable");

        let mut output = Vec::new();
        assert!(write_to_writer(&doc, &mut output, &WriteOptions::default()).is_err());
        assert!(output.is_empty());
    }

    #[test]
    fn test_section_indent() {
        let options = WriteOptions {
            section_indent: 2,
            property_indent: 6,
            ..WriteOptions::default()
        };
        let doc = parse("[General]\nfileVersion = 1.01\n").unwrap();
        assert_eq!(
            render_with_options(&doc, &options).unwrap(),
            "  [General]\n      fileVersion = 1.01\n"
        );
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_round_trip() {
        let doc = parse(SAMPLE).unwrap();
        let json = to_json(&doc).unwrap();
        assert!(json.contains("\"header\": \"Forcing\""));
        assert_eq!(from_json(&json).unwrap(), doc);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_round_trip() {
        let doc = parse(SAMPLE).unwrap();
        let yaml = to_yaml(&doc).unwrap();
        assert_eq!(from_yaml(&yaml).unwrap(), doc);
    }
}
