// hydroini/src/schema/builder.rs

//! Conversion between raw blocks and typed records.

use super::record::{Slot, TypedRecord, TypedValue, ValueOrigin};
use super::registry::SchemaRegistry;
use super::spec::{FieldSpec, Schema};
use super::table::DataTable;
use crate::document::{Block, BlockComment, Document};
use crate::error::{IniError, Result};
use crate::field_types::{coerce, parse_float_list_with, FieldType, FieldValue};
use std::collections::HashSet;
use std::sync::Arc;

/// Options for turning typed records back into blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Write fields that only hold their schema default
    pub write_defaults: bool,
}

/// Build a typed record from a block.
///
/// Fails when the block belongs to another type or variant, when a
/// non-repeatable field repeats, when a required field is missing, when a
/// value does not fit its type, when paired fields have different counts or
/// when the table rule is violated. Keys the schema does not declare are
/// kept as extras.
pub fn build(block: &Block, schema: &Arc<Schema>) -> Result<TypedRecord> {
    let header = block.header();
    let variant = schema.variant();

    if !block.is_header(schema.type_name()) {
        return Err(IniError::UnknownBlockType {
            header: header.to_string(),
            block_index: None,
        });
    }

    if let Some((field, expected)) = schema.discriminator() {
        match block.get_value(field) {
            None => {
                return Err(IniError::missing_field(
                    field.to_string(),
                    header.to_string(),
                    Some(expected.to_string()),
                ))
            }
            Some(found) if !found.trim().eq_ignore_ascii_case(expected) => {
                return Err(IniError::UnknownVariant {
                    type_name: schema.type_name().to_string(),
                    field: field.to_string(),
                    value: found.to_string(),
                    block_index: None,
                })
            }
            Some(_) => {}
        }
    }

    let mut record = TypedRecord::empty(Arc::clone(schema), header);

    for entry in block.entries() {
        match schema.field_spec(&entry.key) {
            Some((name, spec)) => {
                let value = coerce_entry(name, spec, &entry.value)
                    .map_err(|err| err.in_block(header, variant))?;
                if let Some(values) = record.values.get_mut(name) {
                    record.layout.push(Slot::Field {
                        name: name.to_string(),
                        index: values.len(),
                    });
                    values.push(TypedValue::parsed(
                        &entry.key,
                        &entry.value,
                        value,
                        entry.comment.clone(),
                    ));
                }
            }
            None => {
                log::warn!(
                    "keeping unknown key '{}' of [{}]{} as extra",
                    entry.key,
                    header,
                    variant.map(|v| format!(" ({})", v)).unwrap_or_default()
                );
                record.layout.push(Slot::Extra(record.extras.len()));
                record.extras.push(entry.clone());
            }
        }
    }

    record.apply_defaults();
    record.comments = block.comments().to_vec();
    if block.has_rows() {
        record.table = Some(DataTable::from_rows(block.trailing_rows())?);
    }
    record.validate()?;

    log::debug!(
        "built [{}]{}: {} entries, {} extras, {} rows",
        header,
        variant.map(|v| format!(" ({})", v)).unwrap_or_default(),
        block.entries().len(),
        record.extras.len(),
        record.table.as_ref().map_or(0, DataTable::row_count)
    );
    Ok(record)
}

/// Coerce one entry; an empty value of a typed field takes the field default.
fn coerce_entry(name: &str, spec: &FieldSpec, raw: &str) -> Result<FieldValue> {
    let untyped = matches!(spec.expected_type, FieldType::Text | FieldType::FloatList);
    match (&spec.default, &spec.expected_type, spec.list_delimiter) {
        (Some(default), _, _) if raw.trim().is_empty() && !untyped => Ok(default.clone()),
        (_, FieldType::FloatList, Some(delimiter)) => {
            parse_float_list_with(raw, Some(delimiter))
                .map(FieldValue::FloatList)
                .ok_or_else(|| {
                    IniError::type_coercion(
                        name.to_string(),
                        raw.to_string(),
                        spec.expected_type.name(),
                    )
                })
        }
        _ => coerce(name, raw, &spec.expected_type),
    }
}

/// Flatten a record back into a block with default options.
pub fn flatten(record: &TypedRecord, schema: &Schema) -> Result<Block> {
    flatten_with_options(record, schema, &FlattenOptions::default())
}

/// Flatten a record back into a block.
///
/// Entries are written in their recorded order, with unmodified values in
/// their original text. Values added since the record was built follow in
/// declaration order, paired fields interleaved.
///
/// Fails when the record does not validate or when a value, comment or row
/// would read back as something else.
pub fn flatten_with_options(
    record: &TypedRecord,
    schema: &Schema,
    options: &FlattenOptions,
) -> Result<Block> {
    if !schema.type_name().eq_ignore_ascii_case(record.type_name()) {
        return Err(IniError::UnknownBlockType {
            header: record.header().to_string(),
            block_index: None,
        });
    }
    if let Some((field, expected)) = schema.discriminator() {
        let actual = record.get_str(field).unwrap_or_default().trim();
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(IniError::UnknownVariant {
                type_name: schema.type_name().to_string(),
                field: field.to_string(),
                value: actual.to_string(),
                block_index: None,
            });
        }
    }
    record.validate()?;

    let writable =
        |value: &TypedValue| options.write_defaults || value.origin() != ValueOrigin::Default;
    let entry = |name: &str, value: &TypedValue| {
        value.to_entry(record.schema().field_spec(name).map(|(_, spec)| spec))
    };

    let mut block = Block::new(record.header());
    let mut written: HashSet<(String, usize)> = HashSet::new();
    let mut positions = Vec::with_capacity(record.layout.len());

    for slot in &record.layout {
        positions.push(block.entries().len());
        match slot {
            Slot::Field { name, index } => {
                if let Some(value) = record.values.get(name).and_then(|v| v.get(*index)) {
                    if writable(value) {
                        block.push(entry(name.as_str(), value));
                    }
                    written.insert((name.clone(), *index));
                }
            }
            Slot::Extra(index) => {
                if let Some(entry) = record.extras.get(*index) {
                    block.push(entry.clone());
                }
            }
        }
    }
    let layout_end = block.entries().len();

    let pending = |name: &str| -> Vec<&TypedValue> {
        record
            .values
            .get(name)
            .map(|values| {
                values
                    .iter()
                    .enumerate()
                    .filter(|(i, v)| !written.contains(&(name.to_string(), *i)) && writable(v))
                    .map(|(_, v)| v)
                    .collect()
            })
            .unwrap_or_default()
    };

    let mut handled: HashSet<String> = HashSet::new();
    for (name, _) in record.schema().fields() {
        if !handled.insert(name.to_ascii_lowercase()) {
            continue;
        }
        let first = pending(name);
        let second = match record.schema().partner(name) {
            Some(partner) => {
                handled.insert(partner.to_ascii_lowercase());
                pending(partner)
            }
            None => Vec::new(),
        };
        for i in 0..first.len().max(second.len()) {
            if let Some(value) = first.get(i) {
                block.push(entry(name, value));
            }
            if let (Some(partner), Some(value)) = (record.schema().partner(name), second.get(i)) {
                block.push(entry(partner, value));
            }
        }
    }

    let comments = record
        .comments
        .iter()
        .map(|comment| BlockComment {
            position: positions
                .get(comment.position)
                .copied()
                .unwrap_or(layout_end),
            text: comment.text.clone(),
        })
        .collect();
    block.set_comments(comments);

    if let Some(table) = &record.table {
        for row in table.to_raw_rows() {
            block.push_row(row)?;
        }
    }
    block.check()?;
    Ok(block)
}

/// Interpret every block of a document, failing on the first error.
pub fn interpret(document: &Document, registry: &SchemaRegistry) -> Result<Vec<TypedRecord>> {
    document
        .blocks()
        .iter()
        .enumerate()
        .map(|(index, block)| interpret_block(block, registry).map_err(|err| err.at_block(index)))
        .collect()
}

/// Interpret every block of a document, returning every record that could
/// be built together with the errors of the blocks that could not.
pub fn interpret_collecting(
    document: &Document,
    registry: &SchemaRegistry,
) -> (Vec<TypedRecord>, Vec<IniError>) {
    let mut records = Vec::new();
    let mut errors = Vec::new();
    for (index, block) in document.blocks().iter().enumerate() {
        match interpret_block(block, registry) {
            Ok(record) => records.push(record),
            Err(err) => {
                let err = err.at_block(index);
                log::warn!("skipping block #{} [{}]: {}", index, block.header(), err);
                errors.push(err);
            }
        }
    }
    (records, errors)
}

fn interpret_block(block: &Block, registry: &SchemaRegistry) -> Result<TypedRecord> {
    let schema = registry.resolve(block)?;
    build(block, &schema)
}

/// Turn typed records back into a document.
pub fn project(records: &[TypedRecord], registry: &SchemaRegistry) -> Result<Document> {
    project_with_options(records, registry, &FlattenOptions::default())
}

pub fn project_with_options(
    records: &[TypedRecord],
    registry: &SchemaRegistry,
    options: &FlattenOptions,
) -> Result<Document> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            registry
                .schema(record.type_name(), record.variant())
                .and_then(|schema| flatten_with_options(record, &schema, options))
                .map_err(|err| err.at_block(index))
        })
        .collect()
}
