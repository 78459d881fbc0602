// hydroini/src/schema/registry.rs

//! Mapping from block headers and discriminator values to schemas.
//!
//! A registry is populated once and only read afterwards, so lookups from
//! several threads need no locking.

use super::spec::Schema;
use crate::document::Block;
use crate::error::{IniError, Result};
use linked_hash_map::LinkedHashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct BlockType {
    type_name: String,
    discriminator: Option<String>,
    variants: Vec<Arc<Schema>>,
}

impl BlockType {
    fn variant(&self, value: &str) -> Option<&Arc<Schema>> {
        self.variants.iter().find(|schema| {
            schema
                .variant()
                .map_or(false, |v| v.eq_ignore_ascii_case(value.trim()))
        })
    }
}

/// Registered block types, keyed case-insensitively by header.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    types: LinkedHashMap<String, BlockType>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block type.
    ///
    /// With a discriminator field every variant is keyed by its discriminator
    /// value, which must be unique within the type and must be a declared
    /// field of the variant. Without one exactly one schema is expected.
    pub fn register(
        &mut self,
        type_name: &str,
        discriminator: Option<&str>,
        variants: Vec<(String, Schema)>,
    ) -> Result<&mut Self> {
        let key = type_name.to_ascii_lowercase();
        if self.types.contains_key(&key) {
            return Err(IniError::schema_conflict(
                type_name.to_string(),
                "block type is already registered".to_string(),
            ));
        }

        let mut registered: Vec<Arc<Schema>> = Vec::with_capacity(variants.len());
        match discriminator {
            None => {
                if variants.len() != 1 {
                    return Err(IniError::schema_conflict(
                        type_name.to_string(),
                        format!(
                            "expected exactly one schema without a discriminator, got {}",
                            variants.len()
                        ),
                    ));
                }
                for (_, schema) in variants {
                    check_type_name(type_name, &schema)?;
                    registered.push(Arc::new(schema));
                }
            }
            Some(field) => {
                if variants.is_empty() {
                    return Err(IniError::schema_conflict(
                        type_name.to_string(),
                        "no variants given".to_string(),
                    ));
                }
                for (value, mut schema) in variants {
                    check_type_name(type_name, &schema)?;
                    if schema.field_spec(field).is_none() {
                        return Err(IniError::schema_conflict(
                            type_name.to_string(),
                            format!(
                                "variant '{}' does not declare discriminator field '{}'",
                                value, field
                            ),
                        ));
                    }
                    if registered
                        .iter()
                        .any(|s| s.variant().map_or(false, |v| v.eq_ignore_ascii_case(&value)))
                    {
                        return Err(IniError::schema_conflict(
                            type_name.to_string(),
                            format!("duplicate discriminator value '{}'", value),
                        ));
                    }
                    schema.set_discriminator(field, &value);
                    registered.push(Arc::new(schema));
                }
            }
        }

        log::debug!(
            "registered block type [{}] with {} schema(s)",
            type_name,
            registered.len()
        );
        self.types.insert(
            key,
            BlockType {
                type_name: type_name.to_string(),
                discriminator: discriminator.map(str::to_string),
                variants: registered,
            },
        );
        Ok(self)
    }

    /// Register a block type without variants.
    pub fn register_single(&mut self, schema: Schema) -> Result<&mut Self> {
        let type_name = schema.type_name().to_string();
        self.register(&type_name, None, vec![(String::new(), schema)])
    }

    /// Select the schema for a block by its header and discriminator value.
    pub fn resolve(&self, block: &Block) -> Result<Arc<Schema>> {
        let block_type = self.block_type(block.header())?;
        let schema = match &block_type.discriminator {
            None => block_type.variants.first(),
            Some(field) => {
                let value = block.get_value(field).ok_or_else(|| {
                    IniError::missing_field(field.clone(), block.header().to_string(), None)
                })?;
                let schema = block_type.variant(value);
                if schema.is_none() {
                    return Err(IniError::UnknownVariant {
                        type_name: block_type.type_name.clone(),
                        field: field.clone(),
                        value: value.to_string(),
                        block_index: None,
                    });
                }
                schema
            }
        };

        let schema = schema.ok_or_else(|| unknown_block(block.header()))?;
        log::debug!(
            "resolved [{}] to schema {}{}",
            block.header(),
            schema.type_name(),
            schema
                .variant()
                .map(|v| format!(" ({})", v))
                .unwrap_or_default()
        );
        Ok(Arc::clone(schema))
    }

    /// Look up a schema by type name and, for discriminated types, variant.
    pub fn schema(&self, type_name: &str, variant: Option<&str>) -> Result<Arc<Schema>> {
        let block_type = self.block_type(type_name)?;
        let schema = match (&block_type.discriminator, variant) {
            (None, _) => block_type.variants.first(),
            (Some(field), None) => {
                return Err(IniError::missing_field(
                    field.clone(),
                    block_type.type_name.clone(),
                    None,
                ))
            }
            (Some(field), Some(value)) => {
                let schema = block_type.variant(value);
                if schema.is_none() {
                    return Err(IniError::UnknownVariant {
                        type_name: block_type.type_name.clone(),
                        field: field.clone(),
                        value: value.to_string(),
                        block_index: None,
                    });
                }
                schema
            }
        };
        schema
            .map(Arc::clone)
            .ok_or_else(|| unknown_block(type_name))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(&type_name.to_ascii_lowercase())
    }

    /// Registered type names in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.values().map(|t| t.type_name.as_str())
    }

    /// Registered discriminator values of a type.
    pub fn variants(&self, type_name: &str) -> Vec<&str> {
        self.types
            .get(&type_name.to_ascii_lowercase())
            .map(|t| t.variants.iter().filter_map(|s| s.variant()).collect())
            .unwrap_or_default()
    }

    fn block_type(&self, header: &str) -> Result<&BlockType> {
        self.types
            .get(&header.to_ascii_lowercase())
            .ok_or_else(|| unknown_block(header))
    }
}

fn unknown_block(header: &str) -> IniError {
    IniError::UnknownBlockType {
        header: header.to_string(),
        block_index: None,
    }
}

fn check_type_name(type_name: &str, schema: &Schema) -> Result<()> {
    if schema.type_name().eq_ignore_ascii_case(type_name) {
        Ok(())
    } else {
        Err(IniError::schema_conflict(
            type_name.to_string(),
            format!("schema is declared for [{}]", schema.type_name()),
        ))
    }
}
