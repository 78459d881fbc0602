// hydroini/src/bc/mod.rs

//! Boundary-conditions files (`.bc`).
//!
//! A `.bc` file holds one `[General]` block followed by any number of
//! `[Forcing]` blocks. The `function` key of a forcing selects its variant:
//!
//! ```text
//! [Forcing]
//!     name              = left01
//!     function          = timeseries
//!     timeInterpolation = linear
//!     quantity          = time
//!     unit              = minutes since 2015-01-01 00:00:00
//!     quantity          = dischargebnd
//!     unit              = m3/s
//!       0.0    1.23
//!      60.0    2.34
//! ```

pub mod forcing;
pub mod model;

pub use forcing::{
    Forcing, ForcingFunction, QuantityUnit, TimeInterpolation, VerticalInterpolation,
    VerticalPositionType,
};
pub use model::{ForcingModel, General};

use crate::error::Result;
use crate::field_types::FieldType;
use crate::schema::{FieldSpec, Schema, SchemaRegistry, TableRule};
use lazy_static::lazy_static;
use strum::IntoEnumIterator;

pub const GENERAL: &str = "General";
pub const FORCING: &str = "Forcing";
/// Discriminator field of `[Forcing]` blocks
pub const FUNCTION: &str = "function";

pub const FILE_VERSION: &str = "1.01";
pub const FILE_TYPE: &str = "boundConds";

lazy_static! {
    static ref REGISTRY: Result<SchemaRegistry> = build_registry();
}

/// The shared registry of `.bc` block types.
pub fn registry() -> Result<&'static SchemaRegistry> {
    REGISTRY.as_ref().map_err(Clone::clone)
}

/// Build a fresh registry of `.bc` block types, e.g. to register more types
/// on top of it.
pub fn build_registry() -> Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    registry.register_single(general_schema())?;

    let float_default = |value: f64| FieldSpec::optional(FieldType::Float).with_default(value);
    let text = || FieldType::Text;

    let variants = vec![
        (
            "timeseries",
            forcing_schema(
                vec![
                    (
                        "timeInterpolation",
                        FieldSpec::required(choice_of::<TimeInterpolation>()),
                    ),
                    ("offset", float_default(0.0)),
                    ("factor", float_default(1.0)),
                ],
                text(),
                TableRule::Required,
            ),
        ),
        (
            "harmonic",
            forcing_schema(vec![("factor", float_default(1.0))], text(), TableRule::Optional),
        ),
        (
            "astronomic",
            forcing_schema(vec![("factor", float_default(1.0))], text(), TableRule::Optional),
        ),
        (
            "harmoniccorrection",
            forcing_schema(vec![], text(), TableRule::Optional),
        ),
        (
            "astronomiccorrection",
            forcing_schema(vec![], text(), TableRule::Optional),
        ),
        (
            "t3d",
            forcing_schema(
                vec![
                    ("offset", float_default(0.0)),
                    ("factor", float_default(1.0)),
                    ("verticalPositions", FieldSpec::required(FieldType::FloatList)),
                    (
                        "verticalInterpolation",
                        FieldSpec::required(choice_of::<VerticalInterpolation>()),
                    ),
                    (
                        "verticalPositionType",
                        FieldSpec::required(choice_of::<VerticalPositionType>()),
                    ),
                ],
                text(),
                TableRule::Optional,
            ),
        ),
        (
            "qhtable",
            forcing_schema(
                vec![],
                FieldType::choice(&["qhbnd discharge", "qhbnd waterlevel"]),
                TableRule::Optional,
            ),
        ),
        (
            "constant",
            forcing_schema(
                vec![("offset", float_default(0.0)), ("factor", float_default(1.0))],
                text(),
                TableRule::Optional,
            ),
        ),
    ];

    registry.register(
        FORCING,
        Some(FUNCTION),
        variants
            .into_iter()
            .map(|(function, schema)| (function.to_string(), schema))
            .collect(),
    )?;
    Ok(registry)
}

fn general_schema() -> Schema {
    Schema::new(GENERAL)
        .field(
            "fileVersion",
            FieldSpec::optional(FieldType::Text).with_default(FILE_VERSION),
        )
        .field(
            "fileType",
            FieldSpec::optional(FieldType::choice(&[FILE_TYPE])).with_default(FILE_TYPE),
        )
        .with_table(TableRule::Forbidden)
}

/// Common forcing fields with the variant parameters between `function` and
/// the quantity/unit pairs, the order forcings are usually written in.
fn forcing_schema(
    parameters: Vec<(&str, FieldSpec)>,
    quantity: FieldType,
    table: TableRule,
) -> Schema {
    let mut schema = Schema::new(FORCING)
        .field("name", FieldSpec::required(FieldType::Text))
        .field(FUNCTION, FieldSpec::required(FieldType::Text));
    for (name, spec) in parameters {
        schema = schema.field(name, spec);
    }
    schema
        .field("quantity", FieldSpec::required(quantity).repeatable().min_count(1))
        .field(
            "unit",
            FieldSpec::required(FieldType::Text).repeatable().min_count(1),
        )
        .paired("quantity", "unit")
        .with_table(table)
}

fn choice_of<E: IntoEnumIterator + AsRef<str>>() -> FieldType {
    FieldType::Choice(E::iter().map(|e| e.as_ref().to_string()).collect())
}
