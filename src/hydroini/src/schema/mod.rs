// hydroini/src/schema/mod.rs

//! Typed interpretation of blocks.
//!
//! A [`SchemaRegistry`] maps a block header, and for discriminated types the
//! value of the discriminator field, to a [`Schema`]. [`build`] turns a block
//! into a [`TypedRecord`] under that schema and [`flatten`] turns the record
//! back into an equal block.

pub mod builder;
pub mod record;
pub mod registry;
pub mod spec;
pub mod table;

pub use builder::{
    build, flatten, flatten_with_options, interpret, interpret_collecting, project,
    project_with_options, FlattenOptions,
};
pub use record::{TypedRecord, TypedValue, ValueOrigin};
pub use registry::SchemaRegistry;
pub use spec::{Comparison, Condition, FieldRule, FieldSpec, Schema, TableRule};
pub use table::{Cell, DataTable};
