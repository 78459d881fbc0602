// hydroini/src/field_types/mod.rs

//! Typed field values and their conversion from and to raw entry text.

pub mod conversion;
pub mod formatting;
pub mod parsing;
pub mod value;


pub use formatting::{format_float, format_float_list};
pub use parsing::{
    coerce, parse_bool, parse_float, parse_float_list, parse_float_list_with, parse_integer,
};
pub use value::{FieldType, FieldValue};
