// hydroini/src/document/mod.rs

//! Raw document model: documents, blocks and entries.
//!
//! These are untyped snapshots of a file. Duplicate keys are kept as
//! repeated entries and table rows stay as text until a schema interprets
//! them.

pub mod block;
pub mod core;
pub mod formatting;

pub use self::core::Document;
pub use block::{comment_text, to_comment, Block, BlockComment, Entry};
