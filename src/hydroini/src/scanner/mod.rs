// hydroini/src/scanner/mod.rs

//! Line classification for block-structured model files.
//!
//! Every physical line is classified on its own as blank, comment-only,
//! section header, `key = value` or a whitespace-delimited data row. Grouping
//! lines into blocks is the parser's job.

pub mod lexer;
pub mod line;

pub use lexer::Lexer;
pub use line::{Line, LineKind};

use crate::error::Result;

/// Convenience function to classify every line of a string.
pub fn scan(input: &str) -> Result<Vec<Line>> {
    let lexer = Lexer::new();
    input
        .lines()
        .enumerate()
        .map(|(index, text)| lexer.classify(text, index + 1))
        .collect()
}
