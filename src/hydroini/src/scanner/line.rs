// hydroini/src/scanner/line.rs

//! Classified lines produced by the lexer.

use std::fmt;

/// A classified physical line.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// What the line contains
    pub kind: LineKind,
    /// Line number (1-based)
    pub number: usize,
}

impl Line {
    pub fn new(kind: LineKind, number: usize) -> Self {
        Self { kind, number }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.number, self.kind)
    }
}

/// The kinds of lines that can appear in a model file.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// Empty or whitespace-only line
    Blank,
    /// Comment-only line, verbatim (leading `#` included)
    Comment(String),
    /// Section header, the text inside `[...]`
    Header(String),
    /// `key = value` line with its inline comment verbatim (leading `#` included)
    KeyValue {
        key: String,
        value: String,
        comment: Option<String>,
    },
    /// Whitespace-separated tokens with no top-level `=`
    Data(Vec<String>),
}

impl LineKind {
    pub fn is_blank(&self) -> bool {
        matches!(self, LineKind::Blank)
    }

    pub fn is_header(&self) -> bool {
        matches!(self, LineKind::Header(_))
    }
}
