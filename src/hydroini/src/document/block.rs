// hydroini/src/document/block.rs

//! Block and entry data structures.

use crate::error::{IniError, Result};
use crate::field_types::parse_float;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Written form of a comment. Text already starting with `#` is kept as is,
/// other text gets a `# ` marker.
pub fn to_comment<S: Into<String>>(text: S) -> String {
    let text = text.into();
    if text.starts_with('#') {
        text
    } else if text.is_empty() {
        "#".to_string()
    } else {
        format!("# {}", text)
    }
}

/// Comment text without its `#` marker and the whitespace after it.
pub fn comment_text(comment: &str) -> &str {
    comment.strip_prefix('#').unwrap_or(comment).trim_start()
}

/// A single `key = value` line of a block.
///
/// `value` is raw text. An empty value (key present, nothing after `=`) is
/// distinct from the key being absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub value: String,
    /// Inline comment as written, leading `#` included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Entry {
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            comment: None,
        }
    }

    /// Attach an inline comment; a `# ` marker is added unless present.
    pub fn with_comment<C: Into<String>>(mut self, comment: C) -> Self {
        self.comment = Some(to_comment(comment));
        self
    }

    /// Inline comment without its `#` marker.
    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref().map(comment_text)
    }

    /// Case-insensitive key comparison.
    pub fn is_key(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

/// A comment-only line inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockComment {
    /// Number of entries preceding the comment
    pub position: usize,
    /// The line as written, leading `#` included
    pub text: String,
}

impl BlockComment {
    pub fn body(&self) -> &str {
        comment_text(&self.text)
    }
}

/// One `[Header]` section: ordered entries (keys may repeat) followed by an
/// optional table of whitespace-delimited rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    header: String,
    entries: Vec<Entry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    comments: Vec<BlockComment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    trailing_rows: Vec<Vec<String>>,
}

impl Block {
    /// Create a new empty block.
    pub fn new<S: Into<String>>(header: S) -> Self {
        Self {
            header: header.into(),
            entries: Vec::new(),
            comments: Vec::new(),
            trailing_rows: Vec::new(),
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    /// Case-insensitive header comparison.
    pub fn is_header(&self, header: &str) -> bool {
        self.header.eq_ignore_ascii_case(header)
    }

    /// Append an entry. Existing entries with the same key are never replaced.
    pub fn push_entry<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> &mut Self {
        self.entries.push(Entry::new(key, value));
        self
    }

    /// Append an entry with an inline comment.
    pub fn push_entry_with_comment<K, V, C>(&mut self, key: K, value: V, comment: C) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
        C: Into<String>,
    {
        self.entries
            .push(Entry::new(key, value).with_comment(comment));
        self
    }

    pub fn push(&mut self, entry: Entry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    /// Add a comment-only line after the entries pushed so far.
    pub fn push_comment<S: Into<String>>(&mut self, text: S) -> &mut Self {
        self.comments.push(BlockComment {
            position: self.entries.len(),
            text: to_comment(text),
        });
        self
    }

    pub(crate) fn set_comments(&mut self, comments: Vec<BlockComment>) {
        self.comments = comments;
    }

    /// Append a table row. Every row must have as many tokens as the first.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<&mut Self> {
        if let Some(first) = self.trailing_rows.first() {
            if first.len() != row.len() {
                return Err(IniError::format_error(
                    format!(
                        "inconsistent table width in [{}]: expected {} values, got {}",
                        self.header,
                        first.len(),
                        row.len()
                    ),
                    0,
                ));
            }
        }
        self.trailing_rows.push(row);
        Ok(self)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut Vec<Entry> {
        &mut self.entries
    }

    pub fn comments(&self) -> &[BlockComment] {
        &self.comments
    }

    pub fn trailing_rows(&self) -> &[Vec<String>] {
        &self.trailing_rows
    }

    pub fn has_rows(&self) -> bool {
        !self.trailing_rows.is_empty()
    }

    /// First entry with the given key.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.is_key(key))
    }

    /// First value for the given key.
    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.get(key).map(|e| e.value.as_str())
    }

    /// All entries with the given key, in file order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Entry> + 'a {
        self.entries.iter().filter(move |e| e.is_key(key))
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Trailing rows parsed as numbers.
    pub fn numeric_rows(&self) -> Result<Vec<Vec<f64>>> {
        self.trailing_rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .map(|token| {
                        parse_float(token).ok_or_else(|| {
                            IniError::type_coercion(
                                format!("row {}", i + 1),
                                token.clone(),
                                "float".to_string(),
                            )
                            .in_block(&self.header, None)
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.to_ini_string(&crate::WriteOptions::default());
        write!(f, "{}", rendered)
    }
}
