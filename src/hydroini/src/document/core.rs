// hydroini/src/document/core.rs

//! Core Document struct and basic operations.

use super::block::{to_comment, Block};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete model file: an ordered sequence of blocks.
///
/// Header names are not unique; several `[Forcing]` blocks may share one
/// file and their relative order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Comment-only lines before the first header
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    preamble: Vec<String>,
    blocks: Vec<Block>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block and return a mutable reference to it.
    pub fn push(&mut self, block: Block) -> &mut Block {
        self.blocks.push(block);
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }

    /// Append a new empty block with the given header.
    pub fn push_block<S: Into<String>>(&mut self, header: S) -> &mut Block {
        self.push(Block::new(header))
    }

    /// Add a comment line before the first block; a `# ` marker is added
    /// unless present.
    pub fn push_preamble<S: Into<String>>(&mut self, comment: S) {
        self.preamble.push(to_comment(comment));
    }

    pub fn preamble(&self) -> &[String] {
        &self.preamble
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    /// All blocks with the given header (case-insensitive), in file order.
    pub fn blocks_named<'a>(&'a self, header: &'a str) -> impl Iterator<Item = &'a Block> + 'a {
        self.blocks.iter().filter(move |b| b.is_header(header))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }
}

impl FromIterator<Block> for Document {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        Self {
            preamble: Vec::new(),
            blocks: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.to_ini_string(&crate::WriteOptions::default());
        write!(f, "{}", rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_named_is_non_unique() {
        let mut doc = Document::new();
        doc.push_block("General").push_entry("fileVersion", "1.01");
        doc.push_block("Forcing").push_entry("name", "a");
        doc.push_block("forcing").push_entry("name", "b");

        let names: Vec<_> = doc
            .blocks_named("FORCING")
            .filter_map(|b| b.get_value("name"))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_from_iterator() {
        let doc: Document = vec![Block::new("A"), Block::new("B")].into_iter().collect();
        let headers: Vec<_> = doc.blocks().iter().map(|b| b.header()).collect();
        assert_eq!(headers, vec!["A", "B"]);
        assert!(doc.preamble().is_empty());
    }
}
