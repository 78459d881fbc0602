// hydroini/src/parser.rs

//! Line-fed block reader.
//!
//! Lines are fed one at a time. A header starts a new block and closes the
//! previous one; key-value lines append entries in file order without ever
//! replacing an earlier entry with the same key; other lines become table
//! rows of the current block.

use crate::document::{Block, BlockComment, Document, Entry};
use crate::error::{IniError, Result};
use crate::scanner::{Lexer, LineKind};

/// Options controlling what the parser accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Accept whitespace-delimited table rows after the key-value lines
    pub parse_datablocks: bool,
    /// Treat `#` as a comment delimiter and keep comments
    pub parse_comments: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            parse_datablocks: true,
            parse_comments: true,
        }
    }
}

#[derive(Debug)]
struct PendingBlock {
    block: Block,
    comments: Vec<BlockComment>,
    start_line: usize,
    in_table: bool,
}

impl PendingBlock {
    fn new(header: String, start_line: usize) -> Self {
        Self {
            block: Block::new(header),
            comments: Vec::new(),
            start_line,
            in_table: false,
        }
    }

    fn close(mut self, end_line: usize) -> Block {
        log::debug!(
            "parsed block [{}] at lines {}-{}: {} entries, {} rows",
            self.block.header(),
            self.start_line,
            end_line,
            self.block.entries().len(),
            self.block.trailing_rows().len()
        );
        self.block.set_comments(self.comments);
        self.block
    }
}

/// Incremental parser turning lines into a [`Document`].
#[derive(Debug)]
pub struct Parser {
    config: ParserConfig,
    lexer: Lexer,
    document: Document,
    current: Option<PendingBlock>,
    line_number: usize,
    collect_errors: bool,
    skipping: bool,
    errors: Vec<IniError>,
}

impl Parser {
    /// Create a fail-fast parser.
    pub fn new(config: ParserConfig) -> Self {
        let lexer = Lexer::new().with_comments(config.parse_comments);
        Self {
            config,
            lexer,
            document: Document::new(),
            current: None,
            line_number: 0,
            collect_errors: false,
            skipping: false,
            errors: Vec::new(),
        }
    }

    /// Keep going after a malformed block instead of failing.
    ///
    /// The malformed block is dropped and reading resumes at the next header.
    pub fn collecting_errors(mut self) -> Self {
        self.collect_errors = true;
        self
    }

    /// Feed the next physical line.
    pub fn feed_line(&mut self, line: &str) -> Result<()> {
        self.line_number += 1;
        match self.process_line(line) {
            Ok(()) => Ok(()),
            Err(err) if self.collect_errors => {
                if let Some(pending) = self.current.take() {
                    log::warn!(
                        "skipping malformed block [{}] starting at line {}: {}",
                        pending.block.header(),
                        pending.start_line,
                        err
                    );
                } else {
                    log::warn!("skipping line {}: {}", self.line_number, err);
                }
                self.skipping = true;
                self.errors.push(err);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn process_line(&mut self, text: &str) -> Result<()> {
        // A header line, even a malformed one, ends the previous block.
        if text.trim_start().starts_with('[') {
            self.close_current(self.line_number - 1);
            self.skipping = false;
        }

        let line = self.lexer.classify(text, self.line_number)?;

        match line.kind {
            LineKind::Blank => Ok(()),
            LineKind::Header(name) => {
                self.current = Some(PendingBlock::new(name, line.number));
                Ok(())
            }
            _ if self.skipping => Ok(()),
            LineKind::Comment(text) => {
                match self.current.as_mut() {
                    Some(pending) => pending.comments.push(BlockComment {
                        position: pending.block.entries().len(),
                        text,
                    }),
                    None => self.document.push_preamble(text),
                }
                Ok(())
            }
            LineKind::KeyValue {
                key,
                value,
                comment,
            } => {
                let pending = self.current_block("key-value line")?;
                if pending.in_table {
                    return Err(IniError::format_error(
                        format!(
                            "key '{}' follows table data in [{}]",
                            key,
                            pending.block.header()
                        ),
                        line.number,
                    ));
                }
                pending.block.push(Entry {
                    key,
                    value,
                    comment,
                });
                Ok(())
            }
            LineKind::Data(tokens) => {
                let parse_datablocks = self.config.parse_datablocks;
                let pending = self.current_block("data line")?;
                if !parse_datablocks {
                    return Err(IniError::format_error(
                        format!(
                            "unexpected data line in [{}]: '{}'",
                            pending.block.header(),
                            tokens.join(" ")
                        ),
                        line.number,
                    ));
                }
                pending.in_table = true;
                pending.block.push_row(tokens).map_err(|err| match err {
                    IniError::Format { message, .. } => IniError::format_error(message, line.number),
                    other => other,
                })?;
                Ok(())
            }
        }
    }

    fn current_block(&mut self, what: &str) -> Result<&mut PendingBlock> {
        let line_number = self.line_number;
        self.current.as_mut().ok_or_else(|| {
            IniError::format_error(format!("{} outside of any [section]", what), line_number)
        })
    }

    fn close_current(&mut self, end_line: usize) {
        if let Some(pending) = self.current.take() {
            let block = pending.close(end_line);
            self.document.push(block);
        }
    }

    /// Close the last block and return the document.
    pub fn finalize(mut self) -> Document {
        self.close_current(self.line_number);
        self.document
    }

    /// Close the last block and return the document with every error seen.
    pub fn finalize_collecting(mut self) -> (Document, Vec<IniError>) {
        let errors = std::mem::take(&mut self.errors);
        (self.finalize(), errors)
    }
}

/// Parse text into a document, failing on the first malformed line.
pub fn parse(text: &str) -> Result<Document> {
    parse_with_config(text, ParserConfig::default())
}

/// Parse text with explicit parser options.
pub fn parse_with_config(text: &str, config: ParserConfig) -> Result<Document> {
    let mut parser = Parser::new(config);
    for line in text.lines() {
        parser.feed_line(line)?;
    }
    Ok(parser.finalize())
}

/// Parse text, dropping malformed blocks and returning their errors.
pub fn parse_collecting(text: &str) -> (Document, Vec<IniError>) {
    let mut parser = Parser::new(ParserConfig::default()).collecting_errors();
    for line in text.lines() {
        // Errors are recorded by the parser in collecting mode.
        let _ = parser.feed_line(line);
    }
    parser.finalize_collecting()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORCING: &str = "\
[General]
fileVersion = 1.01
fileType    = boundConds

[Forcing]
name     = left
function = timeseries
quantity = time
unit     = minutes since 2015-01-01 00:00:00
quantity = dischargebnd
unit     = m3/s
0.0    1.23
60.0   2.34
120.0  3.45
";

    #[test]
    fn test_parse_blocks_in_order() {
        let doc = parse(FORCING).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.blocks()[0].header(), "General");
        assert_eq!(doc.blocks()[1].header(), "Forcing");
        assert_eq!(doc.blocks()[1].entries().len(), 6);
        assert_eq!(doc.blocks()[1].trailing_rows().len(), 3);
    }

    #[test]
    fn test_duplicate_keys_are_not_overwritten() {
        let doc = parse(FORCING).unwrap();
        let block = &doc.blocks()[1];
        let keys: Vec<_> = block.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["name", "function", "quantity", "unit", "quantity", "unit"]
        );
        let units: Vec<_> = block.get_all("unit").map(|e| e.value.as_str()).collect();
        assert_eq!(units, vec!["minutes since 2015-01-01 00:00:00", "m3/s"]);
    }

    #[test]
    fn test_inline_comment_is_attached() {
        let doc = parse("[Output]\naveragingNumMin = 1   # Minimum number of points\n").unwrap();
        let entry = &doc.blocks()[0].entries()[0];
        assert_eq!(entry.value, "1");
        assert_eq!(entry.comment.as_deref(), Some("# Minimum number of points"));
        assert_eq!(entry.comment_text(), Some("Minimum number of points"));
    }

    #[test]
    fn test_comments_and_preamble() {
        let doc = parse("# file comment\n[A]\n# before x\nx = 1\n# after x\n").unwrap();
        assert_eq!(doc.preamble(), &["# file comment".to_string()]);
        let comments = doc.blocks()[0].comments();
        assert_eq!(comments.len(), 2);
        assert_eq!((comments[0].position, comments[0].body()), (0, "before x"));
        assert_eq!((comments[1].position, comments[1].text.as_str()), (1, "# after x"));
    }

    #[test]
    fn test_inconsistent_table_width() {
        let err = parse("[Forcing]\nname = a\n0 1 2\n3 4\n").unwrap_err();
        match err {
            IniError::Format { line, .. } => assert_eq!(line, 4),
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_block_with_only_rows() {
        let doc = parse("[Table]\n1 2\n3 4\n").unwrap();
        assert!(doc.blocks()[0].entries().is_empty());
        assert_eq!(doc.blocks()[0].trailing_rows().len(), 2);
    }

    #[test]
    fn test_content_outside_section() {
        assert!(parse("x = 1\n[A]\n").is_err());
        assert!(parse("1 2 3\n").is_err());
    }

    #[test]
    fn test_key_after_table_is_rejected() {
        let err = parse("[Forcing]\n0 1\nname = a\n").unwrap_err();
        assert_eq!(err.context().line, Some(3));
    }

    #[test]
    fn test_datablocks_disabled() {
        let config = ParserConfig {
            parse_datablocks: false,
            ..ParserConfig::default()
        };
        assert!(parse_with_config("[A]\nx = 1\n", config.clone()).is_ok());
        assert!(parse_with_config("[A]\n1 2\n", config).is_err());
    }

    #[test]
    fn test_collecting_mode_skips_malformed_block() {
        let text = "[A]\nx = 1\n[B]\n0 1 2\n0 1\ny = 2\n[C]\nz = 3\n[D\n";
        let (doc, errors) = parse_collecting(text);
        let headers: Vec<_> = doc.blocks().iter().map(|b| b.header()).collect();
        assert_eq!(headers, vec!["A", "C"]);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].context().line, Some(5));
        assert_eq!(errors[1].context().line, Some(9));
    }

    #[test]
    fn test_feed_line_incrementally() {
        let mut parser = Parser::new(ParserConfig::default());
        for line in ["[A]", "x = 1", "x = 2"] {
            parser.feed_line(line).unwrap();
        }
        let doc = parser.finalize();
        let values: Vec<_> = doc.blocks()[0].get_all("x").map(|e| e.value.clone()).collect();
        assert_eq!(values, vec!["1", "2"]);
    }
}
