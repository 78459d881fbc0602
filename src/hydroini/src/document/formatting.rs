// hydroini/src/document/formatting.rs

//! Rendering of blocks and documents back to text.
//!
//! Keys are padded to the widest key of their block and, when at least one
//! entry carries a comment, values are padded so comments line up. Table rows
//! are right-aligned per column. Rendering is deterministic, so rendering a
//! re-parsed rendering yields identical bytes.
//!
//! The `to_ini_string` methods format whatever they are given. `check`
//! reports content that would read back differently, such as a value
//! starting with `#` or a table token holding whitespace.

use super::block::{comment_text, to_comment, Block, BlockComment};
use super::core::Document;
use crate::error::{IniError, Result};
use crate::scanner::{Lexer, LineKind};
use crate::WriteOptions;

fn width(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, target: usize) -> String {
    let mut padded = String::from(text);
    padded.extend(std::iter::repeat(' ').take(target.saturating_sub(width(text))));
    padded
}

fn comment_line(indent: &str, text: &str) -> String {
    format!("{}{}", indent, to_comment(text))
}

/// Whether `text`, written on a line of its own, is read back as `expected`.
fn reads_back(lexer: &Lexer, text: &str, expected: LineKind) -> bool {
    !text.contains(&['\n', '\r'][..])
        && lexer
            .classify(text, 0)
            .map_or(false, |line| line.kind == expected)
}

impl Block {
    /// Render this block, header line included.
    pub fn to_ini_string(&self, options: &WriteOptions) -> String {
        let mut output = String::new();
        for line in self.render_lines(options) {
            output.push_str(&line);
            output.push('\n');
        }
        output
    }

    pub(crate) fn render_lines(&self, options: &WriteOptions) -> Vec<String> {
        let section_indent = " ".repeat(options.section_indent);
        let property_indent = " ".repeat(options.property_indent);
        let mut lines = vec![format!("{}[{}]", section_indent, self.header())];

        let entries = self.entries();
        let key_width = if options.align_values {
            entries.iter().map(|e| width(&e.key)).max().unwrap_or(0)
        } else {
            0
        };
        let value_width = entries
            .iter()
            .filter(|e| e.comment.is_some())
            .map(|e| width(&e.value))
            .max()
            .unwrap_or(0);

        let comments_at = |position: usize| -> Vec<&BlockComment> {
            self.comments()
                .iter()
                .filter(|c| c.position == position)
                .collect()
        };

        for (index, entry) in entries.iter().enumerate() {
            for comment in comments_at(index) {
                lines.push(comment_line(&property_indent, &comment.text));
            }

            let mut line = format!("{}{} = ", property_indent, pad(&entry.key, key_width));
            match &entry.comment {
                Some(comment)
                    if !(options.skip_empty_comments && comment_text(comment).is_empty()) =>
                {
                    if options.align_values {
                        line.push_str(&pad(&entry.value, value_width));
                    } else {
                        line.push_str(&entry.value);
                    }
                    line.push(' ');
                    line.push_str(&comment_line("", comment));
                }
                _ => line.push_str(&entry.value),
            }
            lines.push(line.trim_end().to_string());
        }

        // Comments positioned after the last entry, including any that
        // belong to a block without entries.
        for comment in self
            .comments()
            .iter()
            .filter(|c| c.position >= entries.len())
        {
            lines.push(comment_line(&property_indent, &comment.text));
        }

        lines.extend(self.render_rows(options));
        lines
    }

    /// Check that every line of this block reads back as written.
    pub fn check(&self) -> Result<()> {
        let lexer = Lexer::new();
        let unwritable = |message: String| IniError::Unwritable {
            message,
            block: self.header().to_string(),
            block_index: None,
        };

        let header = format!("[{}]", self.header());
        if !reads_back(&lexer, &header, LineKind::Header(self.header().to_string())) {
            return Err(unwritable(format!("invalid header '{}'", self.header())));
        }

        for entry in self.entries() {
            let mut line = format!("{} = {}", entry.key, entry.value);
            if let Some(comment) = &entry.comment {
                line.push(' ');
                line.push_str(&to_comment(comment.as_str()));
            }
            let expected = LineKind::KeyValue {
                key: entry.key.clone(),
                value: entry.value.clone(),
                comment: entry.comment.clone(),
            };
            if !reads_back(&lexer, &line, expected) {
                return Err(unwritable(format!(
                    "entry '{}' would not read back as written",
                    line
                )));
            }
        }

        for comment in self.comments() {
            let line = to_comment(comment.text.as_str());
            if !reads_back(&lexer, &line, LineKind::Comment(comment.text.clone())) {
                return Err(unwritable(format!("comment line '{}'", comment.text)));
            }
        }

        for (i, row) in self.trailing_rows().iter().enumerate() {
            if !reads_back(&lexer, &row.join(" "), LineKind::Data(row.clone())) {
                return Err(unwritable(format!(
                    "table row {} {:?} would not read back as written",
                    i + 1,
                    row
                )));
            }
        }
        Ok(())
    }

    fn render_rows(&self, options: &WriteOptions) -> Vec<String> {
        let rows = self.trailing_rows();
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let column_widths: Vec<usize> = (0..columns)
            .map(|col| {
                rows.iter()
                    .filter_map(|row| row.get(col))
                    .map(|token| width(token))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let indent = " ".repeat(options.datablock_indent);
        let spacing = " ".repeat(options.datablock_spacing.max(1));

        rows.iter()
            .map(|row| {
                let cells: Vec<String> = row
                    .iter()
                    .zip(&column_widths)
                    .map(|(token, &w)| format!("{:>w$}", token, w = w))
                    .collect();
                format!("{}{}", indent, cells.join(&spacing))
            })
            .collect()
    }
}

impl Document {
    /// Check every block, and the preamble, for content that would not read
    /// back as written.
    pub fn check(&self) -> Result<()> {
        let lexer = Lexer::new();
        for comment in self.preamble() {
            let line = to_comment(comment.as_str());
            if !reads_back(&lexer, &line, LineKind::Comment(comment.clone())) {
                return Err(IniError::Unwritable {
                    message: format!("preamble line '{}'", comment),
                    block: String::new(),
                    block_index: None,
                });
            }
        }
        for (index, block) in self.blocks().iter().enumerate() {
            block.check().map_err(|err| err.at_block(index))?;
        }
        Ok(())
    }

    /// Render the whole document.
    pub fn to_ini_string(&self, options: &WriteOptions) -> String {
        let mut output = String::new();

        for comment in self.preamble() {
            output.push_str(&comment_line("", comment));
            output.push('\n');
        }

        for (index, block) in self.blocks().iter().enumerate() {
            if index > 0 || !self.preamble().is_empty() {
                output.push('\n');
            }
            output.push_str(&block.to_ini_string(options));
        }

        output
    }
}
