// hydroini/src/scanner/lexer.rs

//! Single-line lexical analysis.

use super::line::{Line, LineKind};
use crate::error::{IniError, Result};

const COMMENT_CHAR: char = '#';
const ASSIGN_CHAR: char = '=';

/// Classifies individual lines of a model file.
#[derive(Debug, Clone)]
pub struct Lexer {
    parse_comments: bool,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    /// Create a new lexer that recognises `#` comments.
    pub fn new() -> Self {
        Self {
            parse_comments: true,
        }
    }

    /// Enable or disable comment recognition.
    ///
    /// When disabled, `#` is ordinary text in key-value lines and comment-only
    /// lines are classified as blank.
    pub fn with_comments(mut self, enabled: bool) -> Self {
        self.parse_comments = enabled;
        self
    }

    /// Classify one physical line.
    pub fn classify(&self, text: &str, number: usize) -> Result<Line> {
        let trimmed = text.trim();
        log::trace!("line {}: {:?}", number, trimmed);

        if trimmed.is_empty() {
            return Ok(Line::new(LineKind::Blank, number));
        }

        if trimmed.starts_with(COMMENT_CHAR) {
            let kind = if self.parse_comments {
                LineKind::Comment(trimmed.to_string())
            } else {
                LineKind::Blank
            };
            return Ok(Line::new(kind, number));
        }

        let (assign, comment) = self.find_delimiters(trimmed);
        let body = match comment {
            Some(pos) => trimmed[..pos].trim_end(),
            None => trimmed,
        };

        if body.starts_with('[') {
            return self.scan_header(body, number);
        }

        match assign {
            Some(pos) => {
                let key = trimmed[..pos].trim();
                if key.is_empty() {
                    return Err(IniError::format_error(
                        format!("missing key before '=' in '{}'", trimmed),
                        number,
                    ));
                }
                let value = body[pos + 1..].trim();
                let comment = comment.map(|pos| trimmed[pos..].trim_end().to_string());
                Ok(Line::new(
                    LineKind::KeyValue {
                        key: key.to_string(),
                        value: value.to_string(),
                        comment,
                    },
                    number,
                ))
            }
            None => {
                let tokens = body.split_whitespace().map(str::to_string).collect();
                Ok(Line::new(LineKind::Data(tokens), number))
            }
        }
    }

    fn scan_header(&self, body: &str, number: usize) -> Result<Line> {
        if !body.ends_with(']') {
            return Err(IniError::format_error(
                format!("unmatched '[' in section header '{}'", body),
                number,
            ));
        }
        let name = body[1..body.len() - 1].trim();
        if name.is_empty() || name.contains(&['[', ']'][..]) {
            return Err(IniError::format_error(
                format!("invalid section header '{}'", body),
                number,
            ));
        }
        Ok(Line::new(LineKind::Header(name.to_string()), number))
    }

    /// Byte offsets of the first unquoted `=` (before any comment) and the
    /// first unquoted `#`.
    fn find_delimiters(&self, text: &str) -> (Option<usize>, Option<usize>) {
        let mut quote: Option<char> = None;
        let mut assign = None;

        for (pos, c) in text.char_indices() {
            match quote {
                Some(q) if c == q => quote = None,
                Some(_) => {}
                None => match c {
                    '"' | '\'' => quote = Some(c),
                    COMMENT_CHAR if self.parse_comments => return (assign, Some(pos)),
                    ASSIGN_CHAR if assign.is_none() => assign = Some(pos),
                    _ => {}
                },
            }
        }

        (assign, None)
    }
}
