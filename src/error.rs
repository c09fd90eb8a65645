//! Error types and position tracking for gmond configuration lexing
//!
//! The lexer has a deliberately narrow failure surface: the character source
//! can fail, a token can outgrow the configured limit, and a lexer that has
//! already failed refuses further work.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Represents a position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Byte offset from start of input (0-based)
    pub offset: usize,
}

impl Position {
    /// Creates a new position at the start of input
    pub fn new() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    /// Advances the position past `c`, given the character read before it
    ///
    /// `\n`, `\r` and the pair `\r\n` each end exactly one line.
    pub fn advance(&mut self, c: char, previous: Option<char>) {
        match c {
            '\n' if previous == Some('\r') => {}
            '\n' | '\r' => {
                self.line += 1;
                self.column = 1;
            }
            _ => {
                self.column += 1;
            }
        }
        self.offset += c.len_utf8();
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Represents a span of text in the source
///
/// `end` is exclusive: it is the position immediately after the last
/// character covered by the span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start position of the span
    pub start: Position,
    /// End position of the span (exclusive)
    pub end: Position,
}

impl Span {
    /// Creates a new span from start and end positions
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Lexical analysis errors
#[derive(Debug, Error)]
pub enum LexError {
    /// The character source failed to produce the next character
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A single token grew past the configured limit
    #[error("Token exceeds maximum length of {limit} bytes at {position}")]
    TokenTooLong { limit: usize, position: Position },

    /// The requested character encoding is not supported
    #[error("Unsupported character encoding '{name}'")]
    UnsupportedEncoding { name: String },

    /// A previous request failed and left the lexer unusable
    #[error("Lexer cannot be used after a previous failure")]
    Poisoned,
}
