//! gmond configuration lexical analyzer
//!
//! Converts a character stream into flat tokens: bare words, numbers,
//! double-quoted literals (quotes kept) and the single-character operators
//! `{`, `}` and `=`. Comments run from `#` to the end of the line and produce
//! nothing. Nesting and key/value structure are left to the caller.

use crate::classes::{CHARACTER_TABLE, CharClass};
use crate::error::{LexError, Position, Span};
use crate::source::{CharSource, Encoding, ReaderSource, StrSource};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, trace};

/// Configuration options for the lexer
#[derive(Debug, Clone)]
pub struct LexerConfig {
    /// Encoding used to decode byte readers and files
    pub encoding: Encoding,
    /// Optional cap on the length of a single token in bytes. An unterminated
    /// quote swallows the rest of the input; set this to bound that. `None`
    /// means tokens may grow without limit.
    pub max_token_length: Option<usize>,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::Ascii,
            max_token_length: None,
        }
    }
}

/// Lexer state machine modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    /// Resting state at the start of a request
    Paused,
    /// Discarding characters up to the next line terminator
    InComment,
    /// Skipping separators between tokens
    InWhitespace,
    /// Accumulating token text
    InToken,
}

/// A token together with the source text it was read from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Token text exactly as it appeared in the input
    pub text: String,
    /// Location of the token text
    pub span: Span,
}

impl Token {
    pub fn new(text: String, span: Span) -> Self {
        Self { text, span }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns true for the single-character operator tokens
    pub fn is_operator(&self) -> bool {
        let mut chars = self.text.chars();
        matches!((chars.next(), chars.next()), (Some(ch), None) if CHARACTER_TABLE.is_operator(ch))
    }

    /// Returns true for tokens that start with a double quote
    pub fn is_quoted(&self) -> bool {
        self.text.starts_with('"')
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Streaming lexer for gmond configuration text
///
/// Each request yields one complete token or `None` once the input is
/// exhausted. When an operator ends a token mid-word, the operator is kept in
/// a pending buffer and returned by the following request without reading
/// from the source.
///
/// ```
/// use gmond_conf_lexer::lexer_from_str;
///
/// let mut lexer = lexer_from_str("udp_send_channel{ port = 8649 }");
/// assert_eq!(lexer.next_token()?.as_deref(), Some("udp_send_channel"));
/// assert_eq!(lexer.next_token()?.as_deref(), Some("{"));
/// assert_eq!(lexer.next_token()?.as_deref(), Some("port"));
/// # Ok::<(), gmond_conf_lexer::LexError>(())
/// ```
#[derive(Debug)]
pub struct GmondLexer<S: CharSource> {
    /// Character source, owned for the lifetime of the lexer
    source: S,
    /// Lexer configuration
    config: LexerConfig,
    /// Tokens already decided but not yet handed out, oldest first
    pending: SmallVec<[Token; 1]>,
    /// State the next request starts in
    resume_state: LexState,
    /// Position of the next character to be read
    position: Position,
    /// Last character read, so `\r\n` advances the line only once
    last_char: Option<char>,
    /// Set once a request has failed
    poisoned: bool,
}

impl<S: CharSource> GmondLexer<S> {
    /// Creates a new lexer with default configuration
    pub fn new(source: S) -> Self {
        Self::with_config(source, LexerConfig::default())
    }

    /// Creates a new lexer with custom configuration
    pub fn with_config(source: S, config: LexerConfig) -> Self {
        Self {
            source,
            config,
            pending: SmallVec::new(),
            resume_state: LexState::Paused,
            position: Position::new(),
            last_char: None,
            poisoned: false,
        }
    }

    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    /// Returns the position of the next character to be read
    pub fn current_position(&self) -> Position {
        self.position
    }

    /// State the next request starts in, once the pending buffer is empty
    pub fn resume_state(&self) -> LexState {
        self.resume_state
    }

    /// Number of tokens waiting in the pending buffer
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true once a request has failed; every later request fails
    /// with [`LexError::Poisoned`]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Gives the character source back to the caller
    pub fn into_source(self) -> S {
        self.source
    }

    /// Returns the text of the next token, or `None` at end of input
    pub fn next_token(&mut self) -> Result<Option<String>, LexError> {
        Ok(self.next_spanned()?.map(Token::into_text))
    }

    /// Returns the next token with its source span, or `None` at end of input
    pub fn next_spanned(&mut self) -> Result<Option<Token>, LexError> {
        if self.poisoned {
            return Err(LexError::Poisoned);
        }

        if !self.pending.is_empty() {
            return Ok(Some(self.pending.remove(0)));
        }

        self.lex().inspect_err(|_| self.poisoned = true)
    }

    /// Runs the state machine until one token is complete or input ends
    fn lex(&mut self) -> Result<Option<Token>, LexError> {
        let mut state = std::mem::replace(&mut self.resume_state, LexState::Paused);
        let mut text = String::new();
        let mut start = self.position;
        let mut end = self.position;
        // Double quotes appended to `text` so far
        let mut quotes = 0usize;

        while let Some((ch, at)) = self.read_char()? {
            trace!(state = ?state, character = ?ch, "lexing character");

            match (state, CHARACTER_TABLE.classify(ch)) {
                (LexState::InComment, CharClass::LineTerminator) => {
                    state = LexState::InWhitespace;
                }
                (LexState::InComment, _) => {}

                (LexState::Paused | LexState::InWhitespace, CharClass::CommentStart) => {
                    state = LexState::InComment;
                }
                (LexState::Paused | LexState::InWhitespace, CharClass::Operator) => {
                    return Ok(Some(Token::new(ch.to_string(), Span::new(at, self.position))));
                }
                (
                    LexState::Paused | LexState::InWhitespace,
                    CharClass::Whitespace | CharClass::LineTerminator,
                ) => {
                    state = LexState::InWhitespace;
                }
                (LexState::Paused | LexState::InWhitespace, CharClass::Other) => {
                    start = at;
                    self.push_char(&mut text, ch, at, &mut quotes)?;
                    end = self.position;
                    state = LexState::InToken;
                }

                (LexState::InToken, CharClass::CommentStart) => {
                    debug!(token = %text, position = %at, "comment ends token");
                    self.resume_state = LexState::InComment;
                    break;
                }
                (LexState::InToken, CharClass::Operator) => {
                    debug!(token = %text, operator = ?ch, position = %at, "operator ends token");
                    self.pending
                        .push(Token::new(ch.to_string(), Span::new(at, self.position)));
                    break;
                }
                (LexState::InToken, CharClass::Whitespace | CharClass::LineTerminator) => {
                    // An opening quote with no closing quote yet keeps whitespace
                    if quotes == 1 && text.starts_with('"') {
                        self.push_char(&mut text, ch, at, &mut quotes)?;
                        end = self.position;
                    } else {
                        break;
                    }
                }
                (LexState::InToken, CharClass::Other) => {
                    self.push_char(&mut text, ch, at, &mut quotes)?;
                    end = self.position;
                }
            }
        }

        if text.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Token::new(text, Span::new(start, end))))
        }
    }

    fn read_char(&mut self) -> Result<Option<(char, Position)>, LexError> {
        let at = self.position;
        match self.source.next_char()? {
            Some(ch) => {
                self.position.advance(ch, self.last_char);
                self.last_char = Some(ch);
                Ok(Some((ch, at)))
            }
            None => Ok(None),
        }
    }

    fn push_char(
        &self,
        text: &mut String,
        ch: char,
        at: Position,
        quotes: &mut usize,
    ) -> Result<(), LexError> {
        if let Some(limit) = self.config.max_token_length {
            if text.len() + ch.len_utf8() > limit {
                return Err(LexError::TokenTooLong {
                    limit,
                    position: at,
                });
            }
        }
        if ch == '"' {
            *quotes += 1;
        }
        text.push(ch);
        Ok(())
    }
}

impl<S: CharSource> Iterator for GmondLexer<S> {
    type Item = Result<Token, LexError>;

    /// Yields tokens until end of input; after an error, yields nothing more
    fn next(&mut self) -> Option<Self::Item> {
        if self.poisoned {
            return None;
        }
        self.next_spanned().transpose()
    }
}

/// Creates a lexer over an in-memory string
pub fn lexer_from_str(input: &str) -> GmondLexer<StrSource<'_>> {
    GmondLexer::new(StrSource::new(input))
}

/// Creates a lexer from a Read trait object using the default encoding
pub fn lexer_from_reader<R: Read>(reader: R) -> GmondLexer<ReaderSource<BufReader<R>>> {
    lexer_from_reader_with_config(reader, LexerConfig::default())
}

/// Creates a lexer from a Read trait object, decoding with `config.encoding`
pub fn lexer_from_reader_with_config<R: Read>(
    reader: R,
    config: LexerConfig,
) -> GmondLexer<ReaderSource<BufReader<R>>> {
    let source = ReaderSource::new(BufReader::new(reader), config.encoding);
    GmondLexer::with_config(source, config)
}

/// Creates a lexer from a file path using the default encoding
pub fn lexer_from_file<P: AsRef<Path>>(
    path: P,
) -> Result<GmondLexer<ReaderSource<BufReader<File>>>, LexError> {
    lexer_from_file_with_config(path, LexerConfig::default())
}

/// Creates a lexer from a file path, decoding with `config.encoding`
pub fn lexer_from_file_with_config<P: AsRef<Path>>(
    path: P,
    config: LexerConfig,
) -> Result<GmondLexer<ReaderSource<BufReader<File>>>, LexError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    debug!(path = %path.display(), encoding = %config.encoding, "opened configuration file");
    Ok(lexer_from_reader_with_config(file, config))
}

/// Lexes an entire string and returns the token texts
pub fn tokenize(input: &str) -> Result<Vec<String>, LexError> {
    lexer_from_str(input)
        .map(|token| token.map(Token::into_text))
        .collect()
}
