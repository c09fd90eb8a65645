//! # gmond-conf-lexer
//!
//! A streaming lexer for the configuration files read by the Ganglia
//! monitoring daemon (`gmond.conf`).
//!
//! ## Overview
//!
//! The format is a brace-delimited key/value grammar:
//!
//! ```text
//! # jon1
//! udp_send_channel {
//!   bind_hostname = yes
//!   host = 146.186.15.103
//!   port = 8649
//!   ttl = 1
//! }
//! ```
//!
//! The lexer turns such text into a flat sequence of tokens, one per request:
//!
//! - bare words and numbers, returned as plain text
//! - double-quoted literals, quotes included (`"Disk Space Available"`)
//! - the operators `{`, `}` and `=`, always as single-character tokens
//!
//! `#` starts a comment that runs to the end of the line and produces no
//! token. Interpreting the token stream (sections, nesting, values) is left
//! to the caller.
//!
//! ## Basic Usage
//!
//! ```rust
//! use gmond_conf_lexer::lexer_from_str;
//!
//! let mut lexer = lexer_from_str("name = \"disk_free\" # metric name\n");
//!
//! assert_eq!(lexer.next_token()?.as_deref(), Some("name"));
//! assert_eq!(lexer.next_token()?.as_deref(), Some("="));
//! assert_eq!(lexer.next_token()?.as_deref(), Some("\"disk_free\""));
//! assert_eq!(lexer.next_token()?, None);
//! # Ok::<(), gmond_conf_lexer::LexError>(())
//! ```
//!
//! ## Reading Files
//!
//! ```rust,no_run
//! use gmond_conf_lexer::{Encoding, LexerConfig, lexer_from_file_with_config};
//!
//! let config = LexerConfig {
//!     encoding: Encoding::Utf8,
//!     ..LexerConfig::default()
//! };
//! let lexer = lexer_from_file_with_config("/etc/ganglia/gmond.conf", config)?;
//!
//! for token in lexer {
//!     let token = token?;
//!     println!("{} {}", token.span, token.text);
//! }
//! # Ok::<(), gmond_conf_lexer::LexError>(())
//! ```
//!
//! ## Error Handling
//!
//! Read failures from the character source (including decoding failures)
//! are returned unchanged as [`LexError::Io`]. After any failure the lexer is
//! poisoned and further requests return [`LexError::Poisoned`]. An
//! unterminated quoted literal is not an error: it runs to the end of input.

pub mod classes;
pub mod error;
pub mod lexer;
pub mod source;


// Re-export main types and functions
pub use error::{LexError, Position, Span};
pub use lexer::{
    GmondLexer, LexState, LexerConfig, Token, lexer_from_file, lexer_from_file_with_config,
    lexer_from_reader, lexer_from_reader_with_config, lexer_from_str, tokenize,
};
pub use source::{CharSource, Encoding, ReaderSource, StrSource};
