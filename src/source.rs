//! Character sources feeding the lexer
//!
//! The lexer only ever asks for "the next character, or end of stream".
//! [`CharSource`] captures that, and the implementations here cover the two
//! ways configuration text usually arrives: already in memory, or behind a
//! byte reader that has to be decoded.

use crate::error::LexError;
use std::fmt;
use std::io::{self, BufRead};
use std::str::FromStr;

/// A stream of characters consumed one at a time
///
/// Once `next_char` has returned `Ok(None)` every later call must also
/// return `Ok(None)`.
pub trait CharSource {
    /// Reads the next character, or `None` at end of stream
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        (**self).next_char()
    }
}

impl<S: CharSource + ?Sized> CharSource for Box<S> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        (**self).next_char()
    }
}

/// Character source over an in-memory string
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    chars: std::str::Chars<'a>,
}

impl<'a> StrSource<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars(),
        }
    }

    /// Returns the text not yet consumed
    pub fn remaining(&self) -> &'a str {
        self.chars.as_str()
    }
}

impl CharSource for StrSource<'_> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.chars.next())
    }
}

/// Character encodings understood by [`ReaderSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// 7-bit US-ASCII; any byte above 0x7F is a decoding error
    #[default]
    Ascii,
    /// UTF-8
    Utf8,
}

impl Encoding {
    /// Canonical charset name
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Ascii => "US-ASCII",
            Encoding::Utf8 => "UTF-8",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = LexError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_uppercase().as_str() {
            "US-ASCII" | "ASCII" | "US_ASCII" => Ok(Encoding::Ascii),
            "UTF-8" | "UTF8" => Ok(Encoding::Utf8),
            _ => Err(LexError::UnsupportedEncoding {
                name: name.to_string(),
            }),
        }
    }
}

/// Character source decoding bytes from a buffered reader
#[derive(Debug)]
pub struct ReaderSource<R: BufRead> {
    reader: R,
    encoding: Encoding,
    /// Bytes consumed from the reader so far
    bytes_read: usize,
    /// End of stream has been observed
    exhausted: bool,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R, encoding: Encoding) -> Self {
        Self {
            reader,
            encoding,
            bytes_read: 0,
            exhausted: false,
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Returns the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = loop {
            match self.reader.fill_buf() {
                Ok(buf) => break buf.first().copied(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        if byte.is_some() {
            self.reader.consume(1);
            self.bytes_read += 1;
        }
        Ok(byte)
    }

    fn decode_utf8(&mut self, lead: u8) -> io::Result<char> {
        let width = match lead {
            0x00..=0x7F => return Ok(lead as char),
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Err(invalid_data(self.bytes_read - 1, "invalid UTF-8 lead byte")),
        };

        let start = self.bytes_read - 1;
        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            *slot = match self.read_byte()? {
                Some(b) => b,
                None => {
                    return Err(invalid_data(start, "truncated UTF-8 sequence"));
                }
            };
        }

        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(|| invalid_data(start, "invalid UTF-8 sequence"))
    }
}

impl<R: BufRead> CharSource for ReaderSource<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        if self.exhausted {
            return Ok(None);
        }

        let Some(byte) = self.read_byte()? else {
            self.exhausted = true;
            return Ok(None);
        };

        match self.encoding {
            Encoding::Ascii if byte.is_ascii() => Ok(Some(byte as char)),
            Encoding::Ascii => Err(invalid_data(
                self.bytes_read - 1,
                "byte is not valid US-ASCII",
            )),
            Encoding::Utf8 => self.decode_utf8(byte).map(Some),
        }
    }
}

fn invalid_data(offset: usize, message: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("{} at byte offset {}", message, offset),
    )
}
