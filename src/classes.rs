//! Character classification for the gmond configuration format
//!
//! The format only distinguishes a handful of ASCII characters. They are
//! stored in a static lookup table built at compile time; anything outside
//! the table (including every non-ASCII character) is token body text.

/// Bitfield flags for character classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterFlags(u8);

impl CharacterFlags {
    /// Starts a comment that runs to the end of the line (`#`)
    pub const COMMENT_START: Self = Self(1 << 0);
    /// Ends a line, and with it any comment (`\n`, `\r`)
    pub const LINE_TERMINATOR: Self = Self(1 << 1);
    /// Single-character operators that always stand alone (`{`, `}`, `=`)
    pub const OPERATOR: Self = Self(1 << 2);
    /// Token separators (space, tab, `\n`, `\r`)
    pub const WHITESPACE: Self = Self(1 << 3);

    /// Creates empty flags
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Checks if any of the given flags are set
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Returns the union of two flag sets
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// The class a single character falls into, as seen by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    CommentStart,
    Operator,
    /// A line terminator; whitespace everywhere except inside a comment
    LineTerminator,
    Whitespace,
    Other,
}

/// Character lookup table for O(1) classification of ASCII characters
#[derive(Debug, Clone)]
pub struct CharacterTable([CharacterFlags; 128]);

impl CharacterTable {
    /// Creates a new character table with compile-time initialization
    pub const fn new() -> Self {
        let mut table = [CharacterFlags::empty(); 128];
        let mut i = 0;

        while i < 128 {
            let ch = i as u8;
            let mut flags = CharacterFlags::empty();

            if ch == b'#' {
                flags = flags.union(CharacterFlags::COMMENT_START);
            }

            match ch {
                b'{' | b'}' | b'=' => flags = flags.union(CharacterFlags::OPERATOR),
                _ => {}
            }

            // Line terminators are also whitespace
            match ch {
                b'\n' | b'\r' => {
                    flags = flags.union(CharacterFlags::LINE_TERMINATOR);
                    flags = flags.union(CharacterFlags::WHITESPACE);
                }
                b' ' | b'\t' => flags = flags.union(CharacterFlags::WHITESPACE),
                _ => {}
            }

            table[i] = flags;
            i += 1;
        }

        Self(table)
    }

    /// Returns the flags for a character
    #[inline(always)]
    pub const fn get_flags(&self, ch: char) -> CharacterFlags {
        if ch.is_ascii() {
            self.0[ch as usize]
        } else {
            CharacterFlags::empty()
        }
    }

    /// Tests if a character has any of the given flags
    #[inline(always)]
    pub const fn test_character(&self, ch: char, flags: CharacterFlags) -> bool {
        self.get_flags(ch).intersects(flags)
    }

    #[inline(always)]
    pub const fn is_operator(&self, ch: char) -> bool {
        self.test_character(ch, CharacterFlags::OPERATOR)
    }

    /// Classifies a character, checking comment-start, operator, line
    /// terminator and whitespace in that order
    pub const fn classify(&self, ch: char) -> CharClass {
        let flags = self.get_flags(ch);
        if flags.intersects(CharacterFlags::COMMENT_START) {
            CharClass::CommentStart
        } else if flags.intersects(CharacterFlags::OPERATOR) {
            CharClass::Operator
        } else if flags.intersects(CharacterFlags::LINE_TERMINATOR) {
            CharClass::LineTerminator
        } else if flags.intersects(CharacterFlags::WHITESPACE) {
            CharClass::Whitespace
        } else {
            CharClass::Other
        }
    }
}

impl Default for CharacterTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Global character table instance
pub static CHARACTER_TABLE: CharacterTable = CharacterTable::new();
