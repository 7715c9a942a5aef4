//! A character cursor over a source string.
//!
//! Grounded on the teacher's `Cursor` (peek/advance over a `Chars`
//! iterator, with byte-position tracking for slicing lexeme text back
//! out of the source), pared down to what a single-pass ASCII lexer
//! needs — no BOM handling, no Unicode line/column tracking.

pub struct Cursor<'a> {
    source: &'a str,
    chars: std::str::CharIndices<'a>,
    current: Option<(usize, char)>,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.char_indices();
        let current = chars.next();
        Cursor {
            source,
            chars,
            current,
        }
    }

    /// The current character, or `'\0'` at end of input.
    pub fn current(&self) -> char {
        self.current.map(|(_, c)| c).unwrap_or('\0')
    }

    pub fn is_at_end(&self) -> bool {
        self.current.is_none()
    }

    /// Byte offset of the current character (or the source length at
    /// end of input).
    pub fn position(&self) -> usize {
        self.current.map(|(i, _)| i).unwrap_or(self.source.len())
    }

    pub fn advance(&mut self) -> char {
        let c = self.current();
        self.current = self.chars.next();
        c
    }

    /// Peeks `n` characters ahead without consuming, `0` meaning the
    /// current character.
    pub fn peek(&self, n: usize) -> char {
        if n == 0 {
            return self.current();
        }
        self.chars
            .clone()
            .nth(n - 1)
            .map(|(_, c)| c)
            .unwrap_or('\0')
    }

    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.position()]
    }
}
