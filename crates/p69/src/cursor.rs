//! Forward-only cursor over the characters of a source text
//!
//! All positions are offsets in unicode scalar values (`char`s), never bytes. The scanner reports
//! token boundaries in the same unit and the engine splices in the same unit, so characters
//! outside the basic multilingual plane cannot shift one against the other.
use crate::scanner::ScanError;

/// Read position over an immutable character buffer
///
/// The cursor is [Copy]; cheap snapshots are taken with [Cursor::bookmark].
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    chars: &'a [char],
    pos: usize,
}

/// A saved cursor position
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Bookmark(usize);

impl Bookmark {
    pub fn offset(self) -> usize {
        self.0
    }
}

impl<'a> Cursor<'a> {
    pub fn new(chars: &'a [char]) -> Self {
        Self { chars, pos: 0 }
    }

    /// Current character without consuming it
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Consume and return the current character
    pub fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Consume the longest run of characters matching `predicate`
    ///
    /// Returns an empty string when the current character does not match.
    pub fn read_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&predicate) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Consume one character if it matches `predicate`
    pub fn accept(&mut self, predicate: impl Fn(char) -> bool) -> Option<char> {
        let c = self.peek().filter(|c| predicate(*c))?;
        self.pos += 1;
        Some(c)
    }

    /// Like [Cursor::accept] but a mismatch is an error
    ///
    /// `expected` describes what was required and ends up in the error message.
    pub fn expect(
        &mut self,
        predicate: impl Fn(char) -> bool,
        expected: &'static str,
    ) -> Result<char, ScanError> {
        self.accept(predicate).ok_or(ScanError::Unexpected {
            expected,
            found: self.peek(),
        })
    }

    pub fn skip_spaces(&mut self) {
        self.read_while(char::is_whitespace);
    }

    /// Advance until the current character matches `predicate`
    ///
    /// The matching character is not consumed. Returns false when the end was reached first.
    pub fn seek(&mut self, predicate: impl Fn(char) -> bool) -> bool {
        while let Some(c) = self.peek() {
            if predicate(c) {
                return true;
            }
            self.pos += 1;
        }
        false
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.chars.len()
    }

    pub fn bookmark(&self) -> Bookmark {
        Bookmark(self.pos)
    }

    pub fn goto(&mut self, bookmark: Bookmark) {
        self.pos = bookmark.0;
    }

    /// Text between two bookmarks
    pub fn slice(&self, from: Bookmark, to: Bookmark) -> String {
        self.chars[from.0..to.0].iter().collect()
    }
}
