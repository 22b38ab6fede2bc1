// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Character-level cursor over a source buffer.
//!
//! Every bounds check in the lexing layer funnels through two primitives:
//! [`SourceCursor::peek_char`] and [`SourceCursor::consume_char`]. Lexers
//! never index the buffer directly.

/// A cursor over a raw source buffer.
///
/// The buffer is treated as a byte sequence whose encoding is a superset
/// of ASCII; character predicates operate on each byte as a `char`.
///
/// Invariant: `pos <= buf.len()` at all times.
#[derive(Debug, Default)]
pub struct SourceCursor {
    buf: String,
    pos: usize,
}

impl SourceCursor {
    /// Binds the cursor to a fresh buffer, resetting the position.
    pub fn set_buffer(&mut self, source: &str) {
        self.buf = source.to_owned();
        self.pos = 0;
    }

    /// Returns the character `dist` positions ahead, or `'\0'` once the
    /// probe reaches the end of the buffer.
    #[must_use]
    pub fn peek_char(&self, dist: usize) -> char {
        match self.buf.as_bytes().get(self.pos + dist) {
            Some(&b) => b as char,
            None => '\0',
        }
    }

    /// Advances the cursor by `1 + dist` positions.
    ///
    /// The character being consumed must exist: consuming at or past the
    /// end of the buffer is a hard bug, not a recoverable condition.
    pub fn consume_char(&mut self, dist: usize) {
        debug_assert!(self.peek_char(dist) != '\0', "consumed past end of buffer");

        self.pos = (self.pos + 1 + dist).min(self.buf.len());
    }

    /// Advances by `1 + dist`, then peeks the new current character.
    pub fn consume_char_peek_next(&mut self, dist: usize) -> char {
        self.consume_char(dist);
        self.peek_char(0)
    }

    /// Current byte offset from the start of the buffer.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Returns the text between two byte offsets, or `""` when the
    /// offsets do not lie on character boundaries (possible only for
    /// lexemes around non-ASCII bytes, which never classify as
    /// identifiers or keywords anyway).
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &str {
        self.buf.get(start..end).unwrap_or("")
    }

    /// Returns the raw bytes between two offsets.
    #[must_use]
    pub fn bytes(&self, start: usize, end: usize) -> &[u8] {
        &self.buf.as_bytes()[start..end]
    }

    /// Length of the bound buffer in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no buffer is bound or the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
