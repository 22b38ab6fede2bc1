// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Every token and AST node position is expressed as a [`SourceLoc`]: a
//! file name plus a line/column range. Unlike a byte-offset span, a
//! `SourceLoc` is directly renderable in diagnostics without consulting
//! the source buffer, which matters because locations outlive the buffer
//! they were lexed from.

use ecow::EcoString;

/// A line/column range within one source file.
///
/// Lines are 1-based; columns are 0-based. `last_col` is exclusive, so a
/// single-character token at the start of line 3 has
/// `first_line == last_line == 3`, `first_col == 0`, `last_col == 1`.
///
/// The default value is the *invalid* location (all coordinates zero),
/// distinguishable via [`SourceLoc::is_valid`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SourceLoc {
    /// Name of the file this location belongs to. Empty until a parse
    /// stamps it from the parsing context.
    pub file_name: EcoString,
    /// First line of the range (1-based).
    pub first_line: u32,
    /// First column of the range (0-based, inclusive).
    pub first_col: u32,
    /// Last line of the range (1-based).
    pub last_line: u32,
    /// Last column of the range (0-based, exclusive).
    pub last_col: u32,
}

impl SourceLoc {
    /// Creates a location from line/column coordinates, with no file name.
    #[must_use]
    pub fn new(first_line: u32, first_col: u32, last_line: u32, last_col: u32) -> Self {
        Self {
            file_name: EcoString::new(),
            first_line,
            first_col,
            last_line,
            last_col,
        }
    }

    /// Returns `false` for the zero/default location.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.first_line > 0
    }

    /// Returns the smallest location covering both `self` and `other`.
    ///
    /// The file name is taken from `self` unless empty. Joining with an
    /// invalid location returns the valid operand unchanged.
    #[must_use]
    pub fn joined(&self, other: &SourceLoc) -> SourceLoc {
        if !self.is_valid() {
            return other.clone();
        }
        if !other.is_valid() {
            return self.clone();
        }

        let (first_line, first_col) =
            if (self.first_line, self.first_col) <= (other.first_line, other.first_col) {
                (self.first_line, self.first_col)
            } else {
                (other.first_line, other.first_col)
            };
        let (last_line, last_col) =
            if (self.last_line, self.last_col) >= (other.last_line, other.last_col) {
                (self.last_line, self.last_col)
            } else {
                (other.last_line, other.last_col)
            };

        SourceLoc {
            file_name: if self.file_name.is_empty() {
                other.file_name.clone()
            } else {
                self.file_name.clone()
            },
            first_line,
            first_col,
            last_line,
            last_col,
        }
    }
}

impl std::fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.file_name.is_empty() {
            write!(f, "{}:{}", self.first_line, self.first_col)
        } else {
            write!(f, "{}:{}:{}", self.file_name, self.first_line, self.first_col)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_invalid() {
        assert!(!SourceLoc::default().is_valid());
        assert!(SourceLoc::new(1, 0, 1, 1).is_valid());
    }

    #[test]
    fn joined_covers_both_operands() {
        let a = SourceLoc::new(2, 4, 2, 9);
        let b = SourceLoc::new(3, 0, 3, 5);
        let j = a.joined(&b);
        assert_eq!((j.first_line, j.first_col), (2, 4));
        assert_eq!((j.last_line, j.last_col), (3, 5));
        // Join is symmetric on coordinates.
        let k = b.joined(&a);
        assert_eq!((k.first_line, k.first_col), (2, 4));
        assert_eq!((k.last_line, k.last_col), (3, 5));
    }

    #[test]
    fn joined_with_invalid_is_identity() {
        let a = SourceLoc::new(2, 4, 2, 9);
        assert_eq!(a.joined(&SourceLoc::default()), a);
        assert_eq!(SourceLoc::default().joined(&a), a);
    }

    #[test]
    fn joined_same_line_ranges() {
        let a = SourceLoc::new(1, 8, 1, 10);
        let b = SourceLoc::new(1, 2, 1, 4);
        let j = a.joined(&b);
        assert_eq!((j.first_col, j.last_col), (2, 10));
    }

    #[test]
    fn display_with_and_without_file() {
        let mut loc = SourceLoc::new(3, 7, 3, 9);
        assert_eq!(loc.to_string(), "3:7");
        loc.file_name = "m.py".into();
        assert_eq!(loc.to_string(), "m.py:3:7");
    }
}
