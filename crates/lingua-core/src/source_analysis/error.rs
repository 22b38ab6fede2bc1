// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diagnostics emitted during lexing and parsing.
//!
//! Errors are values, not control flow: a lexer or parser reports a
//! [`Diagnostic`] to the parsing context and keeps going. The taxonomy is
//! closed — everything the front end can complain about is one of the
//! [`DiagnosticKind`] variants. Diagnostics integrate with [`miette`] for
//! rendering by downstream tools.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use super::SourceLoc;

/// The kind of front-end diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DiagnosticKind {
    /// The current token did not match what the grammar required.
    #[error("unexpected token")]
    UnexpectedToken,

    /// A production accepted an arbitrary expression where only an
    /// identifier is meaningful (e.g. `except E as <expr>`).
    #[error("name required")]
    NameRequired,

    /// A string literal ran into a bare newline or the end of the buffer.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// An escape sequence named a character that is neither control nor
    /// printable.
    #[error("unknown escape sequence")]
    UnknownEscape,

    /// A numeric literal prefix with no valid digit after it.
    #[error("invalid digit in numeric literal")]
    InvalidNumericDigit,
}

/// A single diagnostic: what went wrong, and where.
///
/// Diagnostics are appended to the [`ParsingContext`](super::ParsingContext)
/// in the textual order the front end encounters them.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
#[error("{kind} at {loc}")]
pub struct Diagnostic {
    /// The kind of problem.
    pub kind: DiagnosticKind,
    /// Where it was found.
    pub loc: SourceLoc,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(kind: DiagnosticKind, loc: SourceLoc) -> Self {
        Self { kind, loc }
    }
}

/// A lexical problem found by a shared sub-lexer, positioned by byte
/// offset into the buffer.
///
/// The sub-lexers do not track line/column state; the driving lexer maps
/// each issue's offset onto a [`SourceLoc`] before reporting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexIssue {
    /// The kind of problem.
    pub kind: DiagnosticKind,
    /// Byte offset of the offending character.
    pub offset: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::new(DiagnosticKind::UnexpectedToken, SourceLoc::new(2, 4, 2, 5));
        assert_eq!(d.to_string(), "unexpected token at 2:4");
    }

    #[test]
    fn kind_messages() {
        assert_eq!(
            DiagnosticKind::UnterminatedString.to_string(),
            "unterminated string literal"
        );
        assert_eq!(
            DiagnosticKind::InvalidNumericDigit.to_string(),
            "invalid digit in numeric literal"
        );
    }
}
