// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The parser boundary contract.

use super::{Lexer, ParsingContext};

/// A single-use-per-parse syntactic analyzer.
///
/// A parser pulls tokens from the lexer, emits AST nodes into the context,
/// and reports diagnostics through [`ParsingContext::track_report`]. It
/// never aborts: on malformed input it recovers (panic-mode skip to a
/// synchronization token) and returns control with whatever AST it built.
pub trait Parser {
    /// Parses one buffer's token stream into the context.
    ///
    /// Preconditions: the context carries a non-empty file name, and the
    /// lexer has been bound to a buffer.
    ///
    /// Returns `true` iff at least one top-level statement was accepted
    /// and an AST root was transferred to the context.
    fn parse(&mut self, lexer: &mut dyn Lexer, context: &mut ParsingContext) -> bool;
}
