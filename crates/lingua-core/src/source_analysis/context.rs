// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Per-parse mutable context.
//!
//! A [`ParsingContext`] carries everything one parse accumulates: the file
//! name (stamped into every reported location), the diagnostic list, and —
//! once the parser finishes — the AST root. Contexts are confined to one
//! parse at a time but may be reused sequentially on fresh buffers after
//! [`ParsingContext::release_ast`].

use ecow::EcoString;

use crate::ast::Program;

use super::{Diagnostic, DiagnosticKind, SourceLoc};

/// Mutable state for a single parse.
#[derive(Debug, Default)]
pub struct ParsingContext {
    file_name: EcoString,
    diagnostics: Vec<Diagnostic>,
    ast: Option<Program>,
}

impl ParsingContext {
    /// Creates a context for the given file name.
    ///
    /// The file name must be non-empty before parsing; the parser stamps
    /// it into every location it records.
    #[must_use]
    pub fn new(file_name: impl Into<EcoString>) -> Self {
        Self {
            file_name: file_name.into(),
            diagnostics: Vec::new(),
            ast: None,
        }
    }

    /// The file name this context parses into.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Appends a diagnostic.
    pub fn track_report(&mut self, kind: DiagnosticKind, loc: SourceLoc) {
        self.diagnostics.push(Diagnostic::new(kind, loc));
    }

    /// All diagnostics reported so far, in the order encountered.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Transfers ownership of the program root into the context.
    pub fn take_ast(&mut self, root: Program) {
        self.ast = Some(root);
    }

    /// The parsed program, if a parse has completed successfully.
    #[must_use]
    pub fn ast(&self) -> Option<&Program> {
        self.ast.as_ref()
    }

    /// Releases the program root, leaving the context reusable.
    pub fn release_ast(&mut self) -> Option<Program> {
        self.ast.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_accumulate_in_order() {
        let mut context = ParsingContext::new("t.py");
        context.track_report(DiagnosticKind::UnexpectedToken, SourceLoc::new(1, 0, 1, 1));
        context.track_report(DiagnosticKind::NameRequired, SourceLoc::new(2, 0, 2, 1));
        assert_eq!(context.diagnostics().len(), 2);
        assert_eq!(context.diagnostics()[0].kind, DiagnosticKind::UnexpectedToken);
        assert_eq!(context.diagnostics()[1].kind, DiagnosticKind::NameRequired);
    }

    #[test]
    fn ast_ownership_transfers() {
        let mut context = ParsingContext::new("t.py");
        assert!(context.ast().is_none());
        context.take_ast(Program::default());
        assert!(context.ast().is_some());
        let _root = context.release_ast();
        assert!(context.ast().is_none());
    }
}
