// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The per-language factory façade.
//!
//! A driver never names a language beyond its [`LangId`]: it asks
//! [`factory_for`] for the language's [`LanguageFactory`] and obtains the
//! concrete collaborator set from it. Every `make_*` method may
//! legitimately return `None` — a language whose lexer or parser is
//! generated externally simply has no hand-written implementation to
//! offer, and callers must treat `None` as "unavailable".
//!
//! Factories are stateless; all per-parse configuration flows through the
//! [`ParsingContext`](crate::source_analysis::ParsingContext).

use ecow::EcoString;

use crate::ast::{Expr, Stmt};
use crate::source_analysis::{Lexer, Parser, SourceLoc, Token};

/// Identity of a supported source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LangId {
    /// The D programming language.
    D,
    /// The Go programming language.
    Go,
    /// The Python programming language (2.x dialect).
    Python,
}

impl std::fmt::Display for LangId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LangId::D => f.write_str("D"),
            LangId::Go => f.write_str("Go"),
            LangId::Python => f.write_str("Python"),
        }
    }
}

/// A translation unit holder: the per-file pairing of AST and
/// diagnostics, tagged with its language.
pub trait Unit {
    /// The language this unit holds.
    fn lang(&self) -> LangId;
}

/// The registry of a language's builtin entities.
///
/// The contents are out of the core's scope; the core only needs the
/// name under which the builtins module is known.
pub trait Builtin {
    /// Base name of the builtins module (e.g. `builtins`).
    fn actual_basename(&self) -> &str;
}

/// Computes whole-node locations from the per-token locations an AST
/// node stores.
pub trait AstLocator {
    /// The span covering an entire expression.
    fn expr_loc(&self, expr: &Expr) -> SourceLoc;

    /// The span covering an entire statement.
    fn stmt_loc(&self, stmt: &Stmt) -> SourceLoc;
}

/// An incrementally-driven lexer for editor use.
///
/// Only the whole-buffer entry point is part of the core contract; the
/// incremental state machine behind it is a per-language concern.
pub trait IncrementalLexer {
    /// Tokenizes `source` from scratch, replacing any previous state.
    fn lex(&mut self, source: &str);

    /// The tokens produced by the last [`lex`](IncrementalLexer::lex).
    fn tokens(&self) -> &[Token];
}

/// Normalizes user-visible names the way the language expects.
pub trait Sanitizer {
    /// Derives a module name from a file base name.
    fn module_name(&self, file_base_name: &str) -> EcoString;
}

/// Coarse type-system traits of a language, consumed by downstream
/// analyses.
pub trait TypeSystem {
    /// Whether the language is dynamically typed.
    fn is_dynamically_typed(&self) -> bool;
}

/// Surface-syntax facts about a language that tooling needs without
/// lexing (comment markers, case rules).
pub trait Lang {
    /// The line-comment introducer.
    fn line_comment(&self) -> &str;

    /// The block-comment delimiters, if the language has block comments.
    fn block_comment(&self) -> Option<(&str, &str)>;

    /// Whether identifiers are case-sensitive.
    fn is_case_sensitive(&self) -> bool {
        true
    }
}

/// The per-language factory: identity plus on-demand construction of
/// fresh, owned collaborator instances.
pub trait LanguageFactory {
    /// The language this factory serves.
    fn lang_name(&self) -> LangId;

    /// A fresh translation-unit holder.
    fn make_unit(&self) -> Option<Box<dyn Unit>>;

    /// A fresh builtins registry.
    fn make_builtin(&self) -> Option<Box<dyn Builtin>>;

    /// A fresh AST locator.
    fn make_ast_locator(&self) -> Option<Box<dyn AstLocator>>;

    /// A fresh incremental lexer.
    fn make_incremental_lexer(&self) -> Option<Box<dyn IncrementalLexer>>;

    /// A fresh name sanitizer.
    fn make_sanitizer(&self) -> Option<Box<dyn Sanitizer>>;

    /// A fresh type-system descriptor.
    fn make_type_system(&self) -> Option<Box<dyn TypeSystem>>;

    /// A fresh surface-syntax descriptor.
    fn make_lang(&self) -> Option<Box<dyn Lang>>;

    /// A fresh lexer, or `None` when the language has no hand-written
    /// lexer.
    fn make_lexer(&self) -> Option<Box<dyn Lexer>>;

    /// A fresh parser, or `None` when the language has no hand-written
    /// parser.
    fn make_parser(&self) -> Option<Box<dyn Parser>>;
}

/// Returns the factory for `lang`.
///
/// Adding a language extends [`LangId`] and this registry; nothing else
/// in the core changes.
#[must_use]
pub fn factory_for(lang: LangId) -> Box<dyn LanguageFactory> {
    match lang {
        LangId::D => Box::new(crate::d::DFactory),
        LangId::Go => Box::new(crate::go::GoFactory),
        LangId::Python => Box::new(crate::python::PyFactory),
    }
}
