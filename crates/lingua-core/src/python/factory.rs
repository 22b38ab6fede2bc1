// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The Python collaborator set and its factory.

use ecow::EcoString;

use crate::factory::{
    AstLocator, Builtin, IncrementalLexer, Lang, LangId, LanguageFactory, Sanitizer, TypeSystem,
    Unit,
};
use crate::source_analysis::{Lexer, Parser, Token};

use super::{PyAstLocator, PyLexer, PyParser};

/// A Python translation-unit holder.
#[derive(Debug, Default)]
pub struct PyUnit;

impl Unit for PyUnit {
    fn lang(&self) -> LangId {
        LangId::Python
    }
}

/// The Python builtins registry.
#[derive(Debug, Default)]
pub struct PyBuiltin;

impl Builtin for PyBuiltin {
    fn actual_basename(&self) -> &str {
        "__builtin__"
    }
}

/// Python name sanitization.
#[derive(Debug, Default)]
pub struct PySanitizer;

impl Sanitizer for PySanitizer {
    fn module_name(&self, file_base_name: &str) -> EcoString {
        file_base_name
            .strip_suffix(".py")
            .unwrap_or(file_base_name)
            .into()
    }
}

/// Python type-system traits.
#[derive(Debug, Default)]
pub struct PyTypeSystem;

impl TypeSystem for PyTypeSystem {
    fn is_dynamically_typed(&self) -> bool {
        true
    }
}

/// Python surface-syntax facts.
#[derive(Debug, Default)]
pub struct PyLang;

impl Lang for PyLang {
    fn line_comment(&self) -> &str {
        "#"
    }

    fn block_comment(&self) -> Option<(&str, &str)> {
        None
    }
}

/// Whole-buffer incremental lexing over [`PyLexer`].
#[derive(Debug, Default)]
pub struct PyIncrementalLexer {
    tokens: Vec<Token>,
}

impl IncrementalLexer for PyIncrementalLexer {
    fn lex(&mut self, source: &str) {
        let mut lexer = PyLexer::new();
        lexer.set_buffer(source);
        self.tokens.clear();
        loop {
            let tok = lexer.lex();
            if tok == Token::Eop {
                break;
            }
            self.tokens.push(tok);
        }
    }

    fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

/// Factory for the Python front end; every collaborator is hand-written.
#[derive(Debug, Default)]
pub struct PyFactory;

impl LanguageFactory for PyFactory {
    fn lang_name(&self) -> LangId {
        LangId::Python
    }

    fn make_unit(&self) -> Option<Box<dyn Unit>> {
        Some(Box::new(PyUnit))
    }

    fn make_builtin(&self) -> Option<Box<dyn Builtin>> {
        Some(Box::new(PyBuiltin))
    }

    fn make_ast_locator(&self) -> Option<Box<dyn AstLocator>> {
        Some(Box::new(PyAstLocator))
    }

    fn make_incremental_lexer(&self) -> Option<Box<dyn IncrementalLexer>> {
        Some(Box::new(PyIncrementalLexer::default()))
    }

    fn make_sanitizer(&self) -> Option<Box<dyn Sanitizer>> {
        Some(Box::new(PySanitizer))
    }

    fn make_type_system(&self) -> Option<Box<dyn TypeSystem>> {
        Some(Box::new(PyTypeSystem))
    }

    fn make_lang(&self) -> Option<Box<dyn Lang>> {
        Some(Box::new(PyLang))
    }

    fn make_lexer(&self) -> Option<Box<dyn Lexer>> {
        Some(Box::new(PyLexer::new()))
    }

    fn make_parser(&self) -> Option<Box<dyn Parser>> {
        Some(Box::new(PyParser::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizer_strips_extension() {
        assert_eq!(PySanitizer.module_name("mod.py"), "mod");
        assert_eq!(PySanitizer.module_name("mod"), "mod");
    }

    #[test]
    fn incremental_lexer_tokenizes_whole_buffers() {
        let mut lexer = PyIncrementalLexer::default();
        lexer.lex("x = 1\n");
        assert_eq!(
            lexer.tokens(),
            &[
                Token::Identifier,
                Token::Equal,
                Token::IntegerLiteral,
                Token::Newline
            ]
        );

        // Re-lexing replaces previous state.
        lexer.lex("y\n");
        assert_eq!(lexer.tokens(), &[Token::Identifier, Token::Newline]);
    }

    #[test]
    fn lang_facts() {
        assert_eq!(PyLang.line_comment(), "#");
        assert!(PyLang.block_comment().is_none());
        assert!(PyLang.is_case_sensitive());
        assert!(PyTypeSystem.is_dynamically_typed());
    }
}
