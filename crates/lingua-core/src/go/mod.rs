// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The Go front end.
//!
//! Go lexing and parsing are generated externally, so
//! [`GoFactory::make_lexer`] and [`GoFactory::make_parser`] return `None`;
//! the remaining collaborators (including [`GoSyntax`] for the shared
//! sub-lexers) are served here.

use ecow::EcoString;

use crate::factory::{
    AstLocator, Builtin, IncrementalLexer, Lang, LangId, LanguageFactory, Sanitizer, TypeSystem,
    Unit,
};
use crate::source_analysis::{Lexer, Parser, Syntax, Token};

/// Go character classes and keyword classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoSyntax;

impl Syntax for GoSyntax {
    fn is_ident_first_char(&self, c: char) -> bool {
        c.is_ascii_alphabetic() || c == '_'
    }

    fn is_ident_char(&self, c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    fn is_octal_prefix(&self, _c: char) -> bool {
        // Go 1.x octal literals are a bare leading zero; the digit loop
        // of the shared sub-lexer covers them.
        false
    }

    fn is_hex_prefix(&self, c: char) -> bool {
        c == 'x' || c == 'X'
    }

    fn is_bin_prefix(&self, _c: char) -> bool {
        false
    }

    fn is_exponent(&self, c: char) -> bool {
        c == 'e' || c == 'E'
    }

    fn classify_ident(&self, ident: &str) -> Token {
        match ident {
            "break" => Token::Break,
            "case" => Token::Case,
            "chan" => Token::Chan,
            "const" => Token::Const,
            "continue" => Token::Continue,
            "default" => Token::Default,
            "defer" => Token::Defer,
            "else" => Token::Else,
            "fallthrough" => Token::Fallthrough,
            "for" => Token::For,
            "func" => Token::Func,
            "go" => Token::Go,
            "goto" => Token::Goto,
            "if" => Token::If,
            "import" => Token::Import,
            "interface" => Token::Interface,
            "map" => Token::Map,
            "package" => Token::Package,
            "range" => Token::Range,
            "return" => Token::Return,
            "select" => Token::Select,
            "struct" => Token::Struct,
            "switch" => Token::Switch,
            "type" => Token::Type,
            "var" => Token::Var,
            "nil" => Token::NullLiteral,
            "true" => Token::TrueLiteral,
            "false" => Token::FalseLiteral,
            _ => Token::Identifier,
        }
    }
}

/// A Go translation-unit holder.
#[derive(Debug, Default)]
pub struct GoUnit;

impl Unit for GoUnit {
    fn lang(&self) -> LangId {
        LangId::Go
    }
}

/// The Go builtins registry.
#[derive(Debug, Default)]
pub struct GoBuiltin;

impl Builtin for GoBuiltin {
    fn actual_basename(&self) -> &str {
        "builtin"
    }
}

/// Go name sanitization.
#[derive(Debug, Default)]
pub struct GoSanitizer;

impl Sanitizer for GoSanitizer {
    fn module_name(&self, file_base_name: &str) -> EcoString {
        file_base_name
            .strip_suffix(".go")
            .unwrap_or(file_base_name)
            .into()
    }
}

/// Go type-system traits.
#[derive(Debug, Default)]
pub struct GoTypeSystem;

impl TypeSystem for GoTypeSystem {
    fn is_dynamically_typed(&self) -> bool {
        false
    }
}

/// Go surface-syntax facts.
#[derive(Debug, Default)]
pub struct GoLang;

impl Lang for GoLang {
    fn line_comment(&self) -> &str {
        "//"
    }

    fn block_comment(&self) -> Option<(&str, &str)> {
        Some(("/*", "*/"))
    }
}

/// Factory for the Go front end.
#[derive(Debug, Default)]
pub struct GoFactory;

impl LanguageFactory for GoFactory {
    fn lang_name(&self) -> LangId {
        LangId::Go
    }

    fn make_unit(&self) -> Option<Box<dyn Unit>> {
        Some(Box::new(GoUnit))
    }

    fn make_builtin(&self) -> Option<Box<dyn Builtin>> {
        Some(Box::new(GoBuiltin))
    }

    fn make_ast_locator(&self) -> Option<Box<dyn AstLocator>> {
        None
    }

    fn make_incremental_lexer(&self) -> Option<Box<dyn IncrementalLexer>> {
        None
    }

    fn make_sanitizer(&self) -> Option<Box<dyn Sanitizer>> {
        Some(Box::new(GoSanitizer))
    }

    fn make_type_system(&self) -> Option<Box<dyn TypeSystem>> {
        Some(Box::new(GoTypeSystem))
    }

    fn make_lang(&self) -> Option<Box<dyn Lang>> {
        Some(Box::new(GoLang))
    }

    fn make_lexer(&self) -> Option<Box<dyn Lexer>> {
        None // wraps an externally generated lexer
    }

    fn make_parser(&self) -> Option<Box<dyn Parser>> {
        None // wraps an externally generated parser
    }
}
