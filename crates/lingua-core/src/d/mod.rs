// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The D front end.
//!
//! D lexing and parsing are generated externally, so
//! [`DFactory::make_lexer`] and [`DFactory::make_parser`] return `None`;
//! the remaining collaborators (including [`DSyntax`] for the shared
//! sub-lexers) are served here.

use ecow::EcoString;

use crate::factory::{
    AstLocator, Builtin, IncrementalLexer, Lang, LangId, LanguageFactory, Sanitizer, TypeSystem,
    Unit,
};
use crate::source_analysis::{Lexer, Parser, Syntax, Token};

/// D character classes and keyword classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct DSyntax;

impl Syntax for DSyntax {
    fn is_ident_first_char(&self, c: char) -> bool {
        c.is_ascii_alphabetic() || c == '_'
    }

    fn is_ident_char(&self, c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    fn is_octal_prefix(&self, _c: char) -> bool {
        // D spells octal literals through std.conv.octal.
        false
    }

    fn is_hex_prefix(&self, c: char) -> bool {
        c == 'x' || c == 'X'
    }

    fn is_bin_prefix(&self, c: char) -> bool {
        c == 'b' || c == 'B'
    }

    fn is_exponent(&self, c: char) -> bool {
        c == 'e' || c == 'E'
    }

    fn classify_ident(&self, ident: &str) -> Token {
        match ident {
            "break" => Token::Break,
            "case" => Token::Case,
            "catch" => Token::Catch,
            "class" => Token::Class,
            "const" => Token::Const,
            "continue" => Token::Continue,
            "default" => Token::Default,
            "delete" => Token::Delete,
            "else" => Token::Else,
            "enum" => Token::Enum,
            "finally" => Token::Finally,
            "for" => Token::For,
            "foreach" => Token::Foreach,
            "function" => Token::Func,
            "goto" => Token::Goto,
            "if" => Token::If,
            "immutable" => Token::Immutable,
            "import" => Token::Import,
            "in" => Token::In,
            "interface" => Token::Interface,
            "is" => Token::Is,
            "mixin" => Token::Mixin,
            "module" => Token::Module,
            "return" => Token::Return,
            "struct" => Token::Struct,
            "switch" => Token::Switch,
            "template" => Token::Template,
            "throw" => Token::Throw,
            "try" => Token::Try,
            "unittest" => Token::Unittest,
            "version" => Token::Version,
            "while" => Token::While,
            "with" => Token::With,
            "null" => Token::NullLiteral,
            "true" => Token::TrueLiteral,
            "false" => Token::FalseLiteral,
            _ => Token::Identifier,
        }
    }
}

/// A D translation-unit holder.
#[derive(Debug, Default)]
pub struct DUnit;

impl Unit for DUnit {
    fn lang(&self) -> LangId {
        LangId::D
    }
}

/// The D builtins registry.
#[derive(Debug, Default)]
pub struct DBuiltin;

impl Builtin for DBuiltin {
    fn actual_basename(&self) -> &str {
        "object"
    }
}

/// D name sanitization.
#[derive(Debug, Default)]
pub struct DSanitizer;

impl Sanitizer for DSanitizer {
    fn module_name(&self, file_base_name: &str) -> EcoString {
        file_base_name
            .strip_suffix(".d")
            .unwrap_or(file_base_name)
            .into()
    }
}

/// D type-system traits.
#[derive(Debug, Default)]
pub struct DTypeSystem;

impl TypeSystem for DTypeSystem {
    fn is_dynamically_typed(&self) -> bool {
        false
    }
}

/// D surface-syntax facts.
#[derive(Debug, Default)]
pub struct DLang;

impl Lang for DLang {
    fn line_comment(&self) -> &str {
        "//"
    }

    fn block_comment(&self) -> Option<(&str, &str)> {
        Some(("/*", "*/"))
    }
}

/// Factory for the D front end.
#[derive(Debug, Default)]
pub struct DFactory;

impl LanguageFactory for DFactory {
    fn lang_name(&self) -> LangId {
        LangId::D
    }

    fn make_unit(&self) -> Option<Box<dyn Unit>> {
        Some(Box::new(DUnit))
    }

    fn make_builtin(&self) -> Option<Box<dyn Builtin>> {
        Some(Box::new(DBuiltin))
    }

    fn make_ast_locator(&self) -> Option<Box<dyn AstLocator>> {
        None
    }

    fn make_incremental_lexer(&self) -> Option<Box<dyn IncrementalLexer>> {
        None
    }

    fn make_sanitizer(&self) -> Option<Box<dyn Sanitizer>> {
        Some(Box::new(DSanitizer))
    }

    fn make_type_system(&self) -> Option<Box<dyn TypeSystem>> {
        Some(Box::new(DTypeSystem))
    }

    fn make_lang(&self) -> Option<Box<dyn Lang>> {
        Some(Box::new(DLang))
    }

    fn make_lexer(&self) -> Option<Box<dyn Lexer>> {
        None // wraps an externally generated lexer
    }

    fn make_parser(&self) -> Option<Box<dyn Parser>> {
        None // wraps an externally generated parser
    }
}
