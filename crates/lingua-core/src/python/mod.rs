// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The Python (2.x dialect) front end.
//!
//! The only language in the toolkit with a fully hand-written lexer and
//! parser; D and Go front ends are generated externally and surface here
//! only through their factories.

mod factory;
mod lexer;
mod locator;
mod parser;
mod syntax;


pub use factory::{
    PyBuiltin, PyFactory, PyIncrementalLexer, PyLang, PySanitizer, PyTypeSystem, PyUnit,
};
pub use lexer::PyLexer;
pub use locator::PyAstLocator;
pub use parser::PyParser;
pub use syntax::PySyntax;
