// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! End-to-end grammar scenarios for the Python front end, driven the way
//! a real driver works: obtain lexer and parser from the language
//! factory, bind a buffer, parse, then inspect the context.

use lingua_core::ast::{BinaryOp, Decl, Expr, Name, Stmt};
use lingua_core::factory::{factory_for, LangId};
use lingua_core::source_analysis::{DiagnosticKind, Lexer, Parser, ParsingContext, Token};

fn parse_py(source: &str) -> (bool, ParsingContext) {
    let factory = factory_for(LangId::Python);
    let mut lexer = factory.make_lexer().expect("Python has a hand-written lexer");
    let mut parser = factory.make_parser().expect("Python has a hand-written parser");

    lexer.set_buffer(source);
    let mut context = ParsingContext::new("scenario.py");
    let accepted = parser.parse(lexer.as_mut(), &mut context);
    (accepted, context)
}

fn ident_name(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Ident {
            name: Name::Simple(simple),
        } => Some(&simple.ident),
        _ => None,
    }
}

fn stmt_exprs(stmt: &Stmt) -> &lingua_core::ast::AstList<Expr> {
    match stmt {
        Stmt::Expr { exprs } => exprs,
        stmt => panic!("expected expression statement, got {stmt:?}"),
    }
}

#[test]
fn assignment_of_literal() {
    // x = 1
    let (accepted, context) = parse_py("x = 1\n");
    assert!(accepted);
    assert!(context.diagnostics().is_empty());

    let program = context.ast().expect("AST root transferred");
    assert_eq!(program.stmts.len(), 1);
    let exprs = stmt_exprs(&program.stmts[0]);
    let Expr::Assign { lhs, rhs, .. } = &exprs.items[0] else {
        panic!("expected assignment");
    };
    assert_eq!(lhs.len(), 1);
    assert_eq!(ident_name(&lhs.items[0]), Some("x"));
    assert_eq!(rhs.len(), 1);
    assert!(matches!(&rhs.items[0], Expr::IntLit { text, .. } if text == "1"));
}

#[test]
fn factor_above_term() {
    // a + b * c parses as a + (b * c)
    let (_, context) = parse_py("a + b * c\n");
    let program = context.ast().unwrap();
    let exprs = stmt_exprs(&program.stmts[0]);
    let Expr::Binary { op, lhs, rhs, .. } = &exprs.items[0] else {
        panic!("expected binary expression");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert_eq!(ident_name(lhs.as_deref().unwrap()), Some("a"));
    let Expr::Binary { op, lhs, rhs, .. } = rhs.as_deref().unwrap() else {
        panic!("expected nested multiplication");
    };
    assert_eq!(*op, BinaryOp::Mul);
    assert_eq!(ident_name(lhs.as_deref().unwrap()), Some("b"));
    assert_eq!(ident_name(rhs.as_deref().unwrap()), Some("c"));
}

#[test]
fn term_above_shift() {
    // 1 << 2 + 3 parses as 1 << (2 + 3)
    let (_, context) = parse_py("1 << 2 + 3\n");
    let program = context.ast().unwrap();
    let exprs = stmt_exprs(&program.stmts[0]);
    let Expr::Binary { op, lhs, rhs, .. } = &exprs.items[0] else {
        panic!("expected binary expression");
    };
    assert_eq!(*op, BinaryOp::Shift);
    assert!(matches!(lhs.as_deref(), Some(Expr::IntLit { .. })));
    let Expr::Binary { op, .. } = rhs.as_deref().unwrap() else {
        panic!("expected nested addition");
    };
    assert_eq!(*op, BinaryOp::Add);
}

#[test]
fn list_comprehension_structure() {
    // [x*x for x in xs if x > 0]
    let (_, context) = parse_py("[x*x for x in xs if x > 0]\n");
    let program = context.ast().unwrap();
    let exprs = stmt_exprs(&program.stmts[0]);
    let Expr::ListCompre { expr, gens, .. } = &exprs.items[0] else {
        panic!("expected comprehension");
    };

    let Some(Expr::Binary {
        op: BinaryOp::Mul,
        lhs,
        rhs,
        ..
    }) = expr.as_deref()
    else {
        panic!("expected multiplication as the yielded expression");
    };
    assert_eq!(ident_name(lhs.as_deref().unwrap()), Some("x"));
    assert_eq!(ident_name(rhs.as_deref().unwrap()), Some("x"));

    assert_eq!(gens.len(), 1);
    let gen = &gens[0];
    assert_eq!(gen.patterns.len(), 1);
    assert_eq!(ident_name(&gen.patterns.items[0]), Some("x"));
    assert_eq!(ident_name(gen.range.as_deref().unwrap()), Some("xs"));
    assert_eq!(gen.filters.len(), 1);
    let Expr::Binary {
        op: BinaryOp::Rel,
        lhs,
        rhs,
        ..
    } = &gen.filters[0]
    else {
        panic!("expected relational filter");
    };
    assert_eq!(ident_name(lhs.as_deref().unwrap()), Some("x"));
    assert!(matches!(rhs.as_deref(), Some(Expr::IntLit { text, .. }) if text == "0"));
}

#[test]
fn relative_selective_import() {
    // from ..pkg import a as b, c
    let (_, context) = parse_py("from ..pkg import a as b, c\n");
    let program = context.ast().unwrap();
    let Stmt::Decl { decl } = &program.stmts[0] else {
        panic!("expected declaration statement");
    };
    let Decl::ImportClause {
        relative_depth,
        modules,
        ..
    } = decl.as_ref()
    else {
        panic!("expected import clause");
    };
    assert_eq!(*relative_depth, 2);
    assert_eq!(modules.len(), 1);

    let Decl::ImportModule { expr, members, .. } = &modules.items[0] else {
        panic!("expected import module");
    };
    let Some(Expr::Ident {
        name: Name::Nested(nested),
    }) = expr.as_deref()
    else {
        panic!("expected dotted module name");
    };
    assert_eq!(nested.names.len(), 1);
    assert_eq!(nested.names.items[0].ident, "pkg");

    assert_eq!(members.len(), 2);
    let Decl::ImportMember {
        actual_name,
        nick_name,
        ..
    } = &members.items[0]
    else {
        panic!("expected import member");
    };
    assert!(matches!(actual_name, Some(Name::Simple(n)) if n.ident == "a"));
    assert!(matches!(nick_name, Some(Name::Simple(n)) if n.ident == "b"));

    let Decl::ImportMember {
        actual_name,
        nick_name,
        ..
    } = &members.items[1]
    else {
        panic!("expected import member");
    };
    assert!(matches!(actual_name, Some(Name::Simple(n)) if n.ident == "c"));
    assert!(nick_name.is_none());
}

#[test]
fn try_except_finally_structure() {
    let source = "try:\n  f()\nexcept E as e:\n  g()\nfinally:\n  h()\n";
    let (accepted, context) = parse_py(source);
    assert!(accepted);
    assert!(context.diagnostics().is_empty(), "{:?}", context.diagnostics());

    let program = context.ast().unwrap();
    let Stmt::Try {
        body,
        catches,
        final_,
        ..
    } = &program.stmts[0]
    else {
        panic!("expected try statement");
    };
    assert!(body.is_some());

    assert_eq!(catches.len(), 1);
    let catch = &catches[0];
    let Some(decl) = &catch.decl else {
        panic!("expected catch declaration");
    };
    let Decl::ParamGroup { spec, decls } = decl.as_ref() else {
        panic!("expected parameter group");
    };
    assert!(matches!(
        spec,
        lingua_core::ast::ParamTypeSpec::Named(Name::Simple(n)) if n.ident == "E"
    ));
    assert_eq!(decls.len(), 1);
    assert!(matches!(
        &decls.items[0],
        Decl::Param { name: Some(Name::Simple(n)), .. } if n.ident == "e"
    ));
    assert!(catch.body.is_some());

    assert!(final_.as_ref().is_some_and(|f| f.body.is_some()));
}

#[test]
fn empty_input_yields_no_ast() {
    let (accepted, context) = parse_py("");
    assert!(!accepted);
    assert!(context.ast().is_none());
}

#[test]
fn newline_only_input_yields_no_ast() {
    let (accepted, context) = parse_py("\n\n\n");
    assert!(!accepted);
    assert!(context.ast().is_none());
}

#[test]
fn missing_rparen_reports_one_diagnostic() {
    let (accepted, context) = parse_py("f(a, b\n");
    assert!(accepted);
    let reports = context.diagnostics();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].kind, DiagnosticKind::UnexpectedToken);

    // The call node survives with both arguments.
    let program = context.ast().unwrap();
    let exprs = stmt_exprs(&program.stmts[0]);
    let Expr::Call { args, .. } = &exprs.items[0] else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 2);
}

#[test]
fn bad_hex_literal_reports_invalid_numeric_digit() {
    let factory = factory_for(LangId::Python);
    let mut lexer = factory.make_lexer().unwrap();
    lexer.set_buffer("0x\n");
    assert_eq!(lexer.lex(), Token::Invalid);
    let reports = lexer.take_reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].kind, DiagnosticKind::InvalidNumericDigit);
}

#[test]
fn decorated_function_parses() {
    let source = "@register(name='x')\n@trace\ndef f(a, *args, **kw):\n    return a\n";
    let (accepted, context) = parse_py(source);
    assert!(accepted);
    assert!(context.diagnostics().is_empty(), "{:?}", context.diagnostics());

    let program = context.ast().unwrap();
    let Stmt::Decl { decl } = &program.stmts[0] else {
        panic!("expected declaration statement");
    };
    let Decl::Func { name, spec, stmt } = decl.as_ref() else {
        panic!("expected function declaration");
    };
    assert!(matches!(name, Some(Name::Simple(n)) if n.ident == "f"));
    assert!(stmt.is_some());

    let Some(param) = &spec.param else {
        panic!("expected parameter clause");
    };
    let Decl::ParamClause { groups, .. } = param.as_ref() else {
        panic!("expected parameter clause");
    };
    assert_eq!(groups.len(), 3);
}

#[test]
fn class_with_bases_parses() {
    let (_, context) = parse_py("class C(Base, object):\n    pass\n");
    let program = context.ast().unwrap();
    let Stmt::Decl { decl } = &program.stmts[0] else {
        panic!("expected declaration statement");
    };
    let Decl::Record { name, spec } = decl.as_ref() else {
        panic!("expected record declaration");
    };
    assert!(matches!(name, Some(Name::Simple(n)) if n.ident == "C"));
    assert_eq!(spec.bases.len(), 2);
    assert!(spec.proto.is_some());
}

#[test]
fn with_as_binds_through_assignment() {
    let (_, context) = parse_py("with open(p) as f:\n    f.read()\n");
    let program = context.ast().unwrap();
    let Stmt::With { exprs, body, .. } = &program.stmts[0] else {
        panic!("expected with statement");
    };
    assert_eq!(exprs.len(), 1);
    assert!(matches!(exprs.items[0], Expr::Assign { .. }));
    assert!(body.is_some());
}

#[test]
fn for_targets_become_var_group() {
    let (_, context) = parse_py("for i, j in pairs:\n    use(i, j)\n");
    let program = context.ast().unwrap();
    let Stmt::Foreach { decl, expr, .. } = &program.stmts[0] else {
        panic!("expected foreach statement");
    };
    let Some(decl) = decl else { panic!("no var group") };
    let Decl::VarGroup { decls, .. } = decl.as_ref() else {
        panic!("expected var group");
    };
    assert_eq!(decls.len(), 2);
    assert_eq!(ident_name(expr.as_deref().unwrap()), Some("pairs"));
}

#[test]
fn global_statement_declares_variables() {
    let (_, context) = parse_py("global a, b\n");
    let program = context.ast().unwrap();
    // A lone small-stmt followed by newline is returned unwrapped.
    let Stmt::Decl { decl } = &program.stmts[0] else {
        panic!("expected declaration statement");
    };
    let Decl::VarGroup { decls, .. } = decl.as_ref() else {
        panic!("expected var group");
    };
    assert_eq!(decls.len(), 2);
}

#[test]
fn semicolons_group_into_block() {
    let (_, context) = parse_py("a = 1; b = 2\n");
    let program = context.ast().unwrap();
    let Stmt::Block { stmts } = &program.stmts[0] else {
        panic!("expected block of small statements");
    };
    assert_eq!(stmts.len(), 2);
}

#[test]
fn print_with_stream_redirect() {
    let (_, context) = parse_py("print >> err, a, b\n");
    let program = context.ast().unwrap();
    let exprs = stmt_exprs(&program.stmts[0]);
    let Expr::Print {
        opr_loc, exprs, ..
    } = &exprs.items[0]
    else {
        panic!("expected print payload");
    };
    assert!(opr_loc.is_some());
    assert_eq!(exprs.len(), 3);
}

#[test]
fn yield_in_both_positions() {
    let (accepted, context) = parse_py("def g(n):\n    yield n\n    x = yield\n");
    assert!(accepted);
    assert!(context.diagnostics().is_empty(), "{:?}", context.diagnostics());
}

#[test]
fn elif_chains_as_nested_if() {
    let (_, context) = parse_py("if a:\n    x\nelif b:\n    y\nelse:\n    z\n");
    let program = context.ast().unwrap();
    let Stmt::If { not_then, .. } = &program.stmts[0] else {
        panic!("expected if statement");
    };
    let Some(nested) = not_then else {
        panic!("expected elif branch");
    };
    let Stmt::If { not_then, .. } = nested.as_ref() else {
        panic!("elif should nest as if");
    };
    assert!(not_then.is_some());
}

#[test]
fn loop_else_suites_parse_without_diagnostics() {
    // The trailing else suites have no AST slot; they parse cleanly and
    // are discarded.
    let (accepted, context) =
        parse_py("while a:\n    b\nelse:\n    c\nfor x in xs:\n    y\nelse:\n    z\n");
    assert!(accepted);
    assert!(context.diagnostics().is_empty(), "{:?}", context.diagnostics());
    assert_eq!(context.ast().unwrap().stmts.len(), 2);
}

#[test]
fn star_import_and_parenthesized_members() {
    let (accepted, context) = parse_py("from os import *\nfrom sys import (path, argv)\n");
    assert!(accepted);
    assert!(context.diagnostics().is_empty(), "{:?}", context.diagnostics());

    let program = context.ast().unwrap();
    let Stmt::Decl { decl } = &program.stmts[0] else {
        panic!("expected declaration");
    };
    let Decl::ImportClause { modules, .. } = decl.as_ref() else {
        panic!("expected import clause");
    };
    let Decl::ImportModule { members, .. } = &modules.items[0] else {
        panic!("expected module");
    };
    assert!(matches!(
        &members.items[0],
        Decl::ImportMember { actual_name: Some(Name::Simple(n)), .. } if n.ident == "*"
    ));
}

#[test]
fn plain_from_import_is_relative_hint() {
    // from . import moduleY
    let (_, context) = parse_py("from . import moduleY\n");
    let program = context.ast().unwrap();
    let Stmt::Decl { decl } = &program.stmts[0] else {
        panic!("expected declaration");
    };
    let Decl::ImportClause {
        relative_depth,
        hint_loc,
        modules,
        ..
    } = decl.as_ref()
    else {
        panic!("expected import clause");
    };
    assert_eq!(*relative_depth, 1);
    assert!(hint_loc.is_some());
    assert_eq!(modules.len(), 1);
}

#[test]
fn lexer_and_parser_are_reusable_across_buffers() {
    let factory = factory_for(LangId::Python);
    let mut lexer = factory.make_lexer().unwrap();
    let mut parser = factory.make_parser().unwrap();

    lexer.set_buffer("a = 1\n");
    let mut first = ParsingContext::new("first.py");
    assert!(parser.parse(lexer.as_mut(), &mut first));

    lexer.set_buffer("b = 2\n");
    let mut second = ParsingContext::new("second.py");
    assert!(parser.parse(lexer.as_mut(), &mut second));

    assert_eq!(first.ast().unwrap().stmts.len(), 1);
    assert_eq!(second.ast().unwrap().stmts.len(), 1);
    assert!(second.diagnostics().is_empty());
}
