// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for the Python 2 dialect.
//!
//! Grammar reference: <https://docs.python.org/2/reference/grammar.html>
//!
//! The parser is LL(1): it holds exactly one lookahead token (`ahead`) and
//! pulls the next from the lexer on demand. Every consume stamps
//! `last_loc` with the location of the token being left behind (file name
//! substituted from the context) — that is the universal rule for
//! attaching positions to AST nodes.
//!
//! # Error recovery
//!
//! A failed `match_tok` reports one `UnexpectedToken` diagnostic and
//! returns; container productions additionally synchronize on their
//! closing delimiter with `skip_to` (panic mode). Recovery never consumes
//! past the end of the current logical line: a mismatch leaves a
//! `Newline` in place and `skip_to` stops at one, so the enclosing
//! statement still sees its terminator. The parser never aborts and
//! always returns control with whatever AST it has built.
//!
//! # Binary operators
//!
//! Arithmetic/bitwise/shift operators are parsed by precedence climbing:
//! one function loops while the ahead operator's precedence meets the
//! threshold and recurses one level above the operator's own precedence
//! for the right operand, which makes same-level operators associate left
//! and higher-precedence operators nest deeper.

use ecow::EcoString;
use tracing::debug;

use crate::ast::{
    AstList, BinaryOp, CatchClause, Decl, Expr, FinallyClause, FuncSpec, Generator, Name,
    NestedName, ParamTypeSpec, Program, RecordSpec, SimpleName, Stmt, UnaryOp, Variadic,
};
use crate::source_analysis::{DiagnosticKind, Lexer, Parser, ParsingContext, SourceLoc, Token};

/// The hand-written Python parser.
///
/// Stateless between parses; all per-parse state lives on the stack of
/// [`Parser::parse`].
#[derive(Debug, Default)]
pub struct PyParser;

impl PyParser {
    /// Creates a parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Parser for PyParser {
    /*
     * file_input: (NEWLINE | stmt)* ENDMARKER
     */
    fn parse(&mut self, lexer: &mut dyn Lexer, context: &mut ParsingContext) -> bool {
        debug_assert!(!context.file_name().is_empty(), "context has no file name");

        let mut run = Run {
            lexer,
            context,
            ahead: Token::Invalid,
            last_loc: SourceLoc::default(),
            last_lexeme: EcoString::new(),
        };

        run.consume_token();
        let mut stmts = Vec::new();
        while run.ahead != Token::Eop {
            if run.maybe_consume(Token::Newline) {
                continue;
            }
            if let Some(stmt) = run.parse_stmt() {
                stmts.push(stmt);
            }
        }

        if stmts.is_empty() {
            return false;
        }
        run.context.take_ast(Program { stmts });
        true
    }
}

/// Binary operator precedence, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Zero,
    Or,
    Xor,
    And,
    Shift,
    Term,
    Factor,
}

impl Prec {
    /// One level tighter; saturates at the top.
    fn next(self) -> Prec {
        match self {
            Prec::Zero => Prec::Or,
            Prec::Or => Prec::Xor,
            Prec::Xor => Prec::And,
            Prec::And => Prec::Shift,
            Prec::Shift => Prec::Term,
            Prec::Term | Prec::Factor => Prec::Factor,
        }
    }
}

/// Which textual comprehension form is being parsed; selects the parser
/// for each generator's iterable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompreStyle {
    /// The legacy form inside `[...]` (iterables via `testlist_safe`).
    OldForm,
    /// The form inside `(...)`, `{...}`, and argument lists (iterables
    /// via `or_test`).
    NewForm,
}

/// A comprehension under construction.
struct CompreBuild {
    ldelim_loc: SourceLoc,
    expr: Option<Box<Expr>>,
    gens: Vec<Generator>,
}

impl CompreBuild {
    fn new(ldelim_loc: SourceLoc) -> Self {
        Self {
            ldelim_loc,
            expr: None,
            gens: Vec::new(),
        }
    }

    fn into_expr(self, rdelim_loc: SourceLoc) -> Expr {
        Expr::ListCompre {
            ldelim_loc: self.ldelim_loc,
            expr: self.expr,
            gens: self.gens,
            rdelim_loc,
        }
    }
}

/// Wraps an expression into an expression statement.
fn expr_stmt(expr: Expr) -> Stmt {
    let mut exprs = AstList::new();
    exprs.push(expr);
    Stmt::Expr { exprs }
}

/// Collects an optional expression into a fresh one-element list.
fn single(expr: Option<Expr>) -> AstList<Expr> {
    let mut list = AstList::new();
    if let Some(expr) = expr {
        list.push(expr);
    }
    list
}

/// One parse in flight: the lexer, the context, and the LL(1) state.
struct Run<'a> {
    lexer: &'a mut dyn Lexer,
    context: &'a mut ParsingContext,
    ahead: Token,
    last_loc: SourceLoc,
    last_lexeme: EcoString,
}

impl Run<'_> {
    // ========================================================================
    // Token plumbing
    // ========================================================================

    fn consume_token(&mut self) {
        // Lexical reports pending for the current lookahead land before
        // anything further is lexed, keeping diagnostics in source order.
        for mut report in self.lexer.take_reports() {
            report.loc.file_name = self.context.file_name().into();
            self.context.track_report(report.kind, report.loc);
        }

        if self.ahead == Token::Eop {
            return;
        }

        // Track the location (and lexeme) of the token being left behind.
        let mut loc = self.lexer.token_loc();
        loc.file_name = self.context.file_name().into();
        self.last_loc = loc;
        self.last_lexeme = self.lexer.token_lexeme().into();

        self.ahead = self.lexer.lex();
    }

    fn maybe_consume(&mut self, tk: Token) -> bool {
        if self.ahead == tk {
            self.consume_token();
            return true;
        }
        false
    }

    fn skip_to(&mut self, tk: Token) {
        // A newline is a synchronization point in its own right: hunting
        // for a missing delimiter never crosses a statement boundary.
        while self.ahead != tk && !matches!(self.ahead, Token::Newline | Token::Eop) {
            self.consume_token();
        }
    }

    fn match_tok(&mut self, tk: Token) -> bool {
        if self.ahead == tk {
            self.consume_token();
            return true;
        }
        // Move past the offender, but leave a statement terminator in
        // place for the enclosing statement to consume.
        if !matches!(self.ahead, Token::Newline | Token::Eop) {
            self.consume_token();
        }
        self.fail_match(false);
        false
    }

    fn fail_match(&mut self, consume: bool) {
        // The report's location is always the lastly consumed token's.
        if consume {
            self.consume_token();
        }
        debug!(loc = %self.last_loc, "unexpected token");
        self.context
            .track_report(DiagnosticKind::UnexpectedToken, self.last_loc.clone());
    }

    // ========================================================================
    // Lookahead predicates
    // ========================================================================

    fn is_test_ahead(&self) -> bool {
        self.ahead == Token::Lambda || self.is_non_lambda_test_ahead()
    }

    fn is_non_lambda_test_ahead(&self) -> bool {
        self.ahead == Token::Not || self.is_expr_ahead()
    }

    fn is_expr_ahead(&self) -> bool {
        self.is_factor_ahead()
    }

    fn is_factor_ahead(&self) -> bool {
        matches!(self.ahead, Token::Plus | Token::Minus | Token::Tilde) || self.is_atom_ahead()
    }

    fn is_atom_ahead(&self) -> bool {
        matches!(
            self.ahead,
            Token::Lparen
                | Token::Lbracket
                | Token::Lbrace
                | Token::Backtick
                | Token::Identifier
                | Token::IntegerLiteral
                | Token::FloatLiteral
                | Token::StringLiteral
                | Token::NullLiteral
                | Token::TrueLiteral
                | Token::FalseLiteral
        )
    }

    fn is_arg_ahead(&self) -> bool {
        matches!(self.ahead, Token::Star | Token::StarStar) || self.is_test_ahead()
    }

    fn is_subscript_ahead(&self) -> bool {
        matches!(self.ahead, Token::DotDotDot | Token::Colon) || self.is_test_ahead()
    }

    fn is_name_ahead(&self) -> bool {
        self.ahead == Token::Identifier
    }

    fn fetch_prec_ahead(&self) -> (Prec, Option<BinaryOp>) {
        match self.ahead {
            Token::Pipe => (Prec::Or, Some(BinaryOp::BitOr)),
            Token::Caret => (Prec::Xor, Some(BinaryOp::BitXor)),
            Token::Amper => (Prec::And, Some(BinaryOp::BitAnd)),
            Token::LessLess | Token::GreaterGreater => (Prec::Shift, Some(BinaryOp::Shift)),
            Token::Plus => (Prec::Term, Some(BinaryOp::Add)),
            Token::Minus => (Prec::Term, Some(BinaryOp::Sub)),
            Token::Star => (Prec::Factor, Some(BinaryOp::Mul)),
            Token::Slash | Token::SlashSlash => (Prec::Factor, Some(BinaryOp::Div)),
            Token::Percent => (Prec::Factor, Some(BinaryOp::Mod)),
            _ => (Prec::Zero, None),
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /*
     * stmt: simple_stmt | compound_stmt
     * compound_stmt: if_stmt | while_stmt | for_stmt | try_stmt | with_stmt |
     *                funcdef | classdef | decorated
     */
    fn parse_stmt(&mut self) -> Option<Stmt> {
        match self.ahead {
            Token::If => self.parse_if_stmt(),
            Token::While => self.parse_while_stmt(),
            Token::For => self.parse_for_stmt(),
            Token::Try => self.parse_try_stmt(),
            Token::With => self.parse_with_stmt(),
            Token::Func => self.parse_func_def(),
            Token::Class => self.parse_class_def(),
            Token::At => self.parse_decorated(),
            _ => self.parse_simple_stmt(),
        }
    }

    /*
     * simple_stmt: small_stmt (';' small_stmt)* [';'] NEWLINE
     */
    fn parse_simple_stmt(&mut self) -> Option<Stmt> {
        let stmt = self.parse_small_stmt();
        if self.maybe_consume(Token::Newline) {
            return stmt;
        }

        let mut stmts = Vec::new();
        if let Some(stmt) = stmt {
            stmts.push(stmt);
        }
        while self.maybe_consume(Token::Semicolon) {
            if matches!(self.ahead, Token::Newline | Token::Eop) {
                break;
            }
            if let Some(stmt) = self.parse_small_stmt() {
                stmts.push(stmt);
            }
        }

        // End of program terminates the statement as well as a newline.
        if self.ahead != Token::Eop && !self.match_tok(Token::Newline) {
            debug!("parse_simple_stmt: skipping to newline");
            self.skip_to(Token::Newline);
        }

        Some(Stmt::Block { stmts })
    }

    /*
     * small_stmt: expr_stmt | print_stmt | del_stmt | pass_stmt | flow_stmt |
     *             import_stmt | global_stmt | exec_stmt | assert_stmt
     */
    fn parse_small_stmt(&mut self) -> Option<Stmt> {
        match self.ahead {
            Token::Print => self.parse_print_stmt(),
            Token::Delete => self.parse_del_stmt(),
            Token::Pass => self.parse_pass_stmt(),
            Token::Import | Token::From => self.parse_import_stmt(),
            Token::Global => self.parse_global_stmt(),
            Token::Exec => self.parse_exec_stmt(),
            Token::Assert => self.parse_assert_stmt(),
            Token::Break | Token::Continue | Token::Return | Token::Throw | Token::Yield => {
                self.parse_flow_stmt()
            }
            _ => self.parse_expr_stmt(),
        }
    }

    /*
     * expr_stmt: testlist (augassign (yield_expr|testlist) |
     *                      ('=' (yield_expr|testlist))*)
     */
    fn parse_expr_stmt(&mut self) -> Option<Stmt> {
        let mut exprs = self.parse_test_list();
        let mut augmented = false;
        loop {
            if !(self.ahead == Token::Equal || self.ahead.is_aug_assign()) {
                return Some(Stmt::Expr { exprs });
            }
            if self.ahead.is_aug_assign() {
                augmented = true;
            }

            self.consume_token();
            let opr_loc = self.last_loc.clone();
            let rhs = if self.ahead == Token::Yield {
                single(self.parse_yield_expr())
            } else {
                self.parse_test_list()
            };
            let assign = Expr::Assign {
                opr_loc,
                lhs: exprs,
                rhs,
            };
            exprs = single(Some(assign));

            if augmented || self.ahead != Token::Equal {
                return Some(Stmt::Expr { exprs });
            }
        }
    }

    /*
     * print_stmt: 'print' ( [ test (',' test)* [','] ] |
     *                       '>>' test [ (',' test)+ [','] ] )
     */
    fn parse_print_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::Print);

        self.match_tok(Token::Print);
        let key_loc = self.last_loc.clone();
        let mut opr_loc = None;
        let mut exprs = AstList::new();

        let mut want_test = false;
        if self.maybe_consume(Token::GreaterGreater) {
            opr_loc = Some(self.last_loc.clone());
            if let Some(test) = self.parse_test() {
                exprs.push(test);
            }
            if !self.maybe_consume(Token::Comma) {
                return Some(expr_stmt(Expr::Print {
                    key_loc,
                    opr_loc,
                    exprs,
                }));
            }
            exprs.mark_delim(self.last_loc.clone());
            want_test = true;
        }

        if want_test || self.is_test_ahead() {
            if let Some(test) = self.parse_test() {
                exprs.push(test);
            }
            if self.maybe_consume(Token::Comma) {
                exprs.mark_delim(self.last_loc.clone());
                if self.is_test_ahead() {
                    exprs.merge(self.parse_test_list());
                }
            }
        }

        Some(expr_stmt(Expr::Print {
            key_loc,
            opr_loc,
            exprs,
        }))
    }

    /*
     * del_stmt: 'del' exprlist
     */
    fn parse_del_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::Delete);

        self.match_tok(Token::Delete);
        let key_loc = self.last_loc.clone();
        let exprs = self.parse_expr_list();
        Some(expr_stmt(Expr::Del { key_loc, exprs }))
    }

    /*
     * pass_stmt: 'pass'
     */
    fn parse_pass_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::Pass);

        self.match_tok(Token::Pass);
        Some(Stmt::Empty {
            key_loc: self.last_loc.clone(),
        })
    }

    /*
     * flow_stmt: break_stmt | continue_stmt | return_stmt | raise_stmt |
     *            yield_stmt
     */
    fn parse_flow_stmt(&mut self) -> Option<Stmt> {
        match self.ahead {
            Token::Break => self.parse_break_stmt(),
            Token::Continue => self.parse_continue_stmt(),
            Token::Return => self.parse_return_stmt(),
            Token::Throw => self.parse_raise_stmt(),
            Token::Yield => self.parse_yield_stmt(),
            _ => {
                self.fail_match(true);
                None
            }
        }
    }

    /*
     * import_stmt: import_name | import_from
     * import_name: 'import' dotted_as_names
     * import_from: 'from' ('.'* dotted_name | '.'+) 'import' sub_import
     */
    fn parse_import_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(matches!(self.ahead, Token::Import | Token::From));

        match self.ahead {
            Token::Import => {
                self.consume_token();
                let key_loc = self.last_loc.clone();
                let mut modules = AstList::new();
                loop {
                    let expr = self
                        .parse_dotted_name()
                        .map(|name| Box::new(Expr::Ident { name }));
                    let (as_loc, local_name) = self.parse_as_alias();
                    modules.push(Decl::ImportModule {
                        expr,
                        as_loc,
                        local_name,
                        select_loc: None,
                        members: AstList::new(),
                    });
                    if !self.maybe_consume(Token::Comma) {
                        break;
                    }
                    modules.mark_delim(self.last_loc.clone());
                }
                if modules.is_empty() {
                    self.fail_match(true);
                }

                Some(Stmt::Decl {
                    decl: Box::new(Decl::ImportClause {
                        key_loc,
                        relative_depth: 0,
                        hint_loc: None,
                        modules,
                    }),
                })
            }

            Token::From => {
                self.consume_token();
                let key_loc = self.last_loc.clone();

                // The leading dots carry the relative depth (PEP 0328):
                //
                //   from .moduleY import spam
                //   from . import moduleY
                //   from ..subpackage1 import moduleY
                //   from ...package import bar
                let mut relative_depth: u32 = 0;
                let mut want_name = true;
                loop {
                    if self.maybe_consume(Token::Dot) {
                        relative_depth += 1;
                    } else if self.maybe_consume(Token::DotDotDot) {
                        relative_depth += 3;
                    } else {
                        break;
                    }
                    want_name = false;
                }

                let mut hint_loc = None;
                let mut modules = AstList::new();
                if want_name || self.is_name_ahead() {
                    // A selective import, members specified after 'import'.
                    let expr = self
                        .parse_dotted_name()
                        .map(|name| Box::new(Expr::Ident { name }));
                    self.match_tok(Token::Import);
                    let select_loc = Some(self.last_loc.clone());
                    let members = self.parse_sub_imports(true);
                    modules.push(Decl::ImportModule {
                        expr,
                        as_loc: None,
                        local_name: None,
                        select_loc,
                        members,
                    });
                } else {
                    // An "ordinary" import; 'from' only said the modules
                    // after 'import' are relative.
                    self.match_tok(Token::Import);
                    hint_loc = Some(self.last_loc.clone());
                    modules = self.parse_sub_imports(false);
                }

                Some(Stmt::Decl {
                    decl: Box::new(Decl::ImportClause {
                        key_loc,
                        relative_depth,
                        hint_loc,
                        modules,
                    }),
                })
            }

            _ => {
                self.fail_match(true);
                None
            }
        }
    }

    /// Parses an optional `as NAME` alias.
    fn parse_as_alias(&mut self) -> (Option<SourceLoc>, Option<Name>) {
        if self.maybe_consume(Token::As) {
            let as_loc = Some(self.last_loc.clone());
            (as_loc, self.parse_name().map(Name::Simple))
        } else {
            (None, None)
        }
    }

    /*
     * sub_import: ('*' | '(' import_as_names ')' | import_as_names)
     * import_as_name: NAME ['as' NAME]
     * import_as_names: import_as_name (',' import_as_name)* [',']
     */
    fn parse_sub_imports(&mut self, selective: bool) -> AstList<Decl> {
        if self.ahead == Token::Star {
            self.consume_token();
            if selective {
                let star = Name::Simple(SimpleName {
                    ident: "*".into(),
                    loc: self.last_loc.clone(),
                });
                let mut decls = AstList::new();
                decls.push(Decl::ImportMember {
                    actual_name: Some(star),
                    as_loc: None,
                    nick_name: None,
                });
                return decls;
            }
            self.fail_match(false);
            return AstList::new();
        }

        let want_paren = self.maybe_consume(Token::Lparen);
        let mut decls = AstList::new();
        loop {
            if selective {
                let actual_name = self.parse_name().map(Name::Simple);
                let (as_loc, nick_name) = self.parse_as_alias();
                decls.push(Decl::ImportMember {
                    actual_name,
                    as_loc,
                    nick_name,
                });
            } else {
                let expr = self.parse_name().map(|name| {
                    Box::new(Expr::Ident {
                        name: Name::Simple(name),
                    })
                });
                let (as_loc, local_name) = self.parse_as_alias();
                decls.push(Decl::ImportModule {
                    expr,
                    as_loc,
                    local_name,
                    select_loc: None,
                    members: AstList::new(),
                });
            }
            if !self.maybe_consume(Token::Comma) {
                break;
            }
            decls.mark_delim(self.last_loc.clone());
        }
        if want_paren && !self.match_tok(Token::Rparen) {
            debug!("parse_sub_imports: skipping to `)`");
            self.skip_to(Token::Rparen);
        }

        decls
    }

    /*
     * global_stmt: 'global' NAME (',' NAME)*
     */
    fn parse_global_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::Global);

        self.match_tok(Token::Global);
        let key_loc = self.last_loc.clone();
        let mut decls = AstList::new();
        loop {
            decls.push(Decl::Var {
                name: self.parse_name().map(Name::Simple),
            });
            if !self.maybe_consume(Token::Comma) {
                break;
            }
            decls.mark_delim(self.last_loc.clone());
        }

        Some(Stmt::Decl {
            decl: Box::new(Decl::VarGroup { key_loc, decls }),
        })
    }

    /*
     * exec_stmt: 'exec' expr ['in' test [',' test]]
     */
    fn parse_exec_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::Exec);

        self.match_tok(Token::Exec);
        let key_loc = self.last_loc.clone();
        let expr = self.parse_expr().map(Box::new);

        // The globals/locals operands are parsed and dropped.
        if self.maybe_consume(Token::In) {
            self.parse_test();
            if self.maybe_consume(Token::Comma) {
                self.parse_test();
            }
        }

        Some(Stmt::Eval { key_loc, expr })
    }

    /*
     * assert_stmt: 'assert' test [',' test]
     */
    fn parse_assert_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::Assert);

        self.match_tok(Token::Assert);
        let key_loc = self.last_loc.clone();
        let expr = self.parse_test().map(Box::new);

        // The message operand is parsed and dropped.
        if self.maybe_consume(Token::Comma) {
            self.parse_test();
        }

        Some(expr_stmt(Expr::Assert { key_loc, expr }))
    }

    /*
     * if_stmt: 'if' if_else
     */
    fn parse_if_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::If);

        self.match_tok(Token::If);
        self.parse_if_else_if_stmt()
    }

    /*
     * if_else: test ':' suite ('elif' test ':' suite)* ['else' ':' suite]
     *
     * Note: 'elif' parsed as 'else' 'if'.
     */
    fn parse_if_else_if_stmt(&mut self) -> Option<Stmt> {
        let if_loc = self.last_loc.clone();
        let cond = self.parse_test().map(Box::new);
        self.match_tok(Token::Colon);
        let then = self.parse_suite().map(Box::new);

        let mut else_loc = None;
        let mut not_then = None;
        if self.maybe_consume(Token::Elif) {
            else_loc = Some(self.last_loc.clone());
            not_then = self.parse_if_else_if_stmt().map(Box::new);
        } else if self.maybe_consume(Token::Else) {
            else_loc = Some(self.last_loc.clone());
            self.match_tok(Token::Colon);
            not_then = self.parse_suite().map(Box::new);
        }

        Some(Stmt::If {
            if_loc,
            cond,
            then,
            else_loc,
            not_then,
        })
    }

    /*
     * while_stmt: 'while' test ':' suite ['else' ':' suite]
     */
    fn parse_while_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::While);

        self.match_tok(Token::While);
        let while_loc = self.last_loc.clone();
        let cond = self.parse_test().map(Box::new);
        self.match_tok(Token::Colon);
        let body = self.parse_suite().map(Box::new);

        if self.maybe_consume(Token::Else) {
            self.match_tok(Token::Colon);
            // The loop else-suite has no AST slot; parsed and discarded.
            self.parse_suite();
        }

        Some(Stmt::While {
            while_loc,
            cond,
            body,
        })
    }

    /*
     * for_stmt: 'for' exprlist 'in' testlist ':' suite ['else' ':' suite]
     */
    fn parse_for_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::For);

        self.match_tok(Token::For);
        let key_loc = self.last_loc.clone();

        // The targets, when plain identifiers, become variable decls.
        let exprs = self.parse_expr_list();
        let mut vars = AstList::new();
        for expr in exprs.items {
            if let Expr::Ident { name } = expr {
                vars.push(Decl::Var { name: Some(name) });
            }
        }
        let decl = Decl::VarGroup {
            key_loc: SourceLoc::default(),
            decls: vars,
        };

        self.match_tok(Token::In);
        // Only the first expression of the iterable testlist is kept as
        // the iteration source.
        let mut tests = self.parse_test_list();
        let expr = tests.release_head().map(Box::new);
        self.match_tok(Token::Colon);
        let body = self.parse_suite().map(Box::new);

        if self.maybe_consume(Token::Else) {
            self.match_tok(Token::Colon);
            // The loop else-suite has no AST slot; parsed and discarded.
            self.parse_suite();
        }

        Some(Stmt::Foreach {
            key_loc,
            decl: Some(Box::new(decl)),
            expr,
            body,
        })
    }

    /*
     * try_stmt: ('try' ':' suite
     *            ((except_clause ':' suite)+
     *             ['else' ':' suite]
     *             ['finally' ':' suite] |
     *             'finally' ':' suite))
     * except_clause: 'except' [test [('as' | ',') test]]
     */
    fn parse_try_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::Try);

        self.match_tok(Token::Try);
        let key_loc = self.last_loc.clone();
        self.match_tok(Token::Colon);
        let body = self.parse_suite().map(Box::new);

        let mut catches = Vec::new();
        let mut final_ = None;
        let mut seen_else = false;
        loop {
            match self.ahead {
                Token::Catch => {
                    self.consume_token();
                    let catch_key = self.last_loc.clone();
                    let mut decl = None;
                    if self.is_test_ahead() {
                        if let Some(test) = self.parse_test() {
                            let spec = if let Expr::Ident { name } = test {
                                ParamTypeSpec::Named(name)
                            } else {
                                // A non-identifier pattern leaves the
                                // group's spec inferred.
                                ParamTypeSpec::Inferred
                            };
                            let mut decls = AstList::new();
                            if self.maybe_consume(Token::As) || self.maybe_consume(Token::Comma) {
                                if let Some(ident) = self.parse_test() {
                                    if let Expr::Ident { name } = ident {
                                        decls.push(Decl::Param {
                                            name: Some(name),
                                            assign_loc: None,
                                            default: None,
                                            variadic: Variadic::None,
                                            variadic_loc: None,
                                        });
                                    } else {
                                        self.context.track_report(
                                            DiagnosticKind::NameRequired,
                                            self.last_loc.clone(),
                                        );
                                    }
                                }
                            }
                            decl = Some(Box::new(Decl::ParamGroup { spec, decls }));
                        }
                    }
                    self.match_tok(Token::Colon);
                    let catch_body = self.parse_suite().map(Box::new);
                    catches.push(CatchClause {
                        key_loc: catch_key,
                        decl,
                        body: catch_body,
                    });
                }

                Token::Finally => {
                    self.consume_token();
                    let finally_key = self.last_loc.clone();
                    self.match_tok(Token::Colon);
                    let finally_body = self.parse_suite().map(Box::new);
                    final_ = Some(FinallyClause {
                        key_loc: finally_key,
                        body: finally_body,
                    });
                    // 'finally' always terminates the clause parse.
                    break;
                }

                Token::Else => {
                    if catches.is_empty() || seen_else {
                        self.fail_match(true);
                    } else {
                        self.consume_token();
                        self.match_tok(Token::Colon);
                        // The try else-suite has no AST slot; parsed and
                        // discarded.
                        self.parse_suite();
                        seen_else = true;
                    }
                }

                _ => {
                    // At least one 'except' is required when no 'finally'
                    // was seen.
                    if catches.is_empty() {
                        self.fail_match(true);
                    }
                    break;
                }
            }
        }

        Some(Stmt::Try {
            key_loc,
            body,
            catches,
            final_,
        })
    }

    /*
     * with_stmt: 'with' with_item (',' with_item)* ':' suite
     */
    fn parse_with_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::With);

        self.match_tok(Token::With);
        let key_loc = self.last_loc.clone();
        let (exprs, _) =
            self.parse_list(Token::Comma, Self::is_test_ahead, Self::parse_with_item, false);
        if exprs.is_empty() {
            self.fail_match(true);
        }

        self.match_tok(Token::Colon);
        let body = self.parse_suite().map(Box::new);

        Some(Stmt::With {
            key_loc,
            exprs,
            body,
        })
    }

    /*
     * with_item: test ['as' expr]
     */
    fn parse_with_item(&mut self) -> Option<Expr> {
        let test = self.parse_test();
        if self.maybe_consume(Token::As) {
            let opr_loc = self.last_loc.clone();
            let rhs = self.parse_expr();
            return Some(Expr::Assign {
                opr_loc,
                lhs: single(test),
                rhs: single(rhs),
            });
        }

        test
    }

    /*
     * varargslist: (fpdef ['=' test] ',')*
     *              ('*' NAME [',' '**' NAME] | '**' NAME) |
     *              fpdef ['=' test] (',' fpdef ['=' test])* [',']
     */
    fn parse_var_args_list(&mut self, want_paren: bool) -> Decl {
        let mut ldelim_loc = SourceLoc::default();
        if want_paren {
            self.match_tok(Token::Lparen);
            ldelim_loc = self.last_loc.clone();
        }

        let mut groups: AstList<Decl> = AstList::new();
        let mut seen_star = false;
        let mut take_comma = true;
        loop {
            groups.mark_delim(self.last_loc.clone());

            match self.ahead {
                Token::Identifier if !seen_star => {
                    let name = self.parse_name().map(Name::Simple);
                    let param = if self.maybe_consume(Token::Equal) {
                        let assign_loc = Some(self.last_loc.clone());
                        Decl::Param {
                            name,
                            assign_loc,
                            default: self.parse_test().map(Box::new),
                            variadic: Variadic::None,
                            variadic_loc: None,
                        }
                    } else {
                        Decl::Param {
                            name,
                            assign_loc: None,
                            default: None,
                            variadic: Variadic::None,
                            variadic_loc: None,
                        }
                    };
                    let mut decls = AstList::new();
                    decls.push(param);
                    groups.push(Decl::ParamGroup {
                        spec: ParamTypeSpec::Inferred,
                        decls,
                    });
                }

                Token::Star if !seen_star => {
                    seen_star = true;
                    self.consume_token();
                    let group = self.complete_param(Variadic::Star);
                    groups.push(group);
                }

                Token::StarStar => {
                    self.consume_token();
                    let group = self.complete_param(Variadic::StarStar);
                    groups.push(group);
                    take_comma = false;
                }

                _ => take_comma = false,
            }

            if !(take_comma && self.maybe_consume(Token::Comma)) {
                break;
            }
        }

        let mut rdelim_loc = SourceLoc::default();
        if want_paren {
            if self.match_tok(Token::Rparen) {
                rdelim_loc = self.last_loc.clone();
            } else {
                debug!("parse_var_args_list: skipping to `)`");
                self.skip_to(Token::Rparen);
            }
        }

        Decl::ParamClause {
            ldelim_loc,
            groups,
            rdelim_loc,
        }
    }

    /// Finishes a variadic parameter after its `*`/`**` was consumed.
    fn complete_param(&mut self, variadic: Variadic) -> Decl {
        let variadic_loc = Some(self.last_loc.clone());
        let name = self.parse_name().map(Name::Simple);
        let mut decls = AstList::new();
        decls.push(Decl::Param {
            name,
            assign_loc: None,
            default: None,
            variadic,
            variadic_loc,
        });
        Decl::ParamGroup {
            spec: ParamTypeSpec::Inferred,
            decls,
        }
    }

    /*
     * funcdef: 'def' NAME parameters ':' suite
     * parameters: '(' [varargslist] ')'
     */
    fn parse_func_def(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::Func);

        self.match_tok(Token::Func);
        let key_loc = self.last_loc.clone();
        let name = self.parse_name().map(Name::Simple);
        let param = self.parse_var_args_list(true);

        self.match_tok(Token::Colon);
        let ldelim_loc = self.last_loc.clone();
        let stmt = self.parse_suite().map(Box::new);

        Some(Stmt::Decl {
            decl: Box::new(Decl::Func {
                name,
                spec: FuncSpec {
                    key_loc,
                    ldelim_loc,
                    param: Some(Box::new(param)),
                },
                stmt,
            }),
        })
    }

    /*
     * classdef: 'class' NAME ['(' [testlist] ')'] ':' suite
     */
    fn parse_class_def(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::Class);

        self.match_tok(Token::Class);
        let key_loc = self.last_loc.clone();
        let name = self.parse_name().map(Name::Simple);

        let mut bases = AstList::new();
        if self.maybe_consume(Token::Lparen) {
            let base_exprs = self.parse_test_list();
            for base in base_exprs.items {
                // Bases that are not plain identifiers are dropped.
                if let Expr::Ident { name } = base {
                    bases.push(Decl::Base { name: Some(name) });
                }
            }
            if !self.match_tok(Token::Rparen) {
                debug!("parse_class_def: skipping to `)`");
                self.skip_to(Token::Rparen);
            }
        }

        self.match_tok(Token::Colon);
        let ldelim_loc = self.last_loc.clone();
        let proto = self.parse_suite().map(Box::new);

        Some(Stmt::Decl {
            decl: Box::new(Decl::Record {
                name,
                spec: RecordSpec {
                    key_loc,
                    ldelim_loc,
                    bases,
                    proto,
                },
            }),
        })
    }

    /*
     * decorated: decorators (classdef | funcdef)
     * decorators: decorator+
     * decorator: '@' dotted_name [ '(' [arglist] ')' ] NEWLINE
     */
    fn parse_decorated(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::At);

        self.match_tok(Token::At);
        loop {
            // Decorator names and argument lists are parsed and dropped.
            self.parse_dotted_name();
            if self.maybe_consume(Token::Lparen) {
                self.parse_arg_list();
                if !self.match_tok(Token::Rparen) {
                    debug!("parse_decorated: skipping to `)`");
                    self.skip_to(Token::Rparen);
                }
            }
            if !self.match_tok(Token::Newline) {
                debug!("parse_decorated: skipping to newline");
                self.skip_to(Token::Newline);
            }
            if !self.maybe_consume(Token::At) {
                break;
            }
        }

        match self.ahead {
            Token::Class => self.parse_class_def(),
            Token::Func => self.parse_func_def(),
            _ => {
                self.fail_match(true);
                None
            }
        }
    }

    /*
     * continue_stmt: 'continue'
     */
    fn parse_continue_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::Continue);

        self.match_tok(Token::Continue);
        Some(Stmt::Continue {
            key_loc: self.last_loc.clone(),
        })
    }

    /*
     * break_stmt: 'break'
     */
    fn parse_break_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::Break);

        self.match_tok(Token::Break);
        Some(Stmt::Break {
            key_loc: self.last_loc.clone(),
        })
    }

    /*
     * yield_stmt: yield_expr
     */
    fn parse_yield_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::Yield);

        Some(Stmt::Yield {
            expr: self.parse_yield_expr().map(Box::new),
        })
    }

    /*
     * raise_stmt: 'raise' [test [',' test [',' test]]]
     */
    fn parse_raise_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::Throw);

        self.match_tok(Token::Throw);
        let key_loc = self.last_loc.clone();
        let mut expr = None;
        if self.is_test_ahead() {
            expr = self.parse_test().map(Box::new);

            // The traceback operands are parsed and dropped.
            if self.maybe_consume(Token::Comma) {
                self.parse_test();
                if self.maybe_consume(Token::Comma) {
                    self.parse_test();
                }
            }
        }

        Some(Stmt::Throw { key_loc, expr })
    }

    /*
     * return_stmt: 'return' [testlist]
     */
    fn parse_return_stmt(&mut self) -> Option<Stmt> {
        debug_assert!(self.ahead == Token::Return);

        self.match_tok(Token::Return);
        let key_loc = self.last_loc.clone();
        let exprs = if self.is_test_ahead() {
            self.parse_test_list()
        } else {
            AstList::new()
        };
        Some(Stmt::Return { key_loc, exprs })
    }

    /*
     * suite: simple_stmt | NEWLINE INDENT stmt+ DEDENT
     */
    fn parse_suite(&mut self) -> Option<Stmt> {
        if !self.maybe_consume(Token::Newline) {
            return self.parse_simple_stmt();
        }

        self.match_tok(Token::Indent);
        let mut stmts = Vec::new();
        if let Some(stmt) = self.parse_stmt() {
            stmts.push(stmt);
        }
        while !self.maybe_consume(Token::Dedent) && self.ahead != Token::Eop {
            if let Some(stmt) = self.parse_stmt() {
                stmts.push(stmt);
            }
        }

        Some(Stmt::Block { stmts })
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /*
     * exprlist: expr (',' expr)* [',']
     */
    fn parse_expr_list(&mut self) -> AstList<Expr> {
        self.parse_list(Token::Comma, Self::is_expr_ahead, Self::parse_expr, true)
            .0
    }

    /*
     * test: or_test ['if' or_test 'else' test] | lambdef
     */
    fn parse_test(&mut self) -> Option<Expr> {
        if self.ahead == Token::Lambda {
            return self.parse_lambda_core(Self::parse_test);
        }

        let or_test = self.parse_or_test();
        if self.maybe_consume(Token::If) {
            // Must be a conditional.
            let question_loc = self.last_loc.clone();
            let cond = self.parse_or_test().map(Box::new);
            self.match_tok(Token::Else);
            let delim_loc = self.last_loc.clone();
            let no = self.parse_test().map(Box::new);
            return Some(Expr::Cond {
                yes: or_test.map(Box::new),
                question_loc,
                cond,
                delim_loc,
                no,
            });
        }

        or_test
    }

    /*
     * old_test: or_test | old_lambdef
     */
    fn parse_old_test(&mut self) -> Option<Expr> {
        if self.ahead == Token::Lambda {
            return self.parse_lambda_core(Self::parse_old_test);
        }
        self.parse_or_test()
    }

    /*
     * testlist: test (',' test)* [',']
     */
    fn parse_test_list(&mut self) -> AstList<Expr> {
        self.parse_list(Token::Comma, Self::is_test_ahead, Self::parse_test, true)
            .0
    }

    /*
     * testlist1: test (',' test)*
     */
    fn parse_test_list1(&mut self) -> AstList<Expr> {
        self.parse_list(Token::Comma, Self::is_test_ahead, Self::parse_test, false)
            .0
    }

    /*
     * testlist_safe: old_test [(',' old_test)+ [',']]
     */
    fn parse_test_list_safe(&mut self) -> AstList<Expr> {
        self.parse_list(Token::Comma, Self::is_test_ahead, Self::parse_old_test, true)
            .0
    }

    /*
     * argument: test [comp_for] | test '=' test
     */
    fn parse_arg(&mut self) -> Option<Expr> {
        let test = self.parse_test();
        match self.ahead {
            Token::For => {
                let mut compre =
                    self.parse_compre_for(CompreBuild::new(SourceLoc::default()), CompreStyle::NewForm);
                compre.expr = test.map(Box::new);
                Some(compre.into_expr(SourceLoc::default()))
            }

            Token::Equal => {
                self.consume_token();
                let opr_loc = self.last_loc.clone();
                let rhs = self.parse_test();
                Some(Expr::Assign {
                    opr_loc,
                    lhs: single(test),
                    rhs: single(rhs),
                })
            }

            _ => test,
        }
    }

    /*
     * arglist: (argument ',')* (argument [','] |
     *                           '*' test (',' argument)* [',' '**' test] |
     *                           '**' test)
     */
    fn parse_arg_list(&mut self) -> AstList<Expr> {
        let mut args = AstList::new();
        if self.is_test_ahead() {
            let (list, trailing) =
                self.parse_list(Token::Comma, Self::is_test_ahead, Self::parse_arg, true);
            args = list;
            // With no trailing comma, that argument was the last one.
            if !trailing {
                return args;
            }
        }

        let mut want_star_star = false;
        if self.maybe_consume(Token::Star) {
            let key_loc = self.last_loc.clone();
            args.push(Expr::Unpack {
                key_loc,
                expr: self.parse_test().map(Box::new),
            });

            if self.maybe_consume(Token::Comma) {
                args.mark_delim(self.last_loc.clone());
                if self.is_test_ahead() {
                    let (more, trailing) =
                        self.parse_list(Token::Comma, Self::is_test_ahead, Self::parse_arg, true);
                    args.merge(more);
                    if trailing {
                        want_star_star = true;
                    }
                } else {
                    want_star_star = true;
                }
            }
        }

        if self.maybe_consume(Token::StarStar) {
            let key_loc = self.last_loc.clone();
            args.push(Expr::Unpack {
                key_loc,
                expr: self.parse_test().map(Box::new),
            });
        } else if want_star_star {
            self.fail_match(true);
        }

        args
    }

    /*
     * comp_for: 'for' exprlist 'in' or_test [comp_iter]
     * list_for: 'for' exprlist 'in' testlist_safe [list_iter]
     */
    fn parse_compre_for(&mut self, mut build: CompreBuild, style: CompreStyle) -> CompreBuild {
        debug_assert!(self.ahead == Token::For);

        self.match_tok(Token::For);
        let patterns = self.parse_expr_list();

        self.match_tok(Token::In);
        let opr_loc = self.last_loc.clone();
        let range = match style {
            CompreStyle::NewForm => self.parse_or_test().map(Box::new),
            CompreStyle::OldForm => {
                let mut tests = self.parse_test_list_safe();
                tests.release_head().map(Box::new)
            }
        };
        build.gens.push(Generator {
            patterns,
            opr_loc,
            range,
            filters: Vec::new(),
        });

        self.complete_compre(build, style)
    }

    /*
     * comp_if: 'if' old_test [comp_iter]
     * list_if: 'if' old_test [list_iter]
     */
    fn parse_compre_if(&mut self, mut build: CompreBuild, style: CompreStyle) -> CompreBuild {
        debug_assert!(self.ahead == Token::If);

        self.match_tok(Token::If);
        let filter = self.parse_old_test();
        if let (Some(gen), Some(filter)) = (build.gens.last_mut(), filter) {
            gen.filters.push(filter);
        }

        self.complete_compre(build, style)
    }

    fn complete_compre(&mut self, build: CompreBuild, style: CompreStyle) -> CompreBuild {
        if self.ahead == Token::For {
            return self.parse_compre_for(build, style);
        }
        if self.ahead == Token::If {
            return self.parse_compre_if(build, style);
        }
        build
    }

    /*
     * or_test: and_test ('or' and_test)*
     */
    fn parse_or_test(&mut self) -> Option<Expr> {
        let mut and_test = self.parse_and_test();
        while self.maybe_consume(Token::Or) {
            and_test = self.complete_binary_expr(BinaryOp::LogicOr, and_test, Self::parse_and_test);
        }
        and_test
    }

    /*
     * and_test: not_test ('and' not_test)*
     */
    fn parse_and_test(&mut self) -> Option<Expr> {
        let mut not_test = self.parse_not_test();
        while self.maybe_consume(Token::And) {
            not_test = self.complete_binary_expr(BinaryOp::LogicAnd, not_test, Self::parse_not_test);
        }
        not_test
    }

    /*
     * not_test: 'not' not_test | comparison
     */
    fn parse_not_test(&mut self) -> Option<Expr> {
        if self.maybe_consume(Token::Not) {
            return self.complete_unary_expr(UnaryOp::LogicNot, Self::parse_not_test);
        }

        self.parse_comparison()
    }

    /*
     * comparison: expr (comp_op expr)*
     * comp_op: '<'|'>'|'=='|'>='|'<='|'<>'|'!='|'in'|'not' 'in'|'is'|'is' 'not'
     */
    fn parse_comparison(&mut self) -> Option<Expr> {
        let mut expr = self.parse_expr();
        loop {
            match self.ahead {
                Token::Less
                | Token::Greater
                | Token::EqualEqual
                | Token::GreaterEqual
                | Token::LessEqual
                | Token::LessGreater
                | Token::ExclamEqual => {
                    self.consume_token();
                    expr = self.complete_binary_expr(BinaryOp::Rel, expr, Self::parse_expr);
                }

                Token::In => {
                    self.consume_token();
                    expr = self.complete_binary_expr(BinaryOp::In, expr, Self::parse_expr);
                }

                Token::Is => {
                    // May be followed by 'not'.
                    self.consume_token();
                    self.maybe_consume(Token::Not);
                    expr = self.complete_binary_expr(BinaryOp::Is, expr, Self::parse_expr);
                }

                Token::Not => {
                    // Must be followed by 'in'.
                    self.consume_token();
                    self.match_tok(Token::In);
                    expr = self.complete_binary_expr(BinaryOp::In, expr, Self::parse_expr);
                }

                _ => return expr,
            }
        }
    }

    /*
     * expr: xor_expr ('|' xor_expr)*
     * xor_expr: and_expr ('^' and_expr)*
     * and_expr: shift_expr ('&' shift_expr)*
     * shift_expr: arith_expr (('<<'|'>>') arith_expr)*
     * arith_expr: term (('+'|'-') term)*
     * term: factor (('*'|'/'|'%'|'//') factor)*
     */
    fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_binary_expr(Prec::Or)
    }

    fn parse_binary_expr(&mut self, cur_prec: Prec) -> Option<Expr> {
        let mut factor = self.parse_factor();
        loop {
            let (prec, op) = self.fetch_prec_ahead();
            if prec < cur_prec {
                break;
            }
            let Some(op) = op else { break };

            self.consume_token();
            let opr_loc = self.last_loc.clone();
            let rhs = self.parse_binary_expr(prec.next());
            factor = Some(Expr::Binary {
                op,
                opr_loc,
                lhs: factor.map(Box::new),
                rhs: rhs.map(Box::new),
            });
        }

        factor
    }

    /*
     * factor: ('+'|'-'|'~') factor | power
     */
    fn parse_factor(&mut self) -> Option<Expr> {
        match self.ahead {
            Token::Plus => {
                self.consume_token();
                self.complete_unary_expr(UnaryOp::Plus, Self::parse_factor)
            }

            Token::Minus => {
                self.consume_token();
                self.complete_unary_expr(UnaryOp::Minus, Self::parse_factor)
            }

            Token::Tilde => {
                self.consume_token();
                self.complete_unary_expr(UnaryOp::BitNot, Self::parse_factor)
            }

            _ => self.parse_power(),
        }
    }

    /*
     * power: atom trailer* ['**' factor]
     * trailer: '(' [arglist] ')' | '[' subscriptlist ']' | '.' NAME
     */
    fn parse_power(&mut self) -> Option<Expr> {
        let mut atom = self.parse_atom();
        loop {
            match self.ahead {
                Token::Lparen => {
                    self.consume_token();
                    let ldelim_loc = self.last_loc.clone();
                    let args = if self.is_arg_ahead() {
                        self.parse_arg_list()
                    } else {
                        AstList::new()
                    };
                    if !self.match_tok(Token::Rparen) {
                        debug!("parse_power: skipping to `)`");
                        self.skip_to(Token::Rparen);
                    }
                    atom = Some(Expr::Call {
                        base: atom.map(Box::new),
                        ldelim_loc,
                        args,
                        rdelim_loc: self.last_loc.clone(),
                    });
                }

                Token::Lbracket => {
                    self.consume_token();
                    let ldelim_loc = self.last_loc.clone();
                    // Only the first subscript is kept as the index.
                    let mut subscripts = self.parse_subscript_list();
                    let index = subscripts.release_head().map(Box::new);
                    if !self.match_tok(Token::Rbracket) {
                        debug!("parse_power: skipping to `]`");
                        self.skip_to(Token::Rbracket);
                    }
                    atom = Some(Expr::ArraySlice {
                        ldelim_loc,
                        base: atom.map(Box::new),
                        index,
                        rdelim_loc: self.last_loc.clone(),
                    });
                }

                Token::Dot => {
                    self.consume_token();
                    let opr_loc = self.last_loc.clone();
                    let name = self.parse_name().map(Name::Simple);
                    atom = Some(Expr::MemberAccess {
                        opr_loc,
                        base: atom.map(Box::new),
                        name,
                    });
                }

                _ => break,
            }
        }

        if self.maybe_consume(Token::StarStar) {
            return self.complete_binary_expr(BinaryOp::Power, atom, Self::parse_factor);
        }

        atom
    }

    /*
     * atom: ('(' [yield_expr|testlist_comp] ')' |
     *        '[' [listmaker] ']' |
     *        '{' [dictorsetmaker] '}' |
     *        '`' testlist1 '`' |
     *        NAME | NUMBER | STRING+)
     *
     * Note: 'None', 'True', and 'False' lex as keywords.
     */
    fn parse_atom(&mut self) -> Option<Expr> {
        match self.ahead {
            Token::Lparen => self.parse_wrapped_or_tuple(),
            Token::Lbrace => self.parse_dict_or_set_maker(),
            Token::Lbracket => self.parse_list_maker(),

            Token::Backtick => {
                self.consume_token();
                let loc = self.last_loc.clone();
                self.parse_test_list1(); // the repr operand is dropped
                if !self.match_tok(Token::Backtick) {
                    debug!("parse_atom: skipping to backtick");
                    self.skip_to(Token::Backtick);
                }
                Some(Expr::StrLit {
                    text: EcoString::new(),
                    loc: loc.joined(&self.last_loc),
                })
            }

            Token::Identifier => {
                let name = self.parse_name()?;
                Some(Expr::Ident {
                    name: Name::Simple(name),
                })
            }

            Token::IntegerLiteral => {
                self.consume_token();
                Some(Expr::IntLit {
                    text: self.last_lexeme.clone(),
                    loc: self.last_loc.clone(),
                })
            }

            Token::FloatLiteral => {
                self.consume_token();
                Some(Expr::FloatLit {
                    text: self.last_lexeme.clone(),
                    loc: self.last_loc.clone(),
                })
            }

            Token::NullLiteral => {
                self.consume_token();
                Some(Expr::NullLit {
                    loc: self.last_loc.clone(),
                })
            }

            Token::TrueLiteral | Token::FalseLiteral => {
                let value = self.ahead == Token::TrueLiteral;
                self.consume_token();
                Some(Expr::BoolLit {
                    value,
                    loc: self.last_loc.clone(),
                })
            }

            Token::StringLiteral => self.parse_str_lit(),

            _ => {
                self.fail_match(true);
                None
            }
        }
    }

    /*
     * subscript: '.' '.' '.' | test | [test] ':' [test] [sliceop]
     * sliceop: ':' [test]
     */
    fn parse_subscript(&mut self) -> Option<Expr> {
        match self.ahead {
            Token::DotDotDot => {
                // The bare `...` becomes an endpoint-less subrange.
                self.consume_token();
                Some(Expr::Subrange {
                    delim1_loc: SourceLoc::default(),
                    low: None,
                    hi: None,
                    delim2_loc: None,
                    max: None,
                })
            }

            Token::Colon => {
                self.consume_token();
                self.complete_subrange_expr(None)
            }

            _ => {
                let test = self.parse_test();
                if self.maybe_consume(Token::Colon) {
                    return self.complete_subrange_expr(test);
                }
                test
            }
        }
    }

    /*
     * subscriptlist: subscript (',' subscript)* [',']
     */
    fn parse_subscript_list(&mut self) -> AstList<Expr> {
        self.parse_list(
            Token::Comma,
            Self::is_subscript_ahead,
            Self::parse_subscript,
            true,
        )
        .0
    }

    /*
     * dictorsetmaker: ( (test ':' test (comp_for | (',' test ':' test)* [','])) |
     *                   (test (comp_for | (',' test)* [','])) )
     *
     * Note: this actually parses '{' [dictorsetmaker] '}'.
     */
    fn parse_dict_or_set_maker(&mut self) -> Option<Expr> {
        debug_assert!(self.ahead == Token::Lbrace);

        self.match_tok(Token::Lbrace);
        let ldelim_loc = self.last_loc.clone();
        if self.maybe_consume(Token::Rbrace) {
            return Some(Expr::ArrayInit {
                ldelim_loc,
                inits: AstList::new(),
                rdelim_loc: self.last_loc.clone(),
            });
        }

        let test = self.parse_test();
        match self.ahead {
            Token::Colon => {
                self.consume_token();
                let delim_loc = self.last_loc.clone();
                let desig = Expr::Designate {
                    id: test.map(Box::new),
                    delim_loc,
                    value: self.parse_test().map(Box::new),
                };

                if self.ahead == Token::For {
                    let mut compre = self
                        .parse_compre_for(CompreBuild::new(ldelim_loc), CompreStyle::NewForm);
                    compre.expr = Some(Box::new(desig));
                    if !self.match_tok(Token::Rbrace) {
                        debug!("parse_dict_or_set_maker: skipping to `}}`");
                        self.skip_to(Token::Rbrace);
                    }
                    return Some(compre.into_expr(self.last_loc.clone()));
                }

                let mut inits = AstList::new();
                inits.push(desig);
                while self.maybe_consume(Token::Comma) {
                    if !self.is_test_ahead() {
                        break;
                    }
                    inits.mark_delim(self.last_loc.clone());
                    let id = self.parse_test().map(Box::new);
                    self.match_tok(Token::Colon);
                    let delim_loc = self.last_loc.clone();
                    inits.push(Expr::Designate {
                        id,
                        delim_loc,
                        value: self.parse_test().map(Box::new),
                    });
                }
                if !self.match_tok(Token::Rbrace) {
                    debug!("parse_dict_or_set_maker: skipping to `}}`");
                    self.skip_to(Token::Rbrace);
                }
                Some(Expr::ArrayInit {
                    ldelim_loc,
                    inits,
                    rdelim_loc: self.last_loc.clone(),
                })
            }

            Token::For => {
                let mut compre =
                    self.parse_compre_for(CompreBuild::new(ldelim_loc), CompreStyle::NewForm);
                compre.expr = test.map(Box::new);
                if !self.match_tok(Token::Rbrace) {
                    debug!("parse_dict_or_set_maker: skipping to `}}`");
                    self.skip_to(Token::Rbrace);
                }
                Some(compre.into_expr(self.last_loc.clone()))
            }

            _ => {
                let mut inits = AstList::new();
                if let Some(test) = test {
                    inits.push(test);
                }
                if self.maybe_consume(Token::Comma) {
                    inits.mark_delim(self.last_loc.clone());
                    if self.is_test_ahead() {
                        inits.merge(self.parse_test_list());
                    }
                }
                if !self.match_tok(Token::Rbrace) {
                    debug!("parse_dict_or_set_maker: skipping to `}}`");
                    self.skip_to(Token::Rbrace);
                }
                Some(Expr::ArrayInit {
                    ldelim_loc,
                    inits,
                    rdelim_loc: self.last_loc.clone(),
                })
            }
        }
    }

    /*
     * listmaker: test ( list_for | (',' test)* [','] )
     *
     * Note: this actually parses '[' [listmaker] ']'.
     */
    fn parse_list_maker(&mut self) -> Option<Expr> {
        debug_assert!(self.ahead == Token::Lbracket);

        self.match_tok(Token::Lbracket);
        let ldelim_loc = self.last_loc.clone();
        if self.maybe_consume(Token::Rbracket) {
            return Some(Expr::ArrayInit {
                ldelim_loc,
                inits: AstList::new(),
                rdelim_loc: self.last_loc.clone(),
            });
        }

        let test = self.parse_test();
        match self.ahead {
            Token::For => {
                let mut compre =
                    self.parse_compre_for(CompreBuild::new(ldelim_loc), CompreStyle::OldForm);
                compre.expr = test.map(Box::new);
                if !self.match_tok(Token::Rbracket) {
                    debug!("parse_list_maker: skipping to `]`");
                    self.skip_to(Token::Rbracket);
                }
                Some(compre.into_expr(self.last_loc.clone()))
            }

            _ => {
                let mut inits = AstList::new();
                if let Some(test) = test {
                    inits.push(test);
                }
                if self.maybe_consume(Token::Comma) {
                    inits.mark_delim(self.last_loc.clone());
                    if self.is_test_ahead() {
                        inits.merge(self.parse_test_list());
                    }
                }
                if !self.match_tok(Token::Rbracket) {
                    debug!("parse_list_maker: skipping to `]`");
                    self.skip_to(Token::Rbracket);
                }
                Some(Expr::ArrayInit {
                    ldelim_loc,
                    inits,
                    rdelim_loc: self.last_loc.clone(),
                })
            }
        }
    }

    /*
     * wrappedortuple: '(' [yield_expr|testlist_comp] ')'
     * testlist_comp: test ( comp_for | (',' test)* [','] )
     *
     * '()'     - Tuple
     * '(1)'    - Wrapped expr
     * '(1,)'   - Tuple
     * '(1, 2)' - Tuple
     */
    fn parse_wrapped_or_tuple(&mut self) -> Option<Expr> {
        debug_assert!(self.ahead == Token::Lparen);

        self.match_tok(Token::Lparen);
        let ldelim_loc = self.last_loc.clone();
        if self.maybe_consume(Token::Rparen) {
            return Some(Expr::TupleLit {
                ldelim_loc,
                inits: AstList::new(),
                rdelim_loc: self.last_loc.clone(),
            });
        }

        if self.ahead == Token::Yield {
            let inner = self.parse_yield_expr();
            return self.complete_wrapped(ldelim_loc, inner);
        }

        let test = self.parse_test();
        match self.ahead {
            Token::For => {
                let mut compre = self
                    .parse_compre_for(CompreBuild::new(SourceLoc::default()), CompreStyle::NewForm);
                compre.expr = test.map(Box::new);
                let inner = Some(compre.into_expr(SourceLoc::default()));
                self.complete_wrapped(ldelim_loc, inner)
            }

            Token::Comma => {
                self.consume_token();
                let mut inits = AstList::new();
                if let Some(test) = test {
                    inits.push(test);
                }
                inits.mark_delim(self.last_loc.clone());
                if self.is_test_ahead() {
                    inits.merge(self.parse_test_list());
                }
                if !self.match_tok(Token::Rparen) {
                    debug!("parse_wrapped_or_tuple: skipping to `)`");
                    self.skip_to(Token::Rparen);
                }
                Some(Expr::TupleLit {
                    ldelim_loc,
                    inits,
                    rdelim_loc: self.last_loc.clone(),
                })
            }

            _ => self.complete_wrapped(ldelim_loc, test),
        }
    }

    /*
     * yield_expr: 'yield' [testlist]
     */
    fn parse_yield_expr(&mut self) -> Option<Expr> {
        debug_assert!(self.ahead == Token::Yield);

        self.match_tok(Token::Yield);
        let key_loc = self.last_loc.clone();
        let exprs = if self.is_test_ahead() {
            self.parse_test_list()
        } else {
            AstList::new()
        };
        Some(Expr::Yield { key_loc, exprs })
    }

    /*
     * lambdef: 'lambda' [varargslist] ':' test
     * old_lambdef: 'lambda' [varargslist] ':' old_test
     */
    fn parse_lambda_core(&mut self, parse_body: fn(&mut Self) -> Option<Expr>) -> Option<Expr> {
        debug_assert!(self.ahead == Token::Lambda);

        self.match_tok(Token::Lambda);
        let key_loc = self.last_loc.clone();
        let param = self.parse_var_args_list(false);

        self.match_tok(Token::Colon);
        let ldelim_loc = self.last_loc.clone();
        let body = parse_body(self);

        Some(Expr::FuncLit {
            spec: FuncSpec {
                key_loc,
                ldelim_loc,
                param: Some(Box::new(param)),
            },
            stmt: Some(Box::new(Stmt::Expr {
                exprs: single(body),
            })),
        })
    }

    /*
     * dotted_name: NAME ('.' NAME)*
     */
    fn parse_dotted_name(&mut self) -> Option<Name> {
        let (names, _) = self.parse_list(Token::Dot, Self::is_name_ahead, Self::parse_name, false);
        if names.is_empty() {
            return None;
        }
        Some(Name::Nested(NestedName { names }))
    }

    /// A name node is only created when the match succeeds, so every
    /// [`SimpleName`] has an identifier behind it.
    fn parse_name(&mut self) -> Option<SimpleName> {
        if self.match_tok(Token::Identifier) {
            return Some(SimpleName {
                ident: self.last_lexeme.clone(),
                loc: self.last_loc.clone(),
            });
        }
        None
    }

    /// Adjacent string literals concatenate at parse time.
    fn parse_str_lit(&mut self) -> Option<Expr> {
        debug_assert!(self.ahead == Token::StringLiteral);

        self.match_tok(Token::StringLiteral);
        let lit = Expr::StrLit {
            text: self.last_lexeme.clone(),
            loc: self.last_loc.clone(),
        };
        if self.ahead == Token::StringLiteral {
            let rhs = self.parse_str_lit();
            return Some(Expr::Binary {
                op: BinaryOp::Concat,
                opr_loc: SourceLoc::default(),
                lhs: Some(Box::new(lit)),
                rhs: rhs.map(Box::new),
            });
        }

        Some(lit)
    }

    // ========================================================================
    // Completion helpers
    // ========================================================================

    fn complete_subrange_expr(&mut self, low: Option<Expr>) -> Option<Expr> {
        let delim1_loc = self.last_loc.clone();
        let mut hi = None;
        let mut delim2_loc = None;
        let mut max = None;
        if self.is_test_ahead() {
            hi = self.parse_test().map(Box::new);
        }
        if self.maybe_consume(Token::Colon) {
            delim2_loc = Some(self.last_loc.clone());
        }
        if self.is_test_ahead() {
            max = self.parse_test().map(Box::new);
        }
        Some(Expr::Subrange {
            delim1_loc,
            low: low.map(Box::new),
            hi,
            delim2_loc,
            max,
        })
    }

    fn complete_wrapped(&mut self, ldelim_loc: SourceLoc, expr: Option<Expr>) -> Option<Expr> {
        if !self.match_tok(Token::Rparen) {
            debug!("complete_wrapped: skipping to `)`");
            self.skip_to(Token::Rparen);
        }
        Some(Expr::Wrapped {
            ldelim_loc,
            expr: expr.map(Box::new),
            rdelim_loc: self.last_loc.clone(),
        })
    }

    fn complete_unary_expr(
        &mut self,
        op: UnaryOp,
        parse_operand: fn(&mut Self) -> Option<Expr>,
    ) -> Option<Expr> {
        let opr_loc = self.last_loc.clone();
        let expr = parse_operand(self).map(Box::new);
        Some(Expr::Unary { op, opr_loc, expr })
    }

    fn complete_binary_expr(
        &mut self,
        op: BinaryOp,
        lhs: Option<Expr>,
        parse_operand: fn(&mut Self) -> Option<Expr>,
    ) -> Option<Expr> {
        let opr_loc = self.last_loc.clone();
        let rhs = parse_operand(self).map(Box::new);
        Some(Expr::Binary {
            op,
            opr_loc,
            lhs: lhs.map(Box::new),
            rhs,
        })
    }

    /// Parses `item (sep item)*`, recording delimiter locations. Returns
    /// the list and whether a trailing separator was consumed.
    fn parse_list<T>(
        &mut self,
        sep: Token,
        check_ahead: fn(&Self) -> bool,
        parse_item: fn(&mut Self) -> Option<T>,
        trailing_ok: bool,
    ) -> (AstList<T>, bool) {
        let mut list = AstList::new();
        if let Some(item) = parse_item(self) {
            list.push(item);
        }
        while self.maybe_consume(sep) {
            list.mark_delim(self.last_loc.clone());
            if trailing_ok && !check_ahead(self) {
                return (list, true);
            }
            if let Some(item) = parse_item(self) {
                list.push(item);
            }
        }

        (list, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::python::PyLexer;

    fn parse_source(source: &str) -> (bool, ParsingContext) {
        let mut lexer = PyLexer::new();
        lexer.set_buffer(source);
        let mut context = ParsingContext::new("test.py");
        let accepted = PyParser::new().parse(&mut lexer, &mut context);
        (accepted, context)
    }

    fn first_exprs(context: &ParsingContext) -> &AstList<Expr> {
        match &context.ast().expect("no AST").stmts[0] {
            Stmt::Expr { exprs } => exprs,
            stmt => panic!("expected expression statement, got {stmt:?}"),
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        let (accepted, context) = parse_source("");
        assert!(!accepted);
        assert!(context.ast().is_none());

        let (accepted, context) = parse_source("\n\n\n");
        assert!(!accepted);
        assert!(context.ast().is_none());
    }

    #[test]
    fn factor_binds_tighter_than_term() {
        let (accepted, context) = parse_source("a + b * c\n");
        assert!(accepted);
        let exprs = first_exprs(&context);
        let Expr::Binary { op, rhs, .. } = &exprs.items[0] else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Add);
        let Some(rhs) = rhs else { panic!("no rhs") };
        assert!(matches!(**rhs, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn term_binds_tighter_than_shift() {
        let (_, context) = parse_source("1 << 2 + 3\n");
        let exprs = first_exprs(&context);
        let Expr::Binary { op, rhs, .. } = &exprs.items[0] else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Shift);
        let Some(rhs) = rhs else { panic!("no rhs") };
        assert!(matches!(**rhs, Expr::Binary { op: BinaryOp::Add, .. }));
    }

    #[test]
    fn same_precedence_associates_left() {
        let (_, context) = parse_source("a - b + c\n");
        let exprs = first_exprs(&context);
        let Expr::Binary { op, lhs, .. } = &exprs.items[0] else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Add);
        let Some(lhs) = lhs else { panic!("no lhs") };
        assert!(matches!(**lhs, Expr::Binary { op: BinaryOp::Sub, .. }));
    }

    #[test]
    fn power_is_right_associative() {
        let (_, context) = parse_source("a ** b ** c\n");
        let exprs = first_exprs(&context);
        let Expr::Binary { op, rhs, .. } = &exprs.items[0] else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Power);
        let Some(rhs) = rhs else { panic!("no rhs") };
        assert!(matches!(**rhs, Expr::Binary { op: BinaryOp::Power, .. }));
    }

    #[test]
    fn assignment_chains_right_associative() {
        let (_, context) = parse_source("a = b = 1\n");
        let exprs = first_exprs(&context);
        let Expr::Assign { rhs, .. } = &exprs.items[0] else {
            panic!("expected assignment");
        };
        // The outer assign's RHS holds the inner chain value; the outer
        // LHS is the first target wrapped by re-listing.
        assert_eq!(rhs.len(), 1);
    }

    #[test]
    fn augmented_assignment_does_not_chain() {
        let (accepted, context) = parse_source("a += 1\n");
        assert!(accepted);
        let exprs = first_exprs(&context);
        assert!(matches!(exprs.items[0], Expr::Assign { .. }));
        assert!(context.diagnostics().is_empty());
    }

    #[test]
    fn conditional_expression_shape() {
        let (_, context) = parse_source("a if c else b\n");
        let exprs = first_exprs(&context);
        let Expr::Cond { yes, cond, no, .. } = &exprs.items[0] else {
            panic!("expected conditional");
        };
        assert!(yes.is_some());
        assert!(cond.is_some());
        assert!(no.is_some());
    }

    #[test]
    fn comparison_chain() {
        let (_, context) = parse_source("a < b == c\n");
        let exprs = first_exprs(&context);
        let Expr::Binary { op, lhs, .. } = &exprs.items[0] else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Rel);
        let Some(lhs) = lhs else { panic!("no lhs") };
        assert!(matches!(**lhs, Expr::Binary { op: BinaryOp::Rel, .. }));
    }

    #[test]
    fn not_in_and_is_not() {
        let (accepted, context) = parse_source("a not in b\nc is not d\n");
        assert!(accepted);
        assert!(context.diagnostics().is_empty());
        let program = context.ast().unwrap();
        assert_eq!(program.stmts.len(), 2);
    }

    #[test]
    fn adjacent_strings_concatenate() {
        let (_, context) = parse_source("'a' 'b'\n");
        let exprs = first_exprs(&context);
        assert!(matches!(
            exprs.items[0],
            Expr::Binary {
                op: BinaryOp::Concat,
                ..
            }
        ));
    }

    #[test]
    fn call_member_and_subscript_trailers() {
        let (_, context) = parse_source("obj.attr(1, 2)[3]\n");
        let exprs = first_exprs(&context);
        let Expr::ArraySlice { base, .. } = &exprs.items[0] else {
            panic!("expected subscript at the top");
        };
        let Some(base) = base else { panic!("no base") };
        let Expr::Call { base, .. } = &**base else {
            panic!("expected call below subscript");
        };
        let Some(base) = base else { panic!("no base") };
        assert!(matches!(**base, Expr::MemberAccess { .. }));
    }

    #[test]
    fn slice_subscript() {
        let (_, context) = parse_source("xs[1:2:3]\n");
        let exprs = first_exprs(&context);
        let Expr::ArraySlice { index, .. } = &exprs.items[0] else {
            panic!("expected subscript");
        };
        let Some(index) = index else { panic!("no index") };
        let Expr::Subrange { low, hi, max, .. } = &**index else {
            panic!("expected subrange");
        };
        assert!(low.is_some());
        assert!(hi.is_some());
        assert!(max.is_some());
    }

    #[test]
    fn list_comprehension_shape() {
        let (_, context) = parse_source("[x*x for x in xs if x > 0]\n");
        let exprs = first_exprs(&context);
        let Expr::ListCompre { expr, gens, .. } = &exprs.items[0] else {
            panic!("expected comprehension");
        };
        assert!(matches!(
            expr.as_deref(),
            Some(Expr::Binary {
                op: BinaryOp::Mul,
                ..
            })
        ));
        assert_eq!(gens.len(), 1);
        assert_eq!(gens[0].patterns.len(), 1);
        assert!(gens[0].range.is_some());
        assert_eq!(gens[0].filters.len(), 1);
    }

    #[test]
    fn dict_comprehension_yields_designate() {
        let (_, context) = parse_source("{k: v for k in ks}\n");
        let exprs = first_exprs(&context);
        let Expr::ListCompre { expr, gens, .. } = &exprs.items[0] else {
            panic!("expected comprehension");
        };
        assert!(matches!(expr.as_deref(), Some(Expr::Designate { .. })));
        assert_eq!(gens.len(), 1);
    }

    #[test]
    fn nested_generators_accumulate() {
        let (_, context) = parse_source("[x for xs in xss for x in xs]\n");
        let exprs = first_exprs(&context);
        let Expr::ListCompre { gens, .. } = &exprs.items[0] else {
            panic!("expected comprehension");
        };
        assert_eq!(gens.len(), 2);
    }

    #[test]
    fn wrapped_vs_tuple() {
        let (_, context) = parse_source("(1)\n(1,)\n()\n");
        let program = context.ast().unwrap();
        let shapes: Vec<_> = program
            .stmts
            .iter()
            .map(|stmt| match stmt {
                Stmt::Expr { exprs } => &exprs.items[0],
                _ => panic!("expected expression statement"),
            })
            .collect();
        assert!(matches!(shapes[0], Expr::Wrapped { .. }));
        assert!(matches!(shapes[1], Expr::TupleLit { .. }));
        assert!(matches!(shapes[2], Expr::TupleLit { .. }));
    }

    #[test]
    fn lambda_builds_function_literal() {
        let (_, context) = parse_source("lambda x, y=1: x + y\n");
        let exprs = first_exprs(&context);
        let Expr::FuncLit { spec, stmt } = &exprs.items[0] else {
            panic!("expected function literal");
        };
        assert!(spec.param.is_some());
        assert!(matches!(stmt.as_deref(), Some(Stmt::Expr { .. })));
    }

    #[test]
    fn keyword_argument_is_assign() {
        let (_, context) = parse_source("f(a, b=2)\n");
        let exprs = first_exprs(&context);
        let Expr::Call { args, .. } = &exprs.items[0] else {
            panic!("expected call");
        };
        assert_eq!(args.len(), 2);
        assert!(matches!(args.items[1], Expr::Assign { .. }));
    }

    #[test]
    fn splat_arguments_become_unpack() {
        let (_, context) = parse_source("f(a, *rest, **kw)\n");
        let exprs = first_exprs(&context);
        let Expr::Call { args, .. } = &exprs.items[0] else {
            panic!("expected call");
        };
        assert_eq!(args.len(), 3);
        assert!(matches!(args.items[1], Expr::Unpack { .. }));
        assert!(matches!(args.items[2], Expr::Unpack { .. }));
    }

    #[test]
    fn missing_rparen_reports_once_and_call_survives() {
        let (accepted, context) = parse_source("f(a, b\n");
        assert!(accepted);
        let reports = context.diagnostics();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].kind, DiagnosticKind::UnexpectedToken);
        let exprs = first_exprs(&context);
        let Expr::Call { args, .. } = &exprs.items[0] else {
            panic!("expected call");
        };
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn missing_rbracket_keeps_statement_shape() {
        let (accepted, context) = parse_source("xs[1\n");
        assert!(accepted);
        assert_eq!(context.diagnostics().len(), 1);
        // Recovery leaves the newline in place, so the subscript stays a
        // plain expression statement.
        let exprs = first_exprs(&context);
        assert!(matches!(exprs.items[0], Expr::ArraySlice { .. }));
    }

    #[test]
    fn backtick_repr_folds_to_string() {
        let (_, context) = parse_source("`x`\n");
        let exprs = first_exprs(&context);
        assert!(matches!(exprs.items[0], Expr::StrLit { .. }));
    }

    #[test]
    fn diagnostic_locations_are_monotonic() {
        let (_, context) = parse_source("f(a,\n)) = ]\n");
        let locs: Vec<_> = context
            .diagnostics()
            .iter()
            .map(|d| (d.loc.first_line, d.loc.first_col))
            .collect();
        let mut sorted = locs.clone();
        sorted.sort_unstable();
        assert_eq!(locs, sorted);
    }
}
