// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Whole-node location computation for the Python AST.
//!
//! AST nodes store the locations of their salient tokens; tooling often
//! wants the span of an entire node (hover, selection, folding). The
//! locator joins a node's token locations with its children's spans,
//! bottom-up.

use crate::ast::{AstList, Decl, Expr, Name, Stmt};
use crate::factory::AstLocator;
use crate::source_analysis::SourceLoc;

/// Locator over the uniform AST as produced by the Python parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct PyAstLocator;

impl AstLocator for PyAstLocator {
    fn expr_loc(&self, expr: &Expr) -> SourceLoc {
        expr_loc(expr)
    }

    fn stmt_loc(&self, stmt: &Stmt) -> SourceLoc {
        stmt_loc(stmt)
    }
}

fn opt_expr_loc(expr: Option<&Expr>) -> SourceLoc {
    expr.map(expr_loc).unwrap_or_default()
}

fn opt_stmt_loc(stmt: Option<&Stmt>) -> SourceLoc {
    stmt.map(stmt_loc).unwrap_or_default()
}

fn opt_name_loc(name: Option<&Name>) -> SourceLoc {
    name.map(Name::loc).unwrap_or_default()
}

fn expr_list_loc(list: &AstList<Expr>) -> SourceLoc {
    let first = list.items.first().map(expr_loc).unwrap_or_default();
    let last = list.items.last().map(expr_loc).unwrap_or_default();
    first.joined(&last)
}

fn expr_loc(expr: &Expr) -> SourceLoc {
    match expr {
        Expr::IntLit { loc, .. }
        | Expr::FloatLit { loc, .. }
        | Expr::StrLit { loc, .. }
        | Expr::NullLit { loc }
        | Expr::BoolLit { loc, .. } => loc.clone(),

        Expr::Ident { name } => name.loc(),

        Expr::Unary { opr_loc, expr, .. } => opr_loc.joined(&opt_expr_loc(expr.as_deref())),

        Expr::Binary {
            opr_loc, lhs, rhs, ..
        } => opt_expr_loc(lhs.as_deref())
            .joined(opr_loc)
            .joined(&opt_expr_loc(rhs.as_deref())),

        Expr::Assign { opr_loc, lhs, rhs } => expr_list_loc(lhs)
            .joined(opr_loc)
            .joined(&expr_list_loc(rhs)),

        Expr::Cond { yes, no, .. } => {
            opt_expr_loc(yes.as_deref()).joined(&opt_expr_loc(no.as_deref()))
        }

        Expr::Call {
            base, rdelim_loc, ..
        } => opt_expr_loc(base.as_deref()).joined(rdelim_loc),

        Expr::MemberAccess {
            opr_loc, base, name,
        } => opt_expr_loc(base.as_deref())
            .joined(opr_loc)
            .joined(&opt_name_loc(name.as_ref())),

        Expr::ArraySlice {
            base, rdelim_loc, ..
        } => opt_expr_loc(base.as_deref()).joined(rdelim_loc),

        Expr::Subrange {
            delim1_loc,
            low,
            hi,
            max,
            ..
        } => opt_expr_loc(low.as_deref())
            .joined(delim1_loc)
            .joined(&opt_expr_loc(hi.as_deref()))
            .joined(&opt_expr_loc(max.as_deref())),

        Expr::ArrayInit {
            ldelim_loc,
            rdelim_loc,
            ..
        }
        | Expr::TupleLit {
            ldelim_loc,
            rdelim_loc,
            ..
        }
        | Expr::Wrapped {
            ldelim_loc,
            rdelim_loc,
            ..
        } => ldelim_loc.joined(rdelim_loc),

        Expr::Designate { id, value, .. } => {
            opt_expr_loc(id.as_deref()).joined(&opt_expr_loc(value.as_deref()))
        }

        Expr::ListCompre {
            ldelim_loc,
            expr,
            gens,
            rdelim_loc,
        } => {
            let mut loc = ldelim_loc.joined(rdelim_loc);
            loc = loc.joined(&opt_expr_loc(expr.as_deref()));
            for gen in gens {
                loc = loc.joined(&opt_expr_loc(gen.range.as_deref()));
                for filter in &gen.filters {
                    loc = loc.joined(&expr_loc(filter));
                }
            }
            loc
        }

        Expr::Yield { key_loc, exprs } => key_loc.joined(&expr_list_loc(exprs)),

        Expr::Unpack { key_loc, expr } => key_loc.joined(&opt_expr_loc(expr.as_deref())),

        Expr::FuncLit { spec, stmt } => spec.key_loc.joined(&opt_stmt_loc(stmt.as_deref())),

        Expr::Print { key_loc, exprs, .. } | Expr::Del { key_loc, exprs } => {
            key_loc.joined(&expr_list_loc(exprs))
        }

        Expr::Assert { key_loc, expr } => key_loc.joined(&opt_expr_loc(expr.as_deref())),
    }
}

fn stmt_loc(stmt: &Stmt) -> SourceLoc {
    match stmt {
        Stmt::Block { stmts } => {
            let first = stmts.first().map(stmt_loc).unwrap_or_default();
            let last = stmts.last().map(stmt_loc).unwrap_or_default();
            first.joined(&last)
        }

        Stmt::Expr { exprs } => expr_list_loc(exprs),

        Stmt::Decl { decl } => decl_loc(decl),

        Stmt::If {
            if_loc,
            then,
            not_then,
            ..
        } => if_loc
            .joined(&opt_stmt_loc(then.as_deref()))
            .joined(&opt_stmt_loc(not_then.as_deref())),

        Stmt::While {
            while_loc, body, ..
        } => while_loc.joined(&opt_stmt_loc(body.as_deref())),

        Stmt::Foreach { key_loc, body, .. } | Stmt::With { key_loc, body, .. } => {
            key_loc.joined(&opt_stmt_loc(body.as_deref()))
        }

        Stmt::Try {
            key_loc,
            body,
            catches,
            final_,
        } => {
            let mut loc = key_loc.joined(&opt_stmt_loc(body.as_deref()));
            if let Some(last) = catches.last() {
                loc = loc.joined(&opt_stmt_loc(last.body.as_deref()));
            }
            if let Some(final_) = final_ {
                loc = loc.joined(&opt_stmt_loc(final_.body.as_deref()));
            }
            loc
        }

        Stmt::Return { key_loc, exprs } => key_loc.joined(&expr_list_loc(exprs)),

        Stmt::Break { key_loc } | Stmt::Continue { key_loc } | Stmt::Empty { key_loc } => {
            key_loc.clone()
        }

        Stmt::Throw { key_loc, expr } | Stmt::Eval { key_loc, expr } => {
            key_loc.joined(&opt_expr_loc(expr.as_deref()))
        }

        Stmt::Yield { expr } => opt_expr_loc(expr.as_deref()),
    }
}

fn decl_loc(decl: &Decl) -> SourceLoc {
    match decl {
        Decl::ImportClause {
            key_loc, modules, ..
        } => {
            let last = modules.items.last().map(decl_loc).unwrap_or_default();
            key_loc.joined(&last)
        }

        Decl::ImportModule {
            expr,
            local_name,
            members,
            ..
        } => {
            let mut loc = opt_expr_loc(expr.as_deref());
            loc = loc.joined(&opt_name_loc(local_name.as_ref()));
            if let Some(last) = members.items.last() {
                loc = loc.joined(&decl_loc(last));
            }
            loc
        }

        Decl::ImportMember {
            actual_name,
            nick_name,
            ..
        } => opt_name_loc(actual_name.as_ref()).joined(&opt_name_loc(nick_name.as_ref())),

        Decl::Record { name, spec } => spec
            .key_loc
            .joined(&opt_name_loc(name.as_ref()))
            .joined(&opt_stmt_loc(spec.proto.as_deref())),

        Decl::Func { name, spec, stmt } => spec
            .key_loc
            .joined(&opt_name_loc(name.as_ref()))
            .joined(&opt_stmt_loc(stmt.as_deref())),

        Decl::ParamClause {
            ldelim_loc,
            groups,
            rdelim_loc,
        } => {
            let mut loc = ldelim_loc.joined(rdelim_loc);
            if let Some(last) = groups.items.last() {
                loc = loc.joined(&decl_loc(last));
            }
            loc
        }

        Decl::ParamGroup { decls, .. } | Decl::VarGroup { decls, .. } => {
            let first = decls.items.first().map(decl_loc).unwrap_or_default();
            let last = decls.items.last().map(decl_loc).unwrap_or_default();
            first.joined(&last)
        }

        Decl::Param {
            name,
            default,
            variadic_loc,
            ..
        } => {
            let mut loc = opt_name_loc(name.as_ref());
            if let Some(variadic_loc) = variadic_loc {
                loc = loc.joined(variadic_loc);
            }
            loc.joined(&opt_expr_loc(default.as_deref()))
        }

        Decl::Var { name } | Decl::Base { name } => opt_name_loc(name.as_ref()),
    }
}
