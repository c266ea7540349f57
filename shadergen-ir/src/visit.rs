//! Pre-order walkers over IR bodies.

use crate::ir::{Expr, ExprKind, Stmt};

/// Visit every statement, including nested ones, in source order.
pub fn for_each_stmt<'a, F>(body: &'a [Stmt], f: &mut F)
where
    F: FnMut(&'a Stmt),
{
    for stmt in body {
        f(stmt);
        match stmt {
            Stmt::If { then, otherwise, .. } => {
                for_each_stmt(then, f);
                if let Some(otherwise) = otherwise {
                    for_each_stmt(otherwise, f);
                }
            }
            Stmt::For {
                init, step, body, ..
            } => {
                for_each_stmt(init, f);
                for_each_stmt(step, f);
                for_each_stmt(body, f);
            }
            Stmt::While { body, .. } | Stmt::DoWhile { body, .. } | Stmt::Block(body) => {
                for_each_stmt(body, f)
            }
            Stmt::Switch { cases, default, .. } => {
                for case in cases {
                    for_each_stmt(&case.body, f);
                }
                if let Some(default) = default {
                    for_each_stmt(default, f);
                }
            }
            _ => {}
        }
    }
}

/// Visit every expression, including sub-expressions, in source order.
pub fn for_each_expr<'a, F>(body: &'a [Stmt], f: &mut F)
where
    F: FnMut(&'a Expr),
{
    for_each_stmt(body, &mut |stmt| match stmt {
        Stmt::Declare { init, .. } => {
            if let Some(init) = init {
                walk_expr(init, f);
            }
        }
        Stmt::Assign { target, value, .. } => {
            walk_expr(target, f);
            walk_expr(value, f);
        }
        Stmt::Expr(expr) => walk_expr(expr, f),
        Stmt::If { condition, .. }
        | Stmt::While { condition, .. }
        | Stmt::DoWhile { condition, .. } => walk_expr(condition, f),
        Stmt::For { condition, .. } => {
            if let Some(condition) = condition {
                walk_expr(condition, f);
            }
        }
        Stmt::Switch { selector, .. } => walk_expr(selector, f),
        Stmt::Return(Some(expr)) => walk_expr(expr, f),
        Stmt::Return(None) | Stmt::Break | Stmt::Continue | Stmt::Block(_) => {}
    });
}

/// Visit `expr` and all of its sub-expressions.
pub fn walk_expr<'a, F>(expr: &'a Expr, f: &mut F)
where
    F: FnMut(&'a Expr),
{
    f(expr);
    match &expr.kind {
        ExprKind::Literal(_) | ExprKind::Local(_) | ExprKind::Resource(_) => {}
        ExprKind::Field { base, .. } | ExprKind::Swizzle { base, .. } => walk_expr(base, f),
        ExprKind::Index { base, index } => {
            walk_expr(base, f);
            walk_expr(index, f);
        }
        ExprKind::Unary { operand, .. } | ExprKind::Cast(operand) => walk_expr(operand, f),
        ExprKind::Binary { lhs, rhs, .. } => {
            walk_expr(lhs, f);
            walk_expr(rhs, f);
        }
        ExprKind::Conditional {
            condition,
            then,
            otherwise,
        } => {
            walk_expr(condition, f);
            walk_expr(then, f);
            walk_expr(otherwise, f);
        }
        ExprKind::Call { args, .. }
        | ExprKind::Intrinsic { args, .. }
        | ExprKind::Construct(args) => {
            for arg in args {
                walk_expr(arg, f);
            }
        }
    }
}
