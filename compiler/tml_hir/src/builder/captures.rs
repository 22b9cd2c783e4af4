//! Closure lowering and capture analysis.
//!
//! Captures are the free variables of a closure body that are bound in an
//! enclosing scope. The free-variable walk tracks its own bound set: closure
//! parameters, `let`/`var` names in nested blocks (after their initializer),
//! nested closure parameters, and names bound by `when` arms, `if let` and
//! `for` patterns.

use std::collections::BTreeSet;

use crate::ast::{self, ExprKind, Stmt};
use crate::env::TypeEnv;
use crate::hir::{Expr, HirCapture};
use crate::span::Span;
use crate::types::{CaptureType, HirType, Type};

use super::HirBuilder;

impl<E: TypeEnv + ?Sized> HirBuilder<'_, E> {
    pub(super) fn lower_closure(
        &mut self,
        params: &[ast::ClosureParam],
        return_type: Option<&ast::TypeExpr>,
        body: &ast::Expr,
        span: Span,
    ) -> Expr {
        let params: Vec<(String, HirType)> = params
            .iter()
            .map(|param| {
                let name = match &param.pattern.kind {
                    ast::PatternKind::Ident { name, .. } => name.clone(),
                    _ => "_".to_string(),
                };
                let ty = param
                    .ty
                    .as_ref()
                    .map_or_else(|| Some(Type::unit()), |t| self.resolve_type(t));
                (name, ty)
            })
            .collect();

        let captures = self.compute_captures(&params, body);

        self.scopes.push();
        for (name, ty) in &params {
            if name != "_" {
                self.scopes.bind(name.clone(), ty.clone(), false);
            }
        }
        let body = self.lower_expr(body);
        self.scopes.pop();

        let ret = match return_type {
            Some(t) => self.resolve_type(t),
            None => body.ty(),
        };
        let ty = Type::Closure {
            params: params.iter().map(|(_, t)| t.clone()).collect(),
            ret,
            captures: captures
                .iter()
                .map(|c| CaptureType {
                    name: c.name.clone(),
                    ty: c.ty.clone(),
                    is_mut: c.is_mut,
                })
                .collect(),
        };

        Expr::Closure {
            id: self.fresh_id(),
            params,
            body: Box::new(body),
            captures,
            ty: Some(std::sync::Arc::new(ty)),
            span,
        }
    }

    /// Free variables of `body` that resolve to an enclosing binding, sorted
    /// by name. A capture is mutable when its binding is.
    fn compute_captures(&self, params: &[(String, HirType)], body: &ast::Expr) -> Vec<HirCapture> {
        let mut walker = FreeVars::default();
        walker.push(params.iter().map(|(n, _)| n.as_str()));
        walker.expr(body);

        walker
            .free
            .into_iter()
            .filter_map(|name| {
                let binding = self.scopes.lookup(name)?;
                Some(HirCapture {
                    name: name.to_string(),
                    ty: binding.ty.clone().or_else(|| Some(Type::unit())),
                    is_mut: binding.mutable,
                    by_move: false,
                })
            })
            .collect()
    }
}

#[derive(Default)]
struct FreeVars<'a> {
    bound: Vec<Vec<&'a str>>,
    free: BTreeSet<&'a str>,
}

impl<'a> FreeVars<'a> {
    fn push(&mut self, names: impl IntoIterator<Item = &'a str>) {
        self.bound.push(names.into_iter().collect());
    }

    fn pop(&mut self) {
        self.bound.pop();
    }

    fn bind(&mut self, names: impl IntoIterator<Item = &'a str>) {
        if let Some(frame) = self.bound.last_mut() {
            frame.extend(names);
        }
    }

    fn is_bound(&self, name: &str) -> bool {
        self.bound.iter().any(|frame| frame.contains(&name))
    }

    fn block(&mut self, block: &'a ast::BlockExpr) {
        self.push([]);
        for stmt in &block.stmts {
            match stmt {
                Stmt::Let { pattern, init, .. } => {
                    if let Some(init) = init {
                        self.expr(init);
                    }
                    self.bind(pattern.binding_names());
                }
                Stmt::Var { name, init, .. } => {
                    self.expr(init);
                    self.bind([name.as_str()]);
                }
                Stmt::LetElse {
                    pattern,
                    init,
                    else_block,
                    ..
                } => {
                    self.expr(init);
                    self.block(else_block);
                    self.bind(pattern.binding_names());
                }
                Stmt::Expr(expr) => self.expr(expr),
            }
        }
        if let Some(expr) = &block.expr {
            self.expr(expr);
        }
        self.pop();
    }

    fn scoped(&mut self, pattern: &'a ast::Pattern, body: &'a ast::Expr) {
        self.push(pattern.binding_names());
        self.expr(body);
        self.pop();
    }

    fn expr(&mut self, expr: &'a ast::Expr) {
        match &expr.kind {
            ExprKind::Ident(name) => {
                if !self.is_bound(name) {
                    self.free.insert(name);
                }
            }
            ExprKind::Literal(_) | ExprKind::Path { .. } | ExprKind::Continue { .. } => {}
            ExprKind::Binary { left, right, .. }
            | ExprKind::Index {
                object: left,
                index: right,
            }
            | ExprKind::ArrayRepeat {
                value: left,
                count: right,
            }
            | ExprKind::While {
                condition: left,
                body: right,
                ..
            } => {
                self.expr(left);
                self.expr(right);
            }
            ExprKind::Unary { operand: inner, .. }
            | ExprKind::Field { object: inner, .. }
            | ExprKind::Loop { body: inner, .. }
            | ExprKind::Cast { expr: inner, .. }
            | ExprKind::Try(inner)
            | ExprKind::Await(inner) => self.expr(inner),
            ExprKind::Call { callee, args, .. } => {
                self.expr(callee);
                for arg in args {
                    self.expr(arg);
                }
            }
            ExprKind::MethodCall { receiver, args, .. } => {
                self.expr(receiver);
                for arg in args {
                    self.expr(arg);
                }
            }
            ExprKind::Tuple(elements) | ExprKind::Array(elements) => {
                for e in elements {
                    self.expr(e);
                }
            }
            ExprKind::Struct { fields, base, .. } => {
                for (_, value) in fields {
                    self.expr(value);
                }
                if let Some(base) = base {
                    self.expr(base);
                }
            }
            ExprKind::Block(block) | ExprKind::Lowlevel(block) => self.block(block),
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.expr(condition);
                self.expr(then_branch);
                if let Some(else_branch) = else_branch {
                    self.expr(else_branch);
                }
            }
            ExprKind::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                self.expr(condition);
                self.expr(then_expr);
                self.expr(else_expr);
            }
            ExprKind::IfLet {
                pattern,
                scrutinee,
                then_branch,
                else_branch,
            } => {
                self.expr(scrutinee);
                self.scoped(pattern, then_branch);
                if let Some(else_branch) = else_branch {
                    self.expr(else_branch);
                }
            }
            ExprKind::When { scrutinee, arms } => {
                self.expr(scrutinee);
                for arm in arms {
                    self.push(arm.pattern.binding_names());
                    if let Some(guard) = &arm.guard {
                        self.expr(guard);
                    }
                    self.expr(&arm.body);
                    self.pop();
                }
            }
            ExprKind::For {
                pattern,
                iter,
                body,
                ..
            } => {
                self.expr(iter);
                self.scoped(pattern, body);
            }
            ExprKind::Return(value) | ExprKind::Break { value, .. } => {
                if let Some(value) = value {
                    self.expr(value);
                }
            }
            ExprKind::Closure { params, body, .. } => {
                self.push(params.iter().flat_map(|p| p.pattern.binding_names()));
                self.expr(body);
                self.pop();
            }
            ExprKind::Range { start, end, .. } => {
                if let Some(start) = start {
                    self.expr(start);
                }
                if let Some(end) = end {
                    self.expr(end);
                }
            }
        }
    }
}
