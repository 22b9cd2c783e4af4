//! Blocks and statements.

use crate::ast;
use crate::env::TypeEnv;
use crate::hir::{Expr, Pattern, Stmt, WhenArm};
use crate::span::Span;
use crate::types::{HirType, Type};

use super::HirBuilder;

impl<E: TypeEnv + ?Sized> HirBuilder<'_, E> {
    /// Lowers a block in its own scope. The block's type is the trailing
    /// expression's type, or unit.
    pub(super) fn lower_block(&mut self, block: &ast::BlockExpr) -> Expr {
        let (stmts, expr) = self.lower_block_parts(block);
        let ty = expr.as_ref().map_or_else(|| Some(Type::unit()), |e| e.ty());
        Expr::Block {
            id: self.fresh_id(),
            stmts,
            expr,
            ty,
            span: block.span,
        }
    }

    pub(super) fn lower_lowlevel(&mut self, block: &ast::BlockExpr) -> Expr {
        let (stmts, expr) = self.lower_block_parts(block);
        let ty = expr.as_ref().map_or_else(|| Some(Type::unit()), |e| e.ty());
        Expr::Lowlevel {
            id: self.fresh_id(),
            stmts,
            expr,
            ty,
            span: block.span,
        }
    }

    fn lower_block_parts(&mut self, block: &ast::BlockExpr) -> (Vec<Stmt>, Option<Box<Expr>>) {
        self.scopes.push();
        let stmts = block.stmts.iter().map(|s| self.lower_stmt(s)).collect();
        let expr = block.expr.as_ref().map(|e| Box::new(self.lower_expr(e)));
        self.scopes.pop();
        (stmts, expr)
    }

    fn lower_stmt(&mut self, stmt: &ast::Stmt) -> Stmt {
        match stmt {
            ast::Stmt::Let {
                pattern,
                ty,
                init,
                span,
            } => {
                let init = init.as_ref().map(|e| self.lower_expr(e));
                let declared = match ty {
                    Some(ty) => self.resolve_type(ty),
                    None => init.as_ref().and_then(Expr::ty),
                };
                let pattern = self.lower_pattern(pattern, &declared);
                Stmt::Let {
                    id: self.fresh_id(),
                    pattern,
                    ty: declared,
                    init: init.map(Box::new),
                    span: *span,
                }
            }
            ast::Stmt::Var {
                name,
                ty,
                init,
                span,
            } => {
                let init = self.lower_expr(init);
                let declared = match ty {
                    Some(ty) => self.resolve_type(ty),
                    None => init.ty(),
                };
                self.scopes.bind(name.clone(), declared.clone(), true);
                let pattern = Pattern::Binding {
                    id: self.fresh_id(),
                    name: name.clone(),
                    is_mut: true,
                    ty: declared.clone(),
                    span: *span,
                };
                Stmt::Let {
                    id: self.fresh_id(),
                    pattern,
                    ty: declared,
                    init: Some(Box::new(init)),
                    span: *span,
                }
            }
            ast::Stmt::LetElse {
                pattern,
                ty,
                init,
                else_block,
                span,
            } => self.lower_let_else(pattern, ty.as_ref(), init, else_block, *span),
            ast::Stmt::Expr(expr) => {
                let expr = self.lower_expr(expr);
                Stmt::Expr {
                    id: self.fresh_id(),
                    span: expr.span(),
                    expr: Box::new(expr),
                }
            }
        }
    }

    /// `let p = init else { b }` becomes
    /// `let <bindings> = when init { p => <bindings>, _ => b }`.
    fn lower_let_else(
        &mut self,
        pattern: &ast::Pattern,
        ty: Option<&ast::TypeExpr>,
        init: &ast::Expr,
        else_block: &ast::BlockExpr,
        span: Span,
    ) -> Stmt {
        let scrutinee = self.lower_expr(init);
        let scrutinee_ty = match ty {
            Some(ty) => self.resolve_type(ty),
            None => scrutinee.ty(),
        };

        self.scopes.push();
        let match_pattern = self.lower_pattern(pattern, &scrutinee_ty);
        let bindings: Vec<(String, HirType, bool)> = match_pattern
            .bindings()
            .into_iter()
            .map(|(name, ty, is_mut)| (name.to_string(), ty.clone(), is_mut))
            .collect();
        let bound_value = self.bound_value(&bindings, span);
        self.scopes.pop();

        let value_ty = bound_value.ty();
        let match_arm = WhenArm {
            pattern: match_pattern,
            guard: None,
            body: Box::new(bound_value),
            span,
        };
        let wildcard = Pattern::Wildcard {
            id: self.fresh_id(),
            span,
        };
        let else_body = self.lower_block(else_block);
        let else_arm = WhenArm {
            pattern: wildcard,
            guard: None,
            body: Box::new(else_body),
            span: else_block.span,
        };
        let when = Expr::When {
            id: self.fresh_id(),
            scrutinee: Box::new(scrutinee),
            arms: vec![match_arm, else_arm],
            ty: value_ty.clone(),
            span,
        };

        let outer = self.binding_pattern(&bindings, &value_ty, span);
        Stmt::Let {
            id: self.fresh_id(),
            pattern: outer,
            ty: value_ty,
            init: Some(Box::new(when)),
            span,
        }
    }

    /// The value a let-else arm yields: the single binding, a tuple of all
    /// bindings, or unit.
    fn bound_value(&mut self, bindings: &[(String, HirType, bool)], span: Span) -> Expr {
        let mut vars: Vec<Expr> = bindings
            .iter()
            .map(|(name, ty, _)| Expr::Var {
                id: self.fresh_id(),
                name: name.clone(),
                ty: ty.clone(),
                span,
            })
            .collect();
        match vars.len() {
            0 => self.unit_literal(span),
            1 => vars.remove(0),
            _ => {
                let ty = Type::tuple(
                    vars.iter()
                        .map(|v| v.ty().unwrap_or_else(Type::unit))
                        .collect(),
                );
                Expr::Tuple {
                    id: self.fresh_id(),
                    elements: vars,
                    ty: Some(ty),
                    span,
                }
            }
        }
    }

    /// Pattern that rebinds `bindings` in the enclosing scope.
    fn binding_pattern(
        &mut self,
        bindings: &[(String, HirType, bool)],
        value_ty: &HirType,
        span: Span,
    ) -> Pattern {
        let mut elements: Vec<Pattern> = bindings
            .iter()
            .map(|(name, ty, is_mut)| {
                self.scopes.bind(name.clone(), ty.clone(), *is_mut);
                Pattern::Binding {
                    id: self.fresh_id(),
                    name: name.clone(),
                    is_mut: *is_mut,
                    ty: ty.clone(),
                    span,
                }
            })
            .collect();
        match elements.len() {
            0 => Pattern::Wildcard {
                id: self.fresh_id(),
                span,
            },
            1 => elements.remove(0),
            _ => Pattern::Tuple {
                id: self.fresh_id(),
                elements,
                ty: value_ty.clone(),
                span,
            },
        }
    }
}
