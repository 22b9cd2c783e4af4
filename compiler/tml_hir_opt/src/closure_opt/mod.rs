//! Closure capture optimization.
//!
//! For every closure (inner closures first):
//! - captures never referenced in the body are dropped;
//! - referenced captures that do not escape lose `is_mut`;
//! - the closure's `Closure` type is rebuilt from the new capture list.
//!
//! A capture escapes when the body returns it, passes it as a call or
//! method argument (the receiver does not count), takes a reference to it,
//! stores it in a struct, tuple or array literal, or lets an inner closure
//! capture it.

use std::sync::Arc;

use tml_hir::types::CaptureType;
use tml_hir::visitor::{walk_expr, walk_expr_mut, MutVisitor, Visitor};
use tml_hir::{Expr, HirCapture, HirModule, Type, UnaryOp};
use tracing::{debug, trace};

use crate::HirPass;

#[derive(Debug, Default)]
pub struct ClosureOptimization;

impl ClosureOptimization {
    pub fn new() -> Self {
        ClosureOptimization
    }
}

impl HirPass for ClosureOptimization {
    fn name(&self) -> &'static str {
        "closure-optimization"
    }

    fn run(&mut self, module: &mut HirModule) -> bool {
        let mut trimmer = Trimmer { rewritten: 0 };
        for function in module.all_functions_mut() {
            trimmer.visit_function_mut(function);
        }
        debug!(pass = self.name(), rewritten = trimmer.rewritten, "pass finished");
        trimmer.rewritten > 0
    }
}

struct Trimmer {
    rewritten: usize,
}

impl MutVisitor for Trimmer {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
        if let Expr::Closure {
            id,
            body,
            captures,
            ty,
            ..
        } = expr
        {
            let optimized = optimize_captures(body, captures);
            if optimized != *captures {
                trace!(
                    closure = %id,
                    before = captures.len(),
                    after = optimized.len(),
                    "captures rewritten"
                );
                *ty = rebuild_type(ty.take(), &optimized);
                *captures = optimized;
                self.rewritten += 1;
            }
        }
    }
}

fn optimize_captures(body: &Expr, captures: &[HirCapture]) -> Vec<HirCapture> {
    captures
        .iter()
        .filter(|capture| is_used(body, &capture.name))
        .map(|capture| {
            let mut capture = capture.clone();
            if capture.is_mut && !escapes(body, &capture.name) {
                capture.is_mut = false;
            }
            capture
        })
        .collect()
}

fn rebuild_type(ty: Option<Arc<Type>>, captures: &[HirCapture]) -> Option<Arc<Type>> {
    match ty.as_deref() {
        Some(Type::Closure { params, ret, .. }) => Some(Arc::new(Type::Closure {
            params: params.clone(),
            ret: ret.clone(),
            captures: captures
                .iter()
                .map(|c| CaptureType {
                    name: c.name.clone(),
                    ty: c.ty.clone(),
                    is_mut: c.is_mut,
                })
                .collect(),
        })),
        _ => ty,
    }
}

/// Finds a `Var` named `name` anywhere below the visited node.
struct UseFinder<'n> {
    name: &'n str,
    found: bool,
}

impl<'hir> Visitor<'hir> for UseFinder<'_> {
    fn visit_expr(&mut self, expr: &'hir Expr) {
        if self.found {
            return;
        }
        if matches!(expr, Expr::Var { name, .. } if name == self.name) {
            self.found = true;
            return;
        }
        walk_expr(self, expr);
    }
}

fn is_used(expr: &Expr, name: &str) -> bool {
    let mut finder = UseFinder { name, found: false };
    finder.visit_expr(expr);
    finder.found
}

/// Looks for an escaping use of `name`.
struct EscapeFinder<'n> {
    name: &'n str,
    escapes: bool,
}

impl EscapeFinder<'_> {
    fn any_used<'e>(&self, mut exprs: impl Iterator<Item = &'e Expr>) -> bool {
        exprs.any(|e| is_used(e, self.name))
    }
}

impl<'hir> Visitor<'hir> for EscapeFinder<'_> {
    fn visit_expr(&mut self, expr: &'hir Expr) {
        if self.escapes {
            return;
        }
        let escapes = match expr {
            Expr::Return {
                value: Some(value), ..
            } => is_used(value, self.name),
            Expr::Call { args, .. } | Expr::MethodCall { args, .. } => self.any_used(args.iter()),
            Expr::Unary {
                op: UnaryOp::Ref | UnaryOp::RefMut,
                operand,
                ..
            } => is_used(operand, self.name),
            Expr::Struct { fields, .. } => self.any_used(fields.iter().map(|(_, value)| value)),
            Expr::Tuple { elements, .. } | Expr::Array { elements, .. } => {
                self.any_used(elements.iter())
            }
            Expr::Closure { captures, .. } => captures.iter().any(|c| c.name == self.name),
            _ => false,
        };
        if escapes {
            self.escapes = true;
            return;
        }
        walk_expr(self, expr);
    }
}

fn escapes(expr: &Expr, name: &str) -> bool {
    let mut finder = EscapeFinder {
        name,
        escapes: false,
    };
    finder.visit_expr(expr);
    finder.escapes
}
