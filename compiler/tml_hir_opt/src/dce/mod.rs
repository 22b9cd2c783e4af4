//! Dead code elimination.
//!
//! Collapses `if` expressions whose condition is a literal bool:
//!
//! ```text
//! if true  { A } else { B }   =>  A
//! if false { A } else { B }   =>  B
//! if false { A }              =>  unchanged
//! ```
//!
//! The surviving branch is processed again, so nested constant `if`s
//! collapse in one run. The purity queries below describe which
//! expressions could be dropped; the pass itself does not act on them.

use tml_hir::visitor::{walk_expr_mut, MutVisitor};
use tml_hir::{Expr, HirModule, LiteralValue, Stmt, UnaryOp};
use tracing::debug;

use crate::HirPass;

#[derive(Debug, Default)]
pub struct DeadCodeElimination;

impl DeadCodeElimination {
    pub fn new() -> Self {
        DeadCodeElimination
    }
}

impl HirPass for DeadCodeElimination {
    fn name(&self) -> &'static str {
        "dead-code-elimination"
    }

    fn run(&mut self, module: &mut HirModule) -> bool {
        let mut eliminator = Eliminator { removed: 0 };
        for function in module.all_functions_mut() {
            eliminator.visit_function_mut(function);
        }
        debug!(pass = self.name(), removed = eliminator.removed, "pass finished");
        eliminator.removed > 0
    }
}

struct Eliminator {
    removed: usize,
}

impl MutVisitor for Eliminator {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if let Expr::If { condition, .. } = expr {
            self.visit_expr_mut(condition);
        }
        if collapse_constant_if(expr) {
            self.removed += 1;
            self.visit_expr_mut(expr);
            return;
        }
        walk_expr_mut(self, expr);
    }
}

/// Replaces `expr` by its live branch. Returns `false` when `expr` is not
/// an `if` on a literal, or is `if false` without an else.
fn collapse_constant_if(expr: &mut Expr) -> bool {
    let Expr::If {
        condition,
        then_branch,
        else_branch,
        ..
    } = expr
    else {
        return false;
    };
    let Some(taken) = condition.literal().and_then(LiteralValue::as_bool) else {
        return false;
    };
    let live = match (taken, else_branch) {
        (true, _) => std::mem::replace(then_branch.as_mut(), Expr::placeholder()),
        (false, Some(else_branch)) => std::mem::replace(else_branch.as_mut(), Expr::placeholder()),
        (false, None) => return false,
    };
    *expr = live;
    true
}

/// Whether `stmt` unconditionally leaves the enclosing block.
pub fn is_terminating(stmt: &Stmt) -> bool {
    matches!(
        stmt,
        Stmt::Expr { expr, .. }
            if matches!(**expr, Expr::Return { .. } | Expr::Break { .. } | Expr::Continue { .. })
    )
}

/// Whether evaluating `expr` has no observable effect.
///
/// Conservative: only literals, variables, operators (except
/// dereference), tuples, arrays, field access and indexing over pure
/// operands qualify.
pub fn is_pure_expr(expr: &Expr) -> bool {
    match expr {
        Expr::Literal { .. } | Expr::Var { .. } => true,
        Expr::Binary { left, right, .. } => is_pure_expr(left) && is_pure_expr(right),
        Expr::Unary { op, operand, .. } => *op != UnaryOp::Deref && is_pure_expr(operand),
        Expr::Tuple { elements, .. } | Expr::Array { elements, .. } => {
            elements.iter().all(is_pure_expr)
        }
        Expr::Field { object, .. } => is_pure_expr(object),
        Expr::Index { object, index, .. } => is_pure_expr(object) && is_pure_expr(index),
        _ => false,
    }
}

pub fn has_side_effects(expr: &Expr) -> bool {
    !is_pure_expr(expr)
}
