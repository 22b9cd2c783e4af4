//! Constant folding.
//!
//! Post-order rewrite: children are folded first, then a `Binary` or
//! `Unary` node whose operands are now literals is replaced by the literal
//! result. The replacement keeps the original node's id and span.
//!
//! # Semantics
//!
//! - Signed and unsigned integers wrap on overflow.
//! - Integer `/` and `%` by zero are left for the runtime to trap.
//! - Shifts fold only for amounts in `0..64`.
//! - Floats follow IEEE rules (`x / 0.0` folds to an infinity or NaN,
//!   `%` is the truncated remainder).
//! - `false and x` and `true or x` fold to the left literal even when `x`
//!   is not constant.

use tml_hir::visitor::{walk_expr_mut, MutVisitor};
use tml_hir::{BinOp, Expr, HirModule, LiteralValue, Type, UnaryOp};
use tracing::debug;

use crate::HirPass;

#[derive(Debug, Default)]
pub struct ConstantFolding;

impl ConstantFolding {
    pub fn new() -> Self {
        ConstantFolding
    }
}

impl HirPass for ConstantFolding {
    fn name(&self) -> &'static str {
        "constant-folding"
    }

    fn run(&mut self, module: &mut HirModule) -> bool {
        let mut folder = Folder { folded: 0 };
        for function in module.all_functions_mut() {
            folder.visit_function_mut(function);
        }
        debug!(pass = self.name(), folded = folder.folded, "pass finished");
        folder.folded > 0
    }
}

struct Folder {
    folded: usize,
}

impl MutVisitor for Folder {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
        if let Some(folded) = try_fold(expr) {
            *expr = folded;
            self.folded += 1;
        }
    }
}

/// The literal `expr` evaluates to, if it can be computed now.
fn try_fold(expr: &Expr) -> Option<Expr> {
    let (id, value, ty, span) = match expr {
        Expr::Binary {
            id,
            op,
            left,
            right,
            ty,
            span,
        } => {
            let value = match (left.literal(), right.literal()) {
                (Some(l), Some(r)) => fold_binary(*op, l, r)?,
                (Some(LiteralValue::Bool(l)), None) => short_circuit(*op, *l)?,
                _ => return None,
            };
            (*id, value, ty, *span)
        }
        Expr::Unary {
            id,
            op,
            operand,
            ty,
            span,
        } => (*id, fold_unary(*op, operand.literal()?)?, ty, *span),
        _ => return None,
    };

    let ty = if matches!(value, LiteralValue::Bool(_)) {
        Some(Type::bool())
    } else {
        ty.clone()
    };
    Some(Expr::Literal {
        id,
        value,
        ty,
        span,
    })
}

fn short_circuit(op: BinOp, left: bool) -> Option<LiteralValue> {
    match (op, left) {
        (BinOp::And, false) | (BinOp::Or, true) => Some(LiteralValue::Bool(left)),
        _ => None,
    }
}

fn fold_binary(op: BinOp, left: &LiteralValue, right: &LiteralValue) -> Option<LiteralValue> {
    match (left, right) {
        (LiteralValue::Int64(a), LiteralValue::Int64(b)) => fold_int(op, *a, *b),
        (LiteralValue::UInt64(a), LiteralValue::UInt64(b)) => fold_uint(op, *a, *b),
        (LiteralValue::Float64(a), LiteralValue::Float64(b)) => fold_float(op, *a, *b),
        (LiteralValue::Bool(a), LiteralValue::Bool(b)) => fold_bool(op, *a, *b),
        _ => None,
    }
}

/// Shift amount usable on a 64-bit operand.
fn shift_amount(amount: u64) -> Option<u32> {
    u32::try_from(amount).ok().filter(|&s| s < 64)
}

fn fold_int(op: BinOp, a: i64, b: i64) -> Option<LiteralValue> {
    use LiteralValue::{Bool, Int64};
    let value = match op {
        BinOp::Add => Int64(a.wrapping_add(b)),
        BinOp::Sub => Int64(a.wrapping_sub(b)),
        BinOp::Mul => Int64(a.wrapping_mul(b)),
        BinOp::Div | BinOp::Mod if b == 0 => return None,
        BinOp::Div => Int64(a.wrapping_div(b)),
        BinOp::Mod => Int64(a.wrapping_rem(b)),
        BinOp::Eq => Bool(a == b),
        BinOp::Ne => Bool(a != b),
        BinOp::Lt => Bool(a < b),
        BinOp::Le => Bool(a <= b),
        BinOp::Gt => Bool(a > b),
        BinOp::Ge => Bool(a >= b),
        BinOp::BitAnd => Int64(a & b),
        BinOp::BitOr => Int64(a | b),
        BinOp::BitXor => Int64(a ^ b),
        BinOp::Shl => Int64(a.wrapping_shl(shift_amount(u64::try_from(b).ok()?)?)),
        BinOp::Shr => Int64(a >> shift_amount(u64::try_from(b).ok()?)?),
        BinOp::And | BinOp::Or => return None,
    };
    Some(value)
}

fn fold_uint(op: BinOp, a: u64, b: u64) -> Option<LiteralValue> {
    use LiteralValue::{Bool, UInt64};
    let value = match op {
        BinOp::Add => UInt64(a.wrapping_add(b)),
        BinOp::Sub => UInt64(a.wrapping_sub(b)),
        BinOp::Mul => UInt64(a.wrapping_mul(b)),
        BinOp::Div | BinOp::Mod if b == 0 => return None,
        BinOp::Div => UInt64(a / b),
        BinOp::Mod => UInt64(a % b),
        BinOp::Eq => Bool(a == b),
        BinOp::Ne => Bool(a != b),
        BinOp::Lt => Bool(a < b),
        BinOp::Le => Bool(a <= b),
        BinOp::Gt => Bool(a > b),
        BinOp::Ge => Bool(a >= b),
        BinOp::BitAnd => UInt64(a & b),
        BinOp::BitOr => UInt64(a | b),
        BinOp::BitXor => UInt64(a ^ b),
        BinOp::Shl => UInt64(a << shift_amount(b)?),
        BinOp::Shr => UInt64(a >> shift_amount(b)?),
        BinOp::And | BinOp::Or => return None,
    };
    Some(value)
}

#[allow(clippy::float_cmp, reason = "language equality on floats is exact IEEE comparison")]
fn fold_float(op: BinOp, a: f64, b: f64) -> Option<LiteralValue> {
    use LiteralValue::{Bool, Float64};
    let value = match op {
        BinOp::Add => Float64(a + b),
        BinOp::Sub => Float64(a - b),
        BinOp::Mul => Float64(a * b),
        BinOp::Div => Float64(a / b),
        BinOp::Mod => Float64(a % b),
        BinOp::Eq => Bool(a == b),
        BinOp::Ne => Bool(a != b),
        BinOp::Lt => Bool(a < b),
        BinOp::Le => Bool(a <= b),
        BinOp::Gt => Bool(a > b),
        BinOp::Ge => Bool(a >= b),
        _ => return None,
    };
    Some(value)
}

fn fold_bool(op: BinOp, a: bool, b: bool) -> Option<LiteralValue> {
    let value = match op {
        BinOp::And => a && b,
        BinOp::Or => a || b,
        BinOp::Eq => a == b,
        BinOp::Ne => a != b,
        _ => return None,
    };
    Some(LiteralValue::Bool(value))
}

fn fold_unary(op: UnaryOp, operand: &LiteralValue) -> Option<LiteralValue> {
    match (op, operand) {
        (UnaryOp::Neg, LiteralValue::Int64(v)) => Some(LiteralValue::Int64(v.wrapping_neg())),
        (UnaryOp::Neg, LiteralValue::Float64(v)) => Some(LiteralValue::Float64(-v)),
        (UnaryOp::Not, LiteralValue::Bool(b)) => Some(LiteralValue::Bool(!b)),
        (UnaryOp::BitNot, LiteralValue::Int64(v)) => Some(LiteralValue::Int64(!v)),
        (UnaryOp::BitNot, LiteralValue::UInt64(v)) => Some(LiteralValue::UInt64(!v)),
        _ => None,
    }
}
