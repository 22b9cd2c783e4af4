//! HIR statements.

use crate::ids::HirId;
use crate::span::Span;
use crate::types::HirType;

use super::expr::Expr;
use super::pattern::Pattern;

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// `let pattern: ty = init`. `var` lowers to a let with mutable bindings.
    Let {
        id: HirId,
        pattern: Pattern,
        ty: HirType,
        init: Option<Box<Expr>>,
        span: Span,
    },
    Expr {
        id: HirId,
        expr: Box<Expr>,
        span: Span,
    },
}

impl Stmt {
    pub fn id(&self) -> HirId {
        match self {
            Stmt::Let { id, .. } | Stmt::Expr { id, .. } => *id,
        }
    }

    pub fn set_id(&mut self, new_id: HirId) {
        match self {
            Stmt::Let { id, .. } | Stmt::Expr { id, .. } => *id = new_id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Stmt::Let { span, .. } | Stmt::Expr { span, .. } => *span,
        }
    }
}
