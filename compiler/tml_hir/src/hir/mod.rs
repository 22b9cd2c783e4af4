//! HIR node definitions.
//!
//! Three closed node families ([`Expr`], [`Stmt`], [`Pattern`]) plus the
//! declarations and the [`HirModule`] that owns them. Every node carries a
//! module-unique [`crate::HirId`] and a [`crate::Span`]; every node except a
//! wildcard pattern carries a [`crate::HirType`].

mod decl;
mod expr;
mod module;
mod ops;
mod pattern;
mod stmt;

pub use decl::{
    HirBehavior, HirBehaviorMethod, HirConst, HirEnum, HirField, HirFunction, HirImpl, HirParam,
    HirStruct, HirVariant,
};
pub use expr::{Expr, HirCapture, LiteralValue, WhenArm};
pub use module::HirModule;
pub use ops::{BinOp, CompoundOp, UnaryOp};
pub use pattern::Pattern;
pub use stmt::Stmt;
