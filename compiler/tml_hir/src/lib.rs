//! TML HIR - High-level Intermediate Representation
//!
//! This crate contains the HIR data model and the lowering that produces it:
//! - Spans and node ids
//! - The semantic `Type` model shared by every HIR node
//! - The syntax-tree input model (`ast`) and the `TypeEnv` it is resolved against
//! - HIR nodes (expressions, patterns, statements, declarations, modules)
//! - Read-only and mutating visitors
//! - The monomorphization cache
//! - `HirBuilder`, the AST to HIR lowering
//!
//! # Design Philosophy
//!
//! - **Closed variants**: every node family is an enum matched exhaustively
//! - **Owned trees**: children are boxed, only types are shared (`Arc`)
//! - **Never fails**: lowering degrades unresolvable names to unit types and
//!   sentinel indices instead of reporting errors

pub mod ast;
pub mod builder;
pub mod env;
pub mod hir;
mod ids;
pub mod mono;
mod scope;
mod span;
pub mod types;
pub mod visitor;

pub use builder::HirBuilder;
pub use env::{ClassDef, EnumDef, FuncSig, StructDef, TypeEnv, TypeTable};
pub use hir::{
    BinOp, CompoundOp, Expr, HirBehavior, HirBehaviorMethod, HirCapture, HirConst, HirEnum,
    HirField, HirFunction, HirImpl, HirModule, HirParam, HirStruct, HirVariant, LiteralValue,
    Pattern, Stmt, UnaryOp, WhenArm,
};
pub use ids::{HirId, HirIdGenerator};
pub use mono::MonomorphizationCache;
pub use scope::{Binding, ScopeStack};
pub use span::{Location, Span};
pub use types::{HirType, PrimitiveKind, Type};
