//! HIR optimization passes.
//!
//! Source-level rewrites that run on a lowered [`HirModule`] before it is
//! handed to the mid-level IR:
//!
//! | Pass                    | Level | Effect                                   |
//! |-------------------------|-------|------------------------------------------|
//! | [`ConstantFolding`]     | O1+   | evaluates literal-only arithmetic        |
//! | [`DeadCodeElimination`] | O2+   | collapses `if` on a literal condition    |
//! | [`ClosureOptimization`] | O3    | trims and demotes closure captures       |
//! | [`Inlining`]            | O3    | splices small non-recursive callees      |
//!
//! Every pass implements [`HirPass`] and reports whether it changed the
//! module; [`PassManager`] composes them and can iterate to a fixpoint.
//! Passes never fail: anything they cannot prove is left untouched.

mod closure_opt;
mod constant_folding;
mod dce;
mod inlining;
mod manager;

#[cfg(test)]
mod test_helpers;

use tml_hir::HirModule;

pub use closure_opt::ClosureOptimization;
pub use constant_folding::ConstantFolding;
pub use dce::{has_side_effects, is_pure_expr, is_terminating, DeadCodeElimination};
pub use inlining::{Inlining, DEFAULT_MAX_STATEMENTS};
pub use manager::{
    optimize_hir, optimize_hir_level, InvalidOptLevel, OptLevel, PassManager,
    DEFAULT_MAX_ITERATIONS,
};

/// A rewrite over a whole module.
pub trait HirPass {
    /// Stable kebab-case name used in logs.
    fn name(&self) -> &'static str;

    /// Runs the pass once. Returns `true` if anything changed.
    fn run(&mut self, module: &mut HirModule) -> bool;
}
