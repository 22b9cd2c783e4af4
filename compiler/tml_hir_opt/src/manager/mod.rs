//! Pass pipelines.
//!
//! [`PassManager`] owns an ordered list of passes and runs them either once
//! or until none reports a change. [`optimize_hir_level`] builds the
//! standard pipeline for an [`OptLevel`].

use std::fmt;

use tml_hir::HirModule;
use tracing::debug;

use crate::{ClosureOptimization, ConstantFolding, DeadCodeElimination, HirPass, Inlining};

/// Iteration cap for [`PassManager::run_to_fixpoint`] in the standard pipelines.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// An ordered pass pipeline.
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn HirPass>>,
}

impl PassManager {
    pub fn new() -> Self {
        PassManager { passes: Vec::new() }
    }

    /// Appends a pass to the pipeline.
    pub fn add_pass<P: HirPass + 'static>(&mut self, pass: P) -> &mut Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Builder form of [`add_pass`](Self::add_pass).
    #[must_use]
    pub fn with_pass<P: HirPass + 'static>(mut self, pass: P) -> Self {
        self.add_pass(pass);
        self
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Names of the registered passes, in run order.
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Runs every pass once, in order. Returns `true` if any pass changed
    /// the module; a change never stops later passes from running.
    pub fn run(&mut self, module: &mut HirModule) -> bool {
        let mut changed = false;
        for pass in &mut self.passes {
            changed |= pass.run(module);
        }
        changed
    }

    /// Repeats [`run`](Self::run) until nothing changes or `max_iterations`
    /// rounds have run. Returns the number of rounds.
    pub fn run_to_fixpoint(&mut self, module: &mut HirModule, max_iterations: usize) -> usize {
        let mut iterations = 0;
        while iterations < max_iterations {
            iterations += 1;
            if !self.run(module) {
                break;
            }
        }
        debug!(
            module = %module.name,
            iterations,
            max_iterations,
            "fixpoint reached"
        );
        iterations
    }
}

impl fmt::Debug for PassManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassManager")
            .field("passes", &self.pass_names())
            .finish()
    }
}

/// HIR optimization level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum OptLevel {
    /// No HIR optimization.
    #[default]
    O0,
    /// Constant folding.
    O1,
    /// Folding and dead code elimination, one round.
    O2,
    /// Everything, iterated to a fixpoint.
    O3,
}

/// An optimization level above 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid HIR optimization level {0} (expected 0-3)")]
pub struct InvalidOptLevel(pub u8);

impl TryFrom<u8> for OptLevel {
    type Error = InvalidOptLevel;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(OptLevel::O0),
            1 => Ok(OptLevel::O1),
            2 => Ok(OptLevel::O2),
            3 => Ok(OptLevel::O3),
            other => Err(InvalidOptLevel(other)),
        }
    }
}

impl fmt::Display for OptLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptLevel::O0 => "O0",
            OptLevel::O1 => "O1",
            OptLevel::O2 => "O2",
            OptLevel::O3 => "O3",
        };
        f.write_str(name)
    }
}

/// Folding, DCE and closure optimization, one round each.
pub fn optimize_hir(module: &mut HirModule) -> bool {
    PassManager::new()
        .with_pass(ConstantFolding::new())
        .with_pass(DeadCodeElimination::new())
        .with_pass(ClosureOptimization::new())
        .run(module)
}

/// Runs the standard pipeline for `level`. Returns `true` if the module
/// changed; at `O3` that means more than one fixpoint round ran.
pub fn optimize_hir_level(module: &mut HirModule, level: OptLevel) -> bool {
    debug!(module = %module.name, %level, "optimizing HIR");
    match level {
        OptLevel::O0 => false,
        OptLevel::O1 => ConstantFolding::new().run(module),
        OptLevel::O2 => PassManager::new()
            .with_pass(ConstantFolding::new())
            .with_pass(DeadCodeElimination::new())
            .run(module),
        OptLevel::O3 => {
            let iterations = PassManager::new()
                .with_pass(ConstantFolding::new())
                .with_pass(DeadCodeElimination::new())
                .with_pass(ClosureOptimization::new())
                .with_pass(Inlining::default())
                .run_to_fixpoint(module, DEFAULT_MAX_ITERATIONS);
            iterations > 1
        }
    }
}
