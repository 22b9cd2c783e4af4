//! The per-compilation-unit HIR container.

use crate::ids::HirId;
use crate::visitor::{self, Visitor};

use super::decl::{HirBehavior, HirConst, HirEnum, HirFunction, HirImpl, HirStruct};
use super::{Expr, Pattern, Stmt};

/// One lowered compilation unit. Declaration lists keep source order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct HirModule {
    pub name: String,
    pub source_path: String,
    pub structs: Vec<HirStruct>,
    pub enums: Vec<HirEnum>,
    pub functions: Vec<HirFunction>,
    pub behaviors: Vec<HirBehavior>,
    pub impls: Vec<HirImpl>,
    pub constants: Vec<HirConst>,
    /// `::`-joined paths of `use` declarations.
    pub imports: Vec<String>,
}

impl HirModule {
    #[must_use]
    pub fn new(name: impl Into<String>, source_path: impl Into<String>) -> Self {
        HirModule {
            name: name.into(),
            source_path: source_path.into(),
            ..Self::default()
        }
    }

    pub fn find_struct(&self, name: &str) -> Option<&HirStruct> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn find_enum(&self, name: &str) -> Option<&HirEnum> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Looks a function up by source or mangled name.
    pub fn find_function(&self, name: &str) -> Option<&HirFunction> {
        self.functions
            .iter()
            .find(|f| f.name == name || f.mangled_name == name)
    }

    /// Free functions followed by every impl method.
    pub fn all_functions(&self) -> impl Iterator<Item = &HirFunction> {
        self.functions
            .iter()
            .chain(self.impls.iter().flat_map(|i| i.methods.iter()))
    }

    pub fn all_functions_mut(&mut self) -> impl Iterator<Item = &mut HirFunction> {
        self.functions
            .iter_mut()
            .chain(self.impls.iter_mut().flat_map(|i| i.methods.iter_mut()))
    }

    /// Largest id used by any declaration or node in the module.
    pub fn max_id(&self) -> HirId {
        let mut finder = MaxIdFinder {
            max: HirId::INVALID,
        };
        for id in self
            .structs
            .iter()
            .map(|s| s.id)
            .chain(self.enums.iter().map(|e| e.id))
            .chain(self.functions.iter().map(|f| f.id))
            .chain(self.behaviors.iter().map(|b| b.id))
            .chain(self.impls.iter().map(|i| i.id))
            .chain(self.impls.iter().flat_map(|i| i.methods.iter().map(|m| m.id)))
            .chain(self.constants.iter().map(|c| c.id))
        {
            finder.see(id);
        }
        finder.visit_module(self);
        finder.max
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
            && self.enums.is_empty()
            && self.functions.is_empty()
            && self.behaviors.is_empty()
            && self.impls.is_empty()
            && self.constants.is_empty()
            && self.imports.is_empty()
    }
}

struct MaxIdFinder {
    max: HirId,
}

impl MaxIdFinder {
    fn see(&mut self, id: HirId) {
        if id > self.max {
            self.max = id;
        }
    }
}

impl<'hir> Visitor<'hir> for MaxIdFinder {
    fn visit_expr(&mut self, expr: &'hir Expr) {
        self.see(expr.id());
        visitor::walk_expr(self, expr);
    }

    fn visit_stmt(&mut self, stmt: &'hir Stmt) {
        self.see(stmt.id());
        visitor::walk_stmt(self, stmt);
    }

    fn visit_pattern(&mut self, pattern: &'hir Pattern) {
        self.see(pattern.id());
        visitor::walk_pattern(self, pattern);
    }
}
