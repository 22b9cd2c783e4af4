//! Function inlining.
//!
//! Replaces calls to small free functions with the callee body:
//!
//! ```text
//! add(x, 1)   =>   { let a__inl7 = x; let b__inl7 = 1; a__inl7 + b__inl7 }
//! ```
//!
//! # Eligibility
//!
//! A callee is inlined when it is not extern, has a body, carries no
//! `noinline` attribute, is either `inline` or at most `max_statements`
//! long, does not call itself, and contains no `return` (a `return` in the
//! spliced body would leave the caller).
//!
//! # Hygiene
//!
//! Callee locals are renamed to `<name>__inl<call id>` and every spliced
//! node gets a fresh id above the module's current maximum, so a module
//! stays free of id and name collisions after any number of runs.
//!
//! Functions that are themselves eligible are not rewritten, and spliced
//! bodies are not revisited in the same run. Chains of small functions
//! collapse one level per run under the fixpoint driver.

use rustc_hash::{FxHashMap, FxHashSet};
use tml_hir::visitor::{
    walk_expr, walk_expr_mut, walk_pattern_mut, walk_stmt_mut, MutVisitor, Visitor,
};
use tml_hir::{Expr, HirFunction, HirIdGenerator, HirModule, Pattern, Span, Stmt};
use tracing::{debug, trace};

use crate::HirPass;

/// Default statement budget for callees without an `inline` attribute.
pub const DEFAULT_MAX_STATEMENTS: usize = 5;

#[derive(Debug)]
pub struct Inlining {
    max_statements: usize,
}

impl Default for Inlining {
    fn default() -> Self {
        Inlining::new(DEFAULT_MAX_STATEMENTS)
    }
}

impl Inlining {
    pub fn new(max_statements: usize) -> Self {
        Inlining { max_statements }
    }

    pub fn max_statements(&self) -> usize {
        self.max_statements
    }

    pub fn should_inline(&self, function: &HirFunction) -> bool {
        if function.is_extern || function.has_attribute("noinline") {
            return false;
        }
        let Some(body) = &function.body else {
            return false;
        };
        if !function.has_attribute("inline") && count_statements(body) > self.max_statements {
            return false;
        }
        !is_recursive(function) && !contains_return(body)
    }
}

impl HirPass for Inlining {
    fn name(&self) -> &'static str {
        "inlining"
    }

    fn run(&mut self, module: &mut HirModule) -> bool {
        let callees: Vec<HirFunction> = module
            .functions
            .iter()
            .filter(|f| self.should_inline(f))
            .cloned()
            .collect();
        if callees.is_empty() {
            debug!(pass = self.name(), inlined = 0, "pass finished");
            return false;
        }

        let mut by_name: FxHashMap<&str, &HirFunction> = FxHashMap::default();
        for callee in &callees {
            by_name.insert(callee.name.as_str(), callee);
            by_name.insert(callee.mangled_name.as_str(), callee);
        }

        let mut splicer = Splicer {
            callees: by_name,
            ids: HirIdGenerator::starting_after(module.max_id()),
            inlined: 0,
        };
        for function in module.all_functions_mut() {
            if function.body.is_none() || splicer.callees.contains_key(function.name.as_str()) {
                continue;
            }
            splicer.visit_function_mut(function);
        }

        debug!(pass = self.name(), inlined = splicer.inlined, "pass finished");
        splicer.inlined > 0
    }
}

/// Statements in a body: a block counts its statements plus its trailing
/// expression, anything else counts as one.
fn count_statements(body: &Expr) -> usize {
    match body {
        Expr::Block { stmts, expr, .. } => stmts.len() + usize::from(expr.is_some()),
        _ => 1,
    }
}

struct Finder<F> {
    predicate: F,
    found: bool,
}

impl<'hir, F: FnMut(&Expr) -> bool> Visitor<'hir> for Finder<F> {
    fn visit_expr(&mut self, expr: &'hir Expr) {
        if self.found {
            return;
        }
        if (self.predicate)(expr) {
            self.found = true;
            return;
        }
        walk_expr(self, expr);
    }
}

fn any_expr(root: &Expr, predicate: impl FnMut(&Expr) -> bool) -> bool {
    let mut finder = Finder {
        predicate,
        found: false,
    };
    finder.visit_expr(root);
    finder.found
}

fn is_recursive(function: &HirFunction) -> bool {
    function.body.as_ref().is_some_and(|body| {
        any_expr(body, |e| {
            matches!(e, Expr::Call { func_name, .. }
                if *func_name == function.name || *func_name == function.mangled_name)
        })
    })
}

fn contains_return(body: &Expr) -> bool {
    any_expr(body, |e| matches!(e, Expr::Return { .. }))
}

/// Every name a callee introduces: parameters, pattern bindings and
/// closure parameters.
fn local_names(callee: &HirFunction) -> FxHashSet<String> {
    struct Locals(FxHashSet<String>);

    impl<'hir> Visitor<'hir> for Locals {
        fn visit_pattern(&mut self, pattern: &'hir Pattern) {
            for (name, _, _) in pattern.bindings() {
                self.0.insert(name.to_string());
            }
        }

        fn visit_expr(&mut self, expr: &'hir Expr) {
            if let Expr::Closure { params, .. } = expr {
                self.0.extend(params.iter().map(|(name, _)| name.clone()));
            }
            walk_expr(self, expr);
        }
    }

    let mut locals = Locals(callee.params.iter().map(|p| p.name.clone()).collect());
    if let Some(body) = &callee.body {
        locals.visit_expr(body);
    }
    locals.0
}

struct Splicer<'c> {
    callees: FxHashMap<&'c str, &'c HirFunction>,
    ids: HirIdGenerator,
    inlined: usize,
}

impl MutVisitor for Splicer<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);

        let Expr::Call {
            id,
            func_name,
            args,
            span,
            ..
        } = expr
        else {
            return;
        };
        let Some(&callee) = self.callees.get(func_name.as_str()) else {
            return;
        };
        if args.len() != callee.params.len() {
            trace!(callee = %func_name, "argument count mismatch, not inlined");
            return;
        }

        let (call_id, span) = (*id, *span);
        let args = std::mem::take(args);
        trace!(callee = %callee.name, call = %call_id, "inlining call");
        *expr = self.splice(callee, args, call_id.raw(), span);
        self.inlined += 1;
    }
}

impl Splicer<'_> {
    fn splice(&mut self, callee: &HirFunction, args: Vec<Expr>, call_id: u64, span: Span) -> Expr {
        let renames: FxHashMap<String, String> = local_names(callee)
            .into_iter()
            .map(|name| {
                let renamed = format!("{name}__inl{call_id}");
                (name, renamed)
            })
            .collect();

        let stmts: Vec<Stmt> = callee
            .params
            .iter()
            .zip(args)
            .map(|(param, arg)| {
                let name = renames
                    .get(&param.name)
                    .cloned()
                    .unwrap_or_else(|| param.name.clone());
                Stmt::Let {
                    id: self.ids.next_id(),
                    pattern: Pattern::Binding {
                        id: self.ids.next_id(),
                        name,
                        is_mut: param.is_mut,
                        ty: param.ty.clone(),
                        span,
                    },
                    ty: param.ty.clone(),
                    init: Some(Box::new(arg)),
                    span,
                }
            })
            .collect();

        let mut body = match &callee.body {
            Some(body) => body.clone(),
            None => Expr::placeholder(),
        };
        let mut hygiene = Hygiene {
            ids: &mut self.ids,
            renames: &renames,
        };
        hygiene.visit_expr_mut(&mut body);

        Expr::Block {
            id: self.ids.next_id(),
            stmts,
            expr: Some(Box::new(body)),
            ty: callee.return_type.clone(),
            span,
        }
    }
}

/// Gives a cloned body fresh ids and renames its locals.
struct Hygiene<'a> {
    ids: &'a mut HirIdGenerator,
    renames: &'a FxHashMap<String, String>,
}

impl Hygiene<'_> {
    fn rename(&self, name: &mut String) {
        if let Some(renamed) = self.renames.get(name.as_str()) {
            name.clone_from(renamed);
        }
    }
}

impl MutVisitor for Hygiene<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        expr.set_id(self.ids.next_id());
        match expr {
            Expr::Var { name, .. } => self.rename(name),
            Expr::Closure {
                params, captures, ..
            } => {
                for (name, _) in params.iter_mut() {
                    self.rename(name);
                }
                for capture in captures.iter_mut() {
                    self.rename(&mut capture.name);
                }
            }
            _ => {}
        }
        walk_expr_mut(self, expr);
    }

    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        stmt.set_id(self.ids.next_id());
        walk_stmt_mut(self, stmt);
    }

    fn visit_pattern_mut(&mut self, pattern: &mut Pattern) {
        pattern.set_id(self.ids.next_id());
        if let Pattern::Binding { name, .. } = pattern {
            self.rename(name);
        }
        walk_pattern_mut(self, pattern);
    }
}
