//! HIR Visitor Pattern
//!
//! Generic traversal of HIR trees, read-only ([`Visitor`]) and in place
//! ([`MutVisitor`]).
//!
//! # Design
//!
//! Default `visit_*` implementations call the matching `walk_*` function,
//! which recurses into children. Override a `visit_*` method to act on a
//! node and call `walk_*` to continue (or skip it to prune the subtree).
//!
//! Module walks cover every place expressions live: free functions, impl
//! methods, behavior default bodies and constant initializers.
//!
//! # Example
//!
//! ```text
//! struct CountCalls {
//!     count: usize,
//! }
//!
//! impl<'hir> Visitor<'hir> for CountCalls {
//!     fn visit_expr(&mut self, expr: &'hir Expr) {
//!         if let Expr::Call { .. } = expr {
//!             self.count += 1;
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//! ```

use crate::hir::{Expr, HirFunction, HirModule, Pattern, Stmt, WhenArm};

// Visitor Trait

pub trait Visitor<'hir> {
    fn visit_module(&mut self, module: &'hir HirModule) {
        walk_module(self, module);
    }

    fn visit_function(&mut self, function: &'hir HirFunction) {
        walk_function(self, function);
    }

    fn visit_expr(&mut self, expr: &'hir Expr) {
        walk_expr(self, expr);
    }

    fn visit_stmt(&mut self, stmt: &'hir Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_pattern(&mut self, pattern: &'hir Pattern) {
        walk_pattern(self, pattern);
    }
}

pub fn walk_module<'hir, V: Visitor<'hir> + ?Sized>(visitor: &mut V, module: &'hir HirModule) {
    for function in &module.functions {
        visitor.visit_function(function);
    }
    for imp in &module.impls {
        for method in &imp.methods {
            visitor.visit_function(method);
        }
    }
    for behavior in &module.behaviors {
        for method in &behavior.methods {
            if let Some(body) = &method.default_body {
                visitor.visit_expr(body);
            }
        }
    }
    for constant in &module.constants {
        visitor.visit_expr(&constant.value);
    }
}

pub fn walk_function<'hir, V: Visitor<'hir> + ?Sized>(
    visitor: &mut V,
    function: &'hir HirFunction,
) {
    if let Some(body) = &function.body {
        visitor.visit_expr(body);
    }
}

pub fn walk_stmt<'hir, V: Visitor<'hir> + ?Sized>(visitor: &mut V, stmt: &'hir Stmt) {
    match stmt {
        Stmt::Let { pattern, init, .. } => {
            if let Some(init) = init {
                visitor.visit_expr(init);
            }
            visitor.visit_pattern(pattern);
        }
        Stmt::Expr { expr, .. } => visitor.visit_expr(expr),
    }
}

pub fn walk_pattern<'hir, V: Visitor<'hir> + ?Sized>(visitor: &mut V, pattern: &'hir Pattern) {
    match pattern {
        Pattern::Wildcard { .. }
        | Pattern::Binding { .. }
        | Pattern::Literal { .. }
        | Pattern::Range { .. } => {}
        Pattern::Tuple { elements, .. } | Pattern::Or {
            alternatives: elements,
            ..
        } => {
            for p in elements {
                visitor.visit_pattern(p);
            }
        }
        Pattern::Struct { fields, .. } => {
            for (_, p) in fields {
                visitor.visit_pattern(p);
            }
        }
        Pattern::Enum { payload, .. } => {
            for p in payload.iter().flatten() {
                visitor.visit_pattern(p);
            }
        }
        Pattern::Array { elements, rest, .. } => {
            for p in elements {
                visitor.visit_pattern(p);
            }
            if let Some(rest) = rest {
                visitor.visit_pattern(rest);
            }
        }
    }
}

fn walk_arm<'hir, V: Visitor<'hir> + ?Sized>(visitor: &mut V, arm: &'hir WhenArm) {
    visitor.visit_pattern(&arm.pattern);
    if let Some(guard) = &arm.guard {
        visitor.visit_expr(guard);
    }
    visitor.visit_expr(&arm.body);
}

pub fn walk_expr<'hir, V: Visitor<'hir> + ?Sized>(visitor: &mut V, expr: &'hir Expr) {
    match expr {
        // Leaves
        Expr::Literal { .. } | Expr::Var { .. } | Expr::Continue { .. } => {}

        // Single child
        Expr::Unary { operand: inner, .. }
        | Expr::Field { object: inner, .. }
        | Expr::ArrayRepeat { value: inner, .. }
        | Expr::Loop { body: inner, .. }
        | Expr::Cast { expr: inner, .. }
        | Expr::Try { expr: inner, .. }
        | Expr::Await { expr: inner, .. } => visitor.visit_expr(inner),
        Expr::Return { value, .. } | Expr::Break { value, .. } => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Expr::Closure { body, .. } => visitor.visit_expr(body),

        // Two children
        Expr::Binary { left, right, .. }
        | Expr::Index {
            object: left,
            index: right,
            ..
        }
        | Expr::While {
            condition: left,
            body: right,
            ..
        }
        | Expr::Assign {
            target: left,
            value: right,
            ..
        }
        | Expr::CompoundAssign {
            target: left,
            value: right,
            ..
        } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }

        // Lists
        Expr::Call { args, .. } | Expr::Tuple { elements: args, .. } | Expr::Array {
            elements: args,
            ..
        } | Expr::Enum { payload: args, .. } => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::MethodCall { receiver, args, .. } => {
            visitor.visit_expr(receiver);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Struct { fields, base, .. } => {
            for (_, value) in fields {
                visitor.visit_expr(value);
            }
            if let Some(base) = base {
                visitor.visit_expr(base);
            }
        }

        // Control flow
        Expr::Block { stmts, expr, .. } | Expr::Lowlevel { stmts, expr, .. } => {
            for stmt in stmts {
                visitor.visit_stmt(stmt);
            }
            if let Some(expr) = expr {
                visitor.visit_expr(expr);
            }
        }
        Expr::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            visitor.visit_expr(condition);
            visitor.visit_expr(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_expr(else_branch);
            }
        }
        Expr::When {
            scrutinee, arms, ..
        } => {
            visitor.visit_expr(scrutinee);
            for arm in arms {
                walk_arm(visitor, arm);
            }
        }
        Expr::For {
            pattern,
            iter,
            body,
            ..
        } => {
            visitor.visit_expr(iter);
            visitor.visit_pattern(pattern);
            visitor.visit_expr(body);
        }
    }
}

// Mutable Visitor Trait

/// In-place rewriting visitor. Implementations may replace the node they are
/// handed (`*expr = ...`) before or after walking its children.
pub trait MutVisitor {
    fn visit_function_mut(&mut self, function: &mut HirFunction) {
        walk_function_mut(self, function);
    }

    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
    }

    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        walk_stmt_mut(self, stmt);
    }

    fn visit_pattern_mut(&mut self, pattern: &mut Pattern) {
        walk_pattern_mut(self, pattern);
    }
}

pub fn walk_module_mut<V: MutVisitor + ?Sized>(visitor: &mut V, module: &mut HirModule) {
    for function in module.all_functions_mut() {
        visitor.visit_function_mut(function);
    }
    for behavior in &mut module.behaviors {
        for method in &mut behavior.methods {
            if let Some(body) = &mut method.default_body {
                visitor.visit_expr_mut(body);
            }
        }
    }
    for constant in &mut module.constants {
        visitor.visit_expr_mut(&mut constant.value);
    }
}

pub fn walk_function_mut<V: MutVisitor + ?Sized>(visitor: &mut V, function: &mut HirFunction) {
    if let Some(body) = &mut function.body {
        visitor.visit_expr_mut(body);
    }
}

pub fn walk_stmt_mut<V: MutVisitor + ?Sized>(visitor: &mut V, stmt: &mut Stmt) {
    match stmt {
        Stmt::Let { pattern, init, .. } => {
            if let Some(init) = init {
                visitor.visit_expr_mut(init);
            }
            visitor.visit_pattern_mut(pattern);
        }
        Stmt::Expr { expr, .. } => visitor.visit_expr_mut(expr),
    }
}

pub fn walk_pattern_mut<V: MutVisitor + ?Sized>(visitor: &mut V, pattern: &mut Pattern) {
    match pattern {
        Pattern::Wildcard { .. }
        | Pattern::Binding { .. }
        | Pattern::Literal { .. }
        | Pattern::Range { .. } => {}
        Pattern::Tuple { elements, .. } | Pattern::Or {
            alternatives: elements,
            ..
        } => {
            for p in elements {
                visitor.visit_pattern_mut(p);
            }
        }
        Pattern::Struct { fields, .. } => {
            for (_, p) in fields {
                visitor.visit_pattern_mut(p);
            }
        }
        Pattern::Enum { payload, .. } => {
            for p in payload.iter_mut().flatten() {
                visitor.visit_pattern_mut(p);
            }
        }
        Pattern::Array { elements, rest, .. } => {
            for p in elements {
                visitor.visit_pattern_mut(p);
            }
            if let Some(rest) = rest {
                visitor.visit_pattern_mut(rest);
            }
        }
    }
}

pub fn walk_expr_mut<V: MutVisitor + ?Sized>(visitor: &mut V, expr: &mut Expr) {
    match expr {
        Expr::Literal { .. } | Expr::Var { .. } | Expr::Continue { .. } => {}

        Expr::Unary { operand: inner, .. }
        | Expr::Field { object: inner, .. }
        | Expr::ArrayRepeat { value: inner, .. }
        | Expr::Loop { body: inner, .. }
        | Expr::Cast { expr: inner, .. }
        | Expr::Try { expr: inner, .. }
        | Expr::Await { expr: inner, .. }
        | Expr::Closure { body: inner, .. } => visitor.visit_expr_mut(inner),
        Expr::Return { value, .. } | Expr::Break { value, .. } => {
            if let Some(value) = value {
                visitor.visit_expr_mut(value);
            }
        }

        Expr::Binary { left, right, .. }
        | Expr::Index {
            object: left,
            index: right,
            ..
        }
        | Expr::While {
            condition: left,
            body: right,
            ..
        }
        | Expr::Assign {
            target: left,
            value: right,
            ..
        }
        | Expr::CompoundAssign {
            target: left,
            value: right,
            ..
        } => {
            visitor.visit_expr_mut(left);
            visitor.visit_expr_mut(right);
        }

        Expr::Call { args, .. } | Expr::Tuple { elements: args, .. } | Expr::Array {
            elements: args,
            ..
        } | Expr::Enum { payload: args, .. } => {
            for arg in args {
                visitor.visit_expr_mut(arg);
            }
        }
        Expr::MethodCall { receiver, args, .. } => {
            visitor.visit_expr_mut(receiver);
            for arg in args {
                visitor.visit_expr_mut(arg);
            }
        }
        Expr::Struct { fields, base, .. } => {
            for (_, value) in fields {
                visitor.visit_expr_mut(value);
            }
            if let Some(base) = base {
                visitor.visit_expr_mut(base);
            }
        }

        Expr::Block { stmts, expr, .. } | Expr::Lowlevel { stmts, expr, .. } => {
            for stmt in stmts {
                visitor.visit_stmt_mut(stmt);
            }
            if let Some(expr) = expr {
                visitor.visit_expr_mut(expr);
            }
        }
        Expr::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            visitor.visit_expr_mut(condition);
            visitor.visit_expr_mut(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_expr_mut(else_branch);
            }
        }
        Expr::When {
            scrutinee, arms, ..
        } => {
            visitor.visit_expr_mut(scrutinee);
            for arm in arms {
                visitor.visit_pattern_mut(&mut arm.pattern);
                if let Some(guard) = &mut arm.guard {
                    visitor.visit_expr_mut(guard);
                }
                visitor.visit_expr_mut(&mut arm.body);
            }
        }
        Expr::For {
            pattern,
            iter,
            body,
            ..
        } => {
            visitor.visit_expr_mut(iter);
            visitor.visit_pattern_mut(pattern);
            visitor.visit_expr_mut(body);
        }
    }
}
