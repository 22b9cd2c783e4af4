//! Lexical scopes used during lowering.
//!
//! A single stack of frames maps each visible name to its type and
//! mutability. Lookups search innermost-first, so inner bindings shadow
//! outer ones.

use rustc_hash::FxHashMap;

use crate::types::HirType;

/// What lowering knows about a bound name.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub ty: HirType,
    pub mutable: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ScopeStack {
    frames: Vec<FxHashMap<String, Binding>>,
}

impl ScopeStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Binds `name` in the innermost frame, opening one if the stack is empty.
    pub fn bind(&mut self, name: impl Into<String>, ty: HirType, mutable: bool) {
        if self.frames.is_empty() {
            self.push();
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.into(), Binding { ty, mutable });
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Type of `name`, `None` when unbound or unresolved.
    pub fn type_of(&self, name: &str) -> HirType {
        self.lookup(name).and_then(|b| b.ty.clone())
    }

    /// Runs `f` inside a fresh frame that is popped afterwards.
    pub fn with_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push();
        let result = f(self);
        self.pop();
        result
    }
}

#[cfg(test)]
mod tests;
