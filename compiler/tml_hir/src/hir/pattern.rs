//! HIR patterns.

use crate::ids::HirId;
use crate::span::Span;
use crate::types::HirType;

use super::expr::LiteralValue;

#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    Wildcard {
        id: HirId,
        span: Span,
    },
    Binding {
        id: HirId,
        name: String,
        is_mut: bool,
        ty: HirType,
        span: Span,
    },
    Literal {
        id: HirId,
        value: LiteralValue,
        ty: HirType,
        span: Span,
    },
    Tuple {
        id: HirId,
        elements: Vec<Pattern>,
        ty: HirType,
        span: Span,
    },
    Struct {
        id: HirId,
        struct_name: String,
        fields: Vec<(String, Pattern)>,
        has_rest: bool,
        ty: HirType,
        span: Span,
    },
    Enum {
        id: HirId,
        enum_name: String,
        variant_name: String,
        variant_index: i32,
        payload: Option<Vec<Pattern>>,
        ty: HirType,
        span: Span,
    },
    Or {
        id: HirId,
        alternatives: Vec<Pattern>,
        ty: HirType,
        span: Span,
    },
    Range {
        id: HirId,
        start: Option<i64>,
        end: Option<i64>,
        inclusive: bool,
        ty: HirType,
        span: Span,
    },
    Array {
        id: HirId,
        elements: Vec<Pattern>,
        rest: Option<Box<Pattern>>,
        ty: HirType,
        span: Span,
    },
}

impl Pattern {
    pub fn id(&self) -> HirId {
        match self {
            Pattern::Wildcard { id, .. }
            | Pattern::Binding { id, .. }
            | Pattern::Literal { id, .. }
            | Pattern::Tuple { id, .. }
            | Pattern::Struct { id, .. }
            | Pattern::Enum { id, .. }
            | Pattern::Or { id, .. }
            | Pattern::Range { id, .. }
            | Pattern::Array { id, .. } => *id,
        }
    }

    pub fn set_id(&mut self, new_id: HirId) {
        match self {
            Pattern::Wildcard { id, .. }
            | Pattern::Binding { id, .. }
            | Pattern::Literal { id, .. }
            | Pattern::Tuple { id, .. }
            | Pattern::Struct { id, .. }
            | Pattern::Enum { id, .. }
            | Pattern::Or { id, .. }
            | Pattern::Range { id, .. }
            | Pattern::Array { id, .. } => *id = new_id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Pattern::Wildcard { span, .. }
            | Pattern::Binding { span, .. }
            | Pattern::Literal { span, .. }
            | Pattern::Tuple { span, .. }
            | Pattern::Struct { span, .. }
            | Pattern::Enum { span, .. }
            | Pattern::Or { span, .. }
            | Pattern::Range { span, .. }
            | Pattern::Array { span, .. } => *span,
        }
    }

    /// Wildcards have no type.
    pub fn ty(&self) -> HirType {
        match self {
            Pattern::Wildcard { .. } => None,
            Pattern::Binding { ty, .. }
            | Pattern::Literal { ty, .. }
            | Pattern::Tuple { ty, .. }
            | Pattern::Struct { ty, .. }
            | Pattern::Enum { ty, .. }
            | Pattern::Or { ty, .. }
            | Pattern::Range { ty, .. }
            | Pattern::Array { ty, .. } => ty.clone(),
        }
    }

    /// `(name, type, is_mut)` of every binding, in source order. For an
    /// or-pattern only the first alternative is reported.
    pub fn bindings(&self) -> Vec<(&str, &HirType, bool)> {
        let mut out = Vec::new();
        self.collect_bindings(&mut out);
        out
    }

    fn collect_bindings<'a>(&'a self, out: &mut Vec<(&'a str, &'a HirType, bool)>) {
        match self {
            Pattern::Binding {
                name, ty, is_mut, ..
            } => out.push((name, ty, *is_mut)),
            Pattern::Tuple { elements, .. } => {
                for p in elements {
                    p.collect_bindings(out);
                }
            }
            Pattern::Struct { fields, .. } => {
                for (_, p) in fields {
                    p.collect_bindings(out);
                }
            }
            Pattern::Enum { payload, .. } => {
                for p in payload.iter().flatten() {
                    p.collect_bindings(out);
                }
            }
            Pattern::Or { alternatives, .. } => {
                if let Some(first) = alternatives.first() {
                    first.collect_bindings(out);
                }
            }
            Pattern::Array { elements, rest, .. } => {
                for p in elements {
                    p.collect_bindings(out);
                }
                if let Some(rest) = rest {
                    rest.collect_bindings(out);
                }
            }
            Pattern::Wildcard { .. } | Pattern::Literal { .. } | Pattern::Range { .. } => {}
        }
    }

    /// Renames every binding with `rename`, including those in all
    /// or-alternatives.
    pub fn rename_bindings(&mut self, rename: &mut dyn FnMut(&str) -> Option<String>) {
        match self {
            Pattern::Binding { name, .. } => {
                if let Some(new_name) = rename(name) {
                    *name = new_name;
                }
            }
            Pattern::Tuple { elements, .. } | Pattern::Or {
                alternatives: elements,
                ..
            } => {
                for p in elements {
                    p.rename_bindings(rename);
                }
            }
            Pattern::Struct { fields, .. } => {
                for (_, p) in fields {
                    p.rename_bindings(rename);
                }
            }
            Pattern::Enum { payload, .. } => {
                for p in payload.iter_mut().flatten() {
                    p.rename_bindings(rename);
                }
            }
            Pattern::Array { elements, rest, .. } => {
                for p in elements {
                    p.rename_bindings(rename);
                }
                if let Some(rest) = rest {
                    rest.rename_bindings(rename);
                }
            }
            Pattern::Wildcard { .. } | Pattern::Literal { .. } | Pattern::Range { .. } => {}
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Pattern::Wildcard { .. } => "Wildcard",
            Pattern::Binding { .. } => "Binding",
            Pattern::Literal { .. } => "Literal",
            Pattern::Tuple { .. } => "Tuple",
            Pattern::Struct { .. } => "Struct",
            Pattern::Enum { .. } => "Enum",
            Pattern::Or { .. } => "Or",
            Pattern::Range { .. } => "Range",
            Pattern::Array { .. } => "Array",
        }
    }
}
