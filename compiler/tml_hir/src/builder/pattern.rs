//! Pattern lowering.
//!
//! Patterns are lowered against the type of the value they match
//! (`expected`). Bindings are registered in the innermost scope as soon as
//! they are lowered, so sibling lowering sees them.

use std::sync::Arc;

use crate::ast::{self, Literal, PatternKind};
use crate::env::TypeEnv;
use crate::hir::{LiteralValue, Pattern};
use crate::types::{substitute, HirType, PrimitiveKind, Type};

use super::HirBuilder;

impl<E: TypeEnv + ?Sized> HirBuilder<'_, E> {
    pub fn lower_pattern(&mut self, pattern: &ast::Pattern, expected: &HirType) -> Pattern {
        let span = pattern.span;
        match &pattern.kind {
            PatternKind::Wildcard => Pattern::Wildcard {
                id: self.fresh_id(),
                span,
            },
            PatternKind::Ident { name, is_mut, ty } => {
                let ty = match ty {
                    Some(annotation) => self.resolve_type(annotation),
                    None => expected.clone(),
                };
                self.scopes.bind(name.clone(), ty.clone(), *is_mut);
                Pattern::Binding {
                    id: self.fresh_id(),
                    name: name.clone(),
                    is_mut: *is_mut,
                    ty,
                    span,
                }
            }
            PatternKind::Literal(lit) => {
                let (value, ty) = match lit {
                    Literal::Int { value, .. } => (
                        LiteralValue::Int64(i64::try_from(*value).unwrap_or(i64::MIN)),
                        expected
                            .clone()
                            .or_else(|| Some(Type::primitive(PrimitiveKind::I64))),
                    ),
                    Literal::Float { value, .. } => (
                        LiteralValue::Float64(*value),
                        expected
                            .clone()
                            .or_else(|| Some(Type::primitive(PrimitiveKind::F64))),
                    ),
                    Literal::Bool(b) => (LiteralValue::Bool(*b), Some(Type::bool())),
                    Literal::Str(s) => (
                        LiteralValue::String(s.clone()),
                        Some(Type::primitive(PrimitiveKind::Str)),
                    ),
                    Literal::Char(c) => (
                        LiteralValue::Int64(i64::from(u32::from(*c))),
                        Some(Type::primitive(PrimitiveKind::Char)),
                    ),
                };
                Pattern::Literal {
                    id: self.fresh_id(),
                    value,
                    ty,
                    span,
                }
            }
            PatternKind::Tuple(elements) => {
                let element_types: Vec<Arc<Type>> = match expected.as_deref() {
                    Some(Type::Tuple(types)) => types.clone(),
                    _ => Vec::new(),
                };
                let elements = elements
                    .iter()
                    .enumerate()
                    .map(|(i, p)| self.lower_pattern(p, &element_types.get(i).cloned()))
                    .collect();
                Pattern::Tuple {
                    id: self.fresh_id(),
                    elements,
                    ty: expected.clone(),
                    span,
                }
            }
            PatternKind::Struct {
                path,
                fields,
                has_rest,
            } => {
                let struct_name = path.last().cloned().unwrap_or_default();
                let type_args = expected
                    .as_deref()
                    .map(|t| t.type_args().to_vec())
                    .unwrap_or_default();
                let fields = fields
                    .iter()
                    .map(|(field, p)| {
                        let field_ty = self.env.lookup_struct(&struct_name).and_then(|def| {
                            def.field_type(field)
                                .map(|t| substitute(t, &def.type_params, &type_args))
                        });
                        (field.clone(), self.lower_pattern(p, &field_ty))
                    })
                    .collect();
                Pattern::Struct {
                    id: self.fresh_id(),
                    struct_name,
                    fields,
                    has_rest: *has_rest,
                    ty: expected.clone(),
                    span,
                }
            }
            PatternKind::Enum { path, payload } => {
                self.lower_enum_pattern(path, payload.as_deref(), expected, span)
            }
            PatternKind::Or(alternatives) => {
                let alternatives = alternatives
                    .iter()
                    .map(|p| self.lower_pattern(p, expected))
                    .collect();
                Pattern::Or {
                    id: self.fresh_id(),
                    alternatives,
                    ty: expected.clone(),
                    span,
                }
            }
            PatternKind::Range {
                start,
                end,
                inclusive,
            } => Pattern::Range {
                id: self.fresh_id(),
                start: *start,
                end: *end,
                inclusive: *inclusive,
                ty: expected
                    .clone()
                    .or_else(|| Some(Type::primitive(PrimitiveKind::I64))),
                span,
            },
            PatternKind::Array { elements, rest } => {
                let element_ty = expected
                    .as_deref()
                    .and_then(|t| t.strip_refs().element_type().cloned());
                let elements = elements
                    .iter()
                    .map(|p| self.lower_pattern(p, &element_ty))
                    .collect();
                let rest_ty = match &element_ty {
                    Some(elem) => Some(Type::slice(elem.clone())),
                    None => expected.clone(),
                };
                let rest = rest
                    .as_ref()
                    .map(|r| Box::new(self.lower_pattern(r, &rest_ty)));
                Pattern::Array {
                    id: self.fresh_id(),
                    elements,
                    rest,
                    ty: expected.clone(),
                    span,
                }
            }
        }
    }

    fn lower_enum_pattern(
        &mut self,
        path: &[String],
        payload: Option<&[ast::Pattern]>,
        expected: &HirType,
        span: crate::span::Span,
    ) -> Pattern {
        let variant_name = path.last().cloned().unwrap_or_default();
        let enum_name = if path.len() >= 2 {
            path[path.len() - 2].clone()
        } else {
            expected
                .as_deref()
                .and_then(|t| t.strip_refs().nominal_name())
                .map(str::to_string)
                .unwrap_or_default()
        };

        let variant_index = self
            .variant_index(&enum_name, &variant_name)
            .and_then(|i| i32::try_from(i).ok())
            .unwrap_or(-1);

        let type_args = expected
            .as_deref()
            .map(|t| t.strip_refs().type_args().to_vec())
            .unwrap_or_default();
        let payload_types: Vec<Arc<Type>> = self
            .env
            .lookup_enum(&enum_name)
            .and_then(|def| {
                def.variant_payload(&variant_name).map(|types| {
                    types
                        .iter()
                        .map(|t| substitute(t, &def.type_params, &type_args))
                        .collect()
                })
            })
            .unwrap_or_default();

        let payload = payload.map(|patterns| {
            patterns
                .iter()
                .enumerate()
                .map(|(i, p)| self.lower_pattern(p, &payload_types.get(i).cloned()))
                .collect()
        });

        Pattern::Enum {
            id: self.fresh_id(),
            enum_name,
            variant_name,
            variant_index,
            payload,
            ty: expected.clone(),
            span,
        }
    }
}
