//! Source type resolution.

use std::sync::Arc;

use crate::ast::{self, ExprKind, Literal, TypeExpr};
use crate::env::TypeEnv;
use crate::types::{HirType, PrimitiveKind, Type};

use super::HirBuilder;

impl<E: TypeEnv + ?Sized> HirBuilder<'_, E> {
    /// Resolves a written type. Unresolvable forms become unit.
    pub fn resolve_type(&self, ty: &TypeExpr) -> HirType {
        Some(self.resolve_type_inner(ty))
    }

    fn resolve_type_inner(&self, ty: &TypeExpr) -> Arc<Type> {
        match ty {
            TypeExpr::Named { path, generics } => self.resolve_named(path, generics),
            TypeExpr::Ref { mutable, inner } => {
                Type::reference(self.resolve_type_inner(inner), *mutable)
            }
            TypeExpr::Pointer { mutable, inner } => Arc::new(Type::Pointer {
                mutable: *mutable,
                inner: self.resolve_type_inner(inner),
            }),
            TypeExpr::Array { element, size } => {
                Type::array(self.resolve_type_inner(element), array_size(size))
            }
            TypeExpr::Slice(element) => Type::slice(self.resolve_type_inner(element)),
            TypeExpr::Tuple(elements) if elements.is_empty() => Type::unit(),
            TypeExpr::Tuple(elements) => Type::tuple(
                elements
                    .iter()
                    .map(|e| self.resolve_type_inner(e))
                    .collect(),
            ),
            TypeExpr::Func { params, ret } => Arc::new(Type::Func {
                params: params.iter().map(|p| self.resolve_type_inner(p)).collect(),
                ret: ret
                    .as_ref()
                    .map_or_else(Type::unit, |r| self.resolve_type_inner(r)),
            }),
            TypeExpr::Infer => Type::unit(),
        }
    }

    fn resolve_named(&self, path: &[String], generics: &[TypeExpr]) -> Arc<Type> {
        let Some(name) = path.last() else {
            return Type::unit();
        };

        if path.len() == 1 && generics.is_empty() {
            if let Some(kind) = PrimitiveKind::from_name(name) {
                return Type::primitive(kind);
            }
            if name == "This" || name == "Self" {
                if let Some(self_ty) = &self.self_type {
                    return self_ty.clone();
                }
            }
            if self.generic_params.iter().any(|g| g == name) {
                return Arc::new(Type::Generic(name.clone()));
            }
        }

        let type_args: Vec<Arc<Type>> = generics
            .iter()
            .map(|g| self.resolve_type_inner(g))
            .collect();

        if self.env.lookup_class(name).is_some() {
            return Arc::new(Type::Class {
                name: name.clone(),
                type_args,
            });
        }

        let module = if path.len() > 1 {
            path[..path.len() - 1].join("::")
        } else {
            String::new()
        };
        Arc::new(Type::Named {
            name: name.clone(),
            module,
            type_args,
        })
    }
}

/// Array length from a literal size expression, 0 otherwise.
pub(super) fn array_size(size: &ast::Expr) -> u64 {
    match &size.kind {
        ExprKind::Literal(Literal::Int { value, .. }) => *value,
        _ => 0,
    }
}
