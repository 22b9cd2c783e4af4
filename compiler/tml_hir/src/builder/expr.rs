//! Expression lowering.
//!
//! Children are lowered before the parent takes its id, so ids grow
//! bottom-up within an expression tree.

use std::sync::Arc;

use crate::ast::{self, ExprKind, FloatSuffix, IntSuffix, Literal};
use crate::env::TypeEnv;
use crate::hir::{BinOp, CompoundOp, Expr, LiteralValue, Pattern, UnaryOp, WhenArm};
use crate::span::Span;
use crate::types::{substitute, HirType, PrimitiveKind, Type};

use super::types::array_size;
use super::HirBuilder;

/// How an AST binary operator desugars.
enum Lowered {
    Plain(BinOp),
    Compound(CompoundOp),
    Assign,
}

fn classify(op: ast::BinaryOp) -> Lowered {
    use ast::BinaryOp as A;
    match op {
        A::Add => Lowered::Plain(BinOp::Add),
        A::Sub => Lowered::Plain(BinOp::Sub),
        A::Mul => Lowered::Plain(BinOp::Mul),
        A::Div => Lowered::Plain(BinOp::Div),
        A::Mod => Lowered::Plain(BinOp::Mod),
        A::Eq => Lowered::Plain(BinOp::Eq),
        A::Ne => Lowered::Plain(BinOp::Ne),
        A::Lt => Lowered::Plain(BinOp::Lt),
        A::Le => Lowered::Plain(BinOp::Le),
        A::Gt => Lowered::Plain(BinOp::Gt),
        A::Ge => Lowered::Plain(BinOp::Ge),
        A::And => Lowered::Plain(BinOp::And),
        A::Or => Lowered::Plain(BinOp::Or),
        A::BitAnd => Lowered::Plain(BinOp::BitAnd),
        A::BitOr => Lowered::Plain(BinOp::BitOr),
        A::BitXor => Lowered::Plain(BinOp::BitXor),
        A::Shl => Lowered::Plain(BinOp::Shl),
        A::Shr => Lowered::Plain(BinOp::Shr),
        A::Assign => Lowered::Assign,
        A::AddAssign => Lowered::Compound(CompoundOp::Add),
        A::SubAssign => Lowered::Compound(CompoundOp::Sub),
        A::MulAssign => Lowered::Compound(CompoundOp::Mul),
        A::DivAssign => Lowered::Compound(CompoundOp::Div),
        A::ModAssign => Lowered::Compound(CompoundOp::Mod),
        A::BitAndAssign => Lowered::Compound(CompoundOp::BitAnd),
        A::BitOrAssign => Lowered::Compound(CompoundOp::BitOr),
        A::BitXorAssign => Lowered::Compound(CompoundOp::BitXor),
        A::ShlAssign => Lowered::Compound(CompoundOp::Shl),
        A::ShrAssign => Lowered::Compound(CompoundOp::Shr),
    }
}

fn lower_unary_op(op: ast::UnaryOp) -> UnaryOp {
    match op {
        ast::UnaryOp::Neg => UnaryOp::Neg,
        ast::UnaryOp::Not => UnaryOp::Not,
        ast::UnaryOp::BitNot => UnaryOp::BitNot,
        ast::UnaryOp::Ref => UnaryOp::Ref,
        ast::UnaryOp::RefMut => UnaryOp::RefMut,
        ast::UnaryOp::Deref => UnaryOp::Deref,
    }
}

fn int_suffix_kind(suffix: IntSuffix) -> PrimitiveKind {
    match suffix {
        IntSuffix::I8 => PrimitiveKind::I8,
        IntSuffix::I16 => PrimitiveKind::I16,
        IntSuffix::I32 => PrimitiveKind::I32,
        IntSuffix::I64 => PrimitiveKind::I64,
        IntSuffix::I128 => PrimitiveKind::I128,
        IntSuffix::U8 => PrimitiveKind::U8,
        IntSuffix::U16 => PrimitiveKind::U16,
        IntSuffix::U32 => PrimitiveKind::U32,
        IntSuffix::U64 => PrimitiveKind::U64,
        IntSuffix::U128 => PrimitiveKind::U128,
    }
}

fn unit() -> HirType {
    Some(Type::unit())
}

/// `ty`, or unit when unresolved. Used where a concrete type is required.
fn or_unit(ty: HirType) -> Arc<Type> {
    ty.unwrap_or_else(Type::unit)
}

/// Type argument 0 of `wrapper` when `ty` is one of `names`.
fn unwrap_wrapper(ty: &HirType, names: &[&str]) -> Option<Arc<Type>> {
    let ty = ty.as_deref()?;
    match ty {
        Type::Named {
            name, type_args, ..
        } if names.contains(&name.as_str()) => type_args.first().cloned(),
        _ => None,
    }
}

impl<E: TypeEnv + ?Sized> HirBuilder<'_, E> {
    /// Lowers one expression.
    pub fn lower_expr(&mut self, expr: &ast::Expr) -> Expr {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Literal(lit) => self.lower_literal(lit, span),
            ExprKind::Ident(name) => {
                let ty = self.scopes.type_of(name).or_else(unit);
                Expr::Var {
                    id: self.fresh_id(),
                    name: name.clone(),
                    ty,
                    span,
                }
            }
            ExprKind::Path { segments, generics } => self.lower_path(segments, generics, span),
            ExprKind::Binary { op, left, right } => self.lower_binary(*op, left, right, span),
            ExprKind::Unary { op, operand } => self.lower_unary(*op, operand, span),
            ExprKind::Call {
                callee,
                type_args,
                args,
            } => self.lower_call(callee, type_args, args, span),
            ExprKind::MethodCall {
                receiver,
                method,
                type_args,
                args,
            } => self.lower_method_call(receiver, method, type_args, args, span),
            ExprKind::Field { object, field } => self.lower_field(object, field, span),
            ExprKind::Index { object, index } => {
                let object = self.lower_expr(object);
                let index = self.lower_expr(index);
                let ty = object
                    .ty()
                    .and_then(|t| t.strip_refs().element_type().cloned())
                    .or_else(unit);
                Expr::Index {
                    id: self.fresh_id(),
                    object: Box::new(object),
                    index: Box::new(index),
                    ty,
                    span,
                }
            }
            ExprKind::Tuple(elements) => {
                let elements: Vec<Expr> = elements.iter().map(|e| self.lower_expr(e)).collect();
                let ty = Type::tuple(elements.iter().map(|e| or_unit(e.ty())).collect());
                Expr::Tuple {
                    id: self.fresh_id(),
                    elements,
                    ty: Some(ty),
                    span,
                }
            }
            ExprKind::Array(elements) => {
                let elements: Vec<Expr> = elements.iter().map(|e| self.lower_expr(e)).collect();
                let element_type = elements.first().and_then(Expr::ty).or_else(unit);
                let size = elements.len() as u64;
                let ty = Type::array(or_unit(element_type.clone()), size);
                Expr::Array {
                    id: self.fresh_id(),
                    elements,
                    element_type,
                    size,
                    ty: Some(ty),
                    span,
                }
            }
            ExprKind::ArrayRepeat { value, count } => {
                let value = self.lower_expr(value);
                let count = array_size(count);
                let ty = Type::array(or_unit(value.ty()), count);
                Expr::ArrayRepeat {
                    id: self.fresh_id(),
                    value: Box::new(value),
                    count,
                    ty: Some(ty),
                    span,
                }
            }
            ExprKind::Struct {
                path,
                type_args,
                fields,
                base,
            } => self.lower_struct_lit(path, type_args, fields, base.as_deref(), span),
            ExprKind::Block(block) => self.lower_block(block),
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.lower_if(condition, then_branch, else_branch.as_deref(), span),
            ExprKind::Ternary {
                condition,
                then_expr,
                else_expr,
            } => self.lower_if(condition, then_expr, Some(else_expr), span),
            ExprKind::IfLet {
                pattern,
                scrutinee,
                then_branch,
                else_branch,
            } => self.lower_if_let(pattern, scrutinee, then_branch, else_branch.as_deref(), span),
            ExprKind::When { scrutinee, arms } => self.lower_when(scrutinee, arms, span),
            ExprKind::Loop { label, body } => {
                let body = self.lower_expr(body);
                Expr::Loop {
                    id: self.fresh_id(),
                    label: label.clone(),
                    body: Box::new(body),
                    ty: unit(),
                    span,
                }
            }
            ExprKind::While {
                label,
                condition,
                body,
            } => {
                let condition = self.lower_expr(condition);
                let body = self.lower_expr(body);
                Expr::While {
                    id: self.fresh_id(),
                    label: label.clone(),
                    condition: Box::new(condition),
                    body: Box::new(body),
                    ty: unit(),
                    span,
                }
            }
            ExprKind::For {
                label,
                pattern,
                iter,
                body,
            } => self.lower_for(label.as_ref(), pattern, iter, body, span),
            ExprKind::Return(value) => {
                let value = value.as_ref().map(|v| Box::new(self.lower_expr(v)));
                Expr::Return {
                    id: self.fresh_id(),
                    value,
                    span,
                }
            }
            ExprKind::Break { label, value } => {
                let value = value.as_ref().map(|v| Box::new(self.lower_expr(v)));
                Expr::Break {
                    id: self.fresh_id(),
                    label: label.clone(),
                    value,
                    span,
                }
            }
            ExprKind::Continue { label } => Expr::Continue {
                id: self.fresh_id(),
                label: label.clone(),
                span,
            },
            ExprKind::Closure {
                params,
                return_type,
                body,
            } => self.lower_closure(params, return_type.as_ref(), body, span),
            ExprKind::Range {
                start,
                end,
                inclusive,
            } => self.lower_range(start.as_deref(), end.as_deref(), *inclusive, span),
            ExprKind::Cast { expr, target } => {
                let inner = self.lower_expr(expr);
                let target_type = self.resolve_type(target);
                Expr::Cast {
                    id: self.fresh_id(),
                    expr: Box::new(inner),
                    ty: target_type.clone(),
                    target_type,
                    span,
                }
            }
            ExprKind::Try(inner) => {
                let inner = self.lower_expr(inner);
                let inner_ty = inner.ty();
                let ty = unwrap_wrapper(&inner_ty, &["Maybe", "Outcome"]).or(inner_ty);
                Expr::Try {
                    id: self.fresh_id(),
                    expr: Box::new(inner),
                    ty,
                    span,
                }
            }
            ExprKind::Await(inner) => {
                let inner = self.lower_expr(inner);
                let inner_ty = inner.ty();
                let ty = unwrap_wrapper(&inner_ty, &["Future", "Poll"]).or(inner_ty);
                Expr::Await {
                    id: self.fresh_id(),
                    expr: Box::new(inner),
                    ty,
                    span,
                }
            }
            ExprKind::Lowlevel(block) => self.lower_lowlevel(block),
        }
    }

    pub(super) fn unit_literal(&mut self, span: Span) -> Expr {
        Expr::Literal {
            id: self.fresh_id(),
            value: LiteralValue::Int64(0),
            ty: unit(),
            span,
        }
    }

    fn lower_literal(&mut self, lit: &Literal, span: Span) -> Expr {
        let id = self.fresh_id();
        let (value, kind) = match lit {
            Literal::Int { value, suffix } => {
                let kind = suffix.map_or(PrimitiveKind::I32, int_suffix_kind);
                if suffix.is_some_and(IntSuffix::is_unsigned) {
                    (LiteralValue::UInt64(*value), kind)
                } else {
                    // 2^63 only appears as the operand of a negation; MIN
                    // negates back to itself.
                    (
                        LiteralValue::Int64(i64::try_from(*value).unwrap_or(i64::MIN)),
                        kind,
                    )
                }
            }
            Literal::Float { value, suffix } => {
                let kind = match suffix {
                    Some(FloatSuffix::F32) => PrimitiveKind::F32,
                    Some(FloatSuffix::F64) | None => PrimitiveKind::F64,
                };
                (LiteralValue::Float64(*value), kind)
            }
            Literal::Str(s) => (LiteralValue::String(s.clone()), PrimitiveKind::Str),
            Literal::Char(c) => (LiteralValue::Char(*c), PrimitiveKind::Char),
            Literal::Bool(b) => (LiteralValue::Bool(*b), PrimitiveKind::Bool),
        };
        Expr::Literal {
            id,
            value,
            ty: Some(Type::primitive(kind)),
            span,
        }
    }

    fn lower_path(&mut self, segments: &[String], generics: &[ast::TypeExpr], span: Span) -> Expr {
        let full_path = segments.join("::");

        if segments.len() >= 2 {
            let enum_name = &segments[segments.len() - 2];
            let variant_name = &segments[segments.len() - 1];
            if let Some(index) = self.variant_index(enum_name, variant_name) {
                let type_args: Vec<Arc<Type>> = generics
                    .iter()
                    .map(|g| or_unit(self.resolve_type(g)))
                    .collect();
                let ty = Type::named(enum_name.clone(), type_args.clone());
                return Expr::Enum {
                    id: self.fresh_id(),
                    enum_name: enum_name.clone(),
                    variant_name: variant_name.clone(),
                    variant_index: i32::try_from(index).unwrap_or(-1),
                    type_args: type_args.into_iter().map(Some).collect(),
                    payload: Vec::new(),
                    ty: Some(ty),
                    span,
                };
            }
        }

        let var_name = segments.last().map_or(full_path.as_str(), String::as_str);
        let ty = self
            .scopes
            .type_of(var_name)
            .or_else(|| self.env.lookup_func(&full_path).map(|sig| sig.return_type.clone()))
            .or_else(unit);
        Expr::Var {
            id: self.fresh_id(),
            name: full_path,
            ty,
            span,
        }
    }

    fn lower_binary(
        &mut self,
        op: ast::BinaryOp,
        left: &ast::Expr,
        right: &ast::Expr,
        span: Span,
    ) -> Expr {
        let target = self.lower_expr(left);
        let value = self.lower_expr(right);
        match classify(op) {
            Lowered::Assign => Expr::Assign {
                id: self.fresh_id(),
                target: Box::new(target),
                value: Box::new(value),
                span,
            },
            Lowered::Compound(op) => Expr::CompoundAssign {
                id: self.fresh_id(),
                op,
                target: Box::new(target),
                value: Box::new(value),
                span,
            },
            Lowered::Plain(op) => {
                let ty = if op.is_comparison() || op.is_logical() {
                    Some(Type::bool())
                } else {
                    target.ty()
                };
                Expr::Binary {
                    id: self.fresh_id(),
                    op,
                    left: Box::new(target),
                    right: Box::new(value),
                    ty,
                    span,
                }
            }
        }
    }

    fn lower_unary(&mut self, op: ast::UnaryOp, operand: &ast::Expr, span: Span) -> Expr {
        let operand = self.lower_expr(operand);
        let op = lower_unary_op(op);
        let operand_ty = operand.ty();
        let ty = match op {
            UnaryOp::Ref | UnaryOp::RefMut => {
                operand_ty.map(|t| Type::reference(t, op == UnaryOp::RefMut))
            }
            UnaryOp::Deref => match operand_ty.as_deref() {
                Some(Type::Ref { inner, .. } | Type::Pointer { inner, .. }) => Some(inner.clone()),
                _ => operand_ty.clone(),
            },
            UnaryOp::Not => Some(Type::bool()),
            UnaryOp::Neg | UnaryOp::BitNot => operand_ty,
        };
        Expr::Unary {
            id: self.fresh_id(),
            op,
            operand: Box::new(operand),
            ty,
            span,
        }
    }

    fn lower_call(
        &mut self,
        callee: &ast::Expr,
        type_args: &[ast::TypeExpr],
        args: &[ast::Expr],
        span: Span,
    ) -> Expr {
        let (func_name, path_generics) = match &callee.kind {
            ExprKind::Ident(name) => (name.clone(), &[][..]),
            ExprKind::Path { segments, generics } => (segments.join("::"), generics.as_slice()),
            _ => (String::new(), &[][..]),
        };

        let explicit: Vec<HirType> = type_args
            .iter()
            .chain(path_generics)
            .map(|t| self.resolve_type(t))
            .collect();
        let args: Vec<Expr> = args.iter().map(|a| self.lower_expr(a)).collect();

        let class_split = func_name
            .split_once("::")
            .filter(|(class, _)| self.env.lookup_class(class).is_some());

        let ty = if let Some(sig) = self.env.lookup_func(&func_name) {
            let concrete: Vec<Arc<Type>> = explicit.iter().map(|t| or_unit(t.clone())).collect();
            Some(substitute(&sig.return_type, &sig.type_params, &concrete))
        } else {
            class_split
                .and_then(|(class, method)| {
                    self.env
                        .lookup_class(class)
                        .and_then(|def| def.method(method, true))
                        .map(|sig| sig.return_type.clone())
                })
                .or_else(unit)
        };

        let mangled = match class_split {
            Some((class, method)) => format!("{class}__{method}"),
            None => func_name.clone(),
        };

        if !explicit.is_empty() {
            self.queue_mono(&mangled, &explicit);
        }

        Expr::Call {
            id: self.fresh_id(),
            func_name: mangled,
            type_args: explicit,
            args,
            ty,
            span,
        }
    }

    fn lower_method_call(
        &mut self,
        receiver: &ast::Expr,
        method: &str,
        type_args: &[ast::TypeExpr],
        args: &[ast::Expr],
        span: Span,
    ) -> Expr {
        let receiver = self.lower_expr(receiver);
        let receiver_type = receiver.ty();
        let type_args: Vec<HirType> = type_args.iter().map(|t| self.resolve_type(t)).collect();
        let args: Vec<Expr> = args.iter().map(|a| self.lower_expr(a)).collect();

        let type_name = receiver_type
            .as_deref()
            .and_then(|t| t.strip_refs().nominal_name())
            .map(str::to_string);
        let ty = type_name
            .and_then(|type_name| {
                self.env
                    .lookup_func(&format!("{type_name}::{method}"))
                    .map(|sig| sig.return_type.clone())
                    .or_else(|| {
                        self.env
                            .lookup_class(&type_name)
                            .and_then(|def| def.method(method, false))
                            .map(|sig| sig.return_type.clone())
                    })
            })
            .or_else(unit);

        Expr::MethodCall {
            id: self.fresh_id(),
            receiver: Box::new(receiver),
            method_name: method.to_string(),
            type_args,
            args,
            receiver_type,
            ty,
            span,
        }
    }

    fn lower_field(&mut self, object: &ast::Expr, field: &str, span: Span) -> Expr {
        let object = self.lower_expr(object);
        let object_ty = object.ty();

        let (field_index, ty) = match object_ty.as_deref().map(Type::strip_refs) {
            Some(Type::Tuple(elements)) => match field.parse::<usize>() {
                Ok(i) if i < elements.len() => (
                    i32::try_from(i).unwrap_or(-1),
                    Some(elements[i].clone()),
                ),
                _ => (-1, unit()),
            },
            Some(owner) => match owner.nominal_name() {
                Some(type_name) => {
                    let index = self
                        .module
                        .find_struct(type_name)
                        .and_then(|s| s.field_index(field))
                        .and_then(|i| i32::try_from(i).ok())
                        .unwrap_or(-1);
                    let ty = self
                        .env
                        .lookup_struct(type_name)
                        .and_then(|def| {
                            def.field_type(field)
                                .map(|t| substitute(t, &def.type_params, owner.type_args()))
                        })
                        .or_else(|| self.env.lookup_class_field(type_name, field))
                        .or_else(unit);
                    (index, ty)
                }
                None => (-1, unit()),
            },
            None => (-1, unit()),
        };

        Expr::Field {
            id: self.fresh_id(),
            object: Box::new(object),
            field_name: field.to_string(),
            field_index,
            ty,
            span,
        }
    }

    fn lower_struct_lit(
        &mut self,
        path: &[String],
        type_args: &[ast::TypeExpr],
        fields: &[(String, ast::Expr)],
        base: Option<&ast::Expr>,
        span: Span,
    ) -> Expr {
        let struct_name = path.last().cloned().unwrap_or_default();
        let resolved: Vec<Arc<Type>> = type_args
            .iter()
            .map(|t| or_unit(self.resolve_type(t)))
            .collect();
        let fields: Vec<(String, Expr)> = fields
            .iter()
            .map(|(name, value)| (name.clone(), self.lower_expr(value)))
            .collect();
        let base = base.map(|b| Box::new(self.lower_expr(b)));
        let ty = Type::named(struct_name.clone(), resolved.clone());
        Expr::Struct {
            id: self.fresh_id(),
            struct_name,
            type_args: resolved.into_iter().map(Some).collect(),
            fields,
            base,
            ty: Some(ty),
            span,
        }
    }

    fn lower_if(
        &mut self,
        condition: &ast::Expr,
        then_branch: &ast::Expr,
        else_branch: Option<&ast::Expr>,
        span: Span,
    ) -> Expr {
        let condition = self.lower_expr(condition);
        let then_branch = self.lower_expr(then_branch);
        let else_branch = else_branch.map(|e| Box::new(self.lower_expr(e)));
        let ty = then_branch.ty();
        Expr::If {
            id: self.fresh_id(),
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch,
            ty,
            span,
        }
    }

    /// `if let p = e { a } else { b }` becomes `when e { p => a, _ => b }`.
    fn lower_if_let(
        &mut self,
        pattern: &ast::Pattern,
        scrutinee: &ast::Expr,
        then_branch: &ast::Expr,
        else_branch: Option<&ast::Expr>,
        span: Span,
    ) -> Expr {
        let scrutinee = self.lower_expr(scrutinee);
        let scrutinee_ty = scrutinee.ty();

        self.scopes.push();
        let match_pattern = self.lower_pattern(pattern, &scrutinee_ty);
        let then_body = self.lower_expr(then_branch);
        self.scopes.pop();
        let match_arm = WhenArm {
            pattern: match_pattern,
            guard: None,
            body: Box::new(then_body),
            span: then_branch.span,
        };

        let wildcard = Pattern::Wildcard {
            id: self.fresh_id(),
            span,
        };
        let (else_body, else_span) = match else_branch {
            Some(e) => (self.lower_expr(e), e.span),
            None => (self.unit_literal(span), span),
        };
        let else_arm = WhenArm {
            pattern: wildcard,
            guard: None,
            body: Box::new(else_body),
            span: else_span,
        };

        let ty = match_arm.body.ty();
        Expr::When {
            id: self.fresh_id(),
            scrutinee: Box::new(scrutinee),
            arms: vec![match_arm, else_arm],
            ty,
            span,
        }
    }

    fn lower_when(&mut self, scrutinee: &ast::Expr, arms: &[ast::WhenArm], span: Span) -> Expr {
        let scrutinee = self.lower_expr(scrutinee);
        let scrutinee_ty = scrutinee.ty();
        let arms: Vec<WhenArm> = arms
            .iter()
            .map(|arm| {
                self.scopes.push();
                let pattern = self.lower_pattern(&arm.pattern, &scrutinee_ty);
                let guard = arm.guard.as_ref().map(|g| Box::new(self.lower_expr(g)));
                let body = Box::new(self.lower_expr(&arm.body));
                self.scopes.pop();
                WhenArm {
                    pattern,
                    guard,
                    body,
                    span: arm.span,
                }
            })
            .collect();
        let ty = arms.first().map_or_else(unit, |arm| arm.body.ty());
        Expr::When {
            id: self.fresh_id(),
            scrutinee: Box::new(scrutinee),
            arms,
            ty,
            span,
        }
    }

    fn lower_for(
        &mut self,
        label: Option<&String>,
        pattern: &ast::Pattern,
        iter: &ast::Expr,
        body: &ast::Expr,
        span: Span,
    ) -> Expr {
        let iter = self.lower_expr(iter);
        let element_ty = iteration_element(&iter.ty());

        self.scopes.push();
        let pattern = self.lower_pattern(pattern, &element_ty);
        let body = self.lower_expr(body);
        self.scopes.pop();

        Expr::For {
            id: self.fresh_id(),
            label: label.cloned(),
            pattern,
            iter: Box::new(iter),
            body: Box::new(body),
            ty: unit(),
            span,
        }
    }

    fn lower_range(
        &mut self,
        start: Option<&ast::Expr>,
        end: Option<&ast::Expr>,
        inclusive: bool,
        span: Span,
    ) -> Expr {
        let start = start.map(|s| self.lower_expr(s));
        let end = end.map(|e| self.lower_expr(e));

        let name = match (&start, &end) {
            (None, None) => "RangeFull",
            (None, Some(_)) if inclusive => "RangeToInclusive",
            (None, Some(_)) => "RangeTo",
            (Some(_), None) => "RangeFrom",
            (Some(_), Some(_)) if inclusive => "RangeInclusive",
            (Some(_), Some(_)) => "Range",
        };
        let element = start
            .as_ref()
            .and_then(Expr::ty)
            .or_else(|| end.as_ref().and_then(Expr::ty))
            .unwrap_or_else(|| Type::primitive(PrimitiveKind::I64));

        let mut fields = Vec::new();
        if let Some(start) = start {
            fields.push(("start".to_string(), start));
        }
        if let Some(end) = end {
            fields.push(("end".to_string(), end));
        }

        Expr::Struct {
            id: self.fresh_id(),
            struct_name: name.to_string(),
            type_args: vec![Some(element.clone())],
            fields,
            base: None,
            ty: Some(Type::named(name, vec![element])),
            span,
        }
    }
}

/// Element type produced by iterating a value of type `ty`.
fn iteration_element(ty: &HirType) -> HirType {
    let ty = ty.as_deref()?.strip_refs();
    if let Some(element) = ty.element_type() {
        return Some(element.clone());
    }
    match ty {
        Type::Named {
            name, type_args, ..
        } if name.starts_with("Range") => type_args.first().cloned(),
        _ => None,
    }
}
