use std::io::{self, Write};

use tml_hir::types::type_to_string;
use tml_hir::{
    Expr, HirBehavior, HirCapture, HirConst, HirEnum, HirFunction, HirId, HirImpl, HirModule,
    HirParam, HirStruct, HirType, LiteralValue, Pattern, Span, Stmt, WhenArm,
};

use super::{
    expr_tag, literal_tag, pattern_tag, FLAG_SPANS, STMT_EXPR, STMT_LET, TYPE_NAMED,
    TYPE_UNKNOWN,
};
use crate::config::HirSerializeOptions;
use crate::hash::compute_hir_hash;
use crate::{HIR_MAGIC, HIR_VERSION_MAJOR, HIR_VERSION_MINOR};

/// Encodes a [`HirModule`] into the binary cache format.
pub struct HirBinaryWriter<W: Write> {
    out: W,
    options: HirSerializeOptions,
}

impl<W: Write> HirBinaryWriter<W> {
    pub fn new(out: W, options: HirSerializeOptions) -> Self {
        HirBinaryWriter { out, options }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes the header followed by the whole module.
    pub fn write_module(&mut self, module: &HirModule) -> io::Result<()> {
        self.u32(HIR_MAGIC)?;
        self.u16(HIR_VERSION_MAJOR)?;
        self.u16(HIR_VERSION_MINOR)?;
        self.u64(compute_hir_hash(module).value())?;
        self.u8(if self.options.include_spans { FLAG_SPANS } else { 0 })?;

        self.string(&module.name)?;
        self.string(&module.source_path)?;
        self.seq(&module.structs, Self::hir_struct)?;
        self.seq(&module.enums, Self::hir_enum)?;
        self.seq(&module.behaviors, Self::behavior)?;
        self.seq(&module.impls, Self::hir_impl)?;
        self.seq(&module.functions, Self::function)?;
        self.seq(&module.constants, Self::constant)?;
        self.seq(&module.imports, |w, import| w.string(import))?;
        self.out.flush()
    }

    // Primitives

    fn u8(&mut self, value: u8) -> io::Result<()> {
        self.out.write_all(&[value])
    }

    fn u16(&mut self, value: u16) -> io::Result<()> {
        self.out.write_all(&value.to_le_bytes())
    }

    fn u32(&mut self, value: u32) -> io::Result<()> {
        self.out.write_all(&value.to_le_bytes())
    }

    fn u64(&mut self, value: u64) -> io::Result<()> {
        self.out.write_all(&value.to_le_bytes())
    }

    fn i32(&mut self, value: i32) -> io::Result<()> {
        self.out.write_all(&value.to_le_bytes())
    }

    fn i64(&mut self, value: i64) -> io::Result<()> {
        self.out.write_all(&value.to_le_bytes())
    }

    fn f64(&mut self, value: f64) -> io::Result<()> {
        self.u64(value.to_bits())
    }

    fn bool(&mut self, value: bool) -> io::Result<()> {
        self.u8(u8::from(value))
    }

    fn len(&mut self, len: usize) -> io::Result<()> {
        let len = u32::try_from(len).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "HIR list longer than u32::MAX")
        })?;
        self.u32(len)
    }

    fn string(&mut self, s: &str) -> io::Result<()> {
        self.len(s.len())?;
        self.out.write_all(s.as_bytes())
    }

    fn id(&mut self, id: HirId) -> io::Result<()> {
        self.u64(id.raw())
    }

    fn span(&mut self, span: Span) -> io::Result<()> {
        if !self.options.include_spans {
            return Ok(());
        }
        for location in [span.start, span.end] {
            self.u32(location.line)?;
            self.u32(location.column)?;
            self.u32(location.offset)?;
        }
        Ok(())
    }

    fn ty(&mut self, ty: &HirType) -> io::Result<()> {
        match ty {
            Some(_) => {
                self.u8(TYPE_NAMED)?;
                self.string(&type_to_string(ty))
            }
            None => self.u8(TYPE_UNKNOWN),
        }
    }

    fn seq<T>(
        &mut self,
        items: &[T],
        mut each: impl FnMut(&mut Self, &T) -> io::Result<()>,
    ) -> io::Result<()> {
        self.len(items.len())?;
        for item in items {
            each(self, item)?;
        }
        Ok(())
    }

    fn opt<T>(
        &mut self,
        value: Option<&T>,
        each: impl FnOnce(&mut Self, &T) -> io::Result<()>,
    ) -> io::Result<()> {
        self.bool(value.is_some())?;
        match value {
            Some(value) => each(self, value),
            None => Ok(()),
        }
    }

    fn opt_string(&mut self, value: Option<&String>) -> io::Result<()> {
        self.opt(value, |w, s| w.string(s))
    }

    fn types(&mut self, types: &[HirType]) -> io::Result<()> {
        self.seq(types, Self::ty)
    }

    fn exprs(&mut self, exprs: &[Expr]) -> io::Result<()> {
        self.seq(exprs, Self::expr)
    }

    fn opt_expr(&mut self, expr: Option<&Expr>) -> io::Result<()> {
        self.opt(expr, |w, e| w.expr(e))
    }

    fn stmts(&mut self, stmts: &[Stmt]) -> io::Result<()> {
        self.seq(stmts, Self::stmt)
    }

    fn literal(&mut self, value: &LiteralValue) -> io::Result<()> {
        self.u8(literal_tag(value))?;
        match value {
            LiteralValue::Int64(v) => self.i64(*v),
            LiteralValue::UInt64(v) => self.u64(*v),
            LiteralValue::Float64(v) => self.f64(*v),
            LiteralValue::Bool(v) => self.bool(*v),
            LiteralValue::Char(c) => self.u32(u32::from(*c)),
            LiteralValue::String(s) => self.string(s),
        }
    }

    // Declarations

    fn param(&mut self, param: &HirParam) -> io::Result<()> {
        self.string(&param.name)?;
        self.ty(&param.ty)?;
        self.bool(param.is_mut)?;
        self.span(param.span)
    }

    fn hir_struct(&mut self, s: &HirStruct) -> io::Result<()> {
        self.id(s.id)?;
        self.string(&s.name)?;
        self.string(&s.mangled_name)?;
        self.seq(&s.fields, |w, field| {
            w.string(&field.name)?;
            w.ty(&field.ty)?;
            w.bool(field.is_public)?;
            w.span(field.span)
        })?;
        self.bool(s.is_public)?;
        self.span(s.span)
    }

    fn hir_enum(&mut self, e: &HirEnum) -> io::Result<()> {
        self.id(e.id)?;
        self.string(&e.name)?;
        self.string(&e.mangled_name)?;
        self.seq(&e.variants, |w, variant| {
            w.string(&variant.name)?;
            w.u32(variant.index)?;
            w.types(&variant.payload_types)?;
            w.span(variant.span)
        })?;
        self.bool(e.is_public)?;
        self.span(e.span)
    }

    fn behavior(&mut self, b: &HirBehavior) -> io::Result<()> {
        self.id(b.id)?;
        self.string(&b.name)?;
        self.seq(&b.methods, |w, method| {
            w.string(&method.name)?;
            w.seq(&method.params, Self::param)?;
            w.ty(&method.return_type)?;
            w.bool(method.has_default_impl)?;
            w.opt_expr(method.default_body.as_ref())?;
            w.span(method.span)
        })?;
        self.seq(&b.super_behaviors, |w, name| w.string(name))?;
        self.bool(b.is_public)?;
        self.span(b.span)
    }

    fn hir_impl(&mut self, i: &HirImpl) -> io::Result<()> {
        self.id(i.id)?;
        self.opt_string(i.behavior_name.as_ref())?;
        self.string(&i.type_name)?;
        self.ty(&i.self_type)?;
        self.seq(&i.methods, Self::function)?;
        self.span(i.span)
    }

    fn function(&mut self, f: &HirFunction) -> io::Result<()> {
        self.id(f.id)?;
        self.string(&f.name)?;
        self.string(&f.mangled_name)?;
        self.seq(&f.params, Self::param)?;
        self.ty(&f.return_type)?;
        self.opt_expr(f.body.as_ref())?;
        self.bool(f.is_public)?;
        self.bool(f.is_async)?;
        self.bool(f.is_extern)?;
        self.opt_string(f.extern_abi.as_ref())?;
        self.seq(&f.attributes, |w, attr| w.string(attr))?;
        self.span(f.span)
    }

    fn constant(&mut self, c: &HirConst) -> io::Result<()> {
        self.id(c.id)?;
        self.string(&c.name)?;
        self.ty(&c.ty)?;
        self.expr(&c.value)?;
        self.bool(c.is_public)?;
        self.span(c.span)
    }

    // Nodes

    fn stmt(&mut self, stmt: &Stmt) -> io::Result<()> {
        match stmt {
            Stmt::Let {
                id,
                pattern,
                ty,
                init,
                span,
            } => {
                self.u8(STMT_LET)?;
                self.id(*id)?;
                self.pattern(pattern)?;
                self.ty(ty)?;
                self.opt_expr(init.as_deref())?;
                self.span(*span)
            }
            Stmt::Expr { id, expr, span } => {
                self.u8(STMT_EXPR)?;
                self.id(*id)?;
                self.expr(expr)?;
                self.span(*span)
            }
        }
    }

    fn pattern(&mut self, pattern: &Pattern) -> io::Result<()> {
        self.u8(pattern_tag(pattern))?;
        self.id(pattern.id())?;
        match pattern {
            Pattern::Wildcard { .. } => {}
            Pattern::Binding {
                name, is_mut, ty, ..
            } => {
                self.string(name)?;
                self.bool(*is_mut)?;
                self.ty(ty)?;
            }
            Pattern::Literal { value, ty, .. } => {
                self.literal(value)?;
                self.ty(ty)?;
            }
            Pattern::Tuple { elements, ty, .. } | Pattern::Or {
                alternatives: elements,
                ty,
                ..
            } => {
                self.seq(elements, Self::pattern)?;
                self.ty(ty)?;
            }
            Pattern::Struct {
                struct_name,
                fields,
                has_rest,
                ty,
                ..
            } => {
                self.string(struct_name)?;
                self.seq(fields, |w, (name, p)| {
                    w.string(name)?;
                    w.pattern(p)
                })?;
                self.bool(*has_rest)?;
                self.ty(ty)?;
            }
            Pattern::Enum {
                enum_name,
                variant_name,
                variant_index,
                payload,
                ty,
                ..
            } => {
                self.string(enum_name)?;
                self.string(variant_name)?;
                self.i32(*variant_index)?;
                self.opt(payload.as_ref(), |w, ps| w.seq(ps, Self::pattern))?;
                self.ty(ty)?;
            }
            Pattern::Range {
                start,
                end,
                inclusive,
                ty,
                ..
            } => {
                self.opt(start.as_ref(), |w, v| w.i64(*v))?;
                self.opt(end.as_ref(), |w, v| w.i64(*v))?;
                self.bool(*inclusive)?;
                self.ty(ty)?;
            }
            Pattern::Array {
                elements, rest, ty, ..
            } => {
                self.seq(elements, Self::pattern)?;
                self.opt(rest.as_deref(), Self::pattern)?;
                self.ty(ty)?;
            }
        }
        self.span(pattern.span())
    }

    fn capture(&mut self, capture: &HirCapture) -> io::Result<()> {
        self.string(&capture.name)?;
        self.ty(&capture.ty)?;
        self.bool(capture.is_mut)?;
        self.bool(capture.by_move)
    }

    fn arm(&mut self, arm: &WhenArm) -> io::Result<()> {
        self.pattern(&arm.pattern)?;
        self.opt_expr(arm.guard.as_deref())?;
        self.expr(&arm.body)?;
        self.span(arm.span)
    }

    fn expr(&mut self, expr: &Expr) -> io::Result<()> {
        self.u8(expr_tag(expr))?;
        self.id(expr.id())?;
        match expr {
            Expr::Literal { value, ty, .. } => {
                self.literal(value)?;
                self.ty(ty)?;
            }
            Expr::Var { name, ty, .. } => {
                self.string(name)?;
                self.ty(ty)?;
            }
            Expr::Binary {
                op,
                left,
                right,
                ty,
                ..
            } => {
                self.u8(op.ordinal())?;
                self.expr(left)?;
                self.expr(right)?;
                self.ty(ty)?;
            }
            Expr::Unary {
                op, operand, ty, ..
            } => {
                self.u8(op.ordinal())?;
                self.expr(operand)?;
                self.ty(ty)?;
            }
            Expr::Call {
                func_name,
                type_args,
                args,
                ty,
                ..
            } => {
                self.string(func_name)?;
                self.types(type_args)?;
                self.exprs(args)?;
                self.ty(ty)?;
            }
            Expr::MethodCall {
                receiver,
                method_name,
                type_args,
                args,
                receiver_type,
                ty,
                ..
            } => {
                self.expr(receiver)?;
                self.string(method_name)?;
                self.types(type_args)?;
                self.exprs(args)?;
                self.ty(receiver_type)?;
                self.ty(ty)?;
            }
            Expr::Field {
                object,
                field_name,
                field_index,
                ty,
                ..
            } => {
                self.expr(object)?;
                self.string(field_name)?;
                self.i32(*field_index)?;
                self.ty(ty)?;
            }
            Expr::Index {
                object, index, ty, ..
            } => {
                self.expr(object)?;
                self.expr(index)?;
                self.ty(ty)?;
            }
            Expr::Tuple { elements, ty, .. } => {
                self.exprs(elements)?;
                self.ty(ty)?;
            }
            Expr::Array {
                elements,
                element_type,
                size,
                ty,
                ..
            } => {
                self.exprs(elements)?;
                self.ty(element_type)?;
                self.u64(*size)?;
                self.ty(ty)?;
            }
            Expr::ArrayRepeat {
                value, count, ty, ..
            } => {
                self.expr(value)?;
                self.u64(*count)?;
                self.ty(ty)?;
            }
            Expr::Struct {
                struct_name,
                type_args,
                fields,
                base,
                ty,
                ..
            } => {
                self.string(struct_name)?;
                self.types(type_args)?;
                self.seq(fields, |w, (name, value)| {
                    w.string(name)?;
                    w.expr(value)
                })?;
                self.opt_expr(base.as_deref())?;
                self.ty(ty)?;
            }
            Expr::Enum {
                enum_name,
                variant_name,
                variant_index,
                type_args,
                payload,
                ty,
                ..
            } => {
                self.string(enum_name)?;
                self.string(variant_name)?;
                self.i32(*variant_index)?;
                self.types(type_args)?;
                self.exprs(payload)?;
                self.ty(ty)?;
            }
            Expr::Block {
                stmts,
                expr: tail,
                ty,
                ..
            }
            | Expr::Lowlevel {
                stmts,
                expr: tail,
                ty,
                ..
            } => {
                self.stmts(stmts)?;
                self.opt_expr(tail.as_deref())?;
                self.ty(ty)?;
            }
            Expr::If {
                condition,
                then_branch,
                else_branch,
                ty,
                ..
            } => {
                self.expr(condition)?;
                self.expr(then_branch)?;
                self.opt_expr(else_branch.as_deref())?;
                self.ty(ty)?;
            }
            Expr::When {
                scrutinee,
                arms,
                ty,
                ..
            } => {
                self.expr(scrutinee)?;
                self.seq(arms, Self::arm)?;
                self.ty(ty)?;
            }
            Expr::Loop {
                label, body, ty, ..
            } => {
                self.opt_string(label.as_ref())?;
                self.expr(body)?;
                self.ty(ty)?;
            }
            Expr::While {
                label,
                condition,
                body,
                ty,
                ..
            } => {
                self.opt_string(label.as_ref())?;
                self.expr(condition)?;
                self.expr(body)?;
                self.ty(ty)?;
            }
            Expr::For {
                label,
                pattern,
                iter,
                body,
                ty,
                ..
            } => {
                self.opt_string(label.as_ref())?;
                self.pattern(pattern)?;
                self.expr(iter)?;
                self.expr(body)?;
                self.ty(ty)?;
            }
            Expr::Return { value, .. } => {
                self.opt_expr(value.as_deref())?;
            }
            Expr::Break { label, value, .. } => {
                self.opt_string(label.as_ref())?;
                self.opt_expr(value.as_deref())?;
            }
            Expr::Continue { label, .. } => {
                self.opt_string(label.as_ref())?;
            }
            Expr::Closure {
                params,
                body,
                captures,
                ty,
                ..
            } => {
                self.seq(params, |w, (name, ty)| {
                    w.string(name)?;
                    w.ty(ty)
                })?;
                self.expr(body)?;
                self.seq(captures, Self::capture)?;
                self.ty(ty)?;
            }
            Expr::Cast {
                expr: inner,
                target_type,
                ty,
                ..
            } => {
                self.expr(inner)?;
                self.ty(target_type)?;
                self.ty(ty)?;
            }
            Expr::Try {
                expr: inner, ty, ..
            }
            | Expr::Await {
                expr: inner, ty, ..
            } => {
                self.expr(inner)?;
                self.ty(ty)?;
            }
            Expr::Assign { target, value, .. } => {
                self.expr(target)?;
                self.expr(value)?;
            }
            Expr::CompoundAssign {
                op, target, value, ..
            } => {
                self.u8(op.ordinal())?;
                self.expr(target)?;
                self.expr(value)?;
            }
        }
        self.span(expr.span())
    }
}
