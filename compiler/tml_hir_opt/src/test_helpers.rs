//! Shared HIR factories for pass tests.
//!
//! `Fx` hands out fresh ids so every fragment built through it is
//! module-unique, the same guarantee the builder gives. Only compiled in
//! test builds.

use std::sync::Arc;

use tml_hir::types::CaptureType;
use tml_hir::{
    BinOp, Expr, HirCapture, HirFunction, HirId, HirIdGenerator, HirModule, HirParam,
    LiteralValue, Pattern, PrimitiveKind, Span, Stmt, Type, UnaryOp,
};

pub(crate) fn i64_ty() -> Arc<Type> {
    Type::primitive(PrimitiveKind::I64)
}

pub(crate) fn module(functions: Vec<HirFunction>) -> HirModule {
    let mut module = HirModule::new("test", "test.tml");
    module.functions = functions;
    module
}

/// Body of the free function `name`.
pub(crate) fn body<'m>(module: &'m HirModule, name: &str) -> &'m Expr {
    match module.find_function(name).and_then(|f| f.body.as_ref()) {
        Some(body) => body,
        None => panic!("function `{name}` has no body"),
    }
}

/// Trailing expression of a block.
pub(crate) fn tail(expr: &Expr) -> &Expr {
    match expr {
        Expr::Block { expr: Some(tail), .. } => tail,
        other => panic!("expected block with trailing expression, got {other:?}"),
    }
}

pub(crate) struct Fx {
    ids: HirIdGenerator,
}

impl Fx {
    pub(crate) fn new() -> Self {
        Fx {
            ids: HirIdGenerator::new(),
        }
    }

    pub(crate) fn id(&mut self) -> HirId {
        self.ids.next_id()
    }

    fn lit(&mut self, value: LiteralValue, ty: Arc<Type>) -> Expr {
        Expr::Literal {
            id: self.id(),
            value,
            ty: Some(ty),
            span: Span::DUMMY,
        }
    }

    pub(crate) fn int(&mut self, value: i64) -> Expr {
        self.lit(LiteralValue::Int64(value), i64_ty())
    }

    pub(crate) fn uint(&mut self, value: u64) -> Expr {
        self.lit(LiteralValue::UInt64(value), Type::primitive(PrimitiveKind::U64))
    }

    pub(crate) fn float(&mut self, value: f64) -> Expr {
        self.lit(LiteralValue::Float64(value), Type::primitive(PrimitiveKind::F64))
    }

    pub(crate) fn bool(&mut self, value: bool) -> Expr {
        self.lit(LiteralValue::Bool(value), Type::bool())
    }

    pub(crate) fn var(&mut self, name: &str) -> Expr {
        Expr::Var {
            id: self.id(),
            name: name.to_string(),
            ty: Some(i64_ty()),
            span: Span::DUMMY,
        }
    }

    pub(crate) fn binary(&mut self, op: BinOp, left: Expr, right: Expr) -> Expr {
        let ty = if op.is_comparison() || op.is_logical() {
            Some(Type::bool())
        } else {
            left.ty()
        };
        Expr::Binary {
            id: self.id(),
            op,
            left: Box::new(left),
            right: Box::new(right),
            ty,
            span: Span::DUMMY,
        }
    }

    pub(crate) fn unary(&mut self, op: UnaryOp, operand: Expr) -> Expr {
        let ty = if op == UnaryOp::Not {
            Some(Type::bool())
        } else {
            operand.ty()
        };
        Expr::Unary {
            id: self.id(),
            op,
            operand: Box::new(operand),
            ty,
            span: Span::DUMMY,
        }
    }

    pub(crate) fn call(&mut self, name: &str, args: Vec<Expr>) -> Expr {
        Expr::Call {
            id: self.id(),
            func_name: name.to_string(),
            type_args: Vec::new(),
            args,
            ty: Some(i64_ty()),
            span: Span::DUMMY,
        }
    }

    pub(crate) fn method_call(&mut self, receiver: Expr, name: &str, args: Vec<Expr>) -> Expr {
        Expr::MethodCall {
            id: self.id(),
            receiver_type: receiver.ty(),
            receiver: Box::new(receiver),
            method_name: name.to_string(),
            type_args: Vec::new(),
            args,
            ty: Some(Type::unit()),
            span: Span::DUMMY,
        }
    }

    pub(crate) fn block(&mut self, stmts: Vec<Stmt>, tail: Option<Expr>) -> Expr {
        let ty = tail.as_ref().map_or_else(|| Some(Type::unit()), Expr::ty);
        Expr::Block {
            id: self.id(),
            stmts,
            expr: tail.map(Box::new),
            ty,
            span: Span::DUMMY,
        }
    }

    pub(crate) fn let_(&mut self, name: &str, is_mut: bool, init: Expr) -> Stmt {
        let ty = init.ty();
        Stmt::Let {
            id: self.id(),
            pattern: Pattern::Binding {
                id: self.id(),
                name: name.to_string(),
                is_mut,
                ty: ty.clone(),
                span: Span::DUMMY,
            },
            ty,
            init: Some(Box::new(init)),
            span: Span::DUMMY,
        }
    }

    pub(crate) fn stmt(&mut self, expr: Expr) -> Stmt {
        Stmt::Expr {
            id: self.id(),
            expr: Box::new(expr),
            span: Span::DUMMY,
        }
    }

    pub(crate) fn if_(
        &mut self,
        condition: Expr,
        then_branch: Expr,
        else_branch: Option<Expr>,
    ) -> Expr {
        Expr::If {
            id: self.id(),
            ty: then_branch.ty(),
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
            span: Span::DUMMY,
        }
    }

    pub(crate) fn ret(&mut self, value: Option<Expr>) -> Expr {
        Expr::Return {
            id: self.id(),
            value: value.map(Box::new),
            span: Span::DUMMY,
        }
    }

    pub(crate) fn tuple(&mut self, elements: Vec<Expr>) -> Expr {
        let ty = Type::tuple(
            elements
                .iter()
                .map(|e| e.ty().unwrap_or_else(Type::unit))
                .collect(),
        );
        Expr::Tuple {
            id: self.id(),
            elements,
            ty: Some(ty),
            span: Span::DUMMY,
        }
    }

    pub(crate) fn assign(&mut self, target: Expr, value: Expr) -> Expr {
        Expr::Assign {
            id: self.id(),
            target: Box::new(target),
            value: Box::new(value),
            span: Span::DUMMY,
        }
    }

    /// A closure with `I64` params and captures given as `(name, is_mut)`.
    pub(crate) fn closure(
        &mut self,
        params: &[&str],
        body: Expr,
        captures: &[(&str, bool)],
    ) -> Expr {
        let captures: Vec<HirCapture> = captures
            .iter()
            .map(|(name, is_mut)| HirCapture {
                name: (*name).to_string(),
                ty: Some(i64_ty()),
                is_mut: *is_mut,
                by_move: false,
            })
            .collect();
        let ty = Arc::new(Type::Closure {
            params: params.iter().map(|_| Some(i64_ty())).collect(),
            ret: body.ty(),
            captures: captures
                .iter()
                .map(|c| CaptureType {
                    name: c.name.clone(),
                    ty: c.ty.clone(),
                    is_mut: c.is_mut,
                })
                .collect(),
        });
        Expr::Closure {
            id: self.id(),
            params: params
                .iter()
                .map(|p| ((*p).to_string(), Some(i64_ty())))
                .collect(),
            body: Box::new(body),
            captures,
            ty: Some(ty),
            span: Span::DUMMY,
        }
    }

    /// A function over `I64` params returning `I64`.
    pub(crate) fn function(&mut self, name: &str, params: &[&str], body: Expr) -> HirFunction {
        HirFunction {
            id: self.id(),
            name: name.to_string(),
            mangled_name: name.to_string(),
            params: params
                .iter()
                .map(|p| HirParam {
                    name: (*p).to_string(),
                    ty: Some(i64_ty()),
                    is_mut: false,
                    span: Span::DUMMY,
                })
                .collect(),
            return_type: Some(i64_ty()),
            body: Some(body),
            is_public: false,
            is_async: false,
            is_extern: false,
            extern_abi: None,
            attributes: Vec::new(),
            span: Span::DUMMY,
        }
    }
}
