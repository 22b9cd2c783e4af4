//! A sample module exercising every node kind, for format tests.
//!
//! Only primitive and argument-free named types are used, so the module
//! survives a binary round trip unchanged.

use tml_hir::{
    BinOp, CompoundOp, Expr, HirBehavior, HirBehaviorMethod, HirCapture, HirConst, HirEnum,
    HirField, HirFunction, HirId, HirImpl, HirModule, HirParam, HirStruct, HirType, HirVariant,
    LiteralValue, Location, Pattern, PrimitiveKind, Span, Stmt, Type, UnaryOp, WhenArm,
};

pub(crate) fn prim(kind: PrimitiveKind) -> HirType {
    Some(Type::primitive(kind))
}

pub(crate) fn named(name: &str) -> HirType {
    Some(Type::named(name, Vec::new()))
}

/// Hands out ids and distinct spans.
pub(crate) struct Gen {
    next: u64,
}

impl Gen {
    pub(crate) fn new() -> Self {
        Gen { next: 0 }
    }

    pub(crate) fn id(&mut self) -> HirId {
        self.next += 1;
        HirId::new(self.next)
    }

    pub(crate) fn span(&self) -> Span {
        let line = u32::try_from(self.next).unwrap_or(u32::MAX);
        Span::new(Location::new(line, 1, line * 10), Location::new(line, 9, line * 10 + 8))
    }

    pub(crate) fn int(&mut self, value: i64) -> Expr {
        Expr::Literal {
            id: self.id(),
            value: LiteralValue::Int64(value),
            ty: prim(PrimitiveKind::I64),
            span: self.span(),
        }
    }

    pub(crate) fn lit(&mut self, value: LiteralValue, ty: HirType) -> Expr {
        Expr::Literal {
            id: self.id(),
            value,
            ty,
            span: self.span(),
        }
    }

    pub(crate) fn var(&mut self, name: &str, ty: HirType) -> Expr {
        Expr::Var {
            id: self.id(),
            name: name.to_string(),
            ty,
            span: self.span(),
        }
    }

    pub(crate) fn binding(&mut self, name: &str, is_mut: bool, ty: HirType) -> Pattern {
        Pattern::Binding {
            id: self.id(),
            name: name.to_string(),
            is_mut,
            ty,
            span: self.span(),
        }
    }

    pub(crate) fn stmt(&mut self, expr: Expr) -> Stmt {
        Stmt::Expr {
            id: self.id(),
            expr: Box::new(expr),
            span: self.span(),
        }
    }

    pub(crate) fn param(&self, name: &str, ty: HirType) -> HirParam {
        HirParam {
            name: name.to_string(),
            ty,
            is_mut: false,
            span: self.span(),
        }
    }

    pub(crate) fn function(
        &mut self,
        name: &str,
        params: Vec<HirParam>,
        ret: HirType,
        body: Option<Expr>,
    ) -> HirFunction {
        HirFunction {
            id: self.id(),
            name: name.to_string(),
            mangled_name: name.to_string(),
            params,
            return_type: ret,
            body,
            is_public: false,
            is_async: false,
            is_extern: false,
            extern_abi: None,
            attributes: Vec::new(),
            span: self.span(),
        }
    }
}

fn i64_ty() -> HirType {
    prim(PrimitiveKind::I64)
}

fn unit() -> HirType {
    Some(Type::unit())
}

fn never() -> HirType {
    Some(Type::never())
}

fn boxed(expr: Expr) -> Box<Expr> {
    Box::new(expr)
}

/// Patterns: one of each kind, inside a `when`.
fn when_expr(g: &mut Gen) -> Expr {
    let scrutinee = g.var("shape", named("Shape"));

    let circle = Pattern::Enum {
        id: g.id(),
        enum_name: "Shape".to_string(),
        variant_name: "Circle".to_string(),
        variant_index: 0,
        payload: Some(vec![g.binding("r", false, prim(PrimitiveKind::F64))]),
        ty: named("Shape"),
        span: g.span(),
    };
    let guard = {
        let r = g.var("r", prim(PrimitiveKind::F64));
        let zero = g.lit(LiteralValue::Float64(0.5), prim(PrimitiveKind::F64));
        Expr::Binary {
            id: g.id(),
            op: BinOp::Gt,
            left: boxed(r),
            right: boxed(zero),
            ty: Some(Type::bool()),
            span: g.span(),
        }
    };
    let first = WhenArm {
        pattern: circle,
        guard: Some(boxed(guard)),
        body: boxed(g.int(1)),
        span: g.span(),
    };

    let range = Pattern::Range {
        id: g.id(),
        start: Some(1),
        end: None,
        inclusive: false,
        ty: i64_ty(),
        span: g.span(),
    };
    let literal = Pattern::Literal {
        id: g.id(),
        value: LiteralValue::Char('z'),
        ty: prim(PrimitiveKind::Char),
        span: g.span(),
    };
    let or = Pattern::Or {
        id: g.id(),
        alternatives: vec![range, literal],
        ty: i64_ty(),
        span: g.span(),
    };
    let second = WhenArm {
        pattern: or,
        guard: None,
        body: boxed(g.int(2)),
        span: g.span(),
    };

    let rest = g.binding("tail", false, named("[I64]"));
    let array = Pattern::Array {
        id: g.id(),
        elements: vec![Pattern::Wildcard {
            id: g.id(),
            span: g.span(),
        }],
        rest: Some(Box::new(rest)),
        ty: named("[I64; 3]"),
        span: g.span(),
    };
    let fields = vec![("x".to_string(), g.binding("px", true, prim(PrimitiveKind::I32)))];
    let strukt = Pattern::Struct {
        id: g.id(),
        struct_name: "Point".to_string(),
        fields,
        has_rest: true,
        ty: named("Point"),
        span: g.span(),
    };
    let tuple = Pattern::Tuple {
        id: g.id(),
        elements: vec![array, strukt],
        ty: named("([I64; 3], Point)"),
        span: g.span(),
    };
    let third = WhenArm {
        pattern: tuple,
        guard: None,
        body: boxed(g.int(3)),
        span: g.span(),
    };

    Expr::When {
        id: g.id(),
        scrutinee: boxed(scrutinee),
        arms: vec![first, second, third],
        ty: i64_ty(),
        span: g.span(),
    }
}

/// Expressions: every remaining variant, as statements of one block.
fn body(g: &mut Gen) -> Expr {
    let mut stmts = Vec::new();

    let init = {
        let (a, b) = (g.int(2), g.int(3));
        Expr::Binary {
            id: g.id(),
            op: BinOp::Shl,
            left: boxed(a),
            right: boxed(b),
            ty: i64_ty(),
            span: g.span(),
        }
    };
    stmts.push(Stmt::Let {
        id: g.id(),
        pattern: g.binding("total", true, i64_ty()),
        ty: i64_ty(),
        init: Some(boxed(init)),
        span: g.span(),
    });
    stmts.push(Stmt::Let {
        id: g.id(),
        pattern: Pattern::Wildcard {
            id: g.id(),
            span: g.span(),
        },
        ty: None,
        init: None,
        span: g.span(),
    });

    let negated = {
        let operand = g.var("total", i64_ty());
        Expr::Unary {
            id: g.id(),
            op: UnaryOp::Neg,
            operand: boxed(operand),
            ty: i64_ty(),
            span: g.span(),
        }
    };
    let call = {
        let text = g.lit(
            LiteralValue::String("hi \"there\"".to_string()),
            prim(PrimitiveKind::Str),
        );
        Expr::Call {
            id: g.id(),
            func_name: "print".to_string(),
            type_args: vec![prim(PrimitiveKind::Str)],
            args: vec![text, negated],
            ty: unit(),
            span: g.span(),
        }
    };
    stmts.push(g.stmt(call));

    let method = {
        let receiver = g.var("p", named("Point"));
        let arg = g.lit(LiteralValue::UInt64(7), prim(PrimitiveKind::U64));
        Expr::MethodCall {
            id: g.id(),
            receiver: boxed(receiver),
            method_name: "scale".to_string(),
            type_args: Vec::new(),
            args: vec![arg],
            receiver_type: named("Point"),
            ty: named("Point"),
            span: g.span(),
        }
    };
    let field = Expr::Field {
        id: g.id(),
        object: boxed(method),
        field_name: "x".to_string(),
        field_index: 0,
        ty: prim(PrimitiveKind::I32),
        span: g.span(),
    };
    let cast = Expr::Cast {
        id: g.id(),
        expr: boxed(field),
        target_type: i64_ty(),
        ty: i64_ty(),
        span: g.span(),
    };
    stmts.push(g.stmt(cast));

    let array = {
        let (a, b) = (g.int(1), g.int(2));
        Expr::Array {
            id: g.id(),
            elements: vec![a, b],
            element_type: i64_ty(),
            size: 2,
            ty: named("[I64; 2]"),
            span: g.span(),
        }
    };
    let index = {
        let i = g.int(0);
        Expr::Index {
            id: g.id(),
            object: boxed(array),
            index: boxed(i),
            ty: i64_ty(),
            span: g.span(),
        }
    };
    let repeat = {
        let zero = g.lit(LiteralValue::Bool(false), Some(Type::bool()));
        Expr::ArrayRepeat {
            id: g.id(),
            value: boxed(zero),
            count: 4,
            ty: named("[Bool; 4]"),
            span: g.span(),
        }
    };
    let tuple = Expr::Tuple {
        id: g.id(),
        elements: vec![index, repeat],
        ty: named("(I64, [Bool; 4])"),
        span: g.span(),
    };
    stmts.push(g.stmt(tuple));

    let point = {
        let (x, base) = (g.int(1), g.var("origin", named("Point")));
        Expr::Struct {
            id: g.id(),
            struct_name: "Point".to_string(),
            type_args: Vec::new(),
            fields: vec![("x".to_string(), x)],
            base: Some(boxed(base)),
            ty: named("Point"),
            span: g.span(),
        }
    };
    stmts.push(g.stmt(point));

    let shape = {
        let radius = g.lit(LiteralValue::Float64(1.5), prim(PrimitiveKind::F64));
        Expr::Enum {
            id: g.id(),
            enum_name: "Shape".to_string(),
            variant_name: "Circle".to_string(),
            variant_index: 0,
            type_args: Vec::new(),
            payload: vec![radius],
            ty: named("Shape"),
            span: g.span(),
        }
    };
    stmts.push(g.stmt(shape));

    let loops = {
        let brk = Expr::Break {
            id: g.id(),
            label: Some("outer".to_string()),
            value: None,
            span: g.span(),
        };
        let cont = Expr::Continue {
            id: g.id(),
            label: None,
            span: g.span(),
        };
        let cond = g.lit(LiteralValue::Bool(true), Some(Type::bool()));
        let branch = Expr::If {
            id: g.id(),
            condition: boxed(cond),
            then_branch: boxed(brk),
            else_branch: Some(boxed(cont)),
            ty: never(),
            span: g.span(),
        };
        let iter = g.var("items", named("List[I64]"));
        let pattern = g.binding("item", false, i64_ty());
        let for_loop = Expr::For {
            id: g.id(),
            label: None,
            pattern,
            iter: boxed(iter),
            body: boxed(branch),
            ty: unit(),
            span: g.span(),
        };
        let cond = g.var("running", Some(Type::bool()));
        let while_loop = Expr::While {
            id: g.id(),
            label: None,
            condition: boxed(cond),
            body: boxed(for_loop),
            ty: unit(),
            span: g.span(),
        };
        Expr::Loop {
            id: g.id(),
            label: Some("outer".to_string()),
            body: boxed(while_loop),
            ty: unit(),
            span: g.span(),
        }
    };
    stmts.push(g.stmt(loops));

    let assignments = {
        let (target, value) = (g.var("total", i64_ty()), g.int(1));
        let compound = Expr::CompoundAssign {
            id: g.id(),
            op: CompoundOp::Add,
            target: boxed(target),
            value: boxed(value),
            span: g.span(),
        };
        let (target, value) = (g.var("total", i64_ty()), g.int(0));
        let assign = Expr::Assign {
            id: g.id(),
            target: boxed(target),
            value: boxed(value),
            span: g.span(),
        };
        let compound = g.stmt(compound);
        Expr::Lowlevel {
            id: g.id(),
            stmts: vec![compound],
            expr: Some(boxed(assign)),
            ty: unit(),
            span: g.span(),
        }
    };
    stmts.push(g.stmt(assignments));

    let closure = {
        let x = g.var("x", i64_ty());
        let total = g.var("total", i64_ty());
        let sum = Expr::Binary {
            id: g.id(),
            op: BinOp::Add,
            left: boxed(x),
            right: boxed(total),
            ty: i64_ty(),
            span: g.span(),
        };
        Expr::Closure {
            id: g.id(),
            params: vec![("x".to_string(), i64_ty())],
            body: boxed(sum),
            captures: vec![HirCapture {
                name: "total".to_string(),
                ty: i64_ty(),
                is_mut: true,
                by_move: false,
            }],
            ty: named("Closure"),
            span: g.span(),
        }
    };
    stmts.push(g.stmt(closure));

    let awaited = {
        let future = g.var("task", named("Future"));
        let awaited = Expr::Await {
            id: g.id(),
            expr: boxed(future),
            ty: named("Outcome"),
            span: g.span(),
        };
        Expr::Try {
            id: g.id(),
            expr: boxed(awaited),
            ty: i64_ty(),
            span: g.span(),
        }
    };
    stmts.push(g.stmt(awaited));

    let when = when_expr(g);
    let ret = Expr::Return {
        id: g.id(),
        value: Some(boxed(when)),
        span: g.span(),
    };

    Expr::Block {
        id: g.id(),
        stmts,
        expr: Some(boxed(ret)),
        ty: never(),
        span: g.span(),
    }
}

pub(crate) fn sample_module() -> HirModule {
    let mut g = Gen::new();
    let mut module = HirModule::new("app::main", "src/main.tml");
    module.imports = vec!["std::io".to_string(), "app::shapes".to_string()];

    module.structs.push(HirStruct {
        id: g.id(),
        name: "Point".to_string(),
        mangled_name: "Point".to_string(),
        fields: vec![
            HirField {
                name: "x".to_string(),
                ty: prim(PrimitiveKind::I32),
                is_public: true,
                span: g.span(),
            },
            HirField {
                name: "y".to_string(),
                ty: prim(PrimitiveKind::I32),
                is_public: false,
                span: g.span(),
            },
        ],
        is_public: true,
        span: g.span(),
    });

    module.enums.push(HirEnum {
        id: g.id(),
        name: "Shape".to_string(),
        mangled_name: "Shape".to_string(),
        variants: vec![
            HirVariant {
                name: "Circle".to_string(),
                index: 0,
                payload_types: vec![prim(PrimitiveKind::F64)],
                span: g.span(),
            },
            HirVariant {
                name: "Empty".to_string(),
                index: 1,
                payload_types: Vec::new(),
                span: g.span(),
            },
        ],
        is_public: false,
        span: g.span(),
    });

    let default_body = g.lit(LiteralValue::Float64(0.0), prim(PrimitiveKind::F64));
    module.behaviors.push(HirBehavior {
        id: g.id(),
        name: "Area".to_string(),
        methods: vec![HirBehaviorMethod {
            name: "area".to_string(),
            params: vec![g.param("this", named("This"))],
            return_type: prim(PrimitiveKind::F64),
            has_default_impl: true,
            default_body: Some(default_body),
            span: g.span(),
        }],
        super_behaviors: vec!["Display".to_string()],
        is_public: true,
        span: g.span(),
    });

    let area_body = g.lit(LiteralValue::Float64(2.0), prim(PrimitiveKind::F64));
    let this = g.param("this", named("Point"));
    let mut area = g.function("area", vec![this], prim(PrimitiveKind::F64), Some(area_body));
    area.mangled_name = "Point__area".to_string();
    module.impls.push(HirImpl {
        id: g.id(),
        behavior_name: Some("Area".to_string()),
        type_name: "Point".to_string(),
        self_type: named("Point"),
        methods: vec![area],
        span: g.span(),
    });

    let main_body = body(&mut g);
    let mut main = g.function("main", Vec::new(), i64_ty(), Some(main_body));
    main.is_public = true;
    main.attributes.push("entry".to_string());
    module.functions.push(main);

    let text = g.param("text", prim(PrimitiveKind::Str));
    let mut puts = g.function("puts", vec![text], prim(PrimitiveKind::I32), None);
    puts.is_extern = true;
    puts.extern_abi = Some("c".to_string());
    module.functions.push(puts);

    let zero = g.int(0);
    let mut fetch = g.function("fetch", Vec::new(), named("Outcome"), Some(zero));
    fetch.is_async = true;
    module.functions.push(fetch);

    let value = g.int(10);
    module.constants.push(HirConst {
        id: g.id(),
        name: "MAX".to_string(),
        ty: i64_ty(),
        value,
        is_public: true,
        span: g.span(),
    });

    module
}
