//! Syntax tree consumed by the HIR builder.
//!
//! This is the parser's output shape, kept as plain owned data: sugar is
//! still present (ternaries, `if let`, ranges, compound assignment, `var`,
//! let-else) and nothing carries a type beyond what the user wrote.
//!
//! The short constructors (`Expr::int`, `Expr::ident`, ...) build nodes with
//! [`Span::DUMMY`] and exist for synthesized code and tests.

use crate::span::Span;

/// A parsed compilation unit.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Module {
    pub name: String,
    pub source_path: String,
    pub decls: Vec<Decl>,
}

// Declarations

#[derive(Clone, Debug, PartialEq)]
pub enum Decl {
    Func(FuncDecl),
    Struct(StructDecl),
    Enum(EnumDecl),
    Behavior(BehaviorDecl),
    Impl(ImplDecl),
    Const(ConstDecl),
    Use(UseDecl),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub pattern: Pattern,
    pub ty: TypeExpr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct FuncDecl {
    pub name: String,
    pub generics: Vec<String>,
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
    pub body: Option<BlockExpr>,
    pub is_public: bool,
    pub is_async: bool,
    /// `Some(abi)` for `@extern("abi")` declarations.
    pub extern_abi: Option<String>,
    /// Decorator names such as `inline` or `noinline`.
    pub decorators: Vec<String>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub is_public: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct StructDecl {
    pub name: String,
    pub generics: Vec<String>,
    pub fields: Vec<FieldDecl>,
    pub is_public: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariantDecl {
    pub name: String,
    pub payload: Vec<TypeExpr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct EnumDecl {
    pub name: String,
    pub generics: Vec<String>,
    pub variants: Vec<VariantDecl>,
    pub is_public: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct BehaviorDecl {
    pub name: String,
    pub super_behaviors: Vec<TypeExpr>,
    /// Method signatures; a body marks a default implementation.
    pub methods: Vec<FuncDecl>,
    pub is_public: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImplDecl {
    pub behavior: Option<TypeExpr>,
    pub self_type: TypeExpr,
    pub methods: Vec<FuncDecl>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConstDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub value: Expr,
    pub is_public: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UseDecl {
    pub path: Vec<String>,
    pub span: Span,
}

// Types

/// A type as written in source.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeExpr {
    /// `Name`, `mod::Name[T, U]`
    Named {
        path: Vec<String>,
        generics: Vec<TypeExpr>,
    },
    Ref {
        mutable: bool,
        inner: Box<TypeExpr>,
    },
    Pointer {
        mutable: bool,
        inner: Box<TypeExpr>,
    },
    /// `[T; N]`; the size is an expression, usually an integer literal.
    Array {
        element: Box<TypeExpr>,
        size: Box<Expr>,
    },
    Slice(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    Func {
        params: Vec<TypeExpr>,
        ret: Option<Box<TypeExpr>>,
    },
    /// `_` or an elided annotation.
    Infer,
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            path: vec![name.into()],
            generics: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, generics: Vec<TypeExpr>) -> Self {
        TypeExpr::Named {
            path: vec![name.into()],
            generics,
        }
    }
}

// Expressions

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IntSuffix {
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
}

impl IntSuffix {
    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            IntSuffix::U8 | IntSuffix::U16 | IntSuffix::U32 | IntSuffix::U64 | IntSuffix::U128
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FloatSuffix {
    F32,
    F64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// Magnitude only; negation is a unary operator.
    Int {
        value: u64,
        suffix: Option<IntSuffix>,
    },
    Float {
        value: f64,
        suffix: Option<FloatSuffix>,
    },
    Str(String),
    Char(char),
    Bool(bool),
}

/// Binary operators, including assignment forms.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShlAssign,
    ShrAssign,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
    Ref,
    RefMut,
    Deref,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlockExpr {
    pub stmts: Vec<Stmt>,
    pub expr: Option<Box<Expr>>,
    pub span: Span,
}

impl BlockExpr {
    pub fn new(stmts: Vec<Stmt>, expr: Option<Expr>) -> Self {
        BlockExpr {
            stmts,
            expr: expr.map(Box::new),
            span: Span::DUMMY,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhenArm {
    pub pattern: Pattern,
    pub guard: Option<Box<Expr>>,
    pub body: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClosureParam {
    pub pattern: Pattern,
    pub ty: Option<TypeExpr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Ident(String),
    Path {
        segments: Vec<String>,
        generics: Vec<TypeExpr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        type_args: Vec<TypeExpr>,
        args: Vec<Expr>,
    },
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        type_args: Vec<TypeExpr>,
        args: Vec<Expr>,
    },
    Field {
        object: Box<Expr>,
        field: String,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Tuple(Vec<Expr>),
    Array(Vec<Expr>),
    ArrayRepeat {
        value: Box<Expr>,
        count: Box<Expr>,
    },
    Struct {
        path: Vec<String>,
        type_args: Vec<TypeExpr>,
        fields: Vec<(String, Expr)>,
        base: Option<Box<Expr>>,
    },
    Block(BlockExpr),
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
    Ternary {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    IfLet {
        pattern: Pattern,
        scrutinee: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
    When {
        scrutinee: Box<Expr>,
        arms: Vec<WhenArm>,
    },
    Loop {
        label: Option<String>,
        body: Box<Expr>,
    },
    While {
        label: Option<String>,
        condition: Box<Expr>,
        body: Box<Expr>,
    },
    For {
        label: Option<String>,
        pattern: Pattern,
        iter: Box<Expr>,
        body: Box<Expr>,
    },
    Return(Option<Box<Expr>>),
    Break {
        label: Option<String>,
        value: Option<Box<Expr>>,
    },
    Continue {
        label: Option<String>,
    },
    Closure {
        params: Vec<ClosureParam>,
        return_type: Option<TypeExpr>,
        body: Box<Expr>,
    },
    Range {
        start: Option<Box<Expr>>,
        end: Option<Box<Expr>>,
        inclusive: bool,
    },
    Cast {
        expr: Box<Expr>,
        target: TypeExpr,
    },
    Try(Box<Expr>),
    Await(Box<Expr>),
    Lowlevel(BlockExpr),
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    pub fn synthetic(kind: ExprKind) -> Self {
        Expr::new(kind, Span::DUMMY)
    }

    pub fn int(value: u64) -> Self {
        Expr::synthetic(ExprKind::Literal(Literal::Int {
            value,
            suffix: None,
        }))
    }

    pub fn float(value: f64) -> Self {
        Expr::synthetic(ExprKind::Literal(Literal::Float {
            value,
            suffix: None,
        }))
    }

    pub fn bool(value: bool) -> Self {
        Expr::synthetic(ExprKind::Literal(Literal::Bool(value)))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::synthetic(ExprKind::Literal(Literal::Str(value.into())))
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::synthetic(ExprKind::Ident(name.into()))
    }

    pub fn path(segments: &[&str]) -> Self {
        Expr::synthetic(ExprKind::Path {
            segments: segments.iter().map(|s| (*s).to_string()).collect(),
            generics: Vec::new(),
        })
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::synthetic(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::synthetic(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::synthetic(ExprKind::Call {
            callee: Box::new(callee),
            type_args: Vec::new(),
            args,
        })
    }

    pub fn method_call(receiver: Expr, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::synthetic(ExprKind::MethodCall {
            receiver: Box::new(receiver),
            method: method.into(),
            type_args: Vec::new(),
            args,
        })
    }

    pub fn field(object: Expr, field: impl Into<String>) -> Self {
        Expr::synthetic(ExprKind::Field {
            object: Box::new(object),
            field: field.into(),
        })
    }

    pub fn block(stmts: Vec<Stmt>, expr: Option<Expr>) -> Self {
        Expr::synthetic(ExprKind::Block(BlockExpr::new(stmts, expr)))
    }

    pub fn if_else(condition: Expr, then_branch: Expr, else_branch: Option<Expr>) -> Self {
        Expr::synthetic(ExprKind::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        })
    }

    pub fn closure(params: Vec<ClosureParam>, body: Expr) -> Self {
        Expr::synthetic(ExprKind::Closure {
            params,
            return_type: None,
            body: Box::new(body),
        })
    }
}

// Statements

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// `let pattern: T = init`
    Let {
        pattern: Pattern,
        ty: Option<TypeExpr>,
        init: Option<Expr>,
        span: Span,
    },
    /// `var name: T = init`; always mutable.
    Var {
        name: String,
        ty: Option<TypeExpr>,
        init: Expr,
        span: Span,
    },
    /// `let pattern = init else { ... }`
    LetElse {
        pattern: Pattern,
        ty: Option<TypeExpr>,
        init: Expr,
        else_block: BlockExpr,
        span: Span,
    },
    Expr(Expr),
}

impl Stmt {
    pub fn let_(name: impl Into<String>, init: Expr) -> Self {
        Stmt::Let {
            pattern: Pattern::ident(name),
            ty: None,
            init: Some(init),
            span: Span::DUMMY,
        }
    }
}

// Patterns

#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PatternKind {
    Wildcard,
    Ident {
        name: String,
        is_mut: bool,
        ty: Option<TypeExpr>,
    },
    Literal(Literal),
    Tuple(Vec<Pattern>),
    Struct {
        path: Vec<String>,
        fields: Vec<(String, Pattern)>,
        has_rest: bool,
    },
    /// `Variant`, `Enum::Variant(p, ..)`
    Enum {
        path: Vec<String>,
        payload: Option<Vec<Pattern>>,
    },
    Or(Vec<Pattern>),
    Range {
        start: Option<i64>,
        end: Option<i64>,
        inclusive: bool,
    },
    Array {
        elements: Vec<Pattern>,
        rest: Option<Box<Pattern>>,
    },
}

impl Pattern {
    pub fn new(kind: PatternKind, span: Span) -> Self {
        Pattern { kind, span }
    }

    pub fn wildcard() -> Self {
        Pattern::new(PatternKind::Wildcard, Span::DUMMY)
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Pattern::new(
            PatternKind::Ident {
                name: name.into(),
                is_mut: false,
                ty: None,
            },
            Span::DUMMY,
        )
    }

    pub fn enum_variant(path: &[&str], payload: Option<Vec<Pattern>>) -> Self {
        Pattern::new(
            PatternKind::Enum {
                path: path.iter().map(|s| (*s).to_string()).collect(),
                payload,
            },
            Span::DUMMY,
        )
    }

    /// Names bound by this pattern, in source order.
    pub fn binding_names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_bindings(&mut out);
        out
    }

    fn collect_bindings<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.kind {
            PatternKind::Ident { name, .. } => out.push(name),
            PatternKind::Tuple(elements) => {
                for p in elements {
                    p.collect_bindings(out);
                }
            }
            PatternKind::Struct { fields, .. } => {
                for (_, p) in fields {
                    p.collect_bindings(out);
                }
            }
            PatternKind::Enum { payload, .. } => {
                for p in payload.iter().flatten() {
                    p.collect_bindings(out);
                }
            }
            // Every alternative binds the same names.
            PatternKind::Or(alternatives) => {
                if let Some(first) = alternatives.first() {
                    first.collect_bindings(out);
                }
            }
            PatternKind::Array { elements, rest } => {
                for p in elements {
                    p.collect_bindings(out);
                }
                if let Some(rest) = rest {
                    rest.collect_bindings(out);
                }
            }
            PatternKind::Wildcard | PatternKind::Literal(_) | PatternKind::Range { .. } => {}
        }
    }
}

impl ClosureParam {
    pub fn named(name: impl Into<String>, ty: Option<TypeExpr>) -> Self {
        ClosureParam {
            pattern: Pattern::ident(name),
            ty,
        }
    }
}
