//! HIR expressions.

use crate::ids::HirId;
use crate::span::Span;
use crate::types::{HirType, Type};

use super::ops::{BinOp, CompoundOp, UnaryOp};
use super::pattern::Pattern;
use super::stmt::Stmt;

/// A literal constant.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Bool(bool),
    Char(char),
    String(String),
}

impl LiteralValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LiteralValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Int64(v) => write!(f, "{v}"),
            LiteralValue::UInt64(v) => write!(f, "{v}u"),
            LiteralValue::Float64(v) => write!(f, "{v:?}"),
            LiteralValue::Bool(v) => write!(f, "{v}"),
            LiteralValue::Char(c) => write!(f, "{c:?}"),
            LiteralValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// A variable captured by a closure.
#[derive(Clone, Debug, PartialEq)]
pub struct HirCapture {
    pub name: String,
    pub ty: HirType,
    pub is_mut: bool,
    pub by_move: bool,
}

/// One arm of a `when` expression.
#[derive(Clone, Debug, PartialEq)]
pub struct WhenArm {
    pub pattern: Pattern,
    pub guard: Option<Box<Expr>>,
    pub body: Box<Expr>,
    pub span: Span,
}

/// HIR expression. Every variant carries an id and a span.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal {
        id: HirId,
        value: LiteralValue,
        ty: HirType,
        span: Span,
    },
    Var {
        id: HirId,
        name: String,
        ty: HirType,
        span: Span,
    },
    Binary {
        id: HirId,
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        ty: HirType,
        span: Span,
    },
    Unary {
        id: HirId,
        op: UnaryOp,
        operand: Box<Expr>,
        ty: HirType,
        span: Span,
    },
    Call {
        id: HirId,
        func_name: String,
        type_args: Vec<HirType>,
        args: Vec<Expr>,
        ty: HirType,
        span: Span,
    },
    MethodCall {
        id: HirId,
        receiver: Box<Expr>,
        method_name: String,
        type_args: Vec<HirType>,
        args: Vec<Expr>,
        receiver_type: HirType,
        ty: HirType,
        span: Span,
    },
    Field {
        id: HirId,
        object: Box<Expr>,
        field_name: String,
        /// Declaration index, or -1 when the struct is not in this module.
        field_index: i32,
        ty: HirType,
        span: Span,
    },
    Index {
        id: HirId,
        object: Box<Expr>,
        index: Box<Expr>,
        ty: HirType,
        span: Span,
    },
    Tuple {
        id: HirId,
        elements: Vec<Expr>,
        ty: HirType,
        span: Span,
    },
    Array {
        id: HirId,
        elements: Vec<Expr>,
        element_type: HirType,
        size: u64,
        ty: HirType,
        span: Span,
    },
    ArrayRepeat {
        id: HirId,
        value: Box<Expr>,
        count: u64,
        ty: HirType,
        span: Span,
    },
    Struct {
        id: HirId,
        struct_name: String,
        type_args: Vec<HirType>,
        fields: Vec<(String, Expr)>,
        base: Option<Box<Expr>>,
        ty: HirType,
        span: Span,
    },
    Enum {
        id: HirId,
        enum_name: String,
        variant_name: String,
        /// Declaration index, or -1 when the enum is not in this module.
        variant_index: i32,
        type_args: Vec<HirType>,
        payload: Vec<Expr>,
        ty: HirType,
        span: Span,
    },
    Block {
        id: HirId,
        stmts: Vec<Stmt>,
        expr: Option<Box<Expr>>,
        ty: HirType,
        span: Span,
    },
    If {
        id: HirId,
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
        ty: HirType,
        span: Span,
    },
    When {
        id: HirId,
        scrutinee: Box<Expr>,
        arms: Vec<WhenArm>,
        ty: HirType,
        span: Span,
    },
    Loop {
        id: HirId,
        label: Option<String>,
        body: Box<Expr>,
        ty: HirType,
        span: Span,
    },
    While {
        id: HirId,
        label: Option<String>,
        condition: Box<Expr>,
        body: Box<Expr>,
        ty: HirType,
        span: Span,
    },
    For {
        id: HirId,
        label: Option<String>,
        pattern: Pattern,
        iter: Box<Expr>,
        body: Box<Expr>,
        ty: HirType,
        span: Span,
    },
    Return {
        id: HirId,
        value: Option<Box<Expr>>,
        span: Span,
    },
    Break {
        id: HirId,
        label: Option<String>,
        value: Option<Box<Expr>>,
        span: Span,
    },
    Continue {
        id: HirId,
        label: Option<String>,
        span: Span,
    },
    Closure {
        id: HirId,
        params: Vec<(String, HirType)>,
        body: Box<Expr>,
        captures: Vec<HirCapture>,
        ty: HirType,
        span: Span,
    },
    Cast {
        id: HirId,
        expr: Box<Expr>,
        target_type: HirType,
        ty: HirType,
        span: Span,
    },
    Try {
        id: HirId,
        expr: Box<Expr>,
        ty: HirType,
        span: Span,
    },
    Await {
        id: HirId,
        expr: Box<Expr>,
        ty: HirType,
        span: Span,
    },
    Assign {
        id: HirId,
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },
    CompoundAssign {
        id: HirId,
        op: CompoundOp,
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },
    Lowlevel {
        id: HirId,
        stmts: Vec<Stmt>,
        expr: Option<Box<Expr>>,
        ty: HirType,
        span: Span,
    },
}

impl Expr {
    pub fn id(&self) -> HirId {
        match self {
            Expr::Literal { id, .. }
            | Expr::Var { id, .. }
            | Expr::Binary { id, .. }
            | Expr::Unary { id, .. }
            | Expr::Call { id, .. }
            | Expr::MethodCall { id, .. }
            | Expr::Field { id, .. }
            | Expr::Index { id, .. }
            | Expr::Tuple { id, .. }
            | Expr::Array { id, .. }
            | Expr::ArrayRepeat { id, .. }
            | Expr::Struct { id, .. }
            | Expr::Enum { id, .. }
            | Expr::Block { id, .. }
            | Expr::If { id, .. }
            | Expr::When { id, .. }
            | Expr::Loop { id, .. }
            | Expr::While { id, .. }
            | Expr::For { id, .. }
            | Expr::Return { id, .. }
            | Expr::Break { id, .. }
            | Expr::Continue { id, .. }
            | Expr::Closure { id, .. }
            | Expr::Cast { id, .. }
            | Expr::Try { id, .. }
            | Expr::Await { id, .. }
            | Expr::Assign { id, .. }
            | Expr::CompoundAssign { id, .. }
            | Expr::Lowlevel { id, .. } => *id,
        }
    }

    pub fn set_id(&mut self, new_id: HirId) {
        match self {
            Expr::Literal { id, .. }
            | Expr::Var { id, .. }
            | Expr::Binary { id, .. }
            | Expr::Unary { id, .. }
            | Expr::Call { id, .. }
            | Expr::MethodCall { id, .. }
            | Expr::Field { id, .. }
            | Expr::Index { id, .. }
            | Expr::Tuple { id, .. }
            | Expr::Array { id, .. }
            | Expr::ArrayRepeat { id, .. }
            | Expr::Struct { id, .. }
            | Expr::Enum { id, .. }
            | Expr::Block { id, .. }
            | Expr::If { id, .. }
            | Expr::When { id, .. }
            | Expr::Loop { id, .. }
            | Expr::While { id, .. }
            | Expr::For { id, .. }
            | Expr::Return { id, .. }
            | Expr::Break { id, .. }
            | Expr::Continue { id, .. }
            | Expr::Closure { id, .. }
            | Expr::Cast { id, .. }
            | Expr::Try { id, .. }
            | Expr::Await { id, .. }
            | Expr::Assign { id, .. }
            | Expr::CompoundAssign { id, .. }
            | Expr::Lowlevel { id, .. } => *id = new_id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Expr::Literal { span, .. }
            | Expr::Var { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Call { span, .. }
            | Expr::MethodCall { span, .. }
            | Expr::Field { span, .. }
            | Expr::Index { span, .. }
            | Expr::Tuple { span, .. }
            | Expr::Array { span, .. }
            | Expr::ArrayRepeat { span, .. }
            | Expr::Struct { span, .. }
            | Expr::Enum { span, .. }
            | Expr::Block { span, .. }
            | Expr::If { span, .. }
            | Expr::When { span, .. }
            | Expr::Loop { span, .. }
            | Expr::While { span, .. }
            | Expr::For { span, .. }
            | Expr::Return { span, .. }
            | Expr::Break { span, .. }
            | Expr::Continue { span, .. }
            | Expr::Closure { span, .. }
            | Expr::Cast { span, .. }
            | Expr::Try { span, .. }
            | Expr::Await { span, .. }
            | Expr::Assign { span, .. }
            | Expr::CompoundAssign { span, .. }
            | Expr::Lowlevel { span, .. } => *span,
        }
    }

    /// The expression's type. Control transfers are `!`, assignments `()`.
    pub fn ty(&self) -> HirType {
        match self {
            Expr::Return { .. } | Expr::Break { .. } | Expr::Continue { .. } => {
                Some(Type::never())
            }
            Expr::Assign { .. } | Expr::CompoundAssign { .. } => Some(Type::unit()),
            Expr::Literal { ty, .. }
            | Expr::Var { ty, .. }
            | Expr::Binary { ty, .. }
            | Expr::Unary { ty, .. }
            | Expr::Call { ty, .. }
            | Expr::MethodCall { ty, .. }
            | Expr::Field { ty, .. }
            | Expr::Index { ty, .. }
            | Expr::Tuple { ty, .. }
            | Expr::Array { ty, .. }
            | Expr::ArrayRepeat { ty, .. }
            | Expr::Struct { ty, .. }
            | Expr::Enum { ty, .. }
            | Expr::Block { ty, .. }
            | Expr::If { ty, .. }
            | Expr::When { ty, .. }
            | Expr::Loop { ty, .. }
            | Expr::While { ty, .. }
            | Expr::For { ty, .. }
            | Expr::Closure { ty, .. }
            | Expr::Cast { ty, .. }
            | Expr::Try { ty, .. }
            | Expr::Await { ty, .. }
            | Expr::Lowlevel { ty, .. } => ty.clone(),
        }
    }

    /// Variant name, used by dumps and diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Literal { .. } => "Literal",
            Expr::Var { .. } => "Var",
            Expr::Binary { .. } => "Binary",
            Expr::Unary { .. } => "Unary",
            Expr::Call { .. } => "Call",
            Expr::MethodCall { .. } => "MethodCall",
            Expr::Field { .. } => "Field",
            Expr::Index { .. } => "Index",
            Expr::Tuple { .. } => "Tuple",
            Expr::Array { .. } => "Array",
            Expr::ArrayRepeat { .. } => "ArrayRepeat",
            Expr::Struct { .. } => "Struct",
            Expr::Enum { .. } => "Enum",
            Expr::Block { .. } => "Block",
            Expr::If { .. } => "If",
            Expr::When { .. } => "When",
            Expr::Loop { .. } => "Loop",
            Expr::While { .. } => "While",
            Expr::For { .. } => "For",
            Expr::Return { .. } => "Return",
            Expr::Break { .. } => "Break",
            Expr::Continue { .. } => "Continue",
            Expr::Closure { .. } => "Closure",
            Expr::Cast { .. } => "Cast",
            Expr::Try { .. } => "Try",
            Expr::Await { .. } => "Await",
            Expr::Assign { .. } => "Assign",
            Expr::CompoundAssign { .. } => "CompoundAssign",
            Expr::Lowlevel { .. } => "Lowlevel",
        }
    }

    pub fn literal(&self) -> Option<&LiteralValue> {
        match self {
            Expr::Literal { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Expr::Literal { .. })
    }

    /// A typeless placeholder used while a node is being replaced in place.
    pub fn placeholder() -> Expr {
        Expr::Literal {
            id: HirId::INVALID,
            value: LiteralValue::Int64(0),
            ty: None,
            span: Span::DUMMY,
        }
    }
}
