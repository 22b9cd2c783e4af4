//! The `.thir` binary format.
//!
//! Node tags follow variant declaration order: expressions 0..=28, patterns
//! 0..=8, statements `Let = 0` / `Expr = 1`. Every node is written as its tag,
//! its id, its fields in declaration order, its type (when it has one) and
//! finally its span (only when the spans flag is set).

mod reader;
mod writer;

pub use reader::HirBinaryReader;
pub use writer::HirBinaryWriter;

use tml_hir::{Expr, LiteralValue, Pattern};

/// Header flag: spans follow every node.
const FLAG_SPANS: u8 = 1;

/// Type encodings. Only the printable form is stored.
const TYPE_NAMED: u8 = 1;
const TYPE_UNKNOWN: u8 = 9;

const STMT_LET: u8 = 0;
const STMT_EXPR: u8 = 1;

/// Highest expression and pattern tags.
const EXPR_TAG_MAX: u8 = 28;
const PATTERN_TAG_MAX: u8 = 8;

/// Deepest expression/pattern nesting the reader accepts.
const MAX_NESTING_DEPTH: usize = 4096;

const LIT_INT64: u8 = 0;
const LIT_UINT64: u8 = 1;
const LIT_FLOAT64: u8 = 2;
const LIT_BOOL: u8 = 3;
const LIT_CHAR: u8 = 4;
const LIT_STRING: u8 = 5;

fn expr_tag(expr: &Expr) -> u8 {
    match expr {
        Expr::Literal { .. } => 0,
        Expr::Var { .. } => 1,
        Expr::Binary { .. } => 2,
        Expr::Unary { .. } => 3,
        Expr::Call { .. } => 4,
        Expr::MethodCall { .. } => 5,
        Expr::Field { .. } => 6,
        Expr::Index { .. } => 7,
        Expr::Tuple { .. } => 8,
        Expr::Array { .. } => 9,
        Expr::ArrayRepeat { .. } => 10,
        Expr::Struct { .. } => 11,
        Expr::Enum { .. } => 12,
        Expr::Block { .. } => 13,
        Expr::If { .. } => 14,
        Expr::When { .. } => 15,
        Expr::Loop { .. } => 16,
        Expr::While { .. } => 17,
        Expr::For { .. } => 18,
        Expr::Return { .. } => 19,
        Expr::Break { .. } => 20,
        Expr::Continue { .. } => 21,
        Expr::Closure { .. } => 22,
        Expr::Cast { .. } => 23,
        Expr::Try { .. } => 24,
        Expr::Await { .. } => 25,
        Expr::Assign { .. } => 26,
        Expr::CompoundAssign { .. } => 27,
        Expr::Lowlevel { .. } => 28,
    }
}

fn pattern_tag(pattern: &Pattern) -> u8 {
    match pattern {
        Pattern::Wildcard { .. } => 0,
        Pattern::Binding { .. } => 1,
        Pattern::Literal { .. } => 2,
        Pattern::Tuple { .. } => 3,
        Pattern::Struct { .. } => 4,
        Pattern::Enum { .. } => 5,
        Pattern::Or { .. } => 6,
        Pattern::Range { .. } => 7,
        Pattern::Array { .. } => 8,
    }
}

fn literal_tag(value: &LiteralValue) -> u8 {
    match value {
        LiteralValue::Int64(_) => LIT_INT64,
        LiteralValue::UInt64(_) => LIT_UINT64,
        LiteralValue::Float64(_) => LIT_FLOAT64,
        LiteralValue::Bool(_) => LIT_BOOL,
        LiteralValue::Char(_) => LIT_CHAR,
        LiteralValue::String(_) => LIT_STRING,
    }
}

#[cfg(test)]
mod tests;
