//! The lowered (post-HIR) module handed to codegen.
//!
//! Functions are basic blocks of instructions in SSA form. Values are
//! numbered per function; blocks are referenced by id.

use bitflags::bitflags;
use tml_hir::{BinOp, UnaryOp};

/// An SSA value produced by an instruction or a parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Value(pub u32);

bitflags! {
    /// Linkage and codegen hints for a lowered function.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FunctionFlags: u32 {
        const PUBLIC = 1 << 0;
        const EXTERN = 1 << 1;
        const ASYNC = 1 << 2;
        const INLINE = 1 << 3;
        const NO_INLINE = 1 << 4;
        /// The program entry point.
        const ENTRY = 1 << 5;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Unit,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InstKind {
    Binary {
        op: BinOp,
        left: Value,
        right: Value,
    },
    Unary {
        op: UnaryOp,
        operand: Value,
    },
    Load {
        ptr: Value,
    },
    Store {
        ptr: Value,
        value: Value,
    },
    Alloca {
        name: String,
        ty: String,
    },
    Gep {
        base: Value,
        indices: Vec<Value>,
    },
    ExtractValue {
        aggregate: Value,
        indices: Vec<u32>,
    },
    InsertValue {
        aggregate: Value,
        value: Value,
        indices: Vec<u32>,
    },
    Call {
        func_name: String,
        args: Vec<Value>,
    },
    MethodCall {
        receiver: Value,
        method_name: String,
        args: Vec<Value>,
    },
    Cast {
        operand: Value,
        target_type: String,
    },
    /// Incoming `(value, predecessor block)` pairs.
    Phi {
        incoming: Vec<(Value, u32)>,
    },
    Constant(Constant),
    Select {
        condition: Value,
        if_true: Value,
        if_false: Value,
    },
    StructInit {
        struct_name: String,
        fields: Vec<Value>,
    },
    EnumInit {
        enum_name: String,
        variant_name: String,
        payload: Vec<Value>,
    },
    TupleInit {
        elements: Vec<Value>,
    },
    ArrayInit {
        element_type: String,
        elements: Vec<Value>,
    },
    Await {
        value: Value,
        suspension_id: u32,
    },
    ClosureInit {
        func_name: String,
        captures: Vec<(String, Value)>,
    },
}

impl InstKind {
    /// Per-variant tag used in fingerprints.
    pub fn discriminant(&self) -> u8 {
        match self {
            InstKind::Binary { .. } => 0,
            InstKind::Unary { .. } => 1,
            InstKind::Load { .. } => 2,
            InstKind::Store { .. } => 3,
            InstKind::Alloca { .. } => 4,
            InstKind::Gep { .. } => 5,
            InstKind::ExtractValue { .. } => 6,
            InstKind::InsertValue { .. } => 7,
            InstKind::Call { .. } => 8,
            InstKind::MethodCall { .. } => 9,
            InstKind::Cast { .. } => 10,
            InstKind::Phi { .. } => 11,
            InstKind::Constant(_) => 12,
            InstKind::Select { .. } => 13,
            InstKind::StructInit { .. } => 14,
            InstKind::EnumInit { .. } => 15,
            InstKind::TupleInit { .. } => 16,
            InstKind::ArrayInit { .. } => 17,
            InstKind::Await { .. } => 18,
            InstKind::ClosureInit { .. } => 19,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    /// `None` for instructions that produce no value, like `Store`.
    pub result: Option<u32>,
    pub kind: InstKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Terminator {
    Return {
        value: Option<Value>,
    },
    Branch {
        target: u32,
    },
    CondBranch {
        condition: Value,
        if_true: u32,
        if_false: u32,
    },
    Switch {
        discriminant: Value,
        cases: Vec<(i64, u32)>,
        default: u32,
    },
    Unreachable,
}

impl Terminator {
    pub fn discriminant(&self) -> u8 {
        match self {
            Terminator::Return { .. } => 0,
            Terminator::Branch { .. } => 1,
            Terminator::CondBranch { .. } => 2,
            Terminator::Switch { .. } => 3,
            Terminator::Unreachable => 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BasicBlock {
    pub id: u32,
    pub instructions: Vec<Instruction>,
    pub terminator: Terminator,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoweredParam {
    pub name: String,
    pub id: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoweredFunction {
    pub name: String,
    pub params: Vec<LoweredParam>,
    pub blocks: Vec<BasicBlock>,
    pub attributes: Vec<String>,
    pub flags: FunctionFlags,
}

impl LoweredFunction {
    pub fn new(name: impl Into<String>) -> Self {
        LoweredFunction {
            name: name.into(),
            params: Vec::new(),
            blocks: Vec::new(),
            attributes: Vec::new(),
            flags: FunctionFlags::empty(),
        }
    }

    /// Extern declarations have no blocks.
    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn instruction_count(&self) -> usize {
        self.blocks.iter().map(|b| b.instructions.len()).sum()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoweredModule {
    pub name: String,
    pub functions: Vec<LoweredFunction>,
}

impl LoweredModule {
    pub fn new(name: impl Into<String>) -> Self {
        LoweredModule {
            name: name.into(),
            functions: Vec::new(),
        }
    }

    pub fn find_function(&self, name: &str) -> Option<&LoweredFunction> {
        self.functions.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests;
