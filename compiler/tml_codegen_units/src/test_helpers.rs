//! Small lowered modules for tests.

use tml_hir::BinOp;

use crate::lowered::{
    BasicBlock, Constant, FunctionFlags, InstKind, Instruction, LoweredFunction, LoweredModule,
    LoweredParam, Terminator, Value,
};

/// `fn <name>(a, b) = a + b + <seed>`, one block.
pub(crate) fn add_function(name: &str, seed: i64) -> LoweredFunction {
    let mut func = LoweredFunction::new(name);
    func.params = vec![
        LoweredParam {
            name: "a".to_string(),
            id: 0,
        },
        LoweredParam {
            name: "b".to_string(),
            id: 1,
        },
    ];
    func.blocks = vec![BasicBlock {
        id: 0,
        instructions: vec![
            Instruction {
                result: Some(2),
                kind: InstKind::Binary {
                    op: BinOp::Add,
                    left: Value(0),
                    right: Value(1),
                },
            },
            Instruction {
                result: Some(3),
                kind: InstKind::Constant(Constant::Int(seed)),
            },
            Instruction {
                result: Some(4),
                kind: InstKind::Binary {
                    op: BinOp::Add,
                    left: Value(2),
                    right: Value(3),
                },
            },
        ],
        terminator: Terminator::Return {
            value: Some(Value(4)),
        },
    }];
    func.flags = FunctionFlags::PUBLIC;
    func
}

/// A module with `count` functions named `f0`, `f1`, ...
pub(crate) fn module_with(name: &str, count: usize) -> LoweredModule {
    let mut module = LoweredModule::new(name);
    module.functions = (0..count)
        .map(|i| add_function(&format!("f{i}"), i64::try_from(i).unwrap_or(i64::MAX)))
        .collect();
    module
}
