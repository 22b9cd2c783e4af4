use super::*;
use crate::test_helpers::{add_function, module_with};
use pretty_assertions::assert_eq;

#[test]
fn function_queries() {
    let func = add_function("sum", 3);
    assert!(!func.is_declaration());
    assert_eq!(func.instruction_count(), 3);

    let mut puts = LoweredFunction::new("puts");
    puts.flags = FunctionFlags::EXTERN | FunctionFlags::PUBLIC;
    assert!(puts.is_declaration());
    assert_eq!(puts.instruction_count(), 0);
    assert!(puts.flags.contains(FunctionFlags::EXTERN));
}

#[test]
fn find_function_by_name() {
    let module = module_with("app", 3);
    assert_eq!(module.find_function("f1").map(|f| f.name.as_str()), Some("f1"));
    assert!(module.find_function("missing").is_none());
}

#[test]
fn discriminants_are_distinct() {
    let v = Value(0);
    let kinds = [
        InstKind::Unary {
            op: UnaryOp::Neg,
            operand: v,
        },
        InstKind::Load { ptr: v },
        InstKind::Call {
            func_name: "f".to_string(),
            args: vec![v],
        },
        InstKind::Phi {
            incoming: vec![(v, 0)],
        },
        InstKind::Await {
            value: v,
            suspension_id: 1,
        },
        InstKind::ClosureInit {
            func_name: "lambda0".to_string(),
            captures: vec![("x".to_string(), v)],
        },
    ];
    let tags: Vec<u8> = kinds.iter().map(InstKind::discriminant).collect();
    assert_eq!(tags, vec![1, 2, 8, 11, 18, 19]);

    let terminators = [
        Terminator::Return { value: None },
        Terminator::Branch { target: 1 },
        Terminator::CondBranch {
            condition: v,
            if_true: 1,
            if_false: 2,
        },
        Terminator::Switch {
            discriminant: v,
            cases: vec![(0, 1)],
            default: 2,
        },
        Terminator::Unreachable,
    ];
    let tags: Vec<u8> = terminators.iter().map(Terminator::discriminant).collect();
    assert_eq!(tags, vec![0, 1, 2, 3, 4]);
}
