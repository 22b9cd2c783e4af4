use super::*;
use crate::types::{PrimitiveKind, Type};

#[test]
fn inner_binding_shadows_outer() {
    let mut scopes = ScopeStack::new();
    scopes.push();
    scopes.bind("x", Some(Type::primitive(PrimitiveKind::I32)), false);
    scopes.push();
    scopes.bind("x", Some(Type::bool()), true);

    let inner = scopes.lookup("x");
    assert_eq!(inner.map(|b| b.mutable), Some(true));
    assert_eq!(scopes.type_of("x"), Some(Type::bool()));

    scopes.pop();
    assert_eq!(scopes.type_of("x"), Some(Type::primitive(PrimitiveKind::I32)));
}

#[test]
fn with_scope_pops_frame() {
    let mut scopes = ScopeStack::new();
    scopes.push();
    let depth = scopes.with_scope(|s| {
        s.bind("tmp", None, false);
        assert!(s.contains("tmp"));
        s.depth()
    });
    assert_eq!(depth, 2);
    assert_eq!(scopes.depth(), 1);
    assert!(!scopes.contains("tmp"));
}

#[test]
fn bind_on_empty_stack_opens_frame() {
    let mut scopes = ScopeStack::new();
    scopes.bind("y", None, false);
    assert_eq!(scopes.depth(), 1);
    assert!(scopes.contains("y"));
    assert_eq!(scopes.type_of("y"), None);
}
