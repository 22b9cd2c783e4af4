#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use super::*;
use pretty_assertions::assert_eq;
use tml_hir::{Expr, HirParam, LiteralValue, PrimitiveKind, Span, Type};

fn function(name: &str, body: Option<Expr>) -> HirFunction {
    HirFunction {
        id: HirId::new(1),
        name: name.to_string(),
        mangled_name: name.to_string(),
        params: vec![HirParam {
            name: "x".to_string(),
            ty: Some(Type::primitive(PrimitiveKind::I32)),
            is_mut: false,
            span: Span::DUMMY,
        }],
        return_type: Some(Type::primitive(PrimitiveKind::I32)),
        body,
        is_public: true,
        is_async: false,
        is_extern: false,
        extern_abi: None,
        attributes: Vec::new(),
        span: Span::DUMMY,
    }
}

fn int(id: u64, value: i64) -> Expr {
    Expr::Literal {
        id: HirId::new(id),
        value: LiteralValue::Int64(value),
        ty: Some(Type::primitive(PrimitiveKind::I64)),
        span: Span::DUMMY,
    }
}

#[test]
fn fnv1a_reference_values() {
    assert_eq!(hash_bytes(b"").value(), 0xcbf2_9ce4_8422_2325);
    assert_eq!(hash_bytes(b"a").value(), 0xaf63_dc4c_8601_ec8c);
    assert_eq!(hash_bytes(b"foobar").value(), 0x8594_4171_f739_67e8);
}

#[test]
fn hex_round_trip() {
    let hash = ContentHash::new(0x00ab_cdef_0123_4567);
    assert_eq!(hash.to_hex(), "00abcdef01234567");
    assert_eq!(hash.to_string(), "00abcdef01234567");
    assert_eq!(ContentHash::from_hex(&hash.to_hex()), Some(hash));
    assert_eq!(ContentHash::from_hex("not hex"), None);
}

#[test]
fn strings_are_length_prefixed() {
    let mut a = ContentHasher::new();
    a.write_str("ab");
    a.write_str("c");
    let mut b = ContentHasher::new();
    b.write_str("a");
    b.write_str("bc");
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn hir_hash_ignores_bodies() {
    let mut one = HirModule::new("m", "m.tml");
    one.functions.push(function("f", Some(int(2, 1))));
    let mut two = HirModule::new("m", "m.tml");
    two.functions.push(function("f", Some(int(2, 99))));

    assert_eq!(compute_hir_hash(&one), compute_hir_hash(&two));
}

#[test]
fn hir_hash_tracks_signatures() {
    let mut base = HirModule::new("m", "m.tml");
    base.functions.push(function("f", Some(int(2, 1))));
    let base_hash = compute_hir_hash(&base);

    let mut renamed = base.clone();
    renamed.functions[0].name = "g".to_string();
    assert_ne!(compute_hir_hash(&renamed), base_hash);

    let mut retyped = base.clone();
    retyped.functions[0].params[0].ty = None;
    assert_ne!(compute_hir_hash(&retyped), base_hash);

    let mut bodiless = base.clone();
    bodiless.functions[0].body = None;
    assert_ne!(compute_hir_hash(&bodiless), base_hash);

    let mut imported = base.clone();
    imported.imports.push("std::io".to_string());
    assert_ne!(compute_hir_hash(&imported), base_hash);
}

#[test]
fn source_hash_follows_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.tml");

    std::fs::write(&path, "func main() {}").unwrap();
    let first = compute_source_hash(&path);
    assert_eq!(compute_source_hash(&path), first);

    std::fs::write(&path, "func main() { 1 }").unwrap();
    assert_ne!(compute_source_hash(&path), first);
}

#[test]
fn missing_source_hashes_path_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.tml");

    let mut expected = ContentHasher::new();
    expected.write_str(&path.to_string_lossy());
    assert_eq!(compute_source_hash(&path), expected.finish());
}
