#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use super::*;
use crate::config::HirSerializeOptions;
use crate::error::HirReadError;
use crate::hash::compute_hir_hash;
use crate::test_helpers::{named, prim, sample_module};
use crate::{HIR_MAGIC, HIR_VERSION_MAJOR, HIR_VERSION_MINOR};
use pretty_assertions::assert_eq;
use tml_hir::types::type_to_string;
use tml_hir::{HirModule, PrimitiveKind, Span, Type};

fn encode(module: &HirModule, include_spans: bool) -> Vec<u8> {
    let options = HirSerializeOptions::default().with_spans(include_spans);
    let mut writer = HirBinaryWriter::new(Vec::new(), options);
    writer.write_module(module).unwrap();
    writer.into_inner()
}

/// Hand-assembled input for malformed-data tests.
struct Raw(Vec<u8>);

impl Raw {
    fn header() -> Self {
        let mut raw = Raw(Vec::new());
        raw.u32(HIR_MAGIC).u16(HIR_VERSION_MAJOR).u16(HIR_VERSION_MINOR).u64(42).u8(0);
        raw
    }

    fn u8(&mut self, v: u8) -> &mut Self {
        self.0.push(v);
        self
    }

    fn u16(&mut self, v: u16) -> &mut Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn u32(&mut self, v: u32) -> &mut Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn u64(&mut self, v: u64) -> &mut Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn str(&mut self, s: &str) -> &mut Self {
        self.u32(u32::try_from(s.len()).unwrap());
        self.0.extend_from_slice(s.as_bytes());
        self
    }

    /// Module `m` with no declarations before the function list, then one
    /// function header `f()` whose return type and body follow.
    fn module_with_function() -> Self {
        let mut raw = Raw::header();
        raw.str("m").str("m.tml");
        raw.u32(0).u32(0).u32(0).u32(0); // structs, enums, behaviors, impls
        raw.u32(1).u64(1).str("f").str("f").u32(0); // one function, no params
        raw
    }
}

fn decode(bytes: &[u8]) -> (HirModule, Option<HirReadError>) {
    let mut reader = HirBinaryReader::new(bytes);
    let module = reader.read_module();
    assert_eq!(reader.has_error(), reader.error().is_some());
    (module, reader.error().cloned())
}

#[test]
fn round_trip_with_spans_is_lossless() {
    let module = sample_module();
    let (decoded, error) = decode(&encode(&module, true));

    assert_eq!(error, None);
    assert_eq!(decoded, module);
}

#[test]
fn round_trip_without_spans() {
    let module = sample_module();
    let (decoded, error) = decode(&encode(&module, false));

    assert_eq!(error, None);
    assert_eq!(decoded.name, module.name);
    assert_eq!(decoded.functions.len(), module.functions.len());
    assert_eq!(decoded.impls[0].methods.len(), 1);
    assert_eq!(decoded.functions[0].span, Span::DUMMY);
    assert_eq!(compute_hir_hash(&decoded), compute_hir_hash(&module));
}

#[test]
fn header_layout() {
    let module = sample_module();
    let bytes = encode(&module, true);

    assert_eq!(&bytes[0..4], b"THIR");
    assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), 1);
    assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 0);
    let hash = u64::from_le_bytes(bytes[8..16].try_into().unwrap());
    assert_eq!(hash, compute_hir_hash(&module).value());
    assert_eq!(bytes[16], FLAG_SPANS);
    assert_eq!(encode(&module, false)[16], 0);

    let mut reader = HirBinaryReader::new(&bytes);
    reader.read_module();
    assert_eq!(reader.content_hash(), compute_hir_hash(&module));
}

#[test]
fn generic_types_persist_as_strings() {
    let mut g = crate::test_helpers::Gen::new();
    let mut module = HirModule::new("m", "m.tml");
    let maybe = Some(Type::named("Maybe", vec![Type::primitive(PrimitiveKind::I32)]));
    let reference = Some(Type::reference(Type::primitive(PrimitiveKind::Str), true));
    let body = g.var("x", maybe.clone());
    module.functions.push(g.function(
        "f",
        vec![g.param("x", maybe)],
        reference.clone(),
        Some(body),
    ));

    let (decoded, _) = decode(&encode(&module, false));
    let f = &decoded.functions[0];
    assert_eq!(type_to_string(&f.params[0].ty), "Maybe[I32]");
    assert_eq!(type_to_string(&f.return_type), type_to_string(&reference));
    assert_eq!(f.params[0].ty, named("Maybe[I32]"));

    let (decoded, _) = decode(&encode(&sample_module(), false));
    assert_eq!(decoded.structs[0].fields[0].ty, prim(PrimitiveKind::I32));
}

#[test]
fn bad_magic_yields_empty_module() {
    let mut bytes = encode(&sample_module(), true);
    bytes[0] = b'X';
    let (module, error) = decode(&bytes);

    assert_eq!(module, HirModule::default());
    assert_eq!(error, Some(HirReadError::InvalidMagic));
    assert_eq!(error.unwrap().to_string(), "Invalid HIR file magic number");
}

#[test]
fn version_checks() {
    let mut bytes = encode(&sample_module(), true);
    bytes[4..6].copy_from_slice(&2u16.to_le_bytes());
    let (module, error) = decode(&bytes);
    assert!(module.is_empty());
    assert_eq!(
        error.unwrap().to_string(),
        "Incompatible HIR version: 2.0"
    );

    let mut bytes = encode(&sample_module(), true);
    bytes[6..8].copy_from_slice(&7u16.to_le_bytes());
    let (module, error) = decode(&bytes);
    assert_eq!(error, None);
    assert_eq!(module, sample_module());
}

#[test]
fn truncation_keeps_leading_declarations() {
    let bytes = encode(&sample_module(), true);
    let (module, error) = decode(&bytes[..bytes.len() / 2]);

    assert!(matches!(error, Some(HirReadError::Truncated { .. })));
    assert_eq!(module.name, "app::main");
    assert_eq!(module.structs.len(), 1);
    assert!(module.constants.is_empty());

    let (module, error) = decode(&bytes[..10]);
    assert!(matches!(error, Some(HirReadError::Truncated { .. })));
    assert!(module.is_empty());
}

#[test]
fn unknown_expression_tag_stops_reading() {
    let mut raw = Raw::module_with_function();
    raw.u8(TYPE_UNKNOWN).u8(1).u8(99);
    let (module, error) = decode(&raw.0);

    assert_eq!(
        error,
        Some(HirReadError::UnknownTag {
            kind: "expression",
            tag: 99
        })
    );
    assert_eq!(module.name, "m");
    assert!(module.functions.is_empty());
}

#[test]
fn unknown_type_tag() {
    let mut raw = Raw::module_with_function();
    raw.u8(4);
    let (_, error) = decode(&raw.0);

    assert_eq!(error, Some(HirReadError::UnknownTag { kind: "type", tag: 4 }));
}

#[test]
fn hand_built_function_decodes() {
    let mut raw = Raw::module_with_function();
    raw.u8(TYPE_NAMED).str("I64"); // return type
    raw.u8(1).u8(0).u64(2).u8(LIT_INT64).u64(5).u8(TYPE_NAMED).str("I64"); // body: literal 5
    raw.u8(1).u8(0).u8(0).u8(0); // is_public, is_async, is_extern, no abi
    raw.u32(0); // attributes
    raw.u32(0).u32(0); // constants, imports
    let (module, error) = decode(&raw.0);

    assert_eq!(error, None);
    let f = &module.functions[0];
    assert!(f.is_public);
    assert_eq!(f.return_type, prim(PrimitiveKind::I64));
    assert_eq!(
        f.body.as_ref().and_then(|b| b.literal()),
        Some(&tml_hir::LiteralValue::Int64(5))
    );
}

#[test]
fn unknown_pattern_tag_at_end_of_data() {
    let mut raw = Raw::module_with_function();
    raw.u8(TYPE_UNKNOWN).u8(1); // return type, body present
    raw.u8(13).u64(2).u32(1); // block with one statement
    raw.u8(STMT_LET).u64(3).u8(42); // let with a bogus pattern tag, nothing after
    let (module, error) = decode(&raw.0);

    assert_eq!(
        error,
        Some(HirReadError::UnknownTag {
            kind: "pattern",
            tag: 42
        })
    );
    assert!(module.functions.is_empty());
}

/// Function `f` whose body is `depth` nested negations of the literal 1.
fn nested_negations(depth: u64) -> Vec<u8> {
    let mut raw = Raw::module_with_function();
    raw.u8(TYPE_UNKNOWN).u8(1);
    for id in 0..depth {
        raw.u8(3).u64(id + 2).u8(0);
    }
    raw.u8(0).u64(1).u8(LIT_INT64).u64(1).u8(TYPE_UNKNOWN);
    for _ in 0..depth {
        raw.u8(TYPE_UNKNOWN);
    }
    raw.u8(0).u8(0).u8(0).u8(0).u32(0); // flags, no abi, no attributes
    raw.u32(0).u32(0); // constants, imports
    raw.0
}

#[test]
fn runaway_nesting_is_an_error_not_a_crash() {
    let (module, error) = decode(&nested_negations(30_000));

    assert_eq!(
        error,
        Some(HirReadError::TooDeep {
            limit: MAX_NESTING_DEPTH
        })
    );
    assert_eq!(module.name, "m");
    assert!(module.functions.is_empty());
}

#[test]
fn deep_nesting_within_limit_decodes() {
    let depth = MAX_NESTING_DEPTH as u64 - 1;
    let (module, error) = decode(&nested_negations(depth));

    assert_eq!(error, None);
    let mut levels = 0;
    let mut expr = module.functions[0].body.as_ref().unwrap();
    while let tml_hir::Expr::Unary { operand, .. } = expr {
        levels += 1;
        expr = &**operand;
    }
    assert_eq!(levels, depth);
    assert_eq!(expr.literal(), Some(&tml_hir::LiteralValue::Int64(1)));
}
