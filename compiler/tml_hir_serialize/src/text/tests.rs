use super::*;
use crate::config::HirSerializeOptions;
use crate::error::HirReadError;
use crate::hash::compute_hir_hash;
use crate::test_helpers::sample_module;
use pretty_assertions::assert_eq;
use tml_hir::HirModule;

fn dump(module: &HirModule, options: HirSerializeOptions) -> String {
    let mut writer = HirTextWriter::new(Vec::new(), options);
    writer.write_module(module);
    String::from_utf8_lossy(&writer.into_inner()).into_owned()
}

#[test]
fn header_and_sections() {
    let module = sample_module();
    let text = dump(&module, HirSerializeOptions::default());
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "; HIR Module: app::main");
    assert_eq!(lines[1], "; Source: src/main.tml");
    assert_eq!(lines[2], format!("; Hash: {}", compute_hir_hash(&module)));

    let order: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|l| l.starts_with("; ") && !l.contains(':'))
        .collect();
    assert_eq!(
        order,
        vec![
            "; Imports",
            "; Structs",
            "; Enums",
            "; Behaviors",
            "; Implementations",
            "; Constants",
            "; Functions",
        ]
    );
}

#[test]
fn declarations() {
    let text = dump(&sample_module(), HirSerializeOptions::default());

    for expected in [
        "use std::io",
        "pub type Point {",
        "  pub x: I32",
        "  y: I32",
        "  Circle(F64) = 0",
        "  Empty = 1",
        "pub behavior Area: Display {",
        "  func area(this: This) -> F64 { ... }",
        "impl Area for Point {",
        "  func area [Point__area](this: Point) -> F64 = 2.0",
        "pub const MAX: I64 = 10",
        "pub func main() -> I64 @entry = {",
        "extern \"c\" func puts(text: Str) -> I32",
        "async func fetch() -> Outcome = 0",
    ] {
        assert!(
            text.lines().any(|l| l == expected),
            "missing line {expected:?} in:\n{text}"
        );
    }
}

#[test]
fn expressions_and_patterns() {
    let text = dump(&sample_module(), HirSerializeOptions::default());

    for expected in [
        "let mut total: I64 = (2 << 3)",
        "let _: <unknown>",
        "print(\"hi \\\"there\\\"\", -total)",
        "(p.scale(7u).x as I64)",
        "([1, 2][0], [false; 4])",
        "Point { x: 1, ..origin }",
        "Shape::Circle(1.5)",
        "'outer: loop while running for item in items if true then break 'outer else continue",
        "lowlevel {",
        "total += 1",
        "total = 0",
        "do(x: I64) [mut total] (x + total)",
        "task.await!",
        "return when shape {",
        "Shape::Circle(r) if (r > 0.5) => 1,",
        "1.. | 'z' => 2,",
        "([_, ..tail], Point { x: mut px, .. }) => 3,",
    ] {
        assert!(
            text.lines().any(|l| l.trim_start() == expected),
            "missing line {expected:?} in:\n{text}"
        );
    }
}

#[test]
fn compact_output_has_no_indentation() {
    let options = HirSerializeOptions::default().with_pretty(false);
    let text = dump(&sample_module(), options);

    assert!(!text.lines().any(|l| l.starts_with(' ')));
    assert!(!text.contains("\n\n"));
    assert!(text.contains("pub x: I32\n"));
}

#[test]
fn text_reader_is_a_stub() {
    let text = dump(&sample_module(), HirSerializeOptions::default());
    let mut reader = HirTextReader::new(&text);
    let module = reader.read_module();

    assert_eq!(module, HirModule::default());
    assert!(reader.has_error());
    assert_eq!(reader.error(), Some(&HirReadError::TextUnsupported));
    assert_eq!(
        HirReadError::TextUnsupported.to_string(),
        "text HIR reading is not implemented"
    );
}
