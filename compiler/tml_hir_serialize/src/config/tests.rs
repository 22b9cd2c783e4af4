#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use super::*;
use crate::cache_info::read_hir_cache_info;
use crate::test_helpers::sample_module;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn option_defaults() {
    let options = HirSerializeOptions::default();
    assert!(options.include_spans);
    assert!(options.pretty);

    let options = options.with_spans(false).with_pretty(false);
    assert_eq!(
        options,
        HirSerializeOptions {
            include_spans: false,
            pretty: false,
        }
    );
}

#[test]
fn paths() {
    let config = HirCacheConfig::new("build/cache");
    assert_eq!(
        config.hir_path("app::main"),
        PathBuf::from("build/cache/app.main.thir")
    );
    assert_eq!(
        config.info_path("app::main"),
        PathBuf::from("build/cache/app.main.thir.info")
    );
    assert_eq!(
        config.hir_path("a/b\\c"),
        PathBuf::from("build/cache/a_b_c.thir")
    );

    let config = config.with_extension("hirb");
    assert_eq!(
        config.hir_path("core"),
        PathBuf::from("build/cache/core.hirb")
    );
}

#[test]
fn store_then_load() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("main.tml");
    std::fs::write(&source, "pub func main() -> I64 = 0").unwrap();

    let config = HirCacheConfig::new(dir.path().join("cache"));
    let module = sample_module();
    let path = config.store(&module, &source, Vec::new()).unwrap();
    assert_eq!(path, config.hir_path("app::main"));

    let info = read_hir_cache_info(&config.info_path("app::main")).unwrap();
    assert_eq!(info.module_name, "app::main");
    assert_eq!(info.hir_hash, compute_hir_hash(&module));
    assert_eq!(info.source_hash, compute_source_hash(&source));

    let loaded = config.load_if_valid("app::main", &source).unwrap();
    assert_eq!(loaded, Some(module));
}

#[test]
fn load_misses() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("main.tml");
    let dep = dir.path().join("shapes.tml");
    std::fs::write(&source, "pub func main() -> I64 = 0").unwrap();
    std::fs::write(&dep, "pub type Shape = Empty").unwrap();

    let config = HirCacheConfig::new(dir.path().join("cache"));
    assert_eq!(config.load_if_valid("app::main", &source).unwrap(), None);

    let deps = vec![HirDependency::from_source(
        "app::shapes",
        dep.to_string_lossy(),
    )];
    config.store(&sample_module(), &source, deps).unwrap();
    assert!(config
        .load_if_valid("app::main", &source)
        .unwrap()
        .is_some());

    std::fs::write(&dep, "pub type Shape = Circle(F64)").unwrap();
    assert_eq!(config.load_if_valid("app::main", &source).unwrap(), None);

    std::fs::write(&dep, "pub type Shape = Empty").unwrap();
    std::fs::write(&source, "pub func main() -> I64 = 1").unwrap();
    assert_eq!(config.load_if_valid("app::main", &source).unwrap(), None);
}

#[test]
fn store_without_spans() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("main.tml");
    std::fs::write(&source, "").unwrap();

    let config = HirCacheConfig::new(dir.path()).with_spans(false);
    let path = config.store(&sample_module(), &source, Vec::new()).unwrap();
    let with_spans = crate::files::serialize_hir_binary(
        &sample_module(),
        HirSerializeOptions::default(),
    )
    .unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() < with_spans.len() as u64);
}
