#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use super::*;
use crate::test_helpers::module_with;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Emits the names of the functions it was asked to define.
#[derive(Default)]
struct NameListBackend {
    calls: AtomicUsize,
}

impl CodegenBackend for NameListBackend {
    fn generate(
        &self,
        module: &LoweredModule,
        functions: &[usize],
    ) -> Result<Vec<u8>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let names: Vec<&str> = functions
            .iter()
            .map(|&index| {
                module
                    .functions
                    .get(index)
                    .map(|f| f.name.as_str())
                    .ok_or(BackendError::UnknownFunction { index })
            })
            .collect::<Result<_, _>>()?;
        Ok(names.join(",").into_bytes())
    }
}

struct FailingBackend;

impl CodegenBackend for FailingBackend {
    fn generate(&self, _: &LoweredModule, _: &[usize]) -> Result<Vec<u8>, BackendError> {
        Err(BackendError::Codegen("out of registers".to_string()))
    }
}

fn read(unit: &CompiledUnit) -> String {
    String::from_utf8(std::fs::read(&unit.object_path).unwrap()).unwrap()
}

#[test]
fn monolithic() {
    let module = module_with("app", 3);
    let backend = NameListBackend::default();
    let units = compile_partitioned(&backend, &module, &PartitionConfig::new(1)).unwrap();

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].name, "app");
    assert!(!units[0].reused);
    assert_eq!(read(&units[0]), "f0,f1,f2");
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn one_object_per_unit() {
    let module = module_with("app", 20);
    let backend = NameListBackend::default();
    let plan = partition(&module, 4);
    let units = compile_partitioned(&backend, &module, &PartitionConfig::new(4)).unwrap();

    let PartitionPlan::Partitioned(expected) = plan else {
        panic!("expected a partitioned plan");
    };
    assert_eq!(units.len(), expected.len());
    for (unit, cgu) in units.iter().zip(&expected) {
        assert_eq!(unit.name, cgu.name);
        assert_eq!(unit.fingerprint, cgu.fingerprint);
        let names: Vec<String> = cgu
            .functions
            .iter()
            .map(|&i| module.functions[i].name.clone())
            .collect();
        assert_eq!(read(unit), names.join(","));
    }
    assert_eq!(backend.calls.load(Ordering::SeqCst), expected.len());
}

#[test]
fn cache_skips_unchanged_units() {
    let dir = tempfile::tempdir().unwrap();
    let config = PartitionConfig::new(3).with_cache_dir(dir.path());
    let mut module = module_with("app", 9);

    let backend = NameListBackend::default();
    let first = compile_partitioned(&backend, &module, &config).unwrap();
    assert!(first.iter().all(|u| !u.reused));
    let first_calls = backend.calls.load(Ordering::SeqCst);
    assert_eq!(first_calls, first.len());

    let second = compile_partitioned(&backend, &module, &config).unwrap();
    assert!(second.iter().all(|u| u.reused));
    assert_eq!(backend.calls.load(Ordering::SeqCst), first_calls);
    for unit in &second {
        assert!(unit.object_path.starts_with(dir.path()));
    }

    module.functions[0].attributes.push("cold".to_string());
    let third = compile_partitioned(&backend, &module, &config).unwrap();
    assert_eq!(third.iter().filter(|u| !u.reused).count(), 1);
    assert_eq!(backend.calls.load(Ordering::SeqCst), first_calls + 1);
}

#[test]
fn units_swapping_contents_reuse_each_others_objects() {
    let dir = tempfile::tempdir().unwrap();
    let config = PartitionConfig::new(2).with_cache_dir(dir.path());
    let mut module = module_with("app", 2);
    let backend = NameListBackend::default();
    let first = compile_partitioned(&backend, &module, &config).unwrap();
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);

    module.functions.reverse();
    let second = compile_partitioned(&backend, &module, &config).unwrap();

    assert!(second.iter().all(|u| u.reused));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    assert_eq!(second[0].fingerprint, first[1].fingerprint);
    assert_eq!(second[1].fingerprint, first[0].fingerprint);
    assert_eq!(read(&second[0]), "f1");
    assert_eq!(read(&second[1]), "f0");
}

#[test]
fn backend_errors_name_the_unit() {
    let module = module_with("app", 4);
    let err = compile_partitioned(&FailingBackend, &module, &PartitionConfig::new(1)).unwrap_err();

    match &err {
        EmitError::Backend { unit, source } => {
            assert_eq!(unit, "app");
            assert_eq!(*source, BackendError::Codegen("out of registers".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.to_string(), "codegen failed for 'app': out of registers");
}
