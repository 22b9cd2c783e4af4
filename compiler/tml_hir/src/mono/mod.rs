//! Monomorphization naming.
//!
//! Generic items instantiated with concrete type arguments get a unique,
//! symbol-safe name. The cache is idempotent: asking for the same
//! `(base, args)` pair twice yields the same name and records one instance.
//!
//! # Mangling
//!
//! `base` followed by `_<printable type>` per argument (`?` for an
//! unresolved argument), with `[ ] , space < >` replaced by `_`:
//!
//! ```text
//! map, [I32, Str]      -> map_I32_Str
//! Vec, [Maybe[I32]]    -> Vec_Maybe_I32_
//! ```

use rustc_hash::FxHashMap;

use crate::types::HirType;

/// A requested instantiation.
#[derive(Clone, Debug, PartialEq)]
pub struct MonoInstance {
    pub base_name: String,
    pub type_args: Vec<HirType>,
    pub mangled_name: String,
}

#[derive(Clone, Debug, Default)]
pub struct MonomorphizationCache {
    type_instances: FxHashMap<String, MonoInstance>,
    func_instances: FxHashMap<String, MonoInstance>,
}

impl MonomorphizationCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create_type(&mut self, base_name: &str, type_args: &[HirType]) -> String {
        Self::get_or_create(&mut self.type_instances, base_name, type_args)
    }

    pub fn get_or_create_func(&mut self, base_name: &str, type_args: &[HirType]) -> String {
        Self::get_or_create(&mut self.func_instances, base_name, type_args)
    }

    pub fn has_type(&self, mangled_name: &str) -> bool {
        self.type_instances.contains_key(mangled_name)
    }

    pub fn has_func(&self, mangled_name: &str) -> bool {
        self.func_instances.contains_key(mangled_name)
    }

    /// Function instances sorted by mangled name.
    pub fn func_instances(&self) -> Vec<&MonoInstance> {
        let mut out: Vec<&MonoInstance> = self.func_instances.values().collect();
        out.sort_by(|a, b| a.mangled_name.cmp(&b.mangled_name));
        out
    }

    /// Type instances sorted by mangled name.
    pub fn type_instances(&self) -> Vec<&MonoInstance> {
        let mut out: Vec<&MonoInstance> = self.type_instances.values().collect();
        out.sort_by(|a, b| a.mangled_name.cmp(&b.mangled_name));
        out
    }

    fn get_or_create(
        table: &mut FxHashMap<String, MonoInstance>,
        base_name: &str,
        type_args: &[HirType],
    ) -> String {
        let key = mangle_name(base_name, type_args);
        table
            .entry(key.clone())
            .or_insert_with(|| MonoInstance {
                base_name: base_name.to_string(),
                type_args: type_args.to_vec(),
                mangled_name: key.clone(),
            });
        key
    }
}

/// Symbol-safe name for `base` instantiated with `args`.
pub fn mangle_name(base: &str, args: &[HirType]) -> String {
    if args.is_empty() {
        return base.to_string();
    }
    let mut result = base.to_string();
    for arg in args {
        result.push('_');
        match arg {
            Some(ty) => result.push_str(&ty.to_string()),
            None => result.push('?'),
        }
    }
    result
        .chars()
        .map(|c| match c {
            '[' | ']' | ',' | ' ' | '<' | '>' => '_',
            other => other,
        })
        .collect()
}
