//! Type environment consulted during lowering.
//!
//! The builder never infers types. It asks a [`TypeEnv`] for the signatures
//! produced by the type checker: struct layouts, enum variants, class
//! hierarchies and function signatures. [`TypeTable`] is an in-memory
//! implementation used by tests and by embedders without a full checker.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::types::Type;

/// A struct definition as known to the type checker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructDef {
    pub name: String,
    pub type_params: Vec<String>,
    pub fields: Vec<(String, Arc<Type>)>,
}

impl StructDef {
    pub fn field_type(&self, field: &str) -> Option<&Arc<Type>> {
        self.fields.iter().find(|(n, _)| n == field).map(|(_, t)| t)
    }
}

/// An enum definition as known to the type checker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    pub type_params: Vec<String>,
    /// Variants in declaration order with their payload types.
    pub variants: Vec<(String, Vec<Arc<Type>>)>,
}

impl EnumDef {
    pub fn variant_payload(&self, variant: &str) -> Option<&[Arc<Type>]> {
        self.variants
            .iter()
            .find(|(n, _)| n == variant)
            .map(|(_, p)| p.as_slice())
    }
}

/// A free function or method signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncSig {
    pub name: String,
    pub type_params: Vec<String>,
    pub params: Vec<Arc<Type>>,
    pub return_type: Arc<Type>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassField {
    pub name: String,
    pub ty: Arc<Type>,
    pub is_static: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassMethod {
    pub sig: FuncSig,
    pub is_static: bool,
}

/// A class definition with an optional single base class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDef {
    pub name: String,
    pub base_class: Option<String>,
    pub fields: Vec<ClassField>,
    pub methods: Vec<ClassMethod>,
}

impl ClassDef {
    pub fn method(&self, name: &str, is_static: bool) -> Option<&FuncSig> {
        self.methods
            .iter()
            .find(|m| m.sig.name == name && m.is_static == is_static)
            .map(|m| &m.sig)
    }
}

/// Read-only view of checked declarations.
pub trait TypeEnv {
    fn lookup_struct(&self, name: &str) -> Option<&StructDef>;
    fn lookup_enum(&self, name: &str) -> Option<&EnumDef>;
    fn lookup_class(&self, name: &str) -> Option<&ClassDef>;
    /// Free functions and `Type::method` qualified methods.
    fn lookup_func(&self, name: &str) -> Option<&FuncSig>;

    /// Field type on a class, searching up the base-class chain.
    fn lookup_class_field(&self, class: &str, field: &str) -> Option<Arc<Type>> {
        let mut current = self.lookup_class(class);
        // Bounded walk so that a malformed cyclic hierarchy cannot hang lowering.
        for _ in 0..64 {
            let def = current?;
            if let Some(f) = def.fields.iter().find(|f| f.name == field) {
                return Some(f.ty.clone());
            }
            current = def
                .base_class
                .as_deref()
                .and_then(|base| self.lookup_class(base));
        }
        None
    }
}

/// Hash-map backed [`TypeEnv`].
#[derive(Clone, Debug, Default)]
pub struct TypeTable {
    structs: FxHashMap<String, StructDef>,
    enums: FxHashMap<String, EnumDef>,
    classes: FxHashMap<String, ClassDef>,
    funcs: FxHashMap<String, FuncSig>,
}

impl TypeTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_struct(&mut self, def: StructDef) {
        self.structs.insert(def.name.clone(), def);
    }

    pub fn add_enum(&mut self, def: EnumDef) {
        self.enums.insert(def.name.clone(), def);
    }

    pub fn add_class(&mut self, def: ClassDef) {
        self.classes.insert(def.name.clone(), def);
    }

    pub fn add_func(&mut self, sig: FuncSig) {
        self.funcs.insert(sig.name.clone(), sig);
    }

    #[must_use]
    pub fn with_struct(mut self, def: StructDef) -> Self {
        self.add_struct(def);
        self
    }

    #[must_use]
    pub fn with_enum(mut self, def: EnumDef) -> Self {
        self.add_enum(def);
        self
    }

    #[must_use]
    pub fn with_class(mut self, def: ClassDef) -> Self {
        self.add_class(def);
        self
    }

    #[must_use]
    pub fn with_func(mut self, sig: FuncSig) -> Self {
        self.add_func(sig);
        self
    }
}

impl TypeEnv for TypeTable {
    fn lookup_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs.get(name)
    }

    fn lookup_enum(&self, name: &str) -> Option<&EnumDef> {
        self.enums.get(name)
    }

    fn lookup_class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    fn lookup_func(&self, name: &str) -> Option<&FuncSig> {
        self.funcs.get(name)
    }
}
