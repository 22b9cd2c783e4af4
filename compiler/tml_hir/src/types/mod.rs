//! Semantic types attached to HIR nodes.
//!
//! Types are immutable once built and shared between nodes through `Arc`.
//! A node whose type could not be resolved carries `None` ([`HirType`]).
//!
//! # Printable Form
//!
//! [`Type`] implements `Display` with the canonical printable spelling used
//! everywhere a type crosses a persistence boundary (mangled names, the
//! binary cache, content hashes):
//!
//! ```text
//! I32   ()   !   Maybe[I32]   ref mut T   *T   [T; 4]   [T]   (A, B)
//! func(A) -> B   Closure[(A) -> B captures: {x: I32}]
//! ```

use std::fmt;
use std::sync::Arc;

/// A possibly unresolved type. `None` means "not yet resolved".
pub type HirType = Option<Arc<Type>>;

/// Built-in scalar kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    F32,
    F64,
    Bool,
    Char,
    Str,
    Unit,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 16] = [
        PrimitiveKind::I8,
        PrimitiveKind::I16,
        PrimitiveKind::I32,
        PrimitiveKind::I64,
        PrimitiveKind::I128,
        PrimitiveKind::U8,
        PrimitiveKind::U16,
        PrimitiveKind::U32,
        PrimitiveKind::U64,
        PrimitiveKind::U128,
        PrimitiveKind::F32,
        PrimitiveKind::F64,
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::Str,
        PrimitiveKind::Unit,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::I8 => "I8",
            PrimitiveKind::I16 => "I16",
            PrimitiveKind::I32 => "I32",
            PrimitiveKind::I64 => "I64",
            PrimitiveKind::I128 => "I128",
            PrimitiveKind::U8 => "U8",
            PrimitiveKind::U16 => "U16",
            PrimitiveKind::U32 => "U32",
            PrimitiveKind::U64 => "U64",
            PrimitiveKind::U128 => "U128",
            PrimitiveKind::F32 => "F32",
            PrimitiveKind::F64 => "F64",
            PrimitiveKind::Bool => "Bool",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::Str => "Str",
            PrimitiveKind::Unit => "()",
        }
    }

    /// Parse a source-level primitive name. `Unit` and `()` both name the
    /// unit type.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "Unit" {
            return Some(PrimitiveKind::Unit);
        }
        PrimitiveKind::ALL.into_iter().find(|k| k.name() == name)
    }

    pub const fn is_signed_int(self) -> bool {
        matches!(
            self,
            PrimitiveKind::I8
                | PrimitiveKind::I16
                | PrimitiveKind::I32
                | PrimitiveKind::I64
                | PrimitiveKind::I128
        )
    }

    pub const fn is_unsigned_int(self) -> bool {
        matches!(
            self,
            PrimitiveKind::U8
                | PrimitiveKind::U16
                | PrimitiveKind::U32
                | PrimitiveKind::U64
                | PrimitiveKind::U128
        )
    }

    pub const fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::F32 | PrimitiveKind::F64)
    }
}

/// A captured variable as recorded in a closure's type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CaptureType {
    pub name: String,
    pub ty: HirType,
    pub is_mut: bool,
}

/// Semantic type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(PrimitiveKind),
    /// User-defined struct, enum or behavior type, possibly generic.
    Named {
        name: String,
        module: String,
        type_args: Vec<Arc<Type>>,
    },
    /// Reference-semantics class type.
    Class {
        name: String,
        type_args: Vec<Arc<Type>>,
    },
    /// Unsubstituted generic parameter.
    Generic(String),
    Ref {
        mutable: bool,
        inner: Arc<Type>,
    },
    Pointer {
        mutable: bool,
        inner: Arc<Type>,
    },
    Array {
        element: Arc<Type>,
        size: u64,
    },
    Slice {
        element: Arc<Type>,
    },
    Tuple(Vec<Arc<Type>>),
    Func {
        params: Vec<Arc<Type>>,
        ret: Arc<Type>,
    },
    Closure {
        params: Vec<HirType>,
        ret: HirType,
        captures: Vec<CaptureType>,
    },
    Never,
}

// Constructors

impl Type {
    pub fn primitive(kind: PrimitiveKind) -> Arc<Type> {
        Arc::new(Type::Primitive(kind))
    }

    pub fn unit() -> Arc<Type> {
        Type::primitive(PrimitiveKind::Unit)
    }

    pub fn bool() -> Arc<Type> {
        Type::primitive(PrimitiveKind::Bool)
    }

    pub fn never() -> Arc<Type> {
        Arc::new(Type::Never)
    }

    pub fn named(name: impl Into<String>, type_args: Vec<Arc<Type>>) -> Arc<Type> {
        Arc::new(Type::Named {
            name: name.into(),
            module: String::new(),
            type_args,
        })
    }

    pub fn class(name: impl Into<String>) -> Arc<Type> {
        Arc::new(Type::Class {
            name: name.into(),
            type_args: Vec::new(),
        })
    }

    pub fn reference(inner: Arc<Type>, mutable: bool) -> Arc<Type> {
        Arc::new(Type::Ref { mutable, inner })
    }

    pub fn array(element: Arc<Type>, size: u64) -> Arc<Type> {
        Arc::new(Type::Array { element, size })
    }

    pub fn slice(element: Arc<Type>) -> Arc<Type> {
        Arc::new(Type::Slice { element })
    }

    pub fn tuple(elements: Vec<Arc<Type>>) -> Arc<Type> {
        Arc::new(Type::Tuple(elements))
    }
}

// Queries

impl Type {
    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Type::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveKind::Unit))
    }

    /// Name of a nominal (Named or Class) type.
    pub fn nominal_name(&self) -> Option<&str> {
        match self {
            Type::Named { name, .. } | Type::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Generic arguments of a nominal type, empty for everything else.
    pub fn type_args(&self) -> &[Arc<Type>] {
        match self {
            Type::Named { type_args, .. } | Type::Class { type_args, .. } => type_args,
            _ => &[],
        }
    }

    /// The type behind any number of references.
    pub fn strip_refs(&self) -> &Type {
        let mut ty = self;
        while let Type::Ref { inner, .. } = ty {
            ty = inner;
        }
        ty
    }

    /// Element type of an array or slice.
    pub fn element_type(&self) -> Option<&Arc<Type>> {
        match self {
            Type::Array { element, .. } | Type::Slice { element } => Some(element),
            _ => None,
        }
    }
}

/// Printable form of a possibly unresolved type.
pub fn type_to_string(ty: &HirType) -> String {
    match ty {
        Some(t) => t.to_string(),
        None => "<null>".to_string(),
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Arc<Type>]) -> fmt::Result {
    if !args.is_empty() {
        f.write_str("[")?;
        write_list(f, args)?;
        f.write_str("]")?;
    }
    Ok(())
}

struct Maybe<'a>(&'a HirType);

impl fmt::Display for Maybe<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&type_to_string(self.0))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(kind) => f.write_str(kind.name()),
            Type::Named {
                name, type_args, ..
            }
            | Type::Class { name, type_args } => {
                f.write_str(name)?;
                write_args(f, type_args)
            }
            Type::Generic(name) => f.write_str(name),
            Type::Ref { mutable, inner } => {
                write!(f, "{}{inner}", if *mutable { "mut ref " } else { "ref " })
            }
            Type::Pointer { mutable, inner } => {
                write!(f, "{}{inner}", if *mutable { "*mut " } else { "*" })
            }
            Type::Array { element, size } => write!(f, "[{element}; {size}]"),
            Type::Slice { element } => write!(f, "[{element}]"),
            Type::Tuple(elements) => {
                f.write_str("(")?;
                write_list(f, elements)?;
                f.write_str(")")
            }
            Type::Func { params, ret } => {
                f.write_str("func(")?;
                write_list(f, params)?;
                write!(f, ") -> {ret}")
            }
            Type::Closure {
                params,
                ret,
                captures,
            } => {
                f.write_str("Closure[(")?;
                let params: Vec<Maybe<'_>> = params.iter().map(Maybe).collect();
                write_list(f, &params)?;
                write!(f, ") -> {}", Maybe(ret))?;
                if !captures.is_empty() {
                    f.write_str(" captures: {")?;
                    for (i, cap) in captures.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}: {}", cap.name, Maybe(&cap.ty))?;
                    }
                    f.write_str("}")?;
                }
                f.write_str("]")
            }
            Type::Never => f.write_str("!"),
        }
    }
}

/// Replace generic parameters named in `params` with the matching `args`.
///
/// Parameters without a matching argument are left as they are.
pub fn substitute(ty: &Arc<Type>, params: &[String], args: &[Arc<Type>]) -> Arc<Type> {
    if params.is_empty() || args.is_empty() {
        return ty.clone();
    }
    let sub = |t: &Arc<Type>| substitute(t, params, args);
    match ty.as_ref() {
        Type::Generic(name) | Type::Named { name, .. }
            if ty.type_args().is_empty() && params.contains(name) =>
        {
            params
                .iter()
                .position(|p| p == name)
                .and_then(|i| args.get(i))
                .cloned()
                .unwrap_or_else(|| ty.clone())
        }
        Type::Named {
            name,
            module,
            type_args,
        } => Arc::new(Type::Named {
            name: name.clone(),
            module: module.clone(),
            type_args: type_args.iter().map(sub).collect(),
        }),
        Type::Class { name, type_args } => Arc::new(Type::Class {
            name: name.clone(),
            type_args: type_args.iter().map(sub).collect(),
        }),
        Type::Ref { mutable, inner } => Type::reference(sub(inner), *mutable),
        Type::Pointer { mutable, inner } => Arc::new(Type::Pointer {
            mutable: *mutable,
            inner: sub(inner),
        }),
        Type::Array { element, size } => Type::array(sub(element), *size),
        Type::Slice { element } => Type::slice(sub(element)),
        Type::Tuple(elements) => Type::tuple(elements.iter().map(sub).collect()),
        Type::Func { params: ps, ret } => Arc::new(Type::Func {
            params: ps.iter().map(sub).collect(),
            ret: sub(ret),
        }),
        Type::Primitive(_) | Type::Generic(_) | Type::Closure { .. } | Type::Never => ty.clone(),
    }
}
