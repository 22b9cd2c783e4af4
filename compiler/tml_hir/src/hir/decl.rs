//! HIR declarations.

use crate::ids::HirId;
use crate::span::Span;
use crate::types::HirType;

use super::expr::Expr;

#[derive(Clone, Debug, PartialEq)]
pub struct HirParam {
    pub name: String,
    pub ty: HirType,
    pub is_mut: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HirFunction {
    pub id: HirId,
    pub name: String,
    pub mangled_name: String,
    pub params: Vec<HirParam>,
    pub return_type: HirType,
    /// `None` for extern declarations.
    pub body: Option<Expr>,
    pub is_public: bool,
    pub is_async: bool,
    pub is_extern: bool,
    pub extern_abi: Option<String>,
    pub attributes: Vec<String>,
    pub span: Span,
}

impl HirFunction {
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HirField {
    pub name: String,
    pub ty: HirType,
    pub is_public: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HirStruct {
    pub id: HirId,
    pub name: String,
    pub mangled_name: String,
    pub fields: Vec<HirField>,
    pub is_public: bool,
    pub span: Span,
}

impl HirStruct {
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HirVariant {
    pub name: String,
    pub index: u32,
    pub payload_types: Vec<HirType>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HirEnum {
    pub id: HirId,
    pub name: String,
    pub mangled_name: String,
    pub variants: Vec<HirVariant>,
    pub is_public: bool,
    pub span: Span,
}

impl HirEnum {
    pub fn variant_index(&self, name: &str) -> Option<u32> {
        self.variants.iter().find(|v| v.name == name).map(|v| v.index)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HirBehaviorMethod {
    pub name: String,
    pub params: Vec<HirParam>,
    pub return_type: HirType,
    pub has_default_impl: bool,
    pub default_body: Option<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HirBehavior {
    pub id: HirId,
    pub name: String,
    pub methods: Vec<HirBehaviorMethod>,
    pub super_behaviors: Vec<String>,
    pub is_public: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HirImpl {
    pub id: HirId,
    /// `None` for inherent impls.
    pub behavior_name: Option<String>,
    pub type_name: String,
    pub self_type: HirType,
    pub methods: Vec<HirFunction>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HirConst {
    pub id: HirId,
    pub name: String,
    pub ty: HirType,
    pub value: Expr,
    pub is_public: bool,
    pub span: Span,
}
