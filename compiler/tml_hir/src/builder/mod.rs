//! AST to HIR lowering.
//!
//! [`HirBuilder`] turns a parsed [`ast::Module`] into a [`HirModule`]:
//! sugar is removed, every node gets a fresh [`HirId`], and types are
//! propagated from the [`TypeEnv`] and from local bindings.
//!
//! # Design
//!
//! - One builder per module. The builder owns its id generator, scope stack
//!   and monomorphization cache, so builders for different modules can run
//!   in parallel without sharing state.
//! - Lowering never fails. Unknown names become the unit type, unknown
//!   fields and variants get index -1, unsupported input becomes a unit
//!   literal `0`.
//! - Type declarations (structs, enums) are lowered before everything else
//!   so that field and variant indices resolve regardless of source order.
//!   Each declaration list still keeps source order.
//!
//! # Layout
//!
//! - `types`: `resolve_type`
//! - `expr`: expression lowering and desugaring
//! - `stmt`: blocks, `let`, `var`, let-else
//! - `pattern`: pattern lowering and binding registration
//! - `captures`: free-variable analysis for closures

mod captures;
mod expr;
mod pattern;
mod stmt;
mod types;

use tracing::debug;

use crate::ast;
use crate::env::TypeEnv;
use crate::hir::{
    HirBehavior, HirBehaviorMethod, HirConst, HirEnum, HirField, HirFunction, HirImpl, HirModule,
    HirParam, HirStruct, HirVariant,
};
use crate::ids::{HirId, HirIdGenerator};
use crate::mono::MonomorphizationCache;
use crate::scope::ScopeStack;
use crate::types::{HirType, Type};

/// A generic call site waiting to be instantiated.
#[derive(Clone, Debug)]
struct MonoRequest {
    func_name: String,
    type_args: Vec<HirType>,
}

pub struct HirBuilder<'env, E: TypeEnv + ?Sized> {
    env: &'env E,
    ids: HirIdGenerator,
    scopes: ScopeStack,
    mono: MonomorphizationCache,
    pending_mono: Vec<MonoRequest>,
    /// Module under construction; consulted for struct and enum indices.
    module: HirModule,
    /// `This`/`Self` inside an impl block.
    self_type: HirType,
    /// Generic parameters of the item being lowered.
    generic_params: Vec<String>,
}

impl<'env, E: TypeEnv + ?Sized> HirBuilder<'env, E> {
    pub fn new(env: &'env E) -> Self {
        HirBuilder {
            env,
            ids: HirIdGenerator::new(),
            scopes: ScopeStack::new(),
            mono: MonomorphizationCache::new(),
            pending_mono: Vec::new(),
            module: HirModule::default(),
            self_type: None,
            generic_params: Vec::new(),
        }
    }

    pub fn mono_cache(&self) -> &MonomorphizationCache {
        &self.mono
    }

    /// Scope stack used for local bindings, exposed for lowering single
    /// expressions outside a module.
    pub fn scopes_mut(&mut self) -> &mut ScopeStack {
        &mut self.scopes
    }

    fn fresh_id(&mut self) -> HirId {
        self.ids.next_id()
    }

    /// Lowers a whole module.
    pub fn lower_module(&mut self, module: &ast::Module) -> HirModule {
        debug!(module = %module.name, decls = module.decls.len(), "lowering module");
        self.module = HirModule::new(module.name.clone(), module.source_path.clone());

        for decl in &module.decls {
            match decl {
                ast::Decl::Struct(s) => {
                    let lowered = self.lower_struct(s);
                    self.module.structs.push(lowered);
                }
                ast::Decl::Enum(e) => {
                    let lowered = self.lower_enum(e);
                    self.module.enums.push(lowered);
                }
                _ => {}
            }
        }

        for decl in &module.decls {
            match decl {
                ast::Decl::Func(f) => {
                    let lowered = self.lower_function(f);
                    self.module.functions.push(lowered);
                }
                ast::Decl::Behavior(b) => {
                    let lowered = self.lower_behavior(b);
                    self.module.behaviors.push(lowered);
                }
                ast::Decl::Impl(i) => {
                    let lowered = self.lower_impl(i);
                    self.module.impls.push(lowered);
                }
                ast::Decl::Const(c) => {
                    let lowered = self.lower_const(c);
                    self.module.constants.push(lowered);
                }
                ast::Decl::Use(u) => self.module.imports.push(u.path.join("::")),
                ast::Decl::Struct(_) | ast::Decl::Enum(_) => {}
            }
        }

        self.process_mono_requests();

        let out = std::mem::take(&mut self.module);
        debug!(
            module = %out.name,
            functions = out.functions.len(),
            structs = out.structs.len(),
            enums = out.enums.len(),
            impls = out.impls.len(),
            "lowered module"
        );
        out
    }

    fn queue_mono(&mut self, func_name: &str, type_args: &[HirType]) {
        self.pending_mono.push(MonoRequest {
            func_name: func_name.to_string(),
            type_args: type_args.to_vec(),
        });
    }

    fn process_mono_requests(&mut self) {
        for request in std::mem::take(&mut self.pending_mono) {
            let name = self
                .mono
                .get_or_create_func(&request.func_name, &request.type_args);
            debug!(function = %request.func_name, instance = %name, "monomorphization request");
        }
    }

    // Declarations

    fn lower_params(&self, params: &[ast::Param]) -> Vec<HirParam> {
        params
            .iter()
            .map(|param| {
                let (name, is_mut) = match &param.pattern.kind {
                    ast::PatternKind::Ident { name, is_mut, .. } => (name.clone(), *is_mut),
                    _ => ("_".to_string(), false),
                };
                HirParam {
                    name,
                    ty: self.resolve_type(&param.ty),
                    is_mut,
                    span: param.span,
                }
            })
            .collect()
    }

    fn lower_body_with_params(
        &mut self,
        params: &[HirParam],
        body: &ast::BlockExpr,
    ) -> crate::hir::Expr {
        self.scopes.push();
        for param in params {
            self.scopes.bind(param.name.clone(), param.ty.clone(), param.is_mut);
        }
        let lowered = self.lower_block(body);
        self.scopes.pop();
        lowered
    }

    pub fn lower_function(&mut self, func: &ast::FuncDecl) -> HirFunction {
        let id = self.fresh_id();
        let saved_generics = std::mem::replace(&mut self.generic_params, func.generics.clone());

        let params = self.lower_params(&func.params);
        let return_type = match &func.return_type {
            Some(ty) => self.resolve_type(ty),
            None => Some(Type::unit()),
        };
        let body = func
            .body
            .as_ref()
            .map(|body| self.lower_body_with_params(&params, body));

        self.generic_params = saved_generics;

        HirFunction {
            id,
            name: func.name.clone(),
            mangled_name: func.name.clone(),
            params,
            return_type,
            body,
            is_public: func.is_public,
            is_async: func.is_async,
            is_extern: func.extern_abi.is_some(),
            extern_abi: func.extern_abi.clone(),
            attributes: func.decorators.clone(),
            span: func.span,
        }
    }

    fn lower_struct(&mut self, decl: &ast::StructDecl) -> HirStruct {
        let id = self.fresh_id();
        let saved_generics = std::mem::replace(&mut self.generic_params, decl.generics.clone());
        let fields = decl
            .fields
            .iter()
            .map(|field| HirField {
                name: field.name.clone(),
                ty: self.resolve_type(&field.ty),
                is_public: field.is_public,
                span: field.span,
            })
            .collect();
        self.generic_params = saved_generics;
        HirStruct {
            id,
            name: decl.name.clone(),
            mangled_name: decl.name.clone(),
            fields,
            is_public: decl.is_public,
            span: decl.span,
        }
    }

    fn lower_enum(&mut self, decl: &ast::EnumDecl) -> HirEnum {
        let id = self.fresh_id();
        let saved_generics = std::mem::replace(&mut self.generic_params, decl.generics.clone());
        let variants = decl
            .variants
            .iter()
            .zip(0u32..)
            .map(|(variant, index)| HirVariant {
                name: variant.name.clone(),
                index,
                payload_types: variant.payload.iter().map(|t| self.resolve_type(t)).collect(),
                span: variant.span,
            })
            .collect();
        self.generic_params = saved_generics;
        HirEnum {
            id,
            name: decl.name.clone(),
            mangled_name: decl.name.clone(),
            variants,
            is_public: decl.is_public,
            span: decl.span,
        }
    }

    fn lower_behavior(&mut self, decl: &ast::BehaviorDecl) -> HirBehavior {
        let id = self.fresh_id();
        let super_behaviors = decl
            .super_behaviors
            .iter()
            .map(|t| crate::types::type_to_string(&self.resolve_type(t)))
            .collect();
        let methods = decl
            .methods
            .iter()
            .map(|method| {
                let params = self.lower_params(&method.params);
                let return_type = match &method.return_type {
                    Some(ty) => self.resolve_type(ty),
                    None => Some(Type::unit()),
                };
                let default_body = method
                    .body
                    .as_ref()
                    .map(|body| self.lower_body_with_params(&params, body));
                HirBehaviorMethod {
                    name: method.name.clone(),
                    params,
                    return_type,
                    has_default_impl: default_body.is_some(),
                    default_body,
                    span: method.span,
                }
            })
            .collect();
        HirBehavior {
            id,
            name: decl.name.clone(),
            methods,
            super_behaviors,
            is_public: decl.is_public,
            span: decl.span,
        }
    }

    fn lower_impl(&mut self, decl: &ast::ImplDecl) -> HirImpl {
        let id = self.fresh_id();
        let behavior_name = decl
            .behavior
            .as_ref()
            .map(|b| crate::types::type_to_string(&self.resolve_type(b)));
        let self_type = self.resolve_type(&decl.self_type);
        let type_name = crate::types::type_to_string(&self_type);

        let saved_self = std::mem::replace(&mut self.self_type, self_type.clone());
        let methods = decl
            .methods
            .iter()
            .map(|m| self.lower_function(m))
            .collect();
        self.self_type = saved_self;

        HirImpl {
            id,
            behavior_name,
            type_name,
            self_type,
            methods,
            span: decl.span,
        }
    }

    fn lower_const(&mut self, decl: &ast::ConstDecl) -> HirConst {
        let id = self.fresh_id();
        let ty = self.resolve_type(&decl.ty);
        let value = self.lower_expr(&decl.value);
        HirConst {
            id,
            name: decl.name.clone(),
            ty,
            value,
            is_public: decl.is_public,
            span: decl.span,
        }
    }

    /// Declaration index of `variant` in an enum already lowered into this
    /// module.
    fn variant_index(&self, enum_name: &str, variant: &str) -> Option<u32> {
        self.module
            .find_enum(enum_name)
            .and_then(|e| e.variant_index(variant))
    }
}
