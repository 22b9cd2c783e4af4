use std::sync::Arc;

use tml_hir::{
    BinOp, CompoundOp, Expr, HirBehavior, HirBehaviorMethod, HirCapture, HirConst, HirEnum,
    HirField, HirFunction, HirId, HirImpl, HirModule, HirParam, HirStruct, HirType, HirVariant,
    LiteralValue, Location, Pattern, PrimitiveKind, Span, Stmt, Type, UnaryOp, WhenArm,
};
use tracing::warn;

use super::{
    EXPR_TAG_MAX, FLAG_SPANS, LIT_BOOL, LIT_CHAR, LIT_FLOAT64, LIT_INT64, LIT_STRING, LIT_UINT64,
    MAX_NESTING_DEPTH, PATTERN_TAG_MAX, STMT_EXPR, STMT_LET, TYPE_NAMED, TYPE_UNKNOWN,
};
use crate::error::HirReadError;
use crate::hash::ContentHash;
use crate::stack::ensure_sufficient_stack;
use crate::{HIR_MAGIC, HIR_VERSION_MAJOR};

type ReadResult<T> = Result<T, HirReadError>;

/// Decodes the binary cache format.
///
/// Reading never panics and never returns early with nothing: the first
/// problem is recorded (see [`has_error`](Self::has_error)) and whatever was
/// decoded up to that point is returned. A bad magic number or an
/// incompatible major version yields an empty module. Runaway nesting is
/// reported as [`HirReadError::TooDeep`] rather than exhausting the stack.
pub struct HirBinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
    depth: usize,
    include_spans: bool,
    content_hash: ContentHash,
    error: Option<HirReadError>,
}

impl<'a> HirBinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        HirBinaryReader {
            data,
            pos: 0,
            depth: 0,
            include_spans: false,
            content_hash: ContentHash::default(),
            error: None,
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&HirReadError> {
        self.error.as_ref()
    }

    /// The hash stored in the header. Zero until a header has been read.
    pub fn content_hash(&self) -> ContentHash {
        self.content_hash
    }

    pub fn read_module(&mut self) -> HirModule {
        if let Err(err) = self.header() {
            warn!(error = %err, "rejected HIR header");
            self.error = Some(err);
            return HirModule::default();
        }

        let mut module = HirModule::default();
        if let Err(err) = self.body(&mut module) {
            warn!(module = %module.name, error = %err, "HIR data ends early");
            self.error = Some(err);
        }
        module
    }

    fn header(&mut self) -> ReadResult<()> {
        if self.u32("magic")? != HIR_MAGIC {
            return Err(HirReadError::InvalidMagic);
        }
        let major = self.u16("version")?;
        let minor = self.u16("version")?;
        if major != HIR_VERSION_MAJOR {
            return Err(HirReadError::IncompatibleVersion { major, minor });
        }
        self.content_hash = ContentHash::new(self.u64("content hash")?);
        self.include_spans = self.u8("flags")? & FLAG_SPANS != 0;
        Ok(())
    }

    /// Fills `module` field by field so a failure keeps what came before.
    fn body(&mut self, module: &mut HirModule) -> ReadResult<()> {
        module.name = self.string()?;
        module.source_path = self.string()?;
        self.seq_into(&mut module.structs, Self::hir_struct)?;
        self.seq_into(&mut module.enums, Self::hir_enum)?;
        self.seq_into(&mut module.behaviors, Self::behavior)?;
        self.seq_into(&mut module.impls, Self::hir_impl)?;
        self.seq_into(&mut module.functions, Self::function)?;
        self.seq_into(&mut module.constants, Self::constant)?;
        self.seq_into(&mut module.imports, Self::string)
    }

    // Primitives

    fn take(&mut self, n: usize, what: &'static str) -> ReadResult<&'a [u8]> {
        let data: &'a [u8] = self.data;
        let slice = self
            .pos
            .checked_add(n)
            .and_then(|end| data.get(self.pos..end))
            .ok_or(HirReadError::Truncated { what })?;
        self.pos += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self, what: &'static str) -> ReadResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn u8(&mut self, what: &'static str) -> ReadResult<u8> {
        Ok(self.array::<1>(what)?[0])
    }

    fn u16(&mut self, what: &'static str) -> ReadResult<u16> {
        self.array(what).map(u16::from_le_bytes)
    }

    fn u32(&mut self, what: &'static str) -> ReadResult<u32> {
        self.array(what).map(u32::from_le_bytes)
    }

    fn u64(&mut self, what: &'static str) -> ReadResult<u64> {
        self.array(what).map(u64::from_le_bytes)
    }

    fn i32(&mut self, what: &'static str) -> ReadResult<i32> {
        self.array(what).map(i32::from_le_bytes)
    }

    fn i64(&mut self, what: &'static str) -> ReadResult<i64> {
        self.array(what).map(i64::from_le_bytes)
    }

    fn bool(&mut self) -> ReadResult<bool> {
        Ok(self.u8("bool")? != 0)
    }

    fn len(&mut self) -> ReadResult<usize> {
        Ok(self.u32("length")? as usize)
    }

    fn string(&mut self) -> ReadResult<String> {
        let len = self.len()?;
        let bytes = self.take(len, "string")?;
        String::from_utf8(bytes.to_vec()).map_err(|_| HirReadError::InvalidUtf8)
    }

    fn id(&mut self) -> ReadResult<HirId> {
        self.u64("id").map(HirId::new)
    }

    fn location(&mut self) -> ReadResult<Location> {
        Ok(Location::new(
            self.u32("span")?,
            self.u32("span")?,
            self.u32("span")?,
        ))
    }

    fn span(&mut self) -> ReadResult<Span> {
        if !self.include_spans {
            return Ok(Span::DUMMY);
        }
        Ok(Span::new(self.location()?, self.location()?))
    }

    fn ty(&mut self) -> ReadResult<HirType> {
        match self.u8("type")? {
            TYPE_UNKNOWN => Ok(None),
            TYPE_NAMED => Ok(Some(parse_type(&self.string()?))),
            tag => Err(HirReadError::UnknownTag { kind: "type", tag }),
        }
    }

    fn seq<T>(&mut self, each: impl FnMut(&mut Self) -> ReadResult<T>) -> ReadResult<Vec<T>> {
        let mut items = Vec::new();
        self.seq_into(&mut items, each)?;
        Ok(items)
    }

    /// Appends each decoded element to `items` as soon as it is complete.
    fn seq_into<T>(
        &mut self,
        items: &mut Vec<T>,
        mut each: impl FnMut(&mut Self) -> ReadResult<T>,
    ) -> ReadResult<()> {
        let count = self.len()?;
        items.reserve(count.min(self.data.len() - self.pos));
        for _ in 0..count {
            items.push(each(self)?);
        }
        Ok(())
    }

    fn opt<T>(
        &mut self,
        each: impl FnOnce(&mut Self) -> ReadResult<T>,
    ) -> ReadResult<Option<T>> {
        if self.bool()? {
            each(self).map(Some)
        } else {
            Ok(None)
        }
    }

    fn opt_string(&mut self) -> ReadResult<Option<String>> {
        self.opt(Self::string)
    }

    fn types(&mut self) -> ReadResult<Vec<HirType>> {
        self.seq(Self::ty)
    }

    fn exprs(&mut self) -> ReadResult<Vec<Expr>> {
        self.seq(Self::expr)
    }

    fn boxed(&mut self) -> ReadResult<Box<Expr>> {
        self.expr().map(Box::new)
    }

    fn opt_boxed(&mut self) -> ReadResult<Option<Box<Expr>>> {
        self.opt(Self::boxed)
    }

    fn literal(&mut self) -> ReadResult<LiteralValue> {
        Ok(match self.u8("literal")? {
            LIT_INT64 => LiteralValue::Int64(self.i64("literal")?),
            LIT_UINT64 => LiteralValue::UInt64(self.u64("literal")?),
            LIT_FLOAT64 => LiteralValue::Float64(f64::from_bits(self.u64("literal")?)),
            LIT_BOOL => LiteralValue::Bool(self.bool()?),
            LIT_CHAR => {
                let raw = self.u32("literal")?;
                let c = char::from_u32(raw).ok_or(HirReadError::InvalidValue {
                    what: "char",
                    value: u64::from(raw),
                })?;
                LiteralValue::Char(c)
            }
            LIT_STRING => LiteralValue::String(self.string()?),
            tag => return Err(HirReadError::UnknownTag { kind: "literal", tag }),
        })
    }

    fn op<T>(&mut self, what: &'static str, decode: fn(u8) -> Option<T>) -> ReadResult<T> {
        let ordinal = self.u8(what)?;
        decode(ordinal).ok_or(HirReadError::InvalidValue {
            what,
            value: u64::from(ordinal),
        })
    }

    // Declarations

    fn param(&mut self) -> ReadResult<HirParam> {
        Ok(HirParam {
            name: self.string()?,
            ty: self.ty()?,
            is_mut: self.bool()?,
            span: self.span()?,
        })
    }

    fn hir_struct(&mut self) -> ReadResult<HirStruct> {
        Ok(HirStruct {
            id: self.id()?,
            name: self.string()?,
            mangled_name: self.string()?,
            fields: self.seq(|r| {
                Ok(HirField {
                    name: r.string()?,
                    ty: r.ty()?,
                    is_public: r.bool()?,
                    span: r.span()?,
                })
            })?,
            is_public: self.bool()?,
            span: self.span()?,
        })
    }

    fn hir_enum(&mut self) -> ReadResult<HirEnum> {
        Ok(HirEnum {
            id: self.id()?,
            name: self.string()?,
            mangled_name: self.string()?,
            variants: self.seq(|r| {
                Ok(HirVariant {
                    name: r.string()?,
                    index: r.u32("variant index")?,
                    payload_types: r.types()?,
                    span: r.span()?,
                })
            })?,
            is_public: self.bool()?,
            span: self.span()?,
        })
    }

    fn behavior(&mut self) -> ReadResult<HirBehavior> {
        Ok(HirBehavior {
            id: self.id()?,
            name: self.string()?,
            methods: self.seq(|r| {
                Ok(HirBehaviorMethod {
                    name: r.string()?,
                    params: r.seq(Self::param)?,
                    return_type: r.ty()?,
                    has_default_impl: r.bool()?,
                    default_body: r.opt(Self::expr)?,
                    span: r.span()?,
                })
            })?,
            super_behaviors: self.seq(Self::string)?,
            is_public: self.bool()?,
            span: self.span()?,
        })
    }

    fn hir_impl(&mut self) -> ReadResult<HirImpl> {
        Ok(HirImpl {
            id: self.id()?,
            behavior_name: self.opt_string()?,
            type_name: self.string()?,
            self_type: self.ty()?,
            methods: self.seq(Self::function)?,
            span: self.span()?,
        })
    }

    fn function(&mut self) -> ReadResult<HirFunction> {
        Ok(HirFunction {
            id: self.id()?,
            name: self.string()?,
            mangled_name: self.string()?,
            params: self.seq(Self::param)?,
            return_type: self.ty()?,
            body: self.opt(Self::expr)?,
            is_public: self.bool()?,
            is_async: self.bool()?,
            is_extern: self.bool()?,
            extern_abi: self.opt_string()?,
            attributes: self.seq(Self::string)?,
            span: self.span()?,
        })
    }

    fn constant(&mut self) -> ReadResult<HirConst> {
        Ok(HirConst {
            id: self.id()?,
            name: self.string()?,
            ty: self.ty()?,
            value: self.expr()?,
            is_public: self.bool()?,
            span: self.span()?,
        })
    }

    // Nodes

    fn stmt(&mut self) -> ReadResult<Stmt> {
        match self.u8("statement")? {
            STMT_LET => Ok(Stmt::Let {
                id: self.id()?,
                pattern: self.pattern()?,
                ty: self.ty()?,
                init: self.opt_boxed()?,
                span: self.span()?,
            }),
            STMT_EXPR => Ok(Stmt::Expr {
                id: self.id()?,
                expr: self.boxed()?,
                span: self.span()?,
            }),
            tag => Err(HirReadError::UnknownTag {
                kind: "statement",
                tag,
            }),
        }
    }

    /// Runs one level of node decoding with depth accounting.
    fn nested<T>(&mut self, decode: impl FnOnce(&mut Self) -> ReadResult<T>) -> ReadResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(HirReadError::TooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| decode(self));
        self.depth -= 1;
        result
    }

    fn pattern(&mut self) -> ReadResult<Pattern> {
        self.nested(Self::pattern_node)
    }

    fn pattern_node(&mut self) -> ReadResult<Pattern> {
        let tag = self.u8("pattern")?;
        if tag > PATTERN_TAG_MAX {
            return Err(HirReadError::UnknownTag { kind: "pattern", tag });
        }
        let id = self.id()?;
        Ok(match tag {
            0 => Pattern::Wildcard {
                id,
                span: self.span()?,
            },
            1 => Pattern::Binding {
                id,
                name: self.string()?,
                is_mut: self.bool()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            2 => Pattern::Literal {
                id,
                value: self.literal()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            3 => Pattern::Tuple {
                id,
                elements: self.seq(Self::pattern)?,
                ty: self.ty()?,
                span: self.span()?,
            },
            4 => Pattern::Struct {
                id,
                struct_name: self.string()?,
                fields: self.seq(|r| Ok((r.string()?, r.pattern()?)))?,
                has_rest: self.bool()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            5 => Pattern::Enum {
                id,
                enum_name: self.string()?,
                variant_name: self.string()?,
                variant_index: self.i32("variant index")?,
                payload: self.opt(|r| r.seq(Self::pattern))?,
                ty: self.ty()?,
                span: self.span()?,
            },
            6 => Pattern::Or {
                id,
                alternatives: self.seq(Self::pattern)?,
                ty: self.ty()?,
                span: self.span()?,
            },
            7 => Pattern::Range {
                id,
                start: self.opt(|r| r.i64("range bound"))?,
                end: self.opt(|r| r.i64("range bound"))?,
                inclusive: self.bool()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            8 => Pattern::Array {
                id,
                elements: self.seq(Self::pattern)?,
                rest: self.opt(|r| r.pattern().map(Box::new))?,
                ty: self.ty()?,
                span: self.span()?,
            },
            tag => return Err(HirReadError::UnknownTag { kind: "pattern", tag }),
        })
    }

    fn capture(&mut self) -> ReadResult<HirCapture> {
        Ok(HirCapture {
            name: self.string()?,
            ty: self.ty()?,
            is_mut: self.bool()?,
            by_move: self.bool()?,
        })
    }

    fn arm(&mut self) -> ReadResult<WhenArm> {
        Ok(WhenArm {
            pattern: self.pattern()?,
            guard: self.opt_boxed()?,
            body: self.boxed()?,
            span: self.span()?,
        })
    }

    fn expr(&mut self) -> ReadResult<Expr> {
        self.nested(Self::expr_node)
    }

    fn expr_node(&mut self) -> ReadResult<Expr> {
        let tag = self.u8("expression")?;
        if tag > EXPR_TAG_MAX {
            return Err(HirReadError::UnknownTag {
                kind: "expression",
                tag,
            });
        }
        let id = self.id()?;
        Ok(match tag {
            0 => Expr::Literal {
                id,
                value: self.literal()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            1 => Expr::Var {
                id,
                name: self.string()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            2 => Expr::Binary {
                id,
                op: self.op("binary operator", BinOp::from_ordinal)?,
                left: self.boxed()?,
                right: self.boxed()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            3 => Expr::Unary {
                id,
                op: self.op("unary operator", UnaryOp::from_ordinal)?,
                operand: self.boxed()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            4 => Expr::Call {
                id,
                func_name: self.string()?,
                type_args: self.types()?,
                args: self.exprs()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            5 => Expr::MethodCall {
                id,
                receiver: self.boxed()?,
                method_name: self.string()?,
                type_args: self.types()?,
                args: self.exprs()?,
                receiver_type: self.ty()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            6 => Expr::Field {
                id,
                object: self.boxed()?,
                field_name: self.string()?,
                field_index: self.i32("field index")?,
                ty: self.ty()?,
                span: self.span()?,
            },
            7 => Expr::Index {
                id,
                object: self.boxed()?,
                index: self.boxed()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            8 => Expr::Tuple {
                id,
                elements: self.exprs()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            9 => Expr::Array {
                id,
                elements: self.exprs()?,
                element_type: self.ty()?,
                size: self.u64("array size")?,
                ty: self.ty()?,
                span: self.span()?,
            },
            10 => Expr::ArrayRepeat {
                id,
                value: self.boxed()?,
                count: self.u64("repeat count")?,
                ty: self.ty()?,
                span: self.span()?,
            },
            11 => Expr::Struct {
                id,
                struct_name: self.string()?,
                type_args: self.types()?,
                fields: self.seq(|r| Ok((r.string()?, r.expr()?)))?,
                base: self.opt_boxed()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            12 => Expr::Enum {
                id,
                enum_name: self.string()?,
                variant_name: self.string()?,
                variant_index: self.i32("variant index")?,
                type_args: self.types()?,
                payload: self.exprs()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            13 => Expr::Block {
                id,
                stmts: self.seq(Self::stmt)?,
                expr: self.opt_boxed()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            14 => Expr::If {
                id,
                condition: self.boxed()?,
                then_branch: self.boxed()?,
                else_branch: self.opt_boxed()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            15 => Expr::When {
                id,
                scrutinee: self.boxed()?,
                arms: self.seq(Self::arm)?,
                ty: self.ty()?,
                span: self.span()?,
            },
            16 => Expr::Loop {
                id,
                label: self.opt_string()?,
                body: self.boxed()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            17 => Expr::While {
                id,
                label: self.opt_string()?,
                condition: self.boxed()?,
                body: self.boxed()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            18 => Expr::For {
                id,
                label: self.opt_string()?,
                pattern: self.pattern()?,
                iter: self.boxed()?,
                body: self.boxed()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            19 => Expr::Return {
                id,
                value: self.opt_boxed()?,
                span: self.span()?,
            },
            20 => Expr::Break {
                id,
                label: self.opt_string()?,
                value: self.opt_boxed()?,
                span: self.span()?,
            },
            21 => Expr::Continue {
                id,
                label: self.opt_string()?,
                span: self.span()?,
            },
            22 => Expr::Closure {
                id,
                params: self.seq(|r| Ok((r.string()?, r.ty()?)))?,
                body: self.boxed()?,
                captures: self.seq(Self::capture)?,
                ty: self.ty()?,
                span: self.span()?,
            },
            23 => Expr::Cast {
                id,
                expr: self.boxed()?,
                target_type: self.ty()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            24 => Expr::Try {
                id,
                expr: self.boxed()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            25 => Expr::Await {
                id,
                expr: self.boxed()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            26 => Expr::Assign {
                id,
                target: self.boxed()?,
                value: self.boxed()?,
                span: self.span()?,
            },
            27 => Expr::CompoundAssign {
                id,
                op: self.op("compound operator", CompoundOp::from_ordinal)?,
                target: self.boxed()?,
                value: self.boxed()?,
                span: self.span()?,
            },
            28 => Expr::Lowlevel {
                id,
                stmts: self.seq(Self::stmt)?,
                expr: self.opt_boxed()?,
                ty: self.ty()?,
                span: self.span()?,
            },
            tag => {
                return Err(HirReadError::UnknownTag {
                    kind: "expression",
                    tag,
                })
            }
        })
    }
}

/// Maps a printable type back to a `Type`. Only primitives and `!` are
/// recovered structurally; everything else becomes an opaque named type.
fn parse_type(printed: &str) -> Arc<Type> {
    if printed == "!" {
        return Type::never();
    }
    match PrimitiveKind::from_name(printed) {
        Some(kind) => Type::primitive(kind),
        None => Type::named(printed, Vec::new()),
    }
}
