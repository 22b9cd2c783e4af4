use std::io::Write;

use tml_hir::types::type_to_string;
use tml_hir::{
    Expr, HirBehavior, HirConst, HirEnum, HirFunction, HirImpl, HirModule, HirParam, HirStruct,
    HirType, Pattern, Stmt,
};

use crate::config::HirSerializeOptions;
use crate::hash::compute_hir_hash;

/// Writes a readable dump of a module.
///
/// Output is best-effort: write errors are ignored, the same way the
/// diagnostic emitters treat their sinks.
pub struct HirTextWriter<W: Write> {
    out: W,
    options: HirSerializeOptions,
    indent: usize,
}

impl<W: Write> HirTextWriter<W> {
    pub fn new(out: W, options: HirSerializeOptions) -> Self {
        HirTextWriter {
            out,
            options,
            indent: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_module(&mut self, module: &HirModule) {
        let _ = writeln!(self.out, "; HIR Module: {}", module.name);
        let _ = writeln!(self.out, "; Source: {}", module.source_path);
        let _ = writeln!(self.out, "; Hash: {}", compute_hir_hash(module));
        self.separator();

        if !module.imports.is_empty() {
            let _ = writeln!(self.out, "; Imports");
            for import in &module.imports {
                let _ = writeln!(self.out, "use {import}");
            }
            self.separator();
        }
        self.section("Structs", &module.structs, Self::write_struct);
        self.section("Enums", &module.enums, Self::write_enum);
        self.section("Behaviors", &module.behaviors, Self::write_behavior);
        self.section("Implementations", &module.impls, Self::write_impl);
        self.section("Constants", &module.constants, Self::write_const);
        self.section("Functions", &module.functions, Self::write_function);
        let _ = self.out.flush();
    }

    fn section<T>(&mut self, title: &str, items: &[T], mut each: impl FnMut(&mut Self, &T)) {
        if items.is_empty() {
            return;
        }
        let _ = writeln!(self.out, "; {title}");
        for item in items {
            each(self, item);
            self.separator();
        }
    }

    fn separator(&mut self) {
        if self.options.pretty {
            let _ = writeln!(self.out);
        }
    }

    fn write_indent(&mut self) {
        if self.options.pretty {
            let _ = write!(self.out, "{:width$}", "", width = self.indent * 2);
        }
    }

    fn write_type(&mut self, ty: &HirType) {
        match ty {
            Some(_) => {
                let _ = write!(self.out, "{}", type_to_string(ty));
            }
            None => {
                let _ = write!(self.out, "<unknown>");
            }
        }
    }

    fn write_list<T>(&mut self, items: &[T], sep: &str, mut each: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                let _ = write!(self.out, "{sep}");
            }
            each(self, item);
        }
    }

    fn write_params(&mut self, params: &[HirParam]) {
        let _ = write!(self.out, "(");
        self.write_list(params, ", ", |w, p| {
            let _ = write!(w.out, "{}{}: ", if p.is_mut { "mut " } else { "" }, p.name);
            w.write_type(&p.ty);
        });
        let _ = write!(self.out, ") -> ");
    }

    fn write_struct(&mut self, s: &HirStruct) {
        self.write_indent();
        let _ = write!(self.out, "{}type {}", visibility(s.is_public), s.name);
        if s.mangled_name != s.name {
            let _ = write!(self.out, " [{}]", s.mangled_name);
        }
        let _ = writeln!(self.out, " {{");
        self.indent += 1;
        for field in &s.fields {
            self.write_indent();
            let _ = write!(self.out, "{}{}: ", visibility(field.is_public), field.name);
            self.write_type(&field.ty);
            let _ = writeln!(self.out);
        }
        self.indent -= 1;
        self.write_indent();
        let _ = writeln!(self.out, "}}");
    }

    fn write_enum(&mut self, e: &HirEnum) {
        self.write_indent();
        let _ = write!(self.out, "{}type {}", visibility(e.is_public), e.name);
        if e.mangled_name != e.name {
            let _ = write!(self.out, " [{}]", e.mangled_name);
        }
        let _ = writeln!(self.out, " {{");
        self.indent += 1;
        for variant in &e.variants {
            self.write_indent();
            let _ = write!(self.out, "{}", variant.name);
            if !variant.payload_types.is_empty() {
                let _ = write!(self.out, "(");
                self.write_list(&variant.payload_types, ", ", Self::write_type);
                let _ = write!(self.out, ")");
            }
            let _ = writeln!(self.out, " = {}", variant.index);
        }
        self.indent -= 1;
        self.write_indent();
        let _ = writeln!(self.out, "}}");
    }

    fn write_behavior(&mut self, b: &HirBehavior) {
        let _ = write!(self.out, "{}behavior {}", visibility(b.is_public), b.name);
        if !b.super_behaviors.is_empty() {
            let _ = write!(self.out, ": {}", b.super_behaviors.join(" + "));
        }
        let _ = writeln!(self.out, " {{");
        self.indent += 1;
        for method in &b.methods {
            self.write_indent();
            let _ = write!(self.out, "func {}", method.name);
            self.write_params(&method.params);
            self.write_type(&method.return_type);
            if method.has_default_impl {
                let _ = write!(self.out, " {{ ... }}");
            }
            let _ = writeln!(self.out);
        }
        self.indent -= 1;
        let _ = writeln!(self.out, "}}");
    }

    fn write_impl(&mut self, i: &HirImpl) {
        let _ = write!(self.out, "impl ");
        if let Some(behavior) = &i.behavior_name {
            let _ = write!(self.out, "{behavior} for ");
        }
        let _ = writeln!(self.out, "{} {{", i.type_name);
        self.indent += 1;
        for method in &i.methods {
            self.write_function(method);
        }
        self.indent -= 1;
        let _ = writeln!(self.out, "}}");
    }

    fn write_const(&mut self, c: &HirConst) {
        let _ = write!(self.out, "{}const {}: ", visibility(c.is_public), c.name);
        self.write_type(&c.ty);
        let _ = write!(self.out, " = ");
        self.write_expr(&c.value);
        let _ = writeln!(self.out);
    }

    fn write_function(&mut self, f: &HirFunction) {
        self.write_indent();
        let _ = write!(self.out, "{}", visibility(f.is_public));
        if f.is_async {
            let _ = write!(self.out, "async ");
        }
        if f.is_extern {
            match &f.extern_abi {
                Some(abi) => {
                    let _ = write!(self.out, "extern \"{abi}\" ");
                }
                None => {
                    let _ = write!(self.out, "extern ");
                }
            }
        }
        let _ = write!(self.out, "func {}", f.name);
        if f.mangled_name != f.name {
            let _ = write!(self.out, " [{}]", f.mangled_name);
        }
        self.write_params(&f.params);
        self.write_type(&f.return_type);
        for attr in &f.attributes {
            let _ = write!(self.out, " @{attr}");
        }
        match &f.body {
            Some(body) => {
                let _ = write!(self.out, " = ");
                self.write_expr(body);
                let _ = writeln!(self.out);
            }
            None => {
                let _ = writeln!(self.out);
            }
        }
    }

    fn write_stmt(&mut self, stmt: &Stmt) {
        self.write_indent();
        match stmt {
            Stmt::Let {
                pattern, ty, init, ..
            } => {
                let _ = write!(self.out, "let ");
                self.write_pattern(pattern);
                let _ = write!(self.out, ": ");
                self.write_type(ty);
                if let Some(init) = init {
                    let _ = write!(self.out, " = ");
                    self.write_expr(init);
                }
            }
            Stmt::Expr { expr, .. } => self.write_expr(expr),
        }
        let _ = writeln!(self.out);
    }

    fn write_block(&mut self, stmts: &[Stmt], tail: Option<&Expr>) {
        let _ = writeln!(self.out, "{{");
        self.indent += 1;
        for stmt in stmts {
            self.write_stmt(stmt);
        }
        if let Some(tail) = tail {
            self.write_indent();
            self.write_expr(tail);
            let _ = writeln!(self.out);
        }
        self.indent -= 1;
        self.write_indent();
        let _ = write!(self.out, "}}");
    }

    fn write_label(&mut self, label: Option<&String>) {
        if let Some(label) = label {
            let _ = write!(self.out, "'{label}: ");
        }
    }

    fn write_args(&mut self, args: &[Expr]) {
        let _ = write!(self.out, "(");
        self.write_list(args, ", ", Self::write_expr);
        let _ = write!(self.out, ")");
    }

    fn write_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal { value, .. } => {
                let _ = write!(self.out, "{value}");
            }
            Expr::Var { name, .. } => {
                let _ = write!(self.out, "{name}");
            }
            Expr::Binary {
                op, left, right, ..
            } => {
                let _ = write!(self.out, "(");
                self.write_expr(left);
                let _ = write!(self.out, " {op} ");
                self.write_expr(right);
                let _ = write!(self.out, ")");
            }
            Expr::Unary { op, operand, .. } => {
                let _ = write!(self.out, "{op}");
                self.write_expr(operand);
            }
            Expr::Call {
                func_name, args, ..
            } => {
                let _ = write!(self.out, "{func_name}");
                self.write_args(args);
            }
            Expr::MethodCall {
                receiver,
                method_name,
                args,
                ..
            } => {
                self.write_expr(receiver);
                let _ = write!(self.out, ".{method_name}");
                self.write_args(args);
            }
            Expr::Field {
                object, field_name, ..
            } => {
                self.write_expr(object);
                let _ = write!(self.out, ".{field_name}");
            }
            Expr::Index { object, index, .. } => {
                self.write_expr(object);
                let _ = write!(self.out, "[");
                self.write_expr(index);
                let _ = write!(self.out, "]");
            }
            Expr::Tuple { elements, .. } => self.write_args(elements),
            Expr::Array { elements, .. } => {
                let _ = write!(self.out, "[");
                self.write_list(elements, ", ", Self::write_expr);
                let _ = write!(self.out, "]");
            }
            Expr::ArrayRepeat { value, count, .. } => {
                let _ = write!(self.out, "[");
                self.write_expr(value);
                let _ = write!(self.out, "; {count}]");
            }
            Expr::Struct {
                struct_name,
                fields,
                base,
                ..
            } => {
                let _ = write!(self.out, "{struct_name} {{ ");
                self.write_list(fields, ", ", |w, (name, value)| {
                    let _ = write!(w.out, "{name}: ");
                    w.write_expr(value);
                });
                if let Some(base) = base {
                    let _ = write!(self.out, "{}..", if fields.is_empty() { "" } else { ", " });
                    self.write_expr(base);
                }
                let _ = write!(self.out, " }}");
            }
            Expr::Enum {
                enum_name,
                variant_name,
                payload,
                ..
            } => {
                let _ = write!(self.out, "{enum_name}::{variant_name}");
                if !payload.is_empty() {
                    self.write_args(payload);
                }
            }
            Expr::Block {
                stmts, expr: tail, ..
            } => self.write_block(stmts, tail.as_deref()),
            Expr::Lowlevel {
                stmts, expr: tail, ..
            } => {
                let _ = write!(self.out, "lowlevel ");
                self.write_block(stmts, tail.as_deref());
            }
            Expr::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let _ = write!(self.out, "if ");
                self.write_expr(condition);
                let _ = write!(self.out, " then ");
                self.write_expr(then_branch);
                if let Some(else_branch) = else_branch {
                    let _ = write!(self.out, " else ");
                    self.write_expr(else_branch);
                }
            }
            Expr::When {
                scrutinee, arms, ..
            } => {
                let _ = write!(self.out, "when ");
                self.write_expr(scrutinee);
                let _ = writeln!(self.out, " {{");
                self.indent += 1;
                for arm in arms {
                    self.write_indent();
                    self.write_pattern(&arm.pattern);
                    if let Some(guard) = &arm.guard {
                        let _ = write!(self.out, " if ");
                        self.write_expr(guard);
                    }
                    let _ = write!(self.out, " => ");
                    self.write_expr(&arm.body);
                    let _ = writeln!(self.out, ",");
                }
                self.indent -= 1;
                self.write_indent();
                let _ = write!(self.out, "}}");
            }
            Expr::Loop { label, body, .. } => {
                self.write_label(label.as_ref());
                let _ = write!(self.out, "loop ");
                self.write_expr(body);
            }
            Expr::While {
                label,
                condition,
                body,
                ..
            } => {
                self.write_label(label.as_ref());
                let _ = write!(self.out, "while ");
                self.write_expr(condition);
                let _ = write!(self.out, " ");
                self.write_expr(body);
            }
            Expr::For {
                label,
                pattern,
                iter,
                body,
                ..
            } => {
                self.write_label(label.as_ref());
                let _ = write!(self.out, "for ");
                self.write_pattern(pattern);
                let _ = write!(self.out, " in ");
                self.write_expr(iter);
                let _ = write!(self.out, " ");
                self.write_expr(body);
            }
            Expr::Return { value, .. } => {
                let _ = write!(self.out, "return");
                if let Some(value) = value {
                    let _ = write!(self.out, " ");
                    self.write_expr(value);
                }
            }
            Expr::Break { label, value, .. } => {
                let _ = write!(self.out, "break");
                if let Some(label) = label {
                    let _ = write!(self.out, " '{label}");
                }
                if let Some(value) = value {
                    let _ = write!(self.out, " ");
                    self.write_expr(value);
                }
            }
            Expr::Continue { label, .. } => {
                let _ = write!(self.out, "continue");
                if let Some(label) = label {
                    let _ = write!(self.out, " '{label}");
                }
            }
            Expr::Closure {
                params,
                body,
                captures,
                ..
            } => {
                let _ = write!(self.out, "do(");
                self.write_list(params, ", ", |w, (name, ty)| {
                    let _ = write!(w.out, "{name}: ");
                    w.write_type(ty);
                });
                let _ = write!(self.out, ")");
                if !captures.is_empty() {
                    let _ = write!(self.out, " [");
                    self.write_list(captures, ", ", |w, c| {
                        let _ = write!(w.out, "{}{}", if c.is_mut { "mut " } else { "" }, c.name);
                    });
                    let _ = write!(self.out, "]");
                }
                let _ = write!(self.out, " ");
                self.write_expr(body);
            }
            Expr::Cast {
                expr: inner,
                target_type,
                ..
            } => {
                let _ = write!(self.out, "(");
                self.write_expr(inner);
                let _ = write!(self.out, " as ");
                self.write_type(target_type);
                let _ = write!(self.out, ")");
            }
            Expr::Try { expr: inner, .. } => {
                self.write_expr(inner);
                let _ = write!(self.out, "!");
            }
            Expr::Await { expr: inner, .. } => {
                self.write_expr(inner);
                let _ = write!(self.out, ".await");
            }
            Expr::Assign { target, value, .. } => {
                self.write_expr(target);
                let _ = write!(self.out, " = ");
                self.write_expr(value);
            }
            Expr::CompoundAssign {
                op, target, value, ..
            } => {
                self.write_expr(target);
                let _ = write!(self.out, " {op} ");
                self.write_expr(value);
            }
        }
    }

    fn write_pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Wildcard { .. } => {
                let _ = write!(self.out, "_");
            }
            Pattern::Binding { name, is_mut, .. } => {
                let _ = write!(self.out, "{}{name}", if *is_mut { "mut " } else { "" });
            }
            Pattern::Literal { value, .. } => {
                let _ = write!(self.out, "{value}");
            }
            Pattern::Tuple { elements, .. } => {
                let _ = write!(self.out, "(");
                self.write_list(elements, ", ", Self::write_pattern);
                let _ = write!(self.out, ")");
            }
            Pattern::Struct {
                struct_name,
                fields,
                has_rest,
                ..
            } => {
                let _ = write!(self.out, "{struct_name} {{ ");
                self.write_list(fields, ", ", |w, (name, p)| {
                    let _ = write!(w.out, "{name}: ");
                    w.write_pattern(p);
                });
                if *has_rest {
                    let _ = write!(self.out, "{}..", if fields.is_empty() { "" } else { ", " });
                }
                let _ = write!(self.out, " }}");
            }
            Pattern::Enum {
                enum_name,
                variant_name,
                payload,
                ..
            } => {
                let _ = write!(self.out, "{enum_name}::{variant_name}");
                if let Some(payload) = payload {
                    let _ = write!(self.out, "(");
                    self.write_list(payload, ", ", Self::write_pattern);
                    let _ = write!(self.out, ")");
                }
            }
            Pattern::Or { alternatives, .. } => {
                self.write_list(alternatives, " | ", Self::write_pattern);
            }
            Pattern::Range {
                start,
                end,
                inclusive,
                ..
            } => {
                if let Some(start) = start {
                    let _ = write!(self.out, "{start}");
                }
                let _ = write!(self.out, "{}", if *inclusive { "..=" } else { ".." });
                if let Some(end) = end {
                    let _ = write!(self.out, "{end}");
                }
            }
            Pattern::Array { elements, rest, .. } => {
                let _ = write!(self.out, "[");
                self.write_list(elements, ", ", Self::write_pattern);
                if let Some(rest) = rest {
                    let _ = write!(self.out, "{}..", if elements.is_empty() { "" } else { ", " });
                    self.write_pattern(rest);
                }
                let _ = write!(self.out, "]");
            }
        }
    }
}

fn visibility(is_public: bool) -> &'static str {
    if is_public {
        "pub "
    } else {
        ""
    }
}
