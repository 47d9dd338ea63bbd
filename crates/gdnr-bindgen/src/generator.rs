//! Deterministic per-class source emission.
//!
//! Each class of the validated graph becomes one Rust source unit wrapping
//! the runtime crate: a struct embedding its superclass, leaf methods that
//! resolve through the symbol cache and dispatch through a shape-matched
//! call shim, typed property accessors, integer-backed enums and a virtual
//! callback trait. A shared `icalls` unit carries one shim per distinct
//! member shape. Emission is pure text assembly over sorted collections, so
//! generating twice from the same schema is byte-identical.

use crate::error::{SchemaError, SchemaResult};
use crate::model::{
    ApiSchema, ClassDescriptor, ClassFlags, CoreKind, DefaultValue, MethodDescriptor,
    PropertyDescriptor, SemanticType,
};
use std::collections::BTreeSet;

/// One emitted source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub file_name: String,
    pub source: String,
}

/// Outcome of a whole-schema run. A failing class aborts only its own unit;
/// isolated classes keep generating.
#[derive(Debug)]
pub struct GenerationReport {
    pub units: Vec<GeneratedUnit>,
    pub failures: Vec<SchemaError>,
}

/// The lowered slot kind a member position occupies on the wire.
///
/// Enums lower to `I64`, object and opaque references to `Obj`. This is the
/// whole vocabulary of the call shim layer; typed conversions live in the
/// per-class wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SlotTag {
    Unit,
    I64,
    F32,
    Bool,
    Str,
    Obj,
    Value(CoreKind),
}

impl SlotTag {
    fn mangle(&self) -> String {
        match self {
            SlotTag::Unit => "unit".to_string(),
            SlotTag::I64 => "i64".to_string(),
            SlotTag::F32 => "f32".to_string(),
            SlotTag::Bool => "bool".to_string(),
            SlotTag::Str => "str".to_string(),
            SlotTag::Obj => "obj".to_string(),
            SlotTag::Value(kind) => kind.rust_name().to_lowercase(),
        }
    }
}

/// A distinct call shim signature.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct CallShape {
    ret: SlotTag,
    args: Vec<SlotTag>,
}

impl CallShape {
    fn icall_name(&self) -> String {
        let mut name = format!("icall_{}", self.ret.mangle());
        for arg in &self.args {
            name.push('_');
            name.push_str(&arg.mangle());
        }
        name
    }
}

fn lower(ty: &SemanticType) -> Option<SlotTag> {
    Some(match ty {
        SemanticType::Void => SlotTag::Unit,
        SemanticType::Bool => SlotTag::Bool,
        SemanticType::Int => SlotTag::I64,
        SemanticType::Float => SlotTag::F32,
        SemanticType::Str => SlotTag::Str,
        SemanticType::Core(kind) => SlotTag::Value(*kind),
        SemanticType::Enum { .. } => SlotTag::I64,
        SemanticType::Object(_) => SlotTag::Obj,
        // Variant and container types stay outside the typed surface.
        SemanticType::Opaque(_) => return None,
    })
}

/// Walks the descriptor graph and emits source units.
pub struct CodeGenerator<'a> {
    schema: &'a ApiSchema,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(schema: &'a ApiSchema) -> CodeGenerator<'a> {
        CodeGenerator { schema }
    }

    /// Emit every class, the shared call shim unit and the module index.
    pub fn generate_all(&self) -> GenerationReport {
        let mut classes: Vec<&ClassDescriptor> = self.schema.classes().iter().collect();
        classes.sort_by(|a, b| a.name.cmp(&b.name));

        let mut units = Vec::new();
        let mut failures = Vec::new();
        let mut shapes = BTreeSet::new();
        let mut emitted = Vec::new();

        for class in classes {
            match self.generate_class_unit(class, &mut shapes) {
                Ok(source) => {
                    emitted.push(class.name.as_str());
                    units.push(GeneratedUnit {
                        file_name: format!("{}.rs", snake_case(&class.name)),
                        source,
                    });
                }
                Err(err) => failures.push(err),
            }
        }

        units.push(GeneratedUnit {
            file_name: "icalls.rs".to_string(),
            source: self.generate_icalls_from(&shapes),
        });
        units.push(GeneratedUnit {
            file_name: "mod.rs".to_string(),
            source: Self::generate_mod(&emitted),
        });

        GenerationReport { units, failures }
    }

    /// Emit one class unit.
    pub fn generate_class(&self, class: &ClassDescriptor) -> SchemaResult<String> {
        let mut shapes = BTreeSet::new();
        self.generate_class_unit(class, &mut shapes)
    }

    /// Emit the shared call shim unit for the whole schema.
    pub fn generate_icalls(&self) -> String {
        let mut shapes = BTreeSet::new();
        for class in self.schema.classes() {
            // Shape collection reuses the class emitter; failed classes
            // contribute nothing, matching generate_all.
            let _ = self.generate_class_unit(class, &mut shapes);
        }
        self.generate_icalls_from(&shapes)
    }

    fn generate_mod(classes: &[&str]) -> String {
        let mut out = String::new();
        out.push_str("//! Generated host class bindings. Do not edit.\n\n");
        out.push_str("pub mod icalls;\n\n");
        for class in classes {
            out.push_str(&format!("pub mod {};\n", snake_case(class)));
        }
        out.push('\n');
        for class in classes {
            out.push_str(&format!("pub use {}::*;\n", snake_case(class)));
        }
        out
    }

    fn generate_class_unit(
        &self,
        class: &ClassDescriptor,
        shapes: &mut BTreeSet<CallShape>,
    ) -> SchemaResult<String> {
        self.check_references(class)?;

        let mut out = String::new();
        out.push_str("// Generated file. Do not edit.\n\n");
        out.push_str("use gdnr_core::prelude::*;\n");
        if !class.enums.is_empty() {
            out.push_str("use num_enum::{IntoPrimitive, TryFromPrimitive};\n");
        }
        out.push_str("\n#[allow(unused_imports)]\nuse super::icalls;\nuse super::*;\n\n");

        self.emit_struct(class, &mut out);
        self.emit_impl(class, &mut out, shapes);
        self.emit_enums(class, &mut out);
        self.emit_virtuals(class, &mut out);

        // Single trailing newline.
        while out.ends_with("\n\n") {
            out.pop();
        }
        Ok(out)
    }

    fn emit_struct(&self, class: &ClassDescriptor, out: &mut String) {
        out.push_str(&format!("/// Host class `{}`.\n", class.name));
        match &class.base_class {
            Some(base) => {
                out.push_str(&format!("pub struct {} {{\n    base: {},\n}}\n\n", class.name, base));
                out.push_str(&format!(
                    "impl std::ops::Deref for {} {{\n    type Target = {};\n\n    fn deref(&self) -> &{} {{\n        &self.base\n    }}\n}}\n\n",
                    class.name, base, base
                ));
            }
            None => {
                out.push_str(&format!(
                    "pub struct {} {{\n    ctx: HostContext,\n    handle: ObjectHandle,\n    owned: bool,\n}}\n\n",
                    class.name
                ));
            }
        }
    }

    fn emit_impl(
        &self,
        class: &ClassDescriptor,
        out: &mut String,
        shapes: &mut BTreeSet<CallShape>,
    ) {
        out.push_str(&format!("impl {} {{\n", class.name));
        let mut first = true;

        for (name, value) in &class.constants {
            out.push_str(&format!(
                "    pub const {}: i64 = {};\n",
                const_ident(name),
                value
            ));
            first = false;
        }
        for signal in &class.signals {
            out.push_str(&format!(
                "    pub const SIGNAL_{}: &'static str = \"{}\";\n",
                const_ident(&signal.name),
                signal.name
            ));
            first = false;
        }
        if !first {
            out.push('\n');
        }

        self.emit_constructors(class, out);
        self.emit_lifecycle(class, out);

        for method in &class.methods {
            if method.is_callback || !method_supported(method) {
                continue;
            }
            self.emit_method(class, method, out, shapes);
        }

        for property in &class.properties {
            self.emit_property(class, property, out, shapes);
        }

        // Drop the trailing blank line inside the block.
        if out.ends_with("\n\n") {
            out.pop();
        }
        out.push_str("}\n\n");
    }

    fn emit_constructors(&self, class: &ClassDescriptor, out: &mut String) {
        if class.flags.contains(ClassFlags::INSTANCIABLE) {
            out.push_str("    /// Construct a new host-owned instance.\n");
            out.push_str(&format!(
                "    pub fn new(ctx: &HostContext) -> InteropResult<{}> {{\n",
                class.name
            ));
            out.push_str(&format!(
                "        let handle = ctx.construct(\"{}\")?;\n",
                class.name
            ));
            out.push_str(&format!(
                "        Ok({}::from_parts(ctx.clone(), handle, true))\n    }}\n\n",
                class.name
            ));
        }

        out.push_str("    /// Wrap an existing host instance without taking ownership.\n");
        out.push_str(&format!(
            "    pub fn from_handle(ctx: HostContext, handle: ObjectHandle) -> {} {{\n        {}::from_parts(ctx, handle, false)\n    }}\n\n",
            class.name, class.name
        ));

        match &class.base_class {
            Some(base) => {
                out.push_str(&format!(
                    "    pub(crate) fn from_parts(ctx: HostContext, handle: ObjectHandle, owned: bool) -> {} {{\n        {} {{\n            base: {}::from_parts(ctx, handle, owned),\n        }}\n    }}\n\n",
                    class.name, class.name, base
                ));
            }
            None => {
                out.push_str(&format!(
                    "    pub(crate) fn from_parts(ctx: HostContext, handle: ObjectHandle, owned: bool) -> {} {{\n        {} {{ ctx, handle, owned }}\n    }}\n\n",
                    class.name, class.name
                ));
            }
        }
    }

    fn emit_lifecycle(&self, class: &ClassDescriptor, out: &mut String) {
        match &class.base_class {
            Some(_) => {
                out.push_str("    /// Release the underlying host instance if owned.\n");
                out.push_str("    pub fn free(self) {\n        self.base.free();\n    }\n\n");
            }
            None => {
                out.push_str("    pub fn ctx(&self) -> &HostContext {\n        &self.ctx\n    }\n\n");
                out.push_str(
                    "    pub fn handle(&self) -> ObjectHandle {\n        self.handle\n    }\n\n",
                );
                out.push_str("    pub fn is_owned(&self) -> bool {\n        self.owned\n    }\n\n");
                out.push_str("    /// Release the underlying host instance if owned.\n");
                out.push_str(
                    "    pub fn free(self) {\n        if self.owned {\n            self.ctx.free(self.handle);\n        }\n    }\n\n",
                );
            }
        }
    }

    fn emit_method(
        &self,
        class: &ClassDescriptor,
        method: &MethodDescriptor,
        out: &mut String,
        shapes: &mut BTreeSet<CallShape>,
    ) {
        let defaults: Vec<String> = method
            .params
            .iter()
            .filter_map(|p| {
                p.default
                    .as_ref()
                    .map(|d| format!("`{}` = `{}`", p.name, render_default(d)))
            })
            .collect();
        if !defaults.is_empty() {
            out.push_str(&format!("    /// Defaults: {}.\n", defaults.join(", ")));
        }

        let params: Vec<String> = method
            .params
            .iter()
            .map(|p| format!("{}: {}", sanitize_ident(&p.name), self.rust_param_type(&p.ty)))
            .collect();
        out.push_str(&format!(
            "    pub fn {}(&self{}) -> InteropResult<{}> {{\n",
            sanitize_ident(&method.name),
            params
                .iter()
                .map(|p| format!(", {p}"))
                .collect::<String>(),
            self.rust_ret_type(&method.return_type)
        ));

        let declaring = self
            .schema
            .declaring_class(&class.name, &method.name)
            .unwrap_or(&class.name);
        out.push_str(&format!(
            "        let bind = self.ctx().method_bind(\"{}\", \"{}\")?;\n",
            declaring, method.name
        ));

        let shape = CallShape {
            ret: lower(&method.return_type).expect("supported methods lower"),
            args: method
                .params
                .iter()
                .map(|p| lower(&p.ty).expect("supported methods lower"))
                .collect(),
        };
        let call_args: Vec<String> = method
            .params
            .iter()
            .map(|p| self.call_expr(&p.ty, &sanitize_ident(&p.name)))
            .collect();
        self.emit_dispatch(&shape, &method.return_type, &call_args, out);
        shapes.insert(shape);

        out.push_str("    }\n\n");
    }

    fn emit_property(
        &self,
        class: &ClassDescriptor,
        property: &PropertyDescriptor,
        out: &mut String,
        shapes: &mut BTreeSet<CallShape>,
    ) {
        let Some(value_tag) = lower(&property.ty) else {
            return;
        };
        if value_tag == SlotTag::Unit {
            return;
        }

        let getter_name = sanitize_ident(&property.name);
        let setter_name = format!("set_{}", sanitize_ident(&property.name));
        let collides = |name: &str| {
            class
                .methods
                .iter()
                .any(|m| !m.is_callback && sanitize_ident(&m.name) == name)
        };

        if !collides(&getter_name) {
            self.emit_getter(class, property, &getter_name, value_tag, out, shapes);
        }
        if !collides(&setter_name) {
            self.emit_setter(class, property, &setter_name, value_tag, out, shapes);
        }
    }

    fn emit_getter(
        &self,
        class: &ClassDescriptor,
        property: &PropertyDescriptor,
        name: &str,
        value_tag: SlotTag,
        out: &mut String,
        shapes: &mut BTreeSet<CallShape>,
    ) {
        let ret = self.rust_ret_type(&property.ty);
        out.push_str(&format!(
            "    pub fn {}(&self) -> InteropResult<{}> {{\n",
            name, ret
        ));
        match &property.getter {
            Some(getter) => {
                let declaring = self
                    .schema
                    .declaring_class(&class.name, getter)
                    .unwrap_or(&class.name);
                out.push_str(&format!(
                    "        let bind = self.ctx().method_bind(\"{}\", \"{}\")?;\n",
                    declaring, getter
                ));
                let (args, call_args) = indexed_prefix(property);
                let shape = CallShape { ret: value_tag, args };
                self.emit_dispatch(&shape, &property.ty, &call_args, out);
                shapes.insert(shape);
            }
            None => {
                self.emit_accessor_missing(class, property, "Getter", out);
            }
        }
        out.push_str("    }\n\n");
    }

    fn emit_setter(
        &self,
        class: &ClassDescriptor,
        property: &PropertyDescriptor,
        name: &str,
        value_tag: SlotTag,
        out: &mut String,
        shapes: &mut BTreeSet<CallShape>,
    ) {
        let value_param = if property.setter.is_some() { "value" } else { "_value" };
        out.push_str(&format!(
            "    pub fn {}(&self, {}: {}) -> InteropResult<()> {{\n",
            name,
            value_param,
            self.rust_param_type(&property.ty)
        ));
        match &property.setter {
            Some(setter) => {
                let declaring = self
                    .schema
                    .declaring_class(&class.name, setter)
                    .unwrap_or(&class.name);
                out.push_str(&format!(
                    "        let bind = self.ctx().method_bind(\"{}\", \"{}\")?;\n",
                    declaring, setter
                ));
                let (mut args, mut call_args) = indexed_prefix(property);
                args.push(value_tag);
                call_args.push(self.call_expr(&property.ty, "value"));
                let shape = CallShape { ret: SlotTag::Unit, args };
                self.emit_dispatch(&shape, &SemanticType::Void, &call_args, out);
                shapes.insert(shape);
            }
            None => {
                self.emit_accessor_missing(class, property, "Setter", out);
            }
        }
        out.push_str("    }\n\n");
    }

    fn emit_accessor_missing(
        &self,
        class: &ClassDescriptor,
        property: &PropertyDescriptor,
        accessor: &str,
        out: &mut String,
    ) {
        out.push_str(&format!(
            "        Err(InteropError::AccessorMissing {{\n            class: \"{}\".to_string(),\n            property: \"{}\".to_string(),\n            accessor: Accessor::{},\n        }})\n",
            class.name, property.name, accessor
        ));
    }

    /// Emit the icall invocation plus result conversion for one member.
    fn emit_dispatch(
        &self,
        shape: &CallShape,
        ret: &SemanticType,
        call_args: &[String],
        out: &mut String,
    ) {
        let call = format!(
            "icalls::{}(self.ctx(), bind, self.handle(){})",
            shape.icall_name(),
            call_args
                .iter()
                .map(|a| format!(", {a}"))
                .collect::<String>()
        );
        match ret {
            SemanticType::Void => {
                out.push_str(&format!("        unsafe {{ {call} }};\n        Ok(())\n"));
            }
            SemanticType::Object(target) => {
                out.push_str(&format!("        let raw = unsafe {{ {call} }};\n"));
                out.push_str(&format!(
                    "        Ok((!raw.is_null()).then(|| {}::from_handle(self.ctx().clone(), raw)))\n",
                    target
                ));
            }
            SemanticType::Enum { class, name } if !class.is_empty() => {
                out.push_str(&format!("        let raw = unsafe {{ {call} }};\n"));
                out.push_str(&format!("        {}::from_host(raw)\n", enum_rust_name(class, name)));
            }
            _ => {
                out.push_str(&format!("        Ok(unsafe {{ {call} }})\n"));
            }
        }
    }

    fn emit_enums(&self, class: &ClassDescriptor, out: &mut String) {
        for descriptor in &class.enums {
            let rust_name = enum_rust_name(&class.name, &descriptor.name);
            let mut entries: Vec<(i64, &String)> =
                descriptor.values.iter().map(|(name, &value)| (value, name)).collect();
            entries.sort();

            out.push_str(&format!("/// Host enum `{}.{}`.\n", class.name, descriptor.name));
            out.push_str(
                "#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]\n",
            );
            out.push_str("#[repr(i64)]\n");
            out.push_str(&format!("pub enum {} {{\n", rust_name));
            for (value, name) in entries {
                out.push_str(&format!("    {} = {},\n", variant_ident(name), value));
            }
            out.push_str("}\n\n");
        }
    }

    fn emit_virtuals(&self, class: &ClassDescriptor, out: &mut String) {
        let supertrait = class
            .base_class
            .as_ref()
            .map(|base| format!(": {base}Virtuals"))
            .unwrap_or_default();

        out.push_str(&format!(
            "/// Overridable host callbacks of `{}`.\n",
            class.name
        ));
        out.push_str("#[allow(unused_variables)]\n");
        out.push_str(&format!("pub trait {}Virtuals{} {{\n", class.name, supertrait));
        let mut any = false;
        for method in &class.methods {
            if !method.is_callback || !method_supported(method) {
                continue;
            }
            let params: Vec<String> = method
                .params
                .iter()
                .map(|p| {
                    format!(
                        "{}: {}",
                        sanitize_ident(&p.name),
                        self.callback_param_type(&p.ty)
                    )
                })
                .collect();
            out.push_str(&format!(
                "    fn {}(&mut self{}) {{}}\n\n",
                sanitize_ident(method.name.trim_start_matches('_')),
                params
                    .iter()
                    .map(|p| format!(", {p}"))
                    .collect::<String>()
            ));
            any = true;
        }
        if any {
            out.pop();
        }
        out.push_str("}\n\n");
    }

    fn check_references(&self, class: &ClassDescriptor) -> SchemaResult<()> {
        let mut check = |ty: &SemanticType| -> SchemaResult<()> {
            match ty {
                SemanticType::Object(target) => {
                    if self.schema.class(target).is_none() {
                        return Err(SchemaError::UnknownType {
                            class: class.name.clone(),
                            referenced: target.clone(),
                        });
                    }
                }
                SemanticType::Enum { class: owner, name } if !owner.is_empty() => {
                    let known = self
                        .schema
                        .class(owner)
                        .is_some_and(|c| c.enums.iter().any(|e| &e.name == name));
                    if !known {
                        return Err(SchemaError::UnknownType {
                            class: class.name.clone(),
                            referenced: format!("{owner}::{name}"),
                        });
                    }
                }
                _ => {}
            }
            Ok(())
        };

        for method in &class.methods {
            if !method_supported(method) {
                continue;
            }
            check(&method.return_type)?;
            for param in &method.params {
                check(&param.ty)?;
            }
        }
        for property in &class.properties {
            if lower(&property.ty).is_some() {
                check(&property.ty)?;
            }
        }
        Ok(())
    }

    fn rust_param_type(&self, ty: &SemanticType) -> String {
        match ty {
            SemanticType::Bool => "bool".to_string(),
            SemanticType::Int => "i64".to_string(),
            SemanticType::Float => "f32".to_string(),
            SemanticType::Str => "&str".to_string(),
            SemanticType::Core(kind) => format!("&{}", kind.rust_name()),
            SemanticType::Enum { class, name } if !class.is_empty() => enum_rust_name(class, name),
            SemanticType::Enum { .. } => "i64".to_string(),
            SemanticType::Object(target) => format!("&{target}"),
            SemanticType::Void | SemanticType::Opaque(_) => unreachable!("filtered before emission"),
        }
    }

    fn callback_param_type(&self, ty: &SemanticType) -> String {
        match ty {
            SemanticType::Str => "String".to_string(),
            SemanticType::Core(kind) => kind.rust_name().to_string(),
            SemanticType::Object(target) => format!("Option<{target}>"),
            other => self.rust_param_type(other),
        }
    }

    fn rust_ret_type(&self, ty: &SemanticType) -> String {
        match ty {
            SemanticType::Void => "()".to_string(),
            SemanticType::Bool => "bool".to_string(),
            SemanticType::Int => "i64".to_string(),
            SemanticType::Float => "f32".to_string(),
            SemanticType::Str => "String".to_string(),
            SemanticType::Core(kind) => kind.rust_name().to_string(),
            SemanticType::Enum { class, name } if !class.is_empty() => enum_rust_name(class, name),
            SemanticType::Enum { .. } => "i64".to_string(),
            SemanticType::Object(target) => format!("Option<{target}>"),
            SemanticType::Opaque(_) => unreachable!("filtered before emission"),
        }
    }

    /// The expression handed to the call shim for one wrapper argument.
    fn call_expr(&self, ty: &SemanticType, name: &str) -> String {
        match ty {
            SemanticType::Object(_) => format!("{name}.handle()"),
            SemanticType::Enum { class, .. } if !class.is_empty() => format!("{name}.to_host()"),
            _ => name.to_string(),
        }
    }

    fn generate_icalls_from(&self, shapes: &BTreeSet<CallShape>) -> String {
        let any_str_ret = shapes.iter().any(|s| s.ret == SlotTag::Str);
        let any_value = shapes
            .iter()
            .any(|s| {
                matches!(s.ret, SlotTag::Value(_))
                    || s.args.iter().any(|a| matches!(a, SlotTag::Value(_)))
            });

        let mut out = String::new();
        out.push_str("//! Call shims, one per distinct member shape. Generated file.\n\n");
        if any_str_ret {
            out.push_str("use gdnr_core::dispatch::{raw_call, take_string_ret};\n");
            out.push_str("use gdnr_core::handle::{HostString, ObjectHandle, Void};\n");
        } else {
            out.push_str("use gdnr_core::dispatch::raw_call;\n");
            out.push_str("use gdnr_core::handle::{ObjectHandle, Void};\n");
        }
        out.push_str("use gdnr_core::host::{HostContext, MethodBind};\n");
        if any_value {
            out.push_str("use gdnr_core::types::*;\n");
        }
        out.push('\n');

        for shape in shapes {
            self.emit_shape(shape, &mut out);
        }
        while out.ends_with("\n\n") {
            out.pop();
        }
        out
    }

    fn emit_shape(&self, shape: &CallShape, out: &mut String) {
        out.push_str("/// # Safety\n");
        out.push_str("/// The instance must be alive and the resolved target must match this shape.\n");
        out.push_str(&format!("pub unsafe fn {}(\n", shape.icall_name()));
        out.push_str("    ctx: &HostContext,\n    bind: MethodBind,\n    this: ObjectHandle,\n");
        for (i, arg) in shape.args.iter().enumerate() {
            let ty = match arg {
                SlotTag::I64 => "i64".to_string(),
                SlotTag::F32 => "f32".to_string(),
                SlotTag::Bool => "bool".to_string(),
                SlotTag::Str => "&str".to_string(),
                SlotTag::Obj => "ObjectHandle".to_string(),
                SlotTag::Value(kind) => format!("&{}", kind.rust_name()),
                SlotTag::Unit => unreachable!("unit never appears in argument position"),
            };
            out.push_str(&format!("    arg{i}: {ty},\n"));
        }
        let ret_ty = match shape.ret {
            SlotTag::Unit => None,
            SlotTag::I64 => Some("i64".to_string()),
            SlotTag::F32 => Some("f32".to_string()),
            SlotTag::Bool => Some("bool".to_string()),
            SlotTag::Str => Some("String".to_string()),
            SlotTag::Obj => Some("ObjectHandle".to_string()),
            SlotTag::Value(kind) => Some(kind.rust_name().to_string()),
        };
        match &ret_ty {
            Some(ty) => out.push_str(&format!(") -> {ty} {{\n")),
            None => out.push_str(") {\n"),
        }

        // Host strings are allocated for the call and released right after.
        for (i, arg) in shape.args.iter().enumerate() {
            if *arg == SlotTag::Str {
                out.push_str(&format!(
                    "    let host_arg{i} = ctx.backend().string_new(arg{i});\n"
                ));
            }
        }

        let slots: Vec<String> = shape
            .args
            .iter()
            .enumerate()
            .map(|(i, arg)| match arg {
                SlotTag::Str => format!("host_arg{i}.as_ptr()"),
                SlotTag::Obj => format!("arg{i}.as_ptr()"),
                SlotTag::Value(kind) => {
                    format!("arg{i} as *const {} as *const Void", kind.rust_name())
                }
                _ => format!("(&arg{i}) as *const _ as *const Void"),
            })
            .collect();
        let args_expr = if slots.is_empty() {
            "&[]".to_string()
        } else {
            out.push_str(&format!("    let args = [{}];\n", slots.join(", ")));
            "&args".to_string()
        };

        let ret_init = match shape.ret {
            SlotTag::Unit => None,
            SlotTag::I64 => Some("let mut ret: i64 = 0;".to_string()),
            SlotTag::F32 => Some("let mut ret: f32 = 0.0;".to_string()),
            SlotTag::Bool => Some("let mut ret = false;".to_string()),
            SlotTag::Str => Some("let mut ret = HostString::from_mut(std::ptr::null_mut());".to_string()),
            SlotTag::Obj => Some("let mut ret = ObjectHandle::null();".to_string()),
            SlotTag::Value(kind) => Some(format!("let mut ret = {}::default();", kind.rust_name())),
        };
        if let Some(init) = &ret_init {
            out.push_str(&format!("    {init}\n"));
        }
        let ret_ptr = if ret_init.is_some() {
            "(&mut ret) as *mut _ as *mut Void"
        } else {
            "std::ptr::null_mut()"
        };
        out.push_str(&format!(
            "    unsafe {{ raw_call(ctx, bind, this, {args_expr}, {ret_ptr}) }};\n"
        ));
        for (i, arg) in shape.args.iter().enumerate() {
            if *arg == SlotTag::Str {
                out.push_str(&format!("    ctx.backend().string_free(host_arg{i});\n"));
            }
        }
        match shape.ret {
            SlotTag::Unit => {}
            SlotTag::Str => out.push_str("    unsafe { take_string_ret(ctx, ret) }\n"),
            _ => out.push_str("    ret\n"),
        }
        out.push_str("}\n\n");
    }
}

fn method_supported(method: &MethodDescriptor) -> bool {
    !method.has_varargs
        && lower(&method.return_type).is_some()
        && method.params.iter().all(|p| lower(&p.ty).is_some())
}

fn indexed_prefix(property: &PropertyDescriptor) -> (Vec<SlotTag>, Vec<String>) {
    match property.index {
        Some(index) => (vec![SlotTag::I64], vec![format!("{index}i64")]),
        None => (Vec::new(), Vec::new()),
    }
}

fn enum_rust_name(class: &str, name: &str) -> String {
    if name.starts_with(class) {
        name.to_string()
    } else {
        format!("{class}{name}")
    }
}

fn render_default(default: &DefaultValue) -> String {
    match default {
        DefaultValue::Bool(v) => v.to_string(),
        DefaultValue::Int(v) => v.to_string(),
        DefaultValue::Float(v) => v.to_string(),
        DefaultValue::Str(v) => format!("\"{v}\""),
        DefaultValue::Null => "null".to_string(),
        DefaultValue::CoreLiteral { kind, components } => format!(
            "{}({})",
            kind.rust_name(),
            components
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        DefaultValue::Verbatim(v) => v.clone(),
    }
}

/// Lowercase with an underscore before an uppercase run that follows a
/// lowercase letter. `TimerProcessMode` becomes `timer_process_mode`.
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_ascii_lowercase();
        }
    }
    out
}

/// `TIMER_PROCESS_PHYSICS` becomes `TimerProcessPhysics`.
fn variant_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for part in name.split('_').filter(|p| !p.is_empty()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars.map(|c| c.to_ascii_lowercase()));
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, 'V');
    }
    out
}

fn const_ident(name: &str) -> String {
    sanitize_ident(name).to_ascii_uppercase()
}

/// Identifier-safe member name. Schema names use `/` and `.` as path
/// separators (`shadow/enabled`-style properties); those and any other
/// non-identifier characters map to `_`. Reserved words get a trailing
/// underscore, leading digits a leading one.
fn sanitize_ident(name: &str) -> String {
    const KEYWORDS: &[&str] = &[
        "as", "box", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
        "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
        "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
        "unsafe", "use", "where", "while", "yield",
    ];
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if KEYWORDS.contains(&out.as_str()) {
        out.push('_');
    }
    out
}
