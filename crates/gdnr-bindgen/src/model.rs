//! Validated class descriptor graph.
//!
//! [`ApiSchema`] turns the raw document into the structure the generator
//! walks: classes with single-parent inheritance, members with parsed
//! semantic types, and defaults parsed under one uniform rule. All schema
//! inconsistencies are rejected here so the generator can assume a sound
//! graph.

use crate::error::{SchemaError, SchemaResult};
use crate::schema::{RawArgument, RawClass};
use bitflags::bitflags;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

bitflags! {
    /// Per-class capability flags from the schema document.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClassFlags: u8 {
        /// The host can allocate instances of this class.
        const INSTANCIABLE = 1 << 0;
        /// Host-side reference counting applies.
        const REFERENCE = 1 << 1;
        /// A single host-owned instance exists.
        const SINGLETON = 1 << 2;
        /// Only available in tool (editor) builds of the host.
        const TOOL = 1 << 3;
    }
}

/// The value-type kinds the codec layer supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CoreKind {
    Vector2,
    Vector3,
    Rect2,
    Color,
    Quat,
    Basis,
    Transform2D,
    Transform,
}

impl CoreKind {
    pub fn rust_name(&self) -> &'static str {
        match self {
            CoreKind::Vector2 => "Vector2",
            CoreKind::Vector3 => "Vector3",
            CoreKind::Rect2 => "Rect2",
            CoreKind::Color => "Color",
            CoreKind::Quat => "Quat",
            CoreKind::Basis => "Basis",
            CoreKind::Transform2D => "Transform2D",
            CoreKind::Transform => "Transform",
        }
    }

    fn from_schema_name(name: &str) -> Option<CoreKind> {
        Some(match name {
            "Vector2" => CoreKind::Vector2,
            "Vector3" => CoreKind::Vector3,
            "Rect2" => CoreKind::Rect2,
            "Color" => CoreKind::Color,
            "Quat" => CoreKind::Quat,
            "Basis" => CoreKind::Basis,
            "Transform2D" => CoreKind::Transform2D,
            "Transform" => CoreKind::Transform,
            _ => return None,
        })
    }
}

/// The semantic type of a parameter, return value or property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticType {
    Void,
    Bool,
    Int,
    Float,
    Str,
    /// A fixed-layout value type, copied across the boundary.
    Core(CoreKind),
    /// An integer-backed enum; `class` is empty for host-global enums.
    Enum { class: String, name: String },
    /// A reference to a host object of the named class.
    Object(String),
    /// Host types the curated surface crosses as a raw pointer (Variant,
    /// containers, paths, resource ids).
    Opaque(String),
}

impl SemanticType {
    /// Parse a schema type string.
    ///
    /// Enum references arrive as `enum.Class::Name` (or `enum.Name` for
    /// host-global enums). Anything that is neither a primitive, a value
    /// type, an enum nor a known opaque container is an object class.
    pub fn parse(raw: &str) -> SemanticType {
        match raw {
            "void" => return SemanticType::Void,
            "bool" => return SemanticType::Bool,
            "int" => return SemanticType::Int,
            "float" | "real" => return SemanticType::Float,
            "String" => return SemanticType::Str,
            _ => {}
        }
        if let Some(kind) = CoreKind::from_schema_name(raw) {
            return SemanticType::Core(kind);
        }
        if let Some(rest) = raw.strip_prefix("enum.") {
            let (class, name) = match rest.split_once("::") {
                Some((class, name)) => (class.to_string(), name.to_string()),
                None => (String::new(), rest.to_string()),
            };
            return SemanticType::Enum { class, name };
        }
        let opaque = matches!(
            raw,
            "Variant" | "Array" | "Dictionary" | "NodePath" | "RID"
        ) || (raw.starts_with("Pool") && raw.ends_with("Array"));
        if opaque {
            SemanticType::Opaque(raw.to_string())
        } else {
            SemanticType::Object(raw.to_string())
        }
    }
}

/// A default literal parsed under the uniform rule for its semantic type.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Null object or variant default.
    Null,
    /// A value-type constructor literal, e.g. `Vector2( 0, 0 )`.
    CoreLiteral { kind: CoreKind, components: Vec<f64> },
    /// Carried verbatim for opaque types; documented, never evaluated.
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    pub name: String,
    pub ty: SemanticType,
    pub default: Option<DefaultValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    pub name: String,
    pub return_type: SemanticType,
    /// Host-invokable virtual callback (overridable, default no-op) rather
    /// than a leaf call bound to a cached method bind.
    pub is_callback: bool,
    pub is_const: bool,
    pub has_varargs: bool,
    pub params: Vec<ParamDescriptor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub ty: SemanticType,
    pub getter: Option<String>,
    pub setter: Option<String>,
    /// Extra leading integer argument for indexed properties.
    pub index: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalDescriptor {
    pub name: String,
    pub args: Vec<(String, SemanticType)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    pub name: String,
    /// Enumerator name to value, ordered by name. Values are unique.
    pub values: BTreeMap<String, i64>,
}

/// One class of the host hierarchy with all of its members.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    pub name: String,
    /// `None` only for the hierarchy root.
    pub base_class: Option<String>,
    pub flags: ClassFlags,
    /// The host-registered global name for SINGLETON classes.
    pub singleton_name: Option<String>,
    pub constants: BTreeMap<String, i64>,
    pub enums: Vec<EnumDescriptor>,
    pub methods: Vec<MethodDescriptor>,
    pub properties: Vec<PropertyDescriptor>,
    pub signals: Vec<SignalDescriptor>,
}

impl ClassDescriptor {
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// The validated, indexed class graph.
#[derive(Debug, Clone)]
pub struct ApiSchema {
    classes: Vec<ClassDescriptor>,
    index: FxHashMap<String, usize>,
}

impl ApiSchema {
    /// Build and validate the graph from raw document entries.
    pub fn from_raw(raw: Vec<RawClass>) -> SchemaResult<ApiSchema> {
        let mut classes = Vec::with_capacity(raw.len());
        let mut index = FxHashMap::default();

        for raw_class in &raw {
            if index
                .insert(raw_class.name.clone(), classes.len())
                .is_some()
            {
                return Err(SchemaError::DuplicateClass(raw_class.name.clone()));
            }
            classes.push(Self::build_class(raw_class)?);
        }

        let schema = ApiSchema { classes, index };
        schema.check_hierarchy()?;
        Ok(schema)
    }

    /// Parse, build and validate from JSON text.
    pub fn from_json(json: &str) -> SchemaResult<ApiSchema> {
        Self::from_raw(crate::schema::parse_document(json)?)
    }

    pub fn classes(&self) -> &[ClassDescriptor] {
        &self.classes
    }

    pub fn class(&self, name: &str) -> Option<&ClassDescriptor> {
        self.index.get(name).map(|&i| &self.classes[i])
    }

    /// The superclass chain of `class`, starting at its direct parent.
    pub fn ancestors<'a>(&'a self, class: &str) -> impl Iterator<Item = &'a ClassDescriptor> {
        let mut current = self.class(class).and_then(|c| c.base_class.as_deref());
        std::iter::from_fn(move || {
            let desc = self.class(current?)?;
            current = desc.base_class.as_deref();
            Some(desc)
        })
    }

    /// The class whose name keys the symbol-table lookup for `method`
    /// reached through `class`: the topmost class in the inheritance chain
    /// that declares it. Using the concrete class instead would create
    /// duplicate or mismatched symbol-table entries across the chain.
    pub fn declaring_class(&self, class: &str, method: &str) -> Option<&str> {
        let own = self.class(class)?;
        let mut found = own.method(method).map(|_| own.name.as_str());
        for ancestor in self.ancestors(class) {
            if ancestor.method(method).is_some() {
                found = Some(ancestor.name.as_str());
            }
        }
        found
    }

    fn build_class(raw: &RawClass) -> SchemaResult<ClassDescriptor> {
        let mut flags = ClassFlags::empty();
        if raw.instanciable {
            flags |= ClassFlags::INSTANCIABLE;
        }
        if raw.is_reference {
            flags |= ClassFlags::REFERENCE;
        }
        if raw.singleton {
            flags |= ClassFlags::SINGLETON;
        }
        if raw.api_type == "tools" {
            flags |= ClassFlags::TOOL;
        }

        let mut enums = Vec::with_capacity(raw.enums.len());
        for raw_enum in &raw.enums {
            let mut seen = BTreeMap::new();
            for (name, &value) in &raw_enum.values {
                if let Some(_previous) = seen.insert(value, name) {
                    return Err(SchemaError::DuplicateEnumValue {
                        class: raw.name.clone(),
                        enum_name: raw_enum.name.clone(),
                        value,
                    });
                }
            }
            enums.push(EnumDescriptor {
                name: raw_enum.name.clone(),
                values: raw_enum.values.clone(),
            });
        }

        let mut methods = Vec::with_capacity(raw.methods.len());
        for raw_method in &raw.methods {
            let mut params = Vec::with_capacity(raw_method.arguments.len());
            for arg in &raw_method.arguments {
                params.push(Self::build_param(&raw.name, &raw_method.name, arg)?);
            }
            methods.push(MethodDescriptor {
                name: raw_method.name.clone(),
                return_type: SemanticType::parse(&raw_method.return_type),
                is_callback: raw_method.is_virtual || raw_method.name.starts_with('_'),
                is_const: raw_method.is_const,
                has_varargs: raw_method.has_varargs,
                params,
            });
        }

        let properties = raw
            .properties
            .iter()
            .map(|p| PropertyDescriptor {
                name: p.name.clone(),
                ty: SemanticType::parse(&p.ty),
                getter: (!p.getter.is_empty()).then(|| p.getter.clone()),
                setter: (!p.setter.is_empty()).then(|| p.setter.clone()),
                index: (p.index >= 0).then_some(p.index),
            })
            .collect();

        let signals = raw
            .signals
            .iter()
            .map(|s| SignalDescriptor {
                name: s.name.clone(),
                args: s
                    .arguments
                    .iter()
                    .map(|a| (a.name.clone(), SemanticType::parse(&a.ty)))
                    .collect(),
            })
            .collect();

        Ok(ClassDescriptor {
            name: raw.name.clone(),
            base_class: (!raw.base_class.is_empty()).then(|| raw.base_class.clone()),
            flags,
            singleton_name: (!raw.singleton_name.is_empty()).then(|| raw.singleton_name.clone()),
            constants: raw.constants.clone(),
            enums,
            methods,
            properties,
            signals,
        })
    }

    /// Parse one parameter, applying the uniform default-literal rule:
    /// booleans accept `true`/`false` in either case, integers and enums
    /// parse as `i64`, floats as `f64`, strings are taken verbatim (minus
    /// surrounding quotes), object defaults accept only null spellings,
    /// value types parse as `Name( c0, c1, ... )`, and opaque literals are
    /// carried verbatim.
    fn build_param(class: &str, method: &str, arg: &RawArgument) -> SchemaResult<ParamDescriptor> {
        let ty = SemanticType::parse(&arg.ty);
        let default = if arg.has_default_value {
            Some(
                Self::parse_default(&ty, &arg.default_value).ok_or_else(|| {
                    SchemaError::InvalidDefault {
                        class: class.to_string(),
                        method: method.to_string(),
                        param: arg.name.clone(),
                        literal: arg.default_value.clone(),
                    }
                })?,
            )
        } else {
            None
        };
        Ok(ParamDescriptor {
            name: arg.name.clone(),
            ty,
            default,
        })
    }

    fn parse_default(ty: &SemanticType, literal: &str) -> Option<DefaultValue> {
        let literal = literal.trim();
        match ty {
            SemanticType::Void => None,
            SemanticType::Bool => match literal {
                "true" | "True" => Some(DefaultValue::Bool(true)),
                "false" | "False" => Some(DefaultValue::Bool(false)),
                _ => None,
            },
            SemanticType::Int | SemanticType::Enum { .. } => {
                literal.parse::<i64>().ok().map(DefaultValue::Int)
            }
            SemanticType::Float => literal.parse::<f64>().ok().map(DefaultValue::Float),
            SemanticType::Str => Some(DefaultValue::Str(
                literal.trim_matches('"').to_string(),
            )),
            SemanticType::Object(_) => match literal {
                "" | "Null" | "null" | "[Object:null]" => Some(DefaultValue::Null),
                _ => None,
            },
            SemanticType::Core(kind) => {
                let inner = literal
                    .strip_prefix(kind.rust_name())?
                    .trim()
                    .strip_prefix('(')?
                    .strip_suffix(')')?;
                let mut components = Vec::new();
                for part in inner.split(',') {
                    components.push(part.trim().parse::<f64>().ok()?);
                }
                Some(DefaultValue::CoreLiteral {
                    kind: *kind,
                    components,
                })
            }
            SemanticType::Opaque(_) => {
                if literal.is_empty() || literal == "Null" || literal == "null" {
                    Some(DefaultValue::Null)
                } else {
                    Some(DefaultValue::Verbatim(literal.to_string()))
                }
            }
        }
    }

    fn check_hierarchy(&self) -> SchemaResult<()> {
        for class in &self.classes {
            let mut seen = vec![class.name.as_str()];
            let mut current = class.base_class.as_deref();
            while let Some(parent) = current {
                if seen.contains(&parent) {
                    return Err(SchemaError::InheritanceCycle(class.name.clone()));
                }
                let Some(parent_class) = self.class(parent) else {
                    return Err(SchemaError::MissingSuperclass {
                        class: class.name.clone(),
                        superclass: parent.to_string(),
                    });
                };
                seen.push(parent);
                current = parent_class.base_class.as_deref();
            }
        }
        Ok(())
    }
}
