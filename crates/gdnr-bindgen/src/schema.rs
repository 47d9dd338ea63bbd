//! Raw schema document model.
//!
//! The host describes its entire class surface in one JSON document: every
//! class with its superclass, enums, methods, properties, signals and
//! constants. This module is the serde mirror of that document, kept as
//! close to the wire shape as possible; validation and interpretation live
//! in [`model`](crate::model).

use crate::error::SchemaResult;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// One class entry as it appears in the schema document.
#[derive(Debug, Clone, Deserialize)]
pub struct RawClass {
    pub name: String,
    /// Empty for the root of the single-rooted hierarchy.
    #[serde(default)]
    pub base_class: String,
    #[serde(default = "default_api_type")]
    pub api_type: String,
    #[serde(default)]
    pub singleton: bool,
    #[serde(default)]
    pub singleton_name: String,
    #[serde(default)]
    pub instanciable: bool,
    #[serde(default)]
    pub is_reference: bool,
    #[serde(default)]
    pub constants: BTreeMap<String, i64>,
    #[serde(default)]
    pub properties: Vec<RawProperty>,
    #[serde(default)]
    pub signals: Vec<RawSignal>,
    #[serde(default)]
    pub methods: Vec<RawMethod>,
    #[serde(default)]
    pub enums: Vec<RawEnum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Empty when the property has no accessor in that direction.
    #[serde(default)]
    pub getter: String,
    #[serde(default)]
    pub setter: String,
    /// Non-negative for indexed properties; the index is passed as an extra
    /// leading integer argument to the accessors.
    #[serde(default = "default_index")]
    pub index: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSignal {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<RawArgument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMethod {
    pub name: String,
    #[serde(default = "default_return_type")]
    pub return_type: String,
    /// Host-invokable virtual callback rather than a leaf call.
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub has_varargs: bool,
    #[serde(default)]
    pub arguments: Vec<RawArgument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArgument {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub has_default_value: bool,
    /// Untyped text; parsed per semantic type by the model layer.
    #[serde(default)]
    pub default_value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEnum {
    pub name: String,
    /// Enumerator name to integer value, ordered by name.
    pub values: BTreeMap<String, i64>,
}

fn default_api_type() -> String {
    "core".to_string()
}

fn default_return_type() -> String {
    "void".to_string()
}

fn default_index() -> i64 {
    -1
}

/// Parse a schema document from JSON text.
pub fn parse_document(json: &str) -> SchemaResult<Vec<RawClass>> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a schema document from disk.
pub fn load_document(path: impl AsRef<Path>) -> SchemaResult<Vec<RawClass>> {
    let text = std::fs::read_to_string(path)?;
    parse_document(&text)
}
