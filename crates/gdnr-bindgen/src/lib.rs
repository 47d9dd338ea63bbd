//! Build-time binding generation.
//!
//! Consumes the host's introspection JSON and a project's registration
//! config, and emits the per-class wrapper sources, call shims and manifest
//! fragments a plugin crate compiles against the runtime crate.
//!
//! ## Modules
//!
//! - [`schema`]: serde model of the raw introspection document
//! - [`model`]: validated class descriptor graph ([`model::ApiSchema`])
//! - [`generator`]: deterministic per-class source emission
//! - [`entry`]: manifest fragment generation from registration config
//! - [`error`]: schema and generation errors

pub mod entry;
pub mod error;
pub mod generator;
pub mod model;
pub mod schema;

pub use entry::{RegistrationGroup, generate_entry, generate_entry_checked, load_registrations};
pub use error::{SchemaError, SchemaResult};
pub use generator::{CodeGenerator, GeneratedUnit, GenerationReport};
pub use model::{
    ApiSchema, ClassDescriptor, ClassFlags, CoreKind, DefaultValue, EnumDescriptor,
    MethodDescriptor, ParamDescriptor, PropertyDescriptor, SemanticType, SignalDescriptor,
};
