//! Manifest fragment generation from project registration config.
//!
//! A project declares registration groups: a group name, the library
//! resource path the host loads, and the classes that library provides.
//! The registrar normalizes paths to the host's `res://` scheme and emits
//! one source fragment building the manifest table the loader reads.

use crate::error::{SchemaError, SchemaResult};
use crate::model::ApiSchema;
use serde::Deserialize;
use std::path::Path;

/// One registration group from project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistrationGroup {
    pub name: String,
    #[serde(default)]
    pub library_path: String,
    #[serde(default)]
    pub classes: Vec<String>,
}

impl RegistrationGroup {
    /// The library path in the host's resource-path convention.
    ///
    /// An empty path defaults to `res://<group>.gdnlib`; a path without the
    /// scheme gets it prepended. Paths already carrying the scheme pass
    /// through untouched.
    pub fn normalized_library_path(&self) -> String {
        if self.library_path.is_empty() {
            format!("res://{}.gdnlib", self.name)
        } else if self.library_path.starts_with("res://") {
            self.library_path.clone()
        } else {
            format!("res://{}", self.library_path)
        }
    }
}

/// Read registration groups from a JSON config file.
pub fn load_registrations(path: &Path) -> SchemaResult<Vec<RegistrationGroup>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Emit the manifest table for the given groups.
///
/// A group with no classes still emits a valid empty entry so the host sees
/// the library, but it is almost always a config mistake and is logged.
pub fn generate_entry(groups: &[RegistrationGroup]) -> String {
    let mut out = String::new();
    out.push_str("// Generated file. Do not edit.\n\n");
    out.push_str("use gdnr_core::prelude::LibraryManifest;\n\n");
    out.push_str("pub static LIBRARY_MANIFESTS: &[LibraryManifest] = &[\n");
    for group in groups {
        if group.classes.is_empty() {
            log::warn!(
                "registration group '{}' lists no classes; emitting an empty manifest entry",
                group.name
            );
        }
        out.push_str("    LibraryManifest {\n");
        out.push_str(&format!(
            "        library: \"{}\",\n",
            group.normalized_library_path()
        ));
        let classes: Vec<String> = group.classes.iter().map(|c| format!("\"{c}\"")).collect();
        out.push_str(&format!("        classes: &[{}],\n", classes.join(", ")));
        out.push_str("    },\n");
    }
    out.push_str("];\n");
    out
}

/// Like [`generate_entry`], but rejects classes the schema does not define.
pub fn generate_entry_checked(
    groups: &[RegistrationGroup],
    schema: &ApiSchema,
) -> SchemaResult<String> {
    for group in groups {
        for class in &group.classes {
            if schema.class(class).is_none() {
                return Err(SchemaError::UnknownClass {
                    group: group.name.clone(),
                    class: class.clone(),
                });
            }
        }
    }
    Ok(generate_entry(groups))
}
