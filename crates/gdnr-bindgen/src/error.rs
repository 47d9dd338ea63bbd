//! Build-time errors for schema parsing and code generation.
//!
//! Schema errors are fatal for the unit they concern: generation aborts for
//! the offending class rather than emitting partial output, but isolated
//! classes keep generating. Every variant names the schema entry it points
//! at so the offending document line can be located.

use thiserror::Error;

/// Malformed or inconsistent schema input, or an invalid registration.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Two classes share a name.
    #[error("duplicate class '{0}' in schema")]
    DuplicateClass(String),

    /// A class names a superclass the schema does not define.
    #[error("class '{class}' names missing superclass '{superclass}'")]
    MissingSuperclass { class: String, superclass: String },

    /// The inheritance chain loops back on itself.
    #[error("inheritance cycle through class '{0}'")]
    InheritanceCycle(String),

    /// Two enumerators of one enum share an integer value.
    #[error("duplicate enumerator value {value} in enum '{class}.{enum_name}'")]
    DuplicateEnumValue {
        class: String,
        enum_name: String,
        value: i64,
    },

    /// A parameter default literal does not parse under the uniform rule
    /// for its semantic type.
    #[error(
        "invalid default literal '{literal}' for parameter '{param}' of '{class}.{method}'"
    )]
    InvalidDefault {
        class: String,
        method: String,
        param: String,
        literal: String,
    },

    /// A member signature references a type the schema does not define.
    #[error("class '{class}' references unknown type '{referenced}'")]
    UnknownType { class: String, referenced: String },

    /// A registration group lists a class the schema does not define.
    #[error("registration group '{group}' lists unknown class '{class}'")]
    UnknownClass { group: String, class: String },

    /// The schema document could not be read.
    #[error("failed to read schema document: {0}")]
    Io(#[from] std::io::Error),

    /// The schema document is not valid JSON of the expected shape.
    #[error("malformed schema document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the bindgen crate.
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_offending_entry() {
        let err = SchemaError::DuplicateEnumValue {
            class: "Timer".to_string(),
            enum_name: "TimerProcessMode".to_string(),
            value: 1,
        };
        assert_eq!(
            format!("{err}"),
            "duplicate enumerator value 1 in enum 'Timer.TimerProcessMode'"
        );

        let err = SchemaError::MissingSuperclass {
            class: "Timer".to_string(),
            superclass: "Node".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "class 'Timer' names missing superclass 'Node'"
        );
    }
}
