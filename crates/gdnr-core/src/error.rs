//! Runtime errors for the interop layer.
//!
//! Everything here is fatal from the plugin's point of view: a failed symbol
//! resolution, a missing property accessor, or an enum value the generated
//! bindings do not know about all indicate a broken contract between the
//! compiled plugin and the running host (usually version skew). None of these
//! conditions are converted to default values or silently ignored; they
//! propagate as `Result` up to the plugin boundary, where the host treats an
//! unrecoverable plugin fault as a load failure.

use thiserror::Error;

/// Which half of a property accessor pair was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    Getter,
    Setter,
}

impl std::fmt::Display for Accessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Accessor::Getter => write!(f, "getter"),
            Accessor::Setter => write!(f, "setter"),
        }
    }
}

/// Errors raised by the runtime interop layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InteropError {
    /// The process-wide host context was read before the host signalled
    /// readiness. Symbol resolution before this point would hand out tokens
    /// that misbehave on use, so the layer refuses up front.
    #[error("host context not initialized - the host has not signalled readiness yet")]
    HostNotReady,

    /// The process-wide host context was initialized twice.
    #[error("host context already initialized")]
    AlreadyInitialized,

    /// The host's symbol table has no entry for this (class, member) pair.
    #[error("no method bind for '{class}::{method}' in the host symbol table")]
    Resolution { class: String, method: String },

    /// The host refused to allocate an instance of this class.
    #[error("host failed to construct an instance of '{class}'")]
    ConstructFailed { class: String },

    /// A generated property wrapper was invoked for a property with no
    /// accessor in that direction. Never reported as a default value.
    #[error("property '{property}' on '{class}' has no {accessor}")]
    AccessorMissing {
        class: String,
        property: String,
        accessor: Accessor,
    },

    /// A decoded integer matches no enumerator of the target enum type.
    /// Signals out-of-date bindings or a host/plugin version mismatch.
    #[error("value {value} is not a known enumerator of {enum_name}")]
    EnumDecode {
        enum_name: &'static str,
        value: i64,
    },
}

/// Result alias used throughout the runtime layer.
pub type InteropResult<T> = Result<T, InteropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_error_names_class_and_member() {
        let err = InteropError::Resolution {
            class: "Timer".to_string(),
            method: "set_wait_time".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "no method bind for 'Timer::set_wait_time' in the host symbol table"
        );
    }

    #[test]
    fn accessor_error_names_property_and_direction() {
        let err = InteropError::AccessorMissing {
            class: "Widget".to_string(),
            property: "size".to_string(),
            accessor: Accessor::Getter,
        };
        assert_eq!(format!("{err}"), "property 'size' on 'Widget' has no getter");
    }

    #[test]
    fn enum_decode_error_names_type_and_value() {
        let err = InteropError::EnumDecode {
            enum_name: "TimerProcessMode",
            value: 99,
        };
        assert_eq!(
            format!("{err}"),
            "value 99 is not a known enumerator of TimerProcessMode"
        );
    }
}
