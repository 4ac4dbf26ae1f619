//! Error types for the introspection toolkit

use thiserror::Error;

/// Errors raised by the object model and the serializer.
///
/// Validation findings are not errors; see [`crate::validate::Violation`].
#[derive(Error, Debug)]
pub enum FieldscopeError {
    /// The type declares no field of that name
    #[error("Field `{field}` not found on type `{type_name}`")]
    FieldNotFound { type_name: String, field: String },

    /// Non-privileged read of a hidden field
    #[error("Field `{field}` of type `{type_name}` is not visible; privileged access required")]
    AccessDenied { type_name: String, field: String },

    /// Serialization nested deeper than the configured limit
    #[error("Serializing `{type_name}` exceeded the depth limit of {limit} (reference cycle or nesting too deep)")]
    CycleOrDepthExceeded { type_name: String, limit: usize },

    /// Explicit registration of a type that already has a descriptor
    #[error("Type `{0}` is already registered")]
    AlreadyRegistered(String),

    /// A field handle was used against a value of another type
    #[error("Field handle for type `{expected}` used on a value of type `{actual}`")]
    TypeMismatch { expected: String, actual: String },

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FieldscopeError {
    pub(crate) fn field_not_found(type_name: &str, field: &str) -> Self {
        Self::FieldNotFound {
            type_name: type_name.to_string(),
            field: field.to_string(),
        }
    }

    /// Whether a privileged retry of the same read could succeed
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }
}

/// Result type alias for toolkit operations
pub type Result<T> = std::result::Result<T, FieldscopeError>;
