//! Runtime type introspection for Rust values
//!
//! Types publish a static declaration of their fields (usually through
//! [`introspectable!`]). From it the crate builds cached, immutable
//! [`TypeDescriptor`]s, and on top of those offers:
//!
//! - field reads that respect declared visibility, with an explicit
//!   privileged override ([`access`])
//! - range validation that reports every violation ([`validate`])
//! - a deterministic structural text serializer ([`serialize`])

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod access;
pub mod config;
pub mod constraints;
pub mod descriptor;
pub mod error;
pub mod macros;
pub mod model;
pub mod registry;
pub mod serialize;
pub mod validate;
pub mod value;

pub use access::{field_handle, read_field, read_field_privileged, FieldHandle, RawAccess};
pub use config::{FieldscopeConfig, SerializerConfig, ValidatorConfig};
pub use constraints::{Constraint, ConstraintSpec};
pub use descriptor::{capabilities, Bound, FieldDecl, FieldDescriptor, TypeDecl, TypeDescriptor};
pub use error::{FieldscopeError, Result};
pub use model::{describe_type, list_capabilities, supports_capability, Declared, Introspect};
pub use registry::TypeRegistry;
pub use serialize::{serialize, Serializer};
pub use validate::{validate, ValidationFailure, Validator, Violation};
pub use value::{AsFieldValue, FieldValue, ObjectRef, Scalar, ValueKind};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::{
        describe_type, introspectable, read_field, read_field_privileged, serialize, validate,
        AsFieldValue, Declared, FieldValue, FieldscopeError, Introspect, Result, Violation,
    };
}
