//! The introspection contract every described type implements

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::access::RawAccess;
use crate::descriptor::{TypeDecl, TypeDescriptor};
use crate::registry::TypeRegistry;
use crate::value::FieldValue;

/// A value whose type can be asked what fields it has.
///
/// Usually generated by [`introspectable!`](crate::introspectable). Manual
/// implementations must answer `field_value` for every field named in
/// the declaration, including fields of the direct parent.
pub trait Introspect {
    /// Static shape of this value's type
    fn declaration(&self) -> &'static TypeDecl;

    /// Current value of the named field, without any visibility check.
    ///
    /// Only the object model can produce a [`RawAccess`], so callers go
    /// through [`read_field`](crate::access::read_field) or a
    /// [`FieldHandle`](crate::access::FieldHandle) instead.
    fn field_value(&self, name: &str, access: RawAccess) -> Option<FieldValue<'_>>;
}

/// Compile-time declaration, used to link a type to its parent
pub trait Declared {
    const DECL: TypeDecl;
}

/// Descriptor of a value's type, from the process-wide registry
pub fn describe_type(value: &dyn Introspect) -> Arc<TypeDescriptor> {
    TypeRegistry::global().describe(value.declaration())
}

/// Capability tags the type declares directly
pub fn list_capabilities(descriptor: &TypeDescriptor) -> BTreeSet<String> {
    descriptor.capabilities().clone()
}

/// Whether the type or one of its ancestors declares `tag`
pub fn supports_capability(descriptor: &TypeDescriptor, tag: &str) -> bool {
    descriptor.supports_capability(tag)
}
