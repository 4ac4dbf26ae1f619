//! Field reads and the visibility override
//!
//! Ordinary reads respect a field's declared visibility. Privileged access
//! is an explicit, one-way grant on a [`FieldHandle`]; the validator and
//! serializer hold their own crate-private accessor instead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::descriptor::{FieldDescriptor, TypeDescriptor};
use crate::error::{FieldscopeError, Result};
use crate::model::Introspect;
use crate::registry::TypeRegistry;
use crate::value::FieldValue;

/// Proof that a raw field read was authorized by the object model.
///
/// Implementors of [`Introspect`] receive one but cannot construct one.
/// The token is neither `Clone` nor `Copy`; each read gets a fresh one.
///
/// ```compile_fail
/// fn duplicable<T: Clone>() {}
/// duplicable::<fieldscope::RawAccess>();
/// ```
#[derive(Debug)]
pub struct RawAccess {
    _private: (),
}

impl RawAccess {
    pub(crate) const fn grant() -> Self {
        Self { _private: () }
    }
}

/// A resolved field of one type, with its own visibility override
#[derive(Debug)]
pub struct FieldHandle {
    owner: Arc<TypeDescriptor>,
    index: usize,
    privileged: AtomicBool,
}

impl FieldHandle {
    /// Resolve `name` on the type of `value`
    pub fn lookup(registry: &TypeRegistry, value: &dyn Introspect, name: &str) -> Result<Self> {
        let owner = registry.describe(value.declaration());
        let index = owner
            .field_index(name)
            .ok_or_else(|| FieldscopeError::field_not_found(owner.type_name(), name))?;
        Ok(Self {
            owner,
            index,
            privileged: AtomicBool::new(false),
        })
    }

    pub fn owner(&self) -> &Arc<TypeDescriptor> {
        &self.owner
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.owner.fields()[self.index]
    }

    pub fn name(&self) -> &str {
        &self.descriptor().name
    }

    pub fn is_privileged(&self) -> bool {
        self.privileged.load(Ordering::Acquire)
    }

    /// Whether [`read`](Self::read) would pass the visibility check
    pub fn is_accessible(&self) -> bool {
        self.descriptor().visible || self.is_privileged()
    }

    /// Lift the visibility check for the rest of this handle's life.
    /// There is no way to revoke it.
    pub fn grant_privileged_access(&self) {
        if !self.privileged.swap(true, Ordering::AcqRel) {
            tracing::debug!(
                type_name = self.owner.type_name(),
                field = self.name(),
                visible = self.descriptor().visible,
                "privileged access granted"
            );
        }
    }

    /// Read the field from `target`, which must be a value of the owner type
    pub fn read<'v>(&self, target: &'v dyn Introspect) -> Result<FieldValue<'v>> {
        let actual = target.declaration().path;
        if actual != self.owner.type_path() {
            return Err(FieldscopeError::TypeMismatch {
                expected: self.owner.type_path().to_string(),
                actual: actual.to_string(),
            });
        }

        if !self.is_accessible() {
            return Err(FieldscopeError::AccessDenied {
                type_name: self.owner.type_name().to_string(),
                field: self.name().to_string(),
            });
        }

        target
            .field_value(self.name(), RawAccess::grant())
            .ok_or_else(|| FieldscopeError::field_not_found(self.owner.type_name(), self.name()))
    }
}

/// Reader that ignores visibility. Never handed to callers.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PrivilegedAccessor;

impl PrivilegedAccessor {
    pub(crate) fn read<'v>(
        &self,
        target: &'v dyn Introspect,
        field: &FieldDescriptor,
    ) -> Option<FieldValue<'v>> {
        if !field.visible {
            tracing::trace!(
                type_name = target.declaration().name,
                field = %field.name,
                "privileged read of hidden field"
            );
        }
        target.field_value(&field.name, RawAccess::grant())
    }
}

/// Resolve a field handle through the process-wide registry
pub fn field_handle(value: &dyn Introspect, name: &str) -> Result<FieldHandle> {
    FieldHandle::lookup(TypeRegistry::global(), value, name)
}

/// Read a field, respecting its visibility
pub fn read_field<'v>(value: &'v dyn Introspect, name: &str) -> Result<FieldValue<'v>> {
    field_handle(value, name)?.read(value)
}

/// Read a field with privileged access explicitly requested
pub fn read_field_privileged<'v>(value: &'v dyn Introspect, name: &str) -> Result<FieldValue<'v>> {
    let handle = field_handle(value, name)?;
    handle.grant_privileged_access();
    handle.read(value)
}
