//! Process-wide cache of type descriptors

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::constraints::ConstraintSpec;
use crate::descriptor::{TypeDecl, TypeDescriptor};
use crate::error::{FieldscopeError, Result};

lazy_static::lazy_static! {
    static ref GLOBAL: TypeRegistry = TypeRegistry::new();
}

/// Descriptor cache keyed by qualified type path.
///
/// Lookups take a shared lock; only first-sight insertion takes the
/// exclusive lock. Entries are never evicted or replaced.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<String, Arc<TypeDescriptor>>>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process
    pub fn global() -> &'static TypeRegistry {
        &GLOBAL
    }

    /// Descriptor for `decl`, built and cached on first sight.
    ///
    /// Concurrent first sightings converge on the same `Arc`.
    pub fn describe(&self, decl: &TypeDecl) -> Arc<TypeDescriptor> {
        self.describe_within(decl, &mut Vec::new())
    }

    // `pending` holds the paths of descendants still being built
    fn describe_within(&self, decl: &TypeDecl, pending: &mut Vec<&'static str>) -> Arc<TypeDescriptor> {
        if let Some(found) = self.get(decl.path) {
            return found;
        }

        let parent = self.parent_of(decl, pending);
        let descriptor = TypeDescriptor::build(decl, parent.as_ref());
        self.insert_first(descriptor)
    }

    /// Register `decl` with constraints supplied from outside the type,
    /// each replacing the declared constraint of the named field.
    ///
    /// Fails if the type already has a descriptor, since descriptors are
    /// immutable once published.
    pub fn register(&self, decl: &TypeDecl, constraints: &[ConstraintSpec]) -> Result<Arc<TypeDescriptor>> {
        if self.get(decl.path).is_some() {
            return Err(FieldscopeError::AlreadyRegistered(decl.path.to_string()));
        }

        let parent = self.parent_of(decl, &mut Vec::new());
        let mut descriptor = TypeDescriptor::build(decl, parent.as_ref());
        for spec in constraints {
            descriptor.attach_constraint(spec)?;
        }

        let mut types = self.write();
        match types.entry(decl.path.to_string()) {
            Entry::Occupied(_) => Err(FieldscopeError::AlreadyRegistered(decl.path.to_string())),
            Entry::Vacant(slot) => {
                tracing::debug!(
                    type_path = decl.path,
                    constraints = constraints.len(),
                    "registered type"
                );
                Ok(Arc::clone(slot.insert(Arc::new(descriptor))))
            }
        }
    }

    /// Cached descriptor by qualified type path
    pub fn get(&self, type_path: &str) -> Option<Arc<TypeDescriptor>> {
        self.read().get(type_path).cloned()
    }

    /// Qualified paths of all described types, sorted
    pub fn type_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.read().keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A parent chain that loops back to a type under construction is cut
    // at the repeat.
    fn parent_of(&self, decl: &TypeDecl, pending: &mut Vec<&'static str>) -> Option<Arc<TypeDescriptor>> {
        let parent = decl.parent?;
        if parent.path == decl.path || pending.contains(&parent.path) {
            tracing::warn!(
                type_path = decl.path,
                parent = parent.path,
                "cyclic parent declaration ignored"
            );
            return None;
        }

        pending.push(decl.path);
        let described = self.describe_within(parent, pending);
        pending.pop();
        Some(described)
    }

    fn insert_first(&self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let mut types = self.write();
        match types.entry(descriptor.type_path().to_string()) {
            Entry::Occupied(existing) => Arc::clone(existing.get()),
            Entry::Vacant(slot) => {
                tracing::debug!(
                    type_path = descriptor.type_path(),
                    fields = descriptor.fields().len(),
                    "described type on first sight"
                );
                Arc::clone(slot.insert(Arc::new(descriptor)))
            }
        }
    }

    // A panic while holding the lock cannot leave a half-built entry, so
    // poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<TypeDescriptor>>> {
        self.types.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<TypeDescriptor>>> {
        self.types.write().unwrap_or_else(PoisonError::into_inner)
    }
}
