//! Type and field descriptors
//!
//! A [`TypeDecl`] is the compile-time shape a type publishes. The registry
//! turns it into a [`TypeDescriptor`]: the immutable, cached description
//! that the validator and serializer walk.

use std::collections::BTreeSet;
use std::sync::{Arc, Weak};

use serde::Serialize;

use crate::constraints::{Constraint, ConstraintSpec};
use crate::error::{FieldscopeError, Result};
use crate::value::ValueKind;

/// Well-known capability tags
pub mod capabilities {
    /// The validator descends into objects of this type
    pub const CASCADE_VALIDATION: &str = "cascade-validation";

    /// The serializer prints `<TypeName>` instead of the fields
    pub const OPAQUE: &str = "opaque";
}

/// Which side of a declared range a bound applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
}

/// Compile-time declaration of one field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDecl {
    pub name: &'static str,
    pub kind: ValueKind,
    pub visible: bool,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl FieldDecl {
    /// A visible, unconstrained field
    #[must_use]
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            visible: true,
            minimum: None,
            maximum: None,
        }
    }

    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub const fn hidden(self) -> Self {
        self.visible(false)
    }

    #[must_use]
    pub const fn min(mut self, value: f64) -> Self {
        self.minimum = Some(value);
        self
    }

    #[must_use]
    pub const fn max(mut self, value: f64) -> Self {
        self.maximum = Some(value);
        self
    }

    /// Apply a list of bounds; a later bound on the same side wins
    #[must_use]
    pub const fn bounds(mut self, bounds: &[(Bound, f64)]) -> Self {
        let mut i = 0;
        while i < bounds.len() {
            match bounds[i] {
                (Bound::Min, value) => self.minimum = Some(value),
                (Bound::Max, value) => self.maximum = Some(value),
            }
            i += 1;
        }
        self
    }
}

/// Compile-time declaration of a type
#[derive(Debug)]
pub struct TypeDecl {
    /// Short name, used for display
    pub name: &'static str,
    /// Fully qualified identity, e.g. `my_crate::office::Desk`. Types are
    /// cached and compared by this, never by `name`.
    pub path: &'static str,
    /// Direct parent only
    pub parent: Option<&'static TypeDecl>,
    pub fields: &'static [FieldDecl],
    pub capabilities: &'static [&'static str],
}

/// Runtime description of one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: ValueKind,
    pub visible: bool,
    pub constraint: Option<Constraint>,
    /// Type that declared the field; differs from the owner for inherited fields
    pub declared_in: String,
}

impl FieldDescriptor {
    fn from_decl(decl: &FieldDecl, declared_in: &str) -> Self {
        let constraint = Constraint::new(decl.minimum, decl.maximum);
        Self {
            name: decl.name.to_string(),
            kind: decl.kind,
            visible: decl.visible,
            constraint: (!constraint.is_unbounded()).then_some(constraint),
            declared_in: declared_in.to_string(),
        }
    }
}

/// Immutable description of a type: its own fields plus those of its
/// direct parent, in declaration order.
#[derive(Debug, Serialize)]
pub struct TypeDescriptor {
    type_name: String,
    type_path: String,
    fields: Vec<FieldDescriptor>,
    // Fields before this index come from the parent
    #[serde(skip)]
    inherited: usize,
    parent_name: Option<String>,
    #[serde(skip)]
    parent: Option<Weak<TypeDescriptor>>,
    capabilities: BTreeSet<String>,
}

impl TypeDescriptor {
    /// Build from a declaration. Inherited fields come first; a field the
    /// child redeclares replaces the parent's.
    pub(crate) fn build(decl: &TypeDecl, parent: Option<&Arc<TypeDescriptor>>) -> Self {
        let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(decl.fields.len());

        if let Some(parent) = parent {
            for inherited in parent.declared_fields() {
                if decl.fields.iter().any(|own| own.name == inherited.name) {
                    continue;
                }
                fields.push(inherited.clone());
            }
        }
        let inherited = fields.len();

        for own in decl.fields {
            if fields.iter().any(|existing| existing.name == own.name) {
                tracing::warn!(
                    type_name = decl.name,
                    field = own.name,
                    "duplicate field declaration ignored"
                );
                continue;
            }
            fields.push(FieldDescriptor::from_decl(own, decl.name));
        }

        Self {
            type_name: decl.name.to_string(),
            type_path: decl.path.to_string(),
            fields,
            inherited,
            parent_name: parent.map(|p| p.type_name.clone()),
            parent: parent.map(Arc::downgrade),
            capabilities: decl.capabilities.iter().map(|tag| (*tag).to_string()).collect(),
        }
    }

    /// Replace one field's constraint before the descriptor is published
    pub(crate) fn attach_constraint(&mut self, spec: &ConstraintSpec) -> Result<()> {
        let type_name = &self.type_name;
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.name == spec.field)
            .ok_or_else(|| FieldscopeError::field_not_found(type_name, &spec.field))?;
        field.constraint = spec.constraint();
        Ok(())
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Qualified identity the registry keys on
    pub fn type_path(&self) -> &str {
        &self.type_path
    }

    /// All readable fields: the direct parent's, then this type's own
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub(crate) fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Fields this type declares itself
    pub fn declared_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields[self.inherited..].iter()
    }

    /// Fields that can be read without privileged access
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.visible)
    }

    pub fn parent(&self) -> Option<Arc<TypeDescriptor>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    /// Directly declared capability tags
    pub fn capabilities(&self) -> &BTreeSet<String> {
        &self.capabilities
    }

    /// Whether this type or any ancestor declares `tag`
    pub fn supports_capability(&self, tag: &str) -> bool {
        if self.capabilities.contains(tag) {
            return true;
        }
        self.parent().map_or(false, |parent| parent.supports_capability(tag))
    }

    /// Whether `type_name` (short or qualified) is this type or one of
    /// its ancestors
    pub fn is_a(&self, type_name: &str) -> bool {
        if self.type_name == type_name || self.type_path == type_name {
            return true;
        }
        self.parent().map_or(false, |parent| parent.is_a(type_name))
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_path == other.type_path
            && self.fields == other.fields
            && self.parent_name == other.parent_name
            && self.capabilities == other.capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static BASE: TypeDecl = TypeDecl {
        name: "Base",
        path: "tests::Base",
        parent: None,
        fields: &[
            FieldDecl::new("id", ValueKind::Int).min(0.0),
            FieldDecl::new("label", ValueKind::String).hidden(),
        ],
        capabilities: &["walkable"],
    };

    static CHILD: TypeDecl = TypeDecl {
        name: "Child",
        path: "tests::Child",
        parent: Some(&BASE),
        fields: &[
            FieldDecl::new("label", ValueKind::String),
            FieldDecl::new("speed", ValueKind::Int).bounds(&[(Bound::Min, 0.0), (Bound::Max, 200.0)]),
            FieldDecl::new("speed", ValueKind::Float),
        ],
        capabilities: &[],
    };

    #[test]
    fn test_inherited_fields_come_first() {
        let base = Arc::new(TypeDescriptor::build(&BASE, None));
        let child = TypeDescriptor::build(&CHILD, Some(&base));

        let names: Vec<_> = child.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "label", "speed"]);
        assert_eq!(child.field("id").unwrap().declared_in, "Base");
        assert_eq!(child.parent_name(), Some("Base"));
    }

    #[test]
    fn test_child_redeclaration_shadows_parent() {
        let base = Arc::new(TypeDescriptor::build(&BASE, None));
        let child = TypeDescriptor::build(&CHILD, Some(&base));

        let label = child.field("label").unwrap();
        assert!(label.visible);
        assert_eq!(label.declared_in, "Child");
    }

    #[test]
    fn test_duplicate_field_keeps_first() {
        let child = TypeDescriptor::build(&CHILD, None);
        let speed = child.field("speed").unwrap();
        assert_eq!(speed.kind, ValueKind::Int);
        assert_eq!(speed.constraint, Some(crate::constraints::range(0.0, 200.0)));
    }

    #[test]
    fn test_capabilities_are_direct_but_support_is_inherited() {
        let base = Arc::new(TypeDescriptor::build(&BASE, None));
        let child = TypeDescriptor::build(&CHILD, Some(&base));

        assert!(child.capabilities().is_empty());
        assert!(child.supports_capability("walkable"));
        assert!(child.is_a("Base"));
        assert!(!base.is_a("Child"));
    }

    #[test]
    fn test_attach_constraint_to_unknown_field() {
        let mut base = TypeDescriptor::build(&BASE, None);
        let err = base
            .attach_constraint(&ConstraintSpec::new("wings", Some(0.0), None))
            .unwrap_err();
        assert!(matches!(err, FieldscopeError::FieldNotFound { .. }));

        base.attach_constraint(&ConstraintSpec::new("id", None, None)).unwrap();
        assert_eq!(base.field("id").unwrap().constraint, None);
    }
}
