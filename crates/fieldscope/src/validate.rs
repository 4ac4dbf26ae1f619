//! Range validation over an object's declared fields

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::access::PrivilegedAccessor;
use crate::config::ValidatorConfig;
use crate::constraints::Constraint;
use crate::descriptor::{capabilities, FieldDescriptor, TypeDescriptor};
use crate::model::Introspect;
use crate::registry::TypeRegistry;
use crate::value::{FieldValue, Scalar};

/// One field whose value falls outside its constraint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub object_type_name: String,
    pub field_name: String,
    /// Location from the validated root, e.g. `desks[1].height`
    pub path: String,
    pub actual_value: Scalar,
    pub constraint: Constraint,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} = {} is outside {} (at `{}`)",
            self.object_type_name, self.field_name, self.actual_value, self.constraint, self.path
        )
    }
}

/// Raised only by [`Validator::check`], for callers that treat any
/// violation as fatal
#[derive(Debug, Error)]
#[error("{} constraint violation(s)", .violations.len())]
pub struct ValidationFailure {
    pub violations: Vec<Violation>,
}

/// Walks declared fields and reports every constraint violation.
///
/// Validation sees hidden fields too; it never raises.
#[derive(Debug)]
pub struct Validator<'r> {
    registry: &'r TypeRegistry,
    accessor: PrivilegedAccessor,
    config: ValidatorConfig,
}

impl Validator<'static> {
    /// Validator over the process-wide registry
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::global())
    }
}

impl Default for Validator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Validator<'r> {
    #[must_use]
    pub fn with_registry(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            accessor: PrivilegedAccessor,
            config: ValidatorConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// All violations found on `value`; empty means every constraint holds
    pub fn validate(&self, value: &dyn Introspect) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.walk(value, "", 1, &mut violations);
        violations
    }

    /// Like [`validate`](Self::validate), but fails on any violation
    pub fn check(&self, value: &dyn Introspect) -> Result<(), ValidationFailure> {
        let violations = self.validate(value);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure { violations })
        }
    }

    fn walk(&self, value: &dyn Introspect, prefix: &str, depth: usize, out: &mut Vec<Violation>) {
        let descriptor = self.registry.describe(value.declaration());

        for field in descriptor.fields() {
            let path = join_path(prefix, &field.name);
            let Some(current) = self.accessor.read(value, field) else {
                tracing::warn!(
                    type_name = descriptor.type_name(),
                    field = %field.name,
                    "declared field has no value; skipped"
                );
                continue;
            };

            if let Some(constraint) = &field.constraint {
                self.check_field(&descriptor, field, constraint, &current, &path, out);
            }
            self.cascade(&current, &path, depth, out);
        }
    }

    fn check_field(
        &self,
        descriptor: &TypeDescriptor,
        field: &FieldDescriptor,
        constraint: &Constraint,
        current: &FieldValue<'_>,
        path: &str,
        out: &mut Vec<Violation>,
    ) {
        if !field.kind.is_constraint_eligible() {
            tracing::debug!(
                type_name = descriptor.type_name(),
                field = %field.name,
                kind = %field.kind,
                "constraint on non-numeric field ignored"
            );
            return;
        }

        let Some(actual) = current.as_scalar() else {
            if !current.is_null() {
                tracing::warn!(
                    type_name = descriptor.type_name(),
                    field = %field.name,
                    "value does not match declared kind; constraint skipped"
                );
            }
            return;
        };

        if !constraint.admits(actual) {
            out.push(Violation {
                object_type_name: descriptor.type_name().to_string(),
                field_name: field.name.clone(),
                path: path.to_string(),
                actual_value: actual,
                constraint: *constraint,
            });
        }
    }

    // Descend into nested objects whose type opts in to cascading.
    fn cascade(&self, current: &FieldValue<'_>, path: &str, depth: usize, out: &mut Vec<Violation>) {
        match current {
            FieldValue::Object(object) => {
                let nested = self.registry.describe(object.declaration());
                if !nested.supports_capability(capabilities::CASCADE_VALIDATION) {
                    return;
                }
                if self.config.max_depth != 0 && depth >= self.config.max_depth {
                    tracing::warn!(
                        path,
                        max_depth = self.config.max_depth,
                        "cascading validation depth limit reached"
                    );
                    return;
                }
                self.walk(&**object, path, depth + 1, out);
            }
            FieldValue::Sequence(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.cascade(item, &format!("{}[{}]", path, index), depth, out);
                }
            }
            _ => {}
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// Validate against the process-wide registry with default settings
pub fn validate(value: &dyn Introspect) -> Vec<Violation> {
    Validator::new().validate(value)
}
