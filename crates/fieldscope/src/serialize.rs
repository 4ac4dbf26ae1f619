//! Structural text rendering of introspectable values
//!
//! Objects render as `{name: value, ...}` in field order, sequences as
//! `[a, b]`, strings quoted with `"` and `\` escaped. The output is a pure
//! function of the value's structure, so equal values render identically.

use crate::access::PrivilegedAccessor;
use crate::config::SerializerConfig;
use crate::descriptor::capabilities;
use crate::error::{FieldscopeError, Result};
use crate::model::Introspect;
use crate::registry::TypeRegistry;
use crate::value::{format_float, FieldValue};

/// Depth-first, pre-order serializer that always sees hidden fields
#[derive(Debug)]
pub struct Serializer<'r> {
    registry: &'r TypeRegistry,
    accessor: PrivilegedAccessor,
    config: SerializerConfig,
}

impl Serializer<'static> {
    /// Serializer over the process-wide registry
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::global())
    }
}

impl Default for Serializer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Serializer<'r> {
    #[must_use]
    pub fn with_registry(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            accessor: PrivilegedAccessor,
            config: SerializerConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: SerializerConfig) -> Self {
        self.config = config;
        self
    }

    /// Render an object and everything reachable from it
    pub fn serialize(&self, value: &dyn Introspect) -> Result<String> {
        let mut out = String::new();
        self.write_object(&mut out, value, 1)?;
        Ok(out)
    }

    /// Render a free-standing field value
    pub fn serialize_value(&self, value: &FieldValue<'_>) -> Result<String> {
        let mut out = String::new();
        self.write_value(&mut out, value, 0, "value")?;
        Ok(out)
    }

    fn enter(&self, depth: usize, type_name: &str) -> Result<()> {
        let limit = self.config.max_depth;
        if limit != 0 && depth > limit {
            tracing::warn!(type_name, limit, "serialization depth limit exceeded");
            return Err(FieldscopeError::CycleOrDepthExceeded {
                type_name: type_name.to_string(),
                limit,
            });
        }
        Ok(())
    }

    fn write_object(&self, out: &mut String, value: &dyn Introspect, depth: usize) -> Result<()> {
        let descriptor = self.registry.describe(value.declaration());
        self.enter(depth, descriptor.type_name())?;

        if descriptor.supports_capability(capabilities::OPAQUE) {
            out.push('<');
            out.push_str(descriptor.type_name());
            out.push('>');
            return Ok(());
        }

        out.push('{');
        for (index, field) in descriptor.fields().iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            out.push_str(&field.name);
            out.push_str(": ");
            match self.accessor.read(value, field) {
                Some(current) => self.write_value(out, &current, depth, descriptor.type_name())?,
                None => {
                    tracing::warn!(
                        type_name = descriptor.type_name(),
                        field = %field.name,
                        "declared field has no value; rendered as null"
                    );
                    out.push_str("null");
                }
            }
        }
        out.push('}');
        Ok(())
    }

    // `depth` is the depth of the container holding `value`; `owner` names
    // it in depth errors raised for sequences.
    fn write_value(&self, out: &mut String, value: &FieldValue<'_>, depth: usize, owner: &str) -> Result<()> {
        match value {
            FieldValue::Null => out.push_str("null"),
            FieldValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            FieldValue::Int(i) => out.push_str(&i.to_string()),
            FieldValue::Float(x) => out.push_str(&format_float(*x)),
            FieldValue::Str(s) => write_quoted(out, s),
            FieldValue::Object(object) => self.write_object(out, &**object, depth + 1)?,
            FieldValue::Sequence(items) => {
                self.enter(depth + 1, owner)?;
                out.push('[');
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    self.write_value(out, item, depth + 1, owner)?;
                }
                out.push(']');
            }
        }
        Ok(())
    }
}

fn write_quoted(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

/// Serialize against the process-wide registry with default settings
pub fn serialize(value: &dyn Introspect) -> Result<String> {
    Serializer::new().serialize(value)
}
