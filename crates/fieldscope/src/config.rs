//! Toolkit configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Serializer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    /// Deepest nesting of objects and sequences before serialization fails.
    /// The root object is depth 1; `0` disables the guard.
    pub max_depth: usize,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// Validator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// How deep cascading validation may descend; `0` means unbounded
    pub max_depth: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self { max_depth: 16 }
    }
}

/// Top-level configuration, usually read from TOML:
///
/// ```toml
/// [serializer]
/// max_depth = 32
///
/// [validator]
/// max_depth = 8
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldscopeConfig {
    pub serializer: SerializerConfig,
    pub validator: ValidatorConfig,
}

impl FieldscopeConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = FieldscopeConfig::from_toml_str("").unwrap();
        assert_eq!(config, FieldscopeConfig::default());
        assert_eq!(config.serializer.max_depth, 64);
        assert_eq!(config.validator.max_depth, 16);
    }

    #[test]
    fn test_partial_override() {
        let config = FieldscopeConfig::from_toml_str("[serializer]\nmax_depth = 0\n").unwrap();
        assert_eq!(config.serializer.max_depth, 0);
        assert_eq!(config.validator, ValidatorConfig::default());
    }

    #[test]
    fn test_malformed_document_is_config_error() {
        let err = FieldscopeConfig::from_toml_str("[serializer]\nmax_depth = \"deep\"\n").unwrap_err();
        assert!(matches!(err, crate::FieldscopeError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FieldscopeConfig::load("/nonexistent/fieldscope.toml").unwrap_err();
        assert!(matches!(err, crate::FieldscopeError::Io(_)));
    }
}
