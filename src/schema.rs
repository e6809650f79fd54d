//! Schema collaborator types for expiration validation.
//!
//! The policy itself never holds a schema reference; the owning service
//! resolves the configured expiration field through a [`SchemaResolver`]
//! and hands the resulting [`FieldDescriptor`] to validation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type classification of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Date,
    Timestamp,
    String,
    Struct,
}

impl FieldType {
    /// Canonical name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Boolean => "BOOLEAN",
            FieldType::Int => "INT",
            FieldType::Long => "LONG",
            FieldType::Float => "FLOAT",
            FieldType::Double => "DOUBLE",
            FieldType::Date => "DATE",
            FieldType::Timestamp => "TIMESTAMP",
            FieldType::String => "STRING",
            FieldType::Struct => "STRUCT",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A schema field resolved for a table, as handed to policy validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as it appears in the table schema.
    pub name: String,
    /// Semantic type of the field.
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Lookup capability supplied by the table schema catalog.
pub trait SchemaResolver {
    /// Resolve a field by name within a table's schema, or `None` when the
    /// field does not exist.
    fn resolve_field(&self, table_name: &str, field_name: &str) -> Option<FieldDescriptor>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_display() {
        assert_eq!(FieldType::Timestamp.to_string(), "TIMESTAMP");
        assert_eq!(FieldType::Long.to_string(), "LONG");
    }

    #[test]
    fn test_field_type_serde_tokens() {
        assert_eq!(
            serde_json::to_string(&FieldType::Timestamp).unwrap(),
            "\"TIMESTAMP\""
        );
        let decoded: FieldType = serde_json::from_str("\"STRING\"").unwrap();
        assert_eq!(decoded, FieldType::String);
    }
}
