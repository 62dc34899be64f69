//! Qualified identifiers for remote tables

use serde::{Deserialize, Serialize};

/// A qualified table identifier on a remote backend.
///
/// Compared structurally throughout. Unqualified defaults are filled in per
/// backend flavor by the resolver, never here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedIdent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub table: String,
}

impl QualifiedIdent {
    /// A bare table identifier without schema or catalog
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            table: table.into(),
        }
    }

    /// A schema-qualified identifier
    pub fn in_schema(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: Some(schema.into()),
            table: table.into(),
        }
    }

    /// Scope the identifier to a catalog
    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }
}

impl std::fmt::Display for QualifiedIdent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(catalog) = &self.catalog {
            write!(f, "{catalog}.")?;
        }
        if let Some(schema) = &self.schema {
            write!(f, "{schema}.")?;
        }
        write!(f, "{}", self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(QualifiedIdent::new("t").to_string(), "t");
        assert_eq!(QualifiedIdent::in_schema("a", "t").to_string(), "a.t");
        assert_eq!(
            QualifiedIdent::in_schema("a", "t").with_catalog("c").to_string(),
            "c.a.t"
        );
    }

    #[test]
    fn test_structural_equality() {
        let left = QualifiedIdent::in_schema("a", "t");
        let right = QualifiedIdent::in_schema("a", "t");
        assert_eq!(left, right);
        assert_ne!(left, QualifiedIdent::in_schema("b", "t"));
        assert_ne!(left, left.clone().with_catalog("c"));
    }
}
