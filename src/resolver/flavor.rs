//! Backend flavors and their identifier conventions

use serde::{Deserialize, Serialize};

/// Database backends the resolver knows the identifier conventions of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendFlavor {
    Postgres,
    SqlServer,
    Databricks,
    DuckDb,
    Sqlite,
}

impl BackendFlavor {
    /// Schema assumed when the caller names none
    pub fn default_schema(&self) -> &'static str {
        match self {
            BackendFlavor::Postgres => "public",
            BackendFlavor::SqlServer => "dbo",
            BackendFlavor::Databricks => "default",
            BackendFlavor::DuckDb => "main",
            BackendFlavor::Sqlite => "main",
        }
    }

    /// Whether the backend natively exposes a catalog level above schemas
    pub fn supports_catalogs(&self) -> bool {
        matches!(
            self,
            BackendFlavor::SqlServer | BackendFlavor::Databricks | BackendFlavor::DuckDb
        )
    }
}

impl std::fmt::Display for BackendFlavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendFlavor::Postgres => write!(f, "postgres"),
            BackendFlavor::SqlServer => write!(f, "sqlserver"),
            BackendFlavor::Databricks => write!(f, "databricks"),
            BackendFlavor::DuckDb => write!(f, "duckdb"),
            BackendFlavor::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schemas() {
        assert_eq!(BackendFlavor::Postgres.default_schema(), "public");
        assert_eq!(BackendFlavor::SqlServer.default_schema(), "dbo");
        assert_eq!(BackendFlavor::DuckDb.default_schema(), "main");
    }

    #[test]
    fn test_catalog_support() {
        assert!(BackendFlavor::SqlServer.supports_catalogs());
        assert!(BackendFlavor::Databricks.supports_catalogs());
        assert!(!BackendFlavor::Postgres.supports_catalogs());
        assert!(!BackendFlavor::Sqlite.supports_catalogs());
    }
}
