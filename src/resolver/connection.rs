//! Backend connection abstraction
//!
//! The resolver never talks to a database driver directly. It works against
//! the `BackendConnection` trait, which exposes schema and table discovery
//! plus the flavor defaults. DDL/DML execution belongs to other layers.

use async_trait::async_trait;

use super::flavor::BackendFlavor;

/// Error type for backend discovery
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Schema not found: {0}")]
    SchemaNotFound(String),
    #[error("Catalog not found: {0}")]
    CatalogNotFound(String),
    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Trait for backend connections used during identity resolution
#[async_trait]
pub trait BackendConnection: Send + Sync {
    /// Flavor of the connected backend
    fn flavor(&self) -> BackendFlavor;

    /// Schemas visible to this connection
    async fn list_schemas(&self) -> Result<Vec<String>, ConnectionError>;

    /// Table names within a schema, optionally scoped to a catalog
    async fn list_tables(
        &self,
        schema: &str,
        catalog: Option<&str>,
    ) -> Result<Vec<String>, ConnectionError>;

    /// Schema used when the caller names none
    fn default_schema(&self) -> String {
        self.flavor().default_schema().to_string()
    }

    /// Catalog used when the caller names none
    fn default_catalog(&self) -> Option<String> {
        None
    }
}
