//! Resolve remote identifiers against a mocked warehouse connection and
//! print the resulting local-name mapping.
//!
//! Run with: cargo run --example resolve_remote

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

use relational_model_sdk::{
    BackendConnection, BackendFlavor, ConnectionError, NameTemplate, resolve_remote_tables,
};

struct Warehouse {
    schemas: BTreeMap<String, Vec<String>>,
}

#[async_trait]
impl BackendConnection for Warehouse {
    fn flavor(&self) -> BackendFlavor {
        BackendFlavor::Databricks
    }

    async fn list_schemas(&self) -> Result<Vec<String>, ConnectionError> {
        Ok(self.schemas.keys().cloned().collect())
    }

    async fn list_tables(
        &self,
        schema: &str,
        _catalog: Option<&str>,
    ) -> Result<Vec<String>, ConnectionError> {
        self.schemas
            .get(schema)
            .cloned()
            .ok_or_else(|| ConnectionError::SchemaNotFound(schema.to_string()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let con = Warehouse {
        schemas: BTreeMap::from([
            (
                "sales".to_string(),
                vec!["orders".to_string(), "customers".to_string()],
            ),
            (
                "archive".to_string(),
                vec!["orders".to_string(), "shipments".to_string()],
            ),
        ]),
    };

    let resolved = resolve_remote_tables(
        &con,
        Some(&["sales", "archive"]),
        Some("prod"),
        NameTemplate::Auto,
    )
    .await?;

    println!("Resolved tables:");
    for entry in &resolved.tables {
        println!("  {} -> {}", entry.local_name, entry.ident);
    }
    for warning in &resolved.warnings {
        println!("warning: {warning}");
    }
    Ok(())
}
