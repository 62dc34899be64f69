//! Remote identity resolution
//!
//! Discovers qualified (catalog/schema/table) identifiers across backend
//! flavors and assigns each a collision-free local name. Precedence is
//! deterministic: discovery follows the caller's schema order, and when two
//! identifiers contest one local name, the earlier schema wins and every
//! losing occurrence is reported through a warning. Warnings never abort the
//! call; the returned mapping is always complete and has unique keys.

use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

pub mod connection;
pub mod flavor;

pub use connection::{BackendConnection, ConnectionError};
pub use flavor::BackendFlavor;

use serde::{Deserialize, Serialize};

use crate::models::identifier::QualifiedIdent;

/// How local names are derived from discovered identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameTemplate {
    /// Bare table names, except that a table name occurring in more than
    /// one discovered schema is namespaced as `schema.table` for every
    /// occurrence
    #[default]
    Auto,
    /// Always the bare table name; cross-schema duplicates collide and are
    /// resolved by schema precedence
    Bare,
    /// Always `schema.table`
    SchemaQualified,
}

/// One entry of the resolved mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTable {
    pub local_name: String,
    pub ident: QualifiedIdent,
}

/// Non-fatal conditions surfaced during resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverWarning {
    /// Two identifiers contested one local name; the earlier schema won
    AmbiguousName {
        name: String,
        winner: QualifiedIdent,
        loser: QualifiedIdent,
    },
    /// A catalog was requested on a flavor without native catalog support
    UnsupportedCatalog {
        catalog: String,
        flavor: BackendFlavor,
    },
}

impl std::fmt::Display for ResolverWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolverWarning::AmbiguousName {
                name,
                winner,
                loser,
            } => write!(
                f,
                "Local name {name} will refer to {winner}, rather than to {loser}"
            ),
            ResolverWarning::UnsupportedCatalog { catalog, flavor } => write!(
                f,
                "The {flavor} backend does not natively expose catalogs; identifiers will carry catalog {catalog} anyway"
            ),
        }
    }
}

/// Result of a resolution call: the local-name mapping in discovery order,
/// plus the warnings emitted along the way
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedTables {
    pub tables: Vec<ResolvedTable>,
    pub warnings: Vec<ResolverWarning>,
}

impl ResolvedTables {
    /// Look up the identifier a local name refers to
    pub fn get(&self, local_name: &str) -> Option<&QualifiedIdent> {
        self.tables
            .iter()
            .find(|t| t.local_name == local_name)
            .map(|t| &t.ident)
    }

    /// Local names in discovery order
    pub fn local_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.local_name.as_str()).collect()
    }
}

/// Errors that abort a resolution call
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Schema not found: {0}")]
    UnknownSchema(String),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

/// Discover qualified identifiers across the requested schemas and assign
/// collision-free local names.
///
/// Schemas default to the connection's flavor default; a supplied catalog is
/// carried on every identifier even when the flavor has no native catalog
/// support (with an `UnsupportedCatalog` warning). Resolution is
/// all-or-nothing: a discovery failure aborts the whole call, warnings never
/// do.
pub async fn resolve_remote_tables(
    con: &dyn BackendConnection,
    schemas: Option<&[&str]>,
    catalog: Option<&str>,
    template: NameTemplate,
) -> Result<ResolvedTables, ResolveError> {
    let mut warnings = Vec::new();
    let flavor = con.flavor();

    let requested: Vec<String> = match schemas {
        Some(names) => names.iter().map(|s| s.to_string()).collect(),
        None => vec![con.default_schema()],
    };
    let catalog: Option<String> = catalog.map(Into::into).or_else(|| con.default_catalog());
    if let Some(catalog) = &catalog
        && !flavor.supports_catalogs()
    {
        let warning = ResolverWarning::UnsupportedCatalog {
            catalog: catalog.clone(),
            flavor,
        };
        warn!("{warning}");
        warnings.push(warning);
    }

    let known = con.list_schemas().await?;
    for schema in &requested {
        if !known.contains(schema) {
            return Err(ResolveError::UnknownSchema(schema.clone()));
        }
    }

    // Discovery, strictly in caller order
    let mut discovered: Vec<QualifiedIdent> = Vec::new();
    for schema in &requested {
        let tables = con.list_tables(schema, catalog.as_deref()).await?;
        debug!("Discovered {} tables in schema {}", tables.len(), schema);
        for table in tables {
            discovered.push(QualifiedIdent {
                catalog: catalog.clone(),
                schema: Some(schema.clone()),
                table,
            });
        }
    }

    let names = apply_template(template, &discovered);

    // Collision resolution is sequential in caller order so precedence
    // stays deterministic: the earlier schema wins a contested name.
    let mut tables: Vec<ResolvedTable> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (local_name, ident) in names.into_iter().zip(discovered) {
        match index.get(&local_name) {
            Some(&winner) => {
                let warning = ResolverWarning::AmbiguousName {
                    name: local_name,
                    winner: tables[winner].ident.clone(),
                    loser: ident,
                };
                warn!("{warning}");
                warnings.push(warning);
            }
            None => {
                index.insert(local_name.clone(), tables.len());
                tables.push(ResolvedTable { local_name, ident });
            }
        }
    }

    Ok(ResolvedTables { tables, warnings })
}

fn apply_template(template: NameTemplate, discovered: &[QualifiedIdent]) -> Vec<String> {
    let qualified = |ident: &QualifiedIdent| match &ident.schema {
        Some(schema) => format!("{schema}.{}", ident.table),
        None => ident.table.clone(),
    };

    match template {
        NameTemplate::Bare => discovered.iter().map(|i| i.table.clone()).collect(),
        NameTemplate::SchemaQualified => discovered.iter().map(qualified).collect(),
        NameTemplate::Auto => {
            let mut schemas_per_name: HashMap<&str, HashSet<&str>> = HashMap::new();
            for ident in discovered {
                if let Some(schema) = &ident.schema {
                    schemas_per_name
                        .entry(ident.table.as_str())
                        .or_default()
                        .insert(schema.as_str());
                }
            }
            discovered
                .iter()
                .map(|ident| {
                    let ambiguous = schemas_per_name
                        .get(ident.table.as_str())
                        .is_some_and(|s| s.len() > 1);
                    if ambiguous {
                        qualified(ident)
                    } else {
                        ident.table.clone()
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(schema: &str, table: &str) -> QualifiedIdent {
        QualifiedIdent::in_schema(schema, table)
    }

    #[test]
    fn test_auto_template_namespaces_only_ambiguous_names() {
        let discovered = vec![ident("a", "t"), ident("a", "u"), ident("b", "t")];
        let names = apply_template(NameTemplate::Auto, &discovered);
        assert_eq!(names, vec!["a.t", "u", "b.t"]);
    }

    #[test]
    fn test_bare_template_keeps_bare_names() {
        let discovered = vec![ident("a", "t"), ident("b", "t")];
        let names = apply_template(NameTemplate::Bare, &discovered);
        assert_eq!(names, vec!["t", "t"]);
    }

    #[test]
    fn test_schema_qualified_template() {
        let discovered = vec![ident("a", "t"), ident("b", "u")];
        let names = apply_template(NameTemplate::SchemaQualified, &discovered);
        assert_eq!(names, vec!["a.t", "b.u"]);
    }

    #[test]
    fn test_ambiguous_name_warning_text() {
        let warning = ResolverWarning::AmbiguousName {
            name: "t".to_string(),
            winner: ident("a", "t"),
            loser: ident("b", "t"),
        };
        assert_eq!(
            warning.to_string(),
            "Local name t will refer to a.t, rather than to b.t"
        );
    }
}
