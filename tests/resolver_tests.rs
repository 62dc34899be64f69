//! Remote identity resolver tests

use async_trait::async_trait;
use std::collections::BTreeMap;

use relational_model_sdk::{
    BackendConnection, BackendFlavor, ConnectionError, NameTemplate, QualifiedIdent, ResolveError,
    ResolverWarning, resolve_remote_tables,
};

/// Test double over a fixed schema → tables layout
struct MockConnection {
    flavor: BackendFlavor,
    schemas: BTreeMap<String, Vec<String>>,
}

impl MockConnection {
    fn new(flavor: BackendFlavor, schemas: &[(&str, &[&str])]) -> Self {
        Self {
            flavor,
            schemas: schemas
                .iter()
                .map(|(schema, tables)| {
                    (
                        schema.to_string(),
                        tables.iter().map(|t| t.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }
}

#[async_trait]
impl BackendConnection for MockConnection {
    fn flavor(&self) -> BackendFlavor {
        self.flavor
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

mod precedence_tests {
    use super::*;

    #[tokio::test]
    async fn test_earlier_schema_wins_with_verbatim_warning() {
        let con = MockConnection::new(
            BackendFlavor::Postgres,
            &[("a", &["t", "u"]), ("b", &["t"])],
        );

        let resolved = resolve_remote_tables(&con, Some(&["a", "b"]), None, NameTemplate::Bare)
            .await
            .unwrap();

        assert_eq!(resolved.local_names(), vec!["t", "u"]);
        assert_eq!(resolved.get("t"), Some(&QualifiedIdent::in_schema("a", "t")));
        assert_eq!(resolved.warnings.len(), 1);
        assert_eq!(
            resolved.warnings[0].to_string(),
            "Local name t will refer to a.t, rather than to b.t"
        );
    }

    #[tokio::test]
    async fn test_reversing_schema_order_mirrors_the_result() {
        let con = MockConnection::new(
            BackendFlavor::Postgres,
            &[("a", &["t", "u"]), ("b", &["t"])],
        );

        let resolved = resolve_remote_tables(&con, Some(&["b", "a"]), None, NameTemplate::Bare)
            .await
            .unwrap();

        assert_eq!(resolved.get("t"), Some(&QualifiedIdent::in_schema("b", "t")));
        assert_eq!(
            resolved.warnings[0].to_string(),
            "Local name t will refer to b.t, rather than to a.t"
        );
    }

    #[tokio::test]
    async fn test_resolution_is_deterministic_across_calls() {
        let con = MockConnection::new(
            BackendFlavor::Postgres,
            &[("a", &["t"]), ("b", &["t", "v"])],
        );
        let first = resolve_remote_tables(&con, Some(&["a", "b"]), None, NameTemplate::Bare)
            .await
            .unwrap();
        let second = resolve_remote_tables(&con, Some(&["a", "b"]), None, NameTemplate::Bare)
            .await
            .unwrap();
        assert_eq!(first, second);
    }
}

mod template_tests {
    use super::*;

    #[tokio::test]
    async fn test_auto_template_namespaces_ambiguous_names() {
        let con = MockConnection::new(
            BackendFlavor::Postgres,
            &[("a", &["t", "u"]), ("b", &["t"])],
        );

        let resolved = resolve_remote_tables(&con, Some(&["a", "b"]), None, NameTemplate::Auto)
            .await
            .unwrap();

        // duplicated names are namespaced for every occurrence, unique ones
        // keep the bare form, and nothing collides
        assert_eq!(resolved.local_names(), vec!["a.t", "u", "b.t"]);
        assert!(resolved.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_schema_qualified_template_namespaces_everything() {
        let con = MockConnection::new(BackendFlavor::Postgres, &[("a", &["t"]), ("b", &["u"])]);
        let resolved = resolve_remote_tables(
            &con,
            Some(&["a", "b"]),
            None,
            NameTemplate::SchemaQualified,
        )
        .await
        .unwrap();
        assert_eq!(resolved.local_names(), vec!["a.t", "b.u"]);
    }

    #[tokio::test]
    async fn test_default_schema_used_when_none_requested() {
        let con = MockConnection::new(
            BackendFlavor::SqlServer,
            &[("dbo", &["orders"]), ("sales", &["targets"])],
        );
        let resolved = resolve_remote_tables(&con, None, None, NameTemplate::Auto)
            .await
            .unwrap();
        assert_eq!(resolved.local_names(), vec!["orders"]);
        assert_eq!(
            resolved.get("orders"),
            Some(&QualifiedIdent::in_schema("dbo", "orders"))
        );
    }
}

mod catalog_tests {
    use super::*;

    #[tokio::test]
    async fn test_catalog_carried_on_every_identifier() {
        let con = MockConnection::new(
            BackendFlavor::Databricks,
            &[("a", &["t"]), ("b", &["u"])],
        );

        let resolved =
            resolve_remote_tables(&con, Some(&["a", "b"]), Some("prod"), NameTemplate::Auto)
                .await
                .unwrap();

        assert_eq!(resolved.tables.len(), 2);
        assert!(resolved.warnings.is_empty());
        assert_eq!(
            resolved.get("t"),
            Some(&QualifiedIdent::in_schema("a", "t").with_catalog("prod"))
        );
        assert_eq!(
            resolved.get("u"),
            Some(&QualifiedIdent::in_schema("b", "u").with_catalog("prod"))
        );
    }

    #[tokio::test]
    async fn test_unsupported_catalog_degrades_gracefully() {
        let con = MockConnection::new(BackendFlavor::Sqlite, &[("main", &["t"])]);

        let resolved =
            resolve_remote_tables(&con, Some(&["main"]), Some("attached"), NameTemplate::Auto)
                .await
                .unwrap();

        // non-fatal: the identifier still carries the catalog component
        assert_eq!(
            resolved.get("t"),
            Some(&QualifiedIdent::in_schema("main", "t").with_catalog("attached"))
        );
        assert_eq!(resolved.warnings.len(), 1);
        assert!(matches!(
            &resolved.warnings[0],
            ResolverWarning::UnsupportedCatalog { catalog, flavor }
                if catalog == "attached" && *flavor == BackendFlavor::Sqlite
        ));
    }
}

mod error_tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_schema_aborts_the_call() {
        let con = MockConnection::new(BackendFlavor::Postgres, &[("public", &["t"])]);
        let err = resolve_remote_tables(&con, Some(&["nope"]), None, NameTemplate::Auto)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnknownSchema(s) if s == "nope"));
    }
}
