//! Column selection for key operations
//!
//! Operations accept either an explicit ordered name list or a pattern over
//! column names. A selection is resolved once, up front, into a concrete
//! ordered column list before any key operation consumes it, so downstream
//! code only ever sees plain column names.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::keys::error::{KeyError, KeyResult};

/// How key columns are selected on a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSelection {
    /// Explicit ordered column names
    Names(Vec<String>),
    /// Columns whose name matches a regular expression, in table order
    Matching(String),
}

impl ColumnSelection {
    /// Select columns by explicit names
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnSelection::Names(names.into_iter().map(Into::into).collect())
    }

    /// Select columns whose name matches a regular expression
    pub fn matching(pattern: impl Into<String>) -> Self {
        ColumnSelection::Matching(pattern.into())
    }

    /// Resolve the selection against a table's column list.
    ///
    /// Explicit names keep their given order and must all exist; pattern
    /// matches come back in table order. An empty result is an error: a key
    /// cannot span zero columns.
    pub fn resolve(&self, table: &str, available: &[String]) -> KeyResult<Vec<String>> {
        let resolved = match self {
            ColumnSelection::Names(names) => {
                for (i, name) in names.iter().enumerate() {
                    if !available.contains(name) {
                        return Err(KeyError::ColumnNotFound {
                            table: table.to_string(),
                            column: name.clone(),
                        });
                    }
                    if names[..i].contains(name) {
                        return Err(KeyError::DuplicateColumn {
                            table: table.to_string(),
                            column: name.clone(),
                        });
                    }
                }
                names.clone()
            }
            ColumnSelection::Matching(pattern) => {
                let re = Regex::new(pattern).map_err(|e| KeyError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
                available
                    .iter()
                    .filter(|name| re.is_match(name))
                    .cloned()
                    .collect()
            }
        };

        if resolved.is_empty() {
            return Err(KeyError::EmptySelection(table.to_string()));
        }
        Ok(resolved)
    }
}

impl From<Vec<String>> for ColumnSelection {
    fn from(names: Vec<String>) -> Self {
        ColumnSelection::Names(names)
    }
}

impl From<Vec<&str>> for ColumnSelection {
    fn from(names: Vec<&str>) -> Self {
        ColumnSelection::names(names)
    }
}

impl<const N: usize> From<[&str; N]> for ColumnSelection {
    fn from(names: [&str; N]) -> Self {
        ColumnSelection::names(names)
    }
}

impl From<&str> for ColumnSelection {
    fn from(name: &str) -> Self {
        ColumnSelection::Names(vec![name.to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_resolve_names_keeps_caller_order() {
        let available = columns(&["a", "b", "c"]);
        let selection = ColumnSelection::names(["c", "a"]);
        assert_eq!(
            selection.resolve("t", &available).unwrap(),
            vec!["c".to_string(), "a".to_string()]
        );
    }

    #[test]
    fn test_resolve_names_unknown_column() {
        let available = columns(&["a"]);
        let err = ColumnSelection::names(["nope"])
            .resolve("t", &available)
            .unwrap_err();
        assert!(matches!(err, KeyError::ColumnNotFound { column, .. } if column == "nope"));
    }

    #[test]
    fn test_resolve_names_duplicate_column() {
        let available = columns(&["a", "b"]);
        let err = ColumnSelection::names(["a", "a"])
            .resolve("t", &available)
            .unwrap_err();
        assert!(matches!(err, KeyError::DuplicateColumn { column, .. } if column == "a"));
    }

    #[test]
    fn test_resolve_pattern_in_table_order() {
        let available = columns(&["order_id", "name", "customer_id"]);
        let selection = ColumnSelection::matching("_id$");
        assert_eq!(
            selection.resolve("t", &available).unwrap(),
            vec!["order_id".to_string(), "customer_id".to_string()]
        );
    }

    #[test]
    fn test_resolve_pattern_without_matches() {
        let available = columns(&["a"]);
        let err = ColumnSelection::matching("^z")
            .resolve("t", &available)
            .unwrap_err();
        assert!(matches!(err, KeyError::EmptySelection(t) if t == "t"));
    }

    #[test]
    fn test_resolve_invalid_pattern() {
        let available = columns(&["a"]);
        let err = ColumnSelection::matching("([")
            .resolve("t", &available)
            .unwrap_err();
        assert!(matches!(err, KeyError::InvalidPattern { .. }));
    }
}
