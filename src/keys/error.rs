//! Error types for key graph operations

use thiserror::Error;

use crate::data::{DataError, ValueGroup};
use crate::models::key::KeyTarget;

fn scope_text(table: &Option<String>) -> String {
    match table {
        Some(table) => format!("on table {table}"),
        None => "in the requested scope".to_string(),
    }
}

/// Errors that can occur during key graph operations.
///
/// Every failure is fail-fast and all-or-nothing: the operation either
/// returns a full new snapshot or leaves the prior snapshot as the caller's
/// only state.
#[derive(Debug, Error)]
pub enum KeyError {
    /// A conflicting key of the same shape is already declared
    #[error("Key conflict on table {table}: {reason}")]
    KeySetConflict { table: String, reason: String },

    /// A row scan found values incompatible with the requested key.
    /// `groups` carries the offending value groups.
    #[error("Key check failed for {columns} of table {table}: {report}")]
    KeyCheckFailed {
        table: String,
        columns: String,
        missing: usize,
        groups: Vec<ValueGroup>,
        report: String,
    },

    /// Autoincrement requested for a compound key
    #[error("Autoincrement is only valid for a single-column primary key (got {count} columns)")]
    CompositeAutoincrement { count: usize },

    /// Strict-mode removal matched no key anywhere in scope, or a defaulted
    /// parent key is absent
    #[error("No matching {kind} is defined {}", scope_text(.table))]
    KeyNotDefined {
        kind: KeyTarget,
        table: Option<String>,
    },

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table already exists in the model: {0}")]
    DuplicateTable(String),

    #[error("Column not found in table {table}: {column}")]
    ColumnNotFound { table: String, column: String },

    #[error("Column {column} appears more than once in the selection for table {table}")]
    DuplicateColumn { table: String, column: String },

    #[error("Invalid column pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Column selection for table {0} resolved to no columns")]
    EmptySelection(String),

    /// Foreign-key child/parent arity mismatch
    #[error(
        "Column count mismatch: {table} declares {child} columns, parent {parent_table} selection has {parent}"
    )]
    ColumnCountMismatch {
        table: String,
        child: usize,
        parent_table: String,
        parent: usize,
    },

    /// Parent key shape the candidate checker cannot enumerate against
    #[error("Table {0} has a compound primary key; foreign-key candidates need a single-column parent key")]
    CompoundParentKey(String),

    /// Renaming would give two tables the same name
    #[error("Rename clash: tables {sources} would all be named {name}")]
    RenameClash { name: String, sources: String },

    #[error(transparent)]
    Data(#[from] DataError),
}

/// Result type for key graph operations
pub type KeyResult<T> = Result<T, KeyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KeyError::KeyNotDefined {
            kind: KeyTarget::Primary,
            table: Some("orders".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "No matching primary key is defined on table orders"
        );

        let err = KeyError::KeyNotDefined {
            kind: KeyTarget::Unique,
            table: None,
        };
        assert!(err.to_string().contains("in the requested scope"));

        let err = KeyError::CompositeAutoincrement { count: 2 };
        assert!(err.to_string().contains("single-column"));
    }
}
