//! Tabular-data handle abstraction
//!
//! The key engine never owns table data. It works against the `TabularData`
//! trait, which exposes column names, row materialization, and a grouping
//! primitive (partition rows by a column tuple). Implementations:
//! - MemoryTable: in-memory rows (for tests and small local datasets)
//!
//! Remote handles can implement the same trait on top of a backend query
//! layer; the key engine only sees the currently visible rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub mod memory;

pub use memory::MemoryTable;

/// Error type for tabular-data access
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
    #[error("Column {column} has {actual} values, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("Data backend error: {0}")]
    BackendError(String),
}

/// One group produced by partitioning rows by a column tuple.
///
/// `values` is the tuple shared by every row in the group, `rows` the number
/// of rows carrying it. Missing cells are represented as `Value::Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueGroup {
    pub values: Vec<Value>,
    pub rows: usize,
}

impl ValueGroup {
    /// Whether any value of the tuple is missing
    pub fn has_missing(&self) -> bool {
        self.values.iter().any(Value::is_null)
    }

    /// Canonical text key for set membership and deduplication
    pub(crate) fn canonical_key(values: &[Value]) -> String {
        // serde_json never fails on Value input
        serde_json::to_string(values).unwrap_or_default()
    }
}

/// Trait for tabular-data handles
///
/// Gives the key engine a storage-independent view of a table: its column
/// names, its currently visible rows, and a partition primitive used by key
/// checks and candidate enumeration.
pub trait TabularData: Send + Sync {
    /// Ordered column names of the table
    fn columns(&self) -> Vec<String>;

    /// Number of currently visible rows
    fn row_count(&self) -> usize;

    /// Materialize all visible rows, values in column order
    fn rows(&self) -> Result<Vec<Vec<Value>>, DataError>;

    /// Partition visible rows by a column tuple.
    ///
    /// Groups are returned in first-seen row order, which keeps duplicate
    /// reports deterministic for a given handle.
    fn partition(&self, columns: &[String]) -> Result<Vec<ValueGroup>, DataError> {
        let names = self.columns();
        let mut indices = Vec::with_capacity(columns.len());
        for column in columns {
            let position = names
                .iter()
                .position(|n| n == column)
                .ok_or_else(|| DataError::ColumnNotFound(column.clone()))?;
            indices.push(position);
        }

        let mut groups: Vec<ValueGroup> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        for row in self.rows()? {
            let tuple: Vec<Value> = indices
                .iter()
                .map(|&i| row.get(i).cloned().unwrap_or(Value::Null))
                .collect();
            let key = ValueGroup::canonical_key(&tuple);
            match seen.get(&key) {
                Some(&group) => groups[group].rows += 1,
                None => {
                    seen.insert(key, groups.len());
                    groups.push(ValueGroup {
                        values: tuple,
                        rows: 1,
                    });
                }
            }
        }
        Ok(groups)
    }
}
