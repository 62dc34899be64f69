//! In-memory tabular data

use serde_json::Value;

use super::{DataError, TabularData};

/// In-memory table handle backed by row-major `serde_json::Value` cells.
///
/// # Example
///
/// ```rust
/// use relational_model_sdk::data::MemoryTable;
/// use serde_json::json;
///
/// let table = MemoryTable::new(vec![
///     ("id", vec![json!(1), json!(2)]),
///     ("name", vec![json!("a"), json!("b")]),
/// ])
/// .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl MemoryTable {
    /// Build a table from column-major input. All columns must have the same
    /// number of values.
    pub fn new<S: Into<String>>(columns: Vec<(S, Vec<Value>)>) -> Result<Self, DataError> {
        let mut names = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            names.push(name.into());
            data.push(values);
        }

        let expected = data.first().map(Vec::len).unwrap_or(0);
        for (name, values) in names.iter().zip(&data) {
            if values.len() != expected {
                return Err(DataError::RaggedColumn {
                    column: name.clone(),
                    expected,
                    actual: values.len(),
                });
            }
        }

        let rows = (0..expected)
            .map(|r| data.iter().map(|col| col[r].clone()).collect())
            .collect();
        Ok(Self {
            columns: names,
            rows,
        })
    }

    /// An empty table with the given column names
    pub fn empty<S: Into<String>>(columns: Vec<S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }
}

impl TabularData for MemoryTable {
    fn columns(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn rows(&self) -> Result<Vec<Vec<Value>>, DataError> {
        Ok(self.rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partition_groups_in_first_seen_order() {
        let table = MemoryTable::new(vec![(
            "grp",
            vec![json!("b"), json!("a"), json!("b"), json!("a"), json!("c")],
        )])
        .unwrap();

        let groups = table.partition(&["grp".to_string()]).unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].values, vec![json!("b")]);
        assert_eq!(groups[0].rows, 2);
        assert_eq!(groups[1].values, vec![json!("a")]);
        assert_eq!(groups[1].rows, 2);
        assert_eq!(groups[2].values, vec![json!("c")]);
        assert_eq!(groups[2].rows, 1);
    }

    #[test]
    fn test_partition_unknown_column() {
        let table = MemoryTable::empty(vec!["id"]);
        let err = table.partition(&["missing".to_string()]).unwrap_err();
        assert!(matches!(err, DataError::ColumnNotFound(c) if c == "missing"));
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let err = MemoryTable::new(vec![
            ("id", vec![json!(1), json!(2)]),
            ("name", vec![json!("a")]),
        ])
        .unwrap_err();
        assert!(matches!(err, DataError::RaggedColumn { .. }));
    }

    #[test]
    fn test_partition_compound_tuple_with_missing() {
        let table = MemoryTable::new(vec![
            ("a", vec![json!(1), json!(1), json!(null)]),
            ("b", vec![json!("x"), json!("x"), json!("y")]),
        ])
        .unwrap();

        let groups = table
            .partition(&["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].rows, 2);
        assert!(!groups[0].has_missing());
        assert!(groups[1].has_missing());
    }
}
