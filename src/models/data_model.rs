//! The data model snapshot
//!
//! A `DataModel` is an immutable snapshot of named tables and their key
//! declarations. Every mutating operation takes `&self` and returns a new
//! snapshot; prior snapshots stay independently valid. Table data handles
//! are shared between snapshots via `Arc`, definitions are cloned.
//!
//! Tables live in an insertion-ordered definition array with a name→index
//! map on the side. Foreign keys name their parent table and are resolved
//! through that index, so reference cycles between tables never become
//! ownership cycles.

use std::collections::HashMap;
use tracing::info;

use super::table::TableDef;
use crate::keys::error::{KeyError, KeyResult};
use crate::validation::names::find_name_clashes;

/// Snapshot of a relational overlay over named tabular datasets
#[derive(Debug, Clone, Default)]
pub struct DataModel {
    pub(crate) tables: Vec<TableDef>,
    pub(crate) index: HashMap<String, usize>,
    strict_keys: bool,
}

impl DataModel {
    /// An empty, non-strict model
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model-wide strict-keys flag. Under strict keys, removing a
    /// key that is not defined anywhere in the requested scope is an error
    /// instead of a no-op.
    pub fn with_strict_keys(mut self, strict: bool) -> Self {
        self.strict_keys = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict_keys
    }

    /// Add a table definition, returning the extended snapshot.
    ///
    /// The name must be unique in the model and every declared key column
    /// must exist in the table's data handle. Foreign keys must also have
    /// matching child/parent arity; their parent table may be added later.
    pub fn add_table(&self, table: TableDef) -> KeyResult<Self> {
        if self.index.contains_key(&table.name) {
            return Err(KeyError::DuplicateTable(table.name));
        }

        let columns = table.columns();
        let declared = table
            .pk
            .iter()
            .map(|pk| &pk.columns)
            .chain(table.uks.iter().map(|uk| &uk.columns))
            .chain(table.fks.iter().map(|fk| &fk.columns));
        for key_columns in declared {
            for column in key_columns {
                if !columns.contains(column) {
                    return Err(KeyError::ColumnNotFound {
                        table: table.name.clone(),
                        column: column.clone(),
                    });
                }
            }
        }
        for fk in &table.fks {
            if fk.columns.len() != fk.parent_columns.len() {
                return Err(KeyError::ColumnCountMismatch {
                    table: table.name.clone(),
                    child: fk.columns.len(),
                    parent_table: fk.parent_table.clone(),
                    parent: fk.parent_columns.len(),
                });
            }
        }

        let mut next = self.clone();
        next.index.insert(table.name.clone(), next.tables.len());
        info!("Added table {} to model", table.name);
        next.tables.push(table);
        Ok(next)
    }

    /// Look up a table definition by name
    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.index.get(name).map(|&i| &self.tables[i])
    }

    /// Table names in model insertion order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Rename tables, rewriting foreign-key parent references.
    ///
    /// Clashes among the post-rename names fail the whole call; nothing is
    /// renamed on error.
    pub fn rename_tables(&self, renames: &[(&str, &str)]) -> KeyResult<Self> {
        let mapping: HashMap<&str, &str> = renames.iter().copied().collect();
        for (old, _) in renames {
            if !self.index.contains_key(*old) {
                return Err(KeyError::TableNotFound(old.to_string()));
            }
        }

        let old_names: Vec<&str> = self.tables.iter().map(|t| t.name.as_str()).collect();
        let new_names: Vec<&str> = old_names
            .iter()
            .map(|name| mapping.get(name).copied().unwrap_or(*name))
            .collect();
        let clashes = find_name_clashes(&old_names, &new_names);
        if let Some(clash) = clashes.first() {
            return Err(KeyError::RenameClash {
                name: clash.new_name.clone(),
                sources: clash.old_names.join(", "),
            });
        }

        let mut next = self.clone();
        next.index.clear();
        for (i, table) in next.tables.iter_mut().enumerate() {
            if let Some(new_name) = mapping.get(table.name.as_str()) {
                info!("Renamed table {} to {}", table.name, new_name);
                table.name = new_name.to_string();
                table.touch();
            }
            for fk in &mut table.fks {
                if let Some(new_parent) = mapping.get(fk.parent_table.as_str()) {
                    fk.parent_table = new_parent.to_string();
                }
            }
            next.index.insert(table.name.clone(), i);
        }
        Ok(next)
    }

    pub(crate) fn table_index(&self, name: &str) -> KeyResult<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| KeyError::TableNotFound(name.to_string()))
    }

    /// Indices for a caller-supplied table list (caller order), or every
    /// table in insertion order when none is given.
    pub(crate) fn scope_indices(&self, tables: Option<&[&str]>) -> KeyResult<Vec<usize>> {
        match tables {
            Some(names) => names.iter().map(|name| self.table_index(name)).collect(),
            None => Ok((0..self.tables.len()).collect()),
        }
    }
}
