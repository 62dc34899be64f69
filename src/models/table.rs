//! Table definition for the data model

use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::key::{ForeignKey, PrimaryKey, UniqueKey};
use crate::data::TabularData;

/// A named table inside a data model: an opaque tabular handle plus the keys
/// declared on it.
///
/// The table name is the unique id a model addresses the table by. Key
/// declarations are metadata only; nothing is pushed to the storage layer.
#[derive(Clone)]
pub struct TableDef {
    /// Unique table name within the model
    pub name: String,
    /// Handle to the table's currently visible rows
    pub data: Arc<dyn TabularData>,
    /// At most one primary key
    pub pk: Option<PrimaryKey>,
    /// Explicit unique keys, no duplicates
    pub uks: Vec<UniqueKey>,
    /// Foreign keys declared on this table
    pub fks: Vec<ForeignKey>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TableDef {
    pub fn new(name: impl Into<String>, data: Arc<dyn TabularData>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            data,
            pk: None,
            uks: Vec::new(),
            fks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Declare a primary key while building the definition
    pub fn with_pk<I, S>(mut self, columns: I, autoincrement: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pk = Some(PrimaryKey {
            columns: columns.into_iter().map(Into::into).collect(),
            autoincrement,
        });
        self
    }

    /// Declare a unique key while building the definition
    pub fn with_uk<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uks.push(UniqueKey {
            columns: columns.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Declare a foreign key while building the definition
    pub fn with_fk<I, S, P>(mut self, columns: I, parent_table: impl Into<String>, parent_columns: P) -> Self
    where
        I: IntoIterator<Item = S>,
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fks.push(ForeignKey {
            columns: columns.into_iter().map(Into::into).collect(),
            parent_table: parent_table.into(),
            parent_columns: parent_columns.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Column names of the underlying handle
    pub fn columns(&self) -> Vec<String> {
        self.data.columns()
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl std::fmt::Debug for TableDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableDef")
            .field("name", &self.name)
            .field("columns", &self.data.columns())
            .field("rows", &self.data.row_count())
            .field("pk", &self.pk)
            .field("uks", &self.uks)
            .field("fks", &self.fks)
            .finish()
    }
}
