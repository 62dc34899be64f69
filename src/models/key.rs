//! Key declarations for tables in a data model
//!
//! Keys are metadata: declaring one never enforces anything at the storage
//! layer. Equality between keys is by exact ordered column-name list, so
//! `(a, b)` and `(b, a)` are distinct compound keys.

use serde::{Deserialize, Serialize};

/// Primary key declaration. At most one per table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    /// Ordered key columns
    pub columns: Vec<String>,
    /// Whether the key column is backend-assigned. Only valid for a
    /// single-column key.
    #[serde(default)]
    pub autoincrement: bool,
}

/// Explicit unique key declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueKey {
    /// Ordered key columns
    pub columns: Vec<String>,
}

/// Foreign key declaration referencing a parent table's columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Ordered child columns
    pub columns: Vec<String>,
    /// Name of the referenced table
    pub parent_table: String,
    /// Ordered referenced columns, same arity as `columns`
    pub parent_columns: Vec<String>,
}

/// Source of a unique-key row reported by `get_all_uks`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    /// The table's primary key
    PrimaryKey,
    /// A declared unique key
    ExplicitUnique,
    /// A column set some foreign key targets without a matching PK/UK
    ImplicitUnique,
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyKind::PrimaryKey => write!(f, "PK"),
            KeyKind::ExplicitUnique => write!(f, "explicit UK"),
            KeyKind::ImplicitUnique => write!(f, "implicit UK"),
        }
    }
}

/// Key families addressed by add/remove operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyTarget {
    Primary,
    Unique,
    Foreign,
}

impl std::fmt::Display for KeyTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyTarget::Primary => write!(f, "primary key"),
            KeyTarget::Unique => write!(f, "unique key"),
            KeyTarget::Foreign => write!(f, "foreign key"),
        }
    }
}
