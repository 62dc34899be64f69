//! Row and audit types produced by key graph queries

use serde::{Deserialize, Serialize};

use crate::models::data_model::DataModel;
use crate::models::key::{KeyKind, KeyTarget};

/// One row of `get_all_pks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyRow {
    pub table: String,
    pub columns: Vec<String>,
    pub autoincrement: bool,
}

/// One row of `get_all_uks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueKeyRow {
    pub table: String,
    pub columns: Vec<String>,
    /// Which of the three disjoint sources produced the row
    pub kind: KeyKind,
}

/// One row of `get_all_fks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRow {
    pub table: String,
    pub columns: Vec<String>,
    pub parent_table: String,
    pub parent_columns: Vec<String>,
}

/// One audit entry of a bulk key removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedKey {
    pub table: String,
    pub columns: Vec<String>,
    pub kind: KeyTarget,
}

/// Result of a key removal: the new snapshot plus a deterministic audit
/// trail, one entry per removed key in table order. The list is returned as
/// data so a port can print, log, or suppress it.
#[derive(Debug, Clone)]
pub struct KeyRemoval {
    pub model: DataModel,
    pub removed: Vec<RemovedKey>,
}

/// One row of candidate enumeration (`enum_pk_candidates` /
/// `enum_fk_candidates`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCandidate {
    pub columns: Vec<String>,
    pub candidate: bool,
    /// Empty for valid candidates; otherwise the reason the column set
    /// cannot serve as a key
    pub why: String,
}
