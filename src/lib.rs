//! Relational Model SDK - key metadata over named tabular datasets
//!
//! Maintains a relational overlay on a collection of tables: a graph of
//! declared primary, unique, and foreign keys, independent of whether the
//! data lives in memory or behind a remote backend. Provides:
//! - a snapshot-functional data model (every mutation returns a new model)
//! - the key graph engine (add/remove/list operations with key checks)
//! - candidate-key enumeration with duplicate reports
//! - remote identity resolution across backend flavors
//! - name-clash detection shared by the resolver and by renames

pub mod data;
pub mod keys;
pub mod models;
pub mod resolver;
pub mod validation;

// Re-export commonly used types
pub use data::{DataError, MemoryTable, TabularData, ValueGroup};
pub use keys::{
    ForeignKeyRow, KeyCandidate, KeyError, KeyRemoval, KeyResult, PrimaryKeyRow, RemovedKey,
    UniqueKeyRow,
};
pub use models::{
    ColumnSelection, DataModel, ForeignKey, KeyKind, KeyTarget, PrimaryKey, QualifiedIdent,
    TableDef, UniqueKey,
};
pub use resolver::{
    BackendConnection, BackendFlavor, ConnectionError, NameTemplate, ResolveError, ResolvedTable,
    ResolvedTables, ResolverWarning, resolve_remote_tables,
};
pub use validation::{
    NameClash, ReferenceValidationResult, ReferenceViolation, check_references, find_name_clashes,
};
