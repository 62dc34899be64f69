//! Key graph engine
//!
//! Mutation and query operations over the declared keys of a data model,
//! candidate-key enumeration, and the shared report rendering both use.

pub mod candidates;
pub mod error;
pub mod graph;
pub mod report;
pub mod types;

pub use error::{KeyError, KeyResult};
pub use report::DUPLICATE_DISPLAY_CAP;
pub use types::{
    ForeignKeyRow, KeyCandidate, KeyRemoval, PrimaryKeyRow, RemovedKey, UniqueKeyRow,
};
