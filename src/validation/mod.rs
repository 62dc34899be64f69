//! Validation functionality
//!
//! Name-clash detection and foreign-key reference validation.

pub mod names;
pub mod references;

pub use names::{NameClash, find_name_clashes};
pub use references::{ReferenceValidationResult, ReferenceViolation, check_references};
