//! Shared rendering for key-check and candidate reports
//!
//! Key checks and candidate enumeration describe the same kinds of problems
//! (missing values, duplicate groups, values absent from a parent key), so
//! the text forms live in one place.

use serde_json::Value;

use crate::data::ValueGroup;

/// How many offending groups a report lists before truncating
pub const DUPLICATE_DISPLAY_CAP: usize = 5;

/// Canonical text form of a column set: `id` or `(a, b)`
pub fn canonical_columns(columns: &[String]) -> String {
    if columns.len() == 1 {
        columns[0].clone()
    } else {
        format!("({})", columns.join(", "))
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "NA".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn tuple_text(values: &[Value]) -> String {
    values
        .iter()
        .map(value_text)
        .collect::<Vec<_>>()
        .join(", ")
}

fn capped_list<F: Fn(&ValueGroup) -> String>(groups: &[ValueGroup], render: F) -> String {
    let mut listed: Vec<String> = groups
        .iter()
        .take(DUPLICATE_DISPLAY_CAP)
        .map(|g| render(g))
        .collect();
    if groups.len() > DUPLICATE_DISPLAY_CAP {
        listed.push("…".to_string());
    }
    listed.join(", ")
}

fn join_clauses(clauses: Vec<String>) -> String {
    clauses.join(", and ")
}

/// Report for a uniqueness scan: missing-value count first, then duplicate
/// groups as `<value> (<count>)` under the display cap.
pub fn uniqueness_report(missing: usize, duplicates: &[ValueGroup]) -> String {
    let mut clauses = Vec::new();
    if missing > 0 {
        clauses.push(format!("{missing} missing values"));
    }
    if !duplicates.is_empty() {
        clauses.push(format!(
            "duplicate values: {}",
            capped_list(duplicates, |g| format!("{} ({})", tuple_text(&g.values), g.rows))
        ));
    }
    join_clauses(clauses)
}

/// Report for a parent-membership scan: missing-value count first, then the
/// child values absent from the parent key.
pub fn membership_report(
    missing: usize,
    absent: &[ValueGroup],
    parent_table: &str,
    parent_columns: &[String],
) -> String {
    let mut clauses = Vec::new();
    if missing > 0 {
        clauses.push(format!("{missing} missing values"));
    }
    if !absent.is_empty() {
        clauses.push(format!(
            "values not in {}.{}: {}",
            parent_table,
            canonical_columns(parent_columns),
            capped_list(absent, |g| tuple_text(&g.values))
        ));
    }
    join_clauses(clauses)
}
