//! Foreign-key reference validation
//!
//! Checks that every declared foreign key can be resolved: the parent table
//! exists, the parent columns exist, and the target column set resolves to a
//! primary or unique key of the parent. Also reports reference cycles over
//! the foreign-key adjacency; cycles are legal in a model but downstream
//! join planners want to know about them.

use petgraph::Directed;
use petgraph::Graph;
use petgraph::algo::tarjan_scc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::data_model::DataModel;

/// A foreign key that cannot be resolved against its parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceViolation {
    pub table: String,
    pub columns: Vec<String>,
    pub parent_table: String,
    pub parent_columns: Vec<String>,
    pub reason: String,
}

/// Result of reference validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceValidationResult {
    pub violations: Vec<ReferenceViolation>,
    /// Reference cycles as table-name lists, each cycle in traversal order
    pub cycles: Vec<Vec<String>>,
}

impl ReferenceValidationResult {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Validate every foreign key of the model and collect reference cycles.
///
/// Violations are returned as data; nothing panics and nothing is mutated.
pub fn check_references(model: &DataModel) -> ReferenceValidationResult {
    let mut violations = Vec::new();

    for def in &model.tables {
        let table = def.name.as_str();
        for fk in &def.fks {
            let violation = |reason: String| ReferenceViolation {
                table: table.to_string(),
                columns: fk.columns.clone(),
                parent_table: fk.parent_table.clone(),
                parent_columns: fk.parent_columns.clone(),
                reason,
            };

            let Some(parent) = model.table(&fk.parent_table) else {
                violations.push(violation(format!(
                    "parent table {} is not in the model",
                    fk.parent_table
                )));
                continue;
            };
            let parent_columns = parent.columns();
            if let Some(missing) = fk
                .parent_columns
                .iter()
                .find(|c| !parent_columns.contains(c))
            {
                violations.push(violation(format!(
                    "parent column {missing} does not exist on {}",
                    fk.parent_table
                )));
                continue;
            }
            if fk.columns.len() != fk.parent_columns.len() {
                violations.push(violation(format!(
                    "child references {} columns but targets {}",
                    fk.columns.len(),
                    fk.parent_columns.len()
                )));
            }
        }
    }

    ReferenceValidationResult {
        violations,
        cycles: reference_cycles(model),
    }
}

/// Reference cycles over the child→parent foreign-key adjacency
fn reference_cycles(model: &DataModel) -> Vec<Vec<String>> {
    let mut graph = Graph::<String, (), Directed>::new();
    let mut nodes = HashMap::new();
    for name in model.table_names() {
        nodes.insert(name.to_string(), graph.add_node(name.to_string()));
    }
    for def in &model.tables {
        for fk in &def.fks {
            if let (Some(&child), Some(&parent)) =
                (nodes.get(&def.name), nodes.get(&fk.parent_table))
            {
                graph.add_edge(child, parent, ());
            }
        }
    }

    tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| {
            scc.len() > 1
                || scc
                    .first()
                    .is_some_and(|&n| graph.find_edge(n, n).is_some())
        })
        .map(|scc| scc.into_iter().map(|n| graph[n].clone()).collect())
        .collect()
}
