//! Candidate-key enumeration
//!
//! Scans table columns for sets that could serve as keys and reports why the
//! rest cannot. Feeds human-facing suggestions; independent of the declared
//! key graph.

use std::collections::HashSet;

use super::error::{KeyError, KeyResult};
use super::report::{canonical_columns, membership_report, uniqueness_report};
use super::types::KeyCandidate;
use crate::data::ValueGroup;
use crate::models::column::ColumnSelection;
use crate::models::data_model::DataModel;
use crate::models::key::KeyTarget;

impl DataModel {
    /// Enumerate primary-key candidates on `table`.
    ///
    /// Candidate column sets default to every single column. A set is a
    /// valid candidate iff partitioning the rows by its value tuple yields
    /// only single-member groups and no missing values. Rows come back
    /// candidates-first, then sorted by the column set's canonical text
    /// form; `why` explains each rejection.
    pub fn enum_pk_candidates(
        &self,
        table: &str,
        candidates: Option<Vec<ColumnSelection>>,
    ) -> KeyResult<Vec<KeyCandidate>> {
        let index = self.table_index(table)?;
        let def = &self.tables[index];
        let available = def.columns();

        let sets: Vec<Vec<String>> = match candidates {
            Some(selections) => selections
                .iter()
                .map(|s| s.resolve(table, &available))
                .collect::<KeyResult<_>>()?,
            None => available.iter().map(|c| vec![c.clone()]).collect(),
        };

        let mut rows = Vec::with_capacity(sets.len());
        for columns in sets {
            let groups = def.data.partition(&columns)?;
            let missing: usize = groups
                .iter()
                .filter(|g| g.has_missing())
                .map(|g| g.rows)
                .sum();
            let duplicates: Vec<ValueGroup> = groups
                .into_iter()
                .filter(|g| g.rows > 1 && !g.has_missing())
                .collect();
            let candidate = missing == 0 && duplicates.is_empty();
            let why = if candidate {
                String::new()
            } else {
                uniqueness_report(missing, &duplicates)
            };
            rows.push(KeyCandidate {
                columns,
                candidate,
                why,
            });
        }
        sort_candidates(&mut rows);
        Ok(rows)
    }

    /// Enumerate foreign-key candidates on `table` against the primary key
    /// of `parent_table`.
    ///
    /// The parent must have a single-column primary key. A child column is a
    /// valid candidate iff it has no missing values and every value appears
    /// among the parent key values.
    pub fn enum_fk_candidates(
        &self,
        table: &str,
        parent_table: &str,
    ) -> KeyResult<Vec<KeyCandidate>> {
        let index = self.table_index(table)?;
        let parent_index = self.table_index(parent_table)?;
        let def = &self.tables[index];
        let parent = &self.tables[parent_index];

        let pk = parent.pk.as_ref().ok_or_else(|| KeyError::KeyNotDefined {
            kind: KeyTarget::Primary,
            table: Some(parent_table.to_string()),
        })?;
        if pk.columns.len() != 1 {
            return Err(KeyError::CompoundParentKey(parent_table.to_string()));
        }

        let parent_values: HashSet<String> = parent
            .data
            .partition(&pk.columns)?
            .iter()
            .filter(|g| !g.has_missing())
            .map(|g| ValueGroup::canonical_key(&g.values))
            .collect();

        let mut rows = Vec::new();
        for column in def.columns() {
            let columns = vec![column];
            let groups = def.data.partition(&columns)?;
            let missing: usize = groups
                .iter()
                .filter(|g| g.has_missing())
                .map(|g| g.rows)
                .sum();
            let absent: Vec<ValueGroup> = groups
                .into_iter()
                .filter(|g| {
                    !g.has_missing() && !parent_values.contains(&ValueGroup::canonical_key(&g.values))
                })
                .collect();
            let candidate = missing == 0 && absent.is_empty();
            let why = if candidate {
                String::new()
            } else {
                membership_report(missing, &absent, parent_table, &pk.columns)
            };
            rows.push(KeyCandidate {
                columns,
                candidate,
                why,
            });
        }
        sort_candidates(&mut rows);
        Ok(rows)
    }
}

fn sort_candidates(rows: &mut [KeyCandidate]) {
    rows.sort_by(|a, b| {
        b.candidate
            .cmp(&a.candidate)
            .then_with(|| canonical_columns(&a.columns).cmp(&canonical_columns(&b.columns)))
    });
}
