//! Key graph mutation engine
//!
//! Add/remove/list operations over the keys of a data model. All mutations
//! are snapshot-functional: they take the current model by reference and
//! return a new one, or an error with the prior snapshot untouched.

use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use super::error::{KeyError, KeyResult};
use super::report::{canonical_columns, membership_report, uniqueness_report};
use super::types::{ForeignKeyRow, KeyRemoval, PrimaryKeyRow, RemovedKey, UniqueKeyRow};
use crate::data::ValueGroup;
use crate::models::column::ColumnSelection;
use crate::models::data_model::DataModel;
use crate::models::key::{ForeignKey, KeyKind, KeyTarget, PrimaryKey, UniqueKey};
use crate::models::table::TableDef;

impl DataModel {
    /// Declare a primary key on `table`.
    ///
    /// Fails with `KeySetConflict` if the table already has a primary key,
    /// unless `force` is set, in which case the old key is replaced in
    /// place. Foreign keys still pointing at the old columns are left
    /// intact; those columns surface as an implicit unique key in
    /// `get_all_uks` for as long as a foreign key targets them.
    ///
    /// With `check`, the currently visible rows are scanned for uniqueness
    /// and absence of missing values before anything is committed.
    pub fn add_pk(
        &self,
        table: &str,
        columns: impl Into<ColumnSelection>,
        autoincrement: bool,
        force: bool,
        check: bool,
    ) -> KeyResult<Self> {
        let selection = columns.into();
        // Compound autoincrement is rejected before any other validation
        if autoincrement
            && let ColumnSelection::Names(names) = &selection
            && names.len() > 1
        {
            return Err(KeyError::CompositeAutoincrement { count: names.len() });
        }

        let index = self.table_index(table)?;
        let def = &self.tables[index];
        let columns = selection.resolve(table, &def.columns())?;
        if autoincrement && columns.len() > 1 {
            return Err(KeyError::CompositeAutoincrement {
                count: columns.len(),
            });
        }

        if def.pk.is_some() && !force {
            return Err(KeyError::KeySetConflict {
                table: table.to_string(),
                reason: "a primary key is already set; pass force to replace it".to_string(),
            });
        }
        if check {
            check_unique_values(def, &columns)?;
        }

        let mut next = self.clone();
        let def = &mut next.tables[index];
        def.pk = Some(PrimaryKey {
            columns: columns.clone(),
            autoincrement,
        });
        def.touch();
        info!(
            "Set primary key {} on table {}",
            canonical_columns(&columns),
            table
        );
        Ok(next)
    }

    /// Remove primary keys.
    ///
    /// `table = None` addresses every table; `columns = None` matches
    /// whatever primary key is present. A given selection must match the
    /// declared key columns exactly and in order; partial compound matches
    /// never match. Under strict keys, a call that matches nothing at all is
    /// `KeyNotDefined`; otherwise it is a silent no-op. The removal commits
    /// as one snapshot with a per-table audit trail.
    pub fn rm_pk(
        &self,
        table: Option<&str>,
        columns: Option<ColumnSelection>,
    ) -> KeyResult<KeyRemoval> {
        let scope = match table {
            Some(name) => vec![self.table_index(name)?],
            None => (0..self.tables.len()).collect(),
        };

        let mut next = self.clone();
        let mut removed = Vec::new();
        for index in scope {
            let def = &mut next.tables[index];
            let Some(pk) = &def.pk else { continue };
            if !removal_matches(&columns, &pk.columns, def) {
                continue;
            }
            removed.push(RemovedKey {
                table: def.name.clone(),
                columns: pk.columns.clone(),
                kind: KeyTarget::Primary,
            });
            debug!("Removed primary key from table {}", def.name);
            def.pk = None;
            def.touch();
        }

        if removed.is_empty() && self.is_strict() {
            return Err(KeyError::KeyNotDefined {
                kind: KeyTarget::Primary,
                table: table.map(Into::into),
            });
        }
        Ok(KeyRemoval {
            model: next,
            removed,
        })
    }

    /// Declare a unique key on `table`.
    ///
    /// Fails with `KeySetConflict` when the column set equals the table's
    /// primary key or an already declared unique key, regardless of `check`.
    pub fn add_uk(
        &self,
        table: &str,
        columns: impl Into<ColumnSelection>,
        check: bool,
    ) -> KeyResult<Self> {
        let index = self.table_index(table)?;
        let def = &self.tables[index];
        let columns = columns.into().resolve(table, &def.columns())?;

        if let Some(pk) = &def.pk
            && pk.columns == columns
        {
            return Err(KeyError::KeySetConflict {
                table: table.to_string(),
                reason: format!(
                    "{} already forms the table's primary key",
                    canonical_columns(&columns)
                ),
            });
        }
        if def.uks.iter().any(|uk| uk.columns == columns) {
            return Err(KeyError::KeySetConflict {
                table: table.to_string(),
                reason: format!(
                    "{} is already declared as a unique key",
                    canonical_columns(&columns)
                ),
            });
        }
        if check {
            check_unique_values(def, &columns)?;
        }

        let mut next = self.clone();
        let def = &mut next.tables[index];
        def.uks.push(UniqueKey {
            columns: columns.clone(),
        });
        def.touch();
        info!(
            "Added unique key {} on table {}",
            canonical_columns(&columns),
            table
        );
        Ok(next)
    }

    /// Remove unique keys. Mirrors `rm_pk`; `columns = None` removes every
    /// unique key of the addressed tables, with one audit entry per key.
    pub fn rm_uk(
        &self,
        table: Option<&str>,
        columns: Option<ColumnSelection>,
    ) -> KeyResult<KeyRemoval> {
        let scope = match table {
            Some(name) => vec![self.table_index(name)?],
            None => (0..self.tables.len()).collect(),
        };

        let mut next = self.clone();
        let mut removed = Vec::new();
        for index in scope {
            let def = &mut next.tables[index];
            let table_name = def.name.clone();
            let available = def.data.columns();
            let mut kept = Vec::with_capacity(def.uks.len());
            for uk in def.uks.drain(..) {
                if removal_matches_columns(&columns, &uk.columns, &table_name, &available) {
                    removed.push(RemovedKey {
                        table: table_name.clone(),
                        columns: uk.columns,
                        kind: KeyTarget::Unique,
                    });
                } else {
                    kept.push(uk);
                }
            }
            def.uks = kept;
        }
        for entry in &removed {
            debug!(
                "Removed unique key {} from table {}",
                canonical_columns(&entry.columns),
                entry.table
            );
        }
        touch_removed(&mut next, &removed);

        if removed.is_empty() && self.is_strict() {
            return Err(KeyError::KeyNotDefined {
                kind: KeyTarget::Unique,
                table: table.map(Into::into),
            });
        }
        Ok(KeyRemoval {
            model: next,
            removed,
        })
    }

    /// Declare a foreign key from `table` to `parent_table`.
    ///
    /// With no parent selection the parent's primary key columns are used
    /// (`KeyNotDefined` when the parent has none). With `check`, every child
    /// tuple is verified to be fully present and found among the parent
    /// tuples.
    pub fn add_fk(
        &self,
        table: &str,
        columns: impl Into<ColumnSelection>,
        parent_table: &str,
        parent_columns: Option<ColumnSelection>,
        check: bool,
    ) -> KeyResult<Self> {
        let index = self.table_index(table)?;
        let parent_index = self.table_index(parent_table)?;
        let def = &self.tables[index];
        let parent = &self.tables[parent_index];

        let columns = columns.into().resolve(table, &def.columns())?;
        let parent_columns = match parent_columns {
            Some(selection) => selection.resolve(parent_table, &parent.columns())?,
            None => {
                let pk = parent.pk.as_ref().ok_or_else(|| KeyError::KeyNotDefined {
                    kind: KeyTarget::Primary,
                    table: Some(parent_table.to_string()),
                })?;
                pk.columns.clone()
            }
        };
        if columns.len() != parent_columns.len() {
            return Err(KeyError::ColumnCountMismatch {
                table: table.to_string(),
                child: columns.len(),
                parent_table: parent_table.to_string(),
                parent: parent_columns.len(),
            });
        }
        let duplicate = def.fks.iter().any(|fk| {
            fk.columns == columns
                && fk.parent_table == parent_table
                && fk.parent_columns == parent_columns
        });
        if duplicate {
            return Err(KeyError::KeySetConflict {
                table: table.to_string(),
                reason: format!(
                    "an identical foreign key to {parent_table} is already declared"
                ),
            });
        }
        if check {
            check_parent_membership(def, &columns, parent, &parent_columns)?;
        }

        let mut next = self.clone();
        let def = &mut next.tables[index];
        def.fks.push(ForeignKey {
            columns: columns.clone(),
            parent_table: parent_table.to_string(),
            parent_columns,
        });
        def.touch();
        info!(
            "Added foreign key {} on table {} referencing {}",
            canonical_columns(&columns),
            table,
            parent_table
        );
        Ok(next)
    }

    /// Remove foreign keys by child column set. Mirrors `rm_uk`.
    pub fn rm_fk(
        &self,
        table: Option<&str>,
        columns: Option<ColumnSelection>,
    ) -> KeyResult<KeyRemoval> {
        let scope = match table {
            Some(name) => vec![self.table_index(name)?],
            None => (0..self.tables.len()).collect(),
        };

        let mut next = self.clone();
        let mut removed = Vec::new();
        for index in scope {
            let def = &mut next.tables[index];
            let table_name = def.name.clone();
            let available = def.data.columns();
            let mut kept = Vec::with_capacity(def.fks.len());
            for fk in def.fks.drain(..) {
                if removal_matches_columns(&columns, &fk.columns, &table_name, &available) {
                    removed.push(RemovedKey {
                        table: table_name.clone(),
                        columns: fk.columns,
                        kind: KeyTarget::Foreign,
                    });
                } else {
                    kept.push(fk);
                }
            }
            def.fks = kept;
        }
        for entry in &removed {
            debug!(
                "Removed foreign key {} from table {}",
                canonical_columns(&entry.columns),
                entry.table
            );
        }
        touch_removed(&mut next, &removed);

        if removed.is_empty() && self.is_strict() {
            return Err(KeyError::KeyNotDefined {
                kind: KeyTarget::Foreign,
                table: table.map(Into::into),
            });
        }
        Ok(KeyRemoval {
            model: next,
            removed,
        })
    }

    /// Primary keys in scope: at most one row per table. Honors the caller's
    /// table order when given, otherwise model insertion order.
    pub fn get_all_pks(&self, tables: Option<&[&str]>) -> KeyResult<Vec<PrimaryKeyRow>> {
        let rows = self
            .scope_indices(tables)?
            .into_iter()
            .filter_map(|i| {
                let def = &self.tables[i];
                def.pk.as_ref().map(|pk| PrimaryKeyRow {
                    table: def.name.clone(),
                    columns: pk.columns.clone(),
                    autoincrement: pk.autoincrement,
                })
            })
            .collect();
        Ok(rows)
    }

    /// Unique keys in scope: the union of three tagged, disjoint sources.
    ///
    /// (1) each table's primary key, (2) explicit unique keys, (3) every
    /// foreign-key target column set not already a PK or explicit UK on its
    /// parent. Always recomputed: foreign-key changes on other tables can
    /// create or remove implicit unique keys without touching the affected
    /// table.
    pub fn get_all_uks(&self, tables: Option<&[&str]>) -> KeyResult<Vec<UniqueKeyRow>> {
        let scope = self.scope_indices(tables)?;

        // implicit UKs: parent table -> target column sets, first-seen order
        // over an insertion-ordered scan of every foreign key
        let mut implicit: HashMap<&str, Vec<&Vec<String>>> = HashMap::new();
        for def in &self.tables {
            for fk in &def.fks {
                let Some(parent) = self.table(&fk.parent_table) else {
                    continue;
                };
                let is_pk = parent
                    .pk
                    .as_ref()
                    .is_some_and(|pk| pk.columns == fk.parent_columns);
                let is_uk = parent.uks.iter().any(|uk| uk.columns == fk.parent_columns);
                if is_pk || is_uk {
                    continue;
                }
                let sets = implicit.entry(parent.name.as_str()).or_default();
                if !sets.contains(&&fk.parent_columns) {
                    sets.push(&fk.parent_columns);
                }
            }
        }

        let mut rows = Vec::new();
        for i in scope {
            let def = &self.tables[i];
            if let Some(pk) = &def.pk {
                rows.push(UniqueKeyRow {
                    table: def.name.clone(),
                    columns: pk.columns.clone(),
                    kind: KeyKind::PrimaryKey,
                });
            }
            for uk in &def.uks {
                rows.push(UniqueKeyRow {
                    table: def.name.clone(),
                    columns: uk.columns.clone(),
                    kind: KeyKind::ExplicitUnique,
                });
            }
            for columns in implicit.get(def.name.as_str()).into_iter().flatten() {
                rows.push(UniqueKeyRow {
                    table: def.name.clone(),
                    columns: (*columns).clone(),
                    kind: KeyKind::ImplicitUnique,
                });
            }
        }
        Ok(rows)
    }

    /// Foreign keys in scope, same ordering contract as `get_all_pks`
    pub fn get_all_fks(&self, tables: Option<&[&str]>) -> KeyResult<Vec<ForeignKeyRow>> {
        let mut rows = Vec::new();
        for i in self.scope_indices(tables)? {
            let def = &self.tables[i];
            for fk in &def.fks {
                rows.push(ForeignKeyRow {
                    table: def.name.clone(),
                    columns: fk.columns.clone(),
                    parent_table: fk.parent_table.clone(),
                    parent_columns: fk.parent_columns.clone(),
                });
            }
        }
        Ok(rows)
    }
}

/// Exact ordered match of a removal selection against declared key columns.
/// A selection that cannot resolve on the table (unknown column) is a
/// non-match, not an error, so bulk removals can span heterogeneous tables.
fn removal_matches(
    selection: &Option<ColumnSelection>,
    declared: &[String],
    def: &TableDef,
) -> bool {
    removal_matches_columns(selection, declared, def.name.as_str(), &def.data.columns())
}

fn removal_matches_columns(
    selection: &Option<ColumnSelection>,
    declared: &[String],
    table: &str,
    available: &[String],
) -> bool {
    match selection {
        None => true,
        Some(selection) => selection
            .resolve(table, available)
            .is_ok_and(|resolved| resolved == declared),
    }
}

fn touch_removed(model: &mut DataModel, removed: &[RemovedKey]) {
    let touched: HashSet<&str> = removed.iter().map(|r| r.table.as_str()).collect();
    for def in &mut model.tables {
        if touched.contains(def.name.as_str()) {
            def.touch();
        }
    }
}

/// Scan a table's visible rows for uniqueness and absence of missing values
fn check_unique_values(def: &TableDef, columns: &[String]) -> KeyResult<()> {
    let groups = def.data.partition(columns)?;
    let missing: usize = groups
        .iter()
        .filter(|g| g.has_missing())
        .map(|g| g.rows)
        .sum();
    let duplicates: Vec<ValueGroup> = groups
        .into_iter()
        .filter(|g| g.rows > 1 && !g.has_missing())
        .collect();
    if missing > 0 || !duplicates.is_empty() {
        return Err(KeyError::KeyCheckFailed {
            table: def.name.clone(),
            columns: canonical_columns(columns),
            report: uniqueness_report(missing, &duplicates),
            missing,
            groups: duplicates,
        });
    }
    Ok(())
}

/// Scan child tuples for full presence among the parent tuples
fn check_parent_membership(
    def: &TableDef,
    columns: &[String],
    parent: &TableDef,
    parent_columns: &[String],
) -> KeyResult<()> {
    let parent_tuples: HashSet<String> = parent
        .data
        .partition(parent_columns)?
        .iter()
        .filter(|g| !g.has_missing())
        .map(|g| ValueGroup::canonical_key(&g.values))
        .collect();

    let groups = def.data.partition(columns)?;
    let missing: usize = groups
        .iter()
        .filter(|g| g.has_missing())
        .map(|g| g.rows)
        .sum();
    let absent: Vec<ValueGroup> = groups
        .into_iter()
        .filter(|g| !g.has_missing() && !parent_tuples.contains(&ValueGroup::canonical_key(&g.values)))
        .collect();
    if missing > 0 || !absent.is_empty() {
        return Err(KeyError::KeyCheckFailed {
            table: def.name.clone(),
            columns: canonical_columns(columns),
            report: membership_report(missing, &absent, &parent.name, parent_columns),
            missing,
            groups: absent,
        });
    }
    Ok(())
}
