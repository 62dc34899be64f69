//! Name-clash detection
//!
//! Shared by the resolver's collision step and by table renames.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A group of old names mapped onto one contested new name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameClash {
    pub new_name: String,
    /// Contributing old names, first-seen order
    pub old_names: Vec<String>,
}

/// Group `old_names` by their corresponding `new_name` and return only the
/// groups with two or more members.
///
/// The two sequences must have the same length and correspond pairwise.
/// Group order and member order both preserve first appearance. No I/O,
/// O(n), deterministic.
pub fn find_name_clashes<S1, S2>(old_names: &[S1], new_names: &[S2]) -> Vec<NameClash>
where
    S1: AsRef<str>,
    S2: AsRef<str>,
{
    debug_assert_eq!(old_names.len(), new_names.len());

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<String>> = HashMap::new();
    for (old, new) in old_names.iter().zip(new_names) {
        let entry = groups.entry(new.as_ref().to_string()).or_insert_with(|| {
            order.push(new.as_ref().to_string());
            Vec::new()
        });
        entry.push(old.as_ref().to_string());
    }

    order
        .into_iter()
        .filter_map(|new_name| {
            let old_names = groups.remove(&new_name)?;
            (old_names.len() >= 2).then_some(NameClash {
                new_name,
                old_names,
            })
        })
        .collect()
}
