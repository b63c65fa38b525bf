//! Grouped sums, rankings and active-group counts.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::Dataset;

/// Label shown for the group of records with no value in the group field.
pub const MISSING_GROUP_LABEL: &str = "(missing)";

/// Grouping key. Missing values form their own group instead of being
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupKey {
    Value(String),
    Missing,
}

impl GroupKey {
    pub fn as_str(&self) -> &str {
        match self {
            GroupKey::Value(s) => s,
            GroupKey::Missing => MISSING_GROUP_LABEL,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for GroupKey {
    fn from(s: &str) -> Self {
        GroupKey::Value(s.to_string())
    }
}

/// Sum of the value field for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub key: GroupKey,
    pub total: f64,
}

impl GroupTotal {
    pub fn new(key: impl Into<GroupKey>, total: f64) -> Self {
        Self {
            key: key.into(),
            total,
        }
    }
}

/// Sum `value_field` per distinct `group_field` value.
///
/// Groups come back in order of first occurrence. Non-numeric or missing
/// values contribute zero. Returns `None` when either field is not part of
/// the schema, meaning the dependent feature is unavailable.
pub fn sum_by(dataset: &Dataset, group_field: &str, value_field: &str) -> Option<Vec<GroupTotal>> {
    let group_idx = dataset.column_index(group_field)?;
    let value_idx = dataset.column_index(value_field)?;

    let mut totals: IndexMap<GroupKey, f64> = IndexMap::new();
    for record in &dataset.records {
        let key = record
            .get(group_idx)
            .as_text()
            .map_or(GroupKey::Missing, GroupKey::Value);
        *totals.entry(key).or_insert(0.0) += record.get(value_idx).amount();
    }

    Some(
        totals
            .into_iter()
            .map(|(key, total)| GroupTotal { key, total })
            .collect(),
    )
}

/// Sum of `value_field` over every record, or `None` when it is absent.
pub fn grand_total(dataset: &Dataset, value_field: &str) -> Option<f64> {
    let values = dataset.column_values(value_field)?;
    Some(values.map(|v| v.amount()).sum())
}

/// The `n` largest groups, descending by total.
///
/// Equal totals keep their incoming order.
pub fn top_n(groups: &[GroupTotal], n: usize) -> Vec<GroupTotal> {
    let mut ranked = groups.to_vec();
    // sort_by is stable
    ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
    ranked.truncate(n);
    ranked
}

/// Number of groups whose total is strictly positive.
pub fn count_nonzero_groups(groups: &[GroupTotal]) -> usize {
    groups.iter().filter(|g| g.total > 0.0).count()
}
