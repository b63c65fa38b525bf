//! Row filtering by year, month and district selections.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::input::Dataset;
use crate::schema::{PeriodColumns, ResolvedColumns};

/// A filter component: everything, or one specific value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Choice<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn as_only(&self) -> Option<&T> {
        match self {
            Choice::All => None,
            Choice::Only(v) => Some(v),
        }
    }
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T> From<Option<T>> for Choice<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Choice::All, Choice::Only)
    }
}

/// The analyst's current selection.
///
/// No check ties the month to the year: an impossible combination simply
/// matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Dataset name; `All` means the first available dataset.
    pub dataset: Choice<String>,
    pub year: Choice<i32>,
    /// Month number, 1..=12.
    pub month: Choice<u32>,
    /// District names. An explicit empty set matches no rows.
    pub districts: Choice<BTreeSet<String>>,
}

impl FilterSelection {
    /// Selection with every component set to `All`.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, name: impl Into<String>) -> Self {
        self.dataset = Choice::Only(name.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Choice::Only(year);
        self
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Choice::Only(month);
        self
    }

    /// Restrict to the given districts. An empty list means "nothing
    /// picked" in a multi-select and maps to `All`.
    pub fn with_districts<I, S>(mut self, districts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = districts.into_iter().map(Into::into).collect();
        self.districts = if set.is_empty() {
            Choice::All
        } else {
            Choice::Only(set)
        };
        self
    }

    /// Whether year, month and district are all `All`.
    pub fn is_unfiltered(&self) -> bool {
        self.year.is_all() && self.month.is_all() && self.districts.is_all()
    }
}

/// Keep the records matching every non-`All` constraint.
///
/// A constraint on a dimension with no resolvable column cannot be
/// evaluated and is ignored; callers report that separately. The result
/// is always a new dataset with the same schema, possibly empty.
pub fn apply_filters(
    dataset: &Dataset,
    columns: &ResolvedColumns,
    selection: &FilterSelection,
) -> Dataset {
    if selection.is_unfiltered() {
        return dataset.clone();
    }

    let period = PeriodColumns::new(dataset, columns);
    let year = selection.year.as_only().filter(|_| period.has_year());
    let month = selection.month.as_only().filter(|_| period.has_month());
    let district_idx = columns
        .district
        .as_deref()
        .and_then(|c| dataset.column_index(c));
    let districts = selection.districts.as_only().zip(district_idx);

    dataset.retain_records(|record| {
        if let Some(&y) = year {
            if period.year(record) != Some(y) {
                return false;
            }
        }
        if let Some(&m) = month {
            if period.month(record) != Some(m) {
                return false;
            }
        }
        if let Some((set, idx)) = districts {
            match record.get(idx).as_text() {
                Some(name) if set.contains(&name) => {}
                _ => return false,
            }
        }
        true
    })
}
