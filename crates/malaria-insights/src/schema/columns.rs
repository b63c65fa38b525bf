//! Resolution of logical fields against loosely-named dataset columns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::input::Dataset;

/// The fields the dashboard knows how to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    District,
    Sector,
    Value,
    Year,
    Month,
    Date,
    AgeCategory,
    Gender,
}

impl LogicalField {
    pub const ALL: [LogicalField; 8] = [
        LogicalField::District,
        LogicalField::Sector,
        LogicalField::Value,
        LogicalField::Year,
        LogicalField::Month,
        LogicalField::Date,
        LogicalField::AgeCategory,
        LogicalField::Gender,
    ];

    /// Get a human-readable label for the field.
    pub fn label(&self) -> &'static str {
        match self {
            LogicalField::District => "district",
            LogicalField::Sector => "sector",
            LogicalField::Value => "case count",
            LogicalField::Year => "year",
            LogicalField::Month => "month",
            LogicalField::Date => "date",
            LogicalField::AgeCategory => "age category",
            LogicalField::Gender => "gender",
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Priority-ordered column names tried for each logical field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnCandidates {
    pub district: Vec<String>,
    pub sector: Vec<String>,
    pub value: Vec<String>,
    pub year: Vec<String>,
    pub month: Vec<String>,
    pub date: Vec<String>,
    pub age_category: Vec<String>,
    pub gender: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnCandidates {
    fn default() -> Self {
        Self {
            district: names(&["district_clean", "district", "District", "adm2_name"]),
            sector: names(&["sector", "Sector", "sector_name"]),
            value: names(&["Total", "total", "cases", "Cases", "value"]),
            year: names(&["year", "Year", "YEAR"]),
            month: names(&["month", "Month", "MONTH"]),
            date: names(&["date", "Date", "period", "Period", "report_date", "month_date"]),
            age_category: names(&["age_category", "Age Category", "age_group", "age"]),
            gender: names(&["gender", "Gender", "sex", "Sex"]),
        }
    }
}

impl ColumnCandidates {
    /// Candidate list for a field.
    pub fn for_field(&self, field: LogicalField) -> &[String] {
        match field {
            LogicalField::District => &self.district,
            LogicalField::Sector => &self.sector,
            LogicalField::Value => &self.value,
            LogicalField::Year => &self.year,
            LogicalField::Month => &self.month,
            LogicalField::Date => &self.date,
            LogicalField::AgeCategory => &self.age_category,
            LogicalField::Gender => &self.gender,
        }
    }
}

/// Return the first candidate present in the dataset's schema.
pub fn resolve_column<S: AsRef<str>>(dataset: &Dataset, candidates: &[S]) -> Option<String> {
    candidates
        .iter()
        .map(AsRef::as_ref)
        .find(|name| dataset.has_column(name))
        .map(str::to_string)
}

/// Column names resolved once per dataset, before any grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColumns {
    pub district: Option<String>,
    pub sector: Option<String>,
    pub value: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
    pub date: Option<String>,
    pub age_category: Option<String>,
    pub gender: Option<String>,
}

impl ResolvedColumns {
    /// Resolve every logical field against the dataset's schema.
    pub fn resolve(dataset: &Dataset, candidates: &ColumnCandidates) -> Self {
        let pick = |field| resolve_column(dataset, candidates.for_field(field));
        Self {
            district: pick(LogicalField::District),
            sector: pick(LogicalField::Sector),
            value: pick(LogicalField::Value),
            year: pick(LogicalField::Year),
            month: pick(LogicalField::Month),
            date: pick(LogicalField::Date),
            age_category: pick(LogicalField::AgeCategory),
            gender: pick(LogicalField::Gender),
        }
    }

    /// Resolved column for a field, if any.
    pub fn get(&self, field: LogicalField) -> Option<&str> {
        let column = match field {
            LogicalField::District => &self.district,
            LogicalField::Sector => &self.sector,
            LogicalField::Value => &self.value,
            LogicalField::Year => &self.year,
            LogicalField::Month => &self.month,
            LogicalField::Date => &self.date,
            LogicalField::AgeCategory => &self.age_category,
            LogicalField::Gender => &self.gender,
        };
        column.as_deref()
    }

    /// Fields that could not be matched to any column.
    pub fn unresolved(&self) -> Vec<LogicalField> {
        LogicalField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }
}
