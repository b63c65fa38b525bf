//! Month names, date parsing and year/month inference.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::columns::ResolvedColumns;
use crate::input::{Dataset, Record, Value};

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

/// `2023-01-15`, `2023/1`, `2023-01-15T08:00:00`, `2023-01-15 08:00`.
static YEAR_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})[-/.](\d{1,2})(?:[-/.](\d{1,2}))?(?:[T ].*)?$").unwrap()
});

/// `01/15/2023` or `15/01/2023`.
static YEAR_LAST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})[-/.](\d{1,2})[-/.](\d{4})(?:[T ].*)?$").unwrap()
});

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Short label (`Jan`..`Dec`) for a month number.
pub fn month_label(month: u32) -> Option<&'static str> {
    MONTH_LABELS.get(month.checked_sub(1)? as usize).copied()
}

/// Month number from an English month name, full or abbreviated.
fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.to_ascii_lowercase().as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}

fn in_month_range(n: u32) -> Option<u32> {
    (1..=12).contains(&n).then_some(n)
}

/// Month number from a parsed cell.
pub fn month_to_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) if n.fract() == 0.0 && *n >= 1.0 && *n <= 12.0 => Some(*n as u32),
        Value::Number(_) | Value::Missing => None,
        Value::Text(s) => month_text_to_number(s),
    }
}

/// Month number from raw text: digits, or a month name in any case.
pub fn month_text_to_number(text: &str) -> Option<u32> {
    let s = text.trim();
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().ok().and_then(in_month_range);
    }
    month_from_name(s)
}

/// Integer year from a cell (`2021`, `2021.0`, `" 2021 "`).
pub fn year_of(value: &Value) -> Option<i32> {
    let n = match value {
        Value::Number(n) => *n,
        Value::Text(s) => s.trim().parse::<f64>().ok()?,
        Value::Missing => return None,
    };
    (n.fract() == 0.0 && n.abs() <= i32::MAX as f64).then_some(n as i32)
}

/// Parse a date-like string. Partial dates (year and month only) resolve to
/// the first of the month. Returns `None` for anything unrecognised.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = YEAR_FIRST.captures(s) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps.get(3).map_or(Some(1), |d| d.as_str().parse().ok())?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = YEAR_LAST.captures(s) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        // Month-first unless the first part cannot be a month.
        let (month, day) = if first <= 12 { (first, second) } else { (second, first) };
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    parse_named_month_date(s)
}

/// `Jan 2023`, `2023-January`, `15 March 2023`, `March 15, 2023`.
fn parse_named_month_date(s: &str) -> Option<NaiveDate> {
    let mut year = None;
    let mut month = None;
    let mut day = None;

    for token in s.split(|c: char| !c.is_ascii_alphanumeric()).filter(|t| !t.is_empty()) {
        if token.chars().all(|c| c.is_ascii_digit()) {
            match token.len() {
                4 if year.is_none() => year = token.parse().ok(),
                1 | 2 if day.is_none() => day = token.parse().ok(),
                _ => return None,
            }
        } else if month.is_none() {
            month = Some(month_from_name(token)?);
        } else {
            return None;
        }
    }

    NaiveDate::from_ymd_opt(year?, month?, day.unwrap_or(1))
}

/// Date reading of a cell; only text cells carry dates.
pub fn date_of(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Text(s) => parse_date(s),
        _ => None,
    }
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Quarter number, 1..=4.
    pub fn quarter(&self) -> u32 {
        (self.month - 1) / 3 + 1
    }
}

/// Column positions used to read a record's year and month.
///
/// Explicit year/month columns win over a date column, per dimension and
/// per dataset (not per record).
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodColumns {
    year: Option<usize>,
    month: Option<usize>,
    date: Option<usize>,
}

impl PeriodColumns {
    pub fn new(dataset: &Dataset, columns: &ResolvedColumns) -> Self {
        let index = |name: &Option<String>| name.as_deref().and_then(|n| dataset.column_index(n));
        Self {
            year: index(&columns.year),
            month: index(&columns.month),
            date: index(&columns.date),
        }
    }

    pub fn has_year(&self) -> bool {
        self.year.is_some() || self.date.is_some()
    }

    pub fn has_month(&self) -> bool {
        self.month.is_some() || self.date.is_some()
    }

    pub fn year(&self, record: &Record) -> Option<i32> {
        match (self.year, self.date) {
            (Some(idx), _) => year_of(record.get(idx)),
            (None, Some(idx)) => date_of(record.get(idx)).map(|d| d.year()),
            (None, None) => None,
        }
    }

    pub fn month(&self, record: &Record) -> Option<u32> {
        match (self.month, self.date) {
            (Some(idx), _) => month_to_number(record.get(idx)),
            (None, Some(idx)) => date_of(record.get(idx)).map(|d| d.month()),
            (None, None) => None,
        }
    }
}

/// Years and months available for filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearMonthDomain {
    pub years: BTreeSet<i32>,
    pub months: BTreeSet<u32>,
}

/// Collect the years and months present in a dataset.
///
/// Explicit year/month columns are read first; a dimension that is still
/// empty afterwards is derived from the date column. Without any of these
/// columns the dimension stays empty and only "All" can be offered.
pub fn infer_year_month_domain(dataset: &Dataset, columns: &ResolvedColumns) -> YearMonthDomain {
    let mut domain = YearMonthDomain::default();
    if dataset.is_empty() {
        return domain;
    }

    if let Some(values) = columns.year.as_deref().and_then(|c| dataset.column_values(c)) {
        domain.years.extend(values.filter_map(year_of));
    }
    if let Some(values) = columns.month.as_deref().and_then(|c| dataset.column_values(c)) {
        domain.months.extend(values.filter_map(month_to_number));
    }

    if domain.years.is_empty() || domain.months.is_empty() {
        if let Some(values) = columns.date.as_deref().and_then(|c| dataset.column_values(c)) {
            let dates: Vec<NaiveDate> = values.filter_map(date_of).collect();
            if domain.years.is_empty() {
                domain.years.extend(dates.iter().map(|d| d.year()));
            }
            if domain.months.is_empty() {
                domain.months.extend(dates.iter().map(|d| d.month()));
            }
        }
    }

    domain
}

/// Derive a `YYYY-MM-01` date column from separate year and month columns.
///
/// Returns a new dataset; an existing column called `name` is overwritten.
/// Rows whose year or month cannot be read get a missing date.
pub fn with_period_column(
    dataset: &Dataset,
    year_field: &str,
    month_field: &str,
    name: &str,
) -> Dataset {
    let (Some(year_idx), Some(month_idx)) =
        (dataset.column_index(year_field), dataset.column_index(month_field))
    else {
        return dataset.clone();
    };

    let mut derived = dataset.clone();
    let target = match derived.column_index(name) {
        Some(idx) => idx,
        None => {
            derived.columns.push(name.to_string());
            derived.columns.len() - 1
        }
    };

    for record in &mut derived.records {
        let period = match (year_of(record.get(year_idx)), month_to_number(record.get(month_idx))) {
            (Some(y), Some(m)) => Value::Text(format!("{y:04}-{m:02}-01")),
            _ => Value::Missing,
        };
        record.set(target, period);
    }

    derived
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnCandidates;

    #[test]
    fn test_month_to_number_variants() {
        assert_eq!(month_to_number(&Value::Number(1.0)), Some(1));
        assert_eq!(month_to_number(&Value::Text("1".into())), Some(1));
        assert_eq!(month_to_number(&Value::Text("Jan".into())), Some(1));
        assert_eq!(month_to_number(&Value::Text("january".into())), Some(1));
        assert_eq!(month_to_number(&Value::Text(" SEPT ".into())), Some(9));
        assert_eq!(month_to_number(&Value::Text("12".into())), Some(12));
    }

    #[test]
    fn test_month_to_number_rejects() {
        assert_eq!(month_to_number(&Value::Number(13.0)), None);
        assert_eq!(month_to_number(&Value::Number(0.0)), None);
        assert_eq!(month_to_number(&Value::Number(2.5)), None);
        assert_eq!(month_to_number(&Value::Text("Smarch".into())), None);
        assert_eq!(month_to_number(&Value::Missing), None);
    }

    #[test]
    fn test_month_label_round_trip() {
        for m in 1..=12 {
            let label = month_label(m).unwrap();
            assert_eq!(month_text_to_number(label), Some(m));
            assert_eq!(month_text_to_number(&label.to_uppercase()), Some(m));
        }
        assert_eq!(month_label(0), None);
        assert_eq!(month_label(13), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let jan15 = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        let jan1 = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();

        assert_eq!(parse_date("2023-01-15"), Some(jan15));
        assert_eq!(parse_date("2023/01/15"), Some(jan15));
        assert_eq!(parse_date("2023-01-15T08:30:00"), Some(jan15));
        assert_eq!(parse_date("01/15/2023"), Some(jan15));
        assert_eq!(parse_date("15/01/2023"), Some(jan15));
        assert_eq!(parse_date("2023-01"), Some(jan1));
        assert_eq!(parse_date("2023-January"), Some(jan1));
        assert_eq!(parse_date("Jan 2023"), Some(jan1));
        assert_eq!(parse_date("January 15, 2023"), Some(jan15));
    }

    #[test]
    fn test_parse_date_malformed() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2023-13-01"), None);
        assert_eq!(parse_date("2023-02-30"), None);
        assert_eq!(parse_date("Jan Feb 2023"), None);
    }

    #[test]
    fn test_year_of() {
        assert_eq!(year_of(&Value::Number(2021.0)), Some(2021));
        assert_eq!(year_of(&Value::Text("2021.0".into())), Some(2021));
        assert_eq!(year_of(&Value::Number(2021.5)), None);
        assert_eq!(year_of(&Value::Text("twenty".into())), None);
    }

    #[test]
    fn test_quarter() {
        assert_eq!(YearMonth { year: 2023, month: 1 }.quarter(), 1);
        assert_eq!(YearMonth { year: 2023, month: 6 }.quarter(), 2);
        assert_eq!(YearMonth { year: 2023, month: 12 }.quarter(), 4);
    }

    #[test]
    fn test_domain_from_explicit_columns() {
        let ds = Dataset::from_rows(
            "opd",
            &["year", "month", "Total"],
            &[vec!["2022", "March", "1"], vec!["2021", "Jan", "2"], vec!["2021", "bogus", "3"]],
        );
        let cols = ResolvedColumns::resolve(&ds, &ColumnCandidates::default());
        let domain = infer_year_month_domain(&ds, &cols);

        assert_eq!(domain.years.into_iter().collect::<Vec<_>>(), vec![2021, 2022]);
        assert_eq!(domain.months.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_domain_falls_back_to_date() {
        let ds = Dataset::from_rows(
            "chw",
            &["year", "report_date"],
            &[vec!["2020", "2020-04-10"], vec!["2020", "garbage"], vec!["2020", "2020-07-01"]],
        );
        let cols = ResolvedColumns::resolve(&ds, &ColumnCandidates::default());
        let domain = infer_year_month_domain(&ds, &cols);

        assert_eq!(domain.years.into_iter().collect::<Vec<_>>(), vec![2020]);
        assert_eq!(domain.months.into_iter().collect::<Vec<_>>(), vec![4, 7]);
    }

    #[test]
    fn test_domain_without_period_columns() {
        let ds = Dataset::from_rows("x", &["district"], &[vec!["A"]]);
        let cols = ResolvedColumns::resolve(&ds, &ColumnCandidates::default());
        assert_eq!(infer_year_month_domain(&ds, &cols), YearMonthDomain::default());
    }

    #[test]
    fn test_with_period_column() {
        let ds = Dataset::from_rows(
            "opd",
            &["year", "month"],
            &[vec!["2021", "February"], vec!["2021", "??"]],
        );
        let derived = with_period_column(&ds, "year", "month", "date");

        assert_eq!(derived.columns, vec!["year", "month", "date"]);
        assert_eq!(derived.records[0].get(2), &Value::Text("2021-02-01".into()));
        assert!(derived.records[1].get(2).is_missing());
        // Source untouched
        assert_eq!(ds.column_count(), 2);
    }
}
