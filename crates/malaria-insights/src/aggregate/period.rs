//! Time-bucketed totals for trend charts.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::input::Dataset;
use crate::schema::{date_of, month_label, YearMonth};

/// Width of a trend bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Year,
    Quarter,
    #[default]
    Month,
}

impl Granularity {
    /// Bucket a calendar month falls into, as a sortable `(year, index)`.
    fn bucket(&self, ym: YearMonth) -> (i32, u32) {
        match self {
            Granularity::Year => (ym.year, 0),
            Granularity::Quarter => (ym.year, ym.quarter()),
            Granularity::Month => (ym.year, ym.month),
        }
    }

    /// Display label for a bucket: `2023`, `Q2 2023` or `Jan 2023`.
    fn label(&self, (year, index): (i32, u32)) -> String {
        match self {
            Granularity::Year => year.to_string(),
            Granularity::Quarter => format!("Q{index} {year}"),
            Granularity::Month => format!("{} {year}", month_label(index).unwrap_or("?")),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Year => write!(f, "year"),
            Granularity::Quarter => write!(f, "quarter"),
            Granularity::Month => write!(f, "month"),
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "year" | "yearly" | "y" => Ok(Granularity::Year),
            "quarter" | "quarterly" | "q" => Ok(Granularity::Quarter),
            "month" | "monthly" | "m" => Ok(Granularity::Month),
            _ => Err(format!("Unknown granularity: {s}. Use year, quarter, or month.")),
        }
    }
}

/// Total for one time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotal {
    pub year: i32,
    /// Quarter (1-4) or month (1-12) within the year; 0 for yearly buckets.
    pub index: u32,
    pub label: String,
    pub total: f64,
}

/// Chronological bucket totals plus the count of rows whose date could not
/// be read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSeries {
    pub points: Vec<PeriodTotal>,
    /// Records skipped because the date was missing or malformed.
    pub malformed: usize,
}

/// Sum `value_field` into year, quarter or month buckets of `date_field`.
///
/// Returns `None` when either field is absent. Records whose date does not
/// parse are left out of every bucket and counted in `malformed`.
pub fn bucket_by_period(
    dataset: &Dataset,
    date_field: &str,
    value_field: &str,
    granularity: Granularity,
) -> Option<PeriodSeries> {
    let date_idx = dataset.column_index(date_field)?;
    let value_idx = dataset.column_index(value_field)?;

    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    let mut malformed = 0;

    for record in &dataset.records {
        let Some(date) = date_of(record.get(date_idx)) else {
            malformed += 1;
            continue;
        };
        let bucket = granularity.bucket(YearMonth::from_date(date));
        *buckets.entry(bucket).or_insert(0.0) += record.get(value_idx).amount();
    }

    let points = buckets
        .into_iter()
        .map(|(bucket, total)| PeriodTotal {
            year: bucket.0,
            index: bucket.1,
            label: granularity.label(bucket),
            total,
        })
        .collect();

    Some(PeriodSeries { points, malformed })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated() -> Dataset {
        Dataset::from_rows(
            "opd",
            &["date", "Total"],
            &[
                vec!["2023-05-01", "4"],
                vec!["2022-12-01", "1"],
                vec!["2023-04-01", "2"],
                vec!["2023-01-01", "3"],
                vec!["not-a-date", "100"],
                vec!["", "100"],
            ],
        )
    }

    fn labels(series: &PeriodSeries) -> Vec<&str> {
        series.points.iter().map(|p| p.label.as_str()).collect()
    }

    #[test]
    fn test_bucket_by_month() {
        let series = bucket_by_period(&dated(), "date", "Total", Granularity::Month).unwrap();
        assert_eq!(labels(&series), vec!["Dec 2022", "Jan 2023", "Apr 2023", "May 2023"]);
        assert_eq!(series.malformed, 2);
    }

    #[test]
    fn test_bucket_by_quarter() {
        let series = bucket_by_period(&dated(), "date", "Total", Granularity::Quarter).unwrap();
        assert_eq!(labels(&series), vec!["Q4 2022", "Q1 2023", "Q2 2023"]);
        assert_eq!(series.points[2].total, 6.0);
    }

    #[test]
    fn test_bucket_by_year() {
        let series = bucket_by_period(&dated(), "date", "Total", Granularity::Year).unwrap();
        assert_eq!(labels(&series), vec!["2022", "2023"]);
        assert_eq!(series.points[1].total, 9.0);
    }

    #[test]
    fn test_bucket_absent_field() {
        assert!(bucket_by_period(&dated(), "period", "Total", Granularity::Month).is_none());
    }

    #[test]
    fn test_granularity_from_str() {
        assert_eq!("Quarter".parse::<Granularity>().unwrap(), Granularity::Quarter);
        assert_eq!("m".parse::<Granularity>().unwrap(), Granularity::Month);
        assert!("weekly".parse::<Granularity>().is_err());
    }
}
