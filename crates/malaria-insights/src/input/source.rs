//! In-memory tables and source metadata.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a dataset came from. Absent on datasets whose file was missing or
/// unreadable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub path: PathBuf,
    pub file_name: String,
    /// `sha256:<hex>` of the raw bytes.
    pub fingerprint: String,
    pub byte_len: u64,
    /// Delimited flavour that was read (`csv`, `tsv`, ...).
    pub format: String,
    pub rows: usize,
    pub columns: usize,
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe a dataset just read from `path`.
    pub fn describe(
        path: PathBuf,
        fingerprint: String,
        byte_len: u64,
        format: impl Into<String>,
        dataset: &Dataset,
    ) -> Self {
        let file_name = path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        Self {
            file_name,
            path,
            fingerprint,
            byte_len,
            format: format.into(),
            rows: dataset.row_count(),
            columns: dataset.column_count(),
            loaded_at: Utc::now(),
        }
    }
}

/// Cell contents treated as missing, compared case-insensitively.
const NULL_MARKERS: &[&str] = &["na", "n/a", "nan", "null", "none", "nil", ".", "-"];

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Classify a raw cell: null-like markers become `Missing`, finite
    /// numbers become `Number`, everything else is kept as trimmed text.
    pub fn parse(raw: &str) -> Self {
        if Self::is_null_value(raw) {
            return Value::Missing;
        }
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(trimmed.to_string()),
        }
    }

    /// Whether a raw cell is blank or one of the usual null markers.
    pub fn is_null_value(raw: &str) -> bool {
        let cell = raw.trim();
        cell.is_empty() || NULL_MARKERS.iter().any(|m| cell.eq_ignore_ascii_case(m))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric reading of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Contribution of this cell to a sum. Text and missing cells add zero.
    pub fn amount(&self) -> f64 {
        self.as_f64().unwrap_or(0.0)
    }

    /// Text form used for grouping and equality against user selections.
    ///
    /// Integral numbers print without a fractional part so that a numeric
    /// district code `7` matches the selection `"7"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Text(s) => Some(s.clone()),
            Value::Missing => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(raw: &str) -> Self {
        Value::parse(raw)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

/// One row of a [`Dataset`], positionally aligned with its columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Cell at a column position; out-of-range positions read as missing.
    pub fn get(&self, index: usize) -> &Value {
        static MISSING: Value = Value::Missing;
        self.values.get(index).unwrap_or(&MISSING)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Overwrite a cell, padding with missing values when the row is short.
    pub(crate) fn set(&mut self, index: usize, value: Value) {
        if index >= self.values.len() {
            self.values.resize(index + 1, Value::Missing);
        }
        self.values[index] = value;
    }
}

/// A named table of case-count records.
///
/// Datasets are treated as immutable once loaded: every filtering or
/// derivation step builds a new one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Display name (e.g. "OPD").
    pub name: String,
    /// Column headers in file order.
    pub columns: Vec<String>,
    /// Rows in file order.
    pub records: Vec<Record>,
    /// Present only when the table was read from an existing file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, columns: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            columns,
            records,
            source: None,
        }
    }

    /// An empty dataset with no schema, standing in for a missing source.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new(), Vec::new())
    }

    /// Build a dataset from raw string rows, classifying each cell.
    pub fn from_rows<S: AsRef<str>>(
        name: impl Into<String>,
        columns: &[&str],
        rows: &[Vec<S>],
    ) -> Self {
        let records = rows
            .iter()
            .map(|row| Record::new(row.iter().map(|c| Value::parse(c.as_ref())).collect()))
            .collect();
        Self::new(
            name,
            columns.iter().map(|c| c.to_string()).collect(),
            records,
        )
    }

    /// Rename the dataset (used when the catalog assigns display names).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of one column in record order, or `None` if it is not in the schema.
    pub fn column_values(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        let index = self.column_index(name)?;
        Some(self.records.iter().map(move |r| r.get(index)))
    }

    /// Derive a new dataset holding the records accepted by `keep`.
    ///
    /// The schema is preserved, so an empty result still resolves the
    /// same columns as its parent.
    pub fn retain_records(&self, mut keep: impl FnMut(&Record) -> bool) -> Self {
        Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
            source: self.source.clone(),
        }
    }
}
