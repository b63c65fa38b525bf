//! Delimited-text reader for case tables.

use std::io::BufRead;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::source::{Dataset, Record, SourceMetadata, Value};
use crate::error::{InsightsError, Result};

/// Candidate delimiters, in tie-break order.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Non-blank lines sampled when sniffing the delimiter.
const SNIFF_LINES: usize = 10;

/// File extensions accepted as tabular sources.
const TABULAR_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// Reader settings.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Fixed delimiter; sniffed from the content when unset.
    pub delimiter: Option<u8>,
    /// Stop after this many data rows.
    pub max_rows: Option<usize>,
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Parses delimited case-count files into [`Dataset`]s.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Whether the path carries an extension this parser reads.
    pub fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| TABULAR_EXTENSIONS.iter().any(|t| ext.eq_ignore_ascii_case(t)))
    }

    /// Read a file into a dataset named after its stem, with source metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        if !Self::is_supported(path) {
            return Err(InsightsError::UnsupportedFormat(path.display().to_string()));
        }

        let contents = std::fs::read(path).map_err(|source| InsightsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let fingerprint = format!("sha256:{:x}", Sha256::digest(&contents));

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => sniff_delimiter(&contents)?,
        };

        let mut dataset = self.parse_bytes(&contents, delimiter, file_stem(path))?;
        let metadata = SourceMetadata::describe(
            path.to_path_buf(),
            fingerprint,
            contents.len() as u64,
            format_name(delimiter),
            &dataset,
        );
        dataset.source = Some(metadata);
        Ok(dataset)
    }

    /// Parse an in-memory table. A header with no rows is a valid empty table.
    ///
    /// Short rows are padded with missing cells and long rows truncated to
    /// the header width.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8, name: String) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        if columns.iter().all(|c| c.is_empty()) {
            return Err(InsightsError::EmptyData(format!("'{name}' has no header row")));
        }

        let width = columns.len();
        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        let records = reader
            .records()
            .take(limit)
            .map(|row| {
                let row = row?;
                let mut values: Vec<Value> = row.iter().take(width).map(Value::parse).collect();
                values.resize(width, Value::Missing);
                Ok(Record::new(values))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Dataset::new(name, columns, records))
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn format_name(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}

/// Read a delimited table, degrading to an empty dataset.
///
/// Missing files, unsupported extensions and parse failures all produce an
/// empty dataset without [`SourceMetadata`]; callers check `source` to tell
/// a genuinely empty file from an unavailable one.
pub fn load_table(path: impl AsRef<Path>) -> Dataset {
    let path = path.as_ref();
    let name = file_stem(path);

    if !path.exists() {
        log::warn!("Data file '{}' was not found", path.display());
        return Dataset::empty(name);
    }

    match Parser::new().parse_file(path) {
        Ok(dataset) => {
            log::info!(
                "Loaded {} rows x {} columns from '{}'",
                dataset.row_count(),
                dataset.column_count(),
                path.display()
            );
            dataset
        }
        Err(e) => {
            log::warn!("Could not read '{}': {}", path.display(), e);
            Dataset::empty(name)
        }
    }
}

/// Pick the delimiter that splits the sampled lines most evenly.
///
/// A delimiter must appear in the header. Candidates whose count is the
/// same on every sampled line beat ragged ones, then the wider split wins,
/// then [`DELIMITERS`] order.
fn sniff_delimiter(bytes: &[u8]) -> Result<u8> {
    let sample: Vec<String> = bytes
        .lines()
        .map_while(|line| line.ok())
        .filter(|line| !line.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    let Some(header) = sample.first() else {
        return Err(InsightsError::EmptyData("nothing to sniff a delimiter from".to_string()));
    };

    let best = DELIMITERS
        .iter()
        .enumerate()
        .filter_map(|(order, &delim)| {
            let width = unquoted_count(header, delim);
            if width == 0 {
                return None;
            }
            let steady = sample.iter().all(|line| unquoted_count(line, delim) == width);
            Some((delim, (steady, width, std::cmp::Reverse(order))))
        })
        .max_by_key(|(_, rank)| *rank)
        .map(|(delim, _)| delim);

    Ok(best.unwrap_or(b','))
}

/// Occurrences of `delimiter` outside double quotes.
fn unquoted_count(line: &str, delimiter: u8) -> usize {
    let target = char::from(delimiter);
    line.chars()
        .scan(false, |quoted, c| {
            if c == '"' {
                *quoted = !*quoted;
            }
            Some(!*quoted && c == target)
        })
        .filter(|&hit| hit)
        .count()
}
