//! Error types for the Malaria Insights library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for strict loading operations.
///
/// The dashboard never lets these escape a view: they are downgraded to
/// [`Notice`](crate::Notice)s. They surface only from the strict loaders
/// and from configuration parsing.
#[derive(Debug, Error)]
pub enum InsightsError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error parsing a GeoJSON region document.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no header to read.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A selection named a dataset that is not configured.
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Malaria Insights operations.
pub type Result<T> = std::result::Result<T, InsightsError>;
