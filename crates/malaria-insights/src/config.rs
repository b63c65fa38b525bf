//! Dashboard configuration: where the files live and how to read them.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{InsightsError, Result};
use crate::input::DEFAULT_REGION_KEY;
use crate::schema::ColumnCandidates;

/// A named dataset file, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSource {
    /// Name shown in the dataset selector.
    pub name: String,
    pub file: PathBuf,
}

impl DatasetSource {
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
        }
    }
}

/// Configuration for a [`Dashboard`](crate::Dashboard).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory that relative dataset and region paths resolve against.
    pub data_dir: PathBuf,
    /// Datasets in selector order.
    pub datasets: Vec<DatasetSource>,
    /// GeoJSON district boundaries (None = no map).
    pub regions_file: Option<PathBuf>,
    /// Feature property holding the district name.
    pub region_key: String,
    /// Candidate column names per logical field.
    pub columns: ColumnCandidates,
    /// Bars in the top-districts chart.
    pub top_districts: usize,
    /// Bars in the top-sectors chart.
    pub top_sectors: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            datasets: vec![
                DatasetSource::new("OPD", "opd.csv"),
                DatasetSource::new("Community", "community.csv"),
                DatasetSource::new("Fever", "fever.csv"),
            ],
            regions_file: Some(PathBuf::from("rwanda_adm2.geojson")),
            region_key: DEFAULT_REGION_KEY.to_string(),
            columns: ColumnCandidates::default(),
            top_districts: 15,
            top_sectors: 30,
        }
    }
}

impl DashboardConfig {
    /// Defaults rooted at a different data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Load a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| InsightsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a dashboard.
    pub fn validate(&self) -> Result<()> {
        if self.datasets.is_empty() {
            return Err(InsightsError::Config("no datasets configured".to_string()));
        }
        for (i, ds) in self.datasets.iter().enumerate() {
            if ds.name.trim().is_empty() {
                return Err(InsightsError::Config(format!("dataset #{} has no name", i + 1)));
            }
            if self.datasets[..i].iter().any(|d| d.name == ds.name) {
                return Err(InsightsError::Config(format!(
                    "duplicate dataset name '{}'",
                    ds.name
                )));
            }
        }
        if self.region_key.trim().is_empty() {
            return Err(InsightsError::Config("region_key is empty".to_string()));
        }
        Ok(())
    }

    /// Resolve a configured path against the data directory.
    pub fn resolve_path(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.data_dir.join(file)
        }
    }

    pub fn regions_path(&self) -> Option<PathBuf> {
        self.regions_file.as_deref().map(|f| self.resolve_path(f))
    }
}
