//! CLI command implementations.

pub mod datasets;
pub mod options;
pub mod report;

use std::path::{Path, PathBuf};

use malaria_insights::{Dashboard, DashboardConfig};

/// Build the dashboard from an optional config file and data-dir override.
pub fn load_dashboard(
    config: Option<&Path>,
    data_dir: Option<PathBuf>,
) -> Result<Dashboard, Box<dyn std::error::Error>> {
    let mut config = match config {
        Some(path) => {
            log::debug!("Loading config from {}", path.display());
            DashboardConfig::from_file(path)?
        }
        None => DashboardConfig::default(),
    };
    if let Some(dir) = data_dir {
        config = config.with_data_dir(dir);
    }
    Ok(Dashboard::with_config(config))
}

/// Dataset choice from an optional `--dataset` flag.
pub fn dataset_choice(dataset: Option<String>) -> malaria_insights::Choice<String> {
    dataset.into()
}
