//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use malaria_insights::schema::month_text_to_number;
use malaria_insights::Granularity;
use std::path::PathBuf;

/// Malaria Insights: district-level malaria case exploration
#[derive(Parser)]
#[command(name = "malaria-insights")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON configuration file (datasets, region file, column names)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the data files (overrides the config)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured datasets and whether they loaded
    Datasets {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the years, months and districts a dataset offers
    Options {
        /// Dataset name (default: first dataset with data)
        #[arg(long)]
        dataset: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute KPIs, charts and map input for a filter selection
    Report {
        /// Dataset name (default: first dataset with data)
        #[arg(long)]
        dataset: Option<String>,

        /// Restrict to one year
        #[arg(short, long)]
        year: Option<i32>,

        /// Restrict to one month (number or name, e.g. "3" or "Mar")
        #[arg(short, long)]
        month: Option<MonthArg>,

        /// Restrict to districts (repeatable)
        #[arg(long)]
        district: Vec<String>,

        /// Trend bucket width
        #[arg(short, long, default_value = "month")]
        granularity: Granularity,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// A month given on the command line as a number or a name.
#[derive(Clone, Copy, Debug)]
pub struct MonthArg(pub u32);

impl std::str::FromStr for MonthArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        month_text_to_number(s)
            .map(MonthArg)
            .ok_or_else(|| format!("Unknown month: {}. Use 1-12 or a month name.", s))
    }
}
