//! Malaria Insights: case-count exploration for district dashboards.
//!
//! Loads outpatient, community-health-worker and fever-case tables plus
//! district boundaries, filters them by year, month and district, and
//! shapes the result into KPI cards, chart series and choropleth input for
//! whatever UI sits on top.
//!
//! # Core Principles
//!
//! - **Soft failure**: missing files, unknown columns and empty filters
//!   degrade to notices, never to errors
//! - **Non-destructive**: source tables are never modified; every step
//!   derives a new one
//! - **Loose schemas**: columns are found by candidate names, not positions
//!
//! # Example
//!
//! ```no_run
//! use malaria_insights::{Dashboard, DashboardConfig, FilterSelection, Granularity};
//!
//! let dashboard = Dashboard::with_config(DashboardConfig::default().with_data_dir("data"));
//! let selection = FilterSelection::all().with_dataset("OPD").with_year(2023);
//! let view = dashboard.view(&selection, Granularity::Quarter).unwrap();
//!
//! println!("Total cases: {}", view.kpis.total);
//! println!("Top district: {}", view.kpis.top_region.name);
//! ```

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod input;
pub mod notice;
pub mod present;
pub mod schema;

mod dashboard;

pub use crate::dashboard::{
    Dashboard, DashboardView, DatasetSummary, FilterOptions, MonthOption,
};
pub use aggregate::{
    apply_filters, bucket_by_period, count_nonzero_groups, grand_total, sum_by, top_n, Choice,
    FilterSelection, Granularity, GroupKey, GroupTotal, PeriodSeries, PeriodTotal,
};
pub use cache::{CacheStats, SourceCache};
pub use config::{DashboardConfig, DatasetSource};
pub use error::{InsightsError, Result};
pub use input::{
    load_regions, load_table, Dataset, Parser, ParserConfig, Record, Region, RegionCollection,
    SourceMetadata, Value,
};
pub use notice::{Notice, NoticeKind, Severity};
pub use present::{
    to_choropleth_input, to_kpi_set, ChartKind, ChartPoint, ChartSpec, ChoroplethCell,
    ChoroplethInput, KpiSet, Leader,
};
pub use schema::{
    infer_year_month_domain, month_label, month_to_number, parse_date, resolve_column,
    with_period_column, ColumnCandidates, LogicalField, ResolvedColumns, YearMonthDomain,
};
