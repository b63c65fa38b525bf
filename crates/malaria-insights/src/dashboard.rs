//! Main Dashboard struct and public API.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::aggregate::{
    apply_filters, bucket_by_period, sum_by, top_n, Choice, FilterSelection, Granularity,
    GroupTotal,
};
use crate::cache::{CacheStats, SourceCache};
use crate::config::{DashboardConfig, DatasetSource};
use crate::error::{InsightsError, Result};
use crate::input::{load_regions, load_table, Dataset, RegionCollection};
use crate::notice::{Notice, NoticeKind};
use crate::present::{
    to_choropleth_input, to_kpi_set, ChartKind, ChartSpec, ChoroplethInput, KpiSet,
};
use crate::schema::{
    infer_year_month_domain, month_label, with_period_column, LogicalField, ResolvedColumns,
};

/// Column added when a trend has to be built from separate year and month
/// columns.
const DERIVED_PERIOD_COLUMN: &str = "period_start";

/// One entry of the dataset selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub name: String,
    pub path: PathBuf,
    /// Whether the file was found and parsed.
    pub loaded: bool,
    pub row_count: usize,
    pub columns: ResolvedColumns,
}

/// A month offered in the month selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthOption {
    pub number: u32,
    pub label: String,
}

/// Values offered by the year, month and district selectors.
///
/// Empty lists mean the dimension is unavailable and only "All" applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub dataset: String,
    pub years: Vec<i32>,
    pub months: Vec<MonthOption>,
    pub districts: Vec<String>,
}

/// Everything a UI needs to draw one state of the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub dataset: String,
    pub selection: FilterSelection,
    pub granularity: Granularity,
    pub columns: ResolvedColumns,
    /// Rows left after filtering.
    pub row_count: usize,
    pub kpis: KpiSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<ChoroplethInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_districts: Option<ChartSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_sectors: Option<ChartSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_breakdown: Option<ChartSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender_breakdown: Option<ChartSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<ChartSpec>,
    pub notices: Vec<Notice>,
}

/// The dashboard engine: configuration plus the process-wide source caches.
///
/// Each call recomputes its result from the (cached) source tables; no
/// state carries over between calls other than the caches.
pub struct Dashboard {
    config: DashboardConfig,
    tables: SourceCache<Dataset>,
    regions: SourceCache<Option<RegionCollection>>,
}

impl Dashboard {
    /// Create a dashboard with default configuration.
    pub fn new() -> Self {
        Self::with_config(DashboardConfig::default())
    }

    /// Create a dashboard with custom configuration.
    pub fn with_config(config: DashboardConfig) -> Self {
        Self {
            config,
            tables: SourceCache::new(),
            regions: SourceCache::new(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Cache counters for (tables, regions).
    pub fn cache_stats(&self) -> (CacheStats, CacheStats) {
        (self.tables.stats(), self.regions.stats())
    }

    /// Load (or fetch from cache) one configured dataset.
    pub fn dataset(&self, source: &DatasetSource) -> Arc<Dataset> {
        let path = self.config.resolve_path(&source.file);
        self.tables
            .get_or_load(&path, |p| load_table(p).with_name(source.name.clone()))
    }

    /// Load (or fetch from cache) the region boundaries, if configured.
    pub fn region_collection(&self) -> Option<Arc<Option<RegionCollection>>> {
        let path = self.config.regions_path()?;
        let key = self.config.region_key.clone();
        Some(self.regions.get_or_load(&path, |p| load_regions(p, &key)))
    }

    /// Summaries of every configured dataset, in selector order.
    pub fn datasets(&self) -> Vec<DatasetSummary> {
        self.config
            .datasets
            .iter()
            .map(|source| {
                let dataset = self.dataset(source);
                DatasetSummary {
                    name: source.name.clone(),
                    path: self.config.resolve_path(&source.file),
                    loaded: dataset.source.is_some(),
                    row_count: dataset.row_count(),
                    columns: ResolvedColumns::resolve(&dataset, &self.config.columns),
                }
            })
            .collect()
    }

    /// Pick the dataset a selection refers to.
    ///
    /// `All` falls back to the first dataset with rows, then to the first
    /// configured one so a view can still report what is missing.
    fn select(&self, choice: &Choice<String>) -> Result<(&DatasetSource, Arc<Dataset>)> {
        match choice {
            Choice::Only(name) => {
                let source = self
                    .config
                    .datasets
                    .iter()
                    .find(|d| &d.name == name)
                    .ok_or_else(|| InsightsError::UnknownDataset(name.clone()))?;
                Ok((source, self.dataset(source)))
            }
            Choice::All => {
                let loaded: Vec<_> = self
                    .config
                    .datasets
                    .iter()
                    .map(|s| (s, self.dataset(s)))
                    .collect();
                let fallback = loaded.iter().position(|(_, d)| !d.is_empty()).unwrap_or(0);
                loaded
                    .into_iter()
                    .nth(fallback)
                    .ok_or_else(|| InsightsError::Config("no datasets configured".to_string()))
            }
        }
    }

    /// Selector values for a dataset.
    pub fn filter_options(&self, dataset: &Choice<String>) -> Result<FilterOptions> {
        let (source, dataset) = self.select(dataset)?;
        let columns = ResolvedColumns::resolve(&dataset, &self.config.columns);
        let domain = infer_year_month_domain(&dataset, &columns);

        let mut districts: Vec<String> = columns
            .district
            .as_deref()
            .and_then(|c| dataset.column_values(c))
            .map(|values| values.filter_map(|v| v.as_text()).collect())
            .unwrap_or_default();
        districts.sort();
        districts.dedup();

        Ok(FilterOptions {
            dataset: source.name.clone(),
            years: domain.years.into_iter().collect(),
            months: domain
                .months
                .into_iter()
                .filter_map(|m| {
                    month_label(m).map(|label| MonthOption {
                        number: m,
                        label: label.to_string(),
                    })
                })
                .collect(),
            districts,
        })
    }

    /// Compute one dashboard state.
    ///
    /// Only an unknown dataset name is an error; every data problem becomes
    /// a notice on the returned view.
    pub fn view(&self, selection: &FilterSelection, granularity: Granularity) -> Result<DashboardView> {
        let (source, dataset) = self.select(&selection.dataset)?;
        let mut notices = Vec::new();

        if dataset.source.is_none() {
            notices.push(Notice::new(
                NoticeKind::MissingSource,
                self.config.resolve_path(&source.file).display().to_string(),
                format!(
                    "The data file for '{}' was not found or could not be read.",
                    source.name
                ),
            ));
        }

        let columns = ResolvedColumns::resolve(&dataset, &self.config.columns);
        if dataset.source.is_some() {
            report_unresolved(&columns, selection, &source.name, &mut notices);
        }

        let filtered = apply_filters(&dataset, &columns, selection);
        if filtered.is_empty() && dataset.source.is_some() {
            notices.push(Notice::new(
                NoticeKind::EmptyResult,
                source.name.clone(),
                "No records match the current filters.",
            ));
        }

        let value = columns.value.as_deref();
        let kpis = to_kpi_set(
            &filtered,
            value,
            columns.district.as_deref(),
            columns.sector.as_deref(),
        );

        let group = |field: Option<&str>| -> Option<Vec<GroupTotal>> {
            sum_by(&filtered, field?, value?)
        };

        let district_totals = group(columns.district.as_deref());
        let top_districts = district_totals.as_deref().map(|totals| {
            ChartSpec::from_groups(
                ChartKind::HorizontalBar,
                "Top Districts",
                &top_n(totals, self.config.top_districts),
            )
            .reversed()
        });

        let top_sectors = group(columns.sector.as_deref()).map(|totals| {
            ChartSpec::from_groups(
                ChartKind::Bar,
                "Top Sectors",
                &top_n(&totals, self.config.top_sectors),
            )
        });

        let age_breakdown = group(columns.age_category.as_deref())
            .map(|totals| ChartSpec::from_groups(ChartKind::Bar, "Cases by Age Category", &totals));
        let gender_breakdown = group(columns.gender.as_deref())
            .map(|totals| ChartSpec::from_groups(ChartKind::Pie, "Cases by Gender", &totals));

        let map = self.build_map(district_totals.as_deref(), &mut notices);
        let trend = self.build_trend(&filtered, &columns, granularity, &mut notices);

        for notice in &notices {
            notice.log();
        }

        Ok(DashboardView {
            dataset: source.name.clone(),
            selection: selection.clone(),
            granularity,
            columns,
            row_count: filtered.row_count(),
            kpis,
            map,
            top_districts,
            top_sectors,
            age_breakdown,
            gender_breakdown,
            trend,
            notices,
        })
    }

    fn build_map(
        &self,
        district_totals: Option<&[GroupTotal]>,
        notices: &mut Vec<Notice>,
    ) -> Option<ChoroplethInput> {
        let cached = self.region_collection()?;
        let Some(regions) = &*cached else {
            let path = self.config.regions_path().unwrap_or_default();
            notices.push(Notice::new(
                NoticeKind::MissingSource,
                path.display().to_string(),
                "District boundaries are unavailable, so the map is hidden.",
            ));
            return None;
        };
        district_totals.map(|totals| to_choropleth_input(regions, totals))
    }

    fn build_trend(
        &self,
        filtered: &Dataset,
        columns: &ResolvedColumns,
        granularity: Granularity,
        notices: &mut Vec<Notice>,
    ) -> Option<ChartSpec> {
        let value = columns.value.as_deref()?;

        // Explicit year and month columns win over a date column, which is
        // only read when they are absent or yield no periods at all.
        let derived = match (&columns.year, &columns.month) {
            (Some(year), Some(month)) => {
                let with_period = with_period_column(filtered, year, month, DERIVED_PERIOD_COLUMN);
                bucket_by_period(&with_period, DERIVED_PERIOD_COLUMN, value, granularity)
            }
            _ => None,
        };
        let series = match (derived, &columns.date) {
            (Some(series), None) => series,
            (Some(series), Some(_)) if !series.points.is_empty() => series,
            (derived, Some(date)) => {
                match bucket_by_period(filtered, date, value, granularity) {
                    Some(dated) if !dated.points.is_empty() || derived.is_none() => dated,
                    _ => derived?,
                }
            }
            (None, None) => return None,
        };

        if series.malformed > 0 {
            notices.push(Notice::new(
                NoticeKind::MalformedDate,
                filtered.name.clone(),
                format!(
                    "{} record(s) with an unreadable date were left out of the trend.",
                    series.malformed
                ),
            ));
        }

        let title = format!("Cases by {granularity}");
        Some(ChartSpec::from_periods(title, &series))
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Add a notice for each feature switched off by a missing column.
fn report_unresolved(
    columns: &ResolvedColumns,
    selection: &FilterSelection,
    dataset: &str,
    notices: &mut Vec<Notice>,
) {
    let mut field_notice = |field: LogicalField, effect: &str| {
        notices.push(Notice::new(
            NoticeKind::UnresolvableField,
            field.label(),
            format!("No {} column found in '{}': {}.", field.label(), dataset, effect),
        ));
    };

    if columns.value.is_none() {
        field_notice(LogicalField::Value, "totals and charts are unavailable");
    }
    if columns.district.is_none() {
        field_notice(LogicalField::District, "the map and district chart are hidden");
    }
    if columns.sector.is_none() {
        field_notice(LogicalField::Sector, "the sector chart is hidden");
    }

    let has_year = columns.year.is_some() || columns.date.is_some();
    let has_month = columns.month.is_some() || columns.date.is_some();
    if !has_year && !selection.year.is_all() {
        field_notice(LogicalField::Year, "the year filter was ignored");
    }
    if !has_month && !selection.month.is_all() {
        field_notice(LogicalField::Month, "the month filter was ignored");
    }
    if columns.district.is_none() && !selection.districts.is_all() {
        field_notice(LogicalField::District, "the district filter was ignored");
    }
    if columns.age_category.is_none() {
        field_notice(LogicalField::AgeCategory, "the age chart is hidden");
    }
    if columns.gender.is_none() {
        field_notice(LogicalField::Gender, "the gender chart is hidden");
    }
    if columns.date.is_none() && (columns.year.is_none() || columns.month.is_none()) {
        field_notice(LogicalField::Date, "the trend chart is hidden");
    }
}
