//! Integration tests for Malaria Insights.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::{NamedTempFile, TempDir};

use malaria_insights::{
    load_table, ChartKind, Choice, ColumnCandidates, Dashboard, DashboardConfig, DatasetSource,
    FilterSelection, Granularity, NoticeKind, ResolvedColumns, Value,
};

const RWANDA_ADM2: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"shapeName": "Gasabo", "shapeISO": "RW-01"},
     "geometry": {"type": "Polygon", "coordinates": [[[30.05,-1.95],[30.20,-1.95],[30.20,-1.85],[30.05,-1.95]]]}},
    {"type": "Feature", "properties": {"shapeName": "Huye", "shapeISO": "RW-05"},
     "geometry": {"type": "Polygon", "coordinates": [[[29.70,-2.65],[29.80,-2.65],[29.80,-2.55],[29.70,-2.65]]]}},
    {"type": "Feature", "properties": {"shapeName": "Nyagatare", "shapeISO": "RW-02"},
     "geometry": {"type": "Polygon", "coordinates": [[[30.30,-1.40],[30.40,-1.40],[30.40,-1.30],[30.30,-1.40]]]}}
  ]
}"#;

const OPD: &str = "district,sector,year,month,age_category,gender,Total\n\
                   Gasabo,Remera,2021,January,Under 5,Female,10\n\
                   Huye,Tumba,2021,February,5-19,Male,5\n\
                   Gasabo,Kimironko,2021,February,20+,Male,7\n\
                   Huye,Ngoma,2022,January,Under 5,Female,3\n\
                   Kigali City,Nyarugenge,2022,March,20+,Female,4\n";

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".csv").expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

/// A data directory holding the given files, with a dashboard over it.
fn dashboard(files: &[(&str, &str)]) -> (TempDir, Dashboard) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for (name, content) in files {
        fs::write(dir.path().join(name), content).expect("Failed to write data file");
    }
    let config = DashboardConfig::default().with_data_dir(dir.path());
    (dir, Dashboard::with_config(config))
}

fn has_notice(view: &malaria_insights::DashboardView, kind: NoticeKind) -> bool {
    view.notices.iter().any(|n| n.kind == kind)
}

// =============================================================================
// Loader Tests
// =============================================================================

#[test]
fn test_load_table_csv() {
    let file = create_test_file(OPD);
    let ds = load_table(file.path());

    assert_eq!(ds.row_count(), 5);
    assert_eq!(ds.column_count(), 7);
    let source = ds.source.as_ref().expect("metadata present");
    assert_eq!(source.format, "csv");
    assert_eq!(source.rows, 5);
    assert!(source.fingerprint.starts_with("sha256:"));
}

#[test]
fn test_load_table_missing_is_empty() {
    let ds = load_table(Path::new("/nonexistent/opd.csv"));
    assert!(ds.is_empty());
    assert!(ds.columns.is_empty());
    assert!(ds.source.is_none());
}

#[test]
fn test_load_table_unsupported_extension() {
    let mut file = NamedTempFile::with_suffix(".xlsx").unwrap();
    file.write_all(b"district,Total\nA,1\n").unwrap();

    let ds = load_table(file.path());
    assert!(ds.is_empty());
    assert!(ds.source.is_none());
}

#[test]
fn test_load_table_tsv() {
    let mut file = NamedTempFile::with_suffix(".tsv").unwrap();
    file.write_all(b"district_clean\tcases\nGasabo\t3\nHuye\t\n").unwrap();

    let ds = load_table(file.path());
    assert_eq!(ds.source.as_ref().unwrap().format, "tsv");
    assert_eq!(ds.records[0].get(1), &Value::Number(3.0));
    assert!(ds.records[1].get(1).is_missing());

    let cols = ResolvedColumns::resolve(&ds, &ColumnCandidates::default());
    assert_eq!(cols.district.as_deref(), Some("district_clean"));
    assert_eq!(cols.value.as_deref(), Some("cases"));
}

// =============================================================================
// Dashboard Scenarios
// =============================================================================

#[test]
fn test_two_record_scenario() {
    let (_dir, dashboard) = dashboard(&[(
        "opd.csv",
        "district,month,year,value\nA,January,2021,10\nB,February,2021,5\n",
    )]);
    let view = dashboard
        .view(&FilterSelection::all().with_year(2021), Granularity::Month)
        .expect("view");

    assert_eq!(view.row_count, 2);
    assert_eq!(view.kpis.total, 15.0);
    assert_eq!(view.kpis.active_regions, 2);
    assert_eq!(view.kpis.top_region.name, "A");
}

#[test]
fn test_empty_dataset_scenario() {
    let (_dir, dashboard) = dashboard(&[("opd.csv", "district,year,month,Total\n")]);
    let view = dashboard
        .view(&FilterSelection::all().with_dataset("OPD"), Granularity::Month)
        .expect("view");

    assert_eq!(view.kpis.total, 0.0);
    assert_eq!(view.kpis.active_regions, 0);
    assert_eq!(view.kpis.top_region.name, "N/A");
    assert!(view.top_districts.as_ref().unwrap().is_empty());
    assert!(has_notice(&view, NoticeKind::EmptyResult));
}

#[test]
fn test_unmatched_district_excluded_from_map_only() {
    let (_dir, dashboard) = dashboard(&[("opd.csv", OPD), ("rwanda_adm2.geojson", RWANDA_ADM2)]);
    let view = dashboard
        .view(&FilterSelection::all().with_dataset("OPD"), Granularity::Year)
        .expect("view");

    // "Kigali City" has no boundary but still counts
    assert_eq!(view.kpis.total, 29.0);

    let map = view.map.expect("map input");
    let regions: Vec<&str> = map.cells.iter().map(|c| c.region.as_str()).collect();
    assert_eq!(regions, vec!["Gasabo", "Huye", "Nyagatare"]);
    assert_eq!(map.cells[0].value, 17.0);
    assert_eq!(map.cells[1].value, 8.0);
    assert_eq!(map.cells[2].value, 0.0);
    assert_eq!(map.unmatched.len(), 1);
    assert_eq!(map.unmatched[0].key.as_str(), "Kigali City");

    let mapped: f64 = map.cells.iter().map(|c| c.value).sum();
    assert!(mapped < view.kpis.total);
}

#[test]
fn test_full_view_charts() {
    let (_dir, dashboard) = dashboard(&[("opd.csv", OPD), ("rwanda_adm2.geojson", RWANDA_ADM2)]);
    let view = dashboard
        .view(&FilterSelection::all().with_dataset("OPD"), Granularity::Quarter)
        .expect("view");

    assert!(view.notices.is_empty(), "unexpected notices: {:?}", view.notices);

    let districts = view.top_districts.unwrap();
    assert_eq!(districts.kind, ChartKind::HorizontalBar);
    // Ascending for a bottom-up bar chart
    let labels: Vec<&str> = districts.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Kigali City", "Huye", "Gasabo"]);

    let sectors = view.top_sectors.unwrap();
    assert_eq!(sectors.points[0].label, "Remera");
    assert_eq!(sectors.points.len(), 5);

    let gender = view.gender_breakdown.unwrap();
    assert_eq!(gender.kind, ChartKind::Pie);
    assert_eq!(gender.points[0].label, "Female");
    assert_eq!(gender.points[0].value, 17.0);

    let trend = view.trend.unwrap();
    let periods: Vec<&str> = trend.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(periods, vec!["Q1 2021", "Q1 2022"]);
    assert_eq!(trend.points[0].value, 22.0);

    assert_eq!(view.kpis.top_sector.name, "Remera");
}

#[test]
fn test_filters_narrow_view() {
    let (_dir, dashboard) = dashboard(&[("opd.csv", OPD)]);
    let selection = FilterSelection::all()
        .with_dataset("OPD")
        .with_year(2021)
        .with_month(2)
        .with_districts(["Huye"]);
    let view = dashboard.view(&selection, Granularity::Month).expect("view");

    assert_eq!(view.row_count, 1);
    assert_eq!(view.kpis.total, 5.0);
    assert_eq!(view.kpis.top_sector.name, "Tumba");
}

#[test]
fn test_missing_columns_degrade_features() {
    let (_dir, dashboard) = dashboard(&[("fever.csv", "province,cases\nSouth,4\nNorth,6\n")]);
    let view = dashboard
        .view(
            &FilterSelection::all().with_dataset("Fever").with_year(2020),
            Granularity::Month,
        )
        .expect("view");

    assert_eq!(view.kpis.total, 10.0);
    assert_eq!(view.kpis.active_regions, 0);
    assert!(view.top_districts.is_none());
    assert!(view.top_sectors.is_none());
    assert!(view.trend.is_none());

    let fields: Vec<&str> = view
        .notices
        .iter()
        .filter(|n| n.kind == NoticeKind::UnresolvableField)
        .map(|n| n.subject.as_str())
        .collect();
    assert!(fields.contains(&"district"));
    assert!(fields.contains(&"sector"));
    assert!(fields.contains(&"year"));
}

#[test]
fn test_malformed_dates_are_skipped() {
    let (_dir, dashboard) = dashboard(&[(
        "community.csv",
        "district,report_date,cases\nGasabo,2023-01-10,2\nGasabo,someday,9\nHuye,2023-02-03,1\n",
    )]);
    let view = dashboard
        .view(&FilterSelection::all().with_dataset("Community"), Granularity::Month)
        .expect("view");

    assert_eq!(view.kpis.total, 12.0);
    let trend = view.trend.as_ref().unwrap();
    assert_eq!(trend.points.len(), 2);
    assert!(has_notice(&view, NoticeKind::MalformedDate));
}

#[test]
fn test_dataset_catalog() {
    let (_dir, dashboard) = dashboard(&[("opd.csv", OPD)]);
    let catalog = dashboard.datasets();

    assert_eq!(catalog.len(), 3);
    assert!(catalog[0].loaded);
    assert_eq!(catalog[0].row_count, 5);
    assert!(!catalog[1].loaded);
    assert_eq!(catalog[1].name, "Community");
}

#[test]
fn test_custom_config_sources() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("malaria_cases_opd_final.csv"),
        "adm2_name,year,Month,Cases\nHuye,2020,Dec,3\n",
    )
    .unwrap();

    let config = DashboardConfig {
        data_dir: dir.path().to_path_buf(),
        datasets: vec![DatasetSource::new("OPD", "malaria_cases_opd_final.csv")],
        regions_file: None,
        ..DashboardConfig::default()
    };
    let dashboard = Dashboard::with_config(config);

    let options = dashboard.filter_options(&Choice::All).unwrap();
    assert_eq!(options.dataset, "OPD");
    assert_eq!(options.years, vec![2020]);
    assert_eq!(options.months[0].label, "Dec");

    let view = dashboard.view(&FilterSelection::all(), Granularity::Year).unwrap();
    assert!(view.map.is_none());
    assert!(!has_notice(&view, NoticeKind::MissingSource));
    assert_eq!(view.kpis.top_region.name, "Huye");
}
