//! Example: Print a dashboard report for a directory of case tables.
//!
//! Usage:
//!   cargo run --example report -- <data_dir> [dataset] [year]
//!
//! Example:
//!   RUST_LOG=info cargo run --example report -- data OPD 2023

use std::env;
use std::path::Path;

use malaria_insights::{Dashboard, DashboardConfig, FilterSelection, Granularity};

fn main() -> malaria_insights::Result<()> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example report -- <data_dir> [dataset] [year]");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example report -- data OPD 2023");
        std::process::exit(1);
    }

    let data_dir = Path::new(&args[1]);
    if !data_dir.is_dir() {
        eprintln!("Error: Directory not found: {}", data_dir.display());
        std::process::exit(1);
    }

    let dashboard = Dashboard::with_config(DashboardConfig::default().with_data_dir(data_dir));

    let mut selection = FilterSelection::all();
    if let Some(name) = args.get(2) {
        selection = selection.with_dataset(name.as_str());
    }
    if let Some(year) = args.get(3).and_then(|y| y.parse().ok()) {
        selection = selection.with_year(year);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Malaria Insights: {}", data_dir.display());
    println!("{}", separator);
    println!();

    println!("## Datasets");
    for summary in dashboard.datasets() {
        println!(
            "  {:12} loaded={:<5} rows={}",
            summary.name, summary.loaded, summary.row_count
        );
    }
    println!();

    let view = dashboard.view(&selection, Granularity::Quarter)?;

    println!("## {} ({} records)", view.dataset, view.row_count);
    println!("  Total cases:      {}", view.kpis.total);
    println!("  Active districts: {}", view.kpis.active_regions);
    println!(
        "  Top district:     {} ({})",
        view.kpis.top_region.name, view.kpis.top_region.total
    );
    println!(
        "  Top sector:       {} ({})",
        view.kpis.top_sector.name, view.kpis.top_sector.total
    );
    println!();

    if let Some(trend) = &view.trend {
        println!("## {}", trend.title);
        for point in &trend.points {
            println!("  {:10} {}", point.label, point.value);
        }
        println!();
    }

    if let Some(map) = &view.map {
        println!(
            "## Map: {} regions keyed on '{}'",
            map.cells.len(),
            map.feature_id_key
        );
        for group in &map.unmatched {
            println!("  not on map: {} ({})", group.key, group.total);
        }
        println!();
    }

    if !view.notices.is_empty() {
        println!("## Notices");
        for notice in &view.notices {
            println!("  [{}] {}", notice.severity.label(), notice.message);
        }
    }

    Ok(())
}
