//! Report command - compute a dashboard view for one filter selection.

use colored::Colorize;
use malaria_insights::{
    ChartSpec, Choice, Dashboard, DashboardView, FilterSelection, Granularity, Severity,
};

use super::dataset_choice;

/// Parsed `report` flags.
pub struct ReportArgs {
    pub dataset: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub districts: Vec<String>,
    pub granularity: Granularity,
    pub json: bool,
}

impl ReportArgs {
    fn selection(&self) -> FilterSelection {
        FilterSelection {
            dataset: dataset_choice(self.dataset.clone()),
            year: self.year.into(),
            month: self.month.into(),
            ..FilterSelection::all()
        }
        .with_districts(self.districts.iter().cloned())
    }
}

pub fn run(
    dashboard: &Dashboard,
    args: ReportArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let view = dashboard.view(&args.selection(), args.granularity)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    print_header(&view);
    print_kpis(&view);

    for chart in [&view.top_districts, &view.top_sectors, &view.trend]
        .into_iter()
        .flatten()
    {
        print_chart(chart);
    }
    if verbose {
        for chart in [&view.age_breakdown, &view.gender_breakdown]
            .into_iter()
            .flatten()
        {
            print_chart(chart);
        }
    }

    if let Some(map) = &view.map {
        println!();
        println!(
            "{} {} regions, {} unmatched district(s)",
            "Map:".yellow().bold(),
            map.cells.len(),
            map.unmatched.len()
        );
        if verbose {
            for group in &map.unmatched {
                println!("  {} {} ({})", "-".dimmed(), group.key, group.total);
            }
        }
    }

    print_notices(&view);
    Ok(())
}

fn print_header(view: &DashboardView) {
    let describe = |label: &str, choice: Option<String>| {
        format!("{} {}", label, choice.unwrap_or_else(|| "All".to_string()))
    };
    let districts = match &view.selection.districts {
        Choice::All => None,
        Choice::Only(set) => Some(set.iter().cloned().collect::<Vec<_>>().join(", ")),
    };

    println!("{} {}", "Report for".cyan().bold(), view.dataset.white());
    println!(
        "  {} | {} | {} | by {}",
        describe("Year", view.selection.year.as_only().map(|y| y.to_string())),
        describe(
            "Month",
            view.selection
                .month
                .as_only()
                .and_then(|m| malaria_insights::month_label(*m))
                .map(str::to_string)
        ),
        describe("Districts", districts),
        view.granularity
    );
    println!("  {} records after filtering", view.row_count);
}

fn print_kpis(view: &DashboardView) {
    let kpis = &view.kpis;
    println!();
    println!("{:16} {}", "Total cases", format_total(kpis.total).bold());
    println!(
        "{:16} {}",
        "Active districts",
        kpis.active_regions.to_string().bold()
    );
    println!(
        "{:16} {} ({})",
        "Top district",
        kpis.top_region.name.bold(),
        format_total(kpis.top_region.total)
    );
    println!(
        "{:16} {} ({})",
        "Top sector",
        kpis.top_sector.name.bold(),
        format_total(kpis.top_sector.total)
    );
}

fn print_chart(chart: &ChartSpec) {
    println!();
    println!("{}", chart.title.yellow().bold());
    if chart.is_empty() {
        println!("  {}", "(no data)".dimmed());
        return;
    }

    let max = chart
        .points
        .iter()
        .map(|p| p.value)
        .fold(0.0_f64, f64::max);
    let bar_width = 30.0;
    for point in &chart.points {
        let filled = if max > 0.0 {
            (point.value / max * bar_width).round() as usize
        } else {
            0
        };
        println!(
            "  {:20} {} {}",
            point.label,
            "█".repeat(filled).cyan(),
            format_total(point.value)
        );
    }
}

fn print_notices(view: &DashboardView) {
    if view.notices.is_empty() {
        return;
    }
    println!();
    for notice in &view.notices {
        let label = match notice.severity {
            Severity::Warning => notice.kind.label().yellow().bold(),
            Severity::Info => notice.kind.label().blue().bold(),
        };
        println!("{} {}", label, notice.message);
    }
}

/// Integral totals without a fraction, others to one decimal.
fn format_total(total: f64) -> String {
    if total.fract() == 0.0 {
        format!("{:.0}", total)
    } else {
        format!("{:.1}", total)
    }
}
