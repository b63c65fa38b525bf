//! Datasets command - list configured datasets and their resolved columns.

use colored::Colorize;
use malaria_insights::{Dashboard, LogicalField};

pub fn run(dashboard: &Dashboard, json_output: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let summaries = dashboard.datasets();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Datasets in".cyan().bold(),
        dashboard.config().data_dir.display().to_string().white()
    );
    println!();

    for summary in &summaries {
        let status = if summary.loaded {
            format!("{:8}", "loaded").green()
        } else {
            format!("{:8}", "missing").red()
        };
        println!(
            "  {} {} {:>8} rows  {}",
            format!("{:12}", summary.name).white().bold(),
            status,
            summary.row_count,
            summary.path.display().to_string().dimmed()
        );

        if verbose && summary.loaded {
            for field in LogicalField::ALL {
                match summary.columns.get(field) {
                    Some(col) => println!("      {:14} {}", field.label(), col),
                    None => println!("      {:14} {}", field.label(), "-".dimmed()),
                }
            }
        }
    }

    let loaded = summaries.iter().filter(|s| s.loaded).count();
    println!();
    println!(
        "{} of {} datasets available",
        loaded.to_string().white().bold(),
        summaries.len()
    );

    Ok(())
}
