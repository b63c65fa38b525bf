//! Options command - show the values each filter offers.

use colored::Colorize;
use malaria_insights::Dashboard;

use super::dataset_choice;

pub fn run(
    dashboard: &Dashboard,
    dataset: Option<String>,
    json_output: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = dashboard.filter_options(&dataset_choice(dataset))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Filter options for".cyan().bold(),
        options.dataset.white()
    );
    println!();

    let years: Vec<String> = options.years.iter().map(|y| y.to_string()).collect();
    let months: Vec<&str> = options.months.iter().map(|m| m.label.as_str()).collect();

    print_list("Years", &years);
    print_list("Months", &months);
    print_list("Districts", &options.districts);

    Ok(())
}

fn print_list<S: AsRef<str>>(title: &str, values: &[S]) {
    print!("{:10} ", format!("{}:", title).yellow().bold());
    if values.is_empty() {
        println!("{}", "All only (no column)".dimmed());
    } else {
        let joined: Vec<&str> = values.iter().map(|v| v.as_ref()).collect();
        println!("{}", joined.join(", "));
    }
}
