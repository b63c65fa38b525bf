//! Malaria Insights CLI - explore case-count datasets from the terminal.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use log::LevelFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let dashboard = match commands::load_dashboard(cli.config.as_deref(), cli.data_dir.clone()) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Datasets { json } => commands::datasets::run(&dashboard, json, cli.verbose),

        Commands::Options { dataset, json } => {
            commands::options::run(&dashboard, dataset, json, cli.verbose)
        }

        Commands::Report {
            dataset,
            year,
            month,
            district,
            granularity,
            json,
        } => commands::report::run(
            &dashboard,
            commands::report::ReportArgs {
                dataset,
                year,
                month: month.map(|m| m.0),
                districts: district,
                granularity,
                json,
            },
            cli.verbose,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Warnings by default, debug with `--verbose`; `RUST_LOG` overrides both.
fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}
