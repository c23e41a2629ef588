//! restaurant-etl CLI - Flatten restaurant listings into reporting tables
//!
//! # Main Commands
//!
//! ```bash
//! restaurant-etl run --restaurants restaurant_data.json --countries Country-Code.csv
//! restaurant-etl validate restaurant_data.json
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! restaurant-etl flatten restaurant_data.json -c Country-Code.csv   # Print the enriched table
//! restaurant-etl columns                                            # Show template columns
//! ```

use clap::{Parser, Subcommand};
use restaurant_etl::config::{EtlConfig, OutputFormat, TargetWindow};
use restaurant_etl::export::write_log_file;
use restaurant_etl::logs::LOG_SINK;
use restaurant_etl::transform::pipeline::load_countries;
use restaurant_etl::{
    event_wrappers, flatten_records, load_restaurant_pages, parse_restaurant_records,
    process_event_data, restaurant_records, run_pipeline, validate_events_schema,
    validate_results_schema, Column,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "restaurant-etl")]
#[command(about = "Flatten restaurant listings into Q1/Q2 reporting tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: JSON pages → validation → Q1/Q2 files
    Run {
        /// Restaurant data JSON file (array of search result pages)
        #[arg(short, long)]
        restaurants: PathBuf,

        /// Country code reference file (CSV or JSON)
        #[arg(short, long)]
        countries: Option<PathBuf>,

        /// Directory receiving the views
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Target month (YYYY-MM)
        #[arg(short, long)]
        target_month: Option<TargetWindow>,

        /// Skip validation
        #[arg(long)]
        no_validate: bool,

        /// Also write every log entry to this JSON file
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Validate restaurant data against the embedded schemas
    Validate {
        /// Restaurant data JSON file
        input: PathBuf,
    },

    /// Print the enriched intermediate table as JSON
    Flatten {
        /// Restaurant data JSON file
        input: PathBuf,

        /// Country code reference file (CSV or JSON)
        #[arg(short, long)]
        countries: Option<PathBuf>,

        /// Target month (YYYY-MM)
        #[arg(short, long)]
        target_month: Option<TargetWindow>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the intermediate table columns
    Columns,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            restaurants,
            countries,
            output_dir,
            format,
            target_month,
            no_validate,
            log_file,
        } => {
            let outcome = load_config().and_then(|mut config| {
                if countries.is_some() {
                    config.country_codes = countries;
                }
                if let Some(dir) = output_dir {
                    config.output_dir = dir;
                }
                if let Some(format) = format {
                    config.output_format = format;
                }
                if let Some(window) = target_month {
                    config.target_window = window;
                }
                config.skip_validation |= no_validate;
                cmd_run(&restaurants, &config)
            });

            // The log is written even when the run failed
            if let Some(path) = log_file {
                if let Err(e) = write_log(&path) {
                    eprintln!("⚠️  Could not write log file: {}", e);
                }
            }
            outcome
        }

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Flatten { input, countries, target_month, output } => {
            load_config().and_then(|mut config| {
                if countries.is_some() {
                    config.country_codes = countries;
                }
                if let Some(window) = target_month {
                    config.target_window = window;
                }
                cmd_flatten(&input, &config, output.as_deref())
            })
        }

        Commands::Columns => cmd_columns(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config() -> Result<EtlConfig, Box<dyn std::error::Error>> {
    Ok(EtlConfig::from_env()?)
}

fn cmd_run(restaurants: &Path, config: &EtlConfig) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", restaurants.display());

    let result = run_pipeline(restaurants, config)?;

    eprintln!("\n📊 Results ({}):", config.target_window);
    eprintln!("   Restaurants (Q1): {}", result.q1.len());
    eprintln!("   Restaurant events (Q2): {}", result.q2.len());

    for report in [&result.summary.results_validation, &result.summary.events_validation]
        .into_iter()
        .flatten()
    {
        let status = if report.passed { "✅" } else { "❌" };
        eprintln!("   {} {} schema ({} checked)", status, report.schema, report.checked);
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let pages = load_restaurant_pages(input)?;
    let records = restaurant_records(&pages);

    let results = validate_results_schema(&pages);
    let events = validate_events_schema(&event_wrappers(&records));

    eprintln!(
        "\n📊 Results: {} page(s), {} restaurant(s), results schema {}, events schema {}",
        pages.len(),
        records.len(),
        if results.passed { "ok" } else { "failed" },
        if events.passed { "ok" } else { "failed" },
    );

    if !results.passed || !events.passed {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_flatten(
    input: &Path,
    config: &EtlConfig,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📦 Flattening: {}", input.display());

    let pages = load_restaurant_pages(input)?;
    let countries = load_countries(config)?;
    let records = parse_restaurant_records(&restaurant_records(&pages))?;

    let mut table = flatten_records(&countries, &records);
    process_event_data(&mut table, &config.target_window)?;
    eprintln!("   {} rows", table.len());

    let json = serde_json::to_string_pretty(&table.to_json())?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_columns() -> Result<(), Box<dyn std::error::Error>> {
    for (i, column) in Column::ALL.iter().enumerate() {
        println!("[{:2}] {:<24} {:?}", i + 1, column.name(), column.kind());
    }
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

fn write_log(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    write_log_file(path, &LOG_SINK.snapshot())?;
    eprintln!("📝 Log written to: {}", path.display());
    Ok(())
}
