//! History reconciliation entry point — CLI wiring around the library.

use std::fs;
use std::path::Path;
use std::process;

use solar_hist::config::ProcessingConfig;
use solar_hist::history::EnergyHistory;
use solar_hist::io::export::export_csv;
use solar_hist::report::HistoryReport;

/// Parsed CLI arguments.
struct CliArgs {
    power_details: Vec<String>,
    storage_data: Vec<String>,
    config_path: Option<String>,
    export_out: Option<String>,
}

fn print_help() {
    eprintln!("solar-hist — home energy history reconciliation");
    eprintln!();
    eprintln!("Usage: solar-hist [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --power-details <path>   Add a powerDetails JSON source unit (repeatable)");
    eprintln!("  --storage-data <path>    Add a storageData JSON source unit (repeatable)");
    eprintln!("  --config <path>          Load processing config from TOML file");
    eprintln!("  --export <path>          Export the gridded dataset to CSV");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("Source units may arrive in any order; they are merged and");
    eprintln!("deduplicated before alignment.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        power_details: Vec::new(),
        storage_data: Vec::new(),
        config_path: None,
        export_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--power-details" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --power-details requires a path argument");
                    process::exit(1);
                }
                cli.power_details.push(args[i].clone());
            }
            "--storage-data" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --storage-data requires a path argument");
                    process::exit(1);
                }
                cli.storage_data.push(args[i].clone());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --config requires a path argument");
                    process::exit(1);
                }
                cli.config_path = Some(args[i].clone());
            }
            "--export" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --export requires a path argument");
                    process::exit(1);
                }
                cli.export_out = Some(args[i].clone());
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Reads every named source unit into memory, exiting on the first failure.
fn read_sources(paths: &[String]) -> Vec<String> {
    let mut contents = Vec::with_capacity(paths.len());
    for path in paths {
        match fs::read_to_string(path) {
            Ok(raw) => contents.push(raw),
            Err(e) => {
                eprintln!("error: cannot read \"{path}\": {e}");
                process::exit(1);
            }
        }
    }
    contents
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = parse_args();

    // Load config: --config takes priority over the built-in defaults
    let config = if let Some(ref path) = cli.config_path {
        match ProcessingConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ProcessingConfig::default()
    };

    // Validate
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Read source units and run the pipeline
    let power_raw = read_sources(&cli.power_details);
    let storage_raw = read_sources(&cli.storage_data);
    let power_refs: Vec<&str> = power_raw.iter().map(String::as_str).collect();
    let storage_refs: Vec<&str> = storage_raw.iter().map(String::as_str).collect();

    let history = match EnergyHistory::from_payloads(&power_refs, &storage_refs, &config) {
        Ok(history) => history,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    // Print the summary report
    let report = HistoryReport::from_history(&history, config.integrator_lead_in_minutes);
    println!("{report}");

    // Export CSV if requested
    if let Some(ref path) = cli.export_out {
        if let Err(e) = export_csv(&history, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Gridded dataset written to {path}");
    }
}
