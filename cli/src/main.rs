//! CLI entry point for folioscope.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use folioscope_cli::commands::{self, ExportFormat};
use folioscope_cli::config::Config;
use folioscope_cli::error::Error;

#[derive(Parser)]
#[command(name = "folioscope")]
#[command(about = "Portfolio risk, valuation and rebalancing signals")]
#[command(version)]
struct Cli {
    /// Path to config.toml
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Full report: risk, valuation, signals and trades
    Report {
        /// Path to snapshot.json
        snapshot: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Per-asset risk metrics and portfolio risk
    Risk {
        /// Path to snapshot.json
        snapshot: PathBuf,
    },

    /// Rebalancing signals and recommended trades
    Signals {
        /// Path to snapshot.json
        snapshot: PathBuf,

        /// Target allocation percent (overrides equal weight)
        #[arg(long)]
        target: Option<f64>,
    },

    /// Write the report to disk
    Export {
        /// Path to snapshot.json
        snapshot: PathBuf,

        /// Output file (default: timestamped file in output.export_dir)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Write the signal table as CSV instead of the JSON report
        #[arg(long)]
        csv: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Report { snapshot, json } => commands::run_report(&config, &snapshot, json),
        Command::Risk { snapshot } => commands::run_risk(&config, &snapshot),
        Command::Signals { snapshot, target } => {
            commands::run_signals(&config, &snapshot, target)
        }
        Command::Export { snapshot, out, csv } => {
            let format = if csv {
                ExportFormat::Csv
            } else {
                ExportFormat::Json
            };
            commands::run_export(&config, &snapshot, out, format)
                .map(|path| format!("Report written to {}\n", path.display()))
        }
    };

    match result {
        Ok(output) => print!("{output}"),
        Err(e) => match &e {
            Error::Feed(_) => {
                eprintln!("\nAborted: {e}");
                process::exit(2);
            }
            _ => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
    }
}
