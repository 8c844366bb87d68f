//! fx-enrich CLI - add a daily converted-currency column to an export
//!
//! ## Example Usage
//!
//! ```bash
//! # Writes ./exports/modified_march.csv
//! fx-enrich ./exports/march.csv
//!
//! # Quieter output
//! RUST_LOG=warn fx-enrich ./exports/march.csv
//! ```
//!
//! The provider access key is read from `api_key.txt` unless a config file
//! (`$FX_ENRICH_CONFIG` or `~/.fx-enrich/config.toml`) says otherwise.

use clap::Parser;
use colored::Colorize;
use fx_enrich::prelude::*;
use std::path::PathBuf;
use std::process;

/// fx-enrich: append a daily FX-converted column to a delimited export
#[derive(Parser)]
#[command(name = "fx-enrich")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Append a daily FX-converted column to a delimited export", long_about = None)]
struct Cli {
    /// Delimited input file with a header row
    #[arg(value_name = "INPUT_FILE")]
    input: PathBuf,
}

fn run(cli: Cli) -> Result<RunSummary> {
    let config = EnrichConfig::load()?;
    let api_key = ApiKey::from_file(&config.credential_path)?;
    let source = ExchangeRatesApiSource::from_config(&config, api_key)?;

    let mut resolver = RateResolver::new(source);
    enrich_file(&cli.input, &config, &mut resolver)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(summary) => {
            println!(
                "{} {} rows -> {}",
                "Done:".green().bold(),
                summary.rows,
                summary.output.display()
            );
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}
