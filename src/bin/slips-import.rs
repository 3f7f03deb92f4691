//! slips-import - replace the slip store with the contents of slips.csv

use anyhow::Context;
use clap::Parser;
use slips::config::load_config;
use slips::{exit, run_import, ui, Error, SlipsConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "slips-import")]
#[command(version)]
#[command(about = "Replace the slip store with the rows of <data-dir>/slips.csv")]
struct Cli {
    /// Directory holding slips.csv and slips.db
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to ./slips.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> anyhow::Result<u8> {
    let file = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    let config = SlipsConfig::resolve(file.as_ref(), cli.data_dir.as_deref());

    match run_import(&config) {
        Ok(report) => {
            if report.rows == 0 {
                ui::warn(&format!("{} has no data rows", config.csv_path.display()));
            }
            println!("{}", report);
            Ok(exit::OK)
        }
        Err(Error::MissingInput(path)) => {
            ui::error(&format!("CSV not found: {}", path.display()));
            Ok(exit::FAILURE)
        }
        Err(e) => Err(e).context("import aborted, store left unchanged"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    slips::logging::init(cli.verbose);

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            ui::error(&format!("{:#}", e));
            ExitCode::from(exit::FAILURE)
        }
    }
}
