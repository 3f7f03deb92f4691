//! slips-query - print slips whose name contains a substring, or export the
//! whole store as JSON

use anyhow::Context;
use clap::Parser;
use slips::config::load_config;
use slips::query::render;
use slips::{exit, run_export, run_query, ui, Error, OutputFormat, SlipsConfig};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "Usage: slips-query <name-substring>\n       slips-query --export-json";

#[derive(Parser)]
#[command(name = "slips-query")]
#[command(version)]
#[command(about = "Case-insensitive name lookup in the slip store")]
struct Cli {
    /// Substring to look for in slip names
    needle: Option<String>,

    /// Directory holding slips.db
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to ./slips.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print every slip in the store as a JSON array
    #[arg(long, conflicts_with_all = ["needle", "format"])]
    export_json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> anyhow::Result<u8> {
    let needle = match cli.needle.as_deref() {
        Some(needle) if !needle.is_empty() => Some(needle),
        _ if cli.export_json => None,
        _ => {
            eprintln!("{}", USAGE);
            return Ok(exit::USAGE);
        }
    };

    let file = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    let config = SlipsConfig::resolve(file.as_ref(), cli.data_dir.as_deref());

    let (slips, format) = match needle {
        Some(needle) => (run_query(&config, needle), cli.format),
        None => (run_export(&config), OutputFormat::Json),
    };

    match slips {
        Ok(slips) => {
            println!("{}", render(&slips, format)?);
            Ok(exit::OK)
        }
        Err(Error::MissingInput(path)) => {
            ui::error(&format!("DB not found: {}", path.display()));
            Ok(exit::FAILURE)
        }
        Err(e) => Err(e).context("query failed"),
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
