//! slips-add - price a new slip and append it to slips.csv and slips.jsonl

use anyhow::Context;
use clap::Parser;
use slips::config::load_config;
use slips::{exit, record_slip, ui, Error, SlipEntry, SlipsConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "slips-add")]
#[command(version)]
#[command(about = "Record a new product slip; run slips-import afterwards to load it")]
struct Cli {
    /// Customer name
    #[arg(long)]
    name: String,

    /// Phone number
    #[arg(long)]
    phone: String,

    /// Address
    #[arg(long)]
    address: String,

    /// Price before discount
    #[arg(long)]
    price: f64,

    /// Discount in percent (0-100)
    #[arg(long, default_value_t = 0.0)]
    discount: f64,

    /// Directory holding slips.csv and slips.jsonl
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to ./slips.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let file = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    let config = SlipsConfig::resolve(file.as_ref(), cli.data_dir.as_deref());

    let entry = SlipEntry {
        name: cli.name,
        phone: cli.phone,
        address: cli.address,
        price: cli.price,
        discount: cli.discount,
    };

    match record_slip(&config, entry) {
        Ok(slip) => {
            println!("{}", slip);
            println!("Slip saved to {} and {}", config.csv_path.display(), config.jsonl_path.display());
            Ok(exit::OK)
        }
        Err(e @ Error::InvalidEntry(_)) => {
            ui::error(&e.to_string());
            Ok(exit::USAGE)
        }
        Err(e) => Err(e).context("could not save slip"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    slips::logging::init(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            ui::error(&format!("{:#}", e));
            ExitCode::from(exit::FAILURE)
        }
    }
}
