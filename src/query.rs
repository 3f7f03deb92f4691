//! Name lookup over the slip store

use crate::config::SlipsConfig;
use crate::slip::Slip;
use crate::storage::SlipStore;
use crate::ui::slip_table;
use crate::{Error, Result};

/// Printed in text and table formats when nothing matches
pub const NO_MATCHES: &str = "No matches.";

/// How matches are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One ` | `-separated line per slip
    #[default]
    Text,
    /// Bordered table with a header row
    Table,
    /// Pretty-printed JSON array
    Json,
}

/// Find slips whose name contains `needle`, ignoring case.
///
/// The store is opened read-only and must already exist.
pub fn run_query(config: &SlipsConfig, needle: &str) -> Result<Vec<Slip>> {
    if !config.db_path.exists() {
        return Err(Error::MissingInput(config.db_path.clone()));
    }

    let store = SlipStore::open_read_only(&config.db_path)?;
    let matches = store.find_by_name(needle)?;
    tracing::info!("{} slips match {:?}", matches.len(), needle);
    Ok(matches)
}

/// Every slip in the store, for `--export-json`
pub fn run_export(config: &SlipsConfig) -> Result<Vec<Slip>> {
    if !config.db_path.exists() {
        return Err(Error::MissingInput(config.db_path.clone()));
    }

    let store = SlipStore::open_read_only(&config.db_path)?;
    let slips = store.all()?;
    tracing::info!("Exporting {} slips", slips.len());
    Ok(slips)
}

/// Render matches for standard output (no trailing newline)
pub fn render(slips: &[Slip], format: OutputFormat) -> Result<String> {
    if slips.is_empty() && format != OutputFormat::Json {
        return Ok(NO_MATCHES.to_string());
    }

    let rendered = match format {
        OutputFormat::Text => slips
            .iter()
            .map(Slip::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Table => slip_table(slips),
        OutputFormat::Json => serde_json::to_string_pretty(slips)?,
    };
    Ok(rendered)
}
