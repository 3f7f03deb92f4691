//! # Slips - product slip record store
//!
//! Two small tools sharing one SQLite table:
//! - `slips-import` replaces the table contents with the rows of a CSV file
//! - `slips-query` prints every slip whose name contains a substring, or
//!   exports the whole store as JSON
//! - `slips-add` prices a new slip and appends it to the CSV and JSON Lines logs
//!
//! Everything the binaries do lives here so it can be driven from tests
//! against a temporary data directory.

pub mod slip;
pub mod storage;
pub mod import;
pub mod entry;
pub mod query;
pub mod config;
pub mod logging;
pub mod ui;

// Re-exports for convenient access
pub use slip::Slip;
pub use storage::SlipStore;
pub use config::SlipsConfig;
pub use import::{run_import, ImportReport};
pub use query::{run_export, run_query, OutputFormat};
pub use entry::{record_slip, SlipEntry};

use std::path::PathBuf;

/// Result type alias for slip operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for slip operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("File not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Invalid number on line {line}, column '{column}': {value:?}")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("Invalid slip: {0}")]
    InvalidEntry(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Process exit statuses shared by both binaries
pub mod exit {
    pub const OK: u8 = 0;
    /// Missing input file, bad CSV value or storage failure
    pub const FAILURE: u8 = 1;
    /// Missing or empty query argument, or an invalid new slip
    pub const USAGE: u8 = 2;
}
