use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::{Error, Result};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const CSV_FILE_NAME: &str = "slips.csv";
pub const DB_FILE_NAME: &str = "slips.db";
pub const JSONL_FILE_NAME: &str = "slips.jsonl";

/// `data` next to the directory holding the running binary, so an install
/// laid out as `<root>/bin/slips-query` uses `<root>/data` whatever the
/// working directory. Falls back to a relative `data` if the executable
/// path is unavailable.
pub fn default_data_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .map(|exe| exe.canonicalize().unwrap_or(exe))
        .and_then(|exe| exe.parent().and_then(Path::parent).map(Path::to_path_buf))
        .map(|root| root.join(DEFAULT_DATA_DIR))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Optional on-disk overrides (`slips.toml`)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SlipsConfigFile {
    pub data_dir: Option<String>,
    /// CSV file, relative to the data directory unless absolute
    pub csv: Option<String>,
    /// Database file, relative to the data directory unless absolute
    pub database: Option<String>,
}

/// Resolved paths handed to the importer and the query tool
#[derive(Debug, Clone, PartialEq)]
pub struct SlipsConfig {
    pub data_dir: PathBuf,
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    /// Append-only JSON Lines log written alongside the CSV by new entries
    pub jsonl_path: PathBuf,
}

impl Default for SlipsConfig {
    fn default() -> Self {
        Self::in_dir(default_data_dir())
    }
}

impl SlipsConfig {
    /// Standard file names inside `data_dir`
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            csv_path: data_dir.join(CSV_FILE_NAME),
            db_path: data_dir.join(DB_FILE_NAME),
            jsonl_path: data_dir.join(JSONL_FILE_NAME),
            data_dir,
        }
    }

    /// Layer file settings and then the `--data-dir` flag over the defaults
    pub fn resolve(file: Option<&SlipsConfigFile>, data_dir_flag: Option<&Path>) -> Self {
        let data_dir = data_dir_flag
            .map(Path::to_path_buf)
            .or_else(|| file.and_then(|f| f.data_dir.as_ref()).map(PathBuf::from))
            .unwrap_or_else(default_data_dir);

        let mut config = Self::in_dir(data_dir);
        if let Some(file) = file {
            if let Some(csv) = &file.csv {
                config.csv_path = config.data_dir.join(csv);
            }
            if let Some(database) = &file.database {
                config.db_path = config.data_dir.join(database);
            }
        }
        config
    }

    /// Create the data directory (and the store's parent) if missing
    pub fn ensure_data_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("slips.toml")
}

/// Read the TOML overrides. A missing default file is not an error; a
/// missing file named explicitly is.
pub fn load_config(path: Option<&Path>) -> Result<Option<SlipsConfigFile>> {
    let explicit = path.is_some();
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        if explicit {
            return Err(Error::MissingInput(path));
        }
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: SlipsConfigFile = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(Some(config))
}
