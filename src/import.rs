//! CSV import - full replace of the slip table
//!
//! Columns are looked up by header label, so order and extra columns do not
//! matter. The whole file is parsed before the store is opened; a bad value
//! aborts the run with the store untouched.

use std::io::Read;
use std::path::PathBuf;
use csv::{ReaderBuilder, StringRecord};
use crate::config::SlipsConfig;
use crate::slip::Slip;
use crate::storage::SlipStore;
use crate::{Error, Result};

/// Outcome of a successful import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub rows: usize,
    pub database: PathBuf,
}

impl std::fmt::Display for ImportReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Imported {} rows into {}", self.rows, self.database.display())
    }
}

/// Positions of the recognized columns in one CSV header
#[derive(Debug, Default)]
struct ColumnMap {
    name: Option<usize>,
    phone: Option<usize>,
    address: Option<usize>,
    price: Option<usize>,
    discount: Option<usize>,
    total: Option<usize>,
    timestamp: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        // Last occurrence wins when a label repeats
        let find = |label: &str| (0..headers.len()).rev().find(|&i| &headers[i] == label);
        Self {
            name: find("name"),
            phone: find("phone"),
            address: find("address"),
            price: find("price"),
            discount: find("discount"),
            total: find("total"),
            timestamp: find("timestamp"),
        }
    }

    fn to_slip(&self, record: &StringRecord) -> Result<Slip> {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let text = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i)).unwrap_or("").to_string()
        };
        let number = |idx: Option<usize>, column: &'static str| {
            parse_decimal(idx.and_then(|i| record.get(i)), line, column)
        };

        Ok(Slip {
            name: text(self.name),
            phone: text(self.phone),
            address: text(self.address),
            price: number(self.price, "price")?,
            discount: number(self.discount, "discount")?,
            total: number(self.total, "total")?,
            timestamp: text(self.timestamp),
        })
    }
}

/// Absent and blank values both become `0.0`.
fn parse_decimal(raw: Option<&str>, line: u64, column: &'static str) -> Result<f64> {
    let trimmed = raw.unwrap_or("").trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed.parse::<f64>().map_err(|_| Error::InvalidNumber {
        line,
        column,
        value: trimmed.to_string(),
    })
}

/// Parse every slip from a headed CSV stream, in file order
pub fn read_slips<R: Read>(reader: R) -> Result<Vec<Slip>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnMap::from_headers(rdr.headers()?);
    tracing::debug!("CSV column map: {:?}", columns);

    let mut slips = Vec::new();
    for record in rdr.records() {
        slips.push(columns.to_slip(&record?)?);
    }
    Ok(slips)
}

/// Replace the store contents with the configured CSV file
pub fn run_import(config: &SlipsConfig) -> Result<ImportReport> {
    if !config.csv_path.exists() {
        return Err(Error::MissingInput(config.csv_path.clone()));
    }

    let file = std::fs::File::open(&config.csv_path)?;
    let slips = read_slips(std::io::BufReader::new(file))?;
    tracing::info!("Parsed {} slips from {}", slips.len(), config.csv_path.display());

    config.ensure_data_dir()?;
    let mut store = SlipStore::open(&config.db_path)?;
    let rows = store.replace_all(&slips)?;

    Ok(ImportReport {
        rows,
        database: config.db_path.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_CSV: &str = "\
name,phone,address,price,discount,total,timestamp
Alice,555-1111,1 Main St,100.0,10.0,90.0,2024-01-01
bob,555-2222,2 Oak St,50.0,0.0,50.0,2024-01-02
";

    fn write_csv(config: &SlipsConfig, contents: &str) {
        std::fs::create_dir_all(&config.data_dir).unwrap();
        std::fs::write(&config.csv_path, contents).unwrap();
    }

    #[test]
    fn test_read_slips_maps_by_label() {
        let slips = read_slips(SCENARIO_CSV.as_bytes()).unwrap();
        assert_eq!(slips.len(), 2);
        assert_eq!(
            slips[0],
            Slip::new("Alice")
                .with_contact("555-1111", "1 Main St")
                .with_amounts(100.0, 10.0, 90.0)
                .with_timestamp("2024-01-01")
        );
        assert_eq!(slips[1].name, "bob");
        assert_eq!(slips[1].total, 50.0);
    }

    #[test]
    fn test_read_slips_ignores_column_order_and_extras() {
        let csv = "total,extra,name,price\n9.5,ignored,Zed,10\n";
        let slips = read_slips(csv.as_bytes()).unwrap();
        assert_eq!(
            slips,
            vec![Slip::new("Zed").with_amounts(10.0, 0.0, 9.5)]
        );
    }

    #[test]
    fn test_missing_and_blank_values_default() {
        let csv = "name,phone,price,discount,total\nAmy,,  ,,\nShort\n";
        let slips = read_slips(csv.as_bytes()).unwrap();
        assert_eq!(slips, vec![Slip::new("Amy"), Slip::new("Short")]);
    }

    #[test]
    fn test_numbers_are_trimmed() {
        let csv = "name,price\nAmy, 12.5 \n";
        let slips = read_slips(csv.as_bytes()).unwrap();
        assert_eq!(slips[0].price, 12.5);
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let csv = "name,name\nfirst,second\n";
        let slips = read_slips(csv.as_bytes()).unwrap();
        assert_eq!(slips[0].name, "second");
    }

    #[test]
    fn test_non_numeric_value_is_an_error() {
        let csv = "name,price\nAmy,1.0\nBen,abc\n";
        match read_slips(csv.as_bytes()) {
            Err(Error::InvalidNumber { line, column, value }) => {
                assert_eq!(line, 3);
                assert_eq!(column, "price");
                assert_eq!(value, "abc");
            }
            other => panic!("expected InvalidNumber, got {:?}", other),
        }
    }

    #[test]
    fn test_header_only_imports_nothing() {
        let slips = read_slips("name,price\n".as_bytes()).unwrap();
        assert!(slips.is_empty());
    }

    #[test]
    fn test_run_import_reports_count_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = SlipsConfig::in_dir(dir.path().join("data"));
        write_csv(&config, SCENARIO_CSV);

        let report = run_import(&config).unwrap();
        assert_eq!(report.rows, 2);
        assert_eq!(
            report.to_string(),
            format!("Imported 2 rows into {}", config.db_path.display())
        );

        let store = SlipStore::open_read_only(&config.db_path).unwrap();
        assert_eq!(store.all().unwrap(), read_slips(SCENARIO_CSV.as_bytes()).unwrap());
    }

    #[test]
    fn test_run_import_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let config = SlipsConfig::in_dir(dir.path().join("data"));
        write_csv(&config, SCENARIO_CSV);

        run_import(&config).unwrap();
        run_import(&config).unwrap();

        let store = SlipStore::open_read_only(&config.db_path).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_missing_csv_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let config = SlipsConfig::in_dir(dir.path().join("data"));
        write_csv(&config, SCENARIO_CSV);
        run_import(&config).unwrap();

        std::fs::remove_file(&config.csv_path).unwrap();
        match run_import(&config) {
            Err(Error::MissingInput(path)) => assert_eq!(path, config.csv_path),
            other => panic!("expected MissingInput, got {:?}", other),
        }

        let store = SlipStore::open_read_only(&config.db_path).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_missing_csv_does_not_create_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = SlipsConfig::in_dir(dir.path().join("data"));

        assert!(run_import(&config).is_err());
        assert!(!config.data_dir.exists());
    }

    #[test]
    fn test_bad_value_keeps_previous_rows() {
        let dir = tempfile::tempdir().unwrap();
        let config = SlipsConfig::in_dir(dir.path().join("data"));
        write_csv(&config, SCENARIO_CSV);
        run_import(&config).unwrap();

        write_csv(&config, "name,price\nCarl,1.0\nDora,not-a-number\n");
        assert!(matches!(run_import(&config), Err(Error::InvalidNumber { .. })));

        let store = SlipStore::open_read_only(&config.db_path).unwrap();
        let names: Vec<String> = store.all().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Alice", "bob"]);
    }
}
