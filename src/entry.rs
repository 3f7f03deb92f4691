//! New slip entry
//!
//! A slip is priced from a percentage discount, stamped with the current UTC
//! time and appended to both `slips.csv` (the importer's input) and
//! `slips.jsonl`. Each append rewrites the file through a temporary sibling
//! and an atomic rename, so readers never see a half-written line.

use std::io::Write;
use std::path::Path;
use csv::WriterBuilder;
use tempfile::NamedTempFile;
use crate::config::SlipsConfig;
use crate::slip::{Slip, COLUMNS};
use crate::{Error, Result};

/// Customer details and pricing as typed in by the user
#[derive(Debug, Clone, PartialEq)]
pub struct SlipEntry {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub price: f64,
    /// Percentage, 0 to 100
    pub discount: f64,
}

/// Price after a percentage discount
pub fn calculate_total(price: f64, discount_percent: f64) -> f64 {
    price - (price * discount_percent / 100.0)
}

/// `2024-01-01T12:00:00Z`
pub fn utc_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl SlipEntry {
    /// Text fields must be non-blank; price non-negative; discount within 0..=100.
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [("name", &self.name), ("phone", &self.phone), ("address", &self.address)] {
            if value.trim().is_empty() {
                return Err(Error::InvalidEntry(format!("{} must not be empty", label)));
            }
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::InvalidEntry(format!(
                "price must be a non-negative number, got {}",
                self.price
            )));
        }
        if !self.discount.is_finite() || !(0.0..=100.0).contains(&self.discount) {
            return Err(Error::InvalidEntry(format!(
                "discount must be between 0 and 100, got {}",
                self.discount
            )));
        }
        Ok(())
    }

    /// Build the stored slip; amounts are rounded to cents
    pub fn into_slip(self, timestamp: impl Into<String>) -> Slip {
        let total = calculate_total(self.price, self.discount);
        Slip::new(self.name.trim())
            .with_contact(self.phone.trim(), self.address.trim())
            .with_amounts(round_cents(self.price), round_cents(self.discount), round_cents(total))
            .with_timestamp(timestamp)
    }
}

/// One CSV record (plus the header when asked), amounts with two decimals
pub fn csv_line(slip: &Slip, with_header: bool) -> Result<String> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    if with_header {
        writer.write_record(COLUMNS)?;
    }
    let [price, discount, total] = [slip.price, slip.discount, slip.total].map(|v| format!("{:.2}", v));
    writer.write_record([
        slip.name.as_str(),
        slip.phone.as_str(),
        slip.address.as_str(),
        price.as_str(),
        discount.as_str(),
        total.as_str(),
        slip.timestamp.as_str(),
    ])?;
    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// One compact JSON object terminated by a newline
pub fn jsonl_line(slip: &Slip) -> Result<String> {
    let mut line = serde_json::to_string(slip)?;
    line.push('\n');
    Ok(line)
}

/// Append `content` to `path` by writing the full new contents to a
/// temporary file in the same directory and renaming it over the target.
pub fn atomic_append(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let existing = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&existing)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Validate, price and stamp `entry`, then append it to the CSV and JSON
/// Lines files. The CSV header is written when the file is new or empty.
pub fn record_slip(config: &SlipsConfig, entry: SlipEntry) -> Result<Slip> {
    entry.validate()?;
    let slip = entry.into_slip(utc_timestamp());

    let needs_header = std::fs::metadata(&config.csv_path)
        .map(|meta| meta.len() == 0)
        .unwrap_or(true);
    atomic_append(&config.csv_path, &csv_line(&slip, needs_header)?)?;
    atomic_append(&config.jsonl_path, &jsonl_line(&slip)?)?;

    tracing::info!("Recorded slip for {} in {}", slip.name, config.csv_path.display());
    Ok(slip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{read_slips, run_import};
    use crate::storage::SlipStore;

    fn entry(name: &str, price: f64, discount: f64) -> SlipEntry {
        SlipEntry {
            name: name.to_string(),
            phone: "555-1111".to_string(),
            address: "1 Main St".to_string(),
            price,
            discount,
        }
    }

    #[test]
    fn test_calculate_total_applies_percentage() {
        assert!((calculate_total(100.0, 0.0) - 100.0).abs() < 1e-9);
        assert!((calculate_total(100.0, 10.0) - 90.0).abs() < 1e-9);
        assert!((calculate_total(250.0, 20.0) - 200.0).abs() < 1e-9);
        assert!((calculate_total(80.0, 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(entry("Alice", 10.0, 5.0).validate().is_ok());
        assert!(entry("Alice", 0.0, 0.0).validate().is_ok());
        assert!(entry("Alice", 10.0, 100.0).validate().is_ok());

        for bad in [
            entry("   ", 10.0, 5.0),
            entry("Alice", -1.0, 5.0),
            entry("Alice", f64::NAN, 5.0),
            entry("Alice", 10.0, 100.5),
            entry("Alice", 10.0, -0.1),
        ] {
            assert!(matches!(bad.validate(), Err(Error::InvalidEntry(_))), "{:?}", bad);
        }
    }

    #[test]
    fn test_into_slip_computes_total_and_trims() {
        let mut e = entry("  Alice ", 999.999, 10.0);
        e.phone = " 555-9999 ".to_string();
        let slip = e.into_slip("2024-01-01T00:00:00Z");

        assert_eq!(slip.name, "Alice");
        assert_eq!(slip.phone, "555-9999");
        assert_eq!(slip.price, 1000.0);
        assert_eq!(slip.discount, 10.0);
        assert_eq!(slip.total, 900.0);
        assert_eq!(slip.timestamp, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_csv_line_formats_and_escapes() {
        let slip = Slip::new("Smith, \"Jo\"")
            .with_contact("555", "1 Main St")
            .with_amounts(12.5, 0.0, 12.5)
            .with_timestamp("2024-01-01T00:00:00Z");

        let line = csv_line(&slip, true).unwrap();
        let mut lines = line.lines();
        assert_eq!(lines.next(), Some("name,phone,address,price,discount,total,timestamp"));
        assert_eq!(
            lines.next(),
            Some("\"Smith, \"\"Jo\"\"\",555,1 Main St,12.50,0.00,12.50,2024-01-01T00:00:00Z")
        );
        assert_eq!(lines.next(), None);

        assert!(!csv_line(&slip, false).unwrap().starts_with("name,"));
    }

    #[test]
    fn test_jsonl_line_is_one_object() {
        let slip = Slip::new("Zed").with_amounts(10.0, 5.0, 9.5);
        let line = jsonl_line(&slip).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.trim_end().lines().count(), 1);
        let parsed: Slip = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed, slip);
    }

    #[test]
    fn test_atomic_append_creates_then_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("log.txt");

        atomic_append(&path, "one\n").unwrap();
        atomic_append(&path, "two\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
        let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_record_slip_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = SlipsConfig::in_dir(dir.path().join("data"));

        record_slip(&config, entry("Alice", 100.0, 10.0)).unwrap();
        record_slip(&config, entry("bob", 50.0, 0.0)).unwrap();

        let csv = std::fs::read_to_string(&config.csv_path).unwrap();
        assert_eq!(csv.matches("name,phone,address").count(), 1);
        assert_eq!(csv.lines().count(), 3);

        let jsonl = std::fs::read_to_string(&config.jsonl_path).unwrap();
        assert_eq!(jsonl.lines().count(), 2);

        let slips = read_slips(csv.as_bytes()).unwrap();
        assert_eq!(slips[0].total, 90.0);
        assert_eq!(slips[1].name, "bob");
    }

    #[test]
    fn test_record_slip_rejects_invalid_entry_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = SlipsConfig::in_dir(dir.path().join("data"));

        assert!(record_slip(&config, entry("Alice", 10.0, 150.0)).is_err());
        assert!(!config.csv_path.exists());
        assert!(!config.jsonl_path.exists());
    }

    #[test]
    fn test_recorded_slips_import_into_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = SlipsConfig::in_dir(dir.path().join("data"));

        record_slip(&config, entry("Alice", 100.0, 10.0)).unwrap();
        record_slip(&config, entry("Carol", 40.0, 25.0)).unwrap();
        let report = run_import(&config).unwrap();
        assert_eq!(report.rows, 2);

        let store = SlipStore::open_read_only(&config.db_path).unwrap();
        let carol = store.find_by_name("carol").unwrap();
        assert_eq!(carol.len(), 1);
        assert_eq!(carol[0].total, 30.0);
    }
}
