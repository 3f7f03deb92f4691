//! Slip - one product slip (transaction) record

use serde::{Deserialize, Serialize};

/// Column names in canonical order. The schema, the CSV mapper and every
/// output format use this order.
pub const COLUMNS: [&str; 7] = [
    "name",
    "phone",
    "address",
    "price",
    "discount",
    "total",
    "timestamp",
];

/// Separator used by the plain-text row format
pub const FIELD_SEPARATOR: &str = " | ";

/// A single transaction record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Slip {
    pub name: String,
    pub phone: String,
    pub address: String,
    /// Amount before discount
    pub price: f64,
    pub discount: f64,
    pub total: f64,
    /// Free-form date/time, stored as given
    pub timestamp: String,
}

impl Slip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_contact(mut self, phone: impl Into<String>, address: impl Into<String>) -> Self {
        self.phone = phone.into();
        self.address = address.into();
        self
    }

    pub fn with_amounts(mut self, price: f64, discount: f64, total: f64) -> Self {
        self.price = price;
        self.discount = discount;
        self.total = total;
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Field values rendered as text, in [`COLUMNS`] order
    pub fn fields(&self) -> [String; 7] {
        [
            self.name.clone(),
            self.phone.clone(),
            self.address.clone(),
            format_decimal(self.price),
            format_decimal(self.discount),
            format_decimal(self.total),
            self.timestamp.clone(),
        ]
    }
}

impl std::fmt::Display for Slip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fields().join(FIELD_SEPARATOR))
    }
}

/// Shortest round-trip form with at least one fractional digit
/// (`100.0`, `12.5`, `0.1`). Magnitudes outside `[1e-4, 1e16)` use a signed,
/// two-digit exponent (`1e+16`, `1.5e-05`).
pub fn format_decimal(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let scientific = format!("{:e}", value);
        if let Some((mantissa, exponent)) = scientific.split_once('e') {
            if let Ok(exponent) = exponent.parse::<i32>() {
                let sign = if exponent < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
            }
        }
    }

    let plain = value.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{}.0", plain)
    }
}
