//! Database schema definitions

/// SQL to create the slips table. No key and no constraints: duplicate
/// rows are allowed.
pub const CREATE_SLIPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS slips (
    name TEXT,
    phone TEXT,
    address TEXT,
    price REAL,
    discount REAL,
    total REAL,
    timestamp TEXT
)
"#;

/// Column list for SELECT and INSERT, in canonical order
pub const SLIP_COLUMNS: &str = "name, phone, address, price, discount, total, timestamp";

/// Name of the scalar function registered on every connection to lowercase
/// text the same way the Rust side does
pub const FOLD_LOWER_FN: &str = "fold_lower";

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![CREATE_SLIPS_TABLE]
}
