//! Storage Layer - SQLite-backed persistence
//!
//! A single table with no key:
//! - slips(name, phone, address, price, discount, total, timestamp)
//!
//! The importer owns the table and replaces its contents wholesale; the
//! query tool only reads it.

pub mod schema;
pub mod sqlite;

pub use sqlite::SlipStore;
