//! SQLite storage implementation

use std::path::Path;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, params};
use crate::Result;
use crate::slip::Slip;
use super::schema;

/// SQLite-backed record store for slips
pub struct SlipStore {
    conn: Connection,
}

impl SlipStore {
    /// Open a database file for writing (creates it and the table if missing)
    pub fn open(path: &Path) -> Result<Self> {
        tracing::debug!("Opening slip store at {}", path.display());
        let conn = Connection::open(path)?;
        let store = Self::with_connection(conn)?;
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an existing database file without write access
    pub fn open_read_only(path: &Path) -> Result<Self> {
        tracing::debug!("Opening slip store read-only at {}", path.display());
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self::with_connection(conn)?;
        store.initialize_schema()?;
        Ok(store)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        register_functions(&conn)?;
        Ok(Self { conn })
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Replace the whole table with `slips`, in order.
    ///
    /// Delete and inserts share one transaction: on any error it is rolled
    /// back when dropped and the previous rows survive.
    pub fn replace_all(&mut self, slips: &[Slip]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM slips", [])?;
        tracing::debug!("Cleared {} existing slips", removed);

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO slips ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                schema::SLIP_COLUMNS
            ))?;
            for slip in slips {
                stmt.execute(params![
                    slip.name,
                    slip.phone,
                    slip.address,
                    slip.price,
                    slip.discount,
                    slip.total,
                    slip.timestamp,
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!("Committed {} slips", slips.len());
        Ok(slips.len())
    }

    /// Slips whose name contains `needle`, ignoring case, in natural row order
    pub fn find_by_name(&self, needle: &str) -> Result<Vec<Slip>> {
        let sql = format!(
            "SELECT {cols} FROM slips WHERE instr({f}(name), {f}(?1)) > 0",
            cols = schema::SLIP_COLUMNS,
            f = schema::FOLD_LOWER_FN,
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let slips = stmt
            .query_map([needle], row_to_slip)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(slips)
    }

    /// Every slip, in natural row order
    pub fn all(&self) -> Result<Vec<Slip>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM slips", schema::SLIP_COLUMNS))?;
        let slips = stmt
            .query_map([], row_to_slip)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(slips)
    }

    /// Count all slips
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM slips", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Convert a row to a Slip. NULLs read back as the importer's defaults.
fn row_to_slip(row: &rusqlite::Row) -> rusqlite::Result<Slip> {
    Ok(Slip {
        name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
        phone: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        address: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        price: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
        discount: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
        total: row.get::<_, Option<f64>>(5)?.unwrap_or(0.0),
        timestamp: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
    })
}

/// SQLite's own `lower()` only folds ASCII; this one matches `str::to_lowercase`.
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        schema::FOLD_LOWER_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let folded = match ctx.get_raw(0) {
                ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).to_lowercase()),
                _ => None,
            };
            Ok(folded)
        },
    )
}
