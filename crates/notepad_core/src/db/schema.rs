//! Notes table definition.
//!
//! # Responsibility
//! - Create the `notes` table when absent.
//! - Describe the columns repositories rely on.
//!
//! # Invariants
//! - Schema creation is idempotent and never drops or alters existing data.
//! - `AUTOINCREMENT` keeps deleted ids from being reused.

use super::DbResult;
use rusqlite::Connection;

/// Table owned by the note store.
pub const NOTES_TABLE: &str = "notes";

/// Columns every repository query depends on.
pub const NOTES_COLUMNS: [&str; 4] = ["id", "title", "content", "date_created"];

const CREATE_NOTES_SQL: &str = "
CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    date_created TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_notes_date_created ON notes (date_created DESC, id DESC);
";

/// Creates the notes table and its ordering index if they do not exist yet.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CREATE_NOTES_SQL)?;
    Ok(())
}

/// Returns whether `table` exists in the connected database.
pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Returns whether `table` declares `column`.
pub fn table_has_column(conn: &Connection, table: &str, column: &str) -> DbResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
