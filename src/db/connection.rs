use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

use super::books::LibraryStore;

/// Create the `books` table when it does not exist yet. `AUTOINCREMENT` keeps
/// SQLite from handing out the id of a deleted row again, and the `CHECK`
/// constraints back up the store's own title/author validation.
pub(crate) fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL CHECK (length(trim(title)) > 0),
            author TEXT NOT NULL CHECK (length(trim(author)) > 0),
            year INTEGER NOT NULL,
            genre TEXT NOT NULL,
            read INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;
    Ok(())
}

/// Make sure the database directory exists and open the store at `db_path`.
pub fn open_library(db_path: &Path) -> Result<LibraryStore> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }
    }

    let store = LibraryStore::open(db_path)
        .with_context(|| format!("failed to open library at {}", db_path.display()))?;
    info!(path = %db_path.display(), "library opened");
    Ok(store)
}
