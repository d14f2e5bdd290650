//! JSON export of the whole collection. The file is an array of book objects
//! in `list_all` order, so re-importing it (or diffing two exports) is
//! straightforward.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::db::LibraryStore;
use crate::models::Book;

/// File name written into the export directory.
pub const EXPORT_FILE_NAME: &str = "books.json";

/// What a successful export wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub count: usize,
}

pub fn to_json(books: &[Book]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(books)
}

pub fn from_json(json: &str) -> serde_json::Result<Vec<Book>> {
    serde_json::from_str(json)
}

/// Write the current collection to `dir/books.json`. Returns `None` without
/// touching the filesystem when there is nothing to export.
pub fn write_export(store: &LibraryStore, dir: &Path) -> Result<Option<ExportSummary>> {
    let books = store.export_all().context("failed to load books for export")?;
    if books.is_empty() {
        return Ok(None);
    }

    fs::create_dir_all(dir).context("failed to create export directory")?;
    let path = dir.join(EXPORT_FILE_NAME);
    let json = to_json(&books).context("failed to serialize library")?;
    fs::write(&path, json)
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), count = books.len(), "library exported");
    Ok(Some(ExportSummary {
        path,
        count: books.len(),
    }))
}
