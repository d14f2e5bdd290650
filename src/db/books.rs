use std::path::Path;

use rusqlite::{params, Connection, Row};
use tracing::{debug, info, warn};

use crate::error::{LibraryError, LibraryResult, ValidationError};
use crate::models::{Book, LibraryStats, NewBook, DEFAULT_GENRE};

use super::connection::ensure_schema;

const BOOK_COLUMNS: &str = "SELECT id, title, author, year, genre, read FROM books";

/// Owned handle over the SQLite connection holding every book. Callers get one
/// from `open`/`open_in_memory` and pass it to whatever needs the collection;
/// there is no shared global connection.
///
/// Nothing is cached: each call runs against the current table contents.
pub struct LibraryStore {
    conn: Connection,
}

impl LibraryStore {
    pub fn open(path: impl AsRef<Path>) -> LibraryResult<Self> {
        let conn = Connection::open(path).map_err(|err| storage_failure("open", err))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> LibraryResult<Self> {
        let conn = Connection::open_in_memory().map_err(|err| storage_failure("open", err))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> LibraryResult<Self> {
        ensure_schema(&conn).map_err(|err| storage_failure("create schema", err))?;
        Ok(Self { conn })
    }

    /// Validate the draft and insert it as a single row. A rejected draft never
    /// reaches SQLite, so nothing is left half-written.
    pub fn add(&self, draft: &NewBook) -> LibraryResult<Book> {
        let book = validate(draft)?;

        self.conn
            .execute(
                "INSERT INTO books (title, author, year, genre, read) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![book.title, book.author, book.year, book.genre, book.read],
            )
            .map_err(|err| storage_failure("insert", err))?;

        let book = Book {
            id: self.conn.last_insert_rowid(),
            ..book
        };
        info!(id = book.id, title = %book.title, "book added");
        Ok(book)
    }

    /// Every book in insertion order.
    pub fn list_all(&self) -> LibraryResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_COLUMNS} ORDER BY id"))
            .map_err(|err| storage_failure("prepare list", err))?;

        let books = stmt
            .query_map([], row_to_book)
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(|err| storage_failure("list", err))?;

        debug!(count = books.len(), "listed books");
        Ok(books)
    }

    /// Books whose title or author contains `query`, ignoring case. The
    /// comparison lowercases both sides in Rust because SQLite's `LIKE` only
    /// folds ASCII letters. An empty query matches everything.
    pub fn search(&self, query: &str) -> LibraryResult<Vec<Book>> {
        let needle = query.to_lowercase();
        let matches: Vec<Book> = self
            .list_all()?
            .into_iter()
            .filter(|book| {
                book.title.to_lowercase().contains(&needle)
                    || book.author.to_lowercase().contains(&needle)
            })
            .collect();

        debug!(query, count = matches.len(), "searched books");
        Ok(matches)
    }

    /// Remove a book by id. Returns `false` when no such book exists.
    pub fn delete(&self, id: i64) -> LibraryResult<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM books WHERE id = ?1", params![id])
            .map_err(|err| storage_failure("delete", err))?;

        if deleted > 0 {
            info!(id, "book deleted");
        } else {
            debug!(id, "delete skipped, no such book");
        }
        Ok(deleted > 0)
    }

    pub fn count(&self) -> LibraryResult<u64> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
            .map_err(|err| storage_failure("count", err))?;
        Ok(total.max(0) as u64)
    }

    pub fn stats(&self) -> LibraryResult<LibraryStats> {
        let (total, read): (i64, i64) = self
            .conn
            .query_row(
                "SELECT COUNT(*), COALESCE(SUM(read), 0) FROM books",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(|err| storage_failure("stats", err))?;

        Ok(LibraryStats::from_counts(total.max(0) as u64, read.max(0) as u64))
    }

    /// Same payload as `list_all`, named for the export path.
    pub fn export_all(&self) -> LibraryResult<Vec<Book>> {
        self.list_all()
    }
}

fn row_to_book(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        year: row.get(3)?,
        genre: row.get(4)?,
        read: row.get(5)?,
    })
}

/// Turn a draft into the row that will be stored. The id is filled in after the
/// insert.
fn validate(draft: &NewBook) -> Result<Book, ValidationError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let author = draft.author.trim();
    if author.is_empty() {
        return Err(ValidationError::EmptyAuthor);
    }
    let year = draft
        .year
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidYear(draft.year.clone()))?;
    let genre = match draft.genre.trim() {
        "" => DEFAULT_GENRE,
        genre => genre,
    };

    Ok(Book {
        id: 0,
        title: title.to_string(),
        author: author.to_string(),
        year,
        genre: genre.to_string(),
        read: draft.read,
    })
}

fn storage_failure(operation: &'static str, err: rusqlite::Error) -> LibraryError {
    warn!(operation, error = %err, "library storage failure");
    LibraryError::StorageUnavailable(err)
}
