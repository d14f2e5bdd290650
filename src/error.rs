//! Structured failures returned by the library store. The UI decides how to
//! word them for the user; nothing here is a display string meant for the
//! footer as-is.

use thiserror::Error;

/// Input rejected before anything reaches SQLite.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("author must not be empty")]
    EmptyAuthor,

    #[error("year '{0}' is not an integer")]
    InvalidYear(String),
}

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("invalid book")]
    Validation(#[from] ValidationError),

    #[error("storage unavailable")]
    StorageUnavailable(#[from] rusqlite::Error),
}

pub type LibraryResult<T> = Result<T, LibraryError>;
