//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. These types stay light-weight data holders so the store and the
//! presentation layer can focus on their own concerns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Genre stored when the caller leaves the field blank.
pub const DEFAULT_GENRE: &str = "Other";

/// Preset genres offered by the add form. Any other text is accepted too.
pub const GENRE_CHOICES: &[&str] = &[
    "Fiction",
    "Non-fiction",
    "Mystery",
    "Romance",
    "Fantasy",
    "Science Fiction",
    "Horror",
    "History",
    DEFAULT_GENRE,
];

/// A single catalog record. Field order matches the export format so the
/// serialized objects read `id, title, author, year, genre, read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Primary key assigned by SQLite. Never reused after a delete.
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Publication year. Only "is an integer" is enforced.
    pub year: i64,
    pub genre: String,
    /// Reading status flag.
    pub read: bool,
}

impl Book {
    /// Human-readable status label used in the library detail pane.
    pub fn status_label(&self) -> &'static str {
        if self.read {
            "Read"
        } else {
            "Not read"
        }
    }
}

impl fmt::Display for Book {
    /// `Title by Author (Year)`, the same heading every list view shows.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {} ({})", self.title, self.author, self.year)
    }
}

/// Caller-supplied draft for a new book. The year stays raw text because
/// "parses as an integer" is part of what the store validates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: String,
    pub genre: String,
    pub read: bool,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year: year.into(),
            genre: String::new(),
            read: false,
        }
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn read(mut self, read: bool) -> Self {
        self.read = read;
        self
    }
}

/// Aggregate counts over the current collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LibraryStats {
    pub total: u64,
    pub read: u64,
    pub unread: u64,
    /// Share of read books in percent, rounded to two decimals. Zero for an
    /// empty library.
    pub percent_read: f64,
}

impl LibraryStats {
    pub fn from_counts(total: u64, read: u64) -> Self {
        let percent_read = if total > 0 {
            let raw = read as f64 / total as f64 * 100.0;
            (raw * 100.0).round() / 100.0
        } else {
            0.0
        };

        Self {
            total,
            read,
            unread: total.saturating_sub(read),
            percent_read,
        }
    }

    pub fn progress(&self) -> ReadingProgress {
        if self.percent_read <= 0.0 {
            ReadingProgress::NotStarted
        } else if self.percent_read < 50.0 {
            ReadingProgress::UnderHalf
        } else if self.percent_read < 100.0 {
            ReadingProgress::OverHalf
        } else {
            ReadingProgress::Complete
        }
    }

    /// Fraction in `0.0..=1.0`, ready for a gauge widget.
    pub fn ratio(&self) -> f64 {
        (self.percent_read / 100.0).clamp(0.0, 1.0)
    }
}

/// Encouragement tier shown beneath the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingProgress {
    NotStarted,
    UnderHalf,
    OverHalf,
    Complete,
}

impl ReadingProgress {
    pub fn message(self) -> &'static str {
        match self {
            ReadingProgress::NotStarted => {
                "You haven't read any books yet! Start reading today!"
            }
            ReadingProgress::UnderHalf => "Keep going! You're making progress.",
            ReadingProgress::OverHalf => "You're doing great! Almost there.",
            ReadingProgress::Complete => "Congratulations! You've read all your books!",
        }
    }
}
