//! Core library surface for the personal library manager.
//!
//! `LibraryStore` is the persistence component: an owned SQLite handle with
//! add, list, search, delete, statistics and export operations. The `ui`
//! module is one caller of it; tests and other tooling can drive the store
//! directly.
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod ui;

/// Persistence entry points used by `main.rs` and the integration tests.
pub use db::{open_library, LibraryStore};
pub use error::{LibraryError, LibraryResult, ValidationError};

/// The domain types other layers manipulate.
pub use models::{Book, LibraryStats, NewBook, ReadingProgress};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
