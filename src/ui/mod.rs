//! Ratatui front-end for the personal library. Every action goes through the
//! `LibraryStore` owned by `App`; this layer only renders results and words
//! failures for the user.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
