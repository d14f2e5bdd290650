use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::error::{LibraryError, ValidationError};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Word an error for the footer. Store failures get fixed wording; anything
/// else falls back to the innermost cause.
pub(crate) fn describe_error(err: &Error) -> String {
    let library_error = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<LibraryError>());

    match library_error {
        Some(LibraryError::Validation(invalid)) => describe_validation(invalid),
        Some(LibraryError::StorageUnavailable(_)) => {
            "The library database is unavailable. Please try again.".to_string()
        }
        None => surface_error(err),
    }
}

fn describe_validation(err: &ValidationError) -> String {
    match err {
        ValidationError::EmptyTitle | ValidationError::EmptyAuthor => {
            "Please enter both the title and the author's name.".to_string()
        }
        ValidationError::InvalidYear(raw) => {
            format!("Year must be a whole number (got '{raw}').")
        }
    }
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
