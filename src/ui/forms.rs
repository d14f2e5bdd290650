use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Book, NewBook, DEFAULT_GENRE, GENRE_CHOICES};

/// Internal representation of the "add book" form fields. Values stay raw text
/// so the store gets to run its own validation on exactly what was typed.
#[derive(Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) genre: String,
    pub(crate) read: bool,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

/// Fields available within the book form, in focus order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Year,
    Genre,
    Read,
}

impl BookField {
    const ORDER: [BookField; 5] = [
        BookField::Title,
        BookField::Author,
        BookField::Year,
        BookField::Genre,
        BookField::Read,
    ];

    fn position(self) -> usize {
        Self::ORDER
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }

    fn offset(self, delta: isize) -> Self {
        let len = Self::ORDER.len() as isize;
        let idx = (self.position() as isize + delta).rem_euclid(len) as usize;
        Self::ORDER.get(idx).copied().unwrap_or_default()
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Year => "Year",
            BookField::Genre => "Genre",
            BookField::Read => "Read",
        }
    }
}

impl Default for BookForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            year: String::new(),
            genre: GENRE_CHOICES
                .first()
                .copied()
                .unwrap_or(DEFAULT_GENRE)
                .to_string(),
            read: false,
            active: BookField::default(),
            error: None,
        }
    }
}

impl BookForm {
    pub(crate) fn next_field(&mut self) {
        self.active = self.active.offset(1);
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.offset(-1);
    }

    /// Append a character to the active field, validating allowed input.
    /// Returns whether the form changed.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            BookField::Year => {
                if ch.is_ascii_digit() || (ch == '-' && self.year.is_empty()) {
                    self.year.push(ch);
                    true
                } else {
                    false
                }
            }
            BookField::Read => {
                if ch == ' ' {
                    self.read = !self.read;
                    true
                } else {
                    false
                }
            }
            field => {
                if ch.is_control() {
                    return false;
                }
                if let Some(value) = self.text_mut(field) {
                    value.push(ch);
                }
                true
            }
        }
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        if let Some(value) = self.text_mut(self.active) {
            value.pop();
        }
    }

    /// Left/Right on the genre field walks the preset list; on the read field it
    /// flips the flag. Other fields ignore it.
    pub(crate) fn cycle(&mut self, delta: isize) {
        match self.active {
            BookField::Genre => {
                let len = GENRE_CHOICES.len() as isize;
                let current = GENRE_CHOICES
                    .iter()
                    .position(|choice| choice.eq_ignore_ascii_case(self.genre.trim()));
                let next = match current {
                    Some(idx) => (idx as isize + delta).rem_euclid(len),
                    None if delta >= 0 => 0,
                    None => len - 1,
                };
                if let Some(choice) = GENRE_CHOICES.get(next as usize) {
                    self.genre = choice.to_string();
                }
            }
            BookField::Read => self.read = !self.read,
            _ => {}
        }
    }

    pub(crate) fn to_draft(&self) -> NewBook {
        NewBook::new(self.title.as_str(), self.author.as_str(), self.year.as_str())
            .genre(self.genre.as_str())
            .read(self.read)
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        let is_active = self.active == field;
        let (display, empty) = match field {
            BookField::Read => {
                let mark = if self.read { "[x] Finished" } else { "[ ] Not read" };
                (mark.to_string(), false)
            }
            BookField::Genre => (format!("< {} >", self.genre), self.genre.is_empty()),
            _ => {
                let value = self.text(field);
                if value.is_empty() {
                    ("<required>".to_string(), true)
                } else {
                    (value.to_string(), false)
                }
            }
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if empty {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: BookField) -> usize {
        self.text(field).chars().count()
    }

    fn text(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Year => &self.year,
            BookField::Genre => &self.genre,
            BookField::Read => "",
        }
    }

    fn text_mut(&mut self, field: BookField) -> Option<&mut String> {
        match field {
            BookField::Title => Some(&mut self.title),
            BookField::Author => Some(&mut self.author),
            BookField::Year => Some(&mut self.year),
            BookField::Genre => Some(&mut self.genre),
            BookField::Read => None,
        }
    }
}

#[derive(Clone)]
pub(crate) struct ConfirmBookDelete {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) author: String,
}

impl ConfirmBookDelete {
    /// Build the confirmation state from the book being considered.
    pub(crate) fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
        }
    }
}
