use std::mem;
use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Tabs, Wrap,
};
use ratatui::Frame;
use tracing::{debug, warn};

use crate::db::LibraryStore;
use crate::export::write_export;
use crate::models::{LibraryStats, ReadingProgress};

use super::forms::{BookField, BookForm, ConfirmBookDelete};
use super::helpers::{centered_rect, describe_error};
use super::screens::{BookList, SearchScreen, StatsScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Header space for the title and the view tabs.
const HEADER_HEIGHT: u16 = 3;
const TAB_TITLES: [&str; 3] = ["Library", "Search", "Statistics"];

/// High-level navigation states.
enum Screen {
    Library,
    Search(SearchScreen),
    Stats(StatsScreen),
}

impl Screen {
    fn tab_index(&self) -> usize {
        match self {
            Screen::Library => 0,
            Screen::Search(_) => 1,
            Screen::Stats(_) => 2,
        }
    }
}

/// Fine-grained modes layered over the current screen.
enum Mode {
    Normal,
    AddingBook(BookForm),
    ConfirmDelete(ConfirmBookDelete),
    Searching(SearchState),
}

/// State for the search input bar.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. The store handle is owned
/// here for the lifetime of the session.
pub struct App {
    store: LibraryStore,
    export_dir: PathBuf,
    library: BookList,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: LibraryStore, export_dir: PathBuf) -> Result<Self> {
        let books = store.list_all().context("failed to load library")?;
        Ok(Self {
            store,
            export_dir,
            library: BookList::new(books),
            screen: Screen::Library,
            mode: Mode::Normal,
            status: None,
        })
    }

    /// Feed one key press through the current mode. Returns `true` once the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::AddingBook(form) => self.handle_add_book(code, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::Searching(state) => self.handle_search_input(code, state),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
                return Mode::Normal;
            }
            KeyCode::Esc => {
                if matches!(self.screen, Screen::Library) {
                    *exit = true;
                } else {
                    self.clear_status();
                    self.screen = Screen::Library;
                }
                return Mode::Normal;
            }
            KeyCode::Tab => return self.switch_tab(1),
            KeyCode::BackTab => return self.switch_tab(-1),
            KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                return Mode::AddingBook(BookForm::default());
            }
            KeyCode::Char('/') | KeyCode::Char('f') => {
                self.clear_status();
                return Mode::Searching(SearchState {
                    query: self.last_query(),
                });
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                if matches!(self.screen, Screen::Stats(_)) {
                    self.screen = Screen::Library;
                } else {
                    self.clear_status();
                    self.run(Self::open_stats);
                }
                return Mode::Normal;
            }
            KeyCode::Char('x') | KeyCode::Char('X') => {
                self.run(Self::export_library);
                return Mode::Normal;
            }
            _ => {}
        }

        let list = match &mut self.screen {
            Screen::Library => &mut self.library,
            Screen::Search(search) => &mut search.results,
            Screen::Stats(_) => return Mode::Normal,
        };

        match code {
            KeyCode::Up => list.move_selection(-1),
            KeyCode::Down => list.move_selection(1),
            KeyCode::PageUp => list.move_selection(-5),
            KeyCode::PageDown => list.move_selection(5),
            KeyCode::Home => list.select_first(),
            KeyCode::End => list.select_last(),
            KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(book) = list.current() {
                    let confirm = ConfirmBookDelete::from(book);
                    self.clear_status();
                    return Mode::ConfirmDelete(confirm);
                }
                self.set_status("No book selected to remove.", StatusKind::Error);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Mode {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left => form.cycle(-1),
            KeyCode::Right => form.cycle(1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_book(&form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = describe_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Mode::AddingBook(form)
        } else {
            Mode::Normal
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmBookDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(()) => Mode::Normal,
                    Err(err) => {
                        self.report(&err);
                        Mode::ConfirmDelete(confirm)
                    }
                }
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn handle_search_input(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.clear_status();
                Mode::Normal
            }
            KeyCode::Backspace => {
                state.query.pop();
                Mode::Searching(state)
            }
            KeyCode::Enter => {
                if state.query.is_empty() {
                    self.set_status("Please enter a search query.", StatusKind::Error);
                    return Mode::Searching(state);
                }
                match self.run_search(state.query.clone()) {
                    Ok(()) => Mode::Normal,
                    Err(err) => {
                        self.report(&err);
                        Mode::Searching(state)
                    }
                }
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    state.query.push(ch);
                }
                Mode::Searching(state)
            }
            _ => Mode::Searching(state),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        match &self.screen {
            Screen::Library => {
                self.draw_book_list(frame, chunks[1], "Your Book Collection", &self.library)
            }
            Screen::Search(search) => self.draw_search_results(frame, chunks[1], search),
            Screen::Stats(stats) => self.draw_stats(frame, chunks[1], &stats.stats),
        }
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let tabs = Tabs::new(TAB_TITLES.to_vec())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Personal Library Manager"),
            )
            .select(self.screen.tab_index())
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_book_list(&self, frame: &mut Frame, area: Rect, title: &str, list: &BookList) {
        if list.is_empty() {
            let message = Paragraph::new("No books added yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(title.to_string()))
                .wrap(Wrap { trim: true });
            frame.render_widget(message, area);
            return;
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let items: Vec<ListItem> = list
            .books
            .iter()
            .map(|book| ListItem::new(book.to_string()))
            .collect();
        let widget = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{title} ({})", list.len())),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(list.selected));
        frame.render_stateful_widget(widget, columns[0], &mut state);

        let details = match list.current() {
            Some(book) => vec![
                Line::from(Span::styled(
                    book.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("Author: {}", book.author)),
                Line::from(format!("Year: {}", book.year)),
                Line::from(format!("Genre: {}", book.genre)),
                Line::from(format!("Reading Status: {}", book.status_label())),
            ],
            None => vec![Line::from("")],
        };
        let paragraph = Paragraph::new(details)
            .block(Block::default().borders(Borders::ALL).title("Details"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, columns[1]);
    }

    fn draw_search_results(&self, frame: &mut Frame, area: Rect, search: &SearchScreen) {
        if search.results.is_empty() {
            let message = Paragraph::new(format!("No matching books found for '{}'.", search.query))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Search"))
                .wrap(Wrap { trim: true });
            frame.render_widget(message, area);
            return;
        }

        let title = format!("Results for '{}'", search.query);
        self.draw_book_list(frame, area, &title, &search.results);
    }

    fn draw_stats(&self, frame: &mut Frame, area: Rect, stats: &LibraryStats) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);

        let metrics = vec![
            Line::from(format!("Total Books: {}", stats.total)),
            Line::from(format!("Books Read: {}", stats.read)),
            Line::from(format!("Percentage Read: {}%", stats.percent_read)),
        ];
        frame.render_widget(
            Paragraph::new(metrics)
                .block(Block::default().borders(Borders::ALL).title("Library Statistics")),
            rows[0],
        );

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Reading Progress"))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(stats.ratio());
        frame.render_widget(gauge, rows[1]);

        let progress = stats.progress();
        let progress_style = match progress {
            ReadingProgress::NotStarted => Style::default().fg(Color::Yellow),
            ReadingProgress::UnderHalf => Style::default().fg(Color::Cyan),
            ReadingProgress::OverHalf | ReadingProgress::Complete => {
                Style::default().fg(Color::Green)
            }
        };
        let export_hint = if stats.total > 0 {
            "Press x to export the library as JSON."
        } else {
            "No books to export yet."
        };
        let lines = vec![
            Line::from(Span::styled(progress.message(), progress_style)),
            Line::from(""),
            Line::from(Span::styled(export_hint, Style::default().fg(Color::Gray))),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), rows[2]);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&'static str, &'static str)] = match (&self.screen, &self.mode) {
            (_, Mode::AddingBook(_)) => &[
                ("[Tab]", " Next field   "),
                ("[←→]", " Genre/Read   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            (_, Mode::ConfirmDelete(_)) => &[("[Y]", " Remove   "), ("[N]", " Keep")],
            (_, Mode::Searching(_)) => &[("[Enter]", " Search   "), ("[Esc]", " Cancel")],
            (Screen::Stats(_), _) => &[
                ("[x]", " Export JSON   "),
                ("[/]", " Search   "),
                ("[Esc]", " Back   "),
                ("[q]", " Quit"),
            ],
            _ => &[
                ("[↑↓]", " Navigate   "),
                ("[+]", " Add   "),
                ("[-]", " Remove   "),
                ("[/]", " Search   "),
                ("[s]", " Stats   "),
                ("[x]", " Export   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|(key, label)| [Span::styled(*key, key_style), Span::raw(*label)])
            .collect();
        Line::from(spans)
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, form: &BookForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Book").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let fields = [
            BookField::Title,
            BookField::Author,
            BookField::Year,
            BookField::Genre,
            BookField::Read,
        ];
        let mut lines: Vec<Line> = fields.iter().map(|field| form.build_line(*field)).collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Space toggles Read • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let row = match form.active {
            BookField::Title => 0,
            BookField::Author => 1,
            BookField::Year => 2,
            BookField::Genre | BookField::Read => return,
        };
        let prefix = form.active.label().chars().count() + 2;
        frame.set_cursor_position((
            cursor_column(inner, prefix + form.value_len(form.active)),
            inner.y + row,
        ));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBookDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Remove '{}' by {}?", confirm.title, confirm.author)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Search by title or author");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let offset = "Search: ".len() + state.query.chars().count();
        frame.set_cursor_position((cursor_column(inner, offset), inner.y));
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Show a failed action in the footer. The session keeps running.
    fn report(&mut self, err: &anyhow::Error) {
        warn!(error = %format!("{err:#}"), "action failed");
        let message = describe_error(err);
        self.set_status(message, StatusKind::Error);
    }

    fn run(&mut self, action: fn(&mut Self) -> Result<()>) {
        if let Err(err) = action(self) {
            self.report(&err);
        }
    }

    /// Move to the neighbouring tab. The search tab opens the query bar rather
    /// than an empty result list.
    fn switch_tab(&mut self, delta: isize) -> Mode {
        let len = TAB_TITLES.len() as isize;
        let target = (self.screen.tab_index() as isize + delta).rem_euclid(len);
        self.clear_status();
        match target {
            0 => self.screen = Screen::Library,
            1 => {
                self.screen = Screen::Library;
                return Mode::Searching(SearchState {
                    query: String::new(),
                });
            }
            _ => self.run(Self::open_stats),
        }
        Mode::Normal
    }

    fn last_query(&self) -> String {
        match &self.screen {
            Screen::Search(search) => search.query.clone(),
            _ => String::new(),
        }
    }

    fn save_new_book(&mut self, form: &BookForm) -> Result<()> {
        let book = self.store.add(&form.to_draft())?;
        self.reload_library(Some(book.id))?;
        self.set_status(
            format!("'{}' by {} added.", book.title, book.author),
            StatusKind::Info,
        );
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmBookDelete) -> Result<()> {
        let removed = self.store.delete(confirm.id)?;
        self.reload_library(None)?;

        if removed {
            self.set_status(format!("'{}' removed.", confirm.title), StatusKind::Info);
        } else {
            self.set_status(
                format!("'{}' was already removed.", confirm.title),
                StatusKind::Warning,
            );
        }
        Ok(())
    }

    fn run_search(&mut self, query: String) -> Result<()> {
        let results = self.store.search(&query)?;
        debug!(query = %query, count = results.len(), "search ran");
        if results.is_empty() {
            self.set_status("No matching books found.", StatusKind::Warning);
        } else {
            self.set_status(format!("Found {} book(s).", results.len()), StatusKind::Info);
        }
        self.screen = Screen::Search(SearchScreen::new(query, results));
        Ok(())
    }

    fn open_stats(&mut self) -> Result<()> {
        let stats = self.store.stats()?;
        self.screen = Screen::Stats(StatsScreen { stats });
        Ok(())
    }

    fn export_library(&mut self) -> Result<()> {
        match write_export(&self.store, &self.export_dir)? {
            Some(summary) => self.set_status(
                format!(
                    "Exported {} book(s) to {}.",
                    summary.count,
                    summary.path.display()
                ),
                StatusKind::Info,
            ),
            None => self.set_status("No books to export yet.", StatusKind::Info),
        }
        Ok(())
    }

    fn reload_library(&mut self, focus_id: Option<i64>) -> Result<()> {
        let books = self.store.list_all()?;
        self.library.set_books(books, focus_id);
        if let Screen::Search(search) = &mut self.screen {
            let results = self.store.search(&search.query)?;
            search.results.set_books(results, focus_id);
        } else if let Screen::Stats(_) = self.screen {
            self.open_stats()?;
        }
        Ok(())
    }
}

/// Column for a text cursor `offset` cells into `inner`, kept inside the box.
fn cursor_column(inner: Rect, offset: usize) -> u16 {
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    inner
        .x
        .saturating_add(offset)
        .min(inner.right().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{from_json, EXPORT_FILE_NAME};
    use crate::models::NewBook;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app_with(drafts: &[NewBook]) -> (App, tempfile::TempDir) {
        let store = LibraryStore::open_in_memory().unwrap();
        for draft in drafts {
            store.add(draft).unwrap();
        }
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(store, dir.path().join("exports")).unwrap();
        (app, dir)
    }

    fn seeded_app() -> (App, tempfile::TempDir) {
        app_with(&[
            NewBook::new("Dune", "Frank Herbert", "1965"),
            NewBook::new("Emma", "Jane Austen", "1815").read(true),
            NewBook::new("Persuasion", "Jane Austen", "1817"),
        ])
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(code).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn status_text(app: &App) -> Option<&str> {
        app.status.as_ref().map(|status| status.text.as_str())
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn adding_a_book_through_the_form() {
        let (mut app, _dir) = app_with(&[]);
        press(&mut app, KeyCode::Char('+'));
        assert!(matches!(app.mode, Mode::AddingBook(_)));

        type_text(&mut app, "Dune");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Frank Herbert");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "1965");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Normal));
        let books = app.store.list_all().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].genre, "Other");
        assert!(books[0].read);
        assert_eq!(app.library.current().map(|b| b.id), Some(books[0].id));
        assert_eq!(status_text(&app), Some("'Dune' by Frank Herbert added."));
    }

    #[test]
    fn invalid_form_stays_open_and_writes_nothing() {
        let (mut app, _dir) = app_with(&[]);
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Only a title");
        press(&mut app, KeyCode::Enter);

        match &app.mode {
            Mode::AddingBook(form) => assert_eq!(
                form.error.as_deref(),
                Some("Please enter both the title and the author's name.")
            ),
            _ => panic!("form should stay open"),
        }
        assert!(app.store.list_all().unwrap().is_empty());
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Error));

        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn removing_requires_confirmation() {
        let (mut app, _dir) = seeded_app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('-'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.store.count().unwrap(), 3);

        press(&mut app, KeyCode::Char('-'));
        match &app.mode {
            Mode::ConfirmDelete(confirm) => assert_eq!(confirm.title, "Emma"),
            _ => panic!("expected confirmation"),
        }
        press(&mut app, KeyCode::Char('y'));

        let titles: Vec<String> = app
            .store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, ["Dune", "Persuasion"]);
        assert_eq!(app.library.len(), 2);
        assert_eq!(status_text(&app), Some("'Emma' removed."));
    }

    #[test]
    fn search_flow_filters_and_rejects_empty_query() {
        let (mut app, _dir) = seeded_app();
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.mode, Mode::Searching(_)));
        assert_eq!(status_text(&app), Some("Please enter a search query."));

        type_text(&mut app, "AUSTEN");
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.mode, Mode::Normal));
        match &app.screen {
            Screen::Search(search) => {
                assert_eq!(search.query, "AUSTEN");
                assert_eq!(search.results.len(), 2);
            }
            _ => panic!("expected search screen"),
        }

        press(&mut app, KeyCode::Char('-'));
        press(&mut app, KeyCode::Char('y'));
        match &app.screen {
            Screen::Search(search) => assert_eq!(search.results.len(), 1),
            _ => panic!("expected search screen"),
        }

        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "zzz");
        press(&mut app, KeyCode::Enter);
        assert_eq!(status_text(&app), Some("No matching books found."));
    }

    #[test]
    fn adding_a_book_refreshes_open_search_results() {
        let (mut app, _dir) = seeded_app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "austen");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('+'));
        type_text(&mut app, "Sense and Sensibility");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Jane Austen");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "1811");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Normal));
        let expected = app.store.search("austen").unwrap();
        assert_eq!(expected.len(), 3);
        match &app.screen {
            Screen::Search(search) => {
                assert_eq!(search.results.books, expected);
                assert_eq!(
                    search.results.current().map(|b| b.title.as_str()),
                    Some("Sense and Sensibility")
                );
            }
            _ => panic!("expected search screen"),
        }
    }

    #[test]
    fn stats_screen_reflects_store() {
        let (mut app, _dir) = seeded_app();
        press(&mut app, KeyCode::Char('s'));
        match &app.screen {
            Screen::Stats(screen) => {
                assert_eq!(screen.stats.total, 3);
                assert_eq!(screen.stats.read, 1);
                assert_eq!(screen.stats.percent_read, 33.33);
            }
            _ => panic!("expected stats screen"),
        }
        assert!(render(&app).contains("Total Books: 3"));

        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.screen, Screen::Library));
        assert!(press(&mut app, KeyCode::Esc));
    }

    #[test]
    fn export_writes_json_matching_library() {
        let (mut app, dir) = seeded_app();
        press(&mut app, KeyCode::Char('x'));

        let path = dir.path().join("exports").join(EXPORT_FILE_NAME);
        let json = std::fs::read_to_string(&path).unwrap();
        assert_eq!(from_json(&json).unwrap(), app.store.list_all().unwrap());
        assert!(status_text(&app).unwrap().starts_with("Exported 3 book(s)"));
    }

    #[test]
    fn export_of_empty_library_is_skipped() {
        let (mut app, dir) = app_with(&[]);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(status_text(&app), Some("No books to export yet."));
        assert!(!dir.path().join("exports").exists());
    }

    #[test]
    fn tab_cycles_views() {
        let (mut app, _dir) = seeded_app();
        press(&mut app, KeyCode::BackTab);
        assert!(matches!(app.screen, Screen::Stats(_)));
        press(&mut app, KeyCode::Tab);
        assert!(matches!(app.screen, Screen::Library));
        press(&mut app, KeyCode::Tab);
        assert!(matches!(app.mode, Mode::Searching(_)));
    }

    #[test]
    fn search_tab_reached_from_stats_leaves_stats_behind() {
        let (mut app, _dir) = seeded_app();
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::BackTab);
        assert!(matches!(app.mode, Mode::Searching(_)));
        assert!(matches!(app.screen, Screen::Library));

        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.screen, Screen::Library));
        assert!(render(&app).contains("Dune by Frank Herbert (1965)"));
    }

    #[test]
    fn cursor_column_stays_inside_the_box() {
        let inner = Rect::new(2, 1, 40, 1);
        assert_eq!(cursor_column(inner, 8), 10);
        assert_eq!(cursor_column(inner, 70_000), inner.right() - 1);
    }

    #[test]
    fn very_long_search_query_renders() {
        let (mut app, _dir) = seeded_app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, &"a".repeat(70_000));
        render(&app);
        assert!(matches!(app.mode, Mode::Searching(_)));
    }

    #[test]
    fn draws_every_view_without_panicking() {
        let (mut app, _dir) = seeded_app();
        let library = render(&app);
        assert!(library.contains("Personal Library Manager"));
        assert!(library.contains("Dune by Frank Herbert (1965)"));

        press(&mut app, KeyCode::Char('+'));
        assert!(render(&app).contains("Add Book"));
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "dune");
        render(&app);
        press(&mut app, KeyCode::Enter);
        assert!(render(&app).contains("Results for 'dune'"));

        let (empty, _dir) = app_with(&[]);
        assert!(render(&empty).contains("No books added yet."));
    }

    #[test]
    fn q_quits_from_normal_mode_only() {
        let (mut app, _dir) = seeded_app();
        press(&mut app, KeyCode::Char('+'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Char('q')));
    }
}
