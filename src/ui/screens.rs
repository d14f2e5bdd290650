use crate::models::{Book, LibraryStats};

/// A scrollable list of books with a single selected row. Both the library
/// view and the search results use it.
#[derive(Default)]
pub(crate) struct BookList {
    pub(crate) books: Vec<Book>,
    pub(crate) selected: usize,
}

impl BookList {
    pub(crate) fn new(books: Vec<Book>) -> Self {
        let mut list = Self { books, selected: 0 };
        list.ensure_in_bounds();
        list
    }

    pub(crate) fn current(&self) -> Option<&Book> {
        self.books.get(self.selected)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.books.len()
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.books.is_empty() {
            return;
        }
        let len = self.books.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.books.len().saturating_sub(1);
    }

    /// Swap in a fresh result set, keeping the cursor on `focus_id` when it is
    /// still present.
    pub(crate) fn set_books(&mut self, books: Vec<Book>, focus_id: Option<i64>) {
        self.books = books;
        if let Some(id) = focus_id {
            if let Some(idx) = self.books.iter().position(|book| book.id == id) {
                self.selected = idx;
                return;
            }
        }
        self.ensure_in_bounds();
    }

    fn ensure_in_bounds(&mut self) {
        if self.selected >= self.books.len() {
            self.selected = self.books.len().saturating_sub(1);
        }
    }
}

/// Results of the last search together with the query that produced them.
pub(crate) struct SearchScreen {
    pub(crate) query: String,
    pub(crate) results: BookList,
}

impl SearchScreen {
    pub(crate) fn new(query: String, results: Vec<Book>) -> Self {
        Self {
            query,
            results: BookList::new(results),
        }
    }
}

/// Snapshot of the aggregate counts shown on the statistics view.
pub(crate) struct StatsScreen {
    pub(crate) stats: LibraryStats,
}
