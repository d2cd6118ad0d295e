//! "My books" view: the user's catalogue and lending queues.
//!
//! DESIGN
//! ======
//! One list, four tabs, each backed by its own endpoint. Every mutation
//! is pessimistic: wait for the server, then reload the current page.
//! A suppressed response (session invalidated) leaves state untouched
//! since navigation has already moved away.

#[cfg(test)]
#[path = "my_books_test.rs"]
mod my_books_test;

use crate::net::books::BooksApi;
use crate::net::error::ApiError;
use crate::net::types::{Book, BookRequest, RequestedBook};
use crate::state::pagination::Pagination;

pub const PAGE_SIZE: u32 = 15;

pub const LOAD_ERROR: &str = "Failed to load data. Please try again.";
pub const APPROVE_ERROR: &str = "Failed to approve request.";
pub const REJECT_ERROR: &str = "Failed to reject request.";
pub const DELETE_ERROR: &str = "Failed to delete book.";
pub const INVALID_BOOK_ERROR: &str = "Title and Author are required";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BookTab {
    #[default]
    Owned,
    Returned,
    Borrowed,
    Requested,
}

/// Tabs whose rows are plain [`Book`]s.
#[derive(Clone, Copy, Debug)]
enum BookList {
    Owned,
    Returned,
    Borrowed,
}

#[derive(Clone, Debug)]
pub struct MyBooksState {
    pub tab: BookTab,
    pub pagination: Pagination,
    /// Rows for every tab except `Requested`.
    pub books: Vec<Book>,
    /// Rows for the `Requested` tab.
    pub requests: Vec<RequestedBook>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for MyBooksState {
    fn default() -> Self {
        Self {
            tab: BookTab::default(),
            pagination: Pagination::new(PAGE_SIZE),
            books: Vec::new(),
            requests: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

#[derive(Debug)]
pub struct MyBooksController {
    api: BooksApi,
    state: MyBooksState,
}

impl MyBooksController {
    #[must_use]
    pub fn new(api: BooksApi) -> Self {
        Self { api, state: MyBooksState::default() }
    }

    #[must_use]
    pub fn state(&self) -> &MyBooksState {
        &self.state
    }

    pub async fn load(&mut self, page: u32) {
        self.state.loading = true;
        self.state.error = None;
        let tab = self.state.tab;
        tracing::debug!(page, ?tab, "loading books");

        let outcome = match tab {
            BookTab::Requested => self.load_requests(page).await,
            BookTab::Owned => self.load_books(BookList::Owned, page).await,
            BookTab::Returned => self.load_books(BookList::Returned, page).await,
            BookTab::Borrowed => self.load_books(BookList::Borrowed, page).await,
        };
        if let Err(error) = outcome {
            tracing::warn!(%error, ?tab, page, "book list load failed");
            self.state.error = Some(LOAD_ERROR.to_owned());
        }
        self.state.loading = false;
    }

    async fn load_books(&mut self, list: BookList, page: u32) -> Result<(), ApiError> {
        let result = match list {
            BookList::Owned => self.api.owned(page, PAGE_SIZE).await?,
            BookList::Returned => self.api.returned(page, PAGE_SIZE).await?,
            BookList::Borrowed => self.api.borrowed(page, PAGE_SIZE).await?,
        };
        if let Some(result) = result {
            self.state.pagination.apply(page, &result);
            self.state.books = result.into_items();
            self.state.requests.clear();
        }
        Ok(())
    }

    async fn load_requests(&mut self, page: u32) -> Result<(), ApiError> {
        if let Some(result) = self.api.requested(page, PAGE_SIZE).await? {
            self.state.pagination.apply(page, &result);
            self.state.requests = result.into_items();
            self.state.books.clear();
        }
        Ok(())
    }

    /// Switch tabs and reload from the first page. No-op for the active tab.
    pub async fn switch_tab(&mut self, tab: BookTab) {
        if tab == self.state.tab {
            return;
        }
        self.state.tab = tab;
        self.load(0).await;
    }

    pub async fn next_page(&mut self) {
        if let Some(page) = self.state.pagination.next_page() {
            self.load(page).await;
        }
    }

    pub async fn previous_page(&mut self) {
        if let Some(page) = self.state.pagination.previous_page() {
            self.load(page).await;
        }
    }

    pub async fn approve_request(&mut self, id: i64) {
        let outcome = self.api.approve_request(id).await;
        self.settle(outcome, APPROVE_ERROR).await;
    }

    pub async fn reject_request(&mut self, id: i64) {
        let outcome = self.api.reject_request(id).await;
        self.settle(outcome, REJECT_ERROR).await;
    }

    pub async fn delete_book(&mut self, id: i64) {
        let outcome = self.api.delete(id).await;
        self.settle(outcome, DELETE_ERROR).await;
    }

    /// Create a book, or update `id` when given, then reload.
    pub async fn save_book(&mut self, id: Option<i64>, request: &BookRequest) {
        if !request.is_valid() {
            self.state.error = Some(INVALID_BOOK_ERROR.to_owned());
            return;
        }
        let (outcome, failure) = match id {
            Some(id) => (self.api.update(id, request).await, "Failed to edit book. Please try again."),
            None => (self.api.create(request).await, "Failed to add book. Please try again."),
        };
        self.settle(outcome, failure).await;
    }

    async fn settle(&mut self, outcome: Result<Option<()>, ApiError>, failure: &str) {
        match outcome {
            Ok(Some(())) => {
                self.state.error = None;
                self.load(self.state.pagination.page).await;
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%error, "book action failed");
                self.state.error = Some(failure.to_owned());
            }
        }
    }
}
