//! Landing view: shareable books plus the user's reading stats.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use crate::net::books::BooksApi;
use crate::net::error::ApiError;
use crate::net::profile::ProfileApi;
use crate::net::types::{Book, UserDashboard};
use crate::state::auth::AuthState;

pub const RECOMMENDED_PAGE_SIZE: u32 = 50;

pub const UNAVAILABLE_MESSAGE: &str = "Service is temporarily unavailable. Please try again later.";
pub const LOAD_ERROR: &str = "Failed to load books. Please try again.";
pub const REQUEST_SUCCESS: &str = "Book requested successfully!";
pub const REQUEST_ERROR: &str = "Failed to request book. Please try again.";

#[derive(Clone, Debug, Default)]
pub struct DashboardState {
    pub recommended: Vec<Book>,
    pub total_books: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub is_logged_in: bool,
    pub user_dashboard: Option<UserDashboard>,
    /// Outcome of the last borrow request.
    pub status_message: Option<String>,
}

#[derive(Debug)]
pub struct DashboardController {
    books: BooksApi,
    profile: ProfileApi,
    auth: AuthState,
    state: DashboardState,
}

impl DashboardController {
    #[must_use]
    pub fn new(books: BooksApi, profile: ProfileApi, auth: AuthState) -> Self {
        Self { books, profile, auth, state: DashboardState::default() }
    }

    #[must_use]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Load recommendations and, with a session, the stats panel.
    pub async fn load(&mut self) {
        self.load_recommended().await;
        self.state.is_logged_in = self.auth.is_logged_in();
        if self.state.is_logged_in {
            match self.profile.dashboard().await {
                Ok(Some(dashboard)) => self.state.user_dashboard = Some(dashboard),
                Ok(None) => {}
                Err(error) => tracing::warn!(%error, "user dashboard load failed"),
            }
        }
    }

    async fn load_recommended(&mut self) {
        self.state.loading = true;
        self.state.error = None;
        match self.books.shareable(0, RECOMMENDED_PAGE_SIZE).await {
            Ok(Some(page)) => {
                self.state.total_books = page.total_items();
                self.state.recommended = page.into_items();
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%error, "recommended books load failed");
                self.state.error = Some(failure_message(&error, LOAD_ERROR));
            }
        }
        self.state.loading = false;
    }

    /// Ask to borrow a shareable book.
    pub async fn request_book(&mut self, id: i64) {
        match self.books.borrow(id).await {
            Ok(Some(())) => self.state.status_message = Some(REQUEST_SUCCESS.to_owned()),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%error, id, "borrow request failed");
                self.state.status_message = Some(failure_message(&error, REQUEST_ERROR));
            }
        }
    }

    /// Highest of owned/read/borrowed, floored at 1, for scaling stat bars.
    #[must_use]
    pub fn max_stat_value(&self) -> u64 {
        self.state.user_dashboard.as_ref().map_or(1, |dash| {
            let stats = &dash.stats;
            stats.books_owned.max(stats.books_read).max(stats.currently_borrowed).max(1)
        })
    }

    /// Width of a stat bar as a rounded percentage of the largest stat.
    #[must_use]
    pub fn bar_width(&self, value: u64) -> u64 {
        let max = self.max_stat_value();
        (value.saturating_mul(100) + max / 2) / max
    }
}

fn failure_message(error: &ApiError, fallback: &str) -> String {
    if error.is_unreachable() { UNAVAILABLE_MESSAGE } else { fallback }.to_owned()
}
