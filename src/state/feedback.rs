//! Feedback board: list, local sort, authoring, upvotes and comments.
//!
//! DESIGN
//! ======
//! Upvotes are optimistic: the item flips before the request and flips
//! back only if the request fails. Everything else waits for the server
//! and reloads. Sorting is local to the loaded page; the server order is
//! kept in `items` and `sorted()` derives the display order.

#[cfg(test)]
#[path = "feedback_test.rs"]
mod feedback_test;

use crate::net::error::ApiError;
use crate::net::feedback::FeedbackApi;
use crate::net::types::{FeedbackItem, FeedbackRequest};
use crate::state::pagination::Pagination;

pub const PAGE_SIZE: u32 = 20;

pub const LOAD_ERROR: &str = "Failed to load feedback. Please try again.";
pub const SUBMIT_ERROR: &str = "Failed to submit feedback. Please try again.";
pub const EDIT_ERROR: &str = "Failed to save changes. Please try again.";
pub const DELETE_ERROR: &str = "Failed to delete feedback. Please try again.";
pub const COMMENT_ERROR: &str = "Failed to add comment. Please try again.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeedbackTab {
    #[default]
    All,
    Mine,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeedbackSort {
    /// Server order.
    #[default]
    Newest,
    MostUpvoted,
    MostComments,
}

#[derive(Clone, Debug)]
pub struct FeedbackState {
    pub tab: FeedbackTab,
    pub sort: FeedbackSort,
    pub pagination: Pagination,
    pub items: Vec<FeedbackItem>,
    pub loading: bool,
    /// List load failure.
    pub error: Option<String>,
    /// Failure of the last submit/edit/delete/comment.
    pub action_error: Option<String>,
}

impl Default for FeedbackState {
    fn default() -> Self {
        Self {
            tab: FeedbackTab::default(),
            sort: FeedbackSort::default(),
            pagination: Pagination::new(PAGE_SIZE),
            items: Vec::new(),
            loading: false,
            error: None,
            action_error: None,
        }
    }
}

impl FeedbackState {
    /// Loaded items in display order.
    #[must_use]
    pub fn sorted(&self) -> Vec<&FeedbackItem> {
        let mut view: Vec<&FeedbackItem> = self.items.iter().collect();
        match self.sort {
            FeedbackSort::Newest => {}
            FeedbackSort::MostUpvoted => view.sort_by(|a, b| b.upvote_count.cmp(&a.upvote_count)),
            FeedbackSort::MostComments => view.sort_by(|a, b| b.comments.len().cmp(&a.comments.len())),
        }
        view
    }

    fn item_mut(&mut self, id: i64) -> Option<&mut FeedbackItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }
}

#[derive(Debug)]
pub struct FeedbackController {
    api: FeedbackApi,
    state: FeedbackState,
}

impl FeedbackController {
    #[must_use]
    pub fn new(api: FeedbackApi) -> Self {
        Self { api, state: FeedbackState::default() }
    }

    #[must_use]
    pub fn state(&self) -> &FeedbackState {
        &self.state
    }

    pub async fn load(&mut self, page: u32) {
        self.state.loading = true;
        self.state.error = None;
        let tab = self.state.tab;
        tracing::debug!(page, ?tab, "loading feedback");

        let outcome = match tab {
            FeedbackTab::All => self.api.all(page, PAGE_SIZE).await,
            FeedbackTab::Mine => self.api.mine(page, PAGE_SIZE).await,
        };
        match outcome {
            Ok(Some(result)) => {
                self.state.pagination.apply(page, &result);
                self.state.items = result.into_items();
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%error, ?tab, page, "feedback load failed");
                self.state.error = Some(LOAD_ERROR.to_owned());
            }
        }
        self.state.loading = false;
    }

    pub async fn switch_tab(&mut self, tab: FeedbackTab) {
        if tab == self.state.tab {
            return;
        }
        self.state.tab = tab;
        self.load(0).await;
    }

    pub fn set_sort(&mut self, sort: FeedbackSort) {
        self.state.sort = sort;
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

    /// Post new feedback and return to the first page.
    pub async fn submit(&mut self, request: &FeedbackRequest) {
        if let Err(invalid) = request.validate() {
            self.state.action_error = Some(invalid.to_string());
            return;
        }
        self.state.action_error = None;
        let outcome = self.api.submit(request).await;
        self.settle(outcome, SUBMIT_ERROR, 0).await;
    }

    pub async fn edit(&mut self, id: i64, request: &FeedbackRequest) {
        if let Err(invalid) = request.validate() {
            self.state.action_error = Some(invalid.to_string());
            return;
        }
        self.state.action_error = None;
        let outcome = self.api.edit(id, request).await;
        let page = self.state.pagination.page;
        self.settle(outcome, EDIT_ERROR, page).await;
    }

    pub async fn delete(&mut self, id: i64) {
        let outcome = self.api.delete(id).await;
        let page = self.state.pagination.page;
        self.settle(outcome, DELETE_ERROR, page).await;
    }

    /// Append a comment. Blank messages are ignored.
    pub async fn comment(&mut self, id: i64, message: &str) {
        if message.trim().is_empty() {
            return;
        }
        let outcome = self.api.add_comment(id, message).await;
        let page = self.state.pagination.page;
        self.settle(outcome, COMMENT_ERROR, page).await;
    }

    /// Flip the upvote locally, then confirm with the server. Reverts only
    /// when the request fails; a suppressed request leaves the flip.
    pub async fn toggle_upvote(&mut self, id: i64) {
        let Some(item) = self.state.item_mut(id) else {
            tracing::debug!(id, "upvote for feedback not on this page");
            return;
        };
        item.toggle_upvote();

        if let Err(error) = self.api.toggle_upvote(id).await {
            tracing::warn!(%error, id, "upvote failed, reverting");
            if let Some(item) = self.state.item_mut(id) {
                item.toggle_upvote();
            }
        }
    }

    async fn settle(&mut self, outcome: Result<Option<()>, ApiError>, failure: &str, reload_page: u32) {
        match outcome {
            Ok(Some(())) => self.load(reload_page).await,
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%error, "feedback action failed");
                self.state.action_error = Some(failure.to_owned());
            }
        }
    }
}
