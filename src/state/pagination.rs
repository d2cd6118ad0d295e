//! Page cursor shared by the paginated list controllers.

#[cfg(test)]
#[path = "pagination_test.rs"]
mod pagination_test;

use crate::net::types::PagedResult;

/// Position and totals of the page a controller is showing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    /// Fixed per controller.
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub is_first: bool,
    pub is_last: bool,
}

impl Pagination {
    #[must_use]
    pub fn new(size: u32) -> Self {
        Self { page: 0, size, total_items: 0, total_pages: 0, is_first: true, is_last: true }
    }

    /// Adopt the cursor of a freshly loaded page. `requested` is the index
    /// that was asked for; it stands in when the payload omits `number`.
    pub fn apply<T>(&mut self, requested: u32, result: &PagedResult<T>) {
        self.page = result.page_index().unwrap_or(requested);
        self.total_items = result.total_items();
        self.total_pages = result.total_pages();
        self.is_first = result.is_first_at(requested);
        self.is_last = result.is_last_at(requested);
    }

    /// Page to load for "next", or `None` on the last page.
    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        (!self.is_last).then(|| self.page.saturating_add(1))
    }

    /// Page to load for "previous", or `None` on the first page.
    #[must_use]
    pub fn previous_page(&self) -> Option<u32> {
        (!self.is_first).then(|| self.page.saturating_sub(1))
    }
}
