//! Book catalogue and lending endpoints (`books/*`).

#[cfg(test)]
#[path = "books_test.rs"]
mod books_test;

use reqwest::Method;

use super::client::ApiClient;
use super::error::ApiError;
use super::types::{Book, BookRequest, PagedResult, RequestedBook};

#[derive(Clone, Debug)]
pub struct BooksApi {
    client: ApiClient,
}

impl BooksApi {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn page<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
        size: u32,
    ) -> Result<Option<PagedResult<T>>, ApiError> {
        let builder = self
            .client
            .request(Method::GET, path)?
            .query(&[("page", page), ("size", size)]);
        self.client.send_json(builder).await
    }

    /// Books other users have marked shareable.
    ///
    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn shareable(&self, page: u32, size: u32) -> Result<Option<PagedResult<Book>>, ApiError> {
        self.page("books", page, size).await
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn owned(&self, page: u32, size: u32) -> Result<Option<PagedResult<Book>>, ApiError> {
        self.page("books/owner", page, size).await
    }

    /// Books lent out by the user that have come back.
    ///
    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn returned(&self, page: u32, size: u32) -> Result<Option<PagedResult<Book>>, ApiError> {
        self.page("books/returned", page, size).await
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn borrowed(&self, page: u32, size: u32) -> Result<Option<PagedResult<Book>>, ApiError> {
        self.page("books/borrowed", page, size).await
    }

    /// Pending borrow requests on the user's books.
    ///
    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn requested(&self, page: u32, size: u32) -> Result<Option<PagedResult<RequestedBook>>, ApiError> {
        self.page("books/requested", page, size).await
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn get(&self, id: i64) -> Result<Option<Book>, ApiError> {
        self.client.get_json(&format!("books/{id}")).await
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn create(&self, request: &BookRequest) -> Result<Option<()>, ApiError> {
        let builder = self.client.request(Method::POST, "books")?.json(request);
        self.client.send_empty(builder).await
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn update(&self, id: i64, request: &BookRequest) -> Result<Option<()>, ApiError> {
        let builder = self.client.request(Method::PUT, &format!("books/{id}"))?.json(request);
        self.client.send_empty(builder).await
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn delete(&self, id: i64) -> Result<Option<()>, ApiError> {
        self.unit(Method::DELETE, &format!("books/{id}")).await
    }

    /// Ask the owner to lend a shareable book.
    ///
    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn borrow(&self, id: i64) -> Result<Option<()>, ApiError> {
        self.unit(Method::POST, &format!("books/borrow/{id}")).await
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn approve_request(&self, id: i64) -> Result<Option<()>, ApiError> {
        self.unit(Method::POST, &format!("books/approve-request/{id}")).await
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn reject_request(&self, id: i64) -> Result<Option<()>, ApiError> {
        self.unit(Method::POST, &format!("books/reject-request/{id}")).await
    }

    /// Toggle whether other users can see and borrow the book.
    ///
    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn update_shareable(&self, id: i64) -> Result<Option<()>, ApiError> {
        self.unit(Method::PATCH, &format!("books/shareable/{id}")).await
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn update_archived(&self, id: i64) -> Result<Option<()>, ApiError> {
        self.unit(Method::PATCH, &format!("books/archive/{id}")).await
    }

    /// Borrower hands a book back.
    ///
    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn return_borrowed(&self, id: i64) -> Result<Option<()>, ApiError> {
        self.unit(Method::PATCH, &format!("books/borrow/return/{id}")).await
    }

    /// Owner confirms a returned book arrived.
    ///
    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn approve_return(&self, id: i64) -> Result<Option<()>, ApiError> {
        self.unit(Method::PATCH, &format!("books/borrow/return/approve/{id}")).await
    }

    async fn unit(&self, method: Method, path: &str) -> Result<Option<()>, ApiError> {
        let builder = self.client.request(method, path)?;
        self.client.send_empty(builder).await
    }
}
