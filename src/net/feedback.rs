//! Feedback board endpoints (`app-feedbacks/*`).

#[cfg(test)]
#[path = "feedback_test.rs"]
mod feedback_test;

use reqwest::Method;

use super::client::ApiClient;
use super::error::ApiError;
use super::types::{CommentRequest, FeedbackItem, FeedbackRequest, FeedbackStatus, PagedResult};

#[derive(Clone, Debug)]
pub struct FeedbackApi {
    client: ApiClient,
}

impl FeedbackApi {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn page(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<PagedResult<FeedbackItem>>, ApiError> {
        let builder = self.client.request(Method::GET, path)?.query(query);
        self.client.send_json(builder).await
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn all(&self, page: u32, size: u32) -> Result<Option<PagedResult<FeedbackItem>>, ApiError> {
        self.page("app-feedbacks", &[("page", page.to_string()), ("size", size.to_string())])
            .await
    }

    /// Feedback authored by the current user.
    ///
    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn mine(&self, page: u32, size: u32) -> Result<Option<PagedResult<FeedbackItem>>, ApiError> {
        self.page("app-feedbacks/me", &[("page", page.to_string()), ("size", size.to_string())])
            .await
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn by_status(
        &self,
        status: FeedbackStatus,
        page: u32,
        size: u32,
    ) -> Result<Option<PagedResult<FeedbackItem>>, ApiError> {
        self.page(
            "app-feedbacks/by-status",
            &[
                ("status", status.as_str().to_owned()),
                ("page", page.to_string()),
                ("size", size.to_string()),
            ],
        )
        .await
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn get(&self, id: i64) -> Result<Option<FeedbackItem>, ApiError> {
        self.client.get_json(&format!("app-feedbacks/{id}")).await
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn submit(&self, request: &FeedbackRequest) -> Result<Option<()>, ApiError> {
        let builder = self.client.request(Method::POST, "app-feedbacks")?.json(request);
        self.client.send_empty(builder).await
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn edit(&self, id: i64, request: &FeedbackRequest) -> Result<Option<()>, ApiError> {
        let builder = self
            .client
            .request(Method::PUT, &format!("app-feedbacks/{id}"))?
            .json(request);
        self.client.send_empty(builder).await
    }

    /// Toggle the current user's upvote.
    ///
    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn toggle_upvote(&self, id: i64) -> Result<Option<()>, ApiError> {
        let builder = self.client.request(Method::PATCH, &format!("app-feedbacks/{id}/upvote"))?;
        self.client.send_empty(builder).await
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn add_comment(&self, id: i64, message: &str) -> Result<Option<()>, ApiError> {
        let builder = self
            .client
            .request(Method::POST, &format!("app-feedbacks/{id}/comments"))?
            .json(&CommentRequest { message });
        self.client.send_empty(builder).await
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn delete(&self, id: i64) -> Result<Option<()>, ApiError> {
        let builder = self.client.request(Method::DELETE, &format!("app-feedbacks/{id}"))?;
        self.client.send_empty(builder).await
    }
}
