//! Google Books volume lookup used to prefill the add-book form.

#[cfg(test)]
#[path = "search_test.rs"]
mod search_test;

use async_trait::async_trait;
use reqwest::Url;

use super::client::ApiClient;
use super::error::ApiError;
use super::types::{ExternalBook, VolumeList};

pub const MAX_RESULTS: u32 = 10;

/// Source of volume matches for a free-text query.
#[async_trait]
pub trait VolumeSource: Send + Sync + 'static {
    async fn search(&self, query: &str) -> Result<Vec<ExternalBook>, ApiError>;
}

/// Queries the external volumes API through [`ApiClient`]. The host is not
/// the bookshelf API, so no token is attached and errors are not intercepted.
#[derive(Clone, Debug)]
pub struct ExternalSearch {
    client: ApiClient,
    url: Url,
}

impl ExternalSearch {
    /// # Errors
    ///
    /// Returns an error if `search_url` does not parse.
    pub fn new(client: ApiClient, search_url: &str) -> Result<Self, ApiError> {
        let url = Url::parse(search_url).map_err(|_| ApiError::InvalidUrl(search_url.to_owned()))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl VolumeSource for ExternalSearch {
    async fn search(&self, query: &str) -> Result<Vec<ExternalBook>, ApiError> {
        let max_results = MAX_RESULTS.to_string();
        let builder = self
            .client
            .http()
            .get(self.url.clone())
            .query(&[("q", query), ("maxResults", max_results.as_str())]);
        let list: Option<VolumeList> = self.client.send_json(builder).await?;
        Ok(list.map(|list| list.items).unwrap_or_default())
    }
}
