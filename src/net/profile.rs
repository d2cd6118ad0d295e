//! Profile and reading-statistics endpoints (`app-profile/*`).

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use reqwest::Method;

use super::client::ApiClient;
use super::error::ApiError;
use super::types::{ProfilePatch, UserDashboard, UserProfile};

#[derive(Clone, Debug)]
pub struct ProfileApi {
    client: ApiClient,
}

impl ProfileApi {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn profile(&self) -> Result<Option<UserProfile>, ApiError> {
        self.client.get_json("app-profile/profile").await
    }

    /// `PUT` the profile fields and return the stored profile.
    ///
    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<Option<UserProfile>, ApiError> {
        let builder = self.client.request(Method::PUT, "app-profile/profile")?.json(patch);
        self.client.send_json(builder).await
    }

    /// Stats, monthly reading activity, genre distribution and streak.
    ///
    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn dashboard(&self) -> Result<Option<UserDashboard>, ApiError> {
        self.client.get_json("app-profile/me").await
    }
}
