//! Sign-in and registration endpoints (`auth/*`).
//!
//! Successful sign-ins write the resulting [`Session`] into [`AuthState`];
//! callers only decide where to navigate next.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use reqwest::Method;

use super::client::ApiClient;
use super::error::ApiError;
use super::types::{AuthRequest, AuthResponse, GoogleAuthRequest, RegisterRequest};
use crate::state::auth::Session;

#[derive(Clone, Debug)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Email/password sign-in. The session email is the one the user typed.
    ///
    /// # Errors
    ///
    /// Returns API errors, [`ApiError::MissingToken`] when the response has
    /// no token, and storage failures while persisting the session.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<Session>, ApiError> {
        let request = AuthRequest { email: email.to_owned(), password: password.to_owned() };
        let builder = self.client.request(Method::POST, "auth/authenticate")?.json(&request);
        let Some(response) = self.client.send_json::<AuthResponse>(builder).await? else {
            return Ok(None);
        };
        let session = Session { email: request.email, token: non_empty_token(response.token)? };
        self.client.auth().set_user(session.clone())?;
        Ok(Some(session))
    }

    /// Exchange an identity-widget credential for a session.
    ///
    /// # Errors
    ///
    /// Same as [`AuthApi::authenticate`].
    pub async fn google(&self, credential: &str) -> Result<Option<Session>, ApiError> {
        let body = GoogleAuthRequest { id_token: credential.to_owned() };
        let builder = self.client.request(Method::POST, "auth/google")?.json(&body);
        let Some(response) = self.client.send_json::<AuthResponse>(builder).await? else {
            return Ok(None);
        };
        let token = non_empty_token(response.token)?;
        let email = response
            .user
            .and_then(|user| user.email)
            .or(response.email)
            .unwrap_or_default();
        let session = Session { email, token };
        self.client.auth().set_user(session.clone())?;
        self.client.auth().set_google_token(credential)?;
        Ok(Some(session))
    }

    /// # Errors
    ///
    /// Returns API errors surfaced by the interceptor.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<()>, ApiError> {
        let builder = self.client.request(Method::POST, "auth/register")?.json(request);
        self.client.send_empty(builder).await
    }
}

fn non_empty_token(token: Option<String>) -> Result<String, ApiError> {
    token.filter(|t| !t.is_empty()).ok_or(ApiError::MissingToken)
}
