//! Authenticated HTTP client for the bookshelf REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every per-resource client (`BooksApi`, `FeedbackApi`, ...) sends through
//! [`ApiClient::execute`], so credential injection and session invalidation
//! live in exactly one place. Controllers never handle 401/403 themselves.
//!
//! DESIGN
//! ======
//! Requests aimed at the configured API base get `Authorization: Bearer`
//! when a token is known; anything else passes through untouched. On the
//! way back, authentication failures (401, 403, or the backend's expired
//! token payload) invalidate the session, navigate to the login view and
//! complete as [`Intercepted::Suppressed`] instead of an error. A transport
//! failure while the user sits on a session-only view is treated the same
//! way, with `reason=unavailable` attached to the navigation.
//!
//! TRADE-OFFS
//! ==========
//! Suppression means callers cannot tell "redirected to login" from "did
//! nothing"; helpers surface it as `Ok(None)` and controllers simply skip
//! their success path.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::config::ClientConfig;
use crate::routes::{Route, Router, UNAVAILABLE_REASON};
use crate::state::auth::AuthState;
use crate::storage::{AUTH_TOKEN_KEY, SharedStorage};

/// `error` field the backend sends when a bearer token has expired.
pub const EXPIRED_TOKEN_ERROR: &str = "JWT token is expired";

/// Outcome of a request that passed through the interceptor.
#[derive(Debug)]
pub enum Intercepted {
    Response(Response),
    /// The session was invalidated and the error swallowed.
    Suppressed,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    auth: AuthState,
    storage: SharedStorage,
    router: Router,
}

impl ApiClient {
    /// Build a client with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the API URL
    /// does not parse.
    pub fn new(
        config: &ClientConfig,
        auth: AuthState,
        storage: SharedStorage,
        router: Router,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(ApiError::Request)?;
        Self::with_http(http, &config.api_url, auth, storage, router)
    }

    /// Build a client around an existing `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_url` does not parse.
    pub fn with_http(
        http: reqwest::Client,
        api_url: &str,
        auth: AuthState,
        storage: SharedStorage,
        router: Router,
    ) -> Result<Self, ApiError> {
        let base = Url::parse(api_url.trim_end_matches('/'))
            .map_err(|_| ApiError::InvalidUrl(api_url.to_owned()))?;
        Ok(Self { http, base, auth, storage, router })
    }

    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    #[must_use]
    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for a path relative to the API base.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL does not parse.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|_| ApiError::InvalidUrl(joined))
    }

    /// Start a request against the API base.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL does not parse.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.http.request(method, self.endpoint(path)?))
    }

    /// Whether `url` points at the configured API (same origin, under the
    /// base path).
    #[must_use]
    pub fn is_own_api(&self, url: &Url) -> bool {
        if url.scheme() != self.base.scheme()
            || url.host_str() != self.base.host_str()
            || url.port_or_known_default() != self.base.port_or_known_default()
        {
            return false;
        }
        let prefix = self.base.path().trim_end_matches('/');
        let path = url.path();
        prefix.is_empty()
            || path == prefix
            || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
    }

    fn resolve_token(&self) -> Option<String> {
        self.storage
            .get(AUTH_TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .or_else(|| self.auth.token())
    }

    /// Send a request through the interceptor.
    ///
    /// # Errors
    ///
    /// Returns transport failures (outside session-only views) and non-auth
    /// error statuses from the API. Third-party responses are returned as-is.
    pub async fn execute(&self, builder: RequestBuilder) -> Result<Intercepted, ApiError> {
        let mut request = builder.build().map_err(ApiError::Request)?;

        if !self.is_own_api(request.url()) {
            let response = self.http.execute(request).await.map_err(ApiError::from_transport)?;
            return Ok(Intercepted::Response(response));
        }

        if let Some(token) = self.resolve_token() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))?;
            request.headers_mut().insert(AUTHORIZATION, value);
            tracing::debug!(url = %request.url(), "attached bearer token");
        } else {
            tracing::debug!(url = %request.url(), "no token available");
        }

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(error) => {
                let error = ApiError::from_transport(error);
                if error.is_unreachable() && self.router.current_route().requires_session() {
                    self.invalidate(0, Some(UNAVAILABLE_REASON));
                    return Ok(Intercepted::Suppressed);
                }
                return Err(error);
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(Intercepted::Response(response));
        }

        let code = status.as_u16();
        let raw = response.text().await.unwrap_or_default();
        let error = ApiError::from_status(code, &raw);
        let expired = error
            .body()
            .and_then(|body| body.error.as_deref())
            .is_some_and(|msg| msg == EXPIRED_TOKEN_ERROR);
        if code == 401 || code == 403 || expired {
            self.invalidate(code, None);
            return Ok(Intercepted::Suppressed);
        }
        Err(error)
    }

    /// Forced logout: one navigation to login, then session and storage
    /// are wiped. Navigating first keeps the route guard from issuing a
    /// second redirect when it observes the cleared session.
    fn invalidate(&self, status: u16, reason: Option<&str>) {
        tracing::warn!(status, reason = reason.unwrap_or("auth"), "invalidating session");
        match reason {
            Some(reason) => self.router.navigate_with_reason(Route::Login, reason),
            None => self.router.navigate(Route::Login),
        }
        if let Err(error) = self.auth.clear_user() {
            tracing::warn!(%error, "failed to clear session keys");
        }
        if let Err(error) = self.storage.clear() {
            tracing::warn!(%error, "failed to clear storage");
        }
    }

    /// `GET` a JSON resource relative to the API base.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send_json`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        self.send_json(self.request(Method::GET, path)?).await
    }

    /// Send and decode a JSON body. `Ok(None)` means the interceptor
    /// suppressed the exchange.
    ///
    /// # Errors
    ///
    /// Returns interceptor errors, third-party error statuses, empty bodies
    /// and decode failures.
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Option<T>, ApiError> {
        let Some(response) = self.send_checked(builder).await? else {
            return Ok(None);
        };
        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ApiError::EmptyBody);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Send a request whose response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns interceptor errors and third-party error statuses.
    pub async fn send_empty(&self, builder: RequestBuilder) -> Result<Option<()>, ApiError> {
        Ok(self.send_checked(builder).await?.map(|_| ()))
    }

    async fn send_checked(&self, builder: RequestBuilder) -> Result<Option<Response>, ApiError> {
        match self.execute(builder).await? {
            Intercepted::Suppressed => Ok(None),
            Intercepted::Response(response) if response.status().is_success() => Ok(Some(response)),
            Intercepted::Response(response) => {
                let code = response.status().as_u16();
                let raw = response.text().await.unwrap_or_default();
                Err(ApiError::from_status(code, &raw))
            }
        }
    }
}
