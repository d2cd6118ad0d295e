//! Sign-in and registration forms.
//!
//! Both land on the dashboard when the backend accepts them. Failures
//! become one of a few fixed messages; raw errors are only logged.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use crate::net::auth::AuthApi;
use crate::net::error::ApiError;
use crate::net::types::RegisterRequest;
use crate::routes::{Route, Router, UNAVAILABLE_REASON};

pub const MIN_PASSWORD_LEN: usize = 8;

pub const UNAVAILABLE_MESSAGE: &str = "The service is temporarily unavailable. Please try again later.";
pub const UNREACHABLE_MESSAGE: &str = "Unable to reach the server. Please check your connection or try again later.";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";
pub const SIGN_IN_FAILED: &str = "Sign in failed. Please try again.";
pub const MISSING_CREDENTIALS: &str = "Please enter your email and password.";
pub const GOOGLE_FAILED: &str = "Google sign-in failed. Please try again.";
pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";

/// Message for a failed email/password sign-in.
#[must_use]
pub fn sign_in_message(error: &ApiError) -> &'static str {
    match error.status() {
        Some(0) => UNREACHABLE_MESSAGE,
        Some(401 | 403) => INVALID_CREDENTIALS,
        _ => SIGN_IN_FAILED,
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoginState {
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct LoginController {
    api: AuthApi,
    router: Router,
    state: LoginState,
}

impl LoginController {
    /// A login view reached with `reason=unavailable` opens with the
    /// outage message.
    #[must_use]
    pub fn new(api: AuthApi, router: Router) -> Self {
        let location = router.current();
        let error = (location.route == Route::Login && location.reason.as_deref() == Some(UNAVAILABLE_REASON))
            .then(|| UNAVAILABLE_MESSAGE.to_owned());
        Self { api, router, state: LoginState { loading: false, error } }
    }

    #[must_use]
    pub fn state(&self) -> &LoginState {
        &self.state
    }

    /// Returns `true` once signed in and on the dashboard.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> bool {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            self.state.error = Some(MISSING_CREDENTIALS.to_owned());
            return false;
        }
        self.state.loading = true;
        self.state.error = None;
        let outcome = self.api.authenticate(email, password).await;
        self.state.loading = false;

        match outcome {
            Ok(Some(_)) => {
                self.router.navigate(Route::Dashboard);
                true
            }
            // The interceptor swallowed an auth rejection.
            Ok(None) => {
                self.state.error = Some(INVALID_CREDENTIALS.to_owned());
                false
            }
            Err(error) => {
                tracing::warn!(%error, "sign in failed");
                self.state.error = Some(sign_in_message(&error).to_owned());
                false
            }
        }
    }

    /// Exchange an identity-widget credential. Returns `true` on success.
    pub async fn sign_in_with_google(&mut self, credential: &str) -> bool {
        if credential.is_empty() {
            tracing::warn!("empty identity credential");
            return false;
        }
        self.state.loading = true;
        let outcome = self.api.google(credential).await;
        self.state.loading = false;

        match outcome {
            Ok(Some(_)) => {
                self.router.navigate(Route::Dashboard);
                true
            }
            Ok(None) => false,
            Err(error) => {
                tracing::warn!(%error, "identity credential exchange failed");
                self.state.error = Some(GOOGLE_FAILED.to_owned());
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegisterValidationError {
    #[error("{0} is required.")]
    Missing(&'static str),
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Password must be at least 8 characters.")]
    ShortPassword,
}

/// # Errors
///
/// Returns the first rule the form breaks.
pub fn validate_registration(request: &RegisterRequest) -> Result<(), RegisterValidationError> {
    for (label, value) in [
        ("First name", &request.firstname),
        ("Last name", &request.lastname),
        ("Email", &request.email),
        ("Password", &request.password),
    ] {
        if value.trim().is_empty() {
            return Err(RegisterValidationError::Missing(label));
        }
    }
    if !looks_like_email(request.email.trim()) {
        return Err(RegisterValidationError::InvalidEmail);
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(RegisterValidationError::ShortPassword);
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[derive(Debug)]
pub struct RegisterController {
    api: AuthApi,
    router: Router,
    state: LoginState,
}

impl RegisterController {
    #[must_use]
    pub fn new(api: AuthApi, router: Router) -> Self {
        Self { api, router, state: LoginState::default() }
    }

    #[must_use]
    pub fn state(&self) -> &LoginState {
        &self.state
    }

    /// Validate and post the form. Returns `true` once registered and on
    /// the dashboard.
    pub async fn register(&mut self, request: &RegisterRequest) -> bool {
        if let Err(invalid) = validate_registration(request) {
            self.state.error = Some(invalid.to_string());
            return false;
        }
        let request = RegisterRequest {
            email: request.email.trim().to_owned(),
            ..request.clone()
        };
        self.state.loading = true;
        self.state.error = None;
        let outcome = self.api.register(&request).await;
        self.state.loading = false;

        match outcome {
            Ok(Some(())) => {
                tracing::info!(email = %request.email, "registered");
                self.router.navigate(Route::Dashboard);
                true
            }
            Ok(None) => false,
            Err(error) => {
                tracing::warn!(%error, "registration failed");
                let detail = error
                    .body()
                    .and_then(|body| body.validation_errors.as_ref())
                    .filter(|errors| !errors.is_empty())
                    .map(|errors| errors.join(" "));
                self.state.error = Some(detail.unwrap_or_else(|| REGISTER_FAILED.to_owned()));
                false
            }
        }
    }
}
