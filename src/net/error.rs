//! Error taxonomy for API calls.
//!
//! DESIGN
//! ======
//! Three classes matter to callers: the backend was unreachable
//! (`Network`, status 0), the backend answered with an error status
//! (`Status`), or something local went wrong before or after the exchange.
//! Authentication failures never reach callers; the interceptor turns them
//! into a suppressed completion.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use super::types::ErrorBody;
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("service unreachable: {0}")]
    Network(#[source] reqwest::Error),
    #[error("failed to build request: {0}")]
    Request(#[source] reqwest::Error),
    #[error("request failed with status {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: Option<ErrorBody>,
    },
    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("authentication response carried no token")]
    MissingToken,
    #[error("response body was empty")]
    EmptyBody,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Classify a transport-level failure from reqwest.
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_builder() {
            ApiError::Request(error)
        } else {
            ApiError::Network(error)
        }
    }

    /// Build a status error from a response body, keeping the backend
    /// envelope when it parses.
    pub(crate) fn from_status(status: u16, raw_body: &str) -> Self {
        let body = serde_json::from_str::<ErrorBody>(raw_body).ok();
        let message = body
            .as_ref()
            .and_then(|b| {
                b.business_error_description
                    .clone()
                    .or_else(|| b.error.clone())
                    .or_else(|| b.validation_errors.as_ref().map(|errs| errs.join(", ")))
            })
            .unwrap_or_else(|| {
                let trimmed = raw_body.trim();
                if trimmed.is_empty() { format!("HTTP {status}") } else { trimmed.to_owned() }
            });
        ApiError::Status { status, message, body }
    }

    /// Numeric HTTP status; `0` when no response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Network(_) => Some(0),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// No response was received from the backend.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// Backend error envelope, when the failing response carried one.
    #[must_use]
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            ApiError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}
