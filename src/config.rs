//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8088/api/v1";
pub const DEFAULT_BOOK_SEARCH_URL: &str = "https://www.googleapis.com/books/v1/volumes";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {value}")]
    InvalidUrl { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Versioned API base, e.g. `https://host/api/v1`, without trailing `/`.
    pub api_url: String,
    /// Client identifier handed to the third-party sign-in widget.
    pub google_client_id: Option<String>,
    pub book_search_url: String,
    pub storage_path: PathBuf,
    pub timeouts: ClientTimeouts,
    pub search_debounce: Duration,
}

impl ClientConfig {
    /// Build typed client config from the process environment.
    ///
    /// Optional:
    /// - `BOOKSHELF_API_URL`: default `http://localhost:8088/api/v1`
    /// - `BOOKSHELF_GOOGLE_CLIENT_ID`
    /// - `BOOKSHELF_BOOK_SEARCH_URL`: default Google Books volumes endpoint
    /// - `BOOKSHELF_STORAGE_PATH`: default `<config dir>/bookshelf/storage.json`
    /// - `BOOKSHELF_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BOOKSHELF_CONNECT_TIMEOUT_SECS`: default 10
    /// - `BOOKSHELF_SEARCH_DEBOUNCE_MS`: default 500
    ///
    /// # Errors
    ///
    /// Returns an error if a URL variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if a URL variable does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = parse_url(
            "BOOKSHELF_API_URL",
            lookup("BOOKSHELF_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
        )?;
        let book_search_url = parse_url(
            "BOOKSHELF_BOOK_SEARCH_URL",
            lookup("BOOKSHELF_BOOK_SEARCH_URL").unwrap_or_else(|| DEFAULT_BOOK_SEARCH_URL.to_owned()),
        )?;
        let google_client_id = lookup("BOOKSHELF_GOOGLE_CLIENT_ID")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        let storage_path = lookup("BOOKSHELF_STORAGE_PATH")
            .map_or_else(default_storage_path, PathBuf::from);
        let timeouts = ClientTimeouts {
            request_secs: parse_u64(&lookup, "BOOKSHELF_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(&lookup, "BOOKSHELF_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let search_debounce =
            Duration::from_millis(parse_u64(&lookup, "BOOKSHELF_SEARCH_DEBOUNCE_MS", DEFAULT_SEARCH_DEBOUNCE_MS));

        Ok(Self { api_url, google_client_id, book_search_url, storage_path, timeouts, search_debounce })
    }

    /// Config pointing at `api_url` with every other field defaulted.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_url` does not parse.
    pub fn with_api_url(api_url: &str) -> Result<Self, ConfigError> {
        let api_url = api_url.to_owned();
        Self::from_lookup(move |key| (key == "BOOKSHELF_API_URL").then(|| api_url.clone()))
    }
}

fn parse_url(var: &'static str, raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/').to_owned();
    match reqwest::Url::parse(&trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(trimmed),
        _ => Err(ConfigError::InvalidUrl { var, value: raw }),
    }
}

fn parse_u64<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn default_storage_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bookshelf")
        .join("storage.json")
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
