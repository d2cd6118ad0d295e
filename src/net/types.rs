//! Wire DTOs for the bookshelf REST API.
//!
//! DESIGN
//! ======
//! Field names follow the backend's camelCase JSON. Optional and
//! defaulted fields absorb the differences between list and detail
//! payloads so one type serves every endpoint returning that resource.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

pub const FEEDBACK_TITLE_MAX: usize = 255;
pub const FEEDBACK_DESCRIPTION_MAX: usize = 2000;

// =============================================================================
// PAGINATION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("page holds {len} items but its size is {size}")]
    Oversized { len: usize, size: u32 },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageWire<T> {
    content: Vec<T>,
    #[serde(default)]
    number: Option<u32>,
    #[serde(default)]
    size: Option<u32>,
    #[serde(default)]
    total_element: u64,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    first: Option<bool>,
    #[serde(default)]
    last: Option<bool>,
}

/// One page of a list endpoint.
///
/// When the backend reports its page index (`number`), `is_first`/`is_last`
/// are derived from it and the total page count and the wire flags are
/// ignored. Without an index the wire flags are used, and failing those the
/// index the caller asked for (see [`PagedResult::is_first_at`]).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "PageWire<T>", bound(deserialize = "T: Deserialize<'de>"))]
pub struct PagedResult<T> {
    items: Vec<T>,
    page_index: Option<u32>,
    page_size: Option<u32>,
    total_items: u64,
    total_pages: u32,
    first: Option<bool>,
    last: Option<bool>,
}

impl<T> TryFrom<PageWire<T>> for PagedResult<T> {
    type Error = PageError;

    fn try_from(wire: PageWire<T>) -> Result<Self, Self::Error> {
        if let Some(size) = wire.size {
            check_size(wire.content.len(), size)?;
        }
        Ok(Self {
            items: wire.content,
            page_index: wire.number,
            page_size: wire.size,
            total_items: wire.total_element,
            total_pages: wire.total_pages,
            first: wire.first,
            last: wire.last,
        })
    }
}

fn check_size(len: usize, size: u32) -> Result<(), PageError> {
    if len > size as usize {
        return Err(PageError::Oversized { len, size });
    }
    Ok(())
}

impl<T> PagedResult<T> {
    /// # Errors
    ///
    /// Returns an error if `items` exceeds `page_size`.
    pub fn new(
        items: Vec<T>,
        page_index: u32,
        page_size: u32,
        total_items: u64,
        total_pages: u32,
    ) -> Result<Self, PageError> {
        check_size(items.len(), page_size)?;
        Ok(Self {
            items,
            page_index: Some(page_index),
            page_size: Some(page_size),
            total_items,
            total_pages,
            first: None,
            last: None,
        })
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Page index reported by the backend, if any.
    #[must_use]
    pub fn page_index(&self) -> Option<u32> {
        self.page_index
    }

    #[must_use]
    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.is_first_at(0)
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.is_last_at(0)
    }

    /// First-page flag for a page loaded as `requested`.
    #[must_use]
    pub fn is_first_at(&self, requested: u32) -> bool {
        match (self.page_index, self.first) {
            (Some(index), _) => index == 0,
            (None, Some(first)) => first,
            (None, None) => requested == 0,
        }
    }

    /// Last-page flag for a page loaded as `requested`.
    #[must_use]
    pub fn is_last_at(&self, requested: u32) -> bool {
        match (self.page_index, self.last) {
            (Some(index), _) => index.saturating_add(1) >= self.total_pages,
            (None, Some(last)) => last,
            (None, None) => requested.saturating_add(1) >= self.total_pages,
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Backend `ExceptionResponse` envelope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub business_error_code: Option<i32>,
    pub business_error_description: Option<String>,
    pub error: Option<String>,
    pub validation_errors: Option<Vec<String>>,
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleAuthRequest {
    pub id_token: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: Option<String>,
    pub email: Option<String>,
    pub user_id: Option<String>,
    pub user: Option<AuthResponseUser>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseUser {
    pub email: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

// =============================================================================
// BOOKS
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author_name: String,
    pub isbn: String,
    pub synopsis: Option<String>,
    pub genre: Option<String>,
    pub owner: Option<String>,
    /// Base64-encoded cover image.
    pub cover: Option<String>,
    pub cover_url: Option<String>,
    pub rate: Option<f64>,
    pub favourite: bool,
    pub archived: bool,
    pub shareable: bool,
    pub read: bool,
    pub returned: bool,
    pub return_approved: bool,
}

/// A pending borrow request on one of the current user's books.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestedBook {
    pub id: i64,
    pub title: String,
    pub author_name: String,
    pub isbn: String,
    pub requester_name: String,
    pub rate: Option<f64>,
    pub requested: bool,
    pub request_approved: bool,
    pub cover: Option<String>,
    pub cover_url: Option<String>,
}

/// Create/update payload for a book.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub title: String,
    pub author_name: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub synopsis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub shareable: bool,
}

impl BookRequest {
    /// Title and author are the only fields the form requires.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && !self.author_name.trim().is_empty()
    }
}

impl From<&Book> for BookRequest {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author_name: book.author_name.clone(),
            isbn: book.isbn.clone(),
            synopsis: book.synopsis.clone(),
            genre: book.genre.clone(),
            cover_url: book.cover_url.clone(),
            shareable: book.shareable,
        }
    }
}

// =============================================================================
// FEEDBACK
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackStatus {
    #[default]
    New,
    InProgress,
    Resolved,
    Closed,
}

impl FeedbackStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FeedbackStatus::New => "New",
            FeedbackStatus::InProgress => "In Progress",
            FeedbackStatus::Resolved => "Resolved",
            FeedbackStatus::Closed => "Closed",
        }
    }

    /// Query-string form, matching the JSON representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackStatus::New => "NEW",
            FeedbackStatus::InProgress => "IN_PROGRESS",
            FeedbackStatus::Resolved => "RESOLVED",
            FeedbackStatus::Closed => "CLOSED",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    pub full_name: String,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedbackItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: FeedbackStatus,
    pub upvote_count: u32,
    pub upvoted_by_current_user: bool,
    pub own_feedback: bool,
    /// Server-rendered relative age, e.g. `"3 days ago"`.
    pub age: Option<String>,
    pub created_date: Option<String>,
    pub created_by: Option<i64>,
    pub comments: Vec<Comment>,
}

impl FeedbackItem {
    /// Flip the current user's upvote locally.
    pub fn toggle_upvote(&mut self) {
        if self.upvoted_by_current_user {
            self.upvote_count = self.upvote_count.saturating_sub(1);
        } else {
            self.upvote_count = self.upvote_count.saturating_add(1);
        }
        self.upvoted_by_current_user = !self.upvoted_by_current_user;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackValidationError {
    #[error("Please fill in all fields.")]
    Blank,
    #[error("Title must not exceed 255 characters.")]
    TitleTooLong,
    #[error("Description must not exceed 2000 characters.")]
    DescriptionTooLong,
}

impl FeedbackRequest {
    /// # Errors
    ///
    /// Returns the first rule the request breaks.
    pub fn validate(&self) -> Result<(), FeedbackValidationError> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err(FeedbackValidationError::Blank);
        }
        if self.title.chars().count() > FEEDBACK_TITLE_MAX {
            return Err(FeedbackValidationError::TitleTooLong);
        }
        if self.description.chars().count() > FEEDBACK_DESCRIPTION_MAX {
            return Err(FeedbackValidationError::DescriptionTooLong);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct CommentRequest<'a> {
    pub message: &'a str,
}

// =============================================================================
// PROFILE
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub full_name: Option<String>,
    pub email: String,
    pub date_of_birth: Option<String>,
    pub provider: Option<String>,
    pub account_locked: bool,
    pub enabled: bool,
}

impl UserProfile {
    /// Full name as sent by the server, else first and last name joined.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.full_name.as_deref().map(str::trim) {
            Some(full) if !full.is_empty() => full.to_owned(),
            _ => format!("{} {}", self.firstname, self.lastname).trim().to_owned(),
        }
    }
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ProfilePatch {
    /// Split a display name into first name and the remaining words.
    #[must_use]
    pub fn from_display_name(name: &str, email: &str) -> Self {
        let mut words = name.split_whitespace();
        let firstname = words.next().unwrap_or_default().to_owned();
        let lastname = words.collect::<Vec<_>>().join(" ");
        Self {
            firstname: Some(firstname),
            lastname: Some(lastname),
            email: Some(email.trim().to_owned()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookStats {
    pub books_owned: u64,
    pub books_read: u64,
    pub currently_borrowed: u64,
    pub returned_books: u64,
    pub pending_requests: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadingActivity {
    /// `YYYY-MM`.
    pub month: String,
    pub books_read: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenreDistribution {
    pub genre: String,
    pub count: u64,
    pub percentage: f64,
}

/// Reading statistics returned by `app-profile/me`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDashboard {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub full_name: Option<String>,
    pub email: String,
    pub join_date: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub provider: Option<String>,
    pub stats: BookStats,
    pub reading_activity: Vec<ReadingActivity>,
    pub genre_distribution: Vec<GenreDistribution>,
    pub reading_streak: u32,
}

// =============================================================================
// EXTERNAL SEARCH
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub(crate) struct VolumeList {
    #[serde(default)]
    pub items: Vec<ExternalBook>,
}

/// A Google Books volume.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalBook {
    pub id: String,
    pub volume_info: VolumeInfo,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeInfo {
    pub title: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub image_links: Option<ImageLinks>,
    pub published_date: Option<String>,
    pub publisher: Option<String>,
    pub page_count: Option<u32>,
    pub categories: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
    pub small_thumbnail: Option<String>,
}

impl ExternalBook {
    /// Prefill a book form from this volume.
    #[must_use]
    pub fn to_book_request(&self) -> BookRequest {
        let info = &self.volume_info;
        let author_name = if info.authors.is_empty() {
            "Unknown Author".to_owned()
        } else {
            info.authors.join(", ")
        };
        let cover_url = info
            .image_links
            .as_ref()
            .and_then(|links| links.thumbnail.as_deref().or(links.small_thumbnail.as_deref()))
            .map(|url| url.replacen("http://", "https://", 1));
        BookRequest {
            title: info.title.clone(),
            author_name,
            isbn: String::new(),
            synopsis: info.description.clone(),
            genre: info.categories.first().cloned(),
            cover_url,
            shareable: false,
        }
    }
}
