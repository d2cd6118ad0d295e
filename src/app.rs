//! Composition root for the client core.
//!
//! SYSTEM CONTEXT
//! ==============
//! Front ends (the CLI, tests) build one [`Bookshelf`] and ask it for
//! controllers. Everything shares a single storage handle, session store
//! and router, so an invalidation triggered by one controller is visible to
//! all the others.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::net::auth::AuthApi;
use crate::net::books::BooksApi;
use crate::net::client::ApiClient;
use crate::net::error::ApiError;
use crate::net::feedback::FeedbackApi;
use crate::net::profile::ProfileApi;
use crate::net::search::ExternalSearch;
use crate::routes::{Route, Router};
use crate::state::auth::AuthState;
use crate::state::dashboard::DashboardController;
use crate::state::feedback::FeedbackController;
use crate::state::login::{LoginController, RegisterController};
use crate::state::my_books::MyBooksController;
use crate::state::profile::ProfileController;
use crate::state::search::BookSearch;
use crate::storage::{FileStorage, SharedStorage};
use crate::util::auth::{RouteGuard, logout};

#[derive(Clone, Debug)]
pub struct Bookshelf {
    config: ClientConfig,
    storage: SharedStorage,
    auth: AuthState,
    router: Router,
    guard: RouteGuard,
    client: ApiClient,
}

impl Bookshelf {
    /// Wire the client around an existing storage backend, starting on
    /// the dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig, storage: SharedStorage) -> Result<Self, ApiError> {
        let auth = AuthState::new(Arc::clone(&storage));
        let router = Router::new(Route::Dashboard);
        let guard = RouteGuard::new(auth.clone(), router.clone());
        let client = ApiClient::new(&config, auth.clone(), Arc::clone(&storage), router.clone())?;
        Ok(Self { config, storage, auth, router, guard, client })
    }

    /// Wire the client around the file store at `config.storage_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the HTTP client
    /// cannot be built.
    pub fn open(config: ClientConfig) -> Result<Self, ApiError> {
        let storage: SharedStorage = Arc::new(FileStorage::open(config.storage_path.clone())?);
        Self::new(config, storage)
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn storage(&self) -> &SharedStorage {
        &self.storage
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
    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn auth_api(&self) -> AuthApi {
        AuthApi::new(self.client.clone())
    }

    #[must_use]
    pub fn books(&self) -> BooksApi {
        BooksApi::new(self.client.clone())
    }

    #[must_use]
    pub fn feedback(&self) -> FeedbackApi {
        FeedbackApi::new(self.client.clone())
    }

    #[must_use]
    pub fn profile(&self) -> ProfileApi {
        ProfileApi::new(self.client.clone())
    }

    /// # Errors
    ///
    /// Returns an error if the configured search URL does not parse.
    pub fn external_search(&self) -> Result<ExternalSearch, ApiError> {
        ExternalSearch::new(self.client.clone(), &self.config.book_search_url)
    }

    #[must_use]
    pub fn my_books(&self) -> MyBooksController {
        MyBooksController::new(self.books())
    }

    #[must_use]
    pub fn feedback_board(&self) -> FeedbackController {
        FeedbackController::new(self.feedback())
    }

    #[must_use]
    pub fn dashboard(&self) -> DashboardController {
        DashboardController::new(self.books(), self.profile(), self.auth.clone())
    }

    #[must_use]
    pub fn profile_view(&self) -> ProfileController {
        ProfileController::new(self.profile(), self.router.clone())
    }

    #[must_use]
    pub fn login(&self) -> LoginController {
        LoginController::new(self.auth_api(), self.router.clone())
    }

    #[must_use]
    pub fn register(&self) -> RegisterController {
        RegisterController::new(self.auth_api(), self.router.clone())
    }

    /// Start a debounced external search. Must be called inside a tokio
    /// runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured search URL does not parse.
    pub fn book_search(&self) -> Result<BookSearch, ApiError> {
        let source = Arc::new(self.external_search()?);
        Ok(BookSearch::spawn(source, self.config.search_debounce))
    }

    pub fn logout(&self) {
        logout(&self.auth, &self.router);
    }
}
