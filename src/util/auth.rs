//! Session gating for navigation.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views that need a session must apply identical unauthenticated redirect
//! behavior, both when entered and when the session disappears while the
//! user is sitting on them.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use tokio::task::JoinHandle;

use crate::routes::{Route, Router};
use crate::state::auth::AuthState;

#[derive(Clone, Debug)]
pub struct RouteGuard {
    auth: AuthState,
    router: Router,
}

impl RouteGuard {
    #[must_use]
    pub fn new(auth: AuthState, router: Router) -> Self {
        Self { auth, router }
    }

    /// Allow when a session exists; otherwise redirect to login and deny.
    #[must_use]
    pub fn can_activate(&self) -> bool {
        if self.auth.is_logged_in() {
            return true;
        }
        tracing::debug!("no session; redirecting to login");
        self.router.navigate(Route::Login);
        false
    }

    /// Navigate to `route`, consulting [`RouteGuard::can_activate`] for
    /// session-only routes. Returns whether the navigation happened.
    pub fn enter(&self, route: Route) -> bool {
        if route.requires_session() && !self.can_activate() {
            return false;
        }
        self.router.navigate(route);
        true
    }

    /// Keep watching the session; if it disappears while a session-only
    /// view is active, redirect to login. Runs until the session store
    /// is dropped.
    #[must_use]
    pub fn watch(&self) -> JoinHandle<()> {
        let mut rx = self.auth.subscribe();
        let router = self.router.clone();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let signed_out = rx.borrow_and_update().is_none();
                if signed_out && router.current_route().requires_session() {
                    tracing::info!(from = %router.current(), "session ended; redirecting to login");
                    router.navigate(Route::Login);
                }
            }
        })
    }
}

/// Sign out locally and return to the login view. Navigation happens
/// first so a running [`RouteGuard::watch`] sees a public route.
pub fn logout(auth: &AuthState, router: &Router) {
    router.navigate(Route::Login);
    if let Err(error) = auth.clear_user() {
        tracing::warn!(%error, "failed to clear stored session");
    }
}
