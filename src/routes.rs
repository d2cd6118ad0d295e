//! Client-side navigation.
//!
//! ARCHITECTURE
//! ============
//! The router only records where the user is; views are represented by
//! their controllers. The interceptor and route guard drive forced
//! navigation to the login view, optionally tagged with a `reason`.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

/// Query value telling the login view the backend could not be reached.
pub const UNAVAILABLE_REASON: &str = "unavailable";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    About,
    Feedback,
    MyBooks,
    Profile,
    Login,
    Register,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Dashboard,
        Route::About,
        Route::Feedback,
        Route::MyBooks,
        Route::Profile,
        Route::Login,
        Route::Register,
    ];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
            Route::About => "/about",
            Route::Feedback => "/feedback",
            Route::MyBooks => "/mybooks",
            Route::Profile => "/profile",
            Route::Login => "/auth/login",
            Route::Register => "/auth/register",
        }
    }

    /// Resolve a path, ignoring any query string and trailing slash.
    /// `/` and `/auth` redirect to their default children.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split('?').next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        match path {
            "" => Some(Route::Dashboard),
            "/auth" => Some(Route::Login),
            other => Self::ALL.into_iter().find(|route| route.path() == other),
        }
    }

    /// Views that are only meaningful with a session.
    #[must_use]
    pub fn requires_session(self) -> bool {
        matches!(self, Route::About | Route::Feedback | Route::MyBooks | Route::Profile)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub route: Route,
    pub reason: Option<String>,
}

impl Location {
    #[must_use]
    pub fn new(route: Route) -> Self {
        Self { route, reason: None }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{}?reason={reason}", self.route.path()),
            None => f.write_str(self.route.path()),
        }
    }
}

#[derive(Debug)]
struct RouterInner {
    current: Location,
    history: Vec<Location>,
}

/// Shared navigation state. Clones observe the same location.
#[derive(Clone, Debug)]
pub struct Router {
    inner: Arc<Mutex<RouterInner>>,
    tx: Arc<watch::Sender<Location>>,
}

impl Router {
    #[must_use]
    pub fn new(initial: Route) -> Self {
        let location = Location::new(initial);
        let (tx, _rx) = watch::channel(location.clone());
        Self {
            inner: Arc::new(Mutex::new(RouterInner { current: location, history: Vec::new() })),
            tx: Arc::new(tx),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RouterInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn navigate(&self, route: Route) {
        self.go(Location::new(route));
    }

    pub fn navigate_with_reason(&self, route: Route, reason: &str) {
        self.go(Location { route, reason: Some(reason.to_owned()) });
    }

    fn go(&self, location: Location) {
        tracing::debug!(to = %location, "navigate");
        {
            let mut inner = self.lock();
            inner.current = location.clone();
            inner.history.push(location.clone());
        }
        self.tx.send_replace(location);
    }

    #[must_use]
    pub fn current(&self) -> Location {
        self.lock().current.clone()
    }

    #[must_use]
    pub fn current_route(&self) -> Route {
        self.lock().current.route
    }

    /// Every navigation performed since construction, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Location> {
        self.lock().history.clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.tx.subscribe()
    }
}
