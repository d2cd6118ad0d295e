//! Auth-session state for the current client user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Single authority for "who is logged in". The request interceptor, route
//! guard, login flows and dashboard all read it; login, logout and
//! interceptor-triggered invalidation write it.
//!
//! DESIGN
//! ======
//! Reads hit an in-memory cache. The first read with an empty cache loads
//! `authUser` from storage once; after that storage is only consulted again
//! when `clear_user` resets the cache. Every mutation is published on a
//! `watch` channel so observers (guard, navigation bar) react to expiry.
//! Writes are last-write-wins.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::storage::{AUTH_TOKEN_KEY, AUTH_USER_KEY, GOOGLE_TOKEN_KEY, SharedStorage, StorageError};

/// Authenticated identity plus bearer token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Default)]
struct Cache {
    session: Option<Session>,
    primed: bool,
}

#[derive(Clone, Debug)]
pub struct AuthState {
    cache: Arc<Mutex<Cache>>,
    storage: SharedStorage,
    tx: Arc<watch::Sender<Option<Session>>>,
}

impl AuthState {
    #[must_use]
    pub fn new(storage: SharedStorage) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            cache: Arc::new(Mutex::new(Cache::default())),
            storage,
            tx: Arc::new(tx),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Cache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current session, priming the cache from storage on first use.
    #[must_use]
    pub fn current_user(&self) -> Option<Session> {
        let mut cache = self.lock();
        if !cache.primed {
            cache.primed = true;
            cache.session = self.load_from_storage();
            let loaded = cache.session.clone();
            drop(cache);
            self.tx.send_if_modified(|current| {
                if *current == loaded {
                    return false;
                }
                *current = loaded.clone();
                true
            });
            return loaded;
        }
        cache.session.clone()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.current_user().is_some()
    }

    /// Token of the cached session, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.current_user().map(|session| session.token)
    }

    /// Replace the session in cache and storage, then notify subscribers.
    ///
    /// The cache and subscribers are updated even when storage fails.
    ///
    /// # Errors
    ///
    /// Returns the first storage write failure.
    pub fn set_user(&self, session: Session) -> Result<(), StorageError> {
        {
            let mut cache = self.lock();
            cache.session = Some(session.clone());
            cache.primed = true;
        }
        let persisted = self.persist(&session);
        tracing::info!(email = %session.email, "session established");
        self.tx.send_replace(Some(session));
        persisted
    }

    /// Drop the session from cache and storage, then notify subscribers.
    ///
    /// # Errors
    ///
    /// Returns the first storage removal failure.
    pub fn clear_user(&self) -> Result<(), StorageError> {
        {
            let mut cache = self.lock();
            cache.session = None;
            cache.primed = false;
        }
        let results: Vec<_> = [AUTH_TOKEN_KEY, AUTH_USER_KEY, GOOGLE_TOKEN_KEY]
            .into_iter()
            .map(|key| self.storage.remove(key))
            .collect();
        let removed = results.into_iter().find(Result::is_err).unwrap_or(Ok(()));
        tracing::info!("session cleared");
        self.tx.send_replace(None);
        removed
    }

    /// Remember the third-party sign-in credential until logout.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn set_google_token(&self, credential: &str) -> Result<(), StorageError> {
        self.storage.set(GOOGLE_TOKEN_KEY, credential)
    }

    /// Subscribe to session changes. The receiver starts at the current value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        let _ = self.current_user();
        self.tx.subscribe()
    }

    fn persist(&self, session: &Session) -> Result<(), StorageError> {
        let raw = serde_json::to_string(session)?;
        self.storage.set(AUTH_TOKEN_KEY, &session.token)?;
        self.storage.set(AUTH_USER_KEY, &raw)
    }

    fn load_from_storage(&self) -> Option<Session> {
        let raw = self.storage.get(AUTH_USER_KEY)?;
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session),
            Err(error) => {
                tracing::warn!(%error, "ignoring unreadable stored session");
                None
            }
        }
    }
}
