//! Client core for a personal book library.
//!
//! ARCHITECTURE
//! ============
//! Controllers (`state`) call per-resource API clients (`net`), which all
//! send through one interceptor ([`net::client::ApiClient`]). The
//! interceptor reads the session store (`state::auth`) and durable storage
//! (`storage`), and on authentication failure clears both and drives the
//! router (`routes`) to the login view. [`app::Bookshelf`] wires these
//! together.

pub mod app;
pub mod config;
pub mod net;
pub mod routes;
pub mod state;
pub mod storage;
pub mod util;

#[cfg(test)]
mod test_support;

pub use app::Bookshelf;
pub use config::{ClientConfig, ConfigError};
pub use net::error::ApiError;
pub use routes::{Location, Route, Router};
pub use state::auth::{AuthState, Session};
pub use storage::{FileStorage, MemoryStorage, SharedStorage, Storage, StorageError};
