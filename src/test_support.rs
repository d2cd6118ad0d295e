//! Shared fixtures for unit tests.

use wiremock::MockServer;

use crate::net::client::ApiClient;
use crate::routes::{Route, Router};
use crate::state::auth::{AuthState, Session};
use crate::storage::MemoryStorage;

pub(crate) const API_PREFIX: &str = "/api/v1";

pub(crate) struct Harness {
    pub storage: MemoryStorage,
    pub auth: AuthState,
    pub router: Router,
    pub client: ApiClient,
}

impl Harness {
    pub(crate) fn new(api_url: &str, route: Route) -> Self {
        let storage = MemoryStorage::new();
        let auth = AuthState::new(storage.shared());
        let router = Router::new(route);
        let client = ApiClient::with_http(
            reqwest::Client::new(),
            api_url,
            auth.clone(),
            storage.shared(),
            router.clone(),
        )
        .unwrap();
        Self { storage, auth, router, client }
    }

    /// Harness pointed at a fresh mock server, starting on `route`.
    pub(crate) async fn mocked(route: Route) -> (MockServer, Self) {
        let server = MockServer::start().await;
        let harness = Self::new(&format!("{}{API_PREFIX}", server.uri()), route);
        (server, harness)
    }

    pub(crate) fn login(&self, token: &str) {
        self.auth
            .set_user(Session { email: "reader@example.com".to_owned(), token: token.to_owned() })
            .unwrap();
    }
}

/// API URL on a local port with nothing listening.
pub(crate) fn unreachable_api_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}{API_PREFIX}")
}

pub(crate) fn api_path(path: &str) -> String {
    format!("{API_PREFIX}/{}", path.trim_start_matches('/'))
}
