use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::storage::{AUTH_USER_KEY, MemoryStorage, Storage};

async fn app_for(server: &MockServer, storage: &MemoryStorage) -> Bookshelf {
    let config = ClientConfig::with_api_url(&format!("{}/api/v1", server.uri())).unwrap();
    Bookshelf::new(config, storage.shared()).unwrap()
}

#[tokio::test]
async fn stored_session_is_reused_across_instances() {
    let server = MockServer::start().await;
    let storage = MemoryStorage::new();
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": "jwt-1" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/app-profile/profile"))
        .and(header("Authorization", "Bearer jwt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1, "firstname": "Ada", "lastname": "Lovelace", "email": "ada@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let first = app_for(&server, &storage).await;
    assert!(first.login().sign_in("ada@example.com", "secret").await);

    let second = app_for(&server, &storage).await;
    assert!(second.auth().is_logged_in());
    let mut profile = second.profile_view();
    profile.load().await;
    assert_eq!(profile.state().profile.as_ref().unwrap().firstname, "Ada");
}

#[tokio::test]
async fn invalidation_is_shared_by_every_controller() {
    let server = MockServer::start().await;
    let storage = MemoryStorage::new();
    storage
        .set(AUTH_USER_KEY, r#"{"email":"ada@example.com","token":"stale"}"#)
        .unwrap();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let app = app_for(&server, &storage).await;
    assert!(app.guard().enter(Route::MyBooks));
    let mut books = app.my_books();
    books.load(0).await;

    assert!(!app.auth().is_logged_in());
    assert_eq!(app.router().current_route(), Route::Login);
    assert!(!app.guard().enter(Route::Feedback));
    assert!(storage.keys().is_empty());
}

#[tokio::test]
async fn logout_clears_session() {
    let server = MockServer::start().await;
    let storage = MemoryStorage::new();
    storage
        .set(AUTH_USER_KEY, r#"{"email":"ada@example.com","token":"t"}"#)
        .unwrap();
    let app = app_for(&server, &storage).await;
    assert!(app.auth().is_logged_in());

    app.logout();
    assert!(!app.auth().is_logged_in());
    assert_eq!(app.router().current_route(), Route::Login);
    assert!(storage.get(AUTH_USER_KEY).is_none());
}
