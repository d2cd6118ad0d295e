use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use super::*;
use crate::routes::Route;
use crate::test_support::{Harness, api_path};

#[tokio::test]
async fn update_profile_puts_only_present_fields() {
    let (server, h) = Harness::mocked(Route::Profile).await;
    h.login("jwt");
    Mock::given(method("PUT"))
        .and(path(api_path("app-profile/profile")))
        .and(header("Authorization", "Bearer jwt"))
        .and(body_json(serde_json::json!({ "firstname": "Ada" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1, "firstname": "Ada", "lastname": "Lovelace", "email": "ada@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let patch = ProfilePatch { firstname: Some("Ada".to_owned()), ..ProfilePatch::default() };
    let profile = ProfileApi::new(h.client.clone()).update_profile(&patch).await.unwrap().unwrap();
    assert_eq!(profile.display_name(), "Ada Lovelace");
}

#[tokio::test]
async fn dashboard_decodes_stats_and_activity() {
    let (server, h) = Harness::mocked(Route::Profile).await;
    h.login("jwt");
    Mock::given(method("GET"))
        .and(path(api_path("app-profile/me")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "firstname": "Ada",
            "email": "ada@example.com",
            "stats": { "booksOwned": 12, "booksRead": 4, "pendingRequests": 1 },
            "readingActivity": [{ "month": "2024-01", "booksRead": 2 }],
            "genreDistribution": [{ "genre": "Fiction", "count": 3, "percentage": 75.0 }],
            "readingStreak": 5
        })))
        .mount(&server)
        .await;

    let dashboard = ProfileApi::new(h.client.clone()).dashboard().await.unwrap().unwrap();
    assert_eq!(dashboard.stats.books_owned, 12);
    assert_eq!(dashboard.stats.currently_borrowed, 0);
    assert_eq!(dashboard.reading_activity[0].month, "2024-01");
    assert_eq!(dashboard.genre_distribution[0].genre, "Fiction");
    assert_eq!(dashboard.reading_streak, 5);
}

#[tokio::test]
async fn expired_session_suppresses_profile_fetch() {
    let (server, h) = Harness::mocked(Route::Profile).await;
    h.login("old");
    Mock::given(method("GET"))
        .and(path(api_path("app-profile/profile")))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let outcome = ProfileApi::new(h.client.clone()).profile().await.unwrap();
    assert!(outcome.is_none());
    assert_eq!(h.router.current_route(), Route::Login);
    assert!(!h.auth.is_logged_in());
}
