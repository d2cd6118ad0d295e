use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use super::*;
use crate::routes::Route;
use crate::test_support::{Harness, api_path};

fn page_body(ids: std::ops::Range<i64>, number: u32, size: u32, total: u64, pages: u32) -> serde_json::Value {
    let content: Vec<_> = ids
        .map(|id| serde_json::json!({ "id": id, "title": format!("Book {id}"), "authorName": "A", "isbn": "1" }))
        .collect();
    serde_json::json!({
        "content": content, "number": number, "size": size,
        "totalElement": total, "totalPages": pages, "first": number == 0, "last": false
    })
}

#[tokio::test]
async fn owned_sends_page_and_size() {
    let (server, h) = Harness::mocked(Route::MyBooks).await;
    Mock::given(method("GET"))
        .and(path(api_path("books/owner")))
        .and(query_param("page", "2"))
        .and(query_param("size", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(30..45, 2, 15, 47, 4)))
        .expect(1)
        .mount(&server)
        .await;

    let page = BooksApi::new(h.client.clone()).owned(2, 15).await.unwrap().unwrap();
    assert_eq!(page.items().len(), 15);
    assert_eq!(page.items()[0].id, 30);
    assert!(!page.is_first());
}

#[tokio::test]
async fn requested_decodes_requester() {
    let (server, h) = Harness::mocked(Route::MyBooks).await;
    let body = serde_json::json!({
        "content": [{ "id": 9, "title": "Dune", "authorName": "Herbert", "isbn": "1", "requesterName": "Ada" }],
        "number": 0, "size": 15, "totalElement": 1, "totalPages": 1
    });
    Mock::given(method("GET"))
        .and(path(api_path("books/requested")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let page = BooksApi::new(h.client.clone()).requested(0, 15).await.unwrap().unwrap();
    assert_eq!(page.items()[0].requester_name, "Ada");
    assert!(page.is_last());
}

#[tokio::test]
async fn create_posts_camel_case_body() {
    let (server, h) = Harness::mocked(Route::MyBooks).await;
    let request = BookRequest {
        title: "Dune".to_owned(),
        author_name: "Frank Herbert".to_owned(),
        isbn: "9780441013593".to_owned(),
        shareable: true,
        ..BookRequest::default()
    };
    Mock::given(method("POST"))
        .and(path(api_path("books")))
        .and(body_json(serde_json::json!({
            "title": "Dune", "authorName": "Frank Herbert", "isbn": "9780441013593", "shareable": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(12))
        .expect(1)
        .mount(&server)
        .await;

    let created = BooksApi::new(h.client.clone()).create(&request).await.unwrap();
    assert_eq!(created, Some(()));
}

#[tokio::test]
async fn lending_transitions_hit_their_endpoints() {
    let (server, h) = Harness::mocked(Route::MyBooks).await;
    for (verb, route) in [
        ("POST", "books/borrow/3"),
        ("POST", "books/approve-request/3"),
        ("POST", "books/reject-request/3"),
        ("PATCH", "books/shareable/3"),
        ("PATCH", "books/archive/3"),
        ("PATCH", "books/borrow/return/3"),
        ("PATCH", "books/borrow/return/approve/3"),
        ("DELETE", "books/3"),
    ] {
        Mock::given(method(verb))
            .and(path(api_path(route)))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
    }

    let api = BooksApi::new(h.client.clone());
    assert!(api.borrow(3).await.unwrap().is_some());
    assert!(api.approve_request(3).await.unwrap().is_some());
    assert!(api.reject_request(3).await.unwrap().is_some());
    assert!(api.update_shareable(3).await.unwrap().is_some());
    assert!(api.update_archived(3).await.unwrap().is_some());
    assert!(api.return_borrowed(3).await.unwrap().is_some());
    assert!(api.approve_return(3).await.unwrap().is_some());
    assert!(api.delete(3).await.unwrap().is_some());
}

#[tokio::test]
async fn oversized_page_is_a_decode_error() {
    let (server, h) = Harness::mocked(Route::Dashboard).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0..5, 0, 2, 5, 3)))
        .mount(&server)
        .await;

    let err = BooksApi::new(h.client.clone()).shareable(0, 2).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}
