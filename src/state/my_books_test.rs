use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::routes::Route;
use crate::test_support::{Harness, api_path};

fn books_page(ids: std::ops::Range<i64>, number: u32, total: u64, pages: u32) -> serde_json::Value {
    let content: Vec<_> = ids
        .map(|id| serde_json::json!({ "id": id, "title": format!("Book {id}"), "authorName": "A", "isbn": "1" }))
        .collect();
    serde_json::json!({
        "content": content, "number": number, "size": PAGE_SIZE,
        "totalElement": total, "totalPages": pages, "first": false, "last": false
    })
}

async fn mount_owned(server: &MockServer, page: u32, body: serde_json::Value, times: u64) {
    Mock::given(method("GET"))
        .and(path(api_path("books/owner")))
        .and(query_param("page", page.to_string()))
        .and(query_param("size", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}

fn controller(h: &Harness) -> MyBooksController {
    MyBooksController::new(BooksApi::new(h.client.clone()))
}

#[tokio::test]
async fn load_page_two_then_next_loads_page_three() {
    let (server, h) = Harness::mocked(Route::MyBooks).await;
    mount_owned(&server, 2, books_page(30..45, 2, 47, 4), 1).await;
    mount_owned(&server, 3, books_page(45..47, 3, 47, 4), 1).await;
    let mut c = controller(&h);

    c.load(2).await;
    let state = c.state();
    assert_eq!(state.books.len(), 15);
    assert!(!state.pagination.is_first);
    assert!(!state.pagination.is_last);
    assert!(!state.loading);
    assert!(state.error.is_none());

    c.next_page().await;
    assert_eq!(c.state().pagination.page, 3);
    assert_eq!(c.state().books.len(), 2);
    assert!(c.state().pagination.is_last);
}

#[tokio::test]
async fn page_without_index_or_size_keeps_requested_page() {
    let (server, h) = Harness::mocked(Route::MyBooks).await;
    let content: Vec<_> = (30..45)
        .map(|id| serde_json::json!({ "id": id, "title": format!("Book {id}"), "authorName": "A", "isbn": "1" }))
        .collect();
    let body = serde_json::json!({
        "content": content, "totalElement": 47, "totalPages": 4, "first": false, "last": false
    });
    mount_owned(&server, 2, body, 1).await;
    mount_owned(&server, 3, books_page(45..47, 3, 47, 4), 1).await;
    let mut c = controller(&h);

    c.load(2).await;
    let state = c.state();
    assert!(state.error.is_none());
    assert_eq!(state.books.len(), 15);
    assert_eq!(state.pagination.page, 2);
    assert_eq!(state.pagination.total_items, 47);
    assert!(!state.pagination.is_first);
    assert!(!state.pagination.is_last);

    c.next_page().await;
    assert_eq!(c.state().pagination.page, 3);
}

#[tokio::test]
async fn switch_tab_resets_to_first_page() {
    let (server, h) = Harness::mocked(Route::MyBooks).await;
    mount_owned(&server, 1, books_page(15..30, 1, 30, 2), 1).await;
    Mock::given(method("GET"))
        .and(path(api_path("books/requested")))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [{ "id": 5, "title": "Dune", "authorName": "H", "isbn": "1", "requesterName": "Ada" }],
            "number": 0, "size": 15, "totalElement": 1, "totalPages": 1
        })))
        .expect(1)
        .mount(&server)
        .await;
    let mut c = controller(&h);
    c.load(1).await;

    c.switch_tab(BookTab::Requested).await;
    assert_eq!(c.state().tab, BookTab::Requested);
    assert_eq!(c.state().pagination.page, 0);
    assert_eq!(c.state().requests[0].requester_name, "Ada");
    assert!(c.state().books.is_empty());

    // Same tab again is a no-op; the requested mock expects exactly one call.
    c.switch_tab(BookTab::Requested).await;
}

#[tokio::test]
async fn each_book_tab_reads_its_own_endpoint() {
    let (server, h) = Harness::mocked(Route::MyBooks).await;
    for (endpoint, first_id) in [("books/returned", 100), ("books/borrowed", 200)] {
        Mock::given(method("GET"))
            .and(path(api_path(endpoint)))
            .and(query_param("page", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(books_page(first_id..first_id + 3, 0, 3, 1)))
            .expect(1)
            .mount(&server)
            .await;
    }
    let mut c = controller(&h);

    c.switch_tab(BookTab::Returned).await;
    assert_eq!(c.state().books[0].id, 100);
    c.switch_tab(BookTab::Borrowed).await;
    assert_eq!(c.state().books[0].id, 200);
    assert!(c.state().requests.is_empty());
}

#[tokio::test]
async fn load_failure_sets_message_and_clears_loading() {
    let (server, h) = Harness::mocked(Route::MyBooks).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let mut c = controller(&h);

    c.load(0).await;
    assert_eq!(c.state().error.as_deref(), Some(LOAD_ERROR));
    assert!(!c.state().loading);
}

#[tokio::test]
async fn approve_waits_for_server_then_reloads() {
    let (server, h) = Harness::mocked(Route::MyBooks).await;
    Mock::given(method("POST"))
        .and(path(api_path("books/approve-request/5")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    mount_owned(&server, 0, books_page(0..3, 0, 3, 1), 1).await;
    let mut c = controller(&h);

    c.approve_request(5).await;
    assert_eq!(c.state().books.len(), 3);
}

#[tokio::test]
async fn reject_failure_keeps_rows_and_reports() {
    let (server, h) = Harness::mocked(Route::MyBooks).await;
    Mock::given(method("POST"))
        .and(path(api_path("books/reject-request/5")))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;
    mount_owned(&server, 0, books_page(0..3, 0, 3, 1), 0).await;
    let mut c = controller(&h);

    c.reject_request(5).await;
    assert_eq!(c.state().error.as_deref(), Some(REJECT_ERROR));
}

#[tokio::test]
async fn delete_after_session_expiry_does_nothing_locally() {
    let (server, h) = Harness::mocked(Route::MyBooks).await;
    h.login("stale");
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    mount_owned(&server, 0, books_page(0..3, 0, 3, 1), 0).await;
    let mut c = controller(&h);

    c.delete_book(8).await;
    assert!(c.state().error.is_none());
    assert_eq!(h.router.current_route(), Route::Login);
    assert!(!h.auth.is_logged_in());
}

#[tokio::test]
async fn save_rejects_missing_author_without_request() {
    let (server, h) = Harness::mocked(Route::MyBooks).await;
    let mut c = controller(&h);
    let request = BookRequest { title: "Dune".to_owned(), ..BookRequest::default() };

    c.save_book(None, &request).await;
    assert_eq!(c.state().error.as_deref(), Some(INVALID_BOOK_ERROR));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn save_updates_then_reloads() {
    let (server, h) = Harness::mocked(Route::MyBooks).await;
    Mock::given(method("PUT"))
        .and(path(api_path("books/4")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    mount_owned(&server, 0, books_page(0..1, 0, 1, 1), 1).await;
    let mut c = controller(&h);
    let request = BookRequest {
        title: "Dune".to_owned(),
        author_name: "Frank Herbert".to_owned(),
        ..BookRequest::default()
    };

    c.save_book(Some(4), &request).await;
    assert!(c.state().error.is_none());
    assert_eq!(c.state().books.len(), 1);
}
