use super::*;

fn book_json(id: i64) -> serde_json::Value {
    serde_json::json!({ "id": id, "title": format!("Book {id}"), "authorName": "Author", "isbn": "123" })
}

#[test]
fn paged_result_derives_first_and_last() {
    let content: Vec<_> = (0..15).map(book_json).collect();
    let raw = serde_json::json!({
        "content": content,
        "number": 2,
        "size": 15,
        "totalElement": 47,
        "totalPages": 4,
        "first": true,
        "last": true
    });
    let page: PagedResult<Book> = serde_json::from_value(raw).unwrap();
    assert_eq!(page.items().len(), 15);
    assert_eq!(page.page_index(), Some(2));
    assert_eq!(page.total_items(), 47);
    assert!(!page.is_first());
    assert!(!page.is_last());
}

#[test]
fn paged_result_last_page_and_empty_page() {
    let last = PagedResult::new(vec![1, 2], 3, 15, 47, 4).unwrap();
    assert!(last.is_last());
    let empty: PagedResult<i32> = PagedResult::new(Vec::new(), 0, 15, 0, 0).unwrap();
    assert!(empty.is_first());
    assert!(empty.is_last());
}

#[test]
fn paged_result_rejects_oversized_content() {
    let raw = serde_json::json!({ "content": [1, 2, 3], "number": 0, "size": 2, "totalElement": 3, "totalPages": 2 });
    let err = serde_json::from_value::<PagedResult<i32>>(raw).unwrap_err();
    assert!(err.to_string().contains("page holds 3 items but its size is 2"));
}

#[test]
fn book_request_requires_title_and_author() {
    let mut request = BookRequest { title: "Dune".to_owned(), ..BookRequest::default() };
    assert!(!request.is_valid());
    request.author_name = "  ".to_owned();
    assert!(!request.is_valid());
    request.author_name = "Frank Herbert".to_owned();
    assert!(request.is_valid());
}

#[test]
fn book_request_serializes_camel_case_and_skips_absent() {
    let request = BookRequest {
        title: "Dune".to_owned(),
        author_name: "Frank Herbert".to_owned(),
        ..BookRequest::default()
    };
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["authorName"], "Frank Herbert");
    assert!(value.get("synopsis").is_none());
    assert_eq!(value["shareable"], false);
}

#[test]
fn feedback_status_wire_form_and_label() {
    let status: FeedbackStatus = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
    assert_eq!(status, FeedbackStatus::InProgress);
    assert_eq!(status.label(), "In Progress");
    assert_eq!(status.as_str(), "IN_PROGRESS");
    assert_eq!(serde_json::to_string(&FeedbackStatus::Closed).unwrap(), "\"CLOSED\"");
}

#[test]
fn feedback_item_toggle_upvote() {
    let mut item = FeedbackItem { upvote_count: 5, ..FeedbackItem::default() };
    item.toggle_upvote();
    assert_eq!((item.upvote_count, item.upvoted_by_current_user), (6, true));
    item.toggle_upvote();
    assert_eq!((item.upvote_count, item.upvoted_by_current_user), (5, false));
}

#[test]
fn feedback_item_reads_backend_fields() {
    let raw = r#"{"id":7,"title":"Dark mode","description":"Please","status":"NEW","upvoteCount":3,
        "upvotedByCurrentUser":true,"ownFeedback":false,"age":"2 days ago",
        "comments":[{"fullName":"Ada Lovelace","message":"+1"}]}"#;
    let item: FeedbackItem = serde_json::from_str(raw).unwrap();
    assert_eq!(item.upvote_count, 3);
    assert!(item.upvoted_by_current_user);
    assert_eq!(item.comments[0].full_name, "Ada Lovelace");
}

#[test]
fn feedback_request_validation() {
    let blank = FeedbackRequest { title: " ".to_owned(), description: "x".to_owned() };
    assert_eq!(blank.validate(), Err(FeedbackValidationError::Blank));

    let long_title = FeedbackRequest { title: "t".repeat(256), description: "x".to_owned() };
    assert_eq!(long_title.validate(), Err(FeedbackValidationError::TitleTooLong));

    let long_body = FeedbackRequest { title: "t".to_owned(), description: "d".repeat(2001) };
    assert_eq!(long_body.validate(), Err(FeedbackValidationError::DescriptionTooLong));

    let ok = FeedbackRequest { title: "t".repeat(255), description: "d".repeat(2000) };
    assert_eq!(ok.validate(), Ok(()));
}

#[test]
fn profile_display_name_and_patch_split() {
    let profile = UserProfile { firstname: "Ada".to_owned(), lastname: "Lovelace".to_owned(), ..UserProfile::default() };
    assert_eq!(profile.display_name(), "Ada Lovelace");

    let patch = ProfilePatch::from_display_name("  Ada  King Lovelace ", " ada@example.com ");
    assert_eq!(patch.firstname.as_deref(), Some("Ada"));
    assert_eq!(patch.lastname.as_deref(), Some("King Lovelace"));
    assert_eq!(patch.email.as_deref(), Some("ada@example.com"));
}

#[test]
fn user_dashboard_reads_stats() {
    let raw = r#"{"firstname":"Ada","stats":{"booksOwned":4,"booksRead":2},
        "readingActivity":[{"month":"2024-05","booksRead":1}],
        "genreDistribution":[{"genre":"Sci-Fi","count":2,"percentage":50.0}],"readingStreak":3}"#;
    let dash: UserDashboard = serde_json::from_str(raw).unwrap();
    assert_eq!(dash.stats.books_owned, 4);
    assert_eq!(dash.reading_activity[0].month, "2024-05");
    assert_eq!(dash.genre_distribution[0].genre, "Sci-Fi");
    assert_eq!(dash.reading_streak, 3);
}

#[test]
fn external_book_prefills_form() {
    let raw = r#"{"id":"v1","volumeInfo":{"title":"Dune","authors":["Frank Herbert","Brian Herbert"],
        "description":"Spice","categories":["Fiction"],
        "imageLinks":{"thumbnail":"http://books.example/dune.jpg"}}}"#;
    let book: ExternalBook = serde_json::from_str(raw).unwrap();
    let request = book.to_book_request();
    assert_eq!(request.author_name, "Frank Herbert, Brian Herbert");
    assert_eq!(request.cover_url.as_deref(), Some("https://books.example/dune.jpg"));
    assert_eq!(request.genre.as_deref(), Some("Fiction"));
}

#[test]
fn external_book_without_authors() {
    let book = ExternalBook::default();
    assert_eq!(book.to_book_request().author_name, "Unknown Author");
}
