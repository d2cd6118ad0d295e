use super::*;

#[test]
fn parse_round_trips_every_route_path() {
    for route in Route::ALL {
        assert_eq!(Route::parse(route.path()), Some(route));
    }
}

#[test]
fn parse_applies_default_redirects() {
    assert_eq!(Route::parse("/"), Some(Route::Dashboard));
    assert_eq!(Route::parse("/auth"), Some(Route::Login));
    assert_eq!(Route::parse("/auth/login?reason=unavailable"), Some(Route::Login));
    assert_eq!(Route::parse("/mybooks/"), Some(Route::MyBooks));
    assert_eq!(Route::parse("/nowhere"), None);
}

#[test]
fn protected_routes() {
    assert!(Route::MyBooks.requires_session());
    assert!(Route::Feedback.requires_session());
    assert!(Route::Profile.requires_session());
    assert!(Route::About.requires_session());
    assert!(!Route::Dashboard.requires_session());
    assert!(!Route::Login.requires_session());
    assert!(!Route::Register.requires_session());
}

#[test]
fn location_display_includes_reason() {
    let location = Location { route: Route::Login, reason: Some(UNAVAILABLE_REASON.to_owned()) };
    assert_eq!(location.to_string(), "/auth/login?reason=unavailable");
    assert_eq!(Location::new(Route::Feedback).to_string(), "/feedback");
}

#[test]
fn navigate_updates_current_and_history() {
    let router = Router::new(Route::Dashboard);
    assert!(router.history().is_empty());

    router.navigate(Route::MyBooks);
    router.navigate_with_reason(Route::Login, UNAVAILABLE_REASON);

    assert_eq!(router.current_route(), Route::Login);
    assert_eq!(router.current().reason.as_deref(), Some("unavailable"));
    assert_eq!(
        router.history(),
        vec![
            Location::new(Route::MyBooks),
            Location { route: Route::Login, reason: Some("unavailable".to_owned()) },
        ]
    );
}

#[test]
fn subscribers_observe_navigation() {
    let router = Router::new(Route::Dashboard);
    let mut rx = router.subscribe();
    router.navigate(Route::Profile);
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().route, Route::Profile);
}
