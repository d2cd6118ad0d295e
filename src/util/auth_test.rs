use super::*;
use crate::routes::Location;
use crate::state::auth::Session;
use crate::storage::MemoryStorage;

fn setup(route: Route) -> (AuthState, Router, RouteGuard) {
    let auth = AuthState::new(MemoryStorage::new().shared());
    let router = Router::new(route);
    let guard = RouteGuard::new(auth.clone(), router.clone());
    (auth, router, guard)
}

fn sign_in(auth: &AuthState) {
    auth.set_user(Session { email: "ada@example.com".to_owned(), token: "jwt".to_owned() })
        .unwrap();
}

#[test]
fn can_activate_with_session() {
    let (auth, router, guard) = setup(Route::Dashboard);
    sign_in(&auth);
    assert!(guard.can_activate());
    assert!(router.history().is_empty());
}

#[test]
fn can_activate_without_session_redirects() {
    let (_auth, router, guard) = setup(Route::Dashboard);
    assert!(!guard.can_activate());
    assert_eq!(router.current_route(), Route::Login);
}

#[test]
fn enter_only_guards_session_routes() {
    let (auth, router, guard) = setup(Route::Dashboard);

    assert!(!guard.enter(Route::About));
    assert_eq!(router.current_route(), Route::Login);
    assert!(guard.enter(Route::Register));
    assert_eq!(router.current_route(), Route::Register);

    sign_in(&auth);
    assert!(guard.enter(Route::MyBooks));
    assert_eq!(router.current_route(), Route::MyBooks);
}

#[tokio::test]
async fn watch_redirects_when_session_expires_on_protected_view() {
    let (auth, router, guard) = setup(Route::Dashboard);
    sign_in(&auth);
    router.navigate(Route::Feedback);
    let task = guard.watch();
    tokio::task::yield_now().await;

    auth.clear_user().unwrap();
    let mut locations = router.subscribe();
    tokio::time::timeout(std::time::Duration::from_secs(1), locations.wait_for(|l| l.route == Route::Login))
        .await
        .unwrap()
        .unwrap();
    task.abort();
}

#[tokio::test]
async fn watch_leaves_public_views_alone() {
    let (auth, router, guard) = setup(Route::Dashboard);
    sign_in(&auth);
    let task = guard.watch();
    tokio::task::yield_now().await;

    auth.clear_user().unwrap();
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert_eq!(router.current_route(), Route::Dashboard);
    task.abort();
}

#[tokio::test]
async fn logout_navigates_once() {
    let (auth, router, guard) = setup(Route::Dashboard);
    sign_in(&auth);
    router.navigate(Route::Profile);
    let task = guard.watch();
    tokio::task::yield_now().await;

    logout(&auth, &router);
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }

    assert!(!auth.is_logged_in());
    assert_eq!(
        router.history(),
        vec![Location::new(Route::Profile), Location::new(Route::Login)]
    );
    task.abort();
}
