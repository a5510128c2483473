mod common;

use axum::http::{HeaderMap, HeaderValue, header::COOKIE};
use common::*;
use spotyswipe::management::{
    PendingLogin, SESSION_COOKIE, Session, SessionStore, TokenManager, get_cookie,
};

fn cookie_headers(cookie: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
    headers
}

#[test]
fn test_get_cookie() {
    let header = "theme=dark; spotyswipe_session=abc.def; lang=en";

    assert_eq!(
        get_cookie(header, SESSION_COOKIE),
        Some("abc.def".to_string())
    );
    assert_eq!(get_cookie(header, "lang"), Some("en".to_string()));
    assert_eq!(get_cookie(header, "missing"), None);
    assert_eq!(get_cookie("", SESSION_COOKIE), None);
}

#[test]
fn test_get_cookie_does_not_match_prefix() {
    let header = "spotyswipe_session_old=stale; spotyswipe_session=fresh";

    assert_eq!(
        get_cookie(header, SESSION_COOKIE),
        Some("fresh".to_string())
    );
}

#[tokio::test]
async fn test_cookie_round_trip() {
    let store = SessionStore::new(SESSION_SECRET);
    let session = Session {
        pending_login: Some(PendingLogin {
            state: "state-1".to_string(),
            code_verifier: "verifier-1".to_string(),
        }),
        ..Session::default()
    };
    let id = store.create(session.clone()).await;

    let (loaded_id, loaded) = store
        .load(&cookie_headers(&store.cookie(&id)))
        .await
        .unwrap();

    assert_eq!(loaded_id, id);
    assert_eq!(loaded, session);
}

#[tokio::test]
async fn test_cookie_among_other_cookies() {
    let store = SessionStore::new(SESSION_SECRET);
    let id = store.create(Session::default()).await;
    let header = format!("theme=dark; {}; lang=en", store.cookie(&id));

    assert_eq!(store.session_id(&cookie_headers(&header)), Some(id));
}

#[tokio::test]
async fn test_tampered_cookie_is_rejected() {
    let store = SessionStore::new(SESSION_SECRET);
    let id = store.create(Session::default()).await;
    let other = store.create(Session::default()).await;

    // signature of one session attached to the id of another
    let signature = store.cookie(&id).rsplit('.').next().unwrap().to_string();
    let forged = format!("{}={}.{}", SESSION_COOKIE, other, signature);

    assert!(store.load(&cookie_headers(&forged)).await.is_none());
    assert!(
        store
            .load(&cookie_headers(&format!("{}={}", SESSION_COOKIE, id)))
            .await
            .is_none()
    );
}

#[tokio::test]
async fn test_cookie_signed_with_other_secret_is_rejected() {
    let store = SessionStore::new(SESSION_SECRET);
    let other_store = SessionStore::new("another-secret-9876543210");
    let id = store.create(Session::default()).await;

    assert!(
        store
            .load(&cookie_headers(&other_store.cookie(&id)))
            .await
            .is_none()
    );
}

#[tokio::test]
async fn test_removed_session_is_gone() {
    let store = SessionStore::new(SESSION_SECRET);
    let id = store.create(Session::default()).await;
    let headers = cookie_headers(&store.cookie(&id));

    store.remove(&id).await;

    assert!(store.session_id(&headers).is_some());
    assert!(store.load(&headers).await.is_none());
}

#[test]
fn test_set_cookie_attributes() {
    let store = SessionStore::new(SESSION_SECRET);
    let value = store.set_cookie("abc");

    assert!(value.starts_with(&format!("{}=abc.", SESSION_COOKIE)));
    assert!(value.contains("Path=/"));
    assert!(value.contains("HttpOnly"));
    assert!(value.contains("SameSite=Lax"));
    assert!(value.contains("Max-Age="));
}

#[tokio::test]
async fn test_token_manager_keeps_valid_token() {
    let spotify = FakeSpotify::default();
    let mut manager = TokenManager::new(token("access-1", "refresh-1"));

    let access = manager.get_valid_token(&spotify).await.unwrap();

    assert_eq!(access, "access-1");
    assert!(!manager.was_refreshed());
    assert_eq!(spotify.refreshes(), 0);
}

#[tokio::test]
async fn test_token_manager_refreshes_expired_token() {
    let spotify = FakeSpotify::default();
    let mut manager = TokenManager::new(expired_token("stale", "refresh-1"));
    assert!(manager.is_expired());

    let access = manager.get_valid_token(&spotify).await.unwrap();

    assert_eq!(access, "refreshed-refresh-1");
    assert!(manager.was_refreshed());
    assert!(!manager.is_expired());
    assert_eq!(spotify.refreshes(), 1);
    assert_eq!(manager.into_token().refresh_token, "refresh-1-next");
}

#[tokio::test]
async fn test_token_manager_propagates_refresh_failure() {
    let spotify = FakeSpotify {
        fail_refresh: true,
        ..FakeSpotify::default()
    };
    let mut manager = TokenManager::new(expired_token("stale", "refresh-1"));

    let err = manager.get_valid_token(&spotify).await.unwrap_err();

    assert_eq!(err.kind(), "unauthorized");
    assert!(!manager.was_refreshed());
}
