//! Integration tests for the refresh-once behavior of `ApiClient`.

use serde_json::json;
use trueneed_core::profile::UserProfile;
use trueneed_core::{ApiClient, ApiError, ErrorKind, Session, SessionEvent, SessionStore};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, store: &SessionStore) -> ApiClient {
    ApiClient::new(format!("{}/api", server.uri()), store.clone())
}

fn cache_profile(store: &SessionStore, name: &str) {
    store
        .set_user(&UserProfile {
            name: name.to_string(),
            ..UserProfile::default()
        })
        .unwrap();
}

fn signed_in(access: &str, refresh: &str) -> SessionStore {
    let store = SessionStore::in_memory();
    store.set_tokens(&Session::new(access, refresh)).unwrap();
    store
}

/// Test: a valid token means exactly one call and no refresh.
#[tokio::test]
async fn test_valid_token_single_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me/"))
        .and(header("authorization", "Bearer A1"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "A"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "A2"})))
        .expect(0)
        .mount(&server)
        .await;

    let store = signed_in("A1", "R1");
    let body = client_for(&server, &store).get("/auth/me/").await.unwrap();

    assert_eq!(body, json!({"name": "A"}));
    assert_eq!(store.access_token().unwrap().as_deref(), Some("A1"));
}

/// Test: 401 triggers one refresh, the retry uses the new token, and the
/// retry's body is returned.
#[tokio::test]
async fn test_expired_token_refreshes_and_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .and(body_json(json!({"refresh": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "A2"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me/"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "A"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in("A1", "R1");
    let body = client_for(&server, &store).get("/auth/me/").await.unwrap();

    assert_eq!(body, json!({"name": "A"}));
    assert_eq!(store.access_token().unwrap().as_deref(), Some("A2"));
    assert_eq!(store.refresh_token().unwrap().as_deref(), Some("R1"));
}

/// Test: a rotated refresh token is stored alongside the new access token.
#[tokio::test]
async fn test_refresh_stores_rotated_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "A2", "refresh": "R2"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me/"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let store = signed_in("A1", "R1");
    client_for(&server, &store).get("/auth/me/").await.unwrap();

    assert_eq!(store.session().unwrap(), Some(Session::new("A2", "R2")));
}

/// Test: a second 401 after a successful refresh is a plain failure, with
/// no further refresh attempt.
#[tokio::test]
async fn test_second_unauthorized_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "nope"})))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "A2"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in("A1", "R1");
    let err = client_for(&server, &store)
        .get("/auth/me/")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RequestFailed);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
    assert_eq!(err.to_string(), "nope");
    // Tokens survive: only a failed refresh clears the session.
    assert_eq!(store.access_token().unwrap().as_deref(), Some("A2"));
}

/// Test: a rejected refresh clears the session, publishes `Invalidated`, and
/// fails with `SessionExpired`.
#[tokio::test]
async fn test_failed_refresh_invalidates_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Token is blacklisted"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in("A1", "R1");
    cache_profile(&store, "A");
    assert!(store.user().unwrap().is_some());
    let client = client_for(&server, &store);
    let mut events = client.subscribe();

    let err = client.get("/auth/me/").await.unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired));
    assert_eq!(err.to_string(), "Session expired. Please log in again.");
    assert_eq!(store.access_token().unwrap(), None);
    assert_eq!(store.refresh_token().unwrap(), None);
    assert_eq!(store.user().unwrap(), None);
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Invalidated);
}

/// Test: with no refresh token stored, a 401 expires the session without
/// calling the refresh endpoint.
#[tokio::test]
async fn test_missing_refresh_token_expires_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "A2"})))
        .expect(0)
        .mount(&server)
        .await;

    let store = SessionStore::in_memory();
    store.set_access_token("A1").unwrap();
    cache_profile(&store, "A");

    let err = client_for(&server, &store)
        .get("/auth/me/")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SessionExpired);
    assert_eq!(store.access_token().unwrap(), None);
    assert_eq!(store.user().unwrap(), None);
}

/// Test: a 401 on an anonymous call is reported as-is; nothing is refreshed.
#[tokio::test]
async fn test_unauthenticated_401_is_plain_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid email or password"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = SessionStore::in_memory();
    let err = client_for(&server, &store)
        .post("/auth/login/", json!({"email": "a@b.com", "password": "x"}))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RequestFailed);
    assert_eq!(err.to_string(), "Invalid email or password");
}

/// Test: field errors are flattened into the message.
#[tokio::test]
async fn test_field_errors_in_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "email": ["already taken"],
        })))
        .mount(&server)
        .await;

    let store = SessionStore::in_memory();
    let err = client_for(&server, &store)
        .post("/auth/register/", json!({}))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "email: already taken");
    assert_eq!(
        err.detail().and_then(|d| d.field("email")),
        Some(&["already taken".to_string()][..])
    );
}

/// Test: a bare list failure body is reported entry by entry.
#[tokio::test]
async fn test_array_failure_body_in_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!(["Invalid credentials"])))
        .mount(&server)
        .await;

    let store = SessionStore::in_memory();
    let err = client_for(&server, &store)
        .post("/auth/login/", json!({}))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "0: Invalid credentials");
}

/// Test: a non-JSON failure body falls back to the generic message.
#[tokio::test]
async fn test_html_error_page_uses_generic_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let store = SessionStore::in_memory();
    let err = client_for(&server, &store)
        .get("/auth/me/")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Request failed");
    assert_eq!(err.status().map(|s| s.as_u16()), Some(502));
}

/// Test: transport failures surface as network errors.
#[tokio::test]
async fn test_connection_refused_is_network_failure() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let store = SessionStore::in_memory();
    let err = ApiClient::new(format!("{uri}/api"), store)
        .get("/auth/me/")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
}
