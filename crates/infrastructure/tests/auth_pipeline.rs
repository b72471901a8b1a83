//! Integration tests for the authenticated request pipeline.
//!
//! A wiremock backend stands in for the storefront API so the refresh
//! paths can be observed from the outside: how many exchanges actually
//! hit the wire, and what the client does with a 401.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use bazaar_application::auth::{RefreshCoordinator, TokenStore};
use bazaar_domain::{AuthError, TokenPair};
use bazaar_infrastructure::{
    ApiError, ClientConfig, HttpTokenExchange, MemoryTokenStorage, StorefrontClient,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn jwt_expiring_in(seconds: i64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, now + seconds));
    format!("{header}.{payload}.sig")
}

fn live_token() -> String {
    jwt_expiring_in(3600)
}

fn expired_token() -> String {
    jwt_expiring_in(-60)
}

fn user_body() -> serde_json::Value {
    json!({"id": 7, "username": "alice", "email": "alice@example.com"})
}

struct Harness {
    server: MockServer,
    storage: Arc<MemoryTokenStorage>,
    client: StorefrontClient,
}

async fn harness() -> Harness {
    let server = MockServer::start().await;
    let config = ClientConfig::parse(&server.uri()).unwrap();
    let storage = Arc::new(MemoryTokenStorage::new());
    let store = TokenStore::new(storage.clone());
    let exchange = Arc::new(HttpTokenExchange::new(config.clone()).unwrap());
    let coordinator = Arc::new(RefreshCoordinator::new(store.clone(), exchange));
    let client = StorefrontClient::new(config, store, coordinator).unwrap();
    Harness {
        server,
        storage,
        client,
    }
}

async fn seed(harness: &Harness, access: String) {
    use bazaar_application::ports::TokenStorage;
    harness
        .storage
        .save(&TokenPair::new(access, "refresh-1"))
        .await
        .unwrap();
}

fn refresh_mock(new_access: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .and(body_json(json!({"refresh": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": new_access,
            "refresh": "refresh-2",
        })))
}

#[tokio::test]
async fn test_valid_token_goes_straight_through() {
    let harness = harness().await;
    let access = live_token();
    seed(&harness, access.clone()).await;

    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .and(header("Authorization", format!("Bearer {access}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(1)
        .mount(&harness.server)
        .await;

    let user = harness.client.fetch_current_user().await.unwrap();
    assert_eq!(user.username, "alice");
}

#[tokio::test]
async fn test_proactive_refresh_before_request() {
    let harness = harness().await;
    seed(&harness, expired_token()).await;

    refresh_mock("fresh-access")
        .expect(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .and(header("Authorization", "Bearer fresh-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(1)
        .mount(&harness.server)
        .await;

    let user = harness.client.fetch_current_user().await.unwrap();
    assert_eq!(user.id, Some(7));

    // The rotated pair was persisted as a unit.
    use bazaar_application::ports::TokenStorage;
    let stored = harness.storage.load().await.unwrap().unwrap();
    assert_eq!(stored.access, "fresh-access");
    assert_eq!(stored.refresh, "refresh-2");
}

#[tokio::test]
async fn test_one_shot_retry_after_reactive_401() {
    let harness = harness().await;
    seed(&harness, live_token()).await;

    // The backend rejects the believed-valid token once, then accepts the
    // refreshed one.
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        })))
        .up_to_n_times(1)
        .mount(&harness.server)
        .await;
    refresh_mock("fresh-access")
        .expect(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .and(header("Authorization", "Bearer fresh-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(1)
        .mount(&harness.server)
        .await;

    let user = harness.client.fetch_current_user().await.unwrap();
    assert_eq!(user.username, "alice");
}

#[tokio::test]
async fn test_second_401_fails_without_third_attempt() {
    let harness = harness().await;
    seed(&harness, live_token()).await;

    // Exactly two hits: the original send and the single retry.
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        })))
        .expect(2)
        .mount(&harness.server)
        .await;
    refresh_mock("fresh-access")
        .expect(1)
        .mount(&harness.server)
        .await;

    let error = harness.client.fetch_current_user().await.unwrap_err();
    assert!(matches!(error, ApiError::Unauthenticated));
}

#[tokio::test]
async fn test_failed_refresh_aborts_request_and_clears_tokens() {
    let harness = harness().await;
    seed(&harness, expired_token()).await;

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is invalid or expired"
        })))
        .expect(1)
        .mount(&harness.server)
        .await;
    // No mock for the profile endpoint: the request must never go out.

    let error = harness.client.fetch_current_user().await.unwrap_err();
    match error {
        ApiError::Auth(AuthError::RefreshRejected { message }) => {
            assert_eq!(message, "Token is invalid or expired");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    use bazaar_application::ports::TokenStorage;
    assert!(harness.storage.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_requests_share_one_refresh() {
    let harness = harness().await;
    seed(&harness, expired_token()).await;

    // A slow exchange keeps the refresh in flight while the other
    // requests discover the expired token.
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(100))
                .set_body_json(json!({
                    "access": "fresh-access",
                    "refresh": "refresh-2",
                })),
        )
        .expect(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .and(header("Authorization", "Bearer fresh-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(3)
        .mount(&harness.server)
        .await;

    let client = Arc::new(harness.client);
    let tasks: Vec<_> = (0..3)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.fetch_current_user().await })
        })
        .collect();

    for task in tasks {
        let user = task.await.unwrap().unwrap();
        assert_eq!(user.username, "alice");
    }
}

#[tokio::test]
async fn test_anonymous_request_carries_no_bearer() {
    let harness = harness().await;
    // No tokens seeded: the request proceeds without an Authorization
    // header and the anonymous-friendly endpoint accepts it.
    Mock::given(method("GET"))
        .and(path("/api/products/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 0, "next": null, "previous": null, "results": []
        })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let page = harness.client.list_products().await.unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_anonymous_401_is_not_retried() {
    let harness = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Authentication credentials were not provided."
        })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let error = harness.client.fetch_current_user().await.unwrap_err();
    assert!(matches!(error, ApiError::Unauthenticated));
}
