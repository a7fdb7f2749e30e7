//! Gateway Integration Tests
//!
//! Drive the full router with in-memory requests against a recording mock
//! network and a real (test) store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use super::{create_router, AppState};
use crate::config::Config;
use crate::network::mock::MockNetwork;
use crate::network::{Contact, Destination, OutboundContent};
use crate::ratelimit::{RateLimitConfig, RateLimiter};
use crate::registry::contact_token;

fn state_with(
    pool: SqlitePool,
    network: Arc<MockNetwork>,
    rate_limiter: Option<RateLimiter>,
) -> AppState {
    AppState::new(
        pool,
        network,
        Arc::new(Config::default_for_test()),
        rate_limiter,
    )
}

fn alice() -> Contact {
    Contact {
        id: "c-1".to_string(),
        name: "alice".to_string(),
    }
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_reports_limiter_state(pool: SqlitePool) {
    let router = create_router(state_with(pool, MockNetwork::new(), None));

    let (status, body) = get(&router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "rate_limiting": false}));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_contact_token_is_a_logical_failure(pool: SqlitePool) {
    let network = MockNetwork::new();
    let router = create_router(state_with(pool, network.clone(), None));

    let (status, body) = get(&router, "/send/bm9ib2R5?msg=hi").await;

    // Logical failure, not an HTTP error
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": false, "msg": "token not exists"}));
    assert!(network.sent().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_contact_send_delivers_query_msg(pool: SqlitePool) {
    let network = MockNetwork::with_contacts(vec![alice()]);
    let router = create_router(state_with(pool, network.clone(), None));

    let token = contact_token("alice");
    let (status, body) = get(&router, &format!("/send/{token}?msg=hello")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": true}));

    let sent = network.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, Destination::Contact("c-1".to_string()));
    assert_eq!(sent[0].1, OutboundContent::Text("hello".to_string()));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_contact_send_without_msg_is_unsupported(pool: SqlitePool) {
    let network = MockNetwork::with_contacts(vec![alice()]);
    let router = create_router(state_with(pool, network.clone(), None));

    let token = contact_token("alice");
    let (_, body) = get(&router, &format!("/send/{token}")).await;

    assert_eq!(body, json!({"status": false, "msg": "unsupported msg type"}));
    assert!(network.sent().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_post_with_property_path_extracts_text(pool: SqlitePool) {
    let network = MockNetwork::with_contacts(vec![alice()]);
    let router = create_router(state_with(pool, network.clone(), None));

    let token = contact_token("alice");
    let (status, body) = post_json(
        &router,
        &format!("/send/{token}?property=data.text"),
        json!({"data": {"text": "hi"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": true}));
    assert_eq!(
        network.sent()[0].1,
        OutboundContent::Text("hi".to_string())
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_post_bare_image_body_sends_media(pool: SqlitePool) {
    let network = MockNetwork::with_contacts(vec![alice()]);
    let router = create_router(state_with(pool, network.clone(), None));

    let token = contact_token("alice");
    let (_, body) = post_json(
        &router,
        &format!("/send/{token}"),
        json!({"type": "image", "url": "http://x/y.png"}),
    )
    .await;

    assert_eq!(body, json!({"status": true}));
    assert_eq!(
        network.sent()[0].1,
        OutboundContent::Image {
            url: "http://x/y.png".to_string()
        }
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_post_unsendable_partial_value_is_unsupported(pool: SqlitePool) {
    let network = MockNetwork::with_contacts(vec![alice()]);
    let router = create_router(state_with(pool, network.clone(), None));

    let token = contact_token("alice");
    let (_, body) = post_json(
        &router,
        &format!("/send/{token}?property=data.text"),
        json!({"data": {"other": 1}}),
    )
    .await;

    assert_eq!(body, json!({"status": false, "msg": "unsupported msg type"}));
    assert!(network.sent().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_post_query_msg_wins_over_body(pool: SqlitePool) {
    let network = MockNetwork::with_contacts(vec![alice()]);
    let router = create_router(state_with(pool, network.clone(), None));

    let token = contact_token("alice");
    let (_, body) = post_json(
        &router,
        &format!("/send/{token}?msg=query-wins"),
        json!({"msg": "body-loses"}),
    )
    .await;

    assert_eq!(body, json!({"status": true}));
    assert_eq!(
        network.sent()[0].1,
        OutboundContent::Text("query-wins".to_string())
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_room_send_delivers_to_mapped_room(pool: SqlitePool) {
    let network = MockNetwork::new();
    let state = state_with(pool, network.clone(), None);
    let token = state.registry.room_token("room-1", "i-1").await.unwrap();
    let router = create_router(state);

    let (status, body) = get(&router, &format!("/room/{token}?msg=hello")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": true}));

    // Exactly one say() on the mapped room
    let sent = network.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, Destination::Room("room-1".to_string()));
    assert_eq!(sent[0].1, OutboundContent::Text("hello".to_string()));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_room_token_is_a_logical_failure(pool: SqlitePool) {
    let network = MockNetwork::new();
    let router = create_router(state_with(pool, network.clone(), None));

    let (status, body) = get(&router, "/room/no-such-token?msg=hi").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": false, "msg": "room token not exists"}));
    assert!(network.sent().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_transport_failures_surface_on_both_endpoints(pool: SqlitePool) {
    let network = MockNetwork::with_contacts(vec![alice()]);
    let state = state_with(pool, network.clone(), None);
    let room_token = state.registry.room_token("room-1", "i-1").await.unwrap();
    let router = create_router(state);
    network.fail_sends();

    // Both endpoints await the send, so both report the failure.
    let (status, body) = get(
        &router,
        &format!("/send/{}?msg=hi", contact_token("alice")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!(false));
    assert!(body["error"].is_string());

    let (status, body) = get(&router, &format!("/room/{room_token}?msg=hi")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!(false));
    assert!(body["error"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rate_limit_rejects_before_the_handler(pool: SqlitePool) {
    let network = MockNetwork::with_contacts(vec![alice()]);
    let limiter = RateLimiter::new(RateLimitConfig::default());
    let router = create_router(state_with(pool, network.clone(), Some(limiter)));

    let token = contact_token("alice");

    // The default window admits 10 requests per token.
    for _ in 0..10 {
        let (status, _) = get(&router, &format!("/send/{token}?msg=hi")).await;
        assert_eq!(status, StatusCode::OK);
    }

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/send/{token}?msg=hi"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("Retry-After"));

    // The rejected request never reached the handler
    assert_eq!(network.sent().len(), 10);

    // A different token is unaffected
    let (status, _) = get(&router, "/room/some-other-token?msg=hi").await;
    assert_eq!(status, StatusCode::OK);
}
