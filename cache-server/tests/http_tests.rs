//! End-to-end HTTP tests against the full router, exercised with
//! `tower::ServiceExt::oneshot` rather than a bound socket.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use cache_engine::clock::MockClock;
use cache_server::state::AppState;
use cache_server::{build_app, ServerConfig};

fn test_state() -> AppState {
    let mut config = ServerConfig::default();
    config.engine.clock = Arc::new(MockClock::new(0));
    config.rate_limit_per_minute = 1_000;
    AppState::new(config)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };
    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    // `oneshot` drives the router directly, bypassing the connect-info
    // layer `into_make_service_with_connect_info` installs in `serve`, so
    // the rate-limit middleware's `ConnectInfo` extractor is stocked here.
    req.extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 0))));
    req
}

#[tokio::test]
async fn set_then_get_round_trips() {
    let app = build_app(test_state());

    let set_req = request(
        Method::POST,
        "/api/set",
        Some(json!({"key": "a", "value": 1})),
    );
    let response = app.clone().oneshot(set_req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let get_req = request(Method::GET, "/api/get/a", None);
    let response = app.oneshot(get_req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["exists"], json!(true));
    assert_eq!(body["value"], json!(1));
}

#[tokio::test]
async fn get_of_absent_key_is_200_with_exists_false() {
    let app = build_app(test_state());
    let response = app
        .oneshot(request(Method::GET, "/api/get/missing", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["exists"], json!(false));
}

#[tokio::test]
async fn set_rejects_an_oversized_key() {
    let app = build_app(test_state());
    let long_key = "k".repeat(300);
    let response = app
        .oneshot(request(
            Method::POST,
            "/api/set",
            Some(json!({"key": long_key, "value": 1})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn set_rejects_a_ttl_outside_the_valid_range() {
    let app = build_app(test_state());
    let response = app
        .oneshot(request(
            Method::POST,
            "/api/set",
            Some(json!({"key": "a", "value": 1, "ttl": 86_400_001_u64})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_is_idempotent_via_http() {
    let app = build_app(test_state());
    app.clone()
        .oneshot(request(
            Method::POST,
            "/api/set",
            Some(json!({"key": "a", "value": 1})),
        ))
        .await
        .unwrap();

    let first = app
        .clone()
        .oneshot(request(Method::DELETE, "/api/delete/a", None))
        .await
        .unwrap();
    let first_body = body_json(first).await;
    assert_eq!(first_body["success"], json!(true));

    let second = app
        .oneshot(request(Method::DELETE, "/api/delete/a", None))
        .await
        .unwrap();
    let second_body = body_json(second).await;
    assert_eq!(second_body["success"], json!(false));
}

#[tokio::test]
async fn increment_from_absent_then_again() {
    let app = build_app(test_state());

    let first = app
        .clone()
        .oneshot(request(Method::POST, "/api/increment/counter", None))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first_body = body_json(first).await;
    assert_eq!(first_body["value"], json!(1.0));

    let second = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/increment/counter",
            Some(json!({"amount": 3})),
        ))
        .await
        .unwrap();
    let second_body = body_json(second).await;
    assert_eq!(second_body["value"], json!(4.0));

    app.clone()
        .oneshot(request(
            Method::POST,
            "/api/set",
            Some(json!({"key": "counter", "value": "x"})),
        ))
        .await
        .unwrap();

    let third = app
        .oneshot(request(Method::POST, "/api/increment/counter", None))
        .await
        .unwrap();
    assert_eq!(third.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_set_then_batch_get() {
    let app = build_app(test_state());
    let batch_set = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/batch/set",
            Some(json!({"entries": [
                {"key": "x", "value": 1},
                {"key": "y", "value": 2},
            ]})),
        ))
        .await
        .unwrap();
    assert_eq!(batch_set.status(), StatusCode::OK);
    let batch_set_body = body_json(batch_set).await;
    assert_eq!(batch_set_body["count"], json!(2));

    let batch_get = app
        .oneshot(request(
            Method::POST,
            "/api/batch/get",
            Some(json!({"keys": ["x", "y", "missing"]})),
        ))
        .await
        .unwrap();
    let batch_get_body = body_json(batch_get).await;
    assert_eq!(batch_get_body["requested"], json!(3));
    assert_eq!(batch_get_body["found"], json!(2));
}

#[tokio::test]
async fn batch_rejects_an_oversized_request() {
    let app = build_app(test_state());
    let keys: Vec<Value> = (0..101).map(|i| json!(format!("k{i}"))).collect();
    let response = app
        .oneshot(request(
            Method::POST,
            "/api/batch/delete",
            Some(json!({"keys": keys})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = build_app(test_state());
    let response = app
        .oneshot(request(Method::GET, "/not/a/real/route", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_ok_status() {
    let app = build_app(test_state());
    let response = app
        .oneshot(request(Method::GET, "/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], json!("ok"));
}

#[tokio::test]
async fn stats_reset_zeros_counters() {
    let app = build_app(test_state());
    app.clone()
        .oneshot(request(Method::GET, "/api/get/missing", None))
        .await
        .unwrap();

    let reset = app
        .clone()
        .oneshot(request(Method::POST, "/api/stats/reset", None))
        .await
        .unwrap();
    assert_eq!(reset.status(), StatusCode::OK);

    let stats = app
        .oneshot(request(Method::GET, "/api/stats", None))
        .await
        .unwrap();
    let body = body_json(stats).await;
    assert_eq!(body["misses"], json!(0));
}

#[tokio::test]
async fn keys_endpoint_paginates() {
    let app = build_app(test_state());
    for k in ["a", "b", "c"] {
        app.clone()
            .oneshot(request(
                Method::POST,
                "/api/set",
                Some(json!({"key": k, "value": 1})),
            ))
            .await
            .unwrap();
    }
    let response = app
        .oneshot(request(Method::GET, "/api/keys?limit=2&offset=1", None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total"], json!(3));
    assert_eq!(body["keys"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn keys_endpoint_rejects_limit_out_of_range() {
    let app = build_app(test_state());
    let response = app
        .oneshot(request(Method::GET, "/api/keys?limit=0", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
