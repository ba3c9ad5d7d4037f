// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Liveness, version and routing tests

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};

use crate::common::{send, test_app, FakeProvider};

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_ping_returns_pong() {
    let response = send(test_app(FakeProvider::new()), get("/ping")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.content_type().starts_with("application/json"));
    assert_eq!(
        response.json(),
        serde_json::json!({"message": "Pong! AI Backend is alive."})
    );
}

#[tokio::test]
async fn test_ping_touches_no_capability() {
    let provider = FakeProvider::new();
    let _ = send(test_app(provider.clone()), get("/ping")).await;
    assert_eq!(provider.load_count(), 0);
}

#[tokio::test]
async fn test_version_lists_features() {
    let response = send(test_app(FakeProvider::new()), get("/version")).await;

    assert_eq!(response.status, StatusCode::OK);
    let json = response.json();
    assert_eq!(json["version"], ai_image_backend::version::VERSION_NUMBER);
    let features = json["features"].as_array().unwrap();
    assert!(features.iter().any(|f| f == "resize"));
    assert!(features.iter().any(|f| f == "ocr"));
}

#[tokio::test]
async fn test_resize_rejects_get() {
    let response = send(test_app(FakeProvider::new()), get("/resize-image")).await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = send(test_app(FakeProvider::new()), get("/generate")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/resize-image")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = send(test_app(FakeProvider::new()), request).await;

    assert!(response.status.is_success());
    assert_eq!(
        response
            .headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
