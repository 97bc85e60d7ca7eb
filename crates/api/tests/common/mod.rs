//! Shared helpers for HTTP-level integration tests.
//!
//! Mirrors the router construction in `main.rs` (via `build_app_router`) so
//! integration tests exercise the same middleware stack that production
//! uses. Requests go through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use caravel_api::auth::jwt::JwtConfig;
use caravel_api::config::{ServerConfig, UPLOAD_URL_PREFIX};
use caravel_api::router::build_app_router;
use caravel_api::state::AppState;
use caravel_core::media::MediaStore;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
///
/// Blobs are written to a per-run directory under the system temp dir.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        upload_dir: std::env::temp_dir().join(format!("caravel-test-{}", uuid::Uuid::new_v4())),
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            token_expiry_hours: 24,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. No SMTP is configured, so verification codes are
/// stored without dispatch (read them back via `VerificationRepo`).
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let media = Arc::new(MediaStore::new(&config.upload_dir, UPLOAD_URL_PREFIX));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        media,
        mailer: None,
    };

    build_app_router(state, &config)
}

/// Send a GET request.
pub async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response")
}

/// Send a GET request with a bearer token.
pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response")
}

/// Send a JSON request with the given method.
async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).expect("request"))
        .await
        .expect("response")
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body, None).await
}

/// Send a POST request with a JSON body and a bearer token.
pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send_json(app, Method::POST, uri, body, Some(token)).await
}

/// Send a PUT request with a JSON body.
pub async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, body, None).await
}

/// Send a DELETE request.
pub async fn delete(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response")
}

/// Collect a response body into a JSON value.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("valid JSON body")
}
