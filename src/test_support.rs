//! Shared fixtures for module tests

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

use crate::app::build_router;
use crate::auth::models::{IdentityAttributes, UserType};
use crate::auth::TokenService;
use crate::common::{migrations::run_migrations, AppState, StoreTimeouts};
use crate::users::UserStore;

pub const TEST_SECRET: &str = "test_secret_key";
pub const CREDENTIAL_HEADER: &str = "token";

/// Single-connection in-memory database with the schema applied
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    run_migrations(&pool, false)
        .await
        .expect("Failed to run migrations");
    pool
}

pub async fn test_state() -> Arc<AppState> {
    state_over(memory_pool().await)
}

fn state_over(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState {
        users: UserStore::new(pool),
        tokens: Arc::new(TokenService::from_secret(TEST_SECRET).expect("Failed to build tokens")),
        credential_header: axum::http::HeaderName::from_static(CREDENTIAL_HEADER),
        store_timeouts: StoreTimeouts::default(),
    })
}

pub async fn test_app() -> (Router, Arc<AppState>) {
    let state = test_state().await;
    (build_router(state.clone(), &[]), state)
}

/// Like `test_app`, also handing back the pool so a test can tamper with the schema
pub async fn test_app_with_pool() -> (Router, Arc<AppState>, SqlitePool) {
    let pool = memory_pool().await;
    let state = state_over(pool.clone());
    (build_router(state.clone(), &[]), state, pool)
}

pub fn identity(user_id: &str, user_type: UserType) -> IdentityAttributes {
    IdentityAttributes {
        email: "a@x.com".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        user_type,
        user_id: user_id.to_string(),
    }
}

/// Send one request through the router and decode the JSON body
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router returned an error");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Body was not JSON")
    };
    (status, body)
}

pub fn get_with_token(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(CREDENTIAL_HEADER, token);
    }
    builder.body(Body::empty()).expect("Failed to build request")
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}
