// src/app.rs
//! Router composition

use axum::{extract::Extension, http::HeaderValue, middleware, routing::get, Json, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::common::AppState;
use crate::{auth, logging_middleware, users};

/// Build the full application router around `state`
pub fn build_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            state.credential_header.clone(),
        ]);

    Router::new()
        // ====================================================================
        // PUBLIC ROUTES (signup, login, refresh, health)
        // ====================================================================
        .route("/health", get(health))
        .merge(auth::auth_routes())
        // ====================================================================
        // PROTECTED ROUTES (behind the request gate)
        // ====================================================================
        .merge(users::users_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
